//! Path key normalization.

/// Normalize a logical path into the key used by the store.
///
/// Keys are opaque and case-sensitive. Only separators are touched:
/// backslashes become `/`, and leading `/` or `./` segments are dropped so
/// that `"/app.js"`, `"./app.js"` and `"app.js"` address the same file.
pub fn normalize_path(path: &str) -> String {
    let mut key = path.replace('\\', "/");

    loop {
        if let Some(rest) = key.strip_prefix("./") {
            key = rest.to_string();
        } else if let Some(rest) = key.strip_prefix('/') {
            key = rest.to_string();
        } else {
            break;
        }
    }

    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plain() {
        assert_eq!(normalize_path("app.js"), "app.js");
        assert_eq!(normalize_path("assets/app.js"), "assets/app.js");
    }

    #[test]
    fn test_normalize_leading_separators() {
        assert_eq!(normalize_path("/app.js"), "app.js");
        assert_eq!(normalize_path("./app.js"), "app.js");
        assert_eq!(normalize_path(".//./app.js"), "app.js");
    }

    #[test]
    fn test_normalize_backslashes() {
        assert_eq!(normalize_path("assets\\js\\app.js"), "assets/js/app.js");
    }

    #[test]
    fn test_normalize_is_case_sensitive() {
        assert_ne!(normalize_path("App.js"), normalize_path("app.js"));
    }
}
