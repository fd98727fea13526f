/// Normalize a `--prefix` value to `a/b` form.
///
/// Leading and trailing slashes are dropped. Empty, `.` and `..` segments are
/// rejected so a prefix can never climb out of the served tree.
pub fn parse_prefix(s: &str) -> Result<String, String> {
    let trimmed = s.trim().trim_matches('/');

    if trimmed.is_empty() {
        return Ok(String::new());
    }

    for segment in trimmed.split('/') {
        match segment {
            "" => return Err(format!("Empty segment in prefix '{}'", s)),
            "." | ".." => {
                return Err(format!("Prefix '{}' may not contain '{}'", s, segment));
            }
            _ if segment.contains('\\') => {
                return Err(format!("Use '/' as the separator in prefix '{}'", s));
            }
            _ => {}
        }
    }

    Ok(trimmed.to_string())
}
