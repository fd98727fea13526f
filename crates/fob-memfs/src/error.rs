//! Error types for store reads and writes.

use thiserror::Error;

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No snapshot is stored under this path
    #[error("file not found: {0}")]
    NotFound(String),

    /// The content source could not be drained; the store was left unchanged
    #[error("failed to read content for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The handle was already closed
    #[error("file already closed")]
    Closed,
}

impl StoreError {
    /// True for the NotFound condition, which the HTTP layer maps to a 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl From<StoreError> for std::io::Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => std::io::Error::new(std::io::ErrorKind::NotFound, err),
            StoreError::Io { source, .. } => source,
            StoreError::Closed => std::io::Error::other(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = StoreError::NotFound("app.js".to_string());
        assert_eq!(err.to_string(), "file not found: app.js");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_io_conversion_keeps_kind() {
        let err: std::io::Error = StoreError::NotFound("x".into()).into();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);

        let err: std::io::Error = StoreError::Io {
            path: "x".into(),
            source: std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof"),
        }
        .into();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }
}
