//! Immutable file snapshots and their metadata.

use bytes::Bytes;
use std::fmt;
use std::time::SystemTime;

/// File mode bits reported for in-memory files.
///
/// The low nine bits are Unix-style permissions; the high bits carry type flags.
/// Every stored file reports [`FileMode::TEMPORARY`] so callers can tell it
/// apart from a real file on disk.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileMode(u32);

impl FileMode {
    /// Ephemeral, process-lifetime file
    pub const TEMPORARY: FileMode = FileMode(1 << 28);

    /// Read-only for everyone
    pub const READ_ONLY: FileMode = FileMode(0o444);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn union(self, other: FileMode) -> FileMode {
        FileMode(self.0 | other.0)
    }

    pub const fn contains(self, other: FileMode) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_temporary(self) -> bool {
        self.contains(FileMode::TEMPORARY)
    }

    pub fn permissions(self) -> u32 {
        self.0 & 0o777
    }
}

impl fmt::Debug for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.is_temporary() { "T" } else { "-" };
        write!(f, "FileMode({}{:o})", prefix, self.permissions())
    }
}

/// Metadata describing one stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    name: String,
    size: u64,
    modified: SystemTime,
}

impl FileInfo {
    /// Path key the file is stored under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Content length in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// When the snapshot was written
    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    /// Keys are flat, so nothing in the store is ever a directory.
    pub fn is_dir(&self) -> bool {
        false
    }

    pub fn mode(&self) -> FileMode {
        FileMode::TEMPORARY.union(FileMode::READ_ONLY)
    }
}

/// Immutable captured state of one file.
///
/// Created fresh on every write and never mutated afterwards. The content is a
/// reference-counted [`Bytes`], so handing it to any number of readers needs no
/// further synchronization.
#[derive(Clone)]
pub struct FileSnapshot {
    info: FileInfo,
    content: Bytes,
}

impl FileSnapshot {
    pub fn new(name: impl Into<String>, content: Bytes) -> Self {
        let info = FileInfo {
            name: name.into(),
            size: content.len() as u64,
            modified: SystemTime::now(),
        };
        Self { info, content }
    }

    pub fn info(&self) -> &FileInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        self.info.name()
    }

    pub fn size(&self) -> u64 {
        self.info.size()
    }

    pub fn modified(&self) -> SystemTime {
        self.info.modified()
    }

    /// Cheap clone of the content (refcount bump, no copy).
    pub fn content(&self) -> Bytes {
        self.content.clone()
    }
}

impl fmt::Debug for FileSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSnapshot")
            .field("name", &self.info.name)
            .field("size", &self.info.size)
            .field("modified", &self.info.modified)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_size_matches_content() {
        let snapshot = FileSnapshot::new("app.js", Bytes::from_static(b"hello world"));
        assert_eq!(snapshot.size(), 11);
        assert_eq!(snapshot.name(), "app.js");
        assert_eq!(snapshot.content(), Bytes::from_static(b"hello world"));
    }

    #[test]
    fn test_info_reports_temporary_file() {
        let snapshot = FileSnapshot::new("app.js", Bytes::new());
        let info = snapshot.info();
        assert!(!info.is_dir());
        assert!(info.mode().is_temporary());
        assert_eq!(info.mode().permissions(), 0o444);
    }

    #[test]
    fn test_mode_debug() {
        let mode = FileMode::TEMPORARY.union(FileMode::READ_ONLY);
        assert_eq!(format!("{:?}", mode), "FileMode(T444)");
        assert_eq!(format!("{:?}", FileMode::READ_ONLY), "FileMode(-444)");
    }
}
