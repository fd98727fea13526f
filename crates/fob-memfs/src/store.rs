//! The virtual file store.
//!
//! Thread-safe access to build output using a parking_lot RwLock. Many readers
//! can open files simultaneously; writers get exclusive access only for the
//! duration of the map update.

use crate::error::{Result, StoreError};
use crate::handle::FileHandle;
use crate::listener::{ChangeListener, ListenerToken};
use crate::path::normalize_path;
use crate::snapshot::{FileInfo, FileSnapshot};
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Sink the build adapter writes rebuilt files into.
pub trait AssetWriter: Send + Sync {
    fn write_asset(&self, path: &str, content: &mut dyn Read) -> Result<FileInfo>;
}

/// Flat, in-memory map from path key to the last written snapshot.
///
/// Entries are replaced, never individually removed. [`reset`](Self::reset)
/// drops everything at once.
#[derive(Default)]
pub struct VirtualFileStore {
    /// Path key -> latest snapshot
    files: RwLock<HashMap<String, Arc<FileSnapshot>>>,

    /// Write listeners in registration order
    listeners: RwLock<Vec<(ListenerToken, Arc<dyn ChangeListener>)>>,

    next_token: AtomicU64,
}

impl VirtualFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain `content` into memory and store it under `path`.
    ///
    /// The source is read to the end before the lock is taken. If reading
    /// fails, nothing is inserted or replaced.
    ///
    /// # Arguments
    ///
    /// * `path` - Logical path, normalized with [`normalize_path`]
    /// * `content` - Byte source to drain
    ///
    /// # Returns
    ///
    /// Metadata of the newly stored snapshot
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the source cannot be fully read
    pub fn write(&self, path: &str, mut content: impl Read) -> Result<FileInfo> {
        let key = normalize_path(path);

        let mut buffer = Vec::new();
        content
            .read_to_end(&mut buffer)
            .map_err(|source| StoreError::Io {
                path: key.clone(),
                source,
            })?;

        Ok(self.insert(key, Bytes::from(buffer)))
    }

    /// Store already-materialized bytes under `path`.
    pub fn write_bytes(&self, path: &str, content: impl Into<Bytes>) -> FileInfo {
        self.insert(normalize_path(path), content.into())
    }

    fn insert(&self, key: String, content: Bytes) -> FileInfo {
        let snapshot = Arc::new(FileSnapshot::new(key.clone(), content));
        let info = snapshot.info().clone();

        self.files.write().insert(key, snapshot);

        tracing::debug!(path = info.name(), size = info.size(), "stored file");

        self.fire_listeners(&info);
        info
    }

    fn fire_listeners(&self, info: &FileInfo) {
        // Clone out so listeners may (un)subscribe without deadlocking.
        let listeners: Vec<Arc<dyn ChangeListener>> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener.on_write(info);
        }
    }

    /// Open the current snapshot stored under `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if nothing was written under `path`
    pub fn open(&self, path: &str) -> Result<FileHandle> {
        let key = normalize_path(path);
        let files = self.files.read();

        files
            .get(&key)
            .map(|snapshot| FileHandle::new(snapshot))
            .ok_or(StoreError::NotFound(key))
    }

    /// Metadata for `path` without opening a handle.
    pub fn stat(&self, path: &str) -> Result<FileInfo> {
        let key = normalize_path(path);
        self.files
            .read()
            .get(&key)
            .map(|snapshot| snapshot.info().clone())
            .ok_or(StoreError::NotFound(key))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.read().contains_key(&normalize_path(path))
    }

    /// Get number of stored files.
    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }

    /// All stored path keys, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.files.read().keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Drop every stored file.
    pub fn reset(&self) {
        let removed = {
            let mut files = self.files.write();
            let count = files.len();
            files.clear();
            count
        };
        tracing::debug!(removed, "store reset");
    }

    /// Register a listener called after every successful write.
    pub fn subscribe(&self, listener: Arc<dyn ChangeListener>) -> ListenerToken {
        let token = ListenerToken(self.next_token.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((token, listener));
        token
    }

    /// Remove a listener. Returns `false` if the token was already removed.
    pub fn unsubscribe(&self, token: ListenerToken) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(t, _)| *t != token);
        listeners.len() != before
    }
}

impl AssetWriter for VirtualFileStore {
    fn write_asset(&self, path: &str, content: &mut dyn Read) -> Result<FileInfo> {
        self.write(path, content)
    }
}

impl std::fmt::Debug for VirtualFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualFileStore")
            .field("files", &self.len())
            .field("listeners", &self.listeners.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "source went away",
            ))
        }
    }

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    impl ChangeListener for Recorder {
        fn on_write(&self, info: &FileInfo) {
            self.seen.lock().push(info.name().to_string());
        }
    }

    #[test]
    fn test_write_then_open() {
        let store = VirtualFileStore::new();
        let info = store.write("app.js", &b"hello world"[..]).unwrap();
        assert_eq!(info.size(), 11);

        let mut file = store.open("app.js").unwrap();
        let mut content = Vec::new();
        file.read_to_end(&mut content).unwrap();

        assert_eq!(content, b"hello world");
        assert_eq!(file.metadata().unwrap().name(), "app.js");
    }

    #[test]
    fn test_open_missing_is_not_found() {
        let store = VirtualFileStore::new();
        let err = store.open("missing.js").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let store = VirtualFileStore::new();
        store.write("app.js", &b"v1"[..]).unwrap();

        let err = store.write("app.js", FailingReader).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));

        let err = store.write("other.js", FailingReader).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));

        assert_eq!(store.len(), 1);
        let bytes = store.open("app.js").unwrap().into_bytes().unwrap();
        assert_eq!(bytes, Bytes::from_static(b"v1"));
    }

    #[test]
    fn test_write_replaces_wholesale() {
        let store = VirtualFileStore::new();
        store.write("app.js", &b"a much longer first version"[..]).unwrap();
        store.write("app.js", &b"short"[..]).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.stat("app.js").unwrap().size(), 5);
    }

    #[test]
    fn test_normalized_keys_share_an_entry() {
        let store = VirtualFileStore::new();
        store.write_bytes("/assets\\app.js", "x");

        assert!(store.contains("assets/app.js"));
        assert!(store.open("./assets/app.js").is_ok());
        assert_eq!(store.paths(), vec!["assets/app.js".to_string()]);
    }

    #[test]
    fn test_reset_clears_everything() {
        let store = VirtualFileStore::new();
        store.write_bytes("a.js", "a");
        store.write_bytes("b.js", "b");
        assert_eq!(store.len(), 2);

        store.reset();
        assert!(store.is_empty());
        assert!(store.open("a.js").unwrap_err().is_not_found());
    }

    #[test]
    fn test_listeners_fire_in_order_and_unsubscribe() {
        let store = VirtualFileStore::new();
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());

        let token = store.subscribe(first.clone());
        store.subscribe(second.clone());

        store.write_bytes("a.js", "a");
        assert!(store.unsubscribe(token));
        assert!(!store.unsubscribe(token));
        store.write_bytes("b.js", "b");

        assert_eq!(*first.seen.lock(), vec!["a.js"]);
        assert_eq!(*second.seen.lock(), vec!["a.js", "b.js"]);
    }

    #[test]
    fn test_listener_not_fired_on_failed_write() {
        let store = VirtualFileStore::new();
        let recorder = Arc::new(Recorder::default());
        store.subscribe(recorder.clone());

        let _ = store.write("a.js", FailingReader);
        assert!(recorder.seen.lock().is_empty());
    }
}
