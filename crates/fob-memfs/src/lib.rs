//! In-memory file store for dev-server build output.
//!
//! The build engine hands over `(path, bytes)` pairs on every rebuild; this crate
//! keeps the latest version of each one in memory so an HTTP layer can serve it
//! without touching disk.
//!
//! # Architecture
//!
//! - [`VirtualFileStore`] - flat map from normalized path to [`FileSnapshot`],
//!   guarded by a single `parking_lot::RwLock`
//! - [`FileSnapshot`] - immutable bytes + metadata, replaced wholesale on write
//! - [`FileHandle`] - read-only cursor over one snapshot, returned by `open`
//! - [`ChangeListener`] - token-based hook fired after each successful write
//!
//! # Example
//!
//! ```rust
//! use fob_memfs::VirtualFileStore;
//! use std::io::Read;
//!
//! let store = VirtualFileStore::new();
//! store.write("app.js", &b"hello world"[..]).unwrap();
//!
//! let mut file = store.open("app.js").unwrap();
//! let mut content = String::new();
//! file.read_to_string(&mut content).unwrap();
//!
//! assert_eq!(content, "hello world");
//! assert_eq!(file.metadata().unwrap().size(), 11);
//! ```

pub mod error;
pub mod handle;
pub mod listener;
pub mod path;
pub mod snapshot;
pub mod store;

pub use error::{Result, StoreError};
pub use handle::FileHandle;
pub use listener::{ChangeListener, ListenerToken};
pub use path::normalize_path;
pub use snapshot::{FileInfo, FileMode, FileSnapshot};
pub use store::{AssetWriter, VirtualFileStore};
