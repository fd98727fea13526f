//! Change listeners fired after successful writes.

use crate::snapshot::FileInfo;

/// Receives metadata for every file written to the store.
///
/// Listeners run synchronously on the writing thread, after the store lock has
/// been released, in registration order. Implementations must not block.
pub trait ChangeListener: Send + Sync {
    fn on_write(&self, info: &FileInfo);
}

/// Opaque handle returned by [`VirtualFileStore::subscribe`](crate::VirtualFileStore::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerToken(pub(crate) u64);
