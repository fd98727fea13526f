//! Read-only handles returned by [`VirtualFileStore::open`](crate::VirtualFileStore::open).

use crate::error::{Result, StoreError};
use crate::snapshot::{FileInfo, FileSnapshot};
use bytes::{Buf, Bytes};
use std::io::{self, Read};

/// Independent read cursor over one snapshot.
///
/// The handle owns its own view of the snapshot bytes. A later write to the same
/// path replaces the store entry but never the bytes held here.
///
/// # Close semantics
///
/// The first [`close`](FileHandle::close) succeeds. Closing again, or reading or
/// querying metadata after close, returns [`StoreError::Closed`].
#[derive(Debug)]
pub struct FileHandle {
    info: FileInfo,
    remaining: Bytes,
    closed: bool,
}

impl FileHandle {
    pub(crate) fn new(snapshot: &FileSnapshot) -> Self {
        Self {
            info: snapshot.info().clone(),
            remaining: snapshot.content(),
            closed: false,
        }
    }

    pub fn metadata(&self) -> Result<&FileInfo> {
        self.ensure_open()?;
        Ok(&self.info)
    }

    pub fn close(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.closed = true;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Consume the handle and return the unread content without copying.
    pub fn into_bytes(self) -> Result<Bytes> {
        self.ensure_open()?;
        Ok(self.remaining)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

impl Read for FileHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.ensure_open()?;

        let n = buf.len().min(self.remaining.len());
        self.remaining.copy_to_slice(&mut buf[..n]);
        Ok(n)
    }
}
