//! Stages one rebuild's output files in the asset store.
//!
//! Each output path is made relative to the output directory, joined with the
//! public prefix, and written through an [`AssetWriter`]. When every file of
//! the batch is stored, the optional [`ChangeNotifier`] gets the full list of
//! public paths in engine order. A failed write stops the batch and nothing
//! is announced.

use crate::error::BuildError;
use bytes::Bytes;
use fob_memfs::AssetWriter;
use fob_reload::ChangeNotifier;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One file produced by a rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// Absolute path the engine reports for the file
    pub path: PathBuf,
    pub contents: Bytes,
}

impl OutputFile {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Bytes>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

pub struct BuildAdapter {
    out_dir: PathBuf,
    base_path: String,
    prefix: String,
    writer: Arc<dyn AssetWriter>,
    notifier: Option<Arc<dyn ChangeNotifier>>,
}

impl BuildAdapter {
    /// `out_dir` should be absolute; output paths are resolved against it.
    pub fn new(out_dir: impl Into<PathBuf>, writer: Arc<dyn AssetWriter>) -> Self {
        let out_dir = out_dir.into();
        let base_path = format_path(&out_dir.to_string_lossy())
            .trim_end_matches('/')
            .to_string();

        Self {
            out_dir,
            base_path,
            prefix: String::new(),
            writer,
            notifier: None,
        }
    }

    /// Serve every staged file under `prefix`.
    pub fn with_prefix(mut self, prefix: impl AsRef<str>) -> Self {
        self.prefix = format_path(prefix.as_ref()).trim_matches('/').to_string();
        self
    }

    /// Announce each completed batch to `notifier`.
    pub fn with_notifier(mut self, notifier: Arc<dyn ChangeNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Store a whole rebuild, then notify once.
    ///
    /// Returns the public paths in the order the engine produced the files.
    ///
    /// # Errors
    ///
    /// The first path or write failure aborts the batch before any notification.
    pub fn update(&self, files: &[OutputFile]) -> Result<Vec<String>, BuildError> {
        let mut changes = Vec::with_capacity(files.len());

        for file in files {
            changes.push(self.write(file)?);
        }

        if let Some(notifier) = &self.notifier {
            notifier.notify_changed(&changes)?;
            tracing::debug!(count = changes.len(), "announced rebuild");
        }

        Ok(changes)
    }

    /// Store one file under its public path and return that path.
    pub fn write(&self, file: &OutputFile) -> Result<String, BuildError> {
        let public_path = self.rel_path(&file.path)?;
        let mut reader: &[u8] = &file.contents;

        self.writer
            .write_asset(&public_path, &mut reader)
            .map_err(|source| BuildError::Store {
                path: public_path.clone(),
                source,
            })?;

        Ok(public_path)
    }

    /// Public path for an engine output path.
    ///
    /// # Errors
    ///
    /// [`BuildError::OutsideOutputRoot`] if `name` is not inside the output directory.
    pub fn rel_path(&self, name: &Path) -> Result<String, BuildError> {
        let formatted = format_path(&name.to_string_lossy());

        let rel = formatted
            .strip_prefix(&self.base_path)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rest| !rest.is_empty() && !rest.split('/').any(|seg| seg == ".."))
            .ok_or_else(|| BuildError::OutsideOutputRoot {
                path: name.to_path_buf(),
                root: self.out_dir.clone(),
            })?;

        if self.prefix.is_empty() {
            Ok(rel.to_string())
        } else {
            Ok(format!("{}/{}", self.prefix, rel))
        }
    }
}

impl std::fmt::Debug for BuildAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildAdapter")
            .field("out_dir", &self.out_dir)
            .field("prefix", &self.prefix)
            .field("notifies", &self.notifier.is_some())
            .finish()
    }
}

fn format_path(path: &str) -> String {
    path.replace('\\', "/")
}
