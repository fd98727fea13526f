//! Source watcher that triggers rebuilds.
//!
//! Watches the configured paths recursively and forwards relevant changes over
//! a channel. Editors tend to emit bursts of events for one save, so repeated
//! events for the same path inside the debounce window are dropped here and
//! the serve loop coalesces whatever remains into one rebuild.

use crate::error::{ConfigError, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Modified(PathBuf),
    Created(PathBuf),
    Removed(PathBuf),
}

impl FileChange {
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }
}

pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl FileWatcher {
    /// Watch each of `paths` (relative to `root`) recursively.
    ///
    /// # Errors
    ///
    /// Fails if a watch path does not exist or the OS watcher cannot be set up.
    pub fn new(
        root: PathBuf,
        paths: &[PathBuf],
        ignore_patterns: Vec<String>,
        debounce_ms: u64,
    ) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        let targets: Vec<PathBuf> = paths.iter().map(|p| root.join(p)).collect();
        if let Some(missing) = targets.iter().find(|p| !p.exists()) {
            return Err(ConfigError::InvalidValue {
                field: "watch".to_string(),
                value: missing.display().to_string(),
                hint: "Every watch path must exist".to_string(),
            }
            .into());
        }

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        let debounce = Duration::from_millis(debounce_ms);
        let mut last_event: Option<(PathBuf, Instant)> = None;
        let handler_root = root.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!("file watcher error: {}", err);
                    return;
                }
            };

            for path in &event.paths {
                if should_ignore(path, &handler_root, &ignore_patterns) {
                    continue;
                }

                let now = Instant::now();
                if let Some((last_path, last_time)) = &last_event {
                    if last_path == path && now.duration_since(*last_time) < debounce {
                        continue;
                    }
                }
                last_event = Some((path.clone(), now));

                let change = match event.kind {
                    EventKind::Create(_) => FileChange::Created(path.clone()),
                    EventKind::Modify(_) => FileChange::Modified(path.clone()),
                    EventKind::Remove(_) => FileChange::Removed(path.clone()),
                    _ => continue,
                };

                // A full channel already guarantees a pending rebuild.
                let _ = tx.try_send(change);
            }
        })?;

        for target in &targets {
            watcher.watch(target, RecursiveMode::Recursive)?;
            tracing::debug!(path = %target.display(), "watching");
        }

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Whether a change to `path` should be ignored.
///
/// Paths outside `root`, hidden entries, `*.ext` matches, and any path with a
/// component equal to a directory pattern are ignored.
pub fn should_ignore(path: &Path, root: &Path, ignore_patterns: &[String]) -> bool {
    let Ok(rel_path) = path.strip_prefix(root) else {
        return true;
    };

    let file_name = rel_path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    for component in rel_path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.starts_with('.') && name != "." && name != ".." {
            return true;
        }

        if ignore_patterns
            .iter()
            .any(|pattern| !pattern.starts_with('*') && name == pattern.as_str())
        {
            return true;
        }
    }

    ignore_patterns
        .iter()
        .filter_map(|pattern| pattern.strip_prefix('*'))
        .any(|suffix| file_name.ends_with(suffix))
}
