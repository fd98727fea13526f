//! Dev server building blocks.
//!
//! - [`engine`] runs the build and collects its output files
//! - [`adapter`] stages a rebuild in the store and announces it
//! - [`bridge`] announces individual writes in `per-write` mode
//! - [`watcher`] turns source edits into rebuild triggers
//! - [`server`] serves the store and the live reload stream

pub mod adapter;
pub mod bridge;
pub mod engine;
pub mod server;
pub mod state;
pub mod watcher;

pub use adapter::{BuildAdapter, OutputFile};
pub use bridge::StoreBridge;
pub use engine::{collect_outputs, BuildEngine, CommandEngine};
pub use server::{router, DevServer, RELOAD_SCRIPT_PATH};
pub use state::AppState;
pub use watcher::{FileChange, FileWatcher};
