//! fob-serve: an in-memory dev server with live reload.
//!
//! Runs a build command, stages everything it writes in a
//! [`VirtualFileStore`](fob_memfs::VirtualFileStore), serves it over HTTP, and
//! tells connected browsers what changed through a Server-Sent Events stream
//! fed by a [`ChangeBroadcastHub`](fob_reload::ChangeBroadcastHub).
//!
//! - [`cli`] - argument parsing
//! - [`config`] - layered configuration
//! - [`dev`] - build engine, staging adapter, watcher, HTTP server
//! - [`commands`] - `serve` and `check`
//! - [`error`] - error types and miette conversion
//! - [`logger`] / [`ui`] - tracing setup and terminal output
//!
//! ```rust,no_run
//! use fob_serve::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod dev;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{BuildError, CliError, ConfigError, Result, ResultExt};
