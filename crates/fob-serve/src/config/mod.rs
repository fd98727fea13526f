//! Dev server configuration with layered loading.
//!
//! Priority: CLI > `FOB_SERVE_*` environment > config file > defaults.

mod defaults;
mod loading;
mod validation;

use fob_reload::{HubOptions, StreamOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use defaults::*;
pub use loading::{ServeOverrides, CONFIG_FILE_NAMES, ENV_PREFIX};

/// When the build adapter tells the hub about new files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotifyMode {
    /// One change event per rebuild listing every staged path
    #[default]
    Batch,
    /// One change event per stored file, fired by the store itself
    PerWrite,
}

/// Settings for `fob-serve serve`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServeConfig {
    /// Interface the HTTP server binds to
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory the build command writes into; its contents are staged in memory
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Public prefix prepended to every staged path
    #[serde(default)]
    pub prefix: String,

    /// URL path of the live reload event stream
    #[serde(default = "default_stream_path")]
    pub stream_path: String,

    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,

    /// Reconnect delay advertised to browsers
    #[serde(default = "default_retry_ms")]
    pub retry_ms: u64,

    /// Per-client event queue size
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    #[serde(default)]
    pub notify_mode: NotifyMode,

    /// Build command, program first
    #[serde(default)]
    pub command: Vec<String>,

    /// Paths watched for source changes
    #[serde(default = "default_watch")]
    pub watch: Vec<PathBuf>,

    /// Extra ignore patterns for the watcher
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub watch_ignore: Vec<String>,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            out_dir: default_out_dir(),
            prefix: String::new(),
            stream_path: default_stream_path(),
            keep_alive_secs: default_keep_alive_secs(),
            retry_ms: default_retry_ms(),
            queue_capacity: default_queue_capacity(),
            notify_mode: NotifyMode::default(),
            command: Vec::new(),
            watch: default_watch(),
            watch_ignore: Vec::new(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl ServeConfig {
    pub fn stream_options(&self) -> StreamOptions {
        StreamOptions {
            keep_alive: Duration::from_secs(self.keep_alive_secs),
            retry: Duration::from_millis(self.retry_ms),
        }
    }

    pub fn hub_options(&self) -> HubOptions {
        HubOptions {
            queue_capacity: self.queue_capacity,
        }
    }

    /// `host:port` as accepted by `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Ignore patterns for the watcher, including the staging directory.
    pub fn ignore_patterns(&self) -> Vec<String> {
        let mut patterns = vec![
            "node_modules".to_string(),
            ".git".to_string(),
            "target".to_string(),
        ];

        if let Some(name) = self.out_dir.file_name().and_then(|n| n.to_str()) {
            patterns.push(name.to_string());
        }

        patterns.extend(self.watch_ignore.iter().cloned());
        patterns.dedup();
        patterns
    }
}
