//! State shared by every request handler.

use crate::config::ServeConfig;
use fob_memfs::VirtualFileStore;
use fob_reload::{ChangeBroadcastHub, StreamOptions};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppState {
    /// Staged build output
    pub store: Arc<VirtualFileStore>,
    /// Connected live reload clients
    pub hub: Arc<ChangeBroadcastHub>,
    pub stream: StreamOptions,
    pub stream_path: Arc<str>,
}

impl AppState {
    pub fn new(store: Arc<VirtualFileStore>, hub: Arc<ChangeBroadcastHub>) -> Self {
        Self {
            store,
            hub,
            stream: StreamOptions::default(),
            stream_path: Arc::from(crate::config::default_stream_path()),
        }
    }

    /// Fresh store and hub tuned by `config`.
    pub fn from_config(config: &ServeConfig) -> Self {
        let hub = Arc::new(ChangeBroadcastHub::with_options(config.hub_options()));

        Self::new(Arc::new(VirtualFileStore::new()), hub)
            .with_stream_options(config.stream_options())
            .with_stream_path(&config.stream_path)
    }

    pub fn with_stream_options(mut self, options: StreamOptions) -> Self {
        self.stream = options;
        self
    }

    pub fn with_stream_path(mut self, path: &str) -> Self {
        self.stream_path = Arc::from(path);
        self
    }
}
