//! Events carried from the hub to subscribers.

use crate::error::Result;
use crate::frame;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Payload of a `change` event: the public paths rebuilt in one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub updated: Vec<String>,
}

impl ChangeEvent {
    /// SSE event name for change notifications
    pub const KIND: &'static str = "change";

    pub fn new(updated: Vec<String>) -> Self {
        Self { updated }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// One encoded-once message queued to every subscriber.
///
/// Both fields are shared, so cloning per subscriber costs two refcount bumps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSentEvent {
    event: Arc<str>,
    data: Arc<str>,
}

impl ServerSentEvent {
    pub fn new(event: impl Into<Arc<str>>, data: impl Into<Arc<str>>) -> Self {
        Self {
            event: event.into(),
            data: data.into(),
        }
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    /// Wire form: `event: <name>\ndata: <data>\n\n`
    pub fn encode(&self) -> Bytes {
        frame::event(&self.event, &self.data)
    }
}
