//! Per-subscriber serve loop.
//!
//! A [`StreamConnection`] drains one subscriber queue into one client transport:
//! it sends the retry directive, then forwards each event as an SSE frame and
//! fills idle periods with keep-alive comments until either side goes away.

use crate::error::{ReloadError, Result};
use crate::frame;
use crate::hub::{ChangeBroadcastHub, StreamRegistration, SubscriberId};
use async_trait::async_trait;
use bytes::Bytes;
use std::io;
use std::sync::Arc;
use std::time::Duration;

/// Client transport a serve loop writes frames to.
#[async_trait]
pub trait FrameSink: Send + Sync {
    /// Whether each frame can be pushed to the client as soon as it is written.
    fn supports_flush(&self) -> bool {
        true
    }

    /// Write and flush one frame.
    async fn send(&mut self, frame: Bytes) -> io::Result<()>;

    /// Resolves once the client has gone away.
    async fn closed(&self) {
        std::future::pending::<()>().await
    }
}

/// Timing for one event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamOptions {
    /// Idle period after which a keep-alive comment is written
    pub keep_alive: Duration,
    /// Reconnect delay advertised to the client
    pub retry: Duration,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            keep_alive: Duration::from_secs(30),
            retry: Duration::from_millis(500),
        }
    }
}

/// Why a serve loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The hub closed the subscriber queue
    Unsubscribed,
    /// The client disconnected or a write failed
    ClientGone,
}

pub struct StreamConnection<S> {
    registration: StreamRegistration,
    sink: S,
    options: StreamOptions,
}

impl<S: FrameSink> StreamConnection<S> {
    /// Subscribe a new client to `hub`.
    ///
    /// # Errors
    ///
    /// Returns [`ReloadError::UnsupportedStreaming`] if `sink` cannot flush.
    /// Nothing is registered with the hub in that case.
    pub fn accept(hub: &Arc<ChangeBroadcastHub>, sink: S, options: StreamOptions) -> Result<Self> {
        if !sink.supports_flush() {
            return Err(ReloadError::UnsupportedStreaming);
        }

        Ok(Self {
            registration: hub.subscribe(),
            sink,
            options,
        })
    }

    pub fn id(&self) -> SubscriberId {
        self.registration.id()
    }

    /// Serve the stream until the client leaves or the hub unsubscribes it.
    ///
    /// The registration is dropped on return, which removes it from the hub.
    pub async fn run(mut self) -> StreamEnd {
        let id = self.registration.id();

        if let Err(err) = self.sink.send(frame::retry(self.options.retry)).await {
            tracing::debug!(%id, "event stream closed before retry frame: {}", err);
            return StreamEnd::ClientGone;
        }

        loop {
            let next = tokio::select! {
                _ = self.sink.closed() => {
                    tracing::debug!(%id, "event stream client disconnected");
                    return StreamEnd::ClientGone;
                }
                next = tokio::time::timeout(self.options.keep_alive, self.registration.recv()) => next,
            };

            let frame = match next {
                Ok(Some(event)) => event.encode(),
                Ok(None) => {
                    tracing::debug!(%id, "event stream unsubscribed");
                    return StreamEnd::Unsubscribed;
                }
                Err(_idle) => frame::keep_alive(),
            };

            if let Err(err) = self.sink.send(frame).await {
                tracing::debug!(%id, "event stream write failed: {}", err);
                return StreamEnd::ClientGone;
            }
        }
    }
}
