//! axum integration: turns a serve loop into a streaming HTTP response.

use crate::connection::{FrameSink, StreamConnection, StreamOptions};
use crate::error::Result;
use crate::hub::ChangeBroadcastHub;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use std::convert::Infallible;
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Frames buffered between the serve loop and hyper.
const BODY_BUFFER: usize = 8;

/// Sink backed by the channel that feeds a streaming response body.
///
/// Every frame becomes one body chunk, which hyper writes out immediately.
/// When the client disconnects hyper drops the body, closing the channel.
pub struct ChannelSink {
    tx: mpsc::Sender<Result<Bytes, Infallible>>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Result<Bytes, Infallible>>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl FrameSink for ChannelSink {
    async fn send(&mut self, frame: Bytes) -> io::Result<()> {
        self.tx.send(Ok(frame)).await.map_err(|_| {
            io::Error::new(
                io::ErrorKind::BrokenPipe,
                "event stream client disconnected",
            )
        })
    }

    async fn closed(&self) {
        self.tx.closed().await
    }
}

/// Open an event stream for one client and return the HTTP response for it.
///
/// The serve loop runs on its own task and ends when the client disconnects.
///
/// # Errors
///
/// Propagates [`ReloadError::UnsupportedStreaming`](crate::ReloadError::UnsupportedStreaming)
/// from [`StreamConnection::accept`].
pub fn event_stream_response(
    hub: &Arc<ChangeBroadcastHub>,
    options: StreamOptions,
) -> Result<Response> {
    let (tx, rx) = mpsc::channel(BODY_BUFFER);
    let connection = StreamConnection::accept(hub, ChannelSink::new(tx), options)?;
    let id = connection.id();

    tracing::info!(%id, "client connected to event stream");

    tokio::spawn(async move {
        let end = connection.run().await;
        tracing::info!(%id, ?end, "client left event stream");
    });

    let headers = [
        (header::CONTENT_TYPE, "text/event-stream"),
        (header::CACHE_CONTROL, "no-cache"),
        (header::CONNECTION, "keep-alive"),
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    ];

    Ok((
        StatusCode::OK,
        headers,
        Body::from_stream(ReceiverStream::new(rx)),
    )
        .into_response())
}
