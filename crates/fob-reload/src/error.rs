//! Error types for the broadcast hub and event streams.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

pub type Result<T, E = ReloadError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ReloadError {
    /// The transport cannot flush incrementally, so no stream was opened
    #[error("the transport does not support streaming flushes")]
    UnsupportedStreaming,

    /// A change event could not be serialized
    #[error("failed to encode change event: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl IntoResponse for ReloadError {
    fn into_response(self) -> Response {
        tracing::error!("event stream error: {}", self);

        match self {
            ReloadError::UnsupportedStreaming => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "500 - event stream error",
            )
                .into_response(),
            ReloadError::Encoding(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("500 - failed to encode event: {}", e),
            )
                .into_response(),
        }
    }
}
