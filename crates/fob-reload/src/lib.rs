//! Live-reload change broadcasting over Server-Sent Events.
//!
//! A [`ChangeBroadcastHub`] keeps one bounded queue per connected browser and
//! fans change events out to all of them without ever blocking the publisher.
//! Each subscriber is drained by a [`StreamConnection`] serve loop that writes
//! SSE frames to its HTTP response and emits idle keep-alives.
//!
//! ```text
//! notify(paths) ──> hub ──try_send──> queue ──> StreamConnection ──> FrameSink ──> browser
//! ```
//!
//! [`event_stream_response`] wires a serve loop to an axum response body.

pub mod connection;
pub mod error;
pub mod event;
pub mod frame;
pub mod hub;
pub mod sse;

pub use connection::{FrameSink, StreamConnection, StreamEnd, StreamOptions};
pub use error::{ReloadError, Result};
pub use event::{ChangeEvent, ServerSentEvent};
pub use hub::{
    ChangeBroadcastHub, ChangeNotifier, HubOptions, NotifyReport, StreamRegistration,
    SubscriberId,
};
pub use sse::{event_stream_response, ChannelSink};
