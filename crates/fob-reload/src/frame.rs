//! Server-Sent Events wire frames.

use bytes::Bytes;
use std::time::Duration;

/// Reconnect directive sent once, before any event.
///
/// Note the single trailing newline: the directive shares the first event
/// block instead of dispatching an empty event.
pub fn retry(interval: Duration) -> Bytes {
    Bytes::from(format!("retry: {}\n", interval.as_millis()))
}

/// Comment-only frame that keeps intermediaries from timing out the connection.
pub fn keep_alive() -> Bytes {
    Bytes::from_static(b":\n\n")
}

/// Named event frame. Multi-line data is split across `data:` fields.
pub fn event(name: &str, data: &str) -> Bytes {
    let mut frame = String::with_capacity(name.len() + data.len() + 16);
    frame.push_str("event: ");
    frame.push_str(name);
    frame.push('\n');
    for line in data.split('\n') {
        frame.push_str("data: ");
        frame.push_str(line);
        frame.push('\n');
    }
    frame.push('\n');
    Bytes::from(frame)
}
