//! The change broadcast hub.
//!
//! Tracks connected stream subscribers and fans change events out to them.
//! Every subscriber owns a bounded queue; `notify` enqueues with `try_send`, so a
//! stalled client can never delay the publisher or the other subscribers.

use crate::error::Result;
use crate::event::{ChangeEvent, ServerSentEvent};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::mpsc::{self, error::TrySendError};

/// Receives the list of public paths changed by one rebuild.
pub trait ChangeNotifier: Send + Sync {
    fn notify_changed(&self, updated: &[String]) -> Result<()>;
}

/// Hub tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubOptions {
    /// Events buffered per subscriber before new ones are dropped
    pub queue_capacity: usize,
}

impl Default for HubOptions {
    fn default() -> Self {
        Self { queue_capacity: 16 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of one broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyReport {
    /// Subscribers the event was queued for
    pub delivered: usize,
    /// Subscribers whose queue was full; they miss this event
    pub dropped: usize,
    /// Subscribers found disconnected and removed
    pub pruned: usize,
}

/// One live subscriber: its id and the receiving end of its queue.
///
/// Dropping the registration unsubscribes it, so a connection that goes away
/// for any reason is removed from the hub.
pub struct StreamRegistration {
    id: SubscriberId,
    receiver: mpsc::Receiver<ServerSentEvent>,
    hub: Weak<ChangeBroadcastHub>,
}

impl StreamRegistration {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next event. `None` once the hub has unsubscribed this stream.
    pub async fn recv(&mut self) -> Option<ServerSentEvent> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Option<ServerSentEvent> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for StreamRegistration {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.unsubscribe(self.id);
        }
    }
}

impl fmt::Debug for StreamRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamRegistration")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Owns the set of active subscribers.
///
/// The subscriber map has its own lock, independent of any file store lock, and
/// is never held while events are being enqueued.
pub struct ChangeBroadcastHub {
    subscribers: Mutex<HashMap<SubscriberId, mpsc::Sender<ServerSentEvent>>>,
    next_id: AtomicU64,
    options: HubOptions,
}

impl ChangeBroadcastHub {
    pub fn new() -> Self {
        Self::with_options(HubOptions::default())
    }

    pub fn with_options(options: HubOptions) -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            options,
        }
    }

    pub fn options(&self) -> HubOptions {
        self.options
    }

    /// Register a new subscriber with a fresh queue.
    ///
    /// The registration is active as soon as this returns.
    pub fn subscribe(self: &Arc<Self>) -> StreamRegistration {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(self.options.queue_capacity.max(1));

        let count = {
            let mut subscribers = self.subscribers.lock();
            subscribers.insert(id, tx);
            subscribers.len()
        };

        tracing::debug!(%id, subscribers = count, "stream subscribed");

        StreamRegistration {
            id,
            receiver: rx,
            hub: Arc::downgrade(self),
        }
    }

    /// Remove a subscriber and close its queue.
    ///
    /// Returns `false` if it was already removed; the queue is closed only once.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let removed = self.subscribers.lock().remove(&id);

        match removed {
            Some(sender) => {
                // Dropping the last sender closes the queue for the serve loop.
                drop(sender);
                tracing::debug!(%id, "stream unsubscribed");
                true
            }
            None => false,
        }
    }

    /// Remove every subscriber, closing all queues. Used on shutdown.
    pub fn close_all(&self) -> usize {
        let drained: Vec<_> = self.subscribers.lock().drain().collect();
        let count = drained.len();
        drop(drained);

        if count > 0 {
            tracing::debug!(count, "closed all event streams");
        }
        count
    }

    /// Get number of connected subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Broadcast a `change` event listing `paths` to every current subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`ReloadError::Encoding`](crate::ReloadError::Encoding) if the
    /// payload cannot be serialized; no subscriber is touched in that case.
    pub fn notify(&self, paths: &[String]) -> Result<NotifyReport> {
        let data = ChangeEvent::new(paths.to_vec()).to_json()?;
        Ok(self.broadcast(ChangeEvent::KIND, data))
    }

    /// Queue one event for every subscriber registered at the time of the call.
    ///
    /// Subscribers that join while the event is being dispatched may or may not
    /// receive it.
    pub fn broadcast(&self, event: &str, data: impl Into<Arc<str>>) -> NotifyReport {
        let message = ServerSentEvent::new(event, data);

        let targets: Vec<(SubscriberId, mpsc::Sender<ServerSentEvent>)> = self
            .subscribers
            .lock()
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect();

        let mut report = NotifyReport::default();
        let mut stale = Vec::new();

        for (id, tx) in targets {
            match tx.try_send(message.clone()) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    report.dropped += 1;
                    tracing::warn!(%id, event, "subscriber queue full, dropping event");
                }
                Err(TrySendError::Closed(_)) => stale.push(id),
            }
        }

        for id in stale {
            if self.unsubscribe(id) {
                report.pruned += 1;
            }
        }

        tracing::debug!(
            event,
            delivered = report.delivered,
            dropped = report.dropped,
            pruned = report.pruned,
            "broadcast"
        );

        report
    }
}

impl Default for ChangeBroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier for ChangeBroadcastHub {
    fn notify_changed(&self, updated: &[String]) -> Result<()> {
        self.notify(updated).map(|_| ())
    }
}

impl fmt::Debug for ChangeBroadcastHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeBroadcastHub")
            .field("subscribers", &self.subscriber_count())
            .field("options", &self.options)
            .finish()
    }
}
