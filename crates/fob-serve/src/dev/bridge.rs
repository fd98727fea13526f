//! Per-write change forwarding.
//!
//! In `per-write` mode a [`StoreBridge`] is registered on the store and turns
//! every stored file into its own single-path change event. This runs on the
//! writing thread; it is safe because hub notification never waits on clients.

use fob_memfs::{ChangeListener, FileInfo, ListenerToken, VirtualFileStore};
use fob_reload::ChangeNotifier;
use std::sync::Arc;

pub struct StoreBridge {
    notifier: Arc<dyn ChangeNotifier>,
}

impl StoreBridge {
    pub fn new(notifier: Arc<dyn ChangeNotifier>) -> Self {
        Self { notifier }
    }

    /// Register a bridge to `notifier` on `store`.
    pub fn attach(store: &VirtualFileStore, notifier: Arc<dyn ChangeNotifier>) -> ListenerToken {
        store.subscribe(Arc::new(Self::new(notifier)))
    }
}

impl ChangeListener for StoreBridge {
    fn on_write(&self, info: &FileInfo) {
        if let Err(err) = self.notifier.notify_changed(&[info.name().to_string()]) {
            tracing::warn!(path = info.name(), "failed to announce write: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fob_reload::ChangeBroadcastHub;

    #[tokio::test]
    async fn test_each_write_becomes_one_event() {
        let store = VirtualFileStore::new();
        let hub = Arc::new(ChangeBroadcastHub::new());
        let mut registration = hub.subscribe();

        StoreBridge::attach(&store, hub.clone());
        store.write_bytes("app.js", "a");
        store.write_bytes("/style.css", "b");

        let first = registration.try_recv().unwrap();
        let second = registration.try_recv().unwrap();
        assert_eq!(first.data(), r#"{"updated":["app.js"]}"#);
        assert_eq!(second.data(), r#"{"updated":["style.css"]}"#);
        assert!(registration.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_detached_bridge_is_silent() {
        let store = VirtualFileStore::new();
        let hub = Arc::new(ChangeBroadcastHub::new());
        let mut registration = hub.subscribe();

        let token = StoreBridge::attach(&store, hub.clone());
        assert!(store.unsubscribe(token));
        store.write_bytes("app.js", "a");

        assert!(registration.try_recv().is_none());
    }
}
