//! Module `publisher`
//!
//! Dispatches completed uploads to the message bus. Publishing is
//! fire-and-forget: the protocol-level upload acknowledgment never waits on
//! the bus, and publish failures never reach the client. Attempts made
//! while the bus connection is still coming up are dropped; the drop is
//! logged and counted so an operator can see the gap.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{info, warn};

use super::bus::{MessageBus, PublishedMessage};

pub struct Publisher {
    bus: Arc<dyn MessageBus>,
    dropped: AtomicU64,
}

impl Publisher {
    pub fn new(bus: Arc<dyn MessageBus>) -> Self {
        Self {
            bus,
            dropped: AtomicU64::new(0),
        }
    }

    /// Whether the underlying bus connection is established. Callers that
    /// need delivery guarantees must watch this; the protocol path does not.
    pub fn is_ready(&self) -> bool {
        self.bus.is_ready()
    }

    /// Uploads dropped because the bus was not ready at completion time.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Hands one message to the bus without blocking the caller. Must run
    /// inside the tokio runtime.
    pub fn dispatch(&self, message: PublishedMessage) {
        if !self.bus.is_ready() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            warn!(
                "Message bus not connected; dropping upload for {} ({} dropped so far)",
                message.key,
                self.dropped_count()
            );
            return;
        }

        let bus = Arc::clone(&self.bus);
        tokio::spawn(async move {
            let key = message.key.clone();
            match bus.publish(message).await {
                Ok(()) => info!("Published upload {}", key),
                Err(e) => warn!("Publish failed for {}: {}", key, e),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publish::MemoryBus;
    use std::time::Duration;

    #[tokio::test]
    async fn dispatch_reaches_a_ready_bus() {
        let bus = Arc::new(MemoryBus::new());
        let publisher = Publisher::new(bus.clone());

        publisher.dispatch(PublishedMessage::encode("/srv/a", b"payload"));

        for _ in 0..100 {
            if !bus.messages().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        let messages = bus.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].key, "/srv/a");
        assert_eq!(publisher.dropped_count(), 0);
    }

    #[tokio::test]
    async fn dispatch_to_an_unready_bus_is_counted_not_sent() {
        let bus = Arc::new(MemoryBus::disconnected());
        let publisher = Publisher::new(bus.clone());

        publisher.dispatch(PublishedMessage::encode("/srv/a", b"payload"));
        publisher.dispatch(PublishedMessage::encode("/srv/b", b"payload"));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(bus.messages().is_empty());
        assert_eq!(publisher.dropped_count(), 2);
    }

    #[tokio::test]
    async fn readiness_is_checked_per_dispatch() {
        let bus = Arc::new(MemoryBus::disconnected());
        let publisher = Publisher::new(bus.clone());

        publisher.dispatch(PublishedMessage::encode("/srv/early", b"x"));
        bus.set_ready(true);
        publisher.dispatch(PublishedMessage::encode("/srv/late", b"y"));

        for _ in 0..100 {
            if !bus.messages().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        let messages = bus.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].key, "/srv/late");
        assert_eq!(publisher.dropped_count(), 1);
    }
}
