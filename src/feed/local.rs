use crate::feed::{ChangeEvent, ChangeFeed, Subscription};
use tokio::sync::broadcast;
use tracing::debug;

/// In-process broadcast hub for change events
#[derive(Clone)]
pub struct LocalFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl LocalFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Deliver an event to current subscribers; returns how many received it
    pub fn publish(&self, event: ChangeEvent) -> usize {
        debug!(table = %event.table, kind = ?event.kind, "Publishing change event");
        // No subscribers is not an error
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for LocalFeed {
    fn default() -> Self {
        Self::new(256)
    }
}

impl ChangeFeed for LocalFeed {
    fn subscribe(&self, table: &str) -> Subscription {
        Subscription::new(table, self.tx.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::ChangeKind;
    use std::time::Duration;

    #[tokio::test]
    async fn test_subscription_filters_by_table() {
        let feed = LocalFeed::default();
        let mut clients = feed.subscribe("clients");

        feed.publish(ChangeEvent::new("projects", ChangeKind::Insert));
        feed.publish(ChangeEvent::new("clients", ChangeKind::Delete));

        let event = clients.recv().await.unwrap();
        assert_eq!(event, ChangeEvent::new("clients", ChangeKind::Delete));
    }

    #[tokio::test]
    async fn test_drop_unsubscribes() {
        let feed = LocalFeed::default();
        let first = feed.subscribe("portfolio");
        let second = feed.subscribe("projects");
        assert_eq!(feed.subscriber_count(), 2);

        drop(first);
        drop(second);
        assert_eq!(feed.subscriber_count(), 0);
        assert_eq!(feed.publish(ChangeEvent::new("portfolio", ChangeKind::Update)), 0);
    }

    #[tokio::test]
    async fn test_lagged_subscriber_still_triggers() {
        let feed = LocalFeed::new(2);
        let mut sub = feed.subscribe("projects");

        for _ in 0..5 {
            feed.publish(ChangeEvent::new("projects", ChangeKind::Insert));
        }

        let event = tokio::time::timeout(Duration::from_secs(1), sub.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.table, "projects");
    }

    #[tokio::test]
    async fn test_closed_feed_ends_subscription() {
        let feed = LocalFeed::default();
        let mut sub = feed.subscribe("clients");
        drop(feed);
        assert!(sub.recv().await.is_none());
    }
}
