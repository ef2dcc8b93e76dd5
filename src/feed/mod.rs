//! Table change notifications
//!
//! Events are triggers only: consumers re-query the table instead of applying
//! the change. Two sources feed the same in-process hub:
//! - [`LocalFeed::publish`] after this service's own writes
//! - [`PgNotifyFeed`], forwarding Postgres `NOTIFY` payloads

pub mod local;
pub mod pg_notify;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::warn;

pub use local::LocalFeed;
pub use pg_notify::PgNotifyFeed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: String,
    #[serde(rename = "type")]
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(table: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            table: table.into(),
            kind,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("invalid change payload: {0}")]
    InvalidPayload(String),
    #[error("database listener error: {0}")]
    Listener(#[from] sqlx::Error),
}

/// Source of per-table change subscriptions
pub trait ChangeFeed: Send + Sync + 'static {
    /// Subscribe to every insert/update/delete on `table`
    fn subscribe(&self, table: &str) -> Subscription;
}

/// Receives one table's events; dropping it unsubscribes
pub struct Subscription {
    table: String,
    rx: broadcast::Receiver<ChangeEvent>,
}

impl Subscription {
    pub(crate) fn new(table: &str, rx: broadcast::Receiver<ChangeEvent>) -> Self {
        Self {
            table: table.to_string(),
            rx,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Next event for this table, `None` once the feed is closed
    ///
    /// If the subscriber fell behind, a synthetic update is returned so the
    /// consumer still recomputes.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if event.table == self.table => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(table = %self.table, skipped, "Change subscription lagged");
                    return Some(ChangeEvent::new(self.table.clone(), ChangeKind::Update));
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
