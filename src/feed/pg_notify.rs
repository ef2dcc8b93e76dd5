use crate::feed::{ChangeEvent, ChangeFeed, FeedError, LocalFeed, Subscription};
use sqlx::postgres::PgListener;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Forwards Postgres `NOTIFY` payloads on one channel into a [`LocalFeed`]
///
/// Payloads are JSON `{"table": "...", "type": "INSERT|UPDATE|DELETE"}`, as
/// emitted by the triggers in `migrations/`. The forwarding task stops when
/// this value is dropped.
pub struct PgNotifyFeed {
    hub: LocalFeed,
    task: JoinHandle<()>,
}

impl PgNotifyFeed {
    pub async fn connect(database_url: &str, channel: &str, hub: LocalFeed) -> Result<Self, FeedError> {
        let mut listener = PgListener::connect(database_url).await?;
        listener.listen(channel).await?;
        info!(channel = %channel, "Listening for table change notifications");

        let forward_to = hub.clone();
        let channel = channel.to_string();
        let task = tokio::spawn(async move {
            loop {
                match listener.recv().await {
                    Ok(notification) => match parse_payload(notification.payload()) {
                        Ok(event) => {
                            forward_to.publish(event);
                        }
                        Err(e) => warn!(channel = %channel, error = %e, "Skipping change notification"),
                    },
                    Err(e) => {
                        // PgListener reconnects on the next recv
                        error!(channel = %channel, error = %e, "Change listener error");
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        });

        Ok(Self { hub, task })
    }
}

impl ChangeFeed for PgNotifyFeed {
    fn subscribe(&self, table: &str) -> Subscription {
        self.hub.subscribe(table)
    }
}

impl Drop for PgNotifyFeed {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub fn parse_payload(payload: &str) -> Result<ChangeEvent, FeedError> {
    serde_json::from_str(payload).map_err(|e| FeedError::InvalidPayload(format!("{}: {}", e, payload)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::ChangeKind;

    #[test]
    fn test_parse_trigger_payload() {
        let event = parse_payload(r#"{"table":"portfolio","type":"UPDATE"}"#).unwrap();
        assert_eq!(event, ChangeEvent::new("portfolio", ChangeKind::Update));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_payload("portfolio:UPDATE").unwrap_err();
        assert!(err.to_string().contains("invalid change payload"));
        assert!(parse_payload(r#"{"table":"portfolio"}"#).is_err());
    }
}
