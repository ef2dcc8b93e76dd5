use crate::dashboard::fetcher::{DashboardFetcher, WatchedTable};
use crate::dashboard::models::DashboardSnapshot;
use crate::feed::{ChangeEvent, ChangeFeed, Subscription};
use futures::stream::{self, BoxStream, SelectAll};
use futures::{FutureExt, StreamExt};
use std::collections::{HashMap, HashSet};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Live dashboard: one background task owning the four table subscriptions
///
/// Every change event triggers a fresh read of the affected table. The latest
/// snapshot is published on a watch channel. Dropping the handle stops the
/// task and releases the subscriptions.
pub struct DashboardHandle {
    rx: watch::Receiver<DashboardSnapshot>,
    task: JoinHandle<()>,
}

impl DashboardHandle {
    /// Subscribe to all watched tables, then start the initial fetch
    ///
    /// Subscriptions exist when this returns, so no event published afterwards
    /// is missed.
    pub fn spawn(fetcher: DashboardFetcher, feed: &dyn ChangeFeed) -> Self {
        let events = subscribe_all(feed);
        let (tx, rx) = watch::channel(DashboardSnapshot::loading());

        let task = tokio::spawn(run(fetcher, events, tx));

        Self { rx, task }
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.rx.clone()
    }

    pub fn current(&self) -> DashboardSnapshot {
        self.rx.borrow().clone()
    }

    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for DashboardHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn subscribe_all(feed: &dyn ChangeFeed) -> SelectAll<BoxStream<'static, ChangeEvent>> {
    stream::select_all(WatchedTable::ALL.into_iter().map(|table| {
        subscription_stream(feed.subscribe(table.name()))
    }))
}

fn subscription_stream(subscription: Subscription) -> BoxStream<'static, ChangeEvent> {
    stream::unfold(subscription, |mut sub| async move {
        sub.recv().await.map(|event| (event, sub))
    })
    .boxed()
}

async fn run(
    fetcher: DashboardFetcher,
    mut events: SelectAll<BoxStream<'static, ChangeEvent>>,
    tx: watch::Sender<DashboardSnapshot>,
) {
    let mut baseline = match fetcher.fetch_all().await {
        Ok(snapshot) => {
            info!(stats = ?snapshot.stats, "Dashboard stats loaded");
            tx.send_replace(snapshot.clone());
            true
        }
        Err(e) => {
            warn!(error = %e, "Initial dashboard fetch failed");
            tx.send_modify(|s| {
                s.loading = false;
                s.error = Some(e.to_string());
            });
            false
        }
    };

    // Tables whose last recompute failed; their aggregates are stale
    let mut failures: HashMap<WatchedTable, String> = HashMap::new();

    while let Some(event) = events.next().await {
        // Coalesce whatever else is already queued
        let mut pending = HashSet::new();
        pending.extend(WatchedTable::from_name(&event.table));
        while let Some(Some(event)) = events.next().now_or_never() {
            pending.extend(WatchedTable::from_name(&event.table));
        }

        debug!(tables = ?pending, "Change events received");

        if !baseline {
            // Nothing good to patch yet; rebuild everything
            match fetcher.fetch_all().await {
                Ok(snapshot) => {
                    tx.send_replace(snapshot);
                    baseline = true;
                }
                Err(e) => tx.send_modify(|s| s.error = Some(e.to_string())),
            }
            continue;
        }

        let mut snapshot = tx.borrow().clone();
        for table in pending {
            match fetcher.refresh(table, &mut snapshot).await {
                Ok(()) => {
                    failures.remove(&table);
                }
                Err(e) => {
                    warn!(table = table.name(), error = %e, "Dashboard recompute failed");
                    failures.insert(table, e.to_string());
                }
            }
        }
        snapshot.error = failure_message(&failures);
        tx.send_replace(snapshot);
    }

    debug!("Change feed closed, dashboard task exiting");
}

fn failure_message(failures: &HashMap<WatchedTable, String>) -> Option<String> {
    let messages: Vec<&str> = WatchedTable::ALL
        .iter()
        .filter_map(|table| failures.get(table).map(String::as_str))
        .collect();

    if messages.is_empty() {
        None
    } else {
        Some(messages.join("; "))
    }
}
