use crate::dashboard::DashboardSnapshot;
use crate::handlers::AppState;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tracing::{debug, warn};

/// Latest dashboard snapshot
pub async fn stats(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    Json(state.dashboard.borrow().clone())
}

/// SSE stream of dashboard snapshots
///
/// Sends the current snapshot immediately as a `stats` event, then one per
/// change. A `heartbeat` event goes out every `dashboard.heartbeat_seconds`.
pub async fn stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.dashboard.clone();
    let period = Duration::from_secs(state.config.dashboard.heartbeat_seconds.max(1));

    let stream = async_stream::stream! {
        let current = rx.borrow_and_update().clone();
        if let Some(event) = stats_event(&current) {
            yield Ok(event);
        }

        let mut heartbeat = tokio::time::interval_at(tokio::time::Instant::now() + period, period);

        loop {
            tokio::select! {
                changed = rx.changed() => {
                    if changed.is_err() {
                        debug!("Dashboard task stopped, closing stream");
                        break;
                    }
                    let current = rx.borrow_and_update().clone();
                    if let Some(event) = stats_event(&current) {
                        yield Ok(event);
                    }
                }
                _ = heartbeat.tick() => {
                    yield Ok(Event::default().event("heartbeat").data("{}"));
                }
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn stats_event(snapshot: &DashboardSnapshot) -> Option<Event> {
    match Event::default().event("stats").json_data(snapshot) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!(error = %e, "Failed to encode dashboard snapshot");
            None
        }
    }
}
