use crate::handlers::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

/// Health check endpoint
/// Returns 200 OK if the service is running
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "service": "miraidev",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

/// Readiness check endpoint
/// Ready once the pricing snapshot has loaded
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let pricing_loaded = state.pricing.is_loaded();
    let dashboard_loading = state.dashboard.borrow().loading;

    let status = if pricing_loaded {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(json!({
        "status": if pricing_loaded { "ready" } else { "loading" },
        "service": "miraidev",
        "pricing_loaded": pricing_loaded,
        "dashboard_loading": dashboard_loading,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_returns_ok() {
        let response = health_check().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
