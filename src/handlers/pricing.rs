use crate::auth::AdminInfo;
use crate::error::AppError;
use crate::handlers::AppState;
use crate::pricing::{PriceBreakdown, PricingPackage, PricingSnapshot, QuoteRequest};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{json, Value};
use tracing::info;

/// All active lookup tables, for rendering the calculator form
pub async fn options(State(state): State<AppState>) -> Result<Json<PricingSnapshot>, AppError> {
    let snapshot = state.pricing.snapshot()?;
    Ok(Json(snapshot.as_ref().clone()))
}

pub async fn quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<PriceBreakdown>, AppError> {
    let breakdown = state.pricing.quote(&request)?;
    Ok(Json(breakdown))
}

pub async fn package(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PricingPackage>, AppError> {
    Ok(Json(state.pricing.package(&id)?))
}

pub async fn reload(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminInfo>,
) -> Result<Json<Value>, AppError> {
    info!(admin = %admin.key_name, "Pricing reload requested");
    let snapshot = state.pricing.load().await?;

    Ok(Json(json!({
        "status": "reloaded",
        "counts": {
            "project_types": snapshot.project_types.len(),
            "feature_prices": snapshot.feature_prices.len(),
            "page_prices": snapshot.page_prices.len(),
            "timeline_prices": snapshot.timeline_prices.len(),
            "complexity_prices": snapshot.complexity_prices.len(),
            "pricing_packages": snapshot.packages.len(),
        }
    })))
}
