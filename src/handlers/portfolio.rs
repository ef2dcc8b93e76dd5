use crate::catalog::{list_portfolio, PortfolioItem};
use crate::error::AppError;
use crate::handlers::AppState;
use axum::{extract::State, Json};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<PortfolioItem>>, AppError> {
    Ok(Json(list_portfolio(&state.supabase).await?))
}
