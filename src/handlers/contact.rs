use crate::contact::{submit, ContactForm, ContactSubmission};
use crate::error::AppError;
use crate::handlers::AppState;
use axum::{extract::State, http::StatusCode, Json};

pub async fn create(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<(StatusCode, Json<ContactSubmission>), AppError> {
    let stored = submit(&state.supabase, &state.feed, &form).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}
