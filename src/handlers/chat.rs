use crate::chat::{list_messages, send_message, ChatMessage, NewMessage};
use crate::error::AppError;
use crate::handlers::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

fn parse_project_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("invalid project id '{}'", raw)))
}

pub async fn list(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let project_id = parse_project_id(&project_id)?;
    Ok(Json(list_messages(&state.supabase, project_id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(message): Json<NewMessage>,
) -> Result<(StatusCode, Json<ChatMessage>), AppError> {
    let project_id = parse_project_id(&project_id)?;
    let stored = send_message(&state.supabase, project_id, &message).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}
