use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;

use agent_types::api::{CreateConversationResponse, RenameConversationRequest, StatusMessage};

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// POST /conversations — start an empty conversation with the default title.
pub async fn create_conversation(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let conversation_id = state.conversations.create(None).await?;
    Ok(Json(CreateConversationResponse { conversation_id }))
}

/// GET /conversations — newest activity first.
pub async fn list_conversations(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.conversations.list().await?))
}

/// GET /conversations/{id}/messages
pub async fn get_messages(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.messages.list_for(&conversation_id).await?))
}

/// PATCH /conversations/{id}
pub async fn rename_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    WithRejection(Json(req), _): WithRejection<Json<RenameConversationRequest>, ApiError>,
) -> Result<impl IntoResponse> {
    state.conversations.rename(&conversation_id, &req.name).await?;
    Ok(Json(StatusMessage::new("Conversation updated successfully")))
}

/// DELETE /conversations/{id} — removes its messages too; succeeds for unknown ids.
pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<impl IntoResponse> {
    state.conversations.delete(&conversation_id).await?;
    Ok(Json(StatusMessage::new("Conversation deleted successfully")))
}
