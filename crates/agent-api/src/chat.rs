use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use tracing::info;

use agent_types::api::{AgentResponse, ChatView, SendMessageRequest};
use agent_types::models::{Sender, derive_title};

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// GET /chat/{id} — a conversation together with its messages.
pub async fn get_shared_chat(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<impl IntoResponse> {
    let conversation = state
        .conversations
        .get(&conversation_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let messages = state.messages.list_for(&conversation_id).await?;

    Ok(Json(ChatView { conversation, messages }))
}

/// POST /agent — record the user's message, ask the model, record its reply.
///
/// Without a conversation id a new conversation is started and titled after
/// the message. Steps are not rolled back when a later one fails, so a model
/// error leaves the user's message stored.
pub async fn run_agent(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<SendMessageRequest>, ApiError>,
) -> Result<impl IntoResponse> {
    let conversation_id = match req.conversation_id.filter(|id| !id.is_empty()) {
        Some(id) => {
            state.conversations.touch(&id).await?;
            id
        }
        None => {
            let title = derive_title(&req.message);
            state.conversations.create(Some(&title)).await?
        }
    };

    state
        .messages
        .append(&conversation_id, &req.message, Sender::User)
        .await?;

    let response = state.agent.run(&req.message).await?;

    state
        .messages
        .append(&conversation_id, &response, Sender::Agent)
        .await?;

    info!("Agent replied in conversation {}", conversation_id);
    Ok(Json(AgentResponse { response, conversation_id }))
}
