pub mod chat;
pub mod conversations;
pub mod error;
pub mod state;

use axum::{
    Router,
    routing::{get, patch, post},
};

pub use crate::error::ApiError;
pub use crate::state::AppState;

/// All HTTP routes of the service, bound to `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/conversations",
            post(conversations::create_conversation).get(conversations::list_conversations),
        )
        .route(
            "/conversations/{conversation_id}",
            patch(conversations::rename_conversation).delete(conversations::delete_conversation),
        )
        .route(
            "/conversations/{conversation_id}/messages",
            get(conversations::get_messages),
        )
        .route("/chat/{conversation_id}", get(chat::get_shared_chat))
        .route("/agent", post(chat::run_agent))
        .with_state(state)
}
