use serde::{Deserialize, Serialize};

use crate::models::{ConversationSummary, MessageView};

// -- Conversations --

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateConversationResponse {
    pub conversation_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RenameConversationRequest {
    pub name: String,
}

/// Combined view served for a shared chat link.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatView {
    pub conversation: ConversationSummary,
    pub messages: Vec<MessageView>,
}

// -- Agent --

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AgentResponse {
    pub response: String,
    pub conversation_id: String,
}

// -- Generic bodies --

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

impl StatusMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
