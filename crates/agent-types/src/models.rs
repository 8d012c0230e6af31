use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timestamp;

/// Title given to a conversation created without one.
pub const DEFAULT_CONVERSATION_NAME: &str = "New Chat";

/// Number of characters of the first message kept when deriving a title.
pub const TITLE_MAX_CHARS: usize = 50;

const TITLE_ELLIPSIS: &str = "...";

/// Generate a fresh record identifier.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Derive a conversation title from the first user message: the first 50
/// characters followed by `...` when the message is longer, otherwise the
/// message itself.
pub fn derive_title(message: &str) -> String {
    match message.char_indices().nth(TITLE_MAX_CHARS) {
        Some((cut, _)) => format!("{}{}", &message[..cut], TITLE_ELLIPSIS),
        None => message.to_string(),
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Agent,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Agent => "agent",
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A conversation as persisted in the conversations file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(name: impl Into<String>) -> Self {
        let now = timestamp::now();
        Self {
            id: new_id(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at`. Never moves it behind `created_at`.
    pub fn touch(&mut self) {
        self.updated_at = timestamp::now().max(self.created_at);
    }

    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A single turn of a conversation as persisted in the messages file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: String,
    pub conversation_id: String,
    pub content: String,
    pub sender: Sender,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(conversation_id: impl Into<String>, content: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: new_id(),
            conversation_id: conversation_id.into(),
            content: content.into(),
            sender,
            timestamp: timestamp::now(),
        }
    }

    pub fn view(&self) -> MessageView {
        MessageView {
            id: self.id.clone(),
            content: self.content.clone(),
            sender: self.sender,
            timestamp: self.timestamp,
        }
    }
}

/// Public projection of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    pub name: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Public projection of a message; the owning conversation is implied by the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageView {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}
