use std::sync::Arc;

use tracing::{debug, info};

use agent_types::models::{Conversation, ConversationSummary, DEFAULT_CONVERSATION_NAME, Message};

use crate::Store;
use crate::error::{Result, StoreError};

/// Create, list, rename and delete conversations.
#[derive(Clone)]
pub struct ConversationService {
    store: Arc<Store>,
}

impl ConversationService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Create a conversation and return its id. `None` uses the default title.
    pub async fn create(&self, name: Option<&str>) -> Result<String> {
        let conversation = Conversation::new(name.unwrap_or(DEFAULT_CONVERSATION_NAME));
        let id = conversation.id.clone();

        let _guard = self.store.write_guard().await;
        let mut conversations: Vec<Conversation> = self.store.load().await?;
        conversations.push(conversation);
        self.store.save(&conversations).await?;

        info!("Created conversation {}", id);
        Ok(id)
    }

    /// All conversations, most recently updated first.
    pub async fn list(&self) -> Result<Vec<ConversationSummary>> {
        let mut conversations: Vec<Conversation> = self.store.load().await?;
        conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(conversations.iter().map(Conversation::summary).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<ConversationSummary>> {
        let conversations: Vec<Conversation> = self.store.load().await?;
        Ok(conversations.iter().find(|c| c.id == id).map(Conversation::summary))
    }

    /// Rename a conversation and refresh its `updated_at`.
    pub async fn rename(&self, id: &str, name: &str) -> Result<()> {
        self.update(id, |conversation| {
            conversation.name = name.to_string();
            conversation.touch();
        })
        .await?;

        info!("Renamed conversation {}", id);
        Ok(())
    }

    /// Refresh a conversation's `updated_at`.
    pub async fn touch(&self, id: &str) -> Result<()> {
        self.update(id, Conversation::touch).await?;
        debug!("Touched conversation {}", id);
        Ok(())
    }

    /// Delete a conversation and every message that references it.
    ///
    /// Idempotent: returns whether the conversation existed, and still sweeps
    /// orphaned messages carrying the id when it did not. A collection file is
    /// rewritten only when something was removed from it.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.store.write_guard().await;

        // Both collections are read before either is written, so an unreadable
        // file aborts the delete with nothing changed.
        let mut conversations: Vec<Conversation> = self.store.load().await?;
        let mut messages: Vec<Message> = self.store.load().await?;

        let conversations_before = conversations.len();
        conversations.retain(|c| c.id != id);
        let existed = conversations.len() != conversations_before;

        let messages_before = messages.len();
        messages.retain(|m| m.conversation_id != id);
        let removed_messages = messages_before - messages.len();

        if removed_messages > 0 {
            self.store.save(&messages).await?;
        }
        if existed {
            self.store.save(&conversations).await?;
        }

        info!(
            "Deleted conversation {} (existed: {}, messages removed: {})",
            id, existed, removed_messages
        );
        Ok(existed)
    }

    async fn update<F>(&self, id: &str, apply: F) -> Result<()>
    where
        F: FnOnce(&mut Conversation),
    {
        let _guard = self.store.write_guard().await;

        let mut conversations: Vec<Conversation> = self.store.load().await?;
        let conversation = conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        apply(conversation);

        self.store.save(&conversations).await
    }
}
