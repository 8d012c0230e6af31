use std::sync::Arc;

use tracing::debug;

use agent_types::models::{Message, MessageView, Sender};

use crate::Store;
use crate::error::Result;

/// Append-only access to the message collection.
#[derive(Clone)]
pub struct MessageService {
    store: Arc<Store>,
}

impl MessageService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Store a new message and return its id. The conversation id is not
    /// checked against the conversation collection.
    pub async fn append(&self, conversation_id: &str, content: &str, sender: Sender) -> Result<String> {
        let message = Message::new(conversation_id, content, sender);
        let id = message.id.clone();

        let _guard = self.store.write_guard().await;
        let mut messages: Vec<Message> = self.store.load().await?;
        messages.push(message);
        self.store.save(&messages).await?;

        debug!("Appended {} message {} to conversation {}", sender, id, conversation_id);
        Ok(id)
    }

    /// Messages of one conversation, oldest first.
    pub async fn list_for(&self, conversation_id: &str) -> Result<Vec<MessageView>> {
        let messages: Vec<Message> = self.store.load().await?;
        let mut thread: Vec<&Message> = messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .collect();
        thread.sort_by_key(|m| m.timestamp);
        Ok(thread.into_iter().map(Message::view).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_store;
    use chrono::{Duration, TimeZone, Utc};

    fn message_at(conversation_id: &str, content: &str, seconds: i64) -> Message {
        let mut msg = Message::new(conversation_id, content, Sender::User);
        msg.timestamp = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + Duration::seconds(seconds);
        msg
    }

    #[tokio::test]
    async fn test_append_and_list() {
        let (_dir, store) = temp_store().await;
        let service = MessageService::new(store);

        let first = service.append("c1", "hi", Sender::User).await.unwrap();
        let second = service.append("c1", "hello!", Sender::Agent).await.unwrap();

        let thread = service.list_for("c1").await.unwrap();
        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0].id, first);
        assert_eq!(thread[0].content, "hi");
        assert_eq!(thread[0].sender, Sender::User);
        assert_eq!(thread[1].id, second);
        assert_eq!(thread[1].sender, Sender::Agent);
    }

    #[tokio::test]
    async fn test_list_for_sorts_by_timestamp_ascending() {
        let (_dir, store) = temp_store().await;
        store
            .save(&[
                message_at("c1", "third", 30),
                message_at("c2", "other", 0),
                message_at("c1", "first", 10),
                message_at("c1", "second", 20),
            ])
            .await
            .unwrap();

        let service = MessageService::new(store);
        let contents: Vec<String> = service
            .list_for("c1")
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_list_for_unknown_conversation_is_empty() {
        let (_dir, store) = temp_store().await;
        let service = MessageService::new(store);
        service.append("c1", "hi", Sender::User).await.unwrap();
        assert!(service.list_for("nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_keeps_arbitrary_content() {
        let (_dir, store) = temp_store().await;
        let service = MessageService::new(store);
        let content = format!("line one\nline \"two\"\t{}", "z".repeat(10_000));

        service.append("c1", &content, Sender::User).await.unwrap();
        assert_eq!(service.list_for("c1").await.unwrap()[0].content, content);
    }
}
