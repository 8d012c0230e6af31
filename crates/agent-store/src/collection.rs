use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;
use tracing::{debug, warn};

use agent_types::models::{Conversation, Message};

use crate::error::{Result, StoreError};

/// The two persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Conversations,
    Messages,
}

/// A record type stored in one of the collections.
pub trait Record {
    const COLLECTION: Collection;
}

impl Record for Conversation {
    const COLLECTION: Collection = Collection::Conversations;
}

impl Record for Message {
    const COLLECTION: Collection = Collection::Messages;
}

pub(crate) async fn read_all<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => return Err(StoreError::Io { path: path.to_path_buf(), source }),
    };

    let records: Vec<T> = serde_json::from_slice(&bytes)
        .map_err(|source| StoreError::Parse { path: path.to_path_buf(), source })?;

    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Write the whole collection to a sibling temp file, then rename it over the
/// target so readers see either the old document or the new one.
pub(crate) async fn write_all<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let body = serde_json::to_vec_pretty(records)?;
    let tmp = temp_path(path);

    fs::write(&tmp, &body)
        .await
        .map_err(|source| StoreError::Io { path: tmp.clone(), source })?;
    if let Err(source) = fs::rename(&tmp, path).await {
        if let Err(e) = fs::remove_file(&tmp).await {
            warn!("Failed to remove {}: {}", tmp.display(), e);
        }
        return Err(StoreError::Io { path: path.to_path_buf(), source });
    }

    debug!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_store;
    use agent_types::models::Sender;

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let (_dir, store) = temp_store().await;
        let conversations: Vec<Conversation> = store.load().await.unwrap();
        let messages: Vec<Message> = store.load().await.unwrap();
        assert!(conversations.is_empty());
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let (_dir, store) = temp_store().await;
        let conv = Conversation::new("Trip planning");
        let records = vec![
            Message::new(&conv.id, "where to?", Sender::User),
            Message::new(&conv.id, "Lisbon.", Sender::Agent),
        ];

        store.save(std::slice::from_ref(&conv)).await.unwrap();
        store.save(&records).await.unwrap();

        let loaded_conversations: Vec<Conversation> = store.load().await.unwrap();
        let loaded_messages: Vec<Message> = store.load().await.unwrap();
        assert_eq!(loaded_conversations, vec![conv]);
        assert_eq!(loaded_messages, records);
    }

    #[tokio::test]
    async fn test_save_replaces_whole_document() {
        let (_dir, store) = temp_store().await;
        store.save(&[Conversation::new("a"), Conversation::new("b")]).await.unwrap();
        let only = Conversation::new("c");
        store.save(std::slice::from_ref(&only)).await.unwrap();

        let loaded: Vec<Conversation> = store.load().await.unwrap();
        assert_eq!(loaded, vec![only]);
    }

    #[tokio::test]
    async fn test_saved_file_is_pretty_json_array_without_temp_leftover() {
        let (_dir, store) = temp_store().await;
        store.save(&[Conversation::new("x")]).await.unwrap();

        let path = store.path(Collection::Conversations);
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("[\n  {"));
        assert!(text.contains("\"_id\""));
        assert!(!temp_path(path).exists());
    }

    #[tokio::test]
    async fn test_malformed_file_is_parse_error() {
        let (_dir, store) = temp_store().await;
        std::fs::write(store.path(Collection::Messages), "{not json").unwrap();

        let err = store.load::<Message>().await.unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_failed_rename_leaves_no_temp_file() {
        let (_dir, store) = temp_store().await;
        let path = store.path(Collection::Conversations);
        // A non-empty directory in the target's place makes the rename fail.
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        let err = store.save(&[Conversation::new("x")]).await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(!temp_path(path).exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let tmp = temp_path(Path::new("/data/messages.json"));
        assert_eq!(tmp, PathBuf::from("/data/messages.json.tmp"));
    }
}
