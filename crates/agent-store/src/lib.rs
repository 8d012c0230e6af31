pub mod collection;
pub mod conversations;
pub mod error;
pub mod messages;

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

pub use crate::collection::{Collection, Record};
pub use crate::conversations::ConversationService;
pub use crate::error::{Result, StoreError};
pub use crate::messages::MessageService;

/// JSON-file backed storage for the conversation and message collections.
///
/// Each collection is one JSON array on disk, read and rewritten whole.
/// Mutations go through [`Store::write_guard`] so read-modify-write cycles in
/// this process never interleave.
pub struct Store {
    conversations_path: PathBuf,
    messages_path: PathBuf,
    writer: Mutex<()>,
}

impl Store {
    pub async fn open(dir: impl Into<PathBuf>, conversations_file: &str, messages_file: &str) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| StoreError::Io { path: dir.clone(), source })?;

        let store = Self {
            conversations_path: dir.join(conversations_file),
            messages_path: dir.join(messages_file),
            writer: Mutex::new(()),
        };

        info!("Data directory: {}", dir.display());
        Ok(store)
    }

    pub fn path(&self, collection: Collection) -> &Path {
        match collection {
            Collection::Conversations => &self.conversations_path,
            Collection::Messages => &self.messages_path,
        }
    }

    /// Read every record of `T`'s collection. A missing file is an empty collection.
    pub async fn load<T>(&self) -> Result<Vec<T>>
    where
        T: Record + DeserializeOwned,
    {
        collection::read_all(self.path(T::COLLECTION)).await
    }

    /// Replace `T`'s collection on disk with `records`.
    pub async fn save<T>(&self, records: &[T]) -> Result<()>
    where
        T: Record + Serialize,
    {
        collection::write_all(self.path(T::COLLECTION), records).await
    }

    /// Serialize mutations: hold the returned guard across load + save.
    pub async fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::Store;

    pub async fn temp_store() -> (TempDir, Arc<Store>) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("data"), "conversations.json", "messages.json")
            .await
            .unwrap();
        (dir, Arc::new(store))
    }
}
