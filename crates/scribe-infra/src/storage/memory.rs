use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use scribe_core::ports::{FileStorage, StorageError};

use super::check_names;

/// In-memory file storage for tests.
#[derive(Default)]
pub struct InMemoryFileStorage {
    files: RwLock<HashMap<(String, String), Vec<u8>>>,
}

impl InMemoryFileStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }
}

#[async_trait]
impl FileStorage for InMemoryFileStorage {
    async fn put(&self, folder: &str, name: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        check_names(folder, name)?;
        self.files
            .write()
            .await
            .insert((folder.to_string(), name.to_string()), bytes);
        Ok(())
    }

    async fn get(&self, folder: &str, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        check_names(folder, name)?;
        Ok(self
            .files
            .read()
            .await
            .get(&(folder.to_string(), name.to_string()))
            .cloned())
    }

    async fn delete(&self, folder: &str, name: &str) -> Result<(), StorageError> {
        check_names(folder, name)?;
        self.files
            .write()
            .await
            .remove(&(folder.to_string(), name.to_string()));
        Ok(())
    }
}
