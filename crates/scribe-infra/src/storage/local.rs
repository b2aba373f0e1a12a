use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use scribe_core::ports::{FileStorage, StorageError};

use super::check_names;

/// Stores files under `<root>/<folder>/<name>`.
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn put(&self, folder: &str, name: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        check_names(folder, name)?;
        let dir = self.root.join(folder);

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;
        tokio::fs::write(dir.join(name), bytes)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        tracing::debug!(folder, name, "Stored upload");
        Ok(())
    }

    async fn get(&self, folder: &str, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        check_names(folder, name)?;

        match tokio::fs::read(self.root.join(folder).join(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }

    async fn delete(&self, folder: &str, name: &str) -> Result<(), StorageError> {
        check_names(folder, name)?;

        match tokio::fs::remove_file(self.root.join(folder).join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("scribe-storage-{}", uuid::Uuid::new_v4().simple()))
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let root = scratch_dir();
        let storage = LocalFileStorage::new(&root);

        storage.put("posts", "a.png", vec![1, 2, 3]).await.unwrap();
        assert_eq!(
            storage.get("posts", "a.png").await.unwrap(),
            Some(vec![1, 2, 3])
        );

        storage.delete("posts", "a.png").await.unwrap();
        assert_eq!(storage.get("posts", "a.png").await.unwrap(), None);
        storage.delete("posts", "a.png").await.unwrap();

        let _ = tokio::fs::remove_dir_all(root).await;
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let storage = LocalFileStorage::new(scratch_dir());

        assert!(matches!(
            storage.get("posts", "../secret").await,
            Err(StorageError::InvalidName(_))
        ));
        assert!(matches!(
            storage.put("..", "x.png", vec![]).await,
            Err(StorageError::InvalidName(_))
        ));
    }
}
