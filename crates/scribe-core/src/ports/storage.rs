//! File storage port for uploaded images.

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("Storage I/O failed: {0}")]
    Io(String),
}

/// Blob storage addressed by folder and file name.
#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn put(&self, folder: &str, name: &str, bytes: Vec<u8>) -> Result<(), StorageError>;

    /// `None` when the file does not exist.
    async fn get(&self, folder: &str, name: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Deleting a missing file is not an error.
    async fn delete(&self, folder: &str, name: &str) -> Result<(), StorageError>;
}

impl From<StorageError> for crate::error::DomainError {
    fn from(err: StorageError) -> Self {
        crate::error::DomainError::Storage(err.to_string())
    }
}
