//! Storage abstraction trait

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Presigning failed: {0}")]
    PresignFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Object storage abstraction.
///
/// Backends must be safe to share across request tasks; every operation is a
/// single attempt with no retry - failures surface to the caller immediately.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload `data` under `key` with the declared content type.
    async fn put(&self, key: &str, content_type: &str, data: Bytes) -> StorageResult<()>;

    /// Upload the file at `path` under `key`, streaming in chunks so large
    /// files are never held in memory whole. Returns the byte count uploaded.
    async fn put_file(
        &self,
        key: &str,
        content_type: &str,
        path: &std::path::Path,
    ) -> StorageResult<u64>;

    /// Produce a time-limited URL granting read access to `key`.
    async fn presign_get(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Delete the object at `key`. Used for cleanup when a later pipeline
    /// step fails after a successful put.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// The bucket this backend writes to.
    fn bucket(&self) -> &str;
}
