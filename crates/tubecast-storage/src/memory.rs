//! In-memory storage backend for tests.

use crate::traits::{ObjectStorage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Stored object: content type plus bytes.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub content_type: String,
    pub data: Bytes,
}

/// Keeps objects in a map and presigns with a deterministic fake URL scheme.
/// When `fail_puts` is set every put is rejected, for store-failure paths.
#[derive(Clone)]
pub struct InMemoryStorage {
    bucket: String,
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
    fail_puts: bool,
}

impl InMemoryStorage {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Arc::new(RwLock::new(HashMap::new())),
            fail_puts: false,
        }
    }

    pub fn failing(bucket: impl Into<String>) -> Self {
        Self {
            fail_puts: true,
            ..Self::new(bucket)
        }
    }

    pub async fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    pub async fn keys(&self) -> Vec<String> {
        self.objects.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryStorage {
    async fn put(&self, key: &str, content_type: &str, data: Bytes) -> StorageResult<()> {
        if self.fail_puts {
            return Err(StorageError::UploadFailed(
                "simulated store rejection".to_string(),
            ));
        }
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                content_type: content_type.to_string(),
                data,
            },
        );
        Ok(())
    }

    async fn put_file(
        &self,
        key: &str,
        content_type: &str,
        path: &std::path::Path,
    ) -> StorageResult<u64> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        let size = data.len() as u64;
        self.put(key, content_type, data.into()).await?;
        Ok(size)
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        if !self.objects.read().await.contains_key(key) {
            return Err(StorageError::NotFound(key.to_string()));
        }
        Ok(format!(
            "memory://{}/{}?expires={}",
            self.bucket,
            key,
            expires_in.as_secs()
        ))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.objects
            .write()
            .await
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}
