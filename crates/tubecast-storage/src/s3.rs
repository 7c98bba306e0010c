//! S3 storage backend built on `object_store`.

use crate::traits::{ObjectStorage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::{ObjectStoreExt, PutPayload, Result as ObjectResult, WriteMultipart};
use std::time::Duration;
use tokio::io::AsyncReadExt;

/// Credentials passed explicitly; anything not set falls back to the ambient
/// AWS environment (profile, instance role, ...).
#[derive(Debug, Default, Clone)]
pub struct S3Credentials {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3Storage instance.
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint for S3-compatible providers
    ///   (e.g. "http://localhost:9000" for MinIO)
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        credentials: S3Credentials,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(access_key_id) = credentials.access_key_id {
            builder = builder.with_access_key_id(access_key_id);
        }
        if let Some(secret_access_key) = credentials.secret_access_key {
            builder = builder.with_secret_access_key(secret_access_key);
        }
        if let Some(endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage { store, bucket })
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put(&self, key: &str, content_type: &str, data: Bytes) -> StorageResult<()> {
        let size = data.len() as u64;
        let location = Path::from(key);
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self.store.put(&location, PutPayload::from(data)).await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            content_type = %content_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );
        Ok(())
    }

    async fn put_file(
        &self,
        key: &str,
        content_type: &str,
        path: &std::path::Path,
    ) -> StorageResult<u64> {
        let location = Path::from(key);
        let start = std::time::Instant::now();

        let mut file = tokio::fs::File::open(path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let upload = self
            .store
            .put_multipart(&location)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        let mut write = WriteMultipart::new(upload);

        let mut size: u64 = 0;
        let mut buf = vec![0u8; 64 * 1024];
        loop {
            let read = match file.read(&mut buf).await {
                Ok(read) => read,
                Err(e) => {
                    let _ = write.abort().await;
                    return Err(StorageError::UploadFailed(format!(
                        "Failed to read {}: {}",
                        path.display(),
                        e
                    )));
                }
            };
            if read == 0 {
                break;
            }
            size += read as u64;
            // Bound the number of in-flight parts before queueing more data.
            if let Err(e) = write.wait_for_capacity(8).await {
                let _ = write.abort().await;
                return Err(StorageError::UploadFailed(e.to_string()));
            }
            write.write(&buf[..read]);
        }

        if let Err(e) = write.finish().await {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 multipart upload failed"
            );
            return Err(StorageError::UploadFailed(e.to_string()));
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            content_type = %content_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 multipart upload successful"
        );
        Ok(size)
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        let location = Path::from(key);
        let url_result: ObjectResult<_> =
            self.store.signed_url(Method::GET, &location, expires_in).await;

        let url = url_result
            .map_err(|e| StorageError::PresignFailed(e.to_string()))?
            .to_string();

        Ok(url)
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let location = Path::from(key);
        let result: ObjectResult<_> = self.store.delete(&location).await;
        result.map_err(|e| StorageError::DeleteFailed(e.to_string()))?;
        Ok(())
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}
