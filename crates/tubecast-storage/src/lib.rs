//! Tubecast object storage.
//!
//! This crate provides the [`ObjectStorage`] trait and its S3 backend. Keys
//! are `{aspect-prefix}/{random}.mp4`; the bucket is fixed per deployment.
//! The in-memory backend exists for tests that must not touch a real store.

pub mod memory;
pub mod s3;
pub mod traits;

pub use memory::InMemoryStorage;
pub use s3::{S3Credentials, S3Storage};
pub use traits::{ObjectStorage, StorageError, StorageResult};
