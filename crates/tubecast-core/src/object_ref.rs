//! Composite object-store references.
//!
//! A stored video is referenced as `bucket,key` in the `video_url` column.
//! The encoding exists only at the persistence boundary; everything else
//! works with the structured [`ObjectRef`].

use std::fmt;

const DELIMITER: char = ',';

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ObjectRefError {
    #[error("reference {0:?} does not contain the '{DELIMITER}' delimiter")]
    MissingDelimiter(String),

    #[error("reference {0:?} has an empty bucket or key")]
    EmptyComponent(String),
}

/// A `(bucket, key)` pair identifying an object in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl ObjectRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        ObjectRef {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Encode as the persisted `bucket,key` form.
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.bucket, DELIMITER, self.key)
    }

    /// Decode a persisted reference. Fails cleanly when the delimiter is
    /// absent or either component is empty.
    pub fn parse(encoded: &str) -> Result<Self, ObjectRefError> {
        let (bucket, key) = encoded
            .split_once(DELIMITER)
            .ok_or_else(|| ObjectRefError::MissingDelimiter(encoded.to_string()))?;
        if bucket.is_empty() || key.is_empty() {
            return Err(ObjectRefError::EmptyComponent(encoded.to_string()));
        }
        Ok(ObjectRef::new(bucket, key))
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.bucket, DELIMITER, self.key)
    }
}
