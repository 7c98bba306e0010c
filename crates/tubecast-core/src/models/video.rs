//! Video domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A video record. `video_url` holds either nothing or the encoded
/// `bucket,key` reference to the stored object; responses substitute a
/// presigned URL, the row keeps the reference.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Video {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub user_id: Uuid,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl Video {
    /// Whether `user_id` owns this video. Both upload pipelines check this
    /// before performing any side effect.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Payload for creating a draft video.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVideoRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}
