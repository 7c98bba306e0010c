//! Video repository
//!
//! All access to the `videos` table goes through this repository. URL columns
//! are only ever written after the corresponding asset is fully stored, so a
//! failed upload never leaves a dangling reference behind.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool};
use tubecast_core::models::{CreateVideoRequest, Video};
use tubecast_core::AppError;
use uuid::Uuid;

#[derive(Clone)]
pub struct VideoRepository {
    pool: SqlitePool,
}

impl VideoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Cheap connectivity check for health probes.
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, req), fields(db.table = "videos", db.operation = "insert"))]
    pub async fn create(
        &self,
        user_id: Uuid,
        req: &CreateVideoRequest,
    ) -> Result<Video, AppError> {
        let now = Utc::now();
        let video = sqlx::query_as::<Sqlite, Video>(
            r#"
            INSERT INTO videos (id, created_at, updated_at, title, description, user_id, video_url, thumbnail_url)
            VALUES (?, ?, ?, ?, ?, ?, NULL, NULL)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(now)
        .bind(now)
        .bind(&req.title)
        .bind(&req.description)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(video)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    pub async fn get(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<Sqlite, Video>("SELECT * FROM videos WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(video)
    }

    /// Fetch a video or fail with `NotFound`.
    pub async fn get_required(&self, id: Uuid) -> Result<Video, AppError> {
        self.get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        let videos = sqlx::query_as::<Sqlite, Video>(
            "SELECT * FROM videos WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(videos)
    }

    #[tracing::instrument(skip(self, url), fields(db.table = "videos", db.operation = "update"))]
    pub async fn set_thumbnail_url(&self, id: Uuid, url: &str) -> Result<Video, AppError> {
        let video = sqlx::query_as::<Sqlite, Video>(
            "UPDATE videos SET thumbnail_url = ?, updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(url)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;
        Ok(video)
    }

    #[tracing::instrument(skip(self, url), fields(db.table = "videos", db.operation = "update"))]
    pub async fn set_video_url(&self, id: Uuid, url: &str) -> Result<Video, AppError> {
        let video = sqlx::query_as::<Sqlite, Video>(
            "UPDATE videos SET video_url = ?, updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(url)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;
        Ok(video)
    }
}
