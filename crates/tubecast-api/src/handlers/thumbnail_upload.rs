//! Thumbnail upload handler.
//!
//! Thumbnails are small enough to live on local disk: the image lands under
//! the assets directory with a random, non-enumerable name and is served back
//! through the static `/assets` route. The database row is only updated after
//! the file is fully on disk.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use tubecast_core::models::Video;
use tubecast_core::AppError;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::keys::random_asset_name;
use crate::utils::multipart::read_file_field;

#[tracing::instrument(skip(state, multipart), fields(video_id = %video_id, user_id = %user_id))]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<Uuid>,
    AuthUser(user_id): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<Video>, HttpAppError> {
    let start = Instant::now();

    // Ownership is checked before the body is touched so an unauthorized
    // client never triggers a disk write.
    let video = state.videos.get_required(video_id).await?;
    if !video.is_owned_by(user_id) {
        return Err(AppError::Unauthorized(
            "You don't have permission to upload a thumbnail for this video".to_string(),
        )
        .into());
    }

    let upload = read_file_field(&mut multipart, "thumbnail").await?;
    let extension = match upload.media_type.as_str() {
        "image/jpeg" => "jpeg",
        "image/png" => "png",
        _ => {
            return Err(
                AppError::InvalidInput("Thumbnail must be a JPEG or PNG image".to_string()).into(),
            )
        }
    };
    let size_bytes = upload.data.len();

    let file_name = format!("{}.{}", random_asset_name(), extension);
    let file_path = std::path::Path::new(state.config.assets_root()).join(&file_name);
    tokio::fs::write(&file_path, &upload.data)
        .await
        .map_err(AppError::from)?;

    let thumbnail_url = format!("{}/assets/{}", state.config.public_base_url(), file_name);
    let video = state
        .videos
        .set_thumbnail_url(video_id, &thumbnail_url)
        .await?;

    tracing::info!(
        video_id = %video_id,
        size_bytes,
        media_type = %upload.media_type,
        duration_ms = start.elapsed().as_millis() as u64,
        "Thumbnail uploaded"
    );
    Ok(Json(video))
}
