//! Video upload handler.
//!
//! The upload is staged to a temp file, probed for its aspect ratio, remuxed
//! so the moov atom sits at the front of the file, then pushed to object
//! storage under an `{aspect}/{random}.mp4` key. Both temp files are owned by
//! `TempPath` guards, so they are removed on every exit path, success or
//! failure.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use tubecast_core::models::Video;
use tubecast_core::{AppError, ObjectRef};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::HttpAppError;
use crate::handlers::with_signed_video_url;
use crate::state::AppState;
use crate::utils::keys::random_asset_name;
use crate::utils::multipart::stage_file_field;

#[tracing::instrument(skip(state, multipart), fields(video_id = %video_id, user_id = %user_id))]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<Uuid>,
    AuthUser(user_id): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<Video>, HttpAppError> {
    let start = Instant::now();

    let video = state.videos.get_required(video_id).await?;
    if !video.is_owned_by(user_id) {
        return Err(AppError::Unauthorized(
            "You don't have permission to upload a video for this video entry".to_string(),
        )
        .into());
    }

    // Stage the body on disk; ffprobe/ffmpeg need a real file.
    let staged = stage_file_field(
        &mut multipart,
        "video",
        &["video/mp4"],
        "Video must be a mp4 file",
        ".mp4",
    )
    .await?;
    let size_bytes = staged.size_bytes;

    let aspect = state.media.probe_aspect_ratio(staged.file.path()).await?;
    let processed_path = state.media.remux_fast_start(staged.file.path()).await?;
    // Take ownership so the remuxed file is deleted with the staged one.
    let processed = match tempfile::TempPath::try_from_path(&processed_path) {
        Ok(guard) => guard,
        Err(err) => {
            let _ = tokio::fs::remove_file(&processed_path).await;
            return Err(AppError::from(err).into());
        }
    };

    let key = format!("{}/{}.mp4", aspect.prefix(), random_asset_name());
    state.storage.put_file(&key, "video/mp4", &processed).await?;

    let video_url = ObjectRef::new(state.storage.bucket(), &key).encode();
    let video = match state.videos.set_video_url(video_id, &video_url).await {
        Ok(video) => video,
        Err(err) => {
            // The object is already in the store; drop it so a failed row
            // update does not leak storage.
            let storage = Arc::clone(&state.storage);
            tokio::spawn(async move {
                if let Err(delete_err) = storage.delete(&key).await {
                    tracing::warn!(key = %key, error = %delete_err, "Orphan cleanup failed");
                }
            });
            return Err(err.into());
        }
    };

    tracing::info!(
        video_id = %video_id,
        size_bytes,
        aspect = %aspect,
        duration_ms = start.elapsed().as_millis() as u64,
        "Video uploaded"
    );

    let video = with_signed_video_url(&state, video).await?;
    Ok(Json(video))
}
