//! Request handlers

pub mod thumbnail_upload;
pub mod video_upload;
pub mod videos;

use std::time::Duration;

use tubecast_core::models::Video;
use tubecast_core::ObjectRef;

use crate::error::HttpAppError;
use crate::state::AppState;

/// Replace the stored `bucket,key` reference with a presigned GET URL before
/// the video leaves the API. Videos without an upload pass through unchanged.
pub(crate) async fn with_signed_video_url(
    state: &AppState,
    mut video: Video,
) -> Result<Video, HttpAppError> {
    if let Some(stored) = video.video_url.as_deref() {
        let object_ref = ObjectRef::parse(stored).map_err(tubecast_core::AppError::from)?;
        let expires_in = Duration::from_secs(state.config.signed_url_expiry_secs());
        let signed = state
            .storage
            .presign_get(&object_ref.key, expires_in)
            .await?;
        video.video_url = Some(signed);
    }
    Ok(video)
}
