//! Video metadata endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tubecast_core::models::{CreateVideoRequest, Video};
use tubecast_core::AppError;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::HttpAppError;
use crate::handlers::with_signed_video_url;
use crate::state::AppState;

#[tracing::instrument(skip(state, req), fields(user_id = %user_id))]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<CreateVideoRequest>,
) -> Result<(StatusCode, Json<Video>), HttpAppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title must not be empty".to_string()).into());
    }

    let video = state.videos.create(user_id, &req).await?;
    tracing::info!(video_id = %video.id, "Video created");
    Ok((StatusCode::CREATED, Json(video)))
}

#[tracing::instrument(skip(state), fields(video_id = %video_id, user_id = %user_id))]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<Uuid>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Video>, HttpAppError> {
    let video = state.videos.get_required(video_id).await?;
    if !video.is_owned_by(user_id) {
        return Err(
            AppError::Unauthorized("You don't have permission to view this video".to_string())
                .into(),
        );
    }

    let video = with_signed_video_url(&state, video).await?;
    Ok(Json(video))
}

#[tracing::instrument(skip(state), fields(user_id = %user_id))]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Video>>, HttpAppError> {
    let videos = state.videos.list_by_user(user_id).await?;

    let mut signed = Vec::with_capacity(videos.len());
    for video in videos {
        signed.push(with_signed_video_url(&state, video).await?);
    }
    Ok(Json(signed))
}
