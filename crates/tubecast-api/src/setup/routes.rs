//! Route configuration and setup

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tubecast_core::Config;

use crate::handlers;
use crate::state::AppState;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    // The upload routes carry their own body ceilings; everything else keeps
    // axum's default limit.
    let thumbnail_routes = Router::new()
        .route(
            "/api/thumbnail_upload/{video_id}",
            post(handlers::thumbnail_upload::upload_thumbnail),
        )
        .layer(DefaultBodyLimit::max(config.max_thumbnail_size_bytes()));

    let video_upload_routes = Router::new()
        .route(
            "/api/video_upload/{video_id}",
            post(handlers::video_upload::upload_video),
        )
        .layer(DefaultBodyLimit::max(config.max_video_size_bytes()));

    Router::new()
        .route(
            "/api/videos",
            post(handlers::videos::create_video).get(handlers::videos::list_videos),
        )
        .route("/api/videos/{video_id}", get(handlers::videos::get_video))
        .merge(thumbnail_routes)
        .merge(video_upload_routes)
        .nest_service("/assets", ServeDir::new(config.assets_root()))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Readiness probe: the process is up and the database answers.
async fn health_check(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    let database = match tokio::time::timeout(TIMEOUT, state.videos.ping()).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Database health check failed");
            format!("unhealthy: {}", e)
        }
        Err(_) => {
            tracing::error!("Database health check timed out");
            "timeout".to_string()
        }
    };

    let healthy = database == "healthy";
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "status": if healthy { "healthy" } else { "unhealthy" },
            "database": database,
        })),
    )
}
