//! Application setup and initialization

pub mod routes;
pub mod server;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tubecast_core::Config;
use tubecast_db::VideoRepository;
use tubecast_media::FfmpegProcessor;
use tubecast_storage::{S3Credentials, S3Storage};

use crate::state::AppState;

/// Initialize the entire application: database, storage, media tooling,
/// shared state, and the router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    tokio::fs::create_dir_all(config.assets_root())
        .await
        .with_context(|| format!("Failed to create assets directory {}", config.assets_root()))?;

    let pool = tubecast_db::create_pool(config.database_url())
        .await
        .context("Failed to connect to database")?;
    tubecast_db::MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!(database_url = %config.database_url(), "Database ready");

    let credentials = S3Credentials {
        access_key_id: config.aws_access_key_id().map(str::to_string),
        secret_access_key: config.aws_secret_access_key().map(str::to_string),
    };
    let storage = S3Storage::new(
        config.s3_bucket().to_string(),
        config.s3_region().to_string(),
        config.s3_endpoint().map(str::to_string),
        credentials,
    )
    .context("Failed to initialize object storage")?;
    tracing::info!(bucket = %config.s3_bucket(), region = %config.s3_region(), "Object storage ready");

    let media = FfmpegProcessor::new(
        config.ffprobe_path(),
        config.ffmpeg_path(),
        Duration::from_secs(config.process_timeout_secs()),
    )?;

    let state = Arc::new(AppState::new(
        config.clone(),
        VideoRepository::new(pool),
        Arc::new(storage),
        Arc::new(media),
    ));

    let router = routes::setup_routes(&config, state.clone());
    Ok((state, router))
}
