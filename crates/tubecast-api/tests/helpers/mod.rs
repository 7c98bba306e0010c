//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p tubecast-api --test videos_test` or
//! `cargo test -p tubecast-api`. Everything runs in-process: in-memory SQLite,
//! in-memory object storage, and a fake media processor instead of
//! ffprobe/ffmpeg.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Duration;
use sqlx::sqlite::SqlitePoolOptions;
use tempfile::TempDir;
use tubecast_api::auth::jwt::make_jwt;
use tubecast_api::setup::routes;
use tubecast_api::state::AppState;
use tubecast_core::Config;
use tubecast_db::VideoRepository;
use tubecast_media::{AspectRatio, MediaError, MediaProcessor, MediaResult};
use tubecast_storage::InMemoryStorage;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-key-min-32-characters-long-for-testing";
pub const TEST_BUCKET: &str = "tubecast-test";

/// Deterministic stand-in for ffprobe/ffmpeg. Records every call and the
/// paths it was handed so tests can assert temp-file cleanup.
pub struct FakeMediaProcessor {
    pub ratio: AspectRatio,
    pub fail_probe: bool,
    pub fail_remux: bool,
    pub probe_calls: AtomicUsize,
    pub remux_calls: AtomicUsize,
    pub seen_paths: Mutex<Vec<PathBuf>>,
}

impl FakeMediaProcessor {
    pub fn new(ratio: AspectRatio) -> Self {
        Self {
            ratio,
            fail_probe: false,
            fail_remux: false,
            probe_calls: AtomicUsize::new(0),
            remux_calls: AtomicUsize::new(0),
            seen_paths: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_probe() -> Self {
        Self {
            fail_probe: true,
            ..Self::new(AspectRatio::Widescreen)
        }
    }

    pub fn failing_remux() -> Self {
        Self {
            fail_remux: true,
            ..Self::new(AspectRatio::Widescreen)
        }
    }

    pub fn probe_count(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }

    pub fn remux_count(&self) -> usize {
        self.remux_calls.load(Ordering::SeqCst)
    }

    /// Every path this processor saw or produced. After a request completes,
    /// none of them should still exist on disk.
    pub fn seen_paths(&self) -> Vec<PathBuf> {
        self.seen_paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaProcessor for FakeMediaProcessor {
    async fn probe_aspect_ratio(&self, path: &std::path::Path) -> MediaResult<AspectRatio> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_paths.lock().unwrap().push(path.to_path_buf());
        if self.fail_probe {
            return Err(MediaError::NoStreams);
        }
        Ok(self.ratio)
    }

    async fn remux_fast_start(&self, path: &std::path::Path) -> MediaResult<PathBuf> {
        self.remux_calls.fetch_add(1, Ordering::SeqCst);
        let mut target = path.as_os_str().to_os_string();
        target.push(".processing");
        let target = PathBuf::from(target);
        tokio::fs::copy(path, &target)
            .await
            .map_err(|source| MediaError::Spawn {
                tool: "ffmpeg",
                source,
            })?;
        self.seen_paths.lock().unwrap().push(target.clone());
        if self.fail_remux {
            // The real adapter removes its partial output before reporting
            // failure; mirror that so cleanup assertions hold either way.
            tokio::fs::remove_file(&target)
                .await
                .map_err(|source| MediaError::Spawn {
                    tool: "ffmpeg",
                    source,
                })?;
            return Err(MediaError::ToolFailed {
                tool: "ffmpeg",
                stderr: "simulated remux failure".to_string(),
            });
        }
        Ok(target)
    }
}

/// Test application: server plus handles on every backing resource.
pub struct TestApp {
    pub server: TestServer,
    pub videos: VideoRepository,
    pub storage: InMemoryStorage,
    pub media: Arc<FakeMediaProcessor>,
    pub assets_dir: TempDir,
}

impl TestApp {
    pub fn assets_path(&self) -> &std::path::Path {
        self.assets_dir.path()
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(
        InMemoryStorage::new(TEST_BUCKET),
        FakeMediaProcessor::new(AspectRatio::Widescreen),
    )
    .await
}

pub async fn setup_test_app_with(storage: InMemoryStorage, media: FakeMediaProcessor) -> TestApp {
    build_test_app(storage, media, None).await
}

/// An app whose video body ceiling is lowered so oversize requests stay small.
pub async fn setup_test_app_with_video_cap(max_video_size_bytes: usize) -> TestApp {
    build_test_app(
        InMemoryStorage::new(TEST_BUCKET),
        FakeMediaProcessor::new(AspectRatio::Widescreen),
        Some(max_video_size_bytes),
    )
    .await
}

async fn build_test_app(
    storage: InMemoryStorage,
    media: FakeMediaProcessor,
    video_cap: Option<usize>,
) -> TestApp {
    // A single connection keeps the in-memory database alive and shared.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    tubecast_db::MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let assets_dir = tempfile::tempdir().expect("Failed to create assets directory");
    let mut config = Config::for_tests(
        TEST_JWT_SECRET,
        "sqlite::memory:",
        assets_dir.path().to_string_lossy().into_owned(),
        TEST_BUCKET,
    );
    if let Some(cap) = video_cap {
        let thumbnail_cap = config.max_thumbnail_size_bytes();
        config = config.with_upload_limits(thumbnail_cap, cap);
    }

    let videos = VideoRepository::new(pool);
    let media = Arc::new(media);
    let state = Arc::new(AppState::new(
        config.clone(),
        videos.clone(),
        Arc::new(storage.clone()),
        media.clone(),
    ));

    let app = routes::setup_routes(&config, state);
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        videos,
        storage,
        media,
        assets_dir,
    }
}

/// A bearer token for `user_id`, signed with the test secret.
pub fn token_for(user_id: Uuid) -> String {
    make_jwt(user_id, TEST_JWT_SECRET, Duration::hours(1)).expect("sign test token")
}

pub fn bearer(user_id: Uuid) -> String {
    format!("Bearer {}", token_for(user_id))
}

/// Insert a draft video directly through the repository.
pub async fn create_video(app: &TestApp, user_id: Uuid, title: &str) -> tubecast_core::models::Video {
    app.videos
        .create(
            user_id,
            &tubecast_core::models::CreateVideoRequest {
                title: title.to_string(),
                description: None,
            },
        )
        .await
        .expect("create test video")
}

pub const MULTIPART_BOUNDARY: &str = "----tubecast-test-boundary";

/// Hand-rolled multipart body with a single file field.
pub fn multipart_file(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY)
}
