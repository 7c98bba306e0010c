//! Application state shared across handlers.

use std::sync::Arc;

use tubecast_core::Config;
use tubecast_db::VideoRepository;
use tubecast_media::MediaProcessor;
use tubecast_storage::ObjectStorage;

/// Read-only after startup; each request gets an `Arc` clone.
pub struct AppState {
    pub config: Config,
    pub videos: VideoRepository,
    pub storage: Arc<dyn ObjectStorage>,
    pub media: Arc<dyn MediaProcessor>,
}

impl AppState {
    pub fn new(
        config: Config,
        videos: VideoRepository,
        storage: Arc<dyn ObjectStorage>,
        media: Arc<dyn MediaProcessor>,
    ) -> Self {
        Self {
            config,
            videos,
            storage,
            media,
        }
    }
}
