//! Domain models shared across crates.

mod video;

pub use video::{CreateVideoRequest, Video};
