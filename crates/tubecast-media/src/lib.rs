//! Tubecast media processing.
//!
//! Wraps the external `ffprobe` and `ffmpeg` binaries behind the
//! [`MediaProcessor`] capability so handlers (and tests) never invoke real
//! processes directly. No re-encoding happens here: probing reads stream
//! dimensions, remuxing copies streams while moving the container index to
//! the front of the file.

pub mod aspect;
pub mod processor;

pub use aspect::AspectRatio;
pub use processor::{FfmpegProcessor, MediaError, MediaProcessor, MediaResult};
