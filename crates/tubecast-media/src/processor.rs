//! Media processor - probing and fast-start remuxing via external tools.

use crate::aspect::AspectRatio;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Invalid tool path: {0}")]
    InvalidToolPath(String),

    #[error("Failed to execute {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with an error: {stderr}")]
    ToolFailed { tool: &'static str, stderr: String },

    #[error("{tool} did not finish within {timeout_secs}s")]
    Timeout {
        tool: &'static str,
        timeout_secs: u64,
    },

    #[error("Failed to parse ffprobe output: {0}")]
    UnparseableOutput(#[from] serde_json::Error),

    #[error("No streams found in probe output")]
    NoStreams,

    #[error("First stream has no {0}")]
    MissingDimension(&'static str),
}

pub type MediaResult<T> = Result<T, MediaError>;

/// Capability for inspecting and repacking video containers.
///
/// Handlers depend on this trait rather than on ffmpeg/ffprobe so tests can
/// substitute a deterministic fake.
#[async_trait]
pub trait MediaProcessor: Send + Sync {
    /// Classify the aspect ratio of the video at `path`.
    async fn probe_aspect_ratio(&self, path: &Path) -> MediaResult<AspectRatio>;

    /// Remux the video at `path` into a streaming-optimized copy at
    /// `<path>.processing` without re-encoding. Returns the output path; the
    /// caller owns deletion of both files.
    async fn remux_fast_start(&self, path: &Path) -> MediaResult<PathBuf>;
}

/// Real implementation shelling out to ffprobe and ffmpeg.
pub struct FfmpegProcessor {
    ffprobe_path: String,
    ffmpeg_path: String,
    timeout: Duration,
}

fn validate_tool_path(path: &str) -> MediaResult<()> {
    let ok = !path.is_empty()
        && path.chars().all(|c| {
            c.is_alphanumeric() || c == '/' || c == '-' || c == '_' || c == '.' || c == '\\'
        })
        && !path.contains("..");
    if ok {
        Ok(())
    } else {
        Err(MediaError::InvalidToolPath(path.to_string()))
    }
}

/// Extract `(width, height)` from ffprobe's JSON stream listing.
///
/// Reads the first stream entry with no stream-type filtering: a file whose
/// first stream carries no dimensions (e.g. audio) fails with
/// `MissingDimension` rather than falling through to a later stream.
fn parse_first_stream_dimensions(stdout: &[u8]) -> MediaResult<(f64, f64)> {
    let data: serde_json::Value = serde_json::from_slice(stdout)?;
    let stream = data["streams"].get(0).ok_or(MediaError::NoStreams)?;
    let width = stream["width"]
        .as_f64()
        .ok_or(MediaError::MissingDimension("width"))?;
    let height = stream["height"]
        .as_f64()
        .ok_or(MediaError::MissingDimension("height"))?;
    Ok((width, height))
}

impl FfmpegProcessor {
    pub fn new(
        ffprobe_path: impl Into<String>,
        ffmpeg_path: impl Into<String>,
        timeout: Duration,
    ) -> MediaResult<Self> {
        let ffprobe_path = ffprobe_path.into();
        let ffmpeg_path = ffmpeg_path.into();
        validate_tool_path(&ffprobe_path)?;
        validate_tool_path(&ffmpeg_path)?;
        Ok(Self {
            ffprobe_path,
            ffmpeg_path,
            timeout,
        })
    }

    async fn run(
        &self,
        mut command: Command,
        tool: &'static str,
    ) -> MediaResult<std::process::Output> {
        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| MediaError::Timeout {
                tool,
                timeout_secs: self.timeout.as_secs(),
            })?
            .map_err(|source| MediaError::Spawn { tool, source })?;

        if !output.status.success() {
            return Err(MediaError::ToolFailed {
                tool,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }
}

#[async_trait]
impl MediaProcessor for FfmpegProcessor {
    #[tracing::instrument(skip(self), fields(tool = "ffprobe"))]
    async fn probe_aspect_ratio(&self, path: &Path) -> MediaResult<AspectRatio> {
        let start = std::time::Instant::now();

        let mut command = Command::new(&self.ffprobe_path);
        command
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = self.run(command, "ffprobe").await?;
        let (width, height) = parse_first_stream_dimensions(&output.stdout)?;
        let ratio = AspectRatio::classify(width, height);

        tracing::info!(
            width,
            height,
            ratio = %ratio,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Video probe completed"
        );
        Ok(ratio)
    }

    #[tracing::instrument(skip(self), fields(tool = "ffmpeg"))]
    async fn remux_fast_start(&self, path: &Path) -> MediaResult<PathBuf> {
        let start = std::time::Instant::now();

        let mut target = OsString::from(path.as_os_str());
        target.push(".processing");
        let target = PathBuf::from(target);

        let mut command = Command::new(&self.ffmpeg_path);
        command
            .arg("-i")
            .arg(path)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(&target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if let Err(err) = self.run(command, "ffmpeg").await {
            // ffmpeg can leave a truncated output file behind when it fails
            // partway through; don't let it outlive the request.
            let _ = tokio::fs::remove_file(&target).await;
            return Err(err);
        }

        tracing::info!(
            output = %target.display(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Fast-start remux completed"
        );
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_tool_path_validation() {
        assert!(validate_tool_path("ffprobe").is_ok());
        assert!(validate_tool_path("/usr/local/bin/ffmpeg").is_ok());
        assert!(validate_tool_path("ffprobe; rm -rf /").is_err());
        assert!(validate_tool_path("../ffprobe").is_err());
        assert!(validate_tool_path("").is_err());
    }

    #[test]
    fn test_processor_rejects_bad_paths() {
        assert!(FfmpegProcessor::new("ffprobe|x", "ffmpeg", Duration::from_secs(1)).is_err());
        assert!(FfmpegProcessor::new("ffprobe", "ffmpeg", Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn test_parse_dimensions() {
        let out = br#"{"streams":[{"index":0,"codec_type":"video","width":1920,"height":1080}]}"#;
        assert_eq!(parse_first_stream_dimensions(out).unwrap(), (1920.0, 1080.0));
    }

    #[test]
    fn test_parse_no_streams() {
        let out = br#"{"streams":[]}"#;
        assert!(matches!(
            parse_first_stream_dimensions(out).unwrap_err(),
            MediaError::NoStreams
        ));
    }

    #[test]
    fn test_parse_audio_first_stream_fails() {
        // First stream is consulted unconditionally; an audio stream has no
        // width and the probe fails rather than skipping to the video stream.
        let out = br#"{"streams":[{"index":0,"codec_type":"audio"},{"index":1,"codec_type":"video","width":1280,"height":720}]}"#;
        assert!(matches!(
            parse_first_stream_dimensions(out).unwrap_err(),
            MediaError::MissingDimension("width")
        ));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_first_stream_dimensions(b"not json").unwrap_err(),
            MediaError::UnparseableOutput(_)
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_remux_failure_removes_partial_output() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();

        // A stand-in ffmpeg that writes its output file and then fails.
        let tool = dir.path().join("ffmpeg");
        std::fs::write(&tool, "#!/bin/sh\nfor last; do :; done\n: > \"$last\"\nexit 1\n")
            .unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

        let input = dir.path().join("clip.mp4");
        std::fs::write(&input, b"not really mp4").unwrap();

        let tool_path = tool.to_str().unwrap();
        let processor =
            FfmpegProcessor::new(tool_path, tool_path, Duration::from_secs(5)).unwrap();

        let err = processor.remux_fast_start(&input).await.unwrap_err();
        assert!(matches!(err, MediaError::ToolFailed { tool: "ffmpeg", .. }));

        let leftover = dir.path().join("clip.mp4.processing");
        assert!(!leftover.exists());
    }
}
