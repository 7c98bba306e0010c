//! Multipart form helpers shared by the upload handlers.
//!
//! A `Field` borrows the `Multipart` it came from, so it cannot outlive the
//! scan loop that found it. Both helpers therefore consume the matching field
//! in place and hand back owned data.

use axum::extract::multipart::{Field, Multipart};
use bytes::Bytes;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tubecast_core::AppError;

use crate::error::HttpAppError;

/// A fully received file field.
pub struct FileField {
    /// Declared media type, parameters stripped, lowercased.
    pub media_type: String,
    pub data: Bytes,
}

/// A file field streamed to a temp file, for bodies too large to buffer.
/// The file is deleted when the handle drops.
#[derive(Debug)]
pub struct StagedField {
    pub file: NamedTempFile,
    pub size_bytes: u64,
}

fn missing_field(name: &str) -> HttpAppError {
    AppError::InvalidInput(format!("Unable to parse form file: missing field '{}'", name)).into()
}

/// Find the file field named `name` and buffer its content.
///
/// Fields before the match are drained and discarded; a form without the
/// field is a client error. Body-limit rejections keep their own status.
pub async fn read_file_field(
    multipart: &mut Multipart,
    name: &str,
) -> Result<FileField, HttpAppError> {
    while let Some(field) = multipart.next_field().await.map_err(HttpAppError::from)? {
        if field.name() != Some(name) {
            continue;
        }
        let media_type = declared_media_type(&field)?;
        let data = field.bytes().await.map_err(HttpAppError::from)?;
        return Ok(FileField { media_type, data });
    }
    Err(missing_field(name))
}

/// Find the file field named `name` and stream it to a temp file.
///
/// The declared media type is checked against `allowed_types` before any byte
/// of the body is read, so a mistyped upload is rejected without disk I/O.
pub async fn stage_file_field(
    multipart: &mut Multipart,
    name: &str,
    allowed_types: &[&str],
    type_error: &str,
    suffix: &str,
) -> Result<StagedField, HttpAppError> {
    while let Some(mut field) = multipart.next_field().await.map_err(HttpAppError::from)? {
        if field.name() != Some(name) {
            continue;
        }
        let media_type = declared_media_type(&field)?;
        if !allowed_types.contains(&media_type.as_str()) {
            return Err(AppError::InvalidInput(type_error.to_string()).into());
        }

        let staged = tempfile::Builder::new()
            .prefix("tubecast-upload-")
            .suffix(suffix)
            .tempfile()
            .map_err(AppError::from)?;
        let mut out = tokio::fs::File::create(staged.path())
            .await
            .map_err(AppError::from)?;

        let mut size_bytes: u64 = 0;
        while let Some(chunk) = field.chunk().await.map_err(HttpAppError::from)? {
            size_bytes += chunk.len() as u64;
            out.write_all(&chunk).await.map_err(AppError::from)?;
        }
        out.flush().await.map_err(AppError::from)?;

        return Ok(StagedField {
            file: staged,
            size_bytes,
        });
    }
    Err(missing_field(name))
}

/// The declared media type of a field, parameters stripped, lowercased.
/// Content is never sniffed.
fn declared_media_type(field: &Field<'_>) -> Result<String, AppError> {
    let content_type = field
        .content_type()
        .ok_or_else(|| AppError::InvalidInput("Can't parse media type".to_string()))?;

    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if media_type.is_empty() || !media_type.contains('/') {
        return Err(AppError::InvalidInput("Can't parse media type".to_string()));
    }
    Ok(media_type)
}
