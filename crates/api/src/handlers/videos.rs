//! Handlers for the `/videos` resource.
//!
//! Serves rendered files from `<videos_dir>/<animation_id>/<filename>` with
//! HTTP range request support.

use std::path::{Path as FsPath, PathBuf};

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::{self, HeaderMap};
use axum::http::StatusCode;
use axum::response::Response;
use mathanim_core::error::CoreError;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Maximum read chunk size for open-ended range requests (1 MiB).
const MAX_CHUNK_SIZE: u64 = 1024 * 1024;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Reject path segments that could escape the videos directory.
fn validate_segment(name: &str, segment: &str) -> AppResult<()> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\', '\0'])
    {
        return Err(AppError::BadRequest(format!("Invalid {name} '{segment}'")));
    }
    Ok(())
}

/// Resolve the on-disk path for a video, validating both segments.
fn resolve_video_path(videos_dir: &FsPath, animation_id: &str, filename: &str) -> AppResult<PathBuf> {
    validate_segment("animation id", animation_id)?;
    validate_segment("filename", filename)?;
    Ok(videos_dir.join(animation_id).join(filename))
}

/// Guess a Content-Type from a file extension.
fn content_type_for_extension(path: &FsPath) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "gif" => "image/gif",
        "png" => "image/png",
        "py" => "text/x-python; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Parse a `Range: bytes=START-END` header value.
/// Returns `(start, optional_end)`.
fn parse_range_header(range: &str) -> Option<(u64, Option<u64>)> {
    let range = range.strip_prefix("bytes=")?;
    let (start, end) = range.split_once('-')?;
    let start = start.trim().parse::<u64>().ok()?;
    let end = match end.trim() {
        "" => None,
        e => Some(e.parse::<u64>().ok()?),
    };
    Some((start, end))
}

fn build_response(builder: axum::http::response::Builder, body: Body) -> AppResult<Response> {
    builder
        .body(body)
        .map_err(|e| AppError::InternalError(e.to_string()))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /videos/{animation_id}/{filename}
///
/// Streams a rendered file. A single `Range: bytes=` request is answered
/// with 206 Partial Content; unsatisfiable ranges get 416.
pub async fn stream_video(
    State(state): State<AppState>,
    Path((animation_id, filename)): Path<(String, String)>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let path = resolve_video_path(&state.config.videos_dir, &animation_id, &filename)?;

    let metadata = match tokio::fs::metadata(&path).await {
        Ok(m) if m.is_file() => m,
        _ => {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Video",
                id: format!("{animation_id}/{filename}"),
            }))
        }
    };
    let file_size = metadata.len();
    let content_type = content_type_for_extension(&path);

    // Check for Range header.
    if let Some(range_value) = headers.get(header::RANGE) {
        let range_str = range_value
            .to_str()
            .map_err(|_| AppError::BadRequest("Invalid Range header".into()))?;

        if let Some((start, end)) = parse_range_header(range_str) {
            if file_size == 0 || start >= file_size {
                return build_response(
                    Response::builder()
                        .status(StatusCode::RANGE_NOT_SATISFIABLE)
                        .header(header::CONTENT_RANGE, format!("bytes */{file_size}")),
                    Body::empty(),
                );
            }

            let end = end
                .map(|e| e.min(file_size - 1))
                .unwrap_or_else(|| (start + MAX_CHUNK_SIZE - 1).min(file_size - 1));

            if start > end {
                return build_response(
                    Response::builder()
                        .status(StatusCode::RANGE_NOT_SATISFIABLE)
                        .header(header::CONTENT_RANGE, format!("bytes */{file_size}")),
                    Body::empty(),
                );
            }

            let length = end - start + 1;

            let mut file = tokio::fs::File::open(&path)
                .await
                .map_err(|e| AppError::InternalError(e.to_string()))?;
            file.seek(std::io::SeekFrom::Start(start))
                .await
                .map_err(|e| AppError::InternalError(e.to_string()))?;

            let stream = ReaderStream::new(file.take(length));

            return build_response(
                Response::builder()
                    .status(StatusCode::PARTIAL_CONTENT)
                    .header(header::CONTENT_TYPE, content_type)
                    .header(header::CONTENT_LENGTH, length.to_string())
                    .header(
                        header::CONTENT_RANGE,
                        format!("bytes {start}-{end}/{file_size}"),
                    )
                    .header(header::ACCEPT_RANGES, "bytes"),
                Body::from_stream(stream),
            );
        }
    }

    // No usable Range header: serve the full file.
    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    let stream = ReaderStream::new(file);

    build_response(
        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_LENGTH, file_size.to_string())
            .header(header::ACCEPT_RANGES, "bytes"),
        Body::from_stream(stream),
    )
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_closed_and_open_ranges() {
        assert_eq!(parse_range_header("bytes=0-99"), Some((0, Some(99))));
        assert_eq!(parse_range_header("bytes=100-"), Some((100, None)));
        assert_eq!(parse_range_header("bytes=-100"), None);
        assert_eq!(parse_range_header("items=0-1"), None);
    }

    #[test]
    fn rejects_traversal_segments() {
        let base = FsPath::new("/srv/videos");
        assert_matches!(resolve_video_path(base, "..", "x.mp4"), Err(AppError::BadRequest(_)));
        assert_matches!(resolve_video_path(base, "id", "a/b.mp4"), Err(AppError::BadRequest(_)));
        assert_matches!(resolve_video_path(base, "id", "..\\x"), Err(AppError::BadRequest(_)));
        assert_eq!(
            resolve_video_path(base, "id", "Scene_1.mp4").unwrap(),
            PathBuf::from("/srv/videos/id/Scene_1.mp4")
        );
    }

    #[test]
    fn content_types() {
        assert_eq!(content_type_for_extension(FsPath::new("a/Scene.MP4")), "video/mp4");
        assert_eq!(content_type_for_extension(FsPath::new("a/Scene")), "application/octet-stream");
    }
}
