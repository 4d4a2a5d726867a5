//! Route definitions for rendered video files.
//!
//! Mounted at `/videos`.
//!
//! ```text
//! GET  /{animation_id}/{filename}    stream_video
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::videos;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/{animation_id}/{filename}", get(videos::stream_video))
}
