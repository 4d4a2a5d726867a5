//! Route definitions for animation generation.
//!
//! ```text
//! POST /generate    generate_animation
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::animation;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/generate", post(animation::generate_animation))
}
