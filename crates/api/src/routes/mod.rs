pub mod animation;
pub mod health;
pub mod videos;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree (mounted at the root).
///
/// Route hierarchy:
///
/// ```text
/// /generate                          generate an animation (POST)
/// /videos/{animation_id}/{filename}  serve a rendered file (GET)
/// ```
///
/// `/health` is mounted separately by [`crate::router::build_app_router`].
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(animation::router())
        .nest("/videos", videos::router())
}
