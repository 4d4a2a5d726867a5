//! Handlers for animation generation.
//!
//! Routes:
//! - `POST /generate`: generate and render an animation for a prompt

use axum::extract::State;
use axum::Json;
use mathanim_core::options::AnimationRequest;
use serde::{Deserialize, Serialize};

use crate::engine::pipeline;
use crate::error::AppResult;
use crate::state::AppState;

/// Request body for `POST /generate`. Options are optional lowercase names.
#[derive(Debug, Deserialize)]
pub struct GenerateAnimationRequest {
    pub prompt: String,
    pub quality: Option<String>,
    pub level: Option<String>,
    pub style: Option<String>,
}

/// Response body for `POST /generate`.
#[derive(Debug, Serialize)]
pub struct GenerateAnimationResponse {
    pub id: String,
    pub video_url: String,
}

/// POST /generate
///
/// Validates the options, then runs the pipeline synchronously for the
/// duration of the request and returns the id and URL of the video.
pub async fn generate_animation(
    State(state): State<AppState>,
    Json(input): Json<GenerateAnimationRequest>,
) -> AppResult<Json<GenerateAnimationResponse>> {
    let request = AnimationRequest::parse(
        &input.prompt,
        input.quality.as_deref(),
        input.level.as_deref(),
        input.style.as_deref(),
    )?;

    tracing::info!(
        quality = %request.quality,
        level = %request.level,
        style = %request.style,
        "Generating animation"
    );

    let animation = pipeline::create_animation(&state, &request).await?;
    tracing::info!(
        animation_id = %animation.id,
        scene_name = %animation.scene_name,
        video_path = %animation.video_path.display(),
        used_fallback = animation.used_fallback,
        "Animation ready"
    );

    Ok(Json(GenerateAnimationResponse {
        id: animation.id.to_string(),
        video_url: animation.video_url,
    }))
}
