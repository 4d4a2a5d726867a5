//! End-to-end animation creation: check, generate, write, render, collect.

use std::path::PathBuf;

use mathanim_core::options::AnimationRequest;
use uuid::Uuid;

use super::generation::generate_scene;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A rendered animation stored under the videos directory.
#[derive(Debug, Clone)]
pub struct Animation {
    pub id: Uuid,
    pub scene_name: String,
    /// Absolute location of the video on disk.
    pub video_path: PathBuf,
    /// Path under which `/videos` serves the file.
    pub video_url: String,
    pub used_fallback: bool,
}

/// Run the full pipeline for one request.
///
/// The renderer is checked first so an unavailable CLI fails before the
/// model is called. Artifacts are written to `<videos_dir>/<id>/`.
pub async fn create_animation(state: &AppState, request: &AnimationRequest) -> AppResult<Animation> {
    state.renderer.check_installation().await?;

    let id = Uuid::new_v4();
    let output_dir = state.config.videos_dir.join(id.to_string());
    tokio::fs::create_dir_all(&output_dir)
        .await
        .map_err(|e| AppError::InternalError(format!("create {}: {e}", output_dir.display())))?;

    let scene = generate_scene(state.generator.as_ref(), request).await;

    let scene_file = output_dir.join(scene.file_name());
    tokio::fs::write(&scene_file, scene.code.as_bytes())
        .await
        .map_err(|e| AppError::InternalError(format!("write {}: {e}", scene_file.display())))?;
    tracing::info!(
        animation_id = %id,
        scene_name = %scene.scene_name,
        used_fallback = scene.used_fallback,
        "Scene written"
    );

    let video_path = state
        .renderer
        .render_into(&scene_file, &scene.scene_name, request.quality, &output_dir)
        .await?;

    let file_name = video_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| scene.video_file_name());
    let video_url = format!("/videos/{id}/{file_name}");

    Ok(Animation {
        id,
        scene_name: scene.scene_name,
        video_path,
        video_url,
        used_fallback: scene.used_fallback,
    })
}
