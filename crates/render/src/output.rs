//! Locating and collecting rendered videos.
//!
//! Manim writes into `<media>/videos/<scene>/<resolution>/<scene>.mp4`
//! by default. The candidates are checked in a fixed order and the first
//! hit is moved into the per-animation output directory.

use std::io;
use std::path::{Path, PathBuf};

use mathanim_core::options::Quality;

use crate::manim::RenderError;

/// Ordered list of paths where a render of `scene_name` may have landed.
///
/// One entry per quality's resolution directory under `media_dir`, then
/// `<output_dir>/<scene_name>.mp4` for a direct write.
pub fn candidate_paths(media_dir: &Path, output_dir: &Path, scene_name: &str) -> Vec<PathBuf> {
    let file_name = format!("{scene_name}.mp4");
    let scene_dir = media_dir.join("videos").join(scene_name);

    let mut paths: Vec<PathBuf> = Quality::ALL
        .iter()
        .map(|q| scene_dir.join(q.output_dir_name()).join(&file_name))
        .collect();
    paths.push(output_dir.join(&file_name));
    paths
}

/// Return the first existing candidate, logging every probe.
pub async fn locate_output(candidates: &[PathBuf]) -> Option<PathBuf> {
    let mut found = None;
    for path in candidates {
        let exists = tokio::fs::try_exists(path).await.unwrap_or(false);
        tracing::debug!(path = %path.display(), exists, "Checking for rendered video");
        if exists && found.is_none() {
            found = Some(path.clone());
        }
    }
    found
}

/// Locate the render of `scene_name` and make sure it ends up in
/// `output_dir`.
///
/// A file found under `media_dir` is moved to `<output_dir>/<scene>.mp4`
/// and the scene's media directory is removed (errors ignored).
pub async fn collect_output(
    media_dir: &Path,
    output_dir: &Path,
    scene_name: &str,
) -> Result<PathBuf, RenderError> {
    let candidates = candidate_paths(media_dir, output_dir, scene_name);
    let Some(found) = locate_output(&candidates).await else {
        tracing::error!(scene_name, "No video file found in any of the expected locations");
        return Err(RenderError::OutputMissing {
            scene_name: scene_name.to_string(),
        });
    };
    tracing::info!(path = %found.display(), "Found rendered video");

    if !found.starts_with(media_dir) {
        return Ok(found);
    }

    let final_path = output_dir.join(format!("{scene_name}.mp4"));
    tracing::info!(from = %found.display(), to = %final_path.display(), "Moving rendered video");
    move_file(&found, &final_path).await?;

    let scene_media = media_dir.join("videos").join(scene_name);
    if let Err(e) = tokio::fs::remove_dir_all(&scene_media).await {
        tracing::debug!(path = %scene_media.display(), error = %e, "Media cleanup skipped");
    }

    Ok(final_path)
}

/// Rename `from` to `to`, falling back to copy + delete when the paths
/// are on different filesystems.
async fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match tokio::fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(_) => {
            tokio::fs::copy(from, to).await?;
            tokio::fs::remove_file(from).await
        }
    }
}
