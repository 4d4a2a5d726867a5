//! Scene generation with fallback.

use mathanim_core::options::AnimationRequest;
use mathanim_core::prompt::prompt_for_request;
use mathanim_core::scene::{new_scene_name, GeneratedScene};
use mathanim_gemini::TextGenerator;

/// Generate the Manim scene for `request`.
///
/// Never fails: a generator error, or output with no usable lines, yields
/// the fallback scene instead.
pub async fn generate_scene(generator: &dyn TextGenerator, request: &AnimationRequest) -> GeneratedScene {
    let scene_name = new_scene_name();
    let model_prompt = prompt_for_request(&request.prompt, request.level, request.style);

    match generator.generate(&model_prompt).await {
        Ok(text) => {
            let scene = GeneratedScene::from_model_output(scene_name, &text);
            if scene.used_fallback {
                tracing::warn!(
                    scene_name = %scene.scene_name,
                    model = generator.model_name(),
                    "Model output had no usable lines, using fallback scene"
                );
            }
            scene
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                model = generator.model_name(),
                "Error generating scene, using fallback"
            );
            GeneratedScene::fallback(scene_name)
        }
    }
}
