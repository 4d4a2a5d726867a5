use std::sync::Arc;

use mathanim_gemini::TextGenerator;
use mathanim_render::ManimRunner;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (directories, limits).
    pub config: Arc<ServerConfig>,
    /// Generator producing `construct(self)` bodies.
    pub generator: Arc<dyn TextGenerator>,
    /// Manim CLI runner.
    pub renderer: Arc<ManimRunner>,
}

impl AppState {
    /// Build state with the Gemini generator and a runner from `config`.
    pub fn from_config(config: ServerConfig) -> Self {
        let generator = Arc::new(mathanim_gemini::GeminiApi::new(config.gemini_config()));
        Self::with_generator(config, generator)
    }

    /// Build state with a caller-supplied generator.
    pub fn with_generator(config: ServerConfig, generator: Arc<dyn TextGenerator>) -> Self {
        let renderer = Arc::new(ManimRunner::new(config.manim_config()));
        Self {
            config: Arc::new(config),
            generator,
            renderer,
        }
    }
}
