//! Text generation seam used by the animation pipeline.

use async_trait::async_trait;

use crate::api::{GeminiApi, GeminiError};

/// Anything that turns a prompt into generated text.
///
/// Held as `Arc<dyn TextGenerator>` in server state so the backend can be
/// replaced (tests inject canned or failing generators).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, GeminiError>;

    /// Model label for logging.
    fn model_name(&self) -> &str;
}

#[async_trait]
impl TextGenerator for GeminiApi {
    async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        self.generate_content(prompt).await
    }

    fn model_name(&self) -> &str {
        self.model()
    }
}
