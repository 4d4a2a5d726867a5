use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mathanim_core::error::CoreError;
use mathanim_render::RenderError;
use serde_json::json;

/// Message returned when the Manim CLI cannot be reached.
pub const RENDERER_UNAVAILABLE_MESSAGE: &str = "Manim is not properly installed or accessible";

/// Message returned when a render succeeded but produced no video.
pub const OUTPUT_MISSING_MESSAGE: &str = "Animation file was not created";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`RenderError`] for renderer
/// failures, and adds HTTP-specific variants. Implements [`IntoResponse`]
/// to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `mathanim_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A rendering failure from `mathanim_render`.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
            },

            // --- Renderer errors ---
            AppError::Render(render) => classify_render_error(render),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a renderer error into an HTTP status, error code, and message.
///
/// Render failures surface the tool's stderr to the caller; I/O errors are
/// sanitized.
fn classify_render_error(err: &RenderError) -> (StatusCode, &'static str, String) {
    match err {
        RenderError::NotInstalled(detail) => {
            tracing::error!(detail = %detail, "Renderer unavailable");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "RENDERER_UNAVAILABLE",
                RENDERER_UNAVAILABLE_MESSAGE.to_string(),
            )
        }
        RenderError::ExecutionFailed { stderr, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "RENDER_FAILED",
            format!("Animation generation failed: {stderr}"),
        ),
        RenderError::Timeout { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "RENDER_FAILED",
            format!("Animation generation failed: {err}"),
        ),
        RenderError::OutputMissing { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "OUTPUT_MISSING",
            OUTPUT_MISSING_MESSAGE.to_string(),
        ),
        RenderError::Io(e) => {
            tracing::error!(error = %e, "Renderer I/O error");
            internal()
        }
    }
}
