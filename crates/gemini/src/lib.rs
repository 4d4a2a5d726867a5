//! Gemini text-generation client.
//!
//! Wraps the `generateContent` REST endpoint and exposes it through the
//! [`TextGenerator`] trait so callers can swap in other generators.

pub mod api;
pub mod generator;

pub use api::{GeminiApi, GeminiConfig, GeminiError};
pub use generator::TextGenerator;
