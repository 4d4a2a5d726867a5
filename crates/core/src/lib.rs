//! Domain logic for the math animation service.
//!
//! Everything here is pure and synchronous: request option parsing,
//! keyword tables for topic detection and prompt enrichment, the model
//! prompt template, and composition of the Manim scene source that the
//! renderer executes.

pub mod error;
pub mod options;
pub mod prompt;
pub mod scene;
pub mod topic;
