//! Animation engine.
//!
//! [`generation`] turns a request into Manim scene source (model call with
//! fallback); [`pipeline`] writes the scene, renders it, and returns the
//! resulting animation.

pub mod generation;
pub mod pipeline;
