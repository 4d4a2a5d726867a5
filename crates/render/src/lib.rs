//! Manim rendering via subprocess.
//!
//! [`manim::ManimRunner`] checks that the CLI is reachable, renders a
//! scene file at a requested quality, and collects the produced video
//! into a per-animation directory.

pub mod manim;
pub mod output;
pub mod subprocess;

pub use manim::{ManimConfig, ManimRunner, RenderError};
