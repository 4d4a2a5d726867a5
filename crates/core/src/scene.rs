//! Manim scene source composition.
//!
//! The model only returns the body of `construct(self)`. This module
//! cleans that fragment, re-indents it to sit inside the method, and wraps
//! it in the fixed scene template. It also owns the fallback body used
//! when generation fails.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

/// Indentation of statements inside `construct(self)`.
const BODY_INDENT: &str = "        ";

/// Columns a leading tab counts for when normalising indentation.
const TAB_WIDTH: usize = 4;

/// A markdown code fence line, optionally carrying a language tag.
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z0-9_+-]*$").expect("valid regex"));

/// Body rendered when the model call fails or yields nothing usable.
///
/// Already indented for placement inside `construct(self)`.
pub const FALLBACK_SCENE_BODY: &str = r#"        # Create a simple circle
        circle = Circle()
        circle.set_fill(BLUE, opacity=0.5)
        circle.set_stroke(WHITE, width=2)

        # Add the circle to the scene
        self.play(Create(circle))

        # Add a label
        label = Text("Math Concept", font_size=24).next_to(circle, UP)
        self.play(Write(label))

        self.wait(2)"#;

/// A complete scene ready to be written to disk and rendered.
#[derive(Debug, Clone)]
pub struct GeneratedScene {
    /// Python class name, also used as the file stem.
    pub scene_name: String,
    /// Full Python source of the scene module.
    pub code: String,
    /// Whether [`FALLBACK_SCENE_BODY`] was substituted for model output.
    pub used_fallback: bool,
}

impl GeneratedScene {
    /// Wrap cleaned model output. Falls back when the body is empty.
    pub fn from_model_output(scene_name: String, raw: &str) -> Self {
        let body = clean_generated_code(raw);
        if body.is_empty() {
            return Self::fallback(scene_name);
        }
        let code = wrap_scene(&scene_name, &body);
        Self {
            scene_name,
            code,
            used_fallback: false,
        }
    }

    /// Build the fallback scene.
    pub fn fallback(scene_name: String) -> Self {
        let code = wrap_scene(&scene_name, FALLBACK_SCENE_BODY);
        Self {
            scene_name,
            code,
            used_fallback: true,
        }
    }

    /// File name of the scene source, e.g. `Scene_1a2b3c4d.py`.
    pub fn file_name(&self) -> String {
        format!("{}.py", self.scene_name)
    }

    /// File name of the rendered video, e.g. `Scene_1a2b3c4d.mp4`.
    pub fn video_file_name(&self) -> String {
        format!("{}.mp4", self.scene_name)
    }
}

/// Generate a fresh scene class name: `Scene_` plus 8 random hex chars.
pub fn new_scene_name() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("Scene_{}", &hex[..8])
}

/// Clean a model response into an indented `construct` body.
///
/// Drops blank lines, markdown fences, and `from manim import` lines. The
/// remaining lines keep their indentation relative to the least-indented
/// line and are shifted to [`BODY_INDENT`].
pub fn clean_generated_code(raw: &str) -> String {
    let kept: Vec<String> = raw
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty()
                && !FENCE_RE.is_match(trimmed)
                && !trimmed.starts_with("from manim import")
        })
        .map(expand_leading_tabs)
        .collect();

    let common = kept
        .iter()
        .map(|line| line.len() - line.trim_start_matches(' ').len())
        .min()
        .unwrap_or(0);

    kept.iter()
        .map(|line| format!("{BODY_INDENT}{}", line[common..].trim_end()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap an indented body in the fixed scene module template.
pub fn wrap_scene(scene_name: &str, body: &str) -> String {
    format!("\nfrom manim import *\n\nclass {scene_name}(Scene):\n    def construct(self):\n{body}\n")
}

/// Replace leading tabs with spaces so indentation widths are comparable.
fn expand_leading_tabs(line: &str) -> String {
    let rest = line.trim_start_matches([' ', '\t']);
    let leading = &line[..line.len() - rest.len()];
    let width: usize = leading
        .chars()
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum();
    format!("{}{rest}", " ".repeat(width))
}
