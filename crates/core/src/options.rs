//! Animation request options and prompt validation.
//!
//! Options arrive as lowercase strings on the wire. Missing values fall
//! back to the defaults below; anything else outside the known set is a
//! [`CoreError::Validation`].

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum accepted prompt length in characters.
pub const MAX_PROMPT_LENGTH: usize = 2_000;

// ---------------------------------------------------------------------------
// Quality
// ---------------------------------------------------------------------------

/// Render quality passed to Manim as a `-q*` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    #[default]
    Medium,
    High,
}

impl Quality {
    pub const ALL: [Quality; 3] = [Quality::Low, Quality::Medium, Quality::High];

    /// Parse an optional wire value, defaulting to [`Quality::Medium`].
    pub fn parse(value: Option<&str>) -> Result<Self, CoreError> {
        parse_option(value, &Self::ALL, "quality")
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Low => "low",
            Quality::Medium => "medium",
            Quality::High => "high",
        }
    }

    /// Command-line flag understood by `manim`.
    pub fn flag(self) -> &'static str {
        match self {
            Quality::Low => "-ql",
            Quality::Medium => "-qm",
            Quality::High => "-qh",
        }
    }

    /// Sub-directory Manim writes this quality's video into, e.g. `480p15`.
    pub fn output_dir_name(self) -> &'static str {
        match self {
            Quality::Low => "480p15",
            Quality::Medium => "720p30",
            Quality::High => "1080p60",
        }
    }
}

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// Audience level the explanation is pitched at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Basic,
    #[default]
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Basic, Level::Intermediate, Level::Advanced];

    /// Parse an optional wire value, defaulting to [`Level::Intermediate`].
    pub fn parse(value: Option<&str>) -> Result<Self, CoreError> {
        parse_option(value, &Self::ALL, "level")
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Basic => "basic",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }

    /// Guideline sentence injected into the model prompt.
    pub fn guidance(self) -> &'static str {
        match self {
            Level::Basic => {
                "Keep explanations simple and intuitive. Use basic shapes and clear labels."
            }
            Level::Intermediate => {
                "Include some mathematical notation and intermediate-level concepts."
            }
            Level::Advanced => {
                "Incorporate complex mathematical notation and deeper theoretical concepts."
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

/// Presentation style of the animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Fun,
    Serious,
    #[default]
    Educational,
}

impl Style {
    pub const ALL: [Style; 3] = [Style::Fun, Style::Serious, Style::Educational];

    /// Parse an optional wire value, defaulting to [`Style::Educational`].
    pub fn parse(value: Option<&str>) -> Result<Self, CoreError> {
        parse_option(value, &Self::ALL, "style")
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Style::Fun => "fun",
            Style::Serious => "serious",
            Style::Educational => "educational",
        }
    }

    /// Guideline sentence injected into the model prompt.
    pub fn guidance(self) -> &'static str {
        match self {
            Style::Fun => {
                "Use playful colors and smooth transitions. Include some element of surprise or discovery."
            }
            Style::Serious => "Focus on precise mathematical accuracy and formal presentation.",
            Style::Educational => {
                "Break down concepts into clear, digestible steps with explanatory text."
            }
        }
    }
}

macro_rules! impl_display {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

impl_display!(Quality, Level, Style);

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Shared lookup for the three option enums: `None` (or blank) yields the
/// default, otherwise the trimmed, lowercased value must name a variant.
fn parse_option<T>(value: Option<&str>, all: &[T], field: &str) -> Result<T, CoreError>
where
    T: Copy + Default + fmt::Display,
{
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(T::default());
    };

    let wanted = raw.to_lowercase();
    all.iter()
        .copied()
        .find(|candidate| candidate.to_string() == wanted)
        .ok_or_else(|| {
            let valid: Vec<String> = all.iter().map(ToString::to_string).collect();
            CoreError::Validation(format!(
                "Invalid {field} '{raw}'. Expected one of: {}",
                valid.join(", ")
            ))
        })
}

/// Validate the free-form concept prompt: non-blank and within length limit.
pub fn validate_prompt(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation("Prompt must not be empty".to_string()));
    }
    let len = text.chars().count();
    if len > MAX_PROMPT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Prompt exceeds maximum length of {MAX_PROMPT_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A validated animation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationRequest {
    pub prompt: String,
    pub quality: Quality,
    pub level: Level,
    pub style: Style,
}

impl AnimationRequest {
    /// Validate the prompt and parse the three optional wire values.
    pub fn parse(
        prompt: &str,
        quality: Option<&str>,
        level: Option<&str>,
        style: Option<&str>,
    ) -> Result<Self, CoreError> {
        validate_prompt(prompt)?;
        Ok(Self {
            prompt: prompt.trim().to_string(),
            quality: Quality::parse(quality)?,
            level: Level::parse(level)?,
            style: Style::parse(style)?,
        })
    }
}
