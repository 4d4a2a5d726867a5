//! Model prompt template for Manim scene generation.

use crate::options::{Level, Style};
use crate::topic::{detect_topic, enrich_prompt};

/// Build the full generation prompt for an already-enriched concept.
///
/// The topic is detected on `concept` itself, so context sentences added
/// by enrichment can influence it.
pub fn build_contextual_prompt(concept: &str, level: Level, style: Style) -> String {
    let topic = detect_topic(concept);
    let style_guidance = style.guidance();
    let level_guidance = level.guidance();

    format!(
        r#"
You are an expert Python developer using the Manim library to visually explain math and science concepts.

### Task:
Write the Python code for the `construct(self)` method of a Manim Scene that teaches the following concept visually and clearly:

**Concept:** {concept}
**Topic:** {topic}
**Level:** {level}
**Style:** {style}

### Guidelines:
- Use clear and modern Manim constructs (Text, MathTex, always use `.scale()` for better visuals).
- Break down the concept step-by-step with animations (e.g., arrows, object movements, color highlighting).
- Annotate the scene with brief `Text()` elements to explain transitions.
- Make it friendly for a {level}-level audience.
- {style_guidance}
- {level_guidance}
- DO NOT include `import` statements or markdown fences.
- Ensure the animation contains **minimum 3 visual transitions**.
- Ensure code is syntactically correct and properly indented (4 spaces per level).

### Output:
Return only the body of the `construct(self)` method as valid Python code.
"#
    )
}

/// Enrich the raw user prompt and build the generation prompt in one step.
pub fn prompt_for_request(raw_prompt: &str, level: Level, style: Style) -> String {
    build_contextual_prompt(&enrich_prompt(raw_prompt), level, style)
}
