//! Keyword tables for topic detection and prompt enrichment.
//!
//! Both lookups are a linear scan over an ordered table against the
//! lowercased prompt: the first keyword contained in the prompt wins.

/// Topic label used when no keyword matches.
pub const GENERAL_TOPIC: &str = "general";

/// Ordered `(topic, keywords)` table. Earlier rows take precedence.
pub const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "calculus",
        &["derivative", "integral", "limit", "differentiation", "integration"],
    ),
    (
        "algebra",
        &["equation", "factor", "solve", "polynomial", "quadratic"],
    ),
    (
        "geometry",
        &["circle", "triangle", "area", "pythagorean", "perimeter", "volume"],
    ),
    (
        "linear algebra",
        &["matrix", "vector", "eigenvalue", "determinant", "transformation"],
    ),
    (
        "statistics",
        &["probability", "distribution", "mean", "median", "standard deviation"],
    ),
    (
        "trigonometry",
        &["sine", "cosine", "tangent", "angle", "trigonometric"],
    ),
];

/// Ordered `(keyword, context sentence)` table for prompt enrichment.
pub const CONTEXT_KEYWORDS: &[(&str, &str)] = &[
    (
        "pythagorean",
        "The Pythagorean theorem states that in a right-angled triangle, the square of the hypotenuse is equal to the sum of the squares of the other two sides.",
    ),
    (
        "derivative",
        "The derivative of a function represents the rate at which the function value changes as its input changes. Visualize it as the slope of a tangent line.",
    ),
    (
        "matrix multiplication",
        "Matrix multiplication involves taking the dot product of rows and columns. Animate using two matrices and their product step-by-step.",
    ),
    (
        "integration",
        "Integration is the process of finding the area under a curve. Show the Riemann sum approximation and its convergence to the actual area.",
    ),
    (
        "eigenvalue",
        "Eigenvalues represent the scaling factor of eigenvectors in a linear transformation. Visualize how vectors are scaled but maintain their direction.",
    ),
    (
        "probability",
        "Probability measures the likelihood of an event occurring. Show the sample space and how probabilities are calculated.",
    ),
];

/// Detect the mathematical topic of a prompt, or [`GENERAL_TOPIC`].
pub fn detect_topic(prompt: &str) -> &'static str {
    let lowered = prompt.to_lowercase();
    TOPIC_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|(topic, _)| *topic)
        .unwrap_or(GENERAL_TOPIC)
}

/// Look up the context sentence for the first matching keyword, if any.
pub fn context_for(prompt: &str) -> Option<&'static str> {
    let lowered = prompt.to_lowercase();
    CONTEXT_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, context)| *context)
}

/// Append a canned context sentence to the prompt when a keyword matches.
///
/// Returns the prompt unchanged otherwise.
pub fn enrich_prompt(prompt: &str) -> String {
    match context_for(prompt) {
        Some(context) => format!("{prompt}. Context: {context}"),
        None => prompt.to_string(),
    }
}
