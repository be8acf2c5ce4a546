// Prompt fragments shared by every flow that asks for structured output.
// Flow-specific templates live in planning/prompts.rs.

/// Appended to every prompt that expects a JSON object back.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Return ONLY the raw, perfectly formatted JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt that expects a comma-separated list back.
pub const COMMA_LIST_INSTRUCTION: &str = "\
    Return the answer as a simple comma-separated list on a single line. \
    Exclude any numbering, quotes, or extra text.";

/// Content quality rules shared by website and presentation generation.
pub const CONTENT_QUALITY_INSTRUCTION: &str = "\
    All generated text must be well-written, professional, and tailored to the request. \
    Do NOT use placeholder text such as \"Lorem Ipsum\".";
