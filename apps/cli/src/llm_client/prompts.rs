// Shared prompt fragments. Task-specific templates live in tailoring::prompts.

/// Appended to every prompt that produces resume prose.
pub const STYLE_INSTRUCTION: &str = "\
IMPORTANT: Never use em dashes (\u{2014}) and avoid contrast phrases like \
\"not only...but also\" or \"while...also\".";

/// Appended to prompts whose reply must be machine-parsed.
pub const JSON_ONLY_INSTRUCTION: &str = "\
Return ONLY the JSON value. Do NOT use markdown code fences. \
Do NOT include explanations.";

/// Placeholder used when an optional profile section is empty.
pub const NOT_PROVIDED: &str = "Not provided";
