// Shared prompt fragments. Section-specific prompt templates live in
// sections/prompts.rs alongside the controllers that use them.

/// System prompt for every generation call: plain resume copy, nothing else.
pub const RESUME_WRITER_SYSTEM: &str = "You are an expert resume writer. \
    Write concise, professional resume copy in plain text. \
    Respond with the requested text only. \
    Do NOT include a preamble, headings, explanations or apologies. \
    Do NOT use markdown code fences.";

/// Closing instruction appended to every section prompt.
pub const NO_PREAMBLE_INSTRUCTION: &str = "Do NOT include any additional text, preamble, \
    or formatting outside of the requested content.";
