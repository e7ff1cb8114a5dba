// Shared prompt fragments. Each caller keeps its own prompts alongside it.

/// Instruction that keeps extracted facts tied to the source text.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Only extract skills, years and qualifications that are stated in \
    the provided text. Do NOT infer, interpolate, or invent details. \
    If the text does not support a value, leave the list empty or use 0.";
