// Cross-cutting prompt fragments shared by every LLM call.
// Feature-specific prompts live next to the feature (see worksheet::prompts).

/// Instruction appended to prompts that must come back as bare JSON.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
