// Prompt constants for worksheet generation.
// Reuses the JSON-only fragment from llm_client::prompts.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// Persona for worksheet generation; `generation_system` adds the JSON-only rules.
pub const GENERATION_ROLE: &str = "You are an experienced teacher who writes printable \
    classroom worksheets. You write clear, age-appropriate content and exercises.";

/// System prompt for worksheet generation.
pub fn generation_system() -> String {
    format!("{GENERATION_ROLE} {JSON_ONLY_SYSTEM}")
}

/// Generation prompt template.
/// Replace `{topic}`, `{age_label}`, `{title_hint}` before sending.
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"Write a worksheet about: {topic}

Audience: {age_label}
{title_hint}

Return a JSON object with this EXACT schema:
{
  "title": "Worksheet title",
  "elements": [
    {"type": "title", "properties": {"text": "..."}}
  ]
}

Allowed element types and their properties:
- "title", "heading", "subtitle": {"text"}
- "instructions": {"text"}  (place directly before the exercise it explains)
- "body-text": {"text"}
- "tip-box", "warning-box": {"text"}
- "bullet-list", "numbered-list": {"items": ["..."]}
- "divider": {}
- "image": {"caption", "height"}  (height in px, 120-320)
- "fill-blank": {"sentences": ["The sun is a ____."]}
- "multiple-choice": {"question", "options": ["..."]}
- "true-false": {"statements": ["..."]}
- "short-answer": {"question", "lines": 3}
- "matching": {"pairs": [{"left": "...", "right": "..."}]}
- "table": {"rows": [["header", "header"], ["cell", "cell"]]}
- "word-bank": {"words": ["..."]}

Rules:
- Start with one "title" element.
- Group related content under a "heading"; use "divider" between major sections.
- Every exercise gets an "instructions" element right before it.
- Keep sentence length and vocabulary suitable for the audience.
- Produce between 8 and 30 elements in reading order."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_system_states_json_rules_once() {
        let system = generation_system();
        assert!(system.starts_with(GENERATION_ROLE));
        assert!(system.ends_with(JSON_ONLY_SYSTEM));
        assert_eq!(system.matches("valid JSON only").count(), 1);
        assert!(!GENERATION_PROMPT_TEMPLATE.contains("valid JSON only"));
    }
}
