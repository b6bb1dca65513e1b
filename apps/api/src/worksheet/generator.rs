//! Worksheet Generation: Asks the LLM for an ordered element list.
//!
//! The output is validated before it reaches layout: an empty element list or
//! an element without a `type` triggers a retry.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::layout::AgeRange;
use crate::layout::roles::{classify, Role};
use crate::llm_client::LlmClient;
use crate::models::element::Element;
use crate::worksheet::prompts::{generation_system, GENERATION_PROMPT_TEMPLATE};

/// Max LLM retries when the draft fails validation.
const MAX_GENERATION_RETRIES: u32 = 2;

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub topic: String,
    /// Free-form audience label, e.g. `"6-8"` or `"secondary"`.
    #[serde(default)]
    pub age_range: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Raw LLM output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorksheetDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// Generates a draft worksheet for `topic`.
///
/// A caller-supplied title wins over the model's.
pub async fn generate_worksheet(
    llm: &LlmClient,
    request: &GenerateRequest,
    age_range: AgeRange,
) -> Result<WorksheetDraft, AppError> {
    let prompt = build_generation_prompt(&request.topic, age_range, request.title.as_deref());
    let system = generation_system();

    for attempt in 0..=MAX_GENERATION_RETRIES {
        let mut draft: WorksheetDraft = llm
            .call_json(&prompt, &system)
            .await
            .map_err(|e| AppError::Llm(format!("Generation LLM call failed: {e}")))?;

        match validate_draft(&draft) {
            Ok(()) => {
                if let Some(title) = request.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
                    draft.title = title.to_string();
                }
                let unknown = draft
                    .elements
                    .iter()
                    .filter(|e| classify(&e.element_type) == Role::Other)
                    .count();
                if unknown > 0 {
                    warn!(unknown, "Draft contains element types outside the vocabulary");
                }
                info!(
                    topic = %request.topic,
                    elements = draft.elements.len(),
                    attempt = attempt + 1,
                    "Worksheet draft generated"
                );
                return Ok(draft);
            }
            Err(reason) => warn!(
                "Generation attempt {}/{} rejected: {}, retrying",
                attempt + 1,
                MAX_GENERATION_RETRIES + 1,
                reason
            ),
        }
    }

    Err(AppError::Llm(format!(
        "Generation failed after {} attempts: the model did not return a usable element list",
        MAX_GENERATION_RETRIES + 1
    )))
}

/// Checks a draft is usable by layout.
pub fn validate_draft(draft: &WorksheetDraft) -> Result<(), String> {
    if draft.elements.is_empty() {
        return Err("element list is empty".to_string());
    }
    let untyped = draft
        .elements
        .iter()
        .filter(|e| e.element_type.trim().is_empty())
        .count();
    if untyped > 0 {
        return Err(format!("{untyped} elements have no type"));
    }
    Ok(())
}

fn build_generation_prompt(topic: &str, age_range: AgeRange, title: Option<&str>) -> String {
    let title_hint = match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => format!("Use this exact title: {title}"),
        None => "Choose a short, engaging title.".to_string(),
    };

    GENERATION_PROMPT_TEMPLATE
        .replace("{topic}", topic.trim())
        .replace("{age_label}", age_range.label())
        .replace("{title_hint}", &title_hint)
}
