//! Role Classifier: Maps an element type tag to the structural role used by
//! the pagination heuristics.
//!
//! Matching is case-insensitive and treats `_` and `-` alike, so `Fill_Blank`,
//! `fill-blank` and `FILL-BLANK` are the same tag. Anything not in the table is
//! `Other`, which groups like `Content`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Title,
    Divider,
    Instructions,
    /// Body text, tips, warnings, lists and images.
    Content,
    /// Anything the student answers: blanks, choices, tables, matching.
    Exercise,
    Other,
}

impl Role {
    /// True for roles that carry reading content. `Other` counts as content.
    pub fn is_content(self) -> bool {
        matches!(self, Role::Content | Role::Other)
    }

    /// True for roles that introduce what follows rather than stand alone.
    pub fn is_structural(self) -> bool {
        matches!(self, Role::Title | Role::Divider | Role::Instructions)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Title => "title",
            Role::Divider => "divider",
            Role::Instructions => "instructions",
            Role::Content => "content",
            Role::Exercise => "exercise",
            Role::Other => "other",
        }
    }
}

const TITLE_TYPES: &[&str] = &["title", "heading", "subtitle", "section-title"];

const DIVIDER_TYPES: &[&str] = &["divider", "separator"];

const INSTRUCTION_TYPES: &[&str] = &["instructions", "instruction"];

const CONTENT_TYPES: &[&str] = &[
    "body-text",
    "paragraph",
    "text",
    "tip-box",
    "tip",
    "warning-box",
    "warning",
    "bullet-list",
    "numbered-list",
    "list",
    "image",
    "image-placeholder",
];

const EXERCISE_TYPES: &[&str] = &[
    "fill-blank",
    "fill-in-the-blank",
    "multiple-choice",
    "true-false",
    "short-answer",
    "matching",
    "table",
    "word-bank",
];

/// Normalizes a raw type tag to lowercase kebab-case.
pub fn normalize_type(element_type: &str) -> String {
    element_type.trim().to_lowercase().replace('_', "-")
}

/// Classifies an element type tag. Total: unknown or empty tags are `Other`.
pub fn classify(element_type: &str) -> Role {
    let tag = normalize_type(element_type);
    let tag = tag.as_str();

    if TITLE_TYPES.contains(&tag) {
        Role::Title
    } else if DIVIDER_TYPES.contains(&tag) {
        Role::Divider
    } else if INSTRUCTION_TYPES.contains(&tag) {
        Role::Instructions
    } else if CONTENT_TYPES.contains(&tag) {
        Role::Content
    } else if EXERCISE_TYPES.contains(&tag) {
        Role::Exercise
    } else {
        Role::Other
    }
}
