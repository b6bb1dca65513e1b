//! Capacity Model: Page geometry used by the pagination engine.
//!
//! All lengths are CSS pixels at 96 dpi. The default page is A4
//! (794 × 1123 px) with 48 px top/bottom padding and a 16 px gap between
//! elements.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Age range (content mode)
// ────────────────────────────────────────────────────────────────────────────

/// The audience a worksheet is written for.
///
/// Younger readers get larger type, so the same element is taller. The scale
/// applies to estimated heights and to the font sizes the metric renderer uses;
/// measured heights are taken as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeRange {
    /// Ages 3–5.
    EarlyYears,
    /// Ages 6–8.
    Primary,
    /// Ages 9–11.
    #[default]
    Middle,
    /// Ages 12–14.
    Secondary,
    /// Ages 15–18.
    Senior,
    Adult,
}

impl AgeRange {
    pub fn height_scale(self) -> f32 {
        match self {
            AgeRange::EarlyYears => 1.35,
            AgeRange::Primary => 1.2,
            AgeRange::Middle => 1.0,
            AgeRange::Secondary => 0.95,
            AgeRange::Senior | AgeRange::Adult => 0.9,
        }
    }

    /// Human-readable audience, as used in generation prompts.
    pub fn label(self) -> &'static str {
        match self {
            AgeRange::EarlyYears => "ages 3-5",
            AgeRange::Primary => "ages 6-8",
            AgeRange::Middle => "ages 9-11",
            AgeRange::Secondary => "ages 12-14",
            AgeRange::Senior => "ages 15-18",
            AgeRange::Adult => "adult learners",
        }
    }

    /// Parses labels such as `"6-8"`, `"ages 9-11"`, `"primary"` or `"adult"`.
    /// Unrecognized labels fall back to the default range.
    pub fn parse_label(label: &str) -> Self {
        let label = label.trim().to_lowercase().replace(['–', '_'], "-");
        let label = label.trim_start_matches("ages").trim();

        match label {
            "3-5" | "early-years" | "preschool" => AgeRange::EarlyYears,
            "6-8" | "primary" => AgeRange::Primary,
            "9-11" | "middle" => AgeRange::Middle,
            "12-14" | "secondary" => AgeRange::Secondary,
            "15-18" | "senior" => AgeRange::Senior,
            "adult" | "18+" => AgeRange::Adult,
            _ => AgeRange::default(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Capacity model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityModel {
    pub page_width: f32,
    pub page_height: f32,
    pub padding_top: f32,
    pub padding_bottom: f32,
    /// Added to every element's height during accumulation.
    pub element_margin: f32,
    pub age_range: AgeRange,
}

impl CapacityModel {
    pub fn new(page_width: f32, page_height: f32) -> Self {
        Self {
            page_width,
            page_height,
            ..default_capacity()
        }
    }

    pub fn with_padding(mut self, top: f32, bottom: f32) -> Self {
        self.padding_top = top;
        self.padding_bottom = bottom;
        self
    }

    pub fn with_margin(mut self, element_margin: f32) -> Self {
        self.element_margin = element_margin;
        self
    }

    /// Vertical space left for content once padding is removed. Never negative.
    pub fn available_height(&self) -> f32 {
        (self.page_height - self.padding_top - self.padding_bottom).max(0.0)
    }

    pub fn set_age_range(&mut self, age_range: AgeRange) {
        self.age_range = age_range;
    }

    pub fn height_scale(&self) -> f32 {
        self.age_range.height_scale()
    }
}

impl Default for CapacityModel {
    fn default() -> Self {
        default_capacity()
    }
}

/// A4 portrait at 96 dpi, 48 px vertical padding, 16 px element gap.
pub fn default_capacity() -> CapacityModel {
    CapacityModel {
        page_width: 794.0,
        page_height: 1123.0,
        padding_top: 48.0,
        padding_bottom: 48.0,
        element_margin: 16.0,
        age_range: AgeRange::Middle,
    }
}
