//! Static height estimates per element type.
//!
//! These are calibration numbers only. The pagination engine never places an
//! element by its estimate; the estimate is substituted when measuring fails
//! and is logged next to every measured height so the table can be tuned.
//!
//! Heights are pixels at `AgeRange::Middle` (scale 1.0).

use crate::layout::capacity::AgeRange;
use crate::layout::roles::normalize_type;

/// Used for any type not in the table.
pub const DEFAULT_ESTIMATE: f32 = 100.0;

#[rustfmt::skip]
static BASE_ESTIMATES: &[(&str, f32)] = &[
    // structure
    ("title", 60.0),          ("heading", 48.0),        ("subtitle", 40.0),
    ("section-title", 44.0),  ("divider", 24.0),        ("separator", 24.0),
    ("instructions", 50.0),   ("instruction", 50.0),
    // content
    ("body-text", 80.0),      ("paragraph", 80.0),      ("text", 80.0),
    ("tip-box", 90.0),        ("tip", 90.0),            ("warning-box", 90.0),
    ("warning", 90.0),        ("bullet-list", 120.0),   ("numbered-list", 120.0),
    ("list", 120.0),          ("image", 200.0),         ("image-placeholder", 200.0),
    // exercises
    ("fill-blank", 120.0),    ("fill-in-the-blank", 120.0),
    ("multiple-choice", 150.0), ("true-false", 110.0),  ("short-answer", 140.0),
    ("matching", 180.0),      ("table", 200.0),         ("word-bank", 70.0),
];

/// Looks up heights by element type, scaled for an age range.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeightEstimator {
    age_range: AgeRange,
}

impl HeightEstimator {
    pub fn new(age_range: AgeRange) -> Self {
        Self { age_range }
    }

    pub fn estimate(&self, element_type: &str) -> f32 {
        base_estimate(element_type) * self.age_range.height_scale()
    }
}

/// Unscaled table lookup with the default fallback.
pub fn base_estimate(element_type: &str) -> f32 {
    let tag = normalize_type(element_type);
    BASE_ESTIMATES
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, h)| *h)
        .unwrap_or(DEFAULT_ESTIMATE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::roles::{classify, Role};

    #[test]
    fn test_known_type_lookup() {
        assert_eq!(base_estimate("title"), 60.0);
        assert_eq!(base_estimate("Multiple_Choice"), 150.0);
    }

    #[test]
    fn test_unknown_type_uses_default() {
        assert_eq!(base_estimate("crossword"), DEFAULT_ESTIMATE);
        assert_eq!(base_estimate(""), DEFAULT_ESTIMATE);
    }

    #[test]
    fn test_estimator_scales_with_age_range() {
        let young = HeightEstimator::new(AgeRange::EarlyYears);
        let middle = HeightEstimator::new(AgeRange::Middle);
        assert_eq!(middle.estimate("title"), 60.0);
        assert!((young.estimate("title") - 81.0).abs() < 1e-3);
    }

    #[test]
    fn test_every_table_entry_is_classified() {
        // A tag with an estimate but no role would silently group as `other`.
        for (tag, _) in BASE_ESTIMATES {
            assert_ne!(classify(tag), Role::Other, "{tag} has no role");
        }
    }
}
