use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One atomic block of worksheet content, as produced by generation.
///
/// `properties` is opaque to the layout core: classification and height
/// estimation key only on `element_type`. A missing `type` deserializes to an
/// empty string and is classified as `other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type", default)]
    pub element_type: String,
    #[serde(default)]
    pub properties: Value,
}

impl Element {
    pub fn new(element_type: impl Into<String>, properties: Value) -> Self {
        Self {
            element_type: element_type.into(),
            properties,
        }
    }
}

/// An element paired with its real rendered height.
///
/// `element_id` is the element's index in the input list and only lives for the
/// duration of one pagination run.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredElement {
    pub element_id: usize,
    pub element: Element,
    pub measured_height: f32,
}

/// Where a measured height came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightSource {
    Measured,
    /// Rendering failed or timed out; the estimator value was substituted.
    Fallback,
}

/// Calibration record comparing the estimator against the measured height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub index: usize,
    pub element_type: String,
    pub estimated_height: f32,
    pub measured_height: f32,
    /// `measured_height - estimated_height`.
    pub delta: f32,
    pub source: HeightSource,
}

/// A finished page. Page numbers are 1-based and contiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub page_number: u32,
    pub title: String,
    pub elements: Vec<Element>,
    /// Sum of measured heights plus inter-element margins.
    pub used_height: f32,
    /// True only when a single element taller than the page sits alone on it.
    pub overflows: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationResult {
    pub pages: Vec<Page>,
    pub total_pages: usize,
    pub elements_per_page: Vec<usize>,
    pub measurement_log: Vec<MeasurementRecord>,
}

impl PaginationResult {
    /// Flattens all pages back into reading order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.pages.iter().flat_map(|p| p.elements.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_element_type_field_renamed() {
        let element: Element =
            serde_json::from_value(json!({"type": "title", "properties": {"text": "Fractions"}}))
                .unwrap();
        assert_eq!(element.element_type, "title");
        assert_eq!(element.properties["text"], "Fractions");

        let back = serde_json::to_value(&element).unwrap();
        assert_eq!(back["type"], "title");
    }

    #[test]
    fn test_element_missing_type_defaults_to_empty() {
        let element: Element = serde_json::from_value(json!({"properties": {}})).unwrap();
        assert!(element.element_type.is_empty());
    }

    #[test]
    fn test_height_source_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(HeightSource::Fallback).unwrap(),
            json!("fallback")
        );
    }
}
