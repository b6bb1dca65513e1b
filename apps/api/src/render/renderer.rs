//! Decomposes worksheet elements into surface fragments.
//!
//! Each element type reads a small, fixed set of `properties` keys. A type the
//! renderer does not know, or an element missing the key it needs, is a render
//! error; the measurement pass then falls back to the estimator for it.

use serde_json::Value;

use crate::layout::AgeRange;
use crate::layout::roles::normalize_type;
use crate::measure::{ElementRenderer, Fragment, MeasureError, RegionId, RenderSurface, TextStyle};
use crate::models::element::Element;

// Base type sizes in px at scale 1.0.
const TITLE_SIZE: f32 = 28.0;
const HEADING_SIZE: f32 = 22.0;
const SUBTITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 15.0;
const LINE_HEIGHT: f32 = 1.4;

const DIVIDER_HEIGHT: f32 = 18.0;
const BOX_PADDING: f32 = 12.0;
const LIST_INDENT: f32 = 24.0;
const IMAGE_HEIGHT: f32 = 200.0;
const ANSWER_LINE_HEIGHT: f32 = 28.0;
const ANSWER_LINES: u64 = 3;
/// About one page of ruled lines.
const MAX_ANSWER_LINES: u64 = 30;
/// Cap on list entries, questions, pairs, rows and cells drawn per element.
const MAX_ITEMS: usize = 200;
const TABLE_ROW_PADDING: f32 = 8.0;
const ITEM_GAP: f32 = 6.0;

/// Renders every known element type for one age range.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorksheetRenderer {
    age_range: AgeRange,
}

impl WorksheetRenderer {
    pub fn new(age_range: AgeRange) -> Self {
        Self { age_range }
    }

    fn style(&self, base_size: f32, indent: f32) -> TextStyle {
        TextStyle {
            font_size: base_size * self.age_range.height_scale(),
            line_height: LINE_HEIGHT,
            indent,
        }
    }
}

impl ElementRenderer for WorksheetRenderer {
    fn render_into(
        &self,
        element: &Element,
        surface: &mut dyn RenderSurface,
        region: RegionId,
    ) -> Result<(), MeasureError> {
        let props = &element.properties;
        let body = self.style(BODY_SIZE, 0.0);
        let mut out = Drawer {
            surface,
            region,
        };

        match normalize_type(&element.element_type).as_str() {
            "title" => out.text(require_text(props, "text")?, self.style(TITLE_SIZE, 0.0)),
            "heading" | "section-title" => {
                out.text(require_text(props, "text")?, self.style(HEADING_SIZE, 0.0))
            }
            "subtitle" => out.text(require_text(props, "text")?, self.style(SUBTITLE_SIZE, 0.0)),
            "divider" | "separator" => out.block(DIVIDER_HEIGHT),
            "instructions" | "instruction" | "body-text" | "paragraph" | "text" => {
                out.text(require_text(props, "text")?, body)
            }
            "tip-box" | "tip" | "warning-box" | "warning" => {
                out.block(BOX_PADDING)?;
                out.text(require_text(props, "text")?, self.style(BODY_SIZE, BOX_PADDING))?;
                out.block(BOX_PADDING)
            }
            "bullet-list" | "numbered-list" | "list" => {
                let items = require_strings(props, "items")?;
                out.items(&items, self.style(BODY_SIZE, LIST_INDENT), 0.0)
            }
            "image" | "image-placeholder" => {
                let height = props
                    .get("height")
                    .and_then(Value::as_f64)
                    .map(|h| h as f32)
                    .unwrap_or(IMAGE_HEIGHT);
                out.block(height)?;
                match str_prop(props, "caption") {
                    Some(caption) => out.text(caption, self.style(BODY_SIZE * 0.85, 0.0)),
                    None => Ok(()),
                }
            }
            "fill-blank" | "fill-in-the-blank" => match strings_prop(props, "sentences") {
                Some(sentences) => out.items(&sentences, body, ITEM_GAP),
                None => out.text(require_text(props, "text")?, body),
            },
            "multiple-choice" => self.render_multiple_choice(props, &mut out),
            "true-false" => {
                let statements = require_strings(props, "statements")?;
                out.items(&statements, body, ITEM_GAP)
            }
            "short-answer" => {
                out.text(require_text(props, "question")?, body)?;
                let lines = props
                    .get("lines")
                    .and_then(Value::as_u64)
                    .unwrap_or(ANSWER_LINES)
                    .min(MAX_ANSWER_LINES);
                out.block(lines as f32 * ANSWER_LINE_HEIGHT)
            }
            "matching" => self.render_matching(props, &mut out),
            "table" => self.render_table(props, &mut out),
            "word-bank" => {
                let words = require_strings(props, "words")?;
                out.block(BOX_PADDING)?;
                out.text(&words.join("    "), self.style(BODY_SIZE, BOX_PADDING))?;
                out.block(BOX_PADDING)
            }
            other => Err(MeasureError::Render(format!(
                "no renderer for element type '{other}'"
            ))),
        }
    }
}

impl WorksheetRenderer {
    fn render_multiple_choice(&self, props: &Value, out: &mut Drawer<'_>) -> Result<(), MeasureError> {
        let body = self.style(BODY_SIZE, 0.0);
        let option_style = self.style(BODY_SIZE, LIST_INDENT);

        if let Some(questions) = props.get("questions").and_then(Value::as_array) {
            if questions.is_empty() {
                return Err(MeasureError::Render("'questions' is empty".to_string()));
            }
            for question in questions.iter().take(MAX_ITEMS) {
                out.text(require_text(question, "question")?, body)?;
                let options = require_strings(question, "options")?;
                out.items(&options, option_style, 0.0)?;
                out.block(ITEM_GAP)?;
            }
            return Ok(());
        }

        out.text(require_text(props, "question")?, body)?;
        let options = require_strings(props, "options")?;
        out.items(&options, option_style, 0.0)
    }

    /// Two columns; each row is as tall as its longer side at half width.
    fn render_matching(&self, props: &Value, out: &mut Drawer<'_>) -> Result<(), MeasureError> {
        let pairs = props
            .get("pairs")
            .and_then(Value::as_array)
            .ok_or_else(|| missing("pairs"))?;
        let column = self.style(BODY_SIZE, out.surface.width() / 2.0);

        for pair in pairs.iter().take(MAX_ITEMS) {
            let left = str_prop(pair, "left").unwrap_or_default();
            let right = str_prop(pair, "right").unwrap_or_default();
            let longer = if right.len() > left.len() { right } else { left };
            out.text(longer, column)?;
            out.block(ITEM_GAP)?;
        }
        Ok(())
    }

    /// Each row is as tall as its longest cell at an even column width.
    fn render_table(&self, props: &Value, out: &mut Drawer<'_>) -> Result<(), MeasureError> {
        let rows = props
            .get("rows")
            .and_then(Value::as_array)
            .ok_or_else(|| missing("rows"))?;
        let columns = rows
            .iter()
            .take(MAX_ITEMS)
            .filter_map(Value::as_array)
            .map(|cells| cells.len().min(MAX_ITEMS))
            .max()
            .unwrap_or(1)
            .max(1);
        let width = out.surface.width();
        let cell_style = self.style(BODY_SIZE, width - width / columns as f32);

        for row in rows.iter().take(MAX_ITEMS) {
            let cells: Vec<String> = row
                .as_array()
                .map(|cells| cells.iter().take(MAX_ITEMS).map(cell_text).collect())
                .unwrap_or_default();
            let longest = cells.iter().max_by_key(|c| c.len()).map(String::as_str);
            match longest {
                Some(cell) if !cell.trim().is_empty() => out.text(cell, cell_style)?,
                _ => out.block(BODY_SIZE * LINE_HEIGHT * self.age_range.height_scale())?,
            }
            out.block(TABLE_ROW_PADDING)?;
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

struct Drawer<'s> {
    surface: &'s mut dyn RenderSurface,
    region: RegionId,
}

impl Drawer<'_> {
    fn text(&mut self, text: &str, style: TextStyle) -> Result<(), MeasureError> {
        self.surface.draw(self.region, Fragment::Text { text, style })
    }

    fn block(&mut self, height: f32) -> Result<(), MeasureError> {
        self.surface.draw(self.region, Fragment::Block { height })
    }

    fn items(&mut self, items: &[String], style: TextStyle, gap: f32) -> Result<(), MeasureError> {
        for item in items {
            self.text(item, style)?;
            if gap > 0.0 {
                self.block(gap)?;
            }
        }
        Ok(())
    }
}

fn missing(key: &str) -> MeasureError {
    MeasureError::Render(format!("missing '{key}' property"))
}

fn str_prop<'v>(props: &'v Value, key: &str) -> Option<&'v str> {
    props.get(key).and_then(Value::as_str)
}

fn require_text<'v>(props: &'v Value, key: &str) -> Result<&'v str, MeasureError> {
    str_prop(props, key).ok_or_else(|| missing(key))
}

fn strings_prop(props: &Value, key: &str) -> Option<Vec<String>> {
    props
        .get(key)
        .and_then(Value::as_array)
        .map(|values| values.iter().take(MAX_ITEMS).map(cell_text).collect())
}

fn require_strings(props: &Value, key: &str) -> Result<Vec<String>, MeasureError> {
    strings_prop(props, key).ok_or_else(|| missing(key))
}

/// Strings render as-is; other scalars by their JSON text.
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::font_metrics::FontFamily;
    use crate::render::surface::MetricSurface;
    use serde_json::json;

    async fn measure(renderer: WorksheetRenderer, element: Element) -> Result<f32, MeasureError> {
        let mut surface = MetricSurface::new(698.0, FontFamily::Sans);
        let region = surface.open_region()?;
        renderer.render_into(&element, &mut surface, region)?;
        surface.next_frame().await;
        surface.region_height(region)
    }

    #[tokio::test]
    async fn test_title_is_one_line() {
        let height = measure(
            WorksheetRenderer::default(),
            Element::new("title", json!({ "text": "Fractions" })),
        )
        .await
        .unwrap();
        assert!((height - TITLE_SIZE * LINE_HEIGHT).abs() < 1e-3);
    }

    #[tokio::test]
    async fn test_divider_is_fixed_height() {
        let height = measure(WorksheetRenderer::default(), Element::new("divider", json!({})))
            .await
            .unwrap();
        assert_eq!(height, DIVIDER_HEIGHT);
    }

    #[tokio::test]
    async fn test_younger_readers_render_taller() {
        let element = Element::new("body-text", json!({ "text": "Plants need sunlight. ".repeat(20) }));
        let middle = measure(WorksheetRenderer::new(AgeRange::Middle), element.clone())
            .await
            .unwrap();
        let early = measure(WorksheetRenderer::new(AgeRange::EarlyYears), element)
            .await
            .unwrap();
        assert!(early > middle);
    }

    #[tokio::test]
    async fn test_short_answer_lines() {
        let element = Element::new("short_answer", json!({ "question": "Why?", "lines": 5 }));
        let height = measure(WorksheetRenderer::default(), element).await.unwrap();
        let expected = BODY_SIZE * LINE_HEIGHT + 5.0 * ANSWER_LINE_HEIGHT;
        assert!((height - expected).abs() < 1e-3);
    }

    #[tokio::test]
    async fn test_short_answer_lines_are_capped() {
        let element = Element::new(
            "short-answer",
            json!({ "question": "Why?", "lines": 1_000_000_000_000u64 }),
        );
        let height = measure(WorksheetRenderer::default(), element).await.unwrap();
        let expected = BODY_SIZE * LINE_HEIGHT + MAX_ANSWER_LINES as f32 * ANSWER_LINE_HEIGHT;
        assert!((height - expected).abs() < 1e-3);
    }

    #[tokio::test]
    async fn test_long_lists_are_capped() {
        let r = WorksheetRenderer::default();
        let capped = measure(
            r,
            Element::new("true-false", json!({ "statements": vec!["Yes"; MAX_ITEMS] })),
        )
        .await
        .unwrap();
        let huge = measure(
            r,
            Element::new("true-false", json!({ "statements": vec!["Yes"; 50_000] })),
        )
        .await
        .unwrap();
        assert_eq!(huge, capped);

        let rows: Vec<Vec<&str>> = vec![vec!["a"; 300]; 300];
        let table = measure(r, Element::new("table", json!({ "rows": rows })))
            .await
            .unwrap();
        let row_height = BODY_SIZE * LINE_HEIGHT + TABLE_ROW_PADDING;
        assert!((table - MAX_ITEMS as f32 * row_height).abs() < 0.5);
    }

    #[tokio::test]
    async fn test_image_default_and_custom_height() {
        let default = measure(WorksheetRenderer::default(), Element::new("image", json!({})))
            .await
            .unwrap();
        assert_eq!(default, IMAGE_HEIGHT);

        let custom = measure(
            WorksheetRenderer::default(),
            Element::new("image", json!({ "height": 120.0 })),
        )
        .await
        .unwrap();
        assert_eq!(custom, 120.0);
    }

    #[tokio::test]
    async fn test_multiple_choice_both_shapes() {
        let single = Element::new(
            "multiple-choice",
            json!({ "question": "2 + 2?", "options": ["3", "4", "5"] }),
        );
        let many = Element::new(
            "multiple-choice",
            json!({ "questions": [
                { "question": "2 + 2?", "options": ["3", "4"] },
                { "question": "3 + 3?", "options": ["6", "7"] },
            ]}),
        );
        let r = WorksheetRenderer::default();
        let single_h = measure(r, single).await.unwrap();
        let many_h = measure(r, many).await.unwrap();
        assert!((single_h - 4.0 * BODY_SIZE * LINE_HEIGHT).abs() < 1e-3);
        assert!(many_h > single_h);
    }

    #[tokio::test]
    async fn test_table_rows_add_height() {
        let r = WorksheetRenderer::default();
        let two = measure(
            r,
            Element::new("table", json!({ "rows": [["a", "b"], ["c", "d"]] })),
        )
        .await
        .unwrap();
        let three = measure(
            r,
            Element::new("table", json!({ "rows": [["a", "b"], ["c", "d"], [1, null]] })),
        )
        .await
        .unwrap();
        assert!(three > two);
    }

    #[tokio::test]
    async fn test_unknown_type_fails() {
        let err = measure(WorksheetRenderer::default(), Element::new("hologram", json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, MeasureError::Render(_)));
    }

    #[tokio::test]
    async fn test_missing_property_fails() {
        for element in [
            Element::new("title", json!({})),
            Element::new("bullet-list", json!({ "items": "not a list" })),
            Element::new("matching", json!({})),
            Element::new("multiple-choice", json!({ "questions": [] })),
        ] {
            let result = measure(WorksheetRenderer::default(), element.clone()).await;
            assert!(result.is_err(), "{element:?} should fail");
        }
    }
}
