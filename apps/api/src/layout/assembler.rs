//! Page Assembler: Numbers and titles finished page groups.

use crate::layout::capacity::CapacityModel;
use crate::layout::paginator::PageGroup;
use crate::models::element::{MeasurementRecord, Page, PaginationResult};

/// Wraps page groups into `Page` records and builds the result.
///
/// Every page carries `title` when one is given, otherwise `"Page N"`. The
/// measurement log is forwarded unchanged.
pub fn assemble_pages(
    groups: Vec<PageGroup>,
    title: Option<&str>,
    capacity: &CapacityModel,
    measurement_log: Vec<MeasurementRecord>,
) -> PaginationResult {
    let available = capacity.available_height();
    let title = title.map(str::trim).filter(|t| !t.is_empty());

    let pages: Vec<Page> = groups
        .into_iter()
        .enumerate()
        .map(|(i, group)| {
            let page_number = i as u32 + 1;
            let overflows = group.overflows(available);
            Page {
                page_number,
                title: title
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Page {page_number}")),
                used_height: group.height,
                overflows,
                elements: group.elements.into_iter().map(|m| m.element).collect(),
            }
        })
        .collect();

    let elements_per_page = pages.iter().map(|p| p.elements.len()).collect();

    PaginationResult {
        total_pages: pages.len(),
        pages,
        elements_per_page,
        measurement_log,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::element::{Element, HeightSource, MeasuredElement};
    use serde_json::json;

    fn make_group(types: &[&str], height: f32) -> PageGroup {
        PageGroup {
            elements: types
                .iter()
                .enumerate()
                .map(|(i, ty)| MeasuredElement {
                    element_id: i,
                    element: Element::new(*ty, json!({})),
                    measured_height: height / types.len() as f32,
                })
                .collect(),
            height,
        }
    }

    fn make_capacity() -> CapacityModel {
        CapacityModel::new(500.0, 100.0)
            .with_padding(0.0, 0.0)
            .with_margin(0.0)
    }

    #[test]
    fn test_pages_numbered_from_one() {
        let groups = vec![
            make_group(&["title", "body-text"], 80.0),
            make_group(&["table"], 90.0),
        ];
        let result = assemble_pages(groups, None, &make_capacity(), vec![]);

        assert_eq!(result.total_pages, 2);
        assert_eq!(result.pages[0].page_number, 1);
        assert_eq!(result.pages[1].page_number, 2);
        assert_eq!(result.elements_per_page, vec![2, 1]);
    }

    #[test]
    fn test_generated_titles_when_none_given() {
        let groups = vec![make_group(&["title"], 10.0), make_group(&["table"], 10.0)];
        let result = assemble_pages(groups, Some("   "), &make_capacity(), vec![]);
        assert_eq!(result.pages[0].title, "Page 1");
        assert_eq!(result.pages[1].title, "Page 2");
    }

    #[test]
    fn test_explicit_title_on_every_page() {
        let groups = vec![make_group(&["title"], 10.0), make_group(&["table"], 10.0)];
        let result = assemble_pages(groups, Some("Fractions"), &make_capacity(), vec![]);
        assert!(result.pages.iter().all(|p| p.title == "Fractions"));
    }

    #[test]
    fn test_overflow_flag_and_height() {
        let groups = vec![make_group(&["image"], 150.0), make_group(&["table"], 100.0)];
        let result = assemble_pages(groups, None, &make_capacity(), vec![]);
        assert!(result.pages[0].overflows);
        assert!(!result.pages[1].overflows);
        assert_eq!(result.pages[1].used_height, 100.0);
    }

    #[test]
    fn test_empty_groups_give_empty_result() {
        let result = assemble_pages(vec![], Some("Empty"), &make_capacity(), vec![]);
        assert_eq!(result.total_pages, 0);
        assert!(result.pages.is_empty());
        assert!(result.elements_per_page.is_empty());
    }

    #[test]
    fn test_measurement_log_forwarded() {
        let log = vec![MeasurementRecord {
            index: 0,
            element_type: "title".to_string(),
            estimated_height: 60.0,
            measured_height: 52.0,
            delta: -8.0,
            source: HeightSource::Measured,
        }];
        let result = assemble_pages(vec![], None, &make_capacity(), log.clone());
        assert_eq!(result.measurement_log, log);
    }
}
