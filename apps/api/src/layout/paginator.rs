//! Pagination Engine: Groups measured elements into pages.
//!
//! A single left-to-right greedy pass. Elements accumulate on the current page
//! while `height + margin` fits the available height. On overflow the move-back
//! rules may carry a trailing run of the current page forward together with the
//! overflowing element; otherwise the page is closed and the element starts a
//! new one.
//!
//! Invariants:
//! - output pages concatenate to the input, in order, with nothing dropped
//! - a page exceeds the available height only if it holds one oversized element
//! - placement uses measured heights only, never estimates
//!
//! The pass is pure and synchronous. Callers on an async runtime run it via
//! `tokio::task::spawn_blocking`.

use tracing::{debug, warn};

use crate::layout::capacity::CapacityModel;
use crate::layout::roles::{classify, Role};
use crate::layout::rules::decide_move_back;
use crate::models::element::MeasuredElement;

/// Tolerance for floating point accumulation in fit checks.
const FIT_EPSILON: f32 = 0.01;

/// One finished page before numbering and titling.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGroup {
    pub elements: Vec<MeasuredElement>,
    /// Sum of `measured_height + element_margin` over the page.
    pub height: f32,
}

impl PageGroup {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// True when the page is taller than `available`, which only happens for an
    /// oversized element placed alone.
    pub fn overflows(&self, available: f32) -> bool {
        self.height > available + FIT_EPSILON
    }
}

/// An element on the page being built, with its role and effective height.
struct Placed {
    element: MeasuredElement,
    role: Role,
    height: f32,
}

/// Splits `elements` into pages that fit `capacity`.
///
/// Empty input yields no pages.
pub fn paginate(elements: Vec<MeasuredElement>, capacity: &CapacityModel) -> Vec<PageGroup> {
    let available = capacity.available_height();
    let margin = capacity.element_margin;

    let mut pages: Vec<PageGroup> = Vec::new();
    let mut current: Vec<Placed> = Vec::new();
    let mut current_height = 0.0_f32;

    for element in elements {
        let role = classify(&element.element.element_type);
        if role == Role::Other {
            warn!(
                index = element.element_id,
                element_type = %element.element.element_type,
                "Unknown element type, grouping as content"
            );
        }

        let height = element.measured_height.max(0.0) + margin;
        let placed = Placed {
            element,
            role,
            height,
        };

        if fits(current_height + height, available) {
            current_height += height;
            current.push(placed);
            continue;
        }

        // Overflow: maybe carry a trailing run forward with the new element.
        let tail: Vec<Role> = current.iter().map(|p| p.role).collect();
        let carry = decide_move_back(&tail, role).and_then(|decision| {
            if decision.count >= current.len() {
                debug!(
                    rule = decision.rule,
                    "Move-back skipped: it would empty the current page"
                );
                return None;
            }
            let run_height: f32 = current[current.len() - decision.count..]
                .iter()
                .map(|p| p.height)
                .sum();
            if !fits(run_height + height, available) {
                debug!(
                    rule = decision.rule,
                    run = decision.count,
                    "Move-back skipped: moved run would not fit the next page"
                );
                return None;
            }
            Some((decision, run_height))
        });

        match carry {
            Some((decision, run_height)) => {
                let run = current.split_off(current.len() - decision.count);
                debug!(
                    page = pages.len() + 1,
                    rule = decision.rule,
                    moved = decision.count,
                    incoming = role.as_str(),
                    "Moving trailing run to next page"
                );
                close_page(&mut pages, std::mem::take(&mut current));
                current = run;
                current.push(placed);
                current_height = run_height + height;
            }
            None => {
                close_page(&mut pages, std::mem::take(&mut current));
                if height > available + FIT_EPSILON {
                    debug!(
                        index = placed.element.element_id,
                        height, available, "Oversized element placed alone"
                    );
                }
                current.push(placed);
                current_height = height;
            }
        }
    }

    close_page(&mut pages, current);
    pages
}

fn fits(height: f32, available: f32) -> bool {
    height <= available + FIT_EPSILON
}

/// Closes a page. Empty pages are never emitted.
fn close_page(pages: &mut Vec<PageGroup>, placed: Vec<Placed>) {
    if placed.is_empty() {
        return;
    }
    let height: f32 = placed.iter().map(|p| p.height).sum();
    debug!(
        page = pages.len() + 1,
        elements = placed.len(),
        height,
        "Page break"
    );
    pages.push(PageGroup {
        elements: placed.into_iter().map(|p| p.element).collect(),
        height,
    });
}
