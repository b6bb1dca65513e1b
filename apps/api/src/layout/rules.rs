//! Move-back rules: Keep structural elements with the content they introduce.
//!
//! When an element overflows the current page, the engine asks these rules
//! whether a trailing run of the page should travel to the next page with it.
//! Each rule is a pure predicate over the roles at the tail of the current page
//! and the role of the incoming element, answering with the length of the run
//! to move (or `None`).
//!
//! Rules are tried in priority order. The first match names the trigger; the
//! run length is the longest run proposed by any matching rule, so a specific
//! multi-element pattern always beats "just the last element".

use crate::layout::roles::Role;

/// Returns how many trailing elements to move, or `None` for no move.
pub type RuleFn = fn(tail: &[Role], next: Role) -> Option<usize>;

pub struct MoveBackRule {
    pub name: &'static str,
    pub apply: RuleFn,
}

/// Priority-ordered rule table.
pub static MOVE_BACK_RULES: &[MoveBackRule] = &[
    MoveBackRule {
        name: "orphan_title",
        apply: orphan_title,
    },
    MoveBackRule {
        name: "orphan_divider_title",
        apply: orphan_divider_title,
    },
    MoveBackRule {
        name: "instructions_before_exercise",
        apply: instructions_before_exercise,
    },
    MoveBackRule {
        name: "open_title_group",
        apply: open_title_group,
    },
    MoveBackRule {
        name: "structural_tail",
        apply: structural_tail,
    },
];

/// Longest tail considered by `structural_tail`.
const STRUCTURAL_TAIL_MAX: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveBack {
    /// Name of the highest-priority rule that matched.
    pub rule: &'static str,
    /// Number of trailing elements to move. Always ≥ 1 and ≤ `tail.len()`.
    pub count: usize,
}

/// Evaluates the rule table against the current page tail.
pub fn decide_move_back(tail: &[Role], next: Role) -> Option<MoveBack> {
    let mut matches = MOVE_BACK_RULES
        .iter()
        .filter_map(|rule| (rule.apply)(tail, next).map(|count| (rule.name, count)));

    let (rule, first) = matches.next()?;
    let count = matches.fold(first, |longest, (_, count)| longest.max(count));

    Some(MoveBack {
        rule,
        count: count.min(tail.len()),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────────────────────────────────────

/// A title ends the page and content is next.
pub fn orphan_title(tail: &[Role], next: Role) -> Option<usize> {
    (tail.last() == Some(&Role::Title) && next.is_content()).then_some(1)
}

/// A divider followed by a title ends the page and content is next.
pub fn orphan_divider_title(tail: &[Role], next: Role) -> Option<usize> {
    (tail.ends_with(&[Role::Divider, Role::Title]) && next.is_content()).then_some(2)
}

/// Instructions end the page and the exercise they describe is next.
pub fn instructions_before_exercise(tail: &[Role], next: Role) -> Option<usize> {
    (tail.last() == Some(&Role::Instructions) && next == Role::Exercise).then_some(1)
}

/// The most recent title on the page has only dividers or instructions after
/// it, and real content or an exercise is next. Moves the title onward.
pub fn open_title_group(tail: &[Role], next: Role) -> Option<usize> {
    if !(next.is_content() || next == Role::Exercise) {
        return None;
    }

    let title_at = tail.iter().rposition(|r| *r == Role::Title)?;
    let after_title = &tail[title_at + 1..];

    after_title
        .iter()
        .all(|r| matches!(r, Role::Divider | Role::Instructions))
        .then_some(tail.len() - title_at)
}

/// Up to three trailing structural elements, including a title, with an
/// exercise next.
pub fn structural_tail(tail: &[Role], next: Role) -> Option<usize> {
    if next != Role::Exercise {
        return None;
    }

    let run = tail
        .iter()
        .rev()
        .take(STRUCTURAL_TAIL_MAX)
        .take_while(|r| r.is_structural())
        .count();
    let run_roles = &tail[tail.len() - run..];

    (run > 0 && run_roles.contains(&Role::Title)).then_some(run)
}
