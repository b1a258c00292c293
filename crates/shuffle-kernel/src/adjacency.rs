//! The adjacency rule between consecutive patterns.

use serde::Serialize;

use crate::pattern::Pattern;

/// Whether `next` may directly follow `prev`.
///
/// A pattern may not follow itself, and may not start on the key `prev`
/// ended on.
pub fn permits(prev: &Pattern, next: &Pattern) -> bool {
    next != prev && next.first() != prev.last()
}

/// Like [`permits`], but with no predecessor every pattern is allowed.
pub fn permits_after(prev: Option<&Pattern>, next: &Pattern) -> bool {
    prev.map_or(true, |prev| permits(prev, next))
}

/// Which half of the rule a pair breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The same pattern twice in a row.
    Repeat,
    /// The next pattern starts on the key the previous one ended on.
    Seam,
}

/// A consecutive pair that breaks the adjacency rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Index in the ordering of the offending `next` pattern.
    pub position: usize,
    pub prev: Pattern,
    pub next: Pattern,
    pub kind: ViolationKind,
}

/// All rule violations in `ordering`, including the pair formed with
/// `previous_tail` when one is given.
pub fn violations(ordering: &[Pattern], previous_tail: Option<Pattern>) -> Vec<Violation> {
    let mut prev = previous_tail;
    let mut found = Vec::new();

    for (position, next) in ordering.iter().enumerate() {
        if let Some(prev) = prev {
            let kind = if *next == prev {
                Some(ViolationKind::Repeat)
            } else if next.first() == prev.last() {
                Some(ViolationKind::Seam)
            } else {
                None
            };
            if let Some(kind) = kind {
                found.push(Violation {
                    position,
                    prev,
                    next: *next,
                    kind,
                });
            }
        }
        prev = Some(*next);
    }

    found
}
