//! Exact check that a block plan can always be completed.
//!
//! The shuffler retries without limit, so a block with no valid ordering
//! never returns. Before generating, [`check_plan`] walks the plan and, for
//! every tail a block could be left with, confirms the next block still has
//! at least one valid ordering.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use crate::adjacency;
use crate::error::KernelError;
use crate::pattern::{Pattern, PatternCatalog};

/// Depth-first search over (remaining counts, last placed) with a memo of
/// states known to be dead.
struct Search<'a> {
    catalog: &'a PatternCatalog,
    end: Option<usize>,
    dead: HashSet<(Vec<usize>, Option<usize>)>,
}

impl Search<'_> {
    fn complete(
        &mut self,
        counts: &mut Vec<usize>,
        remaining: usize,
        last: Option<usize>,
    ) -> bool {
        if remaining == 0 {
            return self.end.is_none() || last == self.end;
        }

        // Copies of one pattern need another pattern between each pair.
        let most = counts.iter().copied().max().unwrap_or(0);
        if most > remaining - most + 1 {
            return false;
        }

        let state = (counts.clone(), last);
        if self.dead.contains(&state) {
            return false;
        }

        let prev = last.map(|i| self.catalog.pattern(i));
        let mut candidates: Vec<usize> = (0..counts.len())
            .filter(|&next| counts[next] > 0)
            .filter(|&next| remaining > 1 || self.end.map_or(true, |end| end == next))
            .filter(|&next| {
                adjacency::permits_after(prev.as_ref(), &self.catalog.pattern(next))
            })
            .collect();
        // Most plentiful first keeps the remainder balanced.
        candidates.sort_by_key(|&next| Reverse(counts[next]));

        for next in candidates {
            counts[next] -= 1;
            let found = self.complete(counts, remaining - 1, Some(next));
            counts[next] += 1;
            if found {
                return true;
            }
        }

        self.dead.insert(state);
        false
    }
}

/// Whether a block of `length` repetitions can follow `previous_tail`, and,
/// when `end` is given, finish on that pattern.
///
/// A tail or end outside the catalog makes the block infeasible.
pub fn is_feasible(
    catalog: &PatternCatalog,
    length: usize,
    previous_tail: Option<Pattern>,
    end: Option<Pattern>,
) -> bool {
    if length == 0 {
        return false;
    }

    let start = match previous_tail {
        Some(tail) => match catalog.index_of(&tail) {
            Some(i) => Some(i),
            None => return false,
        },
        None => None,
    };
    let end = match end {
        Some(end) => match catalog.index_of(&end) {
            Some(i) => Some(i),
            None => return false,
        },
        None => None,
    };

    let mut counts = vec![length; catalog.len()];
    let mut search = Search {
        catalog,
        end,
        dead: HashSet::new(),
    };
    search.complete(&mut counts, length * catalog.len(), start)
}

/// Verify that every block of a plan can be generated whatever tail the
/// preceding blocks happen to leave behind.
///
/// `lengths` are the block lengths in generation order, with the tail carried
/// across all of them.
pub fn check_plan(
    catalog: &PatternCatalog,
    lengths: impl IntoIterator<Item = usize>,
) -> Result<(), KernelError> {
    let mut cache: HashMap<(usize, Option<Pattern>, Option<Pattern>), bool> = HashMap::new();
    let mut feasible = |length: usize, tail: Option<Pattern>, end: Option<Pattern>| {
        *cache
            .entry((length, tail, end))
            .or_insert_with(|| is_feasible(catalog, length, tail, end))
    };

    let mut tails: Vec<Option<Pattern>> = vec![None];

    for length in lengths {
        if length == 0 {
            return Err(KernelError::ZeroLength);
        }

        let mut next_tails = Vec::new();
        for &tail in &tails {
            if !feasible(length, tail, None) {
                return Err(KernelError::Infeasible { length, after: tail });
            }
            for &end in catalog.patterns() {
                if !next_tails.contains(&Some(end)) && feasible(length, tail, Some(end)) {
                    next_tails.push(Some(end));
                }
            }
        }
        tails = next_tails;
    }

    Ok(())
}
