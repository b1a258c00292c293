//! Randomized construction of blocks with whole-attempt restarts.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::adjacency;
use crate::error::KernelError;
use crate::pattern::{Pattern, PatternCatalog};

/// A finished ordering in which every catalog pattern appears `length` times.
///
/// Never empty: blocks have a length of at least one over a non-empty catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    ordering: Vec<Pattern>,
    attempts: usize,
}

impl Block {
    pub fn ordering(&self) -> &[Pattern] {
        &self.ordering
    }

    /// Last pattern of the block, to be carried into the next one.
    pub fn tail(&self) -> Pattern {
        self.ordering[self.ordering.len() - 1]
    }

    /// Construction attempts used, including the successful one.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn len(&self) -> usize {
        self.ordering.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordering.is_empty()
    }

    pub fn into_parts(self) -> (Vec<Pattern>, Pattern) {
        let tail = self.tail();
        (self.ordering, tail)
    }
}

/// Hook for watching the retry loop.
pub trait AttemptObserver {
    /// An attempt ran out of permitted candidates after placing `placed`
    /// patterns, with `remaining` still unplaced.
    fn on_dead_end(&mut self, _attempt: usize, _placed: usize, _remaining: usize) {}

    /// A block of `len` patterns was completed on attempt number `attempts`.
    fn on_block_complete(&mut self, _attempts: usize, _len: usize) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl AttemptObserver for NoopObserver {}

/// Running totals over every block it has observed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AttemptCounter {
    pub blocks: usize,
    pub attempts: usize,
    pub dead_ends: usize,
}

impl AttemptObserver for AttemptCounter {
    fn on_dead_end(&mut self, _attempt: usize, _placed: usize, _remaining: usize) {
        self.dead_ends += 1;
    }

    fn on_block_complete(&mut self, attempts: usize, _len: usize) {
        self.blocks += 1;
        self.attempts += attempts;
    }
}

/// Builds blocks of catalog patterns that satisfy the adjacency rule.
///
/// Each attempt places patterns one at a time, choosing uniformly among the
/// remaining items that may follow the last placed pattern. If none may, the
/// attempt is thrown away and a new one starts from the full multiset.
/// Attempts are not capped.
pub struct ConstrainedShuffler<R = ChaCha8Rng> {
    catalog: PatternCatalog,
    rng: R,
}

impl ConstrainedShuffler<ChaCha8Rng> {
    /// Create a shuffler with a reproducible RNG.
    pub fn seeded(catalog: PatternCatalog, seed: u64) -> Self {
        Self::from_rng(catalog, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> ConstrainedShuffler<R> {
    pub fn from_rng(catalog: PatternCatalog, rng: R) -> Self {
        Self { catalog, rng }
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Generate a block with `length` copies of every catalog pattern.
    ///
    /// When `previous_tail` is given, the first pattern must be allowed to
    /// follow it.
    pub fn generate(
        &mut self,
        length: usize,
        previous_tail: Option<Pattern>,
    ) -> Result<Block, KernelError> {
        self.generate_observed(length, previous_tail, &mut NoopObserver)
    }

    /// [`generate`](Self::generate), reporting dead ends and completion to
    /// `observer`.
    pub fn generate_observed(
        &mut self,
        length: usize,
        previous_tail: Option<Pattern>,
        observer: &mut dyn AttemptObserver,
    ) -> Result<Block, KernelError> {
        if length == 0 {
            return Err(KernelError::ZeroLength);
        }

        let items: Vec<usize> = (0..length).flat_map(|_| 0..self.catalog.len()).collect();
        let total = items.len();
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.attempt(&items, previous_tail) {
                Ok(ordering) => {
                    trace!(attempt, len = total, "Block complete");
                    observer.on_block_complete(attempt, total);
                    return Ok(Block {
                        ordering,
                        attempts: attempt,
                    });
                }
                Err(placed) => {
                    debug!(
                        attempt,
                        placed,
                        remaining = total - placed,
                        "No valid successor, restarting block"
                    );
                    observer.on_dead_end(attempt, placed, total - placed);
                }
            }
        }
    }

    /// One construction attempt over catalog indices. Returns the ordering,
    /// or how many patterns were placed before the dead end.
    fn attempt(
        &mut self,
        items: &[usize],
        previous_tail: Option<Pattern>,
    ) -> Result<Vec<Pattern>, usize> {
        let mut remaining = items.to_vec();
        let mut ordering = Vec::with_capacity(items.len());
        let mut candidates = Vec::with_capacity(items.len());
        let mut prev = previous_tail;

        while !remaining.is_empty() {
            candidates.clear();
            candidates.extend((0..remaining.len()).filter(|&slot| {
                let next = self.catalog.pattern(remaining[slot]);
                adjacency::permits_after(prev.as_ref(), &next)
            }));

            let Some(&slot) = candidates.choose(&mut self.rng) else {
                return Err(ordering.len());
            };

            let pattern = self.catalog.pattern(remaining.swap_remove(slot));
            ordering.push(pattern);
            prev = Some(pattern);
        }

        Ok(ordering)
    }
}
