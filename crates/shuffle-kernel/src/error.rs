//! Error types for catalog construction and block generation.

use thiserror::Error;

use crate::pattern::Pattern;

/// Errors raised by the kernel.
///
/// Dead ends during construction are not errors; they are retried inside
/// [`ConstrainedShuffler`](crate::ConstrainedShuffler).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    #[error("block length must be at least 1")]
    ZeroLength,

    #[error("pattern catalog is empty")]
    EmptyCatalog,

    #[error("pattern {0} appears more than once in the catalog")]
    DuplicatePattern(Pattern),

    #[error("pattern {0} has no permitted successor in the catalog")]
    NoSuccessor(Pattern),

    #[error("pattern {0} has no permitted predecessor in the catalog")]
    NoPredecessor(Pattern),

    /// No ordering exists for a block of this length after this tail, so the
    /// shuffler would never return.
    #[error("no valid block of length {length} can follow {}", describe_tail(.after))]
    Infeasible {
        length: usize,
        after: Option<Pattern>,
    },
}

fn describe_tail(tail: &Option<Pattern>) -> String {
    match tail {
        Some(pattern) => pattern.to_string(),
        None => "the start of a sequence".to_string(),
    }
}
