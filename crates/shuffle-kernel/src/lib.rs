//! Shuffle Kernel: constrained random ordering of word patterns.
//!
//! A word pattern is a fixed sequence of four key presses. A block asks for
//! every pattern of a catalog to appear a given number of times, ordered so
//! that no pattern immediately repeats and no pattern starts on the key the
//! previous one ended on.
//!
//! Orderings are built by randomized construction with whole-attempt restarts:
//! a dead end discards the partial ordering and starts over. There is no
//! attempt cap; [`PatternCatalog::new`] rejects catalogs that could never be
//! ordered, and [`check_plan`] confirms a whole plan of blocks can be
//! completed before any generation starts.

pub mod adjacency;
pub mod error;
pub mod feasibility;
pub mod pattern;
pub mod shuffler;

pub use adjacency::{permits, violations, Violation, ViolationKind};
pub use error::KernelError;
pub use feasibility::{check_plan, is_feasible};
pub use pattern::{Pattern, PatternCatalog, PATTERN_LEN};
pub use shuffler::{AttemptCounter, AttemptObserver, Block, ConstrainedShuffler, NoopObserver};
