//! Word patterns and the catalog they are drawn from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::adjacency;
use crate::error::KernelError;

/// Number of key presses in a word pattern.
pub const PATTERN_LEN: usize = 4;

/// A word: four key presses in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern([u8; PATTERN_LEN]);

impl Pattern {
    pub const fn new(keys: [u8; PATTERN_LEN]) -> Self {
        Self(keys)
    }

    pub fn keys(&self) -> &[u8; PATTERN_LEN] {
        &self.0
    }

    /// First key press.
    pub fn first(&self) -> u8 {
        self.0[0]
    }

    /// Last key press.
    pub fn last(&self) -> u8 {
        self.0[PATTERN_LEN - 1]
    }
}

impl From<[u8; PATTERN_LEN]> for Pattern {
    fn from(keys: [u8; PATTERN_LEN]) -> Self {
        Self(keys)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "[{},{},{},{}]", a, b, c, d)
    }
}

/// Ordered set of distinct patterns.
///
/// A pattern's index is its identity; the experiment encodes it as that index
/// unless configured otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternCatalog {
    patterns: Vec<Pattern>,
}

impl PatternCatalog {
    /// Build a catalog, rejecting sets that no ordering could satisfy.
    ///
    /// Besides emptiness and duplicates, every pattern needs at least one
    /// other pattern allowed to follow it and one allowed to precede it.
    /// Without that, blocks of length two or more have no valid ordering and
    /// the shuffler would retry forever.
    pub fn new(patterns: Vec<Pattern>) -> Result<Self, KernelError> {
        if patterns.is_empty() {
            return Err(KernelError::EmptyCatalog);
        }

        for (i, pattern) in patterns.iter().enumerate() {
            if patterns[..i].contains(pattern) {
                return Err(KernelError::DuplicatePattern(*pattern));
            }
        }

        for pattern in &patterns {
            if !patterns.iter().any(|next| adjacency::permits(pattern, next)) {
                return Err(KernelError::NoSuccessor(*pattern));
            }
            if !patterns.iter().any(|prev| adjacency::permits(prev, pattern)) {
                return Err(KernelError::NoPredecessor(*pattern));
            }
        }

        Ok(Self { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn get(&self, index: usize) -> Option<Pattern> {
        self.patterns.get(index).copied()
    }

    /// Catalog index of a pattern, if it belongs to the catalog.
    pub fn index_of(&self, pattern: &Pattern) -> Option<usize> {
        self.patterns.iter().position(|p| p == pattern)
    }

    /// Patterns allowed to directly follow `pattern`, in catalog order.
    pub fn successors<'a>(&'a self, pattern: &'a Pattern) -> impl Iterator<Item = Pattern> + 'a {
        self.patterns
            .iter()
            .filter(move |next| adjacency::permits(pattern, next))
            .copied()
    }

    pub(crate) fn pattern(&self, index: usize) -> Pattern {
        self.patterns[index]
    }
}

impl Default for PatternCatalog {
    /// The six words of the online sequence-learning task.
    fn default() -> Self {
        Self {
            patterns: vec![
                Pattern::new([4, 1, 2, 4]),
                Pattern::new([1, 2, 4, 2]),
                Pattern::new([3, 4, 2, 4]),
                Pattern::new([2, 4, 2, 3]),
                Pattern::new([2, 3, 4, 1]),
                Pattern::new([3, 4, 1, 2]),
            ],
        }
    }
}
