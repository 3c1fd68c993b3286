//! Exact in-memory backend for development and testing.

use crate::MembershipOracle;
use std::collections::HashSet;

/// Exact membership oracle backed by a `HashSet`.
///
/// Unbounded growth; dev/tests only. Unlike the bloom backend this never
/// reports a false positive, and it can report how many distinct keys it
/// holds, which tests use to assert on MUID-consumption side effects.
#[derive(Debug, Default)]
pub struct ExactOracle {
    seen: HashSet<Vec<u8>>,
}

impl ExactOracle {
    /// Create an empty oracle
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct keys recorded
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether no key has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl MembershipOracle for ExactOracle {
    fn check(&self, key: &[u8]) -> bool {
        self.seen.contains(key)
    }

    fn add(&mut self, key: &[u8]) {
        self.seen.insert(key.to_vec());
    }
}
