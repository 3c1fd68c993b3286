//! Duplicate-suppression membership oracle for duckwire.
//!
//! This crate provides the receiver- and sender-side duplicate recognition
//! for the mesh: a probabilistic membership set keyed by message unique IDs
//! (MUIDs). The send path inserts every freshly generated MUID, the relay
//! path inserts every MUID it accepts for forwarding, and both paths query
//! the set before acting. Keys are write-once; there is no removal.
//!
//! Backends:
//! - [`BloomOracle`]: production backend over a bloom filter with a tunable
//!   false-positive rate (space-bounded approximate set).
//! - [`ExactOracle`]: exact in-memory set for development and tests.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bloom;
pub mod exact;

use thiserror::Error;

/// Oracle construction errors
#[derive(Error, Debug)]
pub enum DedupError {
    /// Expected-item capacity must be nonzero
    #[error("dedup capacity must be nonzero")]
    ZeroCapacity,
    /// False-positive rate outside (0, 1)
    #[error("false-positive rate out of range: {0}")]
    FalsePositiveRate(f64),
}

/// Sizing parameters for the production oracle backend
#[derive(Clone, Copy, Debug)]
pub struct DedupConfig {
    /// Expected number of distinct MUIDs over the node's session
    pub capacity: usize,
    /// Target false-positive rate for membership queries
    pub false_positive_rate: f64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            false_positive_rate: 0.01,
        }
    }
}

impl DedupConfig {
    /// Validate the sizing parameters
    pub fn validate(&self) -> Result<(), DedupError> {
        if self.capacity == 0 {
            return Err(DedupError::ZeroCapacity);
        }
        if !(self.false_positive_rate > 0.0 && self.false_positive_rate < 1.0) {
            return Err(DedupError::FalsePositiveRate(self.false_positive_rate));
        }
        Ok(())
    }
}

/// Membership oracle for MUID-keyed duplicate suppression.
///
/// `add` takes `&mut self` so a check-then-add sequence holds one exclusive
/// borrow across both calls; concurrent send/receive handling must keep that
/// single-writer discipline.
pub trait MembershipOracle {
    /// Report whether a key has been seen before. No mutation.
    ///
    /// A bloom-backed oracle may return a false positive, bounded by its
    /// configured rate; it never returns a false negative.
    fn check(&self, key: &[u8]) -> bool;

    /// Record a key as seen. Idempotent; keys are never removed.
    fn add(&mut self, key: &[u8]);
}

pub use bloom::BloomOracle;
pub use exact::ExactOracle;
