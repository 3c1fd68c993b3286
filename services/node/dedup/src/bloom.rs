//! Bloom-filter production backend for the membership oracle.

use crate::{DedupConfig, DedupError, MembershipOracle};
use bloomfilter::Bloom;
use tracing::debug;

/// Bloom-backed membership oracle.
///
/// The filter is sized once at construction from [`DedupConfig`] and only
/// grows denser; duplicate recognition degrades toward the configured
/// false-positive rate as the node approaches its expected capacity.
pub struct BloomOracle {
    filter: Bloom<[u8]>,
}

impl BloomOracle {
    /// Create an oracle sized for the given capacity and false-positive rate
    pub fn new(config: DedupConfig) -> Result<Self, DedupError> {
        config.validate()?;
        debug!(
            capacity = config.capacity,
            fp_rate = config.false_positive_rate,
            "sizing bloom dedup filter"
        );
        Ok(Self {
            filter: Bloom::new_for_fp_rate(config.capacity, config.false_positive_rate),
        })
    }

    /// Create an oracle with default sizing
    pub fn with_default_config() -> Self {
        Self {
            filter: Bloom::new_for_fp_rate(
                DedupConfig::default().capacity,
                DedupConfig::default().false_positive_rate,
            ),
        }
    }
}

impl MembershipOracle for BloomOracle {
    fn check(&self, key: &[u8]) -> bool {
        self.filter.check(key)
    }

    fn add(&mut self, key: &[u8]) {
        self.filter.set(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_key_then_seen() {
        let mut oracle = BloomOracle::with_default_config();

        assert!(!oracle.check(b"\x01\x02\x03\x04"));
        oracle.add(b"\x01\x02\x03\x04");
        assert!(oracle.check(b"\x01\x02\x03\x04"));

        // Re-adding is idempotent
        oracle.add(b"\x01\x02\x03\x04");
        assert!(oracle.check(b"\x01\x02\x03\x04"));
    }

    #[test]
    fn test_no_false_negatives() {
        let mut oracle = BloomOracle::new(DedupConfig {
            capacity: 1000,
            false_positive_rate: 0.01,
        })
        .unwrap();

        for i in 0u32..1000 {
            oracle.add(&i.to_be_bytes());
        }
        for i in 0u32..1000 {
            assert!(oracle.check(&i.to_be_bytes()));
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(BloomOracle::new(DedupConfig {
            capacity: 0,
            false_positive_rate: 0.01,
        })
        .is_err());

        assert!(BloomOracle::new(DedupConfig {
            capacity: 100,
            false_positive_rate: 1.5,
        })
        .is_err());

        assert!(BloomOracle::new(DedupConfig {
            capacity: 100,
            false_positive_rate: 0.0,
        })
        .is_err());
    }
}
