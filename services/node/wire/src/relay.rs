//! Inbound relay gate.
//!
//! Given a raw received frame, decide whether this node should re-broadcast
//! it. The decision is purely MUID-based: content integrity is the
//! receiver's/application's concern, so a corrupted frame with a fresh MUID
//! is forwarded as-is.

use crate::frame::Frame;
use crate::FrameError;
use duck_dedup::MembershipOracle;
use tracing::{debug, info};

/// Outcome of the relay gate
#[derive(Debug, PartialEq, Eq)]
pub enum RelayDecision {
    /// Fresh MUID: forward this frame, hop count already incremented
    Forward(Frame),
    /// MUID already seen: drop, do not re-broadcast
    Duplicate,
}

/// Gate a received frame for relaying.
///
/// A frame whose MUID the oracle already knows yields
/// [`RelayDecision::Duplicate`] and leaves the oracle untouched. Otherwise
/// the MUID is registered, the input is adopted as the working frame, and
/// its hop count is incremented in place.
pub fn prepare_for_relaying(
    oracle: &mut dyn MembershipOracle,
    raw: &[u8],
) -> Result<RelayDecision, FrameError> {
    let mut frame = Frame::from_bytes(raw)?;
    let muid = frame.muid();

    if oracle.check(muid.as_bytes()) {
        debug!(muid = %muid, "packet already seen, no relay");
        return Ok(RelayDecision::Duplicate);
    }
    oracle.add(muid.as_bytes());

    let hops = frame.increment_hops();
    info!(muid = %muid, hops, "relaying packet");
    Ok(RelayDecision::Forward(frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{HEADER_LENGTH, HOP_COUNT_POS};
    use duck_dedup::ExactOracle;

    fn raw_frame(hops: u8) -> Vec<u8> {
        let mut raw = Vec::new();
        raw.extend_from_slice(&[0x11; 8]); // source
        raw.extend_from_slice(&[0xFF; 8]); // destination
        raw.extend_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD]); // muid
        raw.push(0x12); // topic
        raw.push(0x03); // duck type
        raw.push(hops);
        raw.extend_from_slice(&crc32fast::hash(b"hi").to_be_bytes());
        raw.extend_from_slice(b"hi");
        raw
    }

    #[test]
    fn test_fresh_muid_is_forwarded() {
        let mut oracle = ExactOracle::new();
        let raw = raw_frame(2);

        let decision = prepare_for_relaying(&mut oracle, &raw).unwrap();
        let frame = match decision {
            RelayDecision::Forward(frame) => frame,
            RelayDecision::Duplicate => panic!("expected forward"),
        };

        assert_eq!(frame.hop_count(), 3);
        assert!(oracle.check(&[0xAA, 0xBB, 0xCC, 0xDD]));

        // Only the hop count byte changed
        let mut expected = raw;
        expected[HOP_COUNT_POS] = 3;
        assert_eq!(frame.as_bytes(), expected);
    }

    #[test]
    fn test_duplicate_muid_is_dropped() {
        let mut oracle = ExactOracle::new();
        oracle.add(&[0xAA, 0xBB, 0xCC, 0xDD]);

        let decision = prepare_for_relaying(&mut oracle, &raw_frame(2)).unwrap();
        assert_eq!(decision, RelayDecision::Duplicate);
        assert_eq!(oracle.len(), 1);
    }

    #[test]
    fn test_relaying_twice_drops_second() {
        let mut oracle = ExactOracle::new();
        let raw = raw_frame(0);

        assert!(matches!(
            prepare_for_relaying(&mut oracle, &raw).unwrap(),
            RelayDecision::Forward(_)
        ));
        assert_eq!(
            prepare_for_relaying(&mut oracle, &raw).unwrap(),
            RelayDecision::Duplicate
        );
    }

    #[test]
    fn test_short_input_rejected() {
        let mut oracle = ExactOracle::new();
        let err = prepare_for_relaying(&mut oracle, &[0u8; HEADER_LENGTH - 1]).unwrap_err();
        assert_eq!(err, FrameError::Incomplete);
        assert!(oracle.is_empty());
    }

    #[test]
    fn test_corrupt_crc_still_forwarded() {
        let mut oracle = ExactOracle::new();
        let mut raw = raw_frame(1);
        let crc_pos = crate::layout::DATA_CRC_POS;
        raw[crc_pos] ^= 0xFF; // integrity checking is not the gate's job

        assert!(matches!(
            prepare_for_relaying(&mut oracle, &raw).unwrap(),
            RelayDecision::Forward(_)
        ));
    }

    #[test]
    fn test_hop_count_saturates_on_relay() {
        let mut oracle = ExactOracle::new();
        let raw = raw_frame(0xFF);

        let decision = prepare_for_relaying(&mut oracle, &raw).unwrap();
        match decision {
            RelayDecision::Forward(frame) => assert_eq!(frame.hop_count(), 0xFF),
            RelayDecision::Duplicate => panic!("expected forward"),
        }
    }
}
