//! Outbound frame assembly.
//!
//! The builder turns an application payload into a finished wire frame:
//! it reserves a fresh MUID against the membership oracle, computes the
//! data CRC (over the ciphertext when encryption is active), and lays the
//! header fields down in wire order with hop count zero.

use crate::crypto::{Encryptor, NoCrypto};
use crate::frame::Frame;
use crate::layout::{DeviceId, DuckType, Muid, MAX_DATA_LENGTH, MUID_LENGTH, PACKET_LENGTH};
use crate::FrameError;
use bytes::{BufMut, BytesMut};
use duck_dedup::MembershipOracle;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, warn};

/// Default bound on MUID generation attempts before reporting the dedup
/// filter as saturated
pub const MAX_MUID_ATTEMPTS: usize = 64;

/// Builder for outbound frames
pub struct FrameBuilder {
    source: DeviceId,
    crypto: Box<dyn Encryptor + Send>,
    rng: Box<dyn RngCore + Send>,
    max_muid_attempts: usize,
}

impl FrameBuilder {
    /// Create a builder for the given source device, with encryption off
    /// and an entropy-seeded random source
    pub fn new(source: DeviceId) -> Self {
        Self {
            source,
            crypto: Box::new(NoCrypto),
            rng: Box::new(StdRng::from_entropy()),
            max_muid_attempts: MAX_MUID_ATTEMPTS,
        }
    }

    /// Install an encryption capability
    pub fn with_encryptor(mut self, crypto: Box<dyn Encryptor + Send>) -> Self {
        self.crypto = crypto;
        self
    }

    /// Install a random source (tests use seeded rngs)
    pub fn with_rng(mut self, rng: Box<dyn RngCore + Send>) -> Self {
        self.rng = rng;
        self
    }

    /// Override the MUID retry bound
    pub fn with_muid_attempts(mut self, attempts: usize) -> Self {
        self.max_muid_attempts = attempts;
        self
    }

    /// Source device this builder stamps into every frame
    pub fn source(&self) -> DeviceId {
        self.source
    }

    /// Assemble a frame for sending.
    ///
    /// Fails with `SizeInvalid` before any state mutation if the payload is
    /// empty or exceeds [`MAX_DATA_LENGTH`]; in particular no MUID is drawn
    /// from the oracle. On success the frame's MUID is registered in the
    /// oracle, so a later relay of the same message by another node is
    /// recognized as already seen.
    pub fn build(
        &mut self,
        oracle: &mut dyn MembershipOracle,
        destination: DeviceId,
        duck_type: DuckType,
        topic: u8,
        payload: &[u8],
    ) -> Result<Frame, FrameError> {
        if payload.is_empty() || payload.len() > MAX_DATA_LENGTH {
            return Err(FrameError::SizeInvalid(payload.len()));
        }

        let muid = self.next_muid(oracle)?;

        // CRC covers exactly the bytes that go on the wire
        let data = if self.crypto.enabled() {
            self.crypto.encrypt(payload)
        } else {
            payload.to_vec()
        };
        if data.len() > MAX_DATA_LENGTH {
            return Err(FrameError::SizeInvalid(data.len()));
        }
        let crc = crc32fast::hash(&data);

        let mut buf = BytesMut::with_capacity(PACKET_LENGTH);
        buf.put_slice(self.source.as_bytes());
        buf.put_slice(destination.as_bytes());
        buf.put_slice(muid.as_bytes());
        buf.put_u8(topic);
        buf.put_u8(duck_type as u8);
        buf.put_u8(0); // hop count
        buf.put_u32(crc);
        buf.put_slice(&data);

        debug!(
            muid = %muid,
            destination = %destination,
            topic,
            data_len = data.len(),
            encrypted = self.crypto.enabled(),
            "built frame"
        );

        Ok(Frame::from_buffer(buf))
    }

    /// Draw random MUIDs until the oracle reports one unseen, then register
    /// it. Bounded so a saturated filter surfaces as an error instead of a
    /// livelock.
    fn next_muid(&mut self, oracle: &mut dyn MembershipOracle) -> Result<Muid, FrameError> {
        for _ in 0..self.max_muid_attempts {
            let mut id = [0u8; MUID_LENGTH];
            self.rng.fill_bytes(&mut id);
            if !oracle.check(&id) {
                oracle.add(&id);
                return Ok(Muid(id));
            }
        }
        warn!(
            attempts = self.max_muid_attempts,
            "dedup filter saturated while generating muid"
        );
        Err(FrameError::OracleSaturated(self.max_muid_attempts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{DATA_POS, HEADER_LENGTH};
    use duck_dedup::ExactOracle;
    use rand::rngs::SmallRng;

    fn test_builder() -> FrameBuilder {
        FrameBuilder::new(DeviceId([0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]))
            .with_rng(Box::new(SmallRng::seed_from_u64(7)))
    }

    #[test]
    fn test_build_layout() {
        let mut oracle = ExactOracle::new();
        let payload = [0xDE, 0xAD, 0xBE, 0xEF];

        let frame = test_builder()
            .build(
                &mut oracle,
                DeviceId::BROADCAST,
                DuckType::Papa,
                0x02,
                &payload,
            )
            .unwrap();

        assert_eq!(
            frame.source_id(),
            DeviceId([0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08])
        );
        assert_eq!(frame.destination_id(), DeviceId::BROADCAST);
        assert_eq!(frame.topic(), 0x02);
        assert_eq!(frame.duck_type(), DuckType::Papa as u8);
        assert_eq!(frame.hop_count(), 0);
        assert_eq!(frame.data_crc(), crc32fast::hash(&payload));
        assert_eq!(frame.data(), payload);
        assert_eq!(frame.len(), HEADER_LENGTH + payload.len());

        // CRC bytes land big-endian at the fixed offset
        let raw = frame.as_bytes();
        assert_eq!(
            &raw[DATA_POS - 4..DATA_POS],
            crc32fast::hash(&payload).to_be_bytes()
        );
    }

    #[test]
    fn test_build_registers_muid() {
        let mut oracle = ExactOracle::new();

        let frame = test_builder()
            .build(&mut oracle, DeviceId::BROADCAST, DuckType::Mama, 0x10, b"x")
            .unwrap();

        assert_eq!(oracle.len(), 1);
        assert!(oracle.check(frame.muid().as_bytes()));
    }

    #[test]
    fn test_rejects_empty_payload_without_consuming_muid() {
        let mut oracle = ExactOracle::new();

        let err = test_builder()
            .build(&mut oracle, DeviceId::BROADCAST, DuckType::Mama, 0x10, b"")
            .unwrap_err();

        assert_eq!(err, FrameError::SizeInvalid(0));
        assert!(oracle.is_empty());
    }

    #[test]
    fn test_rejects_oversized_payload() {
        let mut oracle = ExactOracle::new();
        let payload = vec![0u8; MAX_DATA_LENGTH + 1];

        let err = test_builder()
            .build(
                &mut oracle,
                DeviceId::BROADCAST,
                DuckType::Mama,
                0x10,
                &payload,
            )
            .unwrap_err();

        assert_eq!(err, FrameError::SizeInvalid(MAX_DATA_LENGTH + 1));
        assert!(oracle.is_empty());
    }

    #[test]
    fn test_max_payload_accepted() {
        let mut oracle = ExactOracle::new();
        let payload = vec![0x42u8; MAX_DATA_LENGTH];

        let frame = test_builder()
            .build(
                &mut oracle,
                DeviceId::BROADCAST,
                DuckType::Mama,
                0x10,
                &payload,
            )
            .unwrap();

        assert_eq!(frame.len(), PACKET_LENGTH);
    }

    #[test]
    fn test_saturated_oracle_bounds_retries() {
        struct AlwaysSeen;
        impl MembershipOracle for AlwaysSeen {
            fn check(&self, _key: &[u8]) -> bool {
                true
            }
            fn add(&mut self, _key: &[u8]) {}
        }

        let mut oracle = AlwaysSeen;
        let err = test_builder()
            .with_muid_attempts(8)
            .build(&mut oracle, DeviceId::BROADCAST, DuckType::Mama, 0x10, b"x")
            .unwrap_err();

        assert_eq!(err, FrameError::OracleSaturated(8));
    }

    #[test]
    fn test_muid_retries_past_collisions() {
        // Pre-seed the oracle with the first MUID the seeded rng will draw,
        // forcing one retry.
        let mut probe_rng = SmallRng::seed_from_u64(7);
        let mut first = [0u8; MUID_LENGTH];
        probe_rng.fill_bytes(&mut first);

        let mut oracle = ExactOracle::new();
        oracle.add(&first);

        let frame = test_builder()
            .build(&mut oracle, DeviceId::BROADCAST, DuckType::Mama, 0x10, b"x")
            .unwrap();

        assert_ne!(frame.muid().as_bytes(), first);
        assert_eq!(oracle.len(), 2);
    }

    #[cfg(feature = "crypto")]
    #[test]
    fn test_crc_covers_ciphertext_when_encrypted() {
        use crate::crypto::ChaCha20Encryptor;

        let crypto = ChaCha20Encryptor::new([0x42; 32], [0x24; 12]);
        let payload = b"secret reading";
        let cipher = crypto.encrypt(payload);

        let mut oracle = ExactOracle::new();
        let frame = test_builder()
            .with_encryptor(Box::new(crypto))
            .build(
                &mut oracle,
                DeviceId::BROADCAST,
                DuckType::Detector,
                0x12,
                payload,
            )
            .unwrap();

        assert_eq!(frame.data(), cipher.as_slice());
        assert_eq!(frame.data_crc(), crc32fast::hash(&cipher));
        assert_ne!(frame.data(), payload);
    }
}
