//! Duck node: the framing layer and the dedup oracle composed into the
//! object the transport talks to.
//!
//! Operations run to completion on the calling thread; the node holds the
//! membership oracle exclusively, so the check-then-add sequences inside
//! build and relay are atomic per MUID.

use crate::config::NodeConfig;
use anyhow::{Context, Result};
use bytes::Bytes;
use duck_dedup::{BloomOracle, DedupConfig, MembershipOracle};
use duck_wire::{
    prepare_for_relaying, DeviceId, DuckType, Frame, FrameBuilder, FrameError, RelayDecision,
};
use tracing::{debug, info};

/// A mesh node: builds outbound frames, gates inbound ones
pub struct Duck {
    duck_type: DuckType,
    builder: FrameBuilder,
    oracle: Box<dyn MembershipOracle>,
}

impl Duck {
    /// Compose a node from its parts
    pub fn new(
        builder: FrameBuilder,
        duck_type: DuckType,
        oracle: Box<dyn MembershipOracle>,
    ) -> Self {
        Self {
            duck_type,
            builder,
            oracle,
        }
    }

    /// Build a node from configuration: bloom-backed oracle, configured
    /// device ID and duck type, encryption per the crypto section
    pub fn from_config(config: &NodeConfig) -> Result<Self> {
        let source = config.device_id()?;
        let duck_type = DuckType::try_from(config.duck_type)
            .with_context(|| format!("invalid duck_type {:#04x}", config.duck_type))?;

        let oracle = BloomOracle::new(DedupConfig {
            capacity: config.dedup.capacity,
            false_positive_rate: config.dedup.false_positive_rate,
        })?;

        let builder = FrameBuilder::new(source).with_muid_attempts(config.muid_max_attempts);
        let builder = if config.crypto.enabled {
            apply_crypto(builder, &config.crypto)?
        } else {
            builder
        };

        info!(device_id = %source, duck_type = config.duck_type, "node configured");
        Ok(Self::new(builder, duck_type, Box::new(oracle)))
    }

    /// Device ID this node stamps into outbound frames
    pub fn device_id(&self) -> DeviceId {
        self.builder.source()
    }

    /// Build an outbound frame and hand back its wire bytes
    pub fn send(
        &mut self,
        destination: DeviceId,
        topic: u8,
        payload: &[u8],
    ) -> Result<Bytes, FrameError> {
        info!(
            destination = %destination,
            topic,
            payload_len = payload.len(),
            "preparing frame for sending"
        );
        let frame = self.builder.build(
            self.oracle.as_mut(),
            destination,
            self.duck_type,
            topic,
            payload,
        )?;
        Ok(frame.into_bytes())
    }

    /// Gate a received raw frame: forward (hop count incremented) or drop
    /// as a duplicate
    pub fn relay(&mut self, raw: &[u8]) -> Result<RelayDecision, FrameError> {
        prepare_for_relaying(self.oracle.as_mut(), raw)
    }

    /// Append receiver-side radio-quality metrics to a frame headed for the
    /// upper layer
    pub fn tag_reception(&self, frame: &mut Frame, rssi: i16, snr: f32) -> Result<(), FrameError> {
        debug!(node = %self.device_id(), rssi, snr, "tagging reception with radio metrics");
        frame.add_metrics(rssi, snr)
    }
}

#[cfg(feature = "crypto")]
fn apply_crypto(
    builder: FrameBuilder,
    crypto: &crate::config::CryptoSection,
) -> Result<FrameBuilder> {
    let key = crate::config::parse_hex::<32>(&crypto.key).context("invalid crypto key")?;
    let iv = crate::config::parse_hex::<12>(&crypto.iv).context("invalid crypto iv")?;
    Ok(builder.with_encryptor(Box::new(duck_wire::ChaCha20Encryptor::new(key, iv))))
}

#[cfg(not(feature = "crypto"))]
fn apply_crypto(
    _builder: FrameBuilder,
    _crypto: &crate::config::CryptoSection,
) -> Result<FrameBuilder> {
    anyhow::bail!("crypto.enabled is set but this build carries no crypto support")
}
