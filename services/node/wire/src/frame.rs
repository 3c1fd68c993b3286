//! Frame value type with named accessors over the fixed layout.
//!
//! A [`Frame`] owns its bytes; it is constructed fresh by the builder,
//! rehydrated from received bytes by the relay gate, mutated in place
//! (hop-count increment, CRC patch, trailer append) and then handed to the
//! transport. Its buffer always holds a complete header and never exceeds
//! [`PACKET_LENGTH`].

use crate::layout::{
    DeviceId, Muid, DATA_CRC_POS, DATA_POS, DDUID_POS, DUCK_TYPE_POS, DUID_LENGTH, HEADER_LENGTH,
    HOP_COUNT_POS, MUID_LENGTH, MUID_POS, PACKET_LENGTH, SDUID_POS, TOPIC_POS,
};
use crate::FrameError;
use bytes::{Bytes, BytesMut};

/// A complete header-plus-data frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    buf: BytesMut,
}

impl Frame {
    /// Adopt a fully assembled buffer.
    ///
    /// Caller guarantees `HEADER_LENGTH <= buf.len() <= PACKET_LENGTH`.
    pub(crate) fn from_buffer(buf: BytesMut) -> Self {
        debug_assert!(buf.len() >= HEADER_LENGTH && buf.len() <= PACKET_LENGTH);
        Self { buf }
    }

    /// Rehydrate a frame from received bytes.
    ///
    /// The content is trusted as-is (no CRC or field validation); only the
    /// length bounds needed for fixed-offset indexing are enforced.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, FrameError> {
        if raw.len() < HEADER_LENGTH {
            return Err(FrameError::Incomplete);
        }
        if raw.len() > PACKET_LENGTH {
            return Err(FrameError::SizeInvalid(raw.len()));
        }
        let mut buf = BytesMut::with_capacity(PACKET_LENGTH);
        buf.extend_from_slice(raw);
        Ok(Self { buf })
    }

    /// Wire bytes of the whole frame
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Hand the frame off as immutable transport bytes
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    /// Total frame length in bytes
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the frame carries an empty data section
    pub fn is_empty(&self) -> bool {
        self.buf.len() == HEADER_LENGTH
    }

    /// Originating node
    pub fn source_id(&self) -> DeviceId {
        let mut id = [0u8; DUID_LENGTH];
        id.copy_from_slice(&self.buf[SDUID_POS..SDUID_POS + DUID_LENGTH]);
        DeviceId(id)
    }

    /// Target node (may be [`DeviceId::BROADCAST`])
    pub fn destination_id(&self) -> DeviceId {
        let mut id = [0u8; DUID_LENGTH];
        id.copy_from_slice(&self.buf[DDUID_POS..DDUID_POS + DUID_LENGTH]);
        DeviceId(id)
    }

    /// Message unique ID, the dedup key
    pub fn muid(&self) -> Muid {
        let mut id = [0u8; MUID_LENGTH];
        id.copy_from_slice(&self.buf[MUID_POS..MUID_POS + MUID_LENGTH]);
        Muid(id)
    }

    /// Application topic tag
    pub fn topic(&self) -> u8 {
        self.buf[TOPIC_POS]
    }

    /// Raw duck type tag; not validated on the relay path
    pub fn duck_type(&self) -> u8 {
        self.buf[DUCK_TYPE_POS]
    }

    /// Number of relays traversed
    pub fn hop_count(&self) -> u8 {
        self.buf[HOP_COUNT_POS]
    }

    /// CRC-32 over the data section, as recorded in the header
    pub fn data_crc(&self) -> u32 {
        let mut crc = [0u8; 4];
        crc.copy_from_slice(&self.buf[DATA_CRC_POS..DATA_CRC_POS + 4]);
        u32::from_be_bytes(crc)
    }

    /// Data section (header excluded), including any metrics trailer
    pub fn data(&self) -> &[u8] {
        &self.buf[DATA_POS..]
    }

    /// Increment the hop count in place, saturating at 255.
    ///
    /// Returns the new hop count.
    pub fn increment_hops(&mut self) -> u8 {
        let hops = self.buf[HOP_COUNT_POS].saturating_add(1);
        self.buf[HOP_COUNT_POS] = hops;
        hops
    }

    /// Patch the CRC field in place (big-endian)
    pub(crate) fn patch_crc(&mut self, crc: u32) {
        self.buf[DATA_CRC_POS..DATA_CRC_POS + 4].copy_from_slice(&crc.to_be_bytes());
    }

    /// Append raw bytes to the data section without any bookkeeping.
    ///
    /// Caller has already checked the [`PACKET_LENGTH`] bound.
    pub(crate) fn extend_data(&mut self, extra: &[u8]) {
        self.buf.extend_from_slice(extra);
    }
}
