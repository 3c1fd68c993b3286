//! Packet framing and relay gating for a store-and-forward mesh node.
//!
//! This crate turns application payloads into the fixed binary wire format
//! exchanged between mesh nodes, decides whether a received frame should be
//! re-broadcast, and appends receiver-side radio-quality metrics. Duplicate
//! recognition is delegated to the `duck-dedup` membership oracle; the radio
//! transport itself lives outside this crate and only ever sees finished
//! byte buffers.
//!
//! ## Wire Format
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  -----
//! 0       8B    source device ID
//! 8       8B    destination device ID (FF..FF = broadcast)
//! 16      4B    message unique ID (MUID, random; dedup key)
//! 20      1B    topic (application routing/category tag)
//! 21      1B    duck type (node/role tag)
//! 22      1B    hop count (0 at origin, +1 per relay, saturates at 255)
//! 23      4B    CRC-32 over the data section (big-endian)
//! 27      0..229B data section (ciphertext when encryption is enabled)
//! ```
//!
//! Total frame length never exceeds [`PACKET_LENGTH`] (256 bytes). After
//! metrics augmentation the data section carries a 4-byte trailer (RSSI and
//! SNR*10 as big-endian `i16` pairs) and the CRC field is re-patched to
//! cover it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod crypto;
pub mod error;
pub mod frame;
pub mod layout;
pub mod metrics;
pub mod relay;

// Re-export main types
pub use builder::{FrameBuilder, MAX_MUID_ATTEMPTS};
pub use crypto::{Encryptor, NoCrypto};
pub use error::FrameError;
pub use frame::Frame;
pub use layout::{
    topics, DeviceId, DuckType, Muid, DATA_CRC_LENGTH, DATA_CRC_POS, DATA_POS, DDUID_POS,
    DUCK_TYPE_POS, DUID_LENGTH, HEADER_LENGTH, HOP_COUNT_POS, MAX_DATA_LENGTH,
    METRICS_TRAILER_LENGTH, MUID_LENGTH, MUID_POS, PACKET_LENGTH, SDUID_POS, TOPIC_POS,
};
pub use relay::{prepare_for_relaying, RelayDecision};

#[cfg(feature = "crypto")]
pub use crypto::ChaCha20Encryptor;
