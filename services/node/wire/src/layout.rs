//! Binary frame layout shared by every component.
//!
//! This module is the single source of truth for field offsets and sizes;
//! builder, relay gate, and metrics appender all index through these
//! constants rather than carrying their own offset arithmetic.

use std::fmt;

/// Device ID length in bytes
pub const DUID_LENGTH: usize = 8;
/// Message unique ID length in bytes
pub const MUID_LENGTH: usize = 4;
/// Data CRC field length in bytes
pub const DATA_CRC_LENGTH: usize = 4;
/// Header total length: source + destination + MUID + topic + duck type +
/// hop count + CRC
pub const HEADER_LENGTH: usize = DUID_LENGTH + DUID_LENGTH + MUID_LENGTH + 1 + 1 + 1 + DATA_CRC_LENGTH;
/// Maximum data section length in bytes
pub const MAX_DATA_LENGTH: usize = 229;
/// Maximum total frame length in bytes
pub const PACKET_LENGTH: usize = HEADER_LENGTH + MAX_DATA_LENGTH;
/// Metrics trailer length: RSSI (i16) + SNR*10 (i16), big-endian
pub const METRICS_TRAILER_LENGTH: usize = 4;

/// Source device ID offset
pub const SDUID_POS: usize = 0;
/// Destination device ID offset
pub const DDUID_POS: usize = SDUID_POS + DUID_LENGTH;
/// Message unique ID offset
pub const MUID_POS: usize = DDUID_POS + DUID_LENGTH;
/// Topic tag offset
pub const TOPIC_POS: usize = MUID_POS + MUID_LENGTH;
/// Duck type tag offset
pub const DUCK_TYPE_POS: usize = TOPIC_POS + 1;
/// Hop count offset
pub const HOP_COUNT_POS: usize = DUCK_TYPE_POS + 1;
/// Data CRC offset
pub const DATA_CRC_POS: usize = HOP_COUNT_POS + 1;
/// Data section offset
pub const DATA_POS: usize = DATA_CRC_POS + DATA_CRC_LENGTH;

/// Reserved application topic tags
pub mod topics {
    /// Node status report
    pub const STATUS: u8 = 0x10;
    /// Sensor reading
    pub const SENSOR: u8 = 0x12;
    /// Alert broadcast
    pub const ALERT: u8 = 0x13;
    /// Health ping
    pub const HEALTH: u8 = 0x14;
    /// Highest reserved tag; application-defined topics start above this
    pub const MAX_RESERVED: u8 = 0x2F;
}

/// Device identifier (8 bytes)
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct DeviceId(pub [u8; DUID_LENGTH]);

impl DeviceId {
    /// Broadcast destination: every node accepts the frame
    pub const BROADCAST: DeviceId = DeviceId([0xFF; DUID_LENGTH]);

    /// Raw bytes in wire order
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether this is the broadcast destination
    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }
}

impl From<[u8; DUID_LENGTH]> for DeviceId {
    fn from(bytes: [u8; DUID_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Message unique identifier: fixed-length random bytes identifying a
/// message instance across all relays of that message
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Muid(pub [u8; MUID_LENGTH]);

impl Muid {
    /// Raw bytes in wire order
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Muid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Node role tags carried in the duck-type header field
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuckType {
    /// Role not yet assigned
    Unknown = 0x00,
    /// Papa duck: gateway to the backhaul network
    Papa = 0x01,
    /// Mama duck: full store-and-forward relay
    Mama = 0x02,
    /// Link duck: relay-only hop extender
    Link = 0x03,
    /// Detector duck: sensor-originating leaf node
    Detector = 0x04,
}

impl TryFrom<u8> for DuckType {
    type Error = crate::FrameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(DuckType::Unknown),
            0x01 => Ok(DuckType::Papa),
            0x02 => Ok(DuckType::Mama),
            0x03 => Ok(DuckType::Link),
            0x04 => Ok(DuckType::Detector),
            _ => Err(crate::FrameError::DuckType(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_constants() {
        assert_eq!(HEADER_LENGTH, 27);
        assert_eq!(PACKET_LENGTH, 256);

        assert_eq!(SDUID_POS, 0);
        assert_eq!(DDUID_POS, 8);
        assert_eq!(MUID_POS, 16);
        assert_eq!(TOPIC_POS, 20);
        assert_eq!(DUCK_TYPE_POS, 21);
        assert_eq!(HOP_COUNT_POS, 22);
        assert_eq!(DATA_CRC_POS, 23);
        assert_eq!(DATA_POS, HEADER_LENGTH);
    }

    #[test]
    fn test_duck_type_conversion() {
        assert_eq!(DuckType::try_from(0x00).unwrap(), DuckType::Unknown);
        assert_eq!(DuckType::try_from(0x02).unwrap(), DuckType::Mama);
        assert!(DuckType::try_from(0xFF).is_err());
    }

    #[test]
    fn test_device_id_display() {
        let id = DeviceId([0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);
        assert_eq!(id.to_string(), "0102030405060708");
        assert!(!id.is_broadcast());
        assert!(DeviceId::BROADCAST.is_broadcast());
    }
}
