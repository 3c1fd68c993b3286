//! Post-hoc metrics trailers.
//!
//! A receiver appends radio-quality metrics (RSSI, SNR) to an
//! already-built frame before passing it up. Every append re-patches the
//! data CRC so the header always reflects the current data section.

use crate::frame::Frame;
use crate::layout::{METRICS_TRAILER_LENGTH, PACKET_LENGTH};
use crate::FrameError;
use tracing::debug;

impl Frame {
    /// Append raw bytes to the data section and re-patch the CRC.
    ///
    /// Fails with `SizeInvalid` (buffer untouched) if the resulting total
    /// would exceed [`PACKET_LENGTH`].
    pub fn add_to_buffer(&mut self, extra: &[u8]) -> Result<(), FrameError> {
        let total = self.len() + extra.len();
        if total > PACKET_LENGTH {
            return Err(FrameError::SizeInvalid(total));
        }

        self.extend_data(extra);
        let crc = crc32fast::hash(self.data());
        self.patch_crc(crc);
        Ok(())
    }

    /// Append the 4-byte radio-quality trailer: RSSI and `round(snr * 10)`
    /// as big-endian `i16` pairs.
    ///
    /// The CRC is recomputed over the trailer-extended data section before
    /// the trailer is physically appended; on `SizeInvalid` nothing is
    /// mutated.
    pub fn add_metrics(&mut self, rssi: i16, snr: f32) -> Result<(), FrameError> {
        let total = self.len() + METRICS_TRAILER_LENGTH;
        if total > PACKET_LENGTH {
            return Err(FrameError::SizeInvalid(total));
        }

        let snr_scaled = (snr * 10.0).round() as i16;
        let mut trailer = [0u8; METRICS_TRAILER_LENGTH];
        trailer[..2].copy_from_slice(&rssi.to_be_bytes());
        trailer[2..].copy_from_slice(&snr_scaled.to_be_bytes());

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(self.data());
        hasher.update(&trailer);
        self.patch_crc(hasher.finalize());

        self.extend_data(&trailer);
        debug!(rssi, snr_scaled, "appended radio metrics trailer");
        Ok(())
    }
}
