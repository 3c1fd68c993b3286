//! Framing error types.

use thiserror::Error;

/// Framing errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Payload or trailer would exceed frame capacity; nothing was mutated
    #[error("size invalid: {0}")]
    SizeInvalid(usize),

    /// Buffer too short to hold a frame header
    #[error("incomplete frame")]
    Incomplete,

    /// Could not draw an unseen MUID within the retry bound; the dedup
    /// filter is effectively saturated
    #[error("dedup filter saturated after {0} muid attempts")]
    OracleSaturated(usize),

    /// Unknown duck type tag
    #[error("unknown duck type {0}")]
    DuckType(u8),
}
