//! Payload encryption seam.
//!
//! The builder consumes encryption as an injected capability rather than a
//! module-level global, so tests can substitute fakes and the node can run
//! with encryption off. Implementations must be length-preserving: the CRC
//! and size bookkeeping in this crate pair the checksum with exactly the
//! bytes that land on the wire.

/// Symmetric payload encryption capability
pub trait Encryptor {
    /// Whether encryption is currently active.
    ///
    /// Receivers must know whether to check the data CRC pre- or
    /// post-decryption, so the builder consults this exactly once per frame.
    fn enabled(&self) -> bool;

    /// Encrypt a payload. Must return exactly `plaintext.len()` bytes.
    fn encrypt(&self, plaintext: &[u8]) -> Vec<u8>;
}

/// Disabled encryption: payloads pass through as plaintext
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCrypto;

impl Encryptor for NoCrypto {
    fn enabled(&self) -> bool {
        false
    }

    fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        plaintext.to_vec()
    }
}

/// ChaCha20 stream-cipher encryption (length-preserving).
///
/// Key and IV are fixed at construction; rotation is the caller's concern.
#[cfg(feature = "crypto")]
#[derive(Clone)]
pub struct ChaCha20Encryptor {
    key: [u8; 32],
    iv: [u8; 12],
}

#[cfg(feature = "crypto")]
impl ChaCha20Encryptor {
    /// Create an encryptor for the given key and IV
    pub fn new(key: [u8; 32], iv: [u8; 12]) -> Self {
        Self { key, iv }
    }
}

#[cfg(feature = "crypto")]
impl Encryptor for ChaCha20Encryptor {
    fn enabled(&self) -> bool {
        true
    }

    fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        use chacha20::cipher::{KeyIvInit, StreamCipher};
        use chacha20::ChaCha20;

        let mut cipher = ChaCha20::new(&self.key.into(), &self.iv.into());
        let mut out = plaintext.to_vec();
        cipher.apply_keystream(&mut out);
        out
    }
}
