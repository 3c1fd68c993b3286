//! Configuration handling for the node.
//!
//! Reads the node configuration from a YAML file with environment-variable
//! overrides, falling back to defaults when the file is missing or
//! malformed.

use anyhow::{bail, Context, Result};
use duck_wire::{DeviceId, MAX_MUID_ATTEMPTS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Node configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Device ID of this node, 16 hex characters
    pub device_id: String,
    /// Duck type tag stamped into outbound frames
    pub duck_type: u8,
    /// Bound on MUID generation attempts per frame
    pub muid_max_attempts: usize,
    /// Dedup filter sizing
    pub dedup: DedupSection,
    /// Payload encryption settings
    pub crypto: CryptoSection,
}

/// Dedup filter sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupSection {
    /// Expected number of distinct MUIDs over the node's session
    pub capacity: usize,
    /// Target false-positive rate for membership queries
    pub false_positive_rate: f64,
}

/// Payload encryption settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoSection {
    /// Whether outbound payloads are encrypted
    pub enabled: bool,
    /// Cipher key, 64 hex characters
    pub key: String,
    /// Cipher IV, 24 hex characters
    pub iv: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            device_id: "0000000000000001".to_string(),
            duck_type: 0x02, // Mama: full store-and-forward relay
            muid_max_attempts: MAX_MUID_ATTEMPTS,
            dedup: DedupSection::default(),
            crypto: CryptoSection::default(),
        }
    }
}

impl Default for DedupSection {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            false_positive_rate: 0.01,
        }
    }
}

impl Default for CryptoSection {
    fn default() -> Self {
        Self {
            enabled: false,
            key: String::new(),
            iv: String::new(),
        }
    }
}

impl NodeConfig {
    /// Load configuration from file and environment variables
    pub fn load_from_file<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let mut config = Self::default();

        if let Ok(content) = std::fs::read_to_string(&config_path) {
            match serde_yaml::from_str::<NodeConfig>(&content) {
                Ok(parsed) => {
                    config = parsed;
                    info!("Loaded configuration from {:?}", config_path.as_ref());
                }
                Err(err) => {
                    warn!(
                        "Failed to parse config file {:?} ({}), using defaults",
                        config_path.as_ref(),
                        err
                    );
                }
            }
        } else {
            warn!(
                "Config file {:?} not found, using defaults",
                config_path.as_ref()
            );
        }

        config.apply_environment_overrides();

        info!(
            "Final node configuration: device_id={}, duck_type={:#04x}, dedup capacity={}, crypto={}",
            config.device_id, config.duck_type, config.dedup.capacity, config.crypto.enabled
        );

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_environment_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a variable lookup; tests inject their own
    /// lookup so they stay off the process-global environment
    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(device_id) = var("DUCK_DEVICE_ID") {
            self.device_id = device_id;
            info!("Device ID overridden by environment: {}", self.device_id);
        }

        if let Some(capacity) = var("DUCK_DEDUP_CAPACITY") {
            if let Ok(value) = capacity.parse::<usize>() {
                self.dedup.capacity = value;
                info!("Dedup capacity overridden by environment: {}", value);
            }
        }

        if let Some(rate) = var("DUCK_DEDUP_FP_RATE") {
            if let Ok(value) = rate.parse::<f64>() {
                self.dedup.false_positive_rate = value;
                info!("Dedup false-positive rate overridden by environment: {}", value);
            }
        }

        if let Some(enabled) = var("DUCK_CRYPTO_ENABLED") {
            self.crypto.enabled = enabled.to_lowercase() == "true";
            info!("Crypto overridden by environment: {}", self.crypto.enabled);
        }
    }

    /// Parse the configured device ID
    pub fn device_id(&self) -> Result<DeviceId> {
        let bytes: [u8; 8] = parse_hex(&self.device_id)
            .with_context(|| format!("invalid device_id {:?}", self.device_id))?;
        Ok(DeviceId(bytes))
    }
}

/// Parse a fixed-length hex string into bytes
pub(crate) fn parse_hex<const N: usize>(s: &str) -> Result<[u8; N]> {
    let s = s.trim();
    // Fixed-offset slicing below is only defined on single-byte characters
    if !s.is_ascii() {
        bail!("expected ascii hex characters");
    }
    if s.len() != N * 2 {
        bail!("expected {} hex characters, got {}", N * 2, s.len());
    }
    let mut out = [0u8; N];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16)
            .with_context(|| format!("invalid hex at offset {}", i * 2))?;
    }
    Ok(out)
}
