//! Node-level composition for duckwire.
//!
//! This crate ties the framing layer (`duck-wire`) and the membership
//! oracle (`duck-dedup`) together into a single [`Duck`] node object, and
//! provides the configuration and logging bootstrap around them. The radio
//! transport stays external: [`Duck::send`] and [`Duck::relay`] exchange
//! finished byte buffers with it and nothing more.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod logging;
pub mod node;

pub use config::NodeConfig;
pub use node::Duck;

// Re-export the layer types callers wire against
pub use duck_dedup::{BloomOracle, DedupConfig, ExactOracle, MembershipOracle};
pub use duck_wire::{
    topics, DeviceId, DuckType, Frame, FrameBuilder, FrameError, RelayDecision,
};
