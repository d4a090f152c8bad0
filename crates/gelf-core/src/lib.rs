//! gelf-core — wire format, error taxonomy, and configuration.
//! The decoder and both binaries depend on this crate.

pub mod config;
pub mod error;
pub mod wire;

pub use error::DecodeError;
pub use wire::{ChunkHeader, MessageId};
