//! Configuration system for the GELF decoder and daemon.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $GELFD_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/gelfd/config.toml
//!   3. ~/.config/gelfd/config.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GelfConfig {
    pub listen: ListenConfig,
    pub decoder: DecoderConfig,
}

/// Where the daemon binds its UDP socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    /// Bind address. Default listens on all interfaces.
    pub bind: String,
    /// UDP port. 12201 is the GELF default.
    pub port: u16,
}

/// Tunables of the decode engine itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Lower the default log filter to `debug`, enabling per-chunk
    /// arrival/eviction diagnostics. RUST_LOG still overrides.
    pub debug: bool,
    /// Maximum time an incomplete reassembly may wait for its missing
    /// fragments before the reaper drops it.
    pub chunk_timeout_ms: u64,
    /// Delay between the end of one reaper sweep and the start of the next.
    pub gc_timeout_ms: u64,
}

impl DecoderConfig {
    pub fn chunk_timeout(&self) -> Duration {
        Duration::from_millis(self.chunk_timeout_ms)
    }

    pub fn gc_timeout(&self) -> Duration {
        Duration::from_millis(self.gc_timeout_ms)
    }
}

// ── Defaults ─────────────────────────────────────────────────────────────────

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 12201,
        }
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            debug: false,
            chunk_timeout_ms: 20_000,
            gc_timeout_ms: 10_000,
        }
    }
}

// ── Path helpers ─────────────────────────────────────────────────────────────

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_or_tmp().join(".config"))
        .join("gelfd")
}

fn home_or_tmp() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

// ── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("failed to write {0}: {1}")]
    WriteFailed(PathBuf, std::io::Error),
    #[error("failed to serialize: {0}")]
    SerializeFailed(toml::ser::Error),
}

// ── Loading ──────────────────────────────────────────────────────────────────

impl GelfConfig {
    /// Load config: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::file_path();
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadFailed(path.clone(), e))?;
            toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.clone(), e))?
        } else {
            GelfConfig::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Config file path.
    pub fn file_path() -> PathBuf {
        std::env::var("GELFD_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"))
    }

    /// Write default config if none exists. Returns the path.
    pub fn write_default_if_missing() -> Result<PathBuf, ConfigError> {
        let path = Self::file_path();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
            }
            let text = toml::to_string_pretty(&GelfConfig::default())
                .map_err(ConfigError::SerializeFailed)?;
            std::fs::write(&path, text)
                .map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
        }
        Ok(path)
    }

    /// Apply GELFD_* env var overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("GELFD_LISTEN__BIND") {
            self.listen.bind = v;
        }
        if let Ok(v) = std::env::var("GELFD_LISTEN__PORT") {
            if let Ok(p) = v.parse() {
                self.listen.port = p;
            }
        }
        if let Ok(v) = std::env::var("GELFD_DECODER__DEBUG") {
            self.decoder.debug = v == "true" || v == "1";
        }
        if let Ok(v) = std::env::var("GELFD_DECODER__CHUNK_TIMEOUT_MS") {
            if let Ok(ms) = v.parse() {
                self.decoder.chunk_timeout_ms = ms;
            }
        }
        if let Ok(v) = std::env::var("GELFD_DECODER__GC_TIMEOUT_MS") {
            if let Ok(ms) = v.parse() {
                self.decoder.gc_timeout_ms = ms;
            }
        }
    }
}
