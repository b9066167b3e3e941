//! Configuration Module
//!
//! Handles loading and managing cache and server configuration from
//! environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// == Cache Config ==
/// Runtime-adjustable cache limits and behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheConfig {
    /// Ceiling on the summed serialized size of all entries
    pub max_size_bytes: u64,
    /// Ceiling on the number of entries
    pub max_entries: usize,
    /// TTL applied when `set` is given none
    pub default_ttl_ms: u64,
    /// Compress records written to the durable tier
    pub compression_enabled: bool,
    /// Write through to, and read through from, the durable tier
    pub persist_to_disk: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: 50 * 1024 * 1024, // 50 MiB
            max_entries: 1000,
            default_ttl_ms: 24 * 60 * 60 * 1000, // 24 h
            compression_enabled: true,
            persist_to_disk: true,
        }
    }
}

impl CacheConfig {
    /// Applies every field present in `update`.
    pub fn apply(&mut self, update: &ConfigUpdate) {
        if let Some(v) = update.max_size_bytes {
            self.max_size_bytes = v;
        }
        if let Some(v) = update.max_entries {
            self.max_entries = v;
        }
        if let Some(v) = update.default_ttl_ms {
            self.default_ttl_ms = v;
        }
        if let Some(v) = update.compression_enabled {
            self.compression_enabled = v;
        }
        if let Some(v) = update.persist_to_disk {
            self.persist_to_disk = v;
        }
    }
}

// == Config Update ==
/// Partial update for [`CacheConfig`]; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdate {
    #[serde(default)]
    pub max_size_bytes: Option<u64>,
    #[serde(default)]
    pub max_entries: Option<usize>,
    #[serde(default)]
    pub default_ttl_ms: Option<u64>,
    #[serde(default)]
    pub compression_enabled: Option<bool>,
    #[serde(default)]
    pub persist_to_disk: Option<bool>,
}

// == Server Config ==
/// Process configuration for the cache service binary.
#[derive(Debug, Clone)]
pub struct Config {
    pub cache: CacheConfig,
    /// HTTP server port
    pub server_port: u16,
    /// Invalidation sweep interval in seconds
    pub sweep_interval: u64,
    /// Directory holding durable records
    pub storage_dir: PathBuf,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_SIZE_BYTES` - Size ceiling in bytes (default: 52428800)
    /// - `MAX_ENTRIES` - Entry ceiling (default: 1000)
    /// - `DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 86400000)
    /// - `COMPRESSION_ENABLED` - Compress durable records (default: true)
    /// - `PERSIST_TO_DISK` - Enable the durable tier (default: true)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Rule sweep frequency in seconds (default: 300)
    /// - `CACHE_DIR` - Durable record directory (default: ./cache-data)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache: CacheConfig {
                max_size_bytes: env_or("MAX_SIZE_BYTES", defaults.cache.max_size_bytes),
                max_entries: env_or("MAX_ENTRIES", defaults.cache.max_entries),
                default_ttl_ms: env_or("DEFAULT_TTL_MS", defaults.cache.default_ttl_ms),
                compression_enabled: env_or(
                    "COMPRESSION_ENABLED",
                    defaults.cache.compression_enabled,
                ),
                persist_to_disk: env_or("PERSIST_TO_DISK", defaults.cache.persist_to_disk),
            },
            server_port: env_or("SERVER_PORT", defaults.server_port),
            sweep_interval: env_or("SWEEP_INTERVAL", defaults.sweep_interval),
            storage_dir: env::var("CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            server_port: 3000,
            sweep_interval: 300,
            storage_dir: PathBuf::from("./cache-data"),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
