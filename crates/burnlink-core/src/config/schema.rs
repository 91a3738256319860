//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default share time-to-live: two hours.
pub const DEFAULT_TTL_SECS: u64 = 2 * 60 * 60;

/// Default reaper sweep interval: five minutes.
pub const DEFAULT_REAPER_INTERVAL_SECS: u64 = 5 * 60;

/// Main Burnlink configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Share lifecycle settings.
    #[serde(default)]
    pub share: ShareConfig,

    /// Expiry reaper settings.
    #[serde(default)]
    pub reaper: ReaperConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Share lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Seconds after creation at which an unredeemed share becomes unrecoverable.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// How many fresh ids to try before giving up on an insert collision.
    #[serde(default = "default_max_id_attempts")]
    pub max_id_attempts: u32,
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}

fn default_max_id_attempts() -> u32 {
    8
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_id_attempts: default_max_id_attempts(),
        }
    }
}

impl ShareConfig {
    /// The time-to-live as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Expiry reaper configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaperConfig {
    /// Run the background sweep. Expiry is still enforced lazily when disabled.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds between sweeps.
    #[serde(default = "default_reaper_interval_secs")]
    pub interval_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_reaper_interval_secs() -> u64 {
    DEFAULT_REAPER_INTERVAL_SECS
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_reaper_interval_secs(),
        }
    }
}

impl ReaperConfig {
    /// The sweep interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Which backend holds unconsumed shares.
    #[serde(default)]
    pub backend: StorageBackend,

    /// SQLite database path (defaults to `~/.burnlink/shares.db`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Storage backend kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local map; shares vanish on restart.
    Memory,
    /// SQLite file; shares survive restarts until consumed or expired.
    #[default]
    Sqlite,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Lowercase directive name understood by `EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
