//! Configuration loading and persistence.

use super::{Config, StorageBackend};
use crate::env::{self, vars};
use crate::error::ConfigError;
use crate::paths;
use std::fs;
use std::path::{Path, PathBuf};

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5()?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to JSON5 string.
    pub fn to_json5(&self) -> Result<String, ConfigError> {
        // json5 doesn't have a serializer, so we use serde_json with pretty print
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.share.ttl_secs == 0 {
            errors.push("Share ttl_secs must be greater than 0".to_string());
        }

        if self.share.max_id_attempts == 0 {
            errors.push("Share max_id_attempts must be at least 1".to_string());
        }

        if self.reaper.interval_secs == 0 {
            errors.push("Reaper interval_secs must be greater than 0".to_string());
        }

        // Sweeps must run at least once per TTL.
        if self.reaper.enabled
            && self.share.ttl_secs > 0
            && self.reaper.interval_secs >= self.share.ttl_secs
        {
            errors.push(format!(
                "Reaper interval_secs ({}) must be shorter than share ttl_secs ({})",
                self.reaper.interval_secs, self.share.ttl_secs
            ));
        }

        if self.storage.backend == StorageBackend::Memory && self.storage.path.is_some() {
            errors.push("Storage path is only meaningful for the sqlite backend".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }

    /// Resolve the SQLite database path, falling back to the default location.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.path {
            Some(path) => Ok(path.clone()),
            None => paths::database_file(),
        }
    }

    /// Load configuration from `path`, falling back to defaults if the file
    /// does not exist. Environment overrides are applied in both cases; a file
    /// that exists but does not parse is an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        let config = match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::NotFound(_)) => Self::default(),
            Err(e) => return Err(e),
        };
        Ok(config.with_env_overrides())
    }

    /// Apply `BURNLINK_*` environment overrides on top of this configuration.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(ttl) = env::get_u64(vars::BURNLINK_TTL_SECS) {
            self.share.ttl_secs = ttl;
        }

        if let Some(interval) = env::get_u64(vars::BURNLINK_REAPER_INTERVAL_SECS) {
            self.reaper.interval_secs = interval;
        }

        if let Some(path) = env::get_var(vars::BURNLINK_DATABASE) {
            self.storage.backend = StorageBackend::Sqlite;
            self.storage.path = Some(paths::expand_tilde(&path));
        }

        self
    }
}

/// Configuration builder for creating configs programmatically.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new config builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the share time-to-live in seconds.
    pub fn ttl_secs(mut self, secs: u64) -> Self {
        self.config.share.ttl_secs = secs;
        self
    }

    /// Set the reaper sweep interval in seconds.
    pub fn reaper_interval_secs(mut self, secs: u64) -> Self {
        self.config.reaper.interval_secs = secs;
        self
    }

    /// Enable or disable the background reaper.
    pub fn reaper_enabled(mut self, enabled: bool) -> Self {
        self.config.reaper.enabled = enabled;
        self
    }

    /// Use the in-memory backend.
    pub fn memory_backend(mut self) -> Self {
        self.config.storage.backend = StorageBackend::Memory;
        self.config.storage.path = None;
        self
    }

    /// Use the SQLite backend at `path`.
    pub fn sqlite_backend(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.storage.backend = StorageBackend::Sqlite;
        self.config.storage.path = Some(path.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Config {
        self.config
    }
}
