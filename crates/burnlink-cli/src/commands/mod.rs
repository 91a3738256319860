//! CLI command implementations.

pub mod config;
pub mod share;
pub mod store;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use burnlink_core::config::{Config, StorageBackend};
use burnlink_core::paths;
use burnlink_secrets::{MemorySecretStore, SecretStore, SqliteSecretStore};
use tracing::{debug, warn};

/// Resolve the config file path: `--config` wins, then the default location.
pub fn config_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(paths::config_file()?),
    }
}

/// Load the config file (defaults if it does not exist) with env overrides applied.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let path = config_path(explicit)?;
    Config::load_or_default(&path).with_context(|| format!("Failed to load config {:?}", path))
}

/// Load and validate the config, then open the configured store.
pub async fn open_store(explicit: Option<&Path>) -> anyhow::Result<(Config, Arc<dyn SecretStore>)> {
    let config = load_config(explicit)?;
    config.validate()?;

    let store: Arc<dyn SecretStore> = match config.storage.backend {
        StorageBackend::Memory => {
            warn!("memory backend selected; shares will not outlive this process");
            Arc::new(MemorySecretStore::new())
        }
        StorageBackend::Sqlite => {
            if config.storage.path.is_none() {
                paths::ensure_dirs()?;
            }
            let path = config.database_path()?;
            debug!(path = %path.display(), "opening share database");
            let store = SqliteSecretStore::open(&path)
                .await
                .with_context(|| format!("Failed to open share database {:?}", path))?;
            Arc::new(store)
        }
    };

    Ok((config, store))
}
