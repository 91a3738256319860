//! Configuration management commands.

use std::path::Path;

use burnlink_core::config::Config;
use burnlink_core::{paths, ConfigError};
use clap::Args;
use serde_json::Value;

use super::{config_path, load_config};

/// Config command arguments.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(clap::Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (file, defaults and env overrides)
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key (dot-separated path, e.g. share.ttl_secs)
        key: String,
    },

    /// Set a configuration value in the config file
    Set {
        /// Configuration key
        key: String,

        /// Value to set
        value: String,
    },

    /// Write a default config file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration
    Validate,
}

/// Run the config command.
pub async fn run(explicit: Option<&Path>, args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = load_config(explicit)?;
            println!("{}", config.to_json5()?);
        }

        ConfigCommand::Get { key } => {
            let json = serde_json::to_value(load_config(explicit)?)?;
            match get_path(&json, &key) {
                Some(v) => println!("{}", serde_json::to_string_pretty(v)?),
                None => anyhow::bail!("Key not found: {}", key),
            }
        }

        ConfigCommand::Set { key, value } => {
            // Edit the file as written; env overrides must not be persisted.
            let path = config_path(explicit)?;
            let config = match Config::load(&path) {
                Ok(config) => config,
                Err(ConfigError::NotFound(_)) => Config::default(),
                Err(e) => return Err(e.into()),
            };

            let mut json = serde_json::to_value(&config)?;
            set_path(&mut json, &key, &value);

            let updated: Config = serde_json::from_value(json)
                .map_err(|e| anyhow::anyhow!("Invalid configuration after set: {}", e))?;
            updated.validate()?;
            updated.save(&path)?;

            println!("Set {} = {}", key, value);
        }

        ConfigCommand::Init { force } => {
            let path = config_path(explicit)?;

            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists: {:?}. Use --force to overwrite.",
                    path
                );
            }

            if explicit.is_none() {
                paths::ensure_dirs()?;
            }
            Config::default().save(&path)?;

            println!("Created config file: {:?}", path);
        }

        ConfigCommand::Path => {
            println!("{}", config_path(explicit)?.display());
        }

        ConfigCommand::Validate => {
            let path = config_path(explicit)?;
            let config = Config::load(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?
                .with_env_overrides();
            match config.validate() {
                Ok(()) => println!("Configuration is valid"),
                Err(e) => anyhow::bail!("Configuration error: {}", e),
            }
        }
    }

    Ok(())
}

/// Walk a dot-separated key path.
fn get_path<'a>(json: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.')
        .try_fold(json, |acc, k| acc.get(k))
}

/// Set a dot-separated key path, creating intermediate objects as needed.
///
/// The value is parsed as JSON first (numbers, bools), falling back to a
/// plain string.
fn set_path(json: &mut Value, key: &str, raw: &str) {
    let parts: Vec<&str> = key.split('.').collect();
    let mut current = json;
    for (i, part) in parts.iter().enumerate() {
        if i == parts.len() - 1 {
            let parsed: Value =
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
            current[part] = parsed;
        } else {
            if !current.get(part).map_or(false, |v| v.is_object()) {
                current[part] = serde_json::json!({});
            }
            current = &mut current[part];
        }
    }
}
