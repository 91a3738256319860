//! Store maintenance commands: `burnlink sweep` and `burnlink status`.

use std::path::Path;

use burnlink_core::config::StorageBackend;
use burnlink_secrets::{ExpiryReaper, SecretStore};
use clap::Args;
use tracing::info;

use super::open_store;

/// Sweep command arguments.
#[derive(Args)]
pub struct SweepArgs {
    /// Keep sweeping on the configured interval until Ctrl-C
    #[arg(long)]
    pub watch: bool,
}

/// Status command arguments.
#[derive(Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the sweep command.
pub async fn sweep(config_path: Option<&Path>, args: SweepArgs) -> anyhow::Result<()> {
    let (config, store) = open_store(config_path).await?;
    let reaper = ExpiryReaper::from_config(store, &config.reaper);

    if !args.watch {
        let removed = reaper.sweep_once().await?;
        println!("Removed {removed} expired share(s)");
        return Ok(());
    }

    if !config.reaper.enabled {
        anyhow::bail!("Reaper is disabled (reaper.enabled = false)");
    }

    eprintln!(
        "Sweeping every {}s. Press Ctrl-C to stop.",
        reaper.interval().as_secs()
    );
    let handle = reaper.spawn();
    tokio::signal::ctrl_c().await?;
    info!("interrupt received");
    handle.shutdown().await;
    Ok(())
}

/// Run the status command.
pub async fn status(config_path: Option<&Path>, args: StatusArgs) -> anyhow::Result<()> {
    let (config, store) = open_store(config_path).await?;
    let live = store.len().await?;

    let backend = match config.storage.backend {
        StorageBackend::Memory => "memory",
        StorageBackend::Sqlite => "sqlite",
    };
    let database = match config.storage.backend {
        StorageBackend::Sqlite => Some(config.database_path()?),
        StorageBackend::Memory => None,
    };

    if args.json {
        let status = serde_json::json!({
            "backend": backend,
            "database": database,
            "live_shares": live,
            "ttl_secs": config.share.ttl_secs,
            "reaper": {
                "enabled": config.reaper.enabled,
                "interval_secs": config.reaper.interval_secs,
            },
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("Backend:      {backend}");
    if let Some(path) = &database {
        println!("Database:     {}", path.display());
    }
    println!("Live shares:  {live}");
    println!("TTL:          {}s", config.share.ttl_secs);
    if config.reaper.enabled {
        println!("Reaper:       every {}s", config.reaper.interval_secs);
    } else {
        println!("Reaper:       disabled");
    }
    Ok(())
}
