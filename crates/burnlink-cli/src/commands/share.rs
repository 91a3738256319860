//! Share commands.
//!
//! Provides `burnlink create|redeem|exists`. The id or link printed by
//! `create` is the only way back to a share; `redeem` destroys it.

use std::io::{IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use burnlink_core::SecretBytes;
use burnlink_secrets::{id_from_url, share_url, SecretId, ShareError, ShareService};
use clap::Args;
use url::Url;

use super::open_store;

/// Create command arguments.
#[derive(Args)]
pub struct CreateArgs {
    /// Secret value (if omitted, prompts for hidden input)
    #[arg(long, conflicts_with_all = ["file", "stdin"])]
    pub value: Option<String>,

    /// Read the secret from a file
    #[arg(long, conflicts_with = "stdin")]
    pub file: Option<PathBuf>,

    /// Read the secret from standard input
    #[arg(long)]
    pub stdin: bool,

    /// Print a full link under this base URL instead of the bare id
    #[arg(long, env = "BURNLINK_BASE_URL")]
    pub base_url: Option<Url>,

    /// Time-to-live in seconds (defaults to share.ttl_secs)
    #[arg(long)]
    pub ttl: Option<u64>,
}

/// Redeem command arguments.
#[derive(Args)]
pub struct RedeemArgs {
    /// Share id or link
    pub share: String,
}

/// Exists command arguments.
#[derive(Args)]
pub struct ExistsArgs {
    /// Share id or link
    pub share: String,
}

/// Run the create command.
pub async fn create(config_path: Option<&Path>, args: CreateArgs) -> anyhow::Result<()> {
    let secret = read_secret(&args)?;
    if secret.is_empty() {
        anyhow::bail!("Secret is empty");
    }

    let (config, store) = open_store(config_path).await?;
    let mut service = ShareService::from_config(store, &config.share);
    if let Some(ttl) = args.ttl {
        if ttl == 0 {
            anyhow::bail!("--ttl must be greater than 0");
        }
        service = service.with_ttl(Duration::from_secs(ttl));
    }

    let link = create_link(&service, &secret, args.base_url.as_ref()).await?;
    println!("{link}");
    eprintln!(
        "Share can be opened once within {}.",
        format_ttl(service.ttl())
    );
    Ok(())
}

/// Run the redeem command.
pub async fn redeem(config_path: Option<&Path>, args: RedeemArgs) -> anyhow::Result<()> {
    let id = parse_share_ref(&args.share)?;
    let (_config, store) = open_store(config_path).await?;
    let service = ShareService::new(store);

    let plaintext = match service.redeem_share(&id).await {
        Ok(plaintext) => plaintext,
        Err(ShareError::NotFound) => {
            anyhow::bail!("Share not found: it may have been redeemed or expired")
        }
        Err(e) => return Err(e.into()),
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(plaintext.expose())?;
    if stdout.is_terminal() && !plaintext.expose().ends_with(b"\n") {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}

/// Run the exists command.
pub async fn exists(config_path: Option<&Path>, args: ExistsArgs) -> anyhow::Result<()> {
    let id = match parse_share_ref(&args.share) {
        Ok(id) => id,
        Err(_) => {
            println!("false");
            return Ok(());
        }
    };
    let (_config, store) = open_store(config_path).await?;
    let service = ShareService::new(store);
    println!("{}", service.share_exists(&id).await?);
    Ok(())
}

/// Create a share and render it as a link under `base_url`, or as the bare id.
pub async fn create_link(
    service: &ShareService,
    secret: &SecretBytes,
    base_url: Option<&Url>,
) -> anyhow::Result<String> {
    let id = service.create_share(secret.expose_secret()).await?;
    match base_url {
        Some(base) => Ok(share_url(base, &id)?.to_string()),
        None => Ok(id.as_str().to_string()),
    }
}

/// Accept either a bare share id or a full share link.
pub fn parse_share_ref(input: &str) -> anyhow::Result<SecretId> {
    let input = input.trim();
    let parsed = match Url::parse(input) {
        Ok(url) => id_from_url(&url),
        Err(_) => SecretId::parse(input),
    };
    parsed.map_err(|_| anyhow::anyhow!("Not a share id or link"))
}

fn read_secret(args: &CreateArgs) -> anyhow::Result<SecretBytes> {
    if let Some(value) = &args.value {
        return Ok(SecretBytes::from(value.as_str()));
    }

    if let Some(path) = &args.file {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
        return Ok(SecretBytes::new(bytes));
    }

    if args.stdin {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read secret from stdin")?;
        return Ok(SecretBytes::new(buf));
    }

    let value = rpassword::prompt_password("Secret: ")
        .map_err(|e| anyhow::anyhow!("Failed to read secret: {}", e))?;
    Ok(SecretBytes::from(value))
}

fn format_ttl(ttl: Duration) -> String {
    let secs = ttl.as_secs();
    match secs {
        s if s % 3600 == 0 => format!("{}h", s / 3600),
        s if s % 60 == 0 => format!("{}m", s / 60),
        s => format!("{s}s"),
    }
}
