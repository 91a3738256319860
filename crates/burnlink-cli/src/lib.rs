//! Burnlink command-line interface.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Burnlink - share a secret that can be read exactly once
#[derive(Parser)]
#[command(name = "burnlink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true, env = "BURNLINK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt a secret and print its one-time id or link
    Create(commands::share::CreateArgs),

    /// Print a secret and destroy it
    Redeem(commands::share::RedeemArgs),

    /// Check whether a share can still be redeemed, without redeeming it
    Exists(commands::share::ExistsArgs),

    /// Remove expired shares
    Sweep(commands::store::SweepArgs),

    /// Show store status
    Status(commands::store::StatusArgs),

    /// Configuration management
    Config(commands::config::ConfigArgs),

    /// Show version information
    Version,
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Create(args) => commands::share::create(config_path, args).await,
        Commands::Redeem(args) => commands::share::redeem(config_path, args).await,
        Commands::Exists(args) => commands::share::exists(config_path, args).await,
        Commands::Sweep(args) => commands::store::sweep(config_path, args).await,
        Commands::Status(args) => commands::store::status(config_path, args).await,
        Commands::Config(args) => commands::config::run(config_path, args).await,
        Commands::Version => {
            println!("burnlink {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_version() {
        let cli = Cli::try_parse_from(["burnlink", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_parse_config_show() {
        let cli = Cli::try_parse_from(["burnlink", "config", "show"]).unwrap();
        match cli.command {
            Commands::Config(args) => {
                assert!(matches!(args.command, commands::config::ConfigCommand::Show));
            }
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn test_parse_create_with_base_url_and_ttl() {
        let cli = Cli::try_parse_from([
            "burnlink",
            "create",
            "--value",
            "hunter2",
            "--base-url",
            "https://burn.example/s/",
            "--ttl",
            "600",
        ])
        .unwrap();
        match cli.command {
            Commands::Create(args) => {
                assert_eq!(args.value.as_deref(), Some("hunter2"));
                assert_eq!(
                    args.base_url.map(|u| u.to_string()),
                    Some("https://burn.example/s/".to_string())
                );
                assert_eq!(args.ttl, Some(600));
                assert!(!args.stdin);
            }
            _ => panic!("Expected Create command"),
        }
    }

    #[test]
    fn test_parse_create_rejects_conflicting_sources() {
        let result = Cli::try_parse_from(["burnlink", "create", "--value", "x", "--stdin"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_create_rejects_bad_base_url() {
        let result = Cli::try_parse_from(["burnlink", "create", "--base-url", "not a url"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_redeem() {
        let cli = Cli::try_parse_from(["burnlink", "redeem", "AAAAAAAAAAAAAAAAAAAAAA"]).unwrap();
        match cli.command {
            Commands::Redeem(args) => assert_eq!(args.share, "AAAAAAAAAAAAAAAAAAAAAA"),
            _ => panic!("Expected Redeem command"),
        }
    }

    #[test]
    fn test_parse_sweep_watch() {
        let cli = Cli::try_parse_from(["burnlink", "sweep", "--watch"]).unwrap();
        match cli.command {
            Commands::Sweep(args) => assert!(args.watch),
            _ => panic!("Expected Sweep command"),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "burnlink",
            "status",
            "-vv",
            "--json-logs",
            "--config",
            "/tmp/burnlink.json5",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.json_logs);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/burnlink.json5")));
    }

    #[test]
    fn test_parse_unknown_command_fails() {
        assert!(Cli::try_parse_from(["burnlink", "gateway"]).is_err());
    }
}
