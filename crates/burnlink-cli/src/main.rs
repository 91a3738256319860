//! Burnlink CLI entry point.

use burnlink_cli::{commands, run, Cli};
use burnlink_core::config::LoggingConfig;
use burnlink_core::env::{self, vars};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A broken config file is reported by the command itself.
    let logging = commands::load_config(cli.config.as_deref())
        .map(|config| config.logging)
        .unwrap_or_default();
    init_tracing(&cli, &logging);

    run(cli).await
}

fn init_tracing(cli: &Cli, logging: &LoggingConfig) {
    let level = match cli.verbose {
        0 => logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let filter = env::get_var(vars::BURNLINK_LOG)
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(format!("burnlink={level}")));

    // Logs go to stderr; stdout carries share links and plaintext.
    let json = cli.json_logs || logging.json;
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}
