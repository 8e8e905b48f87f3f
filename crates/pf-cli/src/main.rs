//! # Portal federation CLI

#![forbid(unsafe_code)]

use clap::Parser;
use pf_cli::cli::{Cli, Command};
use pf_cli::commands::{run_check_config, run_lookup, run_resolve, run_validate};
use pf_cli::output::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match &cli.command {
        Command::CheckConfig => run_check_config(&cli.portal),
        Command::Lookup(lookup) => run_lookup(&cli.portal, lookup).await,
        Command::Validate { email } => run_validate(&cli.portal, email).await,
        Command::Resolve { username } => run_resolve(&cli.portal, username).await,
    };

    if let Err(e) = result {
        error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
