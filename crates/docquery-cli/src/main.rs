//! docquery CLI

use anyhow::Result;
use clap::Parser;
use docquery_core::error::exit_codes;
use docquery_core::{Config, DocQueryError, StoreBackend};

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load_from(&config_path)?;
    apply_overrides(&cli, &mut config);

    match cli.command {
        Commands::Ask(args) => commands::ask::run(args, &config, cli.format).await,
        Commands::Ls => commands::ls::run(&config, cli.format).await,
        Commands::Config(args) => commands::config::run(args, &config, &config_path, cli.format),
        Commands::Mcp => commands::mcp::run(&config).await,
    }
}

/// Command-line flags win over the config file and environment
fn apply_overrides(cli: &Cli, config: &mut Config) {
    if let Some(root) = &cli.root {
        config.store.backend = StoreBackend::File;
        config.store.root = Some(root.clone());
    }
    if let Some(bucket) = &cli.bucket {
        config.store.backend = StoreBackend::S3;
        config.store.bucket = bucket.clone();
    }
    if let Some(prefix) = &cli.prefix {
        config.store.prefix = prefix.clone();
    }
}

fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<DocQueryError>()
        .map(DocQueryError::exit_code)
        .unwrap_or(exit_codes::GENERAL_ERROR)
}
