//! `hub-cli` binary.

use anyhow::{Context, Result};
use clap::Parser;
use content_hub_cli::{cli::Cli, commands};
use content_hub_runtime::{init_logging, LoggingOptions};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Default to info-level logs; override via RUST_LOG if needed.
    let _logging = init_logging(&LoggingOptions {
        log_dir: cli.log_file.clone(),
        file_prefix: "hub-cli.log".to_string(),
        ..LoggingOptions::default()
    })
    .context("failed to initialize logging")?;

    commands::run(cli).await
}
