//! Chesstoe - console driver
//!
//! Reads commands from stdin or a script, turns them into engine intents,
//! and renders the board after each one.

#![warn(missing_docs)]

mod cli;
mod console;

use anyhow::{Context, Result};
use chesstoe::EngineConfig;
use clap::Parser;
use cli::Cli;
use console::Console;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG: &str = "chesstoe.toml";

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the board.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;
    let mut console = Console::new(&config, cli.json)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.script {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            info!(script = %path.display(), "Replaying script");
            console.run(BufReader::new(file), &mut out, false)
        }
        None => console.run(io::stdin().lock(), &mut out, true),
    }
}

/// Loads the config named on the command line, or the default file if present.
#[instrument]
fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => Ok(EngineConfig::from_file(path)?),
        None if Path::new(DEFAULT_CONFIG).exists() => Ok(EngineConfig::from_file(DEFAULT_CONFIG)?),
        None => {
            info!("No config file, using the standard roster");
            Ok(EngineConfig::default())
        }
    }
}
