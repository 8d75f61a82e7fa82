//! Command-line interface for the chesstoe console.

use clap::Parser;
use std::path::PathBuf;

/// Chesstoe - chess-piece tic-tac-toe in the terminal
#[derive(Parser, Debug)]
#[command(name = "chesstoe")]
#[command(about = "Play chess-piece tic-tac-toe from the console", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file. Defaults to chesstoe.toml if it exists.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Replay commands from a file instead of reading stdin
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// Print each intent report as a JSON line
    #[arg(long)]
    pub json: bool,
}
