//! Terminal front end for chess matches.
//!
//! `play` hosts a two-player match on one terminal with the turn clock
//! running; `replay` rebuilds a match from an exported event stream.

mod input;
mod play;
mod replay;

use chess_match::MatchConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chess-cli")]
#[command(about = "Play and replay event-sourced chess matches")]
struct Cli {
    /// Configuration file (defaults to chess-match.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the per-turn time limit in milliseconds
    #[arg(long, global = true)]
    turn_duration_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a match between two members on this terminal
    Play {
        /// Write the match's stored events to this file when done
        #[arg(short, long)]
        record: Option<PathBuf>,
    },
    /// Rebuild a match from a JSON array of stored events
    Replay {
        /// Path to the exported event stream
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => MatchConfig::load_from(path)?,
        None => MatchConfig::load()?,
    };
    if let Some(ms) = cli.turn_duration_ms {
        config.turn_duration_ms = ms;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Play { record } => play::run(config, record).await,
        Commands::Replay { file } => replay::run(&file),
    }
}
