//! Wargame CLI - Command-line interface
//!
//! Commands:
//! - play: Play a match (human, computer or broker-driven players)
//! - suggest: Ask the search engine for a move in a given position

mod args;
mod broker;
mod play;
mod report;
mod suggest;
mod trace;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "wargame")]
#[command(about = "Two-player AI wargame with minimax and alpha-beta computer players")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a match
    Play(play::PlayArgs),
    /// Suggest a move for a position
    Suggest(suggest::SuggestArgs),
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args),
        Commands::Suggest(args) => {
            suggest::run(args)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
