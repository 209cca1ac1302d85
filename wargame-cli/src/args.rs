//! Option flags shared by all commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use wargame_core::{GameType, Heuristic, Options};

#[derive(Args, Clone, Debug, Default)]
pub struct GameArgs {
    /// JSON options file; flags below override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum search depth
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Maximum search time in seconds
    #[arg(long)]
    pub max_time: Option<f64>,

    /// Turn limit (the defender wins when it is reached)
    #[arg(long)]
    pub max_turns: Option<u32>,

    /// Game type: auto | attacker | defender | manual
    #[arg(long)]
    pub game_type: Option<GameType>,

    /// Leaf heuristic: e0 | e1 | e2
    #[arg(long)]
    pub heuristic: Option<Heuristic>,

    /// Use plain minimax instead of alpha-beta
    #[arg(long)]
    pub minimax: bool,

    /// Search candidate moves in generation order
    #[arg(long)]
    pub no_randomize: bool,

    /// Seed for candidate shuffling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Play via a game broker at this URL
    #[arg(long)]
    pub broker: Option<String>,
}

impl GameArgs {
    /// Options file (or defaults) with command-line overrides applied
    pub fn to_options(&self) -> Result<Options> {
        let mut options = match &self.config {
            Some(path) => Options::load(path)
                .with_context(|| format!("Failed to load options: {}", path.display()))?,
            None => Options::default(),
        };

        if let Some(depth) = self.max_depth {
            options.max_depth = depth;
        }
        if let Some(time) = self.max_time {
            options.max_time = time;
        }
        if let Some(turns) = self.max_turns {
            options.max_turns = Some(turns);
        }
        if let Some(game_type) = self.game_type {
            options.game_type = game_type;
        }
        if let Some(heuristic) = self.heuristic {
            options.heuristic = heuristic;
        }
        if self.minimax {
            options.alpha_beta = false;
        }
        if self.no_randomize {
            options.randomize_moves = false;
        }
        if let Some(seed) = self.seed {
            options.seed = Some(seed);
        }
        if let Some(broker) = &self.broker {
            options.broker = Some(broker.clone());
        }

        options.validate()?;
        Ok(options)
    }
}
