//! Game options
//!
//! Options are loaded from JSON (missing fields take defaults) and shared
//! read-only between a game and all of its search clones.

use crate::eval::Heuristic;
use crate::unit::Player;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Who controls each side
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameType {
    /// Human vs human
    #[default]
    AttackerVsDefender,
    /// Human attacker vs computer defender
    AttackerVsComp,
    /// Computer attacker vs human defender
    CompVsDefender,
    /// Computer vs computer
    CompVsComp,
}

impl GameType {
    /// Whether `player` is driven by the search engine
    pub fn is_computer(self, player: Player) -> bool {
        match self {
            GameType::AttackerVsDefender => false,
            GameType::AttackerVsComp => player == Player::Defender,
            GameType::CompVsDefender => player == Player::Attacker,
            GameType::CompVsComp => true,
        }
    }

    /// Short description used in trace headers
    pub fn play_mode(self) -> &'static str {
        match self {
            GameType::AttackerVsDefender => "Player 1 = H & Player 2 = H",
            GameType::AttackerVsComp => "Player 1 = H & Player 2 = AI",
            GameType::CompVsDefender => "Player 1 = AI & Player 2 = H",
            GameType::CompVsComp => "Player 1 = AI & Player 2 = AI",
        }
    }
}

impl FromStr for GameType {
    type Err = ConfigError;

    /// Accepts `manual`, `attacker` (human attacker), `defender` (human defender) or `auto`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(GameType::AttackerVsDefender),
            "attacker" => Ok(GameType::AttackerVsComp),
            "defender" => Ok(GameType::CompVsDefender),
            "auto" => Ok(GameType::CompVsComp),
            other => Err(ConfigError::UnknownGameType(other.to_string())),
        }
    }
}

/// Invalid option values
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("board dimension must be between {min} and {max}, got {got}")]
    BadDimension { min: u8, max: u8, got: u8 },

    #[error("search depth must be at least 1")]
    ZeroDepth,

    #[error("search time must be positive, got {0}")]
    BadTime(f64),

    #[error("turn limit must be at least 1")]
    ZeroTurns,

    #[error("unknown game type '{0}' (expected auto, attacker, defender or manual)")]
    UnknownGameType(String),

    #[error("unknown heuristic '{0}' (expected e0, e1 or e2)")]
    UnknownHeuristic(String),
}

/// Smallest board that fits the initial layout
pub const MIN_DIM: u8 = 3;

/// Largest board the column alphabet can address
pub const MAX_DIM: u8 = 16;

/// Game and search options
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Board dimension (dim x dim)
    pub dim: u8,
    /// Search depth
    pub max_depth: u32,
    /// Time budget per search, in seconds
    pub max_time: f64,
    /// Who controls each side
    pub game_type: GameType,
    /// Alpha-beta pruning (plain minimax when false)
    pub alpha_beta: bool,
    /// Leaf evaluation
    pub heuristic: Heuristic,
    /// Defender wins once this many turns have been played
    pub max_turns: Option<u32>,
    /// Shuffle candidate moves before searching them
    pub randomize_moves: bool,
    /// Seed for move shuffling (entropy when None)
    pub seed: Option<u64>,
    /// Move broker URL
    pub broker: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            dim: 5,
            max_depth: 4,
            max_time: 5.0,
            game_type: GameType::AttackerVsDefender,
            alpha_beta: true,
            heuristic: Heuristic::E0,
            max_turns: Some(100),
            randomize_moves: true,
            seed: None,
            broker: None,
        }
    }
}

impl Options {
    /// Load from a JSON file and validate
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let options: Options = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_DIM..=MAX_DIM).contains(&self.dim) {
            return Err(ConfigError::BadDimension {
                min: MIN_DIM,
                max: MAX_DIM,
                got: self.dim,
            });
        }
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if !(self.max_time > 0.0) {
            return Err(ConfigError::BadTime(self.max_time));
        }
        if self.max_turns == Some(0) {
            return Err(ConfigError::ZeroTurns);
        }
        Ok(())
    }

    /// Deterministic search setup: no shuffling
    pub fn deterministic(mut self) -> Self {
        self.randomize_moves = false;
        self
    }

    pub fn with_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_time(mut self, max_time: f64) -> Self {
        self.max_time = max_time;
        self
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_alpha_beta(mut self, alpha_beta: bool) -> Self {
        self.alpha_beta = alpha_beta;
        self
    }

    pub fn with_max_turns(mut self, max_turns: Option<u32>) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
