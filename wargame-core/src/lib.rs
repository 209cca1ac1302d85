//! Wargame Core - Game engine and AI
//!
//! This crate provides the core game logic for the AI wargame:
//! - Board geometry (square grid, row/column coordinates)
//! - Unit types with damage and repair tables
//! - Game state, move legality and combat resolution
//! - Static heuristic evaluation (e0, e1, e2)
//! - Minimax and alpha-beta search under a time budget

pub mod coord;
pub mod unit;
pub mod config;
pub mod game;
pub mod rules;
pub mod eval;
pub mod ai;

// Re-exports for convenient access
pub use coord::{Coord, CoordPair, ParseCoordError};
pub use unit::{Player, Unit, UnitType, MAX_HEALTH};
pub use config::{ConfigError, GameType, Options};
pub use game::Game;
pub use rules::{Action, IllegalMove};
pub use eval::{Heuristic, Score, MAX_HEURISTIC_SCORE, MIN_HEURISTIC_SCORE};
pub use ai::{SearchReport, SearchStats, Searcher};
