//! Suggest command - search a position reached from the initial layout
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: replay_moves(), report_suggestion()
//! - Level 4: output formatting

use anyhow::{Context, Result};
use clap::Args;

use wargame_core::{CoordPair, Game, Options, SearchReport, SearchStats, Searcher};

use crate::args::GameArgs;
use crate::report::format_search_report;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SuggestArgs {
    #[command(flatten)]
    pub game: GameArgs,

    /// Comma-separated moves to replay first, e.g. "D3 C3,B1 C1"
    #[arg(long, value_delimiter = ',')]
    pub moves: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run suggest command
///
/// 1. Replay the given moves from the initial layout
/// 2. Search the resulting position
/// 3. Report the suggestion
pub fn run(args: SuggestArgs) -> Result<()> {
    let options = args.game.to_options()?;
    let game = replay_moves(options, &args.moves)?;

    tracing::info!(
        "Searching for {} after {} turns (depth={})",
        game.next_player(),
        game.turns_played(),
        game.options().max_depth
    );

    let mut searcher = Searcher::new(game.options());
    let report = searcher.suggest_move(&game);

    report_suggestion(&game, &report, searcher.stats(), args.json);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Apply each move in turn; every one must be legal
fn replay_moves(options: Options, moves: &[String]) -> Result<Game> {
    let mut game = Game::new(options);
    for (i, text) in moves.iter().enumerate() {
        let mv: CoordPair = text
            .parse()
            .with_context(|| format!("move {} ({:?}) is not a valid move", i + 1, text))?;
        game.perform_move(mv)
            .with_context(|| format!("move {} ({}) is illegal", i + 1, mv))?;
        game.next_turn();
    }
    Ok(game)
}

fn report_suggestion(game: &Game, report: &SearchReport, stats: &SearchStats, json: bool) {
    if json {
        print_json_suggestion(game, report);
    } else {
        print_text_suggestion(game, report, stats);
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_json_suggestion(game: &Game, report: &SearchReport) {
    #[derive(serde::Serialize)]
    struct JsonOutput {
        player: String,
        turns_played: u32,
        best_move: Option<String>,
        score: i32,
        elapsed_seconds: f64,
        evaluations_per_ply: Vec<u64>,
        total_evaluations: u64,
        timed_out: bool,
    }

    let output = JsonOutput {
        player: game.next_player().to_string(),
        turns_played: game.turns_played(),
        best_move: report.best_move.map(|mv| mv.to_string()),
        score: report.score,
        elapsed_seconds: report.elapsed.as_secs_f64(),
        evaluations_per_ply: report.evaluations_per_ply.clone(),
        total_evaluations: report.total_evaluations(),
        timed_out: report.timed_out,
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

fn print_text_suggestion(game: &Game, report: &SearchReport, stats: &SearchStats) {
    println!("{}", game);
    match report.best_move {
        Some(mv) => println!("Suggested move for {}: {}", game.next_player(), mv),
        None => println!("{} has no legal move", game.next_player()),
    }
    println!("{}", format_search_report(report, stats));
}

#[cfg(test)]
mod tests {
    use super::*;
    use wargame_core::{Coord, Player, UnitType};

    fn moves(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_replay_legal_moves() {
        let game = replay_moves(Options::default(), &moves(&["D3 C3", "B1 C1"])).unwrap();
        assert_eq!(game.turns_played(), 2);
        assert_eq!(game.next_player(), Player::Attacker);
        let unit = game.get(Coord::new(2, 1)).copied();
        assert_eq!(unit.map(|u| u.unit_type), Some(UnitType::Program));
    }

    #[test]
    fn test_replay_rejects_illegal_move() {
        // The attacker's firewall may not move back toward its own corner
        let err = replay_moves(Options::default(), &moves(&["D3 C3", "B1 C1", "C3 D3"])).unwrap_err();
        assert!(err.to_string().contains("move 3 (C3 D3) is illegal"));
    }

    #[test]
    fn test_replay_rejects_bad_text() {
        let err = replay_moves(Options::default(), &moves(&["D3"])).unwrap_err();
        assert!(err.to_string().contains("is not a valid move"));
    }
}
