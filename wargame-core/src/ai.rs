//! Minimax / alpha-beta AI under a time budget

use crate::config::Options;
use crate::coord::CoordPair;
use crate::eval::{Heuristic, Score, MAX_HEURISTIC_SCORE, MIN_HEURISTIC_SCORE};
use crate::game::Game;
use crate::unit::Player;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;
use std::time::{Duration, Instant};

// ============================================================================
// STATISTICS
// ============================================================================

/// Cumulative statistics across all searches of one searcher
#[derive(Clone, Debug, Default)]
pub struct SearchStats {
    /// Simulated positions per ply (ply 1 = root moves)
    pub evaluations_per_ply: FxHashMap<u32, u64>,
    /// Wall-clock time spent searching
    pub total_seconds: f64,
}

impl SearchStats {
    pub fn total_evaluations(&self) -> u64 {
        self.evaluations_per_ply.values().sum()
    }

    /// Evaluations per second over all searches
    pub fn evaluation_rate(&self) -> Option<f64> {
        if self.total_seconds > 0.0 {
            Some(self.total_evaluations() as f64 / self.total_seconds)
        } else {
            None
        }
    }

    fn record(&mut self, report: &SearchReport) {
        for (i, &count) in report.evaluations_per_ply.iter().enumerate() {
            *self.evaluations_per_ply.entry(i as u32 + 1).or_default() += count;
        }
        self.total_seconds += report.elapsed.as_secs_f64();
    }
}

/// Outcome of one top-level search
#[derive(Clone, Debug)]
pub struct SearchReport {
    pub best_move: Option<CoordPair>,
    /// Score of the best line from the mover's perspective (0 if cut short before any result)
    pub score: Score,
    pub elapsed: Duration,
    /// Simulated positions per ply; index 0 is ply 1
    pub evaluations_per_ply: Vec<u64>,
    /// The deadline expired before the search finished
    pub timed_out: bool,
}

impl SearchReport {
    pub fn total_evaluations(&self) -> u64 {
        self.evaluations_per_ply.iter().sum()
    }

    /// Share of this search's evaluations spent at each ply, in percent
    pub fn ply_percentages(&self) -> Vec<f64> {
        let total = self.total_evaluations();
        self.evaluations_per_ply
            .iter()
            .map(|&n| if total > 0 { n as f64 * 100.0 / total as f64 } else { 0.0 })
            .collect()
    }
}

// ============================================================================
// SEARCH CONTEXT
// ============================================================================

/// Per-search state threaded through the recursion
struct SearchContext<'a> {
    /// None when the budget is too large to represent
    deadline: Option<Instant>,
    max_depth: u32,
    heuristic: Heuristic,
    /// Leaves are scored for the player who moves at the root
    perspective: Player,
    evaluations_per_ply: Vec<u64>,
    rng: Option<&'a mut ChaCha8Rng>,
    timed_out: bool,
}

impl<'a> SearchContext<'a> {
    fn new(game: &Game, rng: Option<&'a mut ChaCha8Rng>) -> Self {
        let options = game.options();
        let budget = Duration::try_from_secs_f64(options.max_time).unwrap_or_default();
        Self {
            deadline: Instant::now().checked_add(budget),
            max_depth: options.max_depth,
            heuristic: options.heuristic,
            perspective: game.next_player(),
            evaluations_per_ply: vec![0; options.max_depth as usize],
            rng,
            timed_out: false,
        }
    }

    /// Check the deadline; latches once expired
    fn expired(&mut self) -> bool {
        if !self.timed_out {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    tracing::debug!("search deadline reached");
                    self.timed_out = true;
                }
            }
        }
        self.timed_out
    }

    fn leaf(&self, game: &Game) -> Score {
        self.heuristic.score_for(game, self.perspective)
    }

    fn candidates(&mut self, game: &Game) -> Vec<CoordPair> {
        let mut moves: Vec<CoordPair> = game.move_candidates().collect();
        if let Some(rng) = self.rng.as_deref_mut() {
            moves.shuffle(rng);
        }
        moves
    }

    /// Clone, apply and hand the turn over; counts one evaluation at this ply
    fn simulate(&mut self, game: &Game, mv: CoordPair, depth: u32) -> Option<Game> {
        let mut child = game.clone();
        child.perform_move(mv).ok()?;
        child.next_turn();

        let ply = self.max_depth.saturating_sub(depth) as usize;
        if let Some(count) = self.evaluations_per_ply.get_mut(ply) {
            *count += 1;
        }
        Some(child)
    }
}

// ============================================================================
// SEARCHER
// ============================================================================

/// Computer player: runs searches and keeps cumulative statistics
pub struct Searcher {
    stats: SearchStats,
    rng: Option<ChaCha8Rng>,
}

impl Searcher {
    /// Shuffles candidates when `randomize_moves` is set (seeded from `seed` if given)
    pub fn new(options: &Options) -> Self {
        let rng = if options.randomize_moves {
            Some(match options.seed {
                Some(seed) => ChaCha8Rng::seed_from_u64(seed),
                None => ChaCha8Rng::from_entropy(),
            })
        } else {
            None
        };
        Self {
            stats: SearchStats::default(),
            rng,
        }
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Search the position with the game's own options
    pub fn suggest_move(&mut self, game: &Game) -> SearchReport {
        let options = game.options();
        let start = Instant::now();
        tracing::debug!(
            player = %game.next_player(),
            depth = options.max_depth,
            alpha_beta = options.alpha_beta,
            heuristic = ?options.heuristic,
            "search started"
        );

        let mut ctx = SearchContext::new(game, self.rng.as_mut());
        let depth = options.max_depth;
        let (score, found) = if options.alpha_beta {
            alphabeta(game, depth, MIN_HEURISTIC_SCORE, MAX_HEURISTIC_SCORE, true, &mut ctx)
        } else {
            minimax(game, depth, true, &mut ctx)
        };

        let timed_out = ctx.timed_out;
        let evaluations_per_ply = ctx.evaluations_per_ply;

        // Deadline hit before any root move was scored: fall back to the first legal move
        let (best_move, score) = match found {
            Some(mv) => (Some(mv), score),
            None if timed_out => (game.move_candidates().next(), 0),
            None => (None, score),
        };

        let report = SearchReport {
            best_move,
            score,
            elapsed: start.elapsed(),
            evaluations_per_ply,
            timed_out,
        };
        self.stats.record(&report);

        tracing::debug!(
            best_move = ?report.best_move.map(|m| m.to_string()),
            score = report.score,
            evaluations = report.total_evaluations(),
            timed_out = report.timed_out,
            "search finished"
        );

        report
    }
}

// ============================================================================
// MINIMAX
// ============================================================================

fn improves(maximizing: bool, score: Score, best: Score) -> bool {
    if maximizing {
        score > best
    } else {
        score < best
    }
}

fn minimax(
    game: &Game,
    depth: u32,
    maximizing: bool,
    ctx: &mut SearchContext<'_>,
) -> (Score, Option<CoordPair>) {
    if ctx.expired() {
        return (0, None);
    }
    if depth == 0 {
        return (ctx.leaf(game), None);
    }

    let moves = ctx.candidates(game);
    if moves.is_empty() {
        return (ctx.leaf(game), None);
    }

    let mut best = if maximizing { MIN_HEURISTIC_SCORE } else { MAX_HEURISTIC_SCORE };
    let mut best_move = None;

    for mv in moves {
        let Some(child) = ctx.simulate(game, mv, depth) else {
            continue;
        };
        let (score, _) = minimax(&child, depth - 1, !maximizing, ctx);

        // A truncated subtree's value is meaningless
        if ctx.timed_out {
            break;
        }

        if improves(maximizing, score, best) {
            best = score;
            best_move = Some(mv);
        }
    }

    (best, best_move)
}

// ============================================================================
// ALPHA-BETA
// ============================================================================

fn alphabeta(
    game: &Game,
    depth: u32,
    mut alpha: Score,
    mut beta: Score,
    maximizing: bool,
    ctx: &mut SearchContext<'_>,
) -> (Score, Option<CoordPair>) {
    if ctx.expired() {
        return (0, None);
    }
    if depth == 0 {
        return (ctx.leaf(game), None);
    }

    let moves = ctx.candidates(game);
    if moves.is_empty() {
        return (ctx.leaf(game), None);
    }

    let mut best = if maximizing { MIN_HEURISTIC_SCORE } else { MAX_HEURISTIC_SCORE };
    let mut best_move = None;

    for mv in moves {
        let Some(child) = ctx.simulate(game, mv, depth) else {
            continue;
        };
        let (score, _) = alphabeta(&child, depth - 1, alpha, beta, !maximizing, ctx);

        if ctx.timed_out {
            break;
        }

        if improves(maximizing, score, best) {
            best = score;
            best_move = Some(mv);
        }
        if maximizing {
            alpha = alpha.max(best);
        } else {
            beta = beta.min(best);
        }

        if beta <= alpha {
            break;
        }
    }

    (best, best_move)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coord;
    use crate::unit::{Unit, UnitType};

    fn options(depth: u32) -> Options {
        Options::default().deterministic().with_depth(depth).with_time(60.0)
    }

    fn search(game: &Game) -> SearchReport {
        Searcher::new(game.options()).suggest_move(game)
    }

    #[test]
    fn test_ai_returns_legal_move() {
        let game = Game::new(options(2));
        let report = search(&game);
        let mv = report.best_move.expect("should find a move");
        assert!(game.is_valid_move(mv));
        assert!(!report.timed_out);
    }

    #[test]
    fn test_root_evaluation_count() {
        let game = Game::new(options(1));
        let report = search(&game);
        // Twelve legal attacker moves at the start
        assert_eq!(report.evaluations_per_ply, vec![12]);
        assert_eq!(report.total_evaluations(), 12);
        assert_eq!(report.ply_percentages(), vec![100.0]);
    }

    #[test]
    fn test_ai_kills_enemy_ai() {
        let mut game = Game::empty(options(1));
        game.set(Coord::new(0, 0), Some(Unit::new(Player::Defender, UnitType::AI)));
        game.set(Coord::new(1, 0), Some(Unit::new(Player::Attacker, UnitType::Virus)));
        game.set(Coord::new(4, 4), Some(Unit::new(Player::Attacker, UnitType::AI)));

        let report = search(&game);
        assert_eq!(report.best_move, CoordPair::parse("B0A0"));
        assert_eq!(report.score, 9999 + 3);
    }

    #[test]
    fn test_deterministic_without_shuffle() {
        for heuristic in [Heuristic::E0, Heuristic::E1, Heuristic::E2] {
            let game = Game::new(options(3).with_heuristic(heuristic));
            let a = search(&game);
            let b = search(&game);
            assert_eq!((a.score, a.best_move), (b.score, b.best_move));
        }
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let opts = options(2).with_seed(7);
        let opts = Options { randomize_moves: true, ..opts };
        let game = Game::new(opts);
        let a = search(&game);
        let b = search(&game);
        assert_eq!((a.score, a.best_move), (b.score, b.best_move));
    }

    #[test]
    fn test_alpha_beta_matches_minimax() {
        for heuristic in [Heuristic::E0, Heuristic::E1, Heuristic::E2] {
            for depth in 1..=4 {
                let base = options(depth).with_heuristic(heuristic);
                let ab = search(&Game::new(base.clone().with_alpha_beta(true)));
                let mm = search(&Game::new(base.with_alpha_beta(false)));
                assert_eq!(ab.score, mm.score, "{:?} depth {}", heuristic, depth);
                assert!(ab.total_evaluations() <= mm.total_evaluations());
            }
        }
    }

    #[test]
    fn test_timeout_still_returns_move() {
        let game = Game::new(Options::default().deterministic().with_depth(6).with_time(1e-9));
        let report = search(&game);
        assert!(report.timed_out);
        let mv = report.best_move.expect("fallback move");
        assert!(game.is_valid_move(mv));
    }

    #[test]
    fn test_search_does_not_mutate_caller() {
        let game = Game::new(options(2));
        let before = game.to_string();
        let _ = search(&game);
        assert_eq!(game.to_string(), before);
        assert_eq!(game.next_player(), Player::Attacker);
    }

    #[test]
    fn test_stats_accumulate() {
        let game = Game::new(options(2));
        let mut searcher = Searcher::new(game.options());
        let first = searcher.suggest_move(&game);
        let second = searcher.suggest_move(&game);
        let stats = searcher.stats();
        assert_eq!(
            stats.total_evaluations(),
            first.total_evaluations() + second.total_evaluations()
        );
        assert_eq!(stats.evaluations_per_ply.get(&1), Some(&24));
    }

    #[test]
    fn test_no_units_no_move() {
        let mut game = Game::empty(options(2));
        game.set(Coord::new(0, 0), Some(Unit::new(Player::Defender, UnitType::AI)));
        let report = search(&game);
        assert_eq!(report.best_move, None);
        assert_eq!(report.total_evaluations(), 0);
    }
}
