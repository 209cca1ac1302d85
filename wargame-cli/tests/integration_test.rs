//! Integration tests for the wargame
//!
//! Tests the full stack: options, rules, heuristics and search playing whole games

use std::time::Instant;

use wargame_core::{
    Action, Coord, CoordPair, Game, GameType, Heuristic, IllegalMove, Options, Player, Searcher,
    Unit, UnitType,
};

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn mv(s: &str) -> CoordPair {
    CoordPair::parse(s).unwrap()
}

fn auto_options(depth: u32, max_turns: u32) -> Options {
    Options {
        game_type: GameType::CompVsComp,
        ..Options::default()
    }
    .deterministic()
    .with_depth(depth)
    .with_time(60.0)
    .with_max_turns(Some(max_turns))
}

/// Play computer vs computer until the game ends or a side has no move
fn play_out(game: &mut Game, searcher: &mut Searcher) -> Option<Player> {
    while !game.is_finished() {
        let report = searcher.suggest_move(game);
        let best = report.best_move?;
        game.perform_move(best).expect("search returns legal moves");
        game.next_turn();
    }
    game.has_winner()
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_initial_board() {
    let game = Game::new(Options::default());
    let expect = [
        ("A0", Player::Defender, UnitType::AI),
        ("B0", Player::Defender, UnitType::Tech),
        ("A1", Player::Defender, UnitType::Tech),
        ("C0", Player::Defender, UnitType::Firewall),
        ("A2", Player::Defender, UnitType::Firewall),
        ("B1", Player::Defender, UnitType::Program),
        ("E4", Player::Attacker, UnitType::AI),
        ("D4", Player::Attacker, UnitType::Virus),
        ("E3", Player::Attacker, UnitType::Virus),
        ("C4", Player::Attacker, UnitType::Program),
        ("E2", Player::Attacker, UnitType::Program),
        ("D3", Player::Attacker, UnitType::Firewall),
    ];
    for (cell, player, unit_type) in expect {
        let unit = game.get(Coord::parse(cell).unwrap()).copied();
        assert_eq!(unit, Some(Unit::new(player, unit_type)), "cell {}", cell);
    }
    assert_eq!(game.player_units(Player::Attacker).count(), 6);
    assert_eq!(game.player_units(Player::Defender).count(), 6);
    assert_eq!(game.next_player(), Player::Attacker);
    assert_eq!(game.turns_played(), 0);

    let board = game.to_string();
    assert!(board.contains("dA9 dT9 dF9"));
    assert!(board.contains("aP9 aV9 aA9"));
}

#[test]
fn test_illegal_backward_move() {
    let mut game = Game::new(Options::default());
    let before = game.to_string();

    // Onto its own full-health virus
    assert_eq!(game.perform_move(mv("E4 E3")), Err(IllegalMove::NotRepairable));

    // Program from C4 to an empty cell after it has moved forward
    assert_eq!(game.perform_move(mv("C4 B4")), Ok(Action::Move));
    game.next_turn();
    assert_eq!(game.perform_move(mv("B1 C1")), Ok(Action::Move));
    game.next_turn();
    let after_setup = game.to_string();
    assert_eq!(
        game.perform_move(mv("B4 C4")),
        Err(IllegalMove::WrongDirection(Player::Attacker))
    );
    assert_eq!(game.to_string(), after_setup);
    assert_ne!(after_setup, before);
}

#[test]
fn test_self_destruct_blast() {
    let mut game = Game::empty(Options::default());
    let centre = Coord::new(2, 2);
    game.set(centre, Some(Unit::new(Player::Attacker, UnitType::Virus)));
    for coord in centre.iter_range(1).filter(|&c| c != centre) {
        let player = if coord.row < 2 { Player::Defender } else { Player::Attacker };
        game.set(coord, Some(Unit::new(player, UnitType::Program).with_health(5)));
    }

    assert_eq!(game.perform_move(mv("C2 C2")), Ok(Action::SelfDestruct));
    assert!(game.get(centre).is_none());
    for coord in centre.iter_range(1).filter(|&c| c != centre) {
        assert_eq!(game.get(coord).map(|u| u.health), Some(3), "cell {}", coord);
    }
}

#[test]
fn test_killing_ai_ends_game() {
    let mut game = Game::empty(auto_options(2, 100));
    game.set(Coord::new(0, 0), Some(Unit::new(Player::Defender, UnitType::AI).with_health(2)));
    game.set(Coord::new(1, 0), Some(Unit::new(Player::Attacker, UnitType::Virus)));
    game.set(Coord::new(4, 4), Some(Unit::new(Player::Attacker, UnitType::AI)));

    let mut searcher = Searcher::new(game.options());
    let winner = play_out(&mut game, &mut searcher);
    assert_eq!(winner, Some(Player::Attacker));
    assert!(!game.has_ai(Player::Defender));
    assert_eq!(game.turns_played(), 1);
}

// ============================================================================
// FULL GAMES
// ============================================================================

#[test]
fn test_auto_game_completes() {
    for heuristic in [Heuristic::E0, Heuristic::E1, Heuristic::E2] {
        for alpha_beta in [true, false] {
            let options = auto_options(2, 20)
                .with_heuristic(heuristic)
                .with_alpha_beta(alpha_beta);
            let mut game = Game::new(options);
            let mut searcher = Searcher::new(game.options());

            let winner = play_out(&mut game, &mut searcher);
            assert!(winner.is_some(), "{:?} alpha_beta={}", heuristic, alpha_beta);
            assert!(game.turns_played() <= 20);
            assert!(searcher.stats().total_evaluations() > 0);
        }
    }
}

#[test]
fn test_turn_limit_favours_defender() {
    let mut game = Game::new(auto_options(1, 2));
    let mut searcher = Searcher::new(game.options());
    let winner = play_out(&mut game, &mut searcher);

    // Two depth-1 moves cannot reach the opposing AI
    assert_eq!(winner, Some(Player::Defender));
    assert_eq!(game.turns_played(), 2);
}

#[test]
fn test_seeded_games_replay_identically() {
    let options = Options {
        randomize_moves: true,
        ..auto_options(2, 12)
    }
    .with_seed(42);

    let mut first = Game::new(options.clone());
    play_out(&mut first, &mut Searcher::new(&options));
    let mut second = Game::new(options.clone());
    play_out(&mut second, &mut Searcher::new(&options));

    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn test_search_respects_time_budget() {
    let options = Options::default().deterministic().with_depth(10).with_time(0.2);
    let game = Game::new(options);
    let mut searcher = Searcher::new(game.options());

    let start = Instant::now();
    let report = searcher.suggest_move(&game);
    let elapsed = start.elapsed();

    assert!(report.timed_out);
    assert!(report.best_move.is_some());
    assert!(elapsed.as_secs_f64() < 2.0, "search took {:?}", elapsed);
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn test_options_file() {
    let path = std::env::temp_dir().join(format!("wargame-options-{}.json", std::process::id()));
    std::fs::write(&path, r#"{"max_depth": 2, "alpha_beta": false, "game_type": "CompVsComp"}"#)
        .unwrap();

    let options = Options::load(&path).unwrap();
    assert_eq!(options.max_depth, 2);
    assert!(!options.alpha_beta);
    assert_eq!(options.game_type, GameType::CompVsComp);
    assert_eq!(options.max_time, 5.0);

    std::fs::write(&path, r#"{"dim": 40}"#).unwrap();
    assert!(Options::load(&path).is_err());

    std::fs::remove_file(&path).unwrap();
}
