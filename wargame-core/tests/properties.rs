//! Property tests for the rules engine and search

use proptest::prelude::*;
use wargame_core::{
    Coord, CoordPair, Game, Heuristic, Options, Player, Searcher, Unit, UnitType, MAX_HEALTH,
};

fn unit_type() -> impl Strategy<Value = UnitType> {
    (0usize..UnitType::ALL.len()).prop_map(|i| UnitType::ALL[i])
}

/// Play a sequence of legal moves chosen by index, stopping early if the game ends
fn reachable_game(options: Options, choices: &[usize]) -> Game {
    let mut game = Game::new(options);
    for &choice in choices {
        if game.is_finished() {
            break;
        }
        let moves: Vec<CoordPair> = game.move_candidates().collect();
        if moves.is_empty() {
            break;
        }
        let mv = moves[choice % moves.len()];
        game.perform_move(mv).expect("candidate moves are legal");
        game.next_turn();
    }
    game
}

fn assert_health_in_range(game: &Game) {
    for player in [Player::Attacker, Player::Defender] {
        for (_, unit) in game.player_units(player) {
            assert!(unit.health >= 1 && unit.health <= MAX_HEALTH);
        }
    }
}

proptest! {
    #[test]
    fn health_stays_clamped(deltas in prop::collection::vec(-20i32..20, 0..30)) {
        let mut unit = Unit::new(Player::Attacker, UnitType::Tech);
        for delta in deltas {
            unit.mod_health(delta);
            prop_assert!(unit.health <= MAX_HEALTH);
        }
    }

    #[test]
    fn damage_and_repair_are_capped(
        attacker in unit_type(),
        target in unit_type(),
        health in 1u8..=MAX_HEALTH,
    ) {
        let source = Unit::new(Player::Attacker, attacker);
        let victim = Unit::new(Player::Defender, target).with_health(health);
        prop_assert!(source.damage_amount(&victim) <= health);

        let friend = Unit::new(Player::Attacker, target).with_health(health);
        prop_assert!(friend.health + source.repair_amount(&friend) <= MAX_HEALTH);
    }

    #[test]
    fn coordinates_round_trip(row in 0i8..26, col in 0i8..16) {
        let coord = Coord::new(row, col);
        prop_assert_eq!(Coord::parse(&coord.to_string()), Some(coord));

        let mv = CoordPair::new(coord, Coord::new(25 - row, 15 - col));
        prop_assert_eq!(CoordPair::parse(&mv.to_string()), Some(mv));
    }

    #[test]
    fn random_play_keeps_board_consistent(choices in prop::collection::vec(0usize..64, 0..40)) {
        let game = reachable_game(Options::default(), &choices);
        assert_health_in_range(&game);
        for mv in game.move_candidates() {
            prop_assert!(game.get(mv.src).map(|u| u.player) == Some(game.next_player()));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn alpha_beta_score_matches_minimax(
        choices in prop::collection::vec(0usize..64, 0..12),
        heuristic in prop_oneof![Just(Heuristic::E0), Just(Heuristic::E1), Just(Heuristic::E2)],
        depth in 1u32..=3,
    ) {
        let options = Options::default()
            .deterministic()
            .with_time(120.0)
            .with_depth(depth)
            .with_heuristic(heuristic)
            .with_max_turns(None);
        let game = reachable_game(options.clone().with_alpha_beta(true), &choices);
        let minimax_game = reachable_game(options.with_alpha_beta(false), &choices);
        prop_assert_eq!(game.to_string(), minimax_game.to_string());

        let ab = Searcher::new(game.options()).suggest_move(&game);
        let mm = Searcher::new(minimax_game.options()).suggest_move(&minimax_game);
        prop_assert!(!ab.timed_out && !mm.timed_out);
        prop_assert_eq!(ab.score, mm.score);
    }
}
