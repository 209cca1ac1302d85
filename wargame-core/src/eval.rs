//! Position evaluation

use crate::config::ConfigError;
use crate::game::Game;
use crate::unit::{Player, Unit, UnitType};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Heuristic score
pub type Score = i32;

/// Upper sentinel, above any real evaluation
pub const MAX_HEURISTIC_SCORE: Score = 2_000_000_000;

/// Lower sentinel, below any real evaluation
pub const MIN_HEURISTIC_SCORE: Score = -2_000_000_000;

/// Static board evaluation used at the search horizon
///
/// Deserializes from the same spellings as `FromStr` (`"e1"`, `"E1"`, `"1"`) or an integer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HeuristicRepr")]
pub enum Heuristic {
    /// Material count, AI dominant
    #[default]
    E0,
    /// AI health and protection by adjacent units
    E1,
    /// Weighted health totals
    E2,
}

impl Heuristic {
    /// Score from the perspective of the player about to move
    pub fn evaluate(self, game: &Game) -> Score {
        self.score_for(game, game.next_player())
    }

    /// Score from `player`'s perspective (positive is good for `player`)
    pub fn score_for(self, game: &Game, player: Player) -> Score {
        let side = |p: Player| match self {
            Heuristic::E0 => side_total(game, p, material),
            Heuristic::E1 => ai_protection(game, p),
            Heuristic::E2 => side_total(game, p, weighted_health),
        };
        let attacker_minus_defender = side(Player::Attacker) - side(Player::Defender);
        match player {
            Player::Attacker => attacker_minus_defender,
            Player::Defender => -attacker_minus_defender,
        }
    }
}

impl FromStr for Heuristic {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "e0" | "0" => Ok(Heuristic::E0),
            "e1" | "1" => Ok(Heuristic::E1),
            "e2" | "2" => Ok(Heuristic::E2),
            other => Err(ConfigError::UnknownHeuristic(other.to_string())),
        }
    }
}

/// Accepted JSON forms of a heuristic
#[derive(Deserialize)]
#[serde(untagged)]
enum HeuristicRepr {
    Name(String),
    Index(u64),
}

impl TryFrom<HeuristicRepr> for Heuristic {
    type Error = ConfigError;

    fn try_from(repr: HeuristicRepr) -> Result<Self, Self::Error> {
        match repr {
            HeuristicRepr::Name(name) => name.parse(),
            HeuristicRepr::Index(index) => index.to_string().parse(),
        }
    }
}

// ============================================================================
// E0 / E2
// ============================================================================

fn side_total(game: &Game, player: Player, value: fn(&Unit) -> Score) -> Score {
    game.player_units(player).map(|(_, unit)| value(&unit)).sum()
}

fn material(unit: &Unit) -> Score {
    match unit.unit_type {
        UnitType::AI => 9999,
        UnitType::Tech | UnitType::Virus | UnitType::Program | UnitType::Firewall => 3,
    }
}

fn weighted_health(unit: &Unit) -> Score {
    let weight = match unit.unit_type {
        UnitType::AI => 999,
        UnitType::Virus => 20,
        UnitType::Tech => 10,
        UnitType::Firewall | UnitType::Program => 1,
    };
    weight * unit.health as Score
}

// ============================================================================
// E1
// ============================================================================

/// Bonus for a friendly unit guarding the AI
fn guard_bonus(unit: &Unit) -> Score {
    let h = unit.health as Score;
    match unit.unit_type {
        UnitType::Virus | UnitType::Tech => 100 * h,
        UnitType::Firewall | UnitType::Program => 50 * h,
        UnitType::AI => 0,
    }
}

/// Penalty for an enemy unit next to the AI
fn threat_penalty(unit: &Unit) -> Score {
    let h = unit.health as Score;
    match unit.unit_type {
        UnitType::Virus | UnitType::Tech => 50 * h,
        UnitType::Firewall | UnitType::Program => 25 * h,
        UnitType::AI => 0,
    }
}

/// Per-type buckets for one side, summed
fn ai_protection(game: &Game, player: Player) -> Score {
    let mut buckets = [0 as Score; UnitType::ALL.len()];

    for (coord, unit) in game.player_units(player) {
        if unit.unit_type != UnitType::AI {
            buckets[unit.unit_type as usize] += 1;
            continue;
        }

        let ai_health = unit.health as Score;
        buckets[UnitType::AI as usize] += 999 * ai_health;

        // Off-board neighbours count as open flanks
        for adj in coord.iter_adjacent() {
            match game.get(adj) {
                Some(neighbour) if neighbour.player == player => {
                    let bonus = guard_bonus(neighbour);
                    if neighbour.unit_type != UnitType::AI {
                        buckets[neighbour.unit_type as usize] += bonus;
                        buckets[UnitType::AI as usize] += bonus;
                    }
                }
                Some(neighbour) => {
                    buckets[neighbour.unit_type as usize] -= threat_penalty(neighbour);
                }
                None => buckets[UnitType::AI as usize] -= 100 * ai_health,
            }
        }
    }

    buckets.iter().sum()
}

// ============================================================================
// TESTS
// ============================================================================
