//! Move legality, combat resolution and candidate generation

use crate::coord::{Coord, CoordPair};
use crate::game::Game;
use crate::unit::{Player, Unit, MAX_HEALTH};
use std::fmt;

/// Damage dealt to every unit caught in a self-destruct blast
const SELF_DESTRUCT_DAMAGE: i32 = 2;

// ============================================================================
// CORE TYPES
// ============================================================================

/// What a legal move does
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Move,
    Attack,
    Repair,
    SelfDestruct,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Move => "move",
            Action::Attack => "attack",
            Action::Repair => "repair",
            Action::SelfDestruct => "self-destruct",
        })
    }
}

/// Why a move was rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IllegalMove {
    #[error("coordinates are off the board")]
    OutOfBounds,

    #[error("no unit at {0}")]
    NoUnit(Coord),

    #[error("unit at {0} belongs to the other player")]
    NotYourUnit(Coord),

    #[error("units may only act on an orthogonally adjacent cell")]
    NotAdjacent,

    #[error("{0} may only move toward the enemy")]
    WrongDirection(Player),

    #[error("unit is engaged in combat and cannot retreat")]
    Engaged,

    #[error("target cannot be repaired by this unit")]
    NotRepairable,
}

// ============================================================================
// LEGALITY
// ============================================================================

impl Game {
    /// Classify a move for the player about to move
    pub fn classify(&self, mv: CoordPair) -> Result<Action, IllegalMove> {
        let CoordPair { src, dst } = mv;

        if !self.is_valid_coord(src) || !self.is_valid_coord(dst) {
            return Err(IllegalMove::OutOfBounds);
        }

        let unit = *self.get(src).ok_or(IllegalMove::NoUnit(src))?;
        if unit.player != self.next_player() {
            return Err(IllegalMove::NotYourUnit(src));
        }

        match self.get(dst) {
            None => self.classify_movement(src, dst, &unit),
            Some(target) => self.classify_interaction(src, dst, &unit, target),
        }
    }

    pub fn is_valid_move(&self, mv: CoordPair) -> bool {
        self.classify(mv).is_ok()
    }

    /// Whether any enemy of `player` is orthogonally adjacent to `coord`
    pub fn is_engaged(&self, coord: Coord, player: Player) -> bool {
        coord
            .iter_adjacent()
            .any(|adj| matches!(self.get(adj), Some(u) if u.player != player))
    }

    fn classify_movement(&self, src: Coord, dst: Coord, unit: &Unit) -> Result<Action, IllegalMove> {
        if src.manhattan(dst) != 1 {
            return Err(IllegalMove::NotAdjacent);
        }

        if !unit.unit_type.is_direction_restricted() {
            return Ok(Action::Move);
        }

        let forward = match unit.player {
            Player::Attacker => dst.row < src.row || dst.col < src.col,
            Player::Defender => dst.row > src.row || dst.col > src.col,
        };
        if !forward {
            return Err(IllegalMove::WrongDirection(unit.player));
        }
        if self.is_engaged(src, unit.player) {
            return Err(IllegalMove::Engaged);
        }

        Ok(Action::Move)
    }

    fn classify_interaction(
        &self,
        src: Coord,
        dst: Coord,
        unit: &Unit,
        target: &Unit,
    ) -> Result<Action, IllegalMove> {
        if src == dst {
            return Ok(Action::SelfDestruct);
        }
        if src.manhattan(dst) != 1 {
            return Err(IllegalMove::NotAdjacent);
        }
        if target.player != unit.player {
            return Ok(Action::Attack);
        }
        if target.health < MAX_HEALTH && unit.unit_type.can_repair(target.unit_type) {
            return Ok(Action::Repair);
        }
        Err(IllegalMove::NotRepairable)
    }

    // ========================================================================
    // RESOLUTION
    // ========================================================================

    /// Validate and apply a move; the game is untouched when it is illegal
    ///
    /// Does not advance the turn.
    pub fn perform_move(&mut self, mv: CoordPair) -> Result<Action, IllegalMove> {
        let action = self.classify(mv)?;
        let CoordPair { src, dst } = mv;

        match action {
            Action::Move => {
                let unit = self.get(src).copied();
                self.set(dst, unit);
                self.set(src, None);
            }
            Action::Attack => self.apply_attack(src, dst),
            Action::Repair => self.apply_repair(src, dst),
            Action::SelfDestruct => self.apply_self_destruct(src),
        }

        Ok(action)
    }

    fn apply_attack(&mut self, src: Coord, dst: Coord) {
        let (attacker, defender) = match (self.get(src), self.get(dst)) {
            (Some(a), Some(d)) => (*a, *d),
            _ => return,
        };

        // Both sides strike at once, from pre-combat health
        let dealt = attacker.damage_amount(&defender);
        let taken = defender.damage_amount(&attacker);
        self.mod_health(dst, -(dealt as i32));
        self.mod_health(src, -(taken as i32));
    }

    fn apply_repair(&mut self, src: Coord, dst: Coord) {
        let amount = match (self.get(src), self.get(dst)) {
            (Some(repairer), Some(target)) => repairer.repair_amount(target),
            _ => return,
        };
        self.mod_health(dst, amount as i32);
    }

    fn apply_self_destruct(&mut self, src: Coord) {
        self.mod_health(src, -(MAX_HEALTH as i32));
        for coord in src.iter_range(1) {
            self.mod_health(coord, -SELF_DESTRUCT_DAMAGE);
        }
    }

    // ========================================================================
    // CANDIDATES
    // ========================================================================

    /// Legal moves for the player about to move
    ///
    /// Units in row-major order; per unit: up, left, down, right, then self.
    pub fn move_candidates(&self) -> impl Iterator<Item = CoordPair> + '_ {
        self.player_units(self.next_player())
            .flat_map(|(src, _)| {
                src.iter_adjacent()
                    .chain(std::iter::once(src))
                    .map(move |dst| CoordPair::new(src, dst))
            })
            .filter(move |mv| self.is_valid_move(*mv))
    }
}

// ============================================================================
// TESTS
// ============================================================================
