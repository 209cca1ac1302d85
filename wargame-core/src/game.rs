//! Game state

use crate::config::{Options, MAX_DIM, MIN_DIM};
use crate::coord::{Coord, CoordPair};
use crate::unit::{Player, Unit, UnitType};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// GAME STATE
// ============================================================================

/// Game state (clone to simulate)
///
/// Cloning copies the grid by value; options are shared.
#[derive(Clone, Debug)]
pub struct Game {
    /// Row-major `dim x dim` grid
    board: Vec<Option<Unit>>,
    dim: i8,

    next_player: Player,
    turns_played: u32,

    /// AI presence flags (once false, never true again)
    attacker_has_ai: bool,
    defender_has_ai: bool,

    options: Arc<Options>,
}

impl Game {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// New game with the standard initial layout
    pub fn new(options: Options) -> Self {
        let mut game = Self::empty(options);
        let md = game.dim - 1;

        let defender = [
            (0, 0, UnitType::AI),
            (1, 0, UnitType::Tech),
            (0, 1, UnitType::Tech),
            (2, 0, UnitType::Firewall),
            (0, 2, UnitType::Firewall),
            (1, 1, UnitType::Program),
        ];
        let attacker = [
            (md, md, UnitType::AI),
            (md - 1, md, UnitType::Virus),
            (md, md - 1, UnitType::Virus),
            (md - 2, md, UnitType::Program),
            (md, md - 2, UnitType::Program),
            (md - 1, md - 1, UnitType::Firewall),
        ];

        for (row, col, unit_type) in defender {
            game.set(Coord::new(row, col), Some(Unit::new(Player::Defender, unit_type)));
        }
        for (row, col, unit_type) in attacker {
            game.set(Coord::new(row, col), Some(Unit::new(Player::Attacker, unit_type)));
        }

        game
    }

    /// Game with no units on the board
    ///
    /// The dimension is clamped to `MIN_DIM..=MAX_DIM` for options that skipped validation.
    pub fn empty(options: Options) -> Self {
        let dim = options.dim.clamp(MIN_DIM, MAX_DIM) as i8;
        Self {
            board: vec![None; (dim as usize) * (dim as usize)],
            dim,
            next_player: Player::Attacker,
            turns_played: 0,
            attacker_has_ai: true,
            defender_has_ai: true,
            options: Arc::new(options),
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn dim(&self) -> i8 {
        self.dim
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Player about to move
    pub fn next_player(&self) -> Player {
        self.next_player
    }

    pub fn turns_played(&self) -> u32 {
        self.turns_played
    }

    pub fn has_ai(&self, player: Player) -> bool {
        match player {
            Player::Attacker => self.attacker_has_ai,
            Player::Defender => self.defender_has_ai,
        }
    }

    pub fn is_valid_coord(&self, coord: Coord) -> bool {
        (0..self.dim).contains(&coord.row) && (0..self.dim).contains(&coord.col)
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if self.is_valid_coord(coord) {
            Some(coord.row as usize * self.dim as usize + coord.col as usize)
        } else {
            None
        }
    }

    /// Unit at a cell (None for empty or off-board cells)
    pub fn get(&self, coord: Coord) -> Option<&Unit> {
        self.index(coord).and_then(|i| self.board[i].as_ref())
    }

    pub(crate) fn get_mut(&mut self, coord: Coord) -> Option<&mut Unit> {
        match self.index(coord) {
            Some(i) => self.board[i].as_mut(),
            None => None,
        }
    }

    /// Place or clear a cell; off-board coordinates are ignored
    pub fn set(&mut self, coord: Coord, unit: Option<Unit>) {
        if let Some(i) = self.index(coord) {
            self.board[i] = unit;
        }
    }

    pub fn is_empty(&self, coord: Coord) -> bool {
        self.get(coord).is_none()
    }

    /// Units of a player, row-major
    pub fn player_units(&self, player: Player) -> impl Iterator<Item = (Coord, Unit)> + '_ {
        CoordPair::from_dim(self.dim)
            .iter_rectangle()
            .filter_map(move |coord| match self.get(coord) {
                Some(unit) if unit.player == player => Some((coord, *unit)),
                _ => None,
            })
    }

    // ========================================================================
    // HEALTH
    // ========================================================================

    /// Remove the unit at `coord` if it is dead
    pub fn remove_dead(&mut self, coord: Coord) {
        let dead = match self.get(coord) {
            Some(unit) if !unit.is_alive() => *unit,
            _ => return,
        };

        self.set(coord, None);
        if dead.unit_type == UnitType::AI {
            match dead.player {
                Player::Attacker => self.attacker_has_ai = false,
                Player::Defender => self.defender_has_ai = false,
            }
        }
    }

    /// Change the health of the unit at `coord`, removing it if it dies
    pub fn mod_health(&mut self, coord: Coord, delta: i32) {
        if let Some(unit) = self.get_mut(coord) {
            unit.mod_health(delta);
            self.remove_dead(coord);
        }
    }

    // ========================================================================
    // TURNS AND RESULT
    // ========================================================================

    /// Hand the move to the other player
    pub fn next_turn(&mut self) {
        self.next_player = self.next_player.opponent();
        self.turns_played += 1;
    }

    /// Winner, if the game is over
    pub fn has_winner(&self) -> Option<Player> {
        if let Some(max_turns) = self.options.max_turns {
            if self.turns_played >= max_turns {
                return Some(Player::Defender);
            }
        }
        match (self.attacker_has_ai, self.defender_has_ai) {
            (true, true) => None,
            (true, false) => Some(Player::Attacker),
            (false, _) => Some(Player::Defender),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.has_winner().is_some()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Next player: {}", self.next_player)?;
        writeln!(f, "Turns played: {}", self.turns_played)?;
        write!(f, "\n   ")?;
        for col in 0..self.dim {
            write!(f, "{:^3} ", Coord::new(0, col).col_char())?;
        }
        writeln!(f)?;
        for row in 0..self.dim {
            write!(f, "{}: ", Coord::new(row, 0).row_char())?;
            for col in 0..self.dim {
                match self.get(Coord::new(row, col)) {
                    Some(unit) => write!(f, "{:^3} ", unit.to_string())?,
                    None => write!(f, " .  ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
