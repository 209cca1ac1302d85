//! Unit type definitions and combat tables

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum (and starting) unit health
pub const MAX_HEALTH: u8 = 9;

/// The two sides
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Attacker = 0,
    Defender = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Attacker => Player::Defender,
            Player::Defender => Player::Attacker,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Player::Attacker => "Attacker",
            Player::Defender => "Defender",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unit type (index into the combat tables)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    AI = 0,
    Tech = 1,
    Virus = 2,
    Program = 3,
    Firewall = 4,
}

impl UnitType {
    pub const ALL: [UnitType; 5] = [
        UnitType::AI,
        UnitType::Tech,
        UnitType::Virus,
        UnitType::Program,
        UnitType::Firewall,
    ];

    pub fn name(self) -> &'static str {
        match self {
            UnitType::AI => "AI",
            UnitType::Tech => "Tech",
            UnitType::Virus => "Virus",
            UnitType::Program => "Program",
            UnitType::Firewall => "Firewall",
        }
    }

    /// AI, Firewall and Program may only advance toward the enemy and not while engaged
    pub fn is_direction_restricted(self) -> bool {
        matches!(self, UnitType::AI | UnitType::Firewall | UnitType::Program)
    }

    /// Whether `self` can repair a friendly unit of type `target`
    pub fn can_repair(self, target: UnitType) -> bool {
        matches!(
            (self, target),
            (UnitType::AI, UnitType::Virus)
                | (UnitType::AI, UnitType::Tech)
                | (UnitType::Tech, UnitType::AI)
                | (UnitType::Tech, UnitType::Firewall)
                | (UnitType::Tech, UnitType::Program)
        )
    }
}

/// Damage dealt, indexed [attacker][target]
pub static DAMAGE_TABLE: [[u8; 5]; 5] = [
    [3, 3, 3, 3, 1], // AI
    [1, 1, 6, 1, 1], // Tech
    [9, 6, 1, 6, 1], // Virus
    [3, 3, 3, 3, 1], // Program
    [1, 1, 1, 1, 1], // Firewall
];

/// Health restored, indexed [repairer][target]
pub static REPAIR_TABLE: [[u8; 5]; 5] = [
    [0, 1, 1, 0, 0], // AI
    [3, 0, 0, 3, 3], // Tech
    [0, 0, 0, 0, 0], // Virus
    [0, 0, 0, 0, 0], // Program
    [0, 0, 0, 0, 0], // Firewall
];

/// A unit on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub player: Player,
    pub unit_type: UnitType,
    pub health: u8,
}

impl Unit {
    /// New unit at full health
    pub fn new(player: Player, unit_type: UnitType) -> Self {
        Self {
            player,
            unit_type,
            health: MAX_HEALTH,
        }
    }

    pub fn with_health(mut self, health: u8) -> Self {
        self.health = health.min(MAX_HEALTH);
        self
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Apply a health delta, clamped to [0, 9]
    pub fn mod_health(&mut self, delta: i32) {
        let health = (self.health as i32 + delta).clamp(0, MAX_HEALTH as i32);
        self.health = health as u8;
    }

    /// Damage this unit deals to `target`, never more than the target has left
    pub fn damage_amount(&self, target: &Unit) -> u8 {
        let amount = DAMAGE_TABLE[self.unit_type as usize][target.unit_type as usize];
        amount.min(target.health)
    }

    /// Health this unit restores to `target`, never past the maximum
    pub fn repair_amount(&self, target: &Unit) -> u8 {
        let amount = REPAIR_TABLE[self.unit_type as usize][target.unit_type as usize];
        amount.min(MAX_HEALTH.saturating_sub(target.health))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.player.name().chars().next().unwrap_or('?').to_ascii_lowercase();
        let t = self.unit_type.name().chars().next().unwrap_or('?');
        write!(f, "{}{}{}", p, t, self.health)
    }
}
