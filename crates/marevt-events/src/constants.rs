//! Fixed game codes and thresholds used by the extractors.
//!
//! The numeric values come from the memory layout of the NES game and are not
//! documented by the game itself. They are kept together in
//! [`ExtractionConstants`] so they can be reviewed, and overridden when
//! validating against annotated footage.

use std::fmt;

/// Frames per second of the gameplay captures.
pub const DEFAULT_SAMPLING_RATE: u32 = 60;

/// Names of the capture variables read by the extractors.
pub mod variable {
    pub const SCORE: &str = "score";
    pub const COINS: &str = "coins";
    pub const LIVES: &str = "lives";
    pub const POWERSTATE: &str = "powerstate";
    pub const PLAYER_STATE: &str = "player_state";
    pub const JUMP_AIRBORNE: &str = "jump_airborne";
    pub const POWERUP_YES_NO: &str = "powerup_yes_no";
}

/// Controller buttons, in extraction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    Start,
    Select,
}

impl Button {
    pub const ALL: [Self; 8] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::A,
        Self::B,
        Self::Start,
        Self::Select,
    ];

    /// Variable name of the button trace, also used as the event label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::A => "A",
            Self::B => "B",
            Self::Start => "START",
            Self::Select => "SELECT",
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

/// How an enemy was killed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KillKind {
    Stomp,
    Impact,
    Kick,
}

impl KillKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stomp => "stomp",
            Self::Impact => "impact",
            Self::Kick => "kick",
        }
    }
}

impl fmt::Display for KillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

/// Game-specific codes and thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConstants {
    /// Enemy state codes of a killed enemy, by kill kind.
    pub kill_codes: Vec<(i64, KillKind)>,
    /// Number of enemy kill slots (`enemy_kill30` .. `enemy_kill3{n-1}`).
    pub kill_slots: usize,
    /// Slot whose kills coincide with a collected powerup.
    pub powerup_kill_slot: usize,
    /// `powerstate` drops below this delta when the player loses a powerup.
    pub power_loss_threshold: i64,
    /// Score increment awarded for smashing a brick.
    pub brick_score_increment: i64,
    /// `player_state` codes held while a powerup is being absorbed.
    pub powerup_states: Vec<i64>,
}

impl Default for ExtractionConstants {
    fn default() -> Self {
        Self {
            kill_codes: vec![
                (4, KillKind::Stomp),
                (34, KillKind::Impact),
                (132, KillKind::Kick),
            ],
            kill_slots: 6,
            powerup_kill_slot: 5,
            power_loss_threshold: -10_000,
            brick_score_increment: 5,
            powerup_states: vec![9, 12, 13],
        }
    }
}

impl ExtractionConstants {
    /// Looks up the kill kind of an enemy state code.
    #[must_use]
    pub fn kill_kind(&self, code: i64) -> Option<KillKind> {
        self.kill_codes
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, kind)| *kind)
    }

    #[must_use]
    pub fn is_powerup_state(&self, state: i64) -> bool {
        self.powerup_states.contains(&state)
    }

    /// Variable names of the enemy kill slots.
    pub fn kill_slot_names(&self) -> impl Iterator<Item = String> {
        (0..self.kill_slots).map(|slot| format!("enemy_kill3{slot}"))
    }
}
