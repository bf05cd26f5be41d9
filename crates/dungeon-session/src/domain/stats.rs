//! Player stats: HP and points.
//!
//! Every mutation clamps instead of failing. Stat changes run inline with
//! rendering and must never be rejected.

use serde::{Deserialize, Serialize};

/// Upper bound for HP.
pub const MAX_HP: i32 = 100;
/// HP at the start of a playthrough.
pub const DEFAULT_HP: i32 = MAX_HP;
/// Points at the start of a playthrough.
pub const DEFAULT_POINTS: i64 = 0;

/// HP in `[0, MAX_HP]` and points `>= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    hp: i32,
    points: i64,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerStats {
    /// Fresh stats: full HP, no points.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hp: DEFAULT_HP,
            points: DEFAULT_POINTS,
        }
    }

    /// Current HP.
    #[must_use]
    pub fn hp(&self) -> i32 {
        self.hp
    }

    /// Current points.
    #[must_use]
    pub fn points(&self) -> i64 {
        self.points
    }

    /// Replaces HP, clamped to `[0, MAX_HP]`.
    pub fn set_hp(&mut self, value: i32) {
        self.hp = value.clamp(0, MAX_HP);
    }

    /// Adds to HP, clamped to `[0, MAX_HP]`.
    pub fn add_hp(&mut self, delta: i32) {
        self.set_hp(self.hp.saturating_add(delta));
    }

    /// Replaces points, floored at zero.
    pub fn set_points(&mut self, value: i64) {
        self.points = value.max(0);
    }

    /// Adds to points, floored at zero.
    pub fn add_points(&mut self, delta: i64) {
        self.set_points(self.points.saturating_add(delta));
    }

    /// Restores the starting values.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// The player is alive while HP is above zero.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}
