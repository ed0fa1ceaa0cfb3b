//! The player-controlled base enemies try to destroy.

use balloon_defence_core::{BaseSnapshot, Bounds, Health};

/// Base with a fixed footprint and health floored at zero.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerBase {
    health: Health,
    max_health: Health,
    bounds: Bounds,
}

impl PlayerBase {
    /// Creates a base at full health occupying `bounds`.
    #[must_use]
    pub const fn new(health: Health, bounds: Bounds) -> Self {
        Self {
            health,
            max_health: health,
            bounds,
        }
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> Health {
        self.health
    }

    /// Health the base started with.
    #[must_use]
    pub const fn max_health(&self) -> Health {
        self.max_health
    }

    /// Region enemies must overlap to deal contact damage.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Whether the base's health reached zero.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.health.is_depleted()
    }

    /// Applies damage, clamping at zero, and returns the new health.
    pub fn take_damage(&mut self, amount: u32) -> Health {
        self.health = self.health.damaged(amount);
        self.health
    }

    /// Captures an immutable snapshot of the base.
    #[must_use]
    pub const fn snapshot(&self) -> BaseSnapshot {
        BaseSnapshot {
            health: self.health,
            max_health: self.max_health,
            bounds: self.bounds,
        }
    }
}
