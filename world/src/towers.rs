//! Tower state and the bounded roster the player fills by clicking.

use balloon_defence_core::{PlacementError, TowerId, TowerSnapshot};
use glam::Vec2;

/// A placed tower. Immutable once constructed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tower {
    id: TowerId,
    position: Vec2,
    attack_range: f32,
}

impl Tower {
    /// Creates a tower centred on `position`.
    #[must_use]
    pub const fn new(id: TowerId, position: Vec2, attack_range: f32) -> Self {
        Self {
            id,
            position,
            attack_range,
        }
    }

    /// Identifier allocated by the roster.
    #[must_use]
    pub const fn id(&self) -> TowerId {
        self.id
    }

    /// World-space centre of the tower.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Radius within which the tower damages enemies.
    #[must_use]
    pub const fn attack_range(&self) -> f32 {
        self.attack_range
    }

    /// Whether `point` lies within the attack range (inclusive).
    #[must_use]
    pub fn in_range(&self, point: Vec2) -> bool {
        self.position.distance(point) <= self.attack_range
    }

    /// Captures an immutable snapshot of the tower.
    #[must_use]
    pub const fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            position: self.position,
            attack_range: self.attack_range,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
///
/// Placement performs no overlap or terrain validation; only the tower count
/// is bounded.
#[derive(Clone, Debug)]
pub struct TowerRoster {
    towers: Vec<Tower>,
    max_towers: usize,
    attack_range: f32,
    next_tower_id: TowerId,
}

impl TowerRoster {
    /// Creates an empty roster that accepts up to `max_towers` towers.
    #[must_use]
    pub fn new(max_towers: usize, attack_range: f32) -> Self {
        Self {
            towers: Vec::with_capacity(max_towers),
            max_towers,
            attack_range,
            next_tower_id: TowerId::new(0),
        }
    }

    /// Appends a tower at `position` unless the roster is full.
    pub fn place(&mut self, position: Vec2) -> Result<TowerId, PlacementError> {
        if self.is_full() {
            return Err(PlacementError::TowerLimitReached);
        }

        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        self.towers.push(Tower::new(id, position, self.attack_range));
        Ok(id)
    }

    /// Towers in placement order.
    #[must_use]
    pub fn towers(&self) -> &[Tower] {
        &self.towers
    }

    /// Number of placed towers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.towers.len()
    }

    /// Whether no tower has been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.towers.is_empty()
    }

    /// Whether further placements will be refused.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.towers.len() >= self.max_towers
    }
}
