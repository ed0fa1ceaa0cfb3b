//! Fixed waypoint path shared by every enemy.

use glam::Vec2;

/// Ordered waypoints, read-only during play.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    waypoints: Vec<Vec2>,
}

impl Path {
    /// Creates a path from the provided waypoints.
    #[must_use]
    pub fn new(waypoints: Vec<Vec2>) -> Self {
        Self { waypoints }
    }

    /// Where enemies are activated. `None` for an empty path.
    #[must_use]
    pub fn start_point(&self) -> Option<Vec2> {
        self.waypoints.first().copied()
    }

    /// Waypoint at `index`, if any.
    #[must_use]
    pub fn waypoint(&self, index: usize) -> Option<Vec2> {
        self.waypoints.get(index).copied()
    }

    /// Index of the waypoint at which enemies stop and attack.
    #[must_use]
    pub fn final_index(&self) -> Option<usize> {
        self.waypoints.len().checked_sub(1)
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the path has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// All waypoints in travel order.
    #[must_use]
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }
}
