#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that walks live enemies along the shared waypoint path.

use std::time::Duration;

use balloon_defence_world::{Enemy, Path};

/// What a single path step did to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The enemy is inactive or its cursor lies past the path; nothing moved.
    AtRest,
    /// The enemy sits on the final waypoint and attacks instead of moving.
    Attacking {
        /// Whether this step was the transition into the attack sub-state.
        started: bool,
    },
    /// The enemy moved toward its next waypoint.
    Moving,
    /// The enemy came within the arrival threshold and its cursor advanced.
    ReachedWaypoint {
        /// Index of the waypoint the enemy now stands on.
        index: usize,
    },
}

/// Converts the waypoint list and an enemy's position into per-tick movement.
#[derive(Clone, Copy, Debug)]
pub struct PathFollower {
    arrival_threshold: f32,
}

impl PathFollower {
    /// Creates a follower that treats distances below `arrival_threshold` as arrival.
    #[must_use]
    pub const fn new(arrival_threshold: f32) -> Self {
        Self { arrival_threshold }
    }

    /// Advances `enemy` toward `waypoints[waypoint_index + 1]` by `speed * dt`.
    ///
    /// The arrival check uses the distance measured before the move, so an
    /// enemy that starts exactly on its target still advances its cursor even
    /// though no direction can be derived.
    pub fn advance(&self, enemy: &mut Enemy, path: &Path, dt: Duration) -> StepOutcome {
        if enemy.is_dead() {
            return StepOutcome::AtRest;
        }

        let Some(final_index) = path.final_index() else {
            return StepOutcome::AtRest;
        };

        let index = enemy.waypoint_index();
        if index > final_index {
            return StepOutcome::AtRest;
        }

        if index == final_index {
            let started = enemy.start_attacking();
            return StepOutcome::Attacking { started };
        }

        let Some(target) = path.waypoint(index + 1) else {
            return StepOutcome::AtRest;
        };

        let offset = target - enemy.position();
        let distance = offset.length();
        if distance > 0.0 {
            let direction = offset / distance;
            enemy.translate(direction * enemy.movement_speed() * dt.as_secs_f32());
        }

        if distance < self.arrival_threshold {
            let index = enemy.advance_waypoint();
            return StepOutcome::ReachedWaypoint { index };
        }

        StepOutcome::Moving
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use balloon_defence_core::EnemyId;
    use balloon_defence_world::EnemyPool;
    use glam::Vec2;

    #[test]
    fn dead_enemy_is_at_rest() {
        let mut pool = EnemyPool::new(1, Vec2::splat(50.0));
        let path = Path::new(vec![Vec2::ZERO, Vec2::X * 100.0]);
        let enemy = pool.get_mut(EnemyId::new(0)).expect("slot exists");

        let outcome = PathFollower::new(5.0).advance(enemy, &path, Duration::from_secs(1));

        assert_eq!(outcome, StepOutcome::AtRest);
        assert_eq!(enemy.position(), Vec2::ZERO);
        assert!(enemy.is_dead());
    }
}
