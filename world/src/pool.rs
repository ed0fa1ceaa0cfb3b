//! Preallocated enemy slots reused through activation and deactivation.

use std::time::Duration;

use balloon_defence_core::{Bounds, EnemyId, EnemySnapshot, Health};
use glam::Vec2;

/// Result of applying damage to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The enemy survived with the reported health.
    Wounded(Health),
    /// The hit depleted the enemy's health and returned its slot to the pool.
    Killed,
    /// The slot was inactive; nothing changed.
    Ignored,
}

/// A single pool slot.
///
/// An inactive slot (`is_dead`) carries no path or attack progress and must
/// never be moved, targeted or drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    id: EnemyId,
    is_dead: bool,
    is_attacking: bool,
    health: Health,
    position: Vec2,
    waypoint_index: usize,
    movement_speed: f32,
    attack_timer: Duration,
    extent: Vec2,
}

impl Enemy {
    fn dormant(id: EnemyId, extent: Vec2) -> Self {
        Self {
            id,
            is_dead: true,
            is_attacking: false,
            health: Health::ZERO,
            position: Vec2::ZERO,
            waypoint_index: 0,
            movement_speed: 0.0,
            attack_timer: Duration::ZERO,
            extent,
        }
    }

    /// Pool slot of the enemy.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Whether the slot is inactive and available for activation.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.is_dead
    }

    /// Whether the slot holds a live enemy.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !self.is_dead
    }

    /// Whether the enemy reached the final waypoint and cycles attacks.
    #[must_use]
    pub const fn is_attacking(&self) -> bool {
        self.is_attacking
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> Health {
        self.health
    }

    /// Top-left corner of the enemy in world units.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Waypoint the enemy last reached.
    #[must_use]
    pub const fn waypoint_index(&self) -> usize {
        self.waypoint_index
    }

    /// Movement speed in world units per second.
    #[must_use]
    pub const fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    /// Time accumulated toward the next attack.
    #[must_use]
    pub const fn attack_timer(&self) -> Duration {
        self.attack_timer
    }

    /// Region used for base-contact checks.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        Bounds::new(self.position, self.extent)
    }

    /// Brings the slot to life at `start` with fresh health and progress.
    pub fn activate(&mut self, start: Vec2, speed: f32, health: Health) {
        self.position = start;
        self.movement_speed = speed;
        self.is_dead = false;
        self.is_attacking = false;
        self.health = health;
        self.waypoint_index = 0;
        self.attack_timer = Duration::ZERO;
    }

    /// Subtracts `amount` from the enemy's health, killing it at zero.
    pub fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        if self.is_dead {
            return DamageOutcome::Ignored;
        }

        self.health = self.health.damaged(amount);
        if self.health.is_depleted() {
            self.kill();
            DamageOutcome::Killed
        } else {
            DamageOutcome::Wounded(self.health)
        }
    }

    /// Returns the slot to the pool. Health and the dead flag change together.
    pub fn kill(&mut self) {
        self.health = Health::ZERO;
        self.is_dead = true;
        self.is_attacking = false;
        self.waypoint_index = 0;
        self.attack_timer = Duration::ZERO;
    }

    /// Enters the attack sub-state. Returns `true` only on the transition.
    pub fn start_attacking(&mut self) -> bool {
        if self.is_attacking || self.is_dead {
            return false;
        }
        self.is_attacking = true;
        self.attack_timer = Duration::ZERO;
        true
    }

    /// Moves the enemy by the provided world-space offset.
    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }

    /// Marks the next waypoint as reached and returns the new index.
    pub fn advance_waypoint(&mut self) -> usize {
        self.waypoint_index = self.waypoint_index.saturating_add(1);
        self.waypoint_index
    }

    /// Adds elapsed time to the attack timer while attacking.
    pub fn accumulate_attack_time(&mut self, dt: Duration) {
        if self.is_attacking {
            self.attack_timer = self.attack_timer.saturating_add(dt);
        }
    }

    /// Consumes one full attack period from the timer if enough time accrued.
    pub fn consume_attack_period(&mut self, period: Duration) -> bool {
        if !self.is_attacking || period.is_zero() || self.attack_timer < period {
            return false;
        }
        self.attack_timer -= period;
        true
    }

    /// Captures an immutable snapshot of the enemy.
    #[must_use]
    pub fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            position: self.position,
            health: self.health,
            waypoint_index: self.waypoint_index,
            is_attacking: self.is_attacking,
            attack_timer: self.attack_timer,
        }
    }
}

/// Fixed-capacity collection of enemy slots.
///
/// Slots are allocated once; activation and deactivation only flip state.
#[derive(Clone, Debug)]
pub struct EnemyPool {
    slots: Vec<Enemy>,
}

impl EnemyPool {
    /// Creates `capacity` inactive slots whose bounds span `extent`.
    #[must_use]
    pub fn new(capacity: u32, extent: Vec2) -> Self {
        let slots = (0..capacity)
            .map(|slot| Enemy::dormant(EnemyId::new(slot), extent))
            .collect();
        Self { slots }
    }

    /// Number of slots in the pool.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slot lookup.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.slots.get(id.slot())
    }

    /// Mutable slot lookup.
    pub fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.slots.get_mut(id.slot())
    }

    /// Iterator over every slot, active or not, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.slots.iter()
    }

    /// Iterator over live enemies in slot order.
    pub fn iter_active(&self) -> impl Iterator<Item = &Enemy> {
        self.slots.iter().filter(|enemy| enemy.is_alive())
    }

    /// Mutable iterator over live enemies in slot order.
    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.slots.iter_mut().filter(|enemy| enemy.is_alive())
    }

    /// Number of live enemies.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.iter_active().count()
    }

    /// Whether at least one slot is available for activation.
    #[must_use]
    pub fn has_inactive(&self) -> bool {
        self.slots.iter().any(Enemy::is_dead)
    }

    /// Finds the first inactive slot at or after `cursor`, wrapping around.
    #[must_use]
    pub fn next_inactive(&self, cursor: usize) -> Option<EnemyId> {
        let capacity = self.slots.len();
        if capacity == 0 {
            return None;
        }
        let start = cursor % capacity;
        (0..capacity)
            .map(|offset| (start + offset) % capacity)
            .find(|&slot| self.slots[slot].is_dead())
            .map(|slot| self.slots[slot].id())
    }

    /// Activates the slot if it is currently inactive.
    ///
    /// Returns `false` without touching a live slot or a missing one.
    pub fn activate(&mut self, id: EnemyId, start: Vec2, speed: f32, health: Health) -> bool {
        match self.slots.get_mut(id.slot()) {
            Some(enemy) if enemy.is_dead() => {
                enemy.activate(start, speed, health);
                true
            }
            _ => false,
        }
    }

    /// Returns the slot to the pool.
    pub fn deactivate(&mut self, id: EnemyId) {
        if let Some(enemy) = self.slots.get_mut(id.slot()) {
            enemy.kill();
        }
    }
}
