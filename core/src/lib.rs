#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Balloon Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative simulation, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the simulation executes those commands
//! via its `apply` entry point, and then broadcasts [`Event`] values that
//! presentation layers and logs react to. Systems operate on borrowed entity
//! storage and report what they did through the same event stream.

mod rules;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use rules::{GameRules, RulesError, MAX_POOL_CAPACITY};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Balloon Defence.";

/// Commands that express all permissible game mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of real time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests placement of a tower centred on the provided world position.
    PlaceTower {
        /// World-space position the player clicked.
        position: Vec2,
    },
}

/// Events broadcast by the simulation after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a pooled enemy was activated at the path start.
    EnemySpawned {
        /// Pool slot that was activated.
        enemy: EnemyId,
        /// Wave that produced the enemy.
        wave: WaveIndex,
        /// Position the enemy occupies after activation.
        position: Vec2,
        /// Movement speed assigned at activation, in world units per second.
        speed: f32,
    },
    /// Reports that an enemy advanced its waypoint cursor.
    EnemyReachedWaypoint {
        /// Enemy that arrived.
        enemy: EnemyId,
        /// Waypoint index the enemy now targets from.
        waypoint: usize,
    },
    /// Reports that an enemy reached the final waypoint and began its attack cycle.
    EnemyStartedAttacking {
        /// Enemy that began attacking.
        enemy: EnemyId,
    },
    /// Reports that a tower damaged an enemy. Carries the new health so
    /// presentation layers can resize health bars.
    EnemyDamaged {
        /// Enemy that took damage.
        enemy: EnemyId,
        /// Tower that dealt the damage.
        tower: TowerId,
        /// Health remaining after the hit.
        health: Health,
    },
    /// Reports that an enemy's health was depleted and its slot returned to the pool.
    EnemyKilled {
        /// Slot that became available again.
        enemy: EnemyId,
    },
    /// Reports that the player base took damage.
    BaseDamaged {
        /// Mechanism that dealt the damage.
        source: DamageSource,
        /// Enemy responsible for the damage.
        enemy: EnemyId,
        /// Base health remaining after the hit.
        health: Health,
    },
    /// Announces that the first burst of a wave was spawned.
    WaveStarted {
        /// Wave that started.
        wave: WaveIndex,
    },
    /// Announces that every enemy of a wave was spawned.
    WaveCompleted {
        /// Wave that completed.
        wave: WaveIndex,
    },
    /// Announces that the final wave completed and scheduling stopped.
    AllWavesDone,
    /// Announces that the base was destroyed and the simulation froze.
    GameOver,
    /// Confirms that a tower was placed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// World-space centre of the tower.
        position: Vec2,
    },
    /// Reports that a tower placement request was absorbed without effect.
    TowerPlacementRejected {
        /// Position provided in the placement request.
        position: Vec2,
        /// Specific reason the placement was refused.
        reason: PlacementError,
    },
}

/// Mechanisms through which enemies damage the player base.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DamageSource {
    /// Per-tick damage while an enemy's bounds overlap the base.
    Contact,
    /// Periodic damage from an enemy's attack cycle.
    Attack,
}

/// Reasons a tower placement request may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The roster already holds the maximum number of towers.
    TowerLimitReached,
    /// The base was destroyed; the board is frozen.
    GameOver,
}

/// Identifier of an enemy, equal to its slot in the preallocated pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Slot index inside the enemy pool.
    #[must_use]
    pub const fn slot(&self) -> usize {
        self.0 as usize
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Zero-based position of a wave within the configured wave list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WaveIndex(u32);

impl WaveIndex {
    /// Creates a new wave index wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Index usable with slices of wave specifications.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Index of the wave that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Integer hit points that never drop below zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Health(u32);

impl Health {
    /// Health of a depleted entity.
    pub const ZERO: Self = Self(0);

    /// Creates a health value from raw hit points.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw hit points.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Whether the health reached the zero floor.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }

    /// Applies damage, clamping at zero.
    #[must_use]
    pub const fn damaged(self, amount: u32) -> Self {
        Self(self.0.saturating_sub(amount))
    }

    /// Fraction of `maximum` remaining, clamped to `0.0..=1.0`.
    ///
    /// A zero maximum yields `0.0` so health bars collapse instead of dividing
    /// by zero.
    #[must_use]
    pub fn ratio(self, maximum: Health) -> f32 {
        if maximum.0 == 0 {
            return 0.0;
        }
        (self.0 as f32 / maximum.0 as f32).clamp(0.0, 1.0)
    }
}

/// Axis-aligned rectangle in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    origin: Vec2,
    size: Vec2,
}

impl Bounds {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Top-left corner of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Width and height of the rectangle.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Bottom-right corner of the rectangle.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.origin + self.size
    }

    /// Reports whether two rectangles share a region of positive area.
    ///
    /// Rectangles that merely touch along an edge do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Bounds) -> bool {
        let min = self.origin.max(other.origin);
        let max = self.max().min(other.max());
        min.x < max.x && min.y < max.y
    }
}

/// Configuration of a single wave.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveSpec {
    count: u32,
    #[serde(with = "rules::seconds")]
    initial_interval: Duration,
    #[serde(with = "rules::seconds")]
    stagger: Duration,
}

impl WaveSpec {
    /// Creates a wave description.
    #[must_use]
    pub const fn new(count: u32, initial_interval: Duration, stagger: Duration) -> Self {
        Self {
            count,
            initial_interval,
            stagger,
        }
    }

    /// Number of enemies the wave spawns in total.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Delay between spawn bursts within the wave.
    #[must_use]
    pub const fn initial_interval(&self) -> Duration {
        self.initial_interval
    }

    /// Configured stagger. Carried with the wave but not used to pace bursts.
    #[must_use]
    pub const fn stagger(&self) -> Duration {
        self.stagger
    }
}

/// Overall state of the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SimulationStatus {
    /// Waves, movement and combat are processed every tick.
    Running,
    /// The base was destroyed; ticks no longer mutate anything.
    GameOver,
}

/// Phase reported by the wave scheduler after each update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchedulerPhase {
    /// Waiting for the interval of the wave to elapse.
    Idle(WaveIndex),
    /// A burst of the wave was spawned during the last update.
    Spawning(WaveIndex),
    /// The wave finished spawning during the last update and the next wave was armed.
    WaveComplete(WaveIndex),
    /// Every configured wave finished; scheduling stopped for good.
    AllWavesDone,
}

/// Immutable representation of a single active enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Pool slot of the enemy.
    pub id: EnemyId,
    /// Top-left corner of the enemy in world units.
    pub position: Vec2,
    /// Remaining health.
    pub health: Health,
    /// Waypoint the enemy last reached.
    pub waypoint_index: usize,
    /// Whether the enemy is cycling attacks against the base.
    pub is_attacking: bool,
    /// Time accumulated toward the next attack.
    pub attack_timer: Duration,
}

/// Read-only snapshot describing all active enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of active enemies captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether no enemy is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a placed tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower.
    pub id: TowerId,
    /// World-space centre of the tower.
    pub position: Vec2,
    /// Radius within which the tower damages enemies.
    pub attack_range: f32,
}

/// Immutable representation of the player base.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BaseSnapshot {
    /// Remaining health.
    pub health: Health,
    /// Health the base started with.
    pub max_health: Health,
    /// Region enemies must overlap to deal contact damage.
    pub bounds: Bounds,
}

/// Progress of the wave scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveProgress {
    /// Phase reported by the most recent scheduler update.
    pub phase: SchedulerPhase,
    /// Wave currently being spawned, if any remain.
    pub current_wave: Option<WaveIndex>,
    /// Enemies already spawned for the current wave.
    pub spawned_in_wave: u32,
    /// Number of configured waves.
    pub wave_count: usize,
}
