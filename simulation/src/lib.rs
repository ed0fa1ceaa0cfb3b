#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-tick orchestration of the Balloon Defence rules.
//!
//! [`Simulation`] owns the enemy pool, the wave scheduler, the path and the
//! base, and composes the pure systems in a fixed order every tick. [`Game`]
//! pairs it with the player's tower roster; adapters mutate a game only
//! through [`apply`] and observe it through [`query`].

use std::time::Duration;

use balloon_defence_core::{
    Command, Event, GameRules, PlacementError, SimulationStatus, MAX_POOL_CAPACITY,
    WELCOME_BANNER,
};
use balloon_defence_system_combat::{CombatResolver, Config as CombatConfig};
use balloon_defence_system_path_follower::{PathFollower, StepOutcome};
use balloon_defence_system_wave_scheduler::{Config as SchedulerConfig, WaveScheduler};
use balloon_defence_world::{EnemyPool, Path, PlayerBase, Tower, TowerRoster};
use glam::Vec2;

/// Aggregate holding every piece of state the tick mutates.
#[derive(Clone, Debug)]
pub struct Simulation {
    pool: EnemyPool,
    scheduler: WaveScheduler,
    path: Path,
    base: PlayerBase,
    follower: PathFollower,
    combat: CombatResolver,
    status: SimulationStatus,
    elapsed: Duration,
    tick_index: u64,
}

impl Simulation {
    /// Builds a fresh simulation from a rule set.
    ///
    /// Expects rules that passed [`GameRules::validate`]. The pool capacity
    /// is clamped to [`MAX_POOL_CAPACITY`] regardless.
    #[must_use]
    pub fn new(rules: &GameRules) -> Self {
        let capacity =
            u32::try_from(rules.pool_capacity.min(MAX_POOL_CAPACITY)).unwrap_or(u32::MAX);

        Self {
            pool: EnemyPool::new(capacity, rules.enemy_extent),
            scheduler: WaveScheduler::new(SchedulerConfig::from_rules(rules)),
            path: Path::new(rules.waypoints.clone()),
            base: PlayerBase::new(rules.base_health, rules.base_bounds),
            follower: PathFollower::new(rules.arrival_threshold),
            combat: CombatResolver::new(CombatConfig::from_rules(rules)),
            status: SimulationStatus::Running,
            elapsed: Duration::ZERO,
            tick_index: 0,
        }
    }

    /// Advances the world by `dt`.
    ///
    /// Runs the wave scheduler, then for every live enemy in slot order the
    /// path step, the attack cycle, tower fire and base contact. A destroyed
    /// base switches the status to [`SimulationStatus::GameOver`], after which
    /// every call returns immediately without touching any state.
    pub fn tick(
        &mut self,
        dt: Duration,
        towers: &[Tower],
        out_events: &mut Vec<Event>,
    ) -> SimulationStatus {
        if self.status == SimulationStatus::GameOver {
            return self.status;
        }

        self.tick_index = self.tick_index.saturating_add(1);
        self.elapsed = self.elapsed.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        let _ = self
            .scheduler
            .update(dt, &mut self.pool, &self.path, out_events);

        let Self {
            pool,
            path,
            base,
            follower,
            combat,
            ..
        } = self;

        for enemy in pool.iter_active_mut() {
            match follower.advance(enemy, path, dt) {
                StepOutcome::ReachedWaypoint { index } => {
                    out_events.push(Event::EnemyReachedWaypoint {
                        enemy: enemy.id(),
                        waypoint: index,
                    });
                }
                StepOutcome::Attacking { started: true } => {
                    tracing::debug!(enemy = enemy.id().get(), "enemy reached the base");
                    out_events.push(Event::EnemyStartedAttacking { enemy: enemy.id() });
                }
                StepOutcome::Attacking { started: false }
                | StepOutcome::Moving
                | StepOutcome::AtRest => {}
            }

            let _ = combat.resolve_attack_cycle(enemy, base, dt, out_events);
            combat.resolve_tower_fire(enemy, towers, out_events);

            if enemy.is_dead() {
                tracing::debug!(enemy = enemy.id().get(), "enemy killed");
                continue;
            }
            let _ = combat.resolve_base_contact(enemy, base, out_events);
        }

        if self.base.is_destroyed() {
            tracing::info!(
                elapsed_secs = self.elapsed.as_secs_f32(),
                ticks = self.tick_index,
                "base destroyed, game over"
            );
            self.status = SimulationStatus::GameOver;
            out_events.push(Event::GameOver);
        }

        self.status
    }

    /// Current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> SimulationStatus {
        self.status
    }

    /// Enemy pool, including inactive slots.
    #[must_use]
    pub const fn pool(&self) -> &EnemyPool {
        &self.pool
    }

    /// Wave scheduler state.
    #[must_use]
    pub const fn scheduler(&self) -> &WaveScheduler {
        &self.scheduler
    }

    /// Shared waypoint path.
    #[must_use]
    pub const fn path(&self) -> &Path {
        &self.path
    }

    /// Player base.
    #[must_use]
    pub const fn base(&self) -> &PlayerBase {
        &self.base
    }

    /// Simulated time accumulated by running ticks.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of ticks processed while running.
    #[must_use]
    pub const fn tick_index(&self) -> u64 {
        self.tick_index
    }
}

/// A play session: the simulation plus the towers the player placed.
#[derive(Clone, Debug)]
pub struct Game {
    banner: &'static str,
    simulation: Simulation,
    roster: TowerRoster,
}

impl Game {
    /// Starts a session governed by `rules`, which should already have passed
    /// [`GameRules::validate`].
    #[must_use]
    pub fn new(rules: &GameRules) -> Self {
        Self {
            banner: WELCOME_BANNER,
            simulation: Simulation::new(rules),
            roster: TowerRoster::new(rules.max_towers, rules.tower_attack_range),
        }
    }

    fn place_tower(&mut self, position: Vec2, out_events: &mut Vec<Event>) {
        let placed = if self.simulation.status() == SimulationStatus::GameOver {
            Err(PlacementError::GameOver)
        } else {
            self.roster.place(position)
        };

        match placed {
            Ok(tower) => {
                tracing::info!(
                    tower = tower.get(),
                    x = position.x,
                    y = position.y,
                    "tower placed"
                );
                out_events.push(Event::TowerPlaced { tower, position });
            }
            Err(reason) => {
                tracing::debug!(?reason, x = position.x, y = position.y, "tower rejected");
                out_events.push(Event::TowerPlacementRejected { position, reason });
            }
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(&GameRules::default())
    }
}

/// Applies the provided command to the game, mutating state deterministically.
pub fn apply(game: &mut Game, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            let _ = game
                .simulation
                .tick(dt, game.roster.towers(), out_events);
        }
        Command::PlaceTower { position } => game.place_tower(position, out_events),
    }
}

/// Query functions that provide read-only access to the game state.
pub mod query {
    use std::time::Duration;

    use balloon_defence_core::{
        BaseSnapshot, EnemyView, SimulationStatus, TowerSnapshot, WaveProgress,
    };
    use glam::Vec2;

    use super::Game;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(game: &Game) -> &'static str {
        game.banner
    }

    /// Captures the live enemies in slot order. Inactive slots are omitted.
    #[must_use]
    pub fn enemy_view(game: &Game) -> EnemyView {
        EnemyView::from_snapshots(
            game.simulation
                .pool()
                .iter_active()
                .map(|enemy| enemy.snapshot())
                .collect(),
        )
    }

    /// Captures the player base.
    #[must_use]
    pub fn base(game: &Game) -> BaseSnapshot {
        game.simulation.base().snapshot()
    }

    /// Captures every placed tower in placement order.
    #[must_use]
    pub fn towers(game: &Game) -> Vec<TowerSnapshot> {
        game.roster
            .towers()
            .iter()
            .map(|tower| tower.snapshot())
            .collect()
    }

    /// Whether a placement request would currently be accepted.
    #[must_use]
    pub fn can_place_tower(game: &Game) -> bool {
        !game.roster.is_full() && status(game) == SimulationStatus::Running
    }

    /// Reports how far the wave schedule progressed.
    #[must_use]
    pub fn wave_progress(game: &Game) -> WaveProgress {
        game.simulation.scheduler().progress()
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(game: &Game) -> SimulationStatus {
        game.simulation.status()
    }

    /// Waypoints of the shared path.
    #[must_use]
    pub fn path(game: &Game) -> &[Vec2] {
        game.simulation.path().waypoints()
    }

    /// Simulated time accumulated so far.
    #[must_use]
    pub fn elapsed(game: &Game) -> Duration {
        game.simulation.elapsed()
    }
}
