//! Window-less runner that drives the simulation with a fixed frame delta.

use std::time::Duration;

use balloon_defence_core::{Command, Event, GameRules, Health, SimulationStatus};
use balloon_defence_simulation::{apply, query, Game};
use glam::Vec2;

/// Parameters of a headless session.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct HeadlessOptions {
    /// Upper bound on the number of ticks.
    pub(crate) frames: u32,
    /// Simulated time per tick.
    pub(crate) frame_time: Duration,
    /// Towers requested before the first tick.
    pub(crate) towers: Vec<Vec2>,
}

/// Outcome of a headless session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct HeadlessSummary {
    pub(crate) frames_run: u32,
    pub(crate) elapsed: Duration,
    pub(crate) towers_placed: usize,
    pub(crate) towers_rejected: usize,
    pub(crate) enemies_spawned: usize,
    pub(crate) enemies_killed: usize,
    pub(crate) base_health: Health,
    pub(crate) status: SimulationStatus,
}

/// Running event counts of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct EventTally {
    towers_placed: usize,
    towers_rejected: usize,
    enemies_spawned: usize,
    enemies_killed: usize,
}

impl EventTally {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TowerPlaced { .. } => self.towers_placed += 1,
                Event::TowerPlacementRejected { .. } => self.towers_rejected += 1,
                Event::EnemySpawned { .. } => self.enemies_spawned += 1,
                Event::EnemyKilled { .. } => self.enemies_killed += 1,
                _ => {}
            }
        }
    }
}

/// Runs a session until the frame budget is spent or the base falls.
///
/// Events are tallied and dropped after every command.
pub(crate) fn run(rules: &GameRules, options: &HeadlessOptions) -> HeadlessSummary {
    let mut game = Game::new(rules);
    let mut events = Vec::new();
    let mut tally = EventTally::default();
    tracing::info!("{}", query::welcome_banner(&game));

    for &position in &options.towers {
        apply(&mut game, Command::PlaceTower { position }, &mut events);
        tally.record(&events);
        events.clear();
    }

    let mut frames_run = 0;
    while frames_run < options.frames && query::status(&game) == SimulationStatus::Running {
        apply(
            &mut game,
            Command::Tick {
                dt: options.frame_time,
            },
            &mut events,
        );
        tally.record(&events);
        events.clear();
        frames_run += 1;
    }

    HeadlessSummary {
        frames_run,
        elapsed: query::elapsed(&game),
        towers_placed: tally.towers_placed,
        towers_rejected: tally.towers_rejected,
        enemies_spawned: tally.enemies_spawned,
        enemies_killed: tally.enemies_killed,
        base_health: query::base(&game).health,
        status: query::status(&game),
    }
}
