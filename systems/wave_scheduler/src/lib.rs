#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Timed, staged spawning system that activates pooled enemies wave by wave.
//!
//! Each wave waits its `initial_interval` before every burst. Bursts hold one
//! enemy for the first two waves and two enemies afterwards. The wave's
//! `stagger` travels with the configuration but does not pace bursts; every
//! burst within a wave reuses `initial_interval`.

use std::time::Duration;

use balloon_defence_core::{
    Event, GameRules, Health, SchedulerPhase, WaveIndex, WaveProgress, WaveSpec,
};
use balloon_defence_world::{EnemyPool, Path};
use glam::Vec2;

/// Waves from this index onward spawn two enemies per burst.
const ESCALATION_WAVE: u32 = 2;

/// Number of enemies a single burst of `wave` spawns.
#[must_use]
pub const fn burst_size(wave: WaveIndex) -> u32 {
    if wave.get() >= ESCALATION_WAVE {
        2
    } else {
        1
    }
}

/// Configuration parameters required to construct the scheduler.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    waves: Vec<WaveSpec>,
    enemy_health: Health,
    base_enemy_speed: f32,
    enemy_speed_per_wave: f32,
}

impl Config {
    /// Creates a configuration from an explicit wave list and spawn parameters.
    #[must_use]
    pub fn new(
        waves: Vec<WaveSpec>,
        enemy_health: Health,
        base_enemy_speed: f32,
        enemy_speed_per_wave: f32,
    ) -> Self {
        Self {
            waves,
            enemy_health,
            base_enemy_speed,
            enemy_speed_per_wave,
        }
    }

    /// Extracts the wave list and spawn parameters from a rule set.
    #[must_use]
    pub fn from_rules(rules: &GameRules) -> Self {
        Self::new(
            rules.waves.clone(),
            rules.enemy_health,
            rules.base_enemy_speed,
            rules.enemy_speed_per_wave,
        )
    }
}

/// Wave state machine driven once per tick.
#[derive(Clone, Debug)]
pub struct WaveScheduler {
    config: Config,
    current_wave: WaveIndex,
    wave_timer: Duration,
    spawned_in_wave: u32,
    next_pool_index: usize,
    phase: SchedulerPhase,
}

impl WaveScheduler {
    /// Creates a scheduler armed for the first wave.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let phase = if config.waves.is_empty() {
            SchedulerPhase::AllWavesDone
        } else {
            SchedulerPhase::Idle(WaveIndex::new(0))
        };

        Self {
            config,
            current_wave: WaveIndex::new(0),
            wave_timer: Duration::ZERO,
            spawned_in_wave: 0,
            next_pool_index: 0,
            phase,
        }
    }

    /// Advances the wave timer and spawns a burst when the interval elapsed.
    ///
    /// Nothing changes, not even the timer, once every wave is done, when the
    /// path has no start point, or while the pool has no inactive slot.
    pub fn update(
        &mut self,
        dt: Duration,
        pool: &mut EnemyPool,
        path: &Path,
        out: &mut Vec<Event>,
    ) -> SchedulerPhase {
        let wave_index = self.current_wave;
        let Some(wave) = self.config.waves.get(wave_index.index()).copied() else {
            self.phase = SchedulerPhase::AllWavesDone;
            return self.phase;
        };
        let Some(start) = path.start_point() else {
            return self.phase;
        };
        if !pool.has_inactive() {
            return self.phase;
        }

        self.wave_timer = self.wave_timer.saturating_add(dt);
        let mut phase = SchedulerPhase::Idle(wave_index);

        if self.wave_timer >= wave.initial_interval() && self.spawned_in_wave < wave.count() {
            if self.spawned_in_wave == 0 {
                tracing::info!(wave = wave_index.get(), count = wave.count(), "wave started");
                out.push(Event::WaveStarted { wave: wave_index });
            }
            self.spawn_burst(wave, wave_index, start, pool, out);
            self.wave_timer = Duration::ZERO;
            phase = SchedulerPhase::Spawning(wave_index);
        }

        if self.spawned_in_wave >= wave.count() {
            tracing::info!(wave = wave_index.get(), "wave completed");
            out.push(Event::WaveCompleted { wave: wave_index });
            self.current_wave = wave_index.next();
            self.spawned_in_wave = 0;
            self.wave_timer = Duration::ZERO;

            phase = if self.current_wave.index() < self.config.waves.len() {
                SchedulerPhase::WaveComplete(wave_index)
            } else {
                tracing::info!("all waves done");
                out.push(Event::AllWavesDone);
                SchedulerPhase::AllWavesDone
            };
        }

        self.phase = phase;
        phase
    }

    fn spawn_burst(
        &mut self,
        wave: WaveSpec,
        wave_index: WaveIndex,
        start: Vec2,
        pool: &mut EnemyPool,
        out: &mut Vec<Event>,
    ) {
        let remaining = wave.count().saturating_sub(self.spawned_in_wave);
        let burst = burst_size(wave_index).min(remaining);
        let speed = self.enemy_speed_for(wave_index);

        for _ in 0..burst {
            let Some(slot) = pool.next_inactive(self.next_pool_index) else {
                break;
            };
            if !pool.activate(slot, start, speed, self.config.enemy_health) {
                break;
            }

            self.next_pool_index = (slot.slot() + 1) % pool.capacity();
            self.spawned_in_wave += 1;
            tracing::debug!(enemy = slot.get(), wave = wave_index.get(), speed, "enemy spawned");
            out.push(Event::EnemySpawned {
                enemy: slot,
                wave: wave_index,
                position: start,
                speed,
            });
        }
    }

    /// Movement speed assigned to enemies of `wave`.
    #[must_use]
    pub fn enemy_speed_for(&self, wave: WaveIndex) -> f32 {
        self.config.base_enemy_speed + self.config.enemy_speed_per_wave * wave.get() as f32
    }

    /// Phase reported by the most recent update.
    #[must_use]
    pub const fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    /// Wave currently being spawned, or `None` once all waves are done.
    #[must_use]
    pub fn current_wave(&self) -> Option<WaveIndex> {
        (self.current_wave.index() < self.config.waves.len()).then_some(self.current_wave)
    }

    /// Time accumulated since the last burst or wave change.
    #[must_use]
    pub const fn wave_timer(&self) -> Duration {
        self.wave_timer
    }

    /// Enemies already spawned for the current wave.
    #[must_use]
    pub const fn spawned_in_wave(&self) -> u32 {
        self.spawned_in_wave
    }

    /// Pool slot at which the next activation search starts.
    #[must_use]
    pub const fn next_pool_index(&self) -> usize {
        self.next_pool_index
    }

    /// Stagger configured for the current wave. Informational only.
    #[must_use]
    pub fn current_stagger(&self) -> Option<Duration> {
        self.config
            .waves
            .get(self.current_wave.index())
            .map(WaveSpec::stagger)
    }

    /// Whether scheduling stopped for good.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.current_wave().is_none()
    }

    /// Summary of the scheduler's progress for queries.
    #[must_use]
    pub fn progress(&self) -> WaveProgress {
        WaveProgress {
            phase: self.phase,
            current_wave: self.current_wave(),
            spawned_in_wave: self.spawned_in_wave,
            wave_count: self.config.waves.len(),
        }
    }
}
