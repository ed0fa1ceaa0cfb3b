#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves tower fire, base contact and enemy attack cycles.
//!
//! Every rule runs once per tick per live enemy. Towers have no cooldown: an
//! enemy inside the range of several towers takes a hit from each of them
//! every tick it stays there.

use std::time::Duration;

use balloon_defence_core::{DamageSource, Event, GameRules};
use balloon_defence_world::{DamageOutcome, Enemy, PlayerBase, Tower};

/// Damage values and cadence used by the resolver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    tower_damage: u32,
    contact_damage: u32,
    attack_damage: u32,
    attack_period: Duration,
}

impl Config {
    /// Creates a configuration from explicit damage values and attack cadence.
    #[must_use]
    pub const fn new(
        tower_damage: u32,
        contact_damage: u32,
        attack_damage: u32,
        attack_period: Duration,
    ) -> Self {
        Self {
            tower_damage,
            contact_damage,
            attack_damage,
            attack_period,
        }
    }

    /// Extracts the combat values from a rule set.
    #[must_use]
    pub fn from_rules(rules: &GameRules) -> Self {
        Self::new(
            rules.tower_damage,
            rules.contact_damage,
            rules.attack_damage,
            rules.attack_period,
        )
    }
}

/// Applies damage between towers, enemies and the base.
#[derive(Clone, Copy, Debug)]
pub struct CombatResolver {
    config: Config,
}

impl CombatResolver {
    /// Creates a resolver using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Accumulates attack time and strikes the base once per full period.
    ///
    /// Any remainder past the period carries into the next cycle, so `N`
    /// seconds spent attacking always yield `floor(N / period)` strikes
    /// regardless of how the time was sliced into ticks. Returns the number of
    /// strikes dealt.
    pub fn resolve_attack_cycle(
        &self,
        enemy: &mut Enemy,
        base: &mut PlayerBase,
        dt: Duration,
        out: &mut Vec<Event>,
    ) -> u32 {
        if !enemy.is_attacking() || base.is_destroyed() {
            return 0;
        }

        enemy.accumulate_attack_time(dt);

        let mut strikes = 0;
        while enemy.consume_attack_period(self.config.attack_period) {
            let health = base.take_damage(self.config.attack_damage);
            strikes += 1;
            out.push(Event::BaseDamaged {
                source: DamageSource::Attack,
                enemy: enemy.id(),
                health,
            });
            if base.is_destroyed() {
                break;
            }
        }
        strikes
    }

    /// Lets every tower in range hit the enemy once.
    ///
    /// Stops as soon as the enemy dies so later towers never target an
    /// inactive slot.
    pub fn resolve_tower_fire(&self, enemy: &mut Enemy, towers: &[Tower], out: &mut Vec<Event>) {
        for tower in towers {
            if enemy.is_dead() {
                return;
            }
            if !tower.in_range(enemy.position()) {
                continue;
            }

            match enemy.take_damage(self.config.tower_damage) {
                DamageOutcome::Wounded(health) => out.push(Event::EnemyDamaged {
                    enemy: enemy.id(),
                    tower: tower.id(),
                    health,
                }),
                DamageOutcome::Killed => {
                    out.push(Event::EnemyDamaged {
                        enemy: enemy.id(),
                        tower: tower.id(),
                        health: enemy.health(),
                    });
                    out.push(Event::EnemyKilled { enemy: enemy.id() });
                }
                DamageOutcome::Ignored => return,
            }
        }
    }

    /// Damages the base once if the live enemy's bounds overlap it.
    ///
    /// Returns whether contact damage was applied.
    pub fn resolve_base_contact(
        &self,
        enemy: &Enemy,
        base: &mut PlayerBase,
        out: &mut Vec<Event>,
    ) -> bool {
        if enemy.is_dead() || base.is_destroyed() {
            return false;
        }
        if !enemy.bounds().intersects(&base.bounds()) {
            return false;
        }

        let health = base.take_damage(self.config.contact_damage);
        out.push(Event::BaseDamaged {
            source: DamageSource::Contact,
            enemy: enemy.id(),
            health,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use balloon_defence_core::{Bounds, EnemyId, Health, TowerId};
    use balloon_defence_world::EnemyPool;
    use glam::Vec2;

    fn resolver() -> CombatResolver {
        CombatResolver::new(Config::from_rules(&GameRules::default()))
    }

    #[test]
    fn dead_enemy_never_touches_base() {
        let pool = EnemyPool::new(1, Vec2::splat(50.0));
        let mut base = PlayerBase::new(
            Health::new(10),
            Bounds::new(Vec2::ZERO, Vec2::splat(100.0)),
        );
        let enemy = pool.get(EnemyId::new(0)).expect("slot exists");
        let mut events = Vec::new();

        assert!(!resolver().resolve_base_contact(enemy, &mut base, &mut events));
        assert_eq!(base.health(), Health::new(10));
        assert!(events.is_empty());
    }

    #[test]
    fn killing_blow_stops_remaining_towers() {
        let mut pool = EnemyPool::new(1, Vec2::splat(50.0));
        assert!(pool.activate(EnemyId::new(0), Vec2::ZERO, 150.0, Health::new(4)));
        let towers: Vec<Tower> = (0..3)
            .map(|id| Tower::new(TowerId::new(id), Vec2::ZERO, 200.0))
            .collect();
        let enemy = pool.get_mut(EnemyId::new(0)).expect("slot exists");
        let mut events = Vec::new();

        resolver().resolve_tower_fire(enemy, &towers, &mut events);

        assert!(enemy.is_dead());
        assert_eq!(
            events,
            vec![
                Event::EnemyDamaged {
                    enemy: EnemyId::new(0),
                    tower: TowerId::new(0),
                    health: Health::new(1),
                },
                Event::EnemyDamaged {
                    enemy: EnemyId::new(0),
                    tower: TowerId::new(1),
                    health: Health::ZERO,
                },
                Event::EnemyKilled {
                    enemy: EnemyId::new(0),
                },
            ]
        );
    }
}
