use std::time::Duration;

use balloon_defence_core::{Bounds, DamageSource, EnemyId, Event, GameRules, Health, TowerId};
use balloon_defence_system_combat::{CombatResolver, Config};
use balloon_defence_world::{EnemyPool, PlayerBase, Tower};
use glam::Vec2;
use proptest::prelude::*;

const ENEMY: EnemyId = EnemyId::new(0);

fn resolver() -> CombatResolver {
    CombatResolver::new(Config::from_rules(&GameRules::default()))
}

fn pool_with_enemy(position: Vec2) -> EnemyPool {
    let mut pool = EnemyPool::new(1, Vec2::splat(50.0));
    assert!(pool.activate(ENEMY, position, 150.0, Health::new(1000)));
    pool
}

fn distant_base() -> PlayerBase {
    PlayerBase::new(
        Health::new(6000),
        Bounds::new(Vec2::new(5000.0, 5000.0), Vec2::splat(200.0)),
    )
}

#[test]
fn tower_within_range_deals_fixed_damage() {
    let mut pool = pool_with_enemy(Vec2::new(150.0, 0.0));
    let towers = [Tower::new(TowerId::new(0), Vec2::ZERO, 200.0)];
    let enemy = pool.get_mut(ENEMY).expect("slot exists");
    let mut events = Vec::new();

    resolver().resolve_tower_fire(enemy, &towers, &mut events);

    assert_eq!(enemy.health(), Health::new(997));
    assert_eq!(
        events,
        vec![Event::EnemyDamaged {
            enemy: ENEMY,
            tower: TowerId::new(0),
            health: Health::new(997),
        }]
    );
}

#[test]
fn tower_out_of_range_deals_nothing() {
    let mut pool = pool_with_enemy(Vec2::new(250.0, 0.0));
    let towers = [Tower::new(TowerId::new(0), Vec2::ZERO, 200.0)];
    let enemy = pool.get_mut(ENEMY).expect("slot exists");
    let mut events = Vec::new();

    resolver().resolve_tower_fire(enemy, &towers, &mut events);

    assert_eq!(enemy.health(), Health::new(1000));
    assert!(events.is_empty());
}

#[test]
fn towers_stack_without_cooldown() {
    let mut pool = pool_with_enemy(Vec2::new(10.0, 10.0));
    let towers = [
        Tower::new(TowerId::new(0), Vec2::ZERO, 200.0),
        Tower::new(TowerId::new(1), Vec2::new(50.0, 50.0), 200.0),
        Tower::new(TowerId::new(2), Vec2::new(900.0, 900.0), 200.0),
    ];
    let enemy = pool.get_mut(ENEMY).expect("slot exists");
    let mut events = Vec::new();

    for _ in 0..10 {
        resolver().resolve_tower_fire(enemy, &towers, &mut events);
    }

    assert_eq!(enemy.health(), Health::new(1000 - 2 * 3 * 10));
    assert_eq!(events.len(), 20);
}

#[test]
fn one_second_attack_strikes_once_and_resets_timer() {
    let mut pool = pool_with_enemy(Vec2::new(1750.0, 300.0));
    let mut base = distant_base();
    let enemy = pool.get_mut(ENEMY).expect("slot exists");
    assert!(enemy.start_attacking());
    let mut events = Vec::new();

    let strikes =
        resolver().resolve_attack_cycle(enemy, &mut base, Duration::from_secs(1), &mut events);

    assert_eq!(strikes, 1);
    assert_eq!(base.health(), Health::new(5995));
    assert_eq!(enemy.attack_timer(), Duration::ZERO);
    assert_eq!(
        events,
        vec![Event::BaseDamaged {
            source: DamageSource::Attack,
            enemy: ENEMY,
            health: Health::new(5995),
        }]
    );
}

#[test]
fn non_attacking_enemy_does_not_strike() {
    let mut pool = pool_with_enemy(Vec2::ZERO);
    let mut base = distant_base();
    let enemy = pool.get_mut(ENEMY).expect("slot exists");
    let mut events = Vec::new();

    let strikes =
        resolver().resolve_attack_cycle(enemy, &mut base, Duration::from_secs(3), &mut events);

    assert_eq!(strikes, 0);
    assert_eq!(enemy.attack_timer(), Duration::ZERO);
    assert_eq!(base.health(), Health::new(6000));
}

#[test]
fn contact_damages_base_once_per_call() {
    let mut pool = pool_with_enemy(Vec2::new(1700.0, 300.0));
    let mut base = PlayerBase::new(
        Health::new(6000),
        Bounds::new(Vec2::new(1720.0, 220.0), Vec2::splat(200.0)),
    );
    let enemy = pool.get(ENEMY).expect("slot exists");
    let mut events = Vec::new();

    assert!(resolver().resolve_base_contact(enemy, &mut base, &mut events));

    assert_eq!(base.health(), Health::new(5997));
    assert_eq!(
        events,
        vec![Event::BaseDamaged {
            source: DamageSource::Contact,
            enemy: ENEMY,
            health: Health::new(5997),
        }]
    );
}

#[test]
fn destroyed_base_takes_no_further_damage() {
    let mut pool = pool_with_enemy(Vec2::new(10.0, 10.0));
    let mut base = PlayerBase::new(
        Health::new(4),
        Bounds::new(Vec2::ZERO, Vec2::splat(100.0)),
    );
    let enemy = pool.get_mut(ENEMY).expect("slot exists");
    assert!(enemy.start_attacking());
    let mut events = Vec::new();

    let strikes =
        resolver().resolve_attack_cycle(enemy, &mut base, Duration::from_secs(5), &mut events);
    assert_eq!(strikes, 1);
    assert!(base.is_destroyed());

    assert!(!resolver().resolve_base_contact(enemy, &mut base, &mut events));
    assert_eq!(events.len(), 1);
    assert_eq!(base.health(), Health::ZERO);
}

proptest! {
    #[test]
    fn attack_count_matches_whole_seconds(
        steps in proptest::collection::vec(1u64..1_500, 1..80),
    ) {
        let mut pool = pool_with_enemy(Vec2::ZERO);
        let mut base = distant_base();
        let enemy = pool.get_mut(ENEMY).expect("slot exists");
        prop_assert!(enemy.start_attacking());
        let mut events = Vec::new();

        let mut total_ms = 0u64;
        let mut strikes = 0u32;
        for step in steps {
            total_ms += step;
            strikes += resolver().resolve_attack_cycle(
                enemy,
                &mut base,
                Duration::from_millis(step),
                &mut events,
            );
        }

        let expected = u32::try_from(total_ms / 1_000).expect("fits");
        prop_assert_eq!(strikes, expected);
        prop_assert_eq!(base.health(), Health::new(6000 - 5 * expected));
        prop_assert!(enemy.attack_timer() < Duration::from_secs(1));
    }
}
