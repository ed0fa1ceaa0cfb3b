//! Gameplay constants bundled into a loadable rule set.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Bounds, Health, WaveSpec};

/// Largest enemy pool a rule set may request.
pub const MAX_POOL_CAPACITY: usize = 4096;

/// Every tunable number that drives the simulation.
///
/// The [`Default`] implementation describes the classic single map: a
/// four-waypoint path, three waves of 3/5/8 balloons and a base in the
/// top-right corner. Rule files only need to list the values they override.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameRules {
    /// Number of preallocated enemy slots.
    pub pool_capacity: usize,
    /// Health every enemy starts with on activation.
    pub enemy_health: Health,
    /// Health the player base starts with.
    pub base_health: Health,
    /// Radius within which towers damage enemies.
    pub tower_attack_range: f32,
    /// Damage a tower deals to each enemy in range per tick.
    pub tower_damage: u32,
    /// Damage an overlapping enemy deals to the base per tick.
    pub contact_damage: u32,
    /// Damage dealt by one attack cycle.
    pub attack_damage: u32,
    /// Time an attacking enemy needs between attacks.
    #[serde(with = "seconds")]
    pub attack_period: Duration,
    /// Distance below which an enemy counts as having reached a waypoint.
    pub arrival_threshold: f32,
    /// Maximum number of towers the player may place.
    pub max_towers: usize,
    /// Movement speed of enemies spawned by the first wave.
    pub base_enemy_speed: f32,
    /// Speed added for every subsequent wave.
    pub enemy_speed_per_wave: f32,
    /// Width and height of an enemy's bounding region.
    pub enemy_extent: Vec2,
    /// Region occupied by the player base.
    pub base_bounds: Bounds,
    /// Waypoints of the path shared by every enemy.
    pub waypoints: Vec<Vec2>,
    /// Ordered wave list.
    pub waves: Vec<WaveSpec>,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            pool_capacity: 60,
            enemy_health: Health::new(1000),
            base_health: Health::new(6000),
            tower_attack_range: 200.0,
            tower_damage: 3,
            contact_damage: 3,
            attack_damage: 5,
            attack_period: Duration::from_secs(1),
            arrival_threshold: 5.0,
            max_towers: 10,
            base_enemy_speed: 150.0,
            enemy_speed_per_wave: 2.0,
            enemy_extent: Vec2::new(50.0, 50.0),
            base_bounds: Bounds::new(Vec2::new(1720.0, 220.0), Vec2::new(200.0, 200.0)),
            waypoints: vec![
                Vec2::new(0.0, 540.0),
                Vec2::new(250.0, 540.0),
                Vec2::new(250.0, 300.0),
                Vec2::new(1750.0, 300.0),
            ],
            waves: vec![
                WaveSpec::new(3, Duration::ZERO, Duration::from_millis(200)),
                WaveSpec::new(5, Duration::from_secs(3), Duration::from_millis(100)),
                WaveSpec::new(8, Duration::from_secs(5), Duration::from_millis(300)),
            ],
        }
    }
}

impl GameRules {
    /// Parses a TOML rule file; omitted keys keep their default values.
    pub fn from_toml_str(contents: &str) -> Result<Self, RulesError> {
        let rules: Self = toml::from_str(contents).map_err(RulesError::Parse)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Rejects rule sets the simulation cannot run.
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.pool_capacity == 0 {
            return Err(RulesError::EmptyPool);
        }
        if self.pool_capacity > MAX_POOL_CAPACITY {
            return Err(RulesError::PoolTooLarge {
                capacity: self.pool_capacity,
            });
        }
        if self.waypoints.is_empty() {
            return Err(RulesError::EmptyPath);
        }
        if self.waves.is_empty() {
            return Err(RulesError::NoWaves);
        }
        if self.attack_period.is_zero() {
            return Err(RulesError::ZeroAttackPeriod);
        }

        let scalars = [
            ("tower_attack_range", self.tower_attack_range),
            ("arrival_threshold", self.arrival_threshold),
            ("base_enemy_speed", self.base_enemy_speed),
            ("enemy_speed_per_wave", self.enemy_speed_per_wave),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(RulesError::NonFinite { field });
            }
            if value < 0.0 {
                return Err(RulesError::Negative { field });
            }
        }

        if !self.base_bounds.origin().is_finite() {
            return Err(RulesError::NonFinite {
                field: "base_bounds.origin",
            });
        }
        let extents = [
            ("enemy_extent", self.enemy_extent),
            ("base_bounds.size", self.base_bounds.size()),
        ];
        for (field, value) in extents {
            if !value.is_finite() {
                return Err(RulesError::NonFinite { field });
            }
            if value.min_element() < 0.0 {
                return Err(RulesError::Negative { field });
            }
        }
        if self.waypoints.iter().any(|point| !point.is_finite()) {
            return Err(RulesError::NonFinite { field: "waypoints" });
        }

        Ok(())
    }
}

/// Reasons a rule set cannot be used.
#[derive(Debug, Error)]
pub enum RulesError {
    /// The TOML document could not be parsed into a rule set.
    #[error("failed to parse rules: {0}")]
    Parse(#[source] toml::de::Error),
    /// The enemy pool must hold at least one slot.
    #[error("pool_capacity must be positive")]
    EmptyPool,
    /// The enemy pool may hold at most [`MAX_POOL_CAPACITY`] slots.
    #[error("pool_capacity {capacity} exceeds the limit of {MAX_POOL_CAPACITY}")]
    PoolTooLarge {
        /// Requested capacity.
        capacity: usize,
    },
    /// The path needs at least one waypoint to spawn enemies on.
    #[error("the path must contain at least one waypoint")]
    EmptyPath,
    /// At least one wave must be configured.
    #[error("at least one wave must be configured")]
    NoWaves,
    /// Attack cycles need a positive cadence.
    #[error("attack_period must be greater than zero")]
    ZeroAttackPeriod,
    /// A distance, speed or size was below zero.
    #[error("{field} must not be negative")]
    Negative {
        /// Name of the offending field.
        field: &'static str,
    },
    /// A numeric field was NaN or infinite.
    #[error("{field} must be finite")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// Serde adapter storing durations as fractional seconds.
pub(crate) mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(seconds).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_classic_map() {
        let rules = GameRules::default();
        assert!(rules.validate().is_ok());
        assert_eq!(rules.pool_capacity, 60);
        assert_eq!(rules.waypoints.len(), 4);
        let counts: Vec<u32> = rules.waves.iter().map(WaveSpec::count).collect();
        assert_eq!(counts, vec![3, 5, 8]);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let rules = GameRules::from_toml_str(
            r#"
            max_towers = 4
            attack_period = 0.5

            [[waves]]
            count = 2
            initial_interval = 1
            stagger = 0.25
            "#,
        )
        .expect("partial rules parse");

        assert_eq!(rules.max_towers, 4);
        assert_eq!(rules.attack_period, Duration::from_millis(500));
        assert_eq!(rules.waves.len(), 1);
        assert_eq!(rules.waves[0].initial_interval(), Duration::from_secs(1));
        assert_eq!(rules.waves[0].stagger(), Duration::from_millis(250));
        assert_eq!(rules.base_health, Health::new(6000));
    }

    #[test]
    fn waypoints_parse_from_arrays() {
        let rules = GameRules::from_toml_str("waypoints = [[0, 0], [10.5, 20]]")
            .expect("waypoints parse");
        assert_eq!(
            rules.waypoints,
            vec![Vec2::new(0.0, 0.0), Vec2::new(10.5, 20.0)]
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = GameRules::from_toml_str("tower_fire_rate = 2").expect_err("unknown key");
        assert!(matches!(error, RulesError::Parse(_)));
    }

    #[test]
    fn empty_path_is_rejected() {
        let error = GameRules::from_toml_str("waypoints = []").expect_err("empty path");
        assert!(matches!(error, RulesError::EmptyPath));
    }

    #[test]
    fn zero_attack_period_is_rejected() {
        let rules = GameRules {
            attack_period: Duration::ZERO,
            ..GameRules::default()
        };
        assert!(matches!(
            rules.validate(),
            Err(RulesError::ZeroAttackPeriod)
        ));
    }

    #[test]
    fn non_finite_range_is_rejected() {
        let rules = GameRules {
            tower_attack_range: f32::NAN,
            ..GameRules::default()
        };
        assert!(matches!(
            rules.validate(),
            Err(RulesError::NonFinite {
                field: "tower_attack_range"
            })
        ));
    }

    #[test]
    fn bundled_siege_rules_parse() {
        let rules = GameRules::from_toml_str(include_str!("../../rules/siege.toml"))
            .expect("bundled rules parse");
        assert_eq!(rules.max_towers, 6);
        let counts: Vec<u32> = rules.waves.iter().map(WaveSpec::count).collect();
        assert_eq!(counts, vec![4, 8, 12]);
        assert_eq!(rules.waves[1].initial_interval(), Duration::from_millis(2500));
        assert_eq!(rules.waypoints, GameRules::default().waypoints);
    }

    #[test]
    fn negative_sizes_and_speeds_are_rejected() {
        let cases = [
            (
                GameRules {
                    tower_attack_range: -1.0,
                    ..GameRules::default()
                },
                "tower_attack_range",
            ),
            (
                GameRules {
                    base_enemy_speed: -150.0,
                    ..GameRules::default()
                },
                "base_enemy_speed",
            ),
            (
                GameRules {
                    enemy_extent: Vec2::new(50.0, -1.0),
                    ..GameRules::default()
                },
                "enemy_extent",
            ),
            (
                GameRules {
                    base_bounds: Bounds::new(Vec2::ZERO, Vec2::new(-200.0, 200.0)),
                    ..GameRules::default()
                },
                "base_bounds.size",
            ),
        ];

        for (rules, expected) in cases {
            match rules.validate() {
                Err(RulesError::Negative { field }) => assert_eq!(field, expected),
                other => panic!("expected {expected} to be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn oversized_pool_is_rejected() {
        let rules = GameRules {
            pool_capacity: MAX_POOL_CAPACITY + 1,
            ..GameRules::default()
        };
        assert!(matches!(
            rules.validate(),
            Err(RulesError::PoolTooLarge { capacity }) if capacity == MAX_POOL_CAPACITY + 1
        ));

        let largest = GameRules {
            pool_capacity: MAX_POOL_CAPACITY,
            ..GameRules::default()
        };
        assert!(largest.validate().is_ok());
    }
}
