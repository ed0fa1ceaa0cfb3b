#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Balloon Defence adapters.
//!
//! Everything here is expressed in logical world units on a fixed
//! 1920×1080 canvas; backends scale that canvas to the actual screen.

mod decorations;
mod scenery;

use std::{path::PathBuf, time::Duration};

use anyhow::Result as AnyResult;
use balloon_defence_core::{
    BaseSnapshot, Bounds, EnemyId, EnemySnapshot, Health, TowerId, TowerSnapshot,
};
use glam::Vec2;
use thiserror::Error;

pub use decorations::{DecorationSprite, Decorations, FrameRect, BIRD_FRAME_SIZE, TUMBLEWEED_FRAME_SIZE};
pub use scenery::{Scenery, SceneryItem};

/// Size of the logical canvas every scene is laid out on.
pub const LOGICAL_SIZE: Vec2 = Vec2::new(1920.0, 1080.0);

/// Uniform scale applied to the enemy sprite.
pub const ENEMY_SPRITE_SCALE: f32 = 0.5;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque pure red.
    pub const RED: Self = Self::from_rgb_u8(255, 0, 0);
    /// Opaque pure green.
    pub const GREEN: Self = Self::from_rgb_u8(0, 255, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::from_rgb_u8(0, 0, 0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position in logical world units, `None` when outside the canvas.
    pub cursor_world_space: Option<Vec2>,
    /// Whether the player clicked to place a tower this frame.
    pub place_tower: bool,
}

impl FrameInput {
    /// World position of a tower placement request issued this frame, if any.
    #[must_use]
    pub fn placement(&self) -> Option<Vec2> {
        if self.place_tower {
            self.cursor_world_space
        } else {
            None
        }
    }
}

/// Textures a backend must provide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteKey {
    /// Full-canvas background.
    Map,
    /// Balloon enemy.
    Enemy,
    /// Player tower.
    Tower,
    /// Player base.
    Base,
    /// Four-frame tumbleweed sheet.
    Tumbleweed,
    /// Two-frame bird sheet.
    Bird,
    /// Static rock.
    Rock,
    /// Static tree.
    Tree,
    /// First flower variant.
    FlowerFirst,
    /// Second flower variant.
    FlowerSecond,
    /// Third flower variant.
    FlowerThird,
}

impl SpriteKey {
    /// Every sprite in canonical load order.
    pub const ALL: [Self; 11] = [
        Self::Map,
        Self::Enemy,
        Self::Tower,
        Self::Base,
        Self::Tumbleweed,
        Self::Bird,
        Self::Rock,
        Self::Tree,
        Self::FlowerFirst,
        Self::FlowerSecond,
        Self::FlowerThird,
    ];

    /// Name used for the sprite in asset manifests.
    #[must_use]
    pub const fn manifest_key(self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::Enemy => "enemy",
            Self::Tower => "tower",
            Self::Base => "base",
            Self::Tumbleweed => "tumbleweed",
            Self::Bird => "bird",
            Self::Rock => "rock",
            Self::Tree => "tree",
            Self::FlowerFirst => "flower_first",
            Self::FlowerSecond => "flower_second",
            Self::FlowerThird => "flower_third",
        }
    }

    /// Parses a manifest name back into a sprite key.
    pub fn from_manifest_key(name: &str) -> Result<Self, RenderingError> {
        Self::ALL
            .into_iter()
            .find(|key| key.manifest_key() == name)
            .ok_or_else(|| RenderingError::UnknownSprite {
                name: name.to_owned(),
            })
    }
}

/// Maps manifest entries onto sprite keys in canonical order.
///
/// Every key in [`SpriteKey::ALL`] must appear exactly once and no other
/// names are accepted.
pub fn resolve_sprite_entries<I>(entries: I) -> Result<Vec<(SpriteKey, PathBuf)>, RenderingError>
where
    I: IntoIterator<Item = (String, PathBuf)>,
{
    let mut resolved: Vec<(SpriteKey, PathBuf)> = Vec::new();
    for (name, path) in entries {
        let key = SpriteKey::from_manifest_key(&name)?;
        if resolved.iter().any(|(existing, _)| *existing == key) {
            return Err(RenderingError::DuplicateSprite { key });
        }
        resolved.push((key, path));
    }

    if let Some(missing) = SpriteKey::ALL
        .into_iter()
        .find(|key| !resolved.iter().any(|(existing, _)| existing == key))
    {
        return Err(RenderingError::MissingSprite { key: missing });
    }

    resolved.sort_by_key(|(key, _)| *key);
    Ok(resolved)
}

/// Filled rectangle shrinking with the remaining health.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealthBar {
    /// Top-left corner in world units.
    pub origin: Vec2,
    /// Current size; the width scales with the health ratio.
    pub size: Vec2,
    /// Fill color.
    pub color: Color,
}

impl HealthBar {
    const ENEMY_FULL: Vec2 = Vec2::new(80.0, 5.0);
    const ENEMY_OFFSET: f32 = 10.0;
    const BASE_FULL: Vec2 = Vec2::new(120.0, 10.0);
    const BASE_OFFSET: f32 = 15.0;

    /// Bar drawn above an enemy whose top-left corner sits at `position`.
    #[must_use]
    pub fn enemy(position: Vec2, health_ratio: f32) -> Self {
        Self::above(position, Self::ENEMY_FULL, Self::ENEMY_OFFSET, health_ratio, Color::RED)
    }

    /// Bar drawn above the base whose top-left corner sits at `position`.
    #[must_use]
    pub fn base(position: Vec2, health_ratio: f32) -> Self {
        Self::above(position, Self::BASE_FULL, Self::BASE_OFFSET, health_ratio, Color::GREEN)
    }

    fn above(position: Vec2, full: Vec2, offset: f32, health_ratio: f32, color: Color) -> Self {
        Self {
            origin: Vec2::new(position.x, position.y - offset),
            size: Vec2::new(full.x * health_ratio.clamp(0.0, 1.0), full.y),
            color,
        }
    }
}

/// Player base as presented on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneBase {
    /// Region covered by the base sprite.
    pub bounds: Bounds,
    /// Remaining health relative to the starting health.
    pub health_ratio: f32,
}

impl SceneBase {
    /// Derives the presentation from a base snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &BaseSnapshot) -> Self {
        Self {
            bounds: snapshot.bounds,
            health_ratio: snapshot.health.ratio(snapshot.max_health),
        }
    }

    /// Health bar drawn above the base.
    #[must_use]
    pub fn health_bar(&self) -> HealthBar {
        HealthBar::base(self.bounds.origin(), self.health_ratio)
    }
}

/// Placed tower as presented on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneTower {
    /// Identifier allocated by the roster.
    pub id: TowerId,
    /// Centre of the tower sprite.
    pub position: Vec2,
}

impl SceneTower {
    /// Derives the presentation from a tower snapshot.
    #[must_use]
    pub const fn from_snapshot(snapshot: &TowerSnapshot) -> Self {
        Self {
            id: snapshot.id,
            position: snapshot.position,
        }
    }
}

/// Live enemy as presented on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneEnemy {
    /// Pool slot of the enemy.
    pub id: EnemyId,
    /// Top-left corner of the enemy sprite.
    pub position: Vec2,
    /// Remaining health relative to `max_health`.
    pub health_ratio: f32,
}

impl SceneEnemy {
    /// Derives the presentation from an enemy snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &EnemySnapshot, max_health: Health) -> Self {
        Self {
            id: snapshot.id,
            position: snapshot.position,
            health_ratio: snapshot.health.ratio(max_health),
        }
    }

    /// Health bar drawn above the enemy.
    #[must_use]
    pub fn health_bar(&self) -> HealthBar {
        HealthBar::enemy(self.position, self.health_ratio)
    }
}

/// Text shown once the base falls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameOverNotice {
    /// Message drawn on screen.
    pub text: &'static str,
    /// Font size in logical units.
    pub font_size: u16,
    /// Point the text is centred on.
    pub center: Vec2,
    /// Fill color.
    pub color: Color,
}

impl GameOverNotice {
    /// The notice drawn by every backend.
    pub const DEFAULT: Self = Self {
        text: "Game Over!",
        font_size: 200,
        center: Vec2::new(950.0, 500.0),
        color: Color::RED,
    };
}

/// Everything a backend draws in one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Player base.
    pub base: SceneBase,
    /// Placed towers in placement order.
    pub towers: Vec<SceneTower>,
    /// Live enemies in slot order.
    pub enemies: Vec<SceneEnemy>,
    /// Fixed background props.
    pub scenery: Scenery,
    /// Animated props that ignore the simulation.
    pub decorations: Decorations,
    /// Whether the base fell; hides gameplay sprites and shows the notice.
    pub game_over: bool,
}

impl Scene {
    /// Creates a scene with no towers or enemies.
    #[must_use]
    pub fn new(base: SceneBase, scenery: Scenery, decorations: Decorations) -> Self {
        Self {
            base,
            towers: Vec::new(),
            enemies: Vec::new(),
            scenery,
            decorations,
            game_over: false,
        }
    }

    /// Notice to draw this frame, if the game ended.
    #[must_use]
    pub fn game_over_notice(&self) -> Option<GameOverNotice> {
        self.game_over.then_some(GameOverNotice::DEFAULT)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Balloon Defence scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the measured frame delta
    /// and the input captured for the frame, and refreshes the scene before
    /// it is drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors raised while resolving rendering resources.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderingError {
    /// A manifest named a sprite the renderer does not know.
    #[error("unknown sprite key `{name}`")]
    UnknownSprite {
        /// Name found in the manifest.
        name: String,
    },
    /// A sprite was listed more than once.
    #[error("duplicate entry for sprite {key:?}")]
    DuplicateSprite {
        /// Repeated sprite.
        key: SpriteKey,
    },
    /// A required sprite was not listed.
    #[error("missing entry for sprite {key:?}")]
    MissingSprite {
        /// Sprite without an entry.
        key: SpriteKey,
    },
}
