#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Balloon Defence.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, so the crate depends on macroquad without its default `audio`
//! feature and the game runs silent.
//!
//! Scenes are laid out on the fixed logical canvas and letterboxed onto the
//! window, keeping the aspect ratio.

mod sprites;

use std::{
    path::PathBuf,
    sync::mpsc,
    time::Duration,
};

use anyhow::{Context, Result};
use balloon_defence_rendering::{
    Color, DecorationSprite, FrameInput, GameOverNotice, HealthBar, Presentation,
    RenderingBackend, Scene, SceneEnemy, SceneTower, Scenery, SpriteKey, ENEMY_SPRITE_SCALE,
    LOGICAL_SIZE,
};
use glam::Vec2;
use macroquad::{
    input::{is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton},
    math::{Rect, Vec2 as MacroquadVec2},
    shapes::draw_rectangle,
    text::{draw_text_ex, measure_text, TextParams},
    texture::{draw_texture_ex, DrawTextureParams, Texture2D},
};

use self::sprites::GameAssets;

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    manifest_path: PathBuf,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            manifest_path: PathBuf::from("assets/manifest.toml"),
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Overrides the asset manifest loaded at startup.
    #[must_use]
    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = path.into();
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a frame and returns the average rate once a second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            manifest_path,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 1280,
            window_height: 720,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (init_sender, init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let assets = match GameAssets::load(&manifest_path).context("failed to load game assets")
            {
                Ok(assets) => assets,
                Err(error) => {
                    let _ = init_sender.send(Err(error));
                    return;
                }
            };
            let _ = init_sender.send(Ok(()));

            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                if is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q) {
                    tracing::info!("quit requested");
                    break;
                }

                let metrics = CanvasMetrics::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let (cursor_x, cursor_y) = mouse_position();
                let frame_input = frame_input_from_observations(
                    &metrics,
                    Vec2::new(cursor_x, cursor_y),
                    is_mouse_button_pressed(MouseButton::Left),
                );

                update_scene(frame_dt, frame_input, &mut scene);

                macroquad::window::clear_background(background);
                if let Err(error) = draw_scene(&scene, &metrics, &assets) {
                    tracing::error!("failed to draw frame: {error:#}");
                    break;
                }

                if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                    if show_fps {
                        tracing::info!(fps = per_second, "frame rate");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        init_receiver.recv().unwrap_or_else(|_| Ok(()))?;

        Ok(())
    }
}

/// Mapping between the logical canvas and screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
struct CanvasMetrics {
    scale: f32,
    offset: Vec2,
}

impl CanvasMetrics {
    fn new(screen_width: f32, screen_height: f32) -> Self {
        let scale = (screen_width / LOGICAL_SIZE.x)
            .min(screen_height / LOGICAL_SIZE.y)
            .max(f32::EPSILON);
        let used = LOGICAL_SIZE * scale;
        let offset = Vec2::new(
            (screen_width - used.x) / 2.0,
            (screen_height - used.y) / 2.0,
        );
        Self { scale, offset }
    }

    fn to_screen(&self, world: Vec2) -> Vec2 {
        self.offset + world * self.scale
    }

    fn to_world(&self, screen: Vec2) -> Option<Vec2> {
        let world = (screen - self.offset) / self.scale;
        let inside = world.x >= 0.0
            && world.y >= 0.0
            && world.x <= LOGICAL_SIZE.x
            && world.y <= LOGICAL_SIZE.y;
        inside.then_some(world)
    }
}

fn frame_input_from_observations(
    metrics: &CanvasMetrics,
    cursor_screen: Vec2,
    left_click: bool,
) -> FrameInput {
    let cursor_world_space = metrics.to_world(cursor_screen);
    FrameInput {
        cursor_world_space,
        place_tower: left_click && cursor_world_space.is_some(),
    }
}

fn draw_scene(scene: &Scene, metrics: &CanvasMetrics, assets: &GameAssets) -> Result<()> {
    let atlas = assets.atlas();

    draw_sprite(
        atlas.texture(SpriteKey::Map)?,
        Vec2::ZERO,
        LOGICAL_SIZE,
        None,
        false,
        metrics,
    );
    draw_scenery(&scene.scenery, assets, metrics)?;

    if let Some(notice) = scene.game_over_notice() {
        draw_game_over(notice, assets, metrics);
        return Ok(());
    }

    let base_texture = atlas.texture(SpriteKey::Base)?;
    draw_sprite(
        base_texture,
        scene.base.bounds.origin(),
        scene.base.bounds.size(),
        None,
        false,
        metrics,
    );
    draw_health_bar(scene.base.health_bar(), metrics);

    draw_towers(&scene.towers, atlas.texture(SpriteKey::Tower)?, metrics);
    draw_enemies(&scene.enemies, atlas.texture(SpriteKey::Enemy)?, metrics);
    for decoration in scene.decorations.sprites() {
        draw_decoration(decoration, atlas.texture(decoration.sprite)?, metrics);
    }

    Ok(())
}

fn draw_scenery(scenery: &Scenery, assets: &GameAssets, metrics: &CanvasMetrics) -> Result<()> {
    for item in scenery.iter() {
        let texture = assets.atlas().texture(item.sprite)?;
        draw_sprite(
            texture,
            item.position,
            texture_size(texture) * item.scale,
            None,
            false,
            metrics,
        );
    }
    Ok(())
}

fn draw_towers(towers: &[SceneTower], texture: Texture2D, metrics: &CanvasMetrics) {
    let size = texture_size(texture);
    for tower in towers {
        draw_sprite(texture, tower.position - size / 2.0, size, None, false, metrics);
    }
}

fn draw_enemies(enemies: &[SceneEnemy], texture: Texture2D, metrics: &CanvasMetrics) {
    let size = texture_size(texture) * ENEMY_SPRITE_SCALE;
    for enemy in enemies {
        draw_sprite(texture, enemy.position, size, None, false, metrics);
        draw_health_bar(enemy.health_bar(), metrics);
    }
}

fn draw_decoration(decoration: DecorationSprite, texture: Texture2D, metrics: &CanvasMetrics) {
    let source = Rect::new(
        decoration.source.origin.x,
        decoration.source.origin.y,
        decoration.source.size.x,
        decoration.source.size.y,
    );
    draw_sprite(
        texture,
        decoration.top_left(),
        decoration.source.size,
        Some(source),
        decoration.mirrored,
        metrics,
    );
}

fn draw_health_bar(bar: HealthBar, metrics: &CanvasMetrics) {
    if bar.size.x <= 0.0 {
        return;
    }
    let origin = metrics.to_screen(bar.origin);
    let size = bar.size * metrics.scale;
    draw_rectangle(origin.x, origin.y, size.x, size.y, to_macroquad_color(bar.color));
}

fn draw_game_over(notice: GameOverNotice, assets: &GameAssets, metrics: &CanvasMetrics) {
    let font = assets.font();
    let font_scale = metrics.scale;
    let dimensions = measure_text(notice.text, Some(font.clone()), notice.font_size, font_scale);
    let center = metrics.to_screen(notice.center);

    draw_text_ex(
        notice.text,
        center.x - dimensions.width / 2.0,
        center.y + dimensions.offset_y / 2.0,
        TextParams {
            font,
            font_size: notice.font_size,
            font_scale,
            color: to_macroquad_color(notice.color),
            ..TextParams::default()
        },
    );
}

fn draw_sprite(
    texture: Texture2D,
    world_position: Vec2,
    world_size: Vec2,
    source: Option<Rect>,
    flip_x: bool,
    metrics: &CanvasMetrics,
) {
    let position = metrics.to_screen(world_position);
    let size = world_size * metrics.scale;

    draw_texture_ex(
        texture,
        position.x,
        position.y,
        macroquad::color::WHITE,
        DrawTextureParams {
            dest_size: Some(MacroquadVec2::new(size.x, size.y)),
            source,
            flip_x,
            ..DrawTextureParams::default()
        },
    );
}

fn texture_size(texture: Texture2D) -> Vec2 {
    Vec2::new(texture.width(), texture.height())
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec2_close(actual: Vec2, expected: Vec2) {
        assert!(
            (actual - expected).length() < 1e-3,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn canvas_fills_a_matching_aspect_ratio() {
        let metrics = CanvasMetrics::new(960.0, 540.0);
        assert!((metrics.scale - 0.5).abs() < 1e-6);
        assert_eq!(metrics.offset, Vec2::ZERO);
        assert_vec2_close(metrics.to_screen(Vec2::new(1920.0, 1080.0)), Vec2::new(960.0, 540.0));
    }

    #[test]
    fn canvas_letterboxes_wider_screens() {
        let metrics = CanvasMetrics::new(2400.0, 1080.0);
        assert!((metrics.scale - 1.0).abs() < 1e-6);
        assert_vec2_close(metrics.offset, Vec2::new(240.0, 0.0));
        assert_eq!(metrics.to_world(Vec2::new(100.0, 500.0)), None);
        assert_vec2_close(
            metrics.to_world(Vec2::new(340.0, 500.0)).expect("inside canvas"),
            Vec2::new(100.0, 500.0),
        );
    }

    #[test]
    fn clicks_outside_the_canvas_do_not_place_towers() {
        let metrics = CanvasMetrics::new(2400.0, 1080.0);

        let outside = frame_input_from_observations(&metrics, Vec2::new(10.0, 10.0), true);
        assert_eq!(outside.cursor_world_space, None);
        assert!(!outside.place_tower);

        let inside = frame_input_from_observations(&metrics, Vec2::new(1000.0, 300.0), true);
        assert!(inside.place_tower);
        assert_vec2_close(
            inside.placement().expect("placement inside canvas"),
            Vec2::new(760.0, 300.0),
        );
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        for _ in 0..59 {
            assert_eq!(counter.record_frame(Duration::from_millis(16)), None);
        }
        let rate = counter
            .record_frame(Duration::from_millis(56))
            .expect("a full second elapsed");
        assert!((rate - 60.0).abs() < 1e-3);
    }
}
