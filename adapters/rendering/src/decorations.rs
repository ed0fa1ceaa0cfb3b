//! Ambient animation: tumbleweeds rolling along the ground and birds crossing
//! the sky. Advanced by the frame delta regardless of the game state.

use std::time::Duration;

use glam::Vec2;

use crate::SpriteKey;

/// Size of one tumbleweed frame in the sprite sheet.
pub const TUMBLEWEED_FRAME_SIZE: Vec2 = Vec2::new(100.0, 100.0);

/// Size of one bird frame in the sprite sheet.
pub const BIRD_FRAME_SIZE: Vec2 = Vec2::new(135.0, 92.0);

const TUMBLEWEED_FRAMES: u32 = 4;
const TUMBLEWEED_FRAME_TIME: Duration = Duration::from_millis(200);
const BIRD_FRAMES: u32 = 2;
const BIRD_FRAME_TIME: Duration = Duration::from_millis(100);
const DRIFT_SPEED: f32 = 200.0;

/// Region of a sprite sheet holding a single frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameRect {
    /// Top-left corner within the sheet, in texels.
    pub origin: Vec2,
    /// Frame size in texels.
    pub size: Vec2,
}

/// One animated prop ready to draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecorationSprite {
    /// Sheet the frame is cut from.
    pub sprite: SpriteKey,
    /// Anchor of the prop in world units.
    pub position: Vec2,
    /// Frame to draw.
    pub source: FrameRect,
    /// Whether the frame is mirrored horizontally around the anchor.
    pub mirrored: bool,
}

impl DecorationSprite {
    /// Top-left corner of the drawn rectangle.
    ///
    /// Mirrored sprites extend to the left of their anchor.
    #[must_use]
    pub fn top_left(&self) -> Vec2 {
        if self.mirrored {
            Vec2::new(self.position.x - self.source.size.x, self.position.y)
        } else {
            self.position
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FrameClock {
    frames: u32,
    frame_time: Duration,
    elapsed: Duration,
    frame: u32,
}

impl FrameClock {
    const fn new(frames: u32, frame_time: Duration) -> Self {
        Self {
            frames,
            frame_time,
            elapsed: Duration::ZERO,
            frame: 0,
        }
    }

    fn advance(&mut self, dt: Duration) {
        self.elapsed += dt;
        if self.elapsed >= self.frame_time {
            self.frame = (self.frame + 1) % self.frames;
            self.elapsed = Duration::ZERO;
        }
    }

    fn rect(&self, frame_size: Vec2) -> FrameRect {
        FrameRect {
            origin: Vec2::new(self.frame as f32 * frame_size.x, 0.0),
            size: frame_size,
        }
    }
}

/// Horizontal mover that jumps back to `reset` once past `threshold`.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Drifter {
    position: Vec2,
    velocity: f32,
    threshold: f32,
    reset: f32,
    mirrored: bool,
}

impl Drifter {
    const fn new(position: Vec2, velocity: f32, threshold: f32, reset: f32) -> Self {
        Self {
            position,
            velocity,
            threshold,
            reset,
            mirrored: false,
        }
    }

    fn mirrored(mut self) -> Self {
        self.mirrored = true;
        self
    }

    fn advance(&mut self, dt: Duration) {
        self.position.x += self.velocity * dt.as_secs_f32();
        let passed = if self.velocity < 0.0 {
            self.position.x < self.threshold
        } else {
            self.position.x > self.threshold
        };
        if passed {
            self.position.x = self.reset;
        }
    }
}

/// Tumbleweeds and birds sharing one frame clock per kind.
#[derive(Clone, Debug, PartialEq)]
pub struct Decorations {
    tumbleweeds: [Drifter; 2],
    birds: [Drifter; 2],
    tumbleweed_clock: FrameClock,
    bird_clock: FrameClock,
}

impl Decorations {
    /// Two tumbleweeds and two birds crossing the classic 1920-wide canvas in
    /// opposite directions.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            tumbleweeds: [
                Drifter::new(Vec2::new(1920.0, 800.0), -DRIFT_SPEED, -100.0, 2020.0),
                Drifter::new(Vec2::new(20.0, 200.0), DRIFT_SPEED, 2020.0, -100.0),
            ],
            birds: [
                Drifter::new(Vec2::new(1920.0, 50.0), -DRIFT_SPEED, -135.0, 1920.0),
                Drifter::new(Vec2::new(-135.0, 700.0), DRIFT_SPEED, 2055.0, -135.0).mirrored(),
            ],
            tumbleweed_clock: FrameClock::new(TUMBLEWEED_FRAMES, TUMBLEWEED_FRAME_TIME),
            bird_clock: FrameClock::new(BIRD_FRAMES, BIRD_FRAME_TIME),
        }
    }

    /// Steps animation frames and positions by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.tumbleweed_clock.advance(dt);
        self.bird_clock.advance(dt);
        for drifter in self.tumbleweeds.iter_mut().chain(self.birds.iter_mut()) {
            drifter.advance(dt);
        }
    }

    /// Sprites to draw, tumbleweeds first.
    #[must_use]
    pub fn sprites(&self) -> Vec<DecorationSprite> {
        let tumbleweed_frame = self.tumbleweed_clock.rect(TUMBLEWEED_FRAME_SIZE);
        let bird_frame = self.bird_clock.rect(BIRD_FRAME_SIZE);

        let tumbleweeds = self
            .tumbleweeds
            .iter()
            .map(move |drifter| (SpriteKey::Tumbleweed, tumbleweed_frame, drifter));
        let birds = self
            .birds
            .iter()
            .map(move |drifter| (SpriteKey::Bird, bird_frame, drifter));

        tumbleweeds
            .chain(birds)
            .map(|(sprite, source, drifter)| DecorationSprite {
                sprite,
                position: drifter.position,
                source,
                mirrored: drifter.mirrored,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_switch_after_frame_time_and_wrap() {
        let mut decorations = Decorations::classic();
        decorations.advance(Duration::from_millis(100));

        let sprites = decorations.sprites();
        assert_eq!(sprites[0].source.origin.x, 0.0, "tumbleweed still on frame 0");
        assert_eq!(sprites[2].source.origin.x, 135.0, "bird moved to frame 1");

        for _ in 0..4 {
            decorations.advance(Duration::from_millis(200));
        }
        let sprites = decorations.sprites();
        assert_eq!(sprites[0].source.origin.x, 0.0, "tumbleweed wrapped after four frames");
    }

    #[test]
    fn drifters_move_at_fixed_speed() {
        let mut decorations = Decorations::classic();
        decorations.advance(Duration::from_millis(500));

        let sprites = decorations.sprites();
        assert!((sprites[0].position.x - 1820.0).abs() < 1e-3);
        assert!((sprites[1].position.x - 120.0).abs() < 1e-3);
        assert!((sprites[3].position.x - -35.0).abs() < 1e-3);
    }

    #[test]
    fn drifters_wrap_at_screen_edges() {
        let mut decorations = Decorations::classic();
        for _ in 0..51 {
            decorations.advance(Duration::from_millis(200));
        }

        for sprite in decorations.sprites() {
            assert!(sprite.position.x >= -135.0 && sprite.position.x <= 2055.0);
        }
    }

    #[test]
    fn mirrored_bird_extends_left_of_anchor() {
        let decorations = Decorations::classic();
        let sprites = decorations.sprites();
        assert!(!sprites[2].mirrored);
        assert!(sprites[3].mirrored);
        assert_eq!(sprites[3].top_left(), Vec2::new(-270.0, 700.0));
        assert_eq!(sprites[2].top_left(), sprites[2].position);
    }
}
