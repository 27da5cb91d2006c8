//! Shooting stars for the cosmos effect.

use std::f32::consts::PI;

use fastrand::Rng;
use hoverfx_config::MsRange;
use hoverfx_core::{Rgb, Viewport};

use super::between;
use crate::color::{GradientStop, sample_gradient};
use crate::raster::Raster;

/// Opacity lost per frame.
const FADE_PER_FRAME: f32 = 0.015;

/// Distance past the viewport edge at which a meteor is discarded.
const CULL_MARGIN: f32 = 100.0;

const TRAIL_WEIGHT: f32 = 2.0;

const BLUISH_WHITE: Rgb = Rgb::new(200, 220, 255);
const YELLOWISH_WHITE: Rgb = Rgb::new(255, 240, 200);

/// A single meteor streaking across the sky.
#[derive(Debug, Clone, PartialEq)]
pub struct Meteor {
    pub x: f32,
    pub y: f32,
    /// Velocity in pixels per frame.
    pub vx: f32,
    pub vy: f32,
    /// Trail length factor; the tail sits `velocity * length / 5` behind.
    pub length: f32,
    pub opacity: f32,
    pub brightness: f32,
    pub color: Rgb,
}

impl Meteor {
    /// Spawn a meteor just outside one of the edges, heading inwards.
    pub fn spawn(viewport: Viewport, rng: &mut Rng) -> Self {
        let side = rng.f32();
        let (x, y, angle) = if side < 0.25 {
            // top edge, 30-90 degrees downward
            (
                rng.f32() * viewport.width,
                -50.0,
                rng.f32() * PI / 3.0 + PI / 6.0,
            )
        } else if side < 0.5 {
            // right edge, towards the lower left
            (
                viewport.width + 50.0,
                rng.f32() * viewport.height,
                rng.f32() * PI / 3.0 + PI * 2.0 / 3.0,
            )
        } else if side < 0.75 {
            // top-right corner, diagonal down-left
            (
                viewport.width + rng.f32() * 100.0,
                -rng.f32() * 100.0,
                rng.f32() * PI / 4.0 + PI * 3.0 / 8.0,
            )
        } else {
            // left edge, towards the lower right
            (
                -50.0,
                rng.f32() * viewport.height,
                rng.f32() * PI / 3.0 - PI / 6.0,
            )
        };

        let speed = between(rng, 5.0, 8.0);
        Self {
            x,
            y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            length: between(rng, 40.0, 100.0),
            opacity: 1.0,
            brightness: between(rng, 0.7, 1.0),
            color: if rng.f32() > 0.7 {
                BLUISH_WHITE
            } else {
                YELLOWISH_WHITE
            },
        }
    }

    /// Move along the velocity and fade.
    pub fn advance(&mut self, frames: f32) {
        self.x += self.vx * frames;
        self.y += self.vy * frames;
        self.opacity -= FADE_PER_FRAME * frames;
    }

    /// End of the trail.
    pub fn tail(&self) -> (f32, f32) {
        (
            self.x - self.vx * self.length / 5.0,
            self.y - self.vy * self.length / 5.0,
        )
    }

    /// Still visible and near the viewport.
    pub fn is_alive(&self, viewport: Viewport) -> bool {
        self.opacity > 0.0
            && self.x > -CULL_MARGIN
            && self.x < viewport.width + CULL_MARGIN
            && self.y > -CULL_MARGIN
            && self.y < viewport.height + CULL_MARGIN
    }

    pub fn draw(&self, raster: &mut Raster) {
        let stops = [
            GradientStop::new(0.0, self.color, self.opacity * self.brightness),
            GradientStop::new(1.0, Rgb::WHITE, 0.0),
        ];
        raster.stroke_line((self.x, self.y), self.tail(), TRAIL_WEIGHT, |t| {
            sample_gradient(&stops, t)
        });
    }
}

/// Decides when the next meteor is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeteorClock {
    last_ms: u64,
    delay_ms: u64,
}

impl MeteorClock {
    /// Arm the clock for the first meteor.
    pub fn start(now_ms: u64, first_delay: MsRange, rng: &mut Rng) -> Self {
        Self {
            last_ms: now_ms,
            delay_ms: pick_delay(first_delay, rng),
        }
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_ms) > self.delay_ms
    }

    /// Record a spawn and schedule the next one.
    pub fn rearm(&mut self, now_ms: u64, delay: MsRange, rng: &mut Rng) {
        self.last_ms = now_ms;
        self.delay_ms = pick_delay(delay, rng);
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }
}

fn pick_delay(range: MsRange, rng: &mut Rng) -> u64 {
    if range.max <= range.min {
        range.min
    } else {
        rng.u64(range.min..range.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn test_spawn_starts_outside_heading_in() {
        let mut rng = Rng::with_seed(3);
        for _ in 0..500 {
            let m = Meteor::spawn(viewport(), &mut rng);
            let speed = (m.vx * m.vx + m.vy * m.vy).sqrt();
            assert!((4.999..8.001).contains(&speed), "speed {speed}");
            assert!((40.0..100.0).contains(&m.length));
            assert!((0.7..1.0).contains(&m.brightness));
            assert_eq!(m.opacity, 1.0);
            assert!(m.color == BLUISH_WHITE || m.color == YELLOWISH_WHITE);

            let outside = m.x <= 0.0 || m.x >= 800.0 || m.y <= 0.0;
            assert!(outside, "spawned inside at ({}, {})", m.x, m.y);
            if m.y <= -50.0 + f32::EPSILON && m.x < 800.0 {
                assert!(m.vy > 0.0);
            }
            if m.x >= 850.0 - f32::EPSILON && m.y > 0.0 {
                assert!(m.vx < 0.0);
            }
            if m.x <= -50.0 + f32::EPSILON {
                assert!(m.vx > 0.0);
            }
        }
    }

    #[test]
    fn test_meteor_fades_out() {
        let mut rng = Rng::with_seed(11);
        let mut m = Meteor::spawn(viewport(), &mut rng);
        m.x = 400.0;
        m.y = 300.0;
        m.vx = 0.0;
        m.vy = 0.0;
        let mut frames = 0;
        while m.is_alive(viewport()) {
            m.advance(1.0);
            frames += 1;
        }
        assert_eq!(frames, 67);
    }

    #[test]
    fn test_meteor_culled_off_screen() {
        let mut rng = Rng::with_seed(5);
        let mut m = Meteor::spawn(viewport(), &mut rng);
        m.x = -101.0;
        m.opacity = 1.0;
        assert!(!m.is_alive(viewport()));
        m.x = -99.0;
        m.y = 10.0;
        assert!(m.is_alive(viewport()));
    }

    #[test]
    fn test_tail_trails_velocity() {
        let m = Meteor {
            x: 100.0,
            y: 100.0,
            vx: 5.0,
            vy: 0.0,
            length: 50.0,
            opacity: 1.0,
            brightness: 1.0,
            color: BLUISH_WHITE,
        };
        assert_eq!(m.tail(), (50.0, 100.0));
    }

    #[test]
    fn test_meteor_clock() {
        let mut rng = Rng::with_seed(1);
        let mut clock = MeteorClock::start(1000, MsRange::new(2000, 5000), &mut rng);
        assert!((2000..5000).contains(&clock.delay_ms()));
        assert!(!clock.is_due(1000 + clock.delay_ms()));
        assert!(clock.is_due(1001 + clock.delay_ms()));

        clock.rearm(10_000, MsRange::new(3000, 3000), &mut rng);
        assert_eq!(clock.delay_ms(), 3000);
        assert!(!clock.is_due(12_000));
        assert!(clock.is_due(13_001));
    }
}
