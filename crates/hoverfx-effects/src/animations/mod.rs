//! Hover animations and the small helpers they share.

pub mod cosmos;
pub mod meteor;
pub mod readout;
pub mod ticker;

use std::f32::consts::TAU;

use fastrand::Rng;

/// Per-frame positional drift in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Drift {
    pub x: f32,
    pub y: f32,
}

impl Drift {
    /// Random drift of up to `±scale / 2` on each axis.
    pub fn random(rng: &mut Rng, scale: f32) -> Self {
        Self {
            x: centered(rng) * scale,
            y: centered(rng) * scale,
        }
    }
}

/// A sine oscillator advanced once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    /// Phase increment per frame, in radians.
    pub speed: f32,
    pub phase: f32,
}

impl Pulse {
    /// Random phase with a speed drawn from `min..min + spread`.
    pub fn random(rng: &mut Rng, min: f32, spread: f32) -> Self {
        Self {
            speed: rng.f32() * spread + min,
            phase: rng.f32() * TAU,
        }
    }

    pub fn advance(&mut self, frames: f32) {
        self.phase = (self.phase + self.speed * frames) % TAU;
    }

    pub fn sin(&self) -> f32 {
        self.phase.sin()
    }
}

/// Uniform value in `-0.5..0.5`.
pub(crate) fn centered(rng: &mut Rng) -> f32 {
    rng.f32() - 0.5
}

/// Uniform value in `min..max`.
pub(crate) fn between(rng: &mut Rng, min: f32, max: f32) -> f32 {
    min + rng.f32() * (max - min)
}

/// Wrap a coordinate to the far side once it is more than `margin` past an edge.
pub(crate) fn wrap(pos: &mut f32, limit: f32, margin: f32) {
    if *pos < -margin {
        *pos = limit + margin;
    }
    if *pos > limit + margin {
        *pos = -margin;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap() {
        let mut x = -11.0;
        wrap(&mut x, 100.0, 10.0);
        assert_eq!(x, 110.0);

        let mut x = 111.0;
        wrap(&mut x, 100.0, 10.0);
        assert_eq!(x, -10.0);

        let mut x = 50.0;
        wrap(&mut x, 100.0, 10.0);
        assert_eq!(x, 50.0);

        let mut x = -0.5;
        wrap(&mut x, 100.0, 0.0);
        assert_eq!(x, 100.0);
    }

    #[test]
    fn test_pulse_stays_in_turn() {
        let mut rng = Rng::with_seed(7);
        let mut pulse = Pulse::random(&mut rng, 0.02, 0.04);
        assert!((0.02..0.06).contains(&pulse.speed));
        for _ in 0..10_000 {
            pulse.advance(1.0);
        }
        assert!((0.0..TAU).contains(&pulse.phase));
        assert!((-1.0..=1.0).contains(&pulse.sin()));
    }

    #[test]
    fn test_random_ranges() {
        let mut rng = Rng::with_seed(42);
        for _ in 0..1000 {
            let c = centered(&mut rng);
            assert!((-0.5..0.5).contains(&c));
            let b = between(&mut rng, 3.0, 8.0);
            assert!((3.0..8.0).contains(&b));
            let d = Drift::random(&mut rng, 0.1);
            assert!(d.x.abs() <= 0.05 && d.y.abs() <= 0.05);
        }
    }
}
