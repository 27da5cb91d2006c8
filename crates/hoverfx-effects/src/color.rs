//! Color utility functions for the animations.

use hoverfx_core::Rgb;

/// One stop of a canvas-style gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient, `0.0..=1.0`.
    pub offset: f32,
    pub color: Rgb,
    pub alpha: f32,
}

impl GradientStop {
    pub const fn new(offset: f32, color: Rgb, alpha: f32) -> Self {
        Self {
            offset,
            color,
            alpha,
        }
    }
}

/// Sample a gradient at `t`, interpolating color and alpha between stops.
///
/// Stops must be sorted by offset. Values before the first stop or after the
/// last one take the nearest stop.
pub fn sample_gradient(stops: &[GradientStop], t: f32) -> (Rgb, f32) {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return (Rgb::BLACK, 0.0);
    };
    if t <= first.offset {
        return (first.color, first.alpha);
    }
    if t >= last.offset {
        return (last.color, last.alpha);
    }

    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t >= a.offset && t <= b.offset {
            let span = (b.offset - a.offset).max(f32::EPSILON);
            let local = (t - a.offset) / span;
            let alpha = a.alpha + (b.alpha - a.alpha) * local;
            return (a.color.lerp(b.color, local), alpha);
        }
    }
    (last.color, last.alpha)
}

/// Source-over blend of `src` at `alpha` onto a floating point destination.
pub fn blend(dst: [f32; 3], src: Rgb, alpha: f32) -> [f32; 3] {
    let a = alpha.clamp(0.0, 1.0);
    [
        dst[0] + (src.r as f32 - dst[0]) * a,
        dst[1] + (src.g as f32 - dst[1]) * a,
        dst[2] + (src.b as f32 - dst[2]) * a,
    ]
}

/// Attenuate opacity for a blurred (out of focus) particle.
pub fn soften(alpha: f32, blur: f32) -> f32 {
    if blur <= 0.0 {
        alpha
    } else {
        alpha / (1.0 + blur * 0.35)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    #[test]
    fn test_sample_gradient_ends_and_middle() {
        let stops = [
            GradientStop::new(0.0, RED, 1.0),
            GradientStop::new(1.0, BLUE, 0.0),
        ];
        assert_eq!(sample_gradient(&stops, -1.0), (RED, 1.0));
        assert_eq!(sample_gradient(&stops, 2.0), (BLUE, 0.0));

        let (color, alpha) = sample_gradient(&stops, 0.5);
        assert_eq!(color, Rgb::new(127, 0, 127));
        assert!((alpha - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_sample_gradient_picks_segment() {
        let stops = [
            GradientStop::new(0.0, RED, 1.0),
            GradientStop::new(0.3, RED, 0.8),
            GradientStop::new(1.0, RED, 0.0),
        ];
        let (_, alpha) = sample_gradient(&stops, 0.15);
        assert!((alpha - 0.9).abs() < 1e-5);
        let (_, alpha) = sample_gradient(&stops, 0.65);
        assert!((alpha - 0.4).abs() < 1e-5);
        assert_eq!(sample_gradient(&[], 0.5), (Rgb::BLACK, 0.0));
    }

    #[test]
    fn test_blend() {
        let dst = [0.0, 0.0, 0.0];
        assert_eq!(blend(dst, Rgb::WHITE, 0.0), dst);
        assert_eq!(blend(dst, Rgb::WHITE, 1.0), [255.0, 255.0, 255.0]);
        assert_eq!(blend(dst, Rgb::WHITE, 0.5), [127.5, 127.5, 127.5]);
        assert_eq!(blend(dst, Rgb::WHITE, 3.0), [255.0, 255.0, 255.0]);
    }

    #[test]
    fn test_soften() {
        assert_eq!(soften(0.8, 0.0), 0.8);
        assert!(soften(0.8, 2.0) < 0.8);
        assert!(soften(0.8, 4.0) < soften(0.8, 2.0));
    }
}
