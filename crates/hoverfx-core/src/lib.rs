//! Core types shared by the hoverfx crates.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Width of one terminal cell in virtual pixels.
pub const CELL_WIDTH_PX: f32 = 8.0;

/// Height of one terminal cell in virtual pixels.
pub const CELL_HEIGHT_PX: f32 = 16.0;

/// Duration of one nominal animation frame (60 Hz).
pub const FRAME_MS: f32 = 1000.0 / 60.0;

/// An opaque 24-bit color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from floating point channels, clamping to `0..=255`.
    pub fn from_f32(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 255.0) as u8,
            g: g.clamp(0.0, 255.0) as u8,
            b: b.clamp(0.0, 255.0) as u8,
        }
    }

    /// Parse a `#rrggbb` color.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Format as `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation towards `other`.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| a as f32 + (b as f32 - a as f32) * t;
        Rgb::from_f32(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }

    /// Convert to a ratatui color.
    pub fn color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

/// Size of the drawing surface in virtual pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Viewport covering a grid of terminal cells.
    pub fn from_cells(cols: u16, rows: u16) -> Self {
        Self {
            width: cols as f32 * CELL_WIDTH_PX,
            height: rows as f32 * CELL_HEIGHT_PX,
        }
    }

    /// Shorter side of the viewport.
    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }

    /// Centre of the viewport.
    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Hover animations available on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Stars, nebulae, dust and meteors.
    Cosmos,
    /// Sweeping trend line with floating readouts.
    Ticker,
}

impl EffectKind {
    /// Human readable name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Cosmos => "cosmos",
            EffectKind::Ticker => "ticker",
        }
    }
}

/// Global playback speed multiplier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl AnimationSpeed {
    /// Multiplier applied to elapsed animation time.
    pub fn time_scale(self) -> f32 {
        match self {
            AnimationSpeed::Slow => 0.5,
            AnimationSpeed::Medium => 1.0,
            AnimationSpeed::Fast => 1.5,
        }
    }

    /// Number of nominal frames covered by `delta_ms` of wall time.
    pub fn frames(self, delta_ms: u64) -> f32 {
        delta_ms as f32 / FRAME_MS * self.time_scale()
    }

    /// Animation time covered by `delta_ms` of wall time.
    pub fn scale_ms(self, delta_ms: u64) -> u64 {
        (delta_ms as f64 * f64::from(self.time_scale())).round() as u64
    }
}

impl std::str::FromStr for AnimationSpeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "slow" => Ok(AnimationSpeed::Slow),
            "medium" => Ok(AnimationSpeed::Medium),
            "fast" => Ok(AnimationSpeed::Fast),
            other => Err(format!("unknown speed '{other}' (expected slow, medium or fast)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgb::from_hex("#e74c3c"), Some(Rgb::new(0xe7, 0x4c, 0x3c)));
        assert_eq!(Rgb::from_hex("#2ECC71"), Some(Rgb::new(0x2e, 0xcc, 0x71)));
        assert_eq!(Rgb::from_hex("e74c3c"), None);
        assert_eq!(Rgb::from_hex("#e74c3"), None);
        assert_eq!(Rgb::from_hex("#zz4c3c"), None);
        assert_eq!(Rgb::new(1, 2, 255).to_hex(), "#0102ff");
    }

    #[test]
    fn test_lerp_clamps() {
        let a = Rgb::BLACK;
        let b = Rgb::new(200, 100, 50);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 2.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(100, 50, 25));
    }

    #[test]
    fn test_viewport_from_cells() {
        let vp = Viewport::from_cells(100, 40);
        assert_eq!(vp.width, 800.0);
        assert_eq!(vp.height, 640.0);
        assert_eq!(vp.min_side(), 640.0);
        assert_eq!(vp.center(), (400.0, 320.0));
    }

    #[test]
    fn test_speed_frames() {
        assert!((AnimationSpeed::Medium.frames(1000) - 60.0).abs() < 1e-3);
        assert!((AnimationSpeed::Slow.frames(1000) - 30.0).abs() < 1e-3);
        assert_eq!("FAST".parse::<AnimationSpeed>(), Ok(AnimationSpeed::Fast));
        assert!("warp".parse::<AnimationSpeed>().is_err());
        assert_eq!(AnimationSpeed::Fast.scale_ms(100), 150);
        assert_eq!(AnimationSpeed::Slow.scale_ms(100), 50);
    }
}
