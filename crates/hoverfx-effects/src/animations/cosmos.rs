//! Cosmos animation: a layered star field with perspective depth.
//!
//! Every particle carries a depth in `0.0..1.0` (far to near). Depth scales
//! size and opacity at generation, slows parallax drift for far layers and
//! drives a haze that dims out-of-focus particles when drawn.

use std::f32::consts::{PI, TAU};

use fastrand::Rng;
use hoverfx_config::{CosmosConfig, MsRange};
use hoverfx_core::{Rgb, Viewport};

use super::meteor::{Meteor, MeteorClock};
use super::{Drift, Pulse, centered, wrap};
use crate::chars::{ROUND_STAR_CHARS, SPECK_CHARS, SPIKED_STAR_CHARS};
use crate::color::{GradientStop, sample_gradient, soften};
use crate::raster::Raster;

/// Blur below this radius is not worth drawing.
const BLUR_THRESHOLD: f32 = 0.4;

/// Stars wrap once this far past an edge.
const STAR_MARGIN: f32 = 50.0;

/// Stars further apart in depth than this are never linked.
const LINK_MAX_DEPTH_GAP: f32 = 0.3;

const DUST_COLOR: Rgb = Rgb::new(200, 200, 220);
const LINK_END_COLOR: Rgb = Rgb::new(150, 150, 255);
const LINK_MID_COLOR: Rgb = Rgb::new(180, 180, 255);

/// Nebula palette and how many clouds of each color to scatter.
const NEBULA_PALETTE: [(usize, Rgb); 4] = [
    (4, Rgb::new(65, 55, 120)), // deep space purple
    (3, Rgb::new(45, 45, 90)),  // dark indigo
    (3, Rgb::new(50, 60, 100)), // cosmic blue
    (2, Rgb::new(70, 50, 110)), // nebula violet
];

const FOREGROUND_PALETTE: [Rgb; 3] = [
    Rgb::new(45, 45, 90),
    Rgb::new(55, 50, 100),
    Rgb::new(50, 45, 85),
];

/// Perspective scale for a depth.
fn depth_scale(depth: f32) -> f32 {
    0.2 + depth * 0.8
}

/// Faint background texture speck. Static once generated.
#[derive(Debug, Clone, PartialEq)]
pub struct Speck {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub opacity: f32,
    pub depth: f32,
    pub color: Rgb,
}

impl Speck {
    fn random(viewport: Viewport, rng: &mut Rng) -> Self {
        let depth = rng.f32();
        Self {
            x: rng.f32() * viewport.width,
            y: rng.f32() * viewport.height,
            radius: (rng.f32() * 0.6 + 0.2) * (0.5 + depth * 0.5),
            opacity: (rng.f32() * 0.12 + 0.04) * (0.4 + depth * 0.6),
            depth,
            color: Rgb::from_f32(
                rng.f32() * 40.0 + 140.0,
                rng.f32() * 40.0 + 110.0,
                rng.f32() * 60.0 + 160.0,
            ),
        }
    }

    fn draw(&self, raster: &mut Raster) {
        let blur = (1.0 - self.depth) * 1.5;
        let alpha = haze(self.opacity, blur);
        raster.plot(self.x, self.y, speck_glyph(self.radius), self.color, alpha);
    }
}

/// The three kinds of gradient clouds, drawn at different layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudKind {
    /// Light-absorbing clouds behind the colored nebulae.
    Dark,
    /// Colored nebula pockets.
    Nebula,
    /// Large blurred clouds drawn over everything else.
    Foreground,
}

impl CloudKind {
    /// Relative radius swing over one pulse.
    fn radius_swing(self) -> f32 {
        match self {
            CloudKind::Dark | CloudKind::Foreground => 0.1,
            CloudKind::Nebula => 0.15,
        }
    }

    /// Opacity multiplier as `(base, swing)`.
    fn opacity_wave(self) -> (f32, f32) {
        match self {
            CloudKind::Dark => (0.85, 0.15),
            CloudKind::Nebula => (0.8, 0.2),
            CloudKind::Foreground => (0.9, 0.1),
        }
    }
}

/// A pulsing, drifting radial gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    pub kind: CloudKind,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub opacity: f32,
    pub color: Rgb,
    pub depth: f32,
    pub drift: Drift,
    pub pulse: Pulse,
}

impl Cloud {
    fn dark(viewport: Viewport, rng: &mut Rng) -> Self {
        let depth = rng.f32() * 0.7 + 0.3;
        Self {
            kind: CloudKind::Dark,
            x: rng.f32() * viewport.width,
            y: rng.f32() * viewport.height,
            radius: (rng.f32() * 300.0 + 200.0) * (0.4 + depth),
            opacity: (rng.f32() * 0.25 + 0.15) * depth,
            color: Rgb::BLACK,
            depth,
            drift: Drift::random(rng, 0.1 * (0.5 + depth)),
            pulse: Pulse::random(rng, 0.003, 0.008),
        }
    }

    fn nebula(viewport: Viewport, color: Rgb, rng: &mut Rng) -> Self {
        let depth = rng.f32();
        Self {
            kind: CloudKind::Nebula,
            x: rng.f32() * viewport.width,
            y: rng.f32() * viewport.height,
            radius: (rng.f32() * 250.0 + 150.0) * (0.3 + depth * 1.2),
            opacity: (rng.f32() * 0.18 + 0.08) * (0.5 + depth * 0.5),
            color,
            depth,
            drift: Drift::random(rng, 0.15 * (0.5 + depth * 1.5)),
            pulse: Pulse::random(rng, 0.005, 0.01),
        }
    }

    fn foreground(viewport: Viewport, rng: &mut Rng) -> Self {
        let color = FOREGROUND_PALETTE[rng.usize(..FOREGROUND_PALETTE.len())];
        Self {
            kind: CloudKind::Foreground,
            x: rng.f32() * viewport.width,
            y: rng.f32() * viewport.height,
            radius: rng.f32() * 600.0 + 500.0,
            opacity: rng.f32() * 0.12 + 0.06,
            color,
            depth: 1.0,
            drift: Drift::random(rng, 0.35),
            pulse: Pulse::random(rng, 0.005, 0.01),
        }
    }

    pub fn current_radius(&self) -> f32 {
        self.radius * (1.0 + self.kind.radius_swing() * self.pulse.sin())
    }

    pub fn current_opacity(&self) -> f32 {
        let (base, swing) = self.kind.opacity_wave();
        self.opacity * (base + swing * self.pulse.sin())
    }

    fn blur(&self) -> f32 {
        match self.kind {
            CloudKind::Dark => (1.0 - self.depth) * 3.0,
            CloudKind::Nebula => (1.0 - self.depth) * 4.0,
            CloudKind::Foreground => 8.0,
        }
    }

    fn stops(&self) -> Vec<GradientStop> {
        let a = self.current_opacity();
        let c = self.color;
        match self.kind {
            CloudKind::Dark => vec![
                GradientStop::new(0.0, Rgb::BLACK, a),
                GradientStop::new(0.3, Rgb::new(10, 5, 20), a * 0.8),
                GradientStop::new(0.6, Rgb::new(20, 10, 35), a * 0.5),
                GradientStop::new(0.85, Rgb::new(30, 15, 50), a * 0.2),
                GradientStop::new(1.0, Rgb::BLACK, 0.0),
            ],
            CloudKind::Nebula => vec![
                GradientStop::new(0.0, c, a),
                GradientStop::new(0.2, c, a * 0.9),
                GradientStop::new(0.4, c, a * 0.6),
                GradientStop::new(0.7, c, a * 0.3),
                GradientStop::new(1.0, Rgb::BLACK, 0.0),
            ],
            CloudKind::Foreground => vec![
                GradientStop::new(0.0, c, a),
                GradientStop::new(0.4, c, a * 0.6),
                GradientStop::new(0.7, c, a * 0.3),
                GradientStop::new(1.0, Rgb::BLACK, 0.0),
            ],
        }
    }

    fn update(&mut self, frames: f32, viewport: Viewport) {
        self.pulse.advance(frames);
        let margin = self.current_radius();
        self.x += self.drift.x * frames;
        self.y += self.drift.y * frames;
        wrap(&mut self.x, viewport.width, margin);
        wrap(&mut self.y, viewport.height, margin);
    }

    fn draw(&self, raster: &mut Raster) {
        let blur = self.blur();
        // Blurring spreads the disc edge outwards.
        let spread = if blur > BLUR_THRESHOLD { blur } else { 0.0 };
        raster.radial_gradient(self.x, self.y, self.current_radius() + spread, &self.stops());
    }
}

/// Interstellar dust. Wraps exactly at the viewport edges.
#[derive(Debug, Clone, PartialEq)]
pub struct DustMote {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub opacity: f32,
    pub depth: f32,
    pub drift: Drift,
}

impl DustMote {
    fn random(viewport: Viewport, rng: &mut Rng) -> Self {
        let depth = rng.f32();
        Self {
            x: rng.f32() * viewport.width,
            y: rng.f32() * viewport.height,
            radius: (rng.f32() * 1.2 + 0.3) * (0.5 + depth * 0.5),
            opacity: (rng.f32() * 0.35 + 0.1) * (0.5 + depth * 0.5),
            depth,
            drift: Drift::random(rng, 0.1 * (1.0 + depth)),
        }
    }

    fn update(&mut self, frames: f32, viewport: Viewport) {
        self.x += self.drift.x * frames;
        self.y += self.drift.y * frames;
        wrap(&mut self.x, viewport.width, 0.0);
        wrap(&mut self.y, viewport.height, 0.0);
    }

    fn draw(&self, raster: &mut Raster) {
        let blur = (1.0 - self.depth) * 1.2;
        let alpha = haze(self.opacity, blur);
        raster.plot(self.x, self.y, speck_glyph(self.radius), DUST_COLOR, alpha);
    }
}

/// A twinkling star that slowly swims in depth.
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub outer_radius: f32,
    pub inner_radius: f32,
    /// Number of spikes; zero for round stars.
    pub spikes: u8,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub opacity: f32,
    pub twinkle: Pulse,
    pub base_opacity: f32,
    pub depth: f32,
    pub depth_velocity: f32,
    pub original_depth: f32,
    pub drift: Drift,
}

impl Star {
    fn random(viewport: Viewport, rng: &mut Rng) -> Self {
        let depth = rng.f32();
        let size = rng.f32();
        let scale = depth_scale(depth);

        let (outer_radius, inner_radius, spikes) = if size > 0.85 {
            let outer = (rng.f32() * 5.0 + 7.0) * scale;
            (outer, outer * 0.25, 5)
        } else if size > 0.6 {
            let outer = (rng.f32() * 3.0 + 4.0) * scale;
            (outer, outer * 0.28, 5)
        } else {
            // small stars are round
            ((rng.f32() * 2.0 + 1.5) * scale, 0.0, 0)
        };

        Self {
            x: rng.f32() * viewport.width,
            y: rng.f32() * viewport.height,
            outer_radius,
            inner_radius,
            spikes,
            rotation: rng.f32() * TAU,
            rotation_speed: centered(rng) * 0.003,
            opacity: rng.f32(),
            twinkle: Pulse::random(rng, 0.02, 0.04),
            base_opacity: (rng.f32() * 0.2 + 0.7) * (0.4 + depth * 0.6),
            depth,
            depth_velocity: centered(rng) * 0.001,
            original_depth: depth,
            drift: Drift::random(rng, 0.05),
        }
    }

    pub fn is_round(&self) -> bool {
        self.spikes == 0
    }

    /// Radius multiplier relative to the size the star was generated at.
    pub fn perspective(&self) -> f32 {
        if self.original_depth > 0.0 {
            depth_scale(self.depth) / depth_scale(self.original_depth)
        } else {
            1.0
        }
    }

    fn update(&mut self, frames: f32, viewport: Viewport) {
        self.twinkle.advance(frames);
        self.rotation += self.rotation_speed * frames;
        self.opacity = (self.base_opacity + self.twinkle.sin() * 0.5).clamp(0.1, 1.0);

        self.x += self.drift.x * frames;
        self.y += self.drift.y * frames;
        wrap(&mut self.x, viewport.width, STAR_MARGIN);
        wrap(&mut self.y, viewport.height, STAR_MARGIN);

        self.depth += self.depth_velocity * frames;
        if !(0.0..=1.0).contains(&self.depth) {
            self.depth_velocity = -self.depth_velocity;
            self.depth = self.depth.clamp(0.0, 1.0);
        }
    }

    fn draw(&self, raster: &mut Raster) {
        let perspective = self.perspective();
        let outer = self.outer_radius * perspective;
        let inner = self.inner_radius * perspective;
        let blur = (1.0 - self.depth) * 2.0;
        let alpha = soften(self.opacity, blur);

        let shadow = (if self.is_round() { 10.0 } else { 15.0 }) * (1.0 - blur / 3.0);
        let glow = [
            GradientStop::new(0.0, Rgb::WHITE, alpha * 0.35),
            GradientStop::new(1.0, Rgb::WHITE, 0.0),
        ];
        raster.radial_gradient(self.x, self.y, outer + shadow, &glow);

        if self.is_round() {
            raster.plot(self.x, self.y, round_star_glyph(outer), Rgb::WHITE, alpha);
            return;
        }

        let step = TAU / self.spikes as f32;
        let start = PI / 2.0 * 3.0 + self.rotation;
        for i in 0..self.spikes {
            let angle = start + step * i as f32;
            let tip = (self.x + angle.cos() * outer, self.y + angle.sin() * outer);
            let perp = angle + PI / 2.0;
            let left = (self.x + perp.cos() * inner, self.y + perp.sin() * inner);
            let right = (self.x - perp.cos() * inner, self.y - perp.sin() * inner);
            raster.fill_triangle(left, tip, right, Rgb::WHITE, alpha);
        }
        raster.fill_circle(self.x, self.y, inner * 1.2, Rgb::WHITE, alpha, 0.0);
        raster.plot(
            self.x,
            self.y,
            spiked_star_glyph(outer, self.rotation, step),
            Rgb::WHITE,
            alpha,
        );
    }
}

/// A faint constellation line between two stars at similar depth.
#[derive(Debug, Clone, PartialEq)]
pub struct StarLink {
    /// Index of the first star.
    pub from: usize,
    /// Index of the second star; always greater than `from`.
    pub to: usize,
    pub opacity: f32,
    pub pulse: Pulse,
    pub depth: f32,
}

impl StarLink {
    pub fn current_opacity(&self) -> f32 {
        self.opacity * (0.7 + self.pulse.sin() * 0.3)
    }

    fn draw(&self, stars: &[Star], raster: &mut Raster) {
        let (Some(from), Some(to)) = (stars.get(self.from), stars.get(self.to)) else {
            return;
        };
        let blur = (1.0 - self.depth) * 1.5;
        let pulse = haze(self.current_opacity(), blur);
        let stops = [
            GradientStop::new(0.0, LINK_END_COLOR, pulse * from.opacity),
            GradientStop::new(0.5, LINK_MID_COLOR, pulse * 0.5),
            GradientStop::new(1.0, LINK_END_COLOR, pulse * to.opacity),
        ];
        let weight = 1.5 * (0.5 + self.depth * 0.5);
        raster.stroke_line((from.x, from.y), (to.x, to.y), weight, |t| {
            sample_gradient(&stops, t)
        });
    }
}

/// Particle counts of a generated scene, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CosmosCounts {
    pub specks: usize,
    pub dark_nebulae: usize,
    pub nebulae: usize,
    pub dust: usize,
    pub stars: usize,
    pub links: usize,
    pub foreground: usize,
}

/// Full cosmos scene state.
#[derive(Debug, Clone)]
pub struct CosmosScene {
    viewport: Viewport,
    specks: Vec<Speck>,
    dark_nebulae: Vec<Cloud>,
    nebulae: Vec<Cloud>,
    dust: Vec<DustMote>,
    stars: Vec<Star>,
    links: Vec<StarLink>,
    foreground: Vec<Cloud>,
    meteors: Vec<Meteor>,
    meteor_clock: MeteorClock,
    meteor_delay: MsRange,
}

impl CosmosScene {
    /// Generate a fresh scene and arm the meteor clock at `now_ms`.
    pub fn generate(viewport: Viewport, config: &CosmosConfig, now_ms: u64, rng: &mut Rng) -> Self {
        let mut specks: Vec<Speck> = (0..config.noise_count)
            .map(|_| Speck::random(viewport, rng))
            .collect();
        // far specks first so near ones win shared cells
        specks.sort_by(|a, b| a.depth.total_cmp(&b.depth));

        let dark_nebulae = (0..config.dark_nebula_count)
            .map(|_| Cloud::dark(viewport, rng))
            .collect();

        let nebulae = NEBULA_PALETTE
            .iter()
            .flat_map(|&(count, color)| std::iter::repeat_n(color, count))
            .map(|color| Cloud::nebula(viewport, color, rng))
            .collect();

        let dust = (0..config.dust_count)
            .map(|_| DustMote::random(viewport, rng))
            .collect();

        let star_count = rng.usize(config.star_count_min..=config.star_count_max);
        let mut stars: Vec<Star> = (0..star_count)
            .map(|_| Star::random(viewport, rng))
            .collect();
        stars.sort_by(|a, b| a.depth.total_cmp(&b.depth));

        let links = link_stars(&stars, viewport, config.connection_chance, rng);

        let foreground = (0..config.foreground_count)
            .map(|_| Cloud::foreground(viewport, rng))
            .collect();

        Self {
            viewport,
            specks,
            dark_nebulae,
            nebulae,
            dust,
            stars,
            links,
            foreground,
            meteors: Vec::new(),
            meteor_clock: MeteorClock::start(now_ms, config.first_meteor_delay_ms, rng),
            meteor_delay: config.meteor_delay_ms,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn counts(&self) -> CosmosCounts {
        CosmosCounts {
            specks: self.specks.len(),
            dark_nebulae: self.dark_nebulae.len(),
            nebulae: self.nebulae.len(),
            dust: self.dust.len(),
            stars: self.stars.len(),
            links: self.links.len(),
            foreground: self.foreground.len(),
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn links(&self) -> &[StarLink] {
        &self.links
    }

    pub fn meteors(&self) -> &[Meteor] {
        &self.meteors
    }

    /// Advance every particle by `frames` nominal frames.
    pub fn update(&mut self, frames: f32, now_ms: u64, rng: &mut Rng) {
        let viewport = self.viewport;

        for cloud in self
            .dark_nebulae
            .iter_mut()
            .chain(self.nebulae.iter_mut())
            .chain(self.foreground.iter_mut())
        {
            cloud.update(frames, viewport);
        }
        for mote in &mut self.dust {
            mote.update(frames, viewport);
        }
        for link in &mut self.links {
            link.pulse.advance(frames);
        }
        for star in &mut self.stars {
            star.update(frames, viewport);
        }

        for meteor in &mut self.meteors {
            meteor.advance(frames);
        }
        self.meteors.retain(|m| m.is_alive(viewport));

        if self.meteor_clock.is_due(now_ms) {
            let meteor = Meteor::spawn(viewport, rng);
            tracing::trace!(x = meteor.x, y = meteor.y, "meteor spawned");
            self.meteors.push(meteor);
            self.meteor_clock.rearm(now_ms, self.meteor_delay, rng);
        }
    }

    /// Draw back to front.
    pub fn draw(&self, raster: &mut Raster) {
        for speck in &self.specks {
            speck.draw(raster);
        }
        for cloud in &self.dark_nebulae {
            cloud.draw(raster);
        }
        for cloud in &self.nebulae {
            cloud.draw(raster);
        }
        for mote in &self.dust {
            mote.draw(raster);
        }
        for link in &self.links {
            link.draw(&self.stars, raster);
        }
        for star in &self.stars {
            star.draw(raster);
        }
        for meteor in &self.meteors {
            meteor.draw(raster);
        }
        for cloud in &self.foreground {
            cloud.draw(raster);
        }
    }
}

/// Link nearby stars of similar depth. `stars` must already be depth sorted.
fn link_stars(stars: &[Star], viewport: Viewport, chance: f32, rng: &mut Rng) -> Vec<StarLink> {
    let max_distance = viewport.min_side() * 0.2;
    let mut links = Vec::new();

    for (i, a) in stars.iter().enumerate() {
        for (j, b) in stars.iter().enumerate().skip(i + 1) {
            if (a.depth - b.depth).abs() > LINK_MAX_DEPTH_GAP {
                continue;
            }
            let distance = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
            if distance < max_distance && rng.f32() < chance {
                links.push(StarLink {
                    from: i,
                    to: j,
                    opacity: rng.f32() * 0.12 + 0.04,
                    pulse: Pulse::random(rng, 0.01, 0.02),
                    depth: (a.depth + b.depth) / 2.0,
                });
            }
        }
    }
    links
}

/// Opacity after depth haze; negligible blur is ignored.
fn haze(opacity: f32, blur: f32) -> f32 {
    if blur > BLUR_THRESHOLD {
        soften(opacity, blur)
    } else {
        opacity
    }
}

fn speck_glyph(radius: f32) -> char {
    if radius < 0.5 {
        SPECK_CHARS[0]
    } else if radius < 1.0 {
        SPECK_CHARS[1]
    } else {
        SPECK_CHARS[2]
    }
}

fn round_star_glyph(radius: f32) -> char {
    if radius < 2.0 {
        ROUND_STAR_CHARS[0]
    } else if radius < 3.0 {
        ROUND_STAR_CHARS[1]
    } else {
        ROUND_STAR_CHARS[2]
    }
}

/// Larger stars get the heavier glyph pair; rotation flips between the two.
fn spiked_star_glyph(radius: f32, rotation: f32, step: f32) -> char {
    let base = if radius < 7.0 { 0 } else { 2 };
    let half_step = (step / 2.0).max(f32::EPSILON);
    let flip = (rotation / half_step).floor().rem_euclid(2.0) as usize;
    SPIKED_STAR_CHARS[base + flip]
}
