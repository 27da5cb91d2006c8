//! Stock ticker: a trend line sweeping across the screen, surrounded by
//! return readouts and typed-out code.
//!
//! Every pump picks a new trend, traces a fresh path and restarts the sweep.
//! The sweep reveals the path from left to right; only the segments close to
//! the head are visible, fading with distance.

use fastrand::Rng;
use hoverfx_config::TickerConfig;
use hoverfx_core::{Rgb, Viewport};

use super::readout::{CodeReadout, Readout, ReadoutFade, place_labels};
use crate::chars::{CODE_SNIPPETS, HEAD_CHAR};
use crate::color::GradientStop;
use crate::raster::Raster;
use crate::typewriter::Typewriter;

/// Segments behind the head that are still visible.
const FADE_SEGMENTS: usize = 15;
const MAX_SEGMENT_ALPHA: f32 = 0.9;
const LINE_WEIGHT: f32 = 6.0;

const TREND_STRENGTH: f32 = 150.0;
const VARIATION: f32 = 220.0;
const EDGE_MARGIN: f32 = 50.0;
/// Fraction of the distance to the trend target closed at each point.
const PULL: f32 = 0.08;

const HEAD_GLOW_RADIUS: f32 = 18.0;

/// Direction of the current line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Trend {
    /// Line rises, readouts read `+x.xx%`.
    #[default]
    Gain,
    /// Line falls, readouts read `-x.xx%`.
    Loss,
}

impl Trend {
    pub fn random(rng: &mut Rng) -> Self {
        if rng.f32() > 0.5 {
            Trend::Gain
        } else {
            Trend::Loss
        }
    }

    pub fn sign(self) -> char {
        match self {
            Trend::Gain => '+',
            Trend::Loss => '-',
        }
    }

    /// Vertical screen direction; rising means a smaller y.
    pub fn direction(self) -> f32 {
        match self {
            Trend::Gain => -1.0,
            Trend::Loss => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickerPalette {
    pub gain: Rgb,
    pub loss: Rgb,
}

impl TickerPalette {
    pub fn new(gain: Rgb, loss: Rgb) -> Self {
        Self { gain, loss }
    }

    pub fn color(&self, trend: Trend) -> Rgb {
        match trend {
            Trend::Gain => self.gain,
            Trend::Loss => self.loss,
        }
    }
}

/// Trace a random path of `segments + 1` points from 20% to 80% of the width.
pub fn generate_path(
    viewport: Viewport,
    trend: Trend,
    segments: usize,
    rng: &mut Rng,
) -> Vec<(f32, f32)> {
    let start_y = viewport.height * (0.4 + rng.f32() * 0.2);
    trace_path(viewport, trend, segments, start_y, || {
        (rng.f32() - 0.5) * VARIATION
    })
}

fn trace_path(
    viewport: Viewport,
    trend: Trend,
    segments: usize,
    start_y: f32,
    mut variation: impl FnMut() -> f32,
) -> Vec<(f32, f32)> {
    let segments = segments.max(1);
    let start_x = viewport.width * 0.2;
    let span = viewport.width * 0.6;
    let floor = EDGE_MARGIN;
    let ceiling = viewport.height - EDGE_MARGIN;

    let mut y = start_y;
    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            let target = start_y + t * trend.direction() * TREND_STRENGTH;

            y += variation();
            y = y.min(ceiling).max(floor);
            y += (target - y) * PULL;

            (start_x + span * t, y)
        })
        .collect()
}

/// Index of the path point the sweep has reached.
pub fn visible_head(len: usize, progress: f32) -> usize {
    if len == 0 {
        return 0;
    }
    ((len - 1) as f32 * progress.clamp(0.0, 1.0)).floor() as usize
}

/// Opacity of segment `index` when the head is at `head`.
pub fn segment_opacity(head: usize, index: usize) -> f32 {
    if index >= head {
        return 0.0;
    }
    let distance = head - index;
    if distance > FADE_SEGMENTS {
        return 0.0;
    }
    (1.0 - distance as f32 / FADE_SEGMENTS as f32) * MAX_SEGMENT_ALPHA
}

/// Per-character delay, shortened so `text` is fully typed before the next pump.
fn fit_char_delay(char_ms: u64, pump_ms: u64, text: &str) -> u64 {
    let len = u64::try_from(text.chars().count()).unwrap_or(u64::MAX).max(1);
    char_ms.min(pump_ms.saturating_sub(1) / len)
}

/// A running stock ticker.
#[derive(Debug, Clone)]
pub struct TickerScene {
    viewport: Viewport,
    config: TickerConfig,
    palette: TickerPalette,
    trend: Trend,
    path: Vec<(f32, f32)>,
    sweep_started_ms: u64,
    last_refresh_ms: u64,
    progress: f32,
    readouts: Vec<Readout>,
    code: Vec<CodeReadout>,
}

impl TickerScene {
    /// Place the readouts and run the first pump.
    pub fn start(
        viewport: Viewport,
        config: &TickerConfig,
        palette: TickerPalette,
        now_ms: u64,
        rng: &mut Rng,
    ) -> Self {
        let max = config.readout_max.max(config.readout_min);
        let count = rng.usize(config.readout_min..=max);
        let positions = place_labels(count + config.code_snippets, rng);
        let split = count.min(positions.len());

        let readouts = positions[..split]
            .iter()
            .map(|&(x, y)| Readout::new(x, y))
            .collect();

        let mut snippets = CODE_SNIPPETS.to_vec();
        rng.shuffle(&mut snippets);
        let code = positions[split..]
            .iter()
            .zip(snippets)
            .map(|(&(x, y), text)| {
                let delay = fit_char_delay(config.typewriter_char_ms, config.pump_ms, text);
                CodeReadout::new(x, y, Typewriter::new(text, now_ms, delay))
            })
            .collect();

        let mut scene = Self {
            viewport,
            config: config.clone(),
            palette,
            trend: Trend::default(),
            path: Vec::new(),
            sweep_started_ms: now_ms,
            last_refresh_ms: now_ms,
            progress: 0.0,
            readouts,
            code,
        };
        scene.pump(now_ms, rng);
        scene
    }

    pub fn trend(&self) -> Trend {
        self.trend
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn path(&self) -> &[(f32, f32)] {
        &self.path
    }

    pub fn readouts(&self) -> &[Readout] {
        &self.readouts
    }

    pub fn code_readouts(&self) -> &[CodeReadout] {
        &self.code
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// New trend, new path, sweep from the start.
    pub fn pump(&mut self, now_ms: u64, rng: &mut Rng) {
        self.trend = Trend::random(rng);
        self.path = generate_path(self.viewport, self.trend, self.config.segments, rng);
        self.sweep_started_ms = now_ms;
        self.progress = 0.0;
        self.refresh_readouts(now_ms, rng);
        for code in &mut self.code {
            code.typewriter.restart(now_ms);
        }
        tracing::debug!(trend = ?self.trend, points = self.path.len(), "ticker pump");
    }

    fn refresh_readouts(&mut self, now_ms: u64, rng: &mut Rng) {
        self.last_refresh_ms = now_ms;
        let sign = self.trend.sign();
        let color = self.palette.color(self.trend);
        for readout in &mut self.readouts {
            readout.refresh(sign, color, self.progress, rng);
        }
    }

    /// Advance the sweep, pumping and refreshing readouts when due.
    pub fn update(&mut self, now_ms: u64, rng: &mut Rng) {
        let pump_ms = self.config.pump_ms;
        let elapsed = now_ms.saturating_sub(self.sweep_started_ms);
        if pump_ms > 0 && elapsed >= pump_ms {
            // stay on the pump grid; skipped periods are not replayed
            let due = self.sweep_started_ms + elapsed / pump_ms * pump_ms;
            self.pump(due, rng);
        }

        let elapsed = now_ms.saturating_sub(self.sweep_started_ms);
        self.progress = if self.config.sweep_ms == 0 {
            1.0
        } else {
            (elapsed as f32 / self.config.sweep_ms as f32).min(1.0)
        };

        let since_refresh = now_ms.saturating_sub(self.last_refresh_ms);
        if self.progress < 1.0 && since_refresh >= self.config.readout_refresh_ms {
            self.refresh_readouts(now_ms, rng);
        }
    }

    /// Follow a new viewport; the path is traced again.
    pub fn resize(&mut self, viewport: Viewport, rng: &mut Rng) {
        self.viewport = viewport;
        self.path = generate_path(viewport, self.trend, self.config.segments, rng);
    }

    pub fn draw(&self, raster: &mut Raster, now_ms: u64) {
        let color = self.palette.color(self.trend);
        let head = visible_head(self.path.len(), self.progress);

        for (i, pair) in self.path.windows(2).enumerate().take(head) {
            let opacity = segment_opacity(head, i);
            if opacity > 0.0 {
                raster.stroke_line(pair[0], pair[1], LINE_WEIGHT, |_| (color, opacity));
            }
        }

        if head > 0 && head < self.path.len() {
            let (x, y) = self.path[head];
            let glow = [
                GradientStop::new(0.0, color, 0.5),
                GradientStop::new(1.0, color, 0.0),
            ];
            raster.radial_gradient(x, y, HEAD_GLOW_RADIUS, &glow);
            raster.fill_circle(x, y, 8.0, color, 0.3, 0.0);
            raster.fill_circle(x, y, 5.0, color, 0.6, 0.0);
            raster.fill_circle(x, y, 3.0, color, 1.0, 0.0);
            raster.plot(x, y, HEAD_CHAR, color, 1.0);
        }

        // numbers last so code never hides them
        for code in &self.code {
            code.draw(raster, now_ms, 1.0);
        }
        for readout in &self.readouts {
            readout.draw(raster, 1.0);
        }
    }

    /// Drop the line and hand the readouts over to fade out.
    pub fn stop(self, now_ms: u64) -> ReadoutFade {
        let code = self
            .code
            .iter()
            .map(|c| (c.x, c.y, c.typewriter.visible(now_ms).to_string()))
            .collect();
        ReadoutFade::new(self.readouts, code, now_ms, self.config.fade_out_ms)
    }
}
