//! Floating labels around the ticker line: return percentages and faux code.

use fastrand::Rng;
use hoverfx_core::Rgb;

use crate::raster::Raster;
use crate::typewriter::Typewriter;

/// Minimum spacing between labels, in percent of the screen.
const MIN_DISTANCE: f32 = 10.0;

/// Attempts per label before giving up on it.
const MAX_ATTEMPTS: usize = 50;

const LABEL_ALPHA: f32 = 0.9;
const CODE_COLOR: Rgb = Rgb::new(140, 150, 175);
const CURSOR: char = '▌';

/// Scatter up to `count` label positions, in percent, away from the centre.
///
/// Positions that cannot keep [`MIN_DISTANCE`] from the others within
/// [`MAX_ATTEMPTS`] tries are dropped, so fewer may come back.
pub fn place_labels(count: usize, rng: &mut Rng) -> Vec<(f32, f32)> {
    let mut positions: Vec<(f32, f32)> = Vec::with_capacity(count);

    for _ in 0..count {
        let mut candidate = None;
        for _ in 0..MAX_ATTEMPTS {
            let mut x = rng.f32() * 100.0;
            let mut y = rng.f32() * 100.0;

            let in_centre = (30.0..=70.0).contains(&x) && (30.0..=70.0).contains(&y);
            if in_centre {
                x = push_out(x);
                y = push_out(y);
            }

            let clear = positions
                .iter()
                .all(|&(px, py)| ((x - px).powi(2) + (y - py).powi(2)).sqrt() >= MIN_DISTANCE);
            if clear {
                candidate = Some((x, y));
                break;
            }
        }
        if let Some(position) = candidate {
            positions.push(position);
        }
    }
    positions
}

fn push_out(v: f32) -> f32 {
    if v < 50.0 { v * 0.3 } else { 70.0 + (v - 70.0) * 0.3 }
}

/// A floating return percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct Readout {
    /// Horizontal position in percent.
    pub x: f32,
    /// Vertical position in percent.
    pub y: f32,
    pub text: String,
    pub color: Rgb,
}

impl Readout {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            text: String::new(),
            color: Rgb::WHITE,
        }
    }

    /// Roll a new value that grows with sweep progress.
    pub fn refresh(&mut self, sign: char, color: Rgb, progress: f32, rng: &mut Rng) {
        let base = rng.f32() * 5.0 + 2.0;
        let growth = progress * (rng.f32() * 5.0 + 3.0);
        self.text = format!("{sign}{:.2}%", base + growth);
        self.color = color;
    }

    pub fn draw(&self, raster: &mut Raster, alpha: f32) {
        draw_label(raster, self.x, self.y, &self.text, self.color, alpha * LABEL_ALPHA);
    }
}

/// A faux code snippet typed out next to the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeReadout {
    pub x: f32,
    pub y: f32,
    pub typewriter: Typewriter,
}

impl CodeReadout {
    pub fn new(x: f32, y: f32, typewriter: Typewriter) -> Self {
        Self { x, y, typewriter }
    }

    /// Text shown at `now_ms`, with a cursor while typing.
    pub fn shown(&self, now_ms: u64) -> String {
        let visible = self.typewriter.visible(now_ms);
        if self.typewriter.is_complete(now_ms) {
            visible.to_string()
        } else {
            format!("{visible}{CURSOR}")
        }
    }

    pub fn draw(&self, raster: &mut Raster, now_ms: u64, alpha: f32) {
        draw_label(
            raster,
            self.x,
            self.y,
            &self.shown(now_ms),
            CODE_COLOR,
            alpha * LABEL_ALPHA,
        );
    }
}

/// Put text at a percentage position, nudged left to stay on screen.
fn draw_label(raster: &mut Raster, x: f32, y: f32, text: &str, color: Rgb, alpha: f32) {
    let cols = raster.cols();
    let rows = raster.rows();
    if cols == 0 || rows == 0 {
        return;
    }
    let len = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    let col = ((x / 100.0) * cols as f32) as u16;
    let col = col.min(cols.saturating_sub(len));
    let row = (((y / 100.0) * rows as f32) as u16).min(rows - 1);
    raster.put_text(col, row, text, color, alpha);
}

/// Labels left behind when the ticker stops, fading out.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadoutFade {
    readouts: Vec<Readout>,
    code: Vec<(f32, f32, String)>,
    started_ms: u64,
    duration_ms: u64,
}

impl ReadoutFade {
    pub fn new(
        readouts: Vec<Readout>,
        code: Vec<(f32, f32, String)>,
        started_ms: u64,
        duration_ms: u64,
    ) -> Self {
        Self {
            readouts,
            code,
            started_ms,
            duration_ms,
        }
    }

    /// Remaining opacity, from 1 down to 0.
    pub fn alpha(&self, now_ms: u64) -> f32 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        let elapsed = now_ms.saturating_sub(self.started_ms) as f32;
        (1.0 - elapsed / self.duration_ms as f32).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.started_ms) >= self.duration_ms
    }

    pub fn draw(&self, raster: &mut Raster, now_ms: u64) {
        let alpha = self.alpha(now_ms);
        for (x, y, text) in &self.code {
            draw_label(raster, *x, *y, text, CODE_COLOR, alpha * LABEL_ALPHA);
        }
        for readout in &self.readouts {
            readout.draw(raster, alpha);
        }
    }
}
