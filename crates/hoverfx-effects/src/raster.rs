//! Cell raster addressed in virtual pixels.
//!
//! Shapes larger than a cell tint cell backgrounds; particles smaller than a
//! cell are drawn as glyphs. Only cell centres are sampled, so a shape that
//! misses every centre leaves no trace unless it is plotted as a glyph.

use hoverfx_core::{CELL_HEIGHT_PX, CELL_WIDTH_PX, Rgb, Viewport};
use ratatui::{
    style::Style,
    text::{Line, Span},
};

use crate::chars::{HEAVY_LINE_CHARS, THIN_LINE_CHARS};
use crate::color::{GradientStop, blend, sample_gradient};

/// Lines at least this thick use heavy box-drawing glyphs.
const HEAVY_WEIGHT: f32 = 4.0;

#[derive(Debug, Clone, Copy)]
struct Glyph {
    ch: char,
    color: Rgb,
    alpha: f32,
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    bg: [f32; 3],
    glyph: Option<Glyph>,
}

/// Drawing surface for one frame.
#[derive(Debug, Clone)]
pub struct Raster {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl Raster {
    /// Create a raster with every cell set to `background`.
    pub fn new(cols: u16, rows: u16, background: Rgb) -> Self {
        let cell = Cell {
            bg: [
                background.r as f32,
                background.g as f32,
                background.b as f32,
            ],
            glyph: None,
        };
        Self {
            cols,
            rows,
            cells: vec![cell; cols as usize * rows as usize],
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::from_cells(self.cols, self.rows)
    }

    /// Cell containing the pixel `(x, y)`.
    pub fn cell_at(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
            return None;
        }
        let col = (x / CELL_WIDTH_PX) as u32;
        let row = (y / CELL_HEIGHT_PX) as u32;
        (col < self.cols as u32 && row < self.rows as u32).then_some((col as u16, row as u16))
    }

    fn cell_center(col: u16, row: u16) -> (f32, f32) {
        (
            (col as f32 + 0.5) * CELL_WIDTH_PX,
            (row as f32 + 0.5) * CELL_HEIGHT_PX,
        )
    }

    fn index(&self, col: u16, row: u16) -> Option<usize> {
        (col < self.cols && row < self.rows).then(|| row as usize * self.cols as usize + col as usize)
    }

    /// Cell range overlapping a pixel bounding box, clamped to the raster.
    fn cells_in(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Option<CellSpan> {
        if self.cols == 0 || self.rows == 0 || max_x < 0.0 || max_y < 0.0 {
            return None;
        }
        let col0 = (min_x / CELL_WIDTH_PX).floor().max(0.0) as u32;
        let row0 = (min_y / CELL_HEIGHT_PX).floor().max(0.0) as u32;
        let col1 = ((max_x / CELL_WIDTH_PX).floor() as u32).min(self.cols as u32 - 1);
        let row1 = ((max_y / CELL_HEIGHT_PX).floor() as u32).min(self.rows as u32 - 1);
        (col0 <= col1 && row0 <= row1).then_some(CellSpan {
            cols: col0 as u16..=col1 as u16,
            rows: row0 as u16..=row1 as u16,
        })
    }

    /// Blend a color into one cell's background.
    pub fn blend_bg(&mut self, col: u16, row: u16, color: Rgb, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        if let Some(i) = self.index(col, row) {
            self.cells[i].bg = blend(self.cells[i].bg, color, alpha);
        }
    }

    /// Place a glyph at a pixel position. The most opaque glyph in a cell wins.
    pub fn plot(&mut self, x: f32, y: f32, ch: char, color: Rgb, alpha: f32) {
        if let Some((col, row)) = self.cell_at(x, y) {
            self.put_glyph(col, row, ch, color, alpha);
        }
    }

    fn put_glyph(&mut self, col: u16, row: u16, ch: char, color: Rgb, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let Some(i) = self.index(col, row) else {
            return;
        };
        let cell = &mut self.cells[i];
        if cell.glyph.is_none_or(|g| g.alpha <= alpha) {
            cell.glyph = Some(Glyph {
                ch,
                color,
                alpha: alpha.min(1.0),
            });
        }
    }

    /// Write text starting at a cell, replacing any glyphs underneath.
    pub fn put_text(&mut self, col: u16, row: u16, text: &str, color: Rgb, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        for (offset, ch) in text.chars().enumerate() {
            let Ok(offset) = u16::try_from(offset) else {
                break;
            };
            let Some(i) = col.checked_add(offset).and_then(|c| self.index(c, row)) else {
                break;
            };
            self.cells[i].glyph = Some(Glyph {
                ch,
                color,
                alpha: alpha.min(1.0),
            });
        }
    }

    /// Fill a disc whose edge is softened over `blur` pixels.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb, alpha: f32, blur: f32) {
        let reach = radius + blur.max(0.0);
        let Some(span) = self.cells_in(cx - reach, cy - reach, cx + reach, cy + reach) else {
            return;
        };
        for row in span.rows.clone() {
            for col in span.cols.clone() {
                let (x, y) = Self::cell_center(col, row);
                let d = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
                let coverage = if blur > 0.0 {
                    ((radius + blur - d) / (2.0 * blur)).clamp(0.0, 1.0)
                } else if d <= radius {
                    1.0
                } else {
                    0.0
                };
                self.blend_bg(col, row, color, alpha * coverage);
            }
        }
    }

    /// Fill a disc with a radial gradient; transparent beyond `radius`.
    pub fn radial_gradient(&mut self, cx: f32, cy: f32, radius: f32, stops: &[GradientStop]) {
        if radius <= 0.0 {
            return;
        }
        let Some(span) = self.cells_in(cx - radius, cy - radius, cx + radius, cy + radius) else {
            return;
        };
        for row in span.rows.clone() {
            for col in span.cols.clone() {
                let (x, y) = Self::cell_center(col, row);
                let t = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt() / radius;
                if t < 1.0 {
                    let (color, alpha) = sample_gradient(stops, t);
                    self.blend_bg(col, row, color, alpha);
                }
            }
        }
    }

    /// Fill the cells whose centres fall inside a triangle.
    pub fn fill_triangle(
        &mut self,
        a: (f32, f32),
        b: (f32, f32),
        c: (f32, f32),
        color: Rgb,
        alpha: f32,
    ) {
        let min_x = a.0.min(b.0).min(c.0);
        let min_y = a.1.min(b.1).min(c.1);
        let max_x = a.0.max(b.0).max(c.0);
        let max_y = a.1.max(b.1).max(c.1);
        let Some(span) = self.cells_in(min_x, min_y, max_x, max_y) else {
            return;
        };

        let edge = |p: (f32, f32), q: (f32, f32), r: (f32, f32)| {
            (q.0 - p.0) * (r.1 - p.1) - (q.1 - p.1) * (r.0 - p.0)
        };
        for row in span.rows.clone() {
            for col in span.cols.clone() {
                let p = Self::cell_center(col, row);
                let e0 = edge(a, b, p);
                let e1 = edge(b, c, p);
                let e2 = edge(c, a, p);
                let inside =
                    (e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0) || (e0 <= 0.0 && e1 <= 0.0 && e2 <= 0.0);
                if inside {
                    self.blend_bg(col, row, color, alpha);
                }
            }
        }
    }

    /// Stroke a line whose color and alpha vary along its length.
    ///
    /// `shade` receives the position along the line, `0.0` at `from` and
    /// `1.0` at `to`.
    pub fn stroke_line<F>(&mut self, from: (f32, f32), to: (f32, f32), weight: f32, shade: F)
    where
        F: Fn(f32) -> (Rgb, f32),
    {
        let dx_cells = (to.0 - from.0) / CELL_WIDTH_PX;
        let dy_cells = (to.1 - from.1) / CELL_HEIGHT_PX;
        if !dx_cells.is_finite() || !dy_cells.is_finite() {
            return;
        }
        let ch = line_glyph(dx_cells, dy_cells, weight);
        let steps = (dx_cells.abs().max(dy_cells.abs()) * 2.0).ceil().max(1.0) as usize;

        let mut last_cell = None;
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let x = from.0 + (to.0 - from.0) * t;
            let y = from.1 + (to.1 - from.1) * t;
            let Some(cell) = self.cell_at(x, y) else {
                continue;
            };
            if last_cell == Some(cell) {
                continue;
            }
            last_cell = Some(cell);
            let (color, alpha) = shade(t);
            self.put_glyph(cell.0, cell.1, ch, color, alpha);
        }
    }

    /// Convert to styled lines, compositing glyphs over cell backgrounds.
    pub fn into_lines(self) -> Vec<Line<'static>> {
        let cols = self.cols.max(1) as usize;
        self.cells
            .chunks(cols)
            .map(|row| {
                let spans: Vec<Span> = row
                    .iter()
                    .map(|cell| {
                        let bg = Rgb::from_f32(cell.bg[0], cell.bg[1], cell.bg[2]);
                        match cell.glyph {
                            Some(glyph) => {
                                let fg = bg.lerp(glyph.color, glyph.alpha);
                                Span::styled(
                                    glyph.ch.to_string(),
                                    Style::new().fg(fg.color()).bg(bg.color()),
                                )
                            }
                            None => Span::styled(" ", Style::new().bg(bg.color())),
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn glyph_at(&self, col: u16, row: u16) -> Option<(char, f32)> {
        self.index(col, row)
            .and_then(|i| self.cells[i].glyph)
            .map(|g| (g.ch, g.alpha))
    }

    #[cfg(test)]
    pub(crate) fn bg_at(&self, col: u16, row: u16) -> Option<Rgb> {
        self.index(col, row).map(|i| {
            let bg = self.cells[i].bg;
            Rgb::from_f32(bg[0], bg[1], bg[2])
        })
    }
}

#[derive(Debug)]
struct CellSpan {
    cols: std::ops::RangeInclusive<u16>,
    rows: std::ops::RangeInclusive<u16>,
}

/// Pick a box-drawing glyph for a direction measured in cells.
fn line_glyph(dx: f32, dy: f32, weight: f32) -> char {
    let set = if weight >= HEAVY_WEIGHT {
        HEAVY_LINE_CHARS
    } else {
        THIN_LINE_CHARS
    };
    let angle = dy.atan2(dx).to_degrees().rem_euclid(180.0);
    if !(22.5..157.5).contains(&angle) {
        set[0]
    } else if (67.5..112.5).contains(&angle) {
        set[1]
    } else if angle < 90.0 {
        // Screen y grows downwards, so a positive slope falls to the right.
        set[3]
    } else {
        set[2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Rgb = Rgb::new(10, 10, 10);

    #[test]
    fn test_cell_at_bounds() {
        let raster = Raster::new(10, 5, BG);
        assert_eq!(raster.cell_at(0.0, 0.0), Some((0, 0)));
        assert_eq!(raster.cell_at(79.9, 79.9), Some((9, 4)));
        assert_eq!(raster.cell_at(80.0, 10.0), None);
        assert_eq!(raster.cell_at(-1.0, 10.0), None);
        assert_eq!(raster.cell_at(f32::NAN, 10.0), None);
    }

    #[test]
    fn test_plot_keeps_most_opaque_glyph() {
        let mut raster = Raster::new(4, 4, BG);
        raster.plot(4.0, 8.0, 'a', Rgb::WHITE, 0.3);
        raster.plot(5.0, 9.0, 'b', Rgb::WHITE, 0.2);
        assert_eq!(raster.glyph_at(0, 0), Some(('a', 0.3)));
        raster.plot(5.0, 9.0, 'c', Rgb::WHITE, 0.9);
        assert_eq!(raster.glyph_at(0, 0), Some(('c', 0.9)));
        raster.plot(500.0, 9.0, 'd', Rgb::WHITE, 1.0);
        raster.plot(1.0, 1.0, 'e', Rgb::WHITE, 0.0);
        assert_eq!(raster.glyph_at(0, 0), Some(('c', 0.9)));
    }

    #[test]
    fn test_fill_circle_covers_centre_only() {
        let mut raster = Raster::new(10, 10, BG);
        raster.fill_circle(44.0, 88.0, 6.0, Rgb::WHITE, 1.0, 0.0);
        assert_eq!(raster.bg_at(5, 5), Some(Rgb::WHITE));
        assert_eq!(raster.bg_at(4, 5), Some(BG));
        assert_eq!(raster.bg_at(5, 4), Some(BG));
    }

    #[test]
    fn test_radial_gradient_fades_out() {
        let mut raster = Raster::new(20, 10, BG);
        let stops = [
            GradientStop::new(0.0, Rgb::WHITE, 1.0),
            GradientStop::new(1.0, Rgb::BLACK, 0.0),
        ];
        raster.radial_gradient(84.0, 88.0, 40.0, &stops);
        let centre = raster.bg_at(10, 5).unwrap();
        let edge = raster.bg_at(14, 5).unwrap();
        assert!(centre.r > edge.r);
        assert_eq!(raster.bg_at(19, 5), Some(BG));
        assert_eq!(raster.bg_at(0, 0), Some(BG));
    }

    #[test]
    fn test_fill_triangle() {
        let mut raster = Raster::new(10, 10, BG);
        raster.fill_triangle((0.0, 0.0), (80.0, 0.0), (0.0, 160.0), Rgb::WHITE, 1.0);
        assert_eq!(raster.bg_at(0, 0), Some(Rgb::WHITE));
        assert_eq!(raster.bg_at(9, 9), Some(BG));
    }

    #[test]
    fn test_stroke_line_glyphs() {
        let mut raster = Raster::new(20, 10, BG);
        raster.stroke_line((4.0, 8.0), (150.0, 8.0), 1.0, |_| (Rgb::WHITE, 1.0));
        assert_eq!(raster.glyph_at(0, 0).map(|g| g.0), Some('─'));
        assert_eq!(raster.glyph_at(18, 0).map(|g| g.0), Some('─'));

        let mut raster = Raster::new(20, 10, BG);
        raster.stroke_line((4.0, 8.0), (4.0, 150.0), 6.0, |_| (Rgb::WHITE, 1.0));
        assert_eq!(raster.glyph_at(0, 5).map(|g| g.0), Some('┃'));

        assert_eq!(line_glyph(1.0, 1.0, 1.0), '╲');
        assert_eq!(line_glyph(1.0, -1.0, 1.0), '╱');
        assert_eq!(line_glyph(-1.0, -1.0, 1.0), '╲');
    }

    #[test]
    fn test_stroke_line_shade_follows_position() {
        let mut raster = Raster::new(20, 1, BG);
        raster.stroke_line((4.0, 8.0), (156.0, 8.0), 1.0, |t| (Rgb::WHITE, 1.0 - t));
        let (_, head) = raster.glyph_at(0, 0).unwrap();
        let (_, tail) = raster.glyph_at(18, 0).unwrap();
        assert!(head > tail);
    }

    #[test]
    fn test_put_text_clips() {
        let mut raster = Raster::new(5, 1, BG);
        raster.put_text(3, 0, "+1.23%", Rgb::WHITE, 1.0);
        assert_eq!(raster.glyph_at(3, 0).map(|g| g.0), Some('+'));
        assert_eq!(raster.glyph_at(4, 0).map(|g| g.0), Some('1'));
        raster.put_text(0, 3, "x", Rgb::WHITE, 1.0);
    }

    #[test]
    fn test_into_lines_shape() {
        let mut raster = Raster::new(3, 2, BG);
        raster.plot(1.0, 1.0, '*', Rgb::WHITE, 1.0);
        let lines = raster.into_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans.len(), 3);
        assert_eq!(lines[0].spans[0].content, "*");
        assert_eq!(lines[1].spans[2].content, " ");
    }
}
