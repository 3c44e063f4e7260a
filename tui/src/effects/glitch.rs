//! Letter Glitch
//!
//! A field of letters drawn from the event name that keeps re-rolling a
//! few cells at a time. Cells near the centre are darkened so the terminal
//! window stands out.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::buffer::Buffer;

use super::BackgroundEffect;
use crate::theme::{fade, MOSAIC_PALETTE};

/// Letters the field is made of
pub const GLITCH_CHARACTERS: &str = "MOSAIC INAUGURATION";

/// Time between re-rolls
pub const GLITCH_INTERVAL: Duration = Duration::from_millis(50);

/// Share of cells re-rolled each interval
const UPDATE_FRACTION: f64 = 0.05;

/// Re-rolls applied per update at most, so a long stall does not churn
const MAX_CATCH_UP: u32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct GlitchCell {
    ch: char,
    color: usize,
}

/// The glitching letter background
pub struct GlitchField {
    width: u16,
    height: u16,
    cells: Vec<GlitchCell>,
    charset: Vec<char>,
    since_update: Duration,
    rng: StdRng,
}

impl GlitchField {
    /// Create a field with a random seed
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_rng(width, height, StdRng::from_entropy())
    }

    /// Create a field with a fixed seed
    pub fn seeded(width: u16, height: u16, seed: u64) -> Self {
        Self::with_rng(width, height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: u16, height: u16, rng: StdRng) -> Self {
        let mut field = Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
            charset: GLITCH_CHARACTERS.chars().filter(|c| *c != ' ').collect(),
            since_update: Duration::ZERO,
            rng,
        };
        field.resize(width, height);
        field
    }

    fn random_cell(&mut self) -> GlitchCell {
        GlitchCell {
            ch: self.charset[self.rng.gen_range(0..self.charset.len())],
            color: self.rng.gen_range(0..MOSAIC_PALETTE.len()),
        }
    }

    /// Re-roll a share of the cells; returns how many changed slots
    fn reroll(&mut self) -> usize {
        let mut count = 0;
        for i in 0..self.cells.len() {
            if self.rng.gen_bool(UPDATE_FRACTION) {
                self.cells[i] = self.random_cell();
                count += 1;
            }
        }
        count
    }

    /// Brightness at a cell: dim in the middle, full at the edges
    fn vignette(&self, x: u16, y: u16) -> f32 {
        let cx = f32::from(self.width) / 2.0;
        let cy = f32::from(self.height) / 2.0;
        if cx <= 0.0 || cy <= 0.0 {
            return 1.0;
        }
        let dx = (f32::from(x) + 0.5 - cx) / cx;
        let dy = (f32::from(y) + 0.5 - cy) / cy;
        let dist = (dx * dx + dy * dy).sqrt().min(1.0);
        0.25 + 0.75 * dist
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the field has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl BackgroundEffect for GlitchField {
    fn resize(&mut self, width: u16, height: u16) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        let count = usize::from(width) * usize::from(height);
        self.cells = (0..count).map(|_| self.random_cell()).collect();
    }

    fn update(&mut self, delta: Duration) {
        self.since_update += delta;
        let mut rolls = 0;
        while self.since_update >= GLITCH_INTERVAL {
            self.since_update -= GLITCH_INTERVAL;
            if rolls < MAX_CATCH_UP {
                self.reroll();
                rolls += 1;
            }
        }
    }

    fn render(&self, buf: &mut Buffer) {
        let area = buf.area;
        for y in 0..self.height.min(area.height) {
            for x in 0..self.width.min(area.width) {
                let cell = self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)];
                let color = fade(MOSAIC_PALETTE[cell.color], self.vignette(x, y));
                if let Some(target) = buf.cell_mut((area.x + x, area.y + y)) {
                    target.set_char(cell.ch).set_fg(color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;

    #[test]
    fn test_field_fills_area_with_event_letters() {
        let field = GlitchField::seeded(20, 5, 7);
        assert_eq!(field.len(), 100);

        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 5));
        field.render(&mut buf);
        for y in 0..5 {
            for x in 0..20 {
                let symbol = buf[(x, y)].symbol();
                assert!(
                    GLITCH_CHARACTERS.contains(symbol) && symbol != " ",
                    "unexpected {symbol:?}"
                );
            }
        }
    }

    #[test]
    fn test_update_rerolls_on_interval() {
        let mut field = GlitchField::seeded(40, 20, 1);
        let before = field.cells.clone();

        field.update(GLITCH_INTERVAL - Duration::from_millis(1));
        assert_eq!(field.cells, before);

        field.update(Duration::from_millis(1));
        assert_ne!(field.cells, before);
    }

    #[test]
    fn test_vignette_darkens_centre() {
        let field = GlitchField::seeded(40, 20, 3);
        assert!(field.vignette(20, 10) < field.vignette(0, 0));
        assert!(field.vignette(0, 0) <= 1.0);
    }

    #[test]
    fn test_resize_regenerates() {
        let mut field = GlitchField::seeded(10, 10, 5);
        field.resize(4, 2);
        assert_eq!(field.len(), 8);
        field.resize(0, 0);
        assert!(field.is_empty());
        field.render(&mut Buffer::empty(Rect::new(0, 0, 0, 0)));
    }
}
