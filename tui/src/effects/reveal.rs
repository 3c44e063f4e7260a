//! Reveal Card
//!
//! The final content: a dark screen with the event title drawn in the
//! MOSAIC palette.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use crate::theme::{MOSAIC_PALETTE, OUTPUT_GRAY};

/// Lines of the card, top to bottom
pub const REVEAL_LINES: [&str; 5] = [
    "M O S A I C",
    "INAUGURATION 2025",
    "──────────────",
    "Experience the future",
    "Where technology meets creativity.",
];

/// Card background
const CARD_BG: Color = Color::Rgb(0, 0, 0);

/// The reveal card widget
#[derive(Default)]
pub struct RevealCard;

impl RevealCard {
    /// Colour for character `index` of a `len`-character headline
    fn gradient(index: usize, len: usize) -> Color {
        if len <= 1 {
            return MOSAIC_PALETTE[0];
        }
        MOSAIC_PALETTE[index * (MOSAIC_PALETTE.len() - 1) / (len - 1)]
    }
}

impl Widget for RevealCard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(CARD_BG));

        let height = REVEAL_LINES.len() as u16;
        let top = area.y + area.height.saturating_sub(height) / 2;

        for (row, text) in REVEAL_LINES.iter().enumerate() {
            let y = top + row as u16;
            if y >= area.bottom() {
                break;
            }
            let width = text.width() as u16;
            let x = area.x + area.width.saturating_sub(width) / 2;

            match row {
                // Headlines get the palette sweep
                0 | 1 => {
                    let len = text.chars().count();
                    let mut cx = x;
                    for (i, ch) in text.chars().enumerate() {
                        if cx >= area.right() {
                            break;
                        }
                        if let Some(cell) = buf.cell_mut((cx, y)) {
                            cell.set_char(ch).set_style(
                                Style::default()
                                    .fg(Self::gradient(i, len))
                                    .add_modifier(Modifier::BOLD),
                            );
                        }
                        cx += 1;
                    }
                }
                _ => {
                    buf.set_stringn(
                        x,
                        y,
                        text,
                        usize::from(area.right().saturating_sub(x)),
                        Style::default().fg(OUTPUT_GRAY),
                    );
                }
            }
        }
    }
}
