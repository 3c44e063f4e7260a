//! Theme and Colors
//!
//! The MOSAIC palette: three warm magentas for the left side of the road
//! and three cool blues for the right, shared by the glitch field, the
//! hyperspeed streaks and the reveal card.

use ratatui::style::Color;

use mosaic_conductor::LineStyle;

// ============================================================================
// MOSAIC Palette
// ============================================================================

/// Orchid
pub const MOSAIC_ORCHID: Color = Color::Rgb(0xD8, 0x56, 0xBF);

/// Violet
pub const MOSAIC_VIOLET: Color = Color::Rgb(0x67, 0x50, 0xA2);

/// Magenta
pub const MOSAIC_MAGENTA: Color = Color::Rgb(0xC2, 0x47, 0xAC);

/// Cyan
pub const MOSAIC_CYAN: Color = Color::Rgb(0x03, 0xB3, 0xC3);

/// Blue
pub const MOSAIC_BLUE: Color = Color::Rgb(0x0E, 0x5E, 0xA5);

/// Slate
pub const MOSAIC_SLATE: Color = Color::Rgb(0x32, 0x45, 0x55);

/// Full palette, warm first
pub const MOSAIC_PALETTE: [Color; 6] = [
    MOSAIC_ORCHID,
    MOSAIC_VIOLET,
    MOSAIC_MAGENTA,
    MOSAIC_CYAN,
    MOSAIC_BLUE,
    MOSAIC_SLATE,
];

/// Warm half (left lanes)
pub const WARM: [Color; 3] = [MOSAIC_ORCHID, MOSAIC_VIOLET, MOSAIC_MAGENTA];

/// Cool half (right lanes)
pub const COOL: [Color; 3] = [MOSAIC_CYAN, MOSAIC_BLUE, MOSAIC_SLATE];

// ============================================================================
// Terminal Window
// ============================================================================

/// Echoed input
pub const ECHO_GREEN: Color = Color::Rgb(74, 222, 128);

/// Command output
pub const OUTPUT_GRAY: Color = Color::Rgb(209, 213, 219);

/// Banner and system lines
pub const BANNER_CYAN: Color = Color::Rgb(34, 211, 238);

/// Window border and title
pub const BORDER: Color = MOSAIC_CYAN;

/// Window fill, opaque so the background does not bleed through
pub const WINDOW_BG: Color = Color::Rgb(8, 8, 12);

/// Loading bar fill
pub const PROGRESS_FILL: Color = MOSAIC_ORCHID;

/// Loading bar track
pub const PROGRESS_TRACK: Color = Color::Rgb(55, 65, 81);

/// Warning notifications
pub const WARNING_AMBER: Color = Color::Rgb(251, 191, 36);

/// Error notifications
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Road markings
pub const ROAD_WHITE: Color = Color::Rgb(200, 200, 200);

/// Foreground color for a scrollback line
#[must_use]
pub fn line_color(style: LineStyle) -> Color {
    match style {
        LineStyle::Echo => ECHO_GREEN,
        LineStyle::Output => OUTPUT_GRAY,
        LineStyle::Banner => BANNER_CYAN,
    }
}

/// Scale an RGB color towards black
///
/// Non-RGB colors cannot be scaled and are returned as-is.
#[must_use]
pub fn fade(color: Color, opacity: f32) -> Color {
    let opacity = opacity.clamp(0.0, 1.0);
    match color {
        Color::Rgb(r, g, b) => {
            let scale = |c: u8| (f32::from(c) * opacity).round() as u8;
            Color::Rgb(scale(r), scale(g), scale(b))
        }
        other => other,
    }
}
