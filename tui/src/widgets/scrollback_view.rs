//! ScrollbackView Widget
//!
//! A borderless, scrollable view of scrollback lines that sticks to the
//! bottom while new output arrives.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;
use textwrap::{wrap, Options};

use mosaic_conductor::{LineStyle, ScrollbackLine, PROMPT_LABEL};

use crate::theme::line_color;

/// State for a scrollback view
#[derive(Debug)]
pub struct ScrollbackState {
    /// Scroll offset (rows from top)
    pub scroll_offset: usize,
    /// Total wrapped rows
    pub total_rows: usize,
    /// Keep the last row in view
    pub follow: bool,
}

impl Default for ScrollbackState {
    fn default() -> Self {
        Self {
            scroll_offset: 0,
            total_rows: 0,
            follow: true,
        }
    }
}

impl ScrollbackState {
    /// Scroll by delta (positive = down). Scrolling up stops following.
    pub fn scroll(&mut self, delta: i32) {
        let magnitude = delta.unsigned_abs() as usize;
        if delta < 0 {
            self.scroll_offset = self.scroll_offset.saturating_sub(magnitude);
            self.follow = false;
        } else {
            self.scroll_offset = self.scroll_offset.saturating_add(magnitude);
        }
    }

    /// Scroll to bottom and keep following
    pub fn scroll_to_bottom(&mut self) {
        self.follow = true;
    }
}

/// Wrap one line to `width`, keeping output lines indented
pub fn wrap_line(line: &ScrollbackLine, width: usize) -> Vec<String> {
    if line.text().is_empty() || width == 0 {
        return vec![String::new()];
    }

    match line.style() {
        LineStyle::Output => {
            let indent = &line.text()[..line.text().len() - line.content().len()];
            let options = Options::new(width)
                .initial_indent(indent)
                .subsequent_indent(indent);
            wrap(line.content(), options)
                .into_iter()
                .map(|cow| cow.into_owned())
                .collect()
        }
        LineStyle::Echo => {
            // Keep the prompt on the first row and align continuations after it.
            let indent = " ".repeat((PROMPT_LABEL.len() + 1).min(width.saturating_sub(1)));
            let options = Options::new(width).subsequent_indent(&indent);
            wrap(line.text(), options)
                .into_iter()
                .map(|cow| cow.into_owned())
                .collect()
        }
        LineStyle::Banner => wrap(line.text(), width)
            .into_iter()
            .map(|cow| cow.into_owned())
            .collect(),
    }
}

/// A borderless, scrollable scrollback view
pub struct ScrollbackView<'a> {
    lines: &'a [ScrollbackLine],
    base: Style,
}

impl<'a> ScrollbackView<'a> {
    pub fn new(lines: &'a [ScrollbackLine]) -> Self {
        Self {
            lines,
            base: Style::default(),
        }
    }

    /// Style patched under every line's own color
    pub fn style(mut self, style: Style) -> Self {
        self.base = style;
        self
    }
}

impl StatefulWidget for ScrollbackView<'_> {
    type State = ScrollbackState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let width = area.width as usize;
        let height = area.height as usize;

        // Wrap text to width
        let rows: Vec<(String, Style)> = self
            .lines
            .iter()
            .flat_map(|line| {
                let style = self.base.fg(line_color(line.style()));
                wrap_line(line, width)
                    .into_iter()
                    .map(move |row| (row, style))
            })
            .collect();

        state.total_rows = rows.len();

        // Clamp scroll
        let max_scroll = state.total_rows.saturating_sub(height);
        if state.follow || state.scroll_offset >= max_scroll {
            state.scroll_offset = max_scroll;
            state.follow = true;
        }

        // Render visible rows
        for (i, (row, style)) in rows
            .iter()
            .skip(state.scroll_offset)
            .take(height)
            .enumerate()
        {
            let y = area.y + i as u16;
            buf.set_stringn(area.x, y, row, width, *style);
        }
    }
}
