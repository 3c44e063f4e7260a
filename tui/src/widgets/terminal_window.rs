//! Terminal Window Widget
//!
//! The bordered MOSAIC terminal: scrollback on top, then either the input
//! prompt or, once the sequence runs, the loading line and bar.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, StatefulWidget, Widget};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use mosaic_conductor::{NotifyLevel, ScrollbackLine, PROMPT_LABEL};

use super::scrollback_view::{ScrollbackState, ScrollbackView};
use crate::display::DisplayNotification;
use crate::theme;

/// Window title
pub const WINDOW_TITLE: &str = "MOSAIC://TERMINAL/2025";

/// Block cursor drawn after the input buffer
pub const CURSOR: &str = "▊";

/// Build a text progress bar of `width` cells
pub fn progress_bar(percent: u8, width: usize) -> (String, String) {
    let filled = width * usize::from(percent.min(100)) / 100;
    ("█".repeat(filled), "░".repeat(width - filled))
}

/// What the bottom rows show
#[derive(Clone, Copy, Debug)]
pub enum PromptRow<'a> {
    /// Input line with the typed buffer
    Input(&'a str),
    /// Loading line with progress
    Loading(u8),
}

/// The terminal window
pub struct TerminalWindow<'a> {
    lines: &'a [ScrollbackLine],
    prompt: PromptRow<'a>,
    notification: Option<&'a DisplayNotification>,
}

impl<'a> TerminalWindow<'a> {
    pub fn new(lines: &'a [ScrollbackLine], prompt: PromptRow<'a>) -> Self {
        Self {
            lines,
            prompt,
            notification: None,
        }
    }

    /// Show a notification in the bottom border
    pub fn notification(mut self, notification: Option<&'a DisplayNotification>) -> Self {
        self.notification = notification;
        self
    }

    fn render_prompt(&self, area: Rect, buf: &mut Buffer) {
        match self.prompt {
            PromptRow::Input(input) => {
                let label = Style::default().fg(theme::ECHO_GREEN);
                let line = Line::from(vec![
                    Span::styled(format!("{PROMPT_LABEL} "), label.add_modifier(Modifier::BOLD)),
                    Span::styled(input, Style::default().fg(theme::OUTPUT_GRAY)),
                    Span::styled(
                        CURSOR,
                        Style::default()
                            .fg(theme::ECHO_GREEN)
                            .add_modifier(Modifier::SLOW_BLINK),
                    ),
                ]);

                let used = PROMPT_LABEL.width() + 1 + input.width() + CURSOR.width();
                if used <= area.width as usize {
                    line.render(area, buf);
                    return;
                }

                // Too wide: drop the label and show the end of the input so
                // the cursor stays in view.
                let keep = area.width.saturating_sub(1) as usize;
                let mut tail: Vec<char> = Vec::new();
                let mut width = 0;
                for c in input.chars().rev() {
                    width += c.width().unwrap_or(0);
                    if width > keep {
                        break;
                    }
                    tail.push(c);
                }
                let tail: String = tail.into_iter().rev().collect();
                Line::from(vec![
                    Span::styled(tail, Style::default().fg(theme::OUTPUT_GRAY)),
                    Span::styled(CURSOR, Style::default().fg(theme::ECHO_GREEN)),
                ])
                .render(area, buf);
            }
            PromptRow::Loading(percent) => {
                let [label_row, bar_row] =
                    Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

                Line::from(Span::styled(
                    format!("Loading: {percent}%"),
                    Style::default()
                        .fg(theme::BANNER_CYAN)
                        .add_modifier(Modifier::BOLD),
                ))
                .render(label_row, buf);

                let (filled, track) = progress_bar(percent, bar_row.width as usize);
                Line::from(vec![
                    Span::styled(filled, Style::default().fg(theme::PROGRESS_FILL)),
                    Span::styled(track, Style::default().fg(theme::PROGRESS_TRACK)),
                ])
                .render(bar_row, buf);
            }
        }
    }
}

impl StatefulWidget for TerminalWindow<'_> {
    type State = ScrollbackState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let fill = Style::default().bg(theme::WINDOW_BG);
        buf.set_style(area, fill);

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::BORDER))
            .title(Line::from(Span::styled(
                format!(" {WINDOW_TITLE} "),
                Style::default()
                    .fg(theme::BORDER)
                    .add_modifier(Modifier::BOLD),
            )))
            .style(fill);

        if let Some(notification) = self.notification {
            let color = match notification.level {
                NotifyLevel::Info => theme::BANNER_CYAN,
                NotifyLevel::Warning => theme::WARNING_AMBER,
                NotifyLevel::Error => theme::ERROR_RED,
            };
            block = block.title_bottom(Line::from(Span::styled(
                format!(" {} ", notification.message),
                Style::default().fg(color),
            )));
        }

        let inner = block.inner(area);
        block.render(area, buf);

        let prompt_height = match self.prompt {
            PromptRow::Input(_) => 1,
            PromptRow::Loading(_) => 2,
        };
        let [scrollback_area, _gap, prompt_area] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(prompt_height),
        ])
        .areas(inner);

        ScrollbackView::new(self.lines)
            .style(fill)
            .render(scrollback_area, buf, state);
        self.render_prompt(prompt_area, buf);
    }
}
