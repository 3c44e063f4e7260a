//! Scrollback Buffer
//!
//! The ordered log of lines shown in the terminal window. Lines are only
//! ever appended, or the whole buffer is reset to empty. Nothing edits or
//! removes an individual line.
//!
//! Line styling is derived from the text itself (see [`LineStyle::of`]),
//! so a surface can colour lines without any extra bookkeeping.

use serde::{Deserialize, Serialize};

/// Prompt label that prefixes echoed input
pub const PROMPT_LABEL: &str = "Instructions>";

/// Indent carried by every command output line
pub const OUTPUT_INDENT: &str = "  ";

/// Lines present before any input
pub const BANNER: [&str; 3] = [
    "MOSAIC INAUGURATION SYSTEM v2.0.25",
    "System online. Awaiting commands.",
    "",
];

/// Visual class of a scrollback line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineStyle {
    /// Echo of the visitor's input
    Echo,
    /// Indented command output
    Output,
    /// System lines (banner and blank separators before any output)
    Banner,
}

impl LineStyle {
    /// Classify a line by its shape
    #[must_use]
    pub fn of(text: &str) -> Self {
        if text.starts_with(PROMPT_LABEL) {
            Self::Echo
        } else if text.starts_with(char::is_whitespace) {
            Self::Output
        } else {
            Self::Banner
        }
    }
}

/// One immutable line of scrollback
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScrollbackLine(String);

impl ScrollbackLine {
    /// Wrap raw text as a line
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Echo line for raw input, kept verbatim after the prompt
    #[must_use]
    pub fn echo(raw_input: &str) -> Self {
        Self(format!("{PROMPT_LABEL} {raw_input}"))
    }

    /// Indented output line
    #[must_use]
    pub fn output(text: &str) -> Self {
        Self(format!("{OUTPUT_INDENT}{text}"))
    }

    /// Empty separator line
    #[must_use]
    pub fn blank() -> Self {
        Self(String::new())
    }

    /// The line text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.0
    }

    /// Style derived from the text
    #[must_use]
    pub fn style(&self) -> LineStyle {
        LineStyle::of(&self.0)
    }

    /// Text without the output indent, for output lines
    #[must_use]
    pub fn content(&self) -> &str {
        match self.style() {
            LineStyle::Output => self.0.strip_prefix(OUTPUT_INDENT).unwrap_or(&self.0),
            _ => &self.0,
        }
    }
}

impl std::fmt::Display for ScrollbackLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Append-only line log with full reset
#[derive(Clone, Debug, Default)]
pub struct ScrollbackBuffer {
    lines: Vec<ScrollbackLine>,
    /// Bumped on every mutation
    revision: u64,
}

impl ScrollbackBuffer {
    /// Create an empty buffer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer holding the startup banner
    #[must_use]
    pub fn with_banner() -> Self {
        Self {
            lines: BANNER.iter().map(|l| ScrollbackLine::new(*l)).collect(),
            revision: 0,
        }
    }

    /// Append lines in order. Appending nothing is not a mutation.
    pub fn append(&mut self, lines: impl IntoIterator<Item = ScrollbackLine>) {
        let before = self.lines.len();
        self.lines.extend(lines);
        if self.lines.len() != before {
            self.revision += 1;
        }
    }

    /// Discard every line
    ///
    /// Always counts as a mutation, even on an empty buffer, so that the
    /// surface receives a change notification for every `clear`.
    pub fn reset(&mut self) {
        self.lines.clear();
        self.revision += 1;
    }

    /// All lines, oldest first
    #[must_use]
    pub fn lines(&self) -> &[ScrollbackLine] {
        &self.lines
    }

    /// Most recent line
    #[must_use]
    pub fn last(&self) -> Option<&ScrollbackLine> {
        self.lines.last()
    }

    /// Number of lines
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the buffer is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Mutation counter
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_is_derived_from_shape() {
        assert_eq!(LineStyle::of("Instructions> help"), LineStyle::Echo);
        assert_eq!(LineStyle::of("  Available commands:"), LineStyle::Output);
        assert_eq!(LineStyle::of("\tTabbed"), LineStyle::Output);
        assert_eq!(LineStyle::of("MOSAIC INAUGURATION SYSTEM v2.0.25"), LineStyle::Banner);
        assert_eq!(LineStyle::of(""), LineStyle::Banner);
    }

    #[test]
    fn test_echo_keeps_raw_input() {
        let line = ScrollbackLine::echo("  HeLLo ");
        assert_eq!(line.text(), "Instructions>   HeLLo ");
        assert_eq!(line.style(), LineStyle::Echo);
    }

    #[test]
    fn test_output_content_strips_indent() {
        let line = ScrollbackLine::output("Secure your spot now!");
        assert_eq!(line.text(), "  Secure your spot now!");
        assert_eq!(line.content(), "Secure your spot now!");
        assert_eq!(ScrollbackLine::echo("x").content(), "Instructions> x");
    }

    #[test]
    fn test_banner_buffer() {
        let buffer = ScrollbackBuffer::with_banner();
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.lines()[0].style(), LineStyle::Banner);
        assert_eq!(buffer.revision(), 0);
    }

    #[test]
    fn test_append_preserves_order_and_bumps_revision() {
        let mut buffer = ScrollbackBuffer::new();
        buffer.append([ScrollbackLine::new("a"), ScrollbackLine::new("b")]);
        buffer.append([ScrollbackLine::new("c")]);

        let texts: Vec<_> = buffer.lines().iter().map(ScrollbackLine::text).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert_eq!(buffer.revision(), 2);
        assert_eq!(buffer.last().map(ScrollbackLine::text), Some("c"));
    }

    #[test]
    fn test_empty_append_is_not_a_mutation() {
        let mut buffer = ScrollbackBuffer::new();
        buffer.append(Vec::new());
        assert_eq!(buffer.revision(), 0);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut buffer = ScrollbackBuffer::with_banner();
        buffer.reset();
        assert!(buffer.is_empty());
        buffer.reset();
        assert!(buffer.is_empty());
        assert_eq!(buffer.revision(), 2);
    }
}
