//! Widgets
//!
//! Stateful ratatui widgets for the terminal window.

pub mod scrollback_view;
pub mod terminal_window;

pub use scrollback_view::{ScrollbackState, ScrollbackView};
pub use terminal_window::{PromptRow, TerminalWindow, WINDOW_TITLE};
