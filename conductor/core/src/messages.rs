//! Conductor Messages
//!
//! Messages sent from the Conductor to surfaces. A surface keeps its own
//! mirror of the scrollback, progress and layer visibility, updated only
//! through these messages, and renders from that mirror.
//!
//! Every message is serialisable so headless surfaces can stream them as
//! JSON lines.

use serde::{Deserialize, Serialize};

use crate::scrollback::ScrollbackLine;

/// Messages from Conductor to surface
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConductorMessage {
    // ============================================
    // Scrollback
    // ============================================
    /// Lines were appended to the scrollback
    ScrollbackAppended {
        /// The new lines, oldest first
        lines: Vec<ScrollbackLine>,
    },

    /// The scrollback was reset to empty
    ScrollbackCleared,

    // ============================================
    // Scene
    // ============================================
    /// The scene moved to a new state
    StateChanged {
        /// New state
        state: SceneState,
    },

    /// Loading progress changed
    Progress {
        /// Percentage in `[0, 100]`
        percent: u8,
    },

    /// Show or hide a visual layer
    LayerVisibility {
        /// Which layer
        layer: SceneLayer,
        /// Whether it should be visible
        visible: bool,
    },

    /// The cascade finished and final content is being revealed
    SequenceComplete,

    // ============================================
    // Diagnostics
    // ============================================
    /// Something the surface may want to show or log
    Notify {
        /// Severity
        level: NotifyLevel,
        /// Description
        message: String,
    },
}

impl ConductorMessage {
    /// Serialize as a single JSON line
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Scene states, strictly forward
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SceneState {
    /// Terminal accepts commands
    #[default]
    Interactive,
    /// Loading bar running, input closed
    SequenceRunning,
    /// Terminal gone, backgrounds fading out
    BackgroundFading,
    /// Final content visible
    Revealed,
}

impl SceneState {
    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Interactive => "Awaiting commands",
            Self::SequenceRunning => "Loading...",
            Self::BackgroundFading => "Launching...",
            Self::Revealed => "Live",
        }
    }

    /// Whether typed input is routed to the interpreter
    #[must_use]
    pub fn accepts_input(&self) -> bool {
        matches!(self, Self::Interactive)
    }

    /// Whether no further transition exists
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Revealed)
    }
}

impl std::fmt::Display for SceneState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Visual layers the scene drives, back to front
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneLayer {
    /// Glitching letter background, follows the terminal
    GlitchBackground,
    /// Road and light-streak effect
    Hyperspeed,
    /// The terminal window itself
    Terminal,
    /// Content revealed at the end
    FinalContent,
}

impl SceneLayer {
    /// All layers, back to front
    pub const ALL: [SceneLayer; 4] = [
        SceneLayer::GlitchBackground,
        SceneLayer::Hyperspeed,
        SceneLayer::Terminal,
        SceneLayer::FinalContent,
    ];

    /// Whether the layer is showing when the scene starts
    #[must_use]
    pub fn initially_visible(self) -> bool {
        !matches!(self, Self::FinalContent)
    }
}

/// Notification levels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
}
