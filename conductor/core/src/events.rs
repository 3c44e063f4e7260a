//! Surface Events
//!
//! Events sent from a surface to the Conductor. Surfaces report what the
//! visitor did; the Conductor decides what it means.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Events from surface to Conductor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurfaceEvent {
    /// The visitor submitted a line of input
    Input {
        /// Raw text, untrimmed
        content: String,
    },

    /// The host asked to start the sequence without typing
    TriggerRequested,

    /// Wall time elapsed since the previous frame
    Tick {
        /// Elapsed milliseconds
        elapsed_ms: u64,
    },

    /// The surface is going away
    Disconnected,
}

impl SurfaceEvent {
    /// Input event for a raw line
    pub fn input(content: impl Into<String>) -> Self {
        Self::Input {
            content: content.into(),
        }
    }

    /// Tick event for an elapsed duration
    #[must_use]
    pub fn tick(elapsed: Duration) -> Self {
        Self::Tick {
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}
