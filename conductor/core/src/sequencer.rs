//! Transition Sequencer
//!
//! A single-use staged timer: progress climbs from 0 to 100 in fixed steps,
//! then a short settle delay runs before completion is reported. The
//! sequencer owns both timers and drops them on completion or teardown, so
//! nothing can fire afterwards.
//!
//! ```text
//! Idle ──start()──▶ Running(ticking) ──100%──▶ Running(settling) ──delay──▶ Complete
//!                        │                            │
//!                        └──────────cancel()──────────┴──▶ Cancelled
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SceneTimings;
use crate::timer::Timer;

/// Upper bound of the progress value
pub const PROGRESS_MAX: u8 = 100;

/// Public lifecycle state of the sequencer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceState {
    /// Not started yet
    Idle,
    /// Ticking or settling
    Running,
    /// Completion has fired
    Complete,
    /// Torn down before completion
    Cancelled,
}

impl SequenceState {
    /// Human-readable label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Complete => "complete",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for SequenceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Notifications produced while advancing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequencerEvent {
    /// Progress changed to this value
    Progress(u8),
    /// The settle delay elapsed; fires once
    Completed,
}

/// Protocol misuse of the sequencer
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequencerError {
    /// The sequencer is single-use
    #[error("sequencer cannot start: already {state}")]
    AlreadyStarted {
        /// State at the time of the call
        state: SequenceState,
    },
}

/// Internal phase, with the timers each phase owns
#[derive(Debug)]
enum Phase {
    Idle,
    Ticking { ticker: Timer },
    Settling { settle: Timer },
    Complete,
    Cancelled,
}

/// One-shot progress sequencer
#[derive(Debug)]
pub struct TransitionSequencer {
    step_size: u8,
    tick_interval: Duration,
    post_completion_delay: Duration,
    progress: u8,
    phase: Phase,
}

impl TransitionSequencer {
    /// Create an idle sequencer
    ///
    /// A zero step size is treated as one so progress always advances.
    #[must_use]
    pub fn new(step_size: u8, tick_interval: Duration, post_completion_delay: Duration) -> Self {
        Self {
            step_size: step_size.clamp(1, PROGRESS_MAX),
            tick_interval,
            post_completion_delay,
            progress: 0,
            phase: Phase::Idle,
        }
    }

    /// Create a sequencer from scene timings
    #[must_use]
    pub fn from_timings(timings: &SceneTimings) -> Self {
        Self::new(
            timings.step_size,
            timings.tick_interval,
            timings.post_completion_delay,
        )
    }

    /// Current progress in `[0, 100]`
    #[must_use]
    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Public state
    #[must_use]
    pub fn state(&self) -> SequenceState {
        match self.phase {
            Phase::Idle => SequenceState::Idle,
            Phase::Ticking { .. } | Phase::Settling { .. } => SequenceState::Running,
            Phase::Complete => SequenceState::Complete,
            Phase::Cancelled => SequenceState::Cancelled,
        }
    }

    /// Whether progress has reached 100 and the settle delay is pending
    #[must_use]
    pub fn is_settling(&self) -> bool {
        matches!(self.phase, Phase::Settling { .. })
    }

    /// Start ticking. Only valid once, from `Idle`.
    pub fn start(&mut self) -> Result<(), SequencerError> {
        if !matches!(self.phase, Phase::Idle) {
            let state = self.state();
            tracing::warn!(%state, "rejected sequencer start");
            return Err(SequencerError::AlreadyStarted { state });
        }

        self.progress = 0;
        self.phase = Phase::Ticking {
            ticker: Timer::repeating(self.tick_interval),
        };
        tracing::debug!(
            step_size = self.step_size,
            tick_ms = u64::try_from(self.tick_interval.as_millis()).unwrap_or(u64::MAX),
            "sequencer started"
        );
        Ok(())
    }

    /// Drop every pending timer. No further events will be produced.
    pub fn cancel(&mut self) {
        if matches!(self.phase, Phase::Ticking { .. } | Phase::Settling { .. }) {
            tracing::debug!(progress = self.progress, "sequencer cancelled");
            self.phase = Phase::Cancelled;
        }
    }

    /// Advance the virtual clock by `delta`
    ///
    /// Time left over after one stage finishes carries into the next, so
    /// the events produced depend only on the total time elapsed.
    pub fn advance(&mut self, delta: Duration) -> Vec<SequencerEvent> {
        let mut budget = delta;
        self.advance_within(&mut budget)
    }

    /// Advance using time from `budget`, leaving behind whatever was not
    /// needed
    ///
    /// Only completion can leave time behind; while ticking or settling the
    /// whole budget is absorbed.
    pub fn advance_within(&mut self, budget: &mut Duration) -> Vec<SequencerEvent> {
        let mut events = Vec::new();

        loop {
            match &mut self.phase {
                Phase::Ticking { ticker } => {
                    if !ticker.fire_within(budget) {
                        break;
                    }
                    self.progress = self
                        .progress
                        .saturating_add(self.step_size)
                        .min(PROGRESS_MAX);
                    events.push(SequencerEvent::Progress(self.progress));

                    if self.progress == PROGRESS_MAX {
                        // Replacing the phase drops the ticker.
                        self.phase = Phase::Settling {
                            settle: Timer::once(self.post_completion_delay),
                        };
                    }
                }
                Phase::Settling { settle } => {
                    if !settle.fire_within(budget) {
                        break;
                    }
                    self.phase = Phase::Complete;
                    events.push(SequencerEvent::Completed);
                    tracing::debug!("sequencer complete");
                }
                Phase::Idle | Phase::Complete | Phase::Cancelled => break,
            }
        }

        events
    }
}

impl Default for TransitionSequencer {
    fn default() -> Self {
        Self::from_timings(&SceneTimings::default())
    }
}
