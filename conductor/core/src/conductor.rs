//! Conductor - The Scene Orchestrator
//!
//! The Conductor owns everything that changes while a visitor sits at the
//! launch terminal:
//! - the scrollback buffer and the command interpreter that feeds it
//! - the transition sequencer behind the loading bar
//! - the cascade of delayed layer changes that ends in the reveal
//!
//! # Design Philosophy
//!
//! The Conductor is UI-agnostic. It talks to surfaces only through
//! [`ConductorMessage`] and receives [`SurfaceEvent`]s back. It never
//! sleeps: the surface reports elapsed time through [`Conductor::advance`],
//! and every timer lives on that virtual clock.
//!
//! ```text
//! Interactive ──trigger──▶ SequenceRunning ──complete──▶ BackgroundFading
//!                                                            │ delay A: hide hyperspeed
//!                                                            │ delay B
//!                                                            ▼
//!                                                         Revealed
//! ```

use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::{LaunchConfig, SceneTimings};
use crate::events::SurfaceEvent;
use crate::interpreter::{normalize, CommandInterpreter, ScrollbackEffect};
use crate::messages::{ConductorMessage, NotifyLevel, SceneLayer, SceneState};
use crate::scrollback::ScrollbackBuffer;
use crate::sequencer::{SequencerError, SequencerEvent, TransitionSequencer};
use crate::timer::Timer;

/// Callback run once when the final content is revealed
pub type CompletionCallback = Box<dyn FnOnce() + Send + 'static>;

/// Rejected scene operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// Input arrived after the terminal stopped accepting it
    #[error("input closed: scene is {state}")]
    InputClosed {
        /// Scene state at the time of the call
        state: SceneState,
    },

    /// The requested transition is not allowed from the current state
    #[error("cannot move from {from} to {to}")]
    InvalidTransition {
        /// Current state
        from: SceneState,
        /// Requested state
        to: SceneState,
    },

    /// The Conductor has been torn down
    #[error("scene has been torn down")]
    TornDown,

    /// The sequencer refused to start
    #[error(transparent)]
    Sequencer(#[from] SequencerError),
}

/// Post-completion cascade
#[derive(Debug)]
enum Cascade {
    /// Sequencer has not completed yet
    Pending,
    /// Terminal hidden, waiting to hide the hyperspeed layer
    HideHyperspeed { timer: Timer },
    /// Hyperspeed hidden, waiting to reveal
    Reveal { timer: Timer },
    /// Final content shown
    Done,
    /// Torn down before finishing
    Cancelled,
}

/// The Conductor - headless scene orchestrator
pub struct Conductor {
    /// Timing configuration
    timings: SceneTimings,
    /// Current scene state
    state: SceneState,
    /// Terminal scrollback
    scrollback: ScrollbackBuffer,
    /// Command dispatcher
    interpreter: CommandInterpreter,
    /// Loading bar sequencer
    sequencer: TransitionSequencer,
    /// Post-completion stages
    cascade: Cascade,
    /// Channel to send messages to the surface
    tx: mpsc::UnboundedSender<ConductorMessage>,
    /// Host callback for the reveal
    on_complete: Option<CompletionCallback>,
    /// Set by `teardown`
    torn_down: bool,
}

impl std::fmt::Debug for Conductor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conductor")
            .field("timings", &self.timings)
            .field("state", &self.state)
            .field("progress", &self.sequencer.progress())
            .field("cascade", &self.cascade)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

impl Conductor {
    /// Create a Conductor in the `Interactive` state with the banner loaded
    pub fn new(timings: SceneTimings, tx: mpsc::UnboundedSender<ConductorMessage>) -> Self {
        Self {
            timings,
            state: SceneState::Interactive,
            scrollback: ScrollbackBuffer::with_banner(),
            interpreter: CommandInterpreter::new(),
            sequencer: TransitionSequencer::from_timings(&timings),
            cascade: Cascade::Pending,
            tx,
            on_complete: None,
            torn_down: false,
        }
    }

    /// Create a Conductor from a loaded launch configuration
    pub fn from_config(config: &LaunchConfig, tx: mpsc::UnboundedSender<ConductorMessage>) -> Self {
        Self::new(config.timings, tx)
    }

    /// Current scene state
    pub fn state(&self) -> SceneState {
        self.state
    }

    /// The scrollback buffer
    pub fn scrollback(&self) -> &ScrollbackBuffer {
        &self.scrollback
    }

    /// Loading progress in `[0, 100]`
    pub fn progress(&self) -> u8 {
        self.sequencer.progress()
    }

    /// Active timing configuration
    pub fn timings(&self) -> &SceneTimings {
        &self.timings
    }

    /// Whether `teardown` has run
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Register the callback run when the final content is revealed
    ///
    /// Replaces any earlier callback. It runs at most once.
    pub fn on_sequence_complete<F>(&mut self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_complete = Some(Box::new(callback));
    }

    /// Send the current state to a freshly attached surface
    pub fn sync_surface(&self) {
        self.send(ConductorMessage::StateChanged { state: self.state });
        if !self.scrollback.is_empty() {
            self.send(ConductorMessage::ScrollbackAppended {
                lines: self.scrollback.lines().to_vec(),
            });
        }
    }

    /// Handle an event from the surface
    pub fn handle_event(&mut self, event: SurfaceEvent) -> Result<(), SceneError> {
        match event {
            SurfaceEvent::Input { content } => self.submit(&content),
            SurfaceEvent::TriggerRequested => self.trigger_sequence(),
            SurfaceEvent::Tick { elapsed_ms } => {
                self.advance(Duration::from_millis(elapsed_ms));
                Ok(())
            }
            SurfaceEvent::Disconnected => {
                self.teardown();
                Ok(())
            }
        }
    }

    /// Submit one raw line of input
    ///
    /// Blank input is ignored in every state. Outside `Interactive` other
    /// input is rejected and nothing changes besides a warning notification.
    pub fn submit(&mut self, raw: &str) -> Result<(), SceneError> {
        if self.torn_down {
            return Err(SceneError::TornDown);
        }
        if normalize(raw).is_none() {
            return Ok(());
        }
        if !self.state.accepts_input() {
            let state = self.state;
            tracing::warn!(%state, "input rejected");
            self.notify(
                NotifyLevel::Warning,
                &format!("Input closed: {}", state.description()),
            );
            return Err(SceneError::InputClosed { state });
        }

        let Some(execution) = self.interpreter.execute(raw) else {
            return Ok(());
        };

        match execution.effect {
            ScrollbackEffect::Append(lines) => {
                self.scrollback.append(lines.iter().cloned());
                self.send(ConductorMessage::ScrollbackAppended { lines });
            }
            ScrollbackEffect::Reset => {
                self.scrollback.reset();
                self.send(ConductorMessage::ScrollbackCleared);
            }
        }

        if execution.trigger.is_some() {
            self.begin_sequence()?;
        }
        Ok(())
    }

    /// Start the sequence without typing the launch command
    pub fn trigger_sequence(&mut self) -> Result<(), SceneError> {
        if self.torn_down {
            return Err(SceneError::TornDown);
        }
        if self.state != SceneState::Interactive {
            let error = SceneError::InvalidTransition {
                from: self.state,
                to: SceneState::SequenceRunning,
            };
            tracing::warn!(%error, "trigger rejected");
            self.notify(NotifyLevel::Warning, &error.to_string());
            return Err(error);
        }
        self.begin_sequence()
    }

    /// Advance the virtual clock by `delta`
    ///
    /// The sequencer runs first; time left after it completes flows into
    /// the cascade, so one large delta and many small ones give the same
    /// messages in the same order.
    pub fn advance(&mut self, delta: Duration) {
        if self.torn_down {
            return;
        }
        let mut budget = delta;

        if self.state == SceneState::SequenceRunning {
            for event in self.sequencer.advance_within(&mut budget) {
                match event {
                    SequencerEvent::Progress(percent) => {
                        self.send(ConductorMessage::Progress { percent });
                    }
                    SequencerEvent::Completed => self.begin_cascade(),
                }
            }
        }

        loop {
            match &mut self.cascade {
                Cascade::HideHyperspeed { timer } => {
                    if !timer.fire_within(&mut budget) {
                        break;
                    }
                    self.set_layer(SceneLayer::Hyperspeed, false);
                    self.cascade = Cascade::Reveal {
                        timer: Timer::once(self.timings.cascade_delay_b),
                    };
                    tracing::debug!("cascade: hyperspeed hidden");
                }
                Cascade::Reveal { timer } => {
                    if !timer.fire_within(&mut budget) {
                        break;
                    }
                    self.cascade = Cascade::Done;
                    self.reveal();
                }
                Cascade::Pending | Cascade::Done | Cascade::Cancelled => break,
            }
        }
    }

    /// Cancel every pending timer. Nothing fires afterwards.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.sequencer.cancel();
        if !matches!(self.cascade, Cascade::Done) {
            self.cascade = Cascade::Cancelled;
        }
        self.on_complete = None;
        self.torn_down = true;
        tracing::debug!(state = %self.state, "conductor torn down");
    }

    // ============================================
    // Internal
    // ============================================

    fn begin_sequence(&mut self) -> Result<(), SceneError> {
        self.sequencer.start()?;
        self.set_state(SceneState::SequenceRunning);
        self.send(ConductorMessage::Progress { percent: 0 });
        tracing::info!(
            expected_ms = u64::try_from(self.timings.sequence_duration().as_millis())
                .unwrap_or(u64::MAX),
            "launch sequence started"
        );
        Ok(())
    }

    fn begin_cascade(&mut self) {
        self.set_state(SceneState::BackgroundFading);
        self.set_layer(SceneLayer::Terminal, false);
        self.set_layer(SceneLayer::GlitchBackground, false);
        self.cascade = Cascade::HideHyperspeed {
            timer: Timer::once(self.timings.cascade_delay_a),
        };
        tracing::debug!("cascade: terminal hidden");
    }

    fn reveal(&mut self) {
        self.set_state(SceneState::Revealed);
        self.set_layer(SceneLayer::FinalContent, true);
        self.send(ConductorMessage::SequenceComplete);
        tracing::info!("final content revealed");

        if let Some(callback) = self.on_complete.take() {
            callback();
        }
    }

    fn set_state(&mut self, state: SceneState) {
        tracing::debug!(from = %self.state, to = %state, "scene state changed");
        self.state = state;
        self.send(ConductorMessage::StateChanged { state });
    }

    fn set_layer(&self, layer: SceneLayer, visible: bool) {
        self.send(ConductorMessage::LayerVisibility { layer, visible });
    }

    fn notify(&self, level: NotifyLevel, message: &str) {
        self.send(ConductorMessage::Notify {
            level,
            message: message.to_string(),
        });
    }

    /// Send a message to the surface
    fn send(&self, msg: ConductorMessage) {
        if let Err(e) = self.tx.send(msg) {
            tracing::trace!("Surface gone, dropping message: {}", e);
        }
    }
}
