//! Conductor Core - Headless Scene Orchestration for MOSAIC
//!
//! This crate holds everything the MOSAIC launch terminal does, independent
//! of any UI framework: the command interpreter, the scrollback, the
//! loading-bar sequencer and the cascade that ends in the final reveal. A
//! surface only renders what the Conductor tells it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Surfaces                             │
//! │     ┌──────────────────┐          ┌──────────────────────┐    │
//! │     │  TUI (ratatui)   │          │  Headless (JSON out) │    │
//! │     └────────┬─────────┘          └──────────┬───────────┘    │
//! │              └───────────────┬───────────────┘                │
//! │                  SurfaceEvent (up), advance(delta)            │
//! │                  ConductorMessage (down)                      │
//! └──────────────────────────────┼────────────────────────────────┘
//!                                │
//! ┌──────────────────────────────┼────────────────────────────────┐
//! │                        CONDUCTOR CORE                          │
//! │  ┌───────────────────────────┴──────────────────────────────┐  │
//! │  │                       Conductor                           │  │
//! │  │  ┌─────────────┐  ┌────────────┐  ┌───────────────────┐   │  │
//! │  │  │ Interpreter │─▶│ Scrollback │  │ Sequencer/Cascade │   │  │
//! │  │  └─────────────┘  └────────────┘  │  (virtual timers) │   │  │
//! │  │                                   └───────────────────┘   │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Conductor`]: Owns the scene and drives it forward
//! - [`ConductorMessage`]: Messages sent from Conductor to surfaces
//! - [`SurfaceEvent`]: Events sent from surfaces to Conductor
//! - [`CommandInterpreter`]: Maps input lines to output and triggers
//! - [`TransitionSequencer`]: The one-shot loading sequence
//!
//! # Quick Start
//!
//! ```
//! use std::time::Duration;
//! use mosaic_conductor::{Conductor, ConductorMessage, SceneState, SceneTimings};
//! use tokio::sync::mpsc;
//!
//! let (tx, mut rx) = mpsc::unbounded_channel();
//! let mut conductor = Conductor::new(SceneTimings::default(), tx);
//!
//! conductor.submit("start: mosaic-2025").unwrap();
//! conductor.advance(Duration::from_secs(10));
//! assert_eq!(conductor.state(), SceneState::Revealed);
//!
//! let mut revealed = false;
//! while let Ok(msg) = rx.try_recv() {
//!     revealed |= msg == ConductorMessage::SequenceComplete;
//! }
//! assert!(revealed);
//! ```
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework, and never sleeps. Time only moves through
//! [`Conductor::advance`].

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod conductor;
pub mod config;
pub mod events;
pub mod interpreter;
pub mod messages;
pub mod scrollback;
pub mod sequencer;
pub mod timer;

// Re-exports for convenience
pub use conductor::{CompletionCallback, Conductor, SceneError};
pub use events::SurfaceEvent;
pub use interpreter::{
    Command, CommandInterpreter, Execution, ScrollbackEffect, SequenceTrigger, LAUNCH_COMMAND,
};
pub use messages::{ConductorMessage, NotifyLevel, SceneLayer, SceneState};
pub use scrollback::{LineStyle, ScrollbackBuffer, ScrollbackLine, BANNER, PROMPT_LABEL};
pub use sequencer::{SequenceState, SequencerError, SequencerEvent, TransitionSequencer};
pub use timer::{Timer, TimerMode};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, load_config_with_env, ConfigError,
    ConfigOverrides, ConfigSource, LaunchConfig, SceneTimings,
};
