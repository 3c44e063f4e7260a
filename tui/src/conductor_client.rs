//! Conductor Client
//!
//! Thin wrapper around the Conductor for TUI integration.
//! This client embeds the Conductor directly (no network) and provides
//! a convenient interface for sending events and receiving messages.
//!
//! # Architecture
//!
//! The TUI is a "thin client" - it doesn't contain any scene logic.
//! All orchestration happens in the Conductor. The TUI's job is:
//! 1. Convert terminal events to SurfaceEvents
//! 2. Send SurfaceEvents to Conductor
//! 3. Receive ConductorMessages
//! 4. Render display state based on messages

use std::time::Duration;

use tokio::sync::mpsc;

use mosaic_conductor::{
    Conductor, ConductorMessage, LaunchConfig, SceneError, SceneState, SurfaceEvent,
};

/// Client for communicating with the embedded Conductor
pub struct ConductorClient {
    /// The embedded Conductor instance
    conductor: Conductor,
    /// Receiver for messages from Conductor
    rx: mpsc::UnboundedReceiver<ConductorMessage>,
}

impl ConductorClient {
    /// Create a client and queue the initial state (banner included)
    pub fn new(config: &LaunchConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let conductor = Conductor::from_config(config, tx);
        conductor.sync_surface();
        Self { conductor, rx }
    }

    /// Submit a line of input
    pub fn submit(&mut self, content: &str) -> Result<(), SceneError> {
        self.conductor.submit(content)
    }

    /// Start the launch sequence directly
    pub fn trigger(&mut self) -> Result<(), SceneError> {
        self.conductor.trigger_sequence()
    }

    /// Advance the Conductor's clock
    pub fn advance(&mut self, delta: Duration) {
        self.conductor.advance(delta);
    }

    /// Stop all pending timers
    pub fn teardown(&mut self) {
        self.conductor.teardown();
    }

    /// Register a callback for the reveal
    pub fn on_sequence_complete<F>(&mut self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.conductor.on_sequence_complete(callback);
    }

    /// Try to receive a message from the Conductor (non-blocking)
    pub fn try_recv(&mut self) -> Option<ConductorMessage> {
        self.rx.try_recv().ok()
    }

    /// Receive all pending messages from the Conductor (non-blocking)
    pub fn recv_all(&mut self) -> Vec<ConductorMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Get the current scene state
    pub fn state(&self) -> SceneState {
        self.conductor.state()
    }

    /// Loading progress
    pub fn progress(&self) -> u8 {
        self.conductor.progress()
    }

    /// Send raw surface event to Conductor
    pub fn send_event(&mut self, event: SurfaceEvent) -> Result<(), SceneError> {
        self.conductor.handle_event(event)
    }
}
