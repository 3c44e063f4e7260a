//! Display State Types
//!
//! Types that represent the current display state for the TUI.
//! These are derived from ConductorMessages and used for rendering.
//!
//! # Design Philosophy
//!
//! The TUI is a "thin client" - it just renders what the Conductor tells it to.
//! Display state is the bridge between ConductorMessages and rendering.
//!
//! - `LayerFade`: Opacity of one scene layer, easing towards its target
//! - `DisplayNotification`: A short-lived status line message
//! - `DisplayState`: Everything the renderer reads

use std::collections::HashMap;
use std::time::Duration;

use mosaic_conductor::{
    ConductorMessage, NotifyLevel, SceneLayer, SceneState, ScrollbackLine,
};

/// Time a layer takes to fade fully in or out
pub const FADE_DURATION: Duration = Duration::from_secs(2);

/// How long a notification stays on screen
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Opacity of one layer, moving linearly towards its target
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerFade {
    visible: bool,
    opacity: f32,
}

impl LayerFade {
    /// Fully shown
    pub fn shown() -> Self {
        Self {
            visible: true,
            opacity: 1.0,
        }
    }

    /// Fully hidden
    pub fn hidden() -> Self {
        Self {
            visible: false,
            opacity: 0.0,
        }
    }

    /// Set the target. The opacity follows over [`FADE_DURATION`].
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Target visibility
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Current opacity in `[0, 1]`
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Whether the opacity has reached its target
    pub fn is_settled(&self) -> bool {
        let target = if self.visible { 1.0 } else { 0.0 };
        (self.opacity - target).abs() <= f32::EPSILON
    }

    /// Advance the fade
    pub fn update(&mut self, delta: Duration) {
        let step = delta.as_secs_f32() / FADE_DURATION.as_secs_f32();
        self.opacity = if self.visible {
            (self.opacity + step).min(1.0)
        } else {
            (self.opacity - step).max(0.0)
        };
    }
}

/// A notification to display
#[derive(Clone, Debug)]
pub struct DisplayNotification {
    /// Notification level
    pub level: NotifyLevel,
    /// Message content
    pub message: String,
    /// Time left on screen
    pub remaining: Duration,
}

/// The full display state for the TUI
#[derive(Debug)]
pub struct DisplayState {
    /// Mirrored scrollback
    pub lines: Vec<ScrollbackLine>,
    /// Scene state
    pub scene_state: SceneState,
    /// Loading progress
    pub progress: u8,
    /// Whether the reveal has happened
    pub complete: bool,
    /// Pending notification (if any)
    pub notification: Option<DisplayNotification>,
    /// Bumped whenever the scrollback changes
    pub scrollback_revision: u64,
    /// Layer fades
    layers: HashMap<SceneLayer, LayerFade>,
}

impl Default for DisplayState {
    fn default() -> Self {
        let layers = SceneLayer::ALL
            .into_iter()
            .map(|layer| {
                let fade = if layer.initially_visible() {
                    LayerFade::shown()
                } else {
                    LayerFade::hidden()
                };
                (layer, fade)
            })
            .collect();

        Self {
            lines: Vec::new(),
            scene_state: SceneState::Interactive,
            progress: 0,
            complete: false,
            notification: None,
            scrollback_revision: 0,
            layers,
        }
    }
}

impl DisplayState {
    /// Create a new display state
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a ConductorMessage to update display state
    pub fn apply_message(&mut self, msg: ConductorMessage) {
        match msg {
            // Scrollback
            ConductorMessage::ScrollbackAppended { lines } => {
                self.lines.extend(lines);
                self.scrollback_revision += 1;
            }
            ConductorMessage::ScrollbackCleared => {
                self.lines.clear();
                self.scrollback_revision += 1;
            }

            // Scene
            ConductorMessage::StateChanged { state } => {
                self.scene_state = state;
            }
            ConductorMessage::Progress { percent } => {
                self.progress = percent.min(100);
            }
            ConductorMessage::LayerVisibility { layer, visible } => {
                self.layers
                    .entry(layer)
                    .or_insert_with(LayerFade::hidden)
                    .set_visible(visible);
            }
            ConductorMessage::SequenceComplete => {
                self.complete = true;
            }

            // Diagnostics
            ConductorMessage::Notify { level, message } => {
                self.notification = Some(DisplayNotification {
                    level,
                    message,
                    remaining: NOTIFICATION_TTL,
                });
            }
        }
    }

    /// Update fades and timers
    pub fn update(&mut self, delta: Duration) {
        for fade in self.layers.values_mut() {
            fade.update(delta);
        }

        if let Some(notification) = &mut self.notification {
            notification.remaining = notification.remaining.saturating_sub(delta);
            if notification.remaining.is_zero() {
                self.notification = None;
            }
        }
    }

    /// Current opacity of a layer
    pub fn layer_opacity(&self, layer: SceneLayer) -> f32 {
        self.layers.get(&layer).map_or(0.0, LayerFade::opacity)
    }

    /// Target visibility of a layer
    pub fn layer_visible(&self, layer: SceneLayer) -> bool {
        self.layers.get(&layer).is_some_and(LayerFade::is_visible)
    }

    /// Whether every fade has finished
    pub fn fades_settled(&self) -> bool {
        self.layers.values().all(LayerFade::is_settled)
    }

    /// Whether typing goes to the input line
    pub fn accepts_input(&self) -> bool {
        self.scene_state.accepts_input()
    }

    /// Whether the loading bar replaces the input line
    pub fn is_loading(&self) -> bool {
        !self.scene_state.accepts_input()
    }

    /// Clear the notification
    pub fn clear_notification(&mut self) {
        self.notification = None;
    }
}
