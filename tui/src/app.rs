//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, resize, frame tick)
//! - ConductorClient for orchestration
//! - DisplayState for rendering
//!
//! Each frame the App:
//! 1. Advances the Conductor's clock by the wall time since the last frame
//! 2. Applies the resulting ConductorMessages to DisplayState
//! 3. Steps fades and background effects
//! 4. Renders every scene layer and composites them

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::{StatefulWidget, Widget};
use ratatui::Terminal;

use mosaic_conductor::{LaunchConfig, SceneLayer, SceneState, SurfaceEvent};

use crate::compositor::{Compositor, LayerId};
use crate::conductor_client::ConductorClient;
use crate::display::DisplayState;
use crate::effects::{BackgroundEffect, GlitchField, Hyperspeed, RevealCard};
use crate::widgets::{PromptRow, ScrollbackState, TerminalWindow};

/// Target frame interval (~60 fps)
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Largest terminal window
const WINDOW_MAX: (u16, u16) = (90, 26);

/// Hyperspeed never draws brighter than this
const HYPERSPEED_BASE_OPACITY: f32 = 0.5;

/// Rows moved per PageUp / PageDown
const PAGE_ROWS: i32 = 10;

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// Message to print after the terminal is restored
    goodbye_message: Option<String>,

    // === Conductor Integration ===
    /// Client for communicating with the embedded Conductor
    conductor: ConductorClient,
    /// Display state derived from ConductorMessages
    display: DisplayState,

    // === Scene ===
    /// The layered compositor
    compositor: Compositor,
    /// Layer assignments
    layers: SceneLayers,
    glitch: GlitchField,
    hyperspeed: Hyperspeed,

    // === Input State ===
    /// User input buffer
    input_buffer: String,
    /// Scrollback position
    scrollback: ScrollbackState,

    // === Misc State ===
    /// Last frame time
    last_frame: Instant,
    /// Terminal size
    size: (u16, u16),
}

/// Compositor layer for each scene layer
struct SceneLayers {
    glitch: LayerId,
    hyperspeed: LayerId,
    terminal: LayerId,
    final_content: LayerId,
}

impl SceneLayers {
    fn id(&self, layer: SceneLayer) -> LayerId {
        match layer {
            SceneLayer::GlitchBackground => self.glitch,
            SceneLayer::Hyperspeed => self.hyperspeed,
            SceneLayer::Terminal => self.terminal,
            SceneLayer::FinalContent => self.final_content,
        }
    }
}

/// Centred terminal window bounds for a screen area
fn window_bounds(area: Rect) -> Rect {
    let width = area.width.saturating_sub(4).min(WINDOW_MAX.0);
    let height = area.height.saturating_sub(2).min(WINDOW_MAX.1);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

impl App {
    /// Create an App sized to the current terminal
    pub fn new(config: &LaunchConfig) -> anyhow::Result<Self> {
        let (width, height) = crossterm::terminal::size()?;
        Ok(Self::with_size(config, width, height))
    }

    /// Create an App for a given screen size
    pub fn with_size(config: &LaunchConfig, width: u16, height: u16) -> Self {
        let area = Rect::new(0, 0, width, height);
        let mut compositor = Compositor::new(area);

        // Create layers with z-ordering
        let layers = SceneLayers {
            glitch: compositor.create_layer(area, 0),
            hyperspeed: compositor.create_layer(area, 10),
            terminal: compositor.create_layer(window_bounds(area), 20),
            final_content: compositor.create_layer(area, 50),
        };

        let mut conductor = ConductorClient::new(config);
        conductor.on_sequence_complete(|| tracing::info!("final content revealed"));

        let mut app = Self {
            running: true,
            goodbye_message: None,
            conductor,
            display: DisplayState::new(),
            compositor,
            layers,
            glitch: GlitchField::new(width, height),
            hyperspeed: Hyperspeed::new(width, height),
            input_buffer: String::new(),
            scrollback: ScrollbackState::default(),
            last_frame: Instant::now(),
            size: (width, height),
        };
        app.process_conductor_messages();
        app.sync_layer_opacity();
        app
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();
        let mut frames = tokio::time::interval(FRAME_INTERVAL);
        frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // Render initial frame immediately so user sees UI
        self.render(terminal)?;
        self.last_frame = Instant::now();

        while self.running {
            tokio::select! {
                biased;

                // Check for terminal events - highest priority
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_terminal_event(event),
                        Some(Err(e)) => {
                            tracing::warn!(error = %e, "terminal event error");
                        }
                        None => self.quit(),
                    }
                }

                // Frame tick - advance and render
                _ = frames.tick() => {
                    let now = Instant::now();
                    let delta = now - self.last_frame;
                    self.last_frame = now;
                    self.tick(delta);
                    self.render(terminal)?;
                }
            }
        }

        Ok(())
    }

    /// Advance the scene by one frame of wall time
    pub fn tick(&mut self, delta: Duration) {
        self.conductor.advance(delta);
        self.process_conductor_messages();
        self.display.update(delta);

        if self.display.layer_opacity(SceneLayer::GlitchBackground) > 0.0 {
            self.glitch.update(delta);
        }
        if self.display.layer_opacity(SceneLayer::Hyperspeed) > 0.0 {
            self.hyperspeed.update(delta);
        }
        self.sync_layer_opacity();
    }

    /// Process all pending messages from the Conductor
    fn process_conductor_messages(&mut self) {
        let mut scrollback_changed = false;
        for msg in self.conductor.recv_all() {
            let revision = self.display.scrollback_revision;
            self.display.apply_message(msg);
            scrollback_changed |= revision != self.display.scrollback_revision;
        }
        if scrollback_changed {
            self.scrollback.scroll_to_bottom();
        }
    }

    fn sync_layer_opacity(&mut self) {
        for layer in SceneLayer::ALL {
            let mut opacity = self.display.layer_opacity(layer);
            if layer == SceneLayer::Hyperspeed {
                opacity *= HYPERSPEED_BASE_OPACITY;
            }
            self.compositor.set_opacity(self.layers.id(layer), opacity);
        }
    }

    fn handle_terminal_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Resize(w, h) => self.handle_resize(w, h),
            _ => {}
        }
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            // Quit
            KeyCode::Esc => self.quit(),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit(),

            // Submit command
            KeyCode::Enter if self.display.accepts_input() => {
                let line = std::mem::take(&mut self.input_buffer);
                if let Err(e) = self.conductor.submit(&line) {
                    tracing::debug!(error = %e, "submit rejected");
                }
                self.process_conductor_messages();
            }

            // Typing
            KeyCode::Char(c) if self.display.accepts_input() => {
                self.input_buffer.push(c);
            }
            KeyCode::Backspace if self.display.accepts_input() => {
                self.input_buffer.pop();
            }

            // Scrollback
            KeyCode::PageUp => self.scrollback.scroll(-PAGE_ROWS),
            KeyCode::PageDown => self.scrollback.scroll(PAGE_ROWS),
            KeyCode::End if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.scrollback.scroll_to_bottom();
            }

            _ => {}
        }
    }

    /// Handle terminal resize
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        let area = Rect::new(0, 0, width, height);

        self.compositor.resize(area);
        self.compositor.place_layer(self.layers.glitch, area);
        self.compositor.place_layer(self.layers.hyperspeed, area);
        self.compositor
            .place_layer(self.layers.terminal, window_bounds(area));
        self.compositor.place_layer(self.layers.final_content, area);

        self.glitch.resize(width, height);
        self.hyperspeed.resize(width, height);
        tracing::debug!(width, height, "resized");
    }

    /// Stop timers and leave the loop
    fn quit(&mut self) {
        if let Err(e) = self.conductor.send_event(SurfaceEvent::Disconnected) {
            tracing::debug!(error = %e, "disconnect");
        }
        self.goodbye_message = Some(
            match self.conductor.state() {
                SceneState::Revealed => "Welcome to MOSAIC 2025.",
                SceneState::Interactive => "Session closed.",
                SceneState::SequenceRunning | SceneState::BackgroundFading => {
                    "Launch interrupted."
                }
            }
            .to_string(),
        );
        self.running = false;
    }

    /// Render every layer and composite them
    pub fn compose(&mut self) -> &Buffer {
        if self.display.layer_opacity(SceneLayer::GlitchBackground) > 0.0 {
            if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.glitch) {
                buf.reset();
                self.glitch.render(buf);
            }
        }

        if self.display.layer_opacity(SceneLayer::Hyperspeed) > 0.0 {
            if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.hyperspeed) {
                buf.reset();
                self.hyperspeed.render(buf);
            }
        }

        if self.display.layer_opacity(SceneLayer::Terminal) > 0.0 {
            if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.terminal) {
                buf.reset();
                let prompt = if self.display.is_loading() {
                    PromptRow::Loading(self.display.progress)
                } else {
                    PromptRow::Input(&self.input_buffer)
                };
                let area = buf.area;
                TerminalWindow::new(&self.display.lines, prompt)
                    .notification(self.display.notification.as_ref())
                    .render(area, buf, &mut self.scrollback);
            }
        }

        if self.display.layer_opacity(SceneLayer::FinalContent) > 0.0 {
            if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.final_content) {
                buf.reset();
                let area = buf.area;
                RevealCard.render(area, buf);
            }
        }

        self.compositor.composite()
    }

    /// Render the UI
    fn render(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let output = self.compose();

        terminal.draw(|frame| {
            let area = frame.area();
            let buf = frame.buffer_mut();

            for y in 0..area.height.min(output.area.height) {
                for x in 0..area.width.min(output.area.width) {
                    if let Some(cell) = output.cell((x, y)) {
                        buf[(x, y)] = cell.clone();
                    }
                }
            }
        })?;

        Ok(())
    }

    /// Current input buffer
    pub fn input(&self) -> &str {
        &self.input_buffer
    }

    /// Display state
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Whether the loop is still running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Get the goodbye message for display after TUI closes
    pub fn goodbye(&self) -> Option<&str> {
        self.goodbye_message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::FADE_DURATION;
    use pretty_assertions::assert_eq;

    fn fast_config() -> LaunchConfig {
        let mut config = LaunchConfig::default();
        mosaic_conductor::ConfigOverrides::new()
            .with_step_size(50)
            .with_tick_interval(Duration::from_millis(10))
            .with_post_completion_delay(Duration::ZERO)
            .with_cascade_delays(Duration::from_millis(10), Duration::from_millis(10))
            .apply(&mut config)
            .unwrap();
        config
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_line(app: &mut App, line: &str) {
        for c in line.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));
    }

    fn screen_text(buf: &Buffer) -> String {
        let area = buf.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_window_bounds_centred() {
        let bounds = window_bounds(Rect::new(0, 0, 120, 40));
        assert_eq!(bounds, Rect::new(15, 7, 90, 26));

        let small = window_bounds(Rect::new(0, 0, 40, 10));
        assert_eq!(small, Rect::new(2, 1, 36, 8));
    }

    #[test]
    fn test_banner_on_first_frame() {
        let mut app = App::with_size(&fast_config(), 120, 40);
        let text = screen_text(app.compose());
        assert!(text.contains("MOSAIC://TERMINAL/2025"));
        assert!(text.contains("Instructions> ▊"));
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut app = App::with_size(&fast_config(), 120, 40);
        app.handle_key(key(KeyCode::Char('h')));
        app.handle_key(key(KeyCode::Char('x')));
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.input(), "h");

        type_line(&mut app, "elp");
        assert_eq!(app.input(), "");
        assert!(app
            .display()
            .lines
            .iter()
            .any(|l| l.text() == "Instructions> help"));
    }

    #[test]
    fn test_launch_runs_to_reveal() {
        let mut app = App::with_size(&fast_config(), 120, 40);
        type_line(&mut app, "start: mosaic-2025");
        assert!(app.display().is_loading());

        // Typing is ignored while loading.
        app.handle_key(key(KeyCode::Char('x')));
        assert_eq!(app.input(), "");

        for _ in 0..10 {
            app.tick(FRAME_INTERVAL);
        }
        assert_eq!(app.display().scene_state, SceneState::Revealed);

        app.tick(FADE_DURATION);
        let text = screen_text(app.compose());
        assert!(text.contains("INAUGURATION 2025"));
        assert!(!text.contains("MOSAIC://TERMINAL/2025"));
    }

    #[test]
    fn test_escape_quits_with_goodbye() {
        let mut app = App::with_size(&fast_config(), 80, 24);
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.is_running());
        assert_eq!(app.goodbye(), Some("Session closed."));
    }

    #[test]
    fn test_resize_moves_window() {
        let mut app = App::with_size(&fast_config(), 80, 24);
        app.handle_resize(140, 50);
        let text = screen_text(app.compose());
        assert_eq!(app.compose().area, Rect::new(0, 0, 140, 50));
        assert!(text.contains("MOSAIC://TERMINAL/2025"));
    }
}
