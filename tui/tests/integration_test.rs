//! Integration Tests for TUI + Conductor
//!
//! These tests drive the embedded Conductor through the same client and
//! display state the terminal app uses, and run headless scripts end to end.
//!
//! # Test Coverage
//!
//! 1. **Startup Flow**: Banner arrives before any input
//! 2. **Command Exchange**: Commands echo and answer in the mirrored scrollback
//! 3. **Launch Flow**: Loading, cascade fades, reveal callback
//! 4. **Headless**: A script replays to JSON lines on a virtual clock

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use mosaic_conductor::{
    ConductorMessage, ConfigOverrides, LaunchConfig, NotifyLevel, SceneLayer, SceneState, BANNER,
};
use mosaic_tui::display::FADE_DURATION;
use mosaic_tui::headless::run_script;
use mosaic_tui::{ConductorClient, DisplayState};

// ============================================================================
// Helpers
// ============================================================================

fn fast_config() -> LaunchConfig {
    let mut config = LaunchConfig::default();
    ConfigOverrides::new()
        .with_step_size(20)
        .with_tick_interval(Duration::from_millis(10))
        .with_post_completion_delay(Duration::from_millis(50))
        .with_cascade_delays(Duration::from_millis(100), Duration::from_millis(200))
        .apply(&mut config)
        .unwrap();
    config
}

fn pump(client: &mut ConductorClient, display: &mut DisplayState) {
    for msg in client.recv_all() {
        display.apply_message(msg);
    }
}

fn run_frames(client: &mut ConductorClient, display: &mut DisplayState, frames: u32) {
    let frame = Duration::from_millis(16);
    for _ in 0..frames {
        client.advance(frame);
        pump(client, display);
        display.update(frame);
    }
}

fn texts(display: &DisplayState) -> Vec<String> {
    display.lines.iter().map(|l| l.text().to_string()).collect()
}

// ============================================================================
// Startup and Commands
// ============================================================================

#[test]
fn test_startup_shows_banner() {
    let mut client = ConductorClient::new(&fast_config());
    let mut display = DisplayState::new();
    pump(&mut client, &mut display);

    assert_eq!(texts(&display), BANNER.map(String::from).to_vec());
    assert!(display.accepts_input());
}

#[test]
fn test_commands_mirror_into_display() {
    let mut client = ConductorClient::new(&fast_config());
    let mut display = DisplayState::new();
    pump(&mut client, &mut display);

    client.submit("status").unwrap();
    client.submit("xyz").unwrap();
    pump(&mut client, &mut display);

    let lines = texts(&display);
    assert!(lines.contains(&"Instructions> status".to_string()));
    assert!(lines.contains(&"Instructions> xyz".to_string()));

    client.submit("clear").unwrap();
    pump(&mut client, &mut display);
    assert!(display.lines.is_empty());
}

// ============================================================================
// Launch Flow
// ============================================================================

#[test]
fn test_launch_fades_to_final_content() {
    let mut client = ConductorClient::new(&fast_config());
    let revealed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&revealed);
    client.on_sequence_complete(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let mut display = DisplayState::new();
    pump(&mut client, &mut display);

    client.submit("start: mosaic-2025").unwrap();
    pump(&mut client, &mut display);
    assert!(display.is_loading());
    assert_eq!(display.progress, 0);

    // 5 ticks at 10ms plus the 50ms settle: well inside 10 frames.
    run_frames(&mut client, &mut display, 10);
    assert_eq!(display.progress, 100);
    assert_eq!(display.scene_state, SceneState::BackgroundFading);
    assert!(!display.layer_visible(SceneLayer::Terminal));
    assert!(!display.layer_visible(SceneLayer::GlitchBackground));
    assert!(display.layer_visible(SceneLayer::Hyperspeed));

    run_frames(&mut client, &mut display, 25);
    assert_eq!(display.scene_state, SceneState::Revealed);
    assert!(display.complete);
    assert!(display.layer_visible(SceneLayer::FinalContent));
    assert_eq!(revealed.load(Ordering::SeqCst), 1);

    display.update(FADE_DURATION);
    assert!(display.fades_settled());
    assert_eq!(display.layer_opacity(SceneLayer::FinalContent), 1.0);
    assert_eq!(display.layer_opacity(SceneLayer::Terminal), 0.0);
}

#[test]
fn test_input_during_launch_notifies() {
    let mut client = ConductorClient::new(&fast_config());
    let mut display = DisplayState::new();
    client.submit("start: mosaic-2025").unwrap();
    pump(&mut client, &mut display);
    let before = display.lines.len();

    assert!(client.submit("help").is_err());
    pump(&mut client, &mut display);

    assert_eq!(display.lines.len(), before);
    let notification = display.notification.as_ref().unwrap();
    assert_eq!(notification.level, NotifyLevel::Warning);
}

#[test]
fn test_teardown_mid_cascade_stops_reveal() {
    let mut client = ConductorClient::new(&fast_config());
    let revealed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&revealed);
    client.on_sequence_complete(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let mut display = DisplayState::new();

    client.trigger().unwrap();
    run_frames(&mut client, &mut display, 10);
    assert_eq!(display.scene_state, SceneState::BackgroundFading);

    client.teardown();
    run_frames(&mut client, &mut display, 100);
    assert_eq!(display.scene_state, SceneState::BackgroundFading);
    assert!(!display.complete);
    assert_eq!(revealed.load(Ordering::SeqCst), 0);
}

// ============================================================================
// Headless
// ============================================================================

#[tokio::test]
async fn test_headless_script_end_to_end() {
    let script = b"help\n\nstart:mosaic-2025\n";
    let mut out = Vec::new();
    let report = run_script(&fast_config(), &script[..], &mut out).await.unwrap();

    assert_eq!(report.lines_read, 3);
    assert_eq!(report.final_state, SceneState::Revealed);

    let messages: Vec<ConductorMessage> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    let layer_order: Vec<(SceneLayer, bool)> = messages
        .iter()
        .filter_map(|m| match m {
            ConductorMessage::LayerVisibility { layer, visible } => Some((*layer, *visible)),
            _ => None,
        })
        .collect();
    assert_eq!(
        layer_order,
        vec![
            (SceneLayer::Terminal, false),
            (SceneLayer::GlitchBackground, false),
            (SceneLayer::Hyperspeed, false),
            (SceneLayer::FinalContent, true),
        ]
    );
    assert_eq!(messages.last(), Some(&ConductorMessage::SequenceComplete));
}
