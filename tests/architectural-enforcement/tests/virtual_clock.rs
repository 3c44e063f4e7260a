//! Integration Test: Virtual Clock
//!
//! **Policy**: The conductor core never sleeps and never reads wall time.
//! Every timer advances only through `advance(delta)`, so surfaces decide
//! how fast the scene runs and tests replay whole launches instantly.
//!
//! **Exceptions**: test code. The TUI frame loop uses `tokio::time::interval`.

use architectural_enforcement::find_in_production;

const SLEEP_CALLS: &[&str] = &["::sleep(", ".sleep(", "sleep_until("];
const WALL_CLOCK: &[&str] = &["Instant::now", "SystemTime::now", "tokio::time::"];

#[test]
fn test_no_sleep_in_conductor_core() {
    let violations = find_in_production("conductor/core/src", SLEEP_CALLS);
    if !violations.is_empty() {
        for violation in &violations {
            eprintln!("  {violation}");
        }
        panic!(
            "Found {} sleep call(s) in the conductor core. Advance timers with advance(delta).",
            violations.len()
        );
    }
}

#[test]
fn test_no_wall_clock_in_conductor_core() {
    let violations = find_in_production("conductor/core/src", WALL_CLOCK);
    if !violations.is_empty() {
        for violation in &violations {
            eprintln!("  {violation}");
        }
        panic!(
            "Found {} wall-clock read(s) in the conductor core. Time only enters through advance(delta).",
            violations.len()
        );
    }
}

#[test]
fn test_tui_paces_frames_with_interval() {
    let violations = find_in_production("tui/src", SLEEP_CALLS);
    assert!(
        violations.is_empty(),
        "TUI should pace frames with tokio::time::interval, found: {violations:?}"
    );
}
