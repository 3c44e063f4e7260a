//! Integration Test: Headless Core
//!
//! **Policy**: `conductor/core` has no terminal or rendering dependencies.
//! Surfaces depend on the core, never the other way round.

use std::fs;

use architectural_enforcement::{find_in_production, workspace_root};

const UI_CRATES: &[&str] = &["ratatui", "crossterm"];

#[test]
fn test_core_manifest_has_no_ui_crates() {
    let manifest = fs::read_to_string(workspace_root().join("conductor/core/Cargo.toml"))
        .expect("core manifest should exist");

    for krate in UI_CRATES {
        let declared = manifest
            .lines()
            .map(str::trim)
            .any(|line| line.starts_with(&format!("{krate} ")) || line.starts_with(&format!("{krate}=")));
        assert!(!declared, "conductor core must not depend on {krate}");
    }
}

#[test]
fn test_core_sources_do_not_import_ui_crates() {
    let patterns: Vec<String> = UI_CRATES.iter().map(|k| format!("{k}::")).collect();
    let patterns: Vec<&str> = patterns.iter().map(String::as_str).collect();

    let violations = find_in_production("conductor/core/src", &patterns);
    assert!(violations.is_empty(), "UI imports in core: {violations:?}");
}

#[test]
fn test_core_does_not_depend_on_tui() {
    let manifest = fs::read_to_string(workspace_root().join("conductor/core/Cargo.toml"))
        .expect("core manifest should exist");
    assert!(!manifest.contains("mosaic-tui"));
}
