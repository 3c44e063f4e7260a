//! MOSAIC TUI - Terminal surface for the MOSAIC launch terminal
//!
//! This crate renders the launch scene full-screen: a glitching letter
//! field and a hyperspeed road behind a retro command terminal, fading to
//! the final reveal once the launch command runs.
//!
//! # Architecture
//!
//! - **ConductorClient**: Embeds the headless Conductor and drains its messages
//! - **DisplayState**: Mirror of the scene built from ConductorMessages
//! - **Compositor**: Layered rendering with z-ordering and per-layer opacity
//! - **Effects**: Animated backgrounds and the reveal card
//! - **Widgets**: The terminal window and its scrollback view
//! - **Headless**: Scripted runs that print messages as JSON lines

pub mod app;
pub mod cli;
pub mod compositor;
pub mod conductor_client;
pub mod display;
pub mod effects;
pub mod headless;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use conductor_client::ConductorClient;
pub use display::DisplayState;
