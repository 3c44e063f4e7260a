//! Scene Effects
//!
//! Animated backgrounds drawn into compositor layers, plus the reveal card
//! shown once the cascade finishes.
//!
//! Effects run on wall-clock deltas from the render loop. They never talk
//! to the Conductor; the display state decides how visible each one is.

pub mod glitch;
pub mod hyperspeed;
pub mod reveal;

use std::time::Duration;

use ratatui::buffer::Buffer;

pub use glitch::GlitchField;
pub use hyperspeed::Hyperspeed;
pub use reveal::RevealCard;

/// A full-screen animated background
pub trait BackgroundEffect {
    /// Match the layer size; called before rendering when the terminal resizes
    fn resize(&mut self, width: u16, height: u16);

    /// Advance the animation
    fn update(&mut self, delta: Duration);

    /// Draw into a layer buffer, which has been reset beforehand
    fn render(&self, buf: &mut Buffer);
}
