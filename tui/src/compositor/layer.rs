//! Layer - A single compositable layer

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use super::LayerId;

/// A single layer in the compositor
pub struct Layer {
    /// Unique identifier
    pub id: LayerId,
    /// Z-order (higher = in front)
    pub z_index: i32,
    /// Position and size
    pub bounds: Rect,
    /// The layer's render buffer
    pub buffer: Buffer,
    /// 0.0 = invisible, 1.0 = solid
    pub opacity: f32,
}

impl Layer {
    /// Create a new, fully opaque layer
    pub fn new(id: LayerId, bounds: Rect, z_index: i32) -> Self {
        // Buffer uses origin coordinates (0,0) internally
        // The bounds store the screen position for compositing
        let buffer_area = Rect::new(0, 0, bounds.width, bounds.height);
        Self {
            id,
            z_index,
            bounds,
            buffer: Buffer::empty(buffer_area),
            opacity: 1.0,
        }
    }

    /// Whether compositing would draw anything from this layer
    pub fn is_visible(&self) -> bool {
        self.opacity > f32::EPSILON
    }
}
