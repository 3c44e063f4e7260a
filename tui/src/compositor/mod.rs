//! Layered Compositor
//!
//! Manages z-ordered layers for rendering. Each layer has its own buffer
//! and opacity, and can be positioned and resized independently.
//!
//! The compositor composites all visible layers into a final output buffer,
//! dimming each layer's colors by its opacity so layers can fade in and out.

mod layer;

use std::collections::HashMap;

use ratatui::buffer::{Buffer, Cell};
use ratatui::layout::Rect;
use ratatui::style::Color;

pub use layer::Layer;

use crate::theme::fade;

/// Unique identifier for a layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerId(u32);

/// The compositor manages all layers and composites them together
pub struct Compositor {
    /// All layers by ID
    layers: HashMap<LayerId, Layer>,
    /// Layers sorted by z-index for rendering
    render_order: Vec<LayerId>,
    /// Next layer ID to assign
    next_id: u32,
    /// Output buffer (composited result)
    output: Buffer,
    /// Total area
    area: Rect,
}

impl Compositor {
    /// Create a new compositor for the given area
    pub fn new(area: Rect) -> Self {
        Self {
            layers: HashMap::new(),
            render_order: Vec::new(),
            next_id: 0,
            output: Buffer::empty(area),
            area,
        }
    }

    /// Create a new layer and return its ID
    pub fn create_layer(&mut self, bounds: Rect, z_index: i32) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;

        let layer = Layer::new(id, bounds, z_index);
        self.layers.insert(id, layer);
        self.update_render_order();

        id
    }

    /// Get mutable access to a layer's buffer for rendering
    pub fn layer_buffer_mut(&mut self, id: LayerId) -> Option<&mut Buffer> {
        self.layers.get_mut(&id).map(|l| &mut l.buffer)
    }

    /// Current opacity of a layer
    pub fn opacity(&self, id: LayerId) -> Option<f32> {
        self.layers.get(&id).map(|l| l.opacity)
    }

    /// Set a layer's opacity, clamped to `[0, 1]`
    pub fn set_opacity(&mut self, id: LayerId, opacity: f32) {
        if let Some(layer) = self.layers.get_mut(&id) {
            layer.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    /// Move and resize a layer
    pub fn place_layer(&mut self, id: LayerId, bounds: Rect) {
        if let Some(layer) = self.layers.get_mut(&id) {
            if layer.bounds.width != bounds.width || layer.bounds.height != bounds.height {
                // Buffer uses origin coordinates
                layer.buffer = Buffer::empty(Rect::new(0, 0, bounds.width, bounds.height));
            }
            layer.bounds = bounds;
        }
    }

    /// Resize the entire compositor
    pub fn resize(&mut self, area: Rect) {
        self.area = area;
        self.output = Buffer::empty(area);
    }

    /// Composite all visible layers into the output buffer
    pub fn composite(&mut self) -> &Buffer {
        // Clear output
        self.output.reset();

        // Render layers in z-order (back to front)
        for id in &self.render_order {
            if let Some(layer) = self.layers.get(id) {
                if layer.is_visible() {
                    Self::blit_layer(&mut self.output, &self.area, layer);
                }
            }
        }

        &self.output
    }

    /// Blit a layer onto the output buffer
    ///
    /// A cell occludes what is below it when it has a glyph or an explicit
    /// background; blank cells with no background are holes.
    fn blit_layer(output: &mut Buffer, area: &Rect, layer: &Layer) {
        let lb = &layer.bounds;

        for ly in 0..lb.height {
            for lx in 0..lb.width {
                let dst_x = lb.x.saturating_add(lx);
                let dst_y = lb.y.saturating_add(ly);

                // Bounds check
                if dst_x >= area.width || dst_y >= area.height {
                    continue;
                }

                let Some(src_cell) = layer.buffer.cell((lx, ly)) else {
                    continue;
                };
                if src_cell.symbol() == " " && src_cell.bg == Color::Reset {
                    continue;
                }

                if let Some(dst) = output.cell_mut((dst_x, dst_y)) {
                    *dst = Self::dimmed(src_cell, layer.opacity);
                }
            }
        }
    }

    fn dimmed(cell: &Cell, opacity: f32) -> Cell {
        let mut out = cell.clone();
        if opacity < 1.0 {
            out.fg = fade(cell.fg, opacity);
            out.bg = fade(cell.bg, opacity);
        }
        out
    }

    /// Update render order based on z-indices
    fn update_render_order(&mut self) {
        self.render_order = self.layers.keys().copied().collect();
        self.render_order
            .sort_by_key(|id| self.layers.get(id).map_or(0, |l| l.z_index));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Style;

    fn area() -> Rect {
        Rect::new(0, 0, 10, 3)
    }

    #[test]
    fn test_higher_z_wins() {
        let mut compositor = Compositor::new(area());
        let front = compositor.create_layer(area(), 10);
        let back = compositor.create_layer(area(), 0);

        let red = Style::default().fg(Color::Rgb(255, 0, 0));
        compositor
            .layer_buffer_mut(back)
            .unwrap()
            .set_string(0, 0, "back", red);
        compositor
            .layer_buffer_mut(front)
            .unwrap()
            .set_string(0, 0, "fr", red);

        let out = compositor.composite();
        assert_eq!(out[(0, 0)].symbol(), "f");
        assert_eq!(out[(1, 0)].symbol(), "r");
        // Holes in the front layer show the back layer.
        assert_eq!(out[(2, 0)].symbol(), "c");
    }

    #[test]
    fn test_background_occludes() {
        let mut compositor = Compositor::new(area());
        let back = compositor.create_layer(area(), 0);
        let front = compositor.create_layer(Rect::new(0, 0, 2, 1), 10);

        compositor
            .layer_buffer_mut(back)
            .unwrap()
            .set_string(0, 0, "xx", Style::default());
        compositor
            .layer_buffer_mut(front)
            .unwrap()
            .set_style(Rect::new(0, 0, 2, 1), Style::default().bg(Color::Rgb(8, 8, 8)));

        let out = compositor.composite();
        assert_eq!(out[(0, 0)].symbol(), " ");
        assert_eq!(out[(0, 0)].bg, Color::Rgb(8, 8, 8));
    }

    #[test]
    fn test_opacity_dims_and_hides() {
        let mut compositor = Compositor::new(area());
        let layer = compositor.create_layer(area(), 0);
        compositor.layer_buffer_mut(layer).unwrap().set_string(
            0,
            0,
            "x",
            Style::default().fg(Color::Rgb(200, 200, 200)),
        );

        compositor.set_opacity(layer, 0.5);
        assert_eq!(compositor.composite()[(0, 0)].fg, Color::Rgb(100, 100, 100));

        compositor.set_opacity(layer, 0.0);
        assert_eq!(compositor.composite()[(0, 0)].symbol(), " ");
        assert_eq!(compositor.opacity(layer), Some(0.0));
    }

    #[test]
    fn test_place_layer_offsets_blit() {
        let mut compositor = Compositor::new(area());
        let layer = compositor.create_layer(Rect::new(0, 0, 3, 1), 0);
        compositor.place_layer(layer, Rect::new(5, 2, 3, 1));
        compositor
            .layer_buffer_mut(layer)
            .unwrap()
            .set_string(0, 0, "abc", Style::default());

        let out = compositor.composite();
        assert_eq!(out[(5, 2)].symbol(), "a");
        assert_eq!(out[(7, 2)].symbol(), "c");
    }
}
