//! Pointer-driven offset of the decorative contact orbs.

use std::sync::Arc;

use shared::domain::LayerId;

use crate::view::ParallaxLayer;

/// Movement added per depth step, in pixels.
pub const DEFAULT_INTENSITY_STEP: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerOffset {
    pub layer: LayerId,
    pub x: f32,
    pub y: f32,
}

/// Stateless between events: every pointer move recomputes all offsets.
pub struct PointerParallax {
    layers: Vec<Arc<dyn ParallaxLayer>>,
    intensity_step: f32,
}

impl PointerParallax {
    pub fn new(layers: Vec<Arc<dyn ParallaxLayer>>) -> Self {
        Self {
            layers,
            intensity_step: DEFAULT_INTENSITY_STEP,
        }
    }

    pub fn with_intensity_step(mut self, step: f32) -> Self {
        self.intensity_step = step;
        self
    }

    pub fn on_pointer_move(&self, bounds: Rect, client_x: f32, client_y: f32) -> Vec<LayerOffset> {
        self.layers
            .iter()
            .enumerate()
            .map(|(depth, layer)| {
                let factor = (depth + 1) as f32 * self.intensity_step;
                let (x, y) = offset_for(bounds, client_x, client_y, factor);
                layer.set_offset(x, y);
                LayerOffset {
                    layer: layer.layer_id(),
                    x,
                    y,
                }
            })
            .collect()
    }

    pub fn on_pointer_leave(&self) {
        for layer in &self.layers {
            layer.set_offset(0.0, 0.0);
        }
    }
}

/// Offset in `[-factor, factor]` on each axis, zero at the container center.
pub fn offset_for(bounds: Rect, client_x: f32, client_y: f32, factor: f32) -> (f32, f32) {
    let center_x = bounds.width / 2.0;
    let center_y = bounds.height / 2.0;
    if center_x <= 0.0 || center_y <= 0.0 {
        return (0.0, 0.0);
    }
    let x = client_x - bounds.left;
    let y = client_y - bounds.top;
    (
        (x - center_x) / center_x * factor,
        (y - center_y) / center_y * factor,
    )
}

#[cfg(test)]
#[path = "tests/parallax_tests.rs"]
mod tests;
