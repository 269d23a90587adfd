//! Screen ↔ canvas coordinate mapping.
//!
//! The host reports pointer positions in screen pixels; the scene and all
//! snap comparisons live in canvas space. The mapping is a uniform scale
//! plus an offset: `screen = canvas * scale + offset`.

use serde::{Deserialize, Serialize};

/// A point in the host's on-screen pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

/// A point in zoom/pan-independent canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasPoint {
    pub x: f32,
    pub y: f32,
}

/// Width and height in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl CanvasPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Pan/zoom state of the canvas view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasTransform {
    pub offset_x: f32,
    pub offset_y: f32,
    pub scale: f32,
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
        }
    }
}

impl CanvasTransform {
    pub fn new(offset_x: f32, offset_y: f32, scale: f32) -> Self {
        Self {
            offset_x,
            offset_y,
            scale,
        }
    }

    /// A transform is usable only with a finite, strictly positive scale.
    pub fn is_valid(&self) -> bool {
        self.scale.is_finite()
            && self.scale > 0.0
            && self.offset_x.is_finite()
            && self.offset_y.is_finite()
    }

    /// Map a screen point into canvas space. `None` for a degenerate scale.
    pub fn to_canvas(&self, p: ScreenPoint) -> Option<CanvasPoint> {
        if !self.is_valid() {
            return None;
        }
        Some(CanvasPoint {
            x: (p.x - self.offset_x) / self.scale,
            y: (p.y - self.offset_y) / self.scale,
        })
    }

    /// Map a canvas point onto the screen. `None` for a degenerate scale.
    pub fn to_screen(&self, p: CanvasPoint) -> Option<ScreenPoint> {
        if !self.is_valid() {
            return None;
        }
        Some(ScreenPoint {
            x: p.x * self.scale + self.offset_x,
            y: p.y * self.scale + self.offset_y,
        })
    }

    /// Convert a screen-space length (e.g. a pixel tolerance) to canvas units.
    pub fn screen_len_to_canvas(&self, px: f32) -> Option<f32> {
        screen_len_to_canvas(px, self.scale)
    }
}

/// Divide a screen length by the zoom scale.
pub fn screen_len_to_canvas(px: f32, scale: f32) -> Option<f32> {
    if !scale.is_finite() || scale <= 0.0 || !px.is_finite() {
        return None;
    }
    Some(px / scale)
}
