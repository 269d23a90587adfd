//! Axis-aligned geometry shared by the scene graph and the snap detectors.
//!
//! Everything here is in canvas space. Rotation and skew are not modeled:
//! a node is reduced to its axis-aligned bounding box before any snapping
//! decision is made.

use crate::id::NodeId;
use serde::{Deserialize, Serialize};

/// A canvas-space bounding box as reported by the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// True if every component is finite. Non-finite geometry is treated
    /// the same as missing geometry.
    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

/// Primary axis of a comparison.
///
/// Matches on `X` compare x positions and are drawn as **vertical** guide
/// lines; matches on `Y` compare y positions and are drawn as
/// **horizontal** guide lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const BOTH: [Axis; 2] = [Axis::X, Axis::Y];

    pub fn cross(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

/// One of the six named snap positions of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Edge {
    Left,
    CenterX,
    Right,
    Top,
    CenterY,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 6] = [
        Edge::Left,
        Edge::CenterX,
        Edge::Right,
        Edge::Top,
        Edge::CenterY,
        Edge::Bottom,
    ];

    pub fn axis(self) -> Axis {
        match self {
            Edge::Left | Edge::CenterX | Edge::Right => Axis::X,
            Edge::Top | Edge::CenterY | Edge::Bottom => Axis::Y,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Edge::Left => "left",
            Edge::CenterX => "centerX",
            Edge::Right => "right",
            Edge::Top => "top",
            Edge::CenterY => "centerY",
            Edge::Bottom => "bottom",
        }
    }

    /// The three edges that live on `axis`, in start/center/end order.
    pub fn on_axis(axis: Axis) -> [Edge; 3] {
        match axis {
            Axis::X => [Edge::Left, Edge::CenterX, Edge::Right],
            Axis::Y => [Edge::Top, Edge::CenterY, Edge::Bottom],
        }
    }

    pub fn position(self, b: &SnapBox) -> f32 {
        match self {
            Edge::Left => b.left,
            Edge::CenterX => b.center_x(),
            Edge::Right => b.right,
            Edge::Top => b.top,
            Edge::CenterY => b.center_y(),
            Edge::Bottom => b.bottom,
        }
    }
}

/// A candidate (or moving) box inside one snapshot.
///
/// Transient: rebuilt from the scene on every detection pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapBox {
    pub id: NodeId,
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    /// Nearest layout-boundary ancestor, if any.
    pub family: Option<NodeId>,
}

impl SnapBox {
    pub fn from_bounds(id: NodeId, b: Bounds, family: Option<NodeId>) -> Self {
        Self {
            id,
            left: b.left,
            top: b.top,
            right: b.right(),
            bottom: b.bottom(),
            family,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> f32 {
        (self.left + self.right) / 2.0
    }

    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    /// Leading edge on `axis` (left or top).
    pub fn start(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.left,
            Axis::Y => self.top,
        }
    }

    /// Trailing edge on `axis` (right or bottom).
    pub fn end(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.right,
            Axis::Y => self.bottom,
        }
    }

    pub fn size(&self, axis: Axis) -> f32 {
        self.end(axis) - self.start(axis)
    }

    pub fn center(&self, axis: Axis) -> f32 {
        (self.start(axis) + self.end(axis)) / 2.0
    }

    /// Leading edge on the axis perpendicular to `axis`.
    pub fn cross_start(&self, axis: Axis) -> f32 {
        self.start(axis.cross())
    }

    pub fn cross_end(&self, axis: Axis) -> f32 {
        self.end(axis.cross())
    }

    /// True if the box has positive, finite extent on both axes.
    pub fn is_valid(&self) -> bool {
        let w = self.width();
        let h = self.height();
        w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0
    }

    /// Shift the box along `axis`.
    #[must_use]
    pub fn translated(&self, axis: Axis, delta: f32) -> Self {
        let mut b = *self;
        match axis {
            Axis::X => {
                b.left += delta;
                b.right += delta;
            }
            Axis::Y => {
                b.top += delta;
                b.bottom += delta;
            }
        }
        b
    }

    /// Length of the overlap of the two boxes' spans on `axis` (0 if disjoint).
    pub fn span_overlap(&self, other: &SnapBox, axis: Axis) -> f32 {
        let lo = self.start(axis).max(other.start(axis));
        let hi = self.end(axis).min(other.end(axis));
        (hi - lo).max(0.0)
    }
}
