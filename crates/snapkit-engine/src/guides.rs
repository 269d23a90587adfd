//! Values published to the renderer and returned to the gesture host.
//!
//! Everything here is an immutable value. The session replaces the whole
//! [`GuideState`] behind an `Arc` each frame rather than mutating it.

use serde::Serialize;
use smallvec::SmallVec;
use snapkit_core::geometry::{Axis, Edge};
use snapkit_core::{CanvasPoint, CanvasSize};

/// Positions closer than this are the same guide line.
pub const GUIDE_EPSILON: f32 = 1e-3;

/// One moving-edge-vs-candidate-edge comparison that fell inside the tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapCandidate {
    pub axis: Axis,
    /// Canvas position of the candidate edge (where the guide is drawn).
    pub position: f32,
    /// Edge of the moving box that matched.
    pub source_edge: Edge,
    pub distance: f32,
    /// Signed correction to apply to the moving edge to land on `position`.
    pub offset: f32,
}

impl SnapCandidate {
    pub fn source_edge_name(&self) -> &'static str {
        self.source_edge.name()
    }
}

/// Guide lines to draw this frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActiveGuide {
    /// y positions of horizontal lines (matches on the Y axis).
    pub horizontal: SmallVec<[f32; 4]>,
    /// x positions of vertical lines (matches on the X axis).
    pub vertical: SmallVec<[f32; 4]>,
}

impl ActiveGuide {
    pub fn on_axis(&self, axis: Axis) -> &[f32] {
        match axis {
            Axis::X => &self.vertical,
            Axis::Y => &self.horizontal,
        }
    }

    /// Add a guide position unless an equal one is already present.
    pub fn push(&mut self, axis: Axis, position: f32) {
        let lines = match axis {
            Axis::X => &mut self.vertical,
            Axis::Y => &mut self.horizontal,
        };
        if !lines.iter().any(|p| (p - position).abs() <= GUIDE_EPSILON) {
            lines.push(position);
        }
    }

    pub fn clear_axis(&mut self, axis: Axis) {
        match axis {
            Axis::X => self.vertical.clear(),
            Axis::Y => self.horizontal.clear(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.horizontal.is_empty() && self.vertical.is_empty()
    }
}

/// One highlighted band between two neighbors sharing the matched gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Primary-axis start of the gap (trailing edge of the first box).
    pub start: f32,
    /// Primary-axis end of the gap (leading edge of the second box).
    pub end: f32,
    pub cross_axis_min: f32,
    pub cross_axis_max: f32,
}

/// An equal-spacing placement that won its axis this frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingMatch {
    pub axis: Axis,
    pub gap_distance: f32,
    /// Leading edge the moving box snaps to.
    pub target_position: f32,
    pub segments: Vec<Segment>,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GuideState {
    pub guides: ActiveGuide,
    pub spacing: Option<SpacingMatch>,
}

impl GuideState {
    pub fn is_empty(&self) -> bool {
        self.guides.is_empty() && self.spacing.is_none()
    }
}

/// Corrected geometry handed back to the gesture host after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapOutcome {
    pub position: CanvasPoint,
    pub size: CanvasSize,
    /// Correction applied on top of the pointer-derived position.
    pub delta_x: f32,
    pub delta_y: f32,
    pub snapped_x: bool,
    pub snapped_y: bool,
}

impl SnapOutcome {
    /// The raw geometry, untouched.
    pub fn unsnapped(position: CanvasPoint, size: CanvasSize) -> Self {
        Self {
            position,
            size,
            delta_x: 0.0,
            delta_y: 0.0,
            snapped_x: false,
            snapped_y: false,
        }
    }

    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }

    pub fn snapped_on(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.snapped_x,
            Axis::Y => self.snapped_y,
        }
    }
}
