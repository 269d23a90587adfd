//! Edge alignment: nearest matching edge per axis within a tolerance.
//!
//! Every active edge of the moving box is compared against all three edges
//! on the same axis of every candidate box. Per axis, the minimum distance
//! wins and *all* candidates tied at that minimum become guide lines.

use crate::guides::{ActiveGuide, GUIDE_EPSILON, SnapCandidate};
use snapkit_core::geometry::{Axis, Edge, SnapBox};

/// Result of one alignment pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignmentResult {
    pub guides: ActiveGuide,
    /// First-found candidate at the minimum distance on X.
    pub best_x: Option<SnapCandidate>,
    /// First-found candidate at the minimum distance on Y.
    pub best_y: Option<SnapCandidate>,
}

impl AlignmentResult {
    pub fn best(&self, axis: Axis) -> Option<&SnapCandidate> {
        match axis {
            Axis::X => self.best_x.as_ref(),
            Axis::Y => self.best_y.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.best_x.is_none() && self.best_y.is_none()
    }
}

/// Detect alignment guides for `moving` against `snapshot`.
///
/// `tolerance` is in canvas units and inclusive: a candidate exactly
/// `tolerance` away matches. Degenerate input (zero-size box, negative or
/// non-finite tolerance) yields an empty result.
pub fn detect_alignment(
    moving: &SnapBox,
    edges: &[Edge],
    snapshot: &[SnapBox],
    tolerance: f32,
) -> AlignmentResult {
    let mut result = AlignmentResult::default();
    if !moving.is_valid() || !tolerance.is_finite() || tolerance < 0.0 {
        return result;
    }

    for axis in Axis::BOTH {
        let candidates = axis_candidates(moving, edges, snapshot, tolerance, axis);
        let Some(min) = candidates
            .iter()
            .map(|c| c.distance)
            .min_by(|a, b| a.total_cmp(b))
        else {
            continue;
        };

        let mut best = None;
        for c in candidates
            .iter()
            .filter(|c| c.distance - min <= GUIDE_EPSILON)
        {
            best.get_or_insert(*c);
            result.guides.push(axis, c.position);
        }
        match axis {
            Axis::X => result.best_x = best,
            Axis::Y => result.best_y = best,
        }
    }

    log::trace!(
        "alignment: x={:?} y={:?}",
        result.best_x.map(|c| c.position),
        result.best_y.map(|c| c.position)
    );
    result
}

fn axis_candidates(
    moving: &SnapBox,
    edges: &[Edge],
    snapshot: &[SnapBox],
    tolerance: f32,
    axis: Axis,
) -> Vec<SnapCandidate> {
    let mut out = Vec::new();
    let active: Vec<Edge> = edges.iter().copied().filter(|e| e.axis() == axis).collect();
    if active.is_empty() {
        return out;
    }

    for target in snapshot {
        if target.id == moving.id {
            continue;
        }
        for &source_edge in &active {
            let from = source_edge.position(moving);
            for target_edge in Edge::on_axis(axis) {
                let position = target_edge.position(target);
                let distance = (from - position).abs();
                if distance <= tolerance {
                    out.push(SnapCandidate {
                        axis,
                        position,
                        source_edge,
                        distance,
                        offset: position - from,
                    });
                }
            }
        }
    }
    out
}
