//! Gap segment collection for equal-spacing bands.
//!
//! Visualization only: once a spacing match has won, find every neighbor
//! pair in the moving box's row (or column) that shares the matched gap.
//! Nothing here changes the snapped position.

use crate::guides::Segment;
use crate::spacing::neighbor_pairs;
use snapkit_core::geometry::{Axis, SnapBox};

/// Segments for every same-family pair whose gap equals `gap` within
/// `epsilon`, restricted to pairs overlapping `moving` on the cross axis.
///
/// `moving` must already be at its snapped position; it takes part in the
/// pairing like any other box. Segments are ordered by `start`.
pub fn collect_gap_segments(
    moving: &SnapBox,
    snapshot: &[SnapBox],
    axis: Axis,
    gap: f32,
    epsilon: f32,
    min_overlap: f32,
) -> Vec<Segment> {
    if !moving.is_valid() || !gap.is_finite() {
        return Vec::new();
    }

    let mut boxes: Vec<SnapBox> = snapshot
        .iter()
        .filter(|b| b.id != moving.id)
        .copied()
        .collect();
    boxes.push(*moving);

    let mut segments: Vec<Segment> = neighbor_pairs(&boxes, axis, min_overlap)
        .into_iter()
        .filter(|p| (p.gap - gap).abs() <= epsilon)
        .filter_map(|p| {
            let (lo, hi) = p.cross_span(axis);
            let touches_row = lo < moving.cross_end(axis) && hi > moving.cross_start(axis);
            touches_row.then_some(Segment {
                start: p.first.end(axis),
                end: p.second.start(axis),
                cross_axis_min: lo,
                cross_axis_max: hi,
            })
        })
        .collect();

    segments.sort_by(|a, b| a.start.total_cmp(&b.start));
    segments
}
