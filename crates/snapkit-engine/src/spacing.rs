//! Equal-spacing detection.
//!
//! Two placements are proposed on each axis:
//!
//! - **Gap-centering**: the moving box sits in the gap between two
//!   neighbors with equal space on both sides.
//! - **Pattern continuation**: the moving box sits just before the first or
//!   just after the second box of an existing neighbor pair, repeating that
//!   pair's gap.
//!
//! Only boxes in the same *layout family* are paired: their cross-axis
//! overlap, relative to the smaller of the two, must reach
//! `min_family_overlap`. Rows or columns that merely share a gap value never
//! produce a match.

use snapkit_core::SnapConfig;
use snapkit_core::geometry::{Axis, SnapBox};

/// Inputs shared by every spacing sub-detector, all in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacingParams {
    pub tolerance: f32,
    pub locality_margin: f32,
    pub min_family_overlap: f32,
}

impl SpacingParams {
    pub fn from_config(config: &SnapConfig, tolerance: f32) -> Self {
        Self {
            tolerance,
            locality_margin: config.locality_margin,
            min_family_overlap: config.min_family_overlap,
        }
    }

    fn is_usable(&self) -> bool {
        self.tolerance.is_finite() && self.tolerance >= 0.0 && self.locality_margin.is_finite()
    }
}

/// Cross-axis overlap of `a` and `b` relative to the smaller cross-axis size.
///
/// `axis` is the *primary* axis; for `Axis::X` this compares vertical spans.
pub fn overlap_ratio(a: &SnapBox, b: &SnapBox, axis: Axis) -> f32 {
    let cross = axis.cross();
    let min_size = a.size(cross).min(b.size(cross));
    if !(min_size > 0.0) {
        return 0.0;
    }
    a.span_overlap(b, cross) / min_size
}

/// Two adjacent boxes of one layout family, `second` strictly after `first`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborPair {
    pub first: SnapBox,
    pub second: SnapBox,
    pub gap: f32,
}

impl NeighborPair {
    /// The cross-axis span shared by both boxes.
    pub fn cross_span(&self, axis: Axis) -> (f32, f32) {
        (
            self.first.cross_start(axis).max(self.second.cross_start(axis)),
            self.first.cross_end(axis).min(self.second.cross_end(axis)),
        )
    }

    fn cross_mid(&self, axis: Axis) -> f32 {
        let (lo, hi) = self.cross_span(axis);
        (lo + hi) / 2.0
    }
}

/// All same-family neighbor pairs along `axis`.
///
/// A pair is dropped when a third box lies entirely inside the gap and is
/// itself in the family of either box. O(n³) in the worst case; callers keep
/// `boxes` limited to the gesture's scope.
pub fn neighbor_pairs(boxes: &[SnapBox], axis: Axis, min_overlap: f32) -> Vec<NeighborPair> {
    let mut pairs = Vec::new();
    for (i, a) in boxes.iter().enumerate() {
        for (j, b) in boxes.iter().enumerate() {
            if i == j || b.start(axis) <= a.end(axis) {
                continue;
            }
            if overlap_ratio(a, b, axis) < min_overlap {
                continue;
            }
            let blocked = boxes.iter().enumerate().any(|(k, c)| {
                k != i
                    && k != j
                    && c.start(axis) >= a.end(axis)
                    && c.end(axis) <= b.start(axis)
                    && (overlap_ratio(c, a, axis) >= min_overlap
                        || overlap_ratio(c, b, axis) >= min_overlap)
            });
            if blocked {
                continue;
            }
            pairs.push(NeighborPair {
                first: *a,
                second: *b,
                gap: b.start(axis) - a.end(axis),
            });
        }
    }
    pairs
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpacingKind {
    Centering,
    ContinueBefore,
    ContinueAfter,
}

/// A proposed equal-spacing placement on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacingCandidate {
    pub axis: Axis,
    pub kind: SpacingKind,
    /// The gap the moving box ends up reproducing.
    pub gap: f32,
    /// Leading edge (left/top) of the moving box once snapped.
    pub target_start: f32,
    pub distance: f32,
    /// Signed correction from the current leading edge to `target_start`.
    pub offset: f32,
}

/// Best equal-spacing placement for `moving` along `axis`, if any.
pub fn detect_spacing(
    moving: &SnapBox,
    snapshot: &[SnapBox],
    axis: Axis,
    params: &SpacingParams,
) -> Option<SpacingCandidate> {
    if !moving.is_valid() || !params.is_usable() {
        return None;
    }
    let pairs = neighbor_pairs(snapshot, axis, params.min_family_overlap);
    let centering = detect_gap_centering(moving, &pairs, axis, params);
    let continuation = detect_pattern_continuation(moving, &pairs, axis, params);
    let best = pick_closer(centering, continuation);
    if let Some(c) = &best {
        log::trace!("spacing on {axis:?}: {:?} gap {} → {}", c.kind, c.gap, c.target_start);
    }
    best
}

/// Slot between two neighbors where the moving box has equal space on both sides.
pub fn detect_gap_centering(
    moving: &SnapBox,
    pairs: &[NeighborPair],
    axis: Axis,
    params: &SpacingParams,
) -> Option<SpacingCandidate> {
    let size = moving.size(axis);
    let mut best: Option<SpacingCandidate> = None;
    for pair in pairs {
        if pair.gap <= size {
            continue;
        }
        let reference = (pair.first.end(axis) + pair.second.start(axis)) / 2.0;
        if !is_local(moving, axis, reference, pair.cross_mid(axis), params.locality_margin) {
            continue;
        }
        let margin = (pair.gap - size) / 2.0;
        let target_start = pair.first.end(axis) + margin;
        best = pick_closer(
            best,
            candidate(moving, axis, SpacingKind::Centering, margin, target_start, params),
        );
    }
    best
}

/// Placement that repeats an existing pair's gap before or after the pair.
pub fn detect_pattern_continuation(
    moving: &SnapBox,
    pairs: &[NeighborPair],
    axis: Axis,
    params: &SpacingParams,
) -> Option<SpacingCandidate> {
    let size = moving.size(axis);
    let mut best: Option<SpacingCandidate> = None;
    for pair in pairs {
        let cross_mid = pair.cross_mid(axis);

        let before_start = pair.first.start(axis) - pair.gap - size;
        let before_ref = pair.first.start(axis) - pair.gap / 2.0;
        if is_local(moving, axis, before_ref, cross_mid, params.locality_margin) {
            best = pick_closer(
                best,
                candidate(
                    moving,
                    axis,
                    SpacingKind::ContinueBefore,
                    pair.gap,
                    before_start,
                    params,
                ),
            );
        }

        let after_start = pair.second.end(axis) + pair.gap;
        let after_ref = pair.second.end(axis) + pair.gap / 2.0;
        if is_local(moving, axis, after_ref, cross_mid, params.locality_margin) {
            best = pick_closer(
                best,
                candidate(
                    moving,
                    axis,
                    SpacingKind::ContinueAfter,
                    pair.gap,
                    after_start,
                    params,
                ),
            );
        }
    }
    best
}

fn candidate(
    moving: &SnapBox,
    axis: Axis,
    kind: SpacingKind,
    gap: f32,
    target_start: f32,
    params: &SpacingParams,
) -> Option<SpacingCandidate> {
    let offset = target_start - moving.start(axis);
    let distance = offset.abs();
    (distance <= params.tolerance).then_some(SpacingCandidate {
        axis,
        kind,
        gap,
        target_start,
        distance,
        offset,
    })
}

/// Reference point must be within `margin` of the moving box's center on both axes.
fn is_local(moving: &SnapBox, axis: Axis, primary: f32, cross: f32, margin: f32) -> bool {
    (primary - moving.center(axis)).abs() <= margin
        && (cross - moving.center(axis.cross())).abs() <= margin
}

/// The candidate with the smaller distance; `a` wins ties.
fn pick_closer(
    a: Option<SpacingCandidate>,
    b: Option<SpacingCandidate>,
) -> Option<SpacingCandidate> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b.distance < a.distance { b } else { a }),
        (a, b) => a.or(b),
    }
}
