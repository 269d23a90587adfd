//! Session-wide snapping tunables.

use crate::coords::screen_len_to_canvas;
use crate::id::NodeId;
use serde::{Deserialize, Serialize};

/// Default on-screen snap tolerance in pixels.
pub const DEFAULT_SNAP_THRESHOLD_PX: f32 = 6.0;
/// Candidates whose reference point is farther than this (canvas units)
/// from the moving box are ignored by the spacing detector.
pub const DEFAULT_LOCALITY_MARGIN: f32 = 600.0;
/// Two gaps are "the same" when they differ by at most this much.
pub const DEFAULT_GAP_EPSILON: f32 = 0.5;
/// Minimum cross-axis overlap ratio for two boxes to be in one layout family.
pub const DEFAULT_MIN_FAMILY_OVERLAP: f32 = 0.01;

/// Configuration for a snap session.
///
/// `snap_threshold` is stored in **screen pixels** and converted to canvas
/// units once per frame with [`SnapConfig::canvas_tolerance`]. Every other
/// distance here is already in canvas units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapConfig {
    /// Master switch. When off, ticks publish nothing and echo the raw position.
    pub enabled: bool,

    /// On-screen snap tolerance in pixels.
    pub snap_threshold: f32,

    /// Also offer the descendants of in-scope nodes as snap targets.
    pub show_child_elements: bool,

    /// Restrict candidates to these ids (plus the moving node's topmost
    /// ancestor). `None` lets the session pick the scope from the hierarchy.
    pub limit_to_node_ids: Option<Vec<NodeId>>,

    pub locality_margin: f32,

    pub gap_epsilon: f32,

    pub min_family_overlap: f32,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            snap_threshold: DEFAULT_SNAP_THRESHOLD_PX,
            show_child_elements: false,
            limit_to_node_ids: None,
            locality_margin: DEFAULT_LOCALITY_MARGIN,
            gap_epsilon: DEFAULT_GAP_EPSILON,
            min_family_overlap: DEFAULT_MIN_FAMILY_OVERLAP,
        }
    }
}

impl SnapConfig {
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Set the on-screen tolerance. Negative or non-finite values disable
    /// matching (tolerance 0 still accepts exact hits).
    pub fn set_snap_threshold(&mut self, px: f32) {
        self.snap_threshold = non_negative(px);
    }

    pub fn set_scope_limit(&mut self, ids: Option<Vec<NodeId>>) {
        self.limit_to_node_ids = ids;
    }

    pub fn set_show_child_elements(&mut self, show: bool) {
        self.show_child_elements = show;
    }

    pub fn set_locality_margin(&mut self, margin: f32) {
        self.locality_margin = non_negative(margin);
    }

    pub fn set_gap_epsilon(&mut self, epsilon: f32) {
        self.gap_epsilon = non_negative(epsilon);
    }

    /// The snap tolerance in canvas units for the given zoom scale.
    /// `None` when the scale is degenerate; callers treat that as "no match".
    pub fn canvas_tolerance(&self, scale: f32) -> Option<f32> {
        screen_len_to_canvas(self.snap_threshold, scale)
    }
}

fn non_negative(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}
