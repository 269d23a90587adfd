//! Snap session driver: the per-frame control loop for one gesture.
//!
//! ```text
//!          begin()               tick()
//!   Idle ──────────▶ ScopeConfigured ──────▶ Active ──┐ tick()
//!    ▲                                         ▲     │
//!    │            end() / cancel() / reset()   └─────┘
//!    └─────────────────────────────────────────────────
//! ```
//!
//! The scope (candidate ids and exclusions) is computed once in `begin()`.
//! Each `tick()` rebuilds the box snapshot from the scene, runs the
//! detectors, publishes a fresh [`GuideState`] and returns the corrected
//! geometry. Ending or cancelling clears everything and is safe to call any
//! number of times.

use crate::align::{AlignmentResult, detect_alignment};
use crate::gaps::collect_gap_segments;
use crate::gesture::{ActiveEdges, GestureFrame, GestureKind, GestureStart};
use crate::guides::{GuideState, SnapOutcome, SpacingMatch};
use crate::scope::{SnapScope, configure_scope};
use crate::snapshot::build_snapshot;
use crate::spacing::{SpacingCandidate, SpacingParams, detect_spacing};
use snapkit_core::geometry::{Axis, Bounds, Edge, SnapBox};
use snapkit_core::id::NodeId;
use snapkit_core::model::SceneGraph;
use snapkit_core::scene::SceneAccess;
use snapkit_core::{CanvasPoint, CanvasSize, SnapConfig};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    ScopeConfigured,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeginOutcome {
    Started,
    /// A moving node is locked; the gesture was cancelled.
    Locked,
    /// Snapping is turned off in the config.
    Disabled,
    /// No moving ids were given.
    Empty,
}

/// Why a gesture was abandoned before pointer release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// A drop target elsewhere took over the drag.
    DropTarget,
    /// A modifier switched the editor into another interaction mode.
    ModeSwitch,
    Locked,
    /// The window lost focus mid-gesture.
    FocusLost,
}

/// Drives snapping for one gesture at a time against an injected scene.
pub struct SnapSession<S: SceneAccess = SceneGraph> {
    scene: S,
    config: SnapConfig,
    phase: SessionPhase,
    scope: Option<SnapScope>,
    moving: Vec<NodeId>,
    origin: CanvasPoint,
    published: Arc<GuideState>,
}

impl<S: SceneAccess> SnapSession<S> {
    pub fn new(scene: S, config: SnapConfig) -> Self {
        Self {
            scene,
            config,
            phase: SessionPhase::Idle,
            scope: None,
            moving: Vec::new(),
            origin: CanvasPoint::default(),
            published: Arc::new(GuideState::default()),
        }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Mutable scene access. A scope computed by `begin()` is not refreshed
    /// until the next gesture starts.
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    pub fn state(&self) -> SessionPhase {
        self.phase
    }

    pub fn scope(&self) -> Option<&SnapScope> {
        self.scope.as_ref()
    }

    /// Current guide state. Cheap to clone and never mutated in place.
    pub fn published(&self) -> Arc<GuideState> {
        Arc::clone(&self.published)
    }

    // ─── Configuration surface ───────────────────────────────────────────

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.set_enabled(enabled);
    }

    pub fn set_snap_threshold(&mut self, px: f32) {
        self.config.set_snap_threshold(px);
    }

    pub fn set_scope_limit(&mut self, ids: Option<Vec<NodeId>>) {
        self.config.set_scope_limit(ids);
    }

    pub fn set_config(&mut self, config: SnapConfig) {
        self.config = config;
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Start a gesture: pick the scope once for its whole duration.
    ///
    /// Calling this while a gesture is already running discards the old
    /// scope and exclusions first.
    pub fn begin(&mut self, start: &GestureStart) -> BeginOutcome {
        if self.phase != SessionPhase::Idle {
            log::debug!("snap session: begin while {:?}, resetting", self.phase);
            self.reset();
        }
        if !self.config.enabled {
            return BeginOutcome::Disabled;
        }
        if start.moving.is_empty() {
            return BeginOutcome::Empty;
        }
        if let Some(id) = start.moving.iter().find(|&&id| self.scene.is_locked(id)) {
            log::debug!("snap session: {id} is locked, gesture cancelled");
            self.reset();
            return BeginOutcome::Locked;
        }

        self.configure(&start.moving);
        self.origin = start.origin;
        log::debug!(
            "snap session: {:?} started for {} node(s)",
            start.kind,
            start.moving.len()
        );
        BeginOutcome::Started
    }

    /// Run one frame. Always returns geometry for the host to apply: the
    /// snapped rectangle when something matched, the raw one otherwise.
    pub fn tick(&mut self, frame: &GestureFrame) -> SnapOutcome {
        let mut position = frame.position;
        let raw = SnapOutcome::unsnapped(position, frame.size);

        if self.phase == SessionPhase::Idle {
            self.clear();
            return raw;
        }

        if !frame.moving.is_empty() && frame.moving != self.moving {
            if let Some(id) = frame.moving.iter().find(|&&id| self.scene.is_locked(id)) {
                log::debug!("snap session: new drag source {id} is locked");
                self.cancel(CancelReason::Locked);
                return raw;
            }
            log::debug!("snap session: drag source changed mid-gesture");
            self.configure(&frame.moving);
            // The shift pin measures travel from the new source.
            if let Some(b) = frame.moving.first().and_then(|&id| self.scene.bounding_box(id)) {
                self.origin = CanvasPoint::new(b.left, b.top);
            }
        }

        if !self.config.enabled {
            self.clear();
            return raw;
        }
        let Some(tolerance) = self.config.canvas_tolerance(frame.scale) else {
            self.clear();
            return raw;
        };
        self.phase = SessionPhase::Active;

        // Shift-drag: lock the axis with less travel to the gesture origin.
        let pinned = if frame.kind.is_drag() && frame.modifiers.shift {
            let dx = (position.x - self.origin.x).abs();
            let dy = (position.y - self.origin.y).abs();
            if dx > dy {
                position.y = self.origin.y;
                Some(Axis::Y)
            } else {
                position.x = self.origin.x;
                Some(Axis::X)
            }
        } else {
            None
        };

        let Some(&primary) = self.moving.first() else {
            self.clear();
            return raw;
        };
        let moving_box = SnapBox::from_bounds(
            primary,
            Bounds::new(position.x, position.y, frame.size.width, frame.size.height),
            None,
        );
        if !moving_box.is_valid() {
            self.clear();
            return SnapOutcome::unsnapped(position, frame.size);
        }

        let Some(scope) = self.scope.as_ref() else {
            self.clear();
            return raw;
        };
        let snapshot = build_snapshot(&self.scene, scope, &self.moving);

        let edges: ActiveEdges = frame
            .kind
            .active_edges()
            .into_iter()
            .filter(|e| Some(e.axis()) != pinned)
            .collect();
        let alignment = detect_alignment(&moving_box, &edges, &snapshot, tolerance);

        let spacing_on = |axis: Axis| {
            if !frame.kind.is_drag() || self.moving.len() != 1 || Some(axis) == pinned {
                return None;
            }
            let params = SpacingParams::from_config(&self.config, tolerance);
            detect_spacing(&moving_box, &snapshot, axis, &params)
        };
        let spacing_x = spacing_on(Axis::X);
        let spacing_y = spacing_on(Axis::Y);

        let resolved = resolve_winners(alignment, spacing_x, spacing_y);
        let outcome = apply_offsets(position, frame.size, frame.kind, &resolved);

        // Both spacing offsets are applied; only the closer match is shown.
        let spacing_match = resolved.published_spacing().map(|s| {
            let snapped = moving_box
                .translated(Axis::X, outcome.delta_x)
                .translated(Axis::Y, outcome.delta_y);
            SpacingMatch {
                axis: s.axis,
                gap_distance: s.gap,
                target_position: s.target_start,
                segments: collect_gap_segments(
                    &snapped,
                    &snapshot,
                    s.axis,
                    s.gap,
                    self.config.gap_epsilon,
                    self.config.min_family_overlap,
                ),
            }
        });

        let mut guides = resolved.alignment.guides.clone();
        for axis in Axis::BOTH {
            if !outcome.snapped_on(axis) || resolved.spacing(axis).is_some() {
                guides.clear_axis(axis);
            }
        }

        self.publish(GuideState {
            guides,
            spacing: spacing_match,
        });
        log::trace!(
            "snap tick {primary}: ({}, {}) → ({}, {})",
            frame.position.x,
            frame.position.y,
            outcome.position.x,
            outcome.position.y
        );
        outcome
    }

    /// Pointer released: clear all state.
    pub fn end(&mut self) {
        if self.phase != SessionPhase::Idle {
            log::debug!("snap session: gesture ended");
        }
        self.reset();
    }

    /// Gesture abandoned: clear all state.
    pub fn cancel(&mut self, reason: CancelReason) {
        if self.phase != SessionPhase::Idle {
            log::debug!("snap session: gesture cancelled ({reason:?})");
        }
        self.reset();
    }

    /// Return to `Idle` with nothing published. Idempotent.
    pub fn reset(&mut self) {
        self.phase = SessionPhase::Idle;
        self.scope = None;
        self.moving.clear();
        self.clear();
    }

    fn configure(&mut self, moving: &[NodeId]) {
        // Drop the previous scope before computing the new one so stale
        // exclusions cannot leak across drag sources.
        self.scope = None;
        self.moving = moving.to_vec();
        self.scope = Some(configure_scope(&self.scene, &self.moving, &self.config));
        self.phase = SessionPhase::ScopeConfigured;
        self.clear();
    }

    /// Drop the published guides without ending the gesture. For hosts
    /// that skip a frame they cannot map to canvas space.
    pub fn clear_published(&mut self) {
        self.clear();
    }

    fn clear(&mut self) {
        if !self.published.is_empty() {
            self.published = Arc::new(GuideState::default());
        }
    }

    fn publish(&mut self, state: GuideState) {
        self.published = Arc::new(state);
    }
}

/// Per-axis outcome after alignment and spacing have competed.
struct Resolved {
    alignment: AlignmentResult,
    /// Spacing candidates that beat alignment on their axis.
    spacing_x: Option<SpacingCandidate>,
    spacing_y: Option<SpacingCandidate>,
    offset_x: Option<f32>,
    offset_y: Option<f32>,
}

impl Resolved {
    fn spacing(&self, axis: Axis) -> Option<SpacingCandidate> {
        match axis {
            Axis::X => self.spacing_x,
            Axis::Y => self.spacing_y,
        }
    }

    /// The closer of the winning spacing matches, X on ties.
    fn published_spacing(&self) -> Option<SpacingCandidate> {
        match (self.spacing_x, self.spacing_y) {
            (Some(x), Some(y)) if y.distance < x.distance => Some(y),
            (Some(x), _) => Some(x),
            (None, y) => y,
        }
    }
}

/// One winner per axis: the smaller distance wins, alignment on ties.
fn resolve_winners(
    alignment: AlignmentResult,
    spacing_x: Option<SpacingCandidate>,
    spacing_y: Option<SpacingCandidate>,
) -> Resolved {
    let beats_alignment = |s: &SpacingCandidate| {
        alignment
            .best(s.axis)
            .is_none_or(|a| s.distance < a.distance)
    };
    let spacing_x = spacing_x.filter(beats_alignment);
    let spacing_y = spacing_y.filter(beats_alignment);

    let offset_x = spacing_x
        .map(|s| s.offset)
        .or(alignment.best_x.map(|c| c.offset));
    let offset_y = spacing_y
        .map(|s| s.offset)
        .or(alignment.best_y.map(|c| c.offset));

    Resolved {
        alignment,
        spacing_x,
        spacing_y,
        offset_x,
        offset_y,
    }
}

/// Turn per-axis offsets into corrected geometry.
///
/// A drag translates the box. A resize moves only the grabbed edge: a
/// leading edge shifts the position and shrinks the size, a trailing edge
/// grows the size. An offset that would collapse the box is dropped.
fn apply_offsets(
    position: CanvasPoint,
    size: CanvasSize,
    kind: GestureKind,
    resolved: &Resolved,
) -> SnapOutcome {
    let mut out = SnapOutcome::unsnapped(position, size);
    for (axis, offset) in [(Axis::X, resolved.offset_x), (Axis::Y, resolved.offset_y)] {
        let Some(offset) = offset else { continue };
        let (pos, len) = match axis {
            Axis::X => (out.position.x, out.size.width),
            Axis::Y => (out.position.y, out.size.height),
        };
        let (new_pos, new_len) = match kind {
            GestureKind::Drag => (pos + offset, len),
            GestureKind::Resize(handle) => {
                let Some(edge) = handle.edges().into_iter().find(|e| e.axis() == axis) else {
                    continue;
                };
                match edge {
                    Edge::Left | Edge::Top => (pos + offset, len - offset),
                    _ => (pos, len + offset),
                }
            }
        };
        if new_len <= 0.0 {
            continue;
        }
        match axis {
            Axis::X => {
                out.position.x = new_pos;
                out.size.width = new_len;
                out.delta_x = offset;
                out.snapped_x = true;
            }
            Axis::Y => {
                out.position.y = new_pos;
                out.size.height = new_len;
                out.delta_y = offset;
                out.snapped_y = true;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{Modifiers, ResizeHandle};
    use pretty_assertions::assert_eq;
    use snapkit_core::parser::parse_scene;

    const SCENE: &str = r#"
frame @ses_a { x: 0 y: 0 w: 100 h: 50 }
frame @ses_b { x: 300 y: 0 w: 100 h: 50 }
frame @ses_m { x: 500 y: 500 w: 100 h: 50
  text @ses_m_child { x: 0 y: 0 w: 10 h: 10 }
}
frame @ses_locked { x: 900 y: 900 w: 10 h: 10 locked }
"#;

    fn id(s: &str) -> NodeId {
        NodeId::intern(s)
    }

    fn session() -> SnapSession {
        let mut config = SnapConfig::default();
        config.set_snap_threshold(5.0);
        SnapSession::new(parse_scene(SCENE).unwrap(), config)
    }

    fn drag_start(name: &str) -> GestureStart {
        GestureStart {
            moving: vec![id(name)],
            kind: GestureKind::Drag,
            origin: CanvasPoint::new(500.0, 500.0),
        }
    }

    fn drag(x: f32, y: f32) -> GestureFrame {
        GestureFrame::drag(CanvasPoint::new(x, y), CanvasSize::new(100.0, 50.0))
    }

    #[test]
    fn lifecycle_phases() {
        let mut s = session();
        assert_eq!(s.state(), SessionPhase::Idle);
        assert_eq!(s.begin(&drag_start("ses_m")), BeginOutcome::Started);
        assert_eq!(s.state(), SessionPhase::ScopeConfigured);
        s.tick(&drag(152.0, 0.0));
        assert_eq!(s.state(), SessionPhase::Active);
        s.end();
        assert_eq!(s.state(), SessionPhase::Idle);
        assert!(s.published().is_empty());
    }

    #[test]
    fn spacing_wins_the_gap_between_two_boxes() {
        let mut s = session();
        s.begin(&drag_start("ses_m"));
        let out = s.tick(&drag(152.0, 0.0));
        assert_eq!(out.position, CanvasPoint::new(150.0, 0.0));
        assert_eq!(out.delta_x, -2.0);
        let state = s.published();
        let spacing = state.spacing.as_ref().unwrap();
        assert_eq!(spacing.axis, Axis::X);
        assert_eq!(spacing.gap_distance, 50.0);
        assert_eq!(spacing.segments.len(), 2);
        assert!(state.guides.vertical.is_empty());
    }

    #[test]
    fn alignment_beats_farther_spacing() {
        let mut s = session();
        s.begin(&drag_start("ses_m"));
        // Left edge 1 away from @ses_a's right edge (100); no spacing slot here.
        let out = s.tick(&drag(101.0, 200.0));
        assert_eq!(out.position.x, 100.0);
        assert!(s.published().spacing.is_none());
        assert_eq!(s.published().guides.vertical.as_slice(), &[100.0]);
    }

    #[test]
    fn locked_node_cancels_begin() {
        let mut s = session();
        assert_eq!(s.begin(&drag_start("ses_locked")), BeginOutcome::Locked);
        assert_eq!(s.state(), SessionPhase::Idle);
        let out = s.tick(&drag(101.0, 0.0));
        assert!(!out.is_snapped());
    }

    #[test]
    fn disabled_config_never_starts() {
        let mut s = session();
        s.set_enabled(false);
        assert_eq!(s.begin(&drag_start("ses_m")), BeginOutcome::Disabled);
        assert!(!s.tick(&drag(101.0, 0.0)).is_snapped());
    }

    #[test]
    fn reset_is_idempotent() {
        let mut s = session();
        s.begin(&drag_start("ses_m"));
        s.tick(&drag(101.0, 0.0));
        assert!(!s.published().is_empty());
        s.end();
        s.end();
        assert!(s.published().is_empty());
        s.cancel(CancelReason::FocusLost);
        assert_eq!(s.state(), SessionPhase::Idle);
        assert!(s.published().is_empty());
    }

    #[test]
    fn degenerate_scale_publishes_nothing() {
        let mut s = session();
        s.begin(&drag_start("ses_m"));
        let out = s.tick(&drag(101.0, 0.0).with_scale(0.0));
        assert!(!out.is_snapped());
        assert_eq!(out.position, CanvasPoint::new(101.0, 0.0));
        assert!(s.published().is_empty());
    }

    #[test]
    fn resize_right_handle_grows_width() {
        let mut s = session();
        s.begin(&GestureStart {
            moving: vec![id("ses_m")],
            kind: GestureKind::Resize(ResizeHandle::Right),
            origin: CanvasPoint::new(500.0, 500.0),
        });
        // Box 200..297, right edge 3 short of @ses_b's left (300).
        let frame = GestureFrame::resize(
            CanvasPoint::new(200.0, 200.0),
            CanvasSize::new(97.0, 50.0),
            ResizeHandle::Right,
        );
        let out = s.tick(&frame);
        assert_eq!(out.position, CanvasPoint::new(200.0, 200.0));
        assert_eq!(out.size.width, 100.0);
        assert!(!out.snapped_y);
        assert!(s.published().spacing.is_none());
    }

    #[test]
    fn resize_left_handle_moves_origin_and_shrinks() {
        let mut s = session();
        s.begin(&GestureStart {
            moving: vec![id("ses_m")],
            kind: GestureKind::Resize(ResizeHandle::Left),
            origin: CanvasPoint::new(500.0, 500.0),
        });
        let frame = GestureFrame::resize(
            CanvasPoint::new(98.0, 200.0),
            CanvasSize::new(102.0, 50.0),
            ResizeHandle::Left,
        );
        let out = s.tick(&frame);
        assert_eq!(out.position.x, 100.0);
        assert_eq!(out.size.width, 100.0);
    }

    #[test]
    fn shift_pins_the_minor_axis() {
        let mut s = session();
        s.begin(&GestureStart {
            moving: vec![id("ses_m")],
            kind: GestureKind::Drag,
            origin: CanvasPoint::new(0.0, 300.0),
        });
        // Mostly horizontal travel; y would align with @ses_a's bottom (50)
        // if it were free, but it stays pinned at the origin.
        let frame = drag(101.0, 298.0).with_modifiers(Modifiers::SHIFT);
        let out = s.tick(&frame);
        assert_eq!(out.position, CanvasPoint::new(100.0, 300.0));
        assert!(!out.snapped_y);
    }

    #[test]
    fn new_drag_source_mid_gesture_rebuilds_scope() {
        let mut s = session();
        s.begin(&drag_start("ses_m"));
        assert!(s.scope().unwrap().excluded.contains(&id("ses_m_child")));
        let mut frame = drag(101.0, 0.0);
        frame.moving = vec![id("ses_a")];
        s.tick(&frame);
        let scope = s.scope().unwrap();
        assert!(!scope.excluded.contains(&id("ses_m_child")));
        assert!(scope.excluded.contains(&id("ses_a")));
        assert!(scope.candidates.contains(&id("ses_m")));
    }

    #[test]
    fn new_drag_source_moves_the_shift_origin() {
        let mut s = session();
        s.begin(&drag_start("ses_m"));
        // Measured from @ses_a at (0, 0) this is mostly vertical travel.
        let mut frame = drag(3.0, 150.0).with_modifiers(Modifiers::SHIFT);
        frame.moving = vec![id("ses_a")];
        let out = s.tick(&frame);
        assert_eq!(out.position, CanvasPoint::new(0.0, 150.0));
        assert!(!out.snapped_x);
        assert!(!out.snapped_y);
    }

    const CROSS: &str = r#"
frame @cross_a { x: 0 y: 420 w: 100 h: 50 }
frame @cross_b { x: 300 y: 420 w: 100 h: 50 }
frame @cross_d { x: 150 y: 300 w: 100 h: 30 }
frame @cross_e { x: 150 y: 350 w: 100 h: 30 }
frame @cross_m { x: 600 y: 900 w: 100 h: 50 }
"#;

    fn cross_session(scene: &str) -> SnapSession {
        let mut config = SnapConfig::default();
        config.set_snap_threshold(5.0);
        let mut s = SnapSession::new(parse_scene(scene).unwrap(), config);
        s.begin(&drag_start("cross_m"));
        s
    }

    #[test]
    fn spacing_on_one_axis_survives_alignment_on_the_other() {
        let mut s = cross_session(CROSS);
        // X: centered between @cross_a and @cross_b (0.5 away) ties with
        // the column edges (also 0.5 away), so alignment keeps X.
        // Y: continuing the @cross_d/@cross_e column lands at 400, 1 away.
        let out = s.tick(&drag(150.5, 401.0));
        assert_eq!(out.position, CanvasPoint::new(150.0, 400.0));
        assert!(out.snapped_x);
        assert!(out.snapped_y);

        let state = s.published();
        let spacing = state.spacing.as_ref().unwrap();
        assert_eq!(spacing.axis, Axis::Y);
        assert_eq!(spacing.gap_distance, 20.0);
        assert_eq!(spacing.target_position, 400.0);
        assert_eq!(spacing.segments.len(), 2);
        assert!(state.guides.vertical.contains(&150.0));
        assert!(state.guides.horizontal.is_empty());
    }

    #[test]
    fn spacing_on_both_axes_applies_both_and_shows_the_closer() {
        // Column shifted right so its edges no longer line up with the mover.
        let scene = CROSS
            .replace("@cross_d { x: 150", "@cross_d { x: 160")
            .replace("@cross_e { x: 150", "@cross_e { x: 160");
        let mut s = cross_session(&scene);
        let out = s.tick(&drag(150.5, 401.0));
        assert_eq!(out.position, CanvasPoint::new(150.0, 400.0));

        let state = s.published();
        let spacing = state.spacing.as_ref().unwrap();
        assert_eq!(spacing.axis, Axis::X);
        assert_eq!(spacing.gap_distance, 50.0);
        assert_eq!(spacing.target_position, 150.0);
        let bands: Vec<(f32, f32)> = spacing.segments.iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(bands, vec![(100.0, 150.0), (250.0, 300.0)]);
        assert!(state.guides.vertical.is_empty());
        assert!(state.guides.horizontal.is_empty());
    }

    #[test]
    fn clear_published_keeps_the_gesture_running() {
        let mut s = session();
        s.begin(&drag_start("ses_m"));
        s.tick(&drag(101.0, 200.0));
        assert!(!s.published().is_empty());
        s.clear_published();
        assert!(s.published().is_empty());
        assert_eq!(s.state(), SessionPhase::Active);
        assert_eq!(s.tick(&drag(101.0, 200.0)).position.x, 100.0);
    }

    #[test]
    fn spacing_is_skipped_for_multi_node_drags() {
        let mut s = session();
        s.begin(&GestureStart {
            moving: vec![id("ses_m"), id("ses_m_child")],
            kind: GestureKind::Drag,
            origin: CanvasPoint::new(500.0, 500.0),
        });
        // Same frame that centers a single box between @ses_a and @ses_b.
        let out = s.tick(&drag(152.0, 0.0));
        assert_eq!(out.position.x, 152.0);
        assert!(s.published().spacing.is_none());
    }
}
