//! Integration tests: geometric properties the detectors must hold.
//!
//! Each test drives the public detector API (or a full session) against
//! synthetic boxes or a parsed scene, with no rendering host involved.

use pretty_assertions::assert_eq;
use snapkit_core::geometry::{Axis, Bounds, Edge, SnapBox};
use snapkit_core::id::NodeId;
use snapkit_core::parser::parse_scene;
use snapkit_core::{CanvasPoint, CanvasSize, SnapConfig};
use snapkit_engine::spacing::neighbor_pairs;
use snapkit_engine::{
    GestureFrame, GestureKind, GestureStart, SnapSession, SpacingParams, build_snapshot,
    configure_scope, detect_alignment, detect_spacing,
};

fn rect(name: &str, x: f32, y: f32, w: f32, h: f32) -> SnapBox {
    SnapBox::from_bounds(NodeId::intern(name), Bounds::new(x, y, w, h), None)
}

fn session_with(scene: &str, threshold_px: f32) -> SnapSession {
    let mut config = SnapConfig::default();
    config.set_snap_threshold(threshold_px);
    SnapSession::new(parse_scene(scene).unwrap(), config)
}

fn begin_drag(session: &mut SnapSession, name: &str) {
    session.begin(&GestureStart {
        moving: vec![NodeId::intern(name)],
        kind: GestureKind::Drag,
        origin: CanvasPoint::default(),
    });
}

// ─── Alignment ───────────────────────────────────────────────────────────

#[test]
fn alignment_distance_is_symmetric() {
    for gap in [0.0, 1.5, 3.0, 5.0] {
        let a = rect("prop_sym_a", 0.0, 0.0, 100.0, 50.0);
        let b = rect("prop_sym_b", 100.0 + gap, 200.0, 100.0, 50.0);
        let ab = detect_alignment(&a, &Edge::ALL, &[b], 5.0).best_x.unwrap();
        let ba = detect_alignment(&b, &Edge::ALL, &[a], 5.0).best_x.unwrap();
        assert_eq!(ab.distance, ba.distance, "gap {gap}");
        assert_eq!(ab.offset, -ba.offset, "gap {gap}");
    }
}

#[test]
fn threshold_boundary_is_inclusive() {
    let target = [rect("prop_th_t", 0.0, 0.0, 100.0, 100.0)];
    let edges = [Edge::Left];

    let exactly = rect("prop_th_m", 105.0, 500.0, 20.0, 20.0);
    let hit = detect_alignment(&exactly, &edges, &target, 5.0).best_x;
    assert_eq!(hit.map(|c| c.distance), Some(5.0));

    let beyond = rect("prop_th_m", 105.001, 500.0, 20.0, 20.0);
    assert!(detect_alignment(&beyond, &edges, &target, 5.0).best_x.is_none());
}

#[test]
fn equidistant_candidates_all_become_guides() {
    // Moving box spans y 100..140. Two tops and one bottom are 2 away.
    let moving = rect("prop_tie_m", 1000.0, 100.0, 40.0, 40.0);
    let snapshot = [
        rect("prop_tie_a", 0.0, 98.0, 40.0, 300.0),
        rect("prop_tie_b", 200.0, 102.0, 40.0, 300.0),
        rect("prop_tie_c", 400.0, -62.0, 40.0, 200.0),
        // Same line as @prop_tie_a; reported once.
        rect("prop_tie_d", 600.0, 98.0, 40.0, 300.0),
    ];
    let r = detect_alignment(&moving, &Edge::ALL, &snapshot, 5.0);
    assert_eq!(r.guides.horizontal.as_slice(), &[98.0, 102.0, 138.0]);
    assert!(r.guides.vertical.is_empty());
}

// ─── Scale ───────────────────────────────────────────────────────────────

#[test]
fn snap_decisions_are_scale_invariant() {
    let scene = include_str!("fixtures/gap_pair.scene");
    let mut at_1x = session_with(scene, 5.0);
    let mut at_2x = session_with(scene, 10.0);
    begin_drag(&mut at_1x, "mover");
    begin_drag(&mut at_2x, "mover");

    let mut x = 90.0;
    while x <= 170.0 {
        let frame = GestureFrame::drag(CanvasPoint::new(x, 203.0), CanvasSize::new(100.0, 50.0));
        let a = at_1x.tick(&frame);
        let b = at_2x.tick(&frame.clone().with_scale(2.0));
        assert_eq!(a, b, "x = {x}");
        assert_eq!(*at_1x.published(), *at_2x.published(), "x = {x}");
        x += 0.5;
    }
}

#[test]
fn zooming_in_shrinks_the_canvas_tolerance() {
    let scene = include_str!("fixtures/gap_pair.scene");
    let mut s = session_with(scene, 5.0);
    begin_drag(&mut s, "mover");
    // Left edge 3 canvas units from @left's right edge.
    let frame = GestureFrame::drag(CanvasPoint::new(103.0, 200.0), CanvasSize::new(100.0, 50.0));
    assert!(s.tick(&frame).snapped_x);
    // At 2x the same 3 units are 6 screen pixels.
    assert!(!s.tick(&frame.with_scale(2.0)).snapped_x);
}

// ─── Scope and snapshot ──────────────────────────────────────────────────

#[test]
fn dragged_subtree_never_enters_the_snapshot() {
    let sg = parse_scene(include_str!("fixtures/board.scene")).unwrap();
    let moving = [NodeId::intern("panel")];
    let forbidden = ["panel", "title", "thumb", "caption"].map(NodeId::intern);

    let mut with_children = SnapConfig::default();
    with_children.set_show_child_elements(true);
    let mut limited = SnapConfig::default();
    limited.set_scope_limit(Some(
        ["title", "thumb", "caption", "card_1", "panel"]
            .map(NodeId::intern)
            .to_vec(),
    ));

    for config in [SnapConfig::default(), with_children, limited] {
        let scope = configure_scope(&sg, &moving, &config);
        let snapshot = build_snapshot(&sg, &scope, &moving);
        assert!(!snapshot.is_empty(), "{:?}", scope.mode);
        for b in &snapshot {
            assert!(!forbidden.contains(&b.id), "{} leaked in {:?}", b.id, scope.mode);
        }
    }
}

// ─── Spacing ─────────────────────────────────────────────────────────────

#[test]
fn gap_centering_snaps_within_threshold_only() {
    let mut s = session_with(include_str!("fixtures/gap_pair.scene"), 5.0);
    begin_drag(&mut s, "mover");
    let size = CanvasSize::new(100.0, 50.0);

    let out = s.tick(&GestureFrame::drag(CanvasPoint::new(152.0, 0.0), size));
    assert_eq!(out.position.x, 150.0);
    let state = s.published();
    let spacing = state.spacing.as_ref().unwrap();
    assert_eq!(spacing.target_position, 150.0);
    assert_eq!(spacing.gap_distance, 50.0);

    let out = s.tick(&GestureFrame::drag(CanvasPoint::new(160.0, 0.0), size));
    assert_eq!(out.position.x, 160.0);
    assert!(!out.snapped_x);
    assert!(s.published().spacing.is_none());
}

#[test]
fn pattern_continuation_repeats_the_pair_gap() {
    let scene = r#"
frame @pc_first { x: 40 y: 0 w: 60 h: 50 }
frame @pc_second { x: 140 y: 0 w: 20 h: 50 }
frame @pc_third { x: 0 y: 300 w: 60 h: 50 }
"#;
    let mut s = session_with(scene, 5.0);
    begin_drag(&mut s, "pc_third");
    let out = s.tick(&GestureFrame::drag(
        CanvasPoint::new(202.0, 0.0),
        CanvasSize::new(60.0, 50.0),
    ));
    assert_eq!(out.position.x, 200.0);
    let state = s.published();
    let spacing = state.spacing.as_ref().unwrap();
    assert_eq!(spacing.axis, Axis::X);
    assert_eq!(spacing.gap_distance, 40.0);
    let bands: Vec<(f32, f32)> = spacing.segments.iter().map(|s| (s.start, s.end)).collect();
    assert_eq!(bands, vec![(100.0, 140.0), (160.0, 200.0)]);
}

#[test]
fn boxes_without_cross_axis_overlap_never_pair() {
    let params = SpacingParams {
        tolerance: 5.0,
        locality_margin: 600.0,
        min_family_overlap: 0.01,
    };
    let snapshot = [
        // Diagonal: 100 apart on X, no shared vertical span.
        rect("prop_ff_a", 0.0, 0.0, 100.0, 50.0),
        rect("prop_ff_b", 200.0, 100.0, 100.0, 50.0),
        // A real row with the same 100 gap, far away.
        rect("prop_ff_c", 0.0, 3000.0, 100.0, 50.0),
        rect("prop_ff_d", 200.0, 3000.0, 100.0, 50.0),
    ];
    let pairs = neighbor_pairs(&snapshot, Axis::X, params.min_family_overlap);
    let ids: Vec<(NodeId, NodeId)> = pairs.iter().map(|p| (p.first.id, p.second.id)).collect();
    assert_eq!(
        ids,
        vec![(NodeId::intern("prop_ff_c"), NodeId::intern("prop_ff_d"))]
    );

    // Right where continuing A → B would land.
    let moving = rect("prop_ff_m", 401.0, 100.0, 100.0, 50.0);
    assert!(detect_spacing(&moving, &snapshot, Axis::X, &params).is_none());
}
