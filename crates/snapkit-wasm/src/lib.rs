//! WASM bridge for Snapkit: drives snap sessions from a browser host.
//!
//! The host loads a scene, reports the pan/zoom transform, then calls
//! `begin_*` / `tick_screen` / `end` around each pointer gesture. Results
//! come back as JSON strings so the JS side needs no generated bindings for
//! the guide types.

use snapkit_core::id::NodeId;
use snapkit_core::parser::parse_scene;
use snapkit_core::scene::SceneAccess;
use snapkit_core::{CanvasPoint, CanvasSize, CanvasTransform, SceneGraph, ScreenPoint, SnapConfig};
use snapkit_engine::{
    BeginOutcome, CancelReason, GestureFrame, GestureKind, GestureStart, Modifiers, ResizeHandle,
    SnapOutcome, SnapSession,
};
use wasm_bindgen::prelude::*;

/// The WASM-facing snap controller.
///
/// Owns the scene graph and the snap session. One gesture runs at a time.
#[wasm_bindgen]
pub struct GuideCanvas {
    session: SnapSession,
    transform: CanvasTransform,
    /// Kind of the gesture in progress; reused for every tick.
    kind: GestureKind,
}

impl Default for GuideCanvas {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl GuideCanvas {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook_setup();
        Self {
            session: SnapSession::new(SceneGraph::new(), SnapConfig::default()),
            transform: CanvasTransform::default(),
            kind: GestureKind::Drag,
        }
    }

    /// Replace the scene with parsed scene text.
    /// Returns `false` on parse error and keeps the previous scene.
    pub fn set_scene(&mut self, text: &str) -> bool {
        match parse_scene(text) {
            Ok(graph) => {
                self.session.reset();
                *self.session.scene_mut() = graph;
                true
            }
            Err(e) => {
                log::warn!("scene rejected: {e}");
                false
            }
        }
    }

    /// Current pan and zoom. A non-positive scale is stored as-is; ticks
    /// then pass positions through unsnapped until it is fixed.
    pub fn set_transform(&mut self, offset_x: f32, offset_y: f32, scale: f32) {
        self.transform = CanvasTransform::new(offset_x, offset_y, scale);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.session.set_enabled(enabled);
    }

    /// Snap threshold in screen pixels.
    pub fn set_snap_threshold(&mut self, px: f32) {
        self.session.set_snap_threshold(px);
    }

    /// `null` clears the limit; otherwise a JSON array of node ids.
    /// Returns `false` if the JSON is malformed.
    pub fn set_scope_limit(&mut self, json: &str) -> bool {
        match serde_json::from_str::<Option<Vec<NodeId>>>(json) {
            Ok(ids) => {
                self.session.set_scope_limit(ids);
                true
            }
            Err(_) => false,
        }
    }

    /// Start dragging the nodes in a JSON id array.
    /// Returns `"started"`, `"locked"`, `"disabled"`, `"empty"` or `"invalid"`.
    pub fn begin_drag(&mut self, ids_json: &str) -> String {
        let Ok(ids) = serde_json::from_str::<Vec<NodeId>>(ids_json) else {
            return "invalid".to_string();
        };
        self.begin(ids, GestureKind::Drag)
    }

    /// Start resizing one node from a named handle (`"top-left"`, `"right"`, ...).
    pub fn begin_resize(&mut self, id: &str, handle: &str) -> String {
        let Some(handle) = ResizeHandle::from_name(handle) else {
            return "invalid".to_string();
        };
        self.begin(vec![NodeId::intern(id)], GestureKind::Resize(handle))
    }

    /// Run one frame. `sx`/`sy` is the moving box's top-left in screen
    /// pixels; `width`/`height` are canvas units.
    ///
    /// Returns the corrected geometry as JSON, or `{"ok":false}` when the
    /// screen point cannot be mapped. Guides from earlier frames are
    /// dropped in that case.
    pub fn tick_screen(
        &mut self,
        sx: f32,
        sy: f32,
        width: f32,
        height: f32,
        shift: bool,
    ) -> String {
        let Some(position) = self.transform.to_canvas(ScreenPoint::new(sx, sy)) else {
            self.session.clear_published();
            return r#"{"ok":false}"#.to_string();
        };
        let frame = GestureFrame {
            moving: Vec::new(),
            position,
            size: CanvasSize::new(width, height),
            kind: self.kind,
            modifiers: Modifiers {
                shift,
                ..Modifiers::NONE
            },
            scale: self.transform.scale,
        };
        outcome_json(&self.session.tick(&frame))
    }

    /// Pointer released.
    pub fn end(&mut self) {
        self.session.end();
        self.kind = GestureKind::Drag;
    }

    /// Gesture abandoned. Unknown reasons are treated as focus loss.
    pub fn cancel(&mut self, reason: &str) {
        let reason = match reason {
            "drop-target" => CancelReason::DropTarget,
            "mode-switch" => CancelReason::ModeSwitch,
            "locked" => CancelReason::Locked,
            _ => CancelReason::FocusLost,
        };
        self.session.cancel(reason);
        self.kind = GestureKind::Drag;
    }

    /// Published guide state as JSON: `{"guides":{...},"spacing":...}`.
    pub fn guides_json(&self) -> String {
        serde_json::to_string(&*self.session.published()).unwrap_or_else(|_| "{}".to_string())
    }
}

impl GuideCanvas {
    fn begin(&mut self, ids: Vec<NodeId>, kind: GestureKind) -> String {
        let origin = ids
            .first()
            .and_then(|&id| self.session.scene().bounding_box(id))
            .map(|b| CanvasPoint::new(b.left, b.top))
            .unwrap_or_default();
        let outcome = self.session.begin(&GestureStart {
            moving: ids,
            kind,
            origin,
        });
        if outcome == BeginOutcome::Started {
            self.kind = kind;
        }
        begin_name(outcome).to_string()
    }
}

fn begin_name(outcome: BeginOutcome) -> &'static str {
    match outcome {
        BeginOutcome::Started => "started",
        BeginOutcome::Locked => "locked",
        BeginOutcome::Disabled => "disabled",
        BeginOutcome::Empty => "empty",
    }
}

fn outcome_json(outcome: &SnapOutcome) -> String {
    match serde_json::to_value(outcome) {
        Ok(mut value) => {
            value["ok"] = serde_json::Value::Bool(true);
            value.to_string()
        }
        Err(_) => r#"{"ok":false}"#.to_string(),
    }
}

/// Set up a panic hook that logs to the browser console.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Snapkit WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone validation (no session needed) ───────────────────────────

/// Validate scene text. Returns JSON: `{"ok":true}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_scene(source: &str) -> String {
    match parse_scene(source) {
        Ok(_) => r#"{"ok":true}"#.to_string(),
        Err(e) => serde_json::json!({ "ok": false, "error": e }).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    const SCENE: &str = r#"
frame @gc_left { x: 0 y: 0 w: 100 h: 50 }
frame @gc_right { x: 300 y: 0 w: 100 h: 50 }
frame @gc_mover { x: 0 y: 400 w: 100 h: 50 }
image @gc_pinned { x: 800 y: 800 w: 10 h: 10 locked }
"#;

    fn canvas() -> GuideCanvas {
        let mut c = GuideCanvas::new();
        assert!(c.set_scene(SCENE));
        c
    }

    fn parse(json: &str) -> Value {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn bad_scene_keeps_the_old_one() {
        let mut c = canvas();
        assert!(!c.set_scene("frame @broken {"));
        assert_eq!(c.begin_drag(r#"["gc_mover"]"#), "started");
    }

    #[test]
    fn begin_reports_outcome() {
        let mut c = canvas();
        assert_eq!(c.begin_drag(r#"["gc_pinned"]"#), "locked");
        assert_eq!(c.begin_drag("[]"), "empty");
        assert_eq!(c.begin_drag("not json"), "invalid");
        assert_eq!(c.begin_resize("gc_mover", "sideways"), "invalid");
        c.set_enabled(false);
        assert_eq!(c.begin_drag(r#"["gc_mover"]"#), "disabled");
    }

    #[test]
    fn tick_converts_screen_to_canvas() {
        let mut c = canvas();
        c.set_snap_threshold(5.0);
        // Pan 20px right and zoom 2x: canvas x 152 is screen x 324.
        c.set_transform(20.0, 0.0, 2.0);
        c.begin_drag(r#"["gc_mover"]"#);
        let out = parse(&c.tick_screen(324.0, 0.0, 100.0, 50.0, false));
        assert_eq!(out["ok"], Value::Bool(true));
        // 2 canvas units is 4 screen pixels, inside the 5px threshold.
        assert_eq!(out["position"]["x"].as_f64(), Some(150.0));
        assert_eq!(out["snappedX"], Value::Bool(true));

        let guides = parse(&c.guides_json());
        assert_eq!(guides["spacing"]["gapDistance"].as_f64(), Some(50.0));
        assert_eq!(guides["spacing"]["segments"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn degenerate_transform_is_not_fatal() {
        let mut c = canvas();
        c.set_transform(0.0, 0.0, 0.0);
        c.begin_drag(r#"["gc_mover"]"#);
        let out = parse(&c.tick_screen(10.0, 10.0, 100.0, 50.0, false));
        assert_eq!(out["ok"], Value::Bool(false));
    }

    #[test]
    fn unmappable_tick_drops_stale_guides() {
        let mut c = canvas();
        c.set_snap_threshold(5.0);
        c.begin_drag(r#"["gc_mover"]"#);
        c.tick_screen(101.0, 300.0, 100.0, 50.0, false);
        let guides = parse(&c.guides_json());
        assert_eq!(guides["guides"]["vertical"][0].as_f64(), Some(100.0));

        c.set_transform(0.0, 0.0, 0.0);
        c.tick_screen(101.0, 300.0, 100.0, 50.0, false);
        assert_eq!(
            c.guides_json(),
            r#"{"guides":{"horizontal":[],"vertical":[]},"spacing":null}"#
        );
    }

    #[test]
    fn resize_tick_changes_size_only() {
        let mut c = canvas();
        assert_eq!(c.begin_resize("gc_mover", "right"), "started");
        // Right edge at 297, three short of @gc_right.
        let out = parse(&c.tick_screen(200.0, 400.0, 97.0, 50.0, false));
        assert_eq!(out["position"]["x"].as_f64(), Some(200.0));
        assert_eq!(out["size"]["width"].as_f64(), Some(100.0));
    }

    #[test]
    fn end_and_cancel_clear_guides() {
        let mut c = canvas();
        c.begin_drag(r#"["gc_mover"]"#);
        c.tick_screen(101.0, 0.0, 100.0, 50.0, false);
        assert_ne!(
            c.guides_json(),
            r#"{"guides":{"horizontal":[],"vertical":[]},"spacing":null}"#
        );
        c.end();
        c.end();
        assert_eq!(
            c.guides_json(),
            r#"{"guides":{"horizontal":[],"vertical":[]},"spacing":null}"#
        );
        c.cancel("focus-lost");
        assert_eq!(
            c.guides_json(),
            r#"{"guides":{"horizontal":[],"vertical":[]},"spacing":null}"#
        );
    }

    #[test]
    fn scope_limit_json() {
        let mut c = canvas();
        assert!(c.set_scope_limit(r#"["gc_left"]"#));
        assert!(c.set_scope_limit("null"));
        assert!(!c.set_scope_limit("{"));
    }

    #[test]
    fn validate_reports_errors() {
        assert_eq!(validate_scene(SCENE), r#"{"ok":true}"#);
        let v = parse(&validate_scene("frame @a {} frame @a {}"));
        assert_eq!(v["ok"], Value::Bool(false));
        assert!(v["error"].as_str().is_some());
    }
}
