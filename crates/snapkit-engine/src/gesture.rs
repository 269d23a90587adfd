//! Gesture input as reported by the host on each frame.
//!
//! ## Modifier behaviors
//!
//! | Modifier | Drag | Resize |
//! |----------|------|--------|
//! | **Shift** | Constrain to dominant axis; pinned axis never snaps | — |

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use snapkit_core::geometry::Edge;
use snapkit_core::id::NodeId;
use snapkit_core::{CanvasPoint, CanvasSize};

/// Edges of the moving box taking part in alignment for one gesture.
pub type ActiveEdges = SmallVec<[Edge; 6]>;

/// Keyboard modifier state at the time of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };
}

/// Which resize handle is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeHandle {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeHandle {
    /// Edges moved by this handle: one for a side handle, one per axis for a corner.
    pub fn edges(self) -> ActiveEdges {
        let edges: &[Edge] = match self {
            ResizeHandle::Top => &[Edge::Top],
            ResizeHandle::Bottom => &[Edge::Bottom],
            ResizeHandle::Left => &[Edge::Left],
            ResizeHandle::Right => &[Edge::Right],
            ResizeHandle::TopLeft => &[Edge::Left, Edge::Top],
            ResizeHandle::TopRight => &[Edge::Right, Edge::Top],
            ResizeHandle::BottomLeft => &[Edge::Left, Edge::Bottom],
            ResizeHandle::BottomRight => &[Edge::Right, Edge::Bottom],
        };
        SmallVec::from_slice(edges)
    }

    /// Parse a host handle name (`"top-left"`, `"right"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "top" => ResizeHandle::Top,
            "bottom" => ResizeHandle::Bottom,
            "left" => ResizeHandle::Left,
            "right" => ResizeHandle::Right,
            "top-left" => ResizeHandle::TopLeft,
            "top-right" => ResizeHandle::TopRight,
            "bottom-left" => ResizeHandle::BottomLeft,
            "bottom-right" => ResizeHandle::BottomRight,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    Drag,
    Resize(ResizeHandle),
}

impl GestureKind {
    /// A drag aligns all six edges; a resize only the edges its handle moves.
    pub fn active_edges(self) -> ActiveEdges {
        match self {
            GestureKind::Drag => SmallVec::from_slice(&Edge::ALL),
            GestureKind::Resize(handle) => handle.edges(),
        }
    }

    pub fn is_drag(self) -> bool {
        matches!(self, GestureKind::Drag)
    }
}

/// Sent once when a drag or resize begins.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureStart {
    pub moving: Vec<NodeId>,
    pub kind: GestureKind,
    /// Top-left of the moving box when the gesture began.
    pub origin: CanvasPoint,
}

/// Sent on every animation frame while the gesture continues.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureFrame {
    /// Ids being moved. Empty means "same as at gesture start".
    pub moving: Vec<NodeId>,
    /// Pointer-derived top-left of the moving box, canvas space.
    pub position: CanvasPoint,
    pub size: CanvasSize,
    pub kind: GestureKind,
    pub modifiers: Modifiers,
    /// Current zoom scale, used to convert the on-screen snap tolerance.
    pub scale: f32,
}

impl GestureFrame {
    /// A plain drag frame at 100% zoom.
    pub fn drag(position: CanvasPoint, size: CanvasSize) -> Self {
        Self {
            moving: Vec::new(),
            position,
            size,
            kind: GestureKind::Drag,
            modifiers: Modifiers::NONE,
            scale: 1.0,
        }
    }

    /// A resize frame at 100% zoom.
    pub fn resize(position: CanvasPoint, size: CanvasSize, handle: ResizeHandle) -> Self {
        Self {
            kind: GestureKind::Resize(handle),
            ..Self::drag(position, size)
        }
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}
