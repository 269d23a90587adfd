//! Alignment and equal-spacing guides for canvas drag and resize gestures.
//!
//! A [`SnapSession`] owns the scene and config, picks a [`SnapScope`] when a
//! gesture begins, and on every frame returns corrected geometry plus a
//! [`GuideState`] for the renderer to draw.

pub mod align;
pub mod gaps;
pub mod gesture;
pub mod guides;
pub mod scope;
pub mod session;
pub mod snapshot;
pub mod spacing;

pub use align::{AlignmentResult, detect_alignment};
pub use gaps::collect_gap_segments;
pub use gesture::{GestureFrame, GestureKind, GestureStart, Modifiers, ResizeHandle};
pub use guides::{ActiveGuide, GuideState, Segment, SnapCandidate, SnapOutcome, SpacingMatch};
pub use scope::{ScopeMode, SnapScope, configure_scope};
pub use session::{BeginOutcome, CancelReason, SessionPhase, SnapSession};
pub use snapshot::build_snapshot;
pub use spacing::{SpacingCandidate, SpacingKind, SpacingParams, detect_spacing};
