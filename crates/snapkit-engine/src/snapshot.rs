//! Box snapshot builder: scope ids → candidate boxes for one detection pass.
//!
//! Best-effort: an id whose geometry cannot be resolved is dropped and the
//! rest of the snapshot is still produced.

use crate::scope::SnapScope;
use snapkit_core::geometry::SnapBox;
use snapkit_core::id::NodeId;
use snapkit_core::scene::SceneAccess;
use std::collections::HashSet;

/// Build the candidate boxes for `scope`, in scope order.
///
/// The moving nodes and every descendant of a moving node are never
/// included, whether or not the scope already excluded them.
pub fn build_snapshot<S: SceneAccess + ?Sized>(
    scene: &S,
    scope: &SnapScope,
    moving: &[NodeId],
) -> Vec<SnapBox> {
    let moving: HashSet<NodeId> = moving.iter().copied().collect();
    let mut seen = HashSet::with_capacity(scope.candidates.len());
    let mut boxes = Vec::with_capacity(scope.candidates.len());

    for &id in &scope.candidates {
        if scope.excluded.contains(&id) || moving.contains(&id) || !seen.insert(id) {
            continue;
        }
        let chain = scene.ancestor_chain(id);
        if chain.iter().any(|a| moving.contains(a)) {
            continue;
        }
        let Some(bounds) = scene.bounding_box(id) else {
            log::trace!("snapshot: no geometry for {id}, skipped");
            continue;
        };
        if !bounds.is_finite() {
            continue;
        }
        let family = chain.into_iter().find(|&a| scene.is_layout_boundary(a));
        boxes.push(SnapBox::from_bounds(id, bounds, family));
    }

    boxes
}
