//! The scene-graph seam consumed by the snap engine.
//!
//! The engine never owns nodes. It asks an injected [`SceneAccess`] for ids,
//! geometry and hierarchy, so it can run against the in-memory
//! [`SceneGraph`](crate::model::SceneGraph) or any host-provided scene.

use crate::geometry::Bounds;
use crate::id::NodeId;

/// Which node ids a candidate listing should return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeFilter {
    /// Parentless (top-level) canvas nodes.
    TopLevel,
    /// Immediate children of a node, in z-order.
    ChildrenOf(NodeId),
    /// Every descendant of a node (pre-order), the node itself excluded.
    DescendantsOf(NodeId),
    /// Exactly these ids, minus any that no longer exist.
    Only(Vec<NodeId>),
}

/// Read-only access to scene identity, geometry and hierarchy.
pub trait SceneAccess {
    fn list_candidate_node_ids(&self, filter: &ScopeFilter) -> Vec<NodeId>;

    /// Canvas-space bounding box, or `None` if it cannot be resolved.
    fn bounding_box(&self, id: NodeId) -> Option<Bounds>;

    /// Ancestors of `id`, nearest first. The implicit canvas root is not included.
    fn ancestor_chain(&self, id: NodeId) -> Vec<NodeId>;

    fn is_layout_boundary(&self, id: NodeId) -> bool;

    fn is_locked(&self, id: NodeId) -> bool;

    /// Nearest ancestor flagged as a layout boundary.
    fn family_of(&self, id: NodeId) -> Option<NodeId> {
        self.ancestor_chain(id)
            .into_iter()
            .find(|&a| self.is_layout_boundary(a))
    }
}

impl<T: SceneAccess + ?Sized> SceneAccess for &T {
    fn list_candidate_node_ids(&self, filter: &ScopeFilter) -> Vec<NodeId> {
        (**self).list_candidate_node_ids(filter)
    }

    fn bounding_box(&self, id: NodeId) -> Option<Bounds> {
        (**self).bounding_box(id)
    }

    fn ancestor_chain(&self, id: NodeId) -> Vec<NodeId> {
        (**self).ancestor_chain(id)
    }

    fn is_layout_boundary(&self, id: NodeId) -> bool {
        (**self).is_layout_boundary(id)
    }

    fn is_locked(&self, id: NodeId) -> bool {
        (**self).is_locked(id)
    }
}
