//! Scope selection: which nodes may act as snap targets for one gesture.
//!
//! Computed once at gesture start. A node nested inside a layout boundary
//! snaps against its siblings and the boundary itself; a top-level node
//! snaps against other top-level nodes. An explicit id limit from the
//! config overrides both.

use snapkit_core::id::NodeId;
use snapkit_core::scene::{SceneAccess, ScopeFilter};
use snapkit_core::SnapConfig;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeMode {
    /// Free top-level canvas node: other top-level nodes only.
    FreeCanvas,
    /// Node inside a parent: siblings, plus the nearest layout boundary.
    Nested {
        parent: NodeId,
        boundary: Option<NodeId>,
    },
    /// Restricted by `SnapConfig::limit_to_node_ids`.
    Limited,
}

/// The fixed candidate set for one gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapScope {
    pub mode: ScopeMode,
    /// Candidate ids in z-order, moving subtree already removed.
    pub candidates: Vec<NodeId>,
    /// Moving ids and all of their descendants.
    pub excluded: HashSet<NodeId>,
}

impl SnapScope {
    pub fn empty() -> Self {
        Self {
            mode: ScopeMode::FreeCanvas,
            candidates: Vec::new(),
            excluded: HashSet::new(),
        }
    }
}

/// Decide the scope for a gesture moving `moving`.
///
/// The first moving id decides the hierarchy mode; every moving id and its
/// descendants are excluded.
pub fn configure_scope<S: SceneAccess + ?Sized>(
    scene: &S,
    moving: &[NodeId],
    config: &SnapConfig,
) -> SnapScope {
    let Some(&primary) = moving.first() else {
        return SnapScope::empty();
    };

    let mut excluded: HashSet<NodeId> = HashSet::new();
    for &id in moving {
        excluded.insert(id);
        excluded.extend(scene.list_candidate_node_ids(&ScopeFilter::DescendantsOf(id)));
    }

    let chain = scene.ancestor_chain(primary);

    let (mode, mut candidates) = if let Some(limit) = &config.limit_to_node_ids {
        let mut ids = scene.list_candidate_node_ids(&ScopeFilter::Only(limit.clone()));
        if let Some(&topmost) = chain.last() {
            ids.push(topmost);
        }
        (ScopeMode::Limited, ids)
    } else if let Some(&parent) = chain.first() {
        let boundary = chain
            .iter()
            .copied()
            .find(|&a| scene.is_layout_boundary(a));
        let mut ids = scene.list_candidate_node_ids(&ScopeFilter::ChildrenOf(parent));
        if let Some(b) = boundary {
            ids.push(b);
        }
        (ScopeMode::Nested { parent, boundary }, ids)
    } else {
        (
            ScopeMode::FreeCanvas,
            scene.list_candidate_node_ids(&ScopeFilter::TopLevel),
        )
    };

    if config.show_child_elements {
        let roots: Vec<NodeId> = candidates
            .iter()
            .copied()
            .filter(|id| !excluded.contains(id))
            .collect();
        for id in roots {
            candidates.extend(scene.list_candidate_node_ids(&ScopeFilter::DescendantsOf(id)));
        }
    }

    let mut seen = HashSet::new();
    candidates.retain(|id| !excluded.contains(id) && seen.insert(*id));

    log::debug!(
        "snap scope for {primary}: {mode:?}, {} candidates, {} excluded",
        candidates.len(),
        excluded.len()
    );

    SnapScope {
        mode,
        candidates,
        excluded,
    }
}
