//! In-memory scene graph.
//!
//! A directed tree (petgraph `StableDiGraph`) rooted at an implicit canvas
//! root. Each node carries a parent-relative [`Frame`]; canvas-space bounds
//! are resolved on demand by summing ancestor offsets.

use crate::coords::CanvasPoint;
use crate::geometry::Bounds;
use crate::id::NodeId;
use crate::scene::{SceneAccess, ScopeFilter};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use std::collections::HashMap;

/// What kind of element a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The implicit canvas root. Never a snap candidate.
    Root,
    /// A responsive viewport (e.g. desktop/tablet/mobile artboard).
    Viewport,
    Frame,
    Group,
    Text,
    Image,
}

impl NodeKind {
    /// Viewports and frames scope which siblings snap together.
    pub fn is_layout_boundary(self) -> bool {
        matches!(self, NodeKind::Viewport | NodeKind::Frame)
    }

    pub fn keyword(self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Viewport => "viewport",
            NodeKind::Frame => "frame",
            NodeKind::Group => "group",
            NodeKind::Text => "text",
            NodeKind::Image => "image",
        }
    }
}

/// Parent-relative geometry of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A single node in the scene.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: NodeId,
    pub kind: NodeKind,
    /// `None` until layout has produced geometry for this node.
    pub frame: Option<Frame>,
    /// Locked nodes cannot be dragged or resized.
    pub locked: bool,
}

impl SceneNode {
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            frame: None,
            locked: false,
        }
    }

    #[must_use]
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = Some(frame);
        self
    }

    #[must_use]
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }
}

/// The scene graph: node tree plus an id index.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    pub graph: StableDiGraph<SceneNode, ()>,
    pub root: NodeIndex,
    pub id_index: HashMap<NodeId, NodeIndex>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create an empty scene containing only the root.
    #[must_use]
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root_id = NodeId::intern("root");
        let root = graph.add_node(SceneNode::new(root_id, NodeKind::Root));
        let mut id_index = HashMap::new();
        id_index.insert(root_id, root);
        Self {
            graph,
            root,
            id_index,
        }
    }

    /// Add a node as a child of `parent`. Returns the new node's index.
    pub fn add_node(&mut self, parent: NodeIndex, node: SceneNode) -> NodeIndex {
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.graph.add_edge(parent, idx, ());
        self.id_index.insert(id, idx);
        idx
    }

    /// Add a node under the node named `parent_id`. Returns `None` if the
    /// parent does not exist.
    pub fn add_child(&mut self, parent_id: NodeId, node: SceneNode) -> Option<NodeIndex> {
        let parent = self.index_of(parent_id)?;
        Some(self.add_node(parent, node))
    }

    /// Remove a node and its whole subtree, keeping `id_index` in sync.
    pub fn remove_node(&mut self, idx: NodeIndex) -> Option<SceneNode> {
        if idx == self.root {
            return None;
        }
        for child in self.children(idx) {
            self.remove_node(child);
        }
        let removed = self.graph.remove_node(idx);
        if let Some(node) = &removed {
            self.id_index.remove(&node.id);
        }
        removed
    }

    pub fn get_by_id(&self, id: NodeId) -> Option<&SceneNode> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn get_by_id_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    /// Children sorted by `NodeIndex`.
    ///
    /// This is insertion order until `remove_node` frees an index that a
    /// later `add_node` reuses. The result never depends on petgraph's
    /// adjacency iteration order.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children
    }

    /// Replace a node's parent-relative frame.
    pub fn set_frame(&mut self, id: NodeId, frame: Frame) -> bool {
        match self.get_by_id_mut(id) {
            Some(node) => {
                node.frame = Some(frame);
                true
            }
            None => false,
        }
    }

    /// Move a node so its canvas-space top-left lands on `target`.
    /// Returns `false` if the node or its parent's origin cannot be resolved.
    pub fn move_to(&mut self, id: NodeId, target: CanvasPoint) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let Some(parent) = self.parent(idx) else {
            return false;
        };
        let Some((ox, oy)) = self.origin_of(parent) else {
            return false;
        };
        match self.graph[idx].frame.as_mut() {
            Some(frame) => {
                frame.x = target.x - ox;
                frame.y = target.y - oy;
                true
            }
            None => false,
        }
    }

    /// Canvas-space origin of a node's coordinate system.
    /// The root sits at (0, 0); any frameless ancestor makes it unresolvable.
    fn origin_of(&self, idx: NodeIndex) -> Option<(f32, f32)> {
        let mut x = 0.0;
        let mut y = 0.0;
        let mut cursor = idx;
        while cursor != self.root {
            let frame = self.graph.node_weight(cursor)?.frame?;
            x += frame.x;
            y += frame.y;
            cursor = self.parent(cursor)?;
        }
        Some((x, y))
    }

    fn collect_descendants(&self, idx: NodeIndex, out: &mut Vec<NodeId>) {
        for child in self.children(idx) {
            out.push(self.graph[child].id);
            self.collect_descendants(child, out);
        }
    }
}

impl SceneAccess for SceneGraph {
    fn list_candidate_node_ids(&self, filter: &ScopeFilter) -> Vec<NodeId> {
        match filter {
            ScopeFilter::TopLevel => self
                .children(self.root)
                .into_iter()
                .map(|idx| self.graph[idx].id)
                .collect(),
            ScopeFilter::ChildrenOf(id) => match self.index_of(*id) {
                Some(idx) => self
                    .children(idx)
                    .into_iter()
                    .map(|c| self.graph[c].id)
                    .collect(),
                None => Vec::new(),
            },
            ScopeFilter::DescendantsOf(id) => {
                let mut out = Vec::new();
                if let Some(idx) = self.index_of(*id) {
                    self.collect_descendants(idx, &mut out);
                }
                out
            }
            ScopeFilter::Only(ids) => ids
                .iter()
                .copied()
                .filter(|id| self.index_of(*id).is_some_and(|idx| idx != self.root))
                .collect(),
        }
    }

    fn bounding_box(&self, id: NodeId) -> Option<Bounds> {
        let idx = self.index_of(id)?;
        if idx == self.root {
            return None;
        }
        let frame = self.graph[idx].frame?;
        let (ox, oy) = self.origin_of(self.parent(idx)?)?;
        let b = Bounds::new(ox + frame.x, oy + frame.y, frame.width, frame.height);
        b.is_finite().then_some(b)
    }

    fn ancestor_chain(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let Some(mut cursor) = self.index_of(id) else {
            return chain;
        };
        while let Some(parent) = self.parent(cursor) {
            if parent == self.root {
                break;
            }
            chain.push(self.graph[parent].id);
            cursor = parent;
        }
        chain
    }

    fn is_layout_boundary(&self, id: NodeId) -> bool {
        self.get_by_id(id)
            .is_some_and(|n| n.kind.is_layout_boundary())
    }

    fn is_locked(&self, id: NodeId) -> bool {
        self.get_by_id(id).is_some_and(|n| n.locked)
    }
}
