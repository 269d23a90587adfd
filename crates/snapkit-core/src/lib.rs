pub mod config;
pub mod coords;
pub mod geometry;
pub mod id;
pub mod model;
pub mod parser;
pub mod scene;

pub use config::SnapConfig;
pub use coords::{CanvasPoint, CanvasSize, CanvasTransform, ScreenPoint};
pub use geometry::{Axis, Bounds, Edge, SnapBox};
pub use id::NodeId;
pub use model::{Frame, NodeKind, SceneGraph, SceneNode};
pub use parser::parse_scene;
pub use scene::{SceneAccess, ScopeFilter};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
