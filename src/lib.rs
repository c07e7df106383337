//! A hierarchical 2D transform library
//!
//! This library provides:
//! - A transform graph with lazily cached local and world matrices
//! - Dirty tracking that discovers ancestor changes at read time
//! - Generational node handles backed by a slot arena
//! - Scene documents loadable from RON or JSON
//!
//! Hierarchies must stay acyclic; see
//! [`TransformGraph::set_parent`](transform::TransformGraph::set_parent) for how
//! cycles are rejected.

pub mod math;
pub mod scene;
pub mod transform;

// Re-exports for convenience
pub use glam;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::transform::{Children, DirtyFlags, Node, NodeId, TransformGraph};
    pub use crate::scene::{InstantiatedScene, NodeDesc, SceneDoc, SceneError};
    pub use glam::{Affine2, Vec2};
}
