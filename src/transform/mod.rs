//! Hierarchical 2D transform graph
//!
//! Nodes own local position/rotation/scale and cache two affine matrices: a
//! local matrix (node frame to parent frame) and a world matrix (node frame
//! to root frame). Mutations only flip dirty state; matrices are recomputed
//! lazily on read. Invalidation travels parent-to-descendant through
//! per-node dirty stamps compared at read time, so restructuring the
//! hierarchy never has listener lists to maintain.

mod arena;
mod graph;
mod hierarchy;
mod node;

pub use arena::{Arena, NodeId};
pub use graph::TransformGraph;
pub use hierarchy::Children;
pub use node::{DirtyFlags, Node};
