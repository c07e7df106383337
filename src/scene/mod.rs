//! Scene descriptions
//!
//! Serializable documents for transform hierarchies, loadable from RON or
//! JSON and convertible to and from a live graph.

mod document;

pub use document::{InstantiatedScene, NodeDesc, SceneDoc, SceneError};
