//! Scene document serialization and deserialization
//!
//! A [`SceneDoc`] is a flat, order-dependent description of a transform
//! hierarchy: parents are referenced by index into the node list and must
//! appear before their children, which makes cyclic documents
//! unrepresentable. Documents round-trip through RON (Rusty Object Notation)
//! or JSON and can be instantiated into a live [`TransformGraph`] or captured
//! back out of one.

use std::fs;
use std::path::Path;

use glam::Vec2;
use log::info;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::transform::{NodeId, TransformGraph};

fn unit_scale() -> Vec2 {
    Vec2::ONE
}

/// A serializable transform node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDesc {
    /// Optional node name, used for lookup after instantiation
    #[serde(default)]
    pub name: Option<String>,
    /// Local position
    #[serde(default)]
    pub position: Vec2,
    /// Local rotation in radians, clockwise-positive
    #[serde(default)]
    pub rotation: f32,
    /// Local scale
    #[serde(default = "unit_scale")]
    pub scale: Vec2,
    /// Parent node index; must be less than this node's own index
    #[serde(default)]
    pub parent: Option<usize>,
}

impl Default for NodeDesc {
    fn default() -> Self {
        Self {
            name: None,
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            parent: None,
        }
    }
}

/// A serializable scene containing a forest of transform nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDoc {
    /// Scene name
    pub name: String,
    /// Scene version for compatibility
    pub version: u32,
    /// All nodes, parents strictly before children
    pub nodes: Vec<NodeDesc>,
}

/// Handles produced by instantiating a [`SceneDoc`] into a graph.
#[derive(Debug, Default)]
pub struct InstantiatedScene {
    /// One id per document node, in document order
    pub nodes: Vec<NodeId>,
    /// Named nodes; a repeated name keeps the later node
    pub by_name: FxHashMap<String, NodeId>,
}

impl InstantiatedScene {
    /// Look up an instantiated node by its document name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }
}

impl SceneDoc {
    /// Create a new empty scene
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: 1,
            nodes: Vec::new(),
        }
    }

    /// Add a node to the scene, returning its index
    pub fn add_node(&mut self, node: NodeDesc) -> usize {
        let index = self.nodes.len();
        self.nodes.push(node);
        index
    }

    /// Get the number of nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the scene is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Save the scene to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SceneError::SerializeError(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| SceneError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a scene from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let content = fs::read_to_string(path).map_err(|e| SceneError::IoError(e.to_string()))?;
        let doc: SceneDoc =
            ron::from_str(&content).map_err(|e| SceneError::DeserializeError(e.to_string()))?;
        Ok(doc)
    }

    /// Save the scene to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| SceneError::SerializeError(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| SceneError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a scene from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let content = fs::read_to_string(path).map_err(|e| SceneError::IoError(e.to_string()))?;
        let doc: SceneDoc = serde_json::from_str(&content)
            .map_err(|e| SceneError::DeserializeError(e.to_string()))?;
        Ok(doc)
    }

    /// Build the described hierarchy inside `graph`.
    ///
    /// Parent indices are validated up front, so a malformed document leaves
    /// the graph untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidParent`] if a node references itself, a
    /// later node, or an out-of-range index as its parent.
    pub fn instantiate(
        &self,
        graph: &mut TransformGraph,
    ) -> Result<InstantiatedScene, SceneError> {
        for (index, desc) in self.nodes.iter().enumerate() {
            if let Some(parent) = desc.parent {
                if parent >= index {
                    return Err(SceneError::InvalidParent {
                        node: index,
                        parent,
                    });
                }
            }
        }

        let mut nodes = Vec::with_capacity(self.nodes.len());
        let mut by_name = FxHashMap::default();

        for desc in &self.nodes {
            let id = graph.insert();
            graph.set_transform(id, desc.position, desc.rotation, desc.scale);
            if let Some(parent) = desc.parent {
                graph.set_parent(id, Some(nodes[parent]));
            }
            if let Some(name) = &desc.name {
                by_name.insert(name.clone(), id);
            }
            nodes.push(id);
        }

        info!(
            "instantiated scene '{}' with {} nodes",
            self.name,
            nodes.len()
        );
        Ok(InstantiatedScene { nodes, by_name })
    }

    /// Snapshot every live node of `graph` into a document.
    ///
    /// Nodes are emitted depth-first from the roots so parents always precede
    /// children. Graph nodes carry no names, so every captured node's `name`
    /// is `None`.
    #[must_use]
    pub fn capture(name: impl Into<String>, graph: &TransformGraph) -> Self {
        let mut doc = Self::new(name);
        let mut index_of: FxHashMap<NodeId, usize> = FxHashMap::default();

        let mut stack: Vec<NodeId> = graph
            .iter()
            .filter(|(_, node)| {
                node.parent().map_or(true, |parent| !graph.contains(parent))
            })
            .map(|(id, _)| id)
            .collect();
        stack.reverse();

        while let Some(id) = stack.pop() {
            let Some(node) = graph.node(id) else { continue };
            let parent = node.parent().and_then(|p| index_of.get(&p).copied());
            let index = doc.add_node(NodeDesc {
                name: None,
                position: node.position(),
                rotation: node.rotation(),
                scale: node.scale(),
                parent,
            });
            index_of.insert(id, index);
            for child in node.children().iter() {
                stack.push(*child);
            }
        }

        doc
    }
}

impl Default for SceneDoc {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Errors that can occur during scene document operations
#[derive(Debug, Clone)]
pub enum SceneError {
    /// IO error
    IoError(String),
    /// Serialization error
    SerializeError(String),
    /// Deserialization error
    DeserializeError(String),
    /// A node references itself, a later node, or an out-of-range parent
    InvalidParent { node: usize, parent: usize },
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
            Self::InvalidParent { node, parent } => {
                write!(f, "node {node} has invalid parent index {parent}")
            }
        }
    }
}

impl std::error::Error for SceneError {}
