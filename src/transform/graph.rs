//! The transform graph
//!
//! [`TransformGraph`] owns every node and implements the whole caching
//! protocol: mutators overwrite local state and invalidate, reads lazily
//! recompute whatever the read actually needs. Nothing is pushed eagerly
//! through the hierarchy; a change to an ancestor is discovered on the next
//! read by comparing the ancestor's dirty stamp against the value this node
//! last composed with.
//!
//! # Conventions
//!
//! - A node's world matrix composes its local matrix onto the parent's world
//!   matrix, parent applied first.
//! - A parented node's local matrix scales and rotates about the parent's
//!   local position (see [`trs_about`](crate::math::trs_about)).
//! - Hierarchies must stay acyclic. `set_parent` rejects self-parenting and
//!   asserts against longer cycles in debug builds; release builds treat
//!   acyclicity as a caller precondition, and a hand-made cycle recurses
//!   without bound on read.
//!
//! Reads go through `Cell`s behind `&self`, which also makes the graph
//! `!Sync`: the single-threaded model is enforced by the type system rather
//! than by locks.

use glam::{Affine2, Vec2};
use log::{debug, warn};

use super::arena::{Arena, NodeId};
use super::hierarchy::Children;
use super::node::{DirtyFlags, Node};
use crate::math::{compose, rotation_of, scale_of, translation_of, trs, trs_about};

/// A forest of 2D transform nodes with lazily cached matrices.
#[derive(Debug, Default)]
pub struct TransformGraph {
    arena: Arena<Node>,
}

impl TransformGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    /// Create a graph with pre-allocated node capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Insert a fresh root node: identity transform, unit scale, both caches
    /// stale. Freed slots are reused, with the arena's generation check
    /// keeping ids of previous occupants stale.
    pub fn insert(&mut self) -> NodeId {
        let id = self.arena.insert(Node::new());
        debug!("inserted node {id}");
        id
    }

    /// Insert a fresh node already parented to `parent`.
    ///
    /// Returns `None` if `parent` is stale.
    pub fn insert_child(&mut self, parent: NodeId) -> Option<NodeId> {
        if !self.arena.contains(parent) {
            warn!("insert_child: parent {parent} is stale");
            return None;
        }
        let id = self.insert();
        self.set_parent(id, Some(parent));
        Some(id)
    }

    /// Remove a node.
    ///
    /// The node is unlinked from its parent's children list and each of its
    /// children is detached into a root (parent cleared, fully invalidated).
    /// Any id still referring to the removed node stops resolving.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let Some(node) = self.arena.remove(id) else {
            warn!("remove: node {id} is stale");
            return false;
        };

        if let Some(parent_id) = node.parent {
            if let Some(parent) = self.arena.get_mut(parent_id) {
                parent.children.remove(id);
            }
        }

        // Orphaned children would fail the generation check anyway; an
        // explicit detach keeps their cached worlds from lingering.
        for child_id in node.children.iter().copied() {
            if let Some(child) = self.arena.get_mut(child_id) {
                child.parent = None;
                child.invalidate_all();
            }
        }

        debug!("removed node {id}");
        true
    }

    /// Re-initialize a live node, the pool-recycle contract: parent cleared
    /// (and unlinked from the old parent's children), position `(0,0)`,
    /// rotation `0`, scale `(1,1)`, identity caches, both flags dirty.
    ///
    /// Children stay linked; the stamp bump makes them recompute against the
    /// reset state on their next read.
    pub fn reset(&mut self, id: NodeId) -> bool {
        let Some(node) = self.arena.get(id) else {
            warn!("reset: node {id} is stale");
            return false;
        };
        let old_parent = node.parent;

        if let Some(parent_id) = old_parent {
            if let Some(parent) = self.arena.get_mut(parent_id) {
                parent.children.remove(id);
            }
        }
        if let Some(node) = self.arena.get_mut(id) {
            node.reset_state();
        }

        debug!("reset node {id}");
        true
    }

    /// Drop every node. Ids held across this call must not be reused.
    pub fn clear(&mut self) {
        self.arena.clear();
    }

    // -------------------------------------------------------------------------
    // Mutators
    //
    // Each one overwrites unconditionally and invalidates both caches, even
    // when the new value equals the old. Inputs are not validated; non-finite
    // floats flow into the matrix math unchecked.
    // -------------------------------------------------------------------------

    /// Set the local position.
    pub fn set_position(&mut self, id: NodeId, position: Vec2) -> bool {
        self.mutate(id, "set_position", |node| node.position = position)
    }

    /// Set the local rotation in radians, clockwise-positive.
    pub fn set_rotation(&mut self, id: NodeId, rotation: f32) -> bool {
        self.mutate(id, "set_rotation", |node| node.rotation = rotation)
    }

    /// Set the local scale.
    pub fn set_scale(&mut self, id: NodeId, scale: Vec2) -> bool {
        self.mutate(id, "set_scale", |node| node.scale = scale)
    }

    /// Set position, rotation, and scale at once.
    pub fn set_transform(&mut self, id: NodeId, position: Vec2, rotation: f32, scale: Vec2) -> bool {
        self.mutate(id, "set_transform", |node| {
            node.position = position;
            node.rotation = rotation;
            node.scale = scale;
        })
    }

    /// Translate the local position by a delta.
    pub fn translate(&mut self, id: NodeId, delta: Vec2) -> bool {
        self.mutate(id, "translate", |node| node.position += delta)
    }

    fn mutate(&mut self, id: NodeId, op: &str, f: impl FnOnce(&mut Node)) -> bool {
        match self.arena.get_mut(id) {
            Some(node) => {
                f(node);
                node.invalidate_local();
                node.invalidate_world();
                true
            }
            None => {
                warn!("{op}: node {id} is stale");
                false
            }
        }
    }

    /// Assign or clear the parent link.
    ///
    /// A no-op (returning `true`) when the new parent equals the current one,
    /// including both being `None`; cache validity is untouched in that case.
    /// Otherwise the node is re-linked and marked fully dirty immediately, so
    /// the very next read is computed under the new parent.
    ///
    /// Returns `false` for a stale `id`, a stale parent handle, or
    /// `parent == id`.
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> bool {
        let old_parent = match self.arena.get(id) {
            Some(node) => node.parent,
            None => {
                warn!("set_parent: node {id} is stale");
                return false;
            }
        };
        if old_parent == parent {
            return true;
        }

        if let Some(parent_id) = parent {
            if parent_id == id {
                warn!("set_parent: node {id} cannot be its own parent");
                return false;
            }
            if !self.arena.contains(parent_id) {
                warn!("set_parent: parent {parent_id} is stale");
                return false;
            }
            debug_assert!(
                !self.ancestors(parent_id).any(|ancestor| ancestor == id),
                "reparenting {id} under {parent_id} would create a cycle"
            );
        }

        if let Some(old_id) = old_parent {
            if let Some(old) = self.arena.get_mut(old_id) {
                old.children.remove(id);
            }
        }
        if let Some(new_id) = parent {
            if let Some(new) = self.arena.get_mut(new_id) {
                new.children.add(id);
            }
        }
        if let Some(node) = self.arena.get_mut(id) {
            node.parent = parent;
            node.invalidate_all();
        }

        debug!("node {id} parent changed");
        true
    }

    // -------------------------------------------------------------------------
    // Lazy readers
    // -------------------------------------------------------------------------

    /// The node-to-parent matrix, recomputing if stale.
    ///
    /// Recomputing the local matrix also invalidates the world matrix, since
    /// the world cache composes the local one.
    #[must_use]
    pub fn local_matrix(&self, id: NodeId) -> Option<Affine2> {
        self.arena.get(id).map(|node| self.settle_local(node))
    }

    /// The node-to-root matrix, recomputing the ancestor chain as needed.
    #[must_use]
    pub fn world_matrix(&self, id: NodeId) -> Option<Affine2> {
        self.arena.get(id).map(|node| self.settle_world(node))
    }

    /// Translation component of the world matrix.
    #[must_use]
    pub fn world_position(&self, id: NodeId) -> Option<Vec2> {
        self.world_matrix(id).map(|m| translation_of(&m))
    }

    /// Rotation component of the world matrix, counter-clockwise radians.
    #[must_use]
    pub fn world_rotation(&self, id: NodeId) -> Option<f32> {
        self.world_matrix(id).map(|m| rotation_of(&m))
    }

    /// Scale component of the world matrix.
    #[must_use]
    pub fn world_scale(&self, id: NodeId) -> Option<Vec2> {
        self.world_matrix(id).map(|m| scale_of(&m))
    }

    /// Recompute the local matrix if the flag says it is stale.
    fn settle_local(&self, node: &Node) -> Affine2 {
        if !node.flags.get().contains(DirtyFlags::LOCAL) {
            return node.local.get();
        }

        // A parented node's local matrix reads the parent's local position
        // directly; the parent's own matrix chain is consulted at the world
        // level only.
        let local = match node.parent.and_then(|id| self.arena.get(id)) {
            Some(parent) => trs_about(node.position, node.rotation, node.scale, parent.position),
            None => trs(node.position, node.rotation, node.scale),
        };

        node.local.set(local);
        node.flags.set(node.flags.get().without(DirtyFlags::LOCAL));
        // The world cache composed the old local matrix, so it goes stale
        // here too; the stamp bump carries the change to descendants.
        node.invalidate_world();
        local
    }

    /// Recompute the world matrix if the flag, or an ancestor stamp change,
    /// says it is stale.
    fn settle_world(&self, node: &Node) -> Affine2 {
        let parent = node.parent.and_then(|id| self.arena.get(id));
        // Settle the whole chain first so the parent's stamp is final before
        // the comparison below. A dead parent handle degrades to root
        // behavior.
        let parent_world = parent.map(|p| self.settle_world(p));

        if let Some(parent) = parent {
            if node.parent_seen.get() != parent.stamp.get() {
                // Ancestor changed since this node last composed with it.
                // Both caches go stale: the local matrix depends on the
                // parent's local position, not just the world composition.
                node.flags.set(DirtyFlags::ALL);
            }
        }

        if !node.flags.get().contains(DirtyFlags::WORLD) {
            return node.world.get();
        }

        let local = self.settle_local(node);
        let world = match parent_world {
            Some(parent_world) => compose(parent_world, local),
            None => local,
        };

        node.world.set(world);
        node.flags.set(node.flags.get().without(DirtyFlags::WORLD));
        if let Some(parent) = parent {
            node.parent_seen.set(parent.stamp.get());
        }
        world
    }

    // -------------------------------------------------------------------------
    // Plain reads
    // -------------------------------------------------------------------------

    /// Borrow a node's state without touching the caches.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    /// Local position.
    #[must_use]
    pub fn position(&self, id: NodeId) -> Option<Vec2> {
        self.arena.get(id).map(Node::position)
    }

    /// Local rotation in radians, clockwise-positive.
    #[must_use]
    pub fn rotation(&self, id: NodeId) -> Option<f32> {
        self.arena.get(id).map(Node::rotation)
    }

    /// Local scale.
    #[must_use]
    pub fn scale(&self, id: NodeId) -> Option<Vec2> {
        self.arena.get(id).map(Node::scale)
    }

    /// The node's parent handle, if the node is live and has one.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(Node::parent)
    }

    /// The node's children list.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Option<&Children> {
        self.arena.get(id).map(Node::children)
    }

    /// Walk the ancestor chain: parent, grandparent, and so on. Stops at the
    /// first root or dead handle.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = self.arena.get(id).and_then(Node::parent);
        std::iter::from_fn(move || {
            let id = current?;
            let node = self.arena.get(id)?;
            current = node.parent;
            Some(id)
        })
    }

    /// Check whether an id refers to a live node.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id)
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Check whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Iterate over live nodes with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.arena.iter()
    }

    // -------------------------------------------------------------------------
    // Dirty-state introspection
    // -------------------------------------------------------------------------

    /// Effective local-matrix staleness: the flag itself, or a pending
    /// ancestor change that will invalidate it on the next read.
    #[must_use]
    pub fn is_local_dirty(&self, id: NodeId) -> Option<bool> {
        self.arena
            .get(id)
            .map(|node| node.flags.get().contains(DirtyFlags::LOCAL) || self.chain_stale(node))
    }

    /// Effective world-matrix staleness.
    ///
    /// True if either flag is set (a stale local matrix forces a world
    /// recompute) or any live ancestor has a pending change this node has not
    /// composed with yet. Read-only: no caches are settled.
    #[must_use]
    pub fn is_world_dirty(&self, id: NodeId) -> Option<bool> {
        self.arena
            .get(id)
            .map(|node| !node.flags.get().is_empty() || self.chain_stale(node))
    }

    /// Walk the live ancestor chain looking for a stamp this node's chain has
    /// not seen, or an ancestor with dirty flags of its own.
    fn chain_stale(&self, node: &Node) -> bool {
        let mut child = node;
        while let Some(parent) = child.parent.and_then(|id| self.arena.get(id)) {
            if child.parent_seen.get() != parent.stamp.get() || !parent.flags.get().is_empty() {
                return true;
            }
            child = parent;
        }
        false
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-5;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < EPS
    }

    #[test]
    fn test_root_translation() {
        let mut graph = TransformGraph::new();
        let n = graph.insert();
        graph.set_position(n, Vec2::new(10.0, 0.0));

        let world = graph.world_matrix(n).unwrap();
        assert!(approx(world.translation, Vec2::new(10.0, 0.0)));
        assert!(approx(graph.world_position(n).unwrap(), Vec2::new(10.0, 0.0)));
    }

    #[test]
    fn test_root_world_equals_local() {
        let mut graph = TransformGraph::new();
        let n = graph.insert();
        graph.set_transform(n, Vec2::new(-3.0, 7.0), 0.4, Vec2::new(2.0, 0.5));

        assert_eq!(graph.world_matrix(n), graph.local_matrix(n));

        graph.set_rotation(n, 1.1);
        assert_eq!(graph.world_matrix(n), graph.local_matrix(n));
    }

    #[test]
    fn test_repeated_reads_identical() {
        let mut graph = TransformGraph::new();
        let root = graph.insert();
        let child = graph.insert_child(root).unwrap();
        graph.set_transform(root, Vec2::new(1.0, 2.0), 0.3, Vec2::new(1.5, 1.5));
        graph.set_position(child, Vec2::new(4.0, 0.0));

        let first = graph.world_matrix(child).unwrap();
        let second = graph.world_matrix(child).unwrap();
        assert_eq!(first, second);

        let first = graph.local_matrix(child).unwrap();
        let second = graph.local_matrix(child).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_mutator_sets_dirty_read_clears() {
        let mut graph = TransformGraph::new();
        let n = graph.insert();

        let _ = graph.world_matrix(n);
        assert_eq!(graph.is_world_dirty(n), Some(false));
        assert_eq!(graph.is_local_dirty(n), Some(false));

        graph.set_position(n, Vec2::X);
        assert_eq!(graph.is_world_dirty(n), Some(true));
        assert_eq!(graph.is_local_dirty(n), Some(true));

        let _ = graph.world_matrix(n);
        assert_eq!(graph.is_world_dirty(n), Some(false));
        assert_eq!(graph.is_local_dirty(n), Some(false));
    }

    #[test]
    fn test_mutators_invalidate_unconditionally() {
        let mut graph = TransformGraph::new();
        let n = graph.insert();
        graph.set_position(n, Vec2::X);
        let _ = graph.world_matrix(n);

        // Writing the same value again still invalidates.
        graph.set_position(n, Vec2::X);
        assert_eq!(graph.is_world_dirty(n), Some(true));
    }

    #[test]
    fn test_local_read_invalidates_world() {
        let mut graph = TransformGraph::new();
        let n = graph.insert();
        let _ = graph.world_matrix(n);

        graph.set_rotation(n, 0.5);
        let _ = graph.local_matrix(n);

        // Local is clean now, but refreshing it marked the world stale.
        assert_eq!(graph.is_local_dirty(n), Some(false));
        assert_eq!(graph.is_world_dirty(n), Some(true));
    }

    #[test]
    fn test_parent_child_composition() {
        let mut graph = TransformGraph::new();
        let parent = graph.insert();
        graph.set_position(parent, Vec2::new(5.0, 5.0));
        let child = graph.insert_child(parent).unwrap();
        graph.set_position(child, Vec2::new(1.0, 0.0));

        // Identity rotation/scale collapses the pivot conjugation into a
        // plain offset.
        assert!(approx(graph.world_position(child).unwrap(), Vec2::new(6.0, 5.0)));
    }

    #[test]
    fn test_child_rotates_about_parent_pivot() {
        let mut graph = TransformGraph::new();
        let parent = graph.insert();
        graph.set_position(parent, Vec2::new(5.0, 0.0));
        let child = graph.insert_child(parent).unwrap();
        graph.set_rotation(child, FRAC_PI_2);

        let world = graph.world_matrix(child).unwrap();
        // The child's origin sits on the pivot and is unmoved by its own
        // rotation; a point one unit out swings clockwise around it.
        assert!(approx(world.transform_point2(Vec2::ZERO), Vec2::new(5.0, 0.0)));
        assert!(approx(world.transform_point2(Vec2::X), Vec2::new(5.0, -1.0)));
    }

    #[test]
    fn test_parent_rotation_reaches_child_basis() {
        let mut graph = TransformGraph::new();
        let parent = graph.insert();
        graph.set_rotation(parent, FRAC_PI_2);
        let child = graph.insert_child(parent).unwrap();
        graph.set_position(child, Vec2::new(1.0, 0.0));

        // Parent world applies first: the child's offset lands after the
        // rotation, so the origin translates straight out, while the basis
        // carries the parent's clockwise quarter turn.
        assert!(approx(graph.world_position(child).unwrap(), Vec2::new(1.0, 0.0)));
        assert!((graph.world_rotation(child).unwrap() - (-FRAC_PI_2)).abs() < EPS);
    }

    #[test]
    fn test_root_mutation_propagates_to_child() {
        let mut graph = TransformGraph::new();
        let root = graph.insert();
        let child = graph.insert_child(root).unwrap();
        graph.set_position(child, Vec2::new(1.0, 0.0));

        let _ = graph.world_matrix(child);
        graph.set_position(root, Vec2::new(10.0, 0.0));

        // Child untouched; its world still reflects the new root position.
        assert!(approx(graph.world_position(child).unwrap(), Vec2::new(11.0, 0.0)));
    }

    #[test]
    fn test_ancestor_change_is_discovered_lazily() {
        let mut graph = TransformGraph::new();
        let root = graph.insert();
        let child = graph.insert_child(root).unwrap();
        let _ = graph.world_matrix(child);

        graph.set_position(root, Vec2::X);

        // No eager push: the child's own flags are untouched, but the
        // pending ancestor change is visible.
        assert!(graph.node(child).unwrap().flags().is_empty());
        assert_eq!(graph.is_world_dirty(child), Some(true));
    }

    #[test]
    fn test_grandchild_sees_root_change_through_unread_middle() {
        let mut graph = TransformGraph::new();
        let root = graph.insert();
        let middle = graph.insert_child(root).unwrap();
        let leaf = graph.insert_child(middle).unwrap();
        graph.set_position(middle, Vec2::new(1.0, 0.0));
        graph.set_position(leaf, Vec2::new(0.0, 2.0));

        let _ = graph.world_matrix(leaf);
        graph.set_position(root, Vec2::new(100.0, 0.0));

        // Only the leaf is read; the middle settles as part of the chain.
        assert!(approx(
            graph.world_position(leaf).unwrap(),
            Vec2::new(101.0, 2.0)
        ));
    }

    #[test]
    fn test_reparent_switches_ancestor_tracking() {
        let mut graph = TransformGraph::new();
        let r1 = graph.insert();
        let r2 = graph.insert();
        let child = graph.insert_child(r1).unwrap();
        graph.set_position(child, Vec2::new(1.0, 0.0));
        let _ = graph.world_matrix(child);

        graph.set_parent(child, Some(r2));
        let _ = graph.world_matrix(child);

        // The old root no longer affects the child.
        graph.set_position(r1, Vec2::new(50.0, 50.0));
        assert_eq!(graph.is_world_dirty(child), Some(false));
        assert!(approx(graph.world_position(child).unwrap(), Vec2::new(1.0, 0.0)));

        // The new root does.
        graph.set_position(r2, Vec2::new(7.0, 0.0));
        assert_eq!(graph.is_world_dirty(child), Some(true));
        assert!(approx(graph.world_position(child).unwrap(), Vec2::new(8.0, 0.0)));
    }

    #[test]
    fn test_noop_reparent_keeps_cache_valid() {
        let mut graph = TransformGraph::new();
        let root = graph.insert();
        let child = graph.insert_child(root).unwrap();
        let _ = graph.world_matrix(child);

        assert!(graph.set_parent(child, Some(root)));
        assert_eq!(graph.is_world_dirty(child), Some(false));

        let lone = graph.insert();
        let _ = graph.world_matrix(lone);
        assert!(graph.set_parent(lone, None));
        assert_eq!(graph.is_world_dirty(lone), Some(false));
    }

    #[test]
    fn test_reparent_dirties_immediately() {
        let mut graph = TransformGraph::new();
        let r1 = graph.insert();
        let r2 = graph.insert();
        graph.set_position(r2, Vec2::new(20.0, 0.0));
        let child = graph.insert_child(r1).unwrap();
        let _ = graph.world_matrix(child);

        // No ancestor mutation after the reparent: the read must still be
        // fresh under the new parent.
        graph.set_parent(child, Some(r2));
        assert_eq!(graph.is_world_dirty(child), Some(true));
        assert!(approx(graph.world_position(child).unwrap(), Vec2::new(20.0, 0.0)));
    }

    #[test]
    fn test_reparent_refreshes_descendants() {
        let mut graph = TransformGraph::new();
        let r1 = graph.insert();
        let r2 = graph.insert();
        graph.set_position(r2, Vec2::new(5.0, 0.0));
        let middle = graph.insert_child(r1).unwrap();
        let leaf = graph.insert_child(middle).unwrap();
        graph.set_position(leaf, Vec2::new(0.0, 1.0));
        let _ = graph.world_matrix(leaf);

        graph.set_parent(middle, Some(r2));
        assert!(approx(graph.world_position(leaf).unwrap(), Vec2::new(5.0, 1.0)));
    }

    #[test]
    fn test_set_parent_rejects_self_and_stale() {
        let mut graph = TransformGraph::new();
        let n = graph.insert();
        assert!(!graph.set_parent(n, Some(n)));

        let dead = graph.insert();
        graph.remove(dead);
        assert!(!graph.set_parent(n, Some(dead)));
        assert!(!graph.set_parent(dead, None));
        assert!(graph.parent(n).is_none());
    }

    #[test]
    fn test_reset_contract() {
        let mut graph = TransformGraph::new();
        let parent = graph.insert();
        let n = graph.insert_child(parent).unwrap();
        graph.set_transform(n, Vec2::new(3.0, 4.0), 1.0, Vec2::new(2.0, 2.0));
        let _ = graph.world_matrix(n);

        assert!(graph.reset(n));

        assert!(graph.parent(n).is_none());
        assert_eq!(graph.position(n), Some(Vec2::ZERO));
        assert_eq!(graph.rotation(n), Some(0.0));
        assert_eq!(graph.scale(n), Some(Vec2::ONE));
        assert_eq!(graph.node(n).unwrap().flags(), DirtyFlags::ALL);
        assert!(!graph.children(parent).unwrap().contains(n));
    }

    #[test]
    fn test_remove_detaches_children() {
        let mut graph = TransformGraph::new();
        let root = graph.insert();
        graph.set_position(root, Vec2::new(10.0, 0.0));
        let child = graph.insert_child(root).unwrap();
        graph.set_position(child, Vec2::new(1.0, 0.0));
        let _ = graph.world_matrix(child);

        assert!(graph.remove(root));

        // The child is a root now; its world collapses to its local.
        assert!(graph.parent(child).is_none());
        assert_eq!(graph.is_world_dirty(child), Some(true));
        assert!(approx(graph.world_position(child).unwrap(), Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn test_removed_id_is_stale() {
        let mut graph = TransformGraph::new();
        let n = graph.insert();
        graph.remove(n);

        assert!(!graph.contains(n));
        assert!(graph.world_matrix(n).is_none());
        assert!(!graph.set_position(n, Vec2::X));
        assert!(!graph.remove(n));
    }

    #[test]
    fn test_slot_reuse_does_not_resurrect() {
        let mut graph = TransformGraph::new();
        let old = graph.insert();
        graph.set_position(old, Vec2::new(9.0, 9.0));
        graph.remove(old);

        let fresh = graph.insert();
        assert_eq!(fresh.index(), old.index());

        // The recycled slot starts from the documented fresh state and the
        // old id stays dead.
        assert_eq!(graph.position(fresh), Some(Vec2::ZERO));
        assert_eq!(graph.node(fresh).unwrap().flags(), DirtyFlags::ALL);
        assert!(graph.world_matrix(old).is_none());
    }

    #[test]
    fn test_ancestors_walk() {
        let mut graph = TransformGraph::new();
        let root = graph.insert();
        let middle = graph.insert_child(root).unwrap();
        let leaf = graph.insert_child(middle).unwrap();

        let chain: Vec<NodeId> = graph.ancestors(leaf).collect();
        assert_eq!(chain, vec![middle, root]);
        assert!(graph.ancestors(root).next().is_none());
    }

    #[test]
    fn test_children_bookkeeping() {
        let mut graph = TransformGraph::new();
        let root = graph.insert();
        let a = graph.insert_child(root).unwrap();
        let b = graph.insert_child(root).unwrap();

        assert_eq!(graph.children(root).unwrap().len(), 2);

        graph.set_parent(a, None);
        assert!(!graph.children(root).unwrap().contains(a));
        assert!(graph.children(root).unwrap().contains(b));

        graph.remove(b);
        assert!(graph.children(root).unwrap().is_empty());
    }

    #[test]
    fn test_clear_drops_all_nodes() {
        let mut graph = TransformGraph::new();
        let root = graph.insert();
        graph.insert_child(root);

        graph.clear();
        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
    }

    #[test]
    fn test_translate_accumulates() {
        let mut graph = TransformGraph::new();
        let n = graph.insert();
        graph.set_position(n, Vec2::new(1.0, 1.0));
        graph.translate(n, Vec2::new(2.0, 0.5));

        assert!(approx(graph.world_position(n).unwrap(), Vec2::new(3.0, 1.5)));
    }

    #[test]
    fn test_world_scale_composes() {
        let mut graph = TransformGraph::new();
        let root = graph.insert();
        graph.set_scale(root, Vec2::new(2.0, 2.0));
        let child = graph.insert_child(root).unwrap();
        graph.set_scale(child, Vec2::new(3.0, 1.0));

        assert!(approx(graph.world_scale(child).unwrap(), Vec2::new(6.0, 2.0)));
    }
}
