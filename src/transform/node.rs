//! Per-node transform state
//!
//! A node owns its local position/rotation/scale and two cached matrices:
//! local (node frame to parent frame) and world (node frame to root frame).
//! Caches live in `Cell`s so the lazy recompute paths can run behind a shared
//! reference, the same interior-mutability arrangement as a cached transform
//! wrapper. Validity is tracked per matrix in [`DirtyFlags`], and every world
//! invalidation bumps a monotonic stamp that descendants compare against on
//! read in place of a change-notification subscription.

use std::cell::Cell;

use glam::{Affine2, Vec2};

use super::arena::NodeId;
use super::hierarchy::Children;

// ============================================================================
// Dirty Flags
// ============================================================================

/// Per-cache validity bits.
///
/// A set bit means the corresponding cached matrix is stale; recomputation on
/// read is the only thing that clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyFlags(u8);

impl DirtyFlags {
    /// Both caches valid.
    pub const NONE: Self = Self(0);
    /// The local matrix is stale.
    pub const LOCAL: Self = Self(1 << 0);
    /// The world matrix is stale.
    pub const WORLD: Self = Self(1 << 1);
    /// Both caches stale.
    pub const ALL: Self = Self(1 << 0 | 1 << 1);

    /// Check whether all bits of `other` are set.
    #[must_use]
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Union of the two flag sets.
    #[must_use]
    #[inline]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Flags with the bits of `other` cleared.
    #[must_use]
    #[inline]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Check whether no bit is set.
    #[must_use]
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

// ============================================================================
// Node
// ============================================================================

/// One scene node's transform state.
///
/// Nodes are owned by a [`TransformGraph`](super::TransformGraph) and reached
/// through [`NodeId`] handles; the parent link is such a handle, never a
/// reference. All mutation goes through the graph so hierarchy bookkeeping
/// and invalidation stay consistent.
#[derive(Debug)]
pub struct Node {
    /// Local translation relative to the parent's local origin.
    pub(crate) position: Vec2,
    /// Local rotation in radians, clockwise-positive.
    pub(crate) rotation: f32,
    /// Local non-uniform scale.
    pub(crate) scale: Vec2,
    /// Non-owning parent handle; `None` for roots.
    pub(crate) parent: Option<NodeId>,
    /// Live nodes whose parent handle points here.
    pub(crate) children: Children,
    /// Cached node-to-parent matrix; valid while `LOCAL` is clear.
    pub(crate) local: Cell<Affine2>,
    /// Cached node-to-root matrix; valid while `WORLD` is clear and the
    /// ancestor stamps still match.
    pub(crate) world: Cell<Affine2>,
    pub(crate) flags: Cell<DirtyFlags>,
    /// World-dirty generation counter. Bumped on every world invalidation;
    /// never reset, so comparisons stay valid across node resets.
    pub(crate) stamp: Cell<u64>,
    /// The parent's stamp observed when `world` was last computed.
    pub(crate) parent_seen: Cell<u64>,
}

impl Node {
    /// Create a node in the fresh state: identity transform, unit scale, no
    /// parent, both caches stale.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            parent: None,
            children: Children::new(),
            local: Cell::new(Affine2::IDENTITY),
            world: Cell::new(Affine2::IDENTITY),
            flags: Cell::new(DirtyFlags::ALL),
            stamp: Cell::new(0),
            parent_seen: Cell::new(0),
        }
    }

    /// Restore the fresh state on a live node, keeping the children list and
    /// the stamp history.
    ///
    /// The stamp is bumped, not reset: children compare against it, and a
    /// rollback could collide with a stamp they have already seen.
    pub(crate) fn reset_state(&mut self) {
        self.position = Vec2::ZERO;
        self.rotation = 0.0;
        self.scale = Vec2::ONE;
        self.parent = None;
        self.local.set(Affine2::IDENTITY);
        self.world.set(Affine2::IDENTITY);
        self.invalidate_all();
    }

    /// Mark the local matrix stale.
    #[inline]
    pub(crate) fn invalidate_local(&self) {
        self.flags.set(self.flags.get().with(DirtyFlags::LOCAL));
    }

    /// Mark the world matrix stale and bump the stamp descendants watch.
    #[inline]
    pub(crate) fn invalidate_world(&self) {
        self.flags.set(self.flags.get().with(DirtyFlags::WORLD));
        self.stamp.set(self.stamp.get().wrapping_add(1));
    }

    /// Mark both matrices stale (ancestor change, reparent, reset).
    #[inline]
    pub(crate) fn invalidate_all(&self) {
        self.flags.set(DirtyFlags::ALL);
        self.stamp.set(self.stamp.get().wrapping_add(1));
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    /// Local position.
    #[must_use]
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Local rotation in radians, clockwise-positive.
    #[must_use]
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Local scale.
    #[must_use]
    #[inline]
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Parent handle, if any.
    #[must_use]
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children bookkeeping list.
    #[must_use]
    #[inline]
    pub fn children(&self) -> &Children {
        &self.children
    }

    /// Current validity flags.
    #[must_use]
    #[inline]
    pub fn flags(&self) -> DirtyFlags {
        self.flags.get()
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
