//! 2D affine matrix construction and decomposition
//!
//! All transforms are `glam::Affine2` values. Rotation angles fed in by the
//! rest of the crate are clockwise-positive (screen convention); every
//! constructor here negates the angle before building the matrix, so the
//! stored matrices rotate counter-clockwise for negative inputs like any
//! ordinary math library.

use glam::{Affine2, Vec2};

/// Build a local matrix for a root node.
///
/// Applied to a point: scale, then rotate, then translate.
#[must_use]
#[inline]
pub fn trs(position: Vec2, rotation: f32, scale: Vec2) -> Affine2 {
    Affine2::from_scale_angle_translation(scale, -rotation, position)
}

/// Build a local matrix for a parented node.
///
/// `pivot` is the parent's local position. Applied to a point: translate by
/// `-pivot`, scale, rotate, translate back by `pivot`, then translate by
/// `position`. Scale and rotation therefore act about the parent's pivot
/// rather than this node's own origin.
#[must_use]
pub fn trs_about(position: Vec2, rotation: f32, scale: Vec2, pivot: Vec2) -> Affine2 {
    Affine2::from_translation(position + pivot)
        * Affine2::from_angle(-rotation)
        * Affine2::from_scale(scale)
        * Affine2::from_translation(-pivot)
}

/// Compose a node's local matrix onto its parent's world matrix.
///
/// The parent transform is applied first, then the local matrix. Combined
/// with [`trs_about`], this makes a child's rotation and scale act about the
/// parent's pivot in world space.
#[must_use]
#[inline]
pub fn compose(parent_world: Affine2, local: Affine2) -> Affine2 {
    local * parent_world
}

/// Extract the translation component of an affine transform.
#[must_use]
#[inline]
pub fn translation_of(m: &Affine2) -> Vec2 {
    m.translation
}

/// Extract the rotation component in radians, counter-clockwise.
#[must_use]
#[inline]
pub fn rotation_of(m: &Affine2) -> f32 {
    f32::atan2(m.matrix2.x_axis.y, m.matrix2.x_axis.x)
}

/// Extract the scale component from the basis column lengths.
#[must_use]
#[inline]
pub fn scale_of(m: &Affine2) -> Vec2 {
    Vec2::new(m.matrix2.x_axis.length(), m.matrix2.y_axis.length())
}
