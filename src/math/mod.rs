//! 2D math helpers
//!
//! Thin layer over glam for the affine matrix conventions the transform
//! graph uses.

mod affine;

pub use affine::{compose, rotation_of, scale_of, translation_of, trs, trs_about};
