// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometric transforms applied on top of the current matrix.
//!
//! A [`Transform`] is a [`Modification`] that multiplies the current matrix
//! stack. It is never reverted: the owning node pushes a matrix frame before
//! applying it and pops that frame afterwards, which discards the transform
//! along with everything children did to the stack.

use alloc::vec::Vec;

use crate::backend::Backend;
use crate::error::RenderError;
use crate::matrix::{Transform3d, Vec3};
use crate::modification::Modification;

/// A rotation in degrees around an axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation {
    /// Angle in degrees, counter-clockwise looking down the axis.
    pub degrees: f64,
    /// Rotation axis; need not be normalized.
    pub axis: Vec3,
}

/// A transform applied to the current matrix.
#[derive(Clone, Debug, PartialEq)]
pub enum Transform {
    /// Translate, then rotate, then scale. Absent parts are skipped, so the
    /// default value is the identity.
    Prs {
        /// Translation.
        position: Option<Vec3>,
        /// Rotation.
        rotation: Option<Rotation>,
        /// Per-axis scale.
        scale: Option<Vec3>,
    },
    /// Each transform applied in order.
    Multi(Vec<Transform>),
    /// A raw matrix multiply.
    Matrix(Transform3d),
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self::Prs {
        position: None,
        rotation: None,
        scale: None,
    };

    /// A pure translation.
    #[must_use]
    pub const fn translate(offset: Vec3) -> Self {
        Self::Prs {
            position: Some(offset),
            rotation: None,
            scale: None,
        }
    }

    /// A pure rotation.
    #[must_use]
    pub const fn rotate(degrees: f64, axis: Vec3) -> Self {
        Self::Prs {
            position: None,
            rotation: Some(Rotation { degrees, axis }),
            scale: None,
        }
    }

    /// A pure scale.
    #[must_use]
    pub const fn scale(factors: Vec3) -> Self {
        Self::Prs {
            position: None,
            rotation: None,
            scale: Some(factors),
        }
    }

    /// Returns `true` when applying this transform leaves the matrix as is.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        match self {
            Self::Prs {
                position,
                rotation,
                scale,
            } => position.is_none() && rotation.is_none() && scale.is_none(),
            Self::Multi(parts) => parts.iter().all(Self::is_identity),
            Self::Matrix(m) => *m == Transform3d::IDENTITY,
        }
    }

    /// Returns the matrix this transform multiplies onto the stack.
    #[must_use]
    pub fn to_matrix(&self) -> Transform3d {
        match self {
            Self::Prs {
                position,
                rotation,
                scale,
            } => {
                let mut m = Transform3d::IDENTITY;
                if let Some(p) = position {
                    m = m * Transform3d::from_translation(p[0], p[1], p[2]);
                }
                if let Some(r) = rotation {
                    m = m * Transform3d::from_axis_angle(r.degrees, r.axis);
                }
                if let Some(s) = scale {
                    m = m * Transform3d::from_scale(s[0], s[1], s[2]);
                }
                m
            }
            Self::Multi(parts) => parts
                .iter()
                .fold(Transform3d::IDENTITY, |acc, t| acc * t.to_matrix()),
            Self::Matrix(m) => *m,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Modification for Transform {
    fn apply(&mut self, backend: &mut dyn Backend) -> Result<(), RenderError> {
        match self {
            Self::Prs {
                position,
                rotation,
                scale,
            } => {
                if let Some(p) = position {
                    backend.translate(*p);
                }
                if let Some(r) = rotation {
                    backend.rotate(r.degrees, r.axis);
                }
                if let Some(s) = scale {
                    backend.scale(*s);
                }
            }
            Self::Multi(parts) => {
                for part in parts {
                    part.apply(backend)?;
                }
            }
            Self::Matrix(m) => backend.mult_matrix(m),
        }
        Ok(())
    }

    fn revert(&mut self, backend: &mut dyn Backend) -> Result<(), RenderError> {
        _ = backend;
        Err(RenderError::TransformRevert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_identity() {
        assert!(Transform::default().is_identity(), "default transform");
        assert_eq!(
            Transform::default().to_matrix(),
            Transform3d::IDENTITY,
            "default transform multiplies by the identity"
        );
    }

    #[test]
    fn prs_order_is_translate_rotate_scale() {
        let t = Transform::Prs {
            position: Some([10.0, 0.0, 0.0]),
            rotation: Some(Rotation {
                degrees: 90.0,
                axis: [0.0, 0.0, 1.0],
            }),
            scale: Some([2.0, 2.0, 2.0]),
        };
        // (1, 0, 0) scales to (2, 0, 0), rotates to (0, 2, 0), then moves.
        let p = t.to_matrix().transform_point4([1.0, 0.0, 0.0, 1.0]);
        assert!((p[0] - 10.0).abs() < 1e-9, "x = {}", p[0]);
        assert!((p[1] - 2.0).abs() < 1e-9, "y = {}", p[1]);
    }

    #[test]
    fn multi_composes_in_order() {
        let t = Transform::Multi(alloc::vec![
            Transform::translate([1.0, 0.0, 0.0]),
            Transform::scale([3.0, 3.0, 3.0]),
        ]);
        let p = t.to_matrix().transform_point4([1.0, 1.0, 0.0, 1.0]);
        assert!((p[0] - 4.0).abs() < 1e-9, "x = {}", p[0]);
        assert!((p[1] - 3.0).abs() < 1e-9, "y = {}", p[1]);
        assert!(!t.is_identity(), "translate + scale is not identity");
    }
}
