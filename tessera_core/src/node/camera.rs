// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene roots and cameras.

use alloc::boxed::Box;

use super::{Frame, Node};
use crate::backend::{Backend, MatrixMode};
use crate::error::RenderError;
use crate::matrix::{Transform3d, Vec3};

/// How a camera projects onto the screen.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Projection {
    /// Leave the projection stack alone.
    #[default]
    None,
    /// A perspective frustum.
    Perspective {
        /// Vertical field of view in degrees.
        fov_y: f64,
        /// Width over height.
        aspect: f64,
        /// Near clipping plane (> 0).
        near: f64,
        /// Far clipping plane (> near).
        far: f64,
    },
    /// A 2-D orthographic box with depth range `[-1, 1]`.
    Orthographic {
        /// Left edge.
        left: f64,
        /// Right edge.
        right: f64,
        /// Bottom edge.
        bottom: f64,
        /// Top edge.
        top: f64,
    },
}

impl Projection {
    /// The projection matrix, if any.
    #[must_use]
    pub fn matrix(&self) -> Option<Transform3d> {
        match *self {
            Self::None => None,
            Self::Perspective {
                fov_y,
                aspect,
                near,
                far,
            } => Some(Transform3d::perspective(fov_y, aspect, near, far)),
            Self::Orthographic {
                left,
                right,
                bottom,
                top,
            } => Some(Transform3d::orthographic(left, right, bottom, top, -1.0, 1.0)),
        }
    }
}

/// A viewpoint: where the eye is, what it looks at, and how it projects.
///
/// A camera node pushes and pops nothing. Rendering it multiplies the
/// look-at matrix onto the modelview stack and the projection onto the
/// projection stack, then leaves modelview selected. Its effect therefore
/// lasts until the enclosing node pops, which is what lets a [`Scene`]
/// render its children through it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Eye position.
    pub eye: Vec3,
    /// Point looked at.
    pub center: Vec3,
    /// Approximate up direction.
    pub up: Vec3,
    /// Projection applied after the view.
    pub projection: Projection,
}

impl Camera {
    /// A camera that only sets the view.
    #[must_use]
    pub const fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        Self {
            eye,
            center,
            up,
            projection: Projection::None,
        }
    }

    /// Sets the projection.
    #[must_use]
    pub const fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// The view matrix.
    #[must_use]
    pub fn view(&self) -> Transform3d {
        Transform3d::look_at(self.eye, self.center, self.up)
    }

    pub(crate) fn apply(&self, backend: &mut dyn Backend) {
        backend.set_matrix_mode(MatrixMode::Modelview);
        backend.mult_matrix(&self.view());
        if let Some(projection) = self.projection.matrix() {
            backend.set_matrix_mode(MatrixMode::Projection);
            backend.mult_matrix(&projection);
            backend.set_matrix_mode(MatrixMode::Modelview);
        }
    }
}

/// The root of a 3-D scene.
///
/// Rendering a scene loads the identity into the modelview and projection
/// stacks, renders the camera, selects modelview, and renders the scene's
/// children. The scene node itself is pushed and popped like any other, so
/// its toggles and modifications apply to the whole frame and the modelview
/// matrix it overwrote is restored afterwards. The projection it loads stays
/// in place until the next reset.
#[derive(Debug)]
pub struct Scene {
    /// The camera node, rendered before the scene's children.
    pub camera: Box<Node>,
}

impl Scene {
    pub(crate) fn enter(&mut self, frame: &mut Frame<'_>) -> Result<(), RenderError> {
        let backend = frame.backend();
        backend.set_matrix_mode(MatrixMode::Modelview);
        backend.load_identity();
        backend.set_matrix_mode(MatrixMode::Projection);
        backend.load_identity();
        frame.render_scoped(&mut self.camera)?;
        frame.backend().set_matrix_mode(MatrixMode::Modelview);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_none_has_no_matrix() {
        assert_eq!(Projection::None.matrix(), None, "no projection");
    }

    #[test]
    fn orthographic_maps_box_to_ndc() {
        let m = Projection::Orthographic {
            left: 0.0,
            right: 200.0,
            bottom: 0.0,
            top: 100.0,
        }
        .matrix()
        .expect("orthographic has a matrix");
        let p = m.project([200.0, 50.0, 0.0]).expect("finite w");
        assert!((p[0] - 1.0).abs() < 1e-9, "right edge maps to x = 1");
        assert!(p[1].abs() < 1e-9, "vertical middle maps to y = 0");
    }
}
