// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal column-major 4×4 matrix.
//!
//! Covers what the scene graph needs from a matrix stack: identity,
//! multiply, the translate/rotate/scale builders, camera matrices (look-at,
//! perspective, orthographic), and point projection. 2-D geometry uses
//! `kurbo` directly; 3-D vectors are plain `[f64; 3]` arrays.

use core::ops::Mul;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// A 3-D vector or point.
pub type Vec3 = [f64; 3];

/// A column-major 4×4 transform stored as `[[f64; 4]; 4]`.
///
/// Each inner array is one *column* of the matrix, matching the memory layout
/// immediate-mode APIs expect for matrix loads and multiplies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Transform3d {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Creates a transform from a column-major 2-D array.
    #[inline]
    #[must_use]
    pub const fn from_cols_array_2d(cols: [[f64; 4]; 4]) -> Self {
        Self { cols }
    }

    /// Returns column `i` (0-based).
    ///
    /// # Panics
    ///
    /// Panics if `i >= 4`.
    #[inline]
    #[must_use]
    pub const fn col(self, i: usize) -> [f64; 4] {
        self.cols[i]
    }

    /// Creates a pure translation transform.
    #[inline]
    #[must_use]
    pub const fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Creates a non-uniform scale transform.
    #[inline]
    #[must_use]
    pub const fn from_scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            cols: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, sz, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a rotation of `degrees` counter-clockwise around `axis`.
    ///
    /// The axis is normalized first; a zero-length axis yields the identity.
    #[must_use]
    pub fn from_axis_angle(degrees: f64, axis: Vec3) -> Self {
        let Some([x, y, z]) = normalize(axis) else {
            return Self::IDENTITY;
        };
        let radians = degrees.to_radians();
        let (s, c) = (radians.sin(), radians.cos());
        let t = 1.0 - c;
        Self {
            cols: [
                [x * x * t + c, y * x * t + z * s, x * z * t - y * s, 0.0],
                [x * y * t - z * s, y * y * t + c, y * z * t + x * s, 0.0],
                [x * z * t + y * s, y * z * t - x * s, z * z * t + c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a viewing transform placing the eye at `eye`, looking at
    /// `center`, with `up` as the approximate up direction.
    ///
    /// Degenerate input (eye at center, or up parallel to the view
    /// direction) yields a pure translation by `-eye`.
    #[must_use]
    pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        let translate = Self::from_translation(-eye[0], -eye[1], -eye[2]);
        let Some(f) = normalize(sub(center, eye)) else {
            return translate;
        };
        let Some(s) = normalize(cross(f, up)) else {
            return translate;
        };
        let u = cross(s, f);
        let rotate = Self {
            cols: [
                [s[0], u[0], -f[0], 0.0],
                [s[1], u[1], -f[1], 0.0],
                [s[2], u[2], -f[2], 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        };
        rotate * translate
    }

    /// Creates a perspective projection with a vertical field of view in
    /// degrees.
    #[must_use]
    pub fn perspective(fov_y_degrees: f64, aspect: f64, near: f64, far: f64) -> Self {
        let f = 1.0 / (fov_y_degrees.to_radians() / 2.0).tan();
        let depth = near - far;
        Self {
            cols: [
                [f / aspect, 0.0, 0.0, 0.0],
                [0.0, f, 0.0, 0.0],
                [0.0, 0.0, (far + near) / depth, -1.0],
                [0.0, 0.0, 2.0 * far * near / depth, 0.0],
            ],
        }
    }

    /// Creates an orthographic projection.
    #[must_use]
    pub fn orthographic(left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) -> Self {
        let w = right - left;
        let h = top - bottom;
        let d = far - near;
        Self {
            cols: [
                [2.0 / w, 0.0, 0.0, 0.0],
                [0.0, 2.0 / h, 0.0, 0.0],
                [0.0, 0.0, -2.0 / d, 0.0],
                [-(right + left) / w, -(top + bottom) / h, -(far + near) / d, 1.0],
            ],
        }
    }

    /// Multiplies a homogeneous point by this matrix.
    #[must_use]
    pub fn transform_point4(&self, p: [f64; 4]) -> [f64; 4] {
        let c = &self.cols;
        let mut out = [0.0_f64; 4];
        for (i, o) in out.iter_mut().enumerate() {
            *o = c[0][i] * p[0] + c[1][i] * p[1] + c[2][i] * p[2] + c[3][i] * p[3];
        }
        out
    }

    /// Projects `p` through this (combined projection × modelview) matrix to
    /// normalized device coordinates.
    ///
    /// Returns `None` when the point lands on the `w = 0` plane.
    #[must_use]
    pub fn project(&self, p: Vec3) -> Option<Vec3> {
        let [x, y, z, w] = self.transform_point4([p[0], p[1], p[2], 1.0]);
        if w == 0.0 {
            return None;
        }
        Some([x / w, y / w, z / w])
    }

    /// Is this transform [finite]?
    ///
    /// [finite]: f64::is_finite
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.cols.iter().flatten().all(|v| v.is_finite())
    }

    /// Returns `true` if every element is within `eps` of `other`'s.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        self.cols
            .iter()
            .flatten()
            .zip(other.cols.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Default for Transform3d {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform3d {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let a = &self.cols;
        let b = &rhs.cols;
        let mut out = [[0.0_f64; 4]; 4];
        let mut j = 0;
        while j < 4 {
            let mut i = 0;
            while i < 4 {
                out[j][i] =
                    a[0][i] * b[j][0] + a[1][i] * b[j][1] + a[2][i] * b[j][2] + a[3][i] * b[j][3];
                i += 1;
            }
            j += 1;
        }
        Self { cols: out }
    }
}

fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Cross product `a × b`.
#[must_use]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Returns `v` scaled to unit length, or `None` for a zero vector.
#[must_use]
pub fn normalize(v: Vec3) -> Option<Vec3> {
    let len = dot(v, v).sqrt();
    if len == 0.0 || !len.is_finite() {
        return None;
    }
    Some([v[0] / len, v[1] / len, v[2] / len])
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn translate_then_scale_scales_about_the_moved_origin() {
        // Matrix-stack order: the call made last applies to the vertex first.
        let m =
            Transform3d::from_translation(3.0, 4.0, 0.0) * Transform3d::from_scale(2.0, 2.0, 2.0);
        let p = m.transform_point4([1.0, 1.0, 1.0, 1.0]);
        assert_eq!(p, [5.0, 6.0, 2.0, 1.0], "scaled, then moved");
        assert_eq!(
            Transform3d::default() * m,
            m,
            "identity on the stack changes nothing"
        );
    }

    #[test]
    fn axis_angle_about_z_matches_planar_rotation() {
        let r = Transform3d::from_axis_angle(90.0, [0.0, 0.0, 1.0]);
        let p = r.transform_point4([1.0, 0.0, 0.0, 1.0]);
        assert!((p[0] - 0.0).abs() < EPS, "x: {}", p[0]);
        assert!((p[1] - 1.0).abs() < EPS, "y: {}", p[1]);
    }

    #[test]
    fn axis_angle_normalizes_axis() {
        let a = Transform3d::from_axis_angle(30.0, [0.0, 5.0, 0.0]);
        let b = Transform3d::from_axis_angle(30.0, [0.0, 1.0, 0.0]);
        assert!(a.approx_eq(&b, EPS), "axis length must not matter");
    }

    #[test]
    fn zero_axis_is_identity() {
        let r = Transform3d::from_axis_angle(45.0, [0.0, 0.0, 0.0]);
        assert_eq!(r, Transform3d::IDENTITY, "no axis, no rotation");
    }

    #[test]
    fn look_at_moves_center_onto_negative_z() {
        let view = Transform3d::look_at([0.0, 0.0, 5.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let p = view.transform_point4([0.0, 0.0, 0.0, 1.0]);
        assert!((p[2] + 5.0).abs() < EPS, "center should sit 5 units ahead");
        assert!(p[0].abs() < EPS && p[1].abs() < EPS, "center on the axis");
    }

    #[test]
    fn orthographic_maps_bounds_to_ndc() {
        let o = Transform3d::orthographic(0.0, 100.0, 0.0, 50.0, -1.0, 1.0);
        let lo = o.project([0.0, 0.0, 0.0]).unwrap();
        let hi = o.project([100.0, 50.0, 0.0]).unwrap();
        assert!((lo[0] + 1.0).abs() < EPS && (lo[1] + 1.0).abs() < EPS, "lo: {lo:?}");
        assert!((hi[0] - 1.0).abs() < EPS && (hi[1] - 1.0).abs() < EPS, "hi: {hi:?}");
    }

    #[test]
    fn perspective_projects_near_plane_to_minus_one() {
        let p = Transform3d::perspective(90.0, 1.0, 1.0, 10.0);
        let ndc = p.project([0.0, 0.0, -1.0]).unwrap();
        assert!((ndc[2] + 1.0).abs() < EPS, "near plane depth: {}", ndc[2]);
    }

    #[test]
    fn project_rejects_w_zero() {
        let p = Transform3d::perspective(90.0, 1.0, 1.0, 10.0);
        assert!(p.project([1.0, 1.0, 0.0]).is_none(), "point at the eye plane");
    }

    #[test]
    fn non_finite_entries_are_reported() {
        let mut t = Transform3d::from_scale(1.0, 0.0, 1.0);
        assert!(t.is_finite(), "a degenerate scale is still finite");
        t.cols[3][0] = f64::INFINITY;
        assert!(!t.is_finite(), "infinite translation");
    }

    #[test]
    fn cross_follows_the_right_hand_rule() {
        assert_eq!(cross([0.0, 1.0, 0.0], [0.0, 0.0, 1.0]), [1.0, 0.0, 0.0], "y × z = x");
        assert_eq!(normalize([0.0, 0.0, 0.0]), None, "zero vector has no direction");
    }
}
