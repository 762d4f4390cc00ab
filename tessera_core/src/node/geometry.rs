// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry and sprites.

use alloc::vec::Vec;

use kurbo::Vec2;

use super::Node;
use crate::backend::{AttribGroup, Backend, Capability, Color, MatrixMode, Primitive};
use crate::matrix::Vec3;

/// One vertex of a [`Face`].
///
/// Vertices are plain data, not nodes: they are emitted inside an open
/// batch, where pushing state is not allowed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    /// Homogeneous position.
    pub pos: [f64; 4],
    /// Per-vertex color.
    pub color: Option<Color>,
    /// Normal.
    pub normal: Option<Vec3>,
    /// Texture coordinate.
    pub tex_coord: Option<Vec3>,
}

impl Vertex {
    /// A vertex at `(x, y, z)` with no extra attributes.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            pos: [x, y, z, 1.0],
            color: None,
            normal: None,
            tex_coord: None,
        }
    }

    /// Sets the color.
    #[must_use]
    pub const fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Sets the normal.
    #[must_use]
    pub const fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = Some(normal);
        self
    }

    /// Sets the texture coordinate.
    #[must_use]
    pub const fn with_tex_coord(mut self, tex_coord: Vec3) -> Self {
        self.tex_coord = Some(tex_coord);
        self
    }

    fn emit(&self, backend: &mut dyn Backend) {
        if let Some(color) = self.color {
            backend.color(color);
        }
        if let Some(tex) = self.tex_coord {
            backend.tex_coord(tex);
        }
        if let Some(normal) = self.normal {
            backend.normal(normal);
        }
        backend.vertex(self.pos);
    }
}

/// One primitive batch.
///
/// Children of a face node render only after the batch is closed.
#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    /// Primitive assembly mode.
    pub primitive: Primitive,
    /// Vertices, in submission order.
    pub vertices: Vec<Vertex>,
}

impl Face {
    pub(crate) fn draw(&self, backend: &mut dyn Backend) {
        backend.begin(self.primitive);
        for vertex in &self.vertices {
            vertex.emit(backend);
        }
        backend.end();
    }
}

/// An ordered set of face nodes.
///
/// Each face is pushed, rendered, and popped on its own before the mesh's
/// children render, so faces can carry their own transform or texture.
#[derive(Debug, Default)]
pub struct Mesh {
    /// Face nodes.
    pub faces: Vec<Node>,
}

/// A textured quad in normalized device coordinates.
///
/// The screen runs from `(-1, -1)` at the bottom-left to `(1, 1)` at the
/// top-right; `z` only matters for depth testing. The node's bound texture
/// is sampled, so set one with [`Node::with_texture`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    /// Lower-left corner, or the center when `centered` is set.
    pub pos: Vec3,
    /// Extent; `2.0` spans the full screen. A centered sprite reaches
    /// `size` out from `pos` on each side.
    pub size: Vec2,
    /// Interpret `pos` as the center.
    pub centered: bool,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            pos: [0.0; 3],
            size: Vec2::new(1.0, 1.0),
            centered: false,
        }
    }
}

impl Sprite {
    /// Draws the quad with both matrix stacks reset to the identity, then
    /// restores the stacks and the entry matrix mode. `at` overrides
    /// [`pos`](Self::pos).
    pub(crate) fn draw(&self, backend: &mut dyn Backend, at: Option<Vec3>) {
        let pos = at.unwrap_or(self.pos);
        let (x0, y0, x1, y1) = if self.centered {
            (
                pos[0] - self.size.x,
                pos[1] - self.size.y,
                pos[0] + self.size.x,
                pos[1] + self.size.y,
            )
        } else {
            (pos[0], pos[1], pos[0] + self.size.x, pos[1] + self.size.y)
        };
        let z = pos[2];

        let entry_mode = backend.matrix_mode();
        backend.set_matrix_mode(MatrixMode::Modelview);
        backend.push_matrix();
        backend.load_identity();
        backend.set_matrix_mode(MatrixMode::Projection);
        backend.push_matrix();
        backend.load_identity();
        backend.push_attrib(AttribGroup::Enable);
        backend.enable(Capability::Texture2d);

        backend.color(Color::WHITE);
        backend.begin(Primitive::Quads);
        backend.tex_coord([0.0, 0.0, 0.0]);
        backend.vertex([x0, y0, z, 1.0]);
        backend.tex_coord([1.0, 0.0, 0.0]);
        backend.vertex([x1, y0, z, 1.0]);
        backend.tex_coord([1.0, 1.0, 0.0]);
        backend.vertex([x1, y1, z, 1.0]);
        backend.tex_coord([0.0, 1.0, 0.0]);
        backend.vertex([x0, y1, z, 1.0]);
        backend.end();

        backend.pop_attrib();
        backend.pop_matrix();
        backend.set_matrix_mode(MatrixMode::Modelview);
        backend.pop_matrix();
        backend.set_matrix_mode(entry_mode);
    }
}

/// A sprite anchored at a point in the world.
///
/// The anchor is projected through the current projection and modelview
/// matrices to normalized device coordinates, and the sprite is drawn there
/// at a fixed screen size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldSprite {
    /// Screen-space appearance; `sprite.pos` is ignored.
    pub sprite: Sprite,
    /// World-space anchor.
    pub anchor: Vec3,
}

impl WorldSprite {
    pub(crate) fn draw(&self, backend: &mut dyn Backend) {
        let clip = backend.current_matrix(MatrixMode::Projection)
            * backend.current_matrix(MatrixMode::Modelview);
        match clip.project(self.anchor) {
            Some(ndc) => self.sprite.draw(backend, Some(ndc)),
            None => log::debug!("world sprite anchor {:?} projects to infinity", self.anchor),
        }
    }
}
