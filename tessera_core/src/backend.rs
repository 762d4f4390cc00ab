// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for immediate-mode graphics integrations.
//!
//! The scene graph never draws by itself. Every state change and primitive
//! goes through a [`Backend`], which exposes the pieces of a classic
//! fixed-function pipeline:
//!
//! - **Matrix stacks** — one stack per [`MatrixMode`], with push/pop,
//!   load-identity, multiply, and the translate/rotate/scale helpers.
//! - **Attribute groups** — save/restore of the enabled-feature set and of
//!   the viewport ([`AttribGroup`]).
//! - **Features** — [`Capability`] toggles such as depth testing.
//! - **Textures** — create, bind, upload, and sampling parameters.
//! - **Primitives** — `begin` / per-vertex attributes / `end` batches.
//!
//! # Call order
//!
//! Nodes only call into the backend from inside the push/render/pop protocol
//! described in [`node`](crate::node). Between [`begin`](Backend::begin) and
//! [`end`](Backend::end) only vertex attribute calls are made; stack and
//! state changes never appear inside an open batch.

use kurbo::{Point, Rect, Size};

use crate::error::BackendError;
use crate::matrix::{Transform3d, Vec3};
use crate::texture::{Image, TextureId};

/// Selects which matrix stack subsequent matrix calls operate on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatrixMode {
    /// Object and camera placement.
    #[default]
    Modelview,
    /// Projection onto normalized device coordinates.
    Projection,
    /// Texture coordinate transform.
    Texture,
}

impl MatrixMode {
    /// All matrix modes, in stack index order.
    pub const ALL: [Self; 3] = [Self::Modelview, Self::Projection, Self::Texture];

    /// Returns the stack index for this mode.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Modelview => 0,
            Self::Projection => 1,
            Self::Texture => 2,
        }
    }
}

/// A backend feature that can be enabled or disabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// Depth testing.
    DepthTest,
    /// Alpha blending.
    Blend,
    /// Fixed-function lighting.
    Lighting,
    /// 2-D texture sampling.
    Texture2d,
    /// Back-face culling.
    CullFace,
    /// A backend-specific capability.
    Other(u32),
}

/// A group of backend state saved and restored as a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttribGroup {
    /// The set of enabled [`Capability`] toggles.
    Enable,
    /// The current [`Viewport`].
    Viewport,
}

/// Primitive assembly mode for a [`begin`](Backend::begin)/[`end`](Backend::end) batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Independent points.
    Points,
    /// Independent line segments.
    Lines,
    /// A connected line strip.
    LineStrip,
    /// Independent triangles.
    Triangles,
    /// A triangle fan.
    TriangleFan,
    /// Independent quadrilaterals.
    Quads,
}

/// Blend factor for [`Backend::blend_func`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    /// `0`.
    Zero,
    /// `1`.
    One,
    /// Source alpha.
    SrcAlpha,
    /// `1 - source alpha`.
    OneMinusSrcAlpha,
    /// Destination alpha.
    DstAlpha,
    /// `1 - destination alpha`.
    OneMinusDstAlpha,
}

/// Texture minification/magnification filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureFilter {
    /// Nearest texel.
    Nearest,
    /// Linear interpolation.
    Linear,
}

/// Texture coordinate wrapping mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureWrap {
    /// Tile the texture.
    Repeat,
    /// Clamp coordinates to the edge texels.
    ClampToEdge,
}

/// An RGBA color with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
    /// Alpha.
    pub a: f64,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);

    /// Creates a color from components.
    #[inline]
    #[must_use]
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    #[inline]
    #[must_use]
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Returns the components as an array.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// An integer pixel rectangle in window coordinates (origin bottom-left).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Viewport {
    /// Left edge.
    pub x: i32,
    /// Bottom edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Viewport {
    /// Creates a viewport.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Converts a floating-point origin and size, truncating toward zero.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "viewports are whole pixels; truncation matches integer viewport APIs"
    )]
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(
            origin.x as i32,
            origin.y as i32,
            size.width as i32,
            size.height as i32,
        )
    }

    /// Returns the lower-left corner.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(f64::from(self.x), f64::from(self.y))
    }

    /// Returns the extent.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Returns the viewport as a rectangle.
    #[inline]
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.origin(), self.size())
    }
}

/// An immediate-mode graphics implementation.
///
/// Implementations own all global graphics state. The scene graph is the only
/// caller during a render pass and always pairs `push_*` with `pop_*` in
/// stack order, so a conforming backend never needs to guard against
/// imbalance on its own (the recording backend in `tessera_render` checks it
/// anyway).
///
/// The provided `translate`/`rotate`/`scale`/`fill_rect` methods are
/// expressed in terms of the required ones; override them when the platform
/// has native equivalents.
pub trait Backend {
    /// Returns the currently selected matrix stack.
    fn matrix_mode(&self) -> MatrixMode;

    /// Selects the matrix stack subsequent matrix calls operate on.
    fn set_matrix_mode(&mut self, mode: MatrixMode);

    /// Duplicates the top of the current matrix stack.
    fn push_matrix(&mut self);

    /// Discards the top of the current matrix stack.
    fn pop_matrix(&mut self);

    /// Replaces the top of the current matrix stack with the identity.
    fn load_identity(&mut self);

    /// Post-multiplies the top of the current matrix stack by `m`.
    fn mult_matrix(&mut self, m: &Transform3d);

    /// Returns the top of the given matrix stack.
    fn current_matrix(&self, mode: MatrixMode) -> Transform3d;

    /// Multiplies the current matrix by a translation.
    fn translate(&mut self, offset: Vec3) {
        self.mult_matrix(&Transform3d::from_translation(offset[0], offset[1], offset[2]));
    }

    /// Multiplies the current matrix by a rotation of `degrees` around `axis`.
    fn rotate(&mut self, degrees: f64, axis: Vec3) {
        self.mult_matrix(&Transform3d::from_axis_angle(degrees, axis));
    }

    /// Multiplies the current matrix by a scale.
    fn scale(&mut self, factors: Vec3) {
        self.mult_matrix(&Transform3d::from_scale(factors[0], factors[1], factors[2]));
    }

    /// Returns the current viewport.
    fn viewport(&self) -> Viewport;

    /// Replaces the current viewport.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Saves the given attribute group.
    fn push_attrib(&mut self, group: AttribGroup);

    /// Restores the most recently saved attribute group.
    fn pop_attrib(&mut self);

    /// Enables a feature.
    fn enable(&mut self, cap: Capability);

    /// Disables a feature.
    fn disable(&mut self, cap: Capability);

    /// Allocates a texture object.
    fn create_texture(&mut self) -> Result<TextureId, BackendError>;

    /// Binds a texture for subsequent sampling and uploads.
    fn bind_texture(&mut self, id: TextureId);

    /// Uploads RGBA pixel data into a texture.
    fn upload_texture(&mut self, id: TextureId, image: &Image) -> Result<(), BackendError>;

    /// Sets the filters of the bound texture.
    fn set_texture_filter(&mut self, min: TextureFilter, mag: TextureFilter);

    /// Sets the wrap modes of the bound texture.
    fn set_texture_wrap(&mut self, s: TextureWrap, t: TextureWrap);

    /// Sets the blend function.
    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor);

    /// Opens a primitive batch.
    fn begin(&mut self, primitive: Primitive);

    /// Sets the current vertex color.
    fn color(&mut self, color: Color);

    /// Sets the current texture coordinate.
    fn tex_coord(&mut self, coord: Vec3);

    /// Sets the current normal.
    fn normal(&mut self, normal: Vec3);

    /// Emits a vertex with the current attributes.
    fn vertex(&mut self, position: [f64; 4]);

    /// Closes the open primitive batch.
    fn end(&mut self);

    /// Fills an axis-aligned rectangle in the current coordinate space with
    /// the current color.
    fn fill_rect(&mut self, rect: Rect) {
        self.begin(Primitive::Quads);
        self.vertex([rect.x0, rect.y0, 0.0, 1.0]);
        self.vertex([rect.x1, rect.y0, 0.0, 1.0]);
        self.vertex([rect.x1, rect.y1, 0.0, 1.0]);
        self.vertex([rect.x0, rect.y1, 0.0, 1.0]);
        self.end();
    }
}
