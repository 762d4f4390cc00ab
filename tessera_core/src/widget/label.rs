// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text widgets.

use alloc::string::String;

use kurbo::{Rect, Size};

use super::flat_background;
use crate::backend::{AttribGroup, Backend, Capability, Color, Primitive};
use crate::error::RenderError;
use crate::node::Frame;
use crate::texture::{Image, Texture};

/// Turns text into pixels.
///
/// Font loading and shaping live outside the scene graph; labels only need
/// an RGBA image of the rendered string.
pub trait Rasterizer {
    /// Renders `text` in `color`.
    ///
    /// # Errors
    ///
    /// Implementations report failures as [`RenderError::Text`].
    fn rasterize(&mut self, text: &str, color: Color) -> Result<Image, RenderError>;
}

/// Horizontal placement of text within a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HAlign {
    /// Flush with the left edge.
    Left,
    /// Centered.
    #[default]
    Center,
    /// Flush with the right edge.
    Right,
    /// Stretched across the full width.
    Fill,
}

impl HAlign {
    const fn edges(self) -> (bool, bool) {
        match self {
            Self::Left => (true, false),
            Self::Center => (false, false),
            Self::Right => (false, true),
            Self::Fill => (true, true),
        }
    }
}

/// Vertical placement of text within a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VAlign {
    /// Flush with the bottom edge.
    Bottom,
    /// Centered.
    #[default]
    Middle,
    /// Flush with the top edge.
    Top,
    /// Stretched across the full height.
    Fill,
}

impl VAlign {
    const fn edges(self) -> (bool, bool) {
        match self {
            Self::Bottom => (true, false),
            Self::Middle => (false, false),
            Self::Top => (false, true),
            Self::Fill => (true, true),
        }
    }
}

/// A line of text drawn from a rasterized texture.
///
/// The texture is rasterized on first draw and again only when the text or
/// the foreground color differs from what it holds.
#[derive(Debug, Default)]
pub struct Label {
    /// Text to show. Empty text draws only the background.
    pub text: String,
    /// Horizontal alignment.
    pub h_align: HAlign,
    /// Vertical alignment.
    pub v_align: VAlign,
    texture: Option<Texture>,
    rendered: Option<(String, Color)>,
}

impl Label {
    /// Creates a centered label.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Sets both alignments.
    #[must_use]
    pub fn with_align(mut self, h: HAlign, v: VAlign) -> Self {
        self.h_align = h;
        self.v_align = v;
        self
    }

    /// The rasterized text, once drawn.
    #[must_use]
    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    /// Returns `true` if drawing with `foreground` would rasterize again.
    #[must_use]
    pub fn is_stale(&self, foreground: Color) -> bool {
        self.rendered
            .as_ref()
            .is_none_or(|(text, color)| *text != self.text || *color != foreground)
    }

    pub(crate) fn draw(
        &mut self,
        frame: &mut Frame<'_>,
        foreground: Option<Color>,
        background: Option<Color>,
    ) -> Result<(), RenderError> {
        let backend = frame.backend();
        backend.push_attrib(AttribGroup::Enable);
        flat_background(backend, background);
        let result = if self.text.is_empty() {
            Ok(())
        } else {
            self.draw_text(frame, foreground.unwrap_or(Color::WHITE))
        };
        frame.backend().pop_attrib();
        result
    }

    /// Draws the text quad, rasterizing first if needed.
    pub(crate) fn draw_text(
        &mut self,
        frame: &mut Frame<'_>,
        foreground: Color,
    ) -> Result<(), RenderError> {
        if self.is_stale(foreground) {
            self.rasterize(frame, foreground)?;
        }
        let Some(texture) = &self.texture else {
            return Ok(());
        };
        let Some(image) = texture.image() else {
            return Ok(());
        };
        let backend = frame.backend();
        let viewport = backend.viewport();
        if viewport.width <= 0 || viewport.height <= 0 {
            return Ok(());
        }
        let quad = text_quad(
            Size::new(f64::from(image.width()), f64::from(image.height())),
            viewport.size(),
            self.h_align,
            self.v_align,
        );
        backend.push_attrib(AttribGroup::Enable);
        backend.enable(Capability::Texture2d);
        backend.bind_texture(texture.id());
        textured_quad(backend, quad);
        backend.pop_attrib();
        Ok(())
    }

    fn rasterize(&mut self, frame: &mut Frame<'_>, foreground: Color) -> Result<(), RenderError> {
        let image = frame
            .rasterizer()
            .ok_or(RenderError::NoRasterizer)?
            .rasterize(&self.text, foreground)?;
        if self.texture.is_none() {
            self.texture = Some(Texture::new(frame.backend(), None)?);
        }
        if let Some(texture) = &mut self.texture {
            texture.set_image(image);
            texture.reload(frame.backend())?;
        }
        self.rendered = Some((self.text.clone(), foreground));
        Ok(())
    }
}

/// Places a texture of `text` pixels in a viewport of `viewport` pixels, in
/// normalized device coordinates.
///
/// Unstretched, the quad covers exactly the texture's pixel size.
fn text_quad(text: Size, viewport: Size, h: HAlign, v: VAlign) -> Rect {
    let (x0, x1) = span(text.width / viewport.width, h.edges());
    let (y0, y1) = span(text.height / viewport.height, v.edges());
    Rect::new(x0, y0, x1, y1)
}

/// One axis of [`text_quad`]: `half` is the half-extent in NDC; `start` and
/// `end` pin the quad to the low and high edges.
fn span(half: f64, (start, end): (bool, bool)) -> (f64, f64) {
    let (mut lo, mut hi) = (-half, half);
    if start {
        lo = -1.0;
        hi -= 1.0 - half;
    }
    if end {
        hi = 1.0;
        if !start {
            lo += 1.0 - half;
        }
    }
    (lo, hi)
}

fn textured_quad(backend: &mut dyn Backend, quad: Rect) {
    backend.color(Color::WHITE);
    backend.begin(Primitive::Quads);
    backend.tex_coord([0.0, 0.0, 0.0]);
    backend.vertex([quad.x0, quad.y0, 0.0, 1.0]);
    backend.tex_coord([1.0, 0.0, 0.0]);
    backend.vertex([quad.x1, quad.y0, 0.0, 1.0]);
    backend.tex_coord([1.0, 1.0, 0.0]);
    backend.vertex([quad.x1, quad.y1, 0.0, 1.0]);
    backend.tex_coord([0.0, 1.0, 0.0]);
    backend.vertex([quad.x0, quad.y1, 0.0, 1.0]);
    backend.end();
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn assert_rect(actual: Rect, expected: Rect) {
        for (a, e) in [
            (actual.x0, expected.x0),
            (actual.y0, expected.y0),
            (actual.x1, expected.x1),
            (actual.y1, expected.y1),
        ] {
            assert!((a - e).abs() < EPS, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn centered_text_covers_its_pixel_size() {
        // 50x20 text in a 200x100 viewport: quarter width, fifth height.
        let quad = text_quad(
            Size::new(50.0, 20.0),
            Size::new(200.0, 100.0),
            HAlign::Center,
            VAlign::Middle,
        );
        assert_rect(quad, Rect::new(-0.25, -0.2, 0.25, 0.2));
    }

    #[test]
    fn edge_alignment_keeps_width() {
        let text = Size::new(50.0, 20.0);
        let viewport = Size::new(200.0, 100.0);
        let left = text_quad(text, viewport, HAlign::Left, VAlign::Bottom);
        assert_rect(left, Rect::new(-1.0, -1.0, -0.5, -0.6));
        let right = text_quad(text, viewport, HAlign::Right, VAlign::Top);
        assert_rect(right, Rect::new(0.5, 0.6, 1.0, 1.0));
    }

    #[test]
    fn fill_stretches_to_the_cell() {
        let quad = text_quad(
            Size::new(50.0, 20.0),
            Size::new(200.0, 100.0),
            HAlign::Fill,
            VAlign::Fill,
        );
        assert_rect(quad, Rect::new(-1.0, -1.0, 1.0, 1.0));
    }

    #[test]
    fn stale_until_rendered() {
        let label = Label::new("hi");
        assert!(label.is_stale(Color::WHITE), "never rasterized");
    }
}
