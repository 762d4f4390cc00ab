// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Texture handles and CPU-side pixel data.

use alloc::vec;
use alloc::vec::Vec;

use crate::backend::{Backend, Color};
use crate::error::{BackendError, RenderError};
use crate::modification::Modification;

/// Opaque handle to a backend texture object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureId(pub u32);

/// Tightly packed RGBA8 pixel data, bottom row first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Image {
    /// Wraps RGBA8 pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidImage`] if `pixels` is not exactly
    /// `width * height * 4` bytes long.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, BackendError> {
        let expected = (width as usize) * (height as usize) * 4;
        if pixels.len() != expected {
            return Err(BackendError::InvalidImage {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Creates an image filled with a single color.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "components are clamped to 0..=255 before the cast"
    )]
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        let texel = color
            .to_array()
            .map(|c| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8);
        let count = (width as usize) * (height as usize);
        let mut pixels = vec![0; count * 4];
        for chunk in pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&texel);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The raw RGBA8 bytes.
    #[inline]
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable access to the raw bytes. Call [`Texture::reload`] afterwards
    /// for the change to reach the backend.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }
}

/// A backend texture paired with the image it was uploaded from.
///
/// There is no change tracking: after mutating [`image_mut`](Self::image_mut)
/// the caller must [`reload`](Self::reload).
#[derive(Clone, Debug)]
pub struct Texture {
    id: TextureId,
    image: Option<Image>,
}

impl Texture {
    /// Allocates a texture and uploads `image` if one is given.
    ///
    /// # Errors
    ///
    /// Propagates allocation and upload failures from the backend.
    pub fn new(backend: &mut dyn Backend, image: Option<Image>) -> Result<Self, RenderError> {
        let id = backend.create_texture()?;
        let texture = Self { id, image };
        if texture.image.is_some() {
            texture.reload(backend)?;
        }
        Ok(texture)
    }

    /// The backend handle.
    #[inline]
    #[must_use]
    pub fn id(&self) -> TextureId {
        self.id
    }

    /// The source image, if any.
    #[must_use]
    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    /// Mutable access to the source image.
    pub fn image_mut(&mut self) -> Option<&mut Image> {
        self.image.as_mut()
    }

    /// Replaces the source image without uploading it.
    pub fn set_image(&mut self, image: Image) {
        self.image = Some(image);
    }

    /// Binds the texture and uploads the source image.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MissingImage`] when the texture has no source
    /// image, or the backend's upload error.
    pub fn reload(&self, backend: &mut dyn Backend) -> Result<(), RenderError> {
        let image = self.image.as_ref().ok_or(RenderError::MissingImage(self.id))?;
        backend.bind_texture(self.id);
        backend.upload_texture(self.id, image)?;
        Ok(())
    }
}

/// Binding a texture is a modification with a no-op revert; geometry stops
/// sampling it once [`Capability::Texture2d`](crate::backend::Capability)
/// is disabled again.
impl Modification for Texture {
    fn apply(&mut self, backend: &mut dyn Backend) -> Result<(), RenderError> {
        backend.bind_texture(self.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_rejects_short_buffer() {
        let err = Image::new(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            BackendError::InvalidImage {
                width: 2,
                height: 2,
                len: 15
            },
            "length mismatch should be reported with the declared size"
        );
    }

    #[test]
    fn solid_image_fills_every_texel() {
        let image = Image::solid(3, 2, Color::rgba(1.0, 0.0, 0.5, 1.0));
        assert_eq!(image.pixels().len(), 24, "3x2 RGBA");
        for texel in image.pixels().chunks_exact(4) {
            assert_eq!(texel, &[255, 0, 128, 255], "every texel has the fill color");
        }
    }
}
