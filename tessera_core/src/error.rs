// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Render paths return [`RenderError`]; layout computation returns
//! [`LayoutError`]; backends report [`BackendError`]. Hit-test misses are
//! not errors and are expressed as `Option::None` instead.

use alloc::string::String;

use crate::texture::TextureId;

/// A failure reported by a [`Backend`](crate::backend::Backend).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The backend could not allocate another texture object.
    #[error("texture allocation failed")]
    TextureAllocation,
    /// The texture handle does not name a live texture.
    #[error("unknown texture {0:?}")]
    UnknownTexture(TextureId),
    /// The pixel buffer does not match the declared dimensions.
    #[error("image of {width}x{height} pixels has {len} bytes of RGBA data")]
    InvalidImage {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
        /// Actual byte length.
        len: usize,
    },
}

/// A degenerate layout input.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// No cell has positive weight, yet space remains after fixed
    /// allocations.
    #[error("no cell has positive weight but {remainder} units remain to distribute")]
    ZeroWeight {
        /// Space left over after fixed allocations.
        remainder: f64,
    },
    /// The extent to lay out against is negative or not finite.
    #[error("layout extent must be finite and non-negative, got {0}")]
    InvalidExtent(f64),
}

/// A failure during a render pass.
///
/// Whatever the failure, every node that pushed state has popped it again by
/// the time the error reaches the caller of
/// [`Frame::render`](crate::node::Frame::render).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RenderError {
    /// The backend rejected a call.
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// A container's grid could not be computed.
    #[error(transparent)]
    Layout(#[from] LayoutError),
    /// A transform was asked to revert itself.
    #[error("transforms cannot be reverted; the matrix stack restores them")]
    TransformRevert,
    /// A texture reload was requested without a source image.
    #[error("texture {0:?} has no source image to upload")]
    MissingImage(TextureId),
    /// A label needs text rasterized but the frame has no rasterizer.
    #[error("no text rasterizer is attached to the frame")]
    NoRasterizer,
    /// The text rasterizer failed.
    #[error("text rasterization failed: {0}")]
    Text(String),
    /// A custom drawable failed.
    #[error("custom drawable failed: {0}")]
    Draw(String),
}
