// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reversible backend state changes attached to nodes.
//!
//! A [`Modification`] is applied while its owning node pushes state and
//! reverted while it pops, once per pass. The built-in modifications leave
//! [`revert`](Modification::revert) as a no-op: the state they touch is
//! expected to be overwritten by its next user, or to become irrelevant once
//! the owning node's enable toggles are restored.
//!
//! Within one node, modifications are applied in insertion order and
//! reverted in reverse order. They must not depend on the order of their
//! siblings, only on parents applying before children.

use alloc::boxed::Box;
use core::fmt;

use crate::backend::{Backend, BlendFactor, TextureFilter, TextureWrap};
use crate::error::RenderError;

/// A backend state change that can be applied and later undone.
pub trait Modification: fmt::Debug {
    /// Performs the state change.
    ///
    /// # Errors
    ///
    /// Implementations propagate backend failures.
    fn apply(&mut self, backend: &mut dyn Backend) -> Result<(), RenderError>;

    /// Undoes the state change. Defaults to a no-op.
    ///
    /// # Errors
    ///
    /// Implementations that cannot be reverted return an error instead.
    fn revert(&mut self, backend: &mut dyn Backend) -> Result<(), RenderError> {
        _ = backend;
        Ok(())
    }
}

/// Sets the blend function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlendFunc {
    /// Source factor.
    pub src: BlendFactor,
    /// Destination factor.
    pub dst: BlendFactor,
}

impl BlendFunc {
    /// Creates a blend function modification.
    #[must_use]
    pub const fn new(src: BlendFactor, dst: BlendFactor) -> Self {
        Self { src, dst }
    }

    /// Standard "over" compositing with non-premultiplied alpha.
    #[must_use]
    pub const fn alpha() -> Self {
        Self::new(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha)
    }
}

impl Modification for BlendFunc {
    fn apply(&mut self, backend: &mut dyn Backend) -> Result<(), RenderError> {
        backend.blend_func(self.src, self.dst);
        Ok(())
    }
}

/// Sets the minification and magnification filters of the bound texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TexFilter {
    /// Minification filter.
    pub min: TextureFilter,
    /// Magnification filter.
    pub mag: TextureFilter,
}

impl Modification for TexFilter {
    fn apply(&mut self, backend: &mut dyn Backend) -> Result<(), RenderError> {
        backend.set_texture_filter(self.min, self.mag);
        Ok(())
    }
}

/// Sets the wrap modes of the bound texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TexWrap {
    /// Wrap mode along `s`.
    pub s: TextureWrap,
    /// Wrap mode along `t`.
    pub t: TextureWrap,
}

impl Modification for TexWrap {
    fn apply(&mut self, backend: &mut dyn Backend) -> Result<(), RenderError> {
        backend.set_texture_wrap(self.s, self.t);
        Ok(())
    }
}

/// Runs a closure against the backend when applied.
///
/// An escape hatch for state the other modifications do not cover.
pub struct Call {
    func: Box<dyn FnMut(&mut dyn Backend)>,
}

impl Call {
    /// Wraps a closure.
    pub fn new(func: impl FnMut(&mut dyn Backend) + 'static) -> Self {
        Self {
            func: Box::new(func),
        }
    }
}

impl fmt::Debug for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call").finish_non_exhaustive()
    }
}

impl Modification for Call {
    fn apply(&mut self, backend: &mut dyn Backend) -> Result<(), RenderError> {
        (self.func)(backend);
        Ok(())
    }
}
