// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-dimensional layout.

use alloc::vec::Vec;
use core::ops::Index;

use super::ZeroWeightPolicy;
use crate::error::LayoutError;

/// Offset and size of a cell that has not been laid out.
const UNSET: f64 = -1.0;

/// A single cell along one layout axis.
///
/// `weight` and `fixed` are inputs; `offset` and `size` are written only by
/// the owning [`LayoutVector`] and read `-1.0` until the first successful
/// compute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutCell {
    /// Relative share of the space left after fixed allocations (≥ 0).
    pub weight: f64,
    /// Space this cell always receives (≥ 0).
    pub fixed: f64,
    offset: f64,
    size: f64,
    computed: bool,
}

impl LayoutCell {
    /// Creates a cell with the given weight and fixed size.
    #[must_use]
    pub const fn new(weight: f64, fixed: f64) -> Self {
        Self {
            weight,
            fixed,
            offset: UNSET,
            size: UNSET,
            computed: false,
        }
    }

    /// A purely weighted cell.
    #[must_use]
    pub const fn weighted(weight: f64) -> Self {
        Self::new(weight, 0.0)
    }

    /// A purely fixed cell with zero weight.
    #[must_use]
    pub const fn fixed(size: f64) -> Self {
        Self::new(0.0, size)
    }

    /// Start of the cell along its axis, or `-1.0` if not computed.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Extent of the cell along its axis, or `-1.0` if not computed.
    #[inline]
    #[must_use]
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Returns `true` once the owning vector has laid this cell out.
    #[inline]
    #[must_use]
    pub fn is_computed(&self) -> bool {
        self.computed
    }

    /// Returns `true` if `coord` falls in `[offset, offset + size)`.
    #[inline]
    #[must_use]
    pub fn contains(&self, coord: f64) -> bool {
        coord >= self.offset && coord < self.offset + self.size
    }
}

impl Default for LayoutCell {
    fn default() -> Self {
        Self::weighted(1.0)
    }
}

/// How the space left after fixed allocations is shared out.
#[derive(Clone, Copy, Debug)]
pub(super) struct Share {
    remainder: f64,
    wtotal: f64,
}

/// An ordered, fixed-length run of cells along one axis.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutVector {
    cells: Vec<LayoutCell>,
}

impl LayoutVector {
    /// Wraps the given cells.
    #[must_use]
    pub fn new(cells: Vec<LayoutCell>) -> Self {
        debug_assert!(
            cells.iter().all(|c| c.weight >= 0.0 && c.fixed >= 0.0),
            "layout cells need non-negative weight and fixed size"
        );
        Self { cells }
    }

    /// Creates `count` default cells (weight 1, no fixed size).
    #[must_use]
    pub fn uniform(count: usize) -> Self {
        Self {
            cells: alloc::vec![LayoutCell::default(); count],
        }
    }

    /// Number of cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if there are no cells.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over the cells in order.
    pub fn iter(&self) -> core::slice::Iter<'_, LayoutCell> {
        self.cells.iter()
    }

    /// Returns the cell at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LayoutCell> {
        self.cells.get(index)
    }

    /// Mutable access to a cell's inputs. The computed offset and size stay
    /// as they were until the next compute.
    pub fn cell_mut(&mut self, index: usize) -> Option<&mut LayoutCell> {
        self.cells.get_mut(index)
    }

    /// Lays the cells out against `dim` with [`ZeroWeightPolicy::Reject`].
    ///
    /// # Errors
    ///
    /// See [`compute_with`](Self::compute_with).
    pub fn compute(&mut self, dim: f64) -> Result<(), LayoutError> {
        self.compute_with(dim, ZeroWeightPolicy::Reject)
    }

    /// Lays the cells out against `dim`.
    ///
    /// Each cell, in order, starts where the previous one ended and receives
    /// `fixed + remainder * weight / wtotal`, where `remainder` is `dim`
    /// minus every fixed allocation. If the fixed allocations exceed `dim`,
    /// weighted cells shrink below their fixed size. Recomputing against the
    /// same `dim` yields the same layout.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::InvalidExtent`] if `dim` is negative or not finite.
    /// - [`LayoutError::ZeroWeight`] if there are cells but none has positive
    ///   weight, space remains, and `policy` is [`ZeroWeightPolicy::Reject`].
    ///   An empty vector lays out nothing and never fails this way.
    ///
    /// On error no cell is modified.
    pub fn compute_with(&mut self, dim: f64, policy: ZeroWeightPolicy) -> Result<(), LayoutError> {
        let share = self.share(dim, policy)?;
        self.apply(share);
        Ok(())
    }

    /// Validates `dim` and works out the shared remainder without touching
    /// any cell.
    pub(super) fn share(&self, dim: f64, policy: ZeroWeightPolicy) -> Result<Share, LayoutError> {
        if !dim.is_finite() || dim < 0.0 {
            return Err(LayoutError::InvalidExtent(dim));
        }
        let remainder = dim - self.cells.iter().map(|c| c.fixed).sum::<f64>();
        let wtotal = self.cells.iter().map(|c| c.weight).sum::<f64>();
        // With no cells there is nothing to share the remainder out to.
        if wtotal <= 0.0 && remainder != 0.0 && !self.cells.is_empty() {
            match policy {
                ZeroWeightPolicy::Reject => return Err(LayoutError::ZeroWeight { remainder }),
                ZeroWeightPolicy::Collapse => {
                    log::debug!(
                        "layout: {remainder} units left unallocated across {} zero-weight cells",
                        self.cells.len()
                    );
                }
            }
        }
        Ok(Share { remainder, wtotal })
    }

    pub(super) fn apply(&mut self, share: Share) {
        let mut running = 0.0;
        for cell in &mut self.cells {
            let extra = if share.wtotal > 0.0 {
                share.remainder * cell.weight / share.wtotal
            } else {
                0.0
            };
            cell.offset = running;
            cell.size = cell.fixed + extra;
            cell.computed = true;
            running += cell.size;
        }
    }

    /// Returns the index of the cell whose half-open interval contains
    /// `coord`, or `None` on a miss.
    #[must_use]
    pub fn index_at(&self, coord: f64) -> Option<usize> {
        self.cells.iter().position(|c| c.contains(coord))
    }

    /// Total extent currently covered by the computed cells.
    #[must_use]
    pub fn extent(&self) -> f64 {
        self.cells
            .iter()
            .filter(|c| c.is_computed())
            .map(|c| c.size)
            .sum()
    }
}

impl Index<usize> for LayoutVector {
    type Output = LayoutCell;

    #[track_caller]
    fn index(&self, index: usize) -> &LayoutCell {
        let len = self.cells.len();
        self.cells
            .get(index)
            .unwrap_or_else(|| panic!("layout cell index {index} out of range for {len} cells"))
    }
}

impl<'a> IntoIterator for &'a LayoutVector {
    type Item = &'a LayoutCell;
    type IntoIter = core::slice::Iter<'a, LayoutCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

impl From<Vec<LayoutCell>> for LayoutVector {
    fn from(cells: Vec<LayoutCell>) -> Self {
        Self::new(cells)
    }
}
