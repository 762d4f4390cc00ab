// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tiling layout: weighted/fixed partitions along one axis, combined into
//! two-axis grids.
//!
//! A [`LayoutVector`] splits an extent into contiguous cells. Each cell gets
//! its `fixed` allocation plus a share of the remaining space proportional
//! to its `weight`. A [`Grid`] pairs a row vector (laid out against height)
//! with a column vector (laid out against width) and answers hit-tests with
//! half-open `[offset, offset + size)` intervals.
//!
//! ```
//! use tessera_core::layout::{LayoutCell, LayoutVector};
//!
//! let mut v = LayoutVector::new(vec![LayoutCell::fixed(10.0), LayoutCell::weighted(1.0)]);
//! v.compute(50.0).unwrap();
//! assert_eq!(v[0].size(), 10.0);
//! assert_eq!(v[1].offset(), 10.0);
//! assert_eq!(v[1].size(), 40.0);
//! ```

mod grid;
mod vector;

pub use grid::{CellPair, CellsAt, Grid};
pub use vector::{LayoutCell, LayoutVector};

/// What to do when no cell on an axis has positive weight but space is left
/// over after fixed allocations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ZeroWeightPolicy {
    /// Fail with [`LayoutError::ZeroWeight`](crate::LayoutError::ZeroWeight)
    /// and leave the cells as they were.
    #[default]
    Reject,
    /// Give every cell only its fixed size; the remainder stays unallocated
    /// at the end of the axis.
    Collapse,
}
