// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-axis layout.

use kurbo::{Point, Rect, Size};

use super::{LayoutVector, ZeroWeightPolicy};
use crate::error::LayoutError;

/// A (column, row) index pair addressing one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellPair {
    /// Column index (x axis).
    pub col: usize,
    /// Row index (y axis).
    pub row: usize,
}

impl CellPair {
    /// Creates a cell pair.
    #[inline]
    #[must_use]
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// Result of a grid hit-test: the cell index along each axis, if any.
///
/// Either axis can miss independently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellsAt {
    /// Column containing the x coordinate.
    pub col: Option<usize>,
    /// Row containing the y coordinate.
    pub row: Option<usize>,
}

impl CellsAt {
    /// Returns the pair when both axes hit.
    #[inline]
    #[must_use]
    pub fn pair(self) -> Option<CellPair> {
        Some(CellPair::new(self.col?, self.row?))
    }
}

/// Rows and columns laid out on perpendicular axes.
///
/// Rows partition the height (y) and columns the width (x). Coordinates are
/// window pixels with the origin at the bottom-left, so row 0 is the bottom
/// row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grid {
    rows: LayoutVector,
    cols: LayoutVector,
}

impl Grid {
    /// Creates a grid of uniformly weighted cells.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: LayoutVector::uniform(rows),
            cols: LayoutVector::uniform(cols),
        }
    }

    /// Creates a grid from explicit row and column vectors.
    #[must_use]
    pub fn from_vectors(rows: LayoutVector, cols: LayoutVector) -> Self {
        Self { rows, cols }
    }

    /// The row vector (y axis).
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &LayoutVector {
        &self.rows
    }

    /// The column vector (x axis).
    #[inline]
    #[must_use]
    pub fn cols(&self) -> &LayoutVector {
        &self.cols
    }

    /// Mutable row vector.
    pub fn rows_mut(&mut self) -> &mut LayoutVector {
        &mut self.rows
    }

    /// Mutable column vector.
    pub fn cols_mut(&mut self) -> &mut LayoutVector {
        &mut self.cols
    }

    /// Lays out rows against `size.height` and columns against `size.width`.
    ///
    /// # Errors
    ///
    /// See [`compute_with`](Self::compute_with).
    pub fn compute(&mut self, size: Size) -> Result<(), LayoutError> {
        self.compute_with(size, ZeroWeightPolicy::Reject)
    }

    /// Lays out both axes under the given zero-weight policy.
    ///
    /// # Errors
    ///
    /// Returns the first axis error from
    /// [`LayoutVector::compute_with`]. Both axes are validated before
    /// either is written, so a failed compute leaves the grid untouched.
    pub fn compute_with(&mut self, size: Size, policy: ZeroWeightPolicy) -> Result<(), LayoutError> {
        let rows = self.rows.share(size.height, policy)?;
        let cols = self.cols.share(size.width, policy)?;
        self.rows.apply(rows);
        self.cols.apply(cols);
        Ok(())
    }

    /// Returns the pair addressing column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[track_caller]
    #[must_use]
    pub fn cell_pair(&self, x: usize, y: usize) -> CellPair {
        assert!(
            x < self.cols.len(),
            "column {x} out of range for a grid with {} columns",
            self.cols.len()
        );
        assert!(
            y < self.rows.len(),
            "row {y} out of range for a grid with {} rows",
            self.rows.len()
        );
        CellPair::new(x, y)
    }

    /// Returns `true` if `pair` addresses a cell of this grid.
    #[inline]
    #[must_use]
    pub fn contains_pair(&self, pair: CellPair) -> bool {
        pair.col < self.cols.len() && pair.row < self.rows.len()
    }

    /// Hit-tests `pos` against the computed layout, per axis.
    #[must_use]
    pub fn cells_at(&self, pos: Point) -> CellsAt {
        CellsAt {
            col: self.cols.index_at(pos.x),
            row: self.rows.index_at(pos.y),
        }
    }

    /// Lower-left corner of a cell.
    ///
    /// # Panics
    ///
    /// Panics if `pair` is out of range.
    #[track_caller]
    #[must_use]
    pub fn cell_origin(&self, pair: CellPair) -> Point {
        Point::new(self.cols[pair.col].offset(), self.rows[pair.row].offset())
    }

    /// Extent of a cell.
    ///
    /// # Panics
    ///
    /// Panics if `pair` is out of range.
    #[track_caller]
    #[must_use]
    pub fn cell_size(&self, pair: CellPair) -> Size {
        Size::new(self.cols[pair.col].size(), self.rows[pair.row].size())
    }

    /// Rectangle covered by a cell.
    ///
    /// # Panics
    ///
    /// Panics if `pair` is out of range.
    #[track_caller]
    #[must_use]
    pub fn cell_rect(&self, pair: CellPair) -> Rect {
        Rect::from_origin_size(self.cell_origin(pair), self.cell_size(pair))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutCell;
    use alloc::vec;

    fn two_by_two() -> Grid {
        let mut grid = Grid::new(2, 2);
        grid.compute(Size::new(100.0, 100.0)).unwrap();
        grid
    }

    #[test]
    fn hit_inside_upper_right_quadrant() {
        let grid = two_by_two();
        let hit = grid.cells_at(Point::new(60.0, 60.0));
        let pair = hit.pair().expect("both axes hit");
        assert_eq!(pair, CellPair::new(1, 1), "upper-right cell");
        assert_eq!(
            grid.cell_rect(pair),
            Rect::new(50.0, 50.0, 100.0, 100.0),
            "cell spans [50, 100) on both axes"
        );
    }

    #[test]
    fn hit_outside_misses_both_axes() {
        let grid = two_by_two();
        let hit = grid.cells_at(Point::new(150.0, 150.0));
        assert_eq!(hit, CellsAt::default(), "no cell on either axis");
        assert_eq!(hit.pair(), None, "no pair");
    }

    #[test]
    fn axes_miss_independently() {
        let grid = two_by_two();
        let hit = grid.cells_at(Point::new(20.0, 120.0));
        assert_eq!(hit.col, Some(0), "x hits the first column");
        assert_eq!(hit.row, None, "y is above the grid");
        assert_eq!(hit.pair(), None, "a partial hit is a miss");
    }

    #[test]
    fn rows_follow_height_and_cols_follow_width() {
        let mut grid = Grid::from_vectors(
            LayoutVector::new(vec![LayoutCell::fixed(20.0), LayoutCell::weighted(1.0)]),
            LayoutVector::uniform(4),
        );
        grid.compute(Size::new(400.0, 100.0)).unwrap();
        assert_eq!(grid.cols()[1].offset(), 100.0, "columns split the width");
        assert_eq!(grid.rows()[1].size(), 80.0, "rows split the height");
        assert_eq!(
            grid.cell_size(CellPair::new(3, 1)),
            Size::new(100.0, 80.0),
            "cell size combines both axes"
        );
    }

    #[test]
    fn failed_compute_leaves_both_axes_alone() {
        let mut grid = Grid::from_vectors(
            LayoutVector::uniform(2),
            LayoutVector::new(vec![LayoutCell::fixed(10.0)]),
        );
        let err = grid.compute(Size::new(50.0, 50.0)).unwrap_err();
        assert_eq!(
            err,
            LayoutError::ZeroWeight { remainder: 40.0 },
            "columns cannot absorb the remainder"
        );
        assert!(!grid.rows()[0].is_computed(), "rows were not written");

        grid.compute_with(Size::new(50.0, 50.0), ZeroWeightPolicy::Collapse)
            .unwrap();
        assert_eq!(grid.cols()[0].size(), 10.0, "collapsed to fixed size");
        assert_eq!(grid.rows()[1].offset(), 25.0, "rows split normally");
    }

    #[test]
    fn cell_pair_in_range() {
        let grid = Grid::new(3, 2);
        assert_eq!(grid.cell_pair(1, 2), CellPair::new(1, 2), "column 1, row 2");
        assert!(grid.contains_pair(CellPair::new(1, 2)), "in range");
        assert!(!grid.contains_pair(CellPair::new(2, 0)), "only two columns");
    }

    #[test]
    #[should_panic(expected = "column 2 out of range")]
    fn cell_pair_out_of_range_panics() {
        let grid = Grid::new(3, 2);
        let _ = grid.cell_pair(2, 0);
    }
}
