// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Size};

use crate::error::{LayoutError, RenderError};
use crate::layout::{Grid, ZeroWeightPolicy};
use crate::node::{Frame, Node};

/// A widget that lays out child widgets on a [`Grid`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Container {
    /// The layout. Recomputed every time the container pushes state.
    pub grid: Grid,
}

impl Container {
    /// Creates a container with the given grid.
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self { grid }
    }

    /// Index of the child whose cell pair is the one containing `pos`.
    ///
    /// Uses the layout from the most recent push. Returns `None` when `pos`
    /// misses the grid on either axis or no child occupies the hit cell.
    #[must_use]
    pub fn child_index_at(&self, pos: Point, children: &[Node]) -> Option<usize> {
        let hit = self.grid.cells_at(pos).pair()?;
        children
            .iter()
            .position(|child| child.as_widget().is_some_and(|w| w.cell == Some(hit)))
    }

    /// Lays the grid out against `size` and places every child widget.
    ///
    /// # Errors
    ///
    /// Returns the grid's layout error; children are not moved then.
    pub fn arrange(
        &mut self,
        size: Size,
        policy: ZeroWeightPolicy,
        children: &mut [Node],
    ) -> Result<(), LayoutError> {
        self.grid.compute_with(size, policy)?;
        for child in children {
            if let Some(widget) = child.as_widget_mut() {
                widget.place(&self.grid);
            }
        }
        Ok(())
    }

    /// [`arrange`](Self::arrange) under the frame's policy, recorded in the
    /// frame's trace.
    pub(crate) fn layout(
        &mut self,
        frame: &mut Frame<'_>,
        size: Size,
        children: &mut [Node],
    ) -> Result<(), RenderError> {
        self.arrange(size, frame.config().zero_weight, children)?;
        frame.record_layout(self.grid.cols().len(), self.grid.rows().len(), size);
        Ok(())
    }
}
