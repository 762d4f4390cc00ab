// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen-space widgets laid out on grids.
//!
//! A [`Widget`] is a node bound to one grid cell per axis. Widgets draw in
//! an environment where both matrix stacks hold the identity, so vertex
//! coordinates are normalized device coordinates, while the viewport is
//! narrowed to the widget's cell. The enclosing [`Container`] sets this up:
//!
//! - A **root container** (no cell) pushes identity matrices and lays its
//!   grid out against the full current viewport.
//! - A **nested container** lays its grid out against its own cell size and
//!   narrows the viewport like any widget.
//! - After laying out, a container writes each child widget's
//!   [`pos`](Widget::pos) and [`size`](Widget::size) from the child's cell.
//!
//! Widgets ignore the generic node state (toggles, transform, texture,
//! modifications). Their push saves and narrows the viewport; their pop
//! restores it.
//!
//! ## Events
//!
//! A container forwards a positional event to the one child whose cell
//! contains the position, translated so the child's lower-left corner is
//! the origin. Events that hit no child are dropped. Non-positional events
//! reach every child.

mod container;
mod label;
mod slider;

use alloc::string::String;

use kurbo::{Point, Rect, Size};

pub use container::Container;
pub use label::{HAlign, Label, Rasterizer, VAlign};
pub use slider::{Orientation, Slider};

use crate::backend::{AttribGroup, Backend, Capability, Color, MatrixMode, Viewport};
use crate::error::RenderError;
use crate::event::Event;
use crate::layout::{CellPair, Grid};
use crate::node::{Frame, Node, PushedState};
use crate::trace::NodeTag;

/// The full normalized-device-coordinate square.
pub(crate) const NDC: Rect = Rect::new(-1.0, -1.0, 1.0, 1.0);

/// What a widget shows.
#[derive(Debug)]
pub enum WidgetKind {
    /// Background fill only.
    Panel,
    /// Lays out and routes events to child widgets.
    Container(Container),
    /// Text.
    Label(Label),
    /// A draggable value.
    Slider(Slider),
}

impl WidgetKind {
    /// Returns the trace tag for this kind.
    #[must_use]
    pub fn tag(&self) -> NodeTag {
        match self {
            Self::Panel => NodeTag::Panel,
            Self::Container(_) => NodeTag::Container,
            Self::Label(_) => NodeTag::Label,
            Self::Slider(_) => NodeTag::Slider,
        }
    }
}

/// A screen-space element bound to a grid cell.
#[derive(Debug)]
pub struct Widget {
    /// The cell this widget occupies in its parent's grid. `None` marks a
    /// root container.
    pub cell: Option<CellPair>,
    /// Foreground (text) color. Defaults to white where used.
    pub foreground: Option<Color>,
    /// Background fill color.
    pub background: Option<Color>,
    /// Lower-left corner in the parent's coordinates. Written by the parent
    /// container during push; `(-1, -1)` until then.
    pub pos: Point,
    /// Extent in pixels. Written like [`pos`](Self::pos).
    pub size: Size,
    /// What this widget shows.
    pub kind: WidgetKind,
}

impl Widget {
    /// Creates a widget in `cell`.
    #[must_use]
    pub fn new(cell: Option<CellPair>, kind: WidgetKind) -> Self {
        Self {
            cell,
            foreground: None,
            background: None,
            pos: Point::new(-1.0, -1.0),
            size: Size::new(-1.0, -1.0),
            kind,
        }
    }

    /// A background-only widget.
    #[must_use]
    pub fn panel(cell: CellPair) -> Self {
        Self::new(Some(cell), WidgetKind::Panel)
    }

    /// A root container covering the whole viewport.
    #[must_use]
    pub fn root(grid: Grid) -> Self {
        Self::new(None, WidgetKind::Container(Container::new(grid)))
    }

    /// A container nested in `cell` of its parent's grid.
    #[must_use]
    pub fn container(cell: CellPair, grid: Grid) -> Self {
        Self::new(Some(cell), WidgetKind::Container(Container::new(grid)))
    }

    /// A label showing `text`.
    #[must_use]
    pub fn label(cell: CellPair, text: impl Into<String>) -> Self {
        Self::new(Some(cell), WidgetKind::Label(Label::new(text)))
    }

    /// A slider.
    #[must_use]
    pub fn slider(cell: CellPair, slider: Slider) -> Self {
        Self::new(Some(cell), WidgetKind::Slider(slider))
    }

    /// Sets the foreground color.
    #[must_use]
    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    /// Sets the background color.
    #[must_use]
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Returns `true` for a container without a cell.
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.cell.is_none()
    }

    /// The widget's rectangle in its parent's coordinates.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.pos, self.size)
    }

    /// Copies this widget's cell rectangle out of `grid`.
    pub(crate) fn place(&mut self, grid: &Grid) {
        let Some(cell) = self.cell else {
            return;
        };
        if grid.contains_pair(cell) {
            self.pos = grid.cell_origin(cell);
            self.size = grid.cell_size(cell);
        } else {
            log::debug!(
                "widget cell {cell:?} is outside a {}x{} grid; leaving it unplaced",
                grid.cols().len(),
                grid.rows().len()
            );
        }
    }

    pub(crate) fn push_state(
        &mut self,
        frame: &mut Frame<'_>,
        pushed: &mut PushedState,
        children: &mut [Node],
    ) -> Result<(), RenderError> {
        if let WidgetKind::Container(container) = &mut self.kind {
            if self.cell.is_none() {
                let backend = frame.backend();
                reset_matrices(backend);
                pushed.reset_matrices = true;
                self.pos = Point::ORIGIN;
                self.size = backend.viewport().size();
                return container.layout(frame, self.size, children);
            }
            container.layout(frame, self.size, children)?;
        }
        let backend = frame.backend();
        backend.push_attrib(AttribGroup::Viewport);
        pushed.viewport = true;
        let outer = backend.viewport();
        backend.set_viewport(Viewport::from_origin_size(
            outer.origin() + self.pos.to_vec2(),
            self.size,
        ));
        Ok(())
    }

    pub(crate) fn pop_state(&mut self, backend: &mut dyn Backend, pushed: &PushedState) {
        if pushed.viewport {
            backend.pop_attrib();
        }
        if pushed.reset_matrices {
            restore_matrices(backend);
        }
    }

    pub(crate) fn render(
        &mut self,
        frame: &mut Frame<'_>,
        children: &mut [Node],
    ) -> Result<(), RenderError> {
        match &mut self.kind {
            WidgetKind::Panel => {
                let backend = frame.backend();
                backend.push_attrib(AttribGroup::Enable);
                flat_background(backend, self.background);
                backend.pop_attrib();
                Ok(())
            }
            WidgetKind::Container(_) => frame.render_children(children),
            WidgetKind::Label(label) => label.draw(frame, self.foreground, self.background),
            WidgetKind::Slider(slider) => slider.draw(frame, self.foreground, self.background),
        }
    }

    pub(crate) fn handle(&mut self, event: &Event) {
        if let WidgetKind::Slider(slider) = &mut self.kind {
            slider.handle(event, self.size);
        }
    }
}

/// Pushes both matrix stacks and loads the identity into each, leaving
/// modelview selected.
fn reset_matrices(backend: &mut dyn Backend) {
    backend.set_matrix_mode(MatrixMode::Projection);
    backend.push_matrix();
    backend.load_identity();
    backend.set_matrix_mode(MatrixMode::Modelview);
    backend.push_matrix();
    backend.load_identity();
}

fn restore_matrices(backend: &mut dyn Backend) {
    backend.set_matrix_mode(MatrixMode::Projection);
    backend.pop_matrix();
    backend.set_matrix_mode(MatrixMode::Modelview);
    backend.pop_matrix();
}

/// Disables texturing and depth testing and fills the viewport with
/// `background`, if set. Callers own the enclosing enable-group push.
pub(crate) fn flat_background(backend: &mut dyn Backend, background: Option<Color>) {
    backend.disable(Capability::Texture2d);
    backend.disable(Capability::DepthTest);
    if let Some(color) = background {
        backend.color(color);
        backend.fill_rect(NDC);
    }
}
