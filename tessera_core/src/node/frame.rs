// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-pass context and the push/pop scope guard.

use kurbo::Size;

use super::Node;
use crate::backend::{Backend, MatrixMode};
use crate::config::EngineConfig;
use crate::error::RenderError;
use crate::trace::{
    LayoutEvent, NodeTag, PassBeginEvent, PassSummary, PassSummaryBuilder, PopEvent, PushEvent,
    Tracer,
};
use crate::widget::Rasterizer;

/// What a node's push actually did, so its pop can undo exactly that.
///
/// Pushes are recorded step by step. If a push fails halfway, the record
/// covers only the completed steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PushedState {
    pub(crate) enable_group: bool,
    pub(crate) matrix: Option<MatrixMode>,
    pub(crate) modifications: usize,
    pub(crate) viewport: bool,
    pub(crate) reset_matrices: bool,
}

/// Everything a render pass needs besides the tree.
///
/// A frame borrows the backend, an optional text rasterizer, and an
/// optional trace sink for the duration of one or more passes.
///
/// ```
/// # use tessera_core::node::{Frame, Node};
/// # fn draw(backend: &mut dyn tessera_core::backend::Backend, scene: &mut Node) {
/// let mut frame = Frame::new(backend);
/// let summary = frame.render(scene).expect("scene renders");
/// assert_eq!(summary.pass_index, 0);
/// # }
/// ```
pub struct Frame<'a> {
    backend: &'a mut dyn Backend,
    rasterizer: Option<&'a mut dyn Rasterizer>,
    tracer: Tracer<'a>,
    config: EngineConfig,
    pass_index: u64,
    depth: u32,
    summary: PassSummaryBuilder,
}

impl core::fmt::Debug for Frame<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Frame")
            .field("rasterizer", &self.rasterizer.is_some())
            .field("tracer", &self.tracer)
            .field("config", &self.config)
            .field("pass_index", &self.pass_index)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

impl<'a> Frame<'a> {
    /// Creates a frame drawing to `backend` with the default configuration.
    #[must_use]
    pub fn new(backend: &'a mut dyn Backend) -> Self {
        Self {
            backend,
            rasterizer: None,
            tracer: Tracer::none(),
            config: EngineConfig::new(),
            pass_index: 0,
            depth: 0,
            summary: PassSummaryBuilder::new(0),
        }
    }

    /// Attaches a text rasterizer for labels.
    #[must_use]
    pub fn with_rasterizer(mut self, rasterizer: &'a mut dyn Rasterizer) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    /// Attaches a tracer.
    #[must_use]
    pub fn with_tracer(mut self, tracer: Tracer<'a>) -> Self {
        self.tracer = tracer;
        self
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Numbers the next pass `index`. Frames are cheap to recreate per pass;
    /// this keeps trace output from restarting at zero.
    #[must_use]
    pub fn with_pass_index(mut self, index: u64) -> Self {
        self.pass_index = index;
        self
    }

    /// The backend.
    #[inline]
    pub fn backend(&mut self) -> &mut dyn Backend {
        &mut *self.backend
    }

    /// The text rasterizer, if one is attached.
    pub fn rasterizer(&mut self) -> Option<&mut dyn Rasterizer> {
        match &mut self.rasterizer {
            Some(r) => Some(&mut **r),
            None => None,
        }
    }

    /// The active configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Index of the next (or current) pass.
    #[inline]
    #[must_use]
    pub fn pass_index(&self) -> u64 {
        self.pass_index
    }

    /// Nesting depth of the node currently rendering.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Runs one render pass over `root`: push, render, pop.
    ///
    /// When [`EngineConfig::restore_matrix_mode`] is set, the backend's
    /// matrix mode on return is the one it had on entry.
    ///
    /// # Errors
    ///
    /// Returns the first failure in the tree. All pushed state has been
    /// popped by then.
    pub fn render(&mut self, root: &mut Node) -> Result<PassSummary, RenderError> {
        let entry_mode = self.backend.matrix_mode();
        self.depth = 0;
        self.summary = PassSummaryBuilder::new(self.pass_index);
        self.tracer.pass_begin(&PassBeginEvent {
            pass_index: self.pass_index,
            viewport: self.backend.viewport(),
        });

        let result = self.render_scoped(root);

        if self.config.restore_matrix_mode {
            self.backend.set_matrix_mode(entry_mode);
        }
        self.summary.set_failed(result.is_err());
        let summary = self.summary.finish();
        self.tracer.pass_end(&summary);
        self.pass_index += 1;
        result.map(|()| summary)
    }

    /// Pushes `node`'s state, renders it, and pops the state again.
    ///
    /// # Errors
    ///
    /// Returns the push, render, or pop failure, in that order of
    /// preference.
    pub fn render_scoped(&mut self, node: &mut Node) -> Result<(), RenderError> {
        StateScope::enter(node, self)?.run()
    }

    /// Renders each child in order with its own push and pop.
    ///
    /// # Errors
    ///
    /// Stops at the first failing child and returns its error.
    pub fn render_children(&mut self, children: &mut [Node]) -> Result<(), RenderError> {
        for child in children {
            self.render_scoped(child)?;
        }
        Ok(())
    }

    /// Records a container layout in the trace and pass summary.
    pub(crate) fn record_layout(&mut self, cols: usize, rows: usize, size: Size) {
        self.summary.layout();
        self.tracer.layout(&LayoutEvent {
            pass_index: self.pass_index,
            depth: self.depth,
            cols: u32::try_from(cols).unwrap_or(u32::MAX),
            rows: u32::try_from(rows).unwrap_or(u32::MAX),
            width: size.width,
            height: size.height,
        });
    }
}

/// Ties a node's pop to its push.
///
/// Dropping the guard without [`run`](Self::run) (an early return or a
/// panic unwinding through the render) still pops.
struct StateScope<'n, 'f, 'a> {
    node: &'n mut Node,
    frame: &'f mut Frame<'a>,
    pushed: PushedState,
    tag: NodeTag,
    depth: u32,
    entered: bool,
    popped: bool,
}

impl<'n, 'f, 'a> StateScope<'n, 'f, 'a> {
    fn enter(node: &'n mut Node, frame: &'f mut Frame<'a>) -> Result<Self, RenderError> {
        let depth = frame.depth;
        let tag = node.tag();
        let mut scope = Self {
            node,
            frame,
            pushed: PushedState::default(),
            tag,
            depth,
            entered: false,
            popped: false,
        };
        scope.node.push_state(scope.frame, &mut scope.pushed)?;
        scope.entered = true;
        scope.frame.depth += 1;
        scope.frame.summary.push(depth);
        scope.frame.tracer.push(&PushEvent {
            pass_index: scope.frame.pass_index,
            depth,
            node: tag,
        });
        Ok(scope)
    }

    fn run(mut self) -> Result<(), RenderError> {
        let rendered = self.node.render(self.frame);
        let popped = self.pop();
        rendered.and(popped)
    }

    fn pop(&mut self) -> Result<(), RenderError> {
        if self.popped {
            return Ok(());
        }
        self.popped = true;
        if self.entered {
            self.frame.depth -= 1;
        }
        let result = self.node.pop_state(self.frame, &self.pushed);
        if self.entered {
            self.frame.tracer.pop(&PopEvent {
                pass_index: self.frame.pass_index,
                depth: self.depth,
                node: self.tag,
            });
        }
        result
    }
}

impl Drop for StateScope<'_, '_, '_> {
    fn drop(&mut self) {
        if let Err(e) = self.pop() {
            log::warn!("pop failed while unwinding a {:?} node: {e}", self.tag);
        }
    }
}
