// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-pass instrumentation.
//!
//! [`Frame`](crate::node::Frame) reports every pass boundary, node push,
//! node pop, and container layout to a [`TraceSink`]. Sinks override only
//! the callbacks they need; the rest do nothing.
//!
//! The frame holds the sink through a [`Tracer`]. Without the `trace`
//! feature its methods are empty and inline away, so an untraced build pays
//! nothing per node. With the feature, each call is one `Option` check.
//!
//! [`PassSummaryBuilder`] counts nodes, depth, and layouts during a pass and
//! produces a [`PassSummary`] at the end.
//!
//! Event dispatch is not traced here; it logs through the `log` facade.

use crate::backend::Viewport;

/// Which kind of node pushed or popped state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeTag {
    /// A plain grouping node.
    Group,
    /// A mesh of faces.
    Mesh,
    /// A single primitive batch.
    Face,
    /// A screen-space sprite.
    Sprite,
    /// A world-space sprite.
    WorldSprite,
    /// A camera.
    Camera,
    /// A scene root.
    Scene,
    /// A background-only widget.
    Panel,
    /// A widget container.
    Container,
    /// A text label.
    Label,
    /// A slider.
    Slider,
    /// A user drawable.
    Custom,
}

impl NodeTag {
    /// Stable lowercase name, for printing and export.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Mesh => "mesh",
            Self::Face => "face",
            Self::Sprite => "sprite",
            Self::WorldSprite => "world_sprite",
            Self::Camera => "camera",
            Self::Scene => "scene",
            Self::Panel => "panel",
            Self::Container => "container",
            Self::Label => "label",
            Self::Slider => "slider",
            Self::Custom => "custom",
        }
    }

    /// Stable numeric code, for compact encodings.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Group => 0,
            Self::Mesh => 1,
            Self::Face => 2,
            Self::Sprite => 3,
            Self::WorldSprite => 4,
            Self::Camera => 5,
            Self::Scene => 6,
            Self::Panel => 7,
            Self::Container => 8,
            Self::Label => 9,
            Self::Slider => 10,
            Self::Custom => 11,
        }
    }

    /// Inverse of [`code`](Self::code).
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Group,
            1 => Self::Mesh,
            2 => Self::Face,
            3 => Self::Sprite,
            4 => Self::WorldSprite,
            5 => Self::Camera,
            6 => Self::Scene,
            7 => Self::Panel,
            8 => Self::Container,
            9 => Self::Label,
            10 => Self::Slider,
            11 => Self::Custom,
            _ => return None,
        })
    }
}

/// Emitted when a render pass starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassBeginEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Backend viewport at the start of the pass.
    pub viewport: Viewport,
}

/// Emitted after a node has pushed its state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PushEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Nesting depth; the node handed to `Frame::render` is at depth 0.
    pub depth: u32,
    /// Kind of node.
    pub node: NodeTag,
}

/// Emitted after a node has popped its state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PopEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Nesting depth, matching the corresponding [`PushEvent`].
    pub depth: u32,
    /// Kind of node.
    pub node: NodeTag,
}

/// Emitted when a container lays out its grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Nesting depth of the container.
    pub depth: u32,
    /// Number of columns.
    pub cols: u32,
    /// Number of rows.
    pub rows: u32,
    /// Width laid out against.
    pub width: f64,
    /// Height laid out against.
    pub height: f64,
}

/// Per-pass summary produced by [`PassSummaryBuilder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassSummary {
    /// Pass counter.
    pub pass_index: u64,
    /// Number of nodes that pushed state.
    pub nodes: u32,
    /// Deepest nesting reached.
    pub max_depth: u32,
    /// Number of grid layouts computed.
    pub layouts: u32,
    /// Whether the pass ended with an error.
    pub failed: bool,
}

/// Receives trace events from a render pass.
///
/// Every callback defaults to doing nothing.
pub trait TraceSink {
    /// Called when a pass starts.
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        _ = e;
    }

    /// Called after a node pushes state.
    fn on_push(&mut self, e: &PushEvent) {
        _ = e;
    }

    /// Called after a node pops state.
    fn on_pop(&mut self, e: &PopEvent) {
        _ = e;
    }

    /// Called after a container computes its grid.
    fn on_layout(&mut self, e: &LayoutEvent) {
        _ = e;
    }

    /// Called with the pass summary when a pass ends, successfully or not.
    fn on_pass_end(&mut self, s: &PassSummary) {
        _ = s;
    }
}

/// A [`TraceSink`] that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

/// The sink a [`Frame`](crate::node::Frame) reports to, if any.
///
/// Holds nothing unless the `trace` feature is enabled.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Reports to `sink`.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Reports nowhere.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PassBeginEvent`].
    #[inline]
    pub fn pass_begin(&mut self, e: &PassBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PushEvent`].
    #[inline]
    pub fn push(&mut self, e: &PushEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_push(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PopEvent`].
    #[inline]
    pub fn pop(&mut self, e: &PopEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pop(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LayoutEvent`].
    #[inline]
    pub fn layout(&mut self, e: &LayoutEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layout(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassSummary`].
    #[inline]
    pub fn pass_end(&mut self, s: &PassSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_pass_end(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }
}

impl Default for Tracer<'_> {
    fn default() -> Self {
        Self::none()
    }
}

/// Accumulates per-pass counts and produces a [`PassSummary`].
#[derive(Clone, Copy, Debug)]
pub struct PassSummaryBuilder {
    summary: PassSummary,
}

impl PassSummaryBuilder {
    /// Starts a summary for the given pass.
    #[must_use]
    pub const fn new(pass_index: u64) -> Self {
        Self {
            summary: PassSummary {
                pass_index,
                nodes: 0,
                max_depth: 0,
                layouts: 0,
                failed: false,
            },
        }
    }

    /// Records a node push at `depth`.
    pub fn push(&mut self, depth: u32) {
        self.summary.nodes += 1;
        self.summary.max_depth = self.summary.max_depth.max(depth);
    }

    /// Records a grid layout.
    pub fn layout(&mut self) {
        self.summary.layouts += 1;
    }

    /// Marks the pass as failed.
    pub fn set_failed(&mut self, failed: bool) {
        self.summary.failed = failed;
    }

    /// Consumes the builder and produces the final [`PassSummary`].
    #[must_use]
    pub const fn finish(self) -> PassSummary {
        self.summary
    }
}
