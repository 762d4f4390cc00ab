// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The renderable tree.
//!
//! A [`Node`] owns its children, a [`Transform`], capability toggles, an
//! optional bound texture, and an ordered list of [`Modification`]s. What it
//! draws is decided by its [`NodeKind`].
//!
//! ## Push / render / pop
//!
//! Rendering is a depth-first pre-order walk driven by [`Frame`]. For every
//! node the frame:
//!
//! 1. pushes the node's state ([`Node::push_state`]),
//! 2. renders it ([`Node::render`]), which renders the children in order,
//! 3. pops the state again ([`Node::pop_state`]).
//!
//! The default push saves the enable group (only when the node toggles
//! something), selects the forced matrix mode, pushes a matrix frame,
//! applies the transform, binds the texture, and applies each modification.
//! Pop undoes this in reverse. Steps 1 and 3 are tied together by a scope
//! guard, so a pop happens for every push on every exit path: normal
//! return, an `Err` from a child, or a panic. A push that fails halfway pops
//! exactly the parts that were pushed.
//!
//! Some kinds replace the default push/pop:
//!
//! - **Cameras** push and pop nothing; their render *is* the state change.
//! - **Widgets** ignore toggles, transform, texture, and modifications and
//!   narrow the viewport instead (see [`widget`](crate::widget)).
//!
//! ## Events
//!
//! [`Node`] implements [`EventHandler`]: a node's listener runs first, then
//! the event reaches the children. Containers route positional events to
//! the single child under the pointer; every other node broadcasts.

mod camera;
mod frame;
mod geometry;

use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Size};

pub use camera::{Camera, Projection, Scene};
pub use frame::{Frame, PushedState};
pub use geometry::{Face, Mesh, Sprite, Vertex, WorldSprite};

use crate::backend::{AttribGroup, Backend, Capability, MatrixMode, Primitive};
use crate::error::{LayoutError, RenderError};
use crate::event::{Event, EventHandler};
use crate::layout::ZeroWeightPolicy;
use crate::modification::Modification;
use crate::texture::TextureId;
use crate::trace::NodeTag;
use crate::transform::Transform;
use crate::widget::{Widget, WidgetKind};

/// A user-supplied drawable for anything the built-in kinds do not cover.
///
/// `draw` runs between the node's push and pop, before its children render.
pub trait Draw: fmt::Debug {
    /// Submits geometry for this node.
    ///
    /// # Errors
    ///
    /// Failures are reported as [`RenderError::Draw`] or any other
    /// [`RenderError`]; the node's state is popped either way.
    fn draw(&mut self, frame: &mut Frame<'_>) -> Result<(), RenderError>;
}

/// What a [`Node`] draws.
#[derive(Debug)]
pub enum NodeKind {
    /// Draws nothing itself; only groups children under shared state.
    Group,
    /// A list of face nodes, each rendered with its own state.
    Mesh(Mesh),
    /// One primitive batch.
    Face(Face),
    /// A textured quad in normalized device coordinates.
    Sprite(Sprite),
    /// A screen-aligned textured quad anchored at a projected world point.
    WorldSprite(WorldSprite),
    /// Sets up the view and projection matrices.
    Camera(Camera),
    /// Resets global state, applies its camera, renders its children.
    Scene(Scene),
    /// A screen-space element laid out by a grid.
    Widget(Widget),
    /// A user drawable.
    Custom(Box<dyn Draw>),
}

impl NodeKind {
    /// Returns the trace tag for this kind.
    #[must_use]
    pub fn tag(&self) -> NodeTag {
        match self {
            Self::Group => NodeTag::Group,
            Self::Mesh(_) => NodeTag::Mesh,
            Self::Face(_) => NodeTag::Face,
            Self::Sprite(_) => NodeTag::Sprite,
            Self::WorldSprite(_) => NodeTag::WorldSprite,
            Self::Camera(_) => NodeTag::Camera,
            Self::Scene(_) => NodeTag::Scene,
            Self::Widget(w) => w.kind.tag(),
            Self::Custom(_) => NodeTag::Custom,
        }
    }
}

type Listener = Box<dyn FnMut(&Event)>;

/// A renderable tree node.
pub struct Node {
    /// Children, rendered and triggered in order.
    pub children: Vec<Node>,
    /// Applied on top of the current matrix after the matrix frame is pushed.
    pub transform: Transform,
    /// Capabilities enabled for this subtree.
    pub enable: BTreeSet<Capability>,
    /// Capabilities disabled for this subtree.
    pub disable: BTreeSet<Capability>,
    /// Matrix stack to select before pushing the matrix frame.
    pub matrix_mode: Option<MatrixMode>,
    /// Texture bound for this subtree.
    pub texture: Option<TextureId>,
    /// Applied in order on push, reverted in reverse order on pop.
    pub modifications: Vec<Box<dyn Modification>>,
    /// What this node draws.
    pub kind: NodeKind,
    listener: Option<Listener>,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind)
            .field("transform", &self.transform)
            .field("enable", &self.enable)
            .field("disable", &self.disable)
            .field("matrix_mode", &self.matrix_mode)
            .field("texture", &self.texture)
            .field("modifications", &self.modifications)
            .field("listener", &self.listener.is_some())
            .field("children", &self.children)
            .finish()
    }
}

impl Node {
    /// Creates a node of the given kind with default state.
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            children: Vec::new(),
            transform: Transform::IDENTITY,
            enable: BTreeSet::new(),
            disable: BTreeSet::new(),
            matrix_mode: None,
            texture: None,
            modifications: Vec::new(),
            kind,
            listener: None,
        }
    }

    /// A grouping node.
    #[must_use]
    pub fn group() -> Self {
        Self::new(NodeKind::Group)
    }

    /// A mesh made of the given face nodes.
    #[must_use]
    pub fn mesh(faces: Vec<Self>) -> Self {
        Self::new(NodeKind::Mesh(Mesh { faces }))
    }

    /// A single primitive batch.
    #[must_use]
    pub fn face(primitive: Primitive, vertices: Vec<Vertex>) -> Self {
        Self::new(NodeKind::Face(Face {
            primitive,
            vertices,
        }))
    }

    /// A screen-space sprite.
    #[must_use]
    pub fn sprite(sprite: Sprite) -> Self {
        Self::new(NodeKind::Sprite(sprite))
    }

    /// A world-space sprite.
    #[must_use]
    pub fn world_sprite(sprite: WorldSprite) -> Self {
        Self::new(NodeKind::WorldSprite(sprite))
    }

    /// A camera.
    #[must_use]
    pub fn camera(camera: Camera) -> Self {
        Self::new(NodeKind::Camera(camera))
    }

    /// A scene viewed through `camera`, which should be a camera node.
    #[must_use]
    pub fn scene(camera: Self) -> Self {
        Self::new(NodeKind::Scene(Scene {
            camera: Box::new(camera),
        }))
    }

    /// A widget.
    #[must_use]
    pub fn widget(widget: Widget) -> Self {
        Self::new(NodeKind::Widget(widget))
    }

    /// A user drawable.
    #[must_use]
    pub fn custom(draw: impl Draw + 'static) -> Self {
        Self::new(NodeKind::Custom(Box::new(draw)))
    }

    /// Appends a child.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Appends several children.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// Sets the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Enables a capability for this subtree.
    #[must_use]
    pub fn enabling(mut self, cap: Capability) -> Self {
        self.enable.insert(cap);
        self
    }

    /// Disables a capability for this subtree.
    #[must_use]
    pub fn disabling(mut self, cap: Capability) -> Self {
        self.disable.insert(cap);
        self
    }

    /// Forces a matrix mode before the matrix frame is pushed.
    #[must_use]
    pub fn with_matrix_mode(mut self, mode: MatrixMode) -> Self {
        self.matrix_mode = Some(mode);
        self
    }

    /// Binds a texture for this subtree.
    #[must_use]
    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Appends a modification.
    #[must_use]
    pub fn with_modification(mut self, modification: impl Modification + 'static) -> Self {
        self.modifications.push(Box::new(modification));
        self
    }

    /// Installs a listener called from [`EventHandler::handle`].
    #[must_use]
    pub fn on_event(mut self, listener: impl FnMut(&Event) + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Appends a child after construction.
    pub fn push(&mut self, child: Self) {
        self.children.push(child);
    }

    /// Returns the trace tag for this node's kind.
    #[inline]
    #[must_use]
    pub fn tag(&self) -> NodeTag {
        self.kind.tag()
    }

    /// Returns the widget, if this node is one.
    #[must_use]
    pub fn as_widget(&self) -> Option<&Widget> {
        match &self.kind {
            NodeKind::Widget(w) => Some(w),
            _ => None,
        }
    }

    /// Returns the widget mutably, if this node is one.
    pub fn as_widget_mut(&mut self) -> Option<&mut Widget> {
        match &mut self.kind {
            NodeKind::Widget(w) => Some(w),
            _ => None,
        }
    }

    /// For container widgets, the index of the child whose cell contains
    /// `pos` (in the container's local coordinates).
    #[must_use]
    pub fn child_index_at(&self, pos: Point) -> Option<usize> {
        let NodeKind::Widget(widget) = &self.kind else {
            return None;
        };
        let WidgetKind::Container(container) = &widget.kind else {
            return None;
        };
        container.child_index_at(pos, &self.children)
    }

    /// For container widgets, the child whose cell contains `pos`.
    #[must_use]
    pub fn child_at(&self, pos: Point) -> Option<&Self> {
        self.child_index_at(pos).map(|i| &self.children[i])
    }

    /// Lays out this container, and every container nested in it, without
    /// rendering.
    ///
    /// Rendering lays containers out as a side effect; this is for routing
    /// events before the first frame. A root container takes `viewport` as
    /// its size. Other nodes are left alone.
    ///
    /// # Errors
    ///
    /// Returns the first layout error.
    pub fn arrange(&mut self, viewport: Size, policy: ZeroWeightPolicy) -> Result<(), LayoutError> {
        let NodeKind::Widget(widget) = &mut self.kind else {
            return Ok(());
        };
        let WidgetKind::Container(container) = &mut widget.kind else {
            return Ok(());
        };
        if widget.cell.is_none() {
            widget.pos = Point::ORIGIN;
            widget.size = viewport;
        }
        container.arrange(widget.size, policy, &mut self.children)?;
        for child in &mut self.children {
            child.arrange(viewport, policy)?;
        }
        Ok(())
    }

    /// Pushes this node's state, recording progress in `pushed`.
    ///
    /// Call [`pop_state`](Self::pop_state) with the same `pushed` whether
    /// or not this returns `Ok`. [`Frame`] does this automatically; calling
    /// these directly is only needed for custom traversal.
    ///
    /// # Errors
    ///
    /// Propagates transform, modification, and layout failures.
    pub fn push_state(
        &mut self,
        frame: &mut Frame<'_>,
        pushed: &mut PushedState,
    ) -> Result<(), RenderError> {
        match &mut self.kind {
            NodeKind::Camera(_) => Ok(()),
            NodeKind::Widget(widget) => widget.push_state(frame, pushed, &mut self.children),
            _ => self.push_default(frame.backend(), pushed),
        }
    }

    /// Undoes exactly what [`push_state`](Self::push_state) recorded in
    /// `pushed`.
    ///
    /// Every recorded step is undone even if an earlier one fails; the
    /// first failure is returned.
    ///
    /// # Errors
    ///
    /// Propagates modification revert failures.
    pub fn pop_state(
        &mut self,
        frame: &mut Frame<'_>,
        pushed: &PushedState,
    ) -> Result<(), RenderError> {
        match &mut self.kind {
            NodeKind::Camera(_) => Ok(()),
            NodeKind::Widget(widget) => {
                widget.pop_state(frame.backend(), pushed);
                Ok(())
            }
            _ => self.pop_default(frame.backend(), pushed),
        }
    }

    fn push_default(
        &mut self,
        backend: &mut dyn Backend,
        pushed: &mut PushedState,
    ) -> Result<(), RenderError> {
        if !self.enable.is_empty() || !self.disable.is_empty() {
            backend.push_attrib(AttribGroup::Enable);
            pushed.enable_group = true;
            for &cap in &self.enable {
                backend.enable(cap);
            }
            for &cap in &self.disable {
                backend.disable(cap);
            }
        }
        if let Some(mode) = self.matrix_mode {
            backend.set_matrix_mode(mode);
        }
        backend.push_matrix();
        pushed.matrix = Some(backend.matrix_mode());
        self.transform.apply(backend)?;
        if let Some(id) = self.texture {
            backend.bind_texture(id);
        }
        for modification in &mut self.modifications {
            modification.apply(backend)?;
            pushed.modifications += 1;
        }
        Ok(())
    }

    fn pop_default(
        &mut self,
        backend: &mut dyn Backend,
        pushed: &PushedState,
    ) -> Result<(), RenderError> {
        let mut first_err = None;
        let applied = pushed.modifications.min(self.modifications.len());
        for modification in self.modifications[..applied].iter_mut().rev() {
            if let Err(e) = modification.revert(backend) {
                first_err.get_or_insert(e);
            }
        }
        // Re-select the stack that was pushed, whatever children left
        // selected.
        if let Some(mode) = pushed.matrix {
            backend.set_matrix_mode(mode);
            backend.pop_matrix();
        }
        if pushed.enable_group {
            backend.pop_attrib();
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Draws this node and then its children.
    ///
    /// Expects the node's state to be pushed already; [`Frame`] arranges
    /// that.
    ///
    /// # Errors
    ///
    /// Returns the first failure from this node or any descendant. Sibling
    /// nodes after a failing child are not rendered.
    pub fn render(&mut self, frame: &mut Frame<'_>) -> Result<(), RenderError> {
        match &mut self.kind {
            NodeKind::Group => {}
            NodeKind::Mesh(mesh) => {
                for face in &mut mesh.faces {
                    frame.render_scoped(face)?;
                }
            }
            NodeKind::Face(face) => face.draw(frame.backend()),
            NodeKind::Sprite(sprite) => sprite.draw(frame.backend(), None),
            NodeKind::WorldSprite(sprite) => sprite.draw(frame.backend()),
            NodeKind::Camera(camera) => camera.apply(frame.backend()),
            NodeKind::Scene(scene) => scene.enter(frame)?,
            NodeKind::Widget(widget) => return widget.render(frame, &mut self.children),
            NodeKind::Custom(draw) => draw.draw(frame)?,
        }
        frame.render_children(&mut self.children)
    }
}

impl EventHandler for Node {
    fn handle(&mut self, event: &Event) {
        if let Some(listener) = &mut self.listener {
            listener(event);
        }
        if let NodeKind::Widget(widget) = &mut self.kind {
            widget.handle(event);
        }
    }

    fn trigger_children(&mut self, event: &Event) {
        if let NodeKind::Widget(widget) = &self.kind
            && let WidgetKind::Container(_) = widget.kind
            && let Some(pos) = event.pos()
        {
            match self.child_index_at(pos) {
                Some(index) => {
                    let child = &mut self.children[index];
                    let origin = child.as_widget().map_or(Point::ORIGIN, |w| w.pos);
                    child.trigger(&event.translated(origin.to_vec2()));
                }
                None => log::trace!("no widget under {pos:?}; dropping {event:?}"),
            }
            return;
        }
        for child in &mut self.children {
            child.trigger(event);
        }
    }
}
