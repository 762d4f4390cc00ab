// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A backend that tracks pipeline state and records every call.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use tessera_core::backend::{
    AttribGroup, Backend, BlendFactor, Capability, Color, MatrixMode, Primitive, TextureFilter,
    TextureWrap, Viewport,
};
use tessera_core::error::BackendError;
use tessera_core::matrix::{Transform3d, Vec3};
use tessera_core::texture::{Image, TextureId};

use crate::command::{Command, CommandList, DrawItem, DrawVertex};

/// A call sequence a fixed-function pipeline would reject.
///
/// The recording backend never panics on these. It logs a warning, records
/// the violation, and leaves its state as a real pipeline would (an
/// underflowing pop is ignored, for example).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Violation {
    /// `pop_matrix` with only the base matrix on the stack.
    MatrixUnderflow(MatrixMode),
    /// `pop_attrib` with nothing saved.
    AttribUnderflow,
    /// `begin` while a batch was already open.
    NestedBegin,
    /// `end` without an open batch.
    EndWithoutBegin,
    /// A state change while a batch was open.
    StateInBatch(&'static str),
    /// `vertex` without an open batch.
    VertexOutsideBatch,
    /// `bind_texture` with an id that was never created.
    UnknownTexture(TextureId),
}

#[derive(Clone, Debug)]
enum Saved {
    Enable(BTreeSet<Capability>),
    Viewport(Viewport),
}

#[derive(Clone, Debug)]
struct Batch {
    primitive: Primitive,
    vertices: Vec<DrawVertex>,
    transform: Transform3d,
    viewport: Viewport,
    texture: Option<TextureId>,
}

/// Size of an uploaded texture, if any pixels have been uploaded.
type TextureSlot = Option<(u32, u32)>;

/// A headless [`Backend`] that keeps the full pipeline state and records a
/// [`CommandList`].
///
/// Every matrix stack starts with one identity matrix that cannot be popped.
/// The enabled set starts empty.
///
/// ```
/// use tessera_core::backend::{Backend, Viewport};
/// use tessera_render::RecordingBackend;
///
/// let mut backend = RecordingBackend::new(Viewport::new(0, 0, 640, 480));
/// backend.push_matrix();
/// backend.pop_matrix();
/// assert!(backend.is_balanced());
/// ```
#[derive(Clone, Debug)]
pub struct RecordingBackend {
    mode: MatrixMode,
    stacks: [Vec<Transform3d>; 3],
    attribs: Vec<Saved>,
    enabled: BTreeSet<Capability>,
    viewport: Viewport,
    bound: Option<TextureId>,
    textures: BTreeMap<TextureId, TextureSlot>,
    next_texture: u32,
    texture_limit: Option<usize>,
    color: Color,
    tex_coord: Vec3,
    normal: Vec3,
    batch: Option<Batch>,
    commands: CommandList,
    violations: Vec<Violation>,
    max_matrix_depth: usize,
    max_attrib_depth: usize,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl RecordingBackend {
    /// Creates a backend with the given initial viewport.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            mode: MatrixMode::Modelview,
            stacks: MatrixMode::ALL.map(|_| alloc::vec![Transform3d::IDENTITY]),
            attribs: Vec::new(),
            enabled: BTreeSet::new(),
            viewport,
            bound: None,
            textures: BTreeMap::new(),
            next_texture: 1,
            texture_limit: None,
            color: Color::WHITE,
            tex_coord: [0.0; 3],
            normal: [0.0, 0.0, 1.0],
            batch: None,
            commands: CommandList::new(),
            violations: Vec::new(),
            max_matrix_depth: 0,
            max_attrib_depth: 0,
        }
    }

    /// Makes `create_texture` fail once `limit` textures exist.
    #[must_use]
    pub fn with_texture_limit(mut self, limit: usize) -> Self {
        self.texture_limit = Some(limit);
        self
    }

    /// The recorded commands.
    #[must_use]
    pub fn commands(&self) -> &CommandList {
        &self.commands
    }

    /// Takes the recorded commands, leaving an empty list. State is kept.
    pub fn take_commands(&mut self) -> CommandList {
        core::mem::take(&mut self.commands)
    }

    /// Clears recorded commands and violations. State is kept.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.violations.clear();
        self.max_matrix_depth = self.stacks.iter().map(|s| s.len() - 1).max().unwrap_or(0);
        self.max_attrib_depth = self.attribs.len();
    }

    /// Closed batches in submission order.
    pub fn draws(&self) -> impl Iterator<Item = &DrawItem> {
        self.commands.draws()
    }

    /// Violations in the order they happened.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Returns `true` if every stack is back at its base, no batch is open,
    /// and nothing was violated.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.stacks.iter().all(|s| s.len() == 1)
            && self.attribs.is_empty()
            && self.batch.is_none()
            && self.violations.is_empty()
    }

    /// Number of matrices pushed above the base of `mode`'s stack.
    #[must_use]
    pub fn matrix_depth(&self, mode: MatrixMode) -> usize {
        self.stacks[mode.index()].len() - 1
    }

    /// Number of saved attribute groups.
    #[must_use]
    pub fn attrib_depth(&self) -> usize {
        self.attribs.len()
    }

    /// Deepest matrix stack seen since creation or the last
    /// [`clear`](Self::clear).
    #[must_use]
    pub fn max_matrix_depth(&self) -> usize {
        self.max_matrix_depth
    }

    /// Deepest attribute stack seen since creation or the last
    /// [`clear`](Self::clear).
    #[must_use]
    pub fn max_attrib_depth(&self) -> usize {
        self.max_attrib_depth
    }

    /// Returns `true` if `cap` is enabled.
    #[must_use]
    pub fn is_enabled(&self, cap: Capability) -> bool {
        self.enabled.contains(&cap)
    }

    /// The bound texture.
    #[must_use]
    pub fn bound_texture(&self) -> Option<TextureId> {
        self.bound
    }

    /// Size of the last upload to `id`, or `None` if it has no pixels yet
    /// or does not exist.
    #[must_use]
    pub fn texture_size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.textures.get(&id).copied().flatten()
    }

    /// Number of live textures.
    #[must_use]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn violate(&mut self, violation: Violation) {
        log::warn!("backend violation: {violation:?}");
        self.violations.push(violation);
    }

    /// Flags `call` if a batch is open. State changes still take effect.
    fn state_change(&mut self, call: &'static str) {
        if self.batch.is_some() {
            self.violate(Violation::StateInBatch(call));
        }
    }

    fn top_mut(&mut self) -> &mut Transform3d {
        let stack = &mut self.stacks[self.mode.index()];
        let last = stack.len() - 1;
        &mut stack[last]
    }

    fn top(&self, mode: MatrixMode) -> Transform3d {
        self.stacks[mode.index()]
            .last()
            .copied()
            .unwrap_or(Transform3d::IDENTITY)
    }
}

impl Backend for RecordingBackend {
    fn matrix_mode(&self) -> MatrixMode {
        self.mode
    }

    fn set_matrix_mode(&mut self, mode: MatrixMode) {
        self.state_change("set_matrix_mode");
        self.mode = mode;
        self.commands.push(Command::SetMatrixMode(mode));
    }

    fn push_matrix(&mut self) {
        self.state_change("push_matrix");
        let top = *self.top_mut();
        let stack = &mut self.stacks[self.mode.index()];
        stack.push(top);
        self.max_matrix_depth = self.max_matrix_depth.max(stack.len() - 1);
        self.commands.push(Command::PushMatrix(self.mode));
    }

    fn pop_matrix(&mut self) {
        self.state_change("pop_matrix");
        if self.stacks[self.mode.index()].len() <= 1 {
            self.violate(Violation::MatrixUnderflow(self.mode));
            return;
        }
        self.stacks[self.mode.index()].pop();
        self.commands.push(Command::PopMatrix(self.mode));
    }

    fn load_identity(&mut self) {
        self.state_change("load_identity");
        *self.top_mut() = Transform3d::IDENTITY;
        self.commands.push(Command::LoadIdentity(self.mode));
    }

    fn mult_matrix(&mut self, m: &Transform3d) {
        self.state_change("mult_matrix");
        let top = self.top_mut();
        *top = *top * *m;
        self.commands.push(Command::MultMatrix(self.mode, *m));
    }

    fn current_matrix(&self, mode: MatrixMode) -> Transform3d {
        self.top(mode)
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.state_change("set_viewport");
        self.viewport = viewport;
        self.commands.push(Command::SetViewport(viewport));
    }

    fn push_attrib(&mut self, group: AttribGroup) {
        self.state_change("push_attrib");
        self.attribs.push(match group {
            AttribGroup::Enable => Saved::Enable(self.enabled.clone()),
            AttribGroup::Viewport => Saved::Viewport(self.viewport),
        });
        self.max_attrib_depth = self.max_attrib_depth.max(self.attribs.len());
        self.commands.push(Command::PushAttrib(group));
    }

    fn pop_attrib(&mut self) {
        self.state_change("pop_attrib");
        let group = match self.attribs.pop() {
            Some(Saved::Enable(enabled)) => {
                self.enabled = enabled;
                AttribGroup::Enable
            }
            Some(Saved::Viewport(viewport)) => {
                self.viewport = viewport;
                AttribGroup::Viewport
            }
            None => {
                self.violate(Violation::AttribUnderflow);
                return;
            }
        };
        self.commands.push(Command::PopAttrib(group));
    }

    fn enable(&mut self, cap: Capability) {
        self.state_change("enable");
        self.enabled.insert(cap);
        self.commands.push(Command::Enable(cap));
    }

    fn disable(&mut self, cap: Capability) {
        self.state_change("disable");
        self.enabled.remove(&cap);
        self.commands.push(Command::Disable(cap));
    }

    fn create_texture(&mut self) -> Result<TextureId, BackendError> {
        if self
            .texture_limit
            .is_some_and(|limit| self.textures.len() >= limit)
        {
            return Err(BackendError::TextureAllocation);
        }
        let id = TextureId(self.next_texture);
        self.next_texture += 1;
        self.textures.insert(id, None);
        self.commands.push(Command::CreateTexture(id));
        Ok(id)
    }

    fn bind_texture(&mut self, id: TextureId) {
        self.state_change("bind_texture");
        if !self.textures.contains_key(&id) {
            self.violate(Violation::UnknownTexture(id));
        }
        self.bound = Some(id);
        self.commands.push(Command::BindTexture(id));
    }

    fn upload_texture(&mut self, id: TextureId, image: &Image) -> Result<(), BackendError> {
        self.state_change("upload_texture");
        let Some(slot) = self.textures.get_mut(&id) else {
            return Err(BackendError::UnknownTexture(id));
        };
        *slot = Some((image.width(), image.height()));
        self.commands.push(Command::UploadTexture {
            id,
            width: image.width(),
            height: image.height(),
        });
        Ok(())
    }

    fn set_texture_filter(&mut self, min: TextureFilter, mag: TextureFilter) {
        self.state_change("set_texture_filter");
        self.commands.push(Command::TextureFilter(min, mag));
    }

    fn set_texture_wrap(&mut self, s: TextureWrap, t: TextureWrap) {
        self.state_change("set_texture_wrap");
        self.commands.push(Command::TextureWrap(s, t));
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.state_change("blend_func");
        self.commands.push(Command::BlendFunc(src, dst));
    }

    fn begin(&mut self, primitive: Primitive) {
        if self.batch.is_some() {
            self.violate(Violation::NestedBegin);
            return;
        }
        let texture = if self.enabled.contains(&Capability::Texture2d) {
            self.bound
        } else {
            None
        };
        self.batch = Some(Batch {
            primitive,
            vertices: Vec::new(),
            transform: self.top(MatrixMode::Projection) * self.top(MatrixMode::Modelview),
            viewport: self.viewport,
            texture,
        });
    }

    fn color(&mut self, color: Color) {
        self.color = color;
    }

    fn tex_coord(&mut self, coord: Vec3) {
        self.tex_coord = coord;
    }

    fn normal(&mut self, normal: Vec3) {
        self.normal = normal;
    }

    fn vertex(&mut self, position: [f64; 4]) {
        let vertex = DrawVertex {
            pos: position,
            color: self.color,
            tex_coord: self.tex_coord,
            normal: self.normal,
        };
        match &mut self.batch {
            Some(batch) => batch.vertices.push(vertex),
            None => self.violate(Violation::VertexOutsideBatch),
        }
    }

    fn end(&mut self) {
        let Some(batch) = self.batch.take() else {
            self.violate(Violation::EndWithoutBegin);
            return;
        };
        self.commands.push(Command::Draw(DrawItem {
            primitive: batch.primitive,
            vertices: batch.vertices,
            transform: batch.transform,
            viewport: batch.viewport,
            texture: batch.texture,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> RecordingBackend {
        RecordingBackend::new(Viewport::new(0, 0, 200, 100))
    }

    #[test]
    fn matrix_stacks_are_independent() {
        let mut b = backend();
        b.push_matrix();
        b.translate([1.0, 2.0, 3.0]);
        b.set_matrix_mode(MatrixMode::Projection);
        assert_eq!(
            b.current_matrix(MatrixMode::Projection),
            Transform3d::IDENTITY,
            "projection untouched by modelview translate"
        );
        assert_eq!(b.matrix_depth(MatrixMode::Projection), 0, "projection not pushed");
        b.set_matrix_mode(MatrixMode::Modelview);
        b.pop_matrix();
        assert_eq!(
            b.current_matrix(MatrixMode::Modelview),
            Transform3d::IDENTITY,
            "pop restores the pushed matrix"
        );
        assert!(b.is_balanced(), "push/pop pair leaves stacks at base");
        assert_eq!(b.max_matrix_depth(), 1, "one level was reached");
    }

    #[test]
    fn underflow_is_recorded_not_applied() {
        let mut b = backend();
        b.pop_matrix();
        b.pop_attrib();
        assert_eq!(
            b.violations(),
            &[
                Violation::MatrixUnderflow(MatrixMode::Modelview),
                Violation::AttribUnderflow
            ],
            "both underflows recorded"
        );
        assert_eq!(b.matrix_depth(MatrixMode::Modelview), 0, "base matrix kept");
        assert!(!b.is_balanced(), "violations make a pass unbalanced");
    }

    #[test]
    fn attrib_groups_restore_their_state() {
        let mut b = backend();
        b.enable(Capability::DepthTest);
        b.push_attrib(AttribGroup::Enable);
        b.disable(Capability::DepthTest);
        b.enable(Capability::Blend);
        b.push_attrib(AttribGroup::Viewport);
        b.set_viewport(Viewport::new(10, 10, 20, 20));
        b.pop_attrib();
        assert_eq!(b.viewport(), Viewport::new(0, 0, 200, 100), "viewport restored");
        assert!(b.is_enabled(Capability::Blend), "enable set not yet restored");
        b.pop_attrib();
        assert!(b.is_enabled(Capability::DepthTest), "depth test restored");
        assert!(!b.is_enabled(Capability::Blend), "blend restored");
        assert!(b.commands().is_nested(), "pushes and pops nest");
    }

    #[test]
    fn batches_capture_state_at_begin() {
        let mut b = backend();
        let id = b.create_texture().expect("no limit");
        b.bind_texture(id);
        b.enable(Capability::Texture2d);
        b.translate([0.5, 0.0, 0.0]);
        b.color(Color::BLACK);
        b.begin(Primitive::Triangles);
        b.vertex([0.0, 0.0, 0.0, 1.0]);
        b.vertex([1.0, 0.0, 0.0, 1.0]);
        b.vertex([0.0, 1.0, 0.0, 1.0]);
        b.end();

        let draws: Vec<_> = b.draws().collect();
        assert_eq!(draws.len(), 1, "one batch");
        let draw = draws[0];
        assert_eq!(draw.texture, Some(id), "texturing enabled with bound texture");
        assert_eq!(draw.vertices[0].color, Color::BLACK, "current color captured");
        let ndc = draw.ndc_positions();
        assert!((ndc[0][0] - 0.5).abs() < 1e-12, "modelview applied");
    }

    #[test]
    fn state_changes_inside_batch_are_flagged() {
        let mut b = backend();
        b.begin(Primitive::Lines);
        b.push_matrix();
        b.begin(Primitive::Lines);
        b.end();
        b.end();
        b.vertex([0.0; 4]);
        assert_eq!(
            b.violations(),
            &[
                Violation::StateInBatch("push_matrix"),
                Violation::NestedBegin,
                Violation::EndWithoutBegin,
                Violation::VertexOutsideBatch,
            ],
            "every misuse recorded in order"
        );
    }

    #[test]
    fn texture_limit_fails_allocation() {
        let mut b = backend().with_texture_limit(1);
        let id = b.create_texture().expect("first texture fits");
        assert_eq!(
            b.create_texture(),
            Err(BackendError::TextureAllocation),
            "second exceeds limit"
        );
        b.upload_texture(id, &Image::solid(2, 3, Color::WHITE))
            .expect("known texture");
        assert_eq!(b.texture_size(id), Some((2, 3)), "upload size recorded");
        assert_eq!(
            b.upload_texture(TextureId(99), &Image::solid(1, 1, Color::WHITE)),
            Err(BackendError::UnknownTexture(TextureId(99))),
            "unknown texture rejected"
        );
    }

    #[test]
    fn binding_unknown_texture_is_a_violation() {
        let mut b = backend();
        b.bind_texture(TextureId(7));
        assert_eq!(
            b.violations(),
            &[Violation::UnknownTexture(TextureId(7))],
            "unknown bind recorded"
        );
    }
}
