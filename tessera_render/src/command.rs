// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recorded backend calls.

use alloc::vec::Vec;

use tessera_core::backend::{
    AttribGroup, BlendFactor, Capability, Color, MatrixMode, Primitive, TextureFilter,
    TextureWrap, Viewport,
};
use tessera_core::matrix::{Transform3d, Vec3};
use tessera_core::texture::TextureId;

/// A vertex as submitted, with the attributes current at the time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawVertex {
    /// Homogeneous position in object space.
    pub pos: [f64; 4],
    /// Current color.
    pub color: Color,
    /// Current texture coordinate.
    pub tex_coord: Vec3,
    /// Current normal.
    pub normal: Vec3,
}

/// A closed primitive batch together with the state it was drawn under.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawItem {
    /// Assembly mode.
    pub primitive: Primitive,
    /// Vertices in submission order.
    pub vertices: Vec<DrawVertex>,
    /// Projection × modelview at `begin`.
    pub transform: Transform3d,
    /// Viewport at `begin`.
    pub viewport: Viewport,
    /// Bound texture, if texturing was enabled.
    pub texture: Option<TextureId>,
}

impl DrawItem {
    /// Positions of every vertex projected to normalized device
    /// coordinates. Vertices on the `w = 0` plane are skipped.
    #[must_use]
    pub fn ndc_positions(&self) -> Vec<Vec3> {
        self.vertices
            .iter()
            .filter_map(|v| {
                let [x, y, z, w] = self.transform.transform_point4(v.pos);
                (w != 0.0).then(|| [x / w, y / w, z / w])
            })
            .collect()
    }
}

/// One recorded backend call.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Matrix mode selected.
    SetMatrixMode(MatrixMode),
    /// Matrix stack pushed.
    PushMatrix(MatrixMode),
    /// Matrix stack popped.
    PopMatrix(MatrixMode),
    /// Identity loaded.
    LoadIdentity(MatrixMode),
    /// Matrix multiplied onto the stack.
    MultMatrix(MatrixMode, Transform3d),
    /// Viewport replaced.
    SetViewport(Viewport),
    /// Attribute group saved.
    PushAttrib(AttribGroup),
    /// Attribute group restored.
    PopAttrib(AttribGroup),
    /// Capability enabled.
    Enable(Capability),
    /// Capability disabled.
    Disable(Capability),
    /// Texture allocated.
    CreateTexture(TextureId),
    /// Texture bound.
    BindTexture(TextureId),
    /// Pixels uploaded.
    UploadTexture {
        /// Target texture.
        id: TextureId,
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },
    /// Texture filters set.
    TextureFilter(TextureFilter, TextureFilter),
    /// Texture wrap modes set.
    TextureWrap(TextureWrap, TextureWrap),
    /// Blend function set.
    BlendFunc(BlendFactor, BlendFactor),
    /// A closed batch.
    Draw(DrawItem),
}

impl Command {
    /// Returns `true` for matrix and attribute pushes.
    #[must_use]
    pub fn is_push(&self) -> bool {
        matches!(self, Self::PushMatrix(_) | Self::PushAttrib(_))
    }

    /// Returns `true` for matrix and attribute pops.
    #[must_use]
    pub fn is_pop(&self) -> bool {
        matches!(self, Self::PopMatrix(_) | Self::PopAttrib(_))
    }
}

/// An ordered list of recorded commands.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandList {
    /// Commands in call order.
    pub commands: Vec<Command>,
}

impl CommandList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the list for reuse.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Appends a command.
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Iterates over the draw items.
    pub fn draws(&self) -> impl Iterator<Item = &DrawItem> {
        self.commands.iter().filter_map(|c| match c {
            Command::Draw(item) => Some(item),
            _ => None,
        })
    }

    /// Number of pushes of either kind.
    #[must_use]
    pub fn push_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_push()).count()
    }

    /// Number of pops of either kind.
    #[must_use]
    pub fn pop_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_pop()).count()
    }

    /// Returns `true` if, read in order, every pop matches the most recent
    /// unmatched push of the same kind and nothing is left open.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        #[derive(PartialEq)]
        enum Open {
            Matrix(MatrixMode),
            Attrib(AttribGroup),
        }
        let mut open = Vec::new();
        for command in &self.commands {
            match command {
                Command::PushMatrix(m) => open.push(Open::Matrix(*m)),
                Command::PushAttrib(g) => open.push(Open::Attrib(*g)),
                Command::PopMatrix(m) => {
                    // Matrix stacks are independent, so match the most
                    // recent push of the same mode.
                    let Some(i) = open.iter().rposition(|o| *o == Open::Matrix(*m)) else {
                        return false;
                    };
                    open.remove(i);
                }
                Command::PopAttrib(g) => {
                    let Some(i) = open.iter().rposition(|o| matches!(o, Open::Attrib(_))) else {
                        return false;
                    };
                    if open[i] != Open::Attrib(*g) {
                        return false;
                    }
                    open.remove(i);
                }
                _ => {}
            }
        }
        open.is_empty()
    }
}
