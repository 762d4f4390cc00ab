// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Whole-tree render passes against the recording backend.

extern crate std;

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::RefCell;
use std::panic::{AssertUnwindSafe, catch_unwind};

use kurbo::Point;
use tessera_core::backend::{
    Backend, BlendFactor, Capability, Color, MatrixMode, Primitive, TextureFilter, TextureWrap,
    Viewport,
};
use tessera_core::config::EngineConfig;
use tessera_core::error::{LayoutError, RenderError};
use tessera_core::event::{Buttons, Event, EventHandler, MouseEvent};
use tessera_core::layout::{CellPair, Grid, LayoutCell, LayoutVector};
use tessera_core::matrix::Transform3d;
use tessera_core::modification::{BlendFunc, Modification, TexFilter, TexWrap};
use tessera_core::node::{Camera, Draw, Frame, Node, Projection, Vertex};
use tessera_core::texture::{Image, Texture};
use tessera_core::transform::Transform;
use tessera_core::widget::{Rasterizer, Slider, Widget, WidgetKind};

use crate::{Command, RecordingBackend};

const EPS: f64 = 1e-9;

fn backend() -> RecordingBackend {
    RecordingBackend::new(Viewport::new(0, 0, 200, 100))
}

/// A triangle with its first vertex at the local origin.
fn triangle() -> Node {
    Node::face(
        Primitive::Triangles,
        vec![
            Vertex::new(0.0, 0.0, 0.0),
            Vertex::new(1.0, 0.0, 0.0),
            Vertex::new(0.0, 1.0, 0.0),
        ],
    )
}

fn first_vertex_ndc(b: &RecordingBackend, draw: usize) -> [f64; 3] {
    let item = b.draws().nth(draw).expect("draw exists");
    item.ndc_positions()[0]
}

/// Ten by ten pixels per character.
#[derive(Debug, Default)]
struct BlockGlyphs {
    calls: usize,
}

impl Rasterizer for BlockGlyphs {
    fn rasterize(&mut self, text: &str, color: Color) -> Result<Image, RenderError> {
        self.calls += 1;
        let width = u32::try_from(text.chars().count()).expect("short text") * 10;
        Ok(Image::solid(width, 10, color))
    }
}

type Journal = Rc<RefCell<Vec<&'static str>>>;

#[derive(Debug)]
struct Logged {
    name: &'static str,
    journal: Journal,
}

impl Modification for Logged {
    fn apply(&mut self, _backend: &mut dyn Backend) -> Result<(), RenderError> {
        self.journal.borrow_mut().push(self.name);
        Ok(())
    }

    fn revert(&mut self, _backend: &mut dyn Backend) -> Result<(), RenderError> {
        self.journal.borrow_mut().push("revert");
        Ok(())
    }
}

#[derive(Debug)]
struct Refuses;

impl Modification for Refuses {
    fn apply(&mut self, _backend: &mut dyn Backend) -> Result<(), RenderError> {
        Err(RenderError::Draw(String::from("refused")))
    }
}

#[derive(Debug)]
struct Fails;

impl Draw for Fails {
    fn draw(&mut self, frame: &mut Frame<'_>) -> Result<(), RenderError> {
        let backend = frame.backend();
        backend.push_matrix();
        backend.translate([5.0, 0.0, 0.0]);
        backend.pop_matrix();
        Err(RenderError::Draw(String::from("boom")))
    }
}

#[test]
fn transforms_compose_parent_before_child() {
    let mut root = Node::group()
        .enabling(Capability::DepthTest)
        .with_transform(Transform::translate([1.0, 0.0, 0.0]))
        .with_child(
            Node::group()
                .with_transform(Transform::translate([0.0, 2.0, 0.0]))
                .with_child(triangle()),
        )
        .with_child(triangle());

    let mut b = backend();
    let summary = Frame::new(&mut b).render(&mut root).expect("tree renders");

    assert_eq!(summary.nodes, 4, "every node pushed once");
    assert_eq!(summary.max_depth, 2, "triangle under two groups");
    assert!(!summary.failed, "pass succeeded");
    assert!(b.is_balanced(), "all state popped");
    assert!(b.commands().is_nested(), "pushes and pops nest");
    assert!(!b.is_enabled(Capability::DepthTest), "toggle scoped to subtree");

    let nested = first_vertex_ndc(&b, 0);
    assert!((nested[0] - 1.0).abs() < EPS, "parent translation applied");
    assert!((nested[1] - 2.0).abs() < EPS, "child translation applied");
    let sibling = first_vertex_ndc(&b, 1);
    assert!(sibling[1].abs() < EPS, "sibling does not see the child's transform");
}

#[test]
fn failing_child_unwinds_every_push() {
    let mut root = Node::group()
        .enabling(Capability::Blend)
        .with_modification(BlendFunc::alpha())
        .with_child(
            Node::group()
                .with_transform(Transform::translate([0.0, 1.0, 0.0]))
                .with_child(Node::custom(Fails).with_child(triangle())),
        )
        .with_child(triangle());

    let mut b = backend();
    let err = Frame::new(&mut b)
        .render(&mut root)
        .expect_err("custom drawable fails");

    assert_eq!(err, RenderError::Draw(String::from("boom")), "error surfaces unchanged");
    assert!(b.is_balanced(), "every push popped despite the failure");
    assert_eq!(b.draws().count(), 0, "nothing after the failure is drawn");
    assert_eq!(
        b.commands().push_count(),
        b.commands().pop_count(),
        "push and pop counts match"
    );
}

#[derive(Debug)]
struct Panics;

impl Draw for Panics {
    fn draw(&mut self, frame: &mut Frame<'_>) -> Result<(), RenderError> {
        frame.backend().push_matrix();
        panic!("drawable panicked mid-pass");
    }
}

#[test]
fn panicking_child_unwinds_every_push() {
    let mut root = Node::group()
        .enabling(Capability::Blend)
        .with_transform(Transform::translate([1.0, 0.0, 0.0]))
        .with_child(
            Node::group()
                .disabling(Capability::DepthTest)
                .with_modification(BlendFunc::alpha())
                .with_child(Node::custom(Panics).with_child(triangle())),
        );

    let mut b = backend();
    let unwound = catch_unwind(AssertUnwindSafe(|| {
        let _ = Frame::new(&mut b).render(&mut root);
    }));
    assert!(unwound.is_err(), "the panic reaches the caller");

    assert_eq!(b.attrib_depth(), 0, "both enable groups restored");
    assert!(!b.is_enabled(Capability::Blend), "root toggle undone");
    // The drawable's own push is the only one nobody pops.
    assert_eq!(
        b.commands().push_count(),
        b.commands().pop_count() + 1,
        "every node push popped while unwinding"
    );
    assert_eq!(b.draws().count(), 0, "the child under the panic never drew");
}

#[test]
fn panicking_child_without_stray_state_leaves_backend_balanced() {
    #[derive(Debug)]
    struct Explodes;
    impl Draw for Explodes {
        fn draw(&mut self, _frame: &mut Frame<'_>) -> Result<(), RenderError> {
            panic!("drawable panicked mid-pass");
        }
    }

    let mut root = Node::group()
        .enabling(Capability::Blend)
        .with_transform(Transform::translate([0.0, 1.0, 0.0]))
        .with_child(Node::group().with_child(Node::custom(Explodes)));

    let mut b = backend();
    let unwound = catch_unwind(AssertUnwindSafe(|| {
        let _ = Frame::new(&mut b).render(&mut root);
    }));
    assert!(unwound.is_err(), "the panic reaches the caller");
    assert!(b.is_balanced(), "scope guards popped on unwind");
    assert_eq!(
        b.commands().push_count(),
        b.commands().pop_count(),
        "push and pop counts match"
    );
}

#[test]
fn failed_push_pops_only_what_was_pushed() {
    let journal = Journal::default();
    let mut root = Node::group()
        .enabling(Capability::DepthTest)
        .with_transform(Transform::translate([1.0, 0.0, 0.0]))
        .with_modification(Logged {
            name: "first",
            journal: Rc::clone(&journal),
        })
        .with_modification(Refuses)
        .with_modification(Logged {
            name: "never",
            journal: Rc::clone(&journal),
        })
        .with_child(triangle());

    let mut b = backend();
    let err = Frame::new(&mut b)
        .render(&mut root)
        .expect_err("modification refuses");

    assert_eq!(err, RenderError::Draw(String::from("refused")), "apply error returned");
    assert_eq!(
        *journal.borrow(),
        ["first", "revert"],
        "only the applied modification is reverted"
    );
    assert!(b.is_balanced(), "matrix and enable group popped");
    assert_eq!(b.draws().count(), 0, "render skipped after failed push");
}

#[test]
fn modifications_apply_in_order() {
    let mut root = Node::group()
        .with_modification(BlendFunc::new(BlendFactor::One, BlendFactor::Zero))
        .with_modification(TexFilter {
            min: TextureFilter::Nearest,
            mag: TextureFilter::Linear,
        })
        .with_modification(TexWrap {
            s: TextureWrap::ClampToEdge,
            t: TextureWrap::Repeat,
        });

    let mut b = backend();
    Frame::new(&mut b).render(&mut root).expect("renders");

    let applied: Vec<_> = b
        .commands()
        .commands
        .iter()
        .filter(|c| {
            matches!(
                c,
                Command::BlendFunc(..) | Command::TextureFilter(..) | Command::TextureWrap(..)
            )
        })
        .cloned()
        .collect();
    assert_eq!(
        applied,
        vec![
            Command::BlendFunc(BlendFactor::One, BlendFactor::Zero),
            Command::TextureFilter(TextureFilter::Nearest, TextureFilter::Linear),
            Command::TextureWrap(TextureWrap::ClampToEdge, TextureWrap::Repeat),
        ],
        "declaration order"
    );
}

#[test]
fn transform_as_modification_cannot_revert() {
    let mut root = Node::group()
        .with_modification(Transform::translate([1.0, 0.0, 0.0]))
        .with_child(triangle());

    let mut b = backend();
    let err = Frame::new(&mut b)
        .render(&mut root)
        .expect_err("revert refused");

    assert_eq!(err, RenderError::TransformRevert, "revert error reported");
    assert_eq!(b.draws().count(), 1, "children rendered before the pop");
    assert!(b.is_balanced(), "matrix stack restores the transform");
}

#[test]
fn scene_resets_and_camera_projects() {
    let camera = Node::camera(
        Camera::look_at([0.0, 0.0, 5.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0]).with_projection(
            Projection::Orthographic {
                left: -10.0,
                right: 10.0,
                bottom: -10.0,
                top: 10.0,
            },
        ),
    );
    let mut scene = Node::scene(camera).with_child(Node::face(
        Primitive::Lines,
        vec![Vertex::new(10.0, 0.0, 0.0), Vertex::new(0.0, 10.0, 0.0)],
    ));

    let mut b = backend();
    b.translate([100.0, 0.0, 0.0]);
    Frame::new(&mut b).render(&mut scene).expect("scene renders");

    let p = first_vertex_ndc(&b, 0);
    assert!((p[0] - 1.0).abs() < EPS, "right edge of the ortho box, stale translate reset");
    assert!(p[1].abs() < EPS, "vertical center");

    let matrix_pushes = b
        .commands()
        .commands
        .iter()
        .filter(|c| matches!(c, Command::PushMatrix(_)))
        .count();
    assert_eq!(matrix_pushes, 2, "scene and face push; the camera does not");
    assert_eq!(b.matrix_depth(MatrixMode::Modelview), 0, "modelview popped");
    assert!(
        b.current_matrix(MatrixMode::Modelview)
            .approx_eq(&Transform3d::from_translation(100.0, 0.0, 0.0), EPS),
        "modelview restored to the entry matrix"
    );
    assert_eq!(b.matrix_mode(), MatrixMode::Modelview, "modelview selected");
}

#[test]
fn entry_matrix_mode_is_restored() {
    let mut root = Node::group()
        .with_matrix_mode(MatrixMode::Projection)
        .with_child(Node::group().with_matrix_mode(MatrixMode::Texture));

    let mut b = backend();
    b.set_matrix_mode(MatrixMode::Texture);
    Frame::new(&mut b).render(&mut root).expect("renders");
    assert_eq!(b.matrix_mode(), MatrixMode::Texture, "entry mode re-selected");
    assert!(b.is_balanced(), "forced modes pop the stack they pushed");

    let mut lax = backend();
    lax.set_matrix_mode(MatrixMode::Texture);
    Frame::new(&mut lax)
        .with_config(EngineConfig {
            restore_matrix_mode: false,
            ..EngineConfig::new()
        })
        .render(&mut root)
        .expect("renders");
    assert_eq!(
        lax.matrix_mode(),
        MatrixMode::Projection,
        "root's forced mode left selected"
    );
}

fn panel(col: usize, row: usize, color: Color) -> Node {
    Node::widget(Widget::panel(CellPair::new(col, row)).with_background(color))
}

#[test]
fn containers_narrow_and_restore_the_viewport() {
    let inner = Node::widget(Widget::container(CellPair::new(1, 0), Grid::new(2, 1)))
        .with_child(panel(0, 0, Color::BLACK))
        .with_child(panel(0, 1, Color::WHITE));
    let root = Node::widget(Widget::root(Grid::new(1, 2)))
        .with_child(panel(0, 0, Color::rgb(1.0, 0.0, 0.0)))
        .with_child(inner);
    // A stale transform above the root container must not leak into it.
    let mut tree = Node::group()
        .with_transform(Transform::translate([3.0, 0.0, 0.0]))
        .with_child(root);

    let mut b = backend();
    let summary = Frame::new(&mut b).render(&mut tree).expect("widgets render");

    let viewports: Vec<_> = b.draws().map(|d| d.viewport).collect();
    assert_eq!(
        viewports,
        vec![
            Viewport::new(0, 0, 100, 100),
            Viewport::new(100, 0, 100, 50),
            Viewport::new(100, 50, 100, 50),
        ],
        "each panel fills its own cell in window coordinates"
    );
    assert!(
        b.draws().all(|d| d.transform == Transform3d::IDENTITY),
        "root container resets both matrices"
    );
    assert_eq!(summary.layouts, 2, "both containers laid out");
    assert_eq!(b.viewport(), Viewport::new(0, 0, 200, 100), "viewport restored");
    assert!(b.is_balanced(), "widget pushes popped");
}

#[test]
fn zero_weight_layout_fails_the_pass_cleanly() {
    let grid = Grid::from_vectors(
        LayoutVector::uniform(1),
        LayoutVector::new(vec![LayoutCell::fixed(10.0)]),
    );
    let mut root = Node::widget(Widget::root(grid)).with_child(panel(0, 0, Color::BLACK));

    let mut b = backend();
    let err = Frame::new(&mut b)
        .render(&mut root)
        .expect_err("no weight to absorb 190 px");
    assert_eq!(
        err,
        RenderError::Layout(LayoutError::ZeroWeight { remainder: 190.0 }),
        "layout error propagates"
    );
    assert!(b.is_balanced(), "reset matrices restored");
    assert_eq!(b.draws().count(), 0, "nothing drawn");

    let mut lenient = backend();
    Frame::new(&mut lenient)
        .with_config(EngineConfig::lenient())
        .render(&mut root)
        .expect("collapsed layout renders");
    assert_eq!(
        lenient.draws().next().map(|d| d.viewport),
        Some(Viewport::new(0, 0, 10, 100)),
        "fixed cell keeps its size"
    );
}

#[test]
fn empty_root_container_renders_nothing() {
    let mut root = Node::widget(Widget::root(Grid::new(0, 0)));
    let mut b = backend();
    let summary = Frame::new(&mut b)
        .render(&mut root)
        .expect("an empty grid has nothing to share out");
    assert_eq!(summary.layouts, 1, "the container still lays out");
    assert_eq!(b.draws().count(), 0, "nothing drawn");
    assert!(b.is_balanced(), "reset matrices restored");
}

#[test]
fn labels_rasterize_only_when_stale() {
    let mut root = Node::widget(Widget::root(Grid::new(1, 1)))
        .with_child(Node::widget(Widget::label(CellPair::new(0, 0), "hi")));
    let mut glyphs = BlockGlyphs::default();
    let mut b = backend();

    for _ in 0..2 {
        Frame::new(&mut b)
            .with_rasterizer(&mut glyphs)
            .render(&mut root)
            .expect("label renders");
    }
    assert_eq!(glyphs.calls, 1, "second pass reuses the texture");

    let text = b
        .draws()
        .find(|d| d.texture.is_some())
        .expect("text quad drawn");
    let ndc = text.ndc_positions();
    assert!((ndc[0][0] + 0.1).abs() < EPS, "20 px of 200 centered");
    assert!((ndc[0][1] + 0.1).abs() < EPS, "10 px of 100 centered");

    if let Some(widget) = root.children[0].as_widget_mut()
        && let WidgetKind::Label(label) = &mut widget.kind
    {
        label.text = String::from("hey");
    }
    Frame::new(&mut b)
        .with_rasterizer(&mut glyphs)
        .render(&mut root)
        .expect("label renders");
    assert_eq!(glyphs.calls, 2, "changed text rasterizes again");
    assert_eq!(b.texture_count(), 1, "texture object reused");
    assert!(b.is_balanced(), "label pushes popped");
}

#[test]
fn label_without_rasterizer_fails_cleanly() {
    let mut root = Node::widget(Widget::root(Grid::new(1, 1)))
        .with_child(Node::widget(Widget::label(CellPair::new(0, 0), "hi")));
    let mut b = backend();
    let err = Frame::new(&mut b)
        .render(&mut root)
        .expect_err("no rasterizer");
    assert_eq!(err, RenderError::NoRasterizer, "missing rasterizer reported");
    assert!(b.is_balanced(), "state unwound");
}

#[test]
fn texture_reload_needs_an_image() {
    let mut b = backend();
    let mut texture = Texture::new(&mut b, None).expect("allocates");
    assert_eq!(
        texture.reload(&mut b),
        Err(RenderError::MissingImage(texture.id())),
        "nothing to upload"
    );
    texture.set_image(Image::solid(4, 2, Color::WHITE));
    texture.reload(&mut b).expect("uploads");
    assert_eq!(b.texture_size(texture.id()), Some((4, 2)), "uploaded");

    let mut full = backend().with_texture_limit(0);
    assert!(
        matches!(Texture::new(&mut full, None), Err(RenderError::Backend(_))),
        "allocation failure wrapped"
    );
}

#[test]
fn dragged_slider_draws_its_handle() {
    let mut root = Node::widget(Widget::root(Grid::new(1, 1))).with_child(Node::widget(
        Widget::slider(CellPair::new(0, 0), Slider::new(0.0, 10.0)),
    ));
    let mut glyphs = BlockGlyphs::default();
    let mut b = backend();
    Frame::new(&mut b)
        .with_rasterizer(&mut glyphs)
        .render(&mut root)
        .expect("slider renders");

    root.trigger(&Event::from(MouseEvent::moved(
        Point::new(50.0, 10.0),
        Buttons::PRIMARY,
    )));

    b.clear();
    Frame::new(&mut b)
        .with_rasterizer(&mut glyphs)
        .render(&mut root)
        .expect("slider renders");

    let handle = b.draws().last().expect("handle drawn");
    assert!(
        (handle.ndc_positions()[0][0] + 0.55).abs() < EPS,
        "handle centered at a quarter of the track"
    );
    assert_eq!(glyphs.calls, 2, "value text changed once");
    assert!(b.is_balanced(), "slider pushes popped");
}

#[test]
fn custom_drawables_render_before_children() {
    #[derive(Debug)]
    struct Quad;
    impl Draw for Quad {
        fn draw(&mut self, frame: &mut Frame<'_>) -> Result<(), RenderError> {
            frame.backend().fill_rect(kurbo::Rect::new(0.0, 0.0, 1.0, 1.0));
            Ok(())
        }
    }
    let mut root = Node::custom(Quad).with_child(triangle());
    let mut b = backend();
    Frame::new(&mut b).render(&mut root).expect("renders");
    let primitives: Vec<_> = b.draws().map(|d| d.primitive).collect();
    assert_eq!(
        primitives,
        vec![Primitive::Quads, Primitive::Triangles],
        "custom draw before children"
    );
}
