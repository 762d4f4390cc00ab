// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless frame loop that exercises the scene graph end to end.
//!
//! Builds a small 3-D scene with a HUD of widgets on top, renders a few
//! passes into a [`RecordingBackend`], drags the HUD slider between passes,
//! and records every pass to both a
//! [`PrettyPrintSink`](tessera_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](tessera_debug::recorder::RecorderSink) before exporting a
//! Chrome trace JSON file.

use std::cell::Cell;
use std::fs::File;
use std::io::BufWriter;
use std::rc::Rc;

use kurbo::Point;

use tessera_core::backend::{Capability, Color, Primitive, Viewport};
use tessera_core::error::RenderError;
use tessera_core::event::{Buttons, Event, EventHandler, KeyboardEvent, MouseEvent};
use tessera_core::layout::{CellPair, Grid, LayoutCell, LayoutVector};
use tessera_core::modification::BlendFunc;
use tessera_core::node::{Camera, Frame, Node, Projection, Sprite, Vertex, WorldSprite};
use tessera_core::texture::{Image, Texture, TextureId};
use tessera_core::trace::{
    LayoutEvent, PassBeginEvent, PassSummary, PopEvent, PushEvent, TraceSink, Tracer,
};
use tessera_core::transform::{Rotation, Transform};
use tessera_core::widget::{HAlign, Label, Rasterizer, Slider, VAlign, Widget, WidgetKind};

use tessera_debug::pretty::PrettyPrintSink;
use tessera_debug::recorder::RecorderSink;
use tessera_render::RecordingBackend;

const PASS_COUNT: u64 = 3;
const WINDOW: Viewport = Viewport::new(0, 0, 640, 480);
/// Height of the HUD status row in pixels.
const STATUS_HEIGHT: f64 = 40.0;

/// Solid blocks, eight pixels per character.
#[derive(Debug, Default)]
struct BlockGlyphs;

impl Rasterizer for BlockGlyphs {
    fn rasterize(&mut self, text: &str, color: Color) -> Result<Image, RenderError> {
        let chars = u32::try_from(text.chars().count())
            .map_err(|_| RenderError::Text(format!("{} characters is too long", text.len())))?;
        Ok(Image::solid(chars.max(1) * 8, 8, color))
    }
}

/// Forwards every event to two sinks.
struct Tee<'a> {
    a: &'a mut dyn TraceSink,
    b: &'a mut dyn TraceSink,
}

impl TraceSink for Tee<'_> {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.a.on_pass_begin(e);
        self.b.on_pass_begin(e);
    }

    fn on_push(&mut self, e: &PushEvent) {
        self.a.on_push(e);
        self.b.on_push(e);
    }

    fn on_pop(&mut self, e: &PopEvent) {
        self.a.on_pop(e);
        self.b.on_pop(e);
    }

    fn on_layout(&mut self, e: &LayoutEvent) {
        self.a.on_layout(e);
        self.b.on_layout(e);
    }

    fn on_pass_end(&mut self, s: &PassSummary) {
        self.a.on_pass_end(s);
        self.b.on_pass_end(s);
    }
}

fn cube_face(z: f64, color: Color) -> Node {
    Node::face(
        Primitive::Quads,
        vec![
            Vertex::new(-1.0, -1.0, z).with_color(color),
            Vertex::new(1.0, -1.0, z),
            Vertex::new(1.0, 1.0, z),
            Vertex::new(-1.0, 1.0, z),
        ],
    )
}

fn world(marker: TextureId) -> Node {
    let camera = Node::camera(
        Camera::look_at([0.0, 2.0, 6.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0]).with_projection(
            Projection::Perspective {
                fov_y: 60.0,
                aspect: f64::from(WINDOW.width) / f64::from(WINDOW.height),
                near: 0.1,
                far: 100.0,
            },
        ),
    );
    let cube = Node::mesh(vec![
        cube_face(1.0, Color::rgb(0.9, 0.2, 0.2)),
        cube_face(-1.0, Color::rgb(0.2, 0.2, 0.9)),
    ])
    .with_transform(Transform::Prs {
        position: Some([0.0, 0.5, 0.0]),
        rotation: Some(Rotation {
            degrees: 30.0,
            axis: [0.0, 1.0, 0.0],
        }),
        scale: None,
    });
    let beacon = Node::world_sprite(WorldSprite {
        sprite: Sprite {
            size: kurbo::Vec2::new(0.05, 0.05),
            centered: true,
            ..Sprite::default()
        },
        anchor: [0.0, 2.0, 0.0],
    })
    .with_texture(marker);

    Node::scene(camera)
        .enabling(Capability::DepthTest)
        .with_child(cube)
        .with_child(beacon)
}

fn hud(events: &Rc<Cell<u32>>) -> Node {
    let rows = LayoutVector::new(vec![
        LayoutCell::fixed(STATUS_HEIGHT),
        LayoutCell::weighted(1.0),
    ]);
    let grid = Grid::from_vectors(rows, LayoutVector::uniform(2));

    let legend = Node::widget(Widget::container(CellPair::new(1, 1), Grid::new(2, 1)))
        .with_child(Node::widget(
            Widget::new(
                Some(CellPair::new(0, 1)),
                WidgetKind::Label(Label::new("scene").with_align(HAlign::Left, VAlign::Top)),
            )
            .with_background(Color::rgba(0.0, 0.0, 0.0, 0.5)),
        ))
        .with_child(Node::widget(Widget::label(CellPair::new(0, 0), "hud")));

    let counter = Rc::clone(events);
    Node::widget(Widget::root(grid))
        .on_event(move |_| counter.set(counter.get() + 1))
        .with_child(Node::widget(Widget::label(CellPair::new(0, 0), "speed")))
        .with_child(Node::widget(Widget::slider(
            CellPair::new(1, 0),
            Slider::new(0.0, 4.0).with_map(Slider::step(8)),
        )))
        .with_child(Node::widget(Widget::panel(CellPair::new(0, 1))))
        .with_child(legend)
}

fn slider_value(root: &Node) -> Option<f64> {
    root.children.iter().find_map(|child| match &child.as_widget()?.kind {
        WidgetKind::Slider(slider) => Some(slider.value),
        _ => None,
    })
}

fn main() {
    // -- backend and resources ---------------------------------------------
    let mut backend = RecordingBackend::new(WINDOW);
    let marker = Texture::new(&mut backend, Some(Image::solid(4, 4, Color::WHITE)))
        .expect("recording backend allocates textures");

    // -- tree ----------------------------------------------------------------
    let events = Rc::new(Cell::new(0));
    let mut root = Node::group()
        .enabling(Capability::Blend)
        .with_modification(BlendFunc::alpha())
        .with_child(world(marker.id()))
        .with_child(hud(&events));

    // -- sinks ---------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();
    let mut glyphs = BlockGlyphs;

    for pass in 0..PASS_COUNT {
        let mut tee = Tee {
            a: &mut pretty,
            b: &mut recorder,
        };
        let mut frame = Frame::new(&mut backend)
            .with_pass_index(pass)
            .with_rasterizer(&mut glyphs)
            .with_tracer(Tracer::new(&mut tee));
        let summary = match frame.render(&mut root) {
            Ok(summary) => summary,
            Err(e) => {
                eprintln!("pass {pass} failed: {e}");
                continue;
            }
        };
        drop(frame);

        let draws = backend.draws().count();
        println!(
            "pass {pass}: {} nodes, {} layouts, {draws} draws, balanced={}",
            summary.nodes,
            summary.layouts,
            backend.is_balanced(),
        );
        backend.clear();

        // Drag across the slider track in the status row, then tap a key.
        let hud = &mut root.children[1];
        let x = 320.0 + 80.0 * (pass + 1) as f64;
        hud.trigger(&Event::from(MouseEvent::moved(
            Point::new(x, STATUS_HEIGHT / 2.0),
            Buttons::PRIMARY,
        )));
        hud.trigger(&Event::from(KeyboardEvent::character(u32::from(b' '), ' ')));
        if let Some(value) = slider_value(hud) {
            println!("slider value after drag: {value}");
        }
    }

    println!("hud handled {} events", events.get());

    // -- export Chrome trace -------------------------------------------------
    let path = "scene_trace.json";
    let file = File::create(path).expect("failed to create scene_trace.json");
    let mut writer = BufWriter::new(file);
    tessera_debug::chrome::export(recorder.as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path} ({PASS_COUNT} passes)");
}
