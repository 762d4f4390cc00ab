// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].

use tessera_core::backend::Viewport;
use tessera_core::trace::{
    LayoutEvent, NodeTag, PassBeginEvent, PassSummary, PopEvent, PushEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_PASS_BEGIN: u8 = 1;
const TAG_PUSH: u8 = 2;
const TAG_POP: u8 = 3;
const TAG_LAYOUT: u8 = 4;
const TAG_PASS_END: u8 = 5;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_node(&mut self, pass_index: u64, depth: u32, node: NodeTag) {
        self.write_u64(pass_index);
        self.write_u32(depth);
        self.write_u8(node.code());
    }
}

impl TraceSink for RecorderSink {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.write_u8(TAG_PASS_BEGIN);
        self.write_u64(e.pass_index);
        self.write_i32(e.viewport.x);
        self.write_i32(e.viewport.y);
        self.write_i32(e.viewport.width);
        self.write_i32(e.viewport.height);
    }

    fn on_push(&mut self, e: &PushEvent) {
        self.write_u8(TAG_PUSH);
        self.write_node(e.pass_index, e.depth, e.node);
    }

    fn on_pop(&mut self, e: &PopEvent) {
        self.write_u8(TAG_POP);
        self.write_node(e.pass_index, e.depth, e.node);
    }

    fn on_layout(&mut self, e: &LayoutEvent) {
        self.write_u8(TAG_LAYOUT);
        self.write_u64(e.pass_index);
        self.write_u32(e.depth);
        self.write_u32(e.cols);
        self.write_u32(e.rows);
        self.write_f64(e.width);
        self.write_f64(e.height);
    }

    fn on_pass_end(&mut self, s: &PassSummary) {
        self.write_u8(TAG_PASS_END);
        self.write_u64(s.pass_index);
        self.write_u32(s.nodes);
        self.write_u32(s.max_depth);
        self.write_u32(s.layouts);
        self.write_u8(u8::from(s.failed));
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`PassBeginEvent`].
    PassBegin(PassBeginEvent),
    /// A [`PushEvent`].
    Push(PushEvent),
    /// A [`PopEvent`].
    Pop(PopEvent),
    /// A [`LayoutEvent`].
    Layout(LayoutEvent),
    /// A [`PassSummary`].
    PassEnd(PassSummary),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first truncated record, unknown tag, or unknown
/// node code.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_i32(&mut self) -> Option<i32> {
        self.take().map(i32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.take().map(f64::from_le_bytes)
    }

    fn read_node(&mut self) -> Option<(u64, u32, NodeTag)> {
        let pass_index = self.read_u64()?;
        let depth = self.read_u32()?;
        let node = NodeTag::from_code(self.read_u8()?)?;
        Some((pass_index, depth, node))
    }

    fn decode_pass_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassBegin(PassBeginEvent {
            pass_index: self.read_u64()?,
            viewport: Viewport::new(
                self.read_i32()?,
                self.read_i32()?,
                self.read_i32()?,
                self.read_i32()?,
            ),
        }))
    }

    fn decode_push(&mut self) -> Option<RecordedEvent> {
        let (pass_index, depth, node) = self.read_node()?;
        Some(RecordedEvent::Push(PushEvent {
            pass_index,
            depth,
            node,
        }))
    }

    fn decode_pop(&mut self) -> Option<RecordedEvent> {
        let (pass_index, depth, node) = self.read_node()?;
        Some(RecordedEvent::Pop(PopEvent {
            pass_index,
            depth,
            node,
        }))
    }

    fn decode_layout(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Layout(LayoutEvent {
            pass_index: self.read_u64()?,
            depth: self.read_u32()?,
            cols: self.read_u32()?,
            rows: self.read_u32()?,
            width: self.read_f64()?,
            height: self.read_f64()?,
        }))
    }

    fn decode_pass_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassEnd(PassSummary {
            pass_index: self.read_u64()?,
            nodes: self.read_u32()?,
            max_depth: self.read_u32()?,
            layouts: self.read_u32()?,
            failed: self.read_u8()? != 0,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_u8()? {
            TAG_PASS_BEGIN => self.decode_pass_begin(),
            TAG_PUSH => self.decode_push(),
            TAG_POP => self.decode_pop(),
            TAG_LAYOUT => self.decode_layout(),
            TAG_PASS_END => self.decode_pass_end(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::layout::{CellPair, Grid};
    use tessera_core::node::{Frame, Node};
    use tessera_core::trace::Tracer;
    use tessera_core::widget::Widget;
    use tessera_render::RecordingBackend;

    fn ui() -> Node {
        Node::group().with_child(
            Node::widget(Widget::root(Grid::new(1, 2)))
                .with_child(Node::widget(Widget::panel(CellPair::new(0, 0))))
                .with_child(Node::widget(Widget::panel(CellPair::new(1, 0)))),
        )
    }

    #[test]
    fn records_a_whole_pass() {
        let mut rec = RecorderSink::new();
        let mut backend = RecordingBackend::new(Viewport::new(0, 0, 200, 100));
        let mut root = ui();
        Frame::new(&mut backend)
            .with_tracer(Tracer::new(&mut rec))
            .render(&mut root)
            .unwrap();

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(
            events.first(),
            Some(&RecordedEvent::PassBegin(PassBeginEvent {
                pass_index: 0,
                viewport: Viewport::new(0, 0, 200, 100),
            })),
            "pass begin first"
        );
        let pushes = events
            .iter()
            .filter(|e| matches!(e, RecordedEvent::Push(_)))
            .count();
        let pops = events
            .iter()
            .filter(|e| matches!(e, RecordedEvent::Pop(_)))
            .count();
        assert_eq!(pushes, 4, "group, container, two panels");
        assert_eq!(pops, pushes, "every push popped");
        assert!(
            events.contains(&RecordedEvent::Layout(LayoutEvent {
                pass_index: 0,
                depth: 1,
                cols: 2,
                rows: 1,
                width: 200.0,
                height: 100.0,
            })),
            "container layout recorded at its own depth"
        );
        match events.last() {
            Some(RecordedEvent::PassEnd(s)) => {
                assert_eq!(s.nodes, 4, "summary counts pushes");
                assert_eq!(s.layouts, 1, "one container");
                assert!(!s.failed, "pass succeeded");
            }
            other => panic!("expected PassEnd, got {other:?}"),
        }
    }

    #[test]
    fn failed_pass_is_marked() {
        let mut rec = RecorderSink::new();
        let mut backend = RecordingBackend::new(Viewport::new(0, 0, 200, 100));
        // A label with no rasterizer attached fails during render.
        let mut root = Node::widget(Widget::root(Grid::new(1, 1)))
            .with_child(Node::widget(Widget::label(CellPair::new(0, 0), "x")));
        let result = Frame::new(&mut backend)
            .with_tracer(Tracer::new(&mut rec))
            .render(&mut root);
        assert!(result.is_err(), "label needs a rasterizer");

        match decode(rec.as_bytes()).last() {
            Some(RecordedEvent::PassEnd(s)) => assert!(s.failed, "failure recorded"),
            other => panic!("expected PassEnd, got {other:?}"),
        }
    }

    #[test]
    fn truncated_record_stops_decoding() {
        let mut rec = RecorderSink::new();
        rec.on_push(&PushEvent {
            pass_index: 3,
            depth: 2,
            node: NodeTag::Mesh,
        });
        rec.on_pop(&PopEvent {
            pass_index: 3,
            depth: 2,
            node: NodeTag::Mesh,
        });
        let bytes = rec.into_bytes();
        let events: Vec<_> = decode(&bytes[..bytes.len() - 1]).collect();
        assert_eq!(events.len(), 1, "only the complete record decodes");
    }

    #[test]
    fn unknown_node_code_stops_decoding() {
        let mut bytes = vec![TAG_PUSH];
        bytes.extend_from_slice(&0_u64.to_le_bytes());
        bytes.extend_from_slice(&0_u32.to_le_bytes());
        bytes.push(200);
        assert_eq!(decode(&bytes).count(), 0, "bad node code");
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty(), "nothing recorded");
    }
}
