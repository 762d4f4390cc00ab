// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Push and pop
//! lines are indented by node depth.

use std::io::Write;

use tessera_core::trace::{
    LayoutEvent, PassBeginEvent, PassSummary, PopEvent, PushEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    indent: usize,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("indent", &self.indent)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination, indenting two
    /// spaces per level.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer, indent: 2 }
    }

    /// Sets the number of spaces per nesting level.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn pad(&self, depth: u32) -> usize {
        usize::try_from(depth).map_or(usize::MAX, |d| d.saturating_mul(self.indent))
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        let v = e.viewport;
        let _ = writeln!(
            self.writer,
            "[pass:begin] pass={} viewport=({}, {}) {}x{}",
            e.pass_index, v.x, v.y, v.width, v.height,
        );
    }

    fn on_push(&mut self, e: &PushEvent) {
        let _ = writeln!(
            self.writer,
            "{:pad$}[push] {} depth={}",
            "",
            e.node.name(),
            e.depth,
            pad = self.pad(e.depth),
        );
    }

    fn on_pop(&mut self, e: &PopEvent) {
        let _ = writeln!(
            self.writer,
            "{:pad$}[pop] {} depth={}",
            "",
            e.node.name(),
            e.depth,
            pad = self.pad(e.depth),
        );
    }

    fn on_layout(&mut self, e: &LayoutEvent) {
        let _ = writeln!(
            self.writer,
            "{:pad$}[layout] {}x{} cells over {:.1}x{:.1}",
            "",
            e.cols,
            e.rows,
            e.width,
            e.height,
            pad = self.pad(e.depth),
        );
    }

    fn on_pass_end(&mut self, s: &PassSummary) {
        let status = if s.failed { "FAILED" } else { "ok" };
        let _ = writeln!(
            self.writer,
            "[pass:end] pass={} nodes={} max_depth={} layouts={} status={status}",
            s.pass_index, s.nodes, s.max_depth, s.layouts,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::trace::NodeTag;

    #[test]
    fn pushes_are_indented_by_depth() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_push(&PushEvent {
            pass_index: 0,
            depth: 0,
            node: NodeTag::Scene,
        });
        sink.on_push(&PushEvent {
            pass_index: 0,
            depth: 2,
            node: NodeTag::Label,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "[push] scene depth=0", "got: {output}");
        assert_eq!(lines[1], "    [push] label depth=2", "got: {output}");
    }

    #[test]
    fn failed_pass_is_flagged() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new()).with_indent(4);
        sink.on_pass_end(&PassSummary {
            pass_index: 3,
            nodes: 7,
            max_depth: 2,
            layouts: 1,
            failed: true,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("pass=3"), "got: {output}");
        assert!(output.contains("status=FAILED"), "got: {output}");
    }
}
