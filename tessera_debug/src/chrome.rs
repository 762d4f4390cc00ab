// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Render passes carry no wall-clock time, so timestamps are logical: each
//! recorded event advances the clock by one microsecond. Passes and node
//! push/pop pairs become nested duration slices; layouts become instants.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for (ts, recorded) in (0_u64..).zip(decode(bytes)) {
        match recorded {
            RecordedEvent::PassBegin(e) => {
                events.push(json!({
                    "ph": "B",
                    "name": "Pass",
                    "cat": "Pass",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "pass_index": e.pass_index,
                        "viewport": [e.viewport.x, e.viewport.y, e.viewport.width, e.viewport.height],
                    }
                }));
            }
            RecordedEvent::Push(e) => {
                events.push(json!({
                    "ph": "B",
                    "name": e.node.name(),
                    "cat": "Node",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "pass_index": e.pass_index,
                        "depth": e.depth,
                    }
                }));
            }
            RecordedEvent::Pop(e) => {
                events.push(json!({
                    "ph": "E",
                    "name": e.node.name(),
                    "cat": "Node",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "pass_index": e.pass_index,
                        "depth": e.depth,
                    }
                }));
            }
            RecordedEvent::Layout(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Layout",
                    "cat": "Layout",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "pass_index": e.pass_index,
                        "depth": e.depth,
                        "cols": e.cols,
                        "rows": e.rows,
                        "width": e.width,
                        "height": e.height,
                    }
                }));
            }
            RecordedEvent::PassEnd(s) => {
                events.push(json!({
                    "ph": "E",
                    "name": "Pass",
                    "cat": "Pass",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "pass_index": s.pass_index,
                        "nodes": s.nodes,
                        "max_depth": s.max_depth,
                        "layouts": s.layouts,
                        "failed": s.failed,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use tessera_core::backend::Viewport;
    use tessera_core::trace::{NodeTag, PassBeginEvent, PassSummary, PopEvent, PushEvent, TraceSink};

    #[test]
    fn export_produces_nested_slices() {
        let mut rec = RecorderSink::new();
        rec.on_pass_begin(&PassBeginEvent {
            pass_index: 0,
            viewport: Viewport::new(0, 0, 640, 480),
        });
        rec.on_push(&PushEvent {
            pass_index: 0,
            depth: 0,
            node: NodeTag::Scene,
        });
        rec.on_pop(&PopEvent {
            pass_index: 0,
            depth: 0,
            node: NodeTag::Scene,
        });
        rec.on_pass_end(&PassSummary {
            pass_index: 0,
            nodes: 1,
            max_depth: 0,
            layouts: 0,
            failed: false,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 4, "one object per event");

        let phases: Vec<_> = parsed.iter().map(|e| e["ph"].as_str().unwrap()).collect();
        assert_eq!(phases, ["B", "B", "E", "E"], "slices nest");
        assert_eq!(parsed[1]["name"], "scene", "node slice named by kind");
        assert_eq!(parsed[3]["args"]["nodes"], 1, "summary attached to pass end");

        let stamps: Vec<_> = parsed.iter().map(|e| e["ts"].as_u64().unwrap()).collect();
        assert_eq!(stamps, [0, 1, 2, 3], "logical clock");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty(), "no events");
    }
}
