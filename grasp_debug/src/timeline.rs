// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Each object gets its own track (`tid` is the object index). A poll loop
//! becomes a `B`/`E` span on that track, so the time an object spent being
//! manipulated reads as one bar. Everything else is an instant event.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use grasp_core::time::Timebase;
use grasp_core::trace::{ContactKind, PollLoopPhase};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
pub fn export(bytes: &[u8], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::Contact(e) => {
                let (name, args) = match e.kind {
                    ContactKind::Moved(p) => (
                        "ContactMove",
                        json!({ "frame_index": e.frame_index, "slot": e.slot, "x": p.x, "y": p.y }),
                    ),
                    ContactKind::Pressed => (
                        "ContactPress",
                        json!({ "frame_index": e.frame_index, "slot": e.slot }),
                    ),
                    ContactKind::Released => (
                        "ContactRelease",
                        json!({ "frame_index": e.frame_index, "slot": e.slot }),
                    ),
                };
                events.push(json!({
                    "ph": "i",
                    "name": name,
                    "cat": "Input",
                    "ts": ticks_to_us(e.at.ticks(), timebase),
                    "pid": 0,
                    "tid": e.object,
                    "s": "t",
                    "args": args,
                }));
            }
            RecordedEvent::SlotRejected(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "SlotRejected",
                    "cat": "Input",
                    "ts": ticks_to_us(e.at.ticks(), timebase),
                    "pid": 0,
                    "tid": e.object,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "slot": e.slot,
                        "max_slots": e.max_slots,
                    }
                }));
            }
            RecordedEvent::Transition(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", e.to),
                    "cat": "Gesture",
                    "ts": ticks_to_us(e.at.ticks(), timebase),
                    "pid": 0,
                    "tid": e.object,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "from": format!("{:?}", e.from),
                    }
                }));
            }
            RecordedEvent::PollLoop(e) => {
                let ph = match e.phase {
                    PollLoopPhase::Started => "B",
                    PollLoopPhase::Stopped => "E",
                };
                events.push(json!({
                    "ph": ph,
                    "name": "PollLoop",
                    "cat": "Gesture",
                    "ts": ticks_to_us(e.at.ticks(), timebase),
                    "pid": 0,
                    "tid": e.object,
                    "args": {
                        "frame_index": e.frame_index,
                        "iterations": e.iterations,
                    }
                }));
            }
            RecordedEvent::Step(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", e.step),
                    "cat": "Pose",
                    "ts": ticks_to_us(e.at.ticks(), timebase),
                    "pid": 0,
                    "tid": e.object,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::FrameSummary(s) => {
                events.push(json!({
                    "ph": "i",
                    "name": "FrameSummary",
                    "cat": "Summary",
                    "ts": ticks_to_us(s.now.ticks(), timebase),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": s.frame_index,
                        "contacts": s.contacts,
                        "polling": s.polling,
                        "steps": s.steps,
                        "errors": s.errors,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn ticks_to_us(ticks: u64, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(ticks) as f64 / 1000.0
}
