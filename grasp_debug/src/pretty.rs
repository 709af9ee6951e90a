// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to milliseconds using a [`Timebase`].

use std::io::Write;

use grasp_core::gesture::{Direction, GestureState, Step};
use grasp_core::time::{HostTime, Timebase};
use grasp_core::trace::{
    ContactEvent, ContactKind, FrameSummary, PollLoopEvent, PollLoopPhase, SlotRejectedEvent,
    StepEvent, TraceSink, TransitionEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
    show_moves: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .field("show_moves", &self.show_moves)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self::with_writer(Box::new(std::io::stderr()), timebase)
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>, timebase: Timebase) -> Self {
        Self::with_writer(writer, timebase)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self {
            writer,
            timebase,
            show_moves: true,
        }
    }

    /// Suppresses the (very frequent) contact-move lines.
    #[must_use]
    pub fn without_moves(mut self) -> Self {
        self.show_moves = false;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn host_ms(&self, t: HostTime) -> f64 {
        self.timebase.ticks_to_nanos(t.ticks()) as f64 / 1_000_000.0
    }
}

fn state_name(state: GestureState) -> &'static str {
    match state {
        GestureState::Idle => "idle",
        GestureState::Translating => "translating",
        GestureState::ScalingRotating => "scaling/rotating",
    }
}

fn step_name(step: Step) -> &'static str {
    match step {
        Step::Translate => "translate",
        Step::Rescale(Direction::Positive) => "rescale+",
        Step::Rescale(Direction::Negative) => "rescale-",
        Step::Rotate(Direction::Positive) => "rotate+",
        Step::Rotate(Direction::Negative) => "rotate-",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_contact(&mut self, e: &ContactEvent) {
        let what = match e.kind {
            ContactKind::Moved(_) if !self.show_moves => return,
            ContactKind::Moved(p) => format!("move ({:.0}, {:.0})", p.x, p.y),
            ContactKind::Pressed => String::from("press"),
            ContactKind::Released => String::from("release"),
        };
        let _ = writeln!(
            self.writer,
            "[contact] frame={} object={} slot={} {what} via {:?} at {:.3}ms",
            e.frame_index,
            e.object,
            e.slot,
            e.binding,
            self.host_ms(e.at),
        );
    }

    fn on_slot_rejected(&mut self, e: &SlotRejectedEvent) {
        let _ = writeln!(
            self.writer,
            "[rejected] frame={} object={} slot={} max_slots={}",
            e.frame_index, e.object, e.slot, e.max_slots,
        );
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        let _ = writeln!(
            self.writer,
            "[gesture] frame={} object={} {} -> {}",
            e.frame_index,
            e.object,
            state_name(e.from),
            state_name(e.to),
        );
    }

    fn on_poll_loop(&mut self, e: &PollLoopEvent) {
        let phase = match e.phase {
            PollLoopPhase::Started => "start",
            PollLoopPhase::Stopped => "stop",
        };
        let _ = writeln!(
            self.writer,
            "[poll:{phase}] frame={} object={} iterations={}",
            e.frame_index, e.object, e.iterations,
        );
    }

    fn on_step(&mut self, e: &StepEvent) {
        let _ = writeln!(
            self.writer,
            "[step] frame={} object={} {}",
            e.frame_index,
            e.object,
            step_name(e.step),
        );
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] frame={} at {:.3}ms contacts={} polling={} steps={} errors={}",
            s.frame_index,
            self.host_ms(s.now),
            s.contacts,
            s.polling,
            s.steps,
            s.errors,
        );
    }
}
