// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Every record starts with a one-byte tag followed by the frame index and
//! the object index. Contact positions are stored as raw `f64` bits, so a
//! replay reproduces them exactly.

use grasp_core::gesture::{Direction, GestureState, Step};
use grasp_core::input::Binding;
use grasp_core::time::HostTime;
use grasp_core::trace::{
    ContactEvent, ContactKind, FrameSummary, PollLoopEvent, PollLoopPhase, SlotRejectedEvent,
    StepEvent, TraceSink, TransitionEvent,
};
use kurbo::Point;

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_CONTACT: u8 = 1;
const TAG_SLOT_REJECTED: u8 = 2;
const TAG_TRANSITION: u8 = 3;
const TAG_POLL_LOOP: u8 = 4;
const TAG_STEP: u8 = 5;
const TAG_FRAME_SUMMARY: u8 = 6;

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

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_header(&mut self, tag: u8, frame_index: u64, object: u32) {
        self.write_u8(tag);
        self.write_u64(frame_index);
        self.write_u32(object);
    }

    fn write_slot(&mut self, slot: usize) {
        self.write_u32(u32::try_from(slot).unwrap_or(u32::MAX));
    }

    fn write_binding(&mut self, b: Binding) {
        let (kind, k) = match b {
            Binding::MousePosition => (0, 0),
            Binding::MouseButton => (1, 0),
            Binding::TouchPosition(k) => (2, k),
            Binding::TouchPress(k) => (3, k),
        };
        self.write_u8(kind);
        self.write_u8(k);
    }

    fn write_state(&mut self, s: GestureState) {
        self.write_u8(match s {
            GestureState::Idle => 0,
            GestureState::Translating => 1,
            GestureState::ScalingRotating => 2,
        });
    }

    fn write_step(&mut self, s: Step) {
        self.write_u8(match s {
            Step::Translate => 0,
            Step::Rescale(Direction::Positive) => 1,
            Step::Rescale(Direction::Negative) => 2,
            Step::Rotate(Direction::Positive) => 3,
            Step::Rotate(Direction::Negative) => 4,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_contact(&mut self, e: &ContactEvent) {
        self.write_header(TAG_CONTACT, e.frame_index, e.object);
        self.write_binding(e.binding);
        self.write_slot(e.slot);
        let (kind, p) = match e.kind {
            ContactKind::Moved(p) => (0, p),
            ContactKind::Pressed => (1, Point::ORIGIN),
            ContactKind::Released => (2, Point::ORIGIN),
        };
        self.write_u8(kind);
        self.write_f64(p.x);
        self.write_f64(p.y);
        self.write_u64(e.at.ticks());
    }

    fn on_slot_rejected(&mut self, e: &SlotRejectedEvent) {
        self.write_header(TAG_SLOT_REJECTED, e.frame_index, e.object);
        self.write_slot(e.slot);
        self.write_u8(e.max_slots);
        self.write_u64(e.at.ticks());
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        self.write_header(TAG_TRANSITION, e.frame_index, e.object);
        self.write_state(e.from);
        self.write_state(e.to);
        self.write_u64(e.at.ticks());
    }

    fn on_poll_loop(&mut self, e: &PollLoopEvent) {
        self.write_header(TAG_POLL_LOOP, e.frame_index, e.object);
        self.write_u8(match e.phase {
            PollLoopPhase::Started => 0,
            PollLoopPhase::Stopped => 1,
        });
        self.write_u64(e.iterations);
        self.write_u64(e.at.ticks());
    }

    fn on_step(&mut self, e: &StepEvent) {
        self.write_header(TAG_STEP, e.frame_index, e.object);
        self.write_step(e.step);
        self.write_u64(e.at.ticks());
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.write_u8(TAG_FRAME_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_u64(s.now.ticks());
        self.write_u32(s.contacts);
        self.write_u32(s.polling);
        self.write_u32(s.steps);
        self.write_u32(s.errors);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`ContactEvent`].
    Contact(ContactEvent),
    /// A [`SlotRejectedEvent`].
    SlotRejected(SlotRejectedEvent),
    /// A [`TransitionEvent`].
    Transition(TransitionEvent),
    /// A [`PollLoopEvent`].
    PollLoop(PollLoopEvent),
    /// A [`StepEvent`].
    Step(StepEvent),
    /// A [`FrameSummary`].
    FrameSummary(FrameSummary),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
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

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_slot(&mut self) -> Option<usize> {
        usize::try_from(self.read_u32()?).ok()
    }

    fn read_binding(&mut self) -> Option<Binding> {
        let kind = self.read_u8()?;
        let k = self.read_u8()?;
        Some(match kind {
            0 => Binding::MousePosition,
            1 => Binding::MouseButton,
            2 => Binding::TouchPosition(k),
            _ => Binding::TouchPress(k),
        })
    }

    fn read_state(&mut self) -> Option<GestureState> {
        Some(match self.read_u8()? {
            0 => GestureState::Idle,
            1 => GestureState::Translating,
            _ => GestureState::ScalingRotating,
        })
    }

    fn read_step(&mut self) -> Option<Step> {
        Some(match self.read_u8()? {
            0 => Step::Translate,
            1 => Step::Rescale(Direction::Positive),
            2 => Step::Rescale(Direction::Negative),
            3 => Step::Rotate(Direction::Positive),
            _ => Step::Rotate(Direction::Negative),
        })
    }

    fn decode_contact(&mut self) -> Option<RecordedEvent> {
        let frame_index = self.read_u64()?;
        let object = self.read_u32()?;
        let binding = self.read_binding()?;
        let slot = self.read_slot()?;
        let kind = self.read_u8()?;
        let p = Point::new(self.read_f64()?, self.read_f64()?);
        Some(RecordedEvent::Contact(ContactEvent {
            frame_index,
            object,
            binding,
            slot,
            kind: match kind {
                0 => ContactKind::Moved(p),
                1 => ContactKind::Pressed,
                _ => ContactKind::Released,
            },
            at: HostTime(self.read_u64()?),
        }))
    }

    fn decode_slot_rejected(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::SlotRejected(SlotRejectedEvent {
            frame_index: self.read_u64()?,
            object: self.read_u32()?,
            slot: self.read_slot()?,
            max_slots: self.read_u8()?,
            at: HostTime(self.read_u64()?),
        }))
    }

    fn decode_transition(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Transition(TransitionEvent {
            frame_index: self.read_u64()?,
            object: self.read_u32()?,
            from: self.read_state()?,
            to: self.read_state()?,
            at: HostTime(self.read_u64()?),
        }))
    }

    fn decode_poll_loop(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PollLoop(PollLoopEvent {
            frame_index: self.read_u64()?,
            object: self.read_u32()?,
            phase: if self.read_u8()? == 0 {
                PollLoopPhase::Started
            } else {
                PollLoopPhase::Stopped
            },
            iterations: self.read_u64()?,
            at: HostTime(self.read_u64()?),
        }))
    }

    fn decode_step(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Step(StepEvent {
            frame_index: self.read_u64()?,
            object: self.read_u32()?,
            step: self.read_step()?,
            at: HostTime(self.read_u64()?),
        }))
    }

    fn decode_frame_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameSummary(FrameSummary {
            frame_index: self.read_u64()?,
            now: HostTime(self.read_u64()?),
            contacts: self.read_u32()?,
            polling: self.read_u32()?,
            steps: self.read_u32()?,
            errors: self.read_u32()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_CONTACT => self.decode_contact(),
            TAG_SLOT_REJECTED => self.decode_slot_rejected(),
            TAG_TRANSITION => self.decode_transition(),
            TAG_POLL_LOOP => self.decode_poll_loop(),
            TAG_STEP => self.decode_step(),
            TAG_FRAME_SUMMARY => self.decode_frame_summary(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
