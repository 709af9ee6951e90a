// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for gesture handling.
//!
//! This module provides a [`TraceSink`] trait with one method per event that
//! the [`Scene`](crate::scene::Scene) emits while dispatching input and
//! driving poll loops. All method bodies default to no-ops, so implementing
//! only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! [`FrameSummaryBuilder`] tallies what happened during one frame and produces
//! a [`FrameSummary`] at the end.

use kurbo::Point;

use crate::gesture::{GestureState, Step};
use crate::input::Binding;
use crate::time::{FrameTick, HostTime};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What a contact event reported.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ContactKind {
    /// The contact moved to a new screen position.
    Moved(Point),
    /// The contact went down.
    Pressed,
    /// The contact went up.
    Released,
}

/// Whether a poll loop started or stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PollLoopPhase {
    /// The loop was scheduled on leaving `Idle`.
    Started,
    /// The loop was halted on returning to `Idle`.
    Stopped,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted for every input event an object accepted.
#[derive(Clone, Copy, Debug)]
pub struct ContactEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Index of the object that received the event.
    pub object: u32,
    /// The control that fired.
    pub binding: Binding,
    /// Logical slot the control maps to.
    pub slot: usize,
    /// What the control reported.
    pub kind: ContactKind,
    /// Host time of the frame.
    pub at: HostTime,
}

/// Emitted when an event names a slot beyond the object's slot table.
#[derive(Clone, Copy, Debug)]
pub struct SlotRejectedEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Index of the object that dropped the event.
    pub object: u32,
    /// The out-of-range slot.
    pub slot: usize,
    /// Number of slots the object tracks.
    pub max_slots: u8,
    /// Host time of the frame.
    pub at: HostTime,
}

/// Emitted on every gesture state change.
#[derive(Clone, Copy, Debug)]
pub struct TransitionEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Index of the object whose gesture changed.
    pub object: u32,
    /// State before the transition.
    pub from: GestureState,
    /// State after the transition.
    pub to: GestureState,
    /// Host time of the frame.
    pub at: HostTime,
}

/// Emitted when an object's poll loop starts or stops.
#[derive(Clone, Copy, Debug)]
pub struct PollLoopEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Index of the object that owns the loop.
    pub object: u32,
    /// Started or stopped.
    pub phase: PollLoopPhase,
    /// Iterations the loop has run so far.
    pub iterations: u64,
    /// Host time of the frame.
    pub at: HostTime,
}

/// Emitted when a poll loop iteration applies a step to an object.
#[derive(Clone, Copy, Debug)]
pub struct StepEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Index of the object that moved.
    pub object: u32,
    /// The applied step.
    pub step: Step,
    /// Host time of the frame.
    pub at: HostTime,
}

/// Per-frame tally produced by [`FrameSummaryBuilder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Host time of the frame.
    pub now: HostTime,
    /// Input events dispatched to objects.
    pub contacts: u32,
    /// Poll loops that ran an iteration this frame.
    pub polling: u32,
    /// Steps applied.
    pub steps: u32,
    /// Errors reported to the error sink.
    pub errors: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the scene.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when an object accepts an input event.
    fn on_contact(&mut self, e: &ContactEvent) {
        _ = e;
    }

    /// Called when an input event is dropped for naming an unknown slot.
    fn on_slot_rejected(&mut self, e: &SlotRejectedEvent) {
        _ = e;
    }

    /// Called on every gesture state change.
    fn on_transition(&mut self, e: &TransitionEvent) {
        _ = e;
    }

    /// Called when a poll loop starts or stops.
    fn on_poll_loop(&mut self, e: &PollLoopEvent) {
        _ = e;
    }

    /// Called when a step is applied to an object.
    fn on_step(&mut self, e: &StepEvent) {
        _ = e;
    }

    /// Called once at the end of every frame.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`ContactEvent`].
    #[inline]
    pub fn contact(&mut self, e: &ContactEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_contact(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SlotRejectedEvent`].
    #[inline]
    pub fn slot_rejected(&mut self, e: &SlotRejectedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_slot_rejected(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TransitionEvent`].
    #[inline]
    pub fn transition(&mut self, e: &TransitionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PollLoopEvent`].
    #[inline]
    pub fn poll_loop(&mut self, e: &PollLoopEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_poll_loop(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`StepEvent`].
    #[inline]
    pub fn step(&mut self, e: &StepEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_step(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameSummary`].
    #[inline]
    pub fn frame_summary(&mut self, s: &FrameSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_frame_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }
}

// ---------------------------------------------------------------------------
// FrameSummaryBuilder
// ---------------------------------------------------------------------------

/// Tallies one frame's activity and produces a [`FrameSummary`].
#[derive(Debug)]
pub struct FrameSummaryBuilder {
    tick: FrameTick,
    contacts: u32,
    polling: u32,
    steps: u32,
    errors: u32,
}

impl FrameSummaryBuilder {
    /// Starts a summary for the given tick.
    #[must_use]
    pub fn new(tick: &FrameTick) -> Self {
        Self {
            tick: *tick,
            contacts: 0,
            polling: 0,
            steps: 0,
            errors: 0,
        }
    }

    /// Counts one dispatched input event.
    pub fn record_contact(&mut self) {
        self.contacts = self.contacts.saturating_add(1);
    }

    /// Counts one poll loop iteration.
    pub fn record_poll(&mut self) {
        self.polling = self.polling.saturating_add(1);
    }

    /// Counts one applied step.
    pub fn record_step(&mut self) {
        self.steps = self.steps.saturating_add(1);
    }

    /// Counts one reported error.
    pub fn record_error(&mut self) {
        self.errors = self.errors.saturating_add(1);
    }

    /// Consumes the builder and produces the final [`FrameSummary`].
    #[must_use]
    pub fn finish(self) -> FrameSummary {
        FrameSummary {
            frame_index: self.tick.frame_index,
            now: self.tick.now,
            contacts: self.contacts,
            polling: self.polling,
            steps: self.steps,
            errors: self.errors,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
