// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for grasp gesture
//! diagnostics.
//!
//! This crate provides [`TraceSink`](grasp_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`timeline::export`]: writes Chrome Trace Event Format JSON from
//!   recorded bytes, with one track per object and a span per poll loop.

pub mod pretty;
pub mod recorder;
pub mod timeline;
