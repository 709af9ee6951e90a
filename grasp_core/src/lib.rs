// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch tracking and multi-touch gesture classification.
//!
//! `grasp_core` turns raw pointer and touchscreen events into translate,
//! pinch-to-scale and twist-to-rotate manipulations of scene objects. It is
//! `no_std` compatible (with `alloc`) and owns no platform state: cameras,
//! physics, input devices and presentation are reached through small traits
//! that host applications implement.
//!
//! # Architecture
//!
//! Each frame runs through the [`Scene`](scene::Scene):
//!
//! ```text
//!   InputEvent[] ──► Touchable::handle_input() ──► TouchTracker (slot table)
//!                            │                           │
//!                            ▼                           ▼
//!                   GestureClassifier  ◄──── is_touched() via HitTest
//!                            │
//!   FrameTick ──► poll loops ┘──► Pose mutation ──► dirty channels
//!                                                       │
//!                 ┌─────────────────────────────────────┘
//!                 ▼
//!   FrameChanges ──► TransformSink::apply()
//! ```
//!
//! Input events are always dispatched before the per-frame poll, so the
//! classifier reads fresh slot data.
//!
//! **[`tracker`]**: Per-slot screen and world positions, plus hit testing
//! against the owning object's collider through a layer precedence list.
//!
//! **[`gesture`]**: The `Idle` / `Translating` / `ScalingRotating` state
//! machine and the smoothed rescale and rotate steps.
//!
//! **[`touchable`]**: One manipulable object: tracker, classifier, pose and
//! its cooperative poll loop.
//!
//! **[`scene`]**: Generational object store, frame driver and change
//! reporting.
//!
//! **[`camera`]**, **[`hit_test`]**, **[`input`]**, **[`sink`]**: The
//! collaborator traits for projection, raycasting, input binding and
//! presentation.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and zero-overhead
//! [`Tracer`](trace::Tracer) wrapper for gesture diagnostics.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod camera;
pub mod dirty;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod id;
pub mod input;
pub mod scene;
pub mod sink;
pub mod time;
pub mod touchable;
pub mod trace;
pub mod tracker;
pub mod transform;
