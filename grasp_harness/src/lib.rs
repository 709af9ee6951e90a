// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated collaborators and scripted input for exercising grasp gestures.
//!
//! The harness stands in for everything a host application would provide to
//! a [`Scene`](grasp_core::scene::Scene):
//!
//! - [`SphereWorld`]: a hit-test source made of sphere colliders on named
//!   layers. It also implements
//!   [`TransformSink`](grasp_core::sink::TransformSink), so colliders follow
//!   the poses the scene moves.
//! - [`LedgerInput`]: an input source that records every live binding and
//!   can be told to refuse specific controls.
//! - [`CollectedErrors`]: an error sink that keeps every report.
//! - [`Script`]: a builder for frame-by-frame input sequences (drags,
//!   pinches, twists).
//! - [`Simulation`]: owns all of the above plus a pinhole camera and a clock,
//!   and drives the scene one frame at a time.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod errors;
mod input;
mod script;
mod simulation;
mod world;

pub use errors::CollectedErrors;
pub use input::LedgerInput;
pub use script::Script;
pub use simulation::{Simulation, VIEWPORT};
pub use world::{Sphere, SphereWorld};
