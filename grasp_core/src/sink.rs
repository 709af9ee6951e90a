// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation contract for host integrations.
//!
//! `grasp_core` owns poses but never draws them. After each
//! [`Scene::frame`](crate::scene::Scene::frame) the host hands the returned
//! [`FrameChanges`] to its [`TransformSink`], which pushes updated poses into
//! whatever actually renders the objects (an engine transform, a scene-graph
//! node, a physics proxy).
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_frame(tick: FrameTick, events: &[InputEvent]) {
//!     let mut ctx = SceneContext::new(Some(&camera), &physics, &mut input, &mut errors);
//!
//!     // Dispatch input, then run every active poll loop.
//!     let changes = scene.frame(&tick, events, &mut ctx);
//!
//!     // Present: copy changed poses into the host's transforms.
//!     sink.apply(&scene, &changes);
//! }
//! ```

use crate::scene::{FrameChanges, Scene};

/// Receives the poses a frame changed.
///
/// Implementations read current values from `scene` using the raw indices in
/// `changes` (see [`Scene::pose_at`]).
pub trait TransformSink {
    /// Applies the given [`FrameChanges`] to the host's transforms.
    fn apply(&mut self, scene: &Scene, changes: &FrameChanges);
}
