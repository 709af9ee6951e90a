// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The [`Scene`](crate::scene::Scene) marks objects in these channels (via
//! [`understory_dirty`]) as gestures mutate them, and drains every channel
//! once per frame into [`FrameChanges`](crate::scene::FrameChanges). Objects
//! do not depend on one another, so every channel is local-only: marking an
//! object never marks anything else.

use understory_dirty::Channel;

/// Position, rotation or scale changed.
pub const POSE: Channel = Channel::new(0);

/// Gesture state changed (e.g. `Idle` → `Translating`).
pub const GESTURE: Channel = Channel::new(1);
