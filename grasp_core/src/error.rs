// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy and the error-reporting seam.
//!
//! Gesture handling never crashes the frame. Failures are returned as
//! [`GestureError`] from fallible constructors and are caught at the
//! boundary of each scene entry point, which forwards them to the host's
//! [`ErrorSink`] together with a short user-facing message:
//!
//! - **Initialization** (`MissingCamera`, `MissingCollider`,
//!   `UnknownCollider`, `InvalidSlotCount`, `BindingUnavailable`): the
//!   object is kept but never becomes interactive.
//! - **Transition** (`NonFiniteProjection`): the gesture in progress is
//!   halted and the object returns to idle.
//! - **Computation** (`NonFinitePose`): the frame's pose update is
//!   discarded and the poll loop keeps running.
//! - **Placement** (`OutOfView`): a spawn request is refused.

use crate::hit_test::ColliderId;
use crate::input::Binding;

/// Everything that can go wrong while tracking and manipulating an object.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GestureError {
    /// No camera is available to project touches.
    #[error("no camera is available for touch projection")]
    MissingCamera,
    /// The object was configured without a collision proxy.
    #[error("touchable object has no collision proxy")]
    MissingCollider,
    /// The collision proxy is not known to the hit-test source.
    #[error("collider {0:?} is not registered with the hit-test source")]
    UnknownCollider(ColliderId),
    /// The configured slot count is outside `1..=MAX_SLOTS`.
    #[error("slot count {0} is outside 1..={max}", max = crate::tracker::MAX_SLOTS)]
    InvalidSlotCount(u8),
    /// The input source refused to enable a binding.
    #[error("input binding {0:?} could not be enabled")]
    BindingUnavailable(Binding),
    /// A slot's screen position projected to a non-finite world position.
    #[error("slot {slot} projected to a non-finite world position")]
    NonFiniteProjection {
        /// The slot whose projection failed.
        slot: usize,
    },
    /// A gesture step produced a non-finite pose.
    #[error("gesture step produced a non-finite pose")]
    NonFinitePose,
    /// The requested spawn position is outside the camera's view.
    #[error("spawn position is outside the camera view")]
    OutOfView,
}

impl GestureError {
    /// Whether this error leaves an object permanently non-interactive.
    #[must_use]
    pub const fn is_initialization(&self) -> bool {
        matches!(
            self,
            Self::MissingCamera
                | Self::MissingCollider
                | Self::UnknownCollider(_)
                | Self::InvalidSlotCount(_)
                | Self::BindingUnavailable(_)
        )
    }
}

/// Receives non-fatal errors for reporting (logs, toasts, telemetry).
///
/// The gesture core never owns the reporting policy; it only hands over a
/// user-facing message and the underlying error.
pub trait ErrorSink {
    /// Reports one error occurrence.
    fn report(&mut self, message: &str, error: &GestureError);
}

/// An [`ErrorSink`] that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct IgnoreErrors;

impl ErrorSink for IgnoreErrors {
    fn report(&mut self, message: &str, error: &GestureError) {
        _ = (message, error);
    }
}
