// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture classification and pose steps.
//!
//! Each touchable object owns one [`GestureClassifier`]. Presses and releases
//! drive its state machine:
//!
//! ```text
//!            slot 0 press on object         slot 1 press
//!   Idle ─────────────────────────► Translating ─────────────► ScalingRotating
//!    ▲                                  │   ▲                        │
//!    │          slot 0 release          │   │     slot 1 release     │
//!    └──────────────────────────────────┘   └────────────────────────┘
//!    ▲                        slot 0 release                         │
//!    └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! While not idle, [`GestureClassifier::update`] runs once per frame and
//! applies at most one [`Step`]. Translating places the object at the
//! primary contact plus the captured offset. In `ScalingRotating` the rounded pinch
//! distance is compared against the previous frame: a change beyond the dead
//! zone rescales, otherwise the tangential movement of the second contact
//! around the first is checked for a rotation. Scale and rotation therefore
//! never fire in the same frame.

use kurbo::Point;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::camera::Projection;
use crate::error::GestureError;
use crate::geometry::{Quat, Vec3};
use crate::hit_test::HitTest;
use crate::tracker::TouchTracker;
use crate::transform::Pose;

/// Slot that starts and anchors every gesture.
pub const PRIMARY_SLOT: usize = 0;

/// A snapping offset shorter than this is treated as fully settled.
const SETTLED: f64 = 1e-9;

/// Slot whose press turns a drag into a pinch.
pub const SECONDARY_SLOT: usize = 1;

/// Gesture mode of one object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GestureState {
    /// Not being manipulated.
    #[default]
    Idle,
    /// Following the primary contact.
    Translating,
    /// Two contacts down; pinching rescales and twisting rotates.
    ScalingRotating,
}

impl GestureState {
    /// Whether a poll loop should be running in this state.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// A state change reported by the classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// State before.
    pub from: GestureState,
    /// State after.
    pub to: GestureState,
}

/// Sign of a rescale or rotate step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Grow, or rotate counter-clockwise on screen.
    Positive,
    /// Shrink, or rotate clockwise on screen.
    Negative,
}

impl Direction {
    /// `+1.0` or `-1.0`.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
        }
    }

    /// Classifies a rounded pixel delta against a dead zone.
    fn of(delta: f64, dead_zone: f64) -> Option<Self> {
        if delta > dead_zone {
            Some(Self::Positive)
        } else if delta < -dead_zone {
            Some(Self::Negative)
        } else {
            None
        }
    }
}

/// One pose change applied by a poll loop iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// Moved toward the primary contact.
    Translate,
    /// Uniform scale nudged by one rescale increment.
    Rescale(Direction),
    /// Rotated by one rotation increment about the configured axis.
    Rotate(Direction),
}

/// How the object follows the primary contact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TranslationMode {
    /// Keep the offset between the object and the contact captured at
    /// press time.
    #[default]
    PreserveOffset,
    /// Pull the object's origin onto the contact.
    ///
    /// The press-time offset decays by the smoothing factor every frame, so
    /// the object eases onto the contact instead of jumping while still
    /// moving rigidly with it.
    SnapToTouch,
}

/// Samples carried between `ScalingRotating` frames.
///
/// All fields are unset on entry and are seeded by the first sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PinchBaseline {
    /// Rounded pinch distance from the previous frame.
    pub previous_pinch_distance: Option<f64>,
    /// Secondary contact's screen position from the previous frame.
    pub previous_second_touch: Option<Point>,
    /// Unrounded primary-to-secondary distance from the previous frame.
    pub previous_rotation_sample_distance: Option<f64>,
}

impl PinchBaseline {
    /// A baseline with nothing sampled.
    pub const UNSET: Self = Self {
        previous_pinch_distance: None,
        previous_second_touch: None,
        previous_rotation_sample_distance: None,
    };

    /// Whether no field has been seeded.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        *self == Self::UNSET
    }

    /// Forgets every sample.
    pub fn clear(&mut self) {
        *self = Self::UNSET;
    }
}

/// Tuning for translate, rescale and rotate steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    /// Uniform scale change per rescale step.
    pub rescale_rate: f64,
    /// Rotation per rotate step, in degrees.
    pub rotation_rate_degrees: f64,
    /// Approach speed per second for the smoothing factor; infinity snaps.
    pub change_speed: f64,
    /// Local axis rotate steps turn about.
    pub rotation_axis: Vec3,
    /// How translation follows the primary contact.
    pub translation: TranslationMode,
    /// Pixel deltas with magnitude at or below this are ignored.
    pub dead_zone_px: f64,
    /// Scale components never shrink below this.
    pub min_scale: f64,
}

impl GestureConfig {
    /// Smoothed steps with a one-pixel dead zone.
    pub const DEFAULT: Self = Self {
        rescale_rate: 0.05,
        rotation_rate_degrees: 5.0,
        change_speed: 10.0,
        rotation_axis: Vec3::Y,
        translation: TranslationMode::PreserveOffset,
        dead_zone_px: 1.0,
        min_scale: 0.05,
    };

    /// Like [`DEFAULT`](Self::DEFAULT) but every step lands in one frame.
    pub const INSTANT: Self = Self {
        change_speed: f64::INFINITY,
        ..Self::DEFAULT
    };

    /// Returns this configuration with a different translation mode.
    #[must_use]
    pub const fn with_translation(mut self, translation: TranslationMode) -> Self {
        self.translation = translation;
        self
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Per-frame interpolation factor `clamp(elapsed * change_speed, 0, 1)`.
///
/// An infinite `change_speed` always yields `1.0`; a `NaN` product yields
/// `0.0`.
#[must_use]
pub fn smoothing_factor(elapsed_secs: f64, change_speed: f64) -> f64 {
    if change_speed == f64::INFINITY {
        return 1.0;
    }
    let f = elapsed_secs * change_speed;
    if f.is_nan() { 0.0 } else { f.clamp(0.0, 1.0) }
}

/// Nudges the uniform scale by one rescale increment, smoothed by `factor`.
#[must_use]
pub fn rescale(pose: &Pose, direction: Direction, config: &GestureConfig, factor: f64) -> Pose {
    let delta = config.rescale_rate * direction.sign();
    let floor = |v: f64| (v + delta).max(config.min_scale);
    let target = Vec3::new(floor(pose.scale.x), floor(pose.scale.y), floor(pose.scale.z));
    Pose {
        scale: pose.scale.slerp(target, factor),
        ..*pose
    }
}

/// Turns the pose by one rotation increment about the configured local
/// axis, smoothed by `factor`.
#[must_use]
pub fn rotate(pose: &Pose, direction: Direction, config: &GestureConfig, factor: f64) -> Pose {
    let angle = config.rotation_rate_degrees.to_radians() * direction.sign();
    let target = pose.rotation * Quat::from_axis_angle(config.rotation_axis, angle);
    Pose {
        rotation: pose.rotation.slerp(target, factor),
        ..*pose
    }
}

/// The gesture state machine for one object.
#[derive(Clone, Debug)]
pub struct GestureClassifier {
    config: GestureConfig,
    state: GestureState,
    baseline: PinchBaseline,
    offset: Vec3,
}

impl GestureClassifier {
    /// Creates an idle classifier.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            state: GestureState::Idle,
            baseline: PinchBaseline::UNSET,
            offset: Vec3::ZERO,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Pinch and rotation samples.
    #[must_use]
    pub fn baseline(&self) -> &PinchBaseline {
        &self.baseline
    }

    /// Offset added to the primary contact while translating.
    #[must_use]
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// The tuning in effect.
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Reacts to a press on `slot`.
    ///
    /// A primary press starts translating only if it lands on the object; a
    /// secondary press while translating starts a pinch. On error the state
    /// is unchanged.
    pub fn on_press(
        &mut self,
        slot: usize,
        tracker: &TouchTracker,
        camera: &dyn Projection,
        physics: &dyn HitTest,
        pose: &Pose,
    ) -> Result<Option<Transition>, GestureError> {
        match (slot, self.state) {
            (PRIMARY_SLOT, GestureState::Idle) if tracker.is_touched(slot, camera, physics) => {
                self.offset = self.capture_offset(tracker, pose)?;
                Ok(Some(self.enter(GestureState::Translating)))
            }
            (SECONDARY_SLOT, GestureState::Translating) => {
                self.baseline.clear();
                Ok(Some(self.enter(GestureState::ScalingRotating)))
            }
            _ => Ok(None),
        }
    }

    /// Reacts to a release on `slot`.
    ///
    /// Releasing the primary contact always ends the gesture. Releasing the
    /// secondary contact during a pinch drops back to translating with a
    /// freshly captured offset.
    pub fn on_release(
        &mut self,
        slot: usize,
        tracker: &TouchTracker,
        pose: &Pose,
    ) -> Result<Option<Transition>, GestureError> {
        match (slot, self.state) {
            (PRIMARY_SLOT, GestureState::Translating | GestureState::ScalingRotating) => {
                Ok(self.halt())
            }
            (SECONDARY_SLOT, GestureState::ScalingRotating) => {
                self.offset = self.capture_offset(tracker, pose)?;
                self.baseline.clear();
                Ok(Some(self.enter(GestureState::Translating)))
            }
            _ => Ok(None),
        }
    }

    /// Forces the classifier back to `Idle`, clearing all gesture samples.
    ///
    /// Returns the transition, or `None` if already idle.
    pub fn halt(&mut self) -> Option<Transition> {
        if self.state == GestureState::Idle {
            return None;
        }
        self.baseline.clear();
        self.offset = Vec3::ZERO;
        Some(self.enter(GestureState::Idle))
    }

    /// Runs one poll loop iteration and applies at most one step to `pose`.
    ///
    /// If the resulting pose would not be finite, `pose` is left untouched
    /// and [`GestureError::NonFinitePose`] is returned; the baseline still
    /// advances so the next frame diffs against fresh samples.
    pub fn update(
        &mut self,
        elapsed_secs: f64,
        tracker: &TouchTracker,
        pose: &mut Pose,
    ) -> Result<Option<Step>, GestureError> {
        let factor = smoothing_factor(elapsed_secs, self.config.change_speed);
        let (next, step) = match self.state {
            GestureState::Idle => return Ok(None),
            GestureState::Translating => {
                let Some(primary) = tracker.slot(PRIMARY_SLOT) else {
                    return Ok(None);
                };
                if self.config.translation == TranslationMode::SnapToTouch {
                    self.offset = self.offset.lerp(Vec3::ZERO, factor);
                    if self.offset.length() < SETTLED {
                        self.offset = Vec3::ZERO;
                    }
                }
                let target = primary.world_position + self.offset;
                if target == pose.position {
                    return Ok(None);
                }
                let next = Pose {
                    position: target,
                    ..*pose
                };
                (next, Step::Translate)
            }
            GestureState::ScalingRotating => {
                let (Some(primary), Some(secondary)) =
                    (tracker.slot(PRIMARY_SLOT), tracker.slot(SECONDARY_SLOT))
                else {
                    return Ok(None);
                };
                let Some(step) = self.sample_pinch(primary.screen_position, secondary.screen_position)
                else {
                    return Ok(None);
                };
                let next = match step {
                    Step::Rescale(d) => rescale(pose, d, &self.config, factor),
                    Step::Rotate(d) => rotate(pose, d, &self.config, factor),
                    Step::Translate => *pose,
                };
                (next, step)
            }
        };
        if !next.is_finite() {
            return Err(GestureError::NonFinitePose);
        }
        *pose = next;
        Ok(Some(step))
    }

    /// Diffs this frame's contacts against the baseline, then re-seeds it.
    fn sample_pinch(&mut self, primary: Point, secondary: Point) -> Option<Step> {
        let dead_zone = self.config.dead_zone_px;
        let radius = secondary - primary;
        let distance = radius.length();
        let rounded = distance.round();

        let step = self.baseline.previous_pinch_distance.and_then(|previous| {
            if let Some(d) = Direction::of(rounded - previous, dead_zone) {
                return Some(Step::Rescale(d));
            }
            let (Some(prev_second), Some(prev_distance)) = (
                self.baseline.previous_second_touch,
                self.baseline.previous_rotation_sample_distance,
            ) else {
                return None;
            };
            if prev_distance <= 0.0 {
                return None;
            }
            let tangential = ((prev_second - primary).cross(radius) / prev_distance).round();
            Direction::of(tangential, dead_zone).map(Step::Rotate)
        });

        self.baseline = PinchBaseline {
            previous_pinch_distance: Some(rounded),
            previous_second_touch: Some(secondary),
            previous_rotation_sample_distance: Some(distance),
        };
        step
    }

    fn capture_offset(&self, tracker: &TouchTracker, pose: &Pose) -> Result<Vec3, GestureError> {
        let world = tracker.world_position(PRIMARY_SLOT)?;
        Ok(pose.position - world)
    }

    fn enter(&mut self, to: GestureState) -> Transition {
        let from = core::mem::replace(&mut self.state, to);
        Transition { from, to }
    }
}
