// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One manipulable object: contact tracker, gesture classifier, pose and
//! poll loop.
//!
//! A [`Touchable`] is created inert and becomes interactive once
//! [`start`](Touchable::start) succeeds. The poll loop models a cooperative
//! per-frame task: it is scheduled when the classifier leaves `Idle` and
//! halted the moment it returns there, so no iteration ever runs against a
//! finished gesture.

use alloc::string::String;
use alloc::vec::Vec;

use crate::camera::Projection;
use crate::error::GestureError;
use crate::gesture::{GestureClassifier, GestureConfig, GestureState, PRIMARY_SLOT, Step};
use crate::hit_test::{ColliderId, HitTest, HitTestConfig, LayerName};
use crate::input::{InputEvent, InputSource, InputValue};
use crate::tracker::{TouchTracker, TrackerConfig};
use crate::trace::PollLoopPhase;
use crate::transform::Pose;

/// Everything needed to create one touchable object.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchableConfig {
    /// Collision proxy hit tests must report for this object.
    pub collider: Option<ColliderId>,
    /// Requested collision layer; empty selects the default layer.
    pub layer: String,
    /// Explicit layer precedence; empty derives it from `layer`.
    pub precedence: Vec<LayerName>,
    /// Initial pose.
    pub pose: Pose,
    /// Slot table size.
    pub tracker: TrackerConfig,
    /// Step tuning.
    pub gesture: GestureConfig,
}

impl TouchableConfig {
    /// An object on the default layer with default tuning.
    #[must_use]
    pub fn new(collider: ColliderId, pose: Pose) -> Self {
        Self {
            collider: Some(collider),
            layer: String::new(),
            precedence: Vec::new(),
            pose,
            tracker: TrackerConfig::default(),
            gesture: GestureConfig::default(),
        }
    }

    /// Requests a collision layer.
    #[must_use]
    pub fn with_layer(mut self, layer: &str) -> Self {
        self.layer = String::from(layer);
        self
    }

    /// Sets an explicit layer precedence.
    #[must_use]
    pub fn with_precedence(mut self, precedence: Vec<LayerName>) -> Self {
        self.precedence = precedence;
        self
    }

    /// Sets the step tuning.
    #[must_use]
    pub fn with_gesture(mut self, gesture: GestureConfig) -> Self {
        self.gesture = gesture;
        self
    }

    /// Sets the slot table size.
    #[must_use]
    pub fn with_tracker(mut self, tracker: TrackerConfig) -> Self {
        self.tracker = tracker;
        self
    }
}

/// The per-frame task that runs [`GestureClassifier::update`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PollLoop {
    active: bool,
    iterations: u64,
}

impl PollLoop {
    /// Whether the loop is scheduled.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Iterations run since the loop last started.
    #[must_use]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }
}

/// What one input event did to an object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputOutcome {
    /// The event named a slot inside the object's table.
    pub accepted: bool,
    /// A primary press landed on the object.
    pub touched: bool,
}

/// One tracked, manipulable object.
#[derive(Debug)]
pub struct Touchable {
    tracker: Option<TouchTracker>,
    classifier: GestureClassifier,
    pose: Pose,
    collider: Option<ColliderId>,
    poll: PollLoop,
}

impl Touchable {
    /// Creates an inert object at the configured pose.
    #[must_use]
    pub fn new(config: &TouchableConfig) -> Self {
        Self {
            tracker: None,
            classifier: GestureClassifier::new(config.gesture),
            pose: config.pose,
            collider: config.collider,
            poll: PollLoop::default(),
        }
    }

    /// Makes the object interactive.
    ///
    /// Requires a camera and a collider known to `physics`. The contact depth
    /// is captured here from the object's current position and never changes
    /// afterwards. On error the object stays inert.
    pub fn start(
        &mut self,
        config: &TouchableConfig,
        camera: Option<&dyn Projection>,
        physics: &dyn HitTest,
        input: &mut dyn InputSource,
    ) -> Result<(), GestureError> {
        let camera = camera.ok_or(GestureError::MissingCamera)?;
        let collider = config.collider.ok_or(GestureError::MissingCollider)?;
        let hit_test =
            HitTestConfig::resolve(&config.layer, config.precedence.clone(), collider, physics)?;
        let depth = camera.world_to_screen(self.pose.position).z;
        let tracker = TouchTracker::start(config.tracker, collider, hit_test, depth, input)?;
        self.tracker = Some(tracker);
        Ok(())
    }

    /// Routes one input event through the tracker and classifier.
    ///
    /// Inert objects ignore every event. If a press or release fails to
    /// project, the gesture is halted before the error is returned.
    pub fn handle_input(
        &mut self,
        event: &InputEvent,
        camera: &dyn Projection,
        physics: &dyn HitTest,
    ) -> Result<InputOutcome, GestureError> {
        let Some(tracker) = self.tracker.as_mut() else {
            return Ok(InputOutcome::default());
        };
        let slot = event.binding.slot();
        let mut outcome = InputOutcome::default();
        let result = match event.value {
            InputValue::Position(at) => {
                outcome.accepted = tracker.register_contact_move(slot, at, camera);
                Ok(None)
            }
            InputValue::Pressed => {
                outcome.accepted = tracker.set_pressed(slot, true);
                if !outcome.accepted {
                    return Ok(outcome);
                }
                if slot == PRIMARY_SLOT {
                    outcome.touched = tracker.is_touched(slot, camera, physics);
                }
                self.classifier
                    .on_press(slot, tracker, camera, physics, &self.pose)
            }
            InputValue::Released => return self.handle_release(slot),
        };
        match result {
            Ok(_) => Ok(outcome),
            Err(err) => {
                self.classifier.halt();
                Err(err)
            }
        }
    }

    /// Routes a release of `slot`.
    ///
    /// Releases never need the camera, so hosts that lost theirs can still
    /// end gestures through this.
    pub fn handle_release(&mut self, slot: usize) -> Result<InputOutcome, GestureError> {
        let Some(tracker) = self.tracker.as_mut() else {
            return Ok(InputOutcome::default());
        };
        let outcome = InputOutcome {
            accepted: tracker.set_pressed(slot, false),
            ..InputOutcome::default()
        };
        if !outcome.accepted {
            return Ok(outcome);
        }
        match self.classifier.on_release(slot, tracker, &self.pose) {
            Ok(_) => Ok(outcome),
            Err(err) => {
                self.classifier.halt();
                Err(err)
            }
        }
    }

    /// Starts or stops the poll loop to match the gesture state.
    pub fn sync_poll_loop(&mut self) -> Option<PollLoopPhase> {
        match (self.classifier.state().is_active(), self.poll.active) {
            (true, false) => {
                self.poll = PollLoop {
                    active: true,
                    iterations: 0,
                };
                Some(PollLoopPhase::Started)
            }
            (false, true) => {
                self.poll.active = false;
                Some(PollLoopPhase::Stopped)
            }
            _ => None,
        }
    }

    /// Runs one poll loop iteration if the loop is scheduled.
    pub fn poll(&mut self, elapsed_secs: f64) -> Result<Option<Step>, GestureError> {
        let Some(tracker) = self.tracker.as_ref() else {
            return Ok(None);
        };
        if !self.poll.active {
            return Ok(None);
        }
        self.poll.iterations += 1;
        self.classifier.update(elapsed_secs, tracker, &mut self.pose)
    }

    /// Ends any gesture and releases every input binding.
    pub fn stop(&mut self, input: &mut dyn InputSource) {
        self.classifier.halt();
        self.poll.active = false;
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.stop(input);
        }
    }

    /// Current pose.
    #[must_use]
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Current gesture state.
    #[must_use]
    pub fn state(&self) -> GestureState {
        self.classifier.state()
    }

    /// The poll loop.
    #[must_use]
    pub fn poll_loop(&self) -> &PollLoop {
        &self.poll
    }

    /// The configured collision proxy.
    #[must_use]
    pub fn collider(&self) -> Option<ColliderId> {
        self.collider
    }

    /// Whether [`start`](Self::start) succeeded.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.tracker.is_some()
    }

    /// The contact tracker, once started.
    #[must_use]
    pub fn tracker(&self) -> Option<&TouchTracker> {
        self.tracker.as_ref()
    }

    /// The gesture classifier.
    #[must_use]
    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size};

    use super::*;
    use crate::camera::PinholeCamera;
    use crate::geometry::{Ray, Vec3};
    use crate::hit_test::DEFAULT_LAYER;
    use crate::input::{Binding, BindingHandle};

    struct Board;

    impl HitTest for Board {
        fn raycast(&self, _ray: &Ray, layer: &str) -> Option<ColliderId> {
            (layer == DEFAULT_LAYER).then_some(ColliderId(3))
        }

        fn has_layer(&self, layer: &str) -> bool {
            layer == DEFAULT_LAYER
        }

        fn layer_of(&self, collider: ColliderId) -> Option<LayerName> {
            (collider == ColliderId(3)).then(|| LayerName::new(DEFAULT_LAYER))
        }
    }

    #[derive(Default)]
    struct Live(Vec<BindingHandle>, u64);

    impl InputSource for Live {
        fn bind(&mut self, _binding: Binding) -> Result<BindingHandle, GestureError> {
            self.1 += 1;
            self.0.push(BindingHandle(self.1));
            Ok(BindingHandle(self.1))
        }

        fn unbind(&mut self, handle: BindingHandle) {
            self.0.retain(|h| *h != handle);
        }
    }

    fn camera() -> PinholeCamera {
        PinholeCamera::new(90.0, Size::new(1000.0, 1000.0))
    }

    fn config() -> TouchableConfig {
        TouchableConfig::new(ColliderId(3), Pose::at(Vec3::new(0.0, 0.0, 4.0)))
    }

    #[test]
    fn start_captures_depth() {
        let mut t = Touchable::new(&config());
        let mut input = Live::default();
        t.start(&config(), Some(&camera()), &Board, &mut input).unwrap();
        assert!(t.is_interactive());
        assert!((t.tracker().unwrap().depth() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn start_requires_camera_and_collider() {
        let mut input = Live::default();
        let mut t = Touchable::new(&config());
        assert_eq!(
            t.start(&config(), None, &Board, &mut input),
            Err(GestureError::MissingCamera)
        );
        let orphan = TouchableConfig {
            collider: None,
            ..config()
        };
        assert_eq!(
            t.start(&orphan, Some(&camera()), &Board, &mut input),
            Err(GestureError::MissingCollider)
        );
        let stranger = TouchableConfig::new(ColliderId(8), Pose::IDENTITY);
        assert_eq!(
            t.start(&stranger, Some(&camera()), &Board, &mut input),
            Err(GestureError::UnknownCollider(ColliderId(8)))
        );
        assert!(!t.is_interactive());
        assert!(input.0.is_empty());
    }

    #[test]
    fn inert_object_ignores_input() {
        let mut t = Touchable::new(&config());
        let outcome = t
            .handle_input(&InputEvent::touch_pressed(0), &camera(), &Board)
            .unwrap();
        assert_eq!(outcome, InputOutcome::default());
        assert_eq!(t.sync_poll_loop(), None);
    }

    #[test]
    fn poll_loop_follows_state() {
        let cam = camera();
        let mut t = Touchable::new(&config());
        let mut input = Live::default();
        t.start(&config(), Some(&cam), &Board, &mut input).unwrap();

        t.handle_input(&InputEvent::touch_moved(0, Point::new(500.0, 500.0)), &cam, &Board)
            .unwrap();
        let outcome = t
            .handle_input(&InputEvent::touch_pressed(0), &cam, &Board)
            .unwrap();
        assert!(outcome.touched);
        assert_eq!(t.sync_poll_loop(), Some(PollLoopPhase::Started));
        assert_eq!(t.sync_poll_loop(), None);

        t.poll(1.0 / 60.0).unwrap();
        t.poll(1.0 / 60.0).unwrap();
        assert_eq!(t.poll_loop().iterations(), 2);

        t.handle_input(&InputEvent::touch_released(0), &cam, &Board)
            .unwrap();
        assert_eq!(t.sync_poll_loop(), Some(PollLoopPhase::Stopped));
        t.poll(1.0 / 60.0).unwrap();
        assert_eq!(t.poll_loop().iterations(), 2, "halted loop never runs");

        t.stop(&mut input);
        assert!(input.0.is_empty());
    }

    #[test]
    fn out_of_range_slot_is_not_accepted() {
        let cam = camera();
        let mut t = Touchable::new(&config());
        t.start(&config(), Some(&cam), &Board, &mut Live::default())
            .unwrap();
        let outcome = t
            .handle_input(&InputEvent::touch_moved(5, Point::new(1.0, 1.0)), &cam, &Board)
            .unwrap();
        assert!(!outcome.accepted);
    }

    #[test]
    fn rejected_secondary_press_does_not_pinch() {
        let cam = camera();
        let single = config().with_tracker(TrackerConfig::SINGLE_TOUCH);
        let mut t = Touchable::new(&single);
        t.start(&single, Some(&cam), &Board, &mut Live::default())
            .unwrap();
        t.handle_input(&InputEvent::touch_moved(0, Point::new(500.0, 500.0)), &cam, &Board)
            .unwrap();
        t.handle_input(&InputEvent::touch_pressed(0), &cam, &Board)
            .unwrap();
        let outcome = t
            .handle_input(&InputEvent::touch_pressed(1), &cam, &Board)
            .unwrap();
        assert!(!outcome.accepted);
        assert_eq!(t.state(), GestureState::Translating);
    }
}
