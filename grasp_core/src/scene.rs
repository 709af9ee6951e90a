// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Object storage and the per-frame driver.
//!
//! A [`Scene`] owns every [`Touchable`] behind a generational [`ObjectId`].
//! Each call to [`Scene::frame`] runs three phases in a fixed order:
//!
//! 1. **Dispatch**: every input event is routed to every interactive
//!    object, updating slot tables and driving gesture transitions. Poll
//!    loops are started or halted to match the resulting state. In a frame
//!    without a camera only releases are routed.
//! 2. **Poll**: every scheduled poll loop runs one iteration, applying at
//!    most one step per object.
//! 3. **Drain**: the `POSE` and `GESTURE` dirty channels are drained into
//!    [`FrameChanges`] for the host's
//!    [`TransformSink`](crate::sink::TransformSink).
//!
//! Dispatch always precedes polling, so a poll iteration sees the slot data
//! delivered in the same frame, and a release delivered in a frame stops the
//! loop before it can iterate again.
//!
//! Errors never escape `frame`: each one is reported to the context's
//! [`ErrorSink`] where it occurs.
//!
//! [`FrameChanges`] uses raw slot indices (`u32`) rather than [`ObjectId`]
//! handles so that sinks can read poses through [`Scene::pose_at`] without a
//! generation check per access.

use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker};

use crate::camera::{DEFAULT_VIEW_MARGIN, Projection};
use crate::dirty;
use crate::error::{ErrorSink, GestureError};
use crate::gesture::{GestureState, Step};
use crate::hit_test::{ColliderId, HitTest};
use crate::id::ObjectId;
use crate::input::{InputEvent, InputSource, InputValue};
use crate::time::{Duration, FrameTick, HostTime, Timebase};
use crate::touchable::{Touchable, TouchableConfig};
use crate::trace::{
    ContactEvent, ContactKind, FrameSummaryBuilder, PollLoopEvent, SlotRejectedEvent, StepEvent,
    Tracer, TransitionEvent,
};
use crate::transform::Pose;

const INIT_FAILED: &str = "touchable object could not be made interactive";
const GESTURE_HALTED: &str = "gesture halted after a failed transition";
const UPDATE_DISCARDED: &str = "gesture update discarded for this frame";
const SPAWN_REFUSED: &str = "object was not spawned";
const NO_CAMERA: &str = "contacts ignored without a camera; releases still apply";

/// Frame timing configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneConfig {
    /// Converts [`HostTime`] ticks to nanoseconds.
    pub timebase: Timebase,
    /// Elapsed time assumed for the first frame, before any tick spacing is
    /// known.
    pub nominal_frame: Duration,
}

impl SceneConfig {
    /// Nanosecond ticks at 60 Hz.
    pub const SIXTY_HZ: Self = Self::new(Timebase::NANOS, Duration(16_666_667));

    /// Creates a configuration.
    #[must_use]
    pub const fn new(timebase: Timebase, nominal_frame: Duration) -> Self {
        Self {
            timebase,
            nominal_frame,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::SIXTY_HZ
    }
}

/// The host collaborators a scene needs while spawning and running frames.
pub struct SceneContext<'a> {
    /// Projects touches; `None` while no camera is available.
    pub camera: Option<&'a dyn Projection>,
    /// Answers raycasts.
    pub physics: &'a dyn HitTest,
    /// Enables and releases input bindings.
    pub input: &'a mut dyn InputSource,
    /// Receives every non-fatal error.
    pub errors: &'a mut dyn ErrorSink,
    /// Diagnostics.
    pub tracer: Tracer<'a>,
}

impl core::fmt::Debug for SceneContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SceneContext")
            .field("has_camera", &self.camera.is_some())
            .finish_non_exhaustive()
    }
}

impl<'a> SceneContext<'a> {
    /// Creates a context that traces nothing.
    #[must_use]
    pub fn new(
        camera: Option<&'a dyn Projection>,
        physics: &'a dyn HitTest,
        input: &'a mut dyn InputSource,
        errors: &'a mut dyn ErrorSink,
    ) -> Self {
        Self {
            camera,
            physics,
            input,
            errors,
            tracer: Tracer::none(),
        }
    }

    /// Routes diagnostics to `tracer`.
    #[must_use]
    pub fn with_tracer(mut self, tracer: Tracer<'a>) -> Self {
        self.tracer = tracer;
        self
    }
}

/// The set of changes produced by a single [`Scene::frame`] call.
///
/// Each list holds raw slot indices, in ascending order unless noted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameChanges {
    /// Objects whose pose changed.
    pub poses: Vec<u32>,
    /// Objects whose gesture state changed.
    pub gestures: Vec<u32>,
    /// Objects a primary press landed on, in dispatch order.
    pub touched: Vec<u32>,
    /// Steps applied this frame, in poll order.
    pub steps: Vec<(u32, Step)>,
    /// Objects spawned since the last frame.
    pub added: Vec<u32>,
    /// Objects despawned since the last frame.
    pub removed: Vec<u32>,
}

impl FrameChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.poses.clear();
        self.gestures.clear();
        self.touched.clear();
        self.steps.clear();
        self.added.clear();
        self.removed.clear();
    }

    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
            && self.gestures.is_empty()
            && self.touched.is_empty()
            && self.steps.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
    }
}

/// Generational storage for touchable objects plus the frame driver.
#[derive(Debug)]
pub struct Scene {
    config: SceneConfig,
    objects: Vec<Option<Touchable>>,
    generation: Vec<u32>,
    free_list: Vec<u32>,
    dirty: DirtyTracker<u32>,
    pending_added: Vec<u32>,
    pending_removed: Vec<u32>,
    last_tick: Option<HostTime>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            objects: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
            last_tick: None,
        }
    }

    // -- Lifecycle API --

    /// Adds an object and tries to make it interactive.
    ///
    /// Initialization failures are reported to the error sink; the object is
    /// still stored, keeps its pose, and simply never reacts to input.
    pub fn spawn(&mut self, config: &TouchableConfig, ctx: &mut SceneContext<'_>) -> ObjectId {
        let mut touchable = Touchable::new(config);
        if let Err(err) = touchable.start(config, ctx.camera, ctx.physics, ctx.input) {
            ctx.errors.report(INIT_FAILED, &err);
        }
        self.insert(touchable)
    }

    /// Like [`spawn`](Self::spawn), but refuses positions outside the
    /// camera's central viewport region.
    ///
    /// Refusals are reported to the error sink and returned.
    pub fn spawn_in_view(
        &mut self,
        config: &TouchableConfig,
        ctx: &mut SceneContext<'_>,
    ) -> Result<ObjectId, GestureError> {
        let placement = match ctx.camera {
            None => Err(GestureError::MissingCamera),
            Some(camera) if !camera.is_in_view(config.pose.position, DEFAULT_VIEW_MARGIN) => {
                Err(GestureError::OutOfView)
            }
            Some(_) => Ok(()),
        };
        match placement {
            Ok(()) => Ok(self.spawn(config, ctx)),
            Err(err) => {
                ctx.errors.report(SPAWN_REFUSED, &err);
                Err(err)
            }
        }
    }

    /// Removes an object, ending its gesture and releasing its bindings.
    ///
    /// Returns `false` for stale handles.
    pub fn despawn(&mut self, id: ObjectId, input: &mut dyn InputSource) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let idx = id.idx;
        if let Some(mut touchable) = self.objects[idx as usize].take() {
            touchable.stop(input);
        }
        self.dirty.remove_key(idx);
        self.generation[idx as usize] = self.generation[idx as usize].wrapping_add(1);
        self.free_list.push(idx);
        self.pending_removed.push(idx);
        true
    }

    /// Returns whether the given handle refers to a live object.
    #[must_use]
    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.generation.get(id.idx as usize) == Some(&id.generation)
            && self.objects[id.idx as usize].is_some()
    }

    // -- Frame API --

    /// Runs one frame and returns what changed.
    pub fn frame(
        &mut self,
        tick: &FrameTick,
        events: &[InputEvent],
        ctx: &mut SceneContext<'_>,
    ) -> FrameChanges {
        let mut changes = FrameChanges::default();
        self.frame_into(tick, events, ctx, &mut changes);
        changes
    }

    /// Like [`frame`](Self::frame), reusing the buffers in `changes`.
    pub fn frame_into(
        &mut self,
        tick: &FrameTick,
        events: &[InputEvent],
        ctx: &mut SceneContext<'_>,
        changes: &mut FrameChanges,
    ) {
        changes.clear();
        let elapsed = match self.last_tick {
            Some(prev) => tick.now.saturating_duration_since(prev),
            None => self.config.nominal_frame,
        };
        self.last_tick = Some(tick.now);
        let elapsed_secs = elapsed.as_secs_f64(self.config.timebase);
        let mut summary = FrameSummaryBuilder::new(tick);

        self.dispatch(tick, events, ctx, changes, &mut summary);
        self.poll(tick, elapsed_secs, ctx, changes, &mut summary);

        changes.poses = self
            .dirty
            .drain(dirty::POSE)
            .deterministic()
            .run()
            .collect();
        changes.gestures = self
            .dirty
            .drain(dirty::GESTURE)
            .deterministic()
            .run()
            .collect();
        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);

        ctx.tracer.frame_summary(&summary.finish());
    }

    fn dispatch(
        &mut self,
        tick: &FrameTick,
        events: &[InputEvent],
        ctx: &mut SceneContext<'_>,
        changes: &mut FrameChanges,
        summary: &mut FrameSummaryBuilder,
    ) {
        if events.is_empty() {
            return;
        }
        let camera = ctx.camera;
        if camera.is_none() && self.objects.iter().flatten().any(Touchable::is_interactive) {
            ctx.errors.report(NO_CAMERA, &GestureError::MissingCamera);
            summary.record_error();
        }
        for event in events {
            for (idx, slot) in (0_u32..).zip(self.objects.iter_mut()) {
                let Some(touchable) = slot.as_mut().filter(|t| t.is_interactive()) else {
                    continue;
                };
                let before = touchable.state();
                // Without a camera only releases get through, so gestures
                // can still end.
                let result = match (camera, event.value) {
                    (Some(camera), _) => touchable.handle_input(event, camera, ctx.physics),
                    (None, InputValue::Released) => {
                        touchable.handle_release(event.binding.slot())
                    }
                    (None, _) => continue,
                };
                match result {
                    Ok(outcome) if outcome.accepted => {
                        summary.record_contact();
                        ctx.tracer.contact(&ContactEvent {
                            frame_index: tick.frame_index,
                            object: idx,
                            binding: event.binding,
                            slot: event.binding.slot(),
                            kind: match event.value {
                                InputValue::Position(at) => ContactKind::Moved(at),
                                InputValue::Pressed => ContactKind::Pressed,
                                InputValue::Released => ContactKind::Released,
                            },
                            at: tick.now,
                        });
                        if outcome.touched {
                            changes.touched.push(idx);
                        }
                    }
                    Ok(_) => {
                        ctx.tracer.slot_rejected(&SlotRejectedEvent {
                            frame_index: tick.frame_index,
                            object: idx,
                            slot: event.binding.slot(),
                            max_slots: touchable.tracker().map_or(0, |t| t.max_slots()),
                            at: tick.now,
                        });
                    }
                    Err(err) => {
                        ctx.errors.report(GESTURE_HALTED, &err);
                        summary.record_error();
                    }
                }
                let after = touchable.state();
                if after != before {
                    self.dirty.mark(idx, dirty::GESTURE);
                    ctx.tracer.transition(&TransitionEvent {
                        frame_index: tick.frame_index,
                        object: idx,
                        from: before,
                        to: after,
                        at: tick.now,
                    });
                }
                if let Some(phase) = touchable.sync_poll_loop() {
                    ctx.tracer.poll_loop(&PollLoopEvent {
                        frame_index: tick.frame_index,
                        object: idx,
                        phase,
                        iterations: touchable.poll_loop().iterations(),
                        at: tick.now,
                    });
                }
            }
        }
    }

    fn poll(
        &mut self,
        tick: &FrameTick,
        elapsed_secs: f64,
        ctx: &mut SceneContext<'_>,
        changes: &mut FrameChanges,
        summary: &mut FrameSummaryBuilder,
    ) {
        for (idx, slot) in (0_u32..).zip(self.objects.iter_mut()) {
            let Some(touchable) = slot.as_mut() else {
                continue;
            };
            if !touchable.poll_loop().is_active() {
                continue;
            }
            summary.record_poll();
            match touchable.poll(elapsed_secs) {
                Ok(Some(step)) => {
                    self.dirty.mark(idx, dirty::POSE);
                    changes.steps.push((idx, step));
                    summary.record_step();
                    ctx.tracer.step(&StepEvent {
                        frame_index: tick.frame_index,
                        object: idx,
                        step,
                        at: tick.now,
                    });
                }
                Ok(None) => {}
                Err(err) => {
                    ctx.errors.report(UPDATE_DISCARDED, &err);
                    summary.record_error();
                }
            }
        }
    }

    // -- Query API --

    /// The object behind a handle.
    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&Touchable> {
        if self.is_alive(id) {
            self.objects[id.idx as usize].as_ref()
        } else {
            None
        }
    }

    /// Current pose of an object.
    #[must_use]
    pub fn pose(&self, id: ObjectId) -> Option<Pose> {
        self.get(id).map(|t| *t.pose())
    }

    /// Current gesture state of an object.
    #[must_use]
    pub fn state(&self, id: ObjectId) -> Option<GestureState> {
        self.get(id).map(Touchable::state)
    }

    /// Whether an object's poll loop is scheduled.
    #[must_use]
    pub fn is_polling(&self, id: ObjectId) -> bool {
        self.get(id).is_some_and(|t| t.poll_loop().is_active())
    }

    /// Iterations an object's poll loop has run since it last started.
    #[must_use]
    pub fn poll_iterations(&self, id: ObjectId) -> Option<u64> {
        self.get(id).map(|t| t.poll_loop().iterations())
    }

    /// The collision proxy an object was configured with.
    #[must_use]
    pub fn collider(&self, id: ObjectId) -> Option<ColliderId> {
        self.get(id).and_then(Touchable::collider)
    }

    /// Whether an object became interactive.
    #[must_use]
    pub fn is_interactive(&self, id: ObjectId) -> bool {
        self.get(id).is_some_and(Touchable::is_interactive)
    }

    /// Number of live objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.iter().flatten().count()
    }

    /// Whether the scene holds no live objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Handles of every live object, in slot order.
    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        (0_u32..)
            .zip(self.objects.iter().zip(&self.generation))
            .filter(|(_, (slot, _))| slot.is_some())
            .map(|(idx, (_, generation))| ObjectId {
                idx,
                generation: *generation,
            })
    }

    // -- Raw index access --
    //
    // These accept raw slot indices (as found in `FrameChanges`) and skip the
    // generation check.

    /// Pose at a raw slot index, if the slot is occupied.
    #[must_use]
    pub fn pose_at(&self, idx: u32) -> Option<&Pose> {
        self.objects
            .get(idx as usize)
            .and_then(Option::as_ref)
            .map(Touchable::pose)
    }

    /// Collider at a raw slot index, if the slot is occupied.
    #[must_use]
    pub fn collider_at(&self, idx: u32) -> Option<ColliderId> {
        self.objects
            .get(idx as usize)
            .and_then(Option::as_ref)
            .and_then(Touchable::collider)
    }

    fn insert(&mut self, touchable: Touchable) -> ObjectId {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.objects[idx as usize] = Some(touchable);
            idx
        } else {
            let idx = u32::try_from(self.objects.len()).unwrap_or(u32::MAX);
            self.objects.push(Some(touchable));
            self.generation.push(0);
            idx
        };
        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::POSE);
        ObjectId {
            idx,
            generation: self.generation[idx as usize],
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use kurbo::{Point, Size};

    use super::*;
    use crate::camera::PinholeCamera;
    use crate::geometry::{Ray, Vec3};
    use crate::hit_test::{DEFAULT_LAYER, LayerName};
    use crate::input::{Binding, BindingHandle};

    /// Everything on the default layer hits collider 1.
    struct Wall;

    impl HitTest for Wall {
        fn raycast(&self, _ray: &Ray, layer: &str) -> Option<ColliderId> {
            (layer == DEFAULT_LAYER).then_some(ColliderId(1))
        }

        fn has_layer(&self, layer: &str) -> bool {
            layer == DEFAULT_LAYER
        }

        fn layer_of(&self, collider: ColliderId) -> Option<LayerName> {
            (collider.0 <= 2).then(|| LayerName::new(DEFAULT_LAYER))
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

    #[derive(Default)]
    struct Messages(Vec<(String, GestureError)>);

    impl ErrorSink for Messages {
        fn report(&mut self, message: &str, error: &GestureError) {
            self.0.push((String::from(message), error.clone()));
        }
    }

    fn camera() -> PinholeCamera {
        PinholeCamera::new(90.0, Size::new(1000.0, 1000.0))
    }

    fn tick(frame_index: u64) -> FrameTick {
        FrameTick {
            frame_index,
            now: HostTime(frame_index * 16_666_667),
        }
    }

    fn object(collider: u32) -> TouchableConfig {
        TouchableConfig::new(ColliderId(collider), Pose::at(Vec3::new(0.0, 0.0, 5.0)))
    }

    #[test]
    fn spawn_reports_added_and_initial_pose() {
        let cam = camera();
        let (mut input, mut errors) = (Live::default(), Messages::default());
        let mut ctx = SceneContext::new(Some(&cam), &Wall, &mut input, &mut errors);
        let mut scene = Scene::default();
        let id = scene.spawn(&object(1), &mut ctx);
        let changes = scene.frame(&tick(0), &[], &mut ctx);
        assert_eq!(changes.added, vec![id.index()]);
        assert_eq!(changes.poses, vec![id.index()]);
        assert!(scene.is_interactive(id));
        let changes = scene.frame(&tick(1), &[], &mut ctx);
        assert!(changes.is_empty());
    }

    #[test]
    fn failed_init_keeps_object_inert() {
        let (mut input, mut errors) = (Live::default(), Messages::default());
        let mut scene = Scene::default();
        let id = {
            let mut ctx = SceneContext::new(None, &Wall, &mut input, &mut errors);
            scene.spawn(&object(1), &mut ctx)
        };
        assert!(scene.is_alive(id));
        assert!(!scene.is_interactive(id));
        assert_eq!(errors.0.len(), 1);
        assert_eq!(errors.0[0].1, GestureError::MissingCamera);
    }

    #[test]
    fn spawn_in_view_refuses_offscreen() {
        let cam = camera();
        let (mut input, mut errors) = (Live::default(), Messages::default());
        let mut scene = Scene::default();
        {
            let mut ctx = SceneContext::new(Some(&cam), &Wall, &mut input, &mut errors);
            let far_left = TouchableConfig::new(ColliderId(1), Pose::at(Vec3::new(-4.5, 0.0, 5.0)));
            assert_eq!(
                scene.spawn_in_view(&far_left, &mut ctx),
                Err(GestureError::OutOfView)
            );
            assert!(scene.spawn_in_view(&object(1), &mut ctx).is_ok());
        }
        assert_eq!(scene.len(), 1);
        assert_eq!(errors.0.len(), 1);
    }

    #[test]
    fn despawn_releases_bindings_and_recycles_slot() {
        let cam = camera();
        let (mut input, mut errors) = (Live::default(), Messages::default());
        let mut scene = Scene::default();
        let first = {
            let mut ctx = SceneContext::new(Some(&cam), &Wall, &mut input, &mut errors);
            scene.spawn(&object(1), &mut ctx)
        };
        assert!(!input.0.is_empty());
        assert!(scene.despawn(first, &mut input));
        assert!(input.0.is_empty());
        assert!(!scene.despawn(first, &mut input));

        let mut ctx = SceneContext::new(Some(&cam), &Wall, &mut input, &mut errors);
        let second = scene.spawn(&object(2), &mut ctx);
        assert_eq!(second.index(), first.index());
        assert_ne!(second.generation(), first.generation());
        assert!(scene.pose(first).is_none());
        let changes = scene.frame(&tick(0), &[], &mut ctx);
        assert_eq!(changes.removed, vec![first.index()]);
        assert_eq!(changes.added, vec![second.index()]);
    }

    #[test]
    fn press_starts_and_release_stops_polling() {
        let cam = camera();
        let (mut input, mut errors) = (Live::default(), Messages::default());
        let mut ctx = SceneContext::new(Some(&cam), &Wall, &mut input, &mut errors);
        let mut scene = Scene::default();
        let id = scene.spawn(&object(1), &mut ctx);

        let press = [
            InputEvent::touch_moved(0, Point::new(520.0, 500.0)),
            InputEvent::touch_pressed(0),
        ];
        let changes = scene.frame(&tick(0), &press, &mut ctx);
        assert_eq!(changes.touched, vec![id.index()]);
        assert_eq!(changes.gestures, vec![id.index()]);
        assert_eq!(scene.state(id), Some(GestureState::Translating));
        assert_eq!(scene.poll_iterations(id), Some(1), "polled in the same frame");

        let changes = scene.frame(&tick(1), &[InputEvent::touch_released(0)], &mut ctx);
        assert_eq!(changes.gestures, vec![id.index()]);
        assert!(!scene.is_polling(id));
        scene.frame(&tick(2), &[], &mut ctx);
        assert_eq!(scene.poll_iterations(id), Some(1));
    }

    #[test]
    fn missing_camera_mid_session_is_reported() {
        let cam = camera();
        let (mut input, mut errors) = (Live::default(), Messages::default());
        let mut scene = Scene::default();
        {
            let mut ctx = SceneContext::new(Some(&cam), &Wall, &mut input, &mut errors);
            scene.spawn(&object(1), &mut ctx);
        }
        {
            let mut ctx = SceneContext::new(None, &Wall, &mut input, &mut errors);
            scene.frame(&tick(0), &[InputEvent::touch_pressed(0)], &mut ctx);
        }
        assert_eq!(errors.0.len(), 1);
        assert_eq!(errors.0[0].1, GestureError::MissingCamera);
    }

    #[test]
    fn degenerate_timebase_does_not_panic() {
        let cam = camera();
        let (mut input, mut errors) = (Live::default(), Messages::default());
        let mut ctx = SceneContext::new(Some(&cam), &Wall, &mut input, &mut errors);
        let broken = SceneConfig::new(Timebase { numer: 1, denom: 0 }, Duration(16));
        let mut scene = Scene::new(broken);
        let id = scene.spawn(&object(1), &mut ctx);
        let press = [
            InputEvent::touch_moved(0, Point::new(520.0, 500.0)),
            InputEvent::touch_pressed(0),
        ];
        scene.frame(&tick(0), &press, &mut ctx);
        scene.frame(&tick(1), &[], &mut ctx);
        assert_eq!(scene.poll_iterations(id), Some(2));
    }

    #[test]
    fn release_without_camera_still_ends_the_gesture() {
        let cam = camera();
        let (mut input, mut errors) = (Live::default(), Messages::default());
        let mut scene = Scene::default();
        let id = {
            let mut ctx = SceneContext::new(Some(&cam), &Wall, &mut input, &mut errors);
            let id = scene.spawn(&object(1), &mut ctx);
            let press = [
                InputEvent::touch_moved(0, Point::new(520.0, 500.0)),
                InputEvent::touch_pressed(0),
            ];
            scene.frame(&tick(0), &press, &mut ctx);
            id
        };
        assert!(scene.is_polling(id));

        {
            let mut ctx = SceneContext::new(None, &Wall, &mut input, &mut errors);
            let changes = scene.frame(&tick(1), &[InputEvent::touch_released(0)], &mut ctx);
            assert_eq!(changes.gestures, vec![id.index()]);
        }
        assert_eq!(scene.state(id), Some(GestureState::Idle));
        assert!(!scene.is_polling(id));
        let iterations = scene.poll_iterations(id);

        // A later move with the camera back does not drag the object.
        let pose = scene.pose(id).unwrap();
        let mut ctx = SceneContext::new(Some(&cam), &Wall, &mut input, &mut errors);
        scene.frame(
            &tick(2),
            &[InputEvent::touch_moved(0, Point::new(800.0, 500.0))],
            &mut ctx,
        );
        assert_eq!(scene.poll_iterations(id), iterations);
        assert_eq!(scene.pose(id).unwrap(), pose);
    }
}
