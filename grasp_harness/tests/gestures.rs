// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end gesture behavior through a simulated scene.
//!
//! The simulated camera maps screen `(500, 500)` to the `+Z` axis; at depth 5
//! one world unit is 100 pixels. Most tests put a unit sphere at `(0, 0, 5)`.

use grasp_core::error::GestureError;
use grasp_core::geometry::Vec3;
use grasp_core::gesture::{
    Direction, GestureConfig, GestureState, PRIMARY_SLOT, Step, TranslationMode,
};
use grasp_core::hit_test::{ColliderId, DEFAULT_LAYER};
use grasp_core::id::ObjectId;
use grasp_core::input::{Binding, InputEvent};
use grasp_core::trace::{PollLoopEvent, PollLoopPhase, SlotRejectedEvent, TraceSink};
use grasp_core::touchable::TouchableConfig;
use grasp_core::tracker::TrackerConfig;
use grasp_core::transform::Pose;
use grasp_harness::{Script, Simulation};
use kurbo::Point;

const CENTER: Point = Point::new(500.0, 500.0);
const HOME: Vec3 = Vec3::new(0.0, 0.0, 5.0);

fn sim_with_sphere(gesture: GestureConfig) -> (Simulation, ObjectId) {
    let mut sim = Simulation::new();
    let collider = sim.add_sphere(DEFAULT_LAYER, HOME, 1.0);
    let id = sim.spawn(&TouchableConfig::new(collider, Pose::at(HOME)).with_gesture(gesture));
    assert!(sim.scene.is_interactive(id), "errors: {:?}", sim.errors.entries());
    (sim, id)
}

fn position(sim: &Simulation, id: ObjectId) -> Vec3 {
    sim.scene.pose(id).unwrap().position
}

fn close(a: Vec3, b: Vec3, eps: f64) -> bool {
    (a - b).length() < eps
}

/// Presses slot 0 on the object and slot 1 100px to its right.
fn start_pinch(sim: &mut Simulation) {
    sim.run(
        &Script::new()
            .touch_down(0, CENTER)
            .touch_down(1, CENTER + (100.0, 0.0)),
    );
}

// -- Single touch ------------------------------------------------------------

#[test]
fn drag_ends_at_contact_plus_offset() {
    let (mut sim, id) = sim_with_sphere(GestureConfig::DEFAULT);
    let grab = Point::new(550.0, 520.0);
    let drop = Point::new(750.0, 520.0);
    sim.run(
        &Script::new()
            .touch_down(0, grab)
            .drag(0, grab, drop, 5)
            .touch_up(0),
    );
    // Grabbed 0.5 right of and 0.2 above the center, so the center ends up
    // that far left of and below the contact.
    let expected = Vec3::new(2.0, 0.0, 5.0);
    let got = position(&sim, id);
    assert!(close(got, expected, 1e-6), "ended at {got:?}");
    assert_eq!(sim.scene.state(id), Some(GestureState::Idle));
}

#[test]
fn one_frame_move_lands_exactly_before_release() {
    let (mut sim, id) = sim_with_sphere(GestureConfig::DEFAULT);
    sim.run(
        &Script::new()
            .touch_down(0, Point::new(550.0, 500.0))
            .touch_move(0, Point::new(750.0, 500.0))
            .touch_up(0),
    );
    // Contact at 2.5 with a -0.5 offset; no smoothing lag on translation.
    let got = position(&sim, id);
    assert!(close(got, Vec3::new(2.0, 0.0, 5.0), 1e-9), "ended at {got:?}");
    assert!(!sim.scene.is_polling(id));
}

#[test]
fn repeated_press_at_the_same_spot_is_idempotent() {
    let (mut sim, id) = sim_with_sphere(GestureConfig::DEFAULT);
    let grab = Point::new(550.0, 520.0);
    let drop = Point::new(750.0, 520.0);
    sim.run(
        &Script::new()
            .touch_down(0, grab)
            .drag(0, grab, drop, 5)
            .touch_up(0),
    );
    let settled = position(&sim, id);
    for _ in 0..3 {
        sim.run(&Script::new().touch_down(0, drop).hold(30).touch_up(0));
        let again = position(&sim, id);
        assert!(close(again, settled, 1e-9), "moved to {again:?}");
    }
    assert!(sim.errors.is_empty());
}

#[test]
fn unmoved_touch_is_approached_not_jumped_to() {
    let snap = GestureConfig::DEFAULT.with_translation(TranslationMode::SnapToTouch);
    let (mut sim, id) = sim_with_sphere(snap);
    let target = Vec3::new(0.5, 0.0, 5.0);

    sim.run(&Script::new().touch_down(0, Point::new(550.0, 500.0)));
    let first = position(&sim, id).x;
    assert!(first > 0.0 && first < target.x, "first frame at {first}");

    sim.step(&[]);
    let second = position(&sim, id).x;
    assert!(second > first && second < target.x, "second frame at {second}");

    sim.run(&Script::new().hold(200));
    assert!(close(position(&sim, id), target, 1e-6));
}

#[test]
fn infinite_change_speed_snaps_in_one_frame() {
    let snap = GestureConfig::INSTANT.with_translation(TranslationMode::SnapToTouch);
    let (mut sim, id) = sim_with_sphere(snap);
    sim.run(&Script::new().touch_down(0, Point::new(550.0, 500.0)));
    assert!(close(position(&sim, id), Vec3::new(0.5, 0.0, 5.0), 1e-9));
}

#[test]
fn mouse_drives_slot_zero() {
    let (mut sim, id) = sim_with_sphere(GestureConfig::INSTANT);
    let changes = sim.run(
        &Script::new()
            .mouse_down(CENTER)
            .frame([InputEvent::mouse_moved(Point::new(600.0, 500.0))]),
    );
    assert_eq!(changes[0].touched, vec![id.index()]);
    assert!(close(position(&sim, id), Vec3::new(1.0, 0.0, 5.0), 1e-9));
    sim.run(&Script::new().mouse_up());
    assert_eq!(sim.scene.state(id), Some(GestureState::Idle));
}

#[test]
fn press_off_the_object_does_nothing() {
    let (mut sim, id) = sim_with_sphere(GestureConfig::DEFAULT);
    let changes = sim.run(&Script::new().touch_down(0, Point::new(100.0, 100.0)).hold(5));
    assert!(changes[0].touched.is_empty());
    assert_eq!(sim.scene.state(id), Some(GestureState::Idle));
    assert!(!sim.scene.is_polling(id));
    assert_eq!(position(&sim, id), HOME);
}

#[test]
fn collider_follows_the_pose() {
    let (mut sim, id) = sim_with_sphere(GestureConfig::INSTANT);
    sim.run(
        &Script::new()
            .touch_down(0, CENTER)
            .touch_move(0, Point::new(800.0, 500.0))
            .touch_up(0),
    );
    let collider = sim.scene.collider(id).unwrap();
    let sphere = sim.world.sphere(collider).unwrap();
    assert!(close(sphere.center, Vec3::new(3.0, 0.0, 5.0), 1e-9));

    // The object can be picked up again where it now is.
    let changes = sim.run(&Script::new().touch_down(0, Point::new(800.0, 500.0)));
    assert_eq!(changes[0].touched, vec![id.index()]);
}

// -- Two touches -------------------------------------------------------------

#[test]
fn diverging_touches_fire_exactly_one_rescale() {
    let (mut sim, id) = sim_with_sphere(GestureConfig::DEFAULT);
    start_pinch(&mut sim);
    assert_eq!(sim.scene.state(id), Some(GestureState::ScalingRotating));

    let changes = sim.step(&[InputEvent::touch_moved(1, CENTER + (103.0, 0.0))]);
    assert_eq!(
        changes.steps,
        vec![(id.index(), Step::Rescale(Direction::Positive))]
    );
    assert!(sim.scene.pose(id).unwrap().scale.x > 1.0);
}

#[test]
fn tangential_nudge_fires_rotate() {
    let (mut sim, id) = sim_with_sphere(GestureConfig::DEFAULT);
    start_pinch(&mut sim);

    let changes = sim.step(&[InputEvent::touch_moved(1, CENTER + (100.0, 2.0))]);
    assert_eq!(
        changes.steps,
        vec![(id.index(), Step::Rotate(Direction::Positive))]
    );
    let pose = sim.scene.pose(id).unwrap();
    assert_eq!(pose.scale, Vec3::ONE);
    assert_ne!(pose.rotation, Pose::IDENTITY.rotation);

    let changes = sim.step(&[InputEvent::touch_moved(1, CENTER + (100.0, 0.0))]);
    assert_eq!(
        changes.steps,
        vec![(id.index(), Step::Rotate(Direction::Negative))]
    );
}

#[test]
fn jitter_inside_the_dead_zone_is_ignored() {
    let (mut sim, id) = sim_with_sphere(GestureConfig::DEFAULT);
    start_pinch(&mut sim);
    let changes = sim.step(&[InputEvent::touch_moved(1, CENTER + (100.6, 0.4))]);
    assert!(changes.steps.is_empty(), "got {:?}", changes.steps);
    assert_eq!(sim.scene.pose(id).unwrap().scale, Vec3::ONE);
}

#[test]
fn scale_and_rotate_never_share_a_frame() {
    let (mut sim, id) = sim_with_sphere(GestureConfig::DEFAULT);
    start_pinch(&mut sim);
    // Slot 1 spirals outwards: every frame changes both distance and angle.
    let frames: Vec<_> = (1..=30)
        .map(|i| {
            let i = f64::from(i);
            let angle = (i * 3.0).to_radians();
            let radius = 100.0 + i * 2.0;
            CENTER + (radius * angle.cos(), radius * angle.sin())
        })
        .collect();
    let mut rescales = 0;
    for at in frames {
        let changes = sim.step(&[InputEvent::touch_moved(1, at)]);
        let ours: Vec<_> = changes
            .steps
            .iter()
            .filter(|(idx, _)| *idx == id.index())
            .collect();
        assert!(ours.len() <= 1, "more than one step in a frame: {ours:?}");
        rescales += ours
            .iter()
            .filter(|(_, step)| matches!(step, Step::Rescale(_)))
            .count();
    }
    assert!(rescales > 0);
}

#[test]
fn releasing_primary_mid_pinch_halts_the_loop() {
    let (mut sim, id) = sim_with_sphere(GestureConfig::DEFAULT);
    start_pinch(&mut sim);
    sim.run(&Script::new().pinch(CENTER, 100.0, 140.0, 8));
    assert!(sim.scene.is_polling(id));

    let changes = sim.step(&[InputEvent::touch_released(0)]);
    assert_eq!(changes.gestures, vec![id.index()]);
    assert_eq!(sim.scene.state(id), Some(GestureState::Idle));
    assert!(!sim.scene.is_polling(id));

    let iterations = sim.scene.poll_iterations(id);
    let pose = sim.scene.pose(id).unwrap();
    let later = sim.run(&Script::new().pinch(CENTER, 140.0, 60.0, 10));
    assert_eq!(sim.scene.poll_iterations(id), iterations, "no orphaned loop");
    assert_eq!(sim.scene.pose(id).unwrap(), pose);
    assert!(later.iter().all(|c| c.steps.is_empty()));
}

#[test]
fn releasing_secondary_returns_to_translating_with_fresh_baseline() {
    let (mut sim, id) = sim_with_sphere(GestureConfig::DEFAULT);
    start_pinch(&mut sim);
    sim.run(&Script::new().pinch(CENTER, 100.0, 130.0, 6));
    let baseline = *sim.scene.get(id).unwrap().classifier().baseline();
    assert!(!baseline.is_unset());

    sim.step(&[InputEvent::touch_released(1)]);
    assert_eq!(sim.scene.state(id), Some(GestureState::Translating));
    assert!(sim.scene.is_polling(id));
    assert!(sim.scene.get(id).unwrap().classifier().baseline().is_unset());

    // A new pinch at a very different distance seeds rather than diffing
    // against the stale 130px sample.
    let changes = sim.step(&[
        InputEvent::touch_moved(1, CENTER + (40.0, 0.0)),
        InputEvent::touch_pressed(1),
    ]);
    assert_eq!(sim.scene.state(id), Some(GestureState::ScalingRotating));
    assert!(changes.steps.is_empty(), "got {:?}", changes.steps);
}

#[test]
fn pinch_end_does_not_jump_the_object() {
    let (mut sim, id) = sim_with_sphere(GestureConfig::INSTANT);
    sim.run(
        &Script::new()
            .touch_down(0, CENTER)
            .touch_down(1, CENTER + (100.0, 0.0))
            // Slot 0 drifts while pinching; translation is suspended.
            .touch_move(0, Point::new(560.0, 500.0))
            .touch_up(1)
            .hold(3),
    );
    assert!(close(position(&sim, id), HOME, 1e-9), "jumped to {:?}", position(&sim, id));
}

// -- Hit-test precedence -----------------------------------------------------

/// A small default-layer sphere in front of a larger "Notes" sphere.
fn layered() -> (Simulation, ObjectId, ObjectId) {
    let mut sim = Simulation::new();
    let shield = sim.add_sphere(DEFAULT_LAYER, Vec3::new(0.0, 0.0, 3.0), 0.5);
    let note = sim.add_sphere("Notes", HOME, 1.0);
    let front = sim.spawn(&TouchableConfig::new(shield, Pose::at(Vec3::new(0.0, 0.0, 3.0))));
    let back = sim.spawn(&TouchableConfig::new(note, Pose::at(HOME)).with_layer("Notes"));
    assert!(sim.errors.is_empty(), "errors: {:?}", sim.errors.entries());
    (sim, front, back)
}

#[test]
fn higher_priority_layer_shadows_lower() {
    let (mut sim, front, back) = layered();
    let changes = sim.run(&Script::new().touch_down(0, CENTER));
    assert_eq!(changes[0].touched, vec![front.index()]);
    assert_eq!(sim.scene.state(front), Some(GestureState::Translating));
    assert_eq!(sim.scene.state(back), Some(GestureState::Idle));
}

#[test]
fn lower_priority_layer_decides_when_higher_misses() {
    let (mut sim, front, back) = layered();
    // 90px off-center clears the small sphere but still hits the large one.
    let changes = sim.run(&Script::new().touch_down(0, Point::new(590.0, 500.0)));
    assert_eq!(changes[0].touched, vec![back.index()]);
    assert_eq!(sim.scene.state(front), Some(GestureState::Idle));
}

#[test]
fn missing_every_layer_is_not_a_touch() {
    let (mut sim, front, back) = layered();
    let changes = sim.run(&Script::new().touch_down(0, Point::new(20.0, 980.0)));
    assert!(changes[0].touched.is_empty());
    assert_eq!(sim.scene.state(front), Some(GestureState::Idle));
    assert_eq!(sim.scene.state(back), Some(GestureState::Idle));
    let tracker = sim.scene.get(back).unwrap().tracker().unwrap();
    assert!(!tracker.is_touched(PRIMARY_SLOT, sim.camera().unwrap(), &sim.world));
}

#[test]
fn unknown_layer_falls_back_to_collider_layer() {
    let mut sim = Simulation::new();
    let note = sim.add_sphere("Notes", HOME, 1.0);
    let id = sim.spawn(&TouchableConfig::new(note, Pose::at(HOME)).with_layer("Nowhere"));
    let tracker = sim.scene.get(id).unwrap().tracker().unwrap();
    assert_eq!(tracker.hit_test().layer().as_str(), "Notes");
}

// -- Lifecycle and errors ----------------------------------------------------

#[test]
fn object_binds_and_releases_its_controls() {
    let (mut sim, id) = sim_with_sphere(GestureConfig::DEFAULT);
    // Slot 0 listens to mouse and touch; slot 1 to touch only.
    assert_eq!(sim.input.live_count(), 6);
    assert_eq!(sim.input.live_for(Binding::MouseButton), 1);
    assert!(sim.despawn(id));
    assert_eq!(sim.input.live_count(), 0);
    assert!(!sim.despawn(id));
}

#[test]
fn refused_binding_leaves_object_inert() {
    let mut sim = Simulation::new();
    sim.input.refuse(Binding::TouchPress(1));
    let collider = sim.add_sphere(DEFAULT_LAYER, HOME, 1.0);
    let id = sim.spawn(&TouchableConfig::new(collider, Pose::at(HOME)));
    assert!(sim.scene.is_alive(id));
    assert!(!sim.scene.is_interactive(id));
    assert_eq!(sim.input.live_count(), 0, "partial bindings rolled back");
    let errors: Vec<_> = sim.errors.errors().cloned().collect();
    assert_eq!(errors, vec![GestureError::BindingUnavailable(Binding::TouchPress(1))]);

    sim.run(&Script::new().touch_down(0, CENTER).hold(2));
    assert_eq!(sim.scene.state(id), Some(GestureState::Idle));
}

#[test]
fn unregistered_collider_is_reported() {
    let mut sim = Simulation::new();
    sim.add_sphere(DEFAULT_LAYER, HOME, 1.0);
    let id = sim.spawn(&TouchableConfig::new(ColliderId(42), Pose::at(HOME)));
    assert!(!sim.scene.is_interactive(id));
    let errors: Vec<_> = sim.errors.errors().cloned().collect();
    assert_eq!(errors, vec![GestureError::UnknownCollider(ColliderId(42))]);
}

#[test]
fn no_camera_means_no_interaction() {
    let mut sim = Simulation::new().without_camera();
    let collider = sim.add_sphere(DEFAULT_LAYER, HOME, 1.0);
    let id = sim.spawn(&TouchableConfig::new(collider, Pose::at(HOME)));
    assert!(!sim.scene.is_interactive(id));
    assert!(matches!(
        sim.errors.entries(),
        [(_, GestureError::MissingCamera)]
    ));
    assert_eq!(
        sim.spawn_in_view(&TouchableConfig::new(collider, Pose::at(HOME))),
        Err(GestureError::MissingCamera)
    );
}

#[test]
fn spawn_in_view_checks_the_margin() {
    let mut sim = Simulation::new();
    let collider = sim.add_sphere(DEFAULT_LAYER, HOME, 1.0);
    // 3.6 units right at depth 5 is 860px: inside the viewport, outside the
    // 15% margin.
    let edge = TouchableConfig::new(collider, Pose::at(Vec3::new(3.6, 0.0, 5.0)));
    assert_eq!(sim.spawn_in_view(&edge), Err(GestureError::OutOfView));
    let behind = TouchableConfig::new(collider, Pose::at(Vec3::new(0.0, 0.0, -5.0)));
    assert_eq!(sim.spawn_in_view(&behind), Err(GestureError::OutOfView));
    assert!(sim.spawn_in_view(&TouchableConfig::new(collider, Pose::at(HOME))).is_ok());
    assert_eq!(sim.scene.len(), 1);
}

// -- Slot table --------------------------------------------------------------

#[derive(Default)]
struct Observed {
    rejected: Vec<SlotRejectedEvent>,
    loops: Vec<PollLoopEvent>,
}

impl TraceSink for Observed {
    fn on_slot_rejected(&mut self, e: &SlotRejectedEvent) {
        self.rejected.push(*e);
    }

    fn on_poll_loop(&mut self, e: &PollLoopEvent) {
        self.loops.push(*e);
    }
}

#[test]
fn out_of_range_slots_are_dropped_and_traced() {
    let mut sim = Simulation::new();
    let collider = sim.add_sphere(DEFAULT_LAYER, HOME, 1.0);
    let id = sim.spawn(
        &TouchableConfig::new(collider, Pose::at(HOME)).with_tracker(TrackerConfig::SINGLE_TOUCH),
    );
    let mut observed = Observed::default();
    sim.run_traced(
        &Script::new()
            .touch_down(0, CENTER)
            .touch_down(1, CENTER + (100.0, 0.0))
            .touch_up(0),
        &mut observed,
    );
    assert!(sim.errors.is_empty());
    // Slot 1's move and press were both dropped.
    assert_eq!(observed.rejected.len(), 2);
    assert!(observed.rejected.iter().all(|e| e.slot == 1 && e.max_slots == 1));
    assert_eq!(sim.scene.state(id), Some(GestureState::Idle));

    let phases: Vec<_> = observed.loops.iter().map(|e| e.phase).collect();
    assert_eq!(phases, [PollLoopPhase::Started, PollLoopPhase::Stopped]);
    assert_eq!(observed.loops[1].iterations, 2);
}
