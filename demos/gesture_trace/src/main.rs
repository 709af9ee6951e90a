// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted gesture session that exercises the tracing and diagnostics
//! pipeline.
//!
//! A note sits in front of the simulated camera. The script grabs it with one
//! finger and drags it right, adds a second finger and spreads them to scale
//! it up, twists the second finger to rotate it, then lifts both fingers.
//! Events go to both a
//! [`PrettyPrintSink`](grasp_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](grasp_debug::recorder::RecorderSink), and the recording
//! is exported as a Chrome trace JSON file.

use std::fs::File;
use std::io::BufWriter;

use grasp_core::geometry::Vec3;
use grasp_core::hit_test::DEFAULT_LAYER;
use grasp_core::time::Timebase;
use grasp_core::touchable::TouchableConfig;
use grasp_core::trace::{
    ContactEvent, FrameSummary, PollLoopEvent, SlotRejectedEvent, StepEvent, TraceSink,
    TransitionEvent,
};
use grasp_core::transform::Pose;
use grasp_debug::pretty::PrettyPrintSink;
use grasp_debug::recorder::RecorderSink;
use grasp_harness::{Script, Simulation};
use kurbo::{Point, Vec2};

/// Forwards every event to two sinks.
struct Tee<'a> {
    first: &'a mut dyn TraceSink,
    second: &'a mut dyn TraceSink,
}

impl TraceSink for Tee<'_> {
    fn on_contact(&mut self, e: &ContactEvent) {
        self.first.on_contact(e);
        self.second.on_contact(e);
    }

    fn on_slot_rejected(&mut self, e: &SlotRejectedEvent) {
        self.first.on_slot_rejected(e);
        self.second.on_slot_rejected(e);
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        self.first.on_transition(e);
        self.second.on_transition(e);
    }

    fn on_poll_loop(&mut self, e: &PollLoopEvent) {
        self.first.on_poll_loop(e);
        self.second.on_poll_loop(e);
    }

    fn on_step(&mut self, e: &StepEvent) {
        self.first.on_step(e);
        self.second.on_step(e);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.first.on_frame_summary(s);
        self.second.on_frame_summary(s);
    }
}

fn main() {
    let timebase = Timebase::NANOS;

    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()), timebase).without_moves();
    let mut recorder = RecorderSink::new();

    // -- scene -------------------------------------------------------------
    let mut sim = Simulation::new();
    let home = Vec3::new(0.0, 0.0, 5.0);
    let collider = sim.add_sphere(DEFAULT_LAYER, home, 1.0);
    let note = match sim.spawn_in_view(&TouchableConfig::new(collider, Pose::at(home))) {
        Ok(id) => id,
        Err(err) => {
            eprintln!("could not place the note: {err}");
            return;
        }
    };

    // -- script ------------------------------------------------------------
    let grab = Point::new(520.0, 500.0);
    let dragged = Point::new(640.0, 560.0);
    let spread = Vec2::new(100.0, 0.0);
    let script = Script::new()
        .touch_down(0, grab)
        .drag(0, grab, dragged, 20)
        .hold(15)
        .touch_down(1, dragged + spread)
        .pinch(dragged, 100.0, 160.0, 20)
        .twist(dragged, 160.0, 0.0, 45.0, 20)
        .touch_up(1)
        .hold(5)
        .touch_up(0)
        .hold(3);

    let mut tee = Tee {
        first: &mut pretty,
        second: &mut recorder,
    };
    sim.run_traced(&script, &mut tee);

    if let Some(pose) = sim.scene.pose(note) {
        println!(
            "Note at ({:.2}, {:.2}, {:.2}), scale {:.2}",
            pose.position.x, pose.position.y, pose.position.z, pose.scale.x,
        );
    }
    for (message, error) in sim.errors.entries() {
        eprintln!("{message}: {error}");
    }

    // -- export Chrome trace -----------------------------------------------
    let path = "gesture_trace.json";
    let file = File::create(path).expect("failed to create gesture_trace.json");
    let mut writer = BufWriter::new(file);
    grasp_debug::timeline::export(recorder.as_bytes(), timebase, &mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path} ({} frames)", script.len());
}
