// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scene wired to simulated collaborators and a fixed-rate clock.

use alloc::vec::Vec;

use kurbo::{Point, Size};

use grasp_core::camera::{PinholeCamera, Projection};
use grasp_core::error::GestureError;
use grasp_core::geometry::Vec3;
use grasp_core::hit_test::ColliderId;
use grasp_core::id::ObjectId;
use grasp_core::input::InputEvent;
use grasp_core::scene::{FrameChanges, Scene, SceneConfig, SceneContext};
use grasp_core::sink::TransformSink;
use grasp_core::time::{FrameTick, HostTime};
use grasp_core::touchable::TouchableConfig;
use grasp_core::trace::{TraceSink, Tracer};

use crate::errors::CollectedErrors;
use crate::input::LedgerInput;
use crate::script::Script;
use crate::world::SphereWorld;

/// Viewport of the simulated camera, in pixels.
pub const VIEWPORT: Size = Size::new(1000.0, 1000.0);

/// Drives a [`Scene`] against a [`SphereWorld`], a [`LedgerInput`] and a
/// [`CollectedErrors`] sink.
///
/// The camera sits at the origin looking along `+Z` with a 90° vertical
/// field of view over [`VIEWPORT`], so at depth 5 one world unit spans 100
/// pixels and the screen center `(500, 500)` looks straight down the axis.
/// Each [`step`](Self::step) advances the clock by the scene's nominal frame
/// and pushes changed poses back into the world.
#[derive(Debug)]
pub struct Simulation {
    /// The scene under test.
    pub scene: Scene,
    /// Colliders; follows every pose change.
    pub world: SphereWorld,
    /// Binding ledger.
    pub input: LedgerInput,
    /// Every reported error.
    pub errors: CollectedErrors,
    camera: Option<PinholeCamera>,
    config: SceneConfig,
    frame_index: u64,
    now: HostTime,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    /// Creates an empty simulation at 60 Hz.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SceneConfig::SIXTY_HZ)
    }

    /// Creates an empty simulation with the given frame timing.
    #[must_use]
    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            scene: Scene::new(config),
            world: SphereWorld::new(),
            input: LedgerInput::new(),
            errors: CollectedErrors::new(),
            camera: Some(PinholeCamera::new(90.0, VIEWPORT)),
            config,
            frame_index: 0,
            now: HostTime(0),
        }
    }

    /// Removes the camera, as if the host had none.
    #[must_use]
    pub fn without_camera(mut self) -> Self {
        self.camera = None;
        self
    }

    /// The simulated camera, if any.
    #[must_use]
    pub fn camera(&self) -> Option<&PinholeCamera> {
        self.camera.as_ref()
    }

    /// Screen position of a world point, or `None` without a camera.
    #[must_use]
    pub fn screen_of(&self, world: Vec3) -> Option<Point> {
        let s = self.camera.as_ref()?.world_to_screen(world);
        Some(Point::new(s.x, s.y))
    }

    /// Index of the next frame to run.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Adds a sphere collider to the world.
    pub fn add_sphere(&mut self, layer: &str, center: Vec3, radius: f64) -> ColliderId {
        self.world.add_sphere(layer, center, radius)
    }

    /// Spawns an object; initialization failures land in
    /// [`errors`](Self::errors).
    pub fn spawn(&mut self, config: &TouchableConfig) -> ObjectId {
        let camera = self.camera.as_ref().map(|c| c as &dyn Projection);
        let mut ctx = SceneContext::new(camera, &self.world, &mut self.input, &mut self.errors);
        self.scene.spawn(config, &mut ctx)
    }

    /// Spawns an object only if its position is comfortably in view.
    pub fn spawn_in_view(&mut self, config: &TouchableConfig) -> Result<ObjectId, GestureError> {
        let camera = self.camera.as_ref().map(|c| c as &dyn Projection);
        let mut ctx = SceneContext::new(camera, &self.world, &mut self.input, &mut self.errors);
        self.scene.spawn_in_view(config, &mut ctx)
    }

    /// Removes an object and releases its bindings.
    pub fn despawn(&mut self, id: ObjectId) -> bool {
        self.scene.despawn(id, &mut self.input)
    }

    /// Runs one frame with `events`.
    pub fn step(&mut self, events: &[InputEvent]) -> FrameChanges {
        self.run_frame(events, None)
    }

    /// Runs one frame with `events`, tracing into `sink`.
    pub fn step_traced(&mut self, events: &[InputEvent], sink: &mut dyn TraceSink) -> FrameChanges {
        self.run_frame(events, Some(sink))
    }

    /// Runs every frame of `script` and returns each frame's changes.
    pub fn run(&mut self, script: &Script) -> Vec<FrameChanges> {
        script.frames().iter().map(|events| self.step(events)).collect()
    }

    /// Like [`run`](Self::run), tracing into `sink`.
    pub fn run_traced(&mut self, script: &Script, sink: &mut dyn TraceSink) -> Vec<FrameChanges> {
        script
            .frames()
            .iter()
            .map(|events| self.step_traced(events, sink))
            .collect()
    }

    fn run_frame(&mut self, events: &[InputEvent], sink: Option<&mut dyn TraceSink>) -> FrameChanges {
        let tracer = match sink {
            Some(sink) => Tracer::new(sink),
            None => Tracer::none(),
        };
        let tick = FrameTick {
            frame_index: self.frame_index,
            now: self.now,
        };
        let camera = self.camera.as_ref().map(|c| c as &dyn Projection);
        let mut ctx = SceneContext::new(camera, &self.world, &mut self.input, &mut self.errors)
            .with_tracer(tracer);
        let changes = self.scene.frame(&tick, events, &mut ctx);
        self.world.apply(&self.scene, &changes);

        self.frame_index += 1;
        self.now = HostTime(self.now.ticks() + self.config.nominal_frame.ticks());
        changes
    }
}
