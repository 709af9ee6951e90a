// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-slot contact tracking for one touchable object.
//!
//! A [`TouchTracker`] owns a fixed table of [`TouchSlot`]s sized once at
//! [`start`](TouchTracker::start). Screen positions are un-projected onto a
//! plane at the depth the object had when tracking started, so a dragged
//! object stays on that plane no matter where it moves.
//!
//! The tracker holds the input-source handles for every binding it listens
//! to. [`stop`](TouchTracker::stop) must be called before the tracker is
//! dropped, or the host keeps those controls enabled.

use alloc::vec::Vec;

use kurbo::Point;

use crate::camera::Projection;
use crate::error::GestureError;
use crate::geometry::Vec3;
use crate::hit_test::{ColliderId, HitTest, HitTestConfig};
use crate::input::{BindingHandle, BindingTable, InputSource};

/// Largest slot table a tracker can be configured with.
pub const MAX_SLOTS: u8 = 10;

/// One simultaneous contact point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TouchSlot {
    /// Last reported position in screen pixels.
    pub screen_position: Point,
    /// `screen_position` un-projected at the tracker's depth.
    pub world_position: Vec3,
    /// Whether the contact is currently down.
    pub pressed: bool,
    /// Whether any position has been reported for this slot yet.
    pub sampled: bool,
}

/// Slot table configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Number of slots to track, in `1..=MAX_SLOTS`.
    pub max_slots: u8,
}

impl TrackerConfig {
    /// Two slots: enough for drag, pinch and twist.
    pub const TWO_FINGER: Self = Self::new(2);

    /// A single slot: drag only.
    pub const SINGLE_TOUCH: Self = Self::new(1);

    /// Creates a configuration tracking `max_slots` contacts.
    #[must_use]
    pub const fn new(max_slots: u8) -> Self {
        Self { max_slots }
    }

    /// Checks that the slot count is in range.
    pub const fn validate(self) -> Result<Self, GestureError> {
        if self.max_slots == 0 || self.max_slots > MAX_SLOTS {
            Err(GestureError::InvalidSlotCount(self.max_slots))
        } else {
            Ok(self)
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::TWO_FINGER
    }
}

/// Contact table and hit testing for one object.
#[derive(Debug)]
pub struct TouchTracker {
    slots: Vec<TouchSlot>,
    depth: f64,
    collider: ColliderId,
    hit_test: HitTestConfig,
    table: BindingTable,
    handles: Vec<BindingHandle>,
}

impl TouchTracker {
    /// Allocates the slot table and enables every binding it listens to.
    ///
    /// If any binding fails to enable, the ones already enabled are released
    /// before the error is returned.
    pub fn start(
        config: TrackerConfig,
        collider: ColliderId,
        hit_test: HitTestConfig,
        depth: f64,
        input: &mut dyn InputSource,
    ) -> Result<Self, GestureError> {
        let config = config.validate()?;
        let table = BindingTable::new(config.max_slots);
        let mut handles = Vec::new();
        for binding in table.bindings() {
            match input.bind(binding) {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    for handle in handles.drain(..) {
                        input.unbind(handle);
                    }
                    return Err(err);
                }
            }
        }
        Ok(Self {
            slots: alloc::vec![TouchSlot::default(); usize::from(config.max_slots)],
            depth,
            collider,
            hit_test,
            table,
            handles,
        })
    }

    /// Records a new screen position for `slot` and re-projects it.
    ///
    /// Returns `false` (and changes nothing) if `slot` is outside the table.
    pub fn register_contact_move(
        &mut self,
        slot: usize,
        screen: Point,
        camera: &dyn Projection,
    ) -> bool {
        let depth = self.depth;
        let Some(s) = self.slots.get_mut(slot) else {
            return false;
        };
        s.screen_position = screen;
        s.world_position = camera.screen_to_world(screen, depth);
        s.sampled = true;
        true
    }

    /// Records a press or release for `slot`.
    ///
    /// Returns `false` (and changes nothing) if `slot` is outside the table.
    pub fn set_pressed(&mut self, slot: usize, pressed: bool) -> bool {
        let Some(s) = self.slots.get_mut(slot) else {
            return false;
        };
        s.pressed = pressed;
        true
    }

    /// Whether a ray through `slot`'s screen position hits this object.
    ///
    /// Layers are consulted in precedence order and the first layer with any
    /// hit decides. Returns `false` for unknown or never-sampled slots.
    #[must_use]
    pub fn is_touched(&self, slot: usize, camera: &dyn Projection, physics: &dyn HitTest) -> bool {
        let Some(s) = self.slots.get(slot).filter(|s| s.sampled) else {
            return false;
        };
        let ray = camera.screen_ray(s.screen_position);
        physics
            .first_hit(&ray, self.hit_test.precedence())
            .is_some_and(|(_, hit)| hit == self.collider)
    }

    /// Releases every input binding. Safe to call more than once.
    pub fn stop(&mut self, input: &mut dyn InputSource) {
        for handle in self.handles.drain(..) {
            input.unbind(handle);
        }
    }

    /// The world position of `slot`, or an error if its projection is not
    /// finite.
    pub fn world_position(&self, slot: usize) -> Result<Vec3, GestureError> {
        self.slots
            .get(slot)
            .map(|s| s.world_position)
            .filter(|w| w.is_finite())
            .ok_or(GestureError::NonFiniteProjection { slot })
    }

    /// Slot `k`, if it exists.
    #[must_use]
    pub fn slot(&self, k: usize) -> Option<&TouchSlot> {
        self.slots.get(k)
    }

    /// Whether slot `k` exists and is down.
    #[must_use]
    pub fn is_pressed(&self, k: usize) -> bool {
        self.slots.get(k).is_some_and(|s| s.pressed)
    }

    /// Number of slots in the table.
    #[must_use]
    pub fn max_slots(&self) -> u8 {
        // `start` validated the length against `MAX_SLOTS`.
        u8::try_from(self.slots.len()).unwrap_or(MAX_SLOTS)
    }

    /// Depth of the plane contacts are projected onto.
    #[must_use]
    pub fn depth(&self) -> f64 {
        self.depth
    }

    /// The collision proxy this tracker tests against.
    #[must_use]
    pub fn collider(&self) -> ColliderId {
        self.collider
    }

    /// Layer precedence used by [`is_touched`](Self::is_touched).
    #[must_use]
    pub fn hit_test(&self) -> &HitTestConfig {
        &self.hit_test
    }

    /// The slot descriptors this tracker listens to.
    #[must_use]
    pub fn bindings(&self) -> &BindingTable {
        &self.table
    }

    /// Whether any binding is still enabled.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        !self.handles.is_empty()
    }
}
