// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sphere colliders on named layers.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use grasp_core::geometry::{Ray, Vec3};
use grasp_core::hit_test::{ColliderId, HitTest, LayerName};
use grasp_core::scene::{FrameChanges, Scene};
use grasp_core::sink::TransformSink;

/// One sphere collider.
#[derive(Clone, Debug, PartialEq)]
pub struct Sphere {
    /// Handle handed to touchable objects.
    pub collider: ColliderId,
    /// Layer the sphere lives on.
    pub layer: LayerName,
    /// Center in world space.
    pub center: Vec3,
    /// Radius at unit scale.
    pub base_radius: f64,
    /// Current radius.
    pub radius: f64,
}

impl Sphere {
    /// Distance along `ray` to the nearest surface point in front of the
    /// origin, if the ray hits.
    #[must_use]
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let oc = self.center - ray.origin;
        let along = oc.dot(ray.direction);
        let off_axis_sq = oc.dot(oc) - along * along;
        let r_sq = self.radius * self.radius;
        if off_axis_sq > r_sq {
            return None;
        }
        let half_chord = (r_sq - off_axis_sq).sqrt();
        let (near, far) = (along - half_chord, along + half_chord);
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            Some(far)
        } else {
            None
        }
    }
}

/// A [`HitTest`] source backed by sphere colliders.
///
/// Layers must be registered (directly or by adding a sphere to them) before
/// [`has_layer`](HitTest::has_layer) reports them.
#[derive(Clone, Debug, Default)]
pub struct SphereWorld {
    spheres: Vec<Sphere>,
    layers: Vec<LayerName>,
}

impl SphereWorld {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a layer that may stay empty.
    pub fn add_layer(&mut self, layer: &str) {
        if !self.layers.iter().any(|l| l.as_str() == layer) {
            self.layers.push(LayerName::new(layer));
        }
    }

    /// Adds a sphere on `layer` and returns its collider handle.
    pub fn add_sphere(&mut self, layer: &str, center: Vec3, radius: f64) -> ColliderId {
        self.add_layer(layer);
        let collider = ColliderId(u32::try_from(self.spheres.len()).unwrap_or(u32::MAX));
        self.spheres.push(Sphere {
            collider,
            layer: LayerName::new(layer),
            center,
            base_radius: radius,
            radius,
        });
        collider
    }

    /// The sphere behind a collider handle.
    #[must_use]
    pub fn sphere(&self, collider: ColliderId) -> Option<&Sphere> {
        self.spheres.iter().find(|s| s.collider == collider)
    }

    /// Moves a sphere. Returns `false` for an unknown collider.
    pub fn set_center(&mut self, collider: ColliderId, center: Vec3) -> bool {
        match self.spheres.iter_mut().find(|s| s.collider == collider) {
            Some(sphere) => {
                sphere.center = center;
                true
            }
            None => false,
        }
    }

    /// All spheres in insertion order.
    #[must_use]
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }
}

impl HitTest for SphereWorld {
    fn raycast(&self, ray: &Ray, layer: &str) -> Option<ColliderId> {
        self.spheres
            .iter()
            .filter(|s| s.layer.as_str() == layer)
            .filter_map(|s| s.intersect(ray).map(|t| (t, s.collider)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, collider)| collider)
    }

    fn has_layer(&self, layer: &str) -> bool {
        self.layers.iter().any(|l| l.as_str() == layer)
    }

    fn layer_of(&self, collider: ColliderId) -> Option<LayerName> {
        self.sphere(collider).map(|s| s.layer.clone())
    }
}

impl TransformSink for SphereWorld {
    fn apply(&mut self, scene: &Scene, changes: &FrameChanges) {
        for &idx in &changes.poses {
            let (Some(pose), Some(collider)) = (scene.pose_at(idx), scene.collider_at(idx)) else {
                continue;
            };
            if let Some(sphere) = self.spheres.iter_mut().find(|s| s.collider == collider) {
                // The collider is a unit sphere in object space; its world
                // radius follows the longest transformed axis.
                let m = pose.to_transform();
                let center = m.transform_point(Vec3::ZERO);
                let grow = [Vec3::X, Vec3::Y, Vec3::Z]
                    .into_iter()
                    .map(|axis| (m.transform_point(axis) - center).length())
                    .fold(0.0, f64::max);
                sphere.center = center;
                sphere.radius = sphere.base_radius * grow;
            }
        }
    }
}
