// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Camera projection between screen pixels and world space.
//!
//! Screen coordinates are pixels with the origin at the bottom-left corner of
//! the viewport and `y` pointing up. Depth is measured along the camera's
//! forward axis, so un-projecting at a fixed depth places points on a plane
//! parallel to the image plane.

use kurbo::{Point, Size};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::geometry::{Quat, Ray, Vec3};

/// Fraction of the viewport kept clear on every side by
/// [`Projection::is_in_view`] callers that want objects comfortably inside
/// the frame.
pub const DEFAULT_VIEW_MARGIN: f64 = 0.15;

/// The camera collaborator.
pub trait Projection {
    /// Size of the viewport in pixels.
    fn viewport_size(&self) -> Size;

    /// Projects a world point to screen pixels; `z` of the result is the
    /// depth in front of the camera (negative behind it).
    fn world_to_screen(&self, world: Vec3) -> Vec3;

    /// Un-projects a screen point onto the plane at `depth`.
    fn screen_to_world(&self, screen: Point, depth: f64) -> Vec3;

    /// The ray from the camera through a screen point.
    fn screen_ray(&self, screen: Point) -> Ray;

    /// Projects a world point to normalized viewport coordinates (`0..1` on
    /// both axes inside the viewport), with depth in `z`.
    fn world_to_viewport(&self, world: Vec3) -> Vec3 {
        let s = self.world_to_screen(world);
        let size = self.viewport_size();
        Vec3::new(s.x / size.width, s.y / size.height, s.z)
    }

    /// Whether `world` lies in front of the camera and inside the viewport
    /// shrunk by `margin` on each side.
    fn is_in_view(&self, world: Vec3, margin: f64) -> bool {
        let v = self.world_to_viewport(world);
        let (lo, hi) = (margin, 1.0 - margin);
        v.z >= 0.0 && (lo..=hi).contains(&v.x) && (lo..=hi).contains(&v.y)
    }
}

/// A perspective camera with a symmetric vertical field of view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinholeCamera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Camera orientation; the unrotated camera looks along `+Z` with `+Y`
    /// up.
    pub orientation: Quat,
    /// Vertical field of view in degrees.
    pub vertical_fov_degrees: f64,
    /// Viewport size in pixels.
    pub viewport: Size,
}

impl PinholeCamera {
    /// A camera at the origin looking along `+Z`.
    #[must_use]
    pub fn new(vertical_fov_degrees: f64, viewport: Size) -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            vertical_fov_degrees,
            viewport,
        }
    }

    /// Tangent of half the vertical field of view.
    fn half_fov_tan(&self) -> f64 {
        let half = self.vertical_fov_degrees * core::f64::consts::PI / 360.0;
        half.sin() / half.cos()
    }

    /// Maps a screen point to camera-space `(x, y)` at unit depth.
    fn screen_to_unit_plane(&self, screen: Point) -> (f64, f64) {
        let half_h = self.viewport.height * 0.5;
        let tan = self.half_fov_tan();
        (
            (screen.x - self.viewport.width * 0.5) / half_h * tan,
            (screen.y - half_h) / half_h * tan,
        )
    }
}

impl Projection for PinholeCamera {
    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn world_to_screen(&self, world: Vec3) -> Vec3 {
        let c = self.orientation.conjugate().rotate(world - self.position);
        let half_h = self.viewport.height * 0.5;
        let k = half_h / (c.z * self.half_fov_tan());
        Vec3::new(
            self.viewport.width * 0.5 + c.x * k,
            half_h + c.y * k,
            c.z,
        )
    }

    fn screen_to_world(&self, screen: Point, depth: f64) -> Vec3 {
        let (ux, uy) = self.screen_to_unit_plane(screen);
        let c = Vec3::new(ux * depth, uy * depth, depth);
        self.position + self.orientation.rotate(c)
    }

    fn screen_ray(&self, screen: Point) -> Ray {
        let (ux, uy) = self.screen_to_unit_plane(screen);
        Ray::new(
            self.position,
            self.orientation.rotate(Vec3::new(ux, uy, 1.0)),
        )
    }
}
