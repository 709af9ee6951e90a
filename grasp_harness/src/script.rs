// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-by-frame input sequences.

use alloc::vec;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

use grasp_core::input::InputEvent;

/// A list of frames, each holding the input events delivered in that frame.
///
/// Every builder method appends frames; nothing is ever merged into an
/// earlier frame.
///
/// ```
/// use grasp_harness::Script;
/// use kurbo::Point;
///
/// let center = Point::new(500.0, 500.0);
/// let script = Script::new()
///     .touch_down(0, center)
///     .touch_down(1, center + (100.0, 0.0))
///     .pinch(center, 100.0, 130.0, 10)
///     .touch_up(1)
///     .touch_up(0);
/// assert_eq!(script.len(), 14);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Script {
    frames: Vec<Vec<InputEvent>>,
}

impl Script {
    /// Creates an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one frame with exactly these events.
    #[must_use]
    pub fn frame(mut self, events: impl IntoIterator<Item = InputEvent>) -> Self {
        self.frames.push(events.into_iter().collect());
        self
    }

    /// Appends `count` frames without input.
    #[must_use]
    pub fn hold(mut self, count: usize) -> Self {
        self.frames.extend((0..count).map(|_| Vec::new()));
        self
    }

    /// Contact `k` moves to `at` and goes down in the same frame.
    #[must_use]
    pub fn touch_down(self, k: u8, at: Point) -> Self {
        self.frame([InputEvent::touch_moved(k, at), InputEvent::touch_pressed(k)])
    }

    /// Contact `k` moves to `at`.
    #[must_use]
    pub fn touch_move(self, k: u8, at: Point) -> Self {
        self.frame([InputEvent::touch_moved(k, at)])
    }

    /// Contact `k` goes up.
    #[must_use]
    pub fn touch_up(self, k: u8) -> Self {
        self.frame([InputEvent::touch_released(k)])
    }

    /// The mouse moves to `at` and its button goes down.
    #[must_use]
    pub fn mouse_down(self, at: Point) -> Self {
        self.frame([InputEvent::mouse_moved(at), InputEvent::mouse_button(true)])
    }

    /// The mouse button goes up.
    #[must_use]
    pub fn mouse_up(self) -> Self {
        self.frame([InputEvent::mouse_button(false)])
    }

    /// Contact `k` moves in a straight line from `from` to `to` over
    /// `frames` frames, ending exactly on `to`.
    #[must_use]
    pub fn drag(mut self, k: u8, from: Point, to: Point, frames: usize) -> Self {
        for t in fractions(frames) {
            self.frames
                .push(vec![InputEvent::touch_moved(k, from.lerp(to, t))]);
        }
        self
    }

    /// Contact 1 moves radially away from (or towards) contact 0, which
    /// stays at `center`, changing their distance from `from_radius` to
    /// `to_radius` over `frames` frames. Contact 1 starts on the `+x` side
    /// of `center`.
    #[must_use]
    pub fn pinch(self, center: Point, from_radius: f64, to_radius: f64, frames: usize) -> Self {
        self.drag(
            1,
            center + Vec2::new(from_radius, 0.0),
            center + Vec2::new(to_radius, 0.0),
            frames,
        )
    }

    /// Contact 1 orbits contact 0 (at `center`) at a fixed `radius`, from
    /// `from_degrees` to `to_degrees` (counterclockwise positive) over
    /// `frames` frames.
    #[must_use]
    pub fn twist(
        mut self,
        center: Point,
        radius: f64,
        from_degrees: f64,
        to_degrees: f64,
        frames: usize,
    ) -> Self {
        for t in fractions(frames) {
            let angle = (from_degrees + (to_degrees - from_degrees) * t).to_radians();
            let at = center + Vec2::new(angle.cos(), angle.sin()) * radius;
            self.frames.push(vec![InputEvent::touch_moved(1, at)]);
        }
        self
    }

    /// The frames in delivery order.
    #[must_use]
    pub fn frames(&self) -> &[Vec<InputEvent>] {
        &self.frames
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the script has no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// `1/n, 2/n, ..., 1`.
fn fractions(n: usize) -> impl Iterator<Item = f64> {
    let n = n.max(1);
    (1..=n).map(move |i| i as f64 / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grasp_core::input::{Binding, InputValue};

    fn last_position(events: &[InputEvent]) -> Point {
        match events.last().map(|e| e.value) {
            Some(InputValue::Position(p)) => p,
            other => panic!("expected a position event, got {other:?}"),
        }
    }

    #[test]
    fn drag_ends_on_target() {
        let script = Script::new().drag(0, Point::new(0.0, 0.0), Point::new(40.0, 20.0), 4);
        assert_eq!(script.len(), 4);
        assert_eq!(last_position(&script.frames()[0]), Point::new(10.0, 5.0));
        assert_eq!(last_position(&script.frames()[3]), Point::new(40.0, 20.0));
    }

    #[test]
    fn twist_keeps_radius() {
        let center = Point::new(500.0, 500.0);
        let script = Script::new().twist(center, 100.0, 0.0, 90.0, 3);
        for frame in script.frames() {
            let r = (last_position(frame) - center).hypot();
            assert!((r - 100.0).abs() < 1e-9, "radius drifted to {r}");
            assert_eq!(frame[0].binding, Binding::TouchPosition(1));
        }
        let end = last_position(&script.frames()[2]);
        assert!((end.x - 500.0).abs() < 1e-9 && (end.y - 600.0).abs() < 1e-9);
    }

    #[test]
    fn touch_down_moves_before_pressing() {
        let script = Script::new().touch_down(2, Point::new(1.0, 1.0)).hold(2);
        assert_eq!(script.len(), 3);
        let first = &script.frames()[0];
        assert!(first[0].binding.is_position());
        assert_eq!(first[1].value, InputValue::Pressed);
        assert!(script.frames()[1].is_empty());
    }
}
