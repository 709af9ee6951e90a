// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame clock types.
//!
//! [`HostTime`] is a point on the host's monotonic clock in platform ticks,
//! and [`Timebase`] carries the rational ticks-to-nanoseconds factor
//! (`nanoseconds = ticks * numer / denom`). A [`FrameTick`] is delivered once
//! per rendered frame; the scene derives the elapsed frame time that drives
//! gesture smoothing from consecutive ticks.

use core::fmt;

/// A point in time expressed as platform-native monotonic ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Returns the duration between `self` and an earlier time, or zero if
    /// `earlier` is after `self`.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }

    /// Converts this host time to nanoseconds using the given timebase.
    #[inline]
    #[must_use]
    pub const fn to_nanos(self, timebase: Timebase) -> u64 {
        timebase.ticks_to_nanos(self.0)
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({})", self.0)
    }
}

/// Rational conversion factor from ticks to nanoseconds.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timebase {
    /// Numerator of the ticks-to-nanoseconds ratio.
    pub numer: u32,
    /// Denominator of the ticks-to-nanoseconds ratio.
    pub denom: u32,
}

impl Timebase {
    /// A timebase where ticks are already nanoseconds (1:1).
    pub const NANOS: Self = Self { numer: 1, denom: 1 };

    /// Creates a new timebase with the given numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if `denom` is zero.
    #[inline]
    #[must_use]
    pub const fn new(numer: u32, denom: u32) -> Self {
        assert!(denom != 0, "timebase denominator must not be zero");
        Self { numer, denom }
    }

    /// Converts a tick count to nanoseconds.
    ///
    /// Uses a `u128` intermediate to avoid overflow. A timebase built
    /// literally with a zero `denom` saturates to `u64::MAX` instead of
    /// dividing by zero.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u128 intermediate avoids overflow; truncation back to u64 is intentional"
    )]
    pub const fn ticks_to_nanos(self, ticks: u64) -> u64 {
        match (ticks as u128 * self.numer as u128).checked_div(self.denom as u128) {
            Some(wide) => wide as u64,
            None => u64::MAX,
        }
    }

    /// Converts nanoseconds to a tick count.
    ///
    /// A zero `numer` saturates to `u64::MAX`.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u128 intermediate avoids overflow; truncation back to u64 is intentional"
    )]
    pub const fn nanos_to_ticks(self, nanos: u64) -> u64 {
        match (nanos as u128 * self.denom as u128).checked_div(self.numer as u128) {
            Some(wide) => wide as u64,
            None => u64::MAX,
        }
    }
}

impl fmt::Debug for Timebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timebase({}/{})", self.numer, self.denom)
    }
}

/// A duration in platform-native ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(pub u64);

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Self(0);

    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Creates a duration from a nanosecond value and timebase.
    #[inline]
    #[must_use]
    pub const fn from_nanos(nanos: u64, timebase: Timebase) -> Self {
        Self(timebase.nanos_to_ticks(nanos))
    }

    /// Converts this duration to fractional seconds.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "frame-scale durations are far below 2^52 nanoseconds"
    )]
    pub const fn as_secs_f64(self, timebase: Timebase) -> f64 {
        timebase.ticks_to_nanos(self.0) as f64 / 1_000_000_000.0
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({})", self.0)
    }
}

/// A frame opportunity delivered by the host's render loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameTick {
    /// Monotonically increasing frame counter.
    pub frame_index: u64,
    /// Host time when the frame began.
    pub now: HostTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nanos_round_trip_macos_style() {
        // 125/3: ticks run at 24 MHz.
        let tb = Timebase::new(125, 3);
        let ticks = 24_000_000_u64;
        assert_eq!(tb.ticks_to_nanos(ticks), 1_000_000_000, "24 MHz → 1s");
        assert_eq!(tb.nanos_to_ticks(1_000_000_000), ticks);
    }

    #[test]
    fn frame_duration_in_seconds() {
        let d = Duration::from_nanos(16_666_667, Timebase::NANOS);
        let secs = d.as_secs_f64(Timebase::NANOS);
        assert!((secs - 1.0 / 60.0).abs() < 1e-6, "≈60 Hz frame, got {secs}");
    }

    #[test]
    fn zero_divisor_saturates() {
        let degenerate = Timebase { numer: 0, denom: 0 };
        assert_eq!(degenerate.ticks_to_nanos(5), u64::MAX);
        assert_eq!(degenerate.nanos_to_ticks(5), u64::MAX);
        assert_eq!(Duration(1).as_secs_f64(degenerate), u64::MAX as f64 / 1e9);
    }

    #[test]
    #[should_panic(expected = "timebase denominator must not be zero")]
    fn new_rejects_zero_denominator() {
        let _ = Timebase::new(1, 0);
    }

    #[test]
    fn host_time_saturates() {
        let t = HostTime(1000);
        assert_eq!(t.saturating_duration_since(HostTime(1500)), Duration::ZERO);
        assert_eq!(t.saturating_duration_since(HostTime(400)), Duration(600));
    }
}
