// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Object identity.

use core::fmt;

/// A handle to a touchable object in a [`Scene`](crate::scene::Scene).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after an object is despawned and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl ObjectId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({}@gen{})", self.idx, self.generation)
    }
}
