// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An error sink that keeps every report.

use alloc::string::String;
use alloc::vec::Vec;

use grasp_core::error::{ErrorSink, GestureError};

/// An [`ErrorSink`] that stores `(message, error)` pairs in arrival order.
#[derive(Clone, Debug, Default)]
pub struct CollectedErrors {
    entries: Vec<(String, GestureError)>,
}

impl CollectedErrors {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All reports so far.
    #[must_use]
    pub fn entries(&self) -> &[(String, GestureError)] {
        &self.entries
    }

    /// Just the errors, in arrival order.
    pub fn errors(&self) -> impl Iterator<Item = &GestureError> + '_ {
        self.entries.iter().map(|(_, e)| e)
    }

    /// Number of reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forgets every report.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl ErrorSink for CollectedErrors {
    fn report(&mut self, message: &str, error: &GestureError) {
        self.entries.push((String::from(message), error.clone()));
    }
}
