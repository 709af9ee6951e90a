// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An input source that keeps a ledger of live bindings.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use grasp_core::error::GestureError;
use grasp_core::input::{Binding, BindingHandle, InputSource};

/// An [`InputSource`] that records every binding it hands out.
///
/// Tests use the ledger to check that objects release their controls when
/// they stop. Controls passed to [`refuse`](Self::refuse) fail to bind with
/// [`GestureError::BindingUnavailable`].
#[derive(Clone, Debug, Default)]
pub struct LedgerInput {
    next: u64,
    live: BTreeMap<BindingHandle, Binding>,
    refused: Vec<Binding>,
}

impl LedgerInput {
    /// Creates a ledger that accepts every binding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes future attempts to bind `binding` fail.
    pub fn refuse(&mut self, binding: Binding) {
        if !self.refused.contains(&binding) {
            self.refused.push(binding);
        }
    }

    /// Number of bindings currently enabled.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Number of live handles for `binding`.
    #[must_use]
    pub fn live_for(&self, binding: Binding) -> usize {
        self.live.values().filter(|b| **b == binding).count()
    }
}

impl InputSource for LedgerInput {
    fn bind(&mut self, binding: Binding) -> Result<BindingHandle, GestureError> {
        if self.refused.contains(&binding) {
            return Err(GestureError::BindingUnavailable(binding));
        }
        let handle = BindingHandle(self.next);
        self.next += 1;
        self.live.insert(handle, binding);
        Ok(handle)
    }

    fn unbind(&mut self, handle: BindingHandle) {
        self.live.remove(&handle);
    }
}
