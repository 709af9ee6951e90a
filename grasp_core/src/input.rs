// Copyright 2026 the Grasp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input bindings, events, and the input-source collaborator.
//!
//! A [`Binding`] names one physical control. Every binding maps to a logical
//! *slot*: the mouse and the first touchscreen contact share slot 0, and
//! touchscreen contact `k` is slot `k`. The set of bindings an object listens
//! to is fixed once per object by a [`BindingTable`] sized to its slot count.
//!
//! Bindings are enabled through the host's [`InputSource`] when an object
//! starts and must be released again when it stops; see
//! [`TouchTracker::stop`](crate::tracker::TouchTracker::stop).

use alloc::vec::Vec;

use kurbo::Point;

use crate::error::GestureError;

/// One physical control that can deliver events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Binding {
    /// Mouse cursor position.
    MousePosition,
    /// Primary mouse button.
    MouseButton,
    /// Position of touchscreen contact `k`.
    TouchPosition(u8),
    /// Press state of touchscreen contact `k`.
    TouchPress(u8),
}

impl Binding {
    /// The logical slot this control feeds.
    #[must_use]
    pub const fn slot(self) -> usize {
        match self {
            Self::MousePosition | Self::MouseButton => 0,
            Self::TouchPosition(k) | Self::TouchPress(k) => k as usize,
        }
    }

    /// Whether this control reports positions (as opposed to presses).
    #[must_use]
    pub const fn is_position(self) -> bool {
        matches!(self, Self::MousePosition | Self::TouchPosition(_))
    }
}

/// What a control reported.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputValue {
    /// A new screen-space position in pixels.
    Position(Point),
    /// The control went down.
    Pressed,
    /// The control went up.
    Released,
}

/// One event from the input source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputEvent {
    /// Which control fired.
    pub binding: Binding,
    /// What it reported.
    pub value: InputValue,
}

impl InputEvent {
    /// A position report for touch contact `k`.
    #[must_use]
    pub const fn touch_moved(k: u8, at: Point) -> Self {
        Self {
            binding: Binding::TouchPosition(k),
            value: InputValue::Position(at),
        }
    }

    /// A press for touch contact `k`.
    #[must_use]
    pub const fn touch_pressed(k: u8) -> Self {
        Self {
            binding: Binding::TouchPress(k),
            value: InputValue::Pressed,
        }
    }

    /// A release for touch contact `k`.
    #[must_use]
    pub const fn touch_released(k: u8) -> Self {
        Self {
            binding: Binding::TouchPress(k),
            value: InputValue::Released,
        }
    }

    /// A mouse cursor position report.
    #[must_use]
    pub const fn mouse_moved(at: Point) -> Self {
        Self {
            binding: Binding::MousePosition,
            value: InputValue::Position(at),
        }
    }

    /// A primary-button press or release.
    #[must_use]
    pub const fn mouse_button(pressed: bool) -> Self {
        Self {
            binding: Binding::MouseButton,
            value: if pressed {
                InputValue::Pressed
            } else {
                InputValue::Released
            },
        }
    }
}

/// A live registration returned by [`InputSource::bind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingHandle(pub u64);

/// The host's input system.
///
/// Implementations enable the physical control behind a binding for as long
/// as the handle is live. Every successful [`bind`](Self::bind) must
/// eventually be paired with an [`unbind`](Self::unbind); handles that are
/// never unbound keep controls enabled across scene reloads.
pub trait InputSource {
    /// Enables `binding` and returns a handle for releasing it.
    fn bind(&mut self, binding: Binding) -> Result<BindingHandle, GestureError>;

    /// Releases a handle previously returned by [`bind`](Self::bind).
    fn unbind(&mut self, handle: BindingHandle);
}

/// Position and press controls feeding one slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotBinding {
    /// The slot fed by these controls.
    pub slot: u8,
    /// Controls that report this slot's position.
    pub positions: [Option<Binding>; 2],
    /// Controls that report this slot's press state.
    pub presses: [Option<Binding>; 2],
}

impl SlotBinding {
    /// Every control in this descriptor.
    pub fn bindings(&self) -> impl Iterator<Item = Binding> + '_ {
        self.positions
            .iter()
            .chain(self.presses.iter())
            .filter_map(|b| *b)
    }
}

/// Fixed table of slot descriptors, configured once per object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingTable {
    slots: Vec<SlotBinding>,
}

impl BindingTable {
    /// Builds descriptors for slots `0..max_slots`.
    ///
    /// Slot 0 listens to both the mouse and the first touch contact; every
    /// other slot listens to its touch contact only.
    #[must_use]
    pub fn new(max_slots: u8) -> Self {
        let slots = (0..max_slots)
            .map(|k| {
                if k == 0 {
                    SlotBinding {
                        slot: 0,
                        positions: [Some(Binding::MousePosition), Some(Binding::TouchPosition(0))],
                        presses: [Some(Binding::MouseButton), Some(Binding::TouchPress(0))],
                    }
                } else {
                    SlotBinding {
                        slot: k,
                        positions: [Some(Binding::TouchPosition(k)), None],
                        presses: [Some(Binding::TouchPress(k)), None],
                    }
                }
            })
            .collect();
        Self { slots }
    }

    /// The slot descriptors, in slot order.
    #[must_use]
    pub fn slots(&self) -> &[SlotBinding] {
        &self.slots
    }

    /// Every control the table listens to.
    pub fn bindings(&self) -> impl Iterator<Item = Binding> + '_ {
        self.slots.iter().flat_map(SlotBinding::bindings)
    }
}
