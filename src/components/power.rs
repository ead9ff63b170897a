//! Power receiver component.
//!
//! Magnets only scan and pull while powered. An entity without a
//! [`PowerReceiver`] is treated as unconditionally powered, so scenes that do
//! not care about power do not need to attach one.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerReceiver {
    pub powered: bool,
}

impl Default for PowerReceiver {
    fn default() -> Self {
        Self { powered: true }
    }
}

impl PowerReceiver {
    pub fn new(powered: bool) -> Self {
        Self { powered }
    }
}

/// Whether an entity with the given (optional) receiver can draw power.
pub fn is_powered(receiver: Option<&PowerReceiver>) -> bool {
    receiver.is_none_or(|r| r.powered)
}
