// Copyright 2025 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types shared across the dispatcher: element handles and notifications.

use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

/// Identifier for an element owned by a [`Dispatcher`](crate::Dispatcher) (generational).
///
/// Handles are allocated when an element is *requested* for addition, so callers can hold on to
/// them before the element becomes a live member at the next flush. When an element is removed
/// its slot may be reused, but the generation is bumped so stale handles never alias the new
/// occupant.
///
/// Handles are only meaningful for the dispatcher that issued them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// A notification raised by an element for the container that owns its dispatcher.
///
/// Events are transient: they are queued while the dispatcher runs and drained by the owner
/// with [`Dispatcher::take_events`](crate::Dispatcher::take_events).
pub enum ElementEvent {
    /// The element changed its own size.
    ///
    /// List containers re-flow the children that follow the resized element.
    Resize,
    /// Application-defined payload.
    ///
    /// Containers that do not understand the payload forward it to their own container.
    Custom(Box<dyn Any>),
}

impl ElementEvent {
    /// Returns `true` for [`ElementEvent::Resize`].
    #[must_use]
    pub const fn is_resize(&self) -> bool {
        matches!(self, Self::Resize)
    }
}

impl fmt::Debug for ElementEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resize => f.write_str("Resize"),
            Self::Custom(_) => f.debug_tuple("Custom").finish_non_exhaustive(),
        }
    }
}
