// Copyright 2025 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared debug overlay settings.
//!
//! Debugging one dispatcher in isolation is rarely useful, so the overlay mode is shared: every
//! dispatcher constructed with a clone of the same [`DebugSettings`] handle (including the nested
//! dispatchers of subcontexts) reads it on each render call.
//!
//! ```
//! use lamina_dispatch::{DebugOverlay, DebugSettings, Dispatcher};
//! use lamina_dispatch::surface::Surface;
//!
//! let settings = DebugSettings::default();
//! let a: Dispatcher<dyn Surface> = Dispatcher::with_debug(settings.clone());
//! let b: Dispatcher<dyn Surface> = Dispatcher::with_debug(settings.clone());
//!
//! settings.set(DebugOverlay::FOCUS_BOXES | DebugOverlay::CLIP_REGION);
//! assert_eq!(a.debug().get(), b.debug().get());
//! ```

use alloc::rc::Rc;
use core::cell::Cell;

use crate::surface::Color;

bitflags::bitflags! {
    /// Debug overlay mode. Empty is off.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DebugOverlay: u8 {
        /// Outline the click-focus and hover-focus elements.
        const FOCUS_BOXES = 0b0000_0001;
        /// Outline the clip region each dispatcher renders into.
        const CLIP_REGION = 0b0000_0010;
    }
}

impl DebugOverlay {
    /// Outline color for the click-focus element.
    pub const CLICK_FOCUS_COLOR: Color = Color::rgb(255, 64, 64);
    /// Outline color for the hover-focus element.
    pub const HOVER_FOCUS_COLOR: Color = Color::rgb(64, 160, 255);
    /// Outline color for the clip region.
    pub const CLIP_COLOR: Color = Color::rgb(64, 255, 96);
}

/// Cloneable handle to a shared [`DebugOverlay`] mode.
///
/// Clones observe each other's changes. The handle is `!Send`, matching the single-threaded
/// frame model of the dispatcher.
#[derive(Clone, Debug, Default)]
pub struct DebugSettings {
    overlay: Rc<Cell<DebugOverlay>>,
}

impl DebugSettings {
    /// Creates a handle with the given initial mode.
    #[must_use]
    pub fn new(overlay: DebugOverlay) -> Self {
        Self {
            overlay: Rc::new(Cell::new(overlay)),
        }
    }

    /// Current mode.
    #[must_use]
    pub fn get(&self) -> DebugOverlay {
        self.overlay.get()
    }

    /// Changes the mode for every holder of this handle.
    pub fn set(&self, overlay: DebugOverlay) {
        self.overlay.set(overlay);
    }

    /// Returns `true` if both handles share the same setting.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.overlay, &other.overlay)
    }
}
