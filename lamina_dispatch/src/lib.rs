// Copyright 2025 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lamina Dispatch: a frame-stepped, depth-ordered dispatcher for retained-mode UI elements.
//!
//! ## Overview
//!
//! A [`Dispatcher`] owns a set of [`Element`]s ordered by depth. Once per frame the embedding
//! application calls [`Dispatcher::update`] with an [`InputState`](input::InputState) snapshot and
//! then [`Dispatcher::render`] with a [`Surface`](surface::Surface). The dispatcher decides which
//! element is under each pointer, routes press, held, and hover to the topmost one, tells every
//! other element about it through "elsewhere" callbacks, and sends key input to the element that
//! was clicked last.
//!
//! ## Deferred mutation
//!
//! Elements are added and removed through a [`MutationQueue`](queue::MutationQueue). Requests
//! made during a pass (including an element removing itself) take effect at the start of the next
//! frame, so the iteration in progress is never invalidated. Handles are generational
//! [`ElementId`]s: a handle to a removed element never aliases a later one.
//!
//! ## Composition
//!
//! A [`Subcontext`] is an element that owns a nested dispatcher. It clips rendering to its
//! bounds, moves its children when it moves, and replays the pointer callbacks it receives into
//! the nested dispatcher. Layout containers (see the `lamina_layout` crate) are built on it.
//! Children talk to their container with [`ElementEvent`] notifications.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Rect, Vec2};
//! use lamina_dispatch::input::{Button, InputState, PointerId};
//! use lamina_dispatch::surface::Surface;
//! use lamina_dispatch::{Dispatcher, Element};
//!
//! struct Tile(Rect);
//!
//! impl Element<dyn Surface> for Tile {
//!     fn bounds(&self) -> Rect { self.0 }
//!     fn translate(&mut self, delta: Vec2) { self.0 = self.0 + delta; }
//! }
//!
//! let mut ui: Dispatcher<dyn Surface> = Dispatcher::new();
//! let tile = ui.add_element(Box::new(Tile(Rect::new(0.0, 0.0, 40.0, 20.0))));
//!
//! // Added elements join at the next frame.
//! assert_eq!(ui.iter().count(), 0);
//! let click = InputState::new()
//!     .pointer(PointerId::PRIMARY, Point::new(10.0, 10.0))
//!     .press(PointerId::PRIMARY, Button::Primary);
//! ui.update(&click, 1.0 / 60.0);
//! assert_eq!(ui.click_focus(), Some(tile));
//! ```
//!
//! ## Logging
//!
//! Membership changes are reported through the [`log`] facade at `debug` level and per-frame
//! routing decisions at `trace` level. No logger is installed by this crate.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod depth;
pub mod input;
pub mod queue;
pub mod surface;

mod debug;
mod dispatcher;
mod element;
mod subcontext;
mod types;

#[cfg(test)]
mod test_util;

pub use debug::{DebugOverlay, DebugSettings};
pub use dispatcher::Dispatcher;
pub use element::{Element, EventCx};
pub use subcontext::Subcontext;
pub use types::{ElementEvent, ElementId};
