// Copyright 2025 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lamina Layout: self-arranging containers for [`lamina_dispatch`].
//!
//! ## Overview
//!
//! Both containers are [`Element`](lamina_dispatch::Element)s that own a nested
//! [`Subcontext`](lamina_dispatch::Subcontext), so their children are clipped to the container,
//! move with it, and receive pointer and key input through it.
//!
//! - [`ListLayout`] stacks children along an [`Axis`] with fixed spacing and grows along the
//!   axis to fit them. It re-flows only the children after a change.
//! - [`ScrollLayout`] shows a fixed-size viewport onto a list and adds a draggable scroll bar.
//!
//! Children that change size raise [`ElementEvent::Resize`](lamina_dispatch::ElementEvent);
//! a list re-flows in response only for children registered with
//! [`ListLayout::add_listener`]. [`Label`] is a text element that raises the notification when
//! its text changes size.
//!
//! ## Example
//!
//! ```
//! use kurbo::{Point, Rect};
//! use lamina_dispatch::Dispatcher;
//! use lamina_dispatch::input::InputState;
//! use lamina_dispatch::surface::{Surface, TextMetrics};
//! use lamina_layout::{Axis, Label, ListLayout};
//!
//! struct Mono;
//!
//! impl TextMetrics for Mono {
//!     fn line_height(&self) -> f64 { 10.0 }
//!     fn width(&self, text: &str) -> f64 { 6.0 * text.chars().count() as f64 }
//! }
//!
//! let mut list: ListLayout<dyn Surface> =
//!     ListLayout::new(Rect::new(0.0, 0.0, 100.0, 0.0), Axis::Vertical).with_spacing(4.0);
//! let title = list.add_element(Box::new(Label::new(&Mono, "title", Point::ZERO)));
//! list.add_element(Box::new(Label::new(&Mono, "body", Point::ZERO)));
//! list.add_listener(title);
//!
//! let mut ui: Dispatcher<dyn Surface> = Dispatcher::new();
//! let id = ui.add_element(Box::new(list));
//! ui.update(&InputState::new(), 1.0 / 60.0);
//!
//! let list = ui.downcast_mut::<ListLayout<dyn Surface>>(id).unwrap();
//! list.child_mut::<Label>(title).unwrap().set_text(&Mono, "two\nlines");
//! ui.update(&InputState::new(), 1.0 / 60.0);
//!
//! let list = ui.downcast_ref::<ListLayout<dyn Surface>>(id).unwrap();
//! assert_eq!(list.content_extent(), 20.0 + 4.0 + 10.0);
//! ```
//!
//! ## Logging
//!
//! Re-flows and scroll extent changes are reported through the [`log`] facade at `debug` level.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod axis;
mod label;
mod list;
mod scroll;

#[cfg(test)]
mod test_util;

pub use axis::{Align, Axis};
pub use label::Label;
pub use list::ListLayout;
pub use scroll::{ScrollAlign, ScrollLayout};
