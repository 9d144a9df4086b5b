// Copyright 2025 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The element contract and the callback context handed to elements.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use kurbo::{Point, Rect, Vec2};

use crate::debug::DebugSettings;
use crate::input::{HoverEvent, KeyEvent, PointerEvent};
use crate::queue::MutationQueue;
use crate::surface::Surface;
use crate::types::{ElementEvent, ElementId};

/// Anything that participates in a [`Dispatcher`](crate::Dispatcher).
///
/// Only [`Element::bounds`] and [`Element::translate`] are required; every callback defaults to
/// doing nothing. Bounds are absolute coordinates in the dispatcher's space.
///
/// ## Pointer channels
///
/// Each frame the dispatcher resolves, per pointer, which element receives each of three
/// channels: *press* (buttons that went down), *held* (buttons that are down), and *hover*. Only
/// the topmost element under the pointer receives a channel's primary callback. Every other
/// element receives the matching `*_elsewhere` callback, which is where transient state such as
/// highlights should be cleared.
///
/// ## Lifecycle
///
/// [`Element::destroy`] is called exactly once, when the element leaves its dispatcher, whether
/// through an explicit removal or because it reported [`Element::is_dead`].
pub trait Element<S: Surface + ?Sized> {
    /// Bounding box in absolute coordinates.
    fn bounds(&self) -> Rect;

    /// Moves the element (and anything it owns) by `delta`.
    fn translate(&mut self, delta: Vec2);

    /// Moves the element so its bounds start at `origin`.
    fn set_origin(&mut self, origin: Point) {
        let delta = origin - self.bounds().origin();
        self.translate(delta);
    }

    /// Depth key. Higher depth paints above and is hit-tested before lower depth.
    fn depth(&self) -> i32 {
        0
    }

    /// Returns `true` if `point` hits the element. Defaults to the half-open bounds.
    fn hit_test(&self, point: Point) -> bool {
        self.bounds().contains(point)
    }

    /// Returns `true` once the element wants to be reaped at the end of the frame.
    fn is_dead(&self) -> bool {
        false
    }

    /// Per-frame update with the time delta in seconds.
    fn update(&mut self, cx: &mut EventCx<'_, S>, dt: f64) {
        let _ = (cx, dt);
    }

    /// Draws the element. `clip` is the element's bounds intersected with the caller's clip.
    fn render(&mut self, surface: &mut S, clip: Rect) {
        let _ = (surface, clip);
    }

    /// A button of a pointer over this element went down.
    fn pointer_pressed(&mut self, cx: &mut EventCx<'_, S>, event: &PointerEvent) {
        let _ = (cx, event);
    }

    /// A button went down but another element (or nothing) received it.
    fn pointer_pressed_elsewhere(&mut self, cx: &mut EventCx<'_, S>, event: &PointerEvent) {
        let _ = (cx, event);
    }

    /// A button of a pointer over this element is held down.
    fn pointer_held(&mut self, cx: &mut EventCx<'_, S>, event: &PointerEvent) {
        let _ = (cx, event);
    }

    /// A button is held down but another element (or nothing) received it.
    fn pointer_held_elsewhere(&mut self, cx: &mut EventCx<'_, S>, event: &PointerEvent) {
        let _ = (cx, event);
    }

    /// A pointer hovers this element.
    fn hovered(&mut self, cx: &mut EventCx<'_, S>, event: &HoverEvent) {
        let _ = (cx, event);
    }

    /// No pointer hovers this element this frame.
    fn hovered_elsewhere(&mut self, cx: &mut EventCx<'_, S>) {
        let _ = cx;
    }

    /// A buffered key event, delivered only while this element holds click focus.
    fn key_input(&mut self, cx: &mut EventCx<'_, S>, key: &KeyEvent) {
        let _ = (cx, key);
    }

    /// Called once after a non-empty batch of [`Element::key_input`] calls.
    fn key_input_done(&mut self, cx: &mut EventCx<'_, S>) {
        let _ = cx;
    }

    /// The element has left its dispatcher. Called exactly once.
    fn destroy(&mut self) {}

    /// The element joined a dispatcher reading `debug`, or that dispatcher's settings were
    /// replaced. Elements owning nested dispatchers pass the handle on.
    fn share_debug(&mut self, debug: &DebugSettings) {
        let _ = debug;
    }

    /// Enables [`Dispatcher::downcast_ref`](crate::Dispatcher::downcast_ref).
    fn as_any(&self) -> Option<&dyn Any> {
        None
    }

    /// Enables [`Dispatcher::downcast_mut`](crate::Dispatcher::downcast_mut).
    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        None
    }
}

/// Context handed to element callbacks.
///
/// It identifies the receiving element and gives access to the owning dispatcher's deferred
/// mutation queue and notification outbox. Nothing requested here takes effect until the
/// dispatcher's next flush, so an element may remove itself mid-pass.
pub struct EventCx<'a, S: Surface + ?Sized> {
    id: ElementId,
    queue: &'a mut MutationQueue<Box<dyn Element<S>>>,
    outbox: &'a mut Vec<(ElementId, ElementEvent)>,
}

impl<S: Surface + ?Sized> fmt::Debug for EventCx<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventCx")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl<'a, S: Surface + ?Sized> EventCx<'a, S> {
    pub(crate) fn new(
        id: ElementId,
        queue: &'a mut MutationQueue<Box<dyn Element<S>>>,
        outbox: &'a mut Vec<(ElementId, ElementEvent)>,
    ) -> Self {
        Self { id, queue, outbox }
    }

    /// Handle of the element receiving the callback.
    #[must_use]
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Queues a sibling element for addition at the next flush.
    pub fn add_element(&mut self, element: Box<dyn Element<S>>) -> ElementId {
        self.queue.request_add(element)
    }

    /// Queues an element of the same dispatcher for removal at the next flush.
    pub fn remove_element(&mut self, id: ElementId) {
        self.queue.request_remove(id);
    }

    /// Queues the receiving element for removal at the next flush.
    pub fn remove_self(&mut self) {
        self.queue.request_remove(self.id);
    }

    /// Raises a notification for the container that owns this dispatcher.
    pub fn emit(&mut self, event: ElementEvent) {
        self.outbox.push((self.id, event));
    }
}
