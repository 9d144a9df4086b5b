// Copyright 2025 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An element that owns a nested dispatcher.

use alloc::boxed::Box;
use core::any::Any;
use core::fmt;
use kurbo::{Point, Rect, Vec2};
use smallvec::SmallVec;

use crate::debug::DebugSettings;
use crate::dispatcher::Dispatcher;
use crate::element::{Element, EventCx};
use crate::input::{
    ButtonState, HoverEvent, InputState, KeyEvent, PointerEvent, PointerId, PointerState,
};
use crate::surface::{ClipGuard, Surface, is_empty_rect};
use crate::types::{ElementEvent, ElementId};

/// An element that owns a nested [`Dispatcher`], enabling recursive composition.
///
/// Children store absolute coordinates, so moving the subcontext moves every child by the same
/// delta. Pointer callbacks the subcontext receives from its own dispatcher are accumulated and
/// replayed as a local [`InputState`] into the nested dispatcher during
/// [`Element::update`]. Children therefore see the same press/held/hover and "elsewhere"
/// callbacks they would see at the top level.
///
/// During [`Element::update`], `Custom` notifications raised by children are forwarded to the
/// subcontext's own container. Containers that manage their children (such as list layouts)
/// instead call [`Subcontext::step`] and drain [`Subcontext::take_events`] themselves.
///
/// ```
/// use kurbo::{Rect, Vec2};
/// use lamina_dispatch::surface::Surface;
/// use lamina_dispatch::{Element, Subcontext};
///
/// struct Square(Rect);
///
/// impl Element<dyn Surface> for Square {
///     fn bounds(&self) -> Rect { self.0 }
///     fn translate(&mut self, delta: Vec2) { self.0 = self.0 + delta; }
/// }
///
/// let mut panel: Subcontext<dyn Surface> = Subcontext::new(Rect::new(0.0, 0.0, 100.0, 100.0));
/// let child = panel.add_element(Box::new(Square(Rect::new(10.0, 10.0, 20.0, 20.0))));
///
/// Element::<dyn Surface>::translate(&mut panel, Vec2::new(5.0, 0.0));
/// assert_eq!(panel.dispatcher().get(child).unwrap().bounds().x0, 15.0);
/// ```
pub struct Subcontext<S: Surface + ?Sized> {
    bounds: Rect,
    depth: i32,
    dispatcher: Dispatcher<S>,
    replay: SmallVec<[PointerState; 2]>,
    /// Pointers whose buttons were reported "elsewhere" since the last step. They are replayed
    /// without a position even if a hover for them arrives too.
    detached: SmallVec<[PointerId; 2]>,
}

impl<S: Surface + ?Sized> fmt::Debug for Subcontext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subcontext")
            .field("bounds", &self.bounds)
            .field("depth", &self.depth)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

impl<S: Surface + ?Sized> Subcontext<S> {
    /// Creates an empty subcontext covering `bounds`.
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self::with_debug(bounds, DebugSettings::default())
    }

    /// Creates an empty subcontext whose nested dispatcher reads the shared `debug` settings.
    #[must_use]
    pub fn with_debug(bounds: Rect, debug: DebugSettings) -> Self {
        Self {
            bounds,
            depth: 0,
            dispatcher: Dispatcher::with_debug(debug),
            replay: SmallVec::new(),
            detached: SmallVec::new(),
        }
    }

    /// Sets the depth of the subcontext within its own dispatcher.
    #[must_use]
    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    /// Changes the depth of the subcontext within its own dispatcher.
    pub fn set_depth(&mut self, depth: i32) {
        self.depth = depth;
    }

    /// Bounding box in absolute coordinates.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Depth of the subcontext within its own dispatcher.
    #[must_use]
    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// Replaces the bounds without moving any child.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// The nested dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher<S> {
        &self.dispatcher
    }

    /// Mutable access to the nested dispatcher.
    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<S> {
        &mut self.dispatcher
    }

    /// Queues a child for addition at the nested dispatcher's next flush.
    pub fn add_element(&mut self, element: Box<dyn Element<S>>) -> ElementId {
        self.dispatcher.add_element(element)
    }

    /// Queues a child for removal at the nested dispatcher's next flush.
    pub fn remove_element(&mut self, id: ElementId) {
        self.dispatcher.remove_element(id);
    }

    /// Drains notifications raised by children.
    pub fn take_events(&mut self) -> alloc::vec::Vec<(ElementId, ElementEvent)> {
        self.dispatcher.take_events()
    }

    /// Replays the pointer state accumulated since the last step into the nested dispatcher and
    /// runs one nested frame.
    pub fn step(&mut self, dt: f64) {
        let mut input = InputState::new();
        for pointer in self.replay.drain(..) {
            input.push_pointer(pointer);
        }
        self.detached.clear();
        self.dispatcher.update(&input, dt);
    }

    /// Renders the nested dispatcher clipped to the subcontext.
    ///
    /// The clip is the caller's `clip` intersected with the subcontext bounds and with the
    /// surface's current clip, so it only ever shrinks across nesting levels. The previous clip
    /// is restored even if a child panics while rendering.
    pub fn render_subcontext(&mut self, surface: &mut S, clip: Rect) {
        let mut clip = clip.intersect(self.bounds);
        if let Some(current) = surface.current_clip() {
            clip = clip.intersect(current);
        }
        if is_empty_rect(clip) {
            return;
        }
        let mut guard = ClipGuard::new(surface, clip);
        self.dispatcher.render(&mut *guard, clip);
    }

    fn replay_pointer(&mut self, id: PointerId, position: Option<Point>) -> &mut PointerState {
        let at = match self.replay.iter().position(|p| p.id == id) {
            Some(at) => at,
            None => {
                self.replay.push(PointerState::new(id, None));
                self.replay.len() - 1
            }
        };
        let detached = self.detached.contains(&id);
        let pointer = &mut self.replay[at];
        if detached {
            pointer.position = None;
        } else if position.is_some() {
            pointer.position = position;
        }
        pointer
    }

    fn record_button(&mut self, event: &PointerEvent, state: ButtonState, positioned: bool) {
        let position = if positioned {
            event.position
        } else {
            if !self.detached.contains(&event.pointer) {
                self.detached.push(event.pointer);
            }
            None
        };
        self.replay_pointer(event.pointer, position)
            .insert_button(event.button, state);
    }
}

impl<S: Surface + ?Sized + 'static> Element<S> for Subcontext<S> {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn translate(&mut self, delta: Vec2) {
        self.bounds = self.bounds + delta;
        self.dispatcher.translate_all(delta);
    }

    fn depth(&self) -> i32 {
        self.depth
    }

    fn update(&mut self, cx: &mut EventCx<'_, S>, dt: f64) {
        self.step(dt);
        for (child, event) in self.dispatcher.take_events() {
            match event {
                ElementEvent::Custom(_) => cx.emit(event),
                ElementEvent::Resize => {
                    log::trace!("resize of {child:?} has no layout to re-flow");
                }
            }
        }
    }

    fn render(&mut self, surface: &mut S, clip: Rect) {
        self.render_subcontext(surface, clip);
    }

    fn pointer_pressed(&mut self, _cx: &mut EventCx<'_, S>, event: &PointerEvent) {
        self.record_button(event, ButtonState::JUST_PRESSED, true);
    }

    fn pointer_pressed_elsewhere(&mut self, _cx: &mut EventCx<'_, S>, event: &PointerEvent) {
        self.record_button(event, ButtonState::JUST_PRESSED, false);
    }

    fn pointer_held(&mut self, _cx: &mut EventCx<'_, S>, event: &PointerEvent) {
        self.record_button(event, ButtonState::HELD, true);
    }

    fn pointer_held_elsewhere(&mut self, _cx: &mut EventCx<'_, S>, event: &PointerEvent) {
        self.record_button(event, ButtonState::HELD, false);
    }

    fn hovered(&mut self, _cx: &mut EventCx<'_, S>, event: &HoverEvent) {
        self.replay_pointer(event.pointer, Some(event.position));
    }

    fn key_input(&mut self, _cx: &mut EventCx<'_, S>, key: &KeyEvent) {
        self.dispatcher.push_key(*key);
    }

    fn key_input_done(&mut self, _cx: &mut EventCx<'_, S>) {
        self.dispatcher.deliver_keys();
    }

    fn destroy(&mut self) {
        self.dispatcher.clear();
    }

    fn share_debug(&mut self, debug: &DebugSettings) {
        self.dispatcher.set_debug(debug.clone());
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        Some(self)
    }
}
