// Copyright 2025 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dispatcher: owns a depth-ordered set of elements and routes each frame's input.
//!
//! ## Frame phases
//!
//! Every [`Dispatcher::update`] runs these phases in order:
//!
//! 1. **Flush**: restore depth order if it changed since the last frame, then apply queued
//!    removals, then queued additions.
//! 2. **Resolve focus**: clear click focus if any button was pressed or is held (the press will
//!    re-establish it, so clicking empty space defocuses), and always clear hover focus.
//! 3. **Deliver events**: walk elements topmost first. Per pointer, the first element under it
//!    consumes the press, held, and hover channels. Then every element that did not receive a
//!    channel's primary callback gets the matching "elsewhere" callback.
//! 4. **Update all**: every element gets [`Element::update`].
//! 5. **Deliver keys**: buffered keys go to the click-focus element in arrival order, followed by a
//!    single [`Element::key_input_done`]. Without focus the buffer is dropped.
//! 6. **Reap dead**: elements reporting [`Element::is_dead`] are destroyed and removed at once.
//! 7. **Resort**: one adjacency scan; a stable re-sort only if depth order was violated.
//!
//! [`Dispatcher::render`] paints in ascending depth and culls elements outside the clip.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use kurbo::{Rect, Vec2};
use smallvec::SmallVec;

use crate::debug::{DebugOverlay, DebugSettings};
use crate::depth::{DepthList, Layered};
use crate::element::{Element, EventCx};
use crate::input::{ButtonState, HoverEvent, InputState, KeyEvent, PointerEvent};
use crate::queue::MutationQueue;
use crate::surface::{Primitive, Surface, is_empty_rect};
use crate::types::{ElementEvent, ElementId};

bitflags::bitflags! {
    /// Pointer channels that have been consumed by an element this frame.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    struct Channels: u8 {
        const PRESS = 0b001;
        const HELD  = 0b010;
        const HOVER = 0b100;
    }
}

/// Which element received each channel of one pointer.
#[derive(Clone, Copy, Debug)]
struct PointerRoute {
    press: Option<ElementId>,
    held: Option<ElementId>,
    hover: Option<ElementId>,
}

struct Entry<S: Surface + ?Sized> {
    id: ElementId,
    element: Box<dyn Element<S>>,
}

impl<S: Surface + ?Sized> Layered for Entry<S> {
    fn depth(&self) -> i32 {
        self.element.depth()
    }
}

/// Owner of a depth-ordered element collection and its per-frame routing state.
///
/// `S` is the drawing surface elements render to; use `dyn Surface` when elements should not be
/// tied to one backend.
///
/// ## Example
///
/// ```
/// use kurbo::{Point, Rect, Vec2};
/// use lamina_dispatch::input::{Button, InputState, PointerId};
/// use lamina_dispatch::surface::Surface;
/// use lamina_dispatch::{Dispatcher, Element};
///
/// struct Square(Rect, i32);
///
/// impl Element<dyn Surface> for Square {
///     fn bounds(&self) -> Rect { self.0 }
///     fn translate(&mut self, delta: Vec2) { self.0 = self.0 + delta; }
///     fn depth(&self) -> i32 { self.1 }
/// }
///
/// let mut ui: Dispatcher<dyn Surface> = Dispatcher::new();
/// let below = ui.add_element(Box::new(Square(Rect::new(0.0, 0.0, 10.0, 10.0), 0)));
/// let above = ui.add_element(Box::new(Square(Rect::new(0.0, 0.0, 10.0, 10.0), 1)));
///
/// let input = InputState::new()
///     .pointer(PointerId::PRIMARY, Point::new(5.0, 5.0))
///     .press(PointerId::PRIMARY, Button::Primary);
/// ui.update(&input, 1.0 / 60.0);
///
/// // The topmost element takes the click and with it the focus.
/// assert_eq!(ui.click_focus(), Some(above));
/// assert_ne!(ui.click_focus(), Some(below));
/// ```
pub struct Dispatcher<S: Surface + ?Sized> {
    elements: DepthList<Entry<S>>,
    queue: MutationQueue<Box<dyn Element<S>>>,
    click_focus: Option<ElementId>,
    hover_focus: Option<ElementId>,
    keys: VecDeque<KeyEvent>,
    outbox: Vec<(ElementId, ElementEvent)>,
    enabled: bool,
    debug: DebugSettings,
}

impl<S: Surface + ?Sized> fmt::Debug for Dispatcher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("elements", &self.elements.len())
            .field("pending", &!self.queue.is_empty())
            .field("click_focus", &self.click_focus)
            .field("hover_focus", &self.hover_focus)
            .field("keys", &self.keys.len())
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl<S: Surface + ?Sized> Default for Dispatcher<S> {
    fn default() -> Self {
        Self::with_debug(DebugSettings::default())
    }
}

impl<S: Surface + ?Sized> Dispatcher<S> {
    /// Creates an empty dispatcher with its own, unshared debug settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty dispatcher reading the shared `debug` settings.
    #[must_use]
    pub fn with_debug(debug: DebugSettings) -> Self {
        Self {
            elements: DepthList::new(),
            queue: MutationQueue::new(),
            click_focus: None,
            hover_focus: None,
            keys: VecDeque::new(),
            outbox: Vec::new(),
            enabled: true,
            debug,
        }
    }

    /// The debug settings this dispatcher reads when rendering.
    #[must_use]
    pub fn debug(&self) -> &DebugSettings {
        &self.debug
    }

    /// Replaces the debug settings handle and hands it to every owned element, so nested
    /// dispatchers read the same settings.
    pub fn set_debug(&mut self, debug: DebugSettings) {
        if self.debug.same_as(&debug) {
            return;
        }
        self.debug = debug;
        for entry in self.elements.iter_ascending_mut() {
            entry.element.share_debug(&self.debug);
        }
        for element in self.queue.pending_iter_mut() {
            element.share_debug(&self.debug);
        }
    }

    /// Queues `element` for addition at the next flush and returns its handle.
    pub fn add_element(&mut self, element: Box<dyn Element<S>>) -> ElementId {
        self.queue.request_add(element)
    }

    /// Queues `id` for removal at the next flush. Stale handles are ignored.
    pub fn remove_element(&mut self, id: ElementId) {
        self.queue.request_remove(id);
    }

    /// Returns `true` if `id` is owned by this dispatcher (live, or waiting to be added).
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.queue.is_live(id)
    }

    /// Number of owned elements (live plus waiting to be added).
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.live_count()
    }

    /// Returns `true` if the dispatcher owns no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Handles of live members in paint order.
    pub fn iter(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.iter_ascending().map(|e| e.id)
    }

    /// Looks up an owned element, live or waiting to be added.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&dyn Element<S>> {
        if !self.queue.is_live(id) {
            return None;
        }
        if let Some(entry) = self.elements.find(|e| e.id == id) {
            let element: &dyn Element<S> = entry.element.as_ref();
            return Some(element);
        }
        let element: &dyn Element<S> = self.queue.pending(id)?.as_ref();
        Some(element)
    }

    /// Mutable access to an owned element, live or waiting to be added.
    ///
    /// The element's depth may be changed through this access; the order is re-checked at the
    /// next flush.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut dyn Element<S>> {
        if !self.queue.is_live(id) {
            return None;
        }
        if let Some(entry) = self.elements.find_mut(|e| e.id == id) {
            let element: &mut dyn Element<S> = entry.element.as_mut();
            return Some(element);
        }
        let element: &mut dyn Element<S> = self.queue.pending_mut(id)?.as_mut();
        Some(element)
    }

    /// Downcasts an owned element that implements [`Element::as_any`].
    #[must_use]
    pub fn downcast_ref<T: Any>(&self, id: ElementId) -> Option<&T> {
        self.get(id)?.as_any()?.downcast_ref()
    }

    /// Downcasts an owned element that implements [`Element::as_any_mut`].
    pub fn downcast_mut<T: Any>(&mut self, id: ElementId) -> Option<&mut T> {
        self.get_mut(id)?.as_any_mut()?.downcast_mut()
    }

    /// Element currently holding click focus (the recipient of key input).
    #[must_use]
    pub fn click_focus(&self) -> Option<ElementId> {
        self.click_focus
    }

    /// Element currently under the pointer.
    #[must_use]
    pub fn hover_focus(&self) -> Option<ElementId> {
        self.hover_focus
    }

    /// Returns `true` unless disabled with [`Dispatcher::set_enabled`].
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables the dispatcher.
    ///
    /// A disabled dispatcher does no work in [`Dispatcher::update`] and drops key input.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.keys.clear();
        }
    }

    /// Buffers a key event for delivery to the click-focus element.
    pub fn push_key(&mut self, key: KeyEvent) {
        if self.enabled {
            self.keys.push_back(key);
        }
    }

    /// Raises a notification on behalf of `id`, e.g. after embedding code resized it.
    ///
    /// Ignored for handles this dispatcher does not own.
    pub fn notify(&mut self, id: ElementId, event: ElementEvent) {
        if self.queue.is_live(id) {
            self.outbox.push((id, event));
        }
    }

    /// Drains notifications raised by elements since the last call.
    pub fn take_events(&mut self) -> Vec<(ElementId, ElementEvent)> {
        core::mem::take(&mut self.outbox)
    }

    /// Moves every owned element, live and pending, by `delta`.
    pub fn translate_all(&mut self, delta: Vec2) {
        for entry in self.elements.iter_ascending_mut() {
            entry.element.translate(delta);
        }
        for element in self.queue.pending_iter_mut() {
            element.translate(delta);
        }
    }

    /// Destroys and drops every owned element, including pending ones.
    pub fn clear(&mut self) {
        let pending = self.queue.take();
        for mut entry in self.elements.drain() {
            entry.element.destroy();
            self.queue.release(entry.id);
        }
        for (id, mut element) in pending.adds {
            element.destroy();
            self.queue.release(id);
        }
        self.click_focus = None;
        self.hover_focus = None;
        self.keys.clear();
        self.outbox.clear();
    }

    /// Runs one frame: flush, focus, pointer events, updates, keys, reaping, and re-sorting.
    pub fn update(&mut self, input: &InputState, dt: f64) {
        if !self.enabled {
            self.keys.clear();
            return;
        }
        self.keys.extend(input.keys().iter().copied());

        self.flush();
        self.resolve_focus(input);
        self.deliver_pointer_events(input);
        self.update_all(dt);
        self.deliver_keys();
        self.reap_dead();
        if self.elements.resort_if_needed() {
            log::debug!("depth order violated, re-sorted {} elements", self.elements.len());
        }
    }

    /// Restores depth order if it was violated since the last frame, then applies queued
    /// removals, then queued additions.
    pub fn flush(&mut self) {
        if self.elements.resort_if_needed() {
            log::debug!(
                "depth changed between frames, re-sorted {} elements",
                self.elements.len()
            );
        }
        if self.queue.is_empty() {
            return;
        }
        let mut pending = self.queue.take();
        for &id in &pending.removes {
            let Some(mut entry) = self.elements.remove(|e| e.id == id) else {
                // Not a member yet; handled with the additions below.
                continue;
            };
            self.forget_focus(id);
            entry.element.destroy();
            self.queue.release(id);
            log::debug!("removed {id:?}");
        }
        let adds = core::mem::take(&mut pending.adds);
        for (id, mut element) in adds {
            if pending.is_removed(id) {
                element.destroy();
                self.queue.release(id);
                log::debug!("{id:?} removed before it was added");
                continue;
            }
            element.share_debug(&self.debug);
            self.elements.insert_sorted(Entry { id, element });
        }
    }

    fn resolve_focus(&mut self, input: &InputState) {
        if input.any_pressed_or_held() {
            self.click_focus = None;
        }
        self.hover_focus = None;
    }

    fn deliver_pointer_events(&mut self, input: &InputState) {
        let mut routes: SmallVec<[PointerRoute; 2]> = SmallVec::new();

        for pointer in input.pointers() {
            let mut route = PointerRoute {
                press: None,
                held: None,
                hover: None,
            };
            if let Some(position) = pointer.position {
                let mut consumed = Channels::empty();
                for entry in self.elements.iter_descending_mut() {
                    if consumed.is_all() {
                        break;
                    }
                    if !entry.element.hit_test(position) {
                        continue;
                    }
                    let mut cx = EventCx::new(entry.id, &mut self.queue, &mut self.outbox);
                    if !consumed.contains(Channels::PRESS) {
                        consumed |= Channels::PRESS;
                        for button in pointer.buttons_with(ButtonState::JUST_PRESSED) {
                            let event = PointerEvent {
                                pointer: pointer.id,
                                position: Some(position),
                                button,
                            };
                            entry.element.pointer_pressed(&mut cx, &event);
                            route.press = Some(entry.id);
                        }
                    }
                    if !consumed.contains(Channels::HELD) {
                        consumed |= Channels::HELD;
                        for button in pointer.buttons_with(ButtonState::HELD) {
                            let event = PointerEvent {
                                pointer: pointer.id,
                                position: Some(position),
                                button,
                            };
                            entry.element.pointer_held(&mut cx, &event);
                            route.held = Some(entry.id);
                        }
                    }
                    if !consumed.contains(Channels::HOVER) {
                        consumed |= Channels::HOVER;
                        let event = HoverEvent {
                            pointer: pointer.id,
                            position,
                        };
                        entry.element.hovered(&mut cx, &event);
                        route.hover = Some(entry.id);
                    }
                }
            }
            if let Some(id) = route.press.or(route.held) {
                self.click_focus = Some(id);
            }
            if let Some(id) = route.hover {
                self.hover_focus = Some(id);
            }
            log::trace!(
                "pointer {:?}: press {:?}, held {:?}, hover {:?}",
                pointer.id,
                route.press,
                route.held,
                route.hover
            );
            routes.push(route);
        }

        for entry in self.elements.iter_descending_mut() {
            let mut cx = EventCx::new(entry.id, &mut self.queue, &mut self.outbox);
            for (pointer, route) in input.pointers().iter().zip(&routes) {
                let event_for = |button| PointerEvent {
                    pointer: pointer.id,
                    position: pointer.position,
                    button,
                };
                if route.press != Some(entry.id) {
                    for button in pointer.buttons_with(ButtonState::JUST_PRESSED) {
                        entry
                            .element
                            .pointer_pressed_elsewhere(&mut cx, &event_for(button));
                    }
                }
                if route.held != Some(entry.id) {
                    for button in pointer.buttons_with(ButtonState::HELD) {
                        entry
                            .element
                            .pointer_held_elsewhere(&mut cx, &event_for(button));
                    }
                }
            }
            if !routes.iter().any(|r| r.hover == Some(entry.id)) {
                entry.element.hovered_elsewhere(&mut cx);
            }
        }
    }

    fn update_all(&mut self, dt: f64) {
        for entry in self.elements.iter_descending_mut() {
            let mut cx = EventCx::new(entry.id, &mut self.queue, &mut self.outbox);
            entry.element.update(&mut cx, dt);
        }
    }

    /// Delivers buffered keys to the click-focus element, or drops them if there is none.
    pub(crate) fn deliver_keys(&mut self) {
        if self.keys.is_empty() {
            return;
        }
        let focused = self
            .click_focus
            .and_then(|id| self.elements.find_mut(|e| e.id == id));
        let Some(entry) = focused else {
            log::trace!("dropping {} keys without focus", self.keys.len());
            self.keys.clear();
            return;
        };
        let mut cx = EventCx::new(entry.id, &mut self.queue, &mut self.outbox);
        for key in self.keys.drain(..) {
            entry.element.key_input(&mut cx, &key);
        }
        entry.element.key_input_done(&mut cx);
    }

    fn reap_dead(&mut self) {
        let dead = self.elements.remove_all(|e| e.element.is_dead());
        for mut entry in dead {
            self.forget_focus(entry.id);
            entry.element.destroy();
            self.queue.release(entry.id);
            log::debug!("reaped {:?}", entry.id);
        }
    }

    fn forget_focus(&mut self, id: ElementId) {
        if self.click_focus == Some(id) {
            self.click_focus = None;
        }
        if self.hover_focus == Some(id) {
            self.hover_focus = None;
        }
    }

    /// Paints live elements in ascending depth, culling those outside `clip`, then draws the
    /// debug overlay selected by the shared [`DebugSettings`].
    pub fn render(&mut self, surface: &mut S, clip: Rect) {
        for entry in self.elements.iter_ascending_mut() {
            let visible = entry.element.bounds().intersect(clip);
            if is_empty_rect(visible) {
                continue;
            }
            entry.element.render(surface, visible);
        }

        let overlay = self.debug.get();
        if overlay.contains(DebugOverlay::FOCUS_BOXES) {
            let boxes = [
                (self.hover_focus, DebugOverlay::HOVER_FOCUS_COLOR),
                (self.click_focus, DebugOverlay::CLICK_FOCUS_COLOR),
            ];
            for (focus, color) in boxes {
                let Some(entry) = focus.and_then(|id| self.elements.find(|e| e.id == id)) else {
                    continue;
                };
                let rect = entry.element.bounds();
                surface.draw(&Primitive::Outline { rect, color }, clip);
            }
        }
        if overlay.contains(DebugOverlay::CLIP_REGION) {
            let outline = Primitive::Outline {
                rect: clip,
                color: DebugOverlay::CLIP_COLOR,
            };
            surface.draw(&outline, clip);
        }
    }
}
