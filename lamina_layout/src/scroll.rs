// Copyright 2025 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use core::any::Any;
use core::fmt;
use kurbo::{Point, Rect, Vec2};

use lamina_dispatch::input::{Button, HoverEvent, KeyEvent, PointerEvent, PointerId};
use lamina_dispatch::surface::{Color, Primitive, Surface};
use lamina_dispatch::{DebugSettings, Dispatcher, Element, ElementId, EventCx};

use crate::axis::{Align, Axis};
use crate::list::ListLayout;

/// Alignment policy for [`ScrollLayout::scroll_to_child`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScrollAlign {
    /// Align the start of the child with the start of the viewport.
    Start,
    /// Center the child within the viewport.
    Center,
    /// Align the end of the child with the end of the viewport.
    End,
    /// Move just enough to make the child fully visible, preferring the smallest change from
    /// the current scroll offset.
    Nearest,
}

/// An active drag of the scroll bar.
#[derive(Copy, Clone, Debug)]
struct Drag {
    pointer: PointerId,
    button: Button,
    last: Point,
}

/// A [`ListLayout`] shown through a fixed viewport with a draggable scroll bar.
///
/// The bounds passed to [`ScrollLayout::new`] are the viewport. Content beyond it is scrolled
/// into view by moving every child back along the axis by the scroll offset, which is clamped to
/// `[0, max_scroll]` where `max_scroll = max(content - viewport, 0)`.
///
/// The scroll bar runs along the trailing edge of the viewport. Its thumb is
/// `viewport * viewport / content` long (the whole track when the content fits). Pressing the
/// bar starts a drag; while the button stays held, every pixel the pointer moves along the axis
/// scrolls the content by [`ScrollLayout::step`] pixels, `content / viewport`, so the thumb
/// follows the pointer.
///
/// Children that die without raising a notification are caught by comparing the child count
/// across frames; a mismatch re-flows every child.
///
/// ```
/// use kurbo::{Rect, Size, Vec2};
/// use lamina_dispatch::Element;
/// use lamina_dispatch::surface::Surface;
/// use lamina_layout::{Axis, ScrollLayout};
///
/// struct Row(Rect);
///
/// impl Element<dyn Surface> for Row {
///     fn bounds(&self) -> Rect { self.0 }
///     fn translate(&mut self, delta: Vec2) { self.0 = self.0 + delta; }
/// }
///
/// let mut scroll: ScrollLayout<dyn Surface> =
///     ScrollLayout::new(Rect::new(0.0, 0.0, 80.0, 100.0), Axis::Vertical);
/// for _ in 0..5 {
///     let row = Rect::from_origin_size((0.0, 0.0), Size::new(80.0, 100.0));
///     scroll.add_element(Box::new(Row(row)));
/// }
/// assert_eq!(scroll.content_extent(), 500.0);
/// assert_eq!(scroll.thumb_extent(), 20.0);
///
/// scroll.set_scroll_offset(1000.0);
/// assert_eq!(scroll.scroll_offset(), 400.0);
/// ```
pub struct ScrollLayout<S: Surface + ?Sized> {
    list: ListLayout<S>,
    step: f64,
    /// Content extent the step was last computed for.
    stepped_extent: f64,
    last_child_count: usize,
    bar_width: f64,
    track_color: Color,
    thumb_color: Color,
    drag: Option<Drag>,
    drag_seen: bool,
}

impl<S: Surface + ?Sized> fmt::Debug for ScrollLayout<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollLayout")
            .field("list", &self.list)
            .field("scroll_offset", &self.list.scroll)
            .field("step", &self.step)
            .field("drag", &self.drag)
            .finish_non_exhaustive()
    }
}

impl<S: Surface + ?Sized> ScrollLayout<S> {
    /// Default width of the scroll bar.
    pub const DEFAULT_BAR_WIDTH: f64 = 8.0;
    /// Default color of the scroll track.
    pub const DEFAULT_TRACK_COLOR: Color = Color::rgba(0, 0, 0, 48);
    /// Default color of the scroll thumb.
    pub const DEFAULT_THUMB_COLOR: Color = Color::rgba(0, 0, 0, 160);

    /// Creates an empty scrollable list showing the `viewport` rectangle.
    #[must_use]
    pub fn new(viewport: Rect, axis: Axis) -> Self {
        Self {
            list: ListLayout::fixed(viewport, axis),
            step: 0.0,
            stepped_extent: 0.0,
            last_child_count: 0,
            bar_width: Self::DEFAULT_BAR_WIDTH,
            track_color: Self::DEFAULT_TRACK_COLOR,
            thumb_color: Self::DEFAULT_THUMB_COLOR,
            drag: None,
            drag_seen: false,
        }
    }

    /// Sets the gap between consecutive children.
    #[must_use]
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.list.set_spacing(spacing);
        self.sync_content();
        self
    }

    /// Sets the cross-axis alignment.
    #[must_use]
    pub fn with_align(mut self, align: Align) -> Self {
        self.list.set_align(align);
        self
    }

    /// Sets the depth of the layout within its own dispatcher.
    #[must_use]
    pub fn with_depth(mut self, depth: i32) -> Self {
        self.list = self.list.with_depth(depth);
        self
    }

    /// Makes the nested dispatcher read the shared `debug` settings.
    #[must_use]
    pub fn with_debug(mut self, debug: DebugSettings) -> Self {
        self.list = self.list.with_debug(debug);
        self
    }

    /// Sets the scroll bar colors.
    #[must_use]
    pub fn with_bar_colors(mut self, track: Color, thumb: Color) -> Self {
        self.track_color = track;
        self.thumb_color = thumb;
        self
    }

    /// Width of the scroll bar across the axis.
    #[must_use]
    pub fn bar_width(&self) -> f64 {
        self.bar_width
    }

    /// Changes the width of the scroll bar.
    pub fn set_bar_width(&mut self, width: f64) {
        self.bar_width = width.max(0.0);
    }

    /// The viewport.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.list.bounds()
    }

    /// The list being scrolled.
    #[must_use]
    pub fn list(&self) -> &ListLayout<S> {
        &self.list
    }

    /// The nested dispatcher holding the children.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher<S> {
        self.list.dispatcher()
    }

    /// Children in layout order.
    #[must_use]
    pub fn children(&self) -> &[ElementId] {
        self.list.children()
    }

    /// Current bounds of a child.
    #[must_use]
    pub fn child_bounds(&self, id: ElementId) -> Option<Rect> {
        self.list.child_bounds(id)
    }

    /// Downcasts a child that implements [`Element::as_any_mut`].
    pub fn child_mut<T: Any>(&mut self, id: ElementId) -> Option<&mut T> {
        self.list.child_mut(id)
    }

    /// Appends a child after the current last child.
    pub fn add_element(&mut self, element: Box<dyn Element<S>>) -> ElementId {
        let id = self.list.add_element(element);
        self.last_child_count = self.list.children().len();
        self.sync_content();
        id
    }

    /// Removes a child and re-flows from its predecessor.
    pub fn remove_element(&mut self, id: ElementId) {
        self.list.remove_element(id);
        self.last_child_count = self.list.children().len();
        self.sync_content();
    }

    /// See [`ListLayout::add_listener`].
    pub fn add_listener(&mut self, id: ElementId) -> bool {
        self.list.add_listener(id)
    }

    /// See [`ListLayout::remove_listener`].
    pub fn remove_listener(&mut self, id: ElementId) {
        self.list.remove_listener(id);
    }

    /// Extent of the viewport along the axis.
    #[must_use]
    pub fn viewport_extent(&self) -> f64 {
        self.list.axis().major_extent(self.list.bounds())
    }

    /// Extent of the content along the axis.
    #[must_use]
    pub fn content_extent(&self) -> f64 {
        self.list.content_extent()
    }

    /// Largest valid scroll offset.
    #[must_use]
    pub fn max_scroll(&self) -> f64 {
        (self.content_extent() - self.viewport_extent()).max(0.0)
    }

    /// Current scroll offset.
    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.list.scroll
    }

    /// Content pixels scrolled per pixel of scroll bar drag.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Returns `true` if the content is larger than the viewport.
    #[must_use]
    pub fn is_scrollable(&self) -> bool {
        self.content_extent() > self.viewport_extent()
    }

    /// Length of the scroll thumb along the axis.
    #[must_use]
    pub fn thumb_extent(&self) -> f64 {
        let viewport = self.viewport_extent();
        let content = self.content_extent();
        if content <= viewport {
            viewport
        } else {
            viewport * viewport / content
        }
    }

    /// The scroll track along the trailing edge of the viewport.
    #[must_use]
    pub fn track_rect(&self) -> Rect {
        let b = self.list.bounds();
        match self.list.axis() {
            Axis::Vertical => Rect::new(b.x1 - self.bar_width, b.y0, b.x1, b.y1),
            Axis::Horizontal => Rect::new(b.x0, b.y1 - self.bar_width, b.x1, b.y1),
        }
    }

    /// The scroll thumb within [`ScrollLayout::track_rect`].
    #[must_use]
    pub fn thumb_rect(&self) -> Rect {
        let axis = self.list.axis();
        let track = self.track_rect();
        let thumb = self.thumb_extent();
        let max_scroll = self.max_scroll();
        let travel = self.viewport_extent() - thumb;
        let offset = if max_scroll > 0.0 {
            self.scroll_offset() / max_scroll * travel
        } else {
            0.0
        };
        let start = axis.major_start(track) + offset;
        let (minor_start, minor_end) = axis.minor_range(track);
        let a = axis.pack(start, minor_start);
        let b = axis.pack(start + thumb, minor_end);
        Rect::from_points(a, b)
    }

    /// Scrolls to `offset`, clamped to `[0, max_scroll]`, moving every child.
    pub fn set_scroll_offset(&mut self, offset: f64) {
        let target = offset.max(0.0).min(self.max_scroll());
        let delta = target - self.list.scroll;
        if delta == 0.0 {
            return;
        }
        self.list.scroll = target;
        let shift = self.list.axis().major_vec(-delta);
        self.list.shift_content(shift);
    }

    /// Scrolls by `delta`, clamped like [`ScrollLayout::set_scroll_offset`].
    pub fn scroll_by(&mut self, delta: f64) {
        self.set_scroll_offset(self.list.scroll + delta);
    }

    /// Scrolls so that `id` is positioned according to `align`.
    ///
    /// Returns `false` if `id` is not a child.
    pub fn scroll_to_child(&mut self, id: ElementId, align: ScrollAlign) -> bool {
        if !self.list.children().contains(&id) {
            return false;
        }
        let Some(bounds) = self.list.child_bounds(id) else {
            return false;
        };
        let axis = self.list.axis();
        let origin = self.list.content_start();
        let item_start = axis.major_start(bounds) - origin;
        let item_end = axis.major_end(bounds) - origin;
        let viewport = self.viewport_extent();
        let current = self.scroll_offset();
        let target = match align {
            ScrollAlign::Start => item_start,
            ScrollAlign::End => (item_end - viewport).max(0.0),
            ScrollAlign::Center => ((item_start + item_end) / 2.0 - viewport / 2.0).max(0.0),
            ScrollAlign::Nearest => {
                if item_start >= current && item_end <= current + viewport {
                    current
                } else if item_start < current {
                    item_start
                } else {
                    (item_end - viewport).max(0.0)
                }
            }
        };
        self.set_scroll_offset(target);
        true
    }

    /// Returns `true` if any part of `id` is inside the viewport.
    #[must_use]
    pub fn is_child_visible(&self, id: ElementId) -> bool {
        self.list
            .child_bounds(id)
            .is_some_and(|b| !b.intersect(self.list.bounds()).is_zero_area())
    }

    /// Recomputes the drag step and re-clamps the offset after the content extent changed.
    fn sync_content(&mut self) {
        let content = self.content_extent();
        if content == self.stepped_extent {
            return;
        }
        self.stepped_extent = content;
        let viewport = self.viewport_extent();
        self.step = if viewport > 0.0 { content / viewport } else { 0.0 };
        log::debug!("content extent {content}, drag step {}", self.step);
        self.set_scroll_offset(self.list.scroll);
    }

    /// Continues a drag if `event` belongs to it. Returns `true` if it did.
    fn continue_drag(&mut self, event: &PointerEvent) -> bool {
        let axis = self.list.axis();
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        if drag.pointer != event.pointer || drag.button != event.button {
            return false;
        }
        self.drag_seen = true;
        let Some(position) = event.position else {
            return true;
        };
        let moved = axis.major_of(position - drag.last);
        drag.last = position;
        self.scroll_by(moved * self.step);
        true
    }
}

impl<S: Surface + ?Sized + 'static> Element<S> for ScrollLayout<S> {
    fn bounds(&self) -> Rect {
        self.list.bounds()
    }

    fn translate(&mut self, delta: Vec2) {
        self.list.translate(delta);
    }

    fn depth(&self) -> i32 {
        self.list.sub.depth()
    }

    fn update(&mut self, cx: &mut EventCx<'_, S>, dt: f64) {
        if !self.drag_seen {
            if let Some(drag) = self.drag.take() {
                log::trace!("scroll bar drag by {:?} ended", drag.pointer);
            }
        }
        self.drag_seen = false;

        self.list.sub.step(dt);
        let alive = self.list.alive_children();
        if alive != self.last_child_count {
            log::debug!(
                "child count changed from {} to {alive}, re-flowing",
                self.last_child_count
            );
            self.list.prune_dead_children();
            self.list.reflow_from(None);
        }
        self.list.apply_child_events(cx);
        self.last_child_count = self.list.children().len();
        self.sync_content();
    }

    fn render(&mut self, surface: &mut S, clip: Rect) {
        self.list.sub.render_subcontext(surface, clip);
        if !self.is_scrollable() {
            return;
        }
        let region = clip.intersect(self.list.bounds());
        let track = Primitive::Fill {
            rect: self.track_rect(),
            color: self.track_color,
        };
        let thumb = Primitive::Fill {
            rect: self.thumb_rect(),
            color: self.thumb_color,
        };
        surface.draw(&track, region);
        surface.draw(&thumb, region);
    }

    fn pointer_pressed(&mut self, cx: &mut EventCx<'_, S>, event: &PointerEvent) {
        let on_bar = self.is_scrollable()
            && event
                .position
                .is_some_and(|p| self.track_rect().contains(p));
        if let (true, Some(position)) = (on_bar, event.position) {
            self.drag = Some(Drag {
                pointer: event.pointer,
                button: event.button,
                last: position,
            });
            self.drag_seen = true;
            log::trace!("scroll bar drag by {:?} started", event.pointer);
            self.list.pointer_pressed_elsewhere(cx, event);
        } else {
            self.list.pointer_pressed(cx, event);
        }
    }

    fn pointer_pressed_elsewhere(&mut self, cx: &mut EventCx<'_, S>, event: &PointerEvent) {
        self.list.pointer_pressed_elsewhere(cx, event);
    }

    fn pointer_held(&mut self, cx: &mut EventCx<'_, S>, event: &PointerEvent) {
        if self.continue_drag(event) {
            self.list.pointer_held_elsewhere(cx, event);
        } else {
            self.list.pointer_held(cx, event);
        }
    }

    fn pointer_held_elsewhere(&mut self, cx: &mut EventCx<'_, S>, event: &PointerEvent) {
        self.continue_drag(event);
        self.list.pointer_held_elsewhere(cx, event);
    }

    fn hovered(&mut self, cx: &mut EventCx<'_, S>, event: &HoverEvent) {
        self.list.hovered(cx, event);
    }

    fn key_input(&mut self, cx: &mut EventCx<'_, S>, key: &KeyEvent) {
        self.list.key_input(cx, key);
    }

    fn key_input_done(&mut self, cx: &mut EventCx<'_, S>) {
        self.list.key_input_done(cx);
    }

    fn destroy(&mut self) {
        self.list.destroy();
    }

    fn share_debug(&mut self, debug: &DebugSettings) {
        self.list.share_debug(debug);
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        Some(self)
    }
}
