// Copyright 2025 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use hashbrown::HashSet;
use kurbo::{Rect, Vec2};

use lamina_dispatch::input::{HoverEvent, KeyEvent, PointerEvent};
use lamina_dispatch::surface::Surface;
use lamina_dispatch::{
    DebugSettings, Dispatcher, Element, ElementEvent, ElementId, EventCx, Subcontext,
};

use crate::axis::{Align, Axis};

/// A container that stacks its children along an [`Axis`] with fixed spacing.
///
/// Children keep the order they were added in and are positioned in absolute coordinates, each
/// one starting `spacing` after the end of its predecessor. Across the axis each child is placed
/// against the layout's own minor range according to [`Align`].
///
/// ## Re-flow
///
/// Positioning work is proportional to the number of children *after* a change:
///
/// - [`ListLayout::add_element`] positions only the new child.
/// - [`ListLayout::remove_element`] re-flows from the removed child's predecessor.
/// - A [`ElementEvent::Resize`] from a child registered with [`ListLayout::add_listener`]
///   re-flows from that child. Resizes from other children are ignored.
/// - Children that died are pruned and the list re-flows from the first one's predecessor.
///
/// The layout's major extent always matches its content. When it changes, the layout raises
/// [`ElementEvent::Resize`] to its own container at its next update, so lists nest.
/// `Custom` notifications from children are forwarded to the container unchanged.
///
/// ```
/// use kurbo::{Rect, Size, Vec2};
/// use lamina_dispatch::Element;
/// use lamina_dispatch::surface::Surface;
/// use lamina_layout::{Axis, ListLayout};
///
/// struct Block(Rect);
///
/// impl Element<dyn Surface> for Block {
///     fn bounds(&self) -> Rect { self.0 }
///     fn translate(&mut self, delta: Vec2) { self.0 = self.0 + delta; }
/// }
///
/// let block = |h| Box::new(Block(Rect::from_origin_size((0.0, 0.0), Size::new(30.0, h))));
///
/// let mut list: ListLayout<dyn Surface> =
///     ListLayout::new(Rect::new(0.0, 0.0, 100.0, 0.0), Axis::Vertical).with_spacing(2.0);
/// let first = list.add_element(block(10.0));
/// let second = list.add_element(block(20.0));
///
/// let y = |id| list.child_bounds(id).unwrap().y0;
/// assert_eq!(y(second), y(first) + 10.0 + 2.0);
/// assert_eq!(list.bounds().height(), 32.0);
/// ```
pub struct ListLayout<S: Surface + ?Sized> {
    pub(crate) sub: Subcontext<S>,
    axis: Axis,
    align: Align,
    spacing: f64,
    children: Vec<ElementId>,
    listeners: HashSet<ElementId>,
    /// Whether the major extent of the bounds follows the content.
    fit: bool,
    content_extent: f64,
    /// Distance the content has been moved back along the axis by a scrolling container.
    pub(crate) scroll: f64,
    resized: bool,
}

impl<S: Surface + ?Sized> fmt::Debug for ListLayout<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListLayout")
            .field("bounds", &self.sub.bounds())
            .field("axis", &self.axis)
            .field("align", &self.align)
            .field("spacing", &self.spacing)
            .field("children", &self.children.len())
            .field("content_extent", &self.content_extent)
            .finish_non_exhaustive()
    }
}

impl<S: Surface + ?Sized> ListLayout<S> {
    /// Creates an empty list at `bounds`.
    ///
    /// The minor range of `bounds` is the anchor for [`Align`]. Its major extent is replaced by
    /// the content extent, which starts at zero.
    #[must_use]
    pub fn new(bounds: Rect, axis: Axis) -> Self {
        Self::build(axis.with_major_extent(bounds, 0.0), axis, true)
    }

    /// A list whose bounds stay fixed whatever the content extent.
    pub(crate) fn fixed(bounds: Rect, axis: Axis) -> Self {
        Self::build(bounds, axis, false)
    }

    fn build(bounds: Rect, axis: Axis, fit: bool) -> Self {
        Self {
            sub: Subcontext::new(bounds),
            axis,
            align: Align::default(),
            spacing: 0.0,
            children: Vec::new(),
            listeners: HashSet::new(),
            fit,
            content_extent: 0.0,
            scroll: 0.0,
            resized: false,
        }
    }

    /// Sets the gap between consecutive children.
    #[must_use]
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.set_spacing(spacing);
        self
    }

    /// Sets the cross-axis alignment.
    #[must_use]
    pub fn with_align(mut self, align: Align) -> Self {
        self.set_align(align);
        self
    }

    /// Sets the depth of the list within its own dispatcher.
    #[must_use]
    pub fn with_depth(mut self, depth: i32) -> Self {
        self.sub.set_depth(depth);
        self
    }

    /// Makes the nested dispatcher read the shared `debug` settings.
    #[must_use]
    pub fn with_debug(mut self, debug: DebugSettings) -> Self {
        self.sub.dispatcher_mut().set_debug(debug);
        self
    }

    /// Changes the gap between consecutive children and re-flows every child.
    pub fn set_spacing(&mut self, spacing: f64) {
        self.spacing = spacing;
        self.reflow_from(None);
    }

    /// Changes the cross-axis alignment and re-flows every child.
    pub fn set_align(&mut self, align: Align) {
        self.align = align;
        self.reflow_from(None);
    }

    /// Bounding box in absolute coordinates.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.sub.bounds()
    }

    /// Primary axis.
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Cross-axis alignment.
    #[must_use]
    pub fn align(&self) -> Align {
        self.align
    }

    /// Gap between consecutive children.
    #[must_use]
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Distance from the start of the first child to the end of the last one.
    #[must_use]
    pub fn content_extent(&self) -> f64 {
        self.content_extent
    }

    /// Children in layout order.
    #[must_use]
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// The nested dispatcher holding the children.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher<S> {
        self.sub.dispatcher()
    }

    /// Current bounds of a child.
    #[must_use]
    pub fn child_bounds(&self, id: ElementId) -> Option<Rect> {
        Some(self.sub.dispatcher().get(id)?.bounds())
    }

    /// Downcasts a child that implements [`Element::as_any`].
    #[must_use]
    pub fn child_ref<T: Any>(&self, id: ElementId) -> Option<&T> {
        self.sub.dispatcher().downcast_ref(id)
    }

    /// Downcasts a child that implements [`Element::as_any_mut`].
    ///
    /// Size changes made through this access are picked up when the child raises
    /// [`ElementEvent::Resize`] or when [`ListLayout::child_resized`] is called.
    pub fn child_mut<T: Any>(&mut self, id: ElementId) -> Option<&mut T> {
        self.sub.dispatcher_mut().downcast_mut(id)
    }

    /// Appends a child after the current last child, positioning only the new child.
    pub fn add_element(&mut self, element: Box<dyn Element<S>>) -> ElementId {
        let cursor = match self.last_end() {
            Some(end) => end + self.spacing,
            None => self.content_start(),
        };
        let id = self.sub.add_element(element);
        self.children.push(id);
        self.place(id, cursor);
        self.refresh_extent();
        id
    }

    /// Removes a child and re-flows from its predecessor.
    ///
    /// The child leaves the nested dispatcher at its next flush.
    pub fn remove_element(&mut self, id: ElementId) {
        self.sub.remove_element(id);
        let Some(at) = self.children.iter().position(|&c| c == id) else {
            return;
        };
        self.children.remove(at);
        self.listeners.remove(&id);
        self.reflow_from(at.checked_sub(1));
    }

    /// Re-flows in response to resize notifications from `id`.
    ///
    /// Returns `false` if `id` is not a child.
    pub fn add_listener(&mut self, id: ElementId) -> bool {
        if self.children.contains(&id) {
            self.listeners.insert(id);
            true
        } else {
            false
        }
    }

    /// Stops re-flowing in response to resize notifications from `id`.
    pub fn remove_listener(&mut self, id: ElementId) {
        self.listeners.remove(&id);
    }

    /// Returns `true` if resize notifications from `id` trigger a re-flow.
    #[must_use]
    pub fn is_listening(&self, id: ElementId) -> bool {
        self.listeners.contains(&id)
    }

    /// Re-flows from `id` as if it had raised [`ElementEvent::Resize`].
    ///
    /// Ignored unless `id` is a registered listener.
    pub fn child_resized(&mut self, id: ElementId) {
        if let Some(at) = self.tracked_index(id) {
            self.reflow_from(Some(at));
        }
    }

    pub(crate) fn content_start(&self) -> f64 {
        self.axis.major_start(self.sub.bounds()) - self.scroll
    }

    fn last_end(&self) -> Option<f64> {
        let dispatcher = self.sub.dispatcher();
        self.children
            .iter()
            .rev()
            .find_map(|&id| dispatcher.get(id))
            .map(|child| self.axis.major_end(child.bounds()))
    }

    fn tracked_index(&self, id: ElementId) -> Option<usize> {
        if !self.listeners.contains(&id) {
            return None;
        }
        self.children.iter().position(|&c| c == id)
    }

    /// Moves a child to `major` along the axis and aligns it across. Returns its major end.
    fn place(&mut self, id: ElementId, major: f64) -> Option<f64> {
        let axis = self.axis;
        let range = axis.minor_range(self.sub.bounds());
        let align = self.align;
        let child = self.sub.dispatcher_mut().get_mut(id)?;
        let bounds = child.bounds();
        let minor = align.place(range, axis.minor_extent(bounds));
        child.set_origin(axis.pack(major, minor));
        Some(major + axis.major_extent(bounds))
    }

    /// Re-positions the children from index `from` onwards.
    ///
    /// The child at `from` keeps its major start. With `None` every child is re-positioned from
    /// the content start.
    pub(crate) fn reflow_from(&mut self, from: Option<usize>) {
        let anchored = from.and_then(|at| {
            let id = *self.children.get(at)?;
            let child = self.sub.dispatcher().get(id)?;
            Some((at, self.axis.major_start(child.bounds())))
        });
        let (first, mut cursor) = anchored.unwrap_or((0, self.content_start()));
        log::debug!(
            "re-flowing {} of {} children",
            self.children.len() - first,
            self.children.len()
        );
        for at in first..self.children.len() {
            let id = self.children[at];
            if let Some(end) = self.place(id, cursor) {
                cursor = end + self.spacing;
            }
        }
        self.refresh_extent();
    }

    fn refresh_extent(&mut self) {
        let start = self.content_start();
        let extent = self.last_end().map_or(0.0, |end| (end - start).max(0.0));
        if extent == self.content_extent {
            return;
        }
        self.content_extent = extent;
        if self.fit {
            let bounds = self.axis.with_major_extent(self.sub.bounds(), extent);
            self.sub.set_bounds(bounds);
            self.resized = true;
        }
    }

    /// Number of children still owned by the nested dispatcher.
    pub(crate) fn alive_children(&self) -> usize {
        let dispatcher = self.sub.dispatcher();
        self.children
            .iter()
            .filter(|&&id| dispatcher.contains(id))
            .count()
    }

    /// Drops children that left the nested dispatcher. Returns the index the first one had.
    pub(crate) fn prune_dead_children(&mut self) -> Option<usize> {
        let dispatcher = self.sub.dispatcher();
        let first = self.children.iter().position(|&id| !dispatcher.contains(id))?;
        let listeners = &mut self.listeners;
        self.children.retain(|&id| {
            let alive = dispatcher.contains(id);
            if !alive {
                listeners.remove(&id);
                log::debug!("pruned dead child {id:?}");
            }
            alive
        });
        Some(first)
    }

    /// Handles notifications raised by children during the last nested step.
    pub(crate) fn apply_child_events(&mut self, cx: &mut EventCx<'_, S>) {
        let mut first: Option<usize> = None;
        for (child, event) in self.sub.take_events() {
            match event {
                ElementEvent::Resize => match self.tracked_index(child) {
                    Some(at) => first = Some(first.map_or(at, |f| f.min(at))),
                    None => log::trace!("ignoring resize from untracked {child:?}"),
                },
                ElementEvent::Custom(_) => cx.emit(event),
            }
        }
        if first.is_some() {
            self.reflow_from(first);
        }
    }

    /// Raises the pending resize of the list itself.
    pub(crate) fn emit_resize(&mut self, cx: &mut EventCx<'_, S>) {
        if self.resized {
            self.resized = false;
            cx.emit(ElementEvent::Resize);
        }
    }

    pub(crate) fn shift_content(&mut self, delta: Vec2) {
        self.sub.dispatcher_mut().translate_all(delta);
    }
}

impl<S: Surface + ?Sized + 'static> Element<S> for ListLayout<S> {
    fn bounds(&self) -> Rect {
        self.sub.bounds()
    }

    fn translate(&mut self, delta: Vec2) {
        self.sub.translate(delta);
    }

    fn depth(&self) -> i32 {
        self.sub.depth()
    }

    fn update(&mut self, cx: &mut EventCx<'_, S>, dt: f64) {
        self.sub.step(dt);
        if let Some(first) = self.prune_dead_children() {
            self.reflow_from(first.checked_sub(1));
        }
        self.apply_child_events(cx);
        self.emit_resize(cx);
    }

    fn render(&mut self, surface: &mut S, clip: Rect) {
        self.sub.render_subcontext(surface, clip);
    }

    fn pointer_pressed(&mut self, cx: &mut EventCx<'_, S>, event: &PointerEvent) {
        self.sub.pointer_pressed(cx, event);
    }

    fn pointer_pressed_elsewhere(&mut self, cx: &mut EventCx<'_, S>, event: &PointerEvent) {
        self.sub.pointer_pressed_elsewhere(cx, event);
    }

    fn pointer_held(&mut self, cx: &mut EventCx<'_, S>, event: &PointerEvent) {
        self.sub.pointer_held(cx, event);
    }

    fn pointer_held_elsewhere(&mut self, cx: &mut EventCx<'_, S>, event: &PointerEvent) {
        self.sub.pointer_held_elsewhere(cx, event);
    }

    fn hovered(&mut self, cx: &mut EventCx<'_, S>, event: &HoverEvent) {
        self.sub.hovered(cx, event);
    }

    fn key_input(&mut self, cx: &mut EventCx<'_, S>, key: &KeyEvent) {
        self.sub.key_input(cx, key);
    }

    fn key_input_done(&mut self, cx: &mut EventCx<'_, S>) {
        self.sub.key_input_done(cx);
    }

    fn destroy(&mut self) {
        self.sub.destroy();
    }

    fn share_debug(&mut self, debug: &DebugSettings) {
        self.sub.share_debug(debug);
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Label;
    use crate::test_util::{Block, FixedMetrics, TestSurface};
    use alloc::vec;
    use kurbo::{Point, Size};
    use lamina_dispatch::DebugOverlay;
    use lamina_dispatch::input::InputState;

    type List = ListLayout<TestSurface>;

    const FRAME: f64 = 1.0 / 60.0;

    fn column(spacing: f64) -> List {
        List::new(Rect::new(0.0, 0.0, 50.0, 0.0), Axis::Vertical).with_spacing(spacing)
    }

    fn y0(list: &List, id: ElementId) -> f64 {
        list.child_bounds(id).unwrap().y0
    }

    fn idle(ui: &mut Dispatcher<TestSurface>) {
        ui.update(&InputState::new(), FRAME);
    }

    #[test]
    fn second_child_follows_first_plus_spacing() {
        let mut list = column(2.0);
        let a = list.add_element(Box::new(Block::new(Size::new(30.0, 10.0)).0));
        let b = list.add_element(Box::new(Block::new(Size::new(30.0, 20.0)).0));
        assert_eq!(y0(&list, b), y0(&list, a) + 10.0 + 2.0);
        assert_eq!(list.content_extent(), 32.0);
        assert_eq!(list.bounds(), Rect::new(0.0, 0.0, 50.0, 32.0));
    }

    #[test]
    fn add_positions_only_the_new_child() {
        let mut list = column(1.0);
        let (a, ha) = Block::new(Size::new(10.0, 10.0));
        list.add_element(Box::new(a));
        let (b, hb) = Block::new(Size::new(10.0, 10.0));
        list.add_element(Box::new(b));
        assert_eq!((ha.moves(), hb.moves()), (1, 1));
    }

    #[test]
    fn tail_only_reflow_on_resize() {
        let mut list = column(1.0);
        let mut ids = vec![];
        let mut handles = vec![];
        for _ in 0..4 {
            let (block, handle) = Block::new(Size::new(10.0, 10.0));
            let id = list.add_element(Box::new(block));
            assert!(list.add_listener(id));
            ids.push(id);
            handles.push(handle);
        }
        let mut ui = Dispatcher::<TestSurface>::new();
        let list_id = ui.add_element(Box::new(list));
        idle(&mut ui);
        for h in &handles {
            h.reset_moves();
        }

        // [A, B, C, D]: C grows.
        handles[2].grow_to(Size::new(10.0, 25.0));
        idle(&mut ui);

        let moves: Vec<u32> = handles.iter().map(|h| h.moves()).collect();
        assert_eq!(moves, vec![0, 0, 1, 1], "A and B are untouched");
        let list = ui.downcast_ref::<List>(list_id).unwrap();
        assert_eq!(y0(list, ids[2]), 22.0);
        assert_eq!(y0(list, ids[3]), 22.0 + 25.0 + 1.0);
        assert_eq!(list.content_extent(), 58.0);
    }

    #[test]
    fn resize_from_untracked_child_is_ignored() {
        let mut list = column(0.0);
        let (a, ha) = Block::new(Size::new(10.0, 10.0));
        list.add_element(Box::new(a));
        let (b, hb) = Block::new(Size::new(10.0, 10.0));
        let b = list.add_element(Box::new(b));
        let mut ui = Dispatcher::<TestSurface>::new();
        let list_id = ui.add_element(Box::new(list));
        idle(&mut ui);
        hb.reset_moves();

        ha.grow_to(Size::new(10.0, 40.0));
        idle(&mut ui);
        assert_eq!(hb.moves(), 0);
        let list = ui.downcast_ref::<List>(list_id).unwrap();
        assert_eq!(y0(list, b), 10.0);
    }

    #[test]
    fn remove_reflows_from_predecessor() {
        let mut list = column(1.0);
        let (a, ha) = Block::new(Size::new(10.0, 10.0));
        let a = list.add_element(Box::new(a));
        let (b, _) = Block::new(Size::new(10.0, 30.0));
        let b = list.add_element(Box::new(b));
        let (c, hc) = Block::new(Size::new(10.0, 10.0));
        let c = list.add_element(Box::new(c));
        list.add_listener(b);
        ha.reset_moves();
        hc.reset_moves();

        list.remove_element(b);
        assert!(!list.is_listening(b));
        assert_eq!(list.children(), &[a, c]);
        assert_eq!(y0(&list, a), 0.0);
        assert_eq!(y0(&list, c), 11.0);
        assert_eq!(ha.moves(), 1, "the predecessor anchors the re-flow");
        assert_eq!(list.content_extent(), 21.0);
    }

    #[test]
    fn removing_first_child_reflows_everything() {
        let mut list = column(1.0);
        let (a, _) = Block::new(Size::new(10.0, 10.0));
        let a = list.add_element(Box::new(a));
        let (b, _) = Block::new(Size::new(10.0, 10.0));
        let b = list.add_element(Box::new(b));
        list.remove_element(a);
        assert_eq!(y0(&list, b), 0.0);
        assert_eq!(list.bounds().height(), 10.0);
    }

    #[test]
    fn dead_child_is_pruned_and_tail_reflowed() {
        let mut list = column(0.0);
        let mut ids = vec![];
        let mut handles = vec![];
        for _ in 0..3 {
            let (block, handle) = Block::new(Size::new(10.0, 10.0));
            ids.push(list.add_element(Box::new(block)));
            handles.push(handle);
        }
        list.add_listener(ids[1]);
        let mut ui = Dispatcher::<TestSurface>::new();
        let list_id = ui.add_element(Box::new(list));
        idle(&mut ui);

        handles[1].kill();
        idle(&mut ui);
        let list = ui.downcast_ref::<List>(list_id).unwrap();
        assert_eq!(list.children(), &[ids[0], ids[2]]);
        assert!(!list.is_listening(ids[1]));
        assert_eq!(y0(list, ids[2]), 10.0);
        assert_eq!(list.content_extent(), 20.0);
    }

    #[test]
    fn own_resize_is_raised_once() {
        let mut list = column(0.0);
        list.add_element(Box::new(Block::new(Size::new(10.0, 10.0)).0));
        let mut ui = Dispatcher::<TestSurface>::new();
        let list_id = ui.add_element(Box::new(list));
        idle(&mut ui);
        let events = ui.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, list_id);
        assert!(events[0].1.is_resize());

        idle(&mut ui);
        assert!(ui.take_events().is_empty(), "no change, no notification");
    }

    #[test]
    fn custom_events_are_forwarded() {
        let mut list = column(0.0);
        let (block, handle) = Block::new(Size::new(10.0, 10.0));
        list.add_element(Box::new(block));
        let mut ui = Dispatcher::<TestSurface>::new();
        let list_id = ui.add_element(Box::new(list));
        idle(&mut ui);
        ui.take_events();

        handle.shout();
        idle(&mut ui);
        let events = ui.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, list_id);
        match &events[0].1 {
            ElementEvent::Custom(payload) => {
                assert_eq!(payload.downcast_ref::<&str>(), Some(&"hello"));
            }
            ElementEvent::Resize => panic!("expected the child's payload"),
        }
    }

    #[test]
    fn cross_axis_alignment() {
        let row = |align| {
            List::new(Rect::new(0.0, 0.0, 0.0, 100.0), Axis::Horizontal)
                .with_spacing(5.0)
                .with_align(align)
        };
        for (align, y) in [
            (Align::Leading, 0.0),
            (Align::Center, 40.0),
            (Align::Trailing, 80.0),
        ] {
            let mut list = row(align);
            list.add_element(Box::new(Block::new(Size::new(10.0, 20.0)).0));
            let b = list.add_element(Box::new(Block::new(Size::new(10.0, 20.0)).0));
            let bounds = list.child_bounds(b).unwrap();
            assert_eq!(bounds.origin(), Point::new(15.0, y), "{align:?}");
        }
    }

    #[test]
    fn translate_moves_children() {
        let mut list = column(0.0);
        let a = list.add_element(Box::new(Block::new(Size::new(10.0, 10.0)).0));
        Element::<TestSurface>::translate(&mut list, Vec2::new(3.0, 4.0));
        assert_eq!(list.bounds().origin(), Point::new(3.0, 4.0));
        assert_eq!(list.child_bounds(a).unwrap().origin(), Point::new(3.0, 4.0));
        // New children continue from the moved content.
        let b = list.add_element(Box::new(Block::new(Size::new(10.0, 10.0)).0));
        assert_eq!(list.child_bounds(b).unwrap().origin(), Point::new(3.0, 14.0));
    }

    #[test]
    fn nested_lists_propagate_resizes() {
        let mut inner = column(0.0);
        let (block, handle) = Block::new(Size::new(10.0, 10.0));
        let block = inner.add_element(Box::new(block));
        inner.add_listener(block);

        let mut outer = column(0.0);
        let inner_id = outer.add_element(Box::new(inner));
        let tail = outer.add_element(Box::new(Block::new(Size::new(10.0, 10.0)).0));
        outer.add_listener(inner_id);

        let mut ui = Dispatcher::<TestSurface>::new();
        let outer_id = ui.add_element(Box::new(outer));
        idle(&mut ui);

        handle.grow_to(Size::new(10.0, 30.0));
        idle(&mut ui);
        let outer = ui.downcast_ref::<List>(outer_id).unwrap();
        assert_eq!(outer.child_bounds(inner_id).unwrap().height(), 30.0);
        assert_eq!(y0(outer, tail), 30.0);
    }

    #[test]
    fn label_resize_reflows_followers() {
        let metrics = FixedMetrics {
            advance: 1.0,
            line_height: 10.0,
        };
        let mut list = column(0.0);
        let label = list.add_element(Box::new(Label::new(&metrics, "a", Point::ZERO)));
        let tail = list.add_element(Box::new(Block::new(Size::new(10.0, 10.0)).0));
        list.add_listener(label);
        let mut ui = Dispatcher::<TestSurface>::new();
        let list_id = ui.add_element(Box::new(list));
        idle(&mut ui);

        let list = ui.downcast_mut::<List>(list_id).unwrap();
        list.child_mut::<Label>(label)
            .unwrap()
            .set_text(&metrics, "a\nb\nc");
        idle(&mut ui);
        let list = ui.downcast_ref::<List>(list_id).unwrap();
        assert_eq!(y0(list, tail), 30.0);
    }

    #[test]
    fn nested_list_follows_outer_debug_settings() {
        let settings = DebugSettings::default();
        let mut list = column(0.0);
        list.add_element(Box::new(Block::new(Size::new(10.0, 10.0)).0));
        let mut ui = Dispatcher::<TestSurface>::with_debug(settings.clone());
        ui.add_element(Box::new(list));
        idle(&mut ui);

        settings.set(DebugOverlay::CLIP_REGION);
        let clip = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut surface = TestSurface::default();
        ui.render(&mut surface, clip);
        assert_eq!(
            surface.outlines,
            vec![
                (Rect::new(0.0, 0.0, 50.0, 10.0), DebugOverlay::CLIP_COLOR),
                (clip, DebugOverlay::CLIP_COLOR),
            ],
            "the nested dispatcher draws its own clip outline"
        );
    }

    #[test]
    fn explicit_child_resized_uses_listener_set() {
        let mut list = column(0.0);
        let (a, ha) = Block::new(Size::new(10.0, 10.0));
        let a = list.add_element(Box::new(a));
        let (b, hb) = Block::new(Size::new(10.0, 10.0));
        let b = list.add_element(Box::new(b));
        ha.reset_moves();
        hb.reset_moves();

        list.child_resized(a);
        assert_eq!((ha.moves(), hb.moves()), (0, 0), "not a listener");
        list.add_listener(a);
        list.child_resized(a);
        assert_eq!((ha.moves(), hb.moves()), (1, 1));
        list.remove_listener(a);
        assert!(!list.is_listening(a));
        assert_eq!(y0(&list, b), 10.0);
    }
}
