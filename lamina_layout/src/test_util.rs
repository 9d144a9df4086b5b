// Copyright 2025 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for unit tests.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;
use kurbo::{Point, Rect, Size, Vec2};

use lamina_dispatch::surface::{Color, Primitive, Surface, TextMetrics};
use lamina_dispatch::{Element, ElementEvent, EventCx};

/// Test-side controls for a [`Block`].
#[derive(Clone, Debug, Default)]
pub(crate) struct BlockHandle {
    moves: Rc<Cell<u32>>,
    grow: Rc<Cell<Option<Size>>>,
    dead: Rc<Cell<bool>>,
    shout: Rc<Cell<bool>>,
}

impl BlockHandle {
    /// Number of times the block was positioned with `set_origin`.
    pub(crate) fn moves(&self) -> u32 {
        self.moves.get()
    }

    pub(crate) fn reset_moves(&self) {
        self.moves.set(0);
    }

    /// Changes the block's size at its next update and raises a resize.
    pub(crate) fn grow_to(&self, size: Size) {
        self.grow.set(Some(size));
    }

    pub(crate) fn kill(&self) {
        self.dead.set(true);
    }

    /// Raises a custom notification at the block's next update.
    pub(crate) fn shout(&self) {
        self.shout.set(true);
    }
}

/// A plain rectangle controlled through a [`BlockHandle`].
#[derive(Debug)]
pub(crate) struct Block {
    bounds: Rect,
    handle: BlockHandle,
}

impl Block {
    pub(crate) fn new(size: Size) -> (Self, BlockHandle) {
        let handle = BlockHandle::default();
        let block = Self {
            bounds: Rect::from_origin_size(Point::ZERO, size),
            handle: handle.clone(),
        };
        (block, handle)
    }
}

impl<S: Surface + ?Sized> Element<S> for Block {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn translate(&mut self, delta: Vec2) {
        self.bounds = self.bounds + delta;
    }

    fn set_origin(&mut self, origin: Point) {
        self.handle.moves.set(self.handle.moves.get() + 1);
        self.bounds = Rect::from_origin_size(origin, self.bounds.size());
    }

    fn is_dead(&self) -> bool {
        self.handle.dead.get()
    }

    fn update(&mut self, cx: &mut EventCx<'_, S>, _dt: f64) {
        if let Some(size) = self.handle.grow.take() {
            self.bounds = Rect::from_origin_size(self.bounds.origin(), size);
            cx.emit(ElementEvent::Resize);
        }
        if self.handle.shout.replace(false) {
            cx.emit(ElementEvent::Custom(Box::new("hello")));
        }
    }
}

/// Surface that records fills, outlines and text, and tracks its clip stack.
#[derive(Debug, Default)]
pub(crate) struct TestSurface {
    pub(crate) fills: Vec<(Rect, Color)>,
    pub(crate) outlines: Vec<(Rect, Color)>,
    pub(crate) texts: Vec<(Point, String)>,
    clips: Vec<Rect>,
}

impl Surface for TestSurface {
    fn draw(&mut self, primitive: &Primitive<'_>, _region: Rect) {
        match *primitive {
            Primitive::Fill { rect, color } => self.fills.push((rect, color)),
            Primitive::Text { origin, text, .. } => self.texts.push((origin, String::from(text))),
            Primitive::Outline { rect, color } => self.outlines.push((rect, color)),
        }
    }

    fn push_clip(&mut self, clip: Rect) {
        self.clips.push(clip);
    }

    fn pop_clip(&mut self) {
        self.clips.pop();
    }

    fn current_clip(&self) -> Option<Rect> {
        self.clips.last().copied()
    }
}

/// Monospace metrics.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FixedMetrics {
    pub(crate) advance: f64,
    pub(crate) line_height: f64,
}

impl TextMetrics for FixedMetrics {
    fn line_height(&self) -> f64 {
        self.line_height
    }

    #[allow(clippy::cast_precision_loss, reason = "test strings are short")]
    fn width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.advance
    }
}
