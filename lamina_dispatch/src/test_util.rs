// Copyright 2025 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for unit tests: a recording probe element, a recording surface, and fixed
//! text metrics.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::any::Any;
use core::cell::{Cell, RefCell};
use kurbo::{Rect, Vec2};

use crate::element::{Element, EventCx};
use crate::input::{Button, HoverEvent, KeyEvent, PointerEvent};
use crate::surface::{Color, Primitive, Surface, TextMetrics};
use crate::types::ElementEvent;

/// One observed callback.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    Pressed(Button),
    PressedElsewhere(Button),
    Held(Button),
    HeldElsewhere(Button),
    Hovered,
    HoveredElsewhere,
    Update,
    Key(Option<char>),
    KeysDone,
    Render(Rect),
    Destroy,
}

pub(crate) type CallLog = Rc<RefCell<Vec<(&'static str, Call)>>>;

pub(crate) fn new_log() -> CallLog {
    Rc::default()
}

/// Calls recorded for the probe called `name`, in order.
pub(crate) fn calls_of(log: &CallLog, name: &str) -> Vec<Call> {
    log.borrow()
        .iter()
        .filter(|(n, _)| *n == name)
        .map(|(_, c)| c.clone())
        .collect()
}

enum Depth {
    Fixed(i32),
    Shared(Rc<Cell<i32>>),
}

/// Element that records every callback it receives.
pub(crate) struct Probe {
    pub(crate) name: &'static str,
    bounds: Rect,
    depth: Depth,
    dead: Option<Rc<Cell<bool>>>,
    removes_self: bool,
    emits_resize: bool,
    spawn: Option<Box<Probe>>,
    log: CallLog,
}

impl Probe {
    pub(crate) fn new(name: &'static str, bounds: Rect, log: &CallLog) -> Self {
        Self {
            name,
            bounds,
            depth: Depth::Fixed(0),
            dead: None,
            removes_self: false,
            emits_resize: false,
            spawn: None,
            log: log.clone(),
        }
    }

    pub(crate) fn with_depth(mut self, depth: i32) -> Self {
        self.depth = Depth::Fixed(depth);
        self
    }

    pub(crate) fn with_shared_depth(mut self, depth: &Rc<Cell<i32>>) -> Self {
        self.depth = Depth::Shared(depth.clone());
        self
    }

    /// Reports dead while `flag` is set.
    pub(crate) fn dying(mut self, flag: &Rc<Cell<bool>>) -> Self {
        self.dead = Some(flag.clone());
        self
    }

    /// Requests its own removal from every update.
    pub(crate) fn removing_self(mut self) -> Self {
        self.removes_self = true;
        self
    }

    /// Emits a single resize notification from its first update.
    pub(crate) fn emitting_resize(mut self) -> Self {
        self.emits_resize = true;
        self
    }

    /// Adds `child` to its dispatcher from its first update.
    pub(crate) fn spawning(mut self, child: Self) -> Self {
        self.spawn = Some(Box::new(child));
        self
    }

    fn record(&self, call: Call) {
        self.log.borrow_mut().push((self.name, call));
    }
}

impl<S: Surface + ?Sized> Element<S> for Probe {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn translate(&mut self, delta: Vec2) {
        self.bounds = self.bounds + delta;
    }

    fn depth(&self) -> i32 {
        match &self.depth {
            Depth::Fixed(d) => *d,
            Depth::Shared(d) => d.get(),
        }
    }

    fn is_dead(&self) -> bool {
        self.dead.as_ref().is_some_and(|d| d.get())
    }

    fn update(&mut self, cx: &mut EventCx<'_, S>, _dt: f64) {
        self.record(Call::Update);
        if self.removes_self {
            cx.remove_self();
        }
        if self.emits_resize {
            self.emits_resize = false;
            cx.emit(ElementEvent::Resize);
        }
        if let Some(child) = self.spawn.take() {
            cx.add_element(child);
        }
    }

    fn render(&mut self, _surface: &mut S, clip: Rect) {
        self.record(Call::Render(clip));
    }

    fn pointer_pressed(&mut self, _cx: &mut EventCx<'_, S>, event: &PointerEvent) {
        self.record(Call::Pressed(event.button));
    }

    fn pointer_pressed_elsewhere(&mut self, _cx: &mut EventCx<'_, S>, event: &PointerEvent) {
        self.record(Call::PressedElsewhere(event.button));
    }

    fn pointer_held(&mut self, _cx: &mut EventCx<'_, S>, event: &PointerEvent) {
        self.record(Call::Held(event.button));
    }

    fn pointer_held_elsewhere(&mut self, _cx: &mut EventCx<'_, S>, event: &PointerEvent) {
        self.record(Call::HeldElsewhere(event.button));
    }

    fn hovered(&mut self, _cx: &mut EventCx<'_, S>, _event: &HoverEvent) {
        self.record(Call::Hovered);
    }

    fn hovered_elsewhere(&mut self, _cx: &mut EventCx<'_, S>) {
        self.record(Call::HoveredElsewhere);
    }

    fn key_input(&mut self, _cx: &mut EventCx<'_, S>, key: &KeyEvent) {
        self.record(Call::Key(key.ch));
    }

    fn key_input_done(&mut self, _cx: &mut EventCx<'_, S>) {
        self.record(Call::KeysDone);
    }

    fn destroy(&mut self) {
        self.record(Call::Destroy);
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        Some(self)
    }
}

/// Surface that records draws and tracks its clip stack.
#[derive(Debug, Default)]
pub(crate) struct RecordingSurface {
    /// Every draw with the clip in effect at the time.
    pub(crate) draws: Vec<(Primitive<'static>, Option<Rect>)>,
    /// Every clip pushed, in order.
    pub(crate) pushed: Vec<Rect>,
    pub(crate) max_clip_depth: usize,
    clips: Vec<Rect>,
}

impl RecordingSurface {
    pub(crate) fn outlines(&self) -> Vec<(Rect, Color)> {
        self.draws
            .iter()
            .filter_map(|(p, _)| match p {
                Primitive::Outline { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn draw(&mut self, primitive: &Primitive<'_>, _region: Rect) {
        let owned = match *primitive {
            Primitive::Fill { rect, color } => Primitive::Fill { rect, color },
            Primitive::Outline { rect, color } => Primitive::Outline { rect, color },
            // Text content is not needed by the tests that use this surface.
            Primitive::Text { origin, color, .. } => Primitive::Text {
                origin,
                text: "",
                color,
            },
        };
        self.draws.push((owned, self.current_clip()));
    }

    fn push_clip(&mut self, clip: Rect) {
        self.clips.push(clip);
        self.pushed.push(clip);
        self.max_clip_depth = self.max_clip_depth.max(self.clips.len());
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
