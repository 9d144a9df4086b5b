// Copyright 2025 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use core::any::Any;
use kurbo::{Point, Rect, Vec2};

use lamina_dispatch::surface::{Color, Primitive, Surface, TextMetrics, measure};
use lamina_dispatch::{Element, ElementEvent, EventCx};

/// A run of text sized by [`TextMetrics`].
///
/// Changing the text with [`Label::set_text`] re-measures it. If the size changed, the label
/// raises [`ElementEvent::Resize`] at its next update so a containing list can re-flow.
#[derive(Clone, Debug)]
pub struct Label {
    text: String,
    bounds: Rect,
    color: Color,
    depth: i32,
    resize_pending: bool,
}

impl Label {
    /// Creates a label at `origin` sized to `text`.
    pub fn new(
        metrics: &(impl TextMetrics + ?Sized),
        text: impl Into<String>,
        origin: Point,
    ) -> Self {
        let text = text.into();
        let size = measure(metrics, &text);
        Self {
            text,
            bounds: Rect::from_origin_size(origin, size),
            color: Color::BLACK,
            depth: 0,
            resize_pending: false,
        }
    }

    /// Sets the text color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Sets the depth of the label within its dispatcher.
    #[must_use]
    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    /// Current text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text and re-measures it, keeping the origin.
    pub fn set_text(&mut self, metrics: &(impl TextMetrics + ?Sized), text: impl Into<String>) {
        self.text = text.into();
        let size = measure(metrics, &self.text);
        if size != self.bounds.size() {
            self.bounds = Rect::from_origin_size(self.bounds.origin(), size);
            self.resize_pending = true;
        }
    }
}

impl<S: Surface + ?Sized> Element<S> for Label {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn translate(&mut self, delta: Vec2) {
        self.bounds = self.bounds + delta;
    }

    fn depth(&self) -> i32 {
        self.depth
    }

    fn update(&mut self, cx: &mut EventCx<'_, S>, _dt: f64) {
        if self.resize_pending {
            self.resize_pending = false;
            cx.emit(ElementEvent::Resize);
        }
    }

    fn render(&mut self, surface: &mut S, clip: Rect) {
        let text = Primitive::Text {
            origin: self.bounds.origin(),
            text: &self.text,
            color: self.color,
        };
        surface.draw(&text, clip);
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        Some(self)
    }
}
