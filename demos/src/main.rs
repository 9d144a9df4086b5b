// Copyright 2025 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless walkthrough of a dispatcher driving a text field and a scrolling list.
//!
//! Frames are scripted instead of coming from a window, and the "renderer" prints each draw
//! call indented by clip depth. Run with `RUST_LOG=debug` (or `trace`) to see the dispatcher's
//! own logging.

use std::any::Any;

use kurbo::{Point, Rect, Vec2};
use lamina_dispatch::input::{Button, InputState, Key, KeyEvent, PointerEvent, PointerId};
use lamina_dispatch::surface::{Color, Primitive, Surface, TextMetrics};
use lamina_dispatch::{
    DebugOverlay, DebugSettings, Dispatcher, Element, ElementEvent, ElementId, EventCx,
};
use lamina_layout::{Axis, Label, ScrollAlign, ScrollLayout};

const FRAME: f64 = 1.0 / 60.0;

/// Prints draw calls instead of rasterizing them.
#[derive(Default)]
struct Console {
    clips: Vec<Rect>,
}

impl Surface for Console {
    fn draw(&mut self, primitive: &Primitive<'_>, region: Rect) {
        let indent = "  ".repeat(self.clips.len());
        match primitive {
            Primitive::Fill { rect, .. } => println!("{indent}fill    {rect:?}"),
            Primitive::Outline { rect, color } => {
                println!("{indent}outline {rect:?} ({}, {}, {})", color.r, color.g, color.b);
            }
            Primitive::Text { origin, text, .. } => {
                if region.contains(*origin) {
                    println!("{indent}text    {origin:?} {text:?}");
                }
            }
        }
    }

    fn push_clip(&mut self, clip: Rect) {
        println!("{}clip    {clip:?}", "  ".repeat(self.clips.len()));
        self.clips.push(clip);
    }

    fn pop_clip(&mut self) {
        self.clips.pop();
    }

    fn current_clip(&self) -> Option<Rect> {
        self.clips.last().copied()
    }
}

/// Monospace metrics, six pixels per character.
struct Mono;

impl TextMetrics for Mono {
    fn line_height(&self) -> f64 {
        14.0
    }

    fn width(&self, text: &str) -> f64 {
        6.0 * text.chars().count() as f64
    }
}

/// Single-line text input. Reports its text to the host once per batch of keys.
struct TextField {
    bounds: Rect,
    text: String,
    edited: bool,
}

impl TextField {
    fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            text: String::new(),
            edited: false,
        }
    }
}

impl Element<Console> for TextField {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn translate(&mut self, delta: Vec2) {
        self.bounds = self.bounds + delta;
    }

    fn render(&mut self, surface: &mut Console, clip: Rect) {
        let background = Primitive::Fill {
            rect: self.bounds,
            color: Color::WHITE,
        };
        surface.draw(&background, clip);
        let text = Primitive::Text {
            origin: self.bounds.origin() + Vec2::new(4.0, 3.0),
            text: &self.text,
            color: Color::BLACK,
        };
        surface.draw(&text, clip);
    }

    fn pointer_pressed(&mut self, _cx: &mut EventCx<'_, Console>, event: &PointerEvent) {
        log::info!("text field pressed at {:?}", event.position);
    }

    fn key_input(&mut self, _cx: &mut EventCx<'_, Console>, key: &KeyEvent) {
        match key.ch {
            Some('\u{8}') => {
                self.edited |= self.text.pop().is_some();
            }
            Some(ch) => {
                self.text.push(ch);
                self.edited = true;
            }
            None => {}
        }
    }

    fn key_input_done(&mut self, cx: &mut EventCx<'_, Console>) {
        if std::mem::take(&mut self.edited) {
            cx.emit(ElementEvent::Custom(Box::new(self.text.clone())));
        }
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

fn typing(text: &str) -> InputState {
    text.chars()
        .fold(InputState::new(), |input, ch| input.key(Key(u32::from(ch)), Some(ch)))
}

fn report(ui: &mut Dispatcher<Console>) {
    for (id, event) in ui.take_events() {
        match event {
            ElementEvent::Custom(payload) => match payload.downcast_ref::<String>() {
                Some(text) => println!("event from {id:?}: text is now {text:?}"),
                None => println!("event from {id:?}: custom payload"),
            },
            ElementEvent::Resize => println!("event from {id:?}: resized"),
        }
    }
}

fn scroll_state(ui: &Dispatcher<Console>, id: ElementId) {
    if let Some(scroll) = ui.downcast_ref::<ScrollLayout<Console>>(id) {
        println!(
            "scroll offset {:.1} of {:.1}, thumb {:?}",
            scroll.scroll_offset(),
            scroll.max_scroll(),
            scroll.thumb_rect()
        );
    }
}

fn main() {
    env_logger::init();

    let debug = DebugSettings::default();
    let mut ui: Dispatcher<Console> = Dispatcher::with_debug(debug.clone());
    let field = ui.add_element(Box::new(TextField::new(Rect::new(10.0, 10.0, 210.0, 30.0))));

    let mut scroll: ScrollLayout<Console> =
        ScrollLayout::new(Rect::new(10.0, 40.0, 210.0, 140.0), Axis::Vertical)
            .with_spacing(2.0)
            .with_debug(debug.clone());
    let rows: Vec<ElementId> = (1..=20)
        .map(|n| scroll.add_element(Box::new(Label::new(&Mono, format!("row {n}"), Point::ZERO))))
        .collect();
    let scroll = ui.add_element(Box::new(scroll));

    println!("-- frame 1: elements join");
    ui.update(&InputState::new(), FRAME);
    scroll_state(&ui, scroll);

    println!("-- frame 2: click the text field");
    let click = InputState::new()
        .pointer(PointerId::PRIMARY, Point::new(50.0, 20.0))
        .press(PointerId::PRIMARY, Button::Primary);
    ui.update(&click, FRAME);
    println!("click focus {:?} (field is {field:?})", ui.click_focus());

    println!("-- frame 3: type");
    ui.update(&typing("hello"), FRAME);
    report(&mut ui);

    println!("-- frames 4-6: drag the scroll bar");
    let at = |y| InputState::new().pointer(PointerId::PRIMARY, Point::new(206.0, y));
    ui.update(&at(45.0).press(PointerId::PRIMARY, Button::Primary), FRAME);
    ui.update(&at(55.0).hold(PointerId::PRIMARY, Button::Primary), FRAME);
    ui.update(&at(55.0), FRAME);
    scroll_state(&ui, scroll);

    println!("-- frame 7: keys follow the click focus, which moved to the scroll list");
    ui.update(&typing("lost"), FRAME);
    report(&mut ui);

    println!("-- jump to the last row");
    if let Some(list) = ui.downcast_mut::<ScrollLayout<Console>>(scroll) {
        if let Some(&last) = rows.last() {
            list.scroll_to_child(last, ScrollAlign::End);
        }
    }
    scroll_state(&ui, scroll);

    println!("-- render with focus and clip overlays");
    debug.set(DebugOverlay::FOCUS_BOXES | DebugOverlay::CLIP_REGION);
    let mut console = Console::default();
    ui.render(&mut console, Rect::new(0.0, 0.0, 220.0, 150.0));
}
