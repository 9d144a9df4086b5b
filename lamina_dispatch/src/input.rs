// Copyright 2025 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame input snapshot consumed by [`Dispatcher::update`](crate::Dispatcher::update).
//!
//! The frame driver translates whatever its windowing layer reports into an [`InputState`]:
//! the position of every pointer, the edge/level state of each of its buttons, and the key
//! events that arrived since the previous frame.
//!
//! ```
//! use kurbo::Point;
//! use lamina_dispatch::input::{Button, ButtonState, InputState, Key, PointerId};
//!
//! let input = InputState::new()
//!     .pointer(PointerId::PRIMARY, Point::new(5.0, 5.0))
//!     .press(PointerId::PRIMARY, Button::Primary)
//!     .key(Key(65), Some('a'));
//!
//! let pointer = input.pointer_state(PointerId::PRIMARY).unwrap();
//! assert_eq!(pointer.state_of(Button::Primary), ButtonState::JUST_PRESSED);
//! assert!(input.any_pressed_or_held());
//! assert_eq!(input.keys().len(), 1);
//! ```

use alloc::vec::Vec;
use kurbo::Point;
use smallvec::SmallVec;

/// Pointer identifier for tracking multiple concurrent pointers (mouse, touches, pens).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointerId(pub u64);

impl PointerId {
    /// The mouse, or the only pointer on single-pointer platforms.
    pub const PRIMARY: Self = Self(0);
}

/// Pointer button identifier (decoupled from any windowing library).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    /// Left mouse button, pen tip, or touch contact.
    Primary,
    /// Right mouse button or pen barrel button.
    Secondary,
    /// Middle mouse button.
    Auxiliary,
    /// Any other button, by platform index.
    Other(u8),
}

bitflags::bitflags! {
    /// Edge and level state of a single pointer button for one frame.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ButtonState: u8 {
        /// The button went down since the previous frame.
        const JUST_PRESSED  = 0b0000_0001;
        /// The button is down.
        const HELD          = 0b0000_0010;
        /// The button went up since the previous frame.
        const JUST_RELEASED = 0b0000_0100;
    }
}

/// Platform key code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key(pub u32);

/// A key event: the key code plus the character it produced, if any.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// Platform key code.
    pub key: Key,
    /// Character produced by the key press, if any.
    pub ch: Option<char>,
}

impl KeyEvent {
    /// Creates a key event.
    #[must_use]
    pub const fn new(key: Key, ch: Option<char>) -> Self {
        Self { key, ch }
    }
}

/// State of one pointer for the current frame.
#[derive(Clone, Debug)]
pub struct PointerState {
    /// Which pointer this is.
    pub id: PointerId,
    /// Pointer position in the dispatcher's coordinate space.
    ///
    /// `None` means the pointer is not over this context at all. Buttons may still be reported so
    /// that every element receives the corresponding "elsewhere" notification.
    pub position: Option<Point>,
    /// Per-button state; buttons without any flag set are omitted.
    pub buttons: SmallVec<[(Button, ButtonState); 3]>,
}

impl PointerState {
    /// Creates a pointer with no buttons.
    #[must_use]
    pub fn new(id: PointerId, position: Option<Point>) -> Self {
        Self {
            id,
            position,
            buttons: SmallVec::new(),
        }
    }

    /// Returns the state of `button`, or an empty state if it was not reported.
    #[must_use]
    pub fn state_of(&self, button: Button) -> ButtonState {
        self.buttons
            .iter()
            .find(|(b, _)| *b == button)
            .map(|(_, s)| *s)
            .unwrap_or_default()
    }

    /// Iterates buttons whose state contains all of `state`, in report order.
    pub fn buttons_with(&self, state: ButtonState) -> impl Iterator<Item = Button> + '_ {
        self.buttons
            .iter()
            .filter(move |(_, s)| s.contains(state))
            .map(|(b, _)| *b)
    }

    /// Adds `state` to the flags reported for `button`.
    pub fn insert_button(&mut self, button: Button, state: ButtonState) {
        if let Some((_, s)) = self.buttons.iter_mut().find(|(b, _)| *b == button) {
            *s |= state;
        } else {
            self.buttons.push((button, state));
        }
    }
}

/// Input for one frame: pointers and buffered key events.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    pointers: SmallVec<[PointerState; 2]>,
    keys: Vec<KeyEvent>,
}

impl InputState {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports pointer `id` at `position`.
    #[must_use]
    pub fn pointer(mut self, id: PointerId, position: Point) -> Self {
        self.set_pointer(id, Some(position));
        self
    }

    /// Reports `button` of pointer `id` as just pressed this frame.
    #[must_use]
    pub fn press(mut self, id: PointerId, button: Button) -> Self {
        self.set_button(id, button, ButtonState::JUST_PRESSED);
        self
    }

    /// Reports `button` of pointer `id` as held down.
    #[must_use]
    pub fn hold(mut self, id: PointerId, button: Button) -> Self {
        self.set_button(id, button, ButtonState::HELD);
        self
    }

    /// Reports `button` of pointer `id` as just released this frame.
    #[must_use]
    pub fn release(mut self, id: PointerId, button: Button) -> Self {
        self.set_button(id, button, ButtonState::JUST_RELEASED);
        self
    }

    /// Appends a key event.
    #[must_use]
    pub fn key(mut self, key: Key, ch: Option<char>) -> Self {
        self.push_key(KeyEvent::new(key, ch));
        self
    }

    /// Sets the position of pointer `id`, adding the pointer if needed.
    pub fn set_pointer(&mut self, id: PointerId, position: Option<Point>) {
        self.pointer_mut(id).position = position;
    }

    /// Adds `state` to `button` of pointer `id`, adding the pointer if needed.
    ///
    /// Pointers added this way have no position until [`InputState::set_pointer`] is called.
    pub fn set_button(&mut self, id: PointerId, button: Button, state: ButtonState) {
        self.pointer_mut(id).insert_button(button, state);
    }

    /// Appends a key event.
    pub fn push_key(&mut self, key: KeyEvent) {
        self.keys.push(key);
    }

    /// Adds a fully described pointer, replacing any pointer with the same id.
    pub fn push_pointer(&mut self, pointer: PointerState) {
        if let Some(p) = self.pointers.iter_mut().find(|p| p.id == pointer.id) {
            *p = pointer;
        } else {
            self.pointers.push(pointer);
        }
    }

    /// Removes all pointers and keys, keeping allocations for the next frame.
    pub fn clear(&mut self) {
        self.pointers.clear();
        self.keys.clear();
    }

    /// All pointers, in report order.
    #[must_use]
    pub fn pointers(&self) -> &[PointerState] {
        &self.pointers
    }

    /// Looks up a pointer by id.
    #[must_use]
    pub fn pointer_state(&self, id: PointerId) -> Option<&PointerState> {
        self.pointers.iter().find(|p| p.id == id)
    }

    /// Key events in arrival order.
    #[must_use]
    pub fn keys(&self) -> &[KeyEvent] {
        &self.keys
    }

    /// Returns `true` if any button of any pointer was just pressed or is held.
    #[must_use]
    pub fn any_pressed_or_held(&self) -> bool {
        self.pointers.iter().any(|p| {
            p.buttons
                .iter()
                .any(|(_, s)| s.intersects(ButtonState::JUST_PRESSED | ButtonState::HELD))
        })
    }

    fn pointer_mut(&mut self, id: PointerId) -> &mut PointerState {
        let idx = match self.pointers.iter().position(|p| p.id == id) {
            Some(idx) => idx,
            None => {
                self.pointers.push(PointerState::new(id, None));
                self.pointers.len() - 1
            }
        };
        &mut self.pointers[idx]
    }
}

/// Payload for press and held callbacks (primary and "elsewhere").
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Pointer that produced the event.
    pub pointer: PointerId,
    /// Pointer position, if the pointer is over the dispatching context.
    pub position: Option<Point>,
    /// Button the event refers to.
    pub button: Button,
}

/// Payload for the hover callback.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HoverEvent {
    /// Pointer hovering the element.
    pub pointer: PointerId,
    /// Pointer position.
    pub position: Point,
}
