// Copyright 2025 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The narrow drawing and text-measuring interface consumed by the dispatcher.
//!
//! Rendering backends implement [`Surface`] (draw calls plus a clip stack) and, where layouts size
//! themselves to text, [`TextMetrics`]. Everything else in this crate is generic over them.

use core::ops::{Deref, DerefMut};
use kurbo::{Point, Rect, Size};

/// 8-bit RGBA color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Creates a color with alpha.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
}

/// A single draw call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Primitive<'a> {
    /// A filled rectangle.
    Fill {
        /// Area to fill.
        rect: Rect,
        /// Fill color.
        color: Color,
    },
    /// A one-pixel rectangle outline.
    Outline {
        /// Rectangle to outline.
        rect: Rect,
        /// Stroke color.
        color: Color,
    },
    /// A run of text; layout and glyph shaping are the backend's concern.
    Text {
        /// Top-left corner of the first line.
        origin: Point,
        /// Text to draw.
        text: &'a str,
        /// Text color.
        color: Color,
    },
}

/// A drawing target with a clip stack.
pub trait Surface {
    /// Draws `primitive`, restricted to `region` and the current clip.
    fn draw(&mut self, primitive: &Primitive<'_>, region: Rect);

    /// Pushes a clip rectangle. The effective clip is the one pushed; callers intersect first.
    fn push_clip(&mut self, clip: Rect);

    /// Pops the most recently pushed clip rectangle.
    fn pop_clip(&mut self);

    /// The clip currently in effect, or `None` if nothing is pushed.
    fn current_clip(&self) -> Option<Rect>;
}

/// Text measurement provided by the font layer.
pub trait TextMetrics {
    /// Height of one line of text.
    fn line_height(&self) -> f64;

    /// Advance width of a single line of `text`.
    fn width(&self, text: &str) -> f64;
}

/// Measures a possibly multi-line string: the widest line by the number of lines.
///
/// An empty string measures as one empty line.
#[must_use]
pub fn measure(metrics: &(impl TextMetrics + ?Sized), text: &str) -> Size {
    let mut lines = 0_u32;
    let mut width = 0.0_f64;
    for line in text.split('\n') {
        lines += 1;
        width = width.max(metrics.width(line));
    }
    Size::new(width, f64::from(lines) * metrics.line_height())
}

/// Pushes a clip on creation and pops it on drop.
///
/// The pop happens even while unwinding from a panic in nested rendering, so a surface is never
/// left with a stray clip.
///
/// ```
/// use kurbo::Rect;
/// use lamina_dispatch::surface::{ClipGuard, Primitive, Surface};
///
/// #[derive(Default)]
/// struct Clips(Vec<Rect>);
///
/// impl Surface for Clips {
///     fn draw(&mut self, _: &Primitive<'_>, _: Rect) {}
///     fn push_clip(&mut self, clip: Rect) { self.0.push(clip); }
///     fn pop_clip(&mut self) { self.0.pop(); }
///     fn current_clip(&self) -> Option<Rect> { self.0.last().copied() }
/// }
///
/// let mut surface = Clips::default();
/// {
///     let guard = ClipGuard::new(&mut surface, Rect::new(0.0, 0.0, 10.0, 10.0));
///     assert_eq!(guard.current_clip(), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
/// }
/// assert_eq!(surface.current_clip(), None);
/// ```
#[derive(Debug)]
pub struct ClipGuard<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: Surface + ?Sized> ClipGuard<'a, S> {
    /// Pushes `clip` onto `surface`.
    pub fn new(surface: &'a mut S, clip: Rect) -> Self {
        surface.push_clip(clip);
        Self { surface }
    }
}

impl<S: Surface + ?Sized> Deref for ClipGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for ClipGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface + ?Sized> Drop for ClipGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.pop_clip();
    }
}

/// Returns `true` if `rect` has no area (including inverted rectangles).
pub(crate) fn is_empty_rect(rect: Rect) -> bool {
    rect.width() <= 0.0 || rect.height() <= 0.0
}
