// Copyright 2025 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Vec2};

/// Primary axis of a list.
///
/// The *major* coordinate runs along the axis, the *minor* coordinate across it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Children are stacked top to bottom.
    #[default]
    Vertical,
    /// Children are stacked left to right.
    Horizontal,
}

impl Axis {
    /// Start of `rect` along the axis.
    #[must_use]
    pub fn major_start(self, rect: Rect) -> f64 {
        match self {
            Self::Vertical => rect.y0,
            Self::Horizontal => rect.x0,
        }
    }

    /// End of `rect` along the axis.
    #[must_use]
    pub fn major_end(self, rect: Rect) -> f64 {
        match self {
            Self::Vertical => rect.y1,
            Self::Horizontal => rect.x1,
        }
    }

    /// Extent of `rect` along the axis.
    #[must_use]
    pub fn major_extent(self, rect: Rect) -> f64 {
        self.major_end(rect) - self.major_start(rect)
    }

    /// Start and end of `rect` across the axis.
    #[must_use]
    pub fn minor_range(self, rect: Rect) -> (f64, f64) {
        match self {
            Self::Vertical => (rect.x0, rect.x1),
            Self::Horizontal => (rect.y0, rect.y1),
        }
    }

    /// Extent of `rect` across the axis.
    #[must_use]
    pub fn minor_extent(self, rect: Rect) -> f64 {
        let (start, end) = self.minor_range(rect);
        end - start
    }

    /// Builds a point from axis-relative coordinates.
    #[must_use]
    pub fn pack(self, major: f64, minor: f64) -> Point {
        match self {
            Self::Vertical => Point::new(minor, major),
            Self::Horizontal => Point::new(major, minor),
        }
    }

    /// A vector of length `major` along the axis.
    #[must_use]
    pub fn major_vec(self, major: f64) -> Vec2 {
        match self {
            Self::Vertical => Vec2::new(0.0, major),
            Self::Horizontal => Vec2::new(major, 0.0),
        }
    }

    /// Component of `v` along the axis.
    #[must_use]
    pub fn major_of(self, v: Vec2) -> f64 {
        match self {
            Self::Vertical => v.y,
            Self::Horizontal => v.x,
        }
    }

    /// `rect` with its major extent replaced by `extent`, keeping its major start.
    #[must_use]
    pub fn with_major_extent(self, rect: Rect, extent: f64) -> Rect {
        match self {
            Self::Vertical => Rect::new(rect.x0, rect.y0, rect.x1, rect.y0 + extent),
            Self::Horizontal => Rect::new(rect.x0, rect.y0, rect.x0 + extent, rect.y1),
        }
    }
}

/// Placement of a child across the primary axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Align {
    /// Flush with the leading edge (left for vertical lists, top for horizontal ones).
    #[default]
    Leading,
    /// Centered on the middle line.
    Center,
    /// Flush with the trailing edge.
    Trailing,
}

impl Align {
    /// Minor start of a child of minor `extent` placed within `range`.
    #[must_use]
    pub fn place(self, range: (f64, f64), extent: f64) -> f64 {
        let (start, end) = range;
        match self {
            Self::Leading => start,
            Self::Center => (start + end) / 2.0 - extent / 2.0,
            Self::Trailing => end - extent,
        }
    }
}
