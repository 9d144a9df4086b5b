// Copyright 2025 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Depth-ordered collection.
//!
//! Items are kept in ascending depth order: ascending iteration is paint order, descending
//! iteration is hit-test order ("what you see is what you click").
//!
//! Depth may change after insertion. Rather than re-sorting on every change, callers run a single
//! adjacency scan once per pass ([`DepthList::resort_if_needed`]) and re-sort only when the scan
//! finds a violation. Depth changes are rare compared to frames, so the scan is the common cost.

use alloc::vec::Vec;

/// Items that carry a depth key. Lower depth paints and hit-tests under higher depth.
pub trait Layered {
    /// Current depth.
    fn depth(&self) -> i32;
}

/// A vector kept in ascending depth order.
#[derive(Clone, Debug)]
pub struct DepthList<T> {
    items: Vec<T>,
}

impl<T> Default for DepthList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Layered> DepthList<T> {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `item` after every item of lower or equal depth.
    ///
    /// Items of equal depth keep their insertion order.
    pub fn insert_sorted(&mut self, item: T) {
        let depth = item.depth();
        let at = self.items.partition_point(|e| e.depth() <= depth);
        self.items.insert(at, item);
    }

    /// Returns `true` if depths are non-decreasing (single adjacency scan).
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.items.windows(2).all(|w| w[0].depth() <= w[1].depth())
    }

    /// Stable sort by depth only.
    pub fn resort(&mut self) {
        self.items.sort_by_key(Layered::depth);
    }

    /// Re-sorts if the adjacency scan finds a violation. Returns `true` if a sort happened.
    pub fn resort_if_needed(&mut self) -> bool {
        if self.is_ordered() {
            false
        } else {
            self.resort();
            true
        }
    }
}

impl<T> DepthList<T> {
    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Paint order (lowest depth first).
    pub fn iter_ascending(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.items.iter()
    }

    /// Hit-test order (highest depth first).
    pub fn iter_descending(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.items.iter().rev()
    }

    /// Mutable paint order.
    pub fn iter_ascending_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut T> {
        self.items.iter_mut()
    }

    /// Mutable hit-test order.
    pub fn iter_descending_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut T> {
        self.items.iter_mut().rev()
    }

    /// First item (in ascending order) matching `pred`.
    pub fn find_mut(&mut self, mut pred: impl FnMut(&T) -> bool) -> Option<&mut T> {
        self.items.iter_mut().find(|e| pred(e))
    }

    /// First item (in ascending order) matching `pred`.
    pub fn find(&self, mut pred: impl FnMut(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|e| pred(e))
    }

    /// Removes and returns the first item matching `pred`.
    pub fn remove(&mut self, pred: impl FnMut(&T) -> bool) -> Option<T> {
        let at = self.items.iter().position(pred)?;
        Some(self.items.remove(at))
    }

    /// Removes every item matching `pred`, returning them in ascending order.
    pub fn remove_all(&mut self, mut pred: impl FnMut(&mut T) -> bool) -> Vec<T> {
        self.items.extract_if(.., |e| pred(e)).collect()
    }

    /// Removes every item, returning them in ascending order.
    pub fn drain(&mut self) -> Vec<T> {
        core::mem::take(&mut self.items)
    }
}
