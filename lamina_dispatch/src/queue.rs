// Copyright 2025 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred mutation queue and handle allocation.
//!
//! Adds and removes requested while a dispatch pass is iterating the live collection are buffered
//! here and applied at the next flush, so callbacks can freely add elements or remove themselves
//! without invalidating the iteration in progress.

use alloc::vec::Vec;
use hashbrown::HashSet;

use crate::types::ElementId;

#[derive(Clone, Copy, Debug)]
struct Slot {
    /// Last generation handed out for this slot (persists across frees).
    generation: u32,
    occupied: bool,
}

/// Buffered add/remove requests plus the generational slot allocator behind [`ElementId`].
///
/// A slot is occupied from [`MutationQueue::request_add`] until [`MutationQueue::release`], which
/// the owner calls once the element has been destroyed.
#[derive(Debug)]
pub struct MutationQueue<T> {
    slots: Vec<Slot>,
    free_list: Vec<usize>,
    adds: Vec<(ElementId, T)>,
    removes: Vec<ElementId>,
    remove_set: HashSet<ElementId>,
}

impl<T> Default for MutationQueue<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            adds: Vec::new(),
            removes: Vec::new(),
            remove_set: HashSet::new(),
        }
    }
}

/// Requests drained by [`MutationQueue::take`].
#[derive(Debug)]
pub struct Pending<T> {
    /// Removals, in request order. Apply these first.
    pub removes: Vec<ElementId>,
    /// Additions, in request order.
    pub adds: Vec<(ElementId, T)>,
    remove_set: HashSet<ElementId>,
}

impl<T> Pending<T> {
    /// Returns `true` if `id` was requested for removal.
    ///
    /// An element both added and removed before the flush must not be inserted.
    #[must_use]
    pub fn is_removed(&self, id: ElementId) -> bool {
        self.remove_set.contains(&id)
    }
}

impl<T> MutationQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a handle for `item` and queues it for insertion.
    pub fn request_add(&mut self, item: T) -> ElementId {
        let id = self.alloc();
        self.adds.push((id, item));
        id
    }

    /// Queues `id` for removal. Duplicate requests and stale handles are ignored.
    pub fn request_remove(&mut self, id: ElementId) {
        if self.is_live(id) && self.remove_set.insert(id) {
            self.removes.push(id);
        }
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adds.is_empty() && self.removes.is_empty()
    }

    /// Returns `true` if `id` has been requested for removal and not yet flushed.
    #[must_use]
    pub fn is_removal_pending(&self, id: ElementId) -> bool {
        self.remove_set.contains(&id)
    }

    /// Drains all queued requests.
    pub fn take(&mut self) -> Pending<T> {
        Pending {
            removes: core::mem::take(&mut self.removes),
            adds: core::mem::take(&mut self.adds),
            remove_set: core::mem::take(&mut self.remove_set),
        }
    }

    /// Returns `true` if `id` refers to an occupied slot of the current generation.
    #[must_use]
    pub fn is_live(&self, id: ElementId) -> bool {
        self.slots
            .get(id.idx())
            .is_some_and(|s| s.occupied && s.generation == id.generation())
    }

    /// Number of occupied slots (live members plus pending additions).
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Frees the slot of a destroyed element. Returns `false` for stale handles.
    pub fn release(&mut self, id: ElementId) -> bool {
        if !self.is_live(id) {
            return false;
        }
        self.slots[id.idx()].occupied = false;
        self.free_list.push(id.idx());
        true
    }

    /// An item still waiting to be added.
    #[must_use]
    pub fn pending(&self, id: ElementId) -> Option<&T> {
        self.adds.iter().find(|(i, _)| *i == id).map(|(_, t)| t)
    }

    /// An item still waiting to be added.
    pub fn pending_mut(&mut self, id: ElementId) -> Option<&mut T> {
        self.adds.iter_mut().find(|(i, _)| *i == id).map(|(_, t)| t)
    }

    /// All items waiting to be added, in request order.
    pub fn pending_iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.adds.iter_mut().map(|(_, t)| t)
    }

    fn alloc(&mut self) -> ElementId {
        if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx];
            slot.generation = slot.generation.saturating_add(1);
            slot.occupied = true;
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            ElementId::new(idx as u32, slot.generation)
        } else {
            self.slots.push(Slot {
                generation: 1,
                occupied: true,
            });
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            ElementId::new((self.slots.len() - 1) as u32, 1)
        }
    }
}
