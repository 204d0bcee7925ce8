// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-capacity ring buffer used for sample histories.

use alloc::vec::Vec;

/// A ring buffer that keeps the most recent `capacity` items.
///
/// Pushing into a full buffer overwrites the oldest item. Indexing is
/// relative to the oldest retained item, so `get(0)` is the oldest and
/// `get(len - 1)` is the newest.
#[derive(Clone, Debug)]
pub struct CircularBuffer<T> {
    items: Vec<T>,
    capacity: usize,
    // Slot that the next push overwrites once the buffer is full.
    head: usize,
}

impl<T> CircularBuffer<T> {
    /// Create an empty buffer. A capacity of zero is clamped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
            head: 0,
        }
    }

    /// Append an item, evicting the oldest one when full.
    pub fn push(&mut self, item: T) {
        if self.items.len() < self.capacity {
            self.items.push(item);
        } else {
            self.items[self.head] = item;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    /// The `i`-th oldest item, if present.
    pub fn get(&self, i: usize) -> Option<&T> {
        if i >= self.items.len() {
            return None;
        }
        let slot = if self.items.len() < self.capacity {
            i
        } else {
            (self.head + i) % self.capacity
        };
        self.items.get(slot)
    }

    /// The most recently pushed item.
    pub fn newest(&self) -> Option<&T> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Number of retained items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing has been pushed since the last clear.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum number of retained items.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every item, keeping the capacity.
    pub fn clear(&mut self) {
        self.items.clear();
        self.head = 0;
    }
}
