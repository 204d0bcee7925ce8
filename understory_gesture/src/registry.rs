// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational arena that owns recognizers.

use alloc::vec::Vec;
use core::fmt;

use crate::handle::Handle;

/// Slot storage addressed by [`Handle`].
///
/// - Insert reuses the most recently freed slot and bumps its generation.
/// - Lookups with a stale handle (freed slot, or reused with a newer generation) return `None`.
pub struct Registry<T> {
    slots: Vec<Option<T>>,
    generations: Vec<u32>, // last generation per slot (persists across frees)
    free_list: Vec<usize>,
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("live", &self.len())
            .field("slots", &self.slots.len())
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }
}

impl<T> Registry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value built from its own handle.
    pub fn insert_with(&mut self, make: impl FnOnce(Handle) -> T) -> Handle {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Handle uses 32-bit slot indices by design."
            )]
            (idx as u32, generation)
        } else {
            self.slots.push(None);
            self.generations.push(1);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Handle uses 32-bit slot indices by design."
            )]
            ((self.slots.len() - 1) as u32, 1)
        };
        let handle = Handle::new(idx, generation);
        self.slots[handle.idx()] = Some(make(handle));
        handle
    }

    /// Remove and return the value for `handle`, freeing its slot.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        if !self.is_alive(handle) {
            return None;
        }
        let value = self.slots[handle.idx()].take();
        self.free_list.push(handle.idx());
        value
    }

    /// Returns `true` if `handle` refers to a live slot.
    pub fn is_alive(&self, handle: Handle) -> bool {
        self.generations.get(handle.idx()) == Some(&handle.generation())
            && self.slots[handle.idx()].is_some()
    }

    /// Shared access.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        if !self.is_alive(handle) {
            return None;
        }
        self.slots[handle.idx()].as_ref()
    }

    /// Exclusive access.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        if !self.is_alive(handle) {
            return None;
        }
        self.slots[handle.idx()].as_mut()
    }

    /// Live handles in slot order.
    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.iter().map(|(h, _)| h)
    }

    /// Live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Handle uses 32-bit slot indices by design."
            )]
            let h = Handle::new(i as u32, self.generations[i]);
            s.as_ref().map(|v| (h, v))
        })
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Returns `true` if nothing is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_handles_do_not_alias_reused_slots() {
        let mut r = Registry::new();
        let a = r.insert_with(|_| "a");
        assert_eq!(r.get(a), Some(&"a"));
        assert_eq!(r.remove(a), Some("a"));
        assert!(!r.is_alive(a));
        let b = r.insert_with(|_| "b");
        assert_eq!(a.idx(), b.idx());
        assert_ne!(a, b);
        assert_eq!(r.get(a), None);
        assert_eq!(r.get(b), Some(&"b"));
        assert_eq!(r.remove(a), None);
    }

    #[test]
    fn insert_with_sees_its_own_handle() {
        let mut r = Registry::new();
        let h = r.insert_with(|h| h);
        assert_eq!(r.get(h), Some(&h));
    }

    #[test]
    fn iteration_skips_free_slots() {
        let mut r = Registry::new();
        let a = r.insert_with(|_| 1);
        let b = r.insert_with(|_| 2);
        let c = r.insert_with(|_| 3);
        r.remove(b);
        assert_eq!(r.len(), 2);
        let hs: Vec<Handle> = r.handles().collect();
        assert_eq!(hs, [a, c]);
        if let Some(v) = r.get_mut(c) {
            *v = 30;
        }
        assert_eq!(r.iter().map(|(_, v)| *v).sum::<i32>(), 31);
    }

    #[test]
    fn unknown_slot_is_not_alive() {
        let r: Registry<u8> = Registry::new();
        assert!(!r.is_alive(Handle::new(9, 1)));
        assert!(r.is_empty());
    }
}
