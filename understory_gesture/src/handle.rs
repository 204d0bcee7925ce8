// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recognizer handles.

use core::fmt;

/// Identifier for a recognizer attached to an [`Orchestrator`](crate::Orchestrator).
///
/// A handle is a slot index plus a generation. Detaching a recognizer frees
/// its slot; attaching a new one into that slot bumps the generation, so a
/// stale handle never aliases a live recognizer. Relations hold handles, not
/// references, which keeps the recognizer graph free of ownership cycles.
///
/// Hosts that need to pass a plain integer through their own event plumbing
/// can round-trip with [`to_bits`](Self::to_bits) / [`from_bits`](Self::from_bits).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Handle(pub(crate) u32, pub(crate) u32);

impl Handle {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Slot generation of this handle.
    pub const fn generation(self) -> u32 {
        self.1
    }

    /// Pack into a single integer (generation in the high half).
    pub const fn to_bits(self) -> u64 {
        ((self.1 as u64) << 32) | self.0 as u64
    }

    /// Inverse of [`to_bits`](Self::to_bits).
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Both halves are 32-bit by construction."
    )]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits as u32, (bits >> 32) as u32)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_round_trip() {
        let h = Handle::new(7, 3);
        assert_eq!(Handle::from_bits(h.to_bits()), h);
        assert_eq!(h.to_bits(), (3_u64 << 32) | 7);
        assert_eq!(h.generation(), 3);
    }

    #[test]
    fn debug_shows_slot_and_generation() {
        assert_eq!(alloc::format!("{:?}", Handle::new(2, 5)), "Handle(2v5)");
    }
}
