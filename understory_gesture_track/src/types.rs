// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core identifiers shared by trackers and detectors.

use core::fmt;

/// Identifier of a single physical pointer (finger, mouse, pen) as reported by the host.
///
/// Ids are only meaningful between a pointer's down and its up or cancel.
/// Hosts may reuse an id for a later, unrelated contact.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PointerId(pub u32);

impl fmt::Display for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pointer#{}", self.0)
    }
}

/// How a pointer event changes the set of pointers seen by a detector.
///
/// This is the detector-facing view of a pointer stream. Hover and
/// boundary notifications never reach the detectors.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StreamPhase {
    /// The first pointer of an interaction went down.
    Start,
    /// Another pointer joined an interaction in progress.
    PointerAdded,
    /// A tracked pointer moved.
    Moved,
    /// A pointer left while others remain.
    PointerRemoved,
    /// The last pointer went up.
    End,
    /// The host aborted the stream.
    Cancel,
}
