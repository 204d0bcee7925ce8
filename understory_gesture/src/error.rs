// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for host-facing operations.
//!
//! A gesture that does not match is never an error: it is reported as a
//! `Failed` or `Cancelled` state change. Errors are reserved for host
//! mistakes that can be detected synchronously.

use crate::handle::Handle;

/// Errors returned by [`Orchestrator`](crate::Orchestrator) operations.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum GestureError {
    /// A relation list names a recognizer that is not attached.
    #[error("relation target {0:?} is not attached")]
    UnknownRelationTarget(Handle),
    /// The operation targets a handle that is not (or no longer) attached.
    #[error("recognizer {0:?} is not attached")]
    NotAttached(Handle),
    /// Hit slop fields contradict each other.
    #[error("invalid hit slop: {0}")]
    InvalidHitSlop(&'static str),
    /// A threshold or structural setting makes no sense.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
