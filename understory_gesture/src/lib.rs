// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_gesture --heading-base-level=0

//! Understory Gesture: deterministic, `no_std` multi-pointer gesture recognition and arbitration.
//!
//! ## Overview
//!
//! This crate turns a stream of normalized pointer events into gesture state
//! changes, and decides which of several competing recognizers owns an
//! interaction. It does not read input devices, hit test, or schedule timers:
//! the host delivers [`PointerEvent`]s to the recognizers it found under the
//! pointer, advances time, and receives [`GestureEvent`]s back.
//!
//! ## Recognizers
//!
//! Every recognizer runs the same state machine ([`State`]):
//! `Undetermined → Began → Active → End`, with `Failed` and `Cancelled` as
//! the other terminal states. The kind decides when to move:
//!
//! - Pan: drag past a distance, an axis offset window or a velocity.
//! - Tap: one or more short presses close to each other in time and space.
//! - Long press: hold still for a minimum duration.
//! - Pinch and rotation: two or more pointers changing span or angle.
//! - Fling: a quick swipe in an accepted [`Directions`] set.
//! - Native delegate: stands in for a host control such as a button or a scroll view.
//! - Hover: active while a hovering pointer is inside.
//! - Manual: driven entirely by the host.
//!
//! Thresholds are plain data in [`GestureConfig`]; unset values fall back to
//! the kind's defaults.
//!
//! ## Arbitration
//!
//! An [`Orchestrator`] owns every recognizer of one gesture universe and
//! hands out generational [`Handle`]s. When a recognizer reaches `Active`:
//!
//! 1) If a recognizer it waits for (see [`GestureConfig::wait_for`] and
//!    [`GestureConfig::blocks`]) is still undecided, it is parked as
//!    awaiting. It activates if that recognizer fails or is cancelled, and is
//!    cancelled if that recognizer ends successfully.
//! 2) Otherwise it becomes active, and every recognizer that shares a pointer
//!    with it and was not declared simultaneous is cancelled. Recognizers that
//!    are already active are only cancelled if the [`CancellationPolicy`]
//!    agrees; the default [`NativePressPolicy`] lets an active scroll-like
//!    native delegate take over from other recognizers.
//! 3) Recognizers that share no pointer never interact.
//!
//! ## Timers
//!
//! Time is whatever the host says it is. Recognizers arm deadlines in host
//! milliseconds; [`Orchestrator::next_deadline`] reports the earliest one and
//! [`Orchestrator::fire_due_timers`] fires every deadline that has passed.
//! [`Orchestrator::dispatch`] fires due deadlines at the event's timestamp
//! before handling the event, so timeouts and pointer events stay ordered.
//!
//! ## Example
//!
//! ```
//! use kurbo::Point;
//! use understory_gesture::{GestureConfig, Orchestrator, PanConfig, PointerEvent, State, TapConfig};
//!
//! let mut o = Orchestrator::new();
//! let tap = o.attach(GestureConfig::new(TapConfig::default())).unwrap();
//! let pan = o.attach(GestureConfig::new(PanConfig::default())).unwrap();
//! let both = [tap, pan];
//!
//! o.dispatch_all(&both, &PointerEvent::down(1, Point::ZERO, 0)).unwrap();
//! let events = o
//!     .dispatch_all(&both, &PointerEvent::moved(1, Point::new(30.0, 0.0), 16))
//!     .unwrap();
//!
//! // The drag made the pan active, which took the pointer away from the tap.
//! assert!(o.is_active(pan));
//! assert_eq!(o.state(tap), Some(State::Undetermined));
//! assert!(events.iter().any(|e| e.handle == pan && e.state == State::Active));
//! ```
//!
//! ## Logging
//!
//! State transitions, activations and cancellations are reported through the
//! [`log`] facade at `debug` level, and every accepted pointer event at
//! `trace` level. The crate never installs a logger.
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo/std`.
//! - `libm`: floating point support for `no_std` targets through `kurbo/libm`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod error;
mod handle;
mod orchestrator;
mod recognizer;
mod registry;
mod relations;
mod timer;
mod types;

pub use config::{
    FlingConfig, GestureConfig, HitSlop, KindConfig, LongPressConfig, NativeConfig, OffsetRange,
    PanConfig, PinchConfig, RotationConfig, TapConfig,
};
pub use error::GestureError;
pub use handle::Handle;
pub use orchestrator::Orchestrator;
pub use recognizer::Recognizer;
pub use registry::Registry;
pub use relations::{
    ActivationOrderPolicy, CancellationPolicy, NativePressPolicy, Participant, RelationManager,
};
pub use types::{
    Directions, GestureData, GestureEvent, PointerEvent, PointerEventKind, PointerType,
    RecognizerKind, State,
};
pub use understory_gesture_track::PointerId;
