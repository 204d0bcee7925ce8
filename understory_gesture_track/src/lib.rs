// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Gesture Track: pointer bookkeeping and numeric estimators for gesture recognition.
//!
//! ## Overview
//!
//! This crate holds the pieces of a gesture recognizer that only look at raw
//! pointer samples. It has no notion of recognizer state, arbitration or
//! timers. Those live in `understory_gesture`.
//!
//! - [`PointerTracker`]: the set of pointers following one recognizer, in
//!   the order they arrived, with per-pointer last position, down position and
//!   smoothed velocity, plus a centroid that survives the last pointer leaving.
//! - [`VelocityTracker`]: least-squares velocity over a short history window.
//!   A pause longer than [`velocity::ASSUME_STOPPED_MS`] cuts the history, so a
//!   pointer that stops before lifting reports zero.
//! - [`ScaleDetector`] and [`RotationDetector`]: incremental two-or-more
//!   pointer detectors that report begin / step / end edges per event.
//!
//! ## Feeding detectors
//!
//! Detectors read positions from a [`PointerTracker`] that already reflects
//! the event: a pointer that just went down has been added, and a pointer
//! that is lifting is still present. The [`StreamPhase`] tells the detector
//! which kind of change happened.
//!
//! ```
//! use kurbo::Point;
//! use understory_gesture_track::{PointerId, PointerTracker, RotationDetector, StreamPhase};
//!
//! let mut t = PointerTracker::default();
//! let mut rot = RotationDetector::default();
//! t.add(PointerId(0), Point::new(0.0, 0.0), 0);
//! rot.on_event(StreamPhase::Start, PointerId(0), 0, &t);
//! t.add(PointerId(1), Point::new(100.0, 0.0), 0);
//! assert!(rot.on_event(StreamPhase::PointerAdded, PointerId(1), 0, &t).began);
//!
//! t.track(PointerId(1), Point::new(100.0, 100.0), 16);
//! rot.on_event(StreamPhase::Moved, PointerId(1), 16, &t);
//! assert!((rot.rotation() - core::f64::consts::FRAC_PI_4).abs() < 1e-9);
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo/std`.
//! - `libm`: floating point support for `no_std` targets through `kurbo/libm`.

#![no_std]

extern crate alloc;

pub mod buffer;
pub mod lsq;
pub mod rotation;
pub mod scale;
pub mod tracker;
pub mod types;
pub mod velocity;

pub use buffer::CircularBuffer;
pub use rotation::{RotationDetector, RotationUpdate};
pub use scale::{DEFAULT_TOUCH_SLOP, ScaleDetector, ScaleUpdate};
pub use tracker::{PointerTracker, TrackedPointer};
pub use types::{PointerId, StreamPhase};
pub use velocity::{VelocityParams, VelocityTracker};
