// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-pointer rotation detection.

use core::f64::consts::{FRAC_PI_2, PI};

use kurbo::Point;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::tracker::PointerTracker;
use crate::types::{PointerId, StreamPhase};

/// What a [`RotationDetector`] observed while handling one event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RotationUpdate {
    /// A rotation started; [`RotationDetector::anchor`] is valid.
    pub began: bool,
    /// A new rotation delta is available.
    pub rotated: bool,
    /// The rotation finished because a key pointer left or the stream ended.
    pub ended: bool,
}

/// Tracks the angle of the line through the two oldest pointers.
///
/// The two pointers that were tracked first when the second pointer arrived
/// become the key pointers for the rest of the rotation. Each move reports the
/// signed change of the line's angle since the previous move, wrapped into
/// `(-π/2, π/2]` so a crossing of the `atan2` branch cut never shows up as a
/// jump. Positive values are clockwise in a y-down coordinate space.
#[derive(Clone, Debug, Default)]
pub struct RotationDetector {
    in_progress: bool,
    key_pointers: Option<(PointerId, PointerId)>,
    previous_angle: Option<f64>,
    rotation: f64,
    anchor: Point,
    current_time: u64,
    previous_time: u64,
}

/// Wrap an angular difference into `(-π/2, π/2]`.
pub fn wrap_half_turn(delta: f64) -> f64 {
    let mut d = delta % PI;
    if d > FRAC_PI_2 {
        d -= PI;
    } else if d <= -FRAC_PI_2 {
        d += PI;
    }
    d
}

impl RotationDetector {
    /// Feed one event. `tracker` must already reflect the event
    /// (added pointers present, lifting pointers still present).
    pub fn on_event(
        &mut self,
        phase: StreamPhase,
        pointer: PointerId,
        time_ms: u64,
        tracker: &PointerTracker,
    ) -> RotationUpdate {
        let mut out = RotationUpdate::default();
        match phase {
            StreamPhase::Start => {
                self.in_progress = false;
            }
            StreamPhase::PointerAdded => {
                if !self.in_progress {
                    let Some(keys) = tracker.oldest_two() else {
                        return out;
                    };
                    self.in_progress = true;
                    self.key_pointers = Some(keys);
                    self.previous_angle = None;
                    self.current_time = time_ms;
                    self.update(tracker, time_ms);
                    out.began = true;
                }
            }
            StreamPhase::Moved => {
                if self.in_progress {
                    self.update(tracker, time_ms);
                    out.rotated = true;
                }
            }
            StreamPhase::PointerRemoved => {
                let is_key = self
                    .key_pointers
                    .is_some_and(|(a, b)| a == pointer || b == pointer);
                if self.in_progress && is_key {
                    self.finish();
                    out.ended = true;
                }
            }
            StreamPhase::End => {
                if self.in_progress {
                    self.finish();
                    out.ended = true;
                }
            }
            StreamPhase::Cancel => self.reset(),
        }
        out
    }

    /// Angle change reported by the last update, in radians.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Midpoint of the key pointers at the last update.
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Milliseconds between the last two updates.
    pub fn time_delta_ms(&self) -> u64 {
        self.current_time.saturating_sub(self.previous_time)
    }

    /// Returns `true` between begin and end.
    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// Drop all progress.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn finish(&mut self) {
        self.in_progress = false;
        self.key_pointers = None;
        self.previous_angle = None;
    }

    fn update(&mut self, tracker: &PointerTracker, time_ms: u64) {
        self.previous_time = self.current_time;
        self.current_time = time_ms;
        let Some((a, b)) = self.key_pointers else {
            return;
        };
        let (Some(pa), Some(pb)) = (tracker.position(a), tracker.position(b)) else {
            return;
        };
        let v = pb - pa;
        self.anchor = pa.midpoint(pb);
        let angle = -v.y.atan2(v.x);
        self.rotation = match self.previous_angle {
            Some(prev) => wrap_half_turn(prev - angle),
            None => 0.0,
        };
        self.previous_angle = Some(angle);
    }
}
