// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-pointer span tracking for pinch-to-zoom.

use kurbo::{Point, Vec2};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::tracker::PointerTracker;
use crate::types::{PointerId, StreamPhase};

/// Default touch slop in logical pixels.
pub const DEFAULT_TOUCH_SLOP: f64 = 15.0;

/// What a [`ScaleDetector`] observed while handling one event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ScaleUpdate {
    /// Scaling started; [`ScaleDetector::current_span`] is the starting span.
    pub began: bool,
    /// A new scale step is available via [`ScaleDetector::scale_factor`].
    pub scaled: bool,
    /// Scaling finished (pointer set changed, span collapsed, or stream ended).
    pub ended: bool,
}

/// Measures the spread ("span") of the tracked pointers around their centroid.
///
/// The span is `hypot(2·devx, 2·devy)` where `dev` is the mean absolute
/// deviation of the pointers from the focus point. Scaling only begins once
/// the span has moved more than `span_slop` away from the span measured when
/// the pointer set last changed. A pointer that is being lifted is excluded
/// from the computation of the event that lifts it.
#[derive(Clone, Debug)]
pub struct ScaleDetector {
    span_slop: f64,
    min_span: f64,
    in_progress: bool,
    focus: Point,
    initial_span: f64,
    current_span: f64,
    previous_span: f64,
    current_time: u64,
    previous_time: u64,
    factor: f64,
}

impl Default for ScaleDetector {
    fn default() -> Self {
        Self::new(DEFAULT_TOUCH_SLOP * 2.0, 0.0)
    }
}

impl ScaleDetector {
    /// Create a detector with an explicit dead zone and minimum span.
    pub fn new(span_slop: f64, min_span: f64) -> Self {
        Self {
            span_slop,
            min_span,
            in_progress: false,
            focus: Point::ZERO,
            initial_span: 0.0,
            current_span: 0.0,
            previous_span: 0.0,
            current_time: 0,
            previous_time: 0,
            factor: 1.0,
        }
    }

    /// Feed one event. `tracker` must already reflect the event
    /// (added pointers present, lifting pointers still present).
    pub fn on_event(
        &mut self,
        phase: StreamPhase,
        pointer: PointerId,
        time_ms: u64,
        tracker: &PointerTracker,
    ) -> ScaleUpdate {
        let mut out = ScaleUpdate::default();
        self.current_time = time_ms;

        let stream_complete = matches!(phase, StreamPhase::End | StreamPhase::Cancel);
        if phase == StreamPhase::Start || stream_complete {
            if self.in_progress {
                out.ended = true;
                self.in_progress = false;
                self.initial_span = 0.0;
            }
            if stream_complete {
                return out;
            }
        }

        let config_changed = matches!(
            phase,
            StreamPhase::Start | StreamPhase::PointerAdded | StreamPhase::PointerRemoved
        );
        let ignored = (phase == StreamPhase::PointerRemoved).then_some(pointer);
        let included = || tracker.iter().filter(move |p| Some(p.id) != ignored);

        let focus = match ignored {
            Some(id) => tracker.centroid_excluding(id),
            None => tracker.centroid(),
        };
        let (dev, n) = included().fold((Vec2::ZERO, 0_u32), |(d, n), p| {
            let off = p.position - focus;
            (d + Vec2::new(off.x.abs(), off.y.abs()), n + 1)
        });
        let dev = if n > 0 { dev / f64::from(n) } else { Vec2::ZERO };
        let span = (dev * 2.0).hypot();

        let was_in_progress = self.in_progress;
        self.focus = focus;
        if self.in_progress && (span < self.min_span || config_changed) {
            out.ended = true;
            self.in_progress = false;
            self.initial_span = span;
        }
        if config_changed {
            self.initial_span = span;
            self.previous_span = span;
            self.current_span = span;
        }
        if !self.in_progress
            && span >= self.min_span
            && (was_in_progress || (span - self.initial_span).abs() > self.span_slop)
        {
            self.previous_span = span;
            self.current_span = span;
            self.previous_time = self.current_time;
            self.in_progress = true;
            out.began = true;
        }

        if phase != StreamPhase::Moved {
            return out;
        }
        self.current_span = span;
        if self.in_progress {
            self.factor = if n < 2 || self.previous_span <= 0.0 {
                1.0
            } else {
                self.current_span / self.previous_span
            };
            out.scaled = true;
        }
        self.previous_span = self.current_span;
        self.previous_time = self.current_time;
        out
    }

    /// Ratio of the current span to the previous one, as of the last scale step.
    pub fn scale_factor(&self) -> f64 {
        self.factor
    }

    /// Span at the last event.
    pub fn current_span(&self) -> f64 {
        self.current_span
    }

    /// Centroid of the pointers that contributed to the last event.
    pub fn focus(&self) -> Point {
        self.focus
    }

    /// Milliseconds covered by the last scale step.
    pub fn time_delta_ms(&self) -> u64 {
        self.current_time.saturating_sub(self.previous_time)
    }

    /// Returns `true` between begin and end.
    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// Drop all progress, keeping the configuration.
    pub fn reset(&mut self) {
        *self = Self::new(self.span_slop, self.min_span);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(points: &[(u32, f64, f64)]) -> PointerTracker {
        let mut t = PointerTracker::default();
        for &(id, x, y) in points {
            t.add(PointerId(id), Point::new(x, y), 0);
        }
        t
    }

    #[test]
    fn span_dead_zone_delays_begin() {
        let mut t = tracker(&[(1, 0.0, 0.0), (2, 100.0, 0.0)]);
        let mut d = ScaleDetector::default();
        d.on_event(StreamPhase::Start, PointerId(1), 0, &t);
        let u = d.on_event(StreamPhase::PointerAdded, PointerId(2), 0, &t);
        assert!(!u.began);
        assert!((d.current_span() - 100.0).abs() < 1e-9);

        // 20 px of spread is inside the 30 px slop.
        t.track(PointerId(2), Point::new(120.0, 0.0), 10);
        let u = d.on_event(StreamPhase::Moved, PointerId(2), 10, &t);
        assert!(!u.began && !u.scaled);

        // 40 px of spread leaves it.
        t.track(PointerId(2), Point::new(140.0, 0.0), 20);
        let u = d.on_event(StreamPhase::Moved, PointerId(2), 20, &t);
        assert!(u.began && u.scaled);
        assert_eq!(d.scale_factor(), 1.0);

        t.track(PointerId(2), Point::new(280.0, 0.0), 30);
        let u = d.on_event(StreamPhase::Moved, PointerId(2), 30, &t);
        assert!(u.scaled);
        assert!((d.scale_factor() - 2.0).abs() < 1e-9, "{}", d.scale_factor());
        assert_eq!(d.time_delta_ms(), 10);
        assert_eq!(d.focus(), Point::new(140.0, 0.0));
    }

    #[test]
    fn lifting_pointer_is_excluded_and_ends_scaling() {
        let mut t = tracker(&[(1, 0.0, 0.0), (2, 100.0, 0.0)]);
        let mut d = ScaleDetector::new(0.0, 0.0);
        d.on_event(StreamPhase::PointerAdded, PointerId(2), 0, &t);
        t.track(PointerId(2), Point::new(150.0, 0.0), 10);
        assert!(d.on_event(StreamPhase::Moved, PointerId(2), 10, &t).began);
        let u = d.on_event(StreamPhase::PointerRemoved, PointerId(2), 20, &t);
        assert!(u.ended);
        assert_eq!(d.focus(), Point::new(0.0, 0.0));
        assert_eq!(d.current_span(), 0.0);
    }

    #[test]
    fn single_pointer_reports_unit_factor() {
        let mut t = tracker(&[(1, 0.0, 0.0)]);
        let mut d = ScaleDetector::new(0.0, 0.0);
        d.on_event(StreamPhase::Start, PointerId(1), 0, &t);
        t.track(PointerId(1), Point::new(10.0, 10.0), 10);
        d.on_event(StreamPhase::Moved, PointerId(1), 10, &t);
        assert_eq!(d.scale_factor(), 1.0);
    }

    #[test]
    fn end_of_stream_finishes() {
        let mut t = tracker(&[(1, 0.0, 0.0), (2, 100.0, 0.0)]);
        let mut d = ScaleDetector::new(0.0, 0.0);
        d.on_event(StreamPhase::PointerAdded, PointerId(2), 0, &t);
        t.track(PointerId(2), Point::new(150.0, 0.0), 10);
        d.on_event(StreamPhase::Moved, PointerId(2), 10, &t);
        assert!(d.in_progress());
        assert!(d.on_event(StreamPhase::End, PointerId(2), 20, &t).ended);
        assert!(!d.in_progress());
    }
}
