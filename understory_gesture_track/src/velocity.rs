// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Least-squares velocity estimation over a short sample history.

use alloc::vec::Vec;

use kurbo::{Point, Vec2};

use crate::buffer::CircularBuffer;
use crate::lsq;

/// Ring buffer size for velocity samples.
pub const HISTORY_SIZE: usize = 20;

/// Samples older than this (relative to the newest) are ignored.
pub const HORIZON_MS: u64 = 300;

/// A gap between consecutive samples longer than this means the pointer stopped.
pub const ASSUME_STOPPED_MS: u64 = 40;

/// Fewer accepted samples than this produce no estimate.
pub const MIN_SAMPLES: usize = 3;

/// Degree of the polynomial fitted to each axis.
const FIT_DEGREE: usize = 2;

/// Tuning for a [`VelocityTracker`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VelocityParams {
    /// Number of samples retained.
    pub history: usize,
    /// Maximum age of a usable sample, in milliseconds.
    pub horizon_ms: u64,
    /// Maximum gap between consecutive usable samples, in milliseconds.
    pub assume_stopped_ms: u64,
    /// Minimum number of usable samples required for an estimate.
    pub min_samples: usize,
}

impl Default for VelocityParams {
    fn default() -> Self {
        Self {
            history: HISTORY_SIZE,
            horizon_ms: HORIZON_MS,
            assume_stopped_ms: ASSUME_STOPPED_MS,
            min_samples: MIN_SAMPLES,
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct Sample {
    position: Point,
    time_ms: u64,
}

/// Estimates the velocity of a single pointer from timestamped positions.
///
/// Each axis is fitted independently with a quadratic in time (time measured
/// backwards from the newest sample), so the linear coefficient is the
/// instantaneous velocity at the newest sample. Results are in units per second.
///
/// ```
/// use kurbo::Point;
/// use understory_gesture_track::velocity::VelocityTracker;
///
/// let mut vt = VelocityTracker::default();
/// for i in 0..5_u64 {
///     vt.add(Point::new(i as f64 * 10.0, 0.0), i * 10);
/// }
/// let v = vt.velocity();
/// assert!((v.x - 1000.0).abs() < 1e-6);
/// assert!(v.y.abs() < 1e-6);
/// ```
#[derive(Clone, Debug)]
pub struct VelocityTracker {
    samples: CircularBuffer<Sample>,
    params: VelocityParams,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new(VelocityParams::default())
    }
}

impl VelocityTracker {
    /// Create a tracker with explicit tuning.
    pub fn new(params: VelocityParams) -> Self {
        Self {
            samples: CircularBuffer::new(params.history),
            params,
        }
    }

    /// The tuning this tracker was built with.
    pub fn params(&self) -> VelocityParams {
        self.params
    }

    /// Record a position at `time_ms`.
    pub fn add(&mut self, position: Point, time_ms: u64) {
        self.samples.push(Sample { position, time_ms });
    }

    /// Forget every sample.
    pub fn reset(&mut self) {
        self.samples.clear();
    }

    /// Number of retained samples (usable or not).
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if no samples are retained.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Estimate the current velocity, or `None` when the usable history is
    /// too short or degenerate.
    pub fn estimate(&self) -> Option<Vec2> {
        let newest = *self.samples.newest()?;
        let mut xs = Vec::with_capacity(self.samples.len());
        let mut ys = Vec::with_capacity(self.samples.len());
        let mut ts = Vec::with_capacity(self.samples.len());
        let mut previous = newest;
        for sample in self.samples.iter().rev() {
            let age = newest.time_ms.saturating_sub(sample.time_ms);
            let gap = previous.time_ms.abs_diff(sample.time_ms);
            previous = *sample;
            if age > self.params.horizon_ms || gap > self.params.assume_stopped_ms {
                break;
            }
            xs.push(sample.position.x);
            ys.push(sample.position.y);
            ts.push(-(age as f64));
        }
        if ts.len() < self.params.min_samples {
            return None;
        }
        let weights = alloc::vec![1.0; ts.len()];
        let fx = lsq::solve(&ts, &xs, &weights, FIT_DEGREE)?;
        let fy = lsq::solve(&ts, &ys, &weights, FIT_DEGREE)?;
        Some(Vec2::new(
            fx.coefficients[1] * 1000.0,
            fy.coefficients[1] * 1000.0,
        ))
    }

    /// Like [`estimate`](Self::estimate) but reports zero when there is no estimate.
    pub fn velocity(&self) -> Vec2 {
        self.estimate().unwrap_or(Vec2::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(vt: &mut VelocityTracker, pts: &[(f64, f64, u64)]) {
        for &(x, y, t) in pts {
            vt.add(Point::new(x, y), t);
        }
    }

    #[test]
    fn too_few_samples_report_zero() {
        let mut vt = VelocityTracker::default();
        assert_eq!(vt.estimate(), None);
        feed(&mut vt, &[(0.0, 0.0, 0), (10.0, 0.0, 10)]);
        assert_eq!(vt.estimate(), None);
        assert_eq!(vt.velocity(), Vec2::ZERO);
    }

    #[test]
    fn constant_motion_is_recovered() {
        let mut vt = VelocityTracker::default();
        // 2 px/ms to the right, -1 px/ms vertically.
        for i in 0..8_u64 {
            let t = i * 8;
            let tf = t as f64;
            vt.add(Point::new(2.0 * tf, -tf), t);
        }
        let v = vt.velocity();
        assert!((v.x - 2000.0).abs() < 1e-6, "{v:?}");
        assert!((v.y + 1000.0).abs() < 1e-6, "{v:?}");
    }

    #[test]
    fn a_pause_cuts_off_older_history() {
        let mut vt = VelocityTracker::default();
        // Fast movement, then a 100 ms pause, then a single stationary sample.
        feed(
            &mut vt,
            &[(0.0, 0.0, 0), (50.0, 0.0, 10), (100.0, 0.0, 20), (100.0, 0.0, 120)],
        );
        // The gap exceeds the stop threshold, leaving one usable sample.
        assert_eq!(vt.estimate(), None);
    }

    #[test]
    fn samples_beyond_the_horizon_are_ignored() {
        let params = VelocityParams {
            horizon_ms: 20,
            ..VelocityParams::default()
        };
        let mut vt = VelocityTracker::new(params);
        feed(
            &mut vt,
            &[
                (0.0, 0.0, 0),
                (1000.0, 0.0, 10),
                (1010.0, 0.0, 20),
                (1020.0, 0.0, 30),
                (1030.0, 0.0, 40),
            ],
        );
        let v = vt.velocity();
        assert!((v.x - 1000.0).abs() < 1e-6, "{v:?}");
    }

    #[test]
    fn identical_timestamps_do_not_produce_nan() {
        let mut vt = VelocityTracker::default();
        feed(&mut vt, &[(0.0, 0.0, 5), (3.0, 1.0, 5), (7.0, 2.0, 5)]);
        assert_eq!(vt.estimate(), None);
        assert_eq!(vt.velocity(), Vec2::ZERO);
    }

    #[test]
    fn reset_forgets_history() {
        let mut vt = VelocityTracker::default();
        feed(&mut vt, &[(0.0, 0.0, 0), (1.0, 0.0, 1), (2.0, 0.0, 2)]);
        assert!(!vt.is_empty());
        vt.reset();
        assert!(vt.is_empty());
        assert_eq!(vt.velocity(), Vec2::ZERO);
    }
}
