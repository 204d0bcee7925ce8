// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-recognizer pointer bookkeeping.

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::types::PointerId;
use crate::velocity::VelocityTracker;

/// State kept for one tracked pointer.
#[derive(Clone, Debug)]
pub struct TrackedPointer {
    /// Host id of the pointer.
    pub id: PointerId,
    /// Last reported position.
    pub position: Point,
    /// Position at which the pointer started being tracked.
    pub down_position: Point,
    /// Timestamp of the last sample, in milliseconds.
    pub time_ms: u64,
    velocity: VelocityTracker,
}

impl TrackedPointer {
    /// Smoothed velocity of this pointer in units per second.
    pub fn velocity(&self) -> Vec2 {
        self.velocity.velocity()
    }
}

/// The pointers currently contributing to one recognizer.
///
/// Pointers are kept in the order they started being tracked, so
/// [`oldest_two`](Self::oldest_two) is stable across moves. Adding an id that
/// is already tracked, and tracking or removing an unknown id, are no-ops.
///
/// ```
/// use kurbo::Point;
/// use understory_gesture_track::{PointerId, PointerTracker};
///
/// let mut t = PointerTracker::default();
/// t.add(PointerId(1), Point::new(0.0, 0.0), 0);
/// t.add(PointerId(2), Point::new(10.0, 0.0), 0);
/// assert_eq!(t.centroid(), Point::new(5.0, 0.0));
/// t.remove(PointerId(1));
/// assert_eq!(t.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    pointers: SmallVec<[TrackedPointer; 4]>,
    last_moved: Option<PointerId>,
    cached_centroid: Point,
}

impl PointerTracker {
    /// Start tracking `id` at `position`. Returns `false` if it was already tracked.
    pub fn add(&mut self, id: PointerId, position: Point, time_ms: u64) -> bool {
        if self.contains(id) {
            return false;
        }
        let mut velocity = VelocityTracker::default();
        velocity.add(position, time_ms);
        self.pointers.push(TrackedPointer {
            id,
            position,
            down_position: position,
            time_ms,
            velocity,
        });
        self.last_moved = Some(id);
        self.refresh_centroid();
        true
    }

    /// Stop tracking `id`. Returns `false` if it was not tracked.
    pub fn remove(&mut self, id: PointerId) -> bool {
        let Some(i) = self.index_of(id) else {
            return false;
        };
        self.pointers.remove(i);
        if self.last_moved == Some(id) {
            self.last_moved = self.pointers.last().map(|p| p.id);
        }
        self.refresh_centroid();
        true
    }

    /// Record a new position for `id`. Returns `false` if it is not tracked.
    pub fn track(&mut self, id: PointerId, position: Point, time_ms: u64) -> bool {
        let Some(i) = self.index_of(id) else {
            return false;
        };
        let p = &mut self.pointers[i];
        p.position = position;
        p.time_ms = time_ms;
        p.velocity.add(position, time_ms);
        self.last_moved = Some(id);
        self.refresh_centroid();
        true
    }

    /// Forget every pointer. The cached centroid survives so hosts still
    /// see the last known location.
    pub fn reset(&mut self) {
        self.pointers.clear();
        self.last_moved = None;
    }

    /// The tracked pointer with `id`.
    pub fn get(&self, id: PointerId) -> Option<&TrackedPointer> {
        self.pointers.iter().find(|p| p.id == id)
    }

    /// Last position of `id`.
    pub fn position(&self, id: PointerId) -> Option<Point> {
        self.get(id).map(|p| p.position)
    }

    /// Id of the pointer that reported most recently.
    pub fn last_moved(&self) -> Option<PointerId> {
        self.last_moved
    }

    /// Position of the pointer that reported most recently.
    pub fn last_moved_position(&self) -> Option<Point> {
        self.last_moved.and_then(|id| self.position(id))
    }

    /// Smoothed velocity of `id`, or zero if unknown.
    pub fn velocity(&self, id: PointerId) -> Vec2 {
        self.get(id).map_or(Vec2::ZERO, TrackedPointer::velocity)
    }

    /// Mean position of all tracked pointers.
    ///
    /// When nothing is tracked this is the last non-empty centroid.
    pub fn centroid(&self) -> Point {
        self.cached_centroid
    }

    /// Mean position of all tracked pointers except `id`.
    ///
    /// Falls back to [`centroid`](Self::centroid) if no other pointer is tracked.
    pub fn centroid_excluding(&self, id: PointerId) -> Point {
        mean(self.pointers.iter().filter(|p| p.id != id).map(|p| p.position))
            .unwrap_or(self.cached_centroid)
    }

    /// Ids of the two pointers that have been tracked the longest.
    pub fn oldest_two(&self) -> Option<(PointerId, PointerId)> {
        match self.pointers.as_slice() {
            [a, b, ..] => Some((a.id, b.id)),
            _ => None,
        }
    }

    /// Number of tracked pointers.
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    /// Number of tracked pointers other than `id`.
    pub fn len_excluding(&self, id: PointerId) -> usize {
        self.pointers.iter().filter(|p| p.id != id).count()
    }

    /// Returns `true` if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    /// Returns `true` if `id` is tracked.
    pub fn contains(&self, id: PointerId) -> bool {
        self.index_of(id).is_some()
    }

    /// Tracked ids, oldest first.
    pub fn ids(&self) -> impl Iterator<Item = PointerId> + '_ {
        self.pointers.iter().map(|p| p.id)
    }

    /// Tracked pointers, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TrackedPointer> + '_ {
        self.pointers.iter()
    }

    /// Returns `true` if both trackers currently follow at least one common pointer.
    pub fn shares_pointer_with(&self, other: &Self) -> bool {
        self.pointers.iter().any(|p| other.contains(p.id))
    }

    fn index_of(&self, id: PointerId) -> Option<usize> {
        self.pointers.iter().position(|p| p.id == id)
    }

    fn refresh_centroid(&mut self) {
        if let Some(c) = mean(self.pointers.iter().map(|p| p.position)) {
            self.cached_centroid = c;
        }
    }
}

fn mean(points: impl Iterator<Item = Point>) -> Option<Point> {
    let (sum, n) = points.fold((Vec2::ZERO, 0_u32), |(s, n), p| (s + p.to_vec2(), n + 1));
    (n > 0).then(|| (sum / f64::from(n)).to_point())
}
