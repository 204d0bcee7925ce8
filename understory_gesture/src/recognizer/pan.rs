// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pan: drag past a distance, offset or velocity threshold.

use kurbo::{Point, Vec2};
use understory_gesture_track::DEFAULT_TOUCH_SLOP;

use super::{Behavior, Core};
use crate::config::PanConfig;
use crate::timer::TimerAction;
use crate::types::{GestureData, PointerEvent, State};

const DEFAULT_MIN_POINTERS: usize = 1;
const DEFAULT_MAX_POINTERS: usize = 10;
const DEFAULT_MIN_DIST_SQ: f64 = DEFAULT_TOUCH_SLOP * DEFAULT_TOUCH_SLOP;

#[derive(Clone, Debug)]
pub(crate) struct Pan {
    config: PanConfig,
    /// `None` when a custom criterion replaced the distance criterion.
    min_dist_sq: Option<f64>,
    start: Point,
    last: Point,
    /// Translation carried over pointer set changes.
    offset: Vec2,
    velocity: Vec2,
}

impl Pan {
    pub(crate) fn new(config: PanConfig) -> Self {
        Self {
            config,
            min_dist_sq: min_dist_sq(&config),
            start: Point::ZERO,
            last: Point::ZERO,
            offset: Vec2::ZERO,
            velocity: Vec2::ZERO,
        }
    }

    pub(crate) fn set_config(&mut self, config: PanConfig) {
        self.min_dist_sq = min_dist_sq(&config);
        self.config = config;
    }

    fn min_pointers(&self) -> usize {
        self.config.min_pointers.unwrap_or(DEFAULT_MIN_POINTERS)
    }

    fn max_pointers(&self) -> usize {
        self.config.max_pointers.unwrap_or(DEFAULT_MAX_POINTERS)
    }

    fn translation(&self) -> Vec2 {
        self.last - self.start + self.offset
    }

    fn should_activate(&self) -> bool {
        let c = &self.config;
        let t = self.translation();
        if c.active_offset_x.crossed_by(t.x) || c.active_offset_y.crossed_by(t.y) {
            return true;
        }
        if self.min_dist_sq.is_some_and(|d| t.hypot2() >= d) {
            return true;
        }
        let v = self.velocity;
        if c.min_velocity_x.is_some_and(|m| velocity_reaches(v.x, m))
            || c.min_velocity_y.is_some_and(|m| velocity_reaches(v.y, m))
        {
            return true;
        }
        c.min_velocity.is_some_and(|m| v.hypot2() >= m * m)
    }

    fn should_fail(&self) -> bool {
        let c = &self.config;
        let t = self.translation();
        if c.activate_after_long_press_ms.is_some_and(|ms| ms > 0) && t.hypot2() > DEFAULT_MIN_DIST_SQ
        {
            return true;
        }
        c.fail_offset_x.crossed_by(t.x) || c.fail_offset_y.crossed_by(t.y)
    }

    fn try_begin(&mut self, core: &mut Core, ev: &PointerEvent) {
        if core.state == State::Undetermined && core.tracker.len() >= self.min_pointers() {
            self.reset_progress(core);
            self.offset = Vec2::ZERO;
            self.velocity = Vec2::ZERO;
            core.begin();
            if core.state == State::Began
                && let Some(ms) = self.config.activate_after_long_press_ms
                && ms > 0
            {
                core.arm(TimerAction::Activate, ms);
            }
        } else {
            self.velocity = core.tracker.velocity(ev.pointer);
        }
    }

    fn check_began(&mut self, core: &mut Core) {
        if core.state != State::Began {
            return;
        }
        if self.should_fail() {
            core.fail();
            self.reset_progress(core);
        } else if self.should_activate() {
            self.reset_progress(core);
            core.activate(false);
        }
    }

    /// Restart the translation at the current centroid.
    fn rebase(&mut self, last: Point) {
        self.offset += self.last - self.start;
        self.last = last;
        self.start = last;
    }

    fn track_move(&mut self, core: &mut Core, ev: &PointerEvent) {
        self.last = core.tracker.centroid();
        self.velocity = core.tracker.velocity(ev.pointer);
        self.check_began(core);
    }
}

/// A negative threshold asks for at most that velocity, a positive one for at least.
fn velocity_reaches(v: f64, threshold: f64) -> bool {
    if threshold < 0.0 {
        v <= threshold
    } else {
        v >= threshold
    }
}

fn min_dist_sq(c: &PanConfig) -> Option<f64> {
    match c.min_dist {
        Some(d) => Some(d * d),
        None => {
            let custom = c.active_offset_x.is_set()
                || c.active_offset_y.is_set()
                || c.min_velocity.is_some()
                || c.min_velocity_x.is_some()
                || c.min_velocity_y.is_some();
            (!custom).then_some(DEFAULT_MIN_DIST_SQ)
        }
    }
}

impl Behavior for Pan {
    fn on_down(&mut self, core: &mut Core, ev: &PointerEvent) {
        self.last = core.tracker.centroid();
        self.try_begin(core, ev);
        self.check_began(core);
    }

    fn on_additional_down(&mut self, core: &mut Core, ev: &PointerEvent) {
        self.try_begin(core, ev);
        self.rebase(core.tracker.centroid());
        if core.tracker.len() > self.max_pointers() {
            if core.state == State::Active {
                core.cancel();
            } else {
                core.fail();
                self.reset_progress(core);
            }
        } else {
            self.check_began(core);
        }
    }

    fn on_move(&mut self, core: &mut Core, ev: &PointerEvent) {
        self.track_move(core, ev);
    }

    fn on_out_of_bounds(&mut self, core: &mut Core, ev: &PointerEvent) {
        self.track_move(core, ev);
    }

    fn on_up(&mut self, core: &mut Core, _ev: &PointerEvent) {
        if core.state == State::Active {
            self.last = core.tracker.centroid();
            core.end();
        } else {
            self.reset_progress(core);
            core.fail();
        }
    }

    fn on_additional_up(&mut self, core: &mut Core, ev: &PointerEvent) {
        self.rebase(core.tracker.centroid_excluding(ev.pointer));
        let remaining = core.tracker.len_excluding(ev.pointer);
        if !(core.state == State::Active && remaining < self.min_pointers()) {
            self.check_began(core);
        }
    }

    fn before_activate(&mut self, core: &Core) {
        self.reset_progress(core);
    }

    fn reset_progress(&mut self, core: &Core) {
        if core.state == State::Active {
            return;
        }
        self.start = self.last;
    }

    fn data(&self, _core: &Core) -> GestureData {
        GestureData::Pan {
            translation: self.translation(),
            velocity: self.velocity,
        }
    }
}
