// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap: one or more short presses that stay close to the first touch.

use kurbo::{Point, Vec2};

use super::{Behavior, Core};
use crate::config::TapConfig;
use crate::timer::TimerAction;
use crate::types::{GestureData, PointerEvent, PointerEventKind, State};

const DEFAULT_NUMBER_OF_TAPS: u32 = 1;
const DEFAULT_MAX_DURATION_MS: u64 = 500;
const DEFAULT_MAX_DELAY_MS: u64 = 500;
const DEFAULT_MIN_POINTERS: usize = 1;

#[derive(Clone, Debug)]
pub(crate) struct Tap {
    config: TapConfig,
    start: Point,
    last: Point,
    offset: Vec2,
    taps: u32,
    max_pointers_seen: usize,
}

impl Tap {
    pub(crate) fn new(config: TapConfig) -> Self {
        Self {
            config,
            start: Point::ZERO,
            last: Point::ZERO,
            offset: Vec2::ZERO,
            taps: 0,
            max_pointers_seen: 0,
        }
    }

    pub(crate) fn set_config(&mut self, config: TapConfig) {
        self.config = config;
    }

    /// The first touch anchors every distance check.
    fn anchor(&mut self, core: &Core, at: Point) {
        if core.state != State::Undetermined {
            return;
        }
        self.offset = Vec2::ZERO;
        self.start = at;
    }

    fn rebase(&mut self, last: Point) {
        self.offset += self.last - self.start;
        self.last = last;
        self.start = last;
    }

    fn should_fail(&self) -> bool {
        let c = &self.config;
        let d = self.last - self.start + self.offset;
        c.max_delta_x.is_some_and(|m| d.x.abs() > m)
            || c.max_delta_y.is_some_and(|m| d.y.abs() > m)
            || c.max_dist.is_some_and(|m| d.hypot2() > m * m)
    }

    fn start_tap(&self, core: &mut Core) {
        let ms = self.config.max_duration_ms.unwrap_or(DEFAULT_MAX_DURATION_MS);
        core.timers.clear();
        core.arm(TimerAction::Fail, ms);
    }

    fn end_tap(&mut self, core: &mut Core) {
        core.timers.clear();
        self.taps += 1;
        let wanted = self.config.number_of_taps.unwrap_or(DEFAULT_NUMBER_OF_TAPS);
        let min_pointers = self.config.min_pointers.unwrap_or(DEFAULT_MIN_POINTERS);
        if self.taps == wanted && self.max_pointers_seen >= min_pointers {
            if core.activate(false) {
                core.end();
            }
        } else {
            let ms = self.config.max_delay_ms.unwrap_or(DEFAULT_MAX_DELAY_MS);
            core.arm(TimerAction::Fail, ms);
        }
    }

    fn update_state(&mut self, core: &mut Core, kind: PointerEventKind) {
        self.max_pointers_seen = self.max_pointers_seen.max(core.tracker.len());
        if self.should_fail() {
            core.fail();
            self.reset_progress(core);
            return;
        }
        match core.state {
            State::Undetermined => {
                if kind == PointerEventKind::Down {
                    core.begin();
                }
                if core.state == State::Began {
                    self.start_tap(core);
                }
            }
            State::Began => match kind {
                PointerEventKind::Up => self.end_tap(core),
                PointerEventKind::Down => self.start_tap(core),
                _ => {}
            },
            _ => {}
        }
    }
}

impl Behavior for Tap {
    fn on_down(&mut self, core: &mut Core, ev: &PointerEvent) {
        self.anchor(core, ev.position);
        self.start = ev.position;
        self.last = ev.position;
        self.update_state(core, ev.kind);
    }

    fn on_additional_down(&mut self, core: &mut Core, ev: &PointerEvent) {
        self.anchor(core, ev.position);
        self.rebase(core.tracker.centroid());
        self.update_state(core, ev.kind);
    }

    fn on_move(&mut self, core: &mut Core, ev: &PointerEvent) {
        self.anchor(core, ev.position);
        self.last = core.tracker.centroid();
        self.update_state(core, ev.kind);
    }

    fn on_out_of_bounds(&mut self, core: &mut Core, ev: &PointerEvent) {
        self.on_move(core, ev);
    }

    fn on_up(&mut self, core: &mut Core, ev: &PointerEvent) {
        self.last = core.tracker.centroid();
        self.update_state(core, ev.kind);
    }

    fn on_additional_up(&mut self, core: &mut Core, ev: &PointerEvent) {
        self.rebase(core.tracker.centroid_excluding(ev.pointer));
        self.update_state(core, ev.kind);
    }

    fn ends_on_activate(&self) -> bool {
        true
    }

    fn reset_progress(&mut self, _core: &Core) {
        self.taps = 0;
        self.max_pointers_seen = 0;
    }

    fn data(&self, _core: &Core) -> GestureData {
        GestureData::Tap
    }
}
