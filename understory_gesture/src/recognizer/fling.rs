// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fling: a quick swipe along one of the accepted directions.

use understory_gesture_track::PointerId;

use super::{Behavior, Core};
use crate::config::FlingConfig;
use crate::timer::TimerAction;
use crate::types::{Directions, GestureData, PointerEvent, State};

const DEFAULT_DIRECTION: Directions = Directions::RIGHT;
const DEFAULT_NUMBER_OF_POINTERS: usize = 1;
const DEFAULT_MAX_DURATION_MS: u64 = 800;
const DEFAULT_MIN_ACCEPTABLE_DELTA: f64 = 160.0;

#[derive(Clone, Debug)]
pub(crate) struct Fling {
    config: FlingConfig,
    /// The pointer whose travel decides the fling.
    key: Option<PointerId>,
    max_pointers: usize,
}

impl Fling {
    pub(crate) fn new(config: FlingConfig) -> Self {
        Self {
            config,
            key: None,
            max_pointers: 0,
        }
    }

    pub(crate) fn set_config(&mut self, config: FlingConfig) {
        self.config = config;
    }

    fn start_fling(&mut self, core: &mut Core, ev: &PointerEvent) {
        core.begin();
        if core.state != State::Began {
            return;
        }
        self.key = Some(ev.pointer);
        self.max_pointers = 1;
        let ms = self.config.max_duration_ms.unwrap_or(DEFAULT_MAX_DURATION_MS);
        core.arm(TimerAction::Fail, ms);
    }

    /// Some accepted direction saw enough travel (and speed, if asked for).
    fn direction_satisfied(&self, core: &Core) -> bool {
        let Some(key) = self.key.and_then(|id| core.tracker.get(id)) else {
            return false;
        };
        let travel = key.position - key.down_position;
        let velocity = key.velocity();
        let min_delta = self
            .config
            .min_acceptable_delta
            .unwrap_or(DEFAULT_MIN_ACCEPTABLE_DELTA);
        self.config
            .direction
            .unwrap_or(DEFAULT_DIRECTION)
            .iter()
            .any(|d| {
                d.component(travel) > min_delta
                    && self
                        .config
                        .min_velocity
                        .is_none_or(|v| d.component(velocity) > v)
            })
    }

    fn try_end_fling(&mut self, core: &mut Core) -> bool {
        let wanted = self
            .config
            .number_of_pointers
            .unwrap_or(DEFAULT_NUMBER_OF_POINTERS);
        if self.max_pointers == wanted && self.direction_satisfied(core) {
            if core.activate(false) {
                core.end();
            }
            return true;
        }
        false
    }

    fn end_fling(&mut self, core: &mut Core) {
        if !self.try_end_fling(core) {
            core.fail();
        }
    }

    fn new_pointer(&mut self, core: &mut Core, ev: &PointerEvent) {
        match core.state {
            State::Undetermined => self.start_fling(core, ev),
            State::Began => {
                self.try_end_fling(core);
                self.max_pointers = self.max_pointers.max(core.tracker.len());
            }
            _ => {}
        }
    }
}

impl Behavior for Fling {
    fn on_down(&mut self, core: &mut Core, ev: &PointerEvent) {
        self.new_pointer(core, ev);
    }

    fn on_additional_down(&mut self, core: &mut Core, ev: &PointerEvent) {
        self.new_pointer(core, ev);
    }

    fn on_move(&mut self, core: &mut Core, _ev: &PointerEvent) {
        if core.state == State::Began {
            self.try_end_fling(core);
        }
    }

    fn on_out_of_bounds(&mut self, core: &mut Core, ev: &PointerEvent) {
        self.on_move(core, ev);
    }

    fn on_up(&mut self, core: &mut Core, _ev: &PointerEvent) {
        if core.state == State::Began {
            self.end_fling(core);
        }
    }

    fn on_additional_up(&mut self, core: &mut Core, ev: &PointerEvent) {
        self.on_up(core, ev);
    }

    fn ends_on_activate(&self) -> bool {
        true
    }

    fn reset_progress(&mut self, _core: &Core) {
        self.key = None;
        self.max_pointers = 0;
    }

    fn data(&self, _core: &Core) -> GestureData {
        GestureData::Fling
    }
}
