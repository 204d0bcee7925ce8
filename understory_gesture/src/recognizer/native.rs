// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter for a host-native control (a button, a scroll container).
//!
//! The control does its own recognition; this recognizer only reports when
//! the control owns the interaction so that arbitration can account for it.

use kurbo::Point;
use understory_gesture_track::DEFAULT_TOUCH_SLOP;

use super::{Behavior, Core};
use crate::config::NativeConfig;
use crate::types::{GestureData, PointerEvent, State};

const MOVE_SLOP_SQ: f64 = DEFAULT_TOUCH_SLOP * DEFAULT_TOUCH_SLOP;

#[derive(Clone, Debug)]
pub(crate) struct Native {
    config: NativeConfig,
    start: Point,
}

impl Native {
    pub(crate) fn new(config: NativeConfig) -> Self {
        Self {
            config,
            start: Point::ZERO,
        }
    }

    pub(crate) fn set_config(&mut self, config: NativeConfig) {
        self.config = config;
    }

    pub(crate) fn is_button(&self) -> bool {
        self.config.is_button
    }

    pub(crate) fn disallows_interruption(&self) -> bool {
        self.config.disallow_interruption
    }

    fn new_pointer(&mut self, core: &mut Core) {
        self.start = core.tracker.centroid();
        if core.state != State::Undetermined {
            return;
        }
        core.begin();
        if core.state == State::Began
            && (self.config.is_button || self.config.should_activate_on_start)
        {
            core.activate(false);
        }
    }

    fn finish(core: &mut Core, ev: &PointerEvent) {
        if core.tracker.len_excluding(ev.pointer) > 0 {
            return;
        }
        if core.state == State::Active {
            core.end();
        } else {
            core.fail();
        }
    }
}

impl Behavior for Native {
    fn on_down(&mut self, core: &mut Core, _ev: &PointerEvent) {
        self.new_pointer(core);
    }

    fn on_additional_down(&mut self, core: &mut Core, _ev: &PointerEvent) {
        self.new_pointer(core);
    }

    fn on_move(&mut self, core: &mut Core, _ev: &PointerEvent) {
        if (core.tracker.centroid() - self.start).hypot2() < MOVE_SLOP_SQ {
            return;
        }
        match core.state {
            // Dragging off a pressed button abandons the press.
            State::Active if self.config.is_button => core.cancel(),
            State::Began if !self.config.is_button => {
                core.activate(false);
            }
            _ => {}
        }
    }

    fn on_out_of_bounds(&mut self, core: &mut Core, ev: &PointerEvent) {
        self.on_move(core, ev);
    }

    fn on_up(&mut self, core: &mut Core, ev: &PointerEvent) {
        Self::finish(core, ev);
    }

    fn on_additional_up(&mut self, core: &mut Core, ev: &PointerEvent) {
        Self::finish(core, ev);
    }

    fn on_leave(&mut self, core: &mut Core, _ev: &PointerEvent) -> bool {
        if matches!(core.state, State::Began | State::Active) {
            core.cancel();
        }
        true
    }

    fn data(&self, _core: &Core) -> GestureData {
        GestureData::NativeDelegate
    }
}
