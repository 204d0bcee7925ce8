// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover: active while a pointer floats over the recognizer's area.

use super::{Behavior, Core};
use crate::types::{GestureData, PointerEvent};

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Hover;

impl Behavior for Hover {
    fn on_down(&mut self, _core: &mut Core, _ev: &PointerEvent) {}

    fn on_enter(&mut self, core: &mut Core, ev: &PointerEvent) {
        core.tracker.add(ev.pointer, ev.position, ev.time_ms);
        core.begin();
        core.activate(false);
    }

    fn on_leave(&mut self, core: &mut Core, _ev: &PointerEvent) -> bool {
        core.end();
        true
    }

    fn data(&self, _core: &Core) -> GestureData {
        GestureData::Hover
    }
}
