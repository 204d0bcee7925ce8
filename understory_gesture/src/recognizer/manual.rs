// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Manual: begins on touch, everything after that is up to the host.

use super::{Behavior, Core};
use crate::types::{GestureData, PointerEvent};

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Manual;

impl Behavior for Manual {
    fn on_down(&mut self, core: &mut Core, _ev: &PointerEvent) {
        core.begin();
    }

    fn data(&self, _core: &Core) -> GestureData {
        GestureData::Manual
    }
}
