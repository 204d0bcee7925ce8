// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Long press: hold still for a minimum duration.

use kurbo::Point;

use super::{Behavior, Core};
use crate::config::LongPressConfig;
use crate::timer::TimerAction;
use crate::types::{GestureData, PointerEvent, State};

const DEFAULT_MIN_DURATION_MS: u64 = 500;
const DEFAULT_MAX_DIST: f64 = 10.0;

#[derive(Clone, Debug)]
pub(crate) struct LongPress {
    config: LongPressConfig,
    start: Point,
    start_ms: u64,
}

impl LongPress {
    pub(crate) fn new(config: LongPressConfig) -> Self {
        Self {
            config,
            start: Point::ZERO,
            start_ms: 0,
        }
    }

    pub(crate) fn set_config(&mut self, config: LongPressConfig) {
        self.config = config;
    }

    fn check_distance(&self, core: &mut Core, at: Point) {
        let max = self.config.max_dist.unwrap_or(DEFAULT_MAX_DIST);
        if (at - self.start).hypot2() > max * max {
            if core.state == State::Active {
                core.cancel();
            } else {
                core.fail();
            }
        }
    }

    fn finish(core: &mut Core) {
        if core.state == State::Active {
            core.end();
        } else {
            core.fail();
        }
    }
}

impl Behavior for LongPress {
    fn on_down(&mut self, core: &mut Core, ev: &PointerEvent) {
        if core.state == State::Undetermined {
            self.start_ms = core.now_ms;
            core.begin();
            self.start = ev.position;
        }
        if core.state == State::Began {
            match self.config.min_duration_ms.unwrap_or(DEFAULT_MIN_DURATION_MS) {
                0 => {
                    core.activate(false);
                }
                ms => core.arm(TimerAction::Activate, ms),
            }
        }
        self.check_distance(core, ev.position);
    }

    fn on_additional_down(&mut self, core: &mut Core, ev: &PointerEvent) {
        self.on_down(core, ev);
    }

    fn on_move(&mut self, core: &mut Core, ev: &PointerEvent) {
        self.check_distance(core, ev.position);
    }

    fn on_up(&mut self, core: &mut Core, _ev: &PointerEvent) {
        Self::finish(core);
    }

    fn on_additional_up(&mut self, core: &mut Core, _ev: &PointerEvent) {
        Self::finish(core);
    }

    fn data(&self, core: &Core) -> GestureData {
        GestureData::LongPress {
            duration_ms: core.now_ms.saturating_sub(self.start_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::test_util::{advance, feed, recognizer};

    const U: State = State::Undetermined;
    const B: State = State::Began;
    const A: State = State::Active;

    #[test]
    fn activates_after_min_duration() {
        let mut r = recognizer(LongPressConfig::default());
        let t = feed(&mut r, &[PointerEvent::down(1, Point::ZERO, 100)]);
        assert_eq!(t, [(U, B)]);
        assert_eq!(r.next_deadline(), Some(600));
        assert_eq!(advance(&mut r, 600), [(B, A)]);
        let t = feed(&mut r, &[PointerEvent::up(1, Point::ZERO, 900)]);
        assert_eq!(t, [(A, State::End)]);
        assert_eq!(r.data(), GestureData::LongPress { duration_ms: 800 });
    }

    #[test]
    fn early_release_fails() {
        let mut r = recognizer(LongPressConfig::default());
        let t = feed(
            &mut r,
            &[
                PointerEvent::down(1, Point::ZERO, 0),
                PointerEvent::up(1, Point::ZERO, 200),
            ],
        );
        assert_eq!(t, [(U, B), (B, State::Failed)]);
        assert_eq!(r.next_deadline(), None);
    }

    #[test]
    fn moving_too_far_fails_then_cancels_once_active() {
        let mut r = recognizer(LongPressConfig::default());
        let t = feed(
            &mut r,
            &[
                PointerEvent::down(1, Point::ZERO, 0),
                PointerEvent::moved(1, Point::new(6.0, 6.0), 100),
                PointerEvent::moved(1, Point::new(8.0, 8.0), 200),
            ],
        );
        assert_eq!(t, [(U, B), (B, State::Failed)]);

        r.reset();
        feed(&mut r, &[PointerEvent::down(1, Point::ZERO, 0)]);
        advance(&mut r, 500);
        let t = feed(&mut r, &[PointerEvent::moved(1, Point::new(20.0, 0.0), 600)]);
        assert_eq!(t, [(A, State::Cancelled)]);
    }

    #[test]
    fn zero_duration_activates_immediately() {
        let mut r = recognizer(LongPressConfig {
            min_duration_ms: Some(0),
            ..LongPressConfig::default()
        });
        let t = feed(&mut r, &[PointerEvent::down(1, Point::ZERO, 0)]);
        assert_eq!(t, [(U, B), (B, A)]);
    }
}
