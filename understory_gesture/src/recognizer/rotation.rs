// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rotation: two pointers turning around each other.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use core::f64::consts::PI;

use understory_gesture_track::RotationDetector;

use super::{Behavior, Core};
use crate::config::RotationConfig;
use crate::types::{GestureData, PointerEvent, State};

const DEFAULT_MIN_ROTATION: f64 = PI / 36.0;

#[derive(Clone, Debug, Default)]
pub(crate) struct Rotation {
    config: RotationConfig,
    detector: RotationDetector,
    rotation: f64,
    velocity: f64,
}

impl Rotation {
    pub(crate) fn new(config: RotationConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub(crate) fn set_config(&mut self, config: RotationConfig) {
        self.config = config;
    }

    fn feed(&mut self, core: &mut Core, ev: &PointerEvent) {
        let Some(phase) = ev.kind.stream_phase() else {
            return;
        };
        let update = self
            .detector
            .on_event(phase, ev.pointer, ev.time_ms, &core.tracker);
        if update.rotated {
            self.on_rotate(core);
        }
        if update.ended {
            if core.state == State::Active {
                core.end();
            } else {
                core.fail();
            }
        }
    }

    fn on_rotate(&mut self, core: &mut Core) {
        let previous = self.rotation;
        self.rotation += self.detector.rotation();
        let dt = self.detector.time_delta_ms();
        if dt > 0 {
            self.velocity = (self.rotation - previous) / dt as f64 * 1000.0;
        }
        let min = self.config.min_rotation.unwrap_or(DEFAULT_MIN_ROTATION);
        if self.rotation.abs() >= min && core.state == State::Began {
            self.before_activate(core);
            core.activate(false);
        }
    }
}

impl Behavior for Rotation {
    fn on_down(&mut self, _core: &mut Core, _ev: &PointerEvent) {}

    fn on_additional_down(&mut self, core: &mut Core, ev: &PointerEvent) {
        if core.state == State::Undetermined {
            self.reset_progress(core);
            core.begin();
        }
        self.feed(core, ev);
    }

    fn on_move(&mut self, core: &mut Core, ev: &PointerEvent) {
        if core.tracker.len() < 2 {
            return;
        }
        self.feed(core, ev);
    }

    fn on_out_of_bounds(&mut self, core: &mut Core, ev: &PointerEvent) {
        self.on_move(core, ev);
    }

    fn on_up(&mut self, core: &mut Core, ev: &PointerEvent) {
        self.feed(core, ev);
        if core.state == State::Active {
            core.end();
        } else {
            core.fail();
        }
    }

    fn on_additional_up(&mut self, core: &mut Core, ev: &PointerEvent) {
        self.feed(core, ev);
    }

    fn before_activate(&mut self, core: &Core) {
        self.reset_progress(core);
    }

    fn reset_progress(&mut self, core: &Core) {
        if core.state == State::Active {
            return;
        }
        self.rotation = 0.0;
        self.velocity = 0.0;
    }

    fn on_reset(&mut self) {
        self.detector.reset();
        self.rotation = 0.0;
        self.velocity = 0.0;
    }

    fn data(&self, _core: &Core) -> GestureData {
        GestureData::Rotation {
            rotation: self.rotation,
            anchor: self.detector.anchor(),
            velocity: self.velocity,
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::*;
    use crate::recognizer::test_util::{feed, recognizer};

    const U: State = State::Undetermined;
    const B: State = State::Began;
    const A: State = State::Active;

    #[test]
    fn turning_past_threshold_activates() {
        let mut r = recognizer(RotationConfig::default());
        let t = feed(
            &mut r,
            &[
                PointerEvent::down(1, Point::new(0.0, 0.0), 0),
                PointerEvent::additional_down(2, Point::new(100.0, 0.0), 0),
            ],
        );
        assert_eq!(t, [(U, B)]);
        // ~2.9 degrees, below the 5 degree threshold.
        let t = feed(&mut r, &[PointerEvent::moved(2, Point::new(100.0, 5.0), 16)]);
        assert!(t.is_empty());
        // ~11.3 degrees.
        let t = feed(&mut r, &[PointerEvent::moved(2, Point::new(100.0, 20.0), 32)]);
        assert_eq!(t, [(B, A)]);
        let t = feed(
            &mut r,
            &[PointerEvent::additional_up(2, Point::new(100.0, 20.0), 40)],
        );
        assert_eq!(t, [(A, State::End)]);
    }

    #[test]
    fn releasing_before_threshold_fails() {
        let mut r = recognizer(RotationConfig::default());
        let t = feed(
            &mut r,
            &[
                PointerEvent::down(1, Point::new(0.0, 0.0), 0),
                PointerEvent::additional_down(2, Point::new(100.0, 0.0), 0),
                PointerEvent::additional_up(2, Point::new(100.0, 0.0), 40),
            ],
        );
        assert_eq!(t, [(U, B), (B, State::Failed)]);
    }

    #[test]
    fn clockwise_rotation_is_positive() {
        let mut r = recognizer(RotationConfig {
            min_rotation: Some(10.0),
        });
        feed(
            &mut r,
            &[
                PointerEvent::down(1, Point::new(0.0, 0.0), 0),
                PointerEvent::additional_down(2, Point::new(100.0, 0.0), 0),
                PointerEvent::moved(2, Point::new(100.0, 100.0), 100),
            ],
        );
        let GestureData::Rotation {
            rotation, anchor, ..
        } = r.data()
        else {
            panic!("unexpected payload");
        };
        assert!((rotation - PI / 4.0).abs() < 1e-9);
        assert_eq!(anchor, Point::new(50.0, 50.0));
    }
}
