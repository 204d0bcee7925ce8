// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pinch: two or more pointers moving apart or together.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use understory_gesture_track::{DEFAULT_TOUCH_SLOP, ScaleDetector};

use super::{Behavior, Core};
use crate::config::PinchConfig;
use crate::types::{GestureData, PointerEvent, State};

#[derive(Clone, Debug)]
pub(crate) struct Pinch {
    config: PinchConfig,
    detector: ScaleDetector,
    starting_span: f64,
    scale: f64,
    velocity: f64,
}

fn detector_for(config: &PinchConfig) -> ScaleDetector {
    ScaleDetector::new(
        config.span_slop.unwrap_or(DEFAULT_TOUCH_SLOP * 2.0),
        0.0,
    )
}

impl Pinch {
    pub(crate) fn new(config: PinchConfig) -> Self {
        Self {
            config,
            detector: detector_for(&config),
            starting_span: 0.0,
            scale: 1.0,
            velocity: 0.0,
        }
    }

    pub(crate) fn set_config(&mut self, config: PinchConfig) {
        if config.span_slop != self.config.span_slop && !self.detector.in_progress() {
            self.detector = detector_for(&config);
        }
        self.config = config;
    }

    fn feed(&mut self, core: &mut Core, ev: &PointerEvent) {
        let Some(phase) = ev.kind.stream_phase() else {
            return;
        };
        let update = self
            .detector
            .on_event(phase, ev.pointer, ev.time_ms, &core.tracker);
        if update.began {
            self.starting_span = self.detector.current_span();
        }
        if update.scaled {
            self.on_scale(core);
        }
    }

    fn on_scale(&mut self, core: &mut Core) {
        let previous = self.scale;
        self.scale *= self.detector.scale_factor();
        let dt = self.detector.time_delta_ms();
        if dt > 0 {
            self.velocity = (self.scale - previous) / dt as f64 * 1000.0;
        }
        let slop = self.config.activation_slop.unwrap_or(DEFAULT_TOUCH_SLOP);
        if (self.starting_span - self.detector.current_span()).abs() >= slop
            && core.state == State::Began
        {
            self.before_activate(core);
            core.activate(false);
        }
    }
}

impl Behavior for Pinch {
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
        if core.state == State::Active {
            self.feed(core, ev);
            core.end();
        } else {
            core.fail();
        }
    }

    fn on_additional_up(&mut self, core: &mut Core, ev: &PointerEvent) {
        self.feed(core, ev);
        if core.state == State::Active && core.tracker.len_excluding(ev.pointer) < 2 {
            core.end();
        }
    }

    fn before_activate(&mut self, core: &Core) {
        self.reset_progress(core);
    }

    fn reset_progress(&mut self, core: &Core) {
        if core.state == State::Active {
            return;
        }
        self.velocity = 0.0;
        self.scale = 1.0;
    }

    fn on_reset(&mut self) {
        self.detector.reset();
        self.velocity = 0.0;
        self.scale = 1.0;
    }

    fn data(&self, _core: &Core) -> GestureData {
        GestureData::Pinch {
            scale: self.scale,
            focal: self.detector.focus(),
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

    /// Two pointers on the x axis, `half` away from `x = 100`.
    fn spread(half: f64, t: u64) -> [PointerEvent; 2] {
        [
            PointerEvent::moved(1, Point::new(100.0 - half, 0.0), t),
            PointerEvent::moved(2, Point::new(100.0 + half, 0.0), t),
        ]
    }

    #[test]
    fn spreading_fingers_activates_and_scales() {
        let mut r = recognizer(PinchConfig::default());
        let t = feed(
            &mut r,
            &[
                PointerEvent::down(1, Point::new(50.0, 0.0), 0),
                PointerEvent::additional_down(2, Point::new(150.0, 0.0), 0),
            ],
        );
        assert_eq!(t, [(U, B)]);
        // Span 100 -> 140 leaves the 30 px dead zone.
        let t = feed(&mut r, &spread(70.0, 16));
        assert!(t.is_empty());
        assert_eq!(r.state(), B);
        // 140 -> 160 clears the 15 px activation slop.
        let t = feed(&mut r, &spread(80.0, 32));
        assert_eq!(t, [(B, A)]);
        feed(&mut r, &spread(100.0, 48));
        let GestureData::Pinch { scale, focal, .. } = r.data() else {
            panic!("unexpected payload");
        };
        assert!(scale > 1.0);
        assert_eq!(focal, Point::new(100.0, 0.0));
    }

    #[test]
    fn lifting_to_one_pointer_ends() {
        let mut r = recognizer(PinchConfig {
            span_slop: Some(0.0),
            activation_slop: Some(1.0),
            ..PinchConfig::default()
        });
        feed(
            &mut r,
            &[
                PointerEvent::down(1, Point::new(50.0, 0.0), 0),
                PointerEvent::additional_down(2, Point::new(150.0, 0.0), 0),
            ],
        );
        feed(&mut r, &spread(60.0, 16));
        feed(&mut r, &spread(70.0, 32));
        assert_eq!(r.state(), A);
        let t = feed(
            &mut r,
            &[PointerEvent::additional_up(2, Point::new(170.0, 0.0), 40)],
        );
        assert_eq!(t, [(A, State::End)]);
    }

    #[test]
    fn single_pointer_never_begins() {
        let mut r = recognizer(PinchConfig::default());
        let t = feed(
            &mut r,
            &[
                PointerEvent::down(1, Point::ZERO, 0),
                PointerEvent::moved(1, Point::new(100.0, 0.0), 16),
                PointerEvent::up(1, Point::new(100.0, 0.0), 32),
            ],
        );
        assert!(t.is_empty());
    }
}
