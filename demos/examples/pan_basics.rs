// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pan basics.
//!
//! Attach a pan, drag a pointer across it, and print the state changes and
//! continuous updates the orchestrator reports.
//!
//! Run:
//! - `cargo run -p understory_gesture_demos --example pan_basics`

use kurbo::{Point, Rect};
use understory_gesture::{GestureConfig, GestureData, Orchestrator, PanConfig, PointerEvent, State};

fn main() {
    let mut o = Orchestrator::new();
    let pan = o
        .attach(
            GestureConfig::new(PanConfig {
                min_dist: Some(20.0),
                ..PanConfig::default()
            })
            .bounds(Rect::new(0.0, 0.0, 400.0, 300.0)),
        )
        .unwrap();

    let mut script = vec![PointerEvent::down(1, Point::new(50.0, 50.0), 0)];
    for i in 1..=8_u32 {
        let x = 50.0 + f64::from(i) * 6.0;
        script.push(PointerEvent::moved(1, Point::new(x, 50.0), u64::from(i) * 16));
    }
    script.push(PointerEvent::up(1, Point::new(98.0, 50.0), 160));

    for ev in &script {
        for e in o.dispatch(pan, ev).unwrap() {
            match (e.old_state, e.data) {
                (Some(old), _) => println!("{:>4} ms  {old:?} -> {:?}", ev.time_ms, e.state),
                (None, GestureData::Pan { translation, velocity }) => println!(
                    "{:>4} ms  translation {:>5.1} velocity {:>6.1}",
                    ev.time_ms, translation.x, velocity.x
                ),
                (None, other) => println!("{:>4} ms  {other:?}", ev.time_ms),
            }
        }
    }

    assert_eq!(o.state(pan), Some(State::Undetermined), "pan resets after ending");
}
