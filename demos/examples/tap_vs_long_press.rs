// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap versus long press.
//!
//! A single tap waits for a double tap, and a long press shares the pointer
//! with both. Three interactions show each of them winning in turn. The host
//! loop advances time with `next_deadline` and `fire_due_timers`.
//!
//! Run:
//! - `cargo run -p understory_gesture_demos --example tap_vs_long_press`

use kurbo::Point;
use understory_gesture::{
    GestureConfig, GestureEvent, Handle, LongPressConfig, Orchestrator, PointerEvent, TapConfig,
};

struct Names {
    single: Handle,
    double: Handle,
    press: Handle,
}

impl Names {
    fn of(&self, h: Handle) -> &'static str {
        if h == self.single {
            "single tap"
        } else if h == self.double {
            "double tap"
        } else if h == self.press {
            "long press"
        } else {
            "?"
        }
    }
}

fn print(names: &Names, events: &[GestureEvent]) {
    for e in events.iter().filter(|e| e.is_state_change()) {
        if let Some(old) = e.old_state {
            println!("  {:<10}  {old:?} -> {:?}", names.of(e.handle), e.state);
        }
    }
}

/// Feed `script`, firing any deadline that falls between events, then drain
/// the remaining deadlines.
fn run(o: &mut Orchestrator, names: &Names, script: &[PointerEvent]) {
    let all = [names.single, names.double, names.press];
    for ev in script {
        while let Some(d) = o.next_deadline().filter(|d| *d < ev.time_ms) {
            print(names, &o.fire_due_timers(d));
        }
        print(names, &o.dispatch_all(&all, ev).unwrap());
    }
    while let Some(d) = o.next_deadline() {
        print(names, &o.fire_due_timers(d));
    }
}

fn main() {
    let mut o = Orchestrator::new();
    let double = o
        .attach(GestureConfig::new(TapConfig {
            number_of_taps: Some(2),
            max_delay_ms: Some(250),
            ..TapConfig::default()
        }))
        .unwrap();
    let single = o
        .attach(GestureConfig::new(TapConfig::default()).wait_for(double))
        .unwrap();
    let press = o
        .attach(GestureConfig::new(LongPressConfig::default()))
        .unwrap();
    let names = Names {
        single,
        double,
        press,
    };
    let at = Point::new(20.0, 20.0);

    println!("quick tap:");
    run(
        &mut o,
        &names,
        &[PointerEvent::down(1, at, 0), PointerEvent::up(1, at, 60)],
    );

    println!("double tap:");
    run(
        &mut o,
        &names,
        &[
            PointerEvent::down(1, at, 1_000),
            PointerEvent::up(1, at, 1_060),
            PointerEvent::down(1, at, 1_150),
            PointerEvent::up(1, at, 1_200),
        ],
    );

    println!("press and hold:");
    run(
        &mut o,
        &names,
        &[
            PointerEvent::down(1, at, 2_000),
            PointerEvent::up(1, at, 2_800),
        ],
    );
}
