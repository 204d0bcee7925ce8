// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pinch and rotate together.
//!
//! Two fingers spread apart while turning. The pinch and the rotation are
//! declared simultaneous, so both stay active and report their progress.
//!
//! Run:
//! - `cargo run -p understory_gesture_demos --example pinch_rotate`

use std::f64::consts::PI;

use kurbo::{Point, Vec2};
use understory_gesture::{
    GestureConfig, GestureData, Orchestrator, PinchConfig, PointerEvent, RotationConfig,
};

fn main() {
    let mut o = Orchestrator::new();
    let pinch = o
        .attach(GestureConfig::new(PinchConfig::default()))
        .unwrap();
    let rotation = o
        .attach(GestureConfig::new(RotationConfig::default()).simultaneous_with(pinch))
        .unwrap();
    let both = [pinch, rotation];

    let center = Point::new(200.0, 200.0);
    let finger = |radius: f64, angle: f64| center + Vec2::from_angle(angle) * radius;

    let mut script = vec![
        PointerEvent::down(1, finger(50.0, PI), 0),
        PointerEvent::additional_down(2, finger(50.0, 0.0), 8),
    ];
    for i in 1..=10_u32 {
        let t = f64::from(i) / 10.0;
        let radius = 50.0 + 50.0 * t;
        let angle = t * PI / 4.0;
        let time = 8 + u64::from(i) * 16;
        script.push(PointerEvent::moved(1, finger(radius, PI + angle), time));
        script.push(PointerEvent::moved(2, finger(radius, angle), time));
    }
    let end = finger(100.0, PI / 4.0);
    script.push(PointerEvent::additional_up(2, end, 200));
    script.push(PointerEvent::up(1, finger(100.0, PI + PI / 4.0), 210));

    for ev in &script {
        for e in o.dispatch_all(&both, ev).unwrap() {
            let who = if e.handle == pinch { "pinch" } else { "rotation" };
            if let Some(old) = e.old_state {
                println!("{:>4} ms  {who:<8}  {old:?} -> {:?}", ev.time_ms, e.state);
                continue;
            }
            match e.data {
                GestureData::Pinch { scale, focal, .. } => {
                    println!("{:>4} ms  {who:<8}  scale {scale:.3} at {focal:?}", ev.time_ms);
                }
                GestureData::Rotation { rotation, .. } => {
                    println!(
                        "{:>4} ms  {who:<8}  {:.1} degrees",
                        ev.time_ms,
                        rotation.to_degrees()
                    );
                }
                _ => {}
            }
        }
    }
}
