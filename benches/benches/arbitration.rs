// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_gesture::{
    GestureConfig, Handle, LongPressConfig, Orchestrator, PanConfig, PointerEvent, TapConfig,
};

/// `n` pans competing for one pointer, plus a tap and a long press the first pan waits for.
fn build_contested(n: usize) -> (Orchestrator, Vec<Handle>) {
    let mut o = Orchestrator::new();
    let mut handles = Vec::with_capacity(n + 2);
    let press = o
        .attach(GestureConfig::new(LongPressConfig::default()))
        .unwrap();
    let tap = o.attach(GestureConfig::new(TapConfig::default())).unwrap();
    handles.push(press);
    handles.push(tap);
    for i in 0..n {
        let mut config = GestureConfig::new(PanConfig::default());
        if i == 0 {
            config = config.wait_for(press);
        }
        handles.push(o.attach(config).unwrap());
    }
    (o, handles)
}

fn drag_script(steps: usize) -> Vec<PointerEvent> {
    let mut out = Vec::with_capacity(steps + 2);
    out.push(PointerEvent::down(1, Point::ZERO, 0));
    for i in 1..=steps {
        let x = i as f64 * 4.0;
        out.push(PointerEvent::moved(1, Point::new(x, 0.0), i as u64 * 8));
    }
    let last = steps as f64 * 4.0;
    out.push(PointerEvent::up(1, Point::new(last, 0.0), (steps as u64 + 1) * 8));
    out
}

fn bench_contested_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("arbitration");
    let script = drag_script(60);
    for &n in &[2usize, 8, 32] {
        group.throughput(Throughput::Elements((script.len() * (n + 2)) as u64));
        group.bench_function(format!("contested_drag_r{}", n), |b| {
            b.iter_batched(
                || build_contested(n),
                |(mut o, handles)| {
                    let mut events = 0;
                    for ev in &script {
                        events += o.dispatch_all(&handles, ev).unwrap().len();
                    }
                    black_box(events);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_disjoint_taps(c: &mut Criterion) {
    let mut group = c.benchmark_group("arbitration");
    let n = 16usize;
    group.throughput(Throughput::Elements(n as u64));
    group.bench_function("disjoint_taps_r16", |b| {
        b.iter_batched(
            || {
                let mut o = Orchestrator::new();
                let hs: Vec<_> = (0..n)
                    .map(|_| o.attach(GestureConfig::new(TapConfig::default())).unwrap())
                    .collect();
                (o, hs)
            },
            |(mut o, hs)| {
                for (i, &h) in hs.iter().enumerate() {
                    let p = Point::new(i as f64 * 50.0, 0.0);
                    o.dispatch(h, &PointerEvent::down(i as u32, p, 0)).unwrap();
                }
                for (i, &h) in hs.iter().enumerate() {
                    let p = Point::new(i as f64 * 50.0, 0.0);
                    black_box(o.dispatch(h, &PointerEvent::up(i as u32, p, 60)).unwrap());
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_contested_drag, bench_disjoint_taps);
criterion_main!(benches);
