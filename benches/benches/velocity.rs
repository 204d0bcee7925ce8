// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_gesture_track::{PointerId, PointerTracker, VelocityTracker, lsq};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// A jittery drag sampled every 8 ms.
fn gen_drag(count: usize, seed: u64) -> Vec<(Point, u64)> {
    let mut rng = Rng::new(seed);
    let mut out = Vec::with_capacity(count);
    let mut p = Point::ZERO;
    for i in 0..count {
        p.x += 6.0 + rng.next_f64();
        p.y += 2.0 * (rng.next_f64() - 0.5);
        out.push((p, i as u64 * 8));
    }
    out
}

fn bench_lsq(c: &mut Criterion) {
    let mut group = c.benchmark_group("lsq");
    for &n in &[5usize, 10, 20] {
        let mut rng = Rng::new(7);
        let x: Vec<f64> = (0..n).map(|i| -(i as f64) * 0.008).collect();
        let y: Vec<f64> = x
            .iter()
            .map(|t| 3.0 + 800.0 * t + 40.0 * t * t + rng.next_f64())
            .collect();
        let w = vec![1.0; n];
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("quadratic_n{}", n), |b| {
            b.iter(|| black_box(lsq::solve(&x, &y, &w, 2)));
        });
    }
    group.finish();
}

fn bench_velocity(c: &mut Criterion) {
    let mut group = c.benchmark_group("velocity");
    let drag = gen_drag(256, 42);
    group.throughput(Throughput::Elements(drag.len() as u64));
    group.bench_function("add_and_estimate_each_sample", |b| {
        b.iter_batched(
            VelocityTracker::default,
            |mut vt| {
                for &(p, t) in &drag {
                    vt.add(p, t);
                    black_box(vt.velocity());
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_tracker(c: &mut Criterion) {
    let mut group = c.benchmark_group("tracker");
    for &fingers in &[1usize, 2, 5] {
        let drags: Vec<_> = (0..fingers).map(|f| gen_drag(128, 11 + f as u64)).collect();
        group.throughput(Throughput::Elements((fingers * 128) as u64));
        group.bench_function(format!("track_centroid_p{}", fingers), |b| {
            b.iter_batched(
                || {
                    let mut t = PointerTracker::default();
                    for f in 0..fingers {
                        t.add(PointerId(f as u32), Point::ZERO, 0);
                    }
                    t
                },
                |mut t| {
                    for i in 0..128 {
                        for (f, drag) in drags.iter().enumerate() {
                            let (p, time) = drag[i];
                            t.track(PointerId(f as u32), p, time);
                        }
                        black_box(t.centroid());
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_lsq, bench_velocity, bench_tracker);
criterion_main!(benches);
