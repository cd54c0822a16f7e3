// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kinema_geom::Rect;
use kinema_world::{HullShape, World};
use kurbo::Vec2;

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

/// `count` moving colliders scattered over a square, all checking hits against each other.
fn build_world(count: usize, extent: f64) -> World {
    let mut world = World::new();
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    for _ in 0..count {
        let x = rng.next_f64() * extent;
        let y = rng.next_f64() * extent;
        let e = world.spawn(Rect::new(x, y, 12.0, 12.0));
        world.collision(e, HullShape::Rect).unwrap();
        world.add_tag(e, "body").unwrap();
        world.enable_motion(e).unwrap();
        let v = Vec2::new(rng.next_f64() - 0.5, rng.next_f64() - 0.5) * 120.0;
        world.set_velocity(e, v).unwrap();
        world.check_hits(e, &["body"]).unwrap();
    }
    world
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_tick");
    for &n in &[256usize, 1024, 4096] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("moving_colliders_n{}", n), |b| {
            b.iter_batched(
                || build_world(n, 2000.0),
                |mut world| {
                    for _ in 0..4 {
                        world.tick(1000.0 / 60.0).unwrap();
                    }
                    black_box(world.frame());
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
