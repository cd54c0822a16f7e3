// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kinema_geom::{Aabb, Point, Polygon, Rect, sat};
use kinema_grid::SpatialHash;

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

fn gen_grid_boxes(n: usize, cell: f64) -> Vec<Aabb> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Aabb::from_coords(x0, y0, x0 + cell, y0 + cell));
        }
    }
    out
}

fn gen_random_boxes(count: usize, extent: f64, size: f64) -> Vec<Aabb> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    for _ in 0..count {
        let x0 = rng.next_f64() * (extent - size).max(1.0);
        let y0 = rng.next_f64() * (extent - size).max(1.0);
        out.push(Aabb::from_coords(x0, y0, x0 + size, y0 + size));
    }
    out
}

fn bench_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatial_hash");
    for &n in &[32usize, 64, 128] {
        let boxes = gen_grid_boxes(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("insert_search_n{}", n), |b| {
            b.iter_batched(
                || SpatialHash::<u32>::new(64.0),
                |mut grid| {
                    for (i, a) in boxes.iter().copied().enumerate() {
                        let _ = grid.insert(i as u32, a);
                    }
                    let hits = grid
                        .unfiltered_search(&Aabb::from_coords(100.0, 100.0, 500.0, 500.0))
                        .len();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }

    let boxes = gen_random_boxes(4096, 2000.0, 12.0);
    group.bench_function("update_entry_random_jitter", |b| {
        b.iter_batched(
            || {
                let mut grid = SpatialHash::<u32>::new(64.0);
                let entries: Vec<_> = boxes
                    .iter()
                    .copied()
                    .enumerate()
                    .map(|(i, a)| grid.insert(i as u32, a))
                    .collect();
                (grid, entries, Rng::new(0xBADC_F00D_1234_5678))
            },
            |(mut grid, entries, mut rng)| {
                for (entry, a) in entries.into_iter().zip(&boxes) {
                    let dx = (rng.next_f64() - 0.5) * 8.0;
                    let dy = (rng.next_f64() - 0.5) * 8.0;
                    black_box(grid.update_entry(entry, a.shift(dx, dy)));
                }
                black_box(grid.boundaries());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_sat(c: &mut Criterion) {
    let mut group = c.benchmark_group("sat");
    let a = Polygon::from_rect(&Rect::new(0.0, 0.0, 10.0, 10.0));
    let b = Polygon::from_rect(&Rect::new(8.0, 2.0, 10.0, 10.0));
    group.bench_function("upright_rects", |bench| {
        bench.iter(|| black_box(sat(black_box(&a), black_box(&b))));
    });

    let pivot = Point::new(5.0, 5.0);
    let ra = a.rotate(pivot, 30.0);
    let rb = b.rotate(pivot, -15.0);
    group.bench_function("rotated_rects", |bench| {
        bench.iter(|| black_box(sat(black_box(&ra), black_box(&rb))));
    });

    let far = b.shift(100.0, 0.0);
    group.bench_function("rotated_disjoint", |bench| {
        bench.iter(|| black_box(sat(black_box(&ra), black_box(&far))));
    });
    group.finish();
}

criterion_group!(benches, bench_grid, bench_sat);
criterion_main!(benches);
