// Copyright 2026 the Overpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use overpaint_region::{IRect, RegionScratch, disjoint_difference, disjoint_difference_with};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    fn gen_range_i32(&mut self, upper_exclusive: i32) -> i32 {
        (self.next_u32() % upper_exclusive as u32) as i32
    }
}

/// `n` rectangles scattered over a `world`-sized square.
fn scattered(n: usize, world: i32, max_side: i32, seed: u64) -> Vec<IRect> {
    let mut rng = Lcg::new(seed);
    (0..n)
        .map(|_| {
            IRect::new(
                rng.gen_range_i32(world),
                rng.gen_range_i32(world),
                1 + rng.gen_range_i32(max_side),
                1 + rng.gen_range_i32(max_side),
            )
        })
        .collect()
}

fn bench_region(c: &mut Criterion) {
    let mut group = c.benchmark_group("overpaint_region");
    group.sample_size(50);

    for &(added, removed) in &[(8_usize, 4_usize), (32, 16), (128, 64)] {
        let a = scattered(added, 1024, 128, 0x0E5A_0000_0000_0001);
        let r = scattered(removed, 1024, 128, 0x0E5A_0000_0000_0002);

        group.bench_function(format!("difference(a={added},r={removed})"), |b| {
            b.iter(|| black_box(disjoint_difference(black_box(&a), black_box(&r))));
        });

        group.bench_function(
            format!("difference_with_scratch(a={added},r={removed})"),
            |b| {
                let mut scratch = RegionScratch::with_capacity(added + removed);
                let mut out = Vec::new();
                b.iter(|| {
                    out.clear();
                    disjoint_difference_with(&mut scratch, black_box(&a), black_box(&r), &mut out);
                    black_box(out.len());
                });
            },
        );
    }

    // Many small overlapping rects, as produced by a frame of moving sprites.
    let sprites = scattered(256, 640, 32, 0x0E5A_0000_0000_0003);
    group.bench_function("union(n=256,small)", |b| {
        b.iter(|| black_box(disjoint_difference(black_box(&sprites), &[])));
    });

    group.finish();
}

criterion_group!(benches, bench_region);
criterion_main!(benches);
