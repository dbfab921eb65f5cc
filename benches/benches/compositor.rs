// Copyright 2026 the Overpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use overpaint_compositor::{Compositor, CompositorOptions, DrawState, Drawable, IRect};

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

/// Counts painted area instead of touching pixels.
#[derive(Clone)]
struct Sprite(DrawState);

impl Drawable for Sprite {
    type Surface = u64;
    type Error = core::convert::Infallible;

    fn visible(&self) -> bool {
        self.0.visible()
    }
    fn was_visible(&self) -> bool {
        self.0.was_visible()
    }
    fn set_was_visible(&mut self, was_visible: bool) {
        self.0.set_was_visible(was_visible);
    }
    fn bounds(&self) -> IRect {
        self.0.bounds()
    }
    fn previous_bounds(&self) -> IRect {
        self.0.drawn_bounds()
    }
    fn local_dirty(&self) -> &[IRect] {
        self.0.local_dirty()
    }
    fn clear_local_dirty(&mut self) {
        self.0.clear_local_dirty();
    }
    fn pre_draw(&mut self) -> Result<(), Self::Error> {
        self.0.prepare();
        Ok(())
    }
    fn is_opaque_over(&self, rect: IRect) -> bool {
        self.0.is_opaque_over(rect)
    }
    fn draw(&mut self, painted: &mut u64, rects: &[IRect]) -> Result<(), Self::Error> {
        *painted += rects.iter().map(|r| r.area()).sum::<u64>();
        self.0.mark_drawn();
        Ok(())
    }
}

/// A settled scene: `layers` layers of `per_layer` sprites over an opaque
/// backdrop, already rendered once.
fn build_scene(layers: usize, per_layer: usize, seed: u64) -> Vec<Vec<Sprite>> {
    let mut rng = Lcg::new(seed);
    let mut scene: Vec<Vec<Sprite>> = (0..layers)
        .map(|_| {
            (0..per_layer)
                .map(|_| {
                    let bounds = IRect::new(
                        rng.gen_range_i32(600),
                        rng.gen_range_i32(440),
                        8 + rng.gen_range_i32(40),
                        8 + rng.gen_range_i32(40),
                    );
                    Sprite(DrawState::new(bounds).with_opaque(rng.next_u32() % 2 == 0))
                })
                .collect()
        })
        .collect();
    scene.push(vec![Sprite(
        DrawState::new(IRect::new(0, 0, 640, 480)).with_opaque(true),
    )]);
    let _ = Compositor::new().composite(&mut 0, &mut scene, &[]);
    scene
}

fn move_some(scene: &mut [Vec<Sprite>], every: usize, seed: u64) {
    let mut rng = Lcg::new(seed);
    let last = scene.len() - 1;
    for layer in &mut scene[..last] {
        for sprite in layer.iter_mut().step_by(every) {
            sprite
                .0
                .move_by(rng.gen_range_i32(9) - 4, rng.gen_range_i32(9) - 4);
        }
    }
}

fn bench_compositor(c: &mut Criterion) {
    let mut group = c.benchmark_group("overpaint_compositor");
    group.sample_size(50);

    for &(layers, per_layer) in &[(2_usize, 8_usize), (4, 16), (8, 32)] {
        for cull in [true, false] {
            group.bench_function(
                format!("move_quarter(l={layers},n={per_layer},cull={cull})"),
                |b| {
                    let options = CompositorOptions::new().with_cull_opaque(cull);
                    let mut compositor = Compositor::with_options(options);
                    b.iter_batched(
                        || {
                            let mut scene = build_scene(layers, per_layer, 0xC0DE_0000_0000_0001);
                            move_some(&mut scene, 4, 0xC0DE_0000_0000_0002);
                            scene
                        },
                        |mut scene| {
                            let mut painted = 0_u64;
                            let out = compositor.composite(&mut painted, &mut scene, &[]);
                            black_box((out, painted));
                        },
                        BatchSize::LargeInput,
                    );
                },
            );
        }

        group.bench_function(format!("quiet_frame(l={layers},n={per_layer})"), |b| {
            let mut compositor = Compositor::new();
            let mut scene = build_scene(layers, per_layer, 0xC0DE_0000_0000_0003);
            b.iter(|| {
                let mut painted = 0_u64;
                black_box(compositor.composite(&mut painted, &mut scene, &[]).ok());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compositor);
criterion_main!(benches);
