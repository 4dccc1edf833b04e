// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_collage::{
    CollageProject, Edge, RenderPlan, ResizeParams, ResizeSession, TemplateDefinition,
    hit_test_layers,
};

fn grid(n: u32) -> CollageProject {
    TemplateDefinition::grid("bench", "bench", n, n, 2048.0, 0.0).instantiate("p", None, 0)
}

fn bench_resize_preview(c: &mut Criterion) {
    let mut group = c.benchmark_group("collage/resize_preview");

    // A drag recomputes the plan on every pointer move.
    for n in [2_u32, 6, 12] {
        let project = grid(n);
        group.bench_with_input(BenchmarkId::from_parameter(n * n), &project, |b, project| {
            b.iter_batched(
                || {
                    ResizeSession::begin(project, "frame-0", Edge::Right, ResizeParams::default())
                },
                |session| {
                    let mut session = session.expect("frame-0 exists");
                    for step in 0..32 {
                        black_box(session.drag_by(f64::from(step)));
                    }
                    session.finish()
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_hit_and_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("collage/frame");
    for n in [2_u32, 12] {
        let project = grid(n);
        group.bench_with_input(BenchmarkId::new("hit_test", n * n), &project, |b, project| {
            b.iter(|| hit_test_layers(project, black_box(Point::new(1500.0, 1500.0))).is_some());
        });
        group.bench_with_input(BenchmarkId::new("render_plan", n * n), &project, |b, project| {
            b.iter(|| RenderPlan::build(project, black_box(0.25)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resize_preview, bench_hit_and_plan);
criterion_main!(benches);
