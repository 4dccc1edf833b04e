// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size};
use understory_mask::{
    MaskDescriptor, MaskStroke, PolygonUnits, ShapeMask, TriangleOrientation, mask_anchor,
    mask_contains_point, resolve, resolve_stroke,
};

fn regular_polygon(sides: usize) -> MaskDescriptor {
    let points = (0..sides).map(|i| {
        let a = i as f64 / sides as f64 * core::f64::consts::TAU;
        Point::new(0.5 + 0.5 * a.cos(), 0.5 + 0.5 * a.sin())
    });
    ShapeMask::polygon(points, Some(PolygonUnits::Normalized))
        .with_stroke(MaskStroke::new(4.0))
        .into()
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("mask/resolve");
    let size = Size::new(1008.0, 1008.0);

    let triangle: MaskDescriptor = ShapeMask::triangle(TriangleOrientation::Up, 12.0).into();
    group.bench_function("triangle", |b| {
        b.iter(|| black_box(resolve(Some(black_box(&triangle)), size)));
    });

    // Per-frame work during an edge drag: outline, stroke and icon anchor.
    for sides in [5_usize, 32, 256] {
        let mask = regular_polygon(sides);
        group.throughput(Throughput::Elements(sides as u64));
        group.bench_with_input(BenchmarkId::new("polygon_frame", sides), &mask, |b, mask| {
            b.iter(|| {
                let geometry = resolve(Some(mask), size);
                let stroke = resolve_stroke(Some(mask), 0.5);
                let anchor = mask_anchor(Some(mask), size);
                black_box((geometry, stroke, anchor));
            });
        });
    }
    group.finish();
}

fn bench_contains(c: &mut Criterion) {
    let mut group = c.benchmark_group("mask/contains");
    let size = Size::new(1008.0, 1008.0);
    let taps: Vec<Point> = (0..64)
        .map(|i| Point::new(f64::from(i % 8) * 126.0 + 3.0, f64::from(i / 8) * 126.0 + 3.0))
        .collect();

    for sides in [5_usize, 256] {
        let mask = regular_polygon(sides);
        group.throughput(Throughput::Elements(taps.len() as u64));
        group.bench_with_input(BenchmarkId::new("polygon", sides), &mask, |b, mask| {
            b.iter(|| {
                taps.iter()
                    .filter(|&&pt| mask_contains_point(Some(mask), size, pt))
                    .count()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_contains);
criterion_main!(benches);
