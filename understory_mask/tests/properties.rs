// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `understory_mask` crate.
//!
//! These check the contracts renderers and touch routing rely on: resolved
//! outlines stay inside the target, unresolvable input falls back instead of
//! failing, and hit testing agrees with the outline.

use kurbo::{Point, Size};
use understory_mask::{
    MaskDescriptor, MaskStroke, PolygonUnits, ShapeMask, TriangleOrientation, mask_anchor,
    mask_centroid, mask_contains_point, resolve, resolve_stroke, stroke_scale,
};

fn shape(mask: ShapeMask) -> MaskDescriptor {
    MaskDescriptor::Shape(mask)
}

#[test]
fn normalized_polygons_stay_inside_target() {
    let outlines = [
        vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
        vec![(0.5, 0.0), (1.0, 0.38), (0.81, 1.0), (0.19, 1.0), (0.0, 0.38)],
        vec![(0.1, 0.9), (0.9, 0.9), (0.5, 0.1)],
    ];
    for size in [Size::new(300.0, 120.0), Size::new(1.0, 1.0), Size::new(2048.0, 977.5)] {
        for outline in &outlines {
            let mask = shape(ShapeMask::polygon(
                outline.iter().map(|&(x, y)| Point::new(x, y)),
                Some(PolygonUnits::Normalized),
            ));
            let geometry = resolve(Some(&mask), size).unwrap();
            for p in geometry.points() {
                assert!((0.0..=size.width).contains(&p.x), "{p:?} outside {size:?}");
                assert!((0.0..=size.height).contains(&p.y), "{p:?} outside {size:?}");
            }
        }
    }
}

#[test]
fn rect_mask_is_the_target_rectangle() {
    let mask = shape(ShapeMask::rect());
    for (w, h) in [(1.0, 1.0), (640.0, 480.0), (0.5, 3000.0)] {
        let geometry = resolve(Some(&mask), Size::new(w, h)).unwrap();
        assert_eq!(
            geometry.points(),
            &[
                Point::new(0.0, 0.0),
                Point::new(w, 0.0),
                Point::new(w, h),
                Point::new(0.0, h)
            ]
        );
    }
}

#[test]
fn unresolvable_input_yields_none() {
    let size = Size::new(100.0, 100.0);
    assert!(resolve(None, size).is_none());
    assert!(resolve(Some(&shape(ShapeMask::rect())), Size::new(0.0, 100.0)).is_none());
    assert!(resolve(Some(&shape(ShapeMask::rect())), Size::new(100.0, f64::NAN)).is_none());
    let two_points = shape(ShapeMask::polygon(
        [Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
        None,
    ));
    assert!(resolve(Some(&two_points), size).is_none());
    assert!(resolve(Some(&MaskDescriptor::Gradient), size).is_none());
}

#[test]
fn square_centroid_and_fallback_anchor() {
    let size = Size::new(100.0, 100.0);
    let square = shape(ShapeMask::rect());
    assert_eq!(mask_centroid(Some(&square), size), Some(Point::new(50.0, 50.0)));
    assert_eq!(mask_centroid(None, size), None);
    assert_eq!(mask_anchor(None, Size::new(80.0, 40.0)), Point::new(40.0, 20.0));
}

#[test]
fn triangle_hit_test_follows_outline() {
    let size = Size::new(200.0, 100.0);
    let up = shape(ShapeMask::triangle(TriangleOrientation::Up, 0.0));
    assert!(mask_contains_point(Some(&up), size, Point::new(100.0, 10.0)));
    assert!(!mask_contains_point(Some(&up), size, Point::new(1.0, 1.0)));
    // No mask discriminates nothing; the caller has already checked the rect.
    assert!(mask_contains_point(None, size, Point::new(1.0, 1.0)));
}

#[test]
fn stroke_width_scales_linearly() {
    let mask = shape(ShapeMask::rect().with_stroke(MaskStroke::new(3.0)));
    let one = resolve_stroke(Some(&mask), 1.0).unwrap();
    let two = resolve_stroke(Some(&mask), 2.0).unwrap();
    assert_eq!(two.width, 2.0 * one.width);
    assert_eq!(two.width, 6.0);

    let scale = stroke_scale(Size::new(400.0, 100.0), Size::new(200.0, 100.0));
    assert_eq!(scale, 1.0);
}
