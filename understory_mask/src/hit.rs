// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Centroids and point-in-mask tests against resolved mask geometry.
//!
//! Both functions resolve the mask for the given target size on every call;
//! they are cheap enough to run per frame during interaction and never panic.

use kurbo::{Point, Size};

use crate::descriptor::MaskDescriptor;
use crate::resolve::resolve;

/// Visual center of the masked region, in target-local pixels.
///
/// Uses the area-weighted polygon centroid, falling back to the vertex mean
/// for degenerate outlines. Returns `None` when the mask is unresolvable;
/// callers then use the center of the target rectangle.
#[must_use]
pub fn mask_centroid(mask: Option<&MaskDescriptor>, size: Size) -> Option<Point> {
    resolve(mask, size).map(|geometry| geometry.centroid())
}

/// Like [`mask_centroid`], with the rectangle-center fallback applied.
#[must_use]
pub fn mask_anchor(mask: Option<&MaskDescriptor>, size: Size) -> Point {
    mask_centroid(mask, size).unwrap_or(Point::new(size.width / 2.0, size.height / 2.0))
}

/// Returns `true` if `pt` (target-local pixels) falls inside the masked region.
///
/// An unresolvable mask accepts every point: the caller is expected to have
/// already checked `pt` against the target rectangle, and this function only
/// discriminates within it. A degenerate (zero-area) mask accepts nothing.
#[must_use]
pub fn mask_contains_point(mask: Option<&MaskDescriptor>, size: Size, pt: Point) -> bool {
    match resolve(mask, size) {
        Some(geometry) => geometry.contains(pt),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{PolygonUnits, ShapeMask, TriangleOrientation};

    const SIZE: Size = Size::new(100.0, 100.0);

    #[test]
    fn square_centroid_is_center() {
        let mask = MaskDescriptor::Shape(ShapeMask::rect());
        assert_eq!(mask_centroid(Some(&mask), SIZE), Some(Point::new(50.0, 50.0)));
    }

    #[test]
    fn triangle_centroid_sits_low() {
        let mask = MaskDescriptor::Shape(ShapeMask::triangle(TriangleOrientation::Up, 0.0));
        let c = mask_centroid(Some(&mask), Size::new(90.0, 90.0)).unwrap();
        assert!((c.x - 45.0).abs() < 1e-9, "got {c:?}");
        assert!((c.y - 60.0).abs() < 1e-9, "got {c:?}");
    }

    #[test]
    fn unresolvable_centroid_falls_back_to_center() {
        assert_eq!(mask_centroid(None, SIZE), None);
        assert_eq!(mask_anchor(None, Size::new(40.0, 10.0)), Point::new(20.0, 5.0));
    }

    #[test]
    fn collinear_polygon_centroid_is_vertex_mean() {
        let mask = MaskDescriptor::Shape(ShapeMask::polygon(
            [
                Point::new(0.0, 0.0),
                Point::new(0.5, 0.5),
                Point::new(1.0, 1.0),
            ],
            Some(PolygonUnits::Normalized),
        ));
        assert_eq!(mask_centroid(Some(&mask), SIZE), Some(Point::new(50.0, 50.0)));
        assert!(!mask_contains_point(Some(&mask), SIZE, Point::new(50.0, 50.0)));
    }

    #[test]
    fn upward_triangle_accepts_apex_rejects_corner() {
        let mask = MaskDescriptor::Shape(ShapeMask::triangle(TriangleOrientation::Up, 0.0));
        assert!(mask_contains_point(Some(&mask), SIZE, Point::new(50.0, 10.0)));
        assert!(!mask_contains_point(Some(&mask), SIZE, Point::new(1.0, 1.0)));
    }

    #[test]
    fn unresolvable_mask_accepts_everything() {
        assert!(mask_contains_point(None, SIZE, Point::new(-5.0, 500.0)));
        assert!(mask_contains_point(
            Some(&MaskDescriptor::Gradient),
            SIZE,
            Point::new(1.0, 1.0)
        ));
        let mask = MaskDescriptor::Shape(ShapeMask::rect());
        assert!(mask_contains_point(Some(&mask), Size::ZERO, Point::new(1.0, 1.0)));
    }

    #[test]
    fn concave_polygon_notch_is_outside() {
        // A "U" shape: the notch between the arms is not part of the mask.
        let mask = MaskDescriptor::Shape(ShapeMask::polygon(
            [
                Point::new(0.0, 0.0),
                Point::new(30.0, 0.0),
                Point::new(30.0, 70.0),
                Point::new(70.0, 70.0),
                Point::new(70.0, 0.0),
                Point::new(100.0, 0.0),
                Point::new(100.0, 100.0),
                Point::new(0.0, 100.0),
            ],
            Some(PolygonUnits::Absolute),
        ));
        assert!(!mask_contains_point(Some(&mask), SIZE, Point::new(50.0, 30.0)));
        assert!(mask_contains_point(Some(&mask), SIZE, Point::new(15.0, 30.0)));
        assert!(mask_contains_point(Some(&mask), SIZE, Point::new(50.0, 85.0)));
    }
}
