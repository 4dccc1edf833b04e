// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mask resolution: descriptor + target size into concrete geometry.
//!
//! Resolved geometry lives in the target rectangle's local pixel space, with
//! the origin at its top-left corner. Normalized masks depend on the target
//! size, so a [`MaskGeometry`] is only valid for the size it was resolved
//! against and must be recomputed whenever that size changes.

use kurbo::{BezPath, Point, Rect, Size};
use smallvec::smallvec;

use crate::descriptor::{MaskDescriptor, MaskShape, PointList, PolygonUnits, TriangleOrientation};
use crate::geometry::vertex_mean;

/// Signed areas smaller than this are treated as degenerate.
pub const DEGENERATE_AREA_EPSILON: f64 = 1e-6;

/// A closed polygon in target-local pixel space.
#[derive(Clone, Debug, PartialEq)]
pub struct MaskGeometry {
    points: PointList,
}

impl MaskGeometry {
    /// Wraps an already-resolved vertex list.
    ///
    /// Returns `None` for fewer than three vertices.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let points: PointList = points.into_iter().collect();
        (points.len() >= 3).then_some(Self { points })
    }

    /// The vertices in order. The outline implicitly closes from the last
    /// vertex back to the first.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Builds a closed path through the vertices.
    #[must_use]
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut iter = self.points.iter();
        if let Some(first) = iter.next() {
            path.move_to(*first);
            for point in iter {
                path.line_to(*point);
            }
            path.close_path();
        }
        path
    }

    /// Shoelace signed area; positive for clockwise outlines in y-down space.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        let mut twice = 0.0;
        for i in 0..n {
            let p0 = self.points[i];
            let p1 = self.points[(i + 1) % n];
            twice += p0.x * p1.y - p1.x * p0.y;
        }
        twice * 0.5
    }

    /// Unsigned area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Returns `true` if the polygon encloses (numerically) no area.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        is_degenerate_area(self.signed_area())
    }

    /// Axis-aligned bounds of the vertices.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        let first = self.points[0];
        self.points
            .iter()
            .skip(1)
            .fold(Rect::from_points(first, first), |r, p| r.union_pt(*p))
    }

    /// Area-weighted centroid.
    ///
    /// Degenerate outlines (collinear vertices, zero-size triangles) fall back
    /// to the arithmetic mean of the vertices.
    #[must_use]
    pub fn centroid(&self) -> Point {
        let n = self.points.len();
        let mut twice_area = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;
        for i in 0..n {
            let p0 = self.points[i];
            let p1 = self.points[(i + 1) % n];
            let cross = p0.x * p1.y - p1.x * p0.y;
            twice_area += cross;
            cx += (p0.x + p1.x) * cross;
            cy += (p0.y + p1.y) * cross;
        }
        let area = twice_area * 0.5;
        if is_degenerate_area(area) {
            return vertex_mean(&self.points).unwrap_or(Point::ZERO);
        }
        let factor = 1.0 / (6.0 * area);
        Point::new(cx * factor, cy * factor)
    }

    /// Even-odd point-in-polygon test.
    ///
    /// A degenerate outline contains nothing.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        if self.is_degenerate() {
            return false;
        }
        let n = self.points.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[j];
            if (a.y > pt.y) != (b.y > pt.y) {
                let x_cross = (b.x - a.x) * (pt.y - a.y) / (b.y - a.y) + a.x;
                if pt.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

fn is_degenerate_area(area: f64) -> bool {
    area.is_nan() || area.abs() < DEGENERATE_AREA_EPSILON
}

/// Resolves `mask` against a target of `size`.
///
/// Returns `None`, meaning "draw an unclipped rectangle", when:
/// - there is no mask, or it is not a shape mask;
/// - either target dimension is not strictly positive;
/// - a polygon has fewer than three vertices.
#[must_use]
pub fn resolve(mask: Option<&MaskDescriptor>, size: Size) -> Option<MaskGeometry> {
    let shape = mask?.as_shape()?;
    if !(size.width > 0.0 && size.height > 0.0) {
        return None;
    }
    let points = match &shape.shape {
        MaskShape::Rect => rect_points(size),
        MaskShape::Triangle { orientation, inset } => triangle_points(*orientation, *inset, size),
        MaskShape::Polygon { points, units } => polygon_points(points, *units, size)?,
    };
    MaskGeometry::from_points(points)
}

fn rect_points(size: Size) -> PointList {
    smallvec![
        Point::new(0.0, 0.0),
        Point::new(size.width, 0.0),
        Point::new(size.width, size.height),
        Point::new(0.0, size.height),
    ]
}

fn triangle_points(orientation: TriangleOrientation, inset: f64, size: Size) -> PointList {
    let inset = inset.max(0.0);
    let w = (size.width - inset * 2.0).max(0.0);
    let h = (size.height - inset * 2.0).max(0.0);
    let (x, y) = (inset, inset);
    match orientation {
        TriangleOrientation::Up => smallvec![
            Point::new(x, y + h),
            Point::new(x + w, y + h),
            Point::new(x + w / 2.0, y),
        ],
        TriangleOrientation::Down => smallvec![
            Point::new(x, y),
            Point::new(x + w, y),
            Point::new(x + w / 2.0, y + h),
        ],
        TriangleOrientation::Left => smallvec![
            Point::new(x + w, y),
            Point::new(x + w, y + h),
            Point::new(x, y + h / 2.0),
        ],
        TriangleOrientation::Right => smallvec![
            Point::new(x, y),
            Point::new(x + w, y + h / 2.0),
            Point::new(x, y + h),
        ],
    }
}

fn polygon_points(points: &[Point], units: Option<PolygonUnits>, size: Size) -> Option<PointList> {
    if points.len() < 3 {
        return None;
    }
    let units = units.unwrap_or_else(|| PolygonUnits::infer(points));
    Some(match units {
        PolygonUnits::Normalized => points
            .iter()
            .map(|p| Point::new(p.x * size.width, p.y * size.height))
            .collect(),
        PolygonUnits::Absolute => points.iter().copied().collect(),
    })
}
