// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed mask descriptors.
//!
//! A mask describes the visible silhouette of a frame independently of the
//! frame's size. Resolution against a concrete target size happens in
//! [`crate::resolve`].

use alloc::string::String;
use kurbo::{Cap, Join, Point};
use smallvec::SmallVec;

/// Inline capacity for polygon vertex lists.
///
/// Collage masks are almost always triangles, quads or short star outlines.
pub type PointList = SmallVec<[Point; 8]>;

/// Top-level mask description attached to a frame.
///
/// Only [`MaskDescriptor::Shape`] is resolvable into geometry. The other kinds
/// are carried for completeness and always degrade to "no mask", which callers
/// render as a plain rectangle.
#[derive(Clone, Debug, PartialEq)]
pub enum MaskDescriptor {
    /// A geometric shape mask.
    Shape(ShapeMask),
    /// An application-defined mask the geometry engine does not interpret.
    Custom,
    /// A gradient (soft) mask the geometry engine does not interpret.
    Gradient,
}

impl MaskDescriptor {
    /// Returns the shape mask, if this descriptor is one.
    #[must_use]
    pub fn as_shape(&self) -> Option<&ShapeMask> {
        match self {
            Self::Shape(shape) => Some(shape),
            Self::Custom | Self::Gradient => None,
        }
    }
}

impl From<ShapeMask> for MaskDescriptor {
    fn from(shape: ShapeMask) -> Self {
        Self::Shape(shape)
    }
}

/// A shape mask: an outline plus an optional stroke drawn along it.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeMask {
    /// The outline.
    pub shape: MaskShape,
    /// Optional stroke overlay.
    pub stroke: Option<MaskStroke>,
}

impl ShapeMask {
    /// A full-rectangle mask without stroke.
    #[must_use]
    pub fn rect() -> Self {
        Self {
            shape: MaskShape::Rect,
            stroke: None,
        }
    }

    /// A triangle mask without stroke.
    ///
    /// Negative insets are clamped to zero.
    #[must_use]
    pub fn triangle(orientation: TriangleOrientation, inset: f64) -> Self {
        Self {
            shape: MaskShape::Triangle {
                orientation,
                inset: inset.max(0.0),
            },
            stroke: None,
        }
    }

    /// A polygon mask without stroke.
    ///
    /// Passing `None` for `units` opts into range-based unit inference; see
    /// [`PolygonUnits::infer`].
    #[must_use]
    pub fn polygon(points: impl IntoIterator<Item = Point>, units: Option<PolygonUnits>) -> Self {
        Self {
            shape: MaskShape::Polygon {
                points: points.into_iter().collect(),
                units,
            },
            stroke: None,
        }
    }

    /// Returns `self` with the given stroke overlay.
    #[must_use]
    pub fn with_stroke(mut self, stroke: MaskStroke) -> Self {
        self.stroke = Some(stroke);
        self
    }
}

/// The outline of a [`ShapeMask`].
#[derive(Clone, Debug, PartialEq)]
pub enum MaskShape {
    /// The full target rectangle.
    Rect,
    /// An isosceles triangle inscribed in the (inset) target rectangle.
    Triangle {
        /// Which way the apex points.
        orientation: TriangleOrientation,
        /// Inset from every edge of the target rectangle, in target pixels.
        inset: f64,
    },
    /// An arbitrary closed polygon.
    Polygon {
        /// Vertices in order; the last vertex connects back to the first.
        points: PointList,
        /// Coordinate units of `points`, or `None` to infer them.
        units: Option<PolygonUnits>,
    },
}

/// Direction of a triangle's apex.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TriangleOrientation {
    /// Apex at top-center, base along the bottom edge.
    #[default]
    Up,
    /// Apex at bottom-center, base along the top edge.
    Down,
    /// Apex at left-middle, base along the right edge.
    Left,
    /// Apex at right-middle, base along the left edge.
    Right,
}

/// Coordinate units of polygon vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PolygonUnits {
    /// Fractions of the target width and height, scaled per axis.
    Normalized,
    /// Target pixels, used as-is.
    Absolute,
}

impl PolygonUnits {
    /// Guesses units from the vertex range.
    ///
    /// Points are treated as normalized iff every coordinate lies in
    /// `[0, 1]`. This misclassifies an absolute polygon that happens to sit
    /// inside the unit square, so new data should always carry explicit
    /// units; this exists for masks saved without them.
    #[must_use]
    pub fn infer(points: &[Point]) -> Self {
        let unit = |v: f64| (0.0..=1.0).contains(&v);
        if points.iter().all(|p| unit(p.x) && unit(p.y)) {
            Self::Normalized
        } else {
            Self::Absolute
        }
    }
}

/// Stroke overlay parameters as authored on a mask.
///
/// Missing style fields are filled with defaults by
/// [`resolve_stroke`](crate::resolve_stroke).
#[derive(Clone, Debug, PartialEq)]
pub struct MaskStroke {
    /// Stroke width at an intrinsic scale of `1.0`.
    pub width: f64,
    /// Stroke color as authored (typically `#RRGGBB`).
    pub color: Option<String>,
    /// Line join.
    pub join: Option<Join>,
    /// Line cap.
    pub cap: Option<Cap>,
}

impl MaskStroke {
    /// A stroke of `width` with every style field left at its default.
    #[must_use]
    pub fn new(width: f64) -> Self {
        Self {
            width,
            color: None,
            join: None,
            cap: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_normalized_inside_unit_square() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.5, 1.0),
        ];
        assert_eq!(PolygonUnits::infer(&pts), PolygonUnits::Normalized);
    }

    #[test]
    fn infer_absolute_when_any_coordinate_escapes() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(1.5, 0.0),
            Point::new(0.5, 1.0),
        ];
        assert_eq!(PolygonUnits::infer(&pts), PolygonUnits::Absolute);
        let negative = [Point::new(-0.1, 0.0), Point::new(0.5, 0.5)];
        assert_eq!(PolygonUnits::infer(&negative), PolygonUnits::Absolute);
    }

    #[test]
    fn triangle_constructor_clamps_negative_inset() {
        let mask = ShapeMask::triangle(TriangleOrientation::Left, -4.0);
        assert_eq!(
            mask.shape,
            MaskShape::Triangle {
                orientation: TriangleOrientation::Left,
                inset: 0.0
            }
        );
    }

    #[test]
    fn non_shape_descriptors_have_no_shape() {
        assert!(MaskDescriptor::Custom.as_shape().is_none());
        assert!(MaskDescriptor::Gradient.as_shape().is_none());
        let shape: MaskDescriptor = ShapeMask::rect().into();
        assert!(shape.as_shape().is_some());
    }
}
