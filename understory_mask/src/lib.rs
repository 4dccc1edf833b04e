// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_mask --heading-base-level=0

//! Understory Mask: shape masks for collage frames.
//!
//! This crate turns a declarative mask description (a rectangle, an oriented
//! triangle, or a polygon in normalized or absolute units) into concrete clip
//! geometry for an arbitrary target rectangle, and answers the questions a
//! renderer and a touch router ask about that geometry:
//!
//! - [`resolve`]: the clip polygon in the target's local pixel space.
//! - [`resolve_stroke`] and [`stroke_scale`]: the stroke overlay drawn along
//!   the outline, scaled consistently with the target.
//! - [`mask_centroid`] / [`mask_anchor`]: where to place an icon or label so
//!   it sits visually inside the silhouette.
//! - [`mask_contains_point`]: whether a tap lands inside the silhouette.
//!
//! All operations are total. Anything that cannot be resolved (no mask, a
//! non-shape mask, a non-positive target, a polygon with fewer than three
//! vertices) yields `None`, and every consumer has a documented rectangle
//! fallback. These functions run every frame during interactive dragging, so
//! they never panic.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use understory_mask::{
//!     MaskDescriptor, ShapeMask, TriangleOrientation, mask_contains_point, resolve,
//! };
//!
//! let mask = MaskDescriptor::Shape(ShapeMask::triangle(TriangleOrientation::Up, 0.0));
//! let size = Size::new(100.0, 100.0);
//!
//! let geometry = resolve(Some(&mask), size).unwrap();
//! assert_eq!(geometry.points()[2], Point::new(50.0, 0.0));
//!
//! // Near the apex is inside; the top-left corner is outside the hypotenuse.
//! assert!(mask_contains_point(Some(&mask), size, Point::new(50.0, 10.0)));
//! assert!(!mask_contains_point(Some(&mask), size, Point::new(1.0, 1.0)));
//! ```
//!
//! ## Units
//!
//! Normalized polygon vertices are scaled by the target width and height
//! independently, so a mask distorts to fit a non-square frame. Polygons
//! saved without explicit units are classified by
//! [`PolygonUnits::infer`]; that heuristic is kept for old data only.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod descriptor;
pub mod geometry;
mod hit;
mod resolve;
mod stroke;

pub use descriptor::{
    MaskDescriptor, MaskShape, MaskStroke, PointList, PolygonUnits, ShapeMask,
    TriangleOrientation,
};
pub use hit::{mask_anchor, mask_centroid, mask_contains_point};
pub use resolve::{DEGENERATE_AREA_EPSILON, MaskGeometry, resolve};
pub use stroke::{DEFAULT_STROKE_COLOR, StrokeSpec, resolve_stroke, stroke_scale};

pub use kurbo::{Cap, Join};
