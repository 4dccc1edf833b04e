// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small scalar and point helpers shared by the mask and layout code.
//!
//! Points, sizes and vectors are plain [`kurbo`] types; this module only adds
//! the handful of free functions that gesture and layout code keeps reaching
//! for. Every function here is total: no input panics.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `sin_cos`
use kurbo::{Point, Vec2};

/// Linear interpolation between `a` and `b`.
///
/// `t` is not clamped, so values outside `[0, 1]` extrapolate.
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Clamps `value` into `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics: reversed bounds are swapped
/// first. A NaN `value` propagates unchanged.
#[must_use]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    if value < lo {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}

/// Rotates `point` about the origin by `angle` radians.
#[must_use]
pub fn rotate_point(point: Point, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    Point::new(point.x * cos - point.y * sin, point.x * sin + point.y * cos)
}

/// Rotates `point` about `center` by `angle` radians.
#[must_use]
pub fn rotate_about(point: Point, center: Point, angle: f64) -> Point {
    let local = rotate_point((point - center).to_point(), angle);
    center + local.to_vec2()
}

/// Returns the arithmetic mean of `points`, or `None` for an empty slice.
#[must_use]
pub fn vertex_mean(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vec2::ZERO, |acc, point| acc + point.to_vec2());
    #[allow(
        clippy::cast_precision_loss,
        reason = "vertex counts are tiny compared to the f64 mantissa"
    )]
    let count = points.len() as f64;
    Some((sum / count).to_point())
}
