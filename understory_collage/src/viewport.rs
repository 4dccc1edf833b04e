// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas to viewport scaling.
//!
//! A [`ViewportScale`] is a single uniform factor from canvas units to
//! display pixels, clamped away from zero so conversions stay invertible.

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::model::Transform2D;

/// Smallest viewport scale ever produced.
pub const VIEWPORT_EPSILON: f64 = 1e-4;

/// Display pixels per canvas unit.
///
/// `ViewportScale` maps the fixed logical canvas of a project into the
/// editor's on-screen container. The scale is always finite and at least
/// [`VIEWPORT_EPSILON`], so converting back from viewport space never divides
/// by zero:
/// - Non-finite or non-positive inputs clamp to the floor.
/// - Conversions only scale; the letterbox offset that centers the canvas is
///   applied separately by [`ViewportScale::to_affine`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportScale(f64);

impl Default for ViewportScale {
    fn default() -> Self {
        Self(1.0)
    }
}

impl ViewportScale {
    /// Wraps a raw scale, clamping it to [`VIEWPORT_EPSILON`].
    #[must_use]
    pub fn new(scale: f64) -> Self {
        Self::with_floor(scale, VIEWPORT_EPSILON)
    }

    /// Wraps a raw scale, clamping it to `floor`.
    ///
    /// A non-finite or non-positive `floor` is replaced by
    /// [`VIEWPORT_EPSILON`].
    #[must_use]
    pub fn with_floor(scale: f64, floor: f64) -> Self {
        let floor = if floor.is_finite() && floor > 0.0 {
            floor
        } else {
            VIEWPORT_EPSILON
        };
        if scale.is_finite() && scale > floor {
            Self(scale)
        } else {
            Self(floor)
        }
    }

    /// The largest scale at which `canvas` fits inside `container`.
    #[must_use]
    pub fn fit(container: Size, canvas: Size) -> Self {
        Self::new(fit_ratio(container, canvas))
    }

    /// Like [`ViewportScale::fit`] with a custom floor.
    #[must_use]
    pub fn fit_with_floor(container: Size, canvas: Size, floor: f64) -> Self {
        Self::with_floor(fit_ratio(container, canvas), floor)
    }

    /// Raw scale value.
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }

    /// Scales a layer transform's offset into viewport space.
    ///
    /// Scale and rotation are left untouched; they are relative to the
    /// layer's own frame.
    #[must_use]
    pub fn transform_to_viewport(self, transform: Transform2D) -> Transform2D {
        Transform2D {
            x: transform.x * self.0,
            y: transform.y * self.0,
            ..transform
        }
    }

    /// Converts a canvas point to viewport space.
    #[must_use]
    pub fn canvas_to_viewport_point(self, pt: Point) -> Point {
        Point::new(pt.x * self.0, pt.y * self.0)
    }

    /// Converts a viewport point to canvas space.
    #[must_use]
    pub fn viewport_to_canvas_point(self, pt: Point) -> Point {
        Point::new(pt.x / self.0, pt.y / self.0)
    }

    /// Converts a viewport displacement to canvas units.
    #[must_use]
    pub fn viewport_to_canvas_vec(self, delta: Vec2) -> Vec2 {
        delta / self.0
    }

    /// Converts a canvas rectangle to viewport space.
    #[must_use]
    pub fn canvas_to_viewport_rect(self, rect: Rect) -> Rect {
        Rect::new(
            rect.x0 * self.0,
            rect.y0 * self.0,
            rect.x1 * self.0,
            rect.y1 * self.0,
        )
    }

    /// Offset that centers the scaled canvas inside `container`.
    #[must_use]
    pub fn letterbox_offset(self, container: Size, canvas: Size) -> Vec2 {
        Vec2::new(
            (container.width - canvas.width * self.0) * 0.5,
            (container.height - canvas.height * self.0) * 0.5,
        )
    }

    /// Canvas-to-container affine: scale, then center.
    #[must_use]
    pub fn to_affine(self, container: Size, canvas: Size) -> Affine {
        Affine::translate(self.letterbox_offset(container, canvas)) * Affine::scale(self.0)
    }
}

fn fit_ratio(container: Size, canvas: Size) -> f64 {
    let sx = container.width / canvas.width;
    let sy = container.height / canvas.height;
    // `f64::min` drops a single NaN; both NaN stays NaN and is clamped later.
    sx.min(sy)
}
