// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke overlay resolution for shape masks.
//!
//! The stroke is drawn along the resolved mask outline. Its width is authored
//! at the frame's intrinsic size and scaled uniformly by the smaller axis
//! ratio, so a mask stretched non-uniformly does not grow an over-thick
//! outline along the stretched axis.

use alloc::string::String;
use kurbo::{Cap, Join, Size, Stroke};

use crate::descriptor::MaskDescriptor;

/// Color used when a mask stroke does not specify one.
pub const DEFAULT_STROKE_COLOR: &str = "#FFFFFF";

/// A stroke ready for the rendering backend.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeSpec {
    /// Width in target pixels.
    pub width: f64,
    /// Stroke color as authored, or [`DEFAULT_STROKE_COLOR`].
    pub color: String,
    /// Line join.
    pub join: Join,
    /// Line cap, applied to both ends.
    pub cap: Cap,
}

impl StrokeSpec {
    /// Converts into a [`kurbo::Stroke`] for outline expansion or backends
    /// that take kurbo stroke styles directly.
    #[must_use]
    pub fn to_kurbo(&self) -> Stroke {
        Stroke::new(self.width)
            .with_join(self.join)
            .with_caps(self.cap)
    }
}

/// Resolves the stroke overlay of `mask` at `scale`.
///
/// Returns `None` when there is no mask, it is not a shape mask, it has no
/// stroke, or the authored width is not a finite positive number.
#[must_use]
pub fn resolve_stroke(mask: Option<&MaskDescriptor>, scale: f64) -> Option<StrokeSpec> {
    let stroke = mask?.as_shape()?.stroke.as_ref()?;
    if !(stroke.width.is_finite() && stroke.width > 0.0) {
        return None;
    }
    Some(StrokeSpec {
        width: stroke.width * scale,
        color: stroke
            .color
            .clone()
            .unwrap_or_else(|| String::from(DEFAULT_STROKE_COLOR)),
        join: stroke.join.unwrap_or(Join::Miter),
        cap: stroke.cap.unwrap_or(Cap::Butt),
    })
}

/// Uniform stroke scale for drawing a frame of `intrinsic` size into `target`.
///
/// This is `min(target.width / intrinsic.width, target.height / intrinsic.height)`.
/// Intrinsic sizes that are not finite and positive yield `1.0`.
#[must_use]
pub fn stroke_scale(target: Size, intrinsic: Size) -> f64 {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !(valid(intrinsic.width) && valid(intrinsic.height)) {
        return 1.0;
    }
    (target.width / intrinsic.width).min(target.height / intrinsic.height)
}
