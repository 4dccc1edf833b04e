// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interaction-local layer transforms.
//!
//! A [`TransformSession`] holds the live transform of one layer while a
//! gesture is in progress. The committed transform in the project is never
//! touched; only [`TransformSession::finish`] produces a value to commit, and
//! [`TransformSession::cancel`] hands back the untouched original.
//!
//! ## Usage
//!
//! 1) Create a session from the layer's committed transform.
//! 2) Feed pan, pinch and rotate updates; read [`TransformSession::live`] to draw.
//! 3) Call [`TransformSession::finish`] on gesture end and send the commit
//!    to the store, or [`TransformSession::cancel`] if the gesture was aborted.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_collage::{CollageConfig, Transform2D, TransformSession, ViewportScale};
//!
//! let config = CollageConfig::default();
//! let mut session = TransformSession::new("frame-0", Transform2D::at(100.0, 100.0), &config);
//!
//! // Drag 20 viewport pixels right at half scale: 40 canvas units.
//! session.begin_pan(Point::new(10.0, 10.0));
//! session.pan_to(Point::new(30.0, 10.0), ViewportScale::new(0.5));
//! assert_eq!(session.live().x, 140.0);
//!
//! let commit = session.finish();
//! assert_eq!(commit.transform.x, 140.0);
//! ```

use core::f64::consts::FRAC_PI_2;

use kurbo::Point;

use crate::config::CollageConfig;
use crate::model::Transform2D;
use crate::viewport::ViewportScale;

/// The single value a finished gesture commits.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformCommit {
    /// Layer the gesture acted on.
    pub layer_id: String,
    /// Final transform.
    pub transform: Transform2D,
}

/// Live transform of one layer during a gesture.
#[derive(Clone, Debug)]
pub struct TransformSession {
    layer_id: String,
    committed: Transform2D,
    live: Transform2D,
    pan_start: Option<(Point, Point)>,
    pinch_base: Option<f64>,
    rotate_base: Option<f64>,
    min_scale: f64,
    max_scale: f64,
    snap_radians: f64,
}

impl TransformSession {
    /// Starts a session from the layer's committed transform.
    #[must_use]
    pub fn new(layer_id: impl Into<String>, committed: Transform2D, config: &CollageConfig) -> Self {
        let (min_scale, max_scale) = if config.min_scale <= config.max_scale {
            (config.min_scale, config.max_scale)
        } else {
            (config.max_scale, config.min_scale)
        };
        Self {
            layer_id: layer_id.into(),
            committed,
            live: committed,
            pan_start: None,
            pinch_base: None,
            rotate_base: None,
            min_scale,
            max_scale,
            snap_radians: config.rotation_snap_degrees.to_radians(),
        }
    }

    /// Layer this session edits.
    #[must_use]
    pub fn layer_id(&self) -> &str {
        &self.layer_id
    }

    /// The transform the session started from.
    #[must_use]
    pub fn committed(&self) -> Transform2D {
        self.committed
    }

    /// The transform to draw right now.
    #[must_use]
    pub fn live(&self) -> Transform2D {
        self.live
    }

    /// Returns `true` if the live transform differs from the committed one.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.live != self.committed
    }

    /// Starts a pan with the pointer at `pointer` (viewport pixels).
    pub fn begin_pan(&mut self, pointer: Point) {
        self.pan_start = Some((pointer, self.live.origin()));
    }

    /// Moves the layer by the pointer's total offset since [`Self::begin_pan`].
    ///
    /// Does nothing if no pan is in progress.
    pub fn pan_to(&mut self, pointer: Point, viewport: ViewportScale) -> Transform2D {
        if let Some((start, origin)) = self.pan_start {
            let offset = viewport.viewport_to_canvas_vec(pointer - start);
            let moved = origin + offset;
            self.live.x = moved.x;
            self.live.y = moved.y;
        }
        self.live
    }

    /// Ends the current pan, keeping its result.
    pub fn end_pan(&mut self) {
        self.pan_start = None;
    }

    /// Starts a pinch from the current live scale.
    pub fn begin_pinch(&mut self) {
        self.pinch_base = Some(self.live.scale);
    }

    /// Applies the pinch's cumulative `factor` to the scale captured at
    /// [`Self::begin_pinch`], clamped to the configured range.
    ///
    /// Non-finite factors are ignored.
    pub fn pinch(&mut self, factor: f64) -> Transform2D {
        let base = *self.pinch_base.get_or_insert(self.live.scale);
        if factor.is_finite() {
            self.live.scale = (base * factor).clamp(self.min_scale, self.max_scale);
        }
        self.live
    }

    /// Ends the current pinch.
    pub fn end_pinch(&mut self) {
        self.pinch_base = None;
    }

    /// Starts a rotation from the current live rotation.
    pub fn begin_rotate(&mut self) {
        self.rotate_base = Some(self.live.rotation);
    }

    /// Adds the rotation gesture's cumulative `delta` (radians) to the
    /// rotation captured at [`Self::begin_rotate`].
    ///
    /// With `snap`, the result locks to the nearest right angle when within
    /// the configured snap distance.
    pub fn rotate(&mut self, delta: f64, snap: bool) -> Transform2D {
        let base = *self.rotate_base.get_or_insert(self.live.rotation);
        if delta.is_finite() {
            let rotation = base + delta;
            self.live.rotation = if snap {
                snap_rotation(rotation, self.snap_radians)
            } else {
                rotation
            };
        }
        self.live
    }

    /// Ends the current rotation.
    pub fn end_rotate(&mut self) {
        self.rotate_base = None;
    }

    /// Resets scale and rotation, keeping the position.
    pub fn double_tap(&mut self) -> Transform2D {
        self.live.scale = 1.0;
        self.live.rotation = 0.0;
        self.pinch_base = None;
        self.rotate_base = None;
        self.live
    }

    /// Ends the session and returns the value to commit.
    #[must_use]
    pub fn finish(self) -> TransformCommit {
        TransformCommit {
            layer_id: self.layer_id,
            transform: self.live,
        }
    }

    /// Aborts the session and returns the untouched committed transform.
    #[must_use]
    pub fn cancel(self) -> Transform2D {
        self.committed
    }
}

/// Locks `rotation` to the nearest multiple of 90 degrees when it lies within
/// `threshold` radians of it.
#[must_use]
pub fn snap_rotation(rotation: f64, threshold: f64) -> f64 {
    if !rotation.is_finite() || threshold.is_nan() || threshold <= 0.0 {
        return rotation;
    }
    let nearest = (rotation / FRAC_PI_2).round() * FRAC_PI_2;
    if (rotation - nearest).abs() <= threshold {
        nearest
    } else {
        rotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> TransformSession {
        TransformSession::new("l", Transform2D::at(10.0, 20.0), &CollageConfig::default())
    }

    #[test]
    fn pan_uses_total_offset_in_canvas_units() {
        let mut s = session();
        s.begin_pan(Point::new(0.0, 0.0));
        s.pan_to(Point::new(5.0, 5.0), ViewportScale::new(0.5));
        let live = s.pan_to(Point::new(10.0, -10.0), ViewportScale::new(0.5));
        assert_eq!((live.x, live.y), (30.0, 0.0));
    }

    #[test]
    fn pan_without_begin_is_ignored() {
        let mut s = session();
        s.pan_to(Point::new(100.0, 100.0), ViewportScale::new(1.0));
        assert!(!s.is_dirty());
    }

    #[test]
    fn pinch_is_relative_to_start_and_clamped() {
        let mut s = session();
        s.begin_pinch();
        assert_eq!(s.pinch(2.0).scale, 2.0);
        assert_eq!(s.pinch(3.0).scale, 3.0);
        assert_eq!(s.pinch(100.0).scale, 5.0);
        assert_eq!(s.pinch(0.01).scale, 0.2);
        s.end_pinch();

        s.begin_pinch();
        assert_eq!(s.pinch(2.0).scale, 0.4);
    }

    #[test]
    fn rotation_snaps_near_right_angles() {
        let mut s = session();
        s.begin_rotate();
        let near_quarter = FRAC_PI_2 + 3_f64.to_radians();
        assert_eq!(s.rotate(near_quarter, true).rotation, FRAC_PI_2);
        let off = FRAC_PI_2 + 10_f64.to_radians();
        assert_eq!(s.rotate(off, true).rotation, off);
        assert_eq!(s.rotate(near_quarter, false).rotation, near_quarter);
    }

    #[test]
    fn double_tap_keeps_position() {
        let mut s = session();
        s.begin_pinch();
        s.pinch(2.5);
        s.begin_rotate();
        s.rotate(1.0, false);
        let reset = s.double_tap();
        assert_eq!(reset, Transform2D::at(10.0, 20.0));
    }

    #[test]
    fn cancel_returns_committed() {
        let mut s = session();
        s.begin_pinch();
        s.pinch(3.0);
        assert!(s.is_dirty());
        assert_eq!(s.cancel(), Transform2D::at(10.0, 20.0));
    }

    #[test]
    fn snap_rotation_handles_negative_and_disabled() {
        let r = -FRAC_PI_2 - 0.01;
        assert_eq!(snap_rotation(r, 5_f64.to_radians()), -FRAC_PI_2);
        assert_eq!(snap_rotation(r, 0.0), r);
        assert_eq!(snap_rotation(0.02, 5_f64.to_radians()), 0.0);
    }
}
