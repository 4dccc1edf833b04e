// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunable constants for editing behavior.

use serde::{Deserialize, Serialize};

use crate::error::CollageError;

/// Editing limits and thresholds.
///
/// Every field has a default; a JSON document only needs to name the fields it
/// overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CollageConfig {
    /// Smallest width or height a frame may be resized to, in canvas units.
    pub min_dimension: f64,
    /// Maximum distance between two facing edges for the frames to count as
    /// neighbours during a cooperative resize, in canvas units.
    pub adjacency_threshold: f64,
    /// Capacity of each of the undo and redo stacks.
    pub history_limit: usize,
    /// Lower bound of the pinch scale.
    pub min_scale: f64,
    /// Upper bound of the pinch scale.
    pub max_scale: f64,
    /// Rotations within this many degrees of a right angle snap to it.
    /// Zero disables snapping.
    pub rotation_snap_degrees: f64,
    /// Window in which a second tap turns into a double tap.
    pub double_tap_window_ms: u64,
    /// Pointer travel, in viewport pixels, before a press becomes a pan.
    pub tap_slop: f64,
    /// Floor applied to the viewport scale.
    pub viewport_epsilon: f64,
}

impl Default for CollageConfig {
    fn default() -> Self {
        Self {
            min_dimension: 60.0,
            adjacency_threshold: 20.0,
            history_limit: 50,
            min_scale: 0.2,
            max_scale: 5.0,
            rotation_snap_degrees: 5.0,
            double_tap_window_ms: 300,
            tap_slop: 8.0,
            viewport_epsilon: 1e-4,
        }
    }
}

impl CollageConfig {
    /// Parses a configuration from JSON, defaulting any missing field.
    pub fn from_json_str(json: &str) -> Result<Self, CollageError> {
        Ok(serde_json::from_str(json)?)
    }
}
