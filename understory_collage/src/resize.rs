// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cooperative edge resizing.
//!
//! Dragging one frame's edge also moves the facing edge of the frame that
//! shares it, so a template layout stays gapless. Resizing is split into a
//! pure planning step ([`plan_edge_resize`]), which lists every affected
//! layer's new rectangle, and an atomic apply step ([`ResizePlan::apply`]).
//!
//! Rules:
//! - The resized frame never shrinks below the minimum dimension; the
//!   dragged edge is pushed back, the opposite edge stays put.
//! - A neighbour is a visible, unlocked photo layer whose facing edge lies
//!   within the adjacency threshold of the dragged edge *before* the drag,
//!   and whose extent on the perpendicular axis overlaps by a positive
//!   amount. The first one in layer order wins; there is no chain.
//! - The neighbour's facing edge is moved to exactly meet the new edge. If
//!   that would leave it below the minimum dimension it is left unchanged.

use kurbo::Rect;
use serde::{Deserialize, Serialize};

use crate::config::CollageConfig;
use crate::model::CollageProject;

/// A side of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// The `x0` side.
    Left,
    /// The `x1` side.
    Right,
    /// The `y0` side.
    Top,
    /// The `y1` side.
    Bottom,
}

impl Edge {
    /// The side facing this one on an adjacent frame.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }

    /// Returns `true` for the left and right sides.
    #[must_use]
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// This side's coordinate on `rect`.
    #[must_use]
    pub fn coordinate(self, rect: Rect) -> f64 {
        match self {
            Self::Left => rect.x0,
            Self::Right => rect.x1,
            Self::Top => rect.y0,
            Self::Bottom => rect.y1,
        }
    }

    /// `rect` with this side moved to `value`.
    #[must_use]
    pub fn with_coordinate(self, rect: Rect, value: f64) -> Rect {
        let mut rect = rect;
        match self {
            Self::Left => rect.x0 = value,
            Self::Right => rect.x1 = value,
            Self::Top => rect.y0 = value,
            Self::Bottom => rect.y1 = value,
        }
        rect
    }
}

/// Limits used while planning a resize.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeParams {
    /// Smallest width or height of any frame.
    pub min_dimension: f64,
    /// Largest gap between facing edges of neighbours.
    pub adjacency_threshold: f64,
}

impl Default for ResizeParams {
    fn default() -> Self {
        Self::from(&CollageConfig::default())
    }
}

impl From<&CollageConfig> for ResizeParams {
    fn from(config: &CollageConfig) -> Self {
        Self {
            min_dimension: config.min_dimension,
            adjacency_threshold: config.adjacency_threshold,
        }
    }
}

/// The frame slot of one photo layer, as seen by the planner.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSlot {
    /// Layer id.
    pub id: String,
    /// Frame rectangle in canvas units.
    pub rect: Rect,
    /// Whether the layer may be adjusted as a neighbour.
    pub movable: bool,
}

/// Frame slots of all photo layers, in layer order.
#[must_use]
pub fn frame_slots(project: &CollageProject) -> Vec<FrameSlot> {
    project
        .layers
        .iter()
        .filter_map(|layer| layer.as_photo())
        .map(|photo| FrameSlot {
            id: photo.id.clone(),
            rect: photo.frame_rect(),
            movable: !photo.is_hidden() && !photo.is_locked(),
        })
        .collect()
}

/// New rectangle for one layer.
#[derive(Clone, Debug, PartialEq)]
pub struct ResizeUpdate {
    /// Layer id.
    pub layer_id: String,
    /// New frame rectangle.
    pub rect: Rect,
}

/// Every rectangle change caused by one edge drag.
#[derive(Clone, Debug, PartialEq)]
pub struct ResizePlan {
    /// Dragged edge.
    pub edge: Edge,
    /// The dragged layer's new rectangle.
    pub target: ResizeUpdate,
    /// The neighbour's new rectangle, if one follows the edge.
    pub neighbour: Option<ResizeUpdate>,
}

impl ResizePlan {
    /// All updates, dragged layer first.
    pub fn updates(&self) -> impl Iterator<Item = &ResizeUpdate> {
        core::iter::once(&self.target).chain(self.neighbour.as_ref())
    }

    /// Writes every planned rectangle into `project`.
    ///
    /// Layers that no longer exist are skipped. Returns the number of layers
    /// updated.
    pub fn apply(&self, project: &mut CollageProject) -> usize {
        let mut applied = 0;
        for update in self.updates() {
            if let Some(photo) = project.photo_layer_mut(&update.layer_id) {
                photo.set_frame_rect(update.rect);
                applied += 1;
            }
        }
        applied
    }
}

/// Plans dragging `edge` of `layer_id` so the frame becomes `new_rect`.
///
/// Returns `None` if `layer_id` is not a photo layer of `project`.
#[must_use]
pub fn plan_edge_resize(
    project: &CollageProject,
    layer_id: &str,
    edge: Edge,
    new_rect: Rect,
    params: &ResizeParams,
) -> Option<ResizePlan> {
    plan_on_slots(&frame_slots(project), layer_id, edge, new_rect, params)
}

/// Planning over pre-captured frame slots.
#[must_use]
pub fn plan_on_slots(
    slots: &[FrameSlot],
    layer_id: &str,
    edge: Edge,
    new_rect: Rect,
    params: &ResizeParams,
) -> Option<ResizePlan> {
    let current = slots.iter().find(|slot| slot.id == layer_id)?;
    let target = clamp_to_min(new_rect, edge, params.min_dimension);
    let new_coord = edge.coordinate(target);
    let old_coord = edge.coordinate(current.rect);
    let facing = edge.opposite();

    let neighbour = slots
        .iter()
        .filter(|slot| slot.movable && slot.id != layer_id)
        .find(|slot| {
            (facing.coordinate(slot.rect) - old_coord).abs() <= params.adjacency_threshold
                && perpendicular_overlap(current.rect, slot.rect, edge) > 0.0
        })
        .and_then(|slot| {
            let rect = facing.with_coordinate(slot.rect, new_coord);
            let extent = if edge.is_vertical() {
                rect.width()
            } else {
                rect.height()
            };
            if extent < params.min_dimension {
                tracing::trace!(neighbour = %slot.id, extent, "neighbour would fall below minimum");
                None
            } else {
                Some(ResizeUpdate {
                    layer_id: slot.id.clone(),
                    rect,
                })
            }
        });

    Some(ResizePlan {
        edge,
        target: ResizeUpdate {
            layer_id: layer_id.to_owned(),
            rect: target,
        },
        neighbour,
    })
}

fn clamp_to_min(rect: Rect, edge: Edge, min_dimension: f64) -> Rect {
    let min = min_dimension.max(0.0);
    let mut rect = rect;
    match edge {
        Edge::Right if rect.width() < min => rect.x1 = rect.x0 + min,
        Edge::Left if rect.width() < min => rect.x0 = rect.x1 - min,
        Edge::Bottom if rect.height() < min => rect.y1 = rect.y0 + min,
        Edge::Top if rect.height() < min => rect.y0 = rect.y1 - min,
        _ => {}
    }
    rect
}

fn perpendicular_overlap(a: Rect, b: Rect, edge: Edge) -> f64 {
    if edge.is_vertical() {
        a.y1.min(b.y1) - a.y0.max(b.y0)
    } else {
        a.x1.min(b.x1) - a.x0.max(b.x0)
    }
}

/// An edge drag in progress.
///
/// The session captures the frame slots when the drag starts, so every
/// preview is planned against the pre-drag layout no matter how often it is
/// recomputed.
#[derive(Clone, Debug)]
pub struct ResizeSession {
    layer_id: String,
    edge: Edge,
    start: Rect,
    slots: Vec<FrameSlot>,
    params: ResizeParams,
    last: Option<ResizePlan>,
}

impl ResizeSession {
    /// Starts dragging `edge` of `layer_id`.
    ///
    /// Returns `None` if `layer_id` is not a photo layer of `project`.
    #[must_use]
    pub fn begin(
        project: &CollageProject,
        layer_id: &str,
        edge: Edge,
        params: ResizeParams,
    ) -> Option<Self> {
        let slots = frame_slots(project);
        let start = slots.iter().find(|slot| slot.id == layer_id)?.rect;
        Some(Self {
            layer_id: layer_id.to_owned(),
            edge,
            start,
            slots,
            params,
            last: None,
        })
    }

    /// Layer being resized.
    #[must_use]
    pub fn layer_id(&self) -> &str {
        &self.layer_id
    }

    /// Dragged edge.
    #[must_use]
    pub fn edge(&self) -> Edge {
        self.edge
    }

    /// Frame rectangle when the drag started.
    #[must_use]
    pub fn start_rect(&self) -> Rect {
        self.start
    }

    /// Previews the frame becoming `new_rect`.
    pub fn update(&mut self, new_rect: Rect) -> Option<&ResizePlan> {
        self.last = plan_on_slots(
            &self.slots,
            &self.layer_id,
            self.edge,
            new_rect,
            &self.params,
        );
        if let Some(plan) = &self.last {
            tracing::trace!(layer = %self.layer_id, rect = ?plan.target.rect, "resize preview");
        }
        self.last.as_ref()
    }

    /// Previews the dragged edge moved by `delta` canvas units from its start.
    pub fn drag_by(&mut self, delta: f64) -> Option<&ResizePlan> {
        let coord = self.edge.coordinate(self.start) + delta;
        self.update(self.edge.with_coordinate(self.start, coord))
    }

    /// Ends the drag and returns the plan to commit, if any preview ran.
    #[must_use]
    pub fn finish(self) -> Option<ResizePlan> {
        self.last
    }

    /// Aborts the drag; returns the untouched start rectangle.
    #[must_use]
    pub fn cancel(self) -> Rect {
        self.start
    }
}
