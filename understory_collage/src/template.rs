// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Templates and their instantiation into projects of empty frames.

use kurbo::Rect;
use serde::{Deserialize, Serialize};

use crate::mask_data::MaskData;
use crate::model::{
    Background, CanvasState, CollageProject, DEFAULT_BLEND_MODE, Dimensions, Layer, PhotoLayer,
    Transform2D,
};

/// Catalog section a template is listed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    /// Regular grids.
    Grid,
    /// Loose arrangements.
    Freeform,
    /// Holiday and event layouts.
    Seasonal,
    /// Layouts sold behind an entitlement.
    Premium,
}

/// Top-left of a template frame in canvas units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FramePosition {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
}

/// One placeholder region of a template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateFrame {
    /// Frame id; becomes the layer id.
    pub id: String,
    /// Top-left in canvas units.
    pub position: FramePosition,
    /// Frame size in canvas units.
    pub size: Dimensions,
    /// Rotation in radians.
    pub rotation: f64,
    /// Stacking order.
    pub z_index: i32,
    /// Optional silhouette.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<MaskData>,
}

impl TemplateFrame {
    /// An unrotated, unmasked frame covering `rect`.
    #[must_use]
    pub fn from_rect(id: impl Into<String>, rect: Rect, z_index: i32) -> Self {
        Self {
            id: id.into(),
            position: FramePosition {
                x: rect.x0,
                y: rect.y0,
            },
            size: Dimensions::new(rect.width(), rect.height()),
            rotation: 0.0,
            z_index,
            mask: None,
        }
    }

    /// Returns `self` with the given mask.
    #[must_use]
    pub fn with_mask(mut self, mask: impl Into<MaskData>) -> Self {
        self.mask = Some(mask.into());
        self
    }

    /// Emits the empty photo layer this frame stands for.
    #[must_use]
    pub fn to_layer(&self) -> PhotoLayer {
        PhotoLayer {
            id: self.id.clone(),
            source_uri: String::new(),
            transform: Transform2D {
                x: self.position.x,
                y: self.position.y,
                scale: 1.0,
                rotation: self.rotation,
            },
            dimensions: self.size,
            filters: Vec::new(),
            opacity: 1.0,
            blend_mode: DEFAULT_BLEND_MODE.to_owned(),
            z_index: self.z_index,
            crop: None,
            mask: self.mask.clone(),
            is_locked: None,
            hidden: None,
        }
    }
}

/// Canvas and frames of a template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateLayout {
    /// Canvas copied verbatim into new projects.
    pub canvas: CanvasState,
    /// Frames, one layer each.
    pub frames: Vec<TemplateFrame>,
}

/// A named layout users start projects from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDefinition {
    /// Template id, recorded on projects created from it.
    pub id: String,
    /// Display name; default project name.
    pub name: String,
    /// Catalog section.
    pub category: TemplateCategory,
    /// Requires the premium templates entitlement.
    pub is_premium: bool,
    /// Canvas and frames.
    pub layout: TemplateLayout,
}

impl TemplateDefinition {
    /// A `rows` by `cols` grid of equal cells on a square canvas, separated by
    /// `gap` canvas units.
    ///
    /// Frames are numbered `frame-0`, `frame-1`, … in row-major order and
    /// stacked in the same order.
    #[must_use]
    pub fn grid(
        id: impl Into<String>,
        name: impl Into<String>,
        rows: u32,
        cols: u32,
        canvas_size: f64,
        gap: f64,
    ) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        let cell_w = (canvas_size - gap * f64::from(cols - 1)) / f64::from(cols);
        let cell_h = (canvas_size - gap * f64::from(rows - 1)) / f64::from(rows);
        let mut frames = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                let index = row * cols + col;
                let x = f64::from(col) * (cell_w + gap);
                let y = f64::from(row) * (cell_h + gap);
                frames.push(TemplateFrame::from_rect(
                    format!("frame-{index}"),
                    Rect::new(x, y, x + cell_w, y + cell_h),
                    i32::try_from(index).unwrap_or(i32::MAX),
                ));
            }
        }
        Self {
            id: id.into(),
            name: name.into(),
            category: TemplateCategory::Grid,
            is_premium: false,
            layout: TemplateLayout {
                canvas: template_canvas(canvas_size),
                frames,
            },
        }
    }

    /// Builds a project of empty frames from this template.
    ///
    /// One empty photo layer is emitted per frame, in frame order. The canvas
    /// is copied verbatim and the project records this template's id.
    #[must_use]
    pub fn instantiate(
        &self,
        project_id: impl Into<String>,
        name: Option<String>,
        now_ms: u64,
    ) -> CollageProject {
        CollageProject {
            id: project_id.into(),
            name: name.unwrap_or_else(|| self.name.clone()),
            created_at: now_ms,
            modified_at: now_ms,
            thumbnail: String::new(),
            canvas: self.layout.canvas.clone(),
            layers: self
                .layout
                .frames
                .iter()
                .map(|frame| Layer::Photo(frame.to_layer()))
                .collect(),
            template: Some(self.id.clone()),
            metadata: None,
        }
    }
}

/// Spacing between frames of the stock layouts.
pub const TEMPLATE_GAP: f64 = 16.0;

/// Canvas edge length of the stock layouts.
pub const TEMPLATE_CANVAS_SIZE: f64 = 2048.0;

fn template_canvas(size: f64) -> CanvasState {
    CanvasState {
        width: size,
        height: size,
        background: Background::color("#FFFFFF"),
    }
}

fn stock(
    id: &str,
    name: &str,
    category: TemplateCategory,
    frames: &[(f64, f64, f64, f64)],
) -> TemplateDefinition {
    let frames = frames
        .iter()
        .zip(0_i32..)
        .map(|(&(x, y, w, h), z)| {
            TemplateFrame::from_rect(format!("frame-{z}"), Rect::new(x, y, x + w, y + h), z)
        })
        .collect();
    TemplateDefinition {
        id: id.to_owned(),
        name: name.to_owned(),
        category,
        is_premium: category == TemplateCategory::Premium,
        layout: TemplateLayout {
            canvas: template_canvas(TEMPLATE_CANVAS_SIZE),
            frames,
        },
    }
}

/// The stock layouts offered in the template drawer.
#[must_use]
pub fn builtin_templates() -> Vec<TemplateDefinition> {
    const S: f64 = TEMPLATE_CANVAS_SIZE;
    const HALF: f64 = S / 2.0;
    const NEAR: f64 = HALF - TEMPLATE_GAP;
    use TemplateCategory::{Grid, Premium};
    vec![
        stock(
            "grid-2-col",
            "2 Columns",
            Grid,
            &[(0.0, 0.0, NEAR, S), (HALF, 0.0, HALF, S)],
        ),
        stock(
            "grid-diagonal",
            "Diagonal Split",
            Premium,
            &[(0.0, 0.0, HALF, S), (HALF, 0.0, HALF, S)],
        ),
        stock(
            "grid-col-stack",
            "Column & Stack",
            Grid,
            &[
                (0.0, 0.0, NEAR, S),
                (HALF, 0.0, HALF, NEAR),
                (HALF, HALF, HALF, HALF),
            ],
        ),
        stock(
            "grid-col-3stack",
            "Column & 3 Stack",
            Grid,
            &[
                (0.0, 0.0, NEAR, S),
                (HALF, 0.0, HALF, 661.0),
                (HALF, 677.0, HALF, 661.0),
                (HALF, 1354.0, HALF, 694.0),
            ],
        ),
        stock(
            "grid-rows",
            "Top & Bottom",
            Grid,
            &[(0.0, 0.0, S, NEAR), (0.0, HALF, S, HALF)],
        ),
        stock(
            "grid-top-2x2",
            "Top + 2x2",
            Grid,
            &[
                (0.0, 0.0, S, NEAR),
                (0.0, HALF, NEAR, HALF),
                (HALF, HALF, HALF, HALF),
            ],
        ),
        stock(
            "grid-2x2",
            "2x2 Grid",
            Grid,
            &[
                (0.0, 0.0, NEAR, NEAR),
                (HALF, 0.0, HALF, NEAR),
                (0.0, HALF, NEAR, HALF),
                (HALF, HALF, HALF, HALF),
            ],
        ),
        stock(
            "grid-2col-bottom",
            "2 Columns + Bottom",
            Grid,
            &[
                (0.0, 0.0, NEAR, NEAR),
                (HALF, 0.0, HALF, NEAR),
                (0.0, HALF, S, HALF),
            ],
        ),
    ]
}

/// Looks up a stock layout by id.
#[must_use]
pub fn builtin_template(id: &str) -> Option<TemplateDefinition> {
    builtin_templates().into_iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instantiation_emits_one_empty_frame_per_template_frame() {
        let mut template = TemplateDefinition::grid("g", "Grid", 2, 3, 900.0, 0.0);
        template.layout.frames[4].z_index = 40;
        let project = template.instantiate("p", None, 7);

        assert_eq!(project.layers.len(), 6);
        assert_eq!(project.name, "Grid");
        assert_eq!(project.template.as_deref(), Some("g"));
        assert_eq!(project.created_at, 7);
        for (layer, frame) in project.layers.iter().zip(&template.layout.frames) {
            let photo = layer.as_photo().unwrap();
            assert!(photo.is_empty_frame());
            assert_eq!(photo.z_index, frame.z_index);
            assert_eq!(photo.opacity, 1.0);
            assert!(photo.crop.is_none());
            assert!(photo.filters.is_empty());
        }
        assert_eq!(project.layers[4].z_index(), 40);
    }

    #[test]
    fn grid_cells_respect_gap() {
        let template = TemplateDefinition::grid("g", "Grid", 2, 2, 2048.0, 16.0);
        let frames = &template.layout.frames;
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0].size, Dimensions::new(1016.0, 1016.0));
        assert_eq!(frames[1].position, FramePosition { x: 1032.0, y: 0.0 });
        assert_eq!(frames[3].position, FramePosition { x: 1032.0, y: 1032.0 });
    }

    #[test]
    fn frame_mask_and_rotation_carry_over() {
        use understory_mask::{ShapeMask, TriangleOrientation};

        let mut frame = TemplateFrame::from_rect("tri", Rect::new(0.0, 0.0, 100.0, 100.0), 0)
            .with_mask(ShapeMask::triangle(TriangleOrientation::Up, 0.0));
        frame.rotation = 0.25;
        let layer = frame.to_layer();
        assert_eq!(layer.transform.rotation, 0.25);
        assert_eq!(layer.transform.scale, 1.0);
        assert!(layer.mask_descriptor().is_some());
    }

    #[test]
    fn stock_catalog() {
        let templates = builtin_templates();
        assert_eq!(templates.len(), 8);
        let premium: Vec<&str> = templates
            .iter()
            .filter(|t| t.is_premium)
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(premium, ["grid-diagonal"]);
        for template in &templates {
            assert_eq!(template.layout.canvas.width, 2048.0);
            for frame in &template.layout.frames {
                assert!(frame.position.x + frame.size.width <= 2048.0);
                assert!(frame.position.y + frame.size.height <= 2048.0);
            }
        }
        assert_eq!(builtin_template("grid-2x2").unwrap().layout.frames.len(), 4);
    }
}
