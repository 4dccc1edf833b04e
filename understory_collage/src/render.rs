// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render planning and frame hit routing.
//!
//! [`RenderPlan::build`] turns a project into a flat list of draw items for a
//! target pixel rectangle: everything the drawing backend needs (clip
//! geometry, stroke, opacity, blend tag, crop placement, placeholder icon
//! anchor) is computed here, so the backend only draws. [`RenderPlan::replay`]
//! drives any [`Renderer`].
//!
//! Layer-local space has its origin at the frame's top-left and spans the
//! frame's size in target pixels. The layer's [`LayerDraw::transform`] maps it
//! into target space: scale and rotation act about the frame center. Text
//! layers are not measured here, so their scale and rotation act about the
//! text anchor (the layer's `x`, `y`) instead.

use kurbo::{Affine, BezPath, Point, Rect, Shape, Size, Stroke, Vec2};
use understory_mask::{
    MaskDescriptor, MaskGeometry, StrokeSpec, mask_anchor, mask_contains_point, resolve,
    resolve_stroke, stroke_scale,
};

use crate::model::{
    AppliedFilter, Background, CollageProject, CropData, DEFAULT_BLEND_MODE, Layer, PhotoLayer,
    TextStyle,
};
use crate::viewport::ViewportScale;

/// Where the source image lands in layer-local space so that the crop window
/// fills the frame.
///
/// Without a drawable crop the image fills the frame exactly.
#[must_use]
pub fn crop_placement(crop: Option<&CropData>, size: Size) -> Rect {
    match crop.filter(|crop| crop.is_drawable()) {
        Some(crop) => {
            let draw_w = size.width / crop.width;
            let draw_h = size.height / crop.height;
            let off_x = -(crop.x * size.width) / crop.width;
            let off_y = -(crop.y * size.height) / crop.height;
            Rect::from_origin_size((off_x, off_y), (draw_w, draw_h))
        }
        None => size.to_rect(),
    }
}

/// Maps a frame of `size` placed at `origin` into target space, applying
/// `scale` and `rotation` about the frame center.
#[must_use]
pub fn frame_affine(origin: Point, size: Size, scale: f64, rotation: f64) -> Affine {
    let half = Vec2::new(size.width * 0.5, size.height * 0.5);
    Affine::translate(origin.to_vec2() + half)
        * Affine::rotate(rotation)
        * Affine::scale(scale)
        * Affine::translate(-half)
}

/// What a layer draws inside its clip.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawContent {
    /// A photo.
    Image {
        /// Opaque image reference.
        uri: String,
        /// Image rectangle in layer-local space.
        placement: Rect,
        /// Filters to apply while drawing.
        filters: Vec<AppliedFilter>,
    },
    /// An empty frame's placeholder.
    Placeholder {
        /// Where the add-photo icon goes, in layer-local space.
        icon_anchor: Point,
    },
    /// A caption.
    Text {
        /// Text content.
        text: String,
        /// Font family.
        font_family: String,
        /// Font size in target pixels.
        font_size: f64,
        /// Fill color.
        color: String,
        /// Styling.
        style: TextStyle,
    },
}

/// One layer, ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerDraw {
    /// Source layer.
    pub layer_id: String,
    /// Layer-local to target space.
    ///
    /// Photo frames scale and rotate about their center; text about its
    /// anchor at the layer-local origin.
    pub transform: Affine,
    /// Frame size in target pixels; zero for text.
    pub size: Size,
    /// Clip silhouette in layer-local space; `None` clips to the frame
    /// rectangle.
    pub clip: Option<MaskGeometry>,
    /// Outline drawn along the clip.
    pub stroke: Option<StrokeSpec>,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Blend mode tag.
    pub blend_mode: String,
    /// Content.
    pub content: DrawContent,
}

/// The drawing capability.
///
/// Calls arrive in back-to-front order. Each layer is bracketed by
/// [`Renderer::push_layer`] and [`Renderer::pop_layer`].
pub trait Renderer {
    /// Fills the whole target.
    fn fill_background(&mut self, bounds: Rect, background: &Background);
    /// Starts a layer: later draws use `transform`, are clipped to `clip`
    /// (layer-local) and composited with `opacity` and `blend_mode`.
    fn push_layer(&mut self, transform: Affine, clip: &BezPath, opacity: f64, blend_mode: &str);
    /// Ends the innermost layer.
    fn pop_layer(&mut self);
    /// Draws an image into `dest`.
    fn draw_image(&mut self, uri: &str, dest: Rect, filters: &[AppliedFilter]);
    /// Draws an empty frame's placeholder with its icon at `icon_anchor`.
    fn draw_placeholder(&mut self, bounds: Rect, icon_anchor: Point);
    /// Draws a caption at the layer origin.
    fn draw_text(&mut self, text: &str, font_family: &str, font_size: f64, color: &str, style: &TextStyle);
    /// Strokes `path` with `stroke` in `color`.
    fn stroke_path(&mut self, path: &BezPath, stroke: &Stroke, color: &str);
}

/// A project laid out for one target size.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderPlan {
    /// Target rectangle in pixels.
    pub bounds: Rect,
    /// Canvas background.
    pub background: Background,
    /// Visible layers, back to front.
    pub layers: Vec<LayerDraw>,
}

impl RenderPlan {
    /// Lays out `project` at `target_scale` target pixels per canvas unit.
    ///
    /// Hidden layers are skipped. Layers are ordered by `z_index` with ties
    /// in array order.
    #[must_use]
    pub fn build(project: &CollageProject, target_scale: f64) -> Self {
        let scale = ViewportScale::new(target_scale);
        let bounds = scale.canvas_to_viewport_rect(project.canvas.size().to_rect());
        let layers = project
            .sorted_layers()
            .into_iter()
            .filter_map(|layer| match layer {
                Layer::Photo(photo) if photo.is_hidden() => None,
                Layer::Photo(photo) => Some(photo_draw(photo, scale)),
                Layer::Text(text) => {
                    let t = scale.transform_to_viewport(text.transform);
                    // No measured box: pivot at the anchor.
                    Some(LayerDraw {
                        layer_id: text.id.clone(),
                        transform: frame_affine(Point::new(t.x, t.y), Size::ZERO, t.scale, t.rotation),
                        size: Size::ZERO,
                        clip: None,
                        stroke: None,
                        opacity: 1.0,
                        blend_mode: DEFAULT_BLEND_MODE.to_owned(),
                        content: DrawContent::Text {
                            text: text.text.clone(),
                            font_family: text.font_family.clone(),
                            font_size: text.font_size * scale.get(),
                            color: text.color.clone(),
                            style: text.style.clone(),
                        },
                    })
                }
            })
            .collect();
        Self {
            bounds,
            background: project.canvas.background.clone(),
            layers,
        }
    }

    /// Issues the plan to `renderer`.
    pub fn replay(&self, renderer: &mut dyn Renderer) {
        renderer.fill_background(self.bounds, &self.background);
        for draw in &self.layers {
            let clip = match &draw.clip {
                Some(geometry) => geometry.to_path(),
                None => draw.size.to_rect().to_path(0.1),
            };
            renderer.push_layer(draw.transform, &clip, draw.opacity, &draw.blend_mode);
            match &draw.content {
                DrawContent::Image {
                    uri,
                    placement,
                    filters,
                } => renderer.draw_image(uri, *placement, filters),
                DrawContent::Placeholder { icon_anchor } => {
                    renderer.draw_placeholder(draw.size.to_rect(), *icon_anchor);
                }
                DrawContent::Text {
                    text,
                    font_family,
                    font_size,
                    color,
                    style,
                } => renderer.draw_text(text, font_family, *font_size, color, style),
            }
            if let (Some(geometry), Some(stroke)) = (&draw.clip, &draw.stroke) {
                renderer.stroke_path(&geometry.to_path(), &stroke.to_kurbo(), &stroke.color);
            }
            renderer.pop_layer();
        }
    }
}

fn photo_draw(photo: &PhotoLayer, scale: ViewportScale) -> LayerDraw {
    let t = scale.transform_to_viewport(photo.transform);
    let intrinsic = photo.dimensions.to_size();
    let size = intrinsic * scale.get();
    let descriptor = photo.mask_descriptor();
    let clip = resolve(descriptor.as_ref(), size);
    // A stroke only makes sense along a resolved outline.
    let stroke = clip
        .as_ref()
        .and_then(|_| resolve_stroke(descriptor.as_ref(), stroke_scale(size, intrinsic)));
    let content = if photo.is_empty_frame() {
        DrawContent::Placeholder {
            icon_anchor: mask_anchor(descriptor.as_ref(), size),
        }
    } else {
        DrawContent::Image {
            uri: photo.source_uri.clone(),
            placement: crop_placement(photo.crop.as_ref(), size),
            filters: photo.filters.clone(),
        }
    };
    LayerDraw {
        layer_id: photo.id.clone(),
        transform: frame_affine(Point::new(t.x, t.y), size, t.scale, t.rotation),
        size,
        clip,
        stroke,
        opacity: photo.opacity,
        blend_mode: photo.blend_mode.clone(),
        content,
    }
}

fn frame_hit(photo: &PhotoLayer, descriptor: Option<&MaskDescriptor>, pt: Point) -> bool {
    let t = photo.transform;
    let size = photo.dimensions.to_size();
    let local = frame_affine(t.origin(), size, t.scale, t.rotation).inverse() * pt;
    if !local.x.is_finite() || !local.y.is_finite() {
        return false;
    }
    let inside_rect =
        (0.0..=size.width).contains(&local.x) && (0.0..=size.height).contains(&local.y);
    inside_rect && mask_contains_point(descriptor, size, local)
}

/// The topmost visible photo layer under `canvas_point`.
///
/// The point must fall inside the layer's scaled, rotated frame and inside
/// its mask silhouette. Text layers never take hits.
#[must_use]
pub fn hit_test_layers<'a>(project: &'a CollageProject, canvas_point: Point) -> Option<&'a PhotoLayer> {
    project
        .sorted_layers()
        .into_iter()
        .rev()
        .filter_map(Layer::as_photo)
        .filter(|photo| !photo.is_hidden())
        .find(|photo| frame_hit(photo, photo.mask_descriptor().as_ref(), canvas_point))
}
