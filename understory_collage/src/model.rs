// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Persistent project data model.
//!
//! These types are the unit of persistence and of undo/redo snapshots. Their
//! JSON form uses camelCase keys and round-trips through `serde_json`
//! without loss, including open-ended bags such as mask payloads and project
//! metadata.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use understory_mask::MaskDescriptor;

use crate::mask_data::MaskData;

/// Placement of a layer in canvas space.
///
/// `(x, y)` is the top-left of the layer's frame in canvas units, `scale`
/// multiplies the layer's intrinsic size and `rotation` is in radians.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    /// Left edge in canvas units.
    pub x: f64,
    /// Top edge in canvas units.
    pub y: f64,
    /// Uniform scale about the frame center.
    pub scale: f64,
    /// Rotation about the frame center, in radians.
    pub rotation: f64,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::at(0.0, 0.0)
    }
}

impl Transform2D {
    /// An unscaled, unrotated transform at `(x, y)`.
    #[must_use]
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            scale: 1.0,
            rotation: 0.0,
        }
    }

    /// Top-left offset as a point.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Logical size of a layer in canvas units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in canvas units.
    pub width: f64,
    /// Height in canvas units.
    pub height: f64,
}

impl Dimensions {
    /// Creates a new size.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Converts to a [`kurbo::Size`].
    #[must_use]
    pub fn to_size(self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// A named filter with an intensity in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppliedFilter {
    /// Filter identifier from the filter catalog.
    pub id: String,
    /// Strength in `[0, 1]`.
    pub intensity: f64,
}

impl AppliedFilter {
    /// Creates a filter, clamping `intensity` into `[0, 1]`.
    ///
    /// NaN intensities become `0`.
    #[must_use]
    pub fn new(id: impl Into<String>, intensity: f64) -> Self {
        let intensity = if intensity.is_nan() {
            0.0
        } else {
            intensity.clamp(0.0, 1.0)
        };
        Self {
            id: id.into(),
            intensity,
        }
    }
}

/// Visible window into the source image, as fractions of its size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropData {
    /// Left edge of the window as a fraction of the source width.
    pub x: f64,
    /// Top edge of the window as a fraction of the source height.
    pub y: f64,
    /// Window width as a fraction of the source width.
    pub width: f64,
    /// Window height as a fraction of the source height.
    pub height: f64,
    /// Crop rotation in radians. Stored but not applied when drawing.
    pub rotation: f64,
    /// Aspect ratio the crop was locked to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
}

impl CropData {
    /// Returns `true` if the window has a finite, positive size and can be
    /// applied when drawing.
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// A photo frame.
///
/// An empty `source_uri` marks an empty frame waiting for a photo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoLayer {
    /// Layer id, unique within its project.
    pub id: String,
    /// Opaque reference to the source image, or empty.
    pub source_uri: String,
    /// Placement in canvas space.
    pub transform: Transform2D,
    /// Logical frame size in canvas units.
    pub dimensions: Dimensions,
    /// Filters applied in order.
    pub filters: Vec<AppliedFilter>,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Blend mode tag forwarded to the renderer.
    pub blend_mode: String,
    /// Stacking order; higher draws later.
    pub z_index: i32,
    /// Crop window into the source image.
    pub crop: Option<CropData>,
    /// Silhouette mask.
    pub mask: Option<MaskData>,
    /// Locked layers reject gesture edits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
    /// Hidden layers are neither drawn nor hit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

/// Blend mode tag used when none is specified.
pub const DEFAULT_BLEND_MODE: &str = "normal";

impl PhotoLayer {
    /// An empty frame covering `rect` at stacking order `z_index`.
    #[must_use]
    pub fn empty_frame(id: impl Into<String>, rect: Rect, z_index: i32) -> Self {
        Self {
            id: id.into(),
            source_uri: String::new(),
            transform: Transform2D::at(rect.x0, rect.y0),
            dimensions: Dimensions::new(rect.width(), rect.height()),
            filters: Vec::new(),
            opacity: 1.0,
            blend_mode: DEFAULT_BLEND_MODE.to_owned(),
            z_index,
            crop: None,
            mask: None,
            is_locked: None,
            hidden: None,
        }
    }

    /// Returns `true` if no photo has been assigned yet.
    #[must_use]
    pub fn is_empty_frame(&self) -> bool {
        self.source_uri.is_empty()
    }

    /// Returns `true` if the layer rejects gesture edits.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.is_locked.unwrap_or(false)
    }

    /// Returns `true` if the layer is excluded from drawing and hit testing.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden.unwrap_or(false)
    }

    /// The unscaled frame slot `(x, y, width, height)` in canvas units.
    #[must_use]
    pub fn frame_rect(&self) -> Rect {
        Rect::from_origin_size(self.transform.origin(), self.dimensions.to_size())
    }

    /// Moves and resizes the frame slot, leaving scale and rotation alone.
    pub fn set_frame_rect(&mut self, rect: Rect) {
        self.transform.x = rect.x0;
        self.transform.y = rect.y0;
        self.dimensions = Dimensions::new(rect.width(), rect.height());
    }

    /// Parses the persisted mask into its typed form.
    #[must_use]
    pub fn mask_descriptor(&self) -> Option<MaskDescriptor> {
        self.mask.as_ref().and_then(MaskData::descriptor)
    }
}

/// Drop shadow of a text layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextShadow {
    /// Shadow color.
    pub color: String,
    /// Blur radius.
    pub blur: f64,
    /// Horizontal offset.
    pub offset_x: f64,
    /// Vertical offset.
    pub offset_y: f64,
}

/// Outline of a text layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextStroke {
    /// Outline color.
    pub color: String,
    /// Outline width.
    pub width: f64,
}

/// Character styling of a text layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Bold weight.
    pub bold: bool,
    /// Italic slant.
    pub italic: bool,
    /// Underline decoration.
    pub underline: bool,
    /// Optional drop shadow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<TextShadow>,
    /// Optional outline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<TextStroke>,
}

/// A caption layer.
///
/// Text layers stack and persist with photo layers but never act as frames:
/// they are skipped by cooperative resizing and frame hit routing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    /// Layer id, unique within its project.
    pub id: String,
    /// Text content.
    pub text: String,
    /// Font family name.
    pub font_family: String,
    /// Font size in canvas units.
    pub font_size: f64,
    /// Fill color.
    pub color: String,
    /// Placement in canvas space.
    pub transform: Transform2D,
    /// Character styling.
    pub style: TextStyle,
    /// Stacking order; higher draws later.
    pub z_index: i32,
}

/// Any layer of a project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Layer {
    /// A photo frame.
    Photo(PhotoLayer),
    /// A caption.
    Text(TextLayer),
}

impl Layer {
    /// Layer id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Photo(layer) => &layer.id,
            Self::Text(layer) => &layer.id,
        }
    }

    /// Stacking order.
    #[must_use]
    pub fn z_index(&self) -> i32 {
        match self {
            Self::Photo(layer) => layer.z_index,
            Self::Text(layer) => layer.z_index,
        }
    }

    /// Sets the stacking order.
    pub fn set_z_index(&mut self, z_index: i32) {
        match self {
            Self::Photo(layer) => layer.z_index = z_index,
            Self::Text(layer) => layer.z_index = z_index,
        }
    }

    /// Placement in canvas space.
    #[must_use]
    pub fn transform(&self) -> Transform2D {
        match self {
            Self::Photo(layer) => layer.transform,
            Self::Text(layer) => layer.transform,
        }
    }

    /// Returns the photo layer, if this is one.
    #[must_use]
    pub fn as_photo(&self) -> Option<&PhotoLayer> {
        match self {
            Self::Photo(layer) => Some(layer),
            Self::Text(_) => None,
        }
    }

    /// Returns the photo layer mutably, if this is one.
    pub fn as_photo_mut(&mut self) -> Option<&mut PhotoLayer> {
        match self {
            Self::Photo(layer) => Some(layer),
            Self::Text(_) => None,
        }
    }
}

impl From<PhotoLayer> for Layer {
    fn from(layer: PhotoLayer) -> Self {
        Self::Photo(layer)
    }
}

impl From<TextLayer> for Layer {
    fn from(layer: TextLayer) -> Self {
        Self::Text(layer)
    }
}

/// What fills the canvas behind all layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    /// A solid color.
    Color,
    /// A gradient description.
    Gradient,
    /// A named texture.
    Texture,
    /// A photo.
    Photo,
}

/// Canvas background.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Background {
    /// Background kind.
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    /// Color, gradient, texture name or photo URI, depending on `kind`.
    pub value: String,
    /// Kind-specific options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,
}

impl Background {
    /// A solid color background.
    #[must_use]
    pub fn color(value: impl Into<String>) -> Self {
        Self {
            kind: BackgroundKind::Color,
            value: value.into(),
            options: None,
        }
    }
}

/// The fixed logical canvas all layer transforms are expressed against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasState {
    /// Width in canvas units.
    pub width: f64,
    /// Height in canvas units.
    pub height: f64,
    /// Background fill.
    pub background: Background,
}

impl Default for CanvasState {
    fn default() -> Self {
        let mut options = Map::new();
        options.insert("texture".to_owned(), Value::from("subtle-noise"));
        Self {
            width: 2048.0,
            height: 2048.0,
            background: Background {
                kind: BackgroundKind::Color,
                value: "#F5F5F7".to_owned(),
                options: Some(options),
            },
        }
    }
}

impl CanvasState {
    /// Canvas size.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// A collage project: the unit of persistence and of undo/redo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollageProject {
    /// Project id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Creation time, milliseconds since the Unix epoch.
    pub created_at: u64,
    /// Last modification time, milliseconds since the Unix epoch.
    pub modified_at: u64,
    /// Thumbnail URI, or empty.
    #[serde(default)]
    pub thumbnail: String,
    /// Canvas resolution and background.
    pub canvas: CanvasState,
    /// Layers in insertion order. Render order comes from `z_index`.
    pub layers: Vec<Layer>,
    /// Template the project was created from.
    pub template: Option<String>,
    /// Open-ended application metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl CollageProject {
    /// Finds a layer by id.
    #[must_use]
    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id() == id)
    }

    /// Finds a layer by id, mutably.
    pub fn layer_mut(&mut self, id: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.id() == id)
    }

    /// Finds a photo layer by id.
    #[must_use]
    pub fn photo_layer(&self, id: &str) -> Option<&PhotoLayer> {
        self.layer(id).and_then(Layer::as_photo)
    }

    /// Finds a photo layer by id, mutably.
    pub fn photo_layer_mut(&mut self, id: &str) -> Option<&mut PhotoLayer> {
        self.layer_mut(id).and_then(Layer::as_photo_mut)
    }

    /// Layers in render order: ascending `z_index`, ties kept in array order.
    #[must_use]
    pub fn sorted_layers(&self) -> Vec<&Layer> {
        let mut sorted: Vec<&Layer> = self.layers.iter().collect();
        sorted.sort_by_key(|layer| layer.z_index());
        sorted
    }

    /// Photo layers in render order.
    pub fn sorted_photo_layers(&self) -> impl Iterator<Item = &PhotoLayer> {
        self.sorted_layers().into_iter().filter_map(Layer::as_photo)
    }
}
