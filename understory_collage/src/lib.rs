// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_collage --heading-base-level=0

//! Understory Collage: the editing core of a photo collage.
//!
//! A [`CollageProject`] is a fixed logical canvas holding photo frames and
//! text captions. This crate owns everything that happens to a project
//! between a gesture and a saved file:
//!
//! - [`ProjectStore`]: the projects, the current selection and a bounded
//!   snapshot [`History`]. Every edit runs through one path that copies,
//!   mutates, stamps `modified_at` and records an undo step.
//! - [`TransformSession`] and [`GestureArbiter`]: live pan, pinch, rotate and
//!   double-tap feedback for one layer, committed once per gesture.
//! - [`ResizeSession`] and [`plan_edge_resize`]: dragging a frame edge moves
//!   the facing edge of an adjacent frame with it, within a minimum size.
//! - [`RenderPlan`] and [`hit_test_layers`]: draw lists with resolved clip
//!   geometry for any [`Renderer`], and mask-aware tap routing.
//! - [`TemplateDefinition`]: stock and grid layouts turned into projects of
//!   empty frames.
//! - [`JsonFileRepository`]: whole-store persistence as JSON.
//!
//! Mask geometry comes from [`understory_mask`].
//!
//! Gesture threads never touch the store directly; they send commits through
//! a [`commit_channel`] drained by the store's owner.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_collage::{Edge, ProjectStore, StaticEntitlements, TemplateDefinition};
//!
//! let mut store = ProjectStore::default();
//! let template = TemplateDefinition::grid("grid", "Grid", 2, 2, 2048.0, 0.0);
//! let id = store
//!     .create_from_template(&template, None, &StaticEntitlements::none())
//!     .unwrap()
//!     .id
//!     .clone();
//!
//! // Drag the right edge of the top-left frame 16 units to the right.
//! let plan = store
//!     .resize_edge(&id, "frame-0", Edge::Right, Rect::new(0.0, 0.0, 1040.0, 1024.0))
//!     .unwrap();
//! assert_eq!(plan.neighbour.unwrap().layer_id, "frame-1");
//!
//! let project = store.project(&id).unwrap();
//! assert_eq!(project.photo_layer("frame-1").unwrap().frame_rect().x0, 1040.0);
//!
//! assert!(store.undo());
//! let project = store.project(&id).unwrap();
//! assert_eq!(project.photo_layer("frame-0").unwrap().dimensions.width, 1024.0);
//! ```

mod capabilities;
mod clock;
mod commit;
mod config;
mod error;
mod export;
mod gesture;
mod history;
mod mask_data;
mod model;
mod render;
mod repository;
mod resize;
mod store;
mod template;
mod transform;
mod viewport;

pub use capabilities::{
    Entitlement, Entitlements, PhotoPicker, PickOptions, PickedImage, StaticEntitlements,
    StaticPicker,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use commit::{CommitReceiver, CommitSender, DrainSummary, EditCommand, commit_channel};
pub use config::CollageConfig;
pub use error::CollageError;
pub use export::{ExportFormat, ExportOptions, ExportQuality};
pub use gesture::{GestureArbiter, GestureEvent, GestureKind, GestureState};
pub use history::{History, HistoryEntry};
pub use mask_data::{MaskData, MaskType};
pub use model::{
    AppliedFilter, Background, BackgroundKind, CanvasState, CollageProject, CropData,
    DEFAULT_BLEND_MODE, Dimensions, Layer, PhotoLayer, TextLayer, TextShadow, TextStroke,
    TextStyle, Transform2D,
};
pub use render::{
    DrawContent, LayerDraw, RenderPlan, Renderer, crop_placement, frame_affine, hit_test_layers,
};
pub use repository::{JsonFileRepository, MemoryRepository, ProjectMap, ProjectRepository};
pub use resize::{
    Edge, FrameSlot, ResizeParams, ResizePlan, ResizeSession, ResizeUpdate, frame_slots,
    plan_edge_resize, plan_on_slots,
};
pub use store::{LayerPatch, ProjectStore};
pub use template::{
    FramePosition, TEMPLATE_CANVAS_SIZE, TEMPLATE_GAP, TemplateCategory, TemplateDefinition,
    TemplateFrame, TemplateLayout, builtin_template, builtin_templates,
};
pub use transform::{TransformCommit, TransformSession, snap_rotation};
pub use viewport::{VIEWPORT_EPSILON, ViewportScale};
