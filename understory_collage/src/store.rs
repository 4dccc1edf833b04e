// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The project store: owned editing state with typed accessors.
//!
//! [`ProjectStore`] owns every open project, the current-project selection
//! and the undo/redo history. Every mutation runs through one path that works
//! on a copy of the project, bumps `modified_at` and, when asked to, snapshots
//! the previous state and drops the redo branch. A failed edit leaves the
//! project untouched.

use std::sync::Arc;

use kurbo::Rect;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::capabilities::{Entitlement, Entitlements, PhotoPicker, PickOptions};
use crate::clock::{Clock, SystemClock};
use crate::config::CollageConfig;
use crate::error::CollageError;
use crate::export::ExportOptions;
use crate::history::{History, HistoryEntry};
use crate::mask_data::MaskData;
use crate::model::{
    AppliedFilter, CanvasState, CollageProject, CropData, Dimensions, Layer, PhotoLayer,
    Transform2D,
};
use crate::repository::{ProjectMap, ProjectRepository};
use crate::resize::{Edge, ResizeParams, ResizePlan, plan_edge_resize};
use crate::template::TemplateDefinition;
use crate::transform::TransformCommit;

/// A partial update of one layer.
///
/// `None` leaves a field alone. Fields other than `transform` and `z_index`
/// only exist on photo layers; setting them on a text layer is an error.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerPatch {
    /// New transform.
    pub transform: Option<Transform2D>,
    /// New stacking order.
    pub z_index: Option<i32>,
    /// New source image.
    pub source_uri: Option<String>,
    /// New frame size.
    pub dimensions: Option<Dimensions>,
    /// New filter list; intensities are clamped into `[0, 1]`.
    pub filters: Option<Vec<AppliedFilter>>,
    /// New opacity, clamped into `[0, 1]`.
    pub opacity: Option<f64>,
    /// New blend mode tag.
    pub blend_mode: Option<String>,
    /// New crop; `Some(None)` clears it.
    pub crop: Option<Option<CropData>>,
    /// New mask; `Some(None)` clears it.
    pub mask: Option<Option<MaskData>>,
    /// New lock flag.
    pub is_locked: Option<bool>,
    /// New visibility flag.
    pub hidden: Option<bool>,
}

impl LayerPatch {
    fn touches_photo_fields(&self) -> bool {
        self.source_uri.is_some()
            || self.dimensions.is_some()
            || self.filters.is_some()
            || self.opacity.is_some()
            || self.blend_mode.is_some()
            || self.crop.is_some()
            || self.mask.is_some()
            || self.is_locked.is_some()
            || self.hidden.is_some()
    }

    /// Applies the patch to `layer`.
    pub fn apply(self, layer: &mut Layer) -> Result<(), CollageError> {
        if let Layer::Text(text) = layer {
            if self.touches_photo_fields() {
                return Err(CollageError::NotAPhotoLayer(text.id.clone()));
            }
            if let Some(transform) = self.transform {
                text.transform = transform;
            }
            if let Some(z) = self.z_index {
                text.z_index = z;
            }
            return Ok(());
        }
        let Some(photo) = layer.as_photo_mut() else {
            return Ok(());
        };
        if let Some(transform) = self.transform {
            photo.transform = transform;
        }
        if let Some(z) = self.z_index {
            photo.z_index = z;
        }
        if let Some(uri) = self.source_uri {
            photo.source_uri = uri;
        }
        if let Some(dimensions) = self.dimensions {
            photo.dimensions = dimensions;
        }
        if let Some(filters) = self.filters {
            photo.filters = clamp_filters(filters);
        }
        if let Some(opacity) = self.opacity {
            photo.opacity = clamp_unit(opacity);
        }
        if let Some(blend_mode) = self.blend_mode {
            photo.blend_mode = blend_mode;
        }
        if let Some(crop) = self.crop {
            photo.crop = crop;
        }
        if let Some(mask) = self.mask {
            photo.mask = mask;
        }
        if let Some(locked) = self.is_locked {
            photo.is_locked = Some(locked);
        }
        if let Some(hidden) = self.hidden {
            photo.hidden = Some(hidden);
        }
        Ok(())
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

fn clamp_filters(filters: Vec<AppliedFilter>) -> Vec<AppliedFilter> {
    filters
        .into_iter()
        .map(|f| AppliedFilter::new(f.id, f.intensity))
        .collect()
}

/// Owned editing state for all open projects.
#[derive(Debug)]
pub struct ProjectStore {
    projects: ProjectMap,
    current_project_id: Option<String>,
    history: History,
    config: CollageConfig,
    clock: Arc<dyn Clock>,
}

impl Default for ProjectStore {
    fn default() -> Self {
        Self::new(CollageConfig::default())
    }
}

impl ProjectStore {
    /// An empty store using the system clock.
    #[must_use]
    pub fn new(config: CollageConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// An empty store reading time from `clock`.
    #[must_use]
    pub fn with_clock(config: CollageConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            projects: ProjectMap::new(),
            current_project_id: None,
            history: History::new(config.history_limit),
            config,
            clock,
        }
    }

    /// Editing configuration.
    #[must_use]
    pub fn config(&self) -> &CollageConfig {
        &self.config
    }

    /// Undo/redo stacks.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// All projects, in no particular order.
    pub fn projects(&self) -> impl Iterator<Item = &CollageProject> {
        self.projects.values()
    }

    /// Number of projects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Returns `true` if the store holds no project.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Looks up a project by id.
    #[must_use]
    pub fn project(&self, id: &str) -> Option<&CollageProject> {
        self.projects.get(id)
    }

    fn require(&self, id: &str) -> Result<&CollageProject, CollageError> {
        self.projects
            .get(id)
            .ok_or_else(|| CollageError::ProjectNotFound(id.to_owned()))
    }

    /// Id of the project being edited.
    #[must_use]
    pub fn current_project_id(&self) -> Option<&str> {
        self.current_project_id.as_deref()
    }

    /// The project being edited.
    #[must_use]
    pub fn current_project(&self) -> Option<&CollageProject> {
        self.current_project_id
            .as_deref()
            .and_then(|id| self.projects.get(id))
    }

    /// Selects the project being edited, or clears the selection.
    pub fn set_current_project(&mut self, id: Option<&str>) -> Result<(), CollageError> {
        if let Some(id) = id {
            self.require(id)?;
        }
        self.current_project_id = id.map(str::to_owned);
        Ok(())
    }

    fn insert_current(&mut self, project: CollageProject) -> &CollageProject {
        let id = project.id.clone();
        debug!(project = %id, name = %project.name, "created project");
        self.current_project_id = Some(id.clone());
        self.projects.entry(id).insert(project).into_mut()
    }

    /// Creates an empty project on the default canvas and selects it.
    pub fn create_blank_project(&mut self, name: impl Into<String>) -> &CollageProject {
        let now = self.clock.now_ms();
        let project = CollageProject {
            id: nanoid::nanoid!(),
            name: name.into(),
            created_at: now,
            modified_at: now,
            thumbnail: String::new(),
            canvas: CanvasState::default(),
            layers: Vec::new(),
            template: None,
            metadata: None,
        };
        self.insert_current(project)
    }

    /// Creates a project of empty frames from `template` and selects it.
    ///
    /// Premium templates need [`Entitlement::PremiumTemplates`].
    pub fn create_from_template(
        &mut self,
        template: &TemplateDefinition,
        name: Option<String>,
        entitlements: &dyn Entitlements,
    ) -> Result<&CollageProject, CollageError> {
        if template.is_premium && !entitlements.is_unlocked(Entitlement::PremiumTemplates) {
            return Err(CollageError::TemplateLocked(template.id.clone()));
        }
        let project = template.instantiate(nanoid::nanoid!(), name, self.clock.now_ms());
        Ok(self.insert_current(project))
    }

    /// Runs `edit` on a copy of the project and commits it on success.
    ///
    /// With `push_history`, the previous state is snapshotted and the redo
    /// branch dropped.
    pub fn try_update_project<R>(
        &mut self,
        id: &str,
        push_history: bool,
        edit: impl FnOnce(&mut CollageProject) -> Result<R, CollageError>,
    ) -> Result<R, CollageError> {
        let existing = self.require(id)?;
        let mut updated = existing.clone();
        let result = edit(&mut updated)?;
        updated.modified_at = self.clock.now_ms();
        let previous = self
            .projects
            .insert(id.to_owned(), updated)
            .ok_or_else(|| CollageError::ProjectNotFound(id.to_owned()))?;
        if push_history {
            self.history.record_edit(&previous);
            debug!(project = %id, undo = self.history.undo_len(), "recorded edit");
        }
        Ok(result)
    }

    /// Applies `updater` to the project.
    pub fn update_project(
        &mut self,
        id: &str,
        updater: impl FnOnce(&mut CollageProject),
        push_history: bool,
    ) -> Result<(), CollageError> {
        self.try_update_project(id, push_history, |project| {
            updater(project);
            Ok(())
        })
    }

    /// Removes a project and its history, clearing the selection if it was
    /// current.
    pub fn remove_project(&mut self, id: &str) -> Option<CollageProject> {
        let removed = self.projects.remove(id)?;
        if self.current_project_id.as_deref() == Some(id) {
            self.current_project_id = None;
        }
        self.history.forget_project(id);
        debug!(project = %id, "removed project");
        Some(removed)
    }

    /// Copies a project under a new id, named `"<name> Copy"`.
    ///
    /// The selection does not change.
    pub fn duplicate_project(&mut self, id: &str) -> Result<&CollageProject, CollageError> {
        let mut copy = self.require(id)?.clone();
        let now = self.clock.now_ms();
        copy.id = nanoid::nanoid!();
        copy.name = format!("{} Copy", copy.name);
        copy.created_at = now;
        copy.modified_at = now;
        let new_id = copy.id.clone();
        debug!(source = %id, project = %new_id, "duplicated project");
        Ok(self.projects.entry(new_id).insert(copy).into_mut())
    }

    /// Renames a project without recording history.
    pub fn rename_project(&mut self, id: &str, name: impl Into<String>) -> Result<(), CollageError> {
        let name = name.into();
        self.update_project(id, |project| project.name = name, false)
    }

    /// Appends a layer.
    pub fn add_layer(&mut self, project_id: &str, layer: impl Into<Layer>) -> Result<(), CollageError> {
        let layer = layer.into();
        self.try_update_project(project_id, true, |project| {
            if project.layer(layer.id()).is_some() {
                return Err(CollageError::DuplicateLayer(layer.id().to_owned()));
            }
            project.layers.push(layer);
            Ok(())
        })
    }

    fn edit_layer<R>(
        &mut self,
        project_id: &str,
        layer_id: &str,
        push_history: bool,
        edit: impl FnOnce(&mut Layer) -> Result<R, CollageError>,
    ) -> Result<R, CollageError> {
        self.try_update_project(project_id, push_history, |project| {
            let layer = project
                .layer_mut(layer_id)
                .ok_or_else(|| layer_not_found(project_id, layer_id))?;
            edit(layer)
        })
    }

    /// Applies a partial update to one layer.
    pub fn update_layer(
        &mut self,
        project_id: &str,
        layer_id: &str,
        patch: LayerPatch,
    ) -> Result<(), CollageError> {
        self.edit_layer(project_id, layer_id, true, |layer| patch.apply(layer))
    }

    /// Removes one layer.
    pub fn remove_layer(&mut self, project_id: &str, layer_id: &str) -> Result<Layer, CollageError> {
        self.try_update_project(project_id, true, |project| {
            let index = project
                .layers
                .iter()
                .position(|layer| layer.id() == layer_id)
                .ok_or_else(|| layer_not_found(project_id, layer_id))?;
            Ok(project.layers.remove(index))
        })
    }

    /// Restacks layers: each listed layer gets its position as `z_index`.
    ///
    /// Unknown ids are ignored. Layers missing from `ordered_ids` keep their
    /// relative order and are stacked above the listed ones.
    pub fn reorder_layers(&mut self, project_id: &str, ordered_ids: &[&str]) -> Result<(), CollageError> {
        self.update_project(
            project_id,
            |project| {
                let mut remaining = core::mem::take(&mut project.layers);
                let mut ordered = Vec::with_capacity(remaining.len());
                for id in ordered_ids {
                    if let Some(index) = remaining.iter().position(|layer| layer.id() == *id) {
                        ordered.push(remaining.remove(index));
                    }
                }
                ordered.append(&mut remaining);
                for (layer, z) in ordered.iter_mut().zip(0_i32..) {
                    layer.set_z_index(z);
                }
                project.layers = ordered;
            },
            true,
        )
    }

    /// Commits the result of a finished transform gesture.
    pub fn commit_transform(
        &mut self,
        project_id: &str,
        commit: &TransformCommit,
    ) -> Result<(), CollageError> {
        self.edit_layer(project_id, &commit.layer_id, true, |layer| {
            match layer {
                Layer::Photo(photo) => {
                    if photo.is_locked() {
                        return Err(CollageError::LayerLocked(photo.id.clone()));
                    }
                    photo.transform = commit.transform;
                }
                Layer::Text(text) => text.transform = commit.transform,
            }
            Ok(())
        })
    }

    /// Plans an edge drag without touching the project.
    pub fn preview_resize(
        &self,
        project_id: &str,
        layer_id: &str,
        edge: Edge,
        new_rect: Rect,
    ) -> Result<ResizePlan, CollageError> {
        let project = self.require(project_id)?;
        if project.layer(layer_id).is_some_and(|l| l.as_photo().is_none()) {
            return Err(CollageError::NotAPhotoLayer(layer_id.to_owned()));
        }
        plan_edge_resize(
            project,
            layer_id,
            edge,
            new_rect,
            &ResizeParams::from(&self.config),
        )
        .ok_or_else(|| layer_not_found(project_id, layer_id))
    }

    /// Applies a resize plan as one history step.
    pub fn commit_resize(&mut self, project_id: &str, plan: &ResizePlan) -> Result<(), CollageError> {
        let target = &plan.target.layer_id;
        self.try_update_project(project_id, true, |project| {
            let photo = match project.layer(target) {
                None => return Err(layer_not_found(project_id, target)),
                Some(Layer::Text(_)) => return Err(CollageError::NotAPhotoLayer(target.clone())),
                Some(Layer::Photo(photo)) => photo,
            };
            if photo.is_locked() {
                return Err(CollageError::LayerLocked(target.clone()));
            }
            let applied = plan.apply(project);
            debug!(project = %project_id, layer = %target, applied, "committed resize");
            Ok(())
        })
    }

    /// Drags `edge` of a frame to `new_rect` and commits the cascade.
    pub fn resize_edge(
        &mut self,
        project_id: &str,
        layer_id: &str,
        edge: Edge,
        new_rect: Rect,
    ) -> Result<ResizePlan, CollageError> {
        let plan = self.preview_resize(project_id, layer_id, edge, new_rect)?;
        self.commit_resize(project_id, &plan)?;
        Ok(plan)
    }

    fn edit_photo(
        &mut self,
        project_id: &str,
        layer_id: &str,
        edit: impl FnOnce(&mut PhotoLayer),
    ) -> Result<(), CollageError> {
        self.edit_layer(project_id, layer_id, true, |layer| {
            let photo = layer
                .as_photo_mut()
                .ok_or_else(|| CollageError::NotAPhotoLayer(layer_id.to_owned()))?;
            edit(photo);
            Ok(())
        })
    }

    /// Sets or clears a photo layer's crop.
    pub fn set_layer_crop(
        &mut self,
        project_id: &str,
        layer_id: &str,
        crop: Option<CropData>,
    ) -> Result<(), CollageError> {
        self.edit_photo(project_id, layer_id, |photo| photo.crop = crop)
    }

    /// Replaces a photo layer's filters, clamping intensities into `[0, 1]`.
    pub fn set_layer_filters(
        &mut self,
        project_id: &str,
        layer_id: &str,
        filters: Vec<AppliedFilter>,
    ) -> Result<(), CollageError> {
        let filters = clamp_filters(filters);
        self.edit_photo(project_id, layer_id, |photo| photo.filters = filters)
    }

    /// Puts a photo into a frame.
    pub fn assign_photo(
        &mut self,
        project_id: &str,
        layer_id: &str,
        uri: &str,
    ) -> Result<(), CollageError> {
        if uri.is_empty() {
            return Err(CollageError::EmptySourceUri);
        }
        self.edit_photo(project_id, layer_id, |photo| photo.source_uri = uri.to_owned())
    }

    /// Asks `picker` for as many photos as there are visible empty frames and
    /// fills them in render order, as one history step.
    ///
    /// Returns the number of frames filled; a cancelled picker fills none.
    pub fn fill_empty_frames(
        &mut self,
        project_id: &str,
        picker: &mut dyn PhotoPicker,
    ) -> Result<usize, CollageError> {
        let empty: Vec<String> = self
            .require(project_id)?
            .sorted_photo_layers()
            .filter(|photo| photo.is_empty_frame() && !photo.is_hidden())
            .map(|photo| photo.id.clone())
            .collect();
        if empty.is_empty() {
            return Ok(0);
        }
        let picked = picker.pick(PickOptions::multiple(empty.len()));
        let pairs: Vec<(String, String)> = empty
            .into_iter()
            .zip(picked.into_iter().filter(|image| !image.uri.is_empty()))
            .map(|(layer_id, image)| (layer_id, image.uri))
            .collect();
        if pairs.is_empty() {
            debug!(project = %project_id, "picker returned nothing");
            return Ok(0);
        }
        self.try_update_project(project_id, true, |project| {
            for (layer_id, uri) in &pairs {
                if let Some(photo) = project.photo_layer_mut(layer_id) {
                    photo.source_uri.clone_from(uri);
                }
            }
            Ok(pairs.len())
        })
    }

    /// Records the options of an export in `metadata.lastExport`, without
    /// history.
    pub fn apply_export(&mut self, project_id: &str, options: ExportOptions) -> Result<(), CollageError> {
        let at = self.clock.now_ms();
        let options = serde_json::to_value(options)?;
        self.update_project(
            project_id,
            |project| {
                let mut last = Map::new();
                last.insert("at".to_owned(), Value::from(at));
                last.insert("options".to_owned(), options);
                project
                    .metadata
                    .get_or_insert_with(Map::new)
                    .insert("lastExport".to_owned(), Value::Object(last));
            },
            false,
        )
    }

    /// Snapshots a project onto the undo stack without editing it.
    pub fn push_history(&mut self, project_id: &str) -> Result<(), CollageError> {
        let project = self.require(project_id)?.clone();
        self.history.push(&project);
        Ok(())
    }

    /// Restores the most recent snapshot. Returns `false` if there is none.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.pop_undo() else {
            return false;
        };
        let id = entry.project_id.clone();
        if let Some(current) = self.projects.insert(id.clone(), entry.snapshot) {
            self.history.push_redo(HistoryEntry {
                project_id: id.clone(),
                snapshot: current,
            });
        }
        debug!(project = %id, undo = self.history.undo_len(), redo = self.history.redo_len(), "undo");
        true
    }

    /// Reapplies the most recently undone state. Returns `false` if there is
    /// none.
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.history.pop_redo() else {
            return false;
        };
        let id = entry.project_id.clone();
        if let Some(current) = self.projects.insert(id.clone(), entry.snapshot) {
            self.history.push_undo(HistoryEntry {
                project_id: id.clone(),
                snapshot: current,
            });
        }
        debug!(project = %id, undo = self.history.undo_len(), redo = self.history.redo_len(), "redo");
        true
    }

    /// Replaces all projects with those in `repository`.
    ///
    /// A repository that fails to load is logged and treated as empty. History
    /// is cleared, and the selection is kept only if it still exists. Returns
    /// the number of projects loaded.
    pub fn restore_from(&mut self, repository: &dyn ProjectRepository) -> usize {
        self.projects = repository.load().unwrap_or_else(|err| {
            warn!(%err, "failed to load projects; starting empty");
            ProjectMap::new()
        });
        self.history.clear();
        if self
            .current_project_id
            .as_deref()
            .is_some_and(|id| !self.projects.contains_key(id))
        {
            self.current_project_id = None;
        }
        debug!(count = self.projects.len(), "restored projects");
        self.projects.len()
    }

    /// Saves all projects to `repository`.
    pub fn save_to(&self, repository: &dyn ProjectRepository) -> Result<(), CollageError> {
        repository.save(&self.projects)
    }
}

fn layer_not_found(project_id: &str, layer_id: &str) -> CollageError {
    CollageError::LayerNotFound {
        project_id: project_id.to_owned(),
        layer_id: layer_id.to_owned(),
    }
}
