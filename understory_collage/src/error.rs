// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Errors reported by project store operations and persistence.
///
/// Geometry never fails; see [`understory_mask`] for the total functions
/// used during rendering and hit testing.
#[derive(Error, Debug)]
pub enum CollageError {
    /// No project with this id exists in the store.
    #[error("project not found: {0}")]
    ProjectNotFound(String),
    /// The project exists but has no layer with this id.
    #[error("layer {layer_id} not found in project {project_id}")]
    LayerNotFound {
        /// Project that was searched.
        project_id: String,
        /// Missing layer id.
        layer_id: String,
    },
    /// A layer with this id already exists in the project.
    #[error("layer id {0} is already in use")]
    DuplicateLayer(String),
    /// The layer exists but is not a photo layer.
    #[error("layer {0} is not a photo layer")]
    NotAPhotoLayer(String),
    /// The layer is locked against gesture edits.
    #[error("layer {0} is locked")]
    LayerLocked(String),
    /// A premium template was requested without the matching entitlement.
    #[error("template {0} requires an entitlement that is not unlocked")]
    TemplateLocked(String),
    /// A photo assignment carried an empty source URI.
    #[error("photo source URI is empty")]
    EmptySourceUri,
    /// Reading or writing persisted projects failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Persisted JSON could not be parsed or produced.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
