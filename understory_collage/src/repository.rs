// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Project persistence.
//!
//! A repository loads and saves the whole project map at once. When to save
//! is the caller's decision.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use hashbrown::HashMap;

use crate::error::CollageError;
use crate::model::CollageProject;

/// Projects keyed by id.
pub type ProjectMap = HashMap<String, CollageProject>;

/// Storage for the project map.
pub trait ProjectRepository {
    /// Loads every stored project. An empty store yields an empty map.
    fn load(&self) -> Result<ProjectMap, CollageError>;

    /// Replaces the stored projects with `projects`.
    fn save(&self, projects: &ProjectMap) -> Result<(), CollageError>;
}

fn to_json(projects: &ProjectMap) -> Result<String, CollageError> {
    // Sorted keys keep saved files stable across runs.
    let sorted: BTreeMap<&String, &CollageProject> = projects.iter().collect();
    Ok(serde_json::to_string_pretty(&sorted)?)
}

/// Stores the project map as one pretty-printed JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// A repository backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProjectRepository for JsonFileRepository {
    fn load(&self) -> Result<ProjectMap, CollageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no saved projects");
                return Ok(ProjectMap::new());
            }
            Err(err) => return Err(err.into()),
        };
        if text.trim().is_empty() {
            return Ok(ProjectMap::new());
        }
        let projects: ProjectMap = serde_json::from_str(&text)?;
        tracing::debug!(path = %self.path.display(), count = projects.len(), "loaded projects");
        Ok(projects)
    }

    fn save(&self, projects: &ProjectMap) -> Result<(), CollageError> {
        let json = to_json(projects)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, json)?;
        tracing::debug!(path = %self.path.display(), count = projects.len(), "saved projects");
        Ok(())
    }
}

/// Keeps the serialized project map in memory.
///
/// Saving goes through the same JSON encoding as [`JsonFileRepository`], so a
/// load returns exactly what a file would.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    stored: Mutex<Option<String>>,
}

impl MemoryRepository {
    /// An empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The JSON document last saved, if any.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.stored
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the stored document verbatim.
    pub fn set_raw(&self, json: impl Into<String>) {
        *self.stored.lock().unwrap_or_else(PoisonError::into_inner) = Some(json.into());
    }
}

impl ProjectRepository for MemoryRepository {
    fn load(&self) -> Result<ProjectMap, CollageError> {
        match self.raw() {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(ProjectMap::new()),
        }
    }

    fn save(&self, projects: &ProjectMap) -> Result<(), CollageError> {
        self.set_raw(to_json(projects)?);
        Ok(())
    }
}
