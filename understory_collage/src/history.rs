// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Snapshot-based undo/redo stacks.

use std::collections::VecDeque;

use crate::model::CollageProject;

/// A whole-project snapshot taken before an edit.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    /// Project the snapshot belongs to.
    pub project_id: String,
    /// Deep copy of the project.
    pub snapshot: CollageProject,
}

impl HistoryEntry {
    /// Snapshots `project`.
    #[must_use]
    pub fn of(project: &CollageProject) -> Self {
        Self {
            project_id: project.id.clone(),
            snapshot: project.clone(),
        }
    }
}

/// Two bounded stacks of snapshots.
///
/// Both stacks hold at most `limit` entries; pushing beyond that evicts the
/// oldest. Entries carry their project id, so one history can serve several
/// projects.
#[derive(Clone, Debug)]
pub struct History {
    undo: VecDeque<HistoryEntry>,
    redo: VecDeque<HistoryEntry>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(50)
    }
}

impl History {
    /// Creates empty stacks holding at most `limit` entries each.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            limit,
        }
    }

    /// Capacity of each stack.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    fn push_bounded(stack: &mut VecDeque<HistoryEntry>, entry: HistoryEntry, limit: usize) {
        stack.push_back(entry);
        while stack.len() > limit {
            stack.pop_front();
        }
    }

    /// Pushes a snapshot of `project` onto the undo stack.
    ///
    /// The redo stack is left alone.
    pub fn push(&mut self, project: &CollageProject) {
        Self::push_bounded(&mut self.undo, HistoryEntry::of(project), self.limit);
    }

    /// Records the state before a new edit: pushes it and drops the redo
    /// branch.
    pub fn record_edit(&mut self, before: &CollageProject) {
        self.redo.clear();
        self.push(before);
    }

    /// Pops the most recent undo entry.
    pub fn pop_undo(&mut self) -> Option<HistoryEntry> {
        self.undo.pop_back()
    }

    /// Pops the most recent redo entry.
    pub fn pop_redo(&mut self) -> Option<HistoryEntry> {
        self.redo.pop_back()
    }

    /// Pushes an entry onto the redo stack.
    pub fn push_redo(&mut self, entry: HistoryEntry) {
        Self::push_bounded(&mut self.redo, entry, self.limit);
    }

    /// Pushes an entry onto the undo stack without touching redo.
    pub fn push_undo(&mut self, entry: HistoryEntry) {
        Self::push_bounded(&mut self.undo, entry, self.limit);
    }

    /// Number of undo entries.
    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Number of redo entries.
    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Undo entries, oldest first.
    pub fn undo_entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.undo.iter()
    }

    /// Redo entries, oldest first.
    pub fn redo_entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.redo.iter()
    }

    /// Drops every entry that belongs to `project_id`.
    pub fn forget_project(&mut self, project_id: &str) {
        self.undo.retain(|entry| entry.project_id != project_id);
        self.redo.retain(|entry| entry.project_id != project_id);
    }

    /// Empties both stacks.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
