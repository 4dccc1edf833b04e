// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marshaling gesture commits onto the store's owner thread.
//!
//! Gesture handlers may run on their own thread for smooth feedback, but they
//! never touch the [`ProjectStore`]. When a gesture finishes they send an
//! [`EditCommand`] through a [`CommitSender`]; the thread that owns the store
//! calls [`ProjectStore::drain_commands`] and applies the commands one at a
//! time, in arrival order.
//!
//! ## Minimal example
//!
//! ```
//! use understory_collage::{
//!     ProjectStore, StaticEntitlements, Transform2D, TransformCommit, builtin_template,
//!     commit_channel,
//! };
//!
//! let mut store = ProjectStore::default();
//! let template = builtin_template("grid-2x2").unwrap();
//! let project_id = store
//!     .create_from_template(&template, None, &StaticEntitlements::none())
//!     .unwrap()
//!     .id
//!     .clone();
//!
//! let (sender, receiver) = commit_channel();
//! let gesture_project = project_id.clone();
//! std::thread::spawn(move || {
//!     sender.commit_transform(
//!         &gesture_project,
//!         TransformCommit { layer_id: "frame-0".into(), transform: Transform2D::at(8.0, 8.0) },
//!     );
//! })
//! .join()
//! .unwrap();
//!
//! let summary = store.drain_commands(&receiver);
//! assert_eq!(summary.applied, 1);
//! let layer = store.project(&project_id).unwrap().photo_layer("frame-0").unwrap();
//! assert_eq!(layer.transform.x, 8.0);
//! ```

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};
use tracing::{debug, warn};

use crate::error::CollageError;
use crate::resize::ResizePlan;
use crate::store::ProjectStore;
use crate::transform::TransformCommit;

/// A committing edit produced off the owner thread.
#[derive(Clone, Debug, PartialEq)]
pub enum EditCommand {
    /// A finished pan, pinch, rotate or double tap.
    Transform {
        /// Target project.
        project_id: String,
        /// Final transform.
        commit: TransformCommit,
    },
    /// A finished edge drag.
    Resize {
        /// Target project.
        project_id: String,
        /// Planned rectangles.
        plan: ResizePlan,
    },
    /// A photo chosen for a frame.
    AssignPhoto {
        /// Target project.
        project_id: String,
        /// Target frame.
        layer_id: String,
        /// Opaque image reference.
        uri: String,
    },
}

/// Sending half of the commit channel. Cheap to clone.
#[derive(Clone, Debug)]
pub struct CommitSender {
    tx: Sender<EditCommand>,
}

/// Receiving half of the commit channel, held by the store's owner.
#[derive(Debug)]
pub struct CommitReceiver {
    rx: Receiver<EditCommand>,
}

/// Creates an unbounded commit channel.
#[must_use]
pub fn commit_channel() -> (CommitSender, CommitReceiver) {
    let (tx, rx) = unbounded();
    (CommitSender { tx }, CommitReceiver { rx })
}

impl CommitSender {
    /// Queues a command. Returns `false` if the receiver is gone.
    pub fn send(&self, command: EditCommand) -> bool {
        self.tx.send(command).is_ok()
    }

    /// Queues a transform commit.
    pub fn commit_transform(&self, project_id: &str, commit: TransformCommit) -> bool {
        self.send(EditCommand::Transform {
            project_id: project_id.to_owned(),
            commit,
        })
    }

    /// Queues a resize commit.
    pub fn commit_resize(&self, project_id: &str, plan: ResizePlan) -> bool {
        self.send(EditCommand::Resize {
            project_id: project_id.to_owned(),
            plan,
        })
    }

    /// Queues a photo assignment.
    pub fn assign_photo(&self, project_id: &str, layer_id: &str, uri: impl Into<String>) -> bool {
        self.send(EditCommand::AssignPhoto {
            project_id: project_id.to_owned(),
            layer_id: layer_id.to_owned(),
            uri: uri.into(),
        })
    }
}

impl CommitReceiver {
    /// Number of queued commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Returns `true` if no command is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

/// Outcome of one [`ProjectStore::drain_commands`] call.
#[derive(Debug, Default)]
pub struct DrainSummary {
    /// Commands applied successfully.
    pub applied: usize,
    /// Commands that failed, with the reason.
    pub failed: Vec<(EditCommand, CollageError)>,
    /// Every sender has been dropped and the queue is empty.
    pub disconnected: bool,
}

impl ProjectStore {
    /// Applies one command.
    pub fn apply_command(&mut self, command: &EditCommand) -> Result<(), CollageError> {
        match command {
            EditCommand::Transform { project_id, commit } => {
                self.commit_transform(project_id, commit)
            }
            EditCommand::Resize { project_id, plan } => self.commit_resize(project_id, plan),
            EditCommand::AssignPhoto {
                project_id,
                layer_id,
                uri,
            } => self.assign_photo(project_id, layer_id, uri),
        }
    }

    /// Applies every queued command in arrival order without blocking.
    pub fn drain_commands(&mut self, receiver: &CommitReceiver) -> DrainSummary {
        let mut summary = DrainSummary::default();
        loop {
            match receiver.rx.try_recv() {
                Ok(command) => match self.apply_command(&command) {
                    Ok(()) => summary.applied += 1,
                    Err(err) => {
                        warn!(%err, ?command, "dropped edit command");
                        summary.failed.push((command, err));
                    }
                },
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    summary.disconnected = true;
                    break;
                }
            }
        }
        if summary.applied > 0 || !summary.failed.is_empty() {
            debug!(
                applied = summary.applied,
                failed = summary.failed.len(),
                "drained edit commands"
            );
        }
        summary
    }
}
