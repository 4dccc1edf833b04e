// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Saving and restoring the store, and applying commits sent from gesture
//! threads.

use std::thread;

use kurbo::Rect;
use understory_collage::{
    CollageError, Edge, EditCommand, ExportOptions, JsonFileRepository, ProjectRepository,
    ProjectStore, StaticEntitlements, Transform2D, TransformCommit, builtin_template,
    commit_channel,
};

fn grid_store() -> (ProjectStore, String) {
    let mut store = ProjectStore::default();
    let template = builtin_template("grid-2x2").unwrap();
    let id = store
        .create_from_template(&template, Some("Trip".into()), &StaticEntitlements::none())
        .unwrap()
        .id
        .clone();
    (store, id)
}

#[test]
fn json_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("nested").join("projects.json"));
    assert!(repo.load().unwrap().is_empty());

    let (mut store, id) = grid_store();
    store.assign_photo(&id, "frame-2", "file:///beach.jpg").unwrap();
    store.apply_export(&id, ExportOptions::QUICK_SHARE).unwrap();
    store.save_to(&repo).unwrap();

    let mut restored = ProjectStore::default();
    assert_eq!(restored.restore_from(&repo), 1);
    assert_eq!(restored.project(&id), store.project(&id));
    assert_eq!(restored.history().undo_len(), 0);

    let text = std::fs::read_to_string(repo.path()).unwrap();
    assert!(text.contains("\"sourceUri\": \"file:///beach.jpg\""));
    assert!(text.contains("\"lastExport\""));
}

#[test]
fn corrupt_file_restores_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("projects.json");
    std::fs::write(&path, "{ not json").unwrap();
    let repo = JsonFileRepository::new(&path);

    assert!(matches!(repo.load(), Err(CollageError::Json(_))));
    let (mut store, _) = grid_store();
    assert_eq!(store.restore_from(&repo), 0);
    assert!(store.is_empty());
    assert!(store.current_project().is_none());
}

#[test]
fn commits_from_gesture_threads_apply_in_order() {
    let (mut store, id) = grid_store();
    let plan = store
        .preview_resize(&id, "frame-0", Edge::Bottom, Rect::new(0.0, 0.0, 1008.0, 1100.0))
        .unwrap();
    let (sender, receiver) = commit_channel();

    let handles: Vec<_> = (0..2)
        .map(|n| {
            let sender = sender.clone();
            let project = id.clone();
            thread::spawn(move || {
                let x = f64::from(n) * 10.0;
                sender.commit_transform(
                    &project,
                    TransformCommit {
                        layer_id: format!("frame-{}", n + 2),
                        transform: Transform2D::at(x, 1500.0),
                    },
                )
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
    sender.commit_resize(&id, plan);
    sender.assign_photo(&id, "frame-1", "");
    sender.assign_photo("missing", "frame-1", "file:///x.jpg");
    drop(sender);
    assert_eq!(receiver.len(), 5);

    let summary = store.drain_commands(&receiver);
    assert_eq!(summary.applied, 3);
    assert_eq!(summary.failed.len(), 2);
    assert!(matches!(summary.failed[0].1, CollageError::EmptySourceUri));
    assert!(matches!(
        &summary.failed[1],
        (EditCommand::AssignPhoto { .. }, CollageError::ProjectNotFound(_))
    ));
    assert!(summary.disconnected);
    assert!(receiver.is_empty());

    let project = store.project(&id).unwrap();
    assert_eq!(project.photo_layer("frame-0").unwrap().dimensions.height, 1100.0);
    assert_eq!(project.photo_layer("frame-3").unwrap().transform.x, 10.0);
    assert_eq!(store.history().undo_len(), 3);
}
