// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Store-level editing scenarios: cooperative resize, history bounds and
//! template instantiation, exercised through the public API only.

use std::sync::Arc;

use kurbo::Rect;
use understory_collage::{
    CollageConfig, Edge, FixedClock, LayerPatch, PhotoLayer, PickedImage, ProjectStore,
    ResizeParams, ResizeSession, StaticEntitlements, StaticPicker, TemplateDefinition,
    Transform2D, builtin_templates,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn store() -> ProjectStore {
    init_tracing();
    ProjectStore::with_clock(CollageConfig::default(), Arc::new(FixedClock::new(1_000)))
}

fn side_by_side(store: &mut ProjectStore) -> String {
    let id = store.create_blank_project("pair").id.clone();
    store
        .add_layer(&id, PhotoLayer::empty_frame("l1", Rect::new(0.0, 0.0, 100.0, 100.0), 0))
        .unwrap();
    store
        .add_layer(&id, PhotoLayer::empty_frame("l2", Rect::new(100.0, 0.0, 200.0, 100.0), 1))
        .unwrap();
    id
}

#[test]
fn dragging_shared_edge_keeps_combined_span() {
    let mut store = store();
    let id = side_by_side(&mut store);

    store
        .resize_edge(&id, "l1", Edge::Right, Rect::new(0.0, 0.0, 120.0, 100.0))
        .unwrap();

    let project = store.project(&id).unwrap();
    let l1 = project.photo_layer("l1").unwrap().frame_rect();
    let l2 = project.photo_layer("l2").unwrap().frame_rect();
    assert_eq!(l1.width(), 120.0);
    assert_eq!(l2.x0, 120.0);
    assert_eq!(l2.width(), 80.0);
    assert_eq!(l1.x1, l2.x0);
    assert_eq!((l1.x0, l2.x1), (0.0, 200.0));
}

#[test]
fn neighbour_below_minimum_is_left_alone() {
    let mut store = store();
    let id = side_by_side(&mut store);

    // l2 would be 50 wide, under the 60 unit floor.
    let plan = store
        .resize_edge(&id, "l1", Edge::Right, Rect::new(0.0, 0.0, 150.0, 100.0))
        .unwrap();
    assert!(plan.neighbour.is_none());

    let l2 = store.project(&id).unwrap().photo_layer("l2").unwrap();
    assert_eq!(l2.frame_rect(), Rect::new(100.0, 0.0, 200.0, 100.0));
}

#[test]
fn undo_and_redo_restore_exact_snapshots() {
    let mut store = store();
    let id = side_by_side(&mut store);
    let s0 = store.project(&id).unwrap().clone();

    store
        .update_layer(
            &id,
            "l1",
            LayerPatch {
                transform: Some(Transform2D::at(5.0, 7.0)),
                opacity: Some(0.5),
                ..LayerPatch::default()
            },
        )
        .unwrap();
    let s1 = store.project(&id).unwrap().clone();
    assert_ne!(s0, s1);

    assert!(store.undo());
    assert_eq!(store.project(&id).unwrap(), &s0);
    assert!(store.redo());
    assert_eq!(store.project(&id).unwrap(), &s1);
    assert!(!store.redo());
}

#[test]
fn history_keeps_the_fifty_most_recent_snapshots() {
    let mut store = store();
    let id = store.create_blank_project("v").id.clone();

    for i in 0..60 {
        let name = format!("v{i}");
        store
            .update_project(&id, |project| project.name = name, true)
            .unwrap();
    }

    let history = store.history();
    assert_eq!(history.undo_len(), 50);
    // Edit i snapshots the name written by edit i - 1.
    let names: Vec<String> = history
        .undo_entries()
        .map(|entry| entry.snapshot.name.clone())
        .collect();
    let expected: Vec<String> = (9..59).map(|i| format!("v{i}")).collect();
    assert_eq!(names, expected);
}

#[test]
fn templates_become_empty_frames_with_matching_order() {
    let mut store = store();
    for template in builtin_templates() {
        let project = store
            .create_from_template(&template, None, &StaticEntitlements::all())
            .unwrap();
        assert_eq!(project.layers.len(), template.layout.frames.len());
        for (layer, frame) in project.layers.iter().zip(&template.layout.frames) {
            let photo = layer.as_photo().unwrap();
            assert_eq!(photo.source_uri, "");
            assert_eq!(photo.z_index, frame.z_index);
            assert_eq!(photo.id, frame.id);
        }
    }
}

#[test]
fn grid_resize_then_undo_round_trip() {
    let mut store = store();
    let template = TemplateDefinition::grid("g", "2x2", 2, 2, 2048.0, 0.0);
    let id = store
        .create_from_template(&template, None, &StaticEntitlements::none())
        .unwrap()
        .id
        .clone();
    let original = store.project(&id).unwrap().clone();

    let params = ResizeParams::from(store.config());
    let mut session =
        ResizeSession::begin(store.project(&id).unwrap(), "frame-0", Edge::Right, params).unwrap();
    session.drag_by(8.0);
    session.drag_by(16.0);
    let plan = session.finish().unwrap();
    store.commit_resize(&id, &plan).unwrap();

    let project = store.project(&id).unwrap();
    let top_left = project.photo_layer("frame-0").unwrap().frame_rect();
    let top_right = project.photo_layer("frame-1").unwrap().frame_rect();
    assert_eq!(top_left, Rect::new(0.0, 0.0, 1040.0, 1024.0));
    assert_eq!(top_right, Rect::new(1040.0, 0.0, 2048.0, 1024.0));
    // The bottom row does not share the dragged edge.
    assert_eq!(
        project.photo_layer("frame-3").unwrap().frame_rect(),
        Rect::new(1024.0, 1024.0, 2048.0, 2048.0)
    );
    assert_eq!(store.history().undo_len(), 1);

    assert!(store.undo());
    assert_eq!(store.project(&id).unwrap(), &original);
}

#[test]
fn picker_fills_frames_in_render_order_as_one_step() {
    let mut store = store();
    let template = TemplateDefinition::grid("g", "2x2", 2, 2, 2048.0, 16.0);
    let id = store
        .create_from_template(&template, None, &StaticEntitlements::none())
        .unwrap()
        .id
        .clone();
    let mut picker = StaticPicker::new(vec![
        PickedImage::new("file:///a.jpg", 4000, 3000),
        PickedImage::new("file:///b.jpg", 3000, 4000),
    ]);

    assert_eq!(store.fill_empty_frames(&id, &mut picker).unwrap(), 2);
    let project = store.project(&id).unwrap();
    assert_eq!(project.photo_layer("frame-0").unwrap().source_uri, "file:///a.jpg");
    assert_eq!(project.photo_layer("frame-1").unwrap().source_uri, "file:///b.jpg");
    assert!(project.photo_layer("frame-2").unwrap().is_empty_frame());
    assert_eq!(store.history().undo_len(), 1);
}
