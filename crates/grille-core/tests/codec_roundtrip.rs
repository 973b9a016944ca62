//! Integration tests: structure file → scene → structure file.
//!
//! Exercises `SceneFile` decode/encode against the grid transform, plus
//! reading and writing real files.

use grille_core::{CodecError, GridModel, NodeType, Point, Scene, SceneFile};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("grille-core-{}-{name}", std::process::id()))
}

// ─── Fixture decoding ───────────────────────────────────────────────────

#[test]
fn truss_fixture_decodes() {
    let file = SceneFile::from_json(include_str!("fixtures/truss.json")).unwrap();
    let scene = file.decode(&GridModel::new()).unwrap();

    assert_eq!(scene.node_count(), 4);
    assert_eq!(scene.line_count(), 3);
    let types: Vec<NodeType> = scene.nodes().iter().map(|n| n.node_type).collect();
    assert_eq!(
        types,
        vec![
            NodeType::Fixed,
            NodeType::Hinge,
            NodeType::Simple,
            NodeType::Elastic
        ]
    );

    // (1, 7) real → (200, 0) canvas with the default origin and scale.
    assert_eq!(scene.nodes()[0].position, Point::new(200.0, 0.0));
}

#[test]
fn lines_reference_decoded_nodes() {
    let file = SceneFile::from_json(include_str!("fixtures/truss.json")).unwrap();
    let scene = file.decode(&GridModel::new()).unwrap();

    let nodes = scene.nodes();
    let first = scene.lines()[0];
    assert_eq!(first.start, nodes[0].id);
    assert_eq!(first.end, nodes[1].id);
    assert_eq!(scene.lines_of(nodes[2].id).len(), 2);
}

#[test]
fn fixture_reencodes_identically() {
    let grid = GridModel::new();
    let file = SceneFile::from_json(include_str!("fixtures/truss.json")).unwrap();
    let scene = file.decode(&grid).unwrap();
    assert_eq!(SceneFile::encode(&scene, &grid), file);
}

#[test]
fn dangling_line_rejects_whole_file() {
    let file = SceneFile::from_json(include_str!("fixtures/dangling.json")).unwrap();
    match file.decode(&GridModel::new()) {
        Err(CodecError::UnresolvedLine { line }) => assert_eq!(line, 2),
        other => panic!("expected UnresolvedLine, got {other:?}"),
    }
}

#[test]
fn close_nodes_keep_their_own_lines() {
    let json = r#"{
        "nodes": [
            { "id": 1, "type": "simple", "coordinates": { "x": 1.0, "y": 0.0 } },
            { "id": 2, "type": "hinge", "coordinates": { "x": 1.06, "y": 0.0 } }
        ],
        "lines": [
            { "id": 1, "start_node": { "x": 1.0, "y": 0.0 }, "end_node": { "x": 1.06, "y": 0.0 }, "length": 0.06 }
        ]
    }"#;
    let mut grid = GridModel::new();
    // 10 px per metre: the two nodes land 0.6 px apart.
    grid.set_scale_factor(grille_core::Axis::Horizontal, 0.1).unwrap();

    let scene = SceneFile::from_json(json).unwrap().decode(&grid).unwrap();
    let nodes = scene.nodes();
    let line = scene.lines()[0];
    assert_eq!((line.start, line.end), (nodes[0].id, nodes[1].id));
}

// ─── Round trip ─────────────────────────────────────────────────────────

#[test]
fn roundtrip_preserves_counts_and_coordinates() {
    let grid = GridModel::new();
    let mut scene = Scene::new();
    let a = scene.add_node(Point::new(137.3, 652.9), NodeType::Simple);
    let b = scene.add_node(Point::new(412.0, 310.55), NodeType::Fixed);
    let c = scene.add_node(Point::new(980.4, 88.1), NodeType::Hinge);
    scene.add_line(a, b).unwrap();
    scene.add_line(b, c).unwrap();

    let json = SceneFile::encode(&scene, &grid).to_json().unwrap();
    let restored = SceneFile::from_json(&json).unwrap().decode(&grid).unwrap();

    assert_eq!(restored.node_count(), scene.node_count());
    assert_eq!(restored.line_count(), scene.line_count());
    for (before, after) in scene.nodes().iter().zip(restored.nodes()) {
        let r0 = grid.to_real(before.position);
        let r1 = grid.to_real(after.position);
        assert!((r0.x - r1.x).abs() <= 0.005 + 1e-9, "x drifted: {r0:?} vs {r1:?}");
        assert!((r0.y - r1.y).abs() <= 0.005 + 1e-9, "y drifted: {r0:?} vs {r1:?}");
        assert_eq!(before.node_type, after.node_type);
    }
}

#[test]
fn saved_coordinates_do_not_depend_on_zoom() {
    let mut grid = GridModel::new();
    let mut scene = Scene::new();
    scene.add_node(Point::new(300.0, 500.0), NodeType::Simple);

    let at_one = SceneFile::encode(&scene, &grid);
    grid.zoom_by(2.5);
    let zoomed = SceneFile::encode(&scene, &grid);
    assert_eq!(at_one, zoomed);
}

#[test]
fn scale_changes_real_coordinates() {
    let mut grid = GridModel::new();
    let mut scene = Scene::new();
    scene.add_node(Point::new(300.0, 500.0), NodeType::Simple);

    grid.set_scale_factor(grille_core::Axis::Horizontal, 2.0).unwrap();
    let file = SceneFile::encode(&scene, &grid);
    assert_eq!(file.nodes[0].coordinates.x, 1.0);
    assert_eq!(file.nodes[0].coordinates.y, 2.0);
}

// ─── Files ──────────────────────────────────────────────────────────────

#[test]
fn write_then_read_file() {
    let dir = scratch_dir("rw");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("truss.json");

    let file = SceneFile::from_json(include_str!("fixtures/truss.json")).unwrap();
    file.write(&path).unwrap();
    assert_eq!(SceneFile::read(&path).unwrap(), file);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn export_creates_parent_directories() {
    let dir = scratch_dir("export");
    let path = dir.join("data").join("grille").join("out.json");

    SceneFile::default().export(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"nodes\": []"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_file_is_io_error() {
    let path = scratch_dir("missing").join("nope.json");
    let err = SceneFile::read(&path).unwrap_err();
    assert!(matches!(err, CodecError::Io { .. }));
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn truncated_json_is_json_error() {
    let text = &include_str!("fixtures/truss.json")[..120];
    assert!(matches!(SceneFile::from_json(text), Err(CodecError::Json(_))));
}
