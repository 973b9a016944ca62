//! Integration tests: snapshot history through `SceneState`.
//!
//! Verifies that undo/redo restore elements and grid transform exactly,
//! that the history stays bounded, and that ids stay stable.

use grille_core::{Force, ForceType, GridTransform, Line, Node, NodeType, Point, Vec2};
use grille_editor::{ElementRef, SceneEvent, SceneState};
use pretty_assertions::assert_eq;

#[derive(Debug, PartialEq)]
struct Observed {
    nodes: Vec<Node>,
    lines: Vec<Line>,
    forces: Vec<Force>,
    transform: GridTransform,
}

fn observe(state: &SceneState) -> Observed {
    Observed {
        nodes: state.nodes().into_iter().cloned().collect(),
        lines: state.lines().into_iter().cloned().collect(),
        forces: state.forces().to_vec(),
        transform: state.grid().transform(),
    }
}

fn triangle(state: &mut SceneState) {
    let a = state.add_node_real(Point::new(0.0, 0.0), NodeType::Fixed);
    let b = state.add_node_real(Point::new(2.0, 0.0), NodeType::Hinge);
    let c = state.add_node_real(Point::new(1.0, 1.5), NodeType::Simple);
    state.add_line(a, b).unwrap();
    state.add_line(b, c).unwrap();
    state.add_line(c, a).unwrap();
}

// ─── Empty history ──────────────────────────────────────────────────────

#[test]
fn undo_with_empty_history_changes_nothing() {
    let mut state = SceneState::new();
    triangle(&mut state);
    state.drain_events();
    let before = observe(&state);

    assert!(!state.undo());
    assert!(!state.redo());
    assert_eq!(observe(&state), before);
    assert!(state.drain_events().is_empty());
}

// ─── Exact inverses ─────────────────────────────────────────────────────

#[test]
fn undo_and_redo_are_exact_inverses() {
    let mut state = SceneState::new();
    triangle(&mut state);
    let before = observe(&state);

    state.save_snapshot();
    let first = state.nodes()[0].id;
    state.delete_node(first);
    state.add_force(Point::new(300.0, 500.0), ForceType::Triangle, -4.5);
    let after = observe(&state);

    assert!(state.undo());
    assert_eq!(observe(&state), before);
    assert!(state.redo());
    assert_eq!(observe(&state), after);
}

#[test]
fn undo_restores_grid_transform() {
    let mut state = SceneState::new();
    state.add_node_real(Point::new(1.0, 1.0), NodeType::Simple);
    state.save_snapshot();
    state.pan(Vec2::new(25.0, -10.0));
    state.zoom_by(2.0);

    assert!(state.undo());
    assert_eq!(state.grid().origin(), Point::new(100.0, 700.0));
    assert_eq!(state.grid().zoom(), 1.0);
    assert_eq!(state.nodes()[0].position, Point::new(200.0, 600.0));
}

#[test]
fn undo_emits_state_changed() {
    let mut state = SceneState::new();
    state.save_snapshot();
    state.add_node(Point::new(10.0, 10.0), NodeType::Simple);
    state.drain_events();

    state.undo();
    assert_eq!(state.drain_events(), vec![SceneEvent::StateChanged]);
}

// ─── Bounds ─────────────────────────────────────────────────────────────

#[test]
fn history_never_exceeds_fifty() {
    let mut state = SceneState::new();
    for i in 0..51 {
        state.save_snapshot();
        state.add_node(Point::new(i as f64 * 10.0, 0.0), NodeType::Simple);
    }
    assert_eq!(state.history().undo_depth(), 50);

    while state.undo() {}
    // The snapshot of the empty scene was evicted.
    assert_eq!(state.scene().node_count(), 1);
}

#[test]
fn new_snapshot_clears_redo() {
    let mut state = SceneState::new();
    state.save_snapshot();
    state.add_node(Point::new(0.0, 0.0), NodeType::Simple);
    state.undo();
    assert!(state.history().can_redo());

    state.save_snapshot();
    state.add_node(Point::new(5.0, 5.0), NodeType::Elastic);
    assert!(!state.history().can_redo());
    assert!(!state.redo());
}

#[test]
fn zoom_stays_clamped() {
    let mut state = SceneState::new();
    for factor in [3.0, 3.0, 3.0, 0.01, 0.5, 1e9, 1e-9, -2.0, f64::NAN] {
        let zoom = state.zoom_by(factor);
        assert!((0.1..=5.0).contains(&zoom), "zoom {zoom} after ×{factor}");
    }
}

// ─── Identity ───────────────────────────────────────────────────────────

#[test]
fn ids_are_not_reused_after_undo() {
    let mut state = SceneState::new();
    state.save_snapshot();
    let first = state.add_node(Point::new(0.0, 0.0), NodeType::Simple);
    state.undo();

    let second = state.add_node(Point::new(0.0, 0.0), NodeType::Simple);
    assert_ne!(first, second);
}

#[test]
fn node_delete_leaves_no_touching_line() {
    let mut state = SceneState::new();
    triangle(&mut state);
    let victim = state.nodes()[1].clone();
    state.drain_events();

    assert!(state.delete_node(victim.id));
    for line in state.lines() {
        let (a, b) = state.scene().line_endpoints(line.id).unwrap();
        assert!(a.distance(victim.position) >= 1.0);
        assert!(b.distance(victim.position) >= 1.0);
    }

    let deleted: Vec<ElementRef> = state
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            SceneEvent::ElementDeleted(r) => Some(r),
            _ => None,
        })
        .collect();
    assert_eq!(deleted.len(), 3);
    assert_eq!(deleted.last(), Some(&ElementRef::Node(victim.id)));
}

#[test]
fn clear_all_then_undo_restores_everything() {
    let mut state = SceneState::new();
    triangle(&mut state);
    let before = observe(&state);

    state.clear_all();
    assert!(state.scene().is_empty());
    assert!(state.undo());
    assert_eq!(observe(&state), before);
}
