//! Undo/redo history.
//!
//! The history stores whole-scene snapshots rather than per-mutation
//! inverses. Callers record a snapshot *before* mutating; undo swaps the
//! live state with the newest snapshot and parks the live state on the redo
//! stack.

use grille_core::{GridTransform, Scene};

/// Elements plus grid transform at one point in time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub scene: Scene,
    pub transform: GridTransform,
}

/// Undo and redo stacks of whole-state snapshots.
///
/// The redo stack only ever holds states popped off the undo stack, so
/// together they never exceed `max_depth` entries.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    /// Maximum undo depth.
    max_depth: usize,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Push a pre-mutation snapshot. Evicts the oldest entry past
    /// `max_depth` and invalidates redo.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.push_undo(snapshot);
        self.redo_stack.clear();
    }

    /// Swap `current` for the newest undo snapshot.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Swap `current` for the newest redo snapshot.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.push_undo(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grille_core::{GridModel, NodeType, Point};
    use pretty_assertions::assert_eq;

    fn snapshot_with(nodes: usize) -> Snapshot {
        let mut scene = Scene::new();
        for i in 0..nodes {
            scene.add_node(Point::new(i as f64, 0.0), NodeType::Simple);
        }
        Snapshot {
            scene,
            transform: GridModel::new().transform(),
        }
    }

    #[test]
    fn empty_history_has_nothing_to_undo() {
        let mut history = History::new(50);
        assert!(history.undo(snapshot_with(0)).is_none());
        assert!(history.redo(snapshot_with(0)).is_none());
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn undo_then_redo_swaps_states() {
        let mut history = History::new(50);
        history.record(snapshot_with(1));

        let restored = history.undo(snapshot_with(2)).unwrap();
        assert_eq!(restored.scene.node_count(), 1);
        assert!(history.can_redo());

        let again = history.redo(restored).unwrap();
        assert_eq!(again.scene.node_count(), 2);
        assert_eq!(history.undo_depth(), 1);
        assert!(!history.can_redo());
    }

    #[test]
    fn oldest_snapshot_evicted_past_depth() {
        let mut history = History::new(50);
        for i in 0..51 {
            history.record(snapshot_with(i));
        }
        assert_eq!(history.undo_depth(), 50);

        let mut oldest = None;
        let mut current = snapshot_with(99);
        while let Some(prev) = history.undo(current.clone()) {
            oldest = Some(prev.scene.node_count());
            current = prev;
        }
        assert_eq!(oldest, Some(1));
    }

    #[test]
    fn record_clears_redo() {
        let mut history = History::new(50);
        history.record(snapshot_with(0));
        history.undo(snapshot_with(1));
        assert!(history.can_redo());

        history.record(snapshot_with(0));
        assert!(!history.can_redo());
    }
}
