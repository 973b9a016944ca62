//! Scene state: the authoritative elements, grid transform, undo history,
//! and change notifications, behind one owner.
//!
//! Mutators are synchronous and never fail fatally: absent ids and empty
//! history come back as `false`/`None`, bad numeric input as a
//! [`ValidationError`] with the previous value kept, and file problems as a
//! [`CodecError`] with the scene untouched.

use crate::commands::{History, Snapshot};
use crate::config::DEFAULT_HISTORY_DEPTH;
use crate::events::{ElementRef, EventBus, SceneEvent, SubscriptionId};
use grille_core::{
    Axis, CodecError, Force, ForceId, ForceType, GridModel, Line, LineId, Node, NodeId, NodeType,
    Plane, Point, Scene, SceneFile, ValidationError, Vec2, parse_spacings,
};

#[derive(Debug)]
pub struct SceneState {
    scene: Scene,
    grid: GridModel,
    history: History,
    events: EventBus,
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneState {
    pub fn new() -> Self {
        Self::with_grid(GridModel::new(), DEFAULT_HISTORY_DEPTH)
    }

    pub fn with_grid(grid: GridModel, history_depth: usize) -> Self {
        Self {
            scene: Scene::new(),
            grid,
            history: History::new(history_depth),
            events: EventBus::new(),
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn nodes(&self) -> Vec<&Node> {
        self.scene.nodes()
    }

    pub fn lines(&self) -> Vec<&Line> {
        self.scene.lines()
    }

    pub fn forces(&self) -> &[Force] {
        self.scene.forces()
    }

    /// Nearest node to a view-space point, strictly within `radius`.
    pub fn node_near(&self, view: Point, radius: f64) -> Option<NodeId> {
        let grid = &self.grid;
        self.scene
            .nearest_node(view, radius, |p| grid.canvas_to_view(p))
    }

    /// Nearest line to a view-space point, strictly within `radius`.
    pub fn line_near(&self, view: Point, radius: f64) -> Option<LineId> {
        let grid = &self.grid;
        self.scene
            .nearest_line(view, radius, |p| grid.canvas_to_view(p))
    }

    // ─── Notifications ───────────────────────────────────────────────────

    pub fn subscribe(&mut self, callback: impl FnMut(&SceneEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        self.events.drain()
    }

    // ─── Element mutations ───────────────────────────────────────────────

    /// Add a node at a canvas position.
    pub fn add_node(&mut self, position: Point, node_type: NodeType) -> NodeId {
        let id = self.scene.add_node(position, node_type);
        log::debug!("add {node_type} {id} at ({:.1}, {:.1})", position.x, position.y);
        self.events.emit(SceneEvent::NodeAdded(id));
        id
    }

    /// Add a node given real-world coordinates.
    pub fn add_node_real(&mut self, real: Point, node_type: NodeType) -> NodeId {
        let position = self.grid.to_screen(real);
        self.add_node(position, node_type)
    }

    /// Connect two existing, distinct nodes.
    pub fn add_line(&mut self, start: NodeId, end: NodeId) -> Option<LineId> {
        let id = self.scene.add_line(start, end)?;
        log::debug!("add {id} {start} -> {end}");
        self.events.emit(SceneEvent::LineAdded(id));
        Some(id)
    }

    pub fn add_force(&mut self, position: Point, force_type: ForceType, value: f64) -> ForceId {
        let id = self.scene.add_force(position, force_type, value);
        log::debug!("add {force_type} {id} = {value}");
        self.events.emit(SceneEvent::ForceAdded(id));
        id
    }

    /// Delete a node and every line touching it. One notification per
    /// removed line precedes the node's own.
    pub fn delete_node(&mut self, id: NodeId) -> bool {
        let Some(removed) = self.scene.remove_node(id) else {
            return false;
        };
        log::debug!("delete {id} with {} line(s)", removed.lines.len());
        for line in &removed.lines {
            self.events
                .emit(SceneEvent::ElementDeleted(ElementRef::Line(line.id)));
        }
        self.events
            .emit(SceneEvent::ElementDeleted(ElementRef::Node(id)));
        true
    }

    pub fn delete_line(&mut self, id: LineId) -> bool {
        if self.scene.remove_line(id).is_none() {
            return false;
        }
        log::debug!("delete {id}");
        self.events
            .emit(SceneEvent::ElementDeleted(ElementRef::Line(id)));
        true
    }

    pub fn delete_force(&mut self, id: ForceId) -> bool {
        if self.scene.remove_force(id).is_none() {
            return false;
        }
        log::debug!("delete {id}");
        self.events
            .emit(SceneEvent::ElementDeleted(ElementRef::Force(id)));
        true
    }

    /// Remove every element. Undoable: a snapshot is taken first.
    pub fn clear_all(&mut self) {
        self.save_snapshot();
        self.scene.clear();
        log::debug!("cleared scene");
        self.events.emit(SceneEvent::StateChanged);
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Record the current state. Call before a mutation that should be
    /// undoable.
    pub fn save_snapshot(&mut self) {
        let snapshot = self.snapshot();
        self.history.record(snapshot);
    }

    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                log::debug!("undo ({} left)", self.history.undo_depth());
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                log::debug!("redo ({} left)", self.history.redo_depth());
                true
            }
            None => false,
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            scene: self.scene.clone(),
            transform: self.grid.transform(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.scene.replace_with(snapshot.scene);
        self.grid.set_transform(snapshot.transform);
        self.events.emit(SceneEvent::StateChanged);
    }

    // ─── View ────────────────────────────────────────────────────────────

    /// Move the origin and every element by the same delta.
    pub fn pan(&mut self, delta: Vec2) {
        if delta == Vec2::ZERO || !delta.is_finite() {
            return;
        }
        self.grid.shift_origin(delta);
        self.scene.translate(delta);
        log::trace!("pan by ({:.1}, {:.1})", delta.x, delta.y);
        self.events.emit(SceneEvent::StateChanged);
    }

    /// Multiply zoom by `factor` (clamped). Returns the new zoom.
    pub fn zoom_by(&mut self, factor: f64) -> f64 {
        let before = self.grid.zoom();
        let zoom = self.grid.zoom_by(factor);
        if zoom != before {
            log::trace!("zoom {before:.3} -> {zoom:.3}");
            self.events.emit(SceneEvent::StateChanged);
        }
        zoom
    }

    pub fn reset_zoom(&mut self) {
        if self.grid.zoom() != 1.0 {
            self.grid.set_zoom(1.0);
            self.events.emit(SceneEvent::StateChanged);
        }
    }

    /// Returns `true` and notifies only when the plane actually changed.
    pub fn set_plane(&mut self, plane: Plane) -> bool {
        let changed = self.grid.set_plane(plane);
        if changed {
            log::debug!("plane -> {plane}");
            self.events.emit(SceneEvent::PlaneChanged(plane));
        }
        changed
    }

    /// Set an axis scale from a slider factor in `[0.1, 2.0]`.
    pub fn set_scale_factor(&mut self, axis: Axis, factor: f64) -> Result<f64, ValidationError> {
        let scale = self.grid.set_scale_factor(axis, factor).inspect_err(|e| {
            log::warn!("scale factor rejected: {e}");
        })?;
        self.events.emit(SceneEvent::StateChanged);
        Ok(scale)
    }

    /// Apply a typed spacing list. Bad input leaves the old spacings.
    pub fn apply_spacing_input(&mut self, axis: Axis, text: &str) -> Result<(), ValidationError> {
        let applied = parse_spacings(text).and_then(|s| self.grid.set_spacings(axis, s));
        match applied {
            Ok(()) => {
                log::debug!("{axis:?} spacings -> {:?}", self.grid.spacings(axis));
                self.events.emit(SceneEvent::StateChanged);
                Ok(())
            }
            Err(e) => {
                log::warn!("spacing input {text:?} rejected: {e}");
                Err(e)
            }
        }
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.grid.visible = !self.grid.visible;
        self.events.emit(SceneEvent::StateChanged);
        self.grid.visible
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    pub fn to_file(&self) -> SceneFile {
        SceneFile::encode(&self.scene, &self.grid)
    }

    /// Replace every element with the file's contents.
    ///
    /// All or nothing: the file is decoded into a separate scene first. A
    /// load is not undoable and clears both history stacks.
    pub fn load_file(&mut self, file: &SceneFile) -> Result<(), CodecError> {
        let scene = file.decode_into(&self.grid, self.scene.successor())?;
        self.scene.replace_with(scene);
        self.history.clear();
        log::debug!(
            "loaded {} node(s), {} line(s)",
            self.scene.node_count(),
            self.scene.line_count()
        );
        self.events.emit(SceneEvent::StateChanged);
        Ok(())
    }
}
