//! Tool system for canvas interactions.
//!
//! Each tool interprets pointer events in view coordinates and drives
//! [`SceneState`] mutations directly. Tools take their own snapshots: the
//! history sees exactly one entry per undoable gesture.
//!
//! | Tool   | Button | Effect                                      |
//! |--------|--------|---------------------------------------------|
//! | Draw   | Left   | Place a snapped node, drag a line to another |
//! | Erase  | Right  | Delete the nearest node and its lines       |
//! | Select | Left   | Highlight the nearest node                  |
//! | Force  | Left   | Attach a force to the nearest node or line  |

use crate::config::EditorConfig;
use crate::input::{InputEvent, PointerButton};
use crate::state::SceneState;
use grille_core::geometry::closest_point_on_segment;
use grille_core::{ForceType, NodeId, NodeType, Point, ValidationError, parse_force_value};

/// The active tool determines how input events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Draw,
    Erase,
    Select,
    Force,
}

/// What a tool did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolOutcome {
    Ignored,
    /// View-visible change; the host should redraw.
    Redraw,
    /// The tool finished its one-shot job.
    Finished,
}

/// Element types and values the tools place.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    pub node_type: NodeType,
    pub force_type: ForceType,
    pub force_value: f64,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            node_type: NodeType::Simple,
            force_type: ForceType::Point,
            force_value: 0.0,
        }
    }
}

impl ToolSettings {
    /// Apply a typed force value. Bad input keeps the previous value.
    pub fn apply_force_value_input(&mut self, text: &str) -> Result<f64, ValidationError> {
        match parse_force_value(text) {
            Ok(value) => {
                self.force_value = value;
                Ok(value)
            }
            Err(e) => {
                log::warn!("force value {text:?} rejected: {e}");
                Err(e)
            }
        }
    }
}

/// Everything a tool may read or mutate while handling one event.
pub struct ToolContext<'a> {
    pub state: &'a mut SceneState,
    pub settings: &'a ToolSettings,
    pub config: &'a EditorConfig,
}

/// Trait for tools that handle input and mutate the scene.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    fn handle(&mut self, event: &InputEvent, ctx: &mut ToolContext<'_>) -> ToolOutcome;

    /// Drop any in-progress gesture.
    fn cancel(&mut self) {}
}

// ─── Draw Tool ───────────────────────────────────────────────────────────

/// A line being dragged from a committed node to the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingLine {
    pub start: NodeId,
    /// Live cursor, view space.
    pub cursor: Point,
}

#[derive(Debug, Default)]
pub struct DrawTool {
    pending: Option<PendingLine>,
    /// Whether this gesture already recorded a snapshot (it created the
    /// start node).
    snapshotted: bool,
}

impl DrawTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<&PendingLine> {
        self.pending.as_ref()
    }

    fn press(&mut self, at: Point, ctx: &mut ToolContext<'_>) -> ToolOutcome {
        if let Some(start) = ctx.state.node_near(at, ctx.config.pick_radius) {
            self.pending = Some(PendingLine { start, cursor: at });
            self.snapshotted = false;
            return ToolOutcome::Redraw;
        }

        let Some(snapped) = ctx.state.grid().snap_to_grid(at, ctx.config.snap_tolerance) else {
            return ToolOutcome::Ignored;
        };
        ctx.state.save_snapshot();
        let position = ctx.state.grid().view_to_canvas(snapped);
        let start = ctx.state.add_node(position, ctx.settings.node_type);
        self.pending = Some(PendingLine {
            start,
            cursor: snapped,
        });
        self.snapshotted = true;
        ToolOutcome::Redraw
    }

    fn release(&mut self, at: Point, ctx: &mut ToolContext<'_>) -> ToolOutcome {
        let Some(pending) = self.pending.take() else {
            return ToolOutcome::Ignored;
        };
        let snapshotted = std::mem::take(&mut self.snapshotted);

        // The start node may be gone if history moved under the gesture.
        let end = ctx
            .state
            .node_near(at, ctx.config.pick_radius)
            .filter(|end| *end != pending.start)
            .filter(|_| ctx.state.scene().node(pending.start).is_some());
        if let Some(end) = end {
            if !snapshotted {
                ctx.state.save_snapshot();
            }
            ctx.state.add_line(pending.start, end);
        } else {
            log::trace!("pending line from {} discarded", pending.start);
        }
        ToolOutcome::Redraw
    }
}

impl Tool for DrawTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Draw
    }

    fn handle(&mut self, event: &InputEvent, ctx: &mut ToolContext<'_>) -> ToolOutcome {
        match event {
            InputEvent::PointerDown {
                x,
                y,
                button: PointerButton::Left,
            } => self.press(Point::new(*x, *y), ctx),
            InputEvent::PointerMove { x, y } => match &mut self.pending {
                Some(pending) => {
                    pending.cursor = Point::new(*x, *y);
                    ToolOutcome::Redraw
                }
                None => ToolOutcome::Ignored,
            },
            InputEvent::PointerUp {
                x,
                y,
                button: PointerButton::Left,
            } => self.release(Point::new(*x, *y), ctx),
            _ => ToolOutcome::Ignored,
        }
    }

    fn cancel(&mut self) {
        self.pending = None;
        self.snapshotted = false;
    }
}

// ─── Erase Tool ──────────────────────────────────────────────────────────

/// Deletes nodes only; lines go with their nodes.
#[derive(Debug, Default)]
pub struct EraseTool;

impl Tool for EraseTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Erase
    }

    fn handle(&mut self, event: &InputEvent, ctx: &mut ToolContext<'_>) -> ToolOutcome {
        let InputEvent::PointerDown {
            x,
            y,
            button: PointerButton::Right,
        } = event
        else {
            return ToolOutcome::Ignored;
        };
        let Some(id) = ctx.state.node_near(Point::new(*x, *y), ctx.config.pick_radius) else {
            return ToolOutcome::Ignored;
        };
        ctx.state.save_snapshot();
        ctx.state.delete_node(id);
        ToolOutcome::Redraw
    }
}

// ─── Select Tool ─────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct SelectTool {
    /// Currently highlighted node. View state only.
    pub selected: Option<NodeId>,
}

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn handle(&mut self, event: &InputEvent, ctx: &mut ToolContext<'_>) -> ToolOutcome {
        let InputEvent::PointerDown {
            x,
            y,
            button: PointerButton::Left,
        } = event
        else {
            return ToolOutcome::Ignored;
        };
        let hit = ctx.state.node_near(Point::new(*x, *y), ctx.config.pick_radius);
        if hit == self.selected {
            return ToolOutcome::Ignored;
        }
        self.selected = hit;
        ToolOutcome::Redraw
    }

    fn cancel(&mut self) {
        self.selected = None;
    }
}

// ─── Force Tool ──────────────────────────────────────────────────────────

/// Places one force on the nearest node, or else on the nearest point of
/// the nearest line.
#[derive(Debug, Default)]
pub struct ForceTool;

impl ForceTool {
    /// Canvas position a force placed at `view` would attach to.
    pub fn target(state: &SceneState, view: Point, radius: f64) -> Option<Point> {
        if let Some(node) = state
            .node_near(view, radius)
            .and_then(|id| state.scene().node(id))
        {
            return Some(node.position);
        }
        let line = state.line_near(view, radius)?;
        let (a, b) = state.scene().line_endpoints(line)?;
        let query = state.grid().view_to_canvas(view);
        Some(closest_point_on_segment(query, a, b))
    }
}

impl Tool for ForceTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Force
    }

    fn handle(&mut self, event: &InputEvent, ctx: &mut ToolContext<'_>) -> ToolOutcome {
        let InputEvent::PointerDown {
            x,
            y,
            button: PointerButton::Left,
        } = event
        else {
            return ToolOutcome::Ignored;
        };
        let Some(position) = Self::target(ctx.state, Point::new(*x, *y), ctx.config.pick_radius)
        else {
            log::trace!("no force target near ({x:.1}, {y:.1})");
            return ToolOutcome::Ignored;
        };
        ctx.state.save_snapshot();
        ctx.state
            .add_force(position, ctx.settings.force_type, ctx.settings.force_value);
        ToolOutcome::Finished
    }
}
