//! Input state machine.
//!
//! Routes each [`InputEvent`] to the tool the current mode selects.
//! Middle-button gestures pan and the wheel zooms, in every mode, without
//! touching the active mode.
//!
//! Force placement is a flag layered over the mode: while it is set, left
//! presses go to the force tool regardless of mode, and only a completed
//! placement clears it.

use crate::config::EditorConfig;
use crate::input::{InputEvent, PointerButton};
use crate::state::SceneState;
use crate::tools::{
    DrawTool, EraseTool, ForceTool, PendingLine, SelectTool, Tool, ToolContext, ToolKind,
    ToolOutcome, ToolSettings,
};
use grille_core::{Node, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Draw,
    Erase,
    Select,
}

#[derive(Debug, Default)]
pub struct EditController {
    mode: EditMode,
    force_placement: bool,
    draw: DrawTool,
    erase: EraseTool,
    select: SelectTool,
    force: ForceTool,
    /// Last pointer position of an active middle-button pan.
    pan_anchor: Option<Point>,
    pub settings: ToolSettings,
    config: EditorConfig,
}

impl EditController {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // ─── Modes ───────────────────────────────────────────────────────────

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_force_placement(&self) -> bool {
        self.force_placement
    }

    /// The tool a left press would reach right now.
    pub fn active_tool(&self) -> ToolKind {
        if self.force_placement {
            return ToolKind::Force;
        }
        match self.mode {
            EditMode::Draw => self.draw.kind(),
            EditMode::Erase => self.erase.kind(),
            EditMode::Select => self.select.kind(),
        }
    }

    /// Enabling erase disables selection; disabling it returns to draw.
    pub fn set_eraser(&mut self, enabled: bool) {
        self.switch(EditMode::Erase, enabled);
    }

    /// Enabling selection disables erase; disabling it returns to draw.
    pub fn set_selection(&mut self, enabled: bool) {
        self.switch(EditMode::Select, enabled);
    }

    pub fn toggle_eraser(&mut self) {
        self.set_eraser(self.mode != EditMode::Erase);
    }

    pub fn toggle_selection(&mut self) {
        self.set_selection(self.mode != EditMode::Select);
    }

    /// Arm force placement. Stays armed until a force is placed.
    pub fn start_force_placement(&mut self) {
        self.draw.cancel();
        self.force_placement = true;
        log::debug!("force placement armed");
    }

    fn switch(&mut self, mode: EditMode, enabled: bool) {
        let next = if enabled { mode } else { EditMode::Draw };
        if next != self.mode {
            log::debug!("mode {:?} -> {next:?}", self.mode);
            self.draw.cancel();
            if self.mode == EditMode::Select {
                self.select.cancel();
            }
            self.mode = next;
        }
    }

    /// Forget every in-progress gesture and the selection.
    pub fn reset_gestures(&mut self) {
        self.draw.cancel();
        self.select.cancel();
        self.pan_anchor = None;
    }

    // ─── View queries ────────────────────────────────────────────────────

    /// The selected node, if it still exists.
    pub fn selection<'a>(&self, state: &'a SceneState) -> Option<&'a Node> {
        self.select.selected.and_then(|id| state.scene().node(id))
    }

    pub fn pending_line(&self) -> Option<&PendingLine> {
        self.draw.pending()
    }

    /// View-space start and cursor of the pending line.
    pub fn pending_segment(&self, state: &SceneState) -> Option<(Point, Point)> {
        let pending = self.draw.pending()?;
        let start = state.scene().node(pending.start)?;
        Some((state.grid().canvas_to_view(start.position), pending.cursor))
    }

    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    // ─── Dispatch ────────────────────────────────────────────────────────

    /// Feed one event. Returns `true` when the view should redraw.
    pub fn handle(&mut self, event: &InputEvent, state: &mut SceneState) -> bool {
        match event {
            InputEvent::PointerDown {
                x,
                y,
                button: PointerButton::Middle,
            } => {
                // A pan ends any line being drawn.
                let redraw = self.draw.pending().is_some();
                self.draw.cancel();
                self.pan_anchor = Some(Point::new(*x, *y));
                redraw
            }
            InputEvent::PointerMove { x, y } if self.pan_anchor.is_some() => {
                let at = Point::new(*x, *y);
                if let Some(last) = self.pan_anchor.replace(at) {
                    state.pan(at - last);
                }
                true
            }
            InputEvent::PointerUp {
                button: PointerButton::Middle,
                ..
            } => self.pan_anchor.take().is_some(),
            InputEvent::Wheel { delta } => {
                let factor = if *delta > 0.0 {
                    self.config.wheel_zoom_in
                } else {
                    self.config.wheel_zoom_out
                };
                state.zoom_by(factor);
                true
            }
            InputEvent::Key { .. } => false,
            _ if self.pan_anchor.is_some() => false,
            _ => self.route(event, state),
        }
    }

    fn route(&mut self, event: &InputEvent, state: &mut SceneState) -> bool {
        let tool: &mut dyn Tool = match event {
            InputEvent::PointerDown {
                button: PointerButton::Left,
                ..
            } if self.force_placement => &mut self.force,
            InputEvent::PointerDown {
                button: PointerButton::Right,
                ..
            } if self.mode != EditMode::Erase => return false,
            _ => match self.mode {
                EditMode::Draw => &mut self.draw,
                EditMode::Erase => &mut self.erase,
                EditMode::Select => &mut self.select,
            },
        };

        let mut ctx = ToolContext {
            state,
            settings: &self.settings,
            config: &self.config,
        };
        match tool.handle(event, &mut ctx) {
            ToolOutcome::Ignored => false,
            ToolOutcome::Redraw => true,
            ToolOutcome::Finished => {
                self.force_placement = false;
                log::debug!("force placed, back to {:?}", self.mode);
                true
            }
        }
    }
}
