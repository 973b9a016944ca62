//! One open document: scene state, input controller, and the file it was
//! loaded from or last saved to.
//!
//! File dialogs belong to the host. Actions that need a path the session
//! does not have come back as [`ActionResult::NeedsPath`]; the host then
//! calls [`Session::open`], [`Session::save_as`] or [`Session::export`].

use crate::config::EditorConfig;
use crate::controller::EditController;
use crate::input::InputEvent;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::state::SceneState;
use grille_core::{CodecError, GridConfig, GridModel, SceneFile, ValidationError};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    /// Handled. `true` when the view should redraw.
    Done(bool),
    /// The host must pick a path for this action.
    NeedsPath(ShortcutAction),
}

#[derive(Debug, Default)]
pub struct Session {
    pub state: SceneState,
    pub controller: EditController,
    current_file: Option<PathBuf>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(editor: EditorConfig, grid: &GridConfig) -> Result<Self, ValidationError> {
        let grid = GridModel::from_config(grid)?;
        Ok(Self {
            state: SceneState::with_grid(grid, editor.history_depth),
            controller: EditController::new(editor),
            current_file: None,
        })
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    /// Route an input event: keys through the shortcut map, everything
    /// else through the controller.
    pub fn handle_input(&mut self, event: &InputEvent) -> Result<ActionResult, CodecError> {
        if let InputEvent::Key { key, modifiers } = event {
            let action = ShortcutMap::resolve(
                key,
                modifiers.ctrl,
                modifiers.shift,
                modifiers.alt,
                modifiers.meta,
            );
            return match action {
                Some(action) => self.perform(action),
                None => Ok(ActionResult::Done(false)),
            };
        }
        Ok(ActionResult::Done(
            self.controller.handle(event, &mut self.state),
        ))
    }

    pub fn perform(&mut self, action: ShortcutAction) -> Result<ActionResult, CodecError> {
        let config = self.controller.config().clone();
        let redraw = match action {
            ShortcutAction::ToggleEraser => {
                self.controller.toggle_eraser();
                true
            }
            ShortcutAction::ToggleSelection => {
                self.controller.toggle_selection();
                true
            }
            ShortcutAction::PlaceForce => {
                self.controller.start_force_placement();
                false
            }
            ShortcutAction::Undo => {
                self.controller.reset_gestures();
                self.state.undo()
            }
            ShortcutAction::Redo => {
                self.controller.reset_gestures();
                self.state.redo()
            }
            ShortcutAction::ZoomIn => {
                self.state.zoom_by(config.zoom_in_step);
                true
            }
            ShortcutAction::ZoomOut => {
                self.state.zoom_by(config.zoom_out_step);
                true
            }
            ShortcutAction::ResetZoom => {
                self.state.reset_zoom();
                true
            }
            ShortcutAction::ToggleGrid => {
                self.state.toggle_grid();
                true
            }
            ShortcutAction::New => {
                self.new_document();
                true
            }
            ShortcutAction::Save if self.current_file.is_some() => {
                self.save()?;
                false
            }
            ShortcutAction::Open
            | ShortcutAction::Save
            | ShortcutAction::SaveAs
            | ShortcutAction::Export => {
                return Ok(ActionResult::NeedsPath(action));
            }
        };
        Ok(ActionResult::Done(redraw))
    }

    /// Start over with an empty scene. The clear itself is undoable.
    pub fn new_document(&mut self) {
        self.controller.reset_gestures();
        self.state.clear_all();
        self.current_file = None;
    }

    // ─── Files ───────────────────────────────────────────────────────────

    /// Replace the scene with a file's contents. On any error the scene,
    /// history and current path are unchanged.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<(), CodecError> {
        let path = path.as_ref();
        let loaded = SceneFile::read(path).and_then(|file| self.state.load_file(&file));
        match loaded {
            Ok(()) => {
                log::info!("opened {}", path.display());
                self.controller.reset_gestures();
                self.current_file = Some(path.to_path_buf());
                Ok(())
            }
            Err(e) => {
                log::warn!("open failed: {e}");
                Err(e)
            }
        }
    }

    /// Write to the current path.
    pub fn save(&mut self) -> Result<PathBuf, CodecError> {
        let path = self.current_file.clone().ok_or(CodecError::NoPath)?;
        self.write(&path, false)?;
        Ok(path)
    }

    /// Write to `path` and remember it as the current file.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<(), CodecError> {
        let path = path.as_ref();
        self.write(path, false)?;
        self.current_file = Some(path.to_path_buf());
        Ok(())
    }

    /// Write a copy to `path`, creating directories as needed. The current
    /// file is unchanged.
    pub fn export(&self, path: impl AsRef<Path>) -> Result<(), CodecError> {
        self.write(path.as_ref(), true)
    }

    fn write(&self, path: &Path, export: bool) -> Result<(), CodecError> {
        let file = self.state.to_file();
        let written = if export {
            file.export(path)
        } else {
            file.write(path)
        };
        match &written {
            Ok(()) => log::info!(
                "wrote {} node(s), {} line(s) to {}",
                file.nodes.len(),
                file.lines.len(),
                path.display()
            ),
            Err(e) => log::warn!("write failed: {e}"),
        }
        written
    }
}
