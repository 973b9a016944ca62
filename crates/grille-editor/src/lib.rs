pub mod commands;
pub mod config;
pub mod controller;
pub mod events;
pub mod input;
pub mod session;
pub mod shortcuts;
pub mod state;
pub mod tools;

pub use commands::{History, Snapshot};
pub use config::EditorConfig;
pub use controller::{EditController, EditMode};
pub use events::{ElementRef, SceneEvent, SubscriptionId};
pub use input::{InputEvent, Modifiers, PointerButton};
pub use session::{ActionResult, Session};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use state::SceneState;
pub use tools::{Tool, ToolKind, ToolOutcome, ToolSettings};
