pub mod commands;
pub mod config;
pub mod drag;
pub mod editor;
pub mod gesture;
pub mod input;
pub mod palette;
pub mod resize;
pub mod selection;
pub mod shortcuts;

pub use commands::{Command, CommandEngine, CommandName, CommandSpec, HistoryEntry};
pub use config::EditorConfig;
pub use drag::{AlignLine, AlignLines, DragEngine, Guides};
pub use editor::Editor;
pub use gesture::GestureListener;
pub use input::{InputEvent, Modifier, Modifiers};
pub use palette::{DropEffect, PaletteDropEngine, PaletteEvent};
pub use resize::{Edge, ResizeEngine, ResizeHandle};
pub use selection::{SelectOutcome, SelectionEngine};
pub use shortcuts::{Key, KeyBindings, KeyChord, ModifierSet};
