//! The editor facade.
//!
//! Owns the document and every engine, and routes host input through them:
//!
//! ```text
//! pointer/key ─▶ SelectionEngine ─▶ DragEngine / ResizeEngine ─▶ CommandEngine
//!                 (who is affected)   (live geometry)             (one undo step)
//! ```
//!
//! Presentation layers render `document()`, draw `guides()` during a drag,
//! and build toolbars from `commands().specs()`.

use crate::commands::{Command, CommandEngine, CommandName};
use crate::config::EditorConfig;
use crate::drag::{DragEngine, Guides};
use crate::input::{InputEvent, Modifiers};
use crate::palette::{DropEffect, PaletteDropEngine, PaletteEvent};
use crate::resize::{ResizeEngine, ResizeHandle};
use crate::selection::{SelectOutcome, SelectionEngine};
use crate::shortcuts::KeyChord;
use bc_core::{
    Block, ComponentKey, ComponentRegistry, Document, DocumentError, FocusPartition,
    emit_document, parse_document,
};

pub struct Editor {
    document: Document,
    config: EditorConfig,
    registry: ComponentRegistry,
    selection: SelectionEngine,
    drag: DragEngine,
    resize: ResizeEngine,
    palette: PaletteDropEngine,
    commands: CommandEngine,
    disposed: bool,
}

impl Editor {
    pub fn new(document: Document, registry: ComponentRegistry, config: EditorConfig) -> Self {
        Self {
            document,
            registry,
            selection: SelectionEngine::new(),
            drag: DragEngine::new(config.snap_threshold, config.freeze_modifier),
            resize: ResizeEngine::new(),
            palette: PaletteDropEngine::new(config.drop_z_index),
            commands: CommandEngine::new(config.history_depth),
            config,
            disposed: false,
        }
    }

    // ─── Reads ───────────────────────────────────────────────────────────

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn commands(&self) -> &CommandEngine {
        &self.commands
    }

    pub fn commands_mut(&mut self) -> &mut CommandEngine {
        &mut self.commands
    }

    pub fn focus_partition(&self) -> FocusPartition<'_> {
        self.document.focus_partition()
    }

    /// The block the property panel edits; `None` means the container.
    pub fn last_selected_block(&self) -> Option<&Block> {
        self.selection.last_selected_block(&self.document)
    }

    pub fn guides(&self) -> Guides {
        self.drag.guides()
    }

    pub fn is_preview(&self) -> bool {
        self.selection.is_preview()
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    /// Press on block `index`. Selection settles first; if the block ends
    /// up focused, the same press arms a drag anchored on it.
    pub fn block_pointer_down(&mut self, index: usize, x: f32, y: f32, modifiers: Modifiers) {
        if self.disposed {
            return;
        }
        let outcome = self
            .selection
            .on_block_pointer_down(&mut self.document, index, modifiers.ctrl);
        if let SelectOutcome::Focused(anchor) = outcome {
            self.drag.press(&self.document, anchor, x, y);
        }
    }

    /// Press on empty canvas.
    pub fn canvas_pointer_down(&mut self, modifiers: Modifiers) {
        if self.disposed {
            return;
        }
        self.selection
            .on_canvas_pointer_down(&mut self.document, modifiers.ctrl);
    }

    /// Press on a resize handle of block `index`. Returns whether the
    /// handle is offered for the block's component.
    pub fn resize_pointer_down(&mut self, index: usize, handle: ResizeHandle, x: f32, y: f32) -> bool {
        if self.disposed || self.selection.is_preview() {
            return false;
        }
        let Some(key) = self.document.block(index).map(|b| b.key) else {
            return false;
        };
        let hint = self.registry.resize_hint(key);
        self.resize.press(&self.document, hint, index, handle, x, y)
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, modifiers: Modifiers) {
        if self.resize.is_active() {
            self.resize
                .pointer_move(&mut self.document, x, y, &mut self.commands);
        } else {
            self.drag
                .pointer_move(&mut self.document, x, y, modifiers, &mut self.commands);
        }
    }

    pub fn pointer_up(&mut self) {
        if self.resize.is_active() {
            self.resize.release(&mut self.document, &mut self.commands);
        } else {
            self.drag.release(&mut self.document, &mut self.commands);
        }
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Key press with the host's `KeyboardEvent.key` name. Returns `true`
    /// when a command handled it and the default action should be
    /// suppressed.
    pub fn key_down(&mut self, key: &str, modifiers: Modifiers) -> bool {
        let Some(chord) = KeyChord::from_event(key, modifiers) else {
            return false;
        };
        if !self.commands.bound_to(&chord).is_empty() {
            self.settle_gestures();
        }
        let ran = self.commands.on_key(&mut self.document, &chord);
        if ran.iter().any(|name| restructures(*name)) {
            self.selection.forget();
        }
        !ran.is_empty()
    }

    // ─── Palette ─────────────────────────────────────────────────────────

    pub fn palette_drag_start(&mut self, key: ComponentKey) {
        if self.disposed {
            return;
        }
        self.palette
            .drag_start(key, &self.document, &mut self.commands);
    }

    pub fn palette_event(&mut self, event: PaletteEvent) -> Option<DropEffect> {
        self.palette.handle(event, &mut self.document)
    }

    pub fn palette_drag_end(&mut self) {
        self.palette
            .drag_end(&mut self.document, &mut self.commands);
    }

    // ─── Commands ────────────────────────────────────────────────────────

    /// Run a command. A gesture in flight is committed first, so the
    /// command never lands inside a drag's history step.
    pub fn invoke(&mut self, command: Command) {
        let name = command.name();
        self.settle_gestures();
        self.commands.execute(&mut self.document, command);
        if restructures(name) {
            self.selection.forget();
        }
    }

    /// Invoke an argument-free command by its toolbar name.
    pub fn invoke_named(&mut self, name: &str) -> Result<(), String> {
        let name: CommandName = name.parse()?;
        let command = Command::from_name(name)
            .ok_or_else(|| format!("`{name}` needs arguments"))?;
        self.invoke(command);
        Ok(())
    }

    /// Record the rendered size of a block (recenters freshly dropped ones).
    pub fn measure_block(&mut self, index: usize, width: f32, height: f32) -> bool {
        self.document.measure_block(index, width, height)
    }

    /// Unfocus every block.
    pub fn clear_focus(&mut self) {
        self.selection.clear_focus(&mut self.document);
    }

    /// Enter or leave preview. Entering commits any gesture in flight and
    /// drops focus.
    pub fn set_preview(&mut self, preview: bool) {
        if preview {
            self.settle_gestures();
        }
        self.selection.set_preview(&mut self.document, preview);
    }

    /// Replace the document with imported JSON, as one undoable step.
    pub fn import_json(&mut self, text: &str) -> Result<(), DocumentError> {
        let doc = parse_document(text)?;
        self.invoke(Command::UpdateContainer(Box::new(doc)));
        Ok(())
    }

    pub fn export_json(&self) -> Result<String, DocumentError> {
        emit_document(&self.document)
    }

    // ─── Gestures ────────────────────────────────────────────────────────

    /// Abandon the gesture in flight and put the blocks back as they were
    /// when it started. Nothing is recorded.
    pub fn cancel_gesture(&mut self) {
        self.drag.cancel(&mut self.document, &mut self.commands);
        self.resize.cancel(&mut self.document, &mut self.commands);
        self.palette.cancel(&mut self.document, &mut self.commands);
    }

    /// End whatever gesture is in flight as if the pointer were released.
    fn settle_gestures(&mut self) {
        if self.resize.is_active() {
            self.resize.release(&mut self.document, &mut self.commands);
        }
        self.drag.release(&mut self.document, &mut self.commands);
        self.palette
            .drag_end(&mut self.document, &mut self.commands);
    }

    // ─── Generic input ───────────────────────────────────────────────────

    /// Route a normalized event. `hit` is the block under the pointer for
    /// presses (`None` for empty canvas). Returns `true` for key events
    /// that were handled.
    pub fn handle(&mut self, event: &InputEvent, hit: Option<usize>) -> bool {
        match event {
            InputEvent::PointerDown { x, y, modifiers } => {
                match hit {
                    Some(index) => self.block_pointer_down(index, *x, *y, *modifiers),
                    None => self.canvas_pointer_down(*modifiers),
                }
                false
            }
            InputEvent::PointerMove { x, y, modifiers } => {
                self.pointer_move(*x, *y, *modifiers);
                false
            }
            InputEvent::PointerUp { .. } => {
                self.pointer_up();
                false
            }
            InputEvent::Key { key, modifiers } => self.key_down(key, *modifiers),
        }
    }

    // ─── Teardown ────────────────────────────────────────────────────────

    /// Tear down every listener. A gesture in flight is committed first.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.settle_gestures();
        self.commands.dispose();
        self.disposed = true;
        log::debug!("editor disposed");
    }
}

/// Commands after which block indices may no longer mean the same block.
fn restructures(name: CommandName) -> bool {
    matches!(
        name,
        CommandName::Undo | CommandName::Redo | CommandName::Delete | CommandName::UpdateContainer
    )
}
