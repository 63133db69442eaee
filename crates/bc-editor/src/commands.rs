//! Commands and the undo/redo history.
//!
//! Every structural change to the document goes through a `Command`. A
//! command computes the block list (or whole document) it produces,
//! applies it, and, if it is undoable, records a `HistoryEntry` holding
//! the before/after snapshots. Snapshots are shared `Arc`s, so recording
//! costs a pointer copy, never a deep clone.
//!
//! History is linear with a cursor. Doing something new after an undo
//! discards the undone branch.
//!
//! Drag gestures use **snapshot batching**: the block list is captured
//! when the gesture starts and again when it ends, so a drag through any
//! number of intermediate positions is a single undo step.

use crate::gesture::GestureListener;
use crate::shortcuts::{KeyBindings, KeyChord};
use bc_core::{Block, BlockId, Document};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// ─── Names and descriptors ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    Undo,
    Redo,
    Drag,
    UpdateContainer,
    UpdateBlock,
    PlaceTop,
    PlaceBottom,
    Delete,
}

impl CommandName {
    pub const ALL: [CommandName; 8] = [
        CommandName::Redo,
        CommandName::Undo,
        CommandName::Drag,
        CommandName::UpdateContainer,
        CommandName::UpdateBlock,
        CommandName::PlaceTop,
        CommandName::PlaceBottom,
        CommandName::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandName::Undo => "undo",
            CommandName::Redo => "redo",
            CommandName::Drag => "drag",
            CommandName::UpdateContainer => "updateContainer",
            CommandName::UpdateBlock => "updateBlock",
            CommandName::PlaceTop => "placeTop",
            CommandName::PlaceBottom => "placeBottom",
            CommandName::Delete => "delete",
        }
    }

    /// Whether invoking this command records a history entry.
    pub fn push_queue(&self) -> bool {
        !matches!(self, CommandName::Undo | CommandName::Redo)
    }

    /// Whether the command can be invoked without arguments (and so be
    /// bound to a key or a toolbar button).
    pub fn takes_no_args(&self) -> bool {
        !matches!(
            self,
            CommandName::UpdateContainer | CommandName::UpdateBlock
        )
    }

    fn default_keyboard(&self) -> &'static str {
        match self {
            CommandName::Undo => "ctrl+z",
            CommandName::Redo => "ctrl+y|ctrl+shift+z",
            CommandName::Delete => "backspace|delete",
            _ => "",
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        CommandName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("unknown command `{s}`"))
    }
}

/// A registered command as seen by toolbars and key dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    pub name: CommandName,
    pub keyboard: KeyBindings,
    pub push_queue: bool,
}

// ─── Commands ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Undo,
    Redo,
    /// Commit the drag gesture captured between `gesture_start` and now.
    Drag,
    /// Replace the whole document (import, container size edits).
    UpdateContainer(Box<Document>),
    /// Replace block `old` with `new`, in place.
    UpdateBlock { new: Box<Block>, old: BlockId },
    PlaceTop,
    PlaceBottom,
    /// Remove every focused block.
    Delete,
}

impl Command {
    pub fn name(&self) -> CommandName {
        match self {
            Command::Undo => CommandName::Undo,
            Command::Redo => CommandName::Redo,
            Command::Drag => CommandName::Drag,
            Command::UpdateContainer(_) => CommandName::UpdateContainer,
            Command::UpdateBlock { .. } => CommandName::UpdateBlock,
            Command::PlaceTop => CommandName::PlaceTop,
            Command::PlaceBottom => CommandName::PlaceBottom,
            Command::Delete => CommandName::Delete,
        }
    }

    /// The argument-free command behind `name`, if it has one.
    pub fn from_name(name: CommandName) -> Option<Command> {
        match name {
            CommandName::Undo => Some(Command::Undo),
            CommandName::Redo => Some(Command::Redo),
            CommandName::Drag => Some(Command::Drag),
            CommandName::PlaceTop => Some(Command::PlaceTop),
            CommandName::PlaceBottom => Some(Command::PlaceBottom),
            CommandName::Delete => Some(Command::Delete),
            CommandName::UpdateContainer | CommandName::UpdateBlock => None,
        }
    }
}

// ─── History ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Snapshot {
    Blocks(Arc<Vec<Block>>),
    Document(Document),
}

impl Snapshot {
    fn restore(&self, doc: &mut Document) {
        match self {
            Snapshot::Blocks(blocks) => doc.set_blocks(Arc::clone(blocks)),
            Snapshot::Document(whole) => *doc = whole.clone(),
        }
    }
}

/// One committed change: apply `after` to redo, `before` to undo.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    name: CommandName,
    before: Snapshot,
    after: Snapshot,
}

impl HistoryEntry {
    pub fn name(&self) -> CommandName {
        self.name
    }

    pub fn redo(&self, doc: &mut Document) {
        self.after.restore(doc);
    }

    pub fn undo(&self, doc: &mut Document) {
        self.before.restore(doc);
    }
}

/// Listener registrations made at startup, undone by `dispose`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Teardown {
    GestureSignals,
    Keyboard,
}

// ─── Engine ──────────────────────────────────────────────────────────────

pub struct CommandEngine {
    specs: Vec<CommandSpec>,
    history: Vec<HistoryEntry>,
    /// Number of applied entries; the cursor is `applied - 1`.
    applied: usize,
    max_depth: usize,
    /// Block list captured at the start of the current gesture.
    drag_before: Option<Arc<Vec<Block>>>,
    gestures_bound: bool,
    keyboard_bound: bool,
    teardowns: Vec<Teardown>,
}

impl CommandEngine {
    pub fn new(max_depth: usize) -> Self {
        let specs = CommandName::ALL
            .into_iter()
            .map(|name| CommandSpec {
                name,
                keyboard: name.default_keyboard().parse().unwrap_or_default(),
                push_queue: name.push_queue(),
            })
            .collect();

        let mut engine = Self {
            specs,
            history: Vec::new(),
            applied: 0,
            max_depth: max_depth.max(1),
            drag_before: None,
            gestures_bound: false,
            keyboard_bound: false,
            teardowns: Vec::new(),
        };
        engine.init();
        engine
    }

    /// Run each command's startup hook, then start listening for keys.
    fn init(&mut self) {
        let has_drag = self.specs.iter().any(|s| s.name == CommandName::Drag);
        if has_drag {
            self.gestures_bound = true;
            self.teardowns.push(Teardown::GestureSignals);
        }
        self.keyboard_bound = true;
        self.teardowns.push(Teardown::Keyboard);
    }

    /// Unregister every listener bound at startup. Safe to call twice.
    pub fn dispose(&mut self) {
        for teardown in std::mem::take(&mut self.teardowns) {
            match teardown {
                Teardown::GestureSignals => {
                    self.gestures_bound = false;
                    self.drag_before = None;
                }
                Teardown::Keyboard => self.keyboard_bound = false,
            }
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.teardowns.is_empty()
    }

    pub fn specs(&self) -> &[CommandSpec] {
        &self.specs
    }

    pub fn spec(&self, name: CommandName) -> Option<&CommandSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    /// Rebind a command's shortcut. Commands that need arguments cannot
    /// be bound.
    pub fn bind(&mut self, name: CommandName, keyboard: KeyBindings) -> Result<(), String> {
        if !name.takes_no_args() && !keyboard.is_empty() {
            return Err(format!("`{name}` takes arguments and cannot be bound to a key"));
        }
        let spec = self
            .specs
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| format!("`{name}` is not registered"))?;
        spec.keyboard = keyboard;
        Ok(())
    }

    /// Invoke a command: apply it now and, if it is undoable, record it.
    pub fn execute(&mut self, doc: &mut Document, command: Command) {
        let name = command.name();
        let (before, after) = match command {
            Command::Undo => {
                self.undo(doc);
                return;
            }
            Command::Redo => {
                self.redo(doc);
                return;
            }
            Command::Drag => {
                let Some(before) = self.drag_before.take() else {
                    log::debug!("drag commit without a gesture start, ignored");
                    return;
                };
                (Snapshot::Blocks(before), Snapshot::Blocks(doc.snapshot_blocks()))
            }
            Command::UpdateContainer(next) => {
                (Snapshot::Document(doc.clone()), Snapshot::Document(*next))
            }
            Command::UpdateBlock { new, old } => {
                let mut blocks = doc.blocks().to_vec();
                if let Some(i) = doc.position_of(old) {
                    blocks[i] = *new;
                }
                (
                    Snapshot::Blocks(doc.snapshot_blocks()),
                    Snapshot::Blocks(Arc::new(blocks)),
                )
            }
            Command::PlaceTop => (
                Snapshot::Blocks(doc.snapshot_blocks()),
                Snapshot::Blocks(Arc::new(place_top(doc))),
            ),
            Command::PlaceBottom => (
                Snapshot::Blocks(doc.snapshot_blocks()),
                Snapshot::Blocks(Arc::new(place_bottom(doc))),
            ),
            Command::Delete => {
                let kept = doc.blocks().iter().filter(|b| !b.focus).cloned().collect();
                (
                    Snapshot::Blocks(doc.snapshot_blocks()),
                    Snapshot::Blocks(Arc::new(kept)),
                )
            }
        };

        let entry = HistoryEntry {
            name,
            before,
            after,
        };
        entry.redo(doc);
        self.push(entry);
    }

    fn push(&mut self, entry: HistoryEntry) {
        // Drop the redo branch.
        self.history.truncate(self.applied);
        log::debug!("commit {} (history {})", entry.name, self.history.len() + 1);
        self.history.push(entry);
        self.applied += 1;
        if self.history.len() > self.max_depth {
            self.history.remove(0);
            self.applied -= 1;
        }
    }

    /// Step back. Returns the undone command's name, or `None` at the start.
    pub fn undo(&mut self, doc: &mut Document) -> Option<CommandName> {
        if self.applied == 0 {
            return None;
        }
        let entry = &self.history[self.applied - 1];
        entry.undo(doc);
        self.applied -= 1;
        Some(entry.name)
    }

    /// Step forward. Returns the redone command's name, or `None` at the end.
    pub fn redo(&mut self, doc: &mut Document) -> Option<CommandName> {
        let entry = self.history.get(self.applied)?;
        entry.redo(doc);
        self.applied += 1;
        Some(entry.name)
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.history.len()
    }

    /// Index of the last applied entry; `None` when nothing is applied.
    pub fn cursor(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Commands `chord` would run, in registration order. Empty once the
    /// keyboard listener is disposed.
    pub fn bound_to(&self, chord: &KeyChord) -> SmallVec<[CommandName; 2]> {
        if !self.keyboard_bound {
            return SmallVec::new();
        }
        self.specs
            .iter()
            .filter(|s| !s.keyboard.is_empty() && s.keyboard.matches(chord))
            .map(|s| s.name)
            .collect()
    }

    /// Whether a gesture has started and not yet been committed or
    /// abandoned.
    pub fn gesture_pending(&self) -> bool {
        self.drag_before.is_some()
    }

    /// Dispatch a key chord to every command bound to it. Returns the
    /// commands that ran; a non-empty result means the host should
    /// suppress the key's default action.
    pub fn on_key(
        &mut self,
        doc: &mut Document,
        chord: &KeyChord,
    ) -> SmallVec<[CommandName; 2]> {
        let matched = self.bound_to(chord);
        for &name in &matched {
            if let Some(command) = Command::from_name(name) {
                log::debug!("{chord} → {name}");
                self.execute(doc, command);
            }
        }
        matched
    }
}

impl GestureListener for CommandEngine {
    fn gesture_start(&mut self, doc: &Document) {
        if self.gestures_bound {
            self.drag_before = Some(doc.snapshot_blocks());
        }
    }

    fn gesture_end(&mut self, doc: &mut Document) {
        if self.gestures_bound {
            self.execute(doc, Command::Drag);
        }
    }

    fn gesture_cancel(&mut self, doc: &mut Document) {
        if let Some(before) = self.drag_before.take() {
            log::debug!("gesture abandoned, blocks restored");
            doc.set_blocks(before);
        }
    }
}

// ─── Z-order ─────────────────────────────────────────────────────────────

/// Focused blocks go one above the highest unfocused block.
fn place_top(doc: &Document) -> Vec<Block> {
    let max = doc.focus_partition().max_unfocused_z();
    doc.blocks()
        .iter()
        .map(|b| {
            let mut b = b.clone();
            if let (true, Some(max)) = (b.focus, max) {
                b.z_index = max + 1;
            }
            b
        })
        .collect()
}

/// Focused blocks go one below the lowest unfocused block. If that would
/// be negative, the unfocused blocks are lifted instead so the focused
/// ones can sit at 0.
fn place_bottom(doc: &Document) -> Vec<Block> {
    let Some(min) = doc.focus_partition().min_unfocused_z() else {
        return doc.blocks().to_vec();
    };
    let mut target = min - 1;
    let mut lift = 0;
    if target < 0 {
        lift = -target;
        target = 0;
    }
    doc.blocks()
        .iter()
        .map(|b| {
            let mut b = b.clone();
            if b.focus {
                b.z_index = target;
            } else {
                b.z_index += lift;
            }
            b
        })
        .collect()
}
