//! Selection (focus) handling.
//!
//! Focus lives on the blocks themselves (`Block::focus`); this engine only
//! decides how pointer presses change it and remembers the last block that
//! was pressed. That block is the drag anchor and the property-panel target.

use bc_core::{Block, Document};

/// What a press on a block did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Press suppressed (preview mode, or no such block).
    Ignored,
    /// The block is focused after the press; a drag may follow.
    Focused(usize),
    /// Ctrl-press toggled the block off.
    Unfocused(usize),
}

#[derive(Debug, Default)]
pub struct SelectionEngine {
    last_selected: Option<usize>,
    preview: bool,
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Press on block `index`.
    ///
    /// With ctrl the block's focus toggles. Without ctrl an unfocused block
    /// becomes the only focused one, while an already focused block keeps
    /// the whole selection as is, since the press may turn into a group
    /// drag. The block becomes the last selected either way.
    pub fn on_block_pointer_down(
        &mut self,
        doc: &mut Document,
        index: usize,
        ctrl: bool,
    ) -> SelectOutcome {
        if self.preview {
            return SelectOutcome::Ignored;
        }
        let Some(was_focused) = doc.block(index).map(|b| b.focus) else {
            return SelectOutcome::Ignored;
        };

        let focused = if ctrl {
            !was_focused
        } else {
            if !was_focused {
                doc.clear_focus();
            }
            true
        };
        if focused != was_focused
            && let Some(block) = doc.block_mut(index)
        {
            block.focus = focused;
        }
        self.last_selected = Some(index);

        if focused {
            SelectOutcome::Focused(index)
        } else {
            SelectOutcome::Unfocused(index)
        }
    }

    /// Press on empty canvas. Without ctrl this deselects everything.
    /// Returns whether the selection was reset.
    pub fn on_canvas_pointer_down(&mut self, doc: &mut Document, ctrl: bool) -> bool {
        if self.preview || ctrl {
            return false;
        }
        doc.clear_focus();
        self.last_selected = None;
        true
    }

    /// Unfocus every block.
    pub fn clear_focus(&mut self, doc: &mut Document) {
        doc.clear_focus();
    }

    /// Enter or leave preview mode. While previewing, presses are inert
    /// and nothing is focused.
    pub fn set_preview(&mut self, doc: &mut Document, preview: bool) {
        self.preview = preview;
        if preview {
            self.clear_focus(doc);
        }
    }

    pub fn is_preview(&self) -> bool {
        self.preview
    }

    pub fn last_selected(&self) -> Option<usize> {
        self.last_selected
    }

    pub fn last_selected_block<'a>(&self, doc: &'a Document) -> Option<&'a Block> {
        self.last_selected.and_then(|i| doc.block(i))
    }

    /// Drop the remembered anchor (after the block list was restructured).
    pub fn forget(&mut self) {
        self.last_selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bc_core::{ComponentKey, Container};

    fn doc(n: usize) -> Document {
        let key = ComponentKey::intern("text");
        Document::with_blocks(
            Container::default(),
            (0..n)
                .map(|i| Block::new(key, i as f32 * 10.0, 0.0))
                .collect(),
        )
    }

    fn focus_flags(doc: &Document) -> Vec<bool> {
        doc.blocks().iter().map(|b| b.focus).collect()
    }

    #[test]
    fn plain_press_selects_only_that_block() {
        let mut d = doc(3);
        let mut sel = SelectionEngine::new();
        sel.on_block_pointer_down(&mut d, 0, false);
        assert_eq!(sel.on_block_pointer_down(&mut d, 2, false), SelectOutcome::Focused(2));
        assert_eq!(focus_flags(&d), vec![false, false, true]);
        assert_eq!(sel.last_selected(), Some(2));
    }

    #[test]
    fn ctrl_press_toggles_and_keeps_others() {
        let mut d = doc(3);
        let mut sel = SelectionEngine::new();
        sel.on_block_pointer_down(&mut d, 0, false);
        sel.on_block_pointer_down(&mut d, 1, true);
        assert_eq!(focus_flags(&d), vec![true, true, false]);

        assert_eq!(sel.on_block_pointer_down(&mut d, 1, true), SelectOutcome::Unfocused(1));
        assert_eq!(focus_flags(&d), vec![true, false, false]);
        // Toggling off still records the anchor.
        assert_eq!(sel.last_selected(), Some(1));
    }

    #[test]
    fn plain_press_on_focused_block_keeps_multi_selection() {
        let mut d = doc(3);
        let mut sel = SelectionEngine::new();
        sel.on_block_pointer_down(&mut d, 0, false);
        sel.on_block_pointer_down(&mut d, 2, true);
        assert_eq!(sel.on_block_pointer_down(&mut d, 0, false), SelectOutcome::Focused(0));
        assert_eq!(focus_flags(&d), vec![true, false, true]);
    }

    #[test]
    fn canvas_press_clears_unless_ctrl() {
        let mut d = doc(2);
        let mut sel = SelectionEngine::new();
        sel.on_block_pointer_down(&mut d, 0, false);
        sel.on_block_pointer_down(&mut d, 1, true);

        assert!(!sel.on_canvas_pointer_down(&mut d, true));
        assert_eq!(focus_flags(&d), vec![true, true]);

        assert!(sel.on_canvas_pointer_down(&mut d, false));
        assert_eq!(focus_flags(&d), vec![false, false]);
        assert_eq!(sel.last_selected(), None);
    }

    #[test]
    fn preview_mode_is_inert() {
        let mut d = doc(2);
        let mut sel = SelectionEngine::new();
        sel.on_block_pointer_down(&mut d, 0, false);
        sel.set_preview(&mut d, true);
        assert!(!d.has_focus());
        assert_eq!(sel.on_block_pointer_down(&mut d, 1, false), SelectOutcome::Ignored);
        assert!(!d.has_focus());
    }

    #[test]
    fn out_of_range_press_is_ignored() {
        let mut d = doc(1);
        let mut sel = SelectionEngine::new();
        assert_eq!(sel.on_block_pointer_down(&mut d, 5, false), SelectOutcome::Ignored);
        assert_eq!(sel.last_selected(), None);
    }
}
