//! Dropping new blocks from the component palette.
//!
//! The canvas only listens for transfer events while a palette item is
//! being dragged: `drag_start` binds, `drag_end` unbinds, and anything that
//! arrives in between is ignored. The whole palette gesture is reported to
//! the gesture listener, so a drop is undone like any canvas drag.

use crate::gesture::GestureListener;
use bc_core::{Block, ComponentKey, Document};

/// Transfer events the canvas receives while a palette item hovers it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaletteEvent {
    Enter,
    Over,
    Leave,
    /// Released over the canvas at `(x, y)` relative to it.
    Drop { x: f32, y: f32 },
}

/// Cursor feedback for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    Move,
    None,
}

pub struct PaletteDropEngine {
    bound: bool,
    current: Option<ComponentKey>,
    drop_z_index: i32,
}

impl PaletteDropEngine {
    pub fn new(drop_z_index: i32) -> Self {
        Self {
            bound: false,
            current: None,
            drop_z_index,
        }
    }

    /// A palette item started dragging.
    pub fn drag_start(
        &mut self,
        key: ComponentKey,
        doc: &Document,
        listener: &mut dyn GestureListener,
    ) {
        if !self.bound {
            listener.gesture_start(doc);
            self.bound = true;
        }
        self.current = Some(key);
        log::debug!("palette drag of {key}");
    }

    /// A transfer event reached the canvas. Returns the drop effect to show,
    /// or `None` when no palette drag is bound.
    pub fn handle(&mut self, event: PaletteEvent, doc: &mut Document) -> Option<DropEffect> {
        if !self.bound {
            return None;
        }
        match event {
            PaletteEvent::Enter | PaletteEvent::Over => Some(DropEffect::Move),
            PaletteEvent::Leave => Some(DropEffect::None),
            PaletteEvent::Drop { x, y } => {
                let key = self.current.take()?;
                let mut block = Block::new(key, y, x).with_z_index(self.drop_z_index);
                block.align_center = true;
                log::debug!("dropped {} at ({x}, {y})", block.id);
                doc.push_block(block);
                Some(DropEffect::Move)
            }
        }
    }

    /// The palette drag finished, dropped or not.
    pub fn drag_end(&mut self, doc: &mut Document, listener: &mut dyn GestureListener) {
        if !self.bound {
            return;
        }
        self.bound = false;
        self.current = None;
        listener.gesture_end(doc);
    }

    /// Unbind and report the gesture as cancelled, dropping any block
    /// it inserted.
    pub fn cancel(&mut self, doc: &mut Document, listener: &mut dyn GestureListener) {
        if !self.bound {
            return;
        }
        self.bound = false;
        self.current = None;
        listener.gesture_cancel(doc);
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::testing::Recorder;

    #[test]
    fn drop_appends_centered_block() {
        let mut doc = Document::default();
        let mut palette = PaletteDropEngine::new(1);
        let mut rec = Recorder::default();
        let key = ComponentKey::intern("button");

        palette.drag_start(key, &doc, &mut rec);
        assert_eq!(palette.handle(PaletteEvent::Enter, &mut doc), Some(DropEffect::Move));
        assert_eq!(
            palette.handle(PaletteEvent::Drop { x: 120.0, y: 80.0 }, &mut doc),
            Some(DropEffect::Move)
        );
        palette.drag_end(&mut doc, &mut rec);

        let b = &doc.blocks()[0];
        assert_eq!(b.key, key);
        assert_eq!((b.top, b.left), (80.0, 120.0));
        assert_eq!(b.z_index, 1);
        assert!(b.align_center);
        assert!(b.props.is_empty() && b.model.is_empty());

        assert_eq!(rec.starts.len(), 1);
        assert!(rec.starts[0].is_empty());
        assert_eq!(rec.ends.len(), 1);
        assert_eq!(rec.ends[0].len(), 1);
    }

    #[test]
    fn events_ignored_when_unbound() {
        let mut doc = Document::default();
        let mut palette = PaletteDropEngine::new(1);
        assert_eq!(palette.handle(PaletteEvent::Drop { x: 0.0, y: 0.0 }, &mut doc), None);
        assert!(doc.blocks().is_empty());

        // Ending a drag that never started is a no-op.
        let mut rec = Recorder::default();
        palette.drag_end(&mut doc, &mut rec);
        assert!(rec.ends.is_empty());
    }

    #[test]
    fn leave_reports_no_effect() {
        let mut doc = Document::default();
        let mut palette = PaletteDropEngine::new(1);
        palette.drag_start(ComponentKey::intern("text"), &doc, &mut ());
        assert_eq!(palette.handle(PaletteEvent::Leave, &mut doc), Some(DropEffect::None));
    }

    #[test]
    fn second_drop_in_one_drag_is_ignored() {
        let mut doc = Document::default();
        let mut palette = PaletteDropEngine::new(1);
        palette.drag_start(ComponentKey::intern("text"), &doc, &mut ());
        palette.handle(PaletteEvent::Drop { x: 0.0, y: 0.0 }, &mut doc);
        assert_eq!(palette.handle(PaletteEvent::Drop { x: 5.0, y: 5.0 }, &mut doc), None);
        assert_eq!(doc.blocks().len(), 1);
    }

    #[test]
    fn cancel_discards_the_dropped_block() {
        let mut doc = Document::default();
        let mut palette = PaletteDropEngine::new(1);
        let mut rec = Recorder::default();
        palette.drag_start(ComponentKey::intern("text"), &doc, &mut rec);
        palette.handle(PaletteEvent::Drop { x: 10.0, y: 10.0 }, &mut doc);
        assert_eq!(doc.blocks().len(), 1);

        palette.cancel(&mut doc, &mut rec);
        assert!(doc.blocks().is_empty());
        assert!(!palette.is_bound());
        assert_eq!(rec.cancels, 1);
        assert!(rec.ends.is_empty());

        // Nothing left to end.
        palette.drag_end(&mut doc, &mut rec);
        assert!(rec.ends.is_empty());
    }
}
