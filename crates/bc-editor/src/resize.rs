//! Resize handles.
//!
//! A handle sits on an edge or corner of a block. `Start` edges (top, left)
//! move the block's origin as they grow it; `End` edges only grow; `Center`
//! means the handle does not act on that axis. Which handles a block gets
//! depends on its component's resize hint.

use crate::gesture::GestureListener;
use bc_core::{BlockId, Document, ResizeHint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeHandle {
    pub horizontal: Edge,
    pub vertical: Edge,
}

impl ResizeHandle {
    pub const fn new(horizontal: Edge, vertical: Edge) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Whether a component with `hint` offers this handle.
    pub fn allowed(&self, hint: ResizeHint) -> bool {
        let acts_h = self.horizontal != Edge::Center;
        let acts_v = self.vertical != Edge::Center;
        (acts_h || acts_v) && (!acts_h || hint.width) && (!acts_v || hint.height)
    }

    /// All handles offered for `hint`: side handles per resizable axis,
    /// corners when both axes resize.
    pub fn offered(hint: ResizeHint) -> Vec<ResizeHandle> {
        use Edge::*;
        [
            Self::new(Start, Center),
            Self::new(End, Center),
            Self::new(Center, Start),
            Self::new(Center, End),
            Self::new(Start, Start),
            Self::new(End, Start),
            Self::new(Start, End),
            Self::new(End, End),
        ]
        .into_iter()
        .filter(|h| h.allowed(hint))
        .collect()
    }
}

struct ResizeState {
    id: BlockId,
    handle: ResizeHandle,
    start_x: f32,
    start_y: f32,
    start_width: f32,
    start_height: f32,
    start_top: f32,
    start_left: f32,
    moved: bool,
}

#[derive(Default)]
pub struct ResizeEngine {
    state: Option<ResizeState>,
}

impl ResizeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grab `handle` of block `index` with the pointer at `(x, y)`.
    /// Refused when the block is missing or its component does not offer
    /// the handle.
    pub fn press(
        &mut self,
        doc: &Document,
        hint: ResizeHint,
        index: usize,
        handle: ResizeHandle,
        x: f32,
        y: f32,
    ) -> bool {
        let Some(block) = doc.block(index) else {
            return false;
        };
        if !handle.allowed(hint) {
            log::debug!("{:?} not offered for {}", handle, block.key);
            return false;
        }
        let (start_width, start_height) = block.size();
        self.state = Some(ResizeState {
            id: block.id,
            handle,
            start_x: x,
            start_y: y,
            start_width,
            start_height,
            start_top: block.top,
            start_left: block.left,
            moved: false,
        });
        true
    }

    pub fn pointer_move(
        &mut self,
        doc: &mut Document,
        x: f32,
        y: f32,
        listener: &mut dyn GestureListener,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let Some(index) = doc.position_of(state.id) else {
            return;
        };
        if !state.moved {
            state.moved = true;
            listener.gesture_start(doc);
        }

        // Growth along each axis, never below zero size.
        let grow = |edge: Edge, delta: f32, start_size: f32| match edge {
            Edge::Center => 0.0,
            Edge::Start => (-delta).max(-start_size),
            Edge::End => delta.max(-start_size),
        };
        let dx = grow(state.handle.horizontal, x - state.start_x, state.start_width);
        let dy = grow(state.handle.vertical, y - state.start_y, state.start_height);

        let Some(block) = doc.block_mut(index) else {
            return;
        };
        if state.handle.vertical == Edge::Start {
            block.top = state.start_top - dy;
        }
        if state.handle.horizontal == Edge::Start {
            block.left = state.start_left - dx;
        }
        block.width = Some(state.start_width + dx);
        block.height = Some(state.start_height + dy);
        block.resizing = true;
    }

    pub fn release(&mut self, doc: &mut Document, listener: &mut dyn GestureListener) {
        let Some(state) = self.state.take() else {
            return;
        };
        if !state.moved {
            return;
        }
        if let Some(block) = doc.position_of(state.id).and_then(|i| doc.block_mut(i)) {
            block.resizing = false;
        }
        listener.gesture_end(doc);
    }

    /// Drop the handle. A resize that already changed the block is reported
    /// as cancelled.
    pub fn cancel(&mut self, doc: &mut Document, listener: &mut dyn GestureListener) {
        if let Some(state) = self.state.take()
            && state.moved
        {
            listener.gesture_cancel(doc);
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::testing::Recorder;
    use bc_core::{Block, ComponentKey, Container};

    const BOTH: ResizeHint = ResizeHint {
        width: true,
        height: true,
    };
    const WIDTH_ONLY: ResizeHint = ResizeHint {
        width: true,
        height: false,
    };

    fn doc() -> Document {
        Document::with_blocks(
            Container::default(),
            vec![Block::new(ComponentKey::intern("button"), 100.0, 100.0).with_size(80.0, 40.0)],
        )
    }

    #[test]
    fn offered_handles_follow_hint() {
        assert_eq!(ResizeHandle::offered(BOTH).len(), 8);
        assert_eq!(
            ResizeHandle::offered(WIDTH_ONLY),
            vec![
                ResizeHandle::new(Edge::Start, Edge::Center),
                ResizeHandle::new(Edge::End, Edge::Center),
            ]
        );
        assert!(ResizeHandle::offered(ResizeHint::default()).is_empty());
    }

    #[test]
    fn bottom_right_grows() {
        let mut d = doc();
        let mut resize = ResizeEngine::new();
        let mut rec = Recorder::default();
        assert!(resize.press(&d, BOTH, 0, ResizeHandle::new(Edge::End, Edge::End), 180.0, 140.0));
        resize.pointer_move(&mut d, 200.0, 150.0, &mut rec);

        let b = &d.blocks()[0];
        assert_eq!(b.size(), (100.0, 50.0));
        assert_eq!(b.position(), (100.0, 100.0));
        assert!(b.resizing);

        resize.release(&mut d, &mut rec);
        assert!(!d.blocks()[0].resizing);
        assert_eq!(rec.starts.len(), 1);
        assert_eq!(rec.ends.len(), 1);
    }

    #[test]
    fn top_left_moves_origin() {
        let mut d = doc();
        let mut resize = ResizeEngine::new();
        resize.press(&d, BOTH, 0, ResizeHandle::new(Edge::Start, Edge::Start), 100.0, 100.0);
        resize.pointer_move(&mut d, 90.0, 80.0, &mut ());

        let b = &d.blocks()[0];
        assert_eq!(b.position(), (80.0, 90.0));
        assert_eq!(b.size(), (90.0, 60.0));
    }

    #[test]
    fn side_handle_ignores_other_axis() {
        let mut d = doc();
        let mut resize = ResizeEngine::new();
        resize.press(&d, WIDTH_ONLY, 0, ResizeHandle::new(Edge::End, Edge::Center), 180.0, 120.0);
        resize.pointer_move(&mut d, 200.0, 300.0, &mut ());
        assert_eq!(d.blocks()[0].size(), (100.0, 40.0));
    }

    #[test]
    fn refuses_handle_not_offered() {
        let d = doc();
        let mut resize = ResizeEngine::new();
        assert!(!resize.press(&d, WIDTH_ONLY, 0, ResizeHandle::new(Edge::End, Edge::End), 0.0, 0.0));
        assert!(!resize.is_active());
    }

    #[test]
    fn press_release_without_move_is_silent() {
        let mut d = doc();
        let mut resize = ResizeEngine::new();
        let mut rec = Recorder::default();
        resize.press(&d, BOTH, 0, ResizeHandle::new(Edge::End, Edge::End), 0.0, 0.0);
        resize.release(&mut d, &mut rec);
        assert!(rec.starts.is_empty() && rec.ends.is_empty());
    }

    #[test]
    fn start_edge_stops_at_opposite_edge() {
        let mut d = doc();
        let mut resize = ResizeEngine::new();
        resize.press(&d, BOTH, 0, ResizeHandle::new(Edge::Start, Edge::Start), 100.0, 100.0);
        // Far past the bottom-right corner (x 180, y 140).
        resize.pointer_move(&mut d, 300.0, 250.0, &mut ());

        let b = &d.blocks()[0];
        assert_eq!(b.size(), (0.0, 0.0));
        assert_eq!(b.position(), (140.0, 180.0));
    }

    #[test]
    fn cancel_puts_size_back() {
        let mut d = doc();
        let mut resize = ResizeEngine::new();
        let mut rec = Recorder::default();
        resize.press(&d, BOTH, 0, ResizeHandle::new(Edge::End, Edge::End), 180.0, 140.0);
        resize.pointer_move(&mut d, 220.0, 160.0, &mut rec);
        resize.cancel(&mut d, &mut rec);

        let b = &d.blocks()[0];
        assert_eq!(b.size(), (80.0, 40.0));
        assert!(!b.resizing);
        assert_eq!(rec.cancels, 1);
        assert!(!resize.is_active());
    }
}
