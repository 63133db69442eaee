//! Canvas drag with alignment guides.
//!
//! Pressing on a focused block arms a drag anchored on that block. The
//! unfocused blocks and the container become alignment references: each
//! contributes five candidate lines per axis (top-to-top, top-to-bottom,
//! center-to-center, bottom-to-top, bottom-to-bottom, and the same for
//! left/right). While the pointer moves, the anchor's raw position is
//! compared against the candidates and hard-snaps to the first one within
//! the threshold. The resulting offset is applied to every focused block
//! from its own start position, so a multi-selection moves rigidly.
//!
//! ```text
//! idle ──press──▶ armed ──first move──▶ dragging ──release──▶ idle
//!                   └──────────release (no gesture)──────────▶ idle
//! ```

use crate::gesture::GestureListener;
use crate::input::{Modifier, Modifiers};
use bc_core::{Block, BlockId, Container, Document};

/// Axis-aligned box used as an alignment reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn of_block(block: &Block) -> Self {
        let (width, height) = block.size();
        Self {
            top: block.top,
            left: block.left,
            width,
            height,
        }
    }

    pub fn of_container(container: &Container) -> Self {
        Self {
            top: 0.0,
            left: 0.0,
            width: container.width,
            height: container.height,
        }
    }
}

/// One candidate: where the anchor goes if it snaps (`snap`) and where the
/// guide is drawn (`show`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignLine {
    pub snap: f32,
    pub show: f32,
}

/// Pooled candidates for one gesture. `y` holds horizontal guides (snapping
/// `top`), `x` holds vertical guides (snapping `left`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignLines {
    pub y: Vec<AlignLine>,
    pub x: Vec<AlignLine>,
}

impl AlignLines {
    /// Candidates for an anchor of size `(width, height)` against each
    /// reference, in reference order.
    pub fn build(anchor_size: (f32, f32), references: &[Rect]) -> Self {
        let (bw, bh) = anchor_size;
        let mut lines = Self {
            y: Vec::with_capacity(references.len() * 5),
            x: Vec::with_capacity(references.len() * 5),
        };
        for r in references {
            let line = |snap, show| AlignLine { snap, show };

            lines.y.push(line(r.top, r.top));
            lines.y.push(line(r.top - bh, r.top));
            lines.y.push(line(r.top + r.height / 2.0 - bh / 2.0, r.top + r.height / 2.0));
            lines.y.push(line(r.top + r.height, r.top + r.height));
            lines.y.push(line(r.top + r.height - bh, r.top + r.height));

            lines.x.push(line(r.left, r.left));
            lines.x.push(line(r.left - bw, r.left));
            lines.x.push(line(r.left + r.width / 2.0 - bw / 2.0, r.left + r.width / 2.0));
            lines.x.push(line(r.left + r.width, r.left + r.width));
            lines.x.push(line(r.left + r.width - bw, r.left + r.width));
        }
        lines
    }
}

/// First candidate within `threshold` of `pos`. Generation order breaks
/// ties, not distance.
pub fn find_snap(lines: &[AlignLine], pos: f32, threshold: f32) -> Option<AlignLine> {
    lines
        .iter()
        .find(|line| (line.snap - pos).abs() < threshold)
        .copied()
}

/// Guide positions to render: `x` is a vertical line, `y` a horizontal one.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Guides {
    pub x: Option<f32>,
    pub y: Option<f32>,
}

struct DragState {
    start_x: f32,
    start_y: f32,
    start_top: f32,
    start_left: f32,
    /// `(id, top, left)` of every focused block at press time.
    originals: Vec<(BlockId, f32, f32)>,
    lines: AlignLines,
    dragging: bool,
}

pub struct DragEngine {
    state: Option<DragState>,
    guides: Guides,
    threshold: f32,
    freeze: Modifier,
}

impl DragEngine {
    pub fn new(threshold: f32, freeze: Modifier) -> Self {
        Self {
            state: None,
            guides: Guides::default(),
            threshold,
            freeze,
        }
    }

    /// Arm a drag anchored on block `anchor`, with the pointer at `(x, y)`.
    /// Returns `false` if there is no such block.
    pub fn press(&mut self, doc: &Document, anchor: usize, x: f32, y: f32) -> bool {
        let Some(anchor_block) = doc.block(anchor) else {
            return false;
        };

        let partition = doc.focus_partition();
        let mut references: Vec<Rect> = partition
            .unfocused
            .iter()
            .map(|b| Rect::of_block(b))
            .collect();
        references.push(Rect::of_container(&doc.container));
        let lines = AlignLines::build(anchor_block.size(), &references);

        let originals = doc
            .blocks()
            .iter()
            .filter(|b| b.focus)
            .map(|b| (b.id, b.top, b.left))
            .collect();

        log::trace!(
            "drag armed on {} with {} references",
            anchor_block.id,
            references.len()
        );
        self.state = Some(DragState {
            start_x: x,
            start_y: y,
            start_top: anchor_block.top,
            start_left: anchor_block.left,
            originals,
            lines,
            dragging: false,
        });
        true
    }

    /// Pointer moved to `(x, y)`.
    pub fn pointer_move(
        &mut self,
        doc: &mut Document,
        x: f32,
        y: f32,
        modifiers: Modifiers,
        listener: &mut dyn GestureListener,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if modifiers.is_held(self.freeze) {
            return;
        }
        if !state.dragging {
            state.dragging = true;
            log::debug!("drag gesture started");
            listener.gesture_start(doc);
        }

        let mut top = state.start_top + (y - state.start_y);
        let mut left = state.start_left + (x - state.start_x);

        self.guides.y = find_snap(&state.lines.y, top, self.threshold).map(|line| {
            top = line.snap;
            line.show
        });
        self.guides.x = find_snap(&state.lines.x, left, self.threshold).map(|line| {
            left = line.snap;
            line.show
        });
        log::trace!("drag to top={top} left={left} guides={:?}", self.guides);

        let dy = top - state.start_top;
        let dx = left - state.start_left;
        for &(id, start_top, start_left) in &state.originals {
            let Some(i) = doc.position_of(id) else {
                continue;
            };
            if let Some(block) = doc.block_mut(i) {
                block.top = start_top + dy;
                block.left = start_left + dx;
            }
        }
    }

    /// Pointer released. Ends the gesture if the pointer ever moved.
    pub fn release(&mut self, doc: &mut Document, listener: &mut dyn GestureListener) {
        let Some(state) = self.state.take() else {
            return;
        };
        self.guides = Guides::default();
        if state.dragging {
            log::debug!("drag gesture ended");
            listener.gesture_end(doc);
        }
    }

    /// Abandon any armed or running drag. A started gesture is reported
    /// as cancelled, so the listener can put the blocks back.
    pub fn cancel(&mut self, doc: &mut Document, listener: &mut dyn GestureListener) {
        self.guides = Guides::default();
        if let Some(state) = self.state.take()
            && state.dragging
        {
            log::debug!("drag gesture cancelled");
            listener.gesture_cancel(doc);
        }
    }

    pub fn guides(&self) -> Guides {
        self.guides
    }

    pub fn is_armed(&self) -> bool {
        self.state.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.dragging)
    }

    /// Candidates computed for the current gesture.
    pub fn lines(&self) -> Option<&AlignLines> {
        self.state.as_ref().map(|s| &s.lines)
    }
}
