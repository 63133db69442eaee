//! Document model for the block canvas.
//!
//! A document is a fixed-size container plus an ordered list of blocks.
//! Blocks are absolutely positioned (`top`/`left` relative to the container)
//! and painted by `zIndex`, falling back to list order for ties.
//!
//! The block list lives behind an `Arc`. Live edits (drag frames, focus
//! flips) go through copy-on-write, so a snapshot held by the undo history
//! is never disturbed. Committed edits swap in a new list, which changes
//! the pointer identity consumers can diff on.

use crate::id::{BlockId, ComponentKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

// ─── Container ───────────────────────────────────────────────────────────

/// Drawing-surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub width: f32,
    pub height: f32,
}

impl Default for Container {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

// ─── Block ───────────────────────────────────────────────────────────────

/// One placed element on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(default = "BlockId::anonymous")]
    pub id: BlockId,
    pub key: ComponentKey,
    #[serde(default)]
    pub top: f32,
    #[serde(default)]
    pub left: f32,
    /// Absent until the host has measured the rendered block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default)]
    pub focus: bool,
    /// Set while a resize handle is being dragged.
    #[serde(skip)]
    pub resizing: bool,
    /// Recenter under the drop point on first measurement, then cleared.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub align_center: bool,
    #[serde(default)]
    pub props: BTreeMap<String, serde_json::Value>,
    /// Two-way binding wiring: model slot name → data field name.
    #[serde(default)]
    pub model: BTreeMap<String, String>,
}

impl Block {
    pub fn new(key: ComponentKey, top: f32, left: f32) -> Self {
        Self {
            id: BlockId::fresh(key),
            key,
            top,
            left,
            width: None,
            height: None,
            z_index: 0,
            focus: false,
            resizing: false,
            align_center: false,
            props: BTreeMap::new(),
            model: BTreeMap::new(),
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn focused(mut self) -> Self {
        self.focus = true;
        self
    }

    /// Measured size, or zero for a block that has not been measured yet.
    pub fn size(&self) -> (f32, f32) {
        (self.width.unwrap_or(0.0), self.height.unwrap_or(0.0))
    }

    pub fn position(&self) -> (f32, f32) {
        (self.top, self.left)
    }
}

// ─── Focus partition ─────────────────────────────────────────────────────

/// Focused / unfocused split of a document's blocks, in document order.
///
/// Always derived from the current block list; never cached.
#[derive(Debug, Clone, Default)]
pub struct FocusPartition<'a> {
    pub focused: Vec<&'a Block>,
    pub unfocused: Vec<&'a Block>,
}

impl FocusPartition<'_> {
    pub fn max_unfocused_z(&self) -> Option<i32> {
        self.unfocused.iter().map(|b| b.z_index).max()
    }

    pub fn min_unfocused_z(&self) -> Option<i32> {
        self.unfocused.iter().map(|b| b.z_index).min()
    }
}

// ─── Document ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub container: Container,
    #[serde(default)]
    blocks: Arc<Vec<Block>>,
}

impl Document {
    pub fn new(container: Container) -> Self {
        Self {
            container,
            blocks: Arc::new(Vec::new()),
        }
    }

    pub fn with_blocks(container: Container, blocks: Vec<Block>) -> Self {
        Self {
            container,
            blocks: Arc::new(blocks),
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Mutable access for live, in-place edits. Clones the list first if a
    /// snapshot still shares it.
    pub fn blocks_mut(&mut self) -> &mut Vec<Block> {
        Arc::make_mut(&mut self.blocks)
    }

    pub fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        if index >= self.blocks.len() {
            return None;
        }
        self.blocks_mut().get_mut(index)
    }

    pub fn position_of(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    /// Cheap handle to the current block list, for history snapshots.
    pub fn snapshot_blocks(&self) -> Arc<Vec<Block>> {
        Arc::clone(&self.blocks)
    }

    /// Swap in a block list wholesale.
    pub fn set_blocks(&mut self, blocks: Arc<Vec<Block>>) {
        self.blocks = blocks;
    }

    pub fn replace_blocks(&mut self, blocks: Vec<Block>) {
        self.blocks = Arc::new(blocks);
    }

    /// Append a block by building a new list, so the insertion reads as a
    /// committed change to reference-diffing observers.
    pub fn push_block(&mut self, block: Block) {
        let mut next = Vec::with_capacity(self.blocks.len() + 1);
        next.extend(self.blocks.iter().cloned());
        next.push(block);
        self.blocks = Arc::new(next);
    }

    /// Whether both documents hold the very same block list allocation.
    pub fn shares_blocks_with(&self, other: &Document) -> bool {
        Arc::ptr_eq(&self.blocks, &other.blocks)
    }

    pub fn is_snapshot_of(&self, blocks: &Arc<Vec<Block>>) -> bool {
        Arc::ptr_eq(&self.blocks, blocks)
    }

    pub fn focus_partition(&self) -> FocusPartition<'_> {
        let mut partition = FocusPartition::default();
        for block in self.blocks.iter() {
            if block.focus {
                partition.focused.push(block);
            } else {
                partition.unfocused.push(block);
            }
        }
        partition
    }

    pub fn focused_indices(&self) -> Vec<usize> {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.focus)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn has_focus(&self) -> bool {
        self.blocks.iter().any(|b| b.focus)
    }

    /// Clear every focus flag. Returns whether anything changed.
    pub fn clear_focus(&mut self) -> bool {
        if !self.has_focus() {
            return false;
        }
        for block in self.blocks_mut() {
            block.focus = false;
        }
        true
    }

    /// Record the host-measured size of a block.
    ///
    /// A block dropped from the palette carries `align_center`; its first
    /// measurement shifts it so its center sits on the drop point, and the
    /// flag is cleared so this happens once.
    pub fn measure_block(&mut self, index: usize, width: f32, height: f32) -> bool {
        let Some(block) = self.block_mut(index) else {
            return false;
        };
        block.width = Some(width);
        block.height = Some(height);
        if block.align_center {
            block.left -= width / 2.0;
            block.top -= height / 2.0;
            block.align_center = false;
            log::debug!("recentered {} under drop point", block.id);
        }
        true
    }
}
