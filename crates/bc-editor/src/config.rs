//! Editor tuning knobs.

use crate::input::Modifier;
use serde::{Deserialize, Serialize};

/// Host-supplied editor configuration.
///
/// Every field has a default, so a host can deserialize a partial JSON
/// object (`{ "snapThreshold": 8 }`) and get the rest filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Distance in pixels within which a dragged block snaps to a guide.
    pub snap_threshold: f32,
    /// Maximum number of undo steps kept; the oldest are dropped first.
    pub history_depth: usize,
    /// `zIndex` given to blocks dropped from the palette.
    pub drop_z_index: i32,
    /// Holding this modifier freezes the selection during a drag.
    pub freeze_modifier: Modifier,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_threshold: 5.0,
            history_depth: 200,
            drop_z_index: 1,
            freeze_modifier: Modifier::Alt,
        }
    }
}

impl EditorConfig {
    pub fn from_json(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| format!("invalid editor config: {e}"))
    }
}
