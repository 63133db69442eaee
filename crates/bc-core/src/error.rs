//! Errors raised while importing a document.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("malformed document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("container size must be finite and non-negative, got {width}x{height}")]
    InvalidContainer { width: f32, height: f32 },

    #[error("block {index} has non-finite geometry")]
    InvalidGeometry { index: usize },

    #[error("block id {0} appears more than once")]
    DuplicateBlockId(String),
}
