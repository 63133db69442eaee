//! JSON import/export of whole documents.
//!
//! The shape matches what hosts already store:
//!
//! ```json
//! { "container": { "width": 550, "height": 550 },
//!   "blocks": [ { "key": "text", "top": 100, "left": 100, "zIndex": 1 } ] }
//! ```
//!
//! Parsing validates geometry so a structurally invalid document never
//! reaches the command layer.

use crate::error::DocumentError;
use crate::model::Document;
use std::collections::HashSet;

/// Parse and validate a document.
pub fn parse_document(text: &str) -> Result<Document, DocumentError> {
    let doc: Document = serde_json::from_str(text)?;
    validate(&doc)?;
    Ok(doc)
}

/// Pretty-printed JSON for export.
pub fn emit_document(doc: &Document) -> Result<String, DocumentError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

fn validate(doc: &Document) -> Result<(), DocumentError> {
    let c = doc.container;
    if !(c.width.is_finite() && c.height.is_finite()) || c.width < 0.0 || c.height < 0.0 {
        return Err(DocumentError::InvalidContainer {
            width: c.width,
            height: c.height,
        });
    }

    let mut seen = HashSet::with_capacity(doc.blocks().len());
    for (index, block) in doc.blocks().iter().enumerate() {
        let (w, h) = block.size();
        if ![block.top, block.left, w, h].iter().all(|v| v.is_finite()) {
            return Err(DocumentError::InvalidGeometry { index });
        }
        if !seen.insert(block.id) {
            return Err(DocumentError::DuplicateBlockId(block.id.as_str().to_string()));
        }
    }
    Ok(())
}
