pub mod error;
pub mod id;
pub mod json;
pub mod model;
pub mod registry;

pub use error::DocumentError;
pub use id::{BlockId, ComponentKey};
pub use json::{emit_document, parse_document};
pub use model::*;
pub use registry::{ComponentRegistry, ComponentSpec, PropKind, PropSpec, ResizeHint};
