// Document Model: the typed node tree behind the visual editor.
// Upstream JSON is validated into this model at the boundary (convert.rs);
// editor interactions arrive as events (events.rs).

pub mod convert;
pub mod events;
pub mod geometry;
pub mod model;
pub mod node;
pub mod style;

use thiserror::Error;

pub use events::{EditorEvent, EditorSession};
pub use model::{Document, PropertyPath};
pub use node::{Content, Node, NodeKind};
pub use style::StyleMap;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("node '{0}' not found")]
    NotFound(String),

    #[error("node '{id}' is a {kind} and cannot hold {child} nodes")]
    NotAContainer {
        id: String,
        kind: &'static str,
        child: &'static str,
    },

    #[error("node id '{0}' is already used in this document")]
    DuplicateId(String),

    #[error("node '{0}' is a page and cannot be deleted as an element")]
    Protected(String),

    #[error("invalid property path: {0}")]
    InvalidPath(String),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid document structure: {0}")]
    InvalidStructure(String),
}
