//! Editor events and the session that applies them.
//!
//! The editor frame never mutates the document directly: every interaction is
//! a message from a closed set, delivered over a channel to the single
//! `EditorSession` that owns the document.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use crate::document::geometry::{ContainerBounds, DragGesture, GestureMode, Position, Size};
use crate::document::model::{Document, PropertyPath};
use crate::document::node::Node;
use crate::document::DocumentError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EditorEvent {
    ElementSelected {
        id: String,
    },
    ContentChanged {
        id: String,
        content: String,
    },
    PropertyChanged {
        id: String,
        path: String,
        value: String,
    },
    ChildInserted {
        parent_id: String,
        node: Node,
    },
    NodeDeleted {
        id: String,
    },
    /// Sent once when a drag or resize gesture is released.
    GeometryCommitted {
        id: String,
        position: Position,
        size: Size,
    },
    /// Raw pointer delta of a released gesture; converted to percentages of
    /// `container` here rather than by the editor frame.
    GestureReleased {
        id: String,
        mode: GestureMode,
        dx_px: f32,
        dy_px: f32,
        container: ContainerBounds,
    },
    PageInserted {
        page: Node,
    },
    PageRemoved {
        id: String,
    },
    /// Theme edit. An empty value removes the key.
    GlobalStyleChanged {
        key: String,
        value: String,
    },
}

/// One editing session over one document.
#[derive(Debug, Clone)]
pub struct EditorSession {
    document: Document,
    selection: Option<String>,
}

impl EditorSession {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            selection: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn into_parts(self) -> (Document, Option<String>) {
        (self.document, self.selection)
    }

    /// Applies one event. Errors are returned immediately and never retried.
    pub fn apply(&mut self, event: EditorEvent) -> Result<(), DocumentError> {
        debug!("Applying editor event: {event:?}");
        match event {
            EditorEvent::ElementSelected { id } => {
                if self.document.find_by_id(&id).is_none() {
                    return Err(DocumentError::NotFound(id));
                }
                self.selection = Some(id);
            }
            EditorEvent::ContentChanged { id, content } => {
                self.document
                    .update_property(&id, &PropertyPath::Content, &content)?;
            }
            EditorEvent::PropertyChanged { id, path, value } => {
                let path: PropertyPath = path.parse()?;
                self.document.update_property(&id, &path, &value)?;
            }
            EditorEvent::ChildInserted { parent_id, node } => {
                let id = self.document.insert_child(&parent_id, node)?;
                self.selection = Some(id);
            }
            EditorEvent::NodeDeleted { id } => {
                self.document.delete_node(&id)?;
                self.drop_stale_selection();
            }
            EditorEvent::GeometryCommitted { id, position, size } => {
                self.document.move_and_resize(&id, position, size)?;
            }
            EditorEvent::GestureReleased {
                id,
                mode,
                dx_px,
                dy_px,
                container,
            } => {
                let origin = self
                    .document
                    .find_by_id(&id)
                    .ok_or_else(|| DocumentError::NotFound(id.clone()))?
                    .frame
                    .ok_or_else(|| {
                        DocumentError::InvalidGeometry(format!("node '{id}' is not positioned"))
                    })?;
                let mut gesture = DragGesture::begin(origin, container, mode)?;
                gesture.update(dx_px, dy_px);
                let (position, size) = gesture.commit();
                self.document.move_and_resize(&id, position, size)?;
            }
            EditorEvent::PageInserted { page } => {
                let id = self.document.insert_page(page)?;
                self.selection = Some(id);
            }
            EditorEvent::PageRemoved { id } => {
                self.document.remove_page(&id)?;
                self.drop_stale_selection();
            }
            EditorEvent::GlobalStyleChanged { key, value } => {
                self.document.set_global_style(&key, &value)?;
            }
        }
        Ok(())
    }

    // the selection may have been inside a removed subtree
    fn drop_stale_selection(&mut self) {
        if let Some(selected) = &self.selection {
            if self.document.find_by_id(selected).is_none() {
                self.selection = None;
            }
        }
    }

    /// Consumes events until every sender is dropped, then returns the session.
    /// The first failing event stops the session and is returned.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<EditorEvent>,
    ) -> Result<Self, DocumentError> {
        while let Some(event) = events.recv().await {
            self.apply(event)?;
        }
        Ok(self)
    }
}
