//! The document tree and its mutations.
//!
//! Invariants held after every operation:
//! - every node id is non-empty and unique across the document
//! - top-level nodes are pages; nesting follows `NodeKind::accepts`
//! - the tree is acyclic: inserts only add fresh subtrees, nothing is re-parented

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::geometry::{Frame, Position, Size};
use crate::document::node::{Content, Node, NodeKind};
use crate::document::style::StyleMap;
use crate::document::DocumentError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DocumentData")]
pub struct Document {
    title: String,
    /// Shared palette and typography, rendered as CSS custom properties.
    global_style: StyleMap,
    pages: Vec<Node>,
}

/// Unvalidated wire form of a `Document`.
#[derive(Debug, Deserialize)]
struct DocumentData {
    #[serde(default)]
    title: String,
    #[serde(default)]
    global_style: StyleMap,
    #[serde(default)]
    pages: Vec<Node>,
}

impl TryFrom<DocumentData> for Document {
    type Error = DocumentError;

    fn try_from(data: DocumentData) -> Result<Self, Self::Error> {
        Document::new(data.title, data.global_style, data.pages)
    }
}

impl Document {
    pub fn new(
        title: impl Into<String>,
        global_style: StyleMap,
        pages: Vec<Node>,
    ) -> Result<Self, DocumentError> {
        let mut seen = HashSet::new();
        for page in &pages {
            if page.kind != NodeKind::Page {
                return Err(DocumentError::InvalidStructure(format!(
                    "top-level node '{}' is a {}, expected a page",
                    page.id,
                    page.kind.as_str()
                )));
            }
            validate_subtree(page, &mut seen)?;
        }

        Ok(Self {
            title: title.into(),
            global_style,
            pages,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn global_style(&self) -> &StyleMap {
        &self.global_style
    }

    pub fn pages(&self) -> &[Node] {
        &self.pages
    }

    /// Sets one palette entry; an empty value removes it.
    pub fn set_global_style(&mut self, key: &str, value: &str) -> Result<(), DocumentError> {
        if !is_style_key(key) {
            return Err(DocumentError::InvalidPath(format!("global.{key}")));
        }
        apply_style(&mut self.global_style, key, value);
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Node> {
        self.pages.iter().find_map(|p| p.find(id))
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.pages.iter_mut().find_map(|p| p.find_mut(id))
    }

    fn ids(&self) -> HashSet<String> {
        let mut ids = HashSet::new();
        for page in &self.pages {
            page.walk(&mut |n| {
                ids.insert(n.id.clone());
            });
        }
        ids
    }

    /// Appends a new page at the end of the document and returns its id.
    pub fn insert_page(&mut self, mut page: Node) -> Result<String, DocumentError> {
        if page.kind != NodeKind::Page {
            return Err(DocumentError::InvalidStructure(format!(
                "'{}' is a {}, expected a page",
                page.id,
                page.kind.as_str()
            )));
        }
        page.ensure_ids();
        let mut seen = self.ids();
        validate_subtree(&page, &mut seen)?;
        let id = page.id.clone();
        self.pages.push(page);
        Ok(id)
    }

    /// Removes a whole page. This is the only way pages leave the document.
    pub fn remove_page(&mut self, id: &str) -> Result<Node, DocumentError> {
        let index = self
            .pages
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| DocumentError::NotFound(id.to_string()))?;
        Ok(self.pages.remove(index))
    }

    /// Appends `node` (a fresh subtree) to the children of `parent_id` and
    /// returns its id. Blank ids in the subtree are generated.
    pub fn insert_child(&mut self, parent_id: &str, mut node: Node) -> Result<String, DocumentError> {
        let parent = self
            .find_by_id(parent_id)
            .ok_or_else(|| DocumentError::NotFound(parent_id.to_string()))?;

        if !parent.kind.accepts(node.kind) {
            return Err(DocumentError::NotAContainer {
                id: parent_id.to_string(),
                kind: parent.kind.as_str(),
                child: node.kind.as_str(),
            });
        }

        node.ensure_ids();
        let mut seen = self.ids();
        validate_subtree(&node, &mut seen)?;

        let id = node.id.clone();
        if let Some(parent) = self.find_mut(parent_id) {
            parent.children.push(node);
        }
        Ok(id)
    }

    /// Removes `id` and its entire subtree. Pages are protected; use `remove_page`.
    pub fn delete_node(&mut self, id: &str) -> Result<Node, DocumentError> {
        if self.pages.iter().any(|p| p.id == id) {
            return Err(DocumentError::Protected(id.to_string()));
        }
        self.pages
            .iter_mut()
            .find_map(|p| p.detach(id))
            .ok_or_else(|| DocumentError::NotFound(id.to_string()))
    }

    /// Sets the content or a style/hover-style key of `id`. Values are opaque
    /// strings; an empty value removes a style key.
    pub fn update_property(
        &mut self,
        id: &str,
        path: &PropertyPath,
        value: &str,
    ) -> Result<(), DocumentError> {
        let node = self
            .find_mut(id)
            .ok_or_else(|| DocumentError::NotFound(id.to_string()))?;

        match path {
            PropertyPath::Content => set_content(node, value),
            PropertyPath::Alt => match &mut node.content {
                Content::Image { alt, .. } => {
                    *alt = value.to_string();
                    Ok(())
                }
                _ => Err(DocumentError::InvalidPath(format!(
                    "alt is only defined on images, '{id}' is a {}",
                    node.kind.as_str()
                ))),
            },
            PropertyPath::Style(key) => {
                apply_style(&mut node.style, key, value);
                Ok(())
            }
            PropertyPath::Hover(key) => {
                apply_style(&mut node.hover_style, key, value);
                Ok(())
            }
        }
    }

    /// Commits a drag/resize result (percentages of the parent bounds).
    pub fn move_and_resize(
        &mut self,
        id: &str,
        position: Position,
        size: Size,
    ) -> Result<(), DocumentError> {
        let frame = Frame::new(position, size)?;
        let node = self
            .find_mut(id)
            .ok_or_else(|| DocumentError::NotFound(id.to_string()))?;
        if node.kind == NodeKind::Page {
            return Err(DocumentError::InvalidGeometry(format!(
                "page '{id}' cannot be positioned"
            )));
        }
        node.frame = Some(frame);
        Ok(())
    }
}

fn set_content(node: &mut Node, value: &str) -> Result<(), DocumentError> {
    node.content = match (&node.kind, &node.content) {
        (NodeKind::Image, Content::Image { alt, .. }) => Content::image(value, alt.clone()),
        (NodeKind::Image, _) => Content::image(value, ""),
        (_, Content::Markup { .. }) => Content::Markup {
            html: value.to_string(),
        },
        (kind, _) if kind.is_editable_text() || *kind == NodeKind::Page => Content::text(value),
        (kind, _) => {
            return Err(DocumentError::InvalidPath(format!(
                "content is not editable on a {}",
                kind.as_str()
            )))
        }
    };
    Ok(())
}

fn apply_style(style: &mut StyleMap, key: &str, value: &str) {
    if value.is_empty() {
        style.remove(key);
    } else {
        style.set(key, value);
    }
}

fn validate_subtree(node: &Node, seen: &mut HashSet<String>) -> Result<(), DocumentError> {
    if node.id.trim().is_empty() {
        return Err(DocumentError::InvalidStructure(format!(
            "a {} node has an empty id",
            node.kind.as_str()
        )));
    }
    if !seen.insert(node.id.clone()) {
        return Err(DocumentError::DuplicateId(node.id.clone()));
    }
    if let Some(frame) = &node.frame {
        frame.check()?;
    }
    for child in &node.children {
        if !node.kind.accepts(child.kind) {
            return Err(DocumentError::InvalidStructure(format!(
                "a {} ('{}') cannot contain a {} ('{}')",
                node.kind.as_str(),
                node.id,
                child.kind.as_str(),
                child.id
            )));
        }
        validate_subtree(child, seen)?;
    }
    Ok(())
}

/// Addresses one editable property of a node: `content`, `alt`,
/// `style.<key>` or `hover.<key>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyPath {
    Content,
    Alt,
    Style(String),
    Hover(String),
}

impl FromStr for PropertyPath {
    type Err = DocumentError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let invalid = || DocumentError::InvalidPath(path.to_string());
        match path.split_once('.') {
            None if path == "content" => Ok(PropertyPath::Content),
            None if path == "alt" => Ok(PropertyPath::Alt),
            Some(("style", key)) if is_style_key(key) => Ok(PropertyPath::Style(key.to_string())),
            Some(("hover", key)) if is_style_key(key) => Ok(PropertyPath::Hover(key.to_string())),
            _ => Err(invalid()),
        }
    }
}

fn is_style_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
