//! Node kinds, content payloads and the node tree.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::geometry::Frame;
use crate::document::style::StyleMap;

/// The closed set of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Page,
    Section,
    Column,
    Heading,
    Text,
    Button,
    Image,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Page => "page",
            NodeKind::Section => "section",
            NodeKind::Column => "column",
            NodeKind::Heading => "heading",
            NodeKind::Text => "text",
            NodeKind::Button => "button",
            NodeKind::Image => "image",
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Page | NodeKind::Section | NodeKind::Column)
    }

    /// Nesting is strict: page → section → column → leaf.
    pub fn accepts(self, child: NodeKind) -> bool {
        match self {
            NodeKind::Page => child == NodeKind::Section,
            NodeKind::Section => child == NodeKind::Column,
            NodeKind::Column => !child.is_container(),
            _ => false,
        }
    }

    /// Leaves whose text the editor can change in place.
    pub fn is_editable_text(self) -> bool {
        matches!(self, NodeKind::Heading | NodeKind::Text | NodeKind::Button)
    }
}

/// What a node displays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    #[default]
    Empty,
    Text {
        text: String,
    },
    /// A trusted markup fragment produced upstream (paragraphs and lists on slides).
    Markup {
        html: String,
    },
    Image {
        src: String,
        #[serde(default)]
        alt: String,
    },
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    pub fn image(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Content::Image {
            src: src.into(),
            alt: alt.into(),
        }
    }

    /// Plain text of the payload, used for labels such as nav links.
    pub fn label(&self) -> &str {
        match self {
            Content::Empty => "",
            Content::Text { text } => text,
            Content::Markup { html } => html,
            Content::Image { alt, .. } => alt,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Left empty by the editor for new nodes; filled in on insert.
    #[serde(default)]
    pub id: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub style: StyleMap,
    #[serde(default, skip_serializing_if = "StyleMap::is_empty")]
    pub hover_style: StyleMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<Frame>,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    pub fn with_id(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            content: Content::Empty,
            style: StyleMap::new(),
            hover_style: StyleMap::new(),
            frame: None,
            children: Vec::new(),
        }
    }

    pub fn content(mut self, content: Content) -> Self {
        self.content = content;
        self
    }

    pub fn style(mut self, key: &str, value: &str) -> Self {
        self.style.set(key, value);
        self
    }

    pub fn frame(mut self, frame: Frame) -> Self {
        self.frame = Some(frame);
        self
    }

    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Gives every node in the subtree that has a blank id a fresh
    /// `{kind}-{uuid}` one.
    pub fn ensure_ids(&mut self) {
        if self.id.trim().is_empty() {
            self.id = format!("{}-{}", self.kind.as_str(), Uuid::new_v4().simple());
        }
        for child in &mut self.children {
            child.ensure_ids();
        }
    }

    /// Depth-first, parent before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Detaches the descendant `id` (with its subtree) from wherever it sits below `self`.
    pub fn detach(&mut self, id: &str) -> Option<Node> {
        if let Some(index) = self.children.iter().position(|c| c.id == id) {
            return Some(self.children.remove(index));
        }
        self.children.iter_mut().find_map(|c| c.detach(id))
    }
}
