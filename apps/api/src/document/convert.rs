//! Validation of upstream replies into a `Document`.
//!
//! Replies are deserialized into the loose `*Reply` shapes first, then converted
//! here. Any element that cannot be mapped rejects the whole reply; a document
//! is never built from part of a reply.
//!
//! Image elements that only carry a search query are converted with the
//! placeholder and listed in `Converted::image_queries`, so lookups start only
//! once the reply is known to be valid.

use serde::Deserialize;

use crate::document::geometry::{parse_percent, Frame, Position, Size};
use crate::document::node::{Content, Node, NodeKind};
use crate::document::style::StyleMap;
use crate::document::{Document, DocumentError};
use crate::requester::images::PLACEHOLDER_IMAGE;

/// A validated document plus the image lookups it still needs.
#[derive(Debug)]
pub struct Converted {
    pub document: Document,
    pub image_queries: Vec<ImageQuery>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageQuery {
    pub node_id: String,
    pub query: String,
}

fn pending_query(
    id: &str,
    src: &Option<String>,
    query: &Option<String>,
    queries: &mut Vec<ImageQuery>,
) {
    if src.is_some() {
        return;
    }
    if let Some(query) = query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        queries.push(ImageQuery {
            node_id: id.to_string(),
            query: query.to_string(),
        });
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Website reply
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct SiteReply {
    pub title: String,
    #[serde(default)]
    pub palette: StyleMap,
    pub pages: Vec<SitePageReply>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SitePageReply {
    pub name: String,
    #[serde(default)]
    pub style: StyleMap,
    #[serde(default)]
    pub sections: Vec<SiteSectionReply>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteSectionReply {
    #[serde(default)]
    pub style: StyleMap,
    #[serde(default)]
    pub columns: Vec<SiteColumnReply>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteColumnReply {
    #[serde(default)]
    pub style: StyleMap,
    #[serde(default)]
    pub elements: Vec<ElementReply>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElementReply {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: Option<String>,
    /// Image search query, used when `src` is absent.
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub style: StyleMap,
    #[serde(default, alias = "hoverStyle")]
    pub hover_style: StyleMap,
}

pub fn site_to_document(reply: SiteReply) -> Result<Converted, DocumentError> {
    let mut pages = Vec::with_capacity(reply.pages.len());
    let mut image_queries = Vec::new();

    for (pi, page) in reply.pages.into_iter().enumerate() {
        let page_id = format!("p{}", pi + 1);
        let mut page_node = Node::with_id(&page_id, NodeKind::Page).content(Content::text(page.name));
        page_node.style = page.style;

        for (si, section) in page.sections.into_iter().enumerate() {
            let section_id = format!("{page_id}-s{}", si + 1);
            let mut section_node = Node::with_id(&section_id, NodeKind::Section);
            section_node.style = section.style;

            for (ci, column) in section.columns.into_iter().enumerate() {
                let column_id = format!("{section_id}-c{}", ci + 1);
                let mut column_node = Node::with_id(&column_id, NodeKind::Column);
                column_node.style = column.style;

                for (ei, element) in column.elements.into_iter().enumerate() {
                    let element_id = format!("{column_id}-e{}", ei + 1);
                    let node = element_to_node(element_id, element, &mut image_queries)?;
                    column_node.children.push(node);
                }
                section_node.children.push(column_node);
            }
            page_node.children.push(section_node);
        }
        pages.push(page_node);
    }

    Ok(Converted {
        document: Document::new(reply.title, reply.palette, pages)?,
        image_queries,
    })
}

fn element_kind(raw: &str) -> Result<NodeKind, DocumentError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "heading" | "title" => Ok(NodeKind::Heading),
        "text" | "paragraph" => Ok(NodeKind::Text),
        "button" | "link" => Ok(NodeKind::Button),
        "image" => Ok(NodeKind::Image),
        other => Err(DocumentError::InvalidStructure(format!(
            "unknown element type '{other}'"
        ))),
    }
}

fn element_to_node(
    id: String,
    element: ElementReply,
    queries: &mut Vec<ImageQuery>,
) -> Result<Node, DocumentError> {
    let kind = element_kind(&element.kind)?;
    let content = match kind {
        NodeKind::Image => {
            pending_query(&id, &element.src, &element.query, queries);
            Content::image(
                element.src.unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
                element.alt.or(element.query).unwrap_or_default(),
            )
        }
        _ => Content::text(element.content.unwrap_or_default()),
    };

    let mut node = Node::with_id(id, kind).content(content);
    node.style = element.style;
    node.hover_style = element.hover_style;
    Ok(node)
}

// ────────────────────────────────────────────────────────────────────────────
// Presentation reply
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct PresentationReply {
    pub topic: String,
    pub slides: Vec<SlideReply>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlideReply {
    pub title: String,
    #[serde(default)]
    pub elements: Vec<SlideElementReply>,
}

/// Percentages arrive as `"43%"` strings but bare numbers are tolerated.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Percent {
    Number(f32),
    Text(String),
}

impl Percent {
    fn value(&self) -> Option<f32> {
        match self {
            Percent::Number(n) => n.is_finite().then_some(*n),
            Percent::Text(s) => parse_percent(s),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlideElementReply {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub src: Option<String>,
    pub x: Option<Percent>,
    pub y: Option<Percent>,
    pub width: Option<Percent>,
    pub height: Option<Percent>,
    #[serde(default, rename = "isTitle")]
    pub is_title: bool,
}

/// Default deck theme, rendered as `--bg`, `--text`, ... on the document root.
/// Slide styles refer to these names, so a theme edit restyles every slide.
const PRESENTATION_THEME: [(&str, &str); 6] = [
    ("bg", "#1e293b"),
    ("text", "#e2e8f0"),
    ("accent", "#38bdf8"),
    ("font-family", "'Inter', sans-serif"),
    ("title-font-size", "60px"),
    ("body-font-size", "28px"),
];

/// Slide canvas: a 16:9 positioning context for absolutely placed elements.
const SLIDE_CANVAS_STYLE: [(&str, &str); 5] = [
    ("position", "relative"),
    ("width", "100%"),
    ("aspect-ratio", "16 / 9"),
    ("background", "var(--bg)"),
    ("font-family", "var(--font-family)"),
];

pub fn presentation_to_document(reply: PresentationReply) -> Result<Converted, DocumentError> {
    let mut pages = Vec::with_capacity(reply.slides.len());
    let mut image_queries = Vec::new();

    for (si, slide) in reply.slides.into_iter().enumerate() {
        let slide_id = format!("slide-{}", si + 1);
        let mut canvas = Node::with_id(format!("{slide_id}-canvas"), NodeKind::Column);
        canvas.style = SLIDE_CANVAS_STYLE.into_iter().collect();

        for (ei, element) in slide.elements.into_iter().enumerate() {
            let id = format!("{slide_id}-e{}", ei + 1);
            let node = slide_element_to_node(id, &slide.title, element, &mut image_queries)?;
            canvas.children.push(node);
        }

        pages.push(
            Node::with_id(&slide_id, NodeKind::Page)
                .content(Content::text(slide.title))
                .child(Node::with_id(format!("{slide_id}-body"), NodeKind::Section).child(canvas)),
        );
    }

    Ok(Converted {
        document: Document::new(reply.topic, PRESENTATION_THEME.into_iter().collect(), pages)?,
        image_queries,
    })
}

fn slide_element_to_node(
    id: String,
    slide_title: &str,
    element: SlideElementReply,
    queries: &mut Vec<ImageQuery>,
) -> Result<Node, DocumentError> {
    let frame = slide_frame(&id, &element)?;
    let node = match element_kind(&element.kind)? {
        NodeKind::Image => {
            pending_query(&id, &element.src, &element.query, queries);
            Node::with_id(id, NodeKind::Image).content(Content::image(
                element.src.unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
                element.query.unwrap_or_else(|| slide_title.to_string()),
            ))
        }
        _ if element.is_title => Node::with_id(id, NodeKind::Heading)
            .content(Content::text(element.content.unwrap_or_default()))
            .style("color", "var(--accent)")
            .style("font-size", "var(--title-font-size)")
            .style("text-align", "center"),
        kind => Node::with_id(id, kind)
            .content(Content::Markup {
                html: element.content.unwrap_or_default(),
            })
            .style("color", "var(--text)")
            .style("font-size", "var(--body-font-size)"),
    };

    Ok(match frame {
        Some(frame) => node.frame(frame),
        None => node,
    })
}

/// All four coordinates, or none. A present but unreadable value rejects the reply.
fn slide_frame(id: &str, element: &SlideElementReply) -> Result<Option<Frame>, DocumentError> {
    let fields = [&element.x, &element.y, &element.width, &element.height];
    if fields.iter().all(|f| f.is_none()) {
        return Ok(None);
    }

    let mut values = [0.0f32; 4];
    for (slot, field) in values.iter_mut().zip(fields) {
        *slot = field.as_ref().and_then(Percent::value).ok_or_else(|| {
            DocumentError::InvalidGeometry(format!("element '{id}' has an incomplete frame"))
        })?;
    }

    Frame::new(
        Position {
            x: values[0],
            y: values[1],
        },
        Size {
            width: values[2],
            height: values[3],
        },
    )
    .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_json() -> &'static str {
        r##"{
            "title": "Jane Doe Photography",
            "palette": {"primary": "#63b3ed", "font-family": "Inter"},
            "pages": [
                {
                    "name": "Home",
                    "sections": [
                        {
                            "style": {"padding": "4rem"},
                            "columns": [
                                {"elements": [
                                    {"type": "heading", "content": "Light & Shadow", "style": {"font-size": "3rem", "color": "#fff"}},
                                    {"type": "button", "content": "Book", "hover_style": {"background": "#90cdf4"}}
                                ]},
                                {"elements": [
                                    {"type": "image", "src": "images/home.jpg", "alt": "Portrait"}
                                ]}
                            ]
                        }
                    ]
                },
                {"name": "Contact", "sections": []}
            ]
        }"##
    }

    #[test]
    fn test_site_reply_converts_with_positional_ids() {
        let reply: SiteReply = serde_json::from_str(site_json()).unwrap();
        let Converted {
            document: doc,
            image_queries,
        } = site_to_document(reply).unwrap();
        assert!(image_queries.is_empty());

        assert_eq!(doc.title(), "Jane Doe Photography");
        assert_eq!(doc.pages().len(), 2);
        let heading = doc.find_by_id("p1-s1-c1-e1").unwrap();
        assert_eq!(heading.kind, NodeKind::Heading);
        assert_eq!(heading.content, Content::text("Light & Shadow"));
        // upstream declaration order survives
        assert_eq!(heading.style.to_declarations(), "font-size: 3rem; color: #fff");
        assert_eq!(
            doc.find_by_id("p1-s1-c1-e2").unwrap().hover_style.get("background"),
            Some("#90cdf4")
        );
        assert_eq!(
            doc.find_by_id("p1-s1-c2-e1").unwrap().content,
            Content::image("images/home.jpg", "Portrait")
        );
    }

    #[test]
    fn test_unknown_element_type_rejects_whole_reply() {
        let json = r#"{"title": "x", "pages": [{"name": "Home", "sections": [{"columns": [{"elements": [
            {"type": "text", "content": "fine"},
            {"type": "carousel"}
        ]}]}]}]}"#;
        let reply: SiteReply = serde_json::from_str(json).unwrap();
        assert!(matches!(
            site_to_document(reply),
            Err(DocumentError::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_image_without_src_gets_placeholder() {
        let element = ElementReply {
            kind: "image".into(),
            content: None,
            query: Some("mountains".into()),
            src: None,
            alt: None,
            style: StyleMap::new(),
            hover_style: StyleMap::new(),
        };
        let mut queries = Vec::new();
        let node = element_to_node("i".into(), element, &mut queries).unwrap();
        assert_eq!(node.content, Content::image(PLACEHOLDER_IMAGE, "mountains"));
        assert_eq!(
            queries,
            vec![ImageQuery {
                node_id: "i".into(),
                query: "mountains".into()
            }]
        );
    }


    #[test]
    fn test_presentation_reply_converts_slides_to_pages() {
        let json = r#"{
            "topic": "Rust",
            "slides": [
                {"title": "Introduction", "elements": [
                    {"type": "text", "isTitle": true, "content": "Why Rust", "x": "4%", "y": "20%", "width": "43%", "height": "15%"},
                    {"type": "text", "isTitle": false, "content": "<p>Safe.</p><ul><li>Fast</li></ul>", "x": "4%", "y": "35%", "width": "43%", "height": "50%"},
                    {"type": "image", "src": "images/slide_0_element_2.jpg", "x": "51%", "y": "18%", "width": "45%", "height": "64%"}
                ]},
                {"title": "Q&A", "elements": [
                    {"type": "text", "isTitle": true, "content": "Questions?", "x": 10, "y": 40, "width": 80, "height": 20}
                ]}
            ]
        }"#;
        let reply: PresentationReply = serde_json::from_str(json).unwrap();
        let doc = presentation_to_document(reply).unwrap().document;

        assert_eq!(doc.pages().len(), 2);
        let title = doc.find_by_id("slide-1-e1").unwrap();
        assert_eq!(title.kind, NodeKind::Heading);
        assert_eq!(title.frame.unwrap().y, 20.0);
        let body = doc.find_by_id("slide-1-e2").unwrap();
        assert!(matches!(body.content, Content::Markup { .. }));
        let image = doc.find_by_id("slide-1-e3").unwrap();
        assert_eq!(image.frame.unwrap().width, 45.0);
        assert_eq!(doc.find_by_id("slide-2-e1").unwrap().frame.unwrap().x, 10.0);
        assert_eq!(
            doc.find_by_id("slide-1-canvas").unwrap().style.get("position"),
            Some("relative")
        );
    }

    #[test]
    fn test_partial_frame_rejects_reply() {
        let json = r#"{"topic": "t", "slides": [{"title": "a", "elements": [
            {"type": "text", "content": "x", "x": "4%", "y": "oops", "width": "10%", "height": "10%"}
        ]}]}"#;
        let reply: PresentationReply = serde_json::from_str(json).unwrap();
        assert!(matches!(
            presentation_to_document(reply),
            Err(DocumentError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_element_without_frame_is_flow_positioned() {
        let json = r#"{"topic": "t", "slides": [{"title": "a", "elements": [
            {"type": "text", "content": "x"}
        ]}]}"#;
        let reply: PresentationReply = serde_json::from_str(json).unwrap();
        let doc = presentation_to_document(reply).unwrap().document;
        assert!(doc.find_by_id("slide-1-e1").unwrap().frame.is_none());
    }

    #[test]
    fn test_presentation_is_seeded_with_a_theme() {
        let json = r#"{"topic": "t", "slides": [{"title": "a", "elements": [
            {"type": "text", "isTitle": true, "content": "Title"},
            {"type": "text", "content": "<p>body</p>"},
            {"type": "image", "query": "harbour at dusk"}
        ]}]}"#;
        let reply: PresentationReply = serde_json::from_str(json).unwrap();
        let converted = presentation_to_document(reply).unwrap();
        let doc = &converted.document;

        assert_eq!(doc.global_style().get("accent"), Some("#38bdf8"));
        assert_eq!(doc.global_style().get("title-font-size"), Some("60px"));
        let title = doc.find_by_id("slide-1-e1").unwrap();
        assert_eq!(title.style.get("color"), Some("var(--accent)"));
        let body = doc.find_by_id("slide-1-e2").unwrap();
        assert_eq!(body.style.get("color"), Some("var(--text)"));
        assert_eq!(
            converted.image_queries,
            vec![ImageQuery {
                node_id: "slide-1-e3".into(),
                query: "harbour at dusk".into()
            }]
        );
    }
}
