//! Renderer: serializes a `Document` to HTML.
//!
//! Output is a pure function of the document and the mode: no timestamps,
//! generated ids, or hash-ordered iteration. Style declarations are emitted in
//! map insertion order, hover styles in a separate stylesheet keyed by node id.

use serde::{Deserialize, Serialize};

use crate::document::{Content, Document, Node, NodeKind};

pub mod assets;
pub mod html;

use assets::{
    BASE_CSS, EXPORT_SCRIPT, INTER_FONT_CSS, PREVIEW_CSS, PREVIEW_SCRIPT, TAILWIND_CDN,
};
use html::{
    css_ident, css_value, escape_attr, escape_text, id_selector, important_rule_body, Markup,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Instrumented markup for the live editor.
    Preview,
    /// Clean, self-contained markup for download.
    Export,
}

pub fn render(document: &Document, mode: RenderMode) -> String {
    let mut m = Markup::new();

    m.line(0, "<!DOCTYPE html>");
    m.line(0, "<html lang=\"en\">");
    m.line(0, "<head>");
    m.line(1, "<meta charset=\"UTF-8\">");
    m.line(
        1,
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">",
    );
    m.line(1, &format!("<title>{}</title>", escape_text(document.title())));
    m.line(1, &format!("<script src=\"{TAILWIND_CDN}\"></script>"));
    m.line(
        1,
        &format!("<link href=\"{}\" rel=\"stylesheet\">", escape_attr(INTER_FONT_CSS)),
    );

    m.line(1, "<style>");
    if !document.global_style().is_empty() {
        m.line(0, &format!(":root {{ {} }}", root_properties(document)));
    }
    m.line(0, BASE_CSS);
    if mode == RenderMode::Preview {
        m.line(0, PREVIEW_CSS);
    }
    m.line(1, "</style>");

    let hover_rules = hover_rules(document);
    if !hover_rules.is_empty() {
        m.line(1, "<style id=\"sw-hover\">");
        for rule in &hover_rules {
            m.line(0, rule);
        }
        m.line(1, "</style>");
    }
    m.line(0, "</head>");

    m.line(0, "<body>");
    render_nav(&mut m, document);
    m.line(0, "<main>");
    for page in document.pages() {
        render_node(&mut m, page, 1, mode);
    }
    m.line(0, "</main>");

    m.line(0, "<script>");
    m.line(
        0,
        match mode {
            RenderMode::Preview => PREVIEW_SCRIPT,
            RenderMode::Export => EXPORT_SCRIPT,
        },
    );
    m.line(0, "</script>");
    m.line(0, "</body>");
    m.raw("</html>\n");

    m.finish()
}

/// Global style keys become CSS custom properties.
fn root_properties(document: &Document) -> String {
    document
        .global_style()
        .iter()
        .map(|(k, v)| {
            let name = css_ident(k.trim_start_matches('-'));
            format!("--{name}: {};", css_value(v))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn hover_rules(document: &Document) -> Vec<String> {
    let mut rules = Vec::new();
    for page in document.pages() {
        page.walk(&mut |node| {
            if !node.hover_style.is_empty() {
                rules.push(format!(
                    "{}:hover {{ {} }}",
                    id_selector(&node.id),
                    important_rule_body(&node.hover_style)
                ));
            }
        });
    }
    rules
}

fn render_nav(m: &mut Markup, document: &Document) {
    if document.pages().is_empty() {
        return;
    }
    m.line(0, "<nav class=\"sw-nav\">");
    m.line(
        1,
        &format!(
            "<span class=\"sw-brand\">{}</span>",
            escape_text(document.title())
        ),
    );
    for page in document.pages() {
        let label = match page.content.label() {
            "" => page.id.as_str(),
            label => label,
        };
        m.line(
            1,
            &format!(
                "<a href=\"#{}\">{}</a>",
                escape_attr(&page.id),
                escape_text(label)
            ),
        );
    }
    m.line(0, "</nav>");
}

fn render_node(m: &mut Markup, node: &Node, depth: usize, mode: RenderMode) {
    let attrs = attributes(node, mode);

    match node.kind {
        NodeKind::Page | NodeKind::Section | NodeKind::Column => {
            let (tag, class) = match node.kind {
                NodeKind::Page => ("section", "sw-page"),
                NodeKind::Section => ("div", "sw-section"),
                _ => ("div", "sw-column"),
            };
            m.line(depth, &format!("<{tag} class=\"{class}\"{attrs}>"));
            for child in &node.children {
                render_node(m, child, depth + 1, mode);
            }
            m.line(depth, &format!("</{tag}>"));
        }
        NodeKind::Image => {
            let (src, alt) = match &node.content {
                Content::Image { src, alt } => (src.as_str(), alt.as_str()),
                _ => ("", ""),
            };
            m.line(
                depth,
                &format!(
                    "<img src=\"{}\" alt=\"{}\"{attrs}>",
                    escape_attr(src),
                    escape_attr(alt)
                ),
            );
        }
        NodeKind::Heading | NodeKind::Text | NodeKind::Button => {
            let (tag, class) = match (node.kind, &node.content) {
                (NodeKind::Heading, _) => ("h2", ""),
                (NodeKind::Button, _) => ("button", " class=\"sw-button\""),
                (_, Content::Markup { .. }) => ("div", ""),
                _ => ("p", ""),
            };
            let body = match &node.content {
                Content::Markup { html } => html.clone(),
                other => escape_text(other.label()),
            };
            m.line(depth, &format!("<{tag}{class}{attrs}>{body}</{tag}>"));
        }
    }
}

/// `id`, editor instrumentation (preview only), and the inline `style`.
fn attributes(node: &Node, mode: RenderMode) -> String {
    let mut attrs = format!(" id=\"{}\"", escape_attr(&node.id));

    if mode == RenderMode::Preview {
        attrs.push_str(&format!(
            " data-node-id=\"{}\" data-kind=\"{}\"",
            escape_attr(&node.id),
            node.kind.as_str()
        ));
        if node.kind.is_editable_text() && matches!(node.content, Content::Text { .. }) {
            attrs.push_str(" contenteditable=\"true\"");
        }
    }
    if node.kind == NodeKind::Button {
        attrs.push_str(" type=\"button\"");
    }

    let style = inline_style(node);
    if !style.is_empty() {
        attrs.push_str(&format!(" style=\"{}\"", escape_attr(&style)));
    }
    attrs
}

fn inline_style(node: &Node) -> String {
    let mut parts = Vec::new();

    if let Some(frame) = &node.frame {
        parts.push(frame.to_declarations());
    }
    // framed children are positioned against their parent
    if node.style.get("position").is_none() && node.children.iter().any(|c| c.frame.is_some()) {
        parts.push("position: relative".to_string());
    }
    if !node.style.is_empty() {
        parts.push(node.style.to_declarations());
    }
    parts.join("; ")
}
