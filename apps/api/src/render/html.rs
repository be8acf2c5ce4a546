//! Escaping and small markup helpers.

use crate::document::StyleMap;

/// Escapes text content.
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escapes a value placed inside a double-quoted attribute.
pub fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;").replace('\'', "&#39;")
}

/// Value written into a `<style>` block: characters that could close the
/// block or open a new rule are dropped.
pub fn css_value(s: &str) -> String {
    s.chars().filter(|c| !matches!(c, '<' | '>' | '{' | '}')).collect()
}

/// Property name written into a `<style>` block.
pub fn css_ident(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// `prop: value !important; ...` in map order. Hover rules must win over the
/// node's inline style, which otherwise takes precedence over any stylesheet.
pub fn important_rule_body(style: &StyleMap) -> String {
    style
        .iter()
        .map(|(k, v)| {
            let value = css_value(v);
            let value = value.trim_end();
            let value = value.strip_suffix("!important").unwrap_or(value).trim_end();
            format!("{}: {value} !important;", css_ident(k))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Attribute selector matching an element id, safe for any id string.
pub fn id_selector(id: &str) -> String {
    let escaped = css_value(id).replace('\\', "\\\\").replace('"', "\\\"");
    format!("[id=\"{escaped}\"]")
}

/// Line-oriented buffer with two-space indentation.
#[derive(Default)]
pub struct Markup {
    out: String,
}

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    pub fn raw(&mut self, text: &str) {
        self.out.push_str(text);
    }

    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("<script>"), "&lt;script&gt;");
        assert_eq!(escape_text("a & b"), "a &amp; b");
    }

    #[test]
    fn test_escape_attr_quotes() {
        assert_eq!(escape_attr("\"quoted\""), "&quot;quoted&quot;");
        assert_eq!(escape_attr("it's"), "it&#39;s");
    }

    #[test]
    fn test_rule_body_cannot_break_out_of_style_block() {
        let style: StyleMap = [("color", "red}</style><script>")].into_iter().collect();
        assert_eq!(important_rule_body(&style), "color: red/stylescript !important;");
    }

    #[test]
    fn test_rule_body_does_not_double_important() {
        let style: StyleMap = [("color", "red !important"), ("margin", "0")]
            .into_iter()
            .collect();
        assert_eq!(
            important_rule_body(&style),
            "color: red !important; margin: 0 !important;"
        );
    }

    #[test]
    fn test_id_selector_escapes_quotes() {
        assert_eq!(id_selector("a\"b"), "[id=\"a\\\"b\"]");
    }

    #[test]
    fn test_markup_indents() {
        let mut m = Markup::new();
        m.line(0, "<div>");
        m.line(1, "<p>x</p>");
        m.line(0, "</div>");
        assert_eq!(m.finish(), "<div>\n  <p>x</p>\n</div>\n");
    }
}
