// Prompt templates for the planning flows.
// Shared instruction fragments live in requester::prompts.

/// Page-name suggestion. Replace `{description}` before sending.
pub const SUGGEST_PAGES_TEMPLATE: &str = "\
For a website described as \"{description}\", suggest 4 to 6 essential page names. \
Examples: Home, About Us, Services, Portfolio, Blog, Contact.";

/// Subtopic suggestion. Replace `{topic}` before sending.
pub const SUGGEST_SUBTOPICS_TEMPLATE: &str = "\
For a presentation on \"{topic}\", suggest 6 core subtopics. \
Exclude \"Introduction\" and \"Conclusion\". \
Example: Subtopic 1, Subtopic 2, Subtopic 3";

/// Website generation. Replace `{description}` and `{pages}` before sending.
pub const WEBSITE_TEMPLATE: &str = r##"You are an expert web designer. Design a complete, responsive, single-page website.

Website description: "{description}"
Pages to create, in this order: {pages}

Return a JSON object with this EXACT schema (no extra fields):
{
  "title": "Site title shown in the navigation bar",
  "palette": {
    "primary": "#63b3ed",
    "background": "#0f172a",
    "text": "#e2e8f0",
    "font-family": "Inter"
  },
  "pages": [
    {
      "name": "About",
      "style": {"background": "#111827"},
      "sections": [
        {
          "style": {"padding": "4rem 0"},
          "columns": [
            {
              "style": {},
              "elements": [
                {"type": "heading", "content": "Our Mission", "style": {"font-size": "2.5rem"}},
                {"type": "text", "content": "A short, specific paragraph."},
                {"type": "image", "query": "team working in a bright office", "alt": "Our team"},
                {"type": "button", "content": "Get in touch", "hoverStyle": {"opacity": "0.85"}}
              ]
            }
          ]
        }
      ]
    }
  ]
}

Rules:
- Create exactly one entry in "pages" for each requested page, using the requested name.
- Each page has 1 to 4 sections; each section has 1 to 3 columns.
- Element "type" is one of: heading, text, button, image.
- Text elements hold plain text only, no HTML.
- Image elements carry a concise search "query" and an "alt" text, never a URL.
- Style keys are CSS property names and values are CSS values, both as strings.
- Use "hoverStyle" only for interactive elements such as buttons."##;

/// Presentation generation. Replace `{topic}` and `{slides}` before sending.
pub const PRESENTATION_TEMPLATE: &str = r##"Create a JSON object for a presentation on "{topic}".

The JSON must have a "topic" key set to "{topic}" and a "slides" array. Each slide has a
"title" (short and impactful) and an "elements" array. Each element has "type" ("text" or
"image"), "content" (for text) or "query" (for image), "x", "y", "width", "height" as
percentage strings such as "50%", and "isTitle" (boolean).

The canvas is 100% wide by 100% high. Follow these layouts STRICTLY.

1. Two-column layout (every slide except Q&A):
   - Title text: "isTitle": true, "x": "4%", "y": "20%", "width": "43%", "height": "15%".
     A short, engaging title for the slide's topic.
   - Body text: "isTitle": false, "x": "4%", "y": "35%", "width": "43%", "height": "50%".
     A detailed introductory paragraph followed by a concise bulleted list using <ul> and
     <li> tags, for example "<p>Intro sentence.</p><ul><li>Point one.</li></ul>".
     Generate 3 to 5 key points.
   - Image: "x": "51%", "y": "18%", "width": "45%", "height": "64%", with a concise,
     relevant search "query".

2. Title-only layout (the Q&A slide):
   - Title text: "isTitle": true, "x": "10%", "y": "40%", "width": "80%", "height": "20%".

Generate one slide for each of these topics, in order: {slides}."##;

/// Substitutes `{name}` placeholders in one pass over `template`, so text
/// inserted for one placeholder is never scanned for another. Braces that do
/// not name a known placeholder are kept as they are.
fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let hit = vars.iter().find(|(name, _)| {
            tail.strip_prefix(*name)
                .is_some_and(|after| after.starts_with('}'))
        });
        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn suggest_pages_prompt(description: &str) -> String {
    format!(
        "{} {}",
        fill(SUGGEST_PAGES_TEMPLATE, &[("description", description)]),
        crate::requester::prompts::COMMA_LIST_INSTRUCTION
    )
}

pub fn suggest_subtopics_prompt(topic: &str) -> String {
    format!(
        "{} {}",
        fill(SUGGEST_SUBTOPICS_TEMPLATE, &[("topic", topic)]),
        crate::requester::prompts::COMMA_LIST_INSTRUCTION
    )
}

pub fn website_prompt(description: &str, pages: &[String]) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        fill(
            WEBSITE_TEMPLATE,
            &[("description", description), ("pages", &pages.join(", "))]
        ),
        crate::requester::prompts::CONTENT_QUALITY_INSTRUCTION,
        crate::requester::prompts::JSON_ONLY_INSTRUCTION
    )
}

pub fn presentation_prompt(topic: &str, slides: &[String]) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        fill(
            PRESENTATION_TEMPLATE,
            &[("topic", topic), ("slides", &slides.join(", "))]
        ),
        crate::requester::prompts::CONTENT_QUALITY_INSTRUCTION,
        crate::requester::prompts::JSON_ONLY_INSTRUCTION
    )
}
