//! Markdown support for the post reader: HTML conversion and plain-text
//! extraction.

use pulldown_cmark::{html, Event, Options, Parser, Tag};

/// The deepest heading level HTML supports.
const MAX_HEADING_LEVEL: u32 = 6;

/// Converts markdown to HTML, appending the result to `w`.
///
/// * `markdown` is the post body.
/// * `heading_offset` is added to every heading level (clamped to `h6`) so
///   the body nests under whatever headings surround it. An offset of 0
///   leaves headings untouched.
pub fn to_html(w: &mut String, markdown: &str, heading_offset: u32) {
    let event_converter = EventConverter { heading_offset };
    html::push_html(
        w,
        Parser::new_ext(markdown, options()).map(|ev| event_converter.convert(ev)),
    );
}

/// Returns the text of the first paragraph with inline markup stripped and
/// line breaks collapsed into spaces. Returns `None` if there is no paragraph
/// or it has no text.
pub fn first_paragraph_text(markdown: &str) -> Option<String> {
    let mut text = String::new();
    let mut in_paragraph = false;
    for ev in Parser::new_ext(markdown, options()) {
        match ev {
            Event::Start(Tag::Paragraph) => in_paragraph = true,
            Event::End(Tag::Paragraph) if in_paragraph => break,
            Event::Text(t) | Event::Code(t) if in_paragraph => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak if in_paragraph => text.push(' '),
            _ => {}
        }
    }

    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_owned())
    }
}

// GitHub-flavored extensions.
fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

struct EventConverter {
    heading_offset: u32,
}

impl EventConverter {
    fn convert_tag<'b>(&self, tag: Tag<'b>) -> Tag<'b> {
        match tag {
            // Both the start and the end tag carry the level; the HTML writer
            // closes with the end tag's level, so both must shift.
            Tag::Heading(level) => {
                Tag::Heading((level + self.heading_offset).min(MAX_HEADING_LEVEL))
            }
            _ => tag,
        }
    }

    fn convert<'b>(&self, ev: Event<'b>) -> Event<'b> {
        match ev {
            Event::Start(tag) => Event::Start(self.convert_tag(tag)),
            Event::End(tag) => Event::End(self.convert_tag(tag)),
            _ => ev,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn render(markdown: &str, heading_offset: u32) -> String {
        let mut out = String::new();
        to_html(&mut out, markdown, heading_offset);
        out
    }

    #[test]
    fn test_to_html() {
        assert_eq!(
            render("# Title\n\nSome *emphasis*.", 0),
            "<h1>Title</h1>\n<p>Some <em>emphasis</em>.</p>\n"
        );
    }

    #[test]
    fn test_heading_offset() {
        assert_eq!(render("# Title", 1), "<h2>Title</h2>\n");
        assert_eq!(render("##### Deep", 3), "<h6>Deep</h6>\n");
    }

    #[test]
    fn test_fenced_code_language() {
        let html = render("```rust\nfn main() {}\n```", 0);
        assert!(html.contains("<code class=\"language-rust\">"));
    }

    #[test]
    fn test_gfm_extensions() {
        let html = render("~~gone~~\n\n| a | b |\n|---|---|\n| 1 | 2 |\n", 0);
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_first_paragraph_text() {
        assert_eq!(
            first_paragraph_text("# Heading\n\nUse `cargo` to\nbuild **fast**.\n\nMore."),
            Some(String::from("Use cargo to build fast."))
        );
        assert_eq!(first_paragraph_text("# Only a heading"), None);
        assert_eq!(first_paragraph_text(""), None);
    }
}
