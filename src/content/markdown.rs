//! Markdown rendering with a fixed, locked-down configuration

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

use super::Document;
use crate::helpers::escape_xml;

/// How a link start event was handled, so the matching end event agrees.
enum LinkKind {
    Kept,
    External,
    Stripped,
}

/// Markdown renderer
///
/// The configuration is fixed for every document: GitHub-flavored syntax and
/// smart punctuation on, raw HTML stripped, unsafe link schemes reduced to
/// plain text, and external links opened in a new browsing context.
#[derive(Debug, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }

    fn options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_GFM
    }

    /// Render a markdown body to HTML. Deterministic: the same input always
    /// produces the same output.
    pub fn render_body(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, Self::options());

        let mut events: Vec<Event> = Vec::new();
        let mut link_stack: Vec<LinkKind> = Vec::new();

        for event in parser {
            match event {
                // Raw HTML is stripped from the output entirely.
                Event::Html(_) | Event::InlineHtml(_) => {}
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => {
                    if is_unsafe_link(&dest_url) {
                        link_stack.push(LinkKind::Stripped);
                    } else if is_external_link(&dest_url) {
                        let title_attr = if title.is_empty() {
                            String::new()
                        } else {
                            format!(r#" title="{}""#, escape_xml(&title))
                        };
                        events.push(Event::Html(CowStr::from(format!(
                            r#"<a href="{}"{} target="_blank" rel="noopener">"#,
                            escape_xml(&dest_url),
                            title_attr
                        ))));
                        link_stack.push(LinkKind::External);
                    } else {
                        events.push(Event::Start(Tag::Link {
                            link_type,
                            dest_url,
                            title,
                            id,
                        }));
                        link_stack.push(LinkKind::Kept);
                    }
                }
                Event::End(TagEnd::Link) => match link_stack.pop() {
                    Some(LinkKind::Kept) => events.push(Event::End(TagEnd::Link)),
                    Some(LinkKind::External) => {
                        events.push(Event::Html(CowStr::from("</a>")));
                    }
                    Some(LinkKind::Stripped) | None => {}
                },
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Render a full page fragment for a document.
    ///
    /// With `with_details`, the body is prefixed by an `<h1>` built from the
    /// heading (falling back to title) and a paragraph of detail lines joined
    /// by `<br />`. Empty fragments are dropped before joining.
    pub fn render_page(&self, document: &Document, with_details: bool) -> String {
        let mut blocks: Vec<String> = Vec::new();

        if with_details {
            if let Some(heading) = document.heading_or_title() {
                if !heading.is_empty() {
                    blocks.push(format!("<h1>{}</h1>", escape_xml(heading)));
                }
            }

            let details = document.details();
            if !details.is_empty() {
                blocks.push(format!("<p>{}</p>", details.join("<br />")));
            }
        }

        let body = self.render_body(document.body());
        if !body.is_empty() {
            blocks.push(body);
        }

        blocks.join("\n")
    }
}

/// Schemes that must never become clickable links.
fn is_unsafe_link(dest: &str) -> bool {
    let lowered = dest.trim_start().to_ascii_lowercase();
    ["javascript:", "vbscript:", "file:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
}

/// Absolute links leave the site and open in a new browsing context.
fn is_external_link(dest: &str) -> bool {
    dest.starts_with("http://") || dest.starts_with("https://") || dest.starts_with("//")
}
