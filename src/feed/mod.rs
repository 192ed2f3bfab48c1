//! RSS feed assembly
//!
//! The feed manifest is the front matter of `feed/content.md`: channel
//! metadata plus `rssItems`, an ordered list of content paths. Item order in
//! the output is exactly the authored order.

use crate::config::SiteConfig;
use crate::content::{ContentError, ContentStore, MarkdownRenderer, PathSegments};
use crate::helpers::{escape_xml, rss_date, strip_headings, strip_html, truncate_words};

/// Item descriptions are cut to this many words.
const MAX_DESCRIPTION_WORDS: usize = 50;

/// Assembles the RSS 2.0 document.
pub struct FeedAssembler<'a> {
    store: &'a ContentStore,
    renderer: &'a MarkdownRenderer,
    config: &'a SiteConfig,
}

impl<'a> FeedAssembler<'a> {
    pub fn new(
        store: &'a ContentStore,
        renderer: &'a MarkdownRenderer,
        config: &'a SiteConfig,
    ) -> Self {
        Self {
            store,
            renderer,
            config,
        }
    }

    /// Build the complete feed. Fails only when the manifest itself is
    /// unreadable; individual item failures skip that item.
    pub fn assemble(&self) -> Result<String, ContentError> {
        let manifest = self.store.document(&self.store.feed_location())?;
        let channel_link = manifest.rss_link().unwrap_or("").to_string();

        let mut xml = String::from("<?xml version=\"1.0\"?>\n");
        xml.push_str("<rss version=\"2.0\"><channel>");
        xml.push_str(&format!(
            "<title>{}</title>",
            escape_xml(manifest.rss_title().unwrap_or(""))
        ));
        xml.push_str(&format!("<link>{}</link>", escape_xml(&channel_link)));
        xml.push_str(&format!(
            "<description>{}</description>",
            escape_xml(manifest.rss_description().unwrap_or(""))
        ));
        xml.push_str("<language>en-us</language>");
        xml.push_str(&format!(
            "<copyright>{}</copyright>",
            escape_xml(&self.config.copyright())
        ));

        for path in manifest.rss_items() {
            if let Some(item) = self.item_xml(path, &channel_link) {
                xml.push_str(&item);
            }
        }

        xml.push_str("</channel></rss>");
        Ok(xml)
    }

    /// One `<item>` element, or `None` when the item should be dropped.
    fn item_xml(&self, path: &str, channel_link: &str) -> Option<String> {
        let segments = PathSegments::parse(path);
        let document = match self.store.document(&self.store.locate(&segments, &[])) {
            Ok(document) => document,
            Err(err) => {
                tracing::warn!("skipping feed item {}: {}", path, err);
                return None;
            }
        };

        let description = document
            .rss_description()
            .or_else(|| document.description())
            .map(str::to_string)
            .unwrap_or_else(|| self.renderer.render_body(document.body()));
        let description = truncate_words(
            &strip_html(&strip_headings(&description)),
            MAX_DESCRIPTION_WORDS,
        );
        if description.is_empty() {
            tracing::debug!("dropping feed item {} with empty description", path);
            return None;
        }

        let link = format!("{}{}", channel_link.trim_end_matches('/'), segments.to_path());

        let mut item = String::from("<item>");
        item.push_str(&format!(
            "<title>{}</title>",
            escape_xml(document.title().unwrap_or(""))
        ));
        item.push_str(&format!("<link>{}</link>", link));
        item.push_str(&format!("<guid>{}</guid>", link));
        item.push_str(&format!(
            "<description>{}</description>",
            escape_xml(&description)
        ));
        if let Some(date) = document
            .created()
            .and_then(|ymd| rss_date(ymd, self.config.tz()))
        {
            item.push_str(&format!("<pubDate>{}</pubDate>", date));
        }
        item.push_str("</item>");
        Some(item)
    }
}
