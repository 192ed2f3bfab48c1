//! Derived page metadata
//!
//! Descriptions and social images come from a fallback chain rather than a
//! single source: explicit front matter wins, then convention files or
//! site-level defaults, then a computed last resort.

use std::path::PathBuf;

use crate::config::SiteConfig;
use crate::content::{ContentStore, PathSegments};
use crate::helpers::{encode_segment, full_url_for};
use crate::title::{TitleMode, TitleResolver};

/// Poster file names checked at each media level, in preference order.
const POSTER_NAMES: [&str; 2] = ["poster.png", "poster.jpg"];

/// Derives description and social-image metadata for a page.
pub struct MetadataDeriver<'a> {
    store: &'a ContentStore,
    config: &'a SiteConfig,
}

impl<'a> MetadataDeriver<'a> {
    pub fn new(store: &'a ContentStore, config: &'a SiteConfig) -> Self {
        Self { store, config }
    }

    /// Page description: explicit front matter, else the site-level default,
    /// else the bookend title.
    pub fn description(&self, segments: &PathSegments) -> String {
        if let Ok(document) = self.store.document(&self.store.locate(segments, &[])) {
            if let Some(description) = document.description() {
                if !description.is_empty() {
                    return description.to_string();
                }
            }
        }

        let fallback = self.config.description.trim();
        if !fallback.is_empty() {
            return fallback.to_string();
        }

        TitleResolver::new(self.store).resolve(segments, TitleMode::Bookend)
    }

    /// Absolute URL of the nearest ancestor's poster image under `.media`,
    /// preferring `poster.png` over `poster.jpg` at each level. Empty when no
    /// level up to and including the media root has one.
    pub fn social_image(&self, segments: &PathSegments) -> String {
        let media_root = self.store.media_location();
        let mut parts = segments.to_vec();

        loop {
            for name in POSTER_NAMES {
                let mut rel: PathBuf = media_root.rel().to_path_buf();
                for part in &parts {
                    rel.push(part);
                }
                rel.push(name);

                if self.store.exists_file(&rel) {
                    let mut url_path = String::from("/media");
                    for part in &parts {
                        url_path.push('/');
                        url_path.push_str(&encode_segment(part));
                    }
                    url_path.push('/');
                    url_path.push_str(name);
                    return full_url_for(self.config, &url_path);
                }
            }

            if parts.is_empty() {
                return String::new();
            }
            parts.pop();
        }
    }
}
