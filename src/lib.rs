//! canopy: a hierarchical markdown content server
//!
//! This crate resolves URL paths into a tree of `content.md` documents
//! (YAML front matter + markdown body), derives page metadata by walking the
//! hierarchy, and assembles an RSS feed from an authored manifest. Content is
//! read from the local filesystem or a remote repository, chosen once at
//! startup.

pub mod config;
pub mod content;
pub mod feed;
pub mod helpers;
pub mod meta;
pub mod server;
pub mod title;

use anyhow::Result;
use std::path::Path;

use config::SiteConfig;
use content::{ContentError, ContentStore, MarkdownRenderer, PathSegments};
use feed::FeedAssembler;
use meta::MetadataDeriver;
use title::{TitleMode, TitleResolver};

/// Everything a templating layer needs for one resolved page.
#[derive(Debug)]
pub struct PageView {
    pub title: String,
    pub description: String,
    pub social_image: String,
    pub html: String,
}

/// The site facade
///
/// Holds the immutable pieces (configuration, the content store, the
/// renderer) and exposes request-scoped operations. Nothing mutable survives
/// a single resolution.
pub struct Site {
    /// Site configuration
    pub config: SiteConfig,
    /// Content tree access
    pub store: ContentStore,
    renderer: MarkdownRenderer,
}

impl Site {
    /// Create a site from a base directory: reads `site.yml` when present and
    /// selects the content backend once.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join("site.yml");

        let config = if config_path.exists() {
            SiteConfig::load(&config_path)?
        } else {
            SiteConfig::default()
        };

        let store = ContentStore::from_config(&config, base_dir);
        tracing::debug!("content store: {}", store.describe());

        Ok(Self::from_parts(config, store))
    }

    /// Assemble a site from already-built parts; tests use this with an
    /// in-memory or temp-dir store.
    pub fn from_parts(config: SiteConfig, store: ContentStore) -> Self {
        Self {
            config,
            store,
            renderer: MarkdownRenderer::new(),
        }
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    /// Render the content body for a request path.
    pub fn render_page(&self, path: &str, with_details: bool) -> Result<String, ContentError> {
        let segments = PathSegments::parse(path);
        let document = self.store.document(&self.store.locate(&segments, &[]))?;
        Ok(self.renderer.render_page(&document, with_details))
    }

    /// Resolve a title for a request path.
    pub fn page_title(&self, path: &str, mode: TitleMode) -> String {
        TitleResolver::new(&self.store).resolve(&PathSegments::parse(path), mode)
    }

    /// Derive the description for a request path.
    pub fn description(&self, path: &str) -> String {
        MetadataDeriver::new(&self.store, &self.config).description(&PathSegments::parse(path))
    }

    /// Derive the social-image URL for a request path.
    pub fn social_image(&self, path: &str) -> String {
        MetadataDeriver::new(&self.store, &self.config).social_image(&PathSegments::parse(path))
    }

    /// Resolve the complete view for a request path.
    pub fn page(&self, path: &str) -> Result<PageView, ContentError> {
        let segments = PathSegments::parse(path);
        let document = self.store.document(&self.store.locate(&segments, &[]))?;
        let deriver = MetadataDeriver::new(&self.store, &self.config);

        Ok(PageView {
            title: TitleResolver::new(&self.store).resolve(&segments, TitleMode::Page),
            description: deriver.description(&segments),
            social_image: deriver.social_image(&segments),
            html: self.renderer.render_page(&document, true),
        })
    }

    /// Assemble the RSS feed.
    pub fn feed(&self) -> Result<String, ContentError> {
        FeedAssembler::new(&self.store, &self.renderer, &self.config).assemble()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample_site() -> (TempDir, Site) {
        let dir = TempDir::new().unwrap();
        for (path, text) in [
            ("content.md", "---\ntitle: Root\n---\nWelcome."),
            ("somewhere/content.md", "---\ntitle: Somewhere\n---\n"),
            (
                "somewhere/else/content.md",
                "---\ntitle: Else\ndescription: A page.\n---\nHello, World!",
            ),
        ] {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, text).unwrap();
        }
        let store = ContentStore::local(dir.path().to_path_buf());
        let site = Site::from_parts(SiteConfig::default(), store);
        (dir, site)
    }

    #[test]
    fn test_page_resolution() {
        let (_dir, site) = sample_site();
        let view = site.page("/somewhere/else").unwrap();
        assert_eq!(view.title, "Else | Somewhere | Root");
        assert_eq!(view.description, "A page.");
        assert!(view.html.contains("Hello, World!"));
    }

    #[test]
    fn test_missing_page_is_unavailable() {
        let (_dir, site) = sample_site();
        let err = site.page("/nowhere").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_render_page_without_details() {
        let (_dir, site) = sample_site();
        let html = site.render_page("/somewhere/else", false).unwrap();
        assert!(html.contains("Hello, World!"));
        assert!(!html.contains("<h1>"));
    }
}
