//! Page title derivation
//!
//! Titles are assembled by walking the content hierarchy from the requested
//! leaf up to the tree root, pulling a title fragment at each level. A level
//! without a readable `content.md` contributes nothing and the walk continues
//! upward.

use std::str::FromStr;

use crate::content::{ContentLocation, ContentStore, PathSegments};
use crate::helpers::month_name;

/// Separator between assembled title fragments.
pub const SEPARATOR: &str = " | ";

/// Which fragments a resolved title is assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleMode {
    /// The leaf's `title` only, ignoring any heading.
    Title,
    /// The leaf's `heading`, falling back to `title`.
    Heading,
    /// Every level from leaf to root, e.g. `Leaf | Branch | Root`.
    Page,
    /// Leaf and root only, skipping the middle, e.g. `Leaf | Root`.
    Bookend,
}

impl FromStr for TitleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "heading" => Ok(Self::Heading),
            "page" => Ok(Self::Page),
            "book-end" | "bookend" => Ok(Self::Bookend),
            other => Err(format!("unknown title mode: {}", other)),
        }
    }
}

/// Resolves titles against a content store.
pub struct TitleResolver<'a> {
    store: &'a ContentStore,
}

impl<'a> TitleResolver<'a> {
    pub fn new(store: &'a ContentStore) -> Self {
        Self { store }
    }

    /// Resolve with each mode's usual heading preference: heading-first for
    /// `Heading` and `Bookend`, plain titles for `Title` and `Page`.
    pub fn resolve(&self, segments: &PathSegments, mode: TitleMode) -> String {
        let heading_first = matches!(mode, TitleMode::Bookend);
        self.resolve_with(segments, mode, heading_first)
    }

    /// Resolve with an explicit heading preference for the walking modes.
    pub fn resolve_with(
        &self,
        segments: &PathSegments,
        mode: TitleMode,
        heading_first: bool,
    ) -> String {
        match mode {
            TitleMode::Title => self.level_title(&self.store.locate(segments, &[]), false),
            TitleMode::Heading => self.level_title(&self.store.locate(segments, &[]), true),
            TitleMode::Page => self.fragments(segments, heading_first).join(SEPARATOR),
            TitleMode::Bookend => self.bookend(segments, heading_first),
        }
    }

    /// Non-empty title fragments in leaf-to-root order, ending with the
    /// tree root's own title.
    fn fragments(&self, segments: &PathSegments, heading_first: bool) -> Vec<String> {
        let mut fragments = Vec::new();

        let mut parts = segments.to_vec();
        while !parts.is_empty() {
            let title = self.level_title(&self.store.locate_parts(&parts), heading_first);
            if !title.is_empty() {
                fragments.push(title);
            }
            parts.pop();
        }

        let root_title = self.level_title(&self.store.root_location(), heading_first);
        if !root_title.is_empty() {
            fragments.push(root_title);
        }

        fragments
    }

    fn bookend(&self, segments: &PathSegments, heading_first: bool) -> String {
        let fragments = self.fragments(segments, heading_first);

        // At the root the two bookends collapse into one fragment.
        if segments.is_empty() {
            return fragments.last().cloned().unwrap_or_default();
        }

        let mut leaf = if fragments.len() >= 2 {
            fragments.first().cloned().unwrap_or_default()
        } else {
            String::new()
        };
        let mut root = fragments.last().cloned().unwrap_or_default();

        if segments.root() == "events" {
            if let Some(prefix) = events_prefix(segments) {
                leaf = if leaf.is_empty() {
                    prefix
                } else {
                    format!("{} {}", prefix, leaf)
                };
            }
            root = self.level_title(&self.store.root_location(), false);
        }

        [leaf, root]
            .into_iter()
            .filter(|fragment| !fragment.is_empty())
            .collect::<Vec<_>>()
            .join(SEPARATOR)
    }

    /// Title for one hierarchy level; a failed lookup is an empty fragment.
    fn level_title(&self, location: &ContentLocation, heading_first: bool) -> String {
        match self.store.document(location) {
            Ok(document) => {
                let title = if heading_first {
                    document.heading_or_title()
                } else {
                    document.title()
                };
                title.unwrap_or("").to_string()
            }
            Err(err) => {
                tracing::debug!("no title at {:?}: {}", location.rel(), err);
                String::new()
            }
        }
    }
}

/// "Month Year" prefix for event pages, derived from `/events/<year>/<month>`.
fn events_prefix(segments: &PathSegments) -> Option<String> {
    let year = segments.get(1)?;
    let month: u32 = segments.get(2)?.parse().ok()?;
    Some(format!("{} {}", month_name(month)?, year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn store_with(files: &[(&str, &str)]) -> (TempDir, ContentStore) {
        let dir = TempDir::new().unwrap();
        for (path, text) in files {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, text).unwrap();
        }
        let store = ContentStore::local(dir.path().to_path_buf());
        (dir, store)
    }

    fn sample_tree() -> (TempDir, ContentStore) {
        store_with(&[
            ("content.md", "---\ntitle: Root\n---\n"),
            ("somewhere/content.md", "---\ntitle: Somewhere\n---\n"),
            (
                "somewhere/else/content.md",
                "---\ntitle: Else\nheading: Else Heading\n---\nHello, World!",
            ),
            ("events/content.md", "---\ntitle: Events\n---\n"),
            (
                "events/2020/05/gathering/content.md",
                "---\ntitle: Gathering\n---\n",
            ),
        ])
    }

    #[test]
    fn test_page_mode_walks_to_root() {
        let (_dir, store) = sample_tree();
        let resolver = TitleResolver::new(&store);
        let title = resolver.resolve(&PathSegments::parse("/somewhere/else"), TitleMode::Page);
        assert_eq!(title, "Else | Somewhere | Root");
    }

    #[test]
    fn test_title_mode_ignores_heading() {
        let (_dir, store) = sample_tree();
        let resolver = TitleResolver::new(&store);
        let title = resolver.resolve(&PathSegments::parse("/somewhere/else"), TitleMode::Title);
        assert_eq!(title, "Else");
    }

    #[test]
    fn test_heading_mode_prefers_heading() {
        let (_dir, store) = sample_tree();
        let resolver = TitleResolver::new(&store);
        let title = resolver.resolve(&PathSegments::parse("/somewhere/else"), TitleMode::Heading);
        assert_eq!(title, "Else Heading");
    }

    #[test]
    fn test_heading_mode_falls_back_to_title() {
        let (_dir, store) = sample_tree();
        let resolver = TitleResolver::new(&store);
        let title = resolver.resolve(&PathSegments::parse("/somewhere"), TitleMode::Heading);
        assert_eq!(title, "Somewhere");
    }

    #[test]
    fn test_bookend_at_root_is_single_fragment() {
        let (_dir, store) = sample_tree();
        let resolver = TitleResolver::new(&store);
        let title = resolver.resolve(&PathSegments::parse("/"), TitleMode::Bookend);
        assert_eq!(title, "Root");
    }

    #[test]
    fn test_bookend_skips_middle_levels() {
        let (_dir, store) = sample_tree();
        let resolver = TitleResolver::new(&store);
        let title = resolver.resolve(&PathSegments::parse("/somewhere/else"), TitleMode::Bookend);
        assert_eq!(title, "Else Heading | Root");
    }

    #[test]
    fn test_bookend_events_prefixes_month_and_year() {
        let (_dir, store) = sample_tree();
        let resolver = TitleResolver::new(&store);
        let title = resolver.resolve(
            &PathSegments::parse("/events/2020/05/gathering"),
            TitleMode::Bookend,
        );
        assert_eq!(title, "May 2020 Gathering | Root");
    }

    #[test]
    fn test_page_mode_skips_missing_levels() {
        let (_dir, store) = store_with(&[
            ("content.md", "---\ntitle: Root\n---\n"),
            ("deep/content.md", "---\ntitle: Deep\n---\n"),
            ("deep/x/y/content.md", "---\ntitle: Y\n---\n"),
        ]);
        let resolver = TitleResolver::new(&store);
        let title = resolver.resolve(&PathSegments::parse("/deep/x/y"), TitleMode::Page);
        assert_eq!(title, "Y | Deep | Root");
    }

    #[test]
    fn test_all_levels_empty_is_empty_string() {
        let (_dir, store) = store_with(&[]);
        let resolver = TitleResolver::new(&store);
        assert_eq!(
            resolver.resolve(&PathSegments::parse("/ghost"), TitleMode::Page),
            ""
        );
    }

    #[test]
    fn test_page_mode_heading_first_on_request() {
        let (_dir, store) = sample_tree();
        let resolver = TitleResolver::new(&store);
        let title = resolver.resolve_with(
            &PathSegments::parse("/somewhere/else"),
            TitleMode::Page,
            true,
        );
        assert_eq!(title, "Else Heading | Somewhere | Root");
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("page".parse::<TitleMode>().unwrap(), TitleMode::Page);
        assert_eq!("book-end".parse::<TitleMode>().unwrap(), TitleMode::Bookend);
        assert!("mystery".parse::<TitleMode>().is_err());
    }
}
