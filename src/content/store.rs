//! Content tree access
//!
//! A `ContentStore` maps path segments onto a content tree served by one of
//! two backends: the local filesystem or a remote git repository fetched over
//! HTTPS. The backend is chosen once at construction and never changes for
//! the lifetime of the instance.

use std::fs;
use std::path::{Path, PathBuf};

use super::document::Document;
use super::error::ContentError;
use super::path::PathSegments;
use crate::config::{RemoteConfig, SiteConfig};

/// File name every content location resolves to.
pub const CONTENT_FILE: &str = "content.md";

/// Handle to one directory in the content tree, relative to the tree root.
/// Always resolvable to a `content.md` by appending that name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLocation {
    rel: PathBuf,
}

impl ContentLocation {
    fn new(rel: PathBuf) -> Self {
        Self { rel }
    }

    /// Relative path of the directory inside the content tree.
    pub fn rel(&self) -> &Path {
        &self.rel
    }

    /// Relative path of this location's `content.md`.
    pub fn content_file(&self) -> PathBuf {
        self.rel.join(CONTENT_FILE)
    }

    pub fn join(&self, part: &str) -> ContentLocation {
        ContentLocation::new(self.rel.join(part))
    }
}

/// Storage contract shared by both backends. Implement it in tests to stand
/// in for the remote backend without network access.
pub trait Backend: Send + Sync {
    fn read_bytes(&self, rel: &Path) -> Result<Vec<u8>, ContentError>;

    fn read(&self, rel: &Path) -> Result<String, ContentError> {
        let bytes = self.read_bytes(rel)?;
        String::from_utf8(bytes)
            .map_err(|err| ContentError::unavailable(rel.display().to_string(), err))
    }

    fn exists(&self, rel: &Path) -> bool;

    /// Human-readable backend description for logs.
    fn describe(&self) -> String;
}

/// Reads straight from a directory on disk.
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl Backend for LocalBackend {
    fn read_bytes(&self, rel: &Path) -> Result<Vec<u8>, ContentError> {
        fs::read(self.root.join(rel))
            .map_err(|err| ContentError::unavailable(rel.display().to_string(), err))
    }

    fn read(&self, rel: &Path) -> Result<String, ContentError> {
        fs::read_to_string(self.root.join(rel))
            .map_err(|err| ContentError::unavailable(rel.display().to_string(), err))
    }

    fn exists(&self, rel: &Path) -> bool {
        self.root.join(rel).is_file()
    }

    fn describe(&self) -> String {
        format!("local tree at {}", self.root.display())
    }
}

/// Fetches raw files from a GitHub repository over HTTPS.
///
/// Any transport or status failure is reported as `ContentUnavailable`;
/// retry and backoff policy, if wanted, belongs to the HTTP layer.
pub struct RemoteBackend {
    client: reqwest::blocking::Client,
    base_url: String,
    token: String,
}

impl RemoteBackend {
    pub fn new(remote: &RemoteConfig, remote_root: &str) -> Self {
        let mut base_url = format!(
            "https://raw.githubusercontent.com/{}/{}/HEAD",
            remote.username, remote.repository
        );
        let root = remote_root.trim_matches('/');
        if !root.is_empty() {
            base_url.push('/');
            base_url.push_str(root);
        }

        Self {
            client: reqwest::blocking::Client::new(),
            base_url,
            token: remote.token.clone(),
        }
    }

    fn url_for(&self, rel: &Path) -> String {
        let mut url = self.base_url.clone();
        for component in rel.components() {
            url.push('/');
            url.push_str(&component.as_os_str().to_string_lossy());
        }
        url
    }
}

impl Backend for RemoteBackend {
    fn read_bytes(&self, rel: &Path) -> Result<Vec<u8>, ContentError> {
        let url = self.url_for(rel);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|err| ContentError::unavailable(rel.display().to_string(), err))?;

        if !response.status().is_success() {
            return Err(ContentError::unavailable(
                rel.display().to_string(),
                format!("remote returned {}", response.status()),
            ));
        }

        response
            .bytes()
            .map(|bytes| bytes.to_vec())
            .map_err(|err| ContentError::unavailable(rel.display().to_string(), err))
    }

    fn exists(&self, rel: &Path) -> bool {
        self.client
            .head(self.url_for(rel))
            .bearer_auth(&self.token)
            .send()
            .map(|response| response.status().is_success())
            .unwrap_or(false)
    }

    fn describe(&self) -> String {
        format!("remote tree at {}", self.base_url)
    }
}

/// Maps path segments to content locations and reads them through the
/// selected backend.
pub struct ContentStore {
    backend: Box<dyn Backend>,
    local: bool,
}

impl ContentStore {
    /// Select the backend once from configuration and environment.
    ///
    /// The remote backend is used only when the config names a remote root
    /// *and* the environment carries the complete credential set. Partial
    /// credentials downgrade to local mode with a warning; fully absent
    /// credentials downgrade quietly.
    pub fn from_config(config: &SiteConfig, base_dir: &Path) -> Self {
        if let Some(remote_root) = config.remote_root.as_deref() {
            match RemoteConfig::from_env() {
                Ok(Some(remote)) => {
                    let backend = RemoteBackend::new(&remote, remote_root);
                    tracing::info!("serving content from {}", backend.describe());
                    return Self {
                        backend: Box::new(backend),
                        local: false,
                    };
                }
                Ok(None) => {
                    tracing::debug!("no remote credentials set, serving local content");
                }
                Err(err) => {
                    tracing::warn!("{}, serving local content", err);
                }
            }
        }

        Self::local(base_dir.join(&config.content_dir))
    }

    /// Local-only store rooted at the given directory.
    pub fn local(root: PathBuf) -> Self {
        Self {
            backend: Box::new(LocalBackend::new(root)),
            local: true,
        }
    }

    /// Store over an arbitrary backend; stands in for the remote side in
    /// tests.
    pub fn with_backend(backend: Box<dyn Backend>) -> Self {
        Self {
            backend,
            local: false,
        }
    }

    /// Whether this store reads the local filesystem. Fixed at construction.
    pub fn is_local(&self) -> bool {
        self.local
    }

    /// Resolve request segments (plus any explicit extra parts) to a
    /// location in the tree.
    pub fn locate(&self, segments: &PathSegments, extra: &[&str]) -> ContentLocation {
        let mut rel = PathBuf::new();
        for part in segments.iter() {
            rel.push(part);
        }
        for part in extra {
            rel.push(part);
        }
        ContentLocation::new(rel)
    }

    /// Location for an explicit part list, used by hierarchy walks.
    pub fn locate_parts(&self, parts: &[String]) -> ContentLocation {
        let mut rel = PathBuf::new();
        for part in parts {
            rel.push(part);
        }
        ContentLocation::new(rel)
    }

    /// The content tree root itself.
    pub fn root_location(&self) -> ContentLocation {
        ContentLocation::new(PathBuf::new())
    }

    /// `.assets` off the site root; favicons live under it.
    pub fn assets_location(&self) -> ContentLocation {
        self.root_location().join(".assets")
    }

    /// `.media` off the site root; poster images live under it.
    pub fn media_location(&self) -> ContentLocation {
        self.root_location().join(".media")
    }

    /// `.tracker` off the site root.
    pub fn tracker_location(&self) -> ContentLocation {
        self.root_location().join(".tracker")
    }

    /// `events` off the site root.
    pub fn events_location(&self) -> ContentLocation {
        self.root_location().join("events")
    }

    /// `feed` off the site root; its front matter is the feed manifest.
    pub fn feed_location(&self) -> ContentLocation {
        self.root_location().join("feed")
    }

    /// Read a location's `content.md`.
    pub fn read(&self, location: &ContentLocation) -> Result<String, ContentError> {
        self.backend.read(&location.content_file())
    }

    /// Read and parse a location's `content.md`.
    pub fn document(&self, location: &ContentLocation) -> Result<Document, ContentError> {
        let file = location.content_file();
        let text = self.backend.read(&file)?;
        Document::parse(&text, &file.display().to_string())
    }

    /// Whether a file exists at a tree-relative path.
    pub fn exists_file(&self, rel: &Path) -> bool {
        self.backend.exists(rel)
    }

    /// Read raw bytes at a tree-relative path (favicons, media).
    pub fn read_file(&self, rel: &Path) -> Result<Vec<u8>, ContentError> {
        self.backend.read_bytes(rel)
    }

    pub fn describe(&self) -> String {
        self.backend.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn local_store(files: &[(&str, &str)]) -> (TempDir, ContentStore) {
        let dir = TempDir::new().unwrap();
        for (path, text) in files {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, text).unwrap();
        }
        let store = ContentStore::local(dir.path().to_path_buf());
        (dir, store)
    }

    #[test]
    fn test_locate_appends_segments() {
        let (_dir, store) = local_store(&[]);
        let segments = PathSegments::parse("/somewhere/else");
        let location = store.locate(&segments, &[]);
        assert_eq!(
            location.content_file(),
            PathBuf::from("somewhere/else/content.md")
        );
    }

    #[test]
    fn test_locate_with_extra_parts() {
        let (_dir, store) = local_store(&[]);
        let location = store.locate(&PathSegments::default(), &["feed"]);
        assert_eq!(location.content_file(), PathBuf::from("feed/content.md"));
    }

    #[test]
    fn test_convention_locations() {
        let (_dir, store) = local_store(&[]);
        assert_eq!(store.assets_location().rel(), Path::new(".assets"));
        assert_eq!(store.media_location().rel(), Path::new(".media"));
        assert_eq!(store.tracker_location().rel(), Path::new(".tracker"));
        assert_eq!(store.events_location().rel(), Path::new("events"));
        assert_eq!(store.feed_location().rel(), Path::new("feed"));
    }

    #[test]
    fn test_document_round_trip() {
        let (_dir, store) = local_store(&[(
            "somewhere/else/content.md",
            "---\ntitle: Else\n---\nHello, World!",
        )]);
        let segments = PathSegments::parse("/somewhere/else");
        let doc = store.document(&store.locate(&segments, &[])).unwrap();
        assert_eq!(doc.title(), Some("Else"));
    }

    #[test]
    fn test_missing_content_is_unavailable() {
        let (_dir, store) = local_store(&[]);
        let err = store
            .document(&store.locate(&PathSegments::parse("/nope"), &[]))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_local_store_reports_local() {
        let (_dir, store) = local_store(&[]);
        assert!(store.is_local());
    }

    /// In-memory stand-in for the remote backend.
    struct MemoryBackend {
        files: HashMap<PathBuf, String>,
    }

    impl Backend for MemoryBackend {
        fn read_bytes(&self, rel: &Path) -> Result<Vec<u8>, ContentError> {
            self.files
                .get(rel)
                .map(|text| text.clone().into_bytes())
                .ok_or_else(|| ContentError::unavailable(rel.display().to_string(), "not found"))
        }

        fn exists(&self, rel: &Path) -> bool {
            self.files.contains_key(rel)
        }

        fn describe(&self) -> String {
            "in-memory tree".to_string()
        }
    }

    #[test]
    fn test_backend_substitution() {
        let mut files = HashMap::new();
        files.insert(
            PathBuf::from("content.md"),
            "---\ntitle: Root\n---\n".to_string(),
        );
        let store = ContentStore::with_backend(Box::new(MemoryBackend { files }));

        assert!(!store.is_local());
        let doc = store.document(&store.root_location()).unwrap();
        assert_eq!(doc.title(), Some("Root"));
        assert!(store
            .document(&store.locate(&PathSegments::parse("/missing"), &[]))
            .is_err());
    }
}
