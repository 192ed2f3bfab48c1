//! Content module - path resolution, the content store, and documents

mod document;
mod error;
mod markdown;
mod path;
mod store;

pub use document::{Document, FrontMatter};
pub use error::ContentError;
pub use markdown::MarkdownRenderer;
pub use path::PathSegments;
pub use store::{Backend, ContentLocation, ContentStore, LocalBackend, RemoteBackend, CONTENT_FILE};
