//! Error taxonomy for content resolution

use thiserror::Error;

/// Errors produced while locating, reading, or parsing content.
///
/// None of these are fatal to the process: an unavailable document maps to a
/// not-found response, a malformed document to a rendering error for that
/// request, and incomplete remote configuration downgrades the store to
/// local-only mode.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The backing file could not be read (missing locally, or the remote
    /// fetch failed).
    #[error("content unavailable at {path}: {reason}")]
    ContentUnavailable { path: String, reason: String },

    /// A front-matter block was present but could not be parsed.
    #[error("malformed front matter in {path}: {source}")]
    DocumentMalformed {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Remote credentials were partially configured.
    #[error("remote configuration incomplete, missing: {missing}")]
    ConfigurationIncomplete { missing: String },
}

impl ContentError {
    /// Build a `ContentUnavailable` from any displayable cause.
    pub fn unavailable(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::ContentUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error should surface as a not-found response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ContentUnavailable { .. })
    }
}
