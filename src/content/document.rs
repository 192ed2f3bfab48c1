//! Front-matter documents
//!
//! Each content location holds exactly one `content.md`: an optional YAML
//! front-matter block followed by a markdown body. Missing keys stay absent,
//! never empty strings, so callers can tell "not set" from "set to nothing".

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

use super::error::ContentError;
use crate::helpers::formatted_date;

/// Custom deserializer for `YYYYMMDD` values, which authors write either as a
/// bare integer (`created: 20200401`) or a quoted string.
fn ymd_digits<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct YmdDigits;

    impl<'de> Visitor<'de> for YmdDigits {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a YYYYMMDD number or string")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(YmdDigits)
}

/// Front-matter data from a content file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub heading: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "ymd_digits")]
    pub created: Option<String>,
    #[serde(deserialize_with = "ymd_digits")]
    pub modified: Option<String>,
    #[serde(deserialize_with = "ymd_digits")]
    pub moved: Option<String>,
    pub original: Option<String>,
    #[serde(rename = "rssTitle")]
    pub rss_title: Option<String>,
    #[serde(rename = "rssLink")]
    pub rss_link: Option<String>,
    #[serde(rename = "rssDescription")]
    pub rss_description: Option<String>,
    #[serde(rename = "rssItems")]
    pub rss_items: Vec<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// One loaded content file: parsed front matter plus the markdown body.
#[derive(Debug, Clone, Default)]
pub struct Document {
    meta: FrontMatter,
    body: String,
}

impl Document {
    /// Split front matter from body.
    ///
    /// A document starts with front matter only when its first line is a
    /// `---` fence. A present-but-unparsable block is an error (`origin`
    /// labels the failing document); a missing or unterminated fence means
    /// the whole text is body.
    pub fn parse(text: &str, origin: &str) -> Result<Self, ContentError> {
        let trimmed = text.trim_start_matches('\u{feff}');

        let Some(rest) = trimmed.strip_prefix("---") else {
            return Ok(Self {
                meta: FrontMatter::default(),
                body: trimmed.to_string(),
            });
        };
        let rest = rest.trim_start_matches(['\n', '\r']);

        let Some(end) = rest.find("\n---") else {
            return Ok(Self {
                meta: FrontMatter::default(),
                body: trimmed.to_string(),
            });
        };

        let yaml = &rest[..end];
        let body = rest[end + 4..].trim_start_matches(['\n', '\r']).to_string();

        if yaml.trim().is_empty() {
            return Ok(Self {
                meta: FrontMatter::default(),
                body,
            });
        }

        let meta: FrontMatter =
            serde_yaml::from_str(yaml).map_err(|source| ContentError::DocumentMalformed {
                path: origin.to_string(),
                source,
            })?;

        Ok(Self { meta, body })
    }

    pub fn meta(&self) -> &FrontMatter {
        &self.meta
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn title(&self) -> Option<&str> {
        self.meta.title.as_deref()
    }

    pub fn heading(&self) -> Option<&str> {
        self.meta.heading.as_deref()
    }

    /// `heading`, falling back to `title` when heading is absent or empty.
    pub fn heading_or_title(&self) -> Option<&str> {
        match self.heading() {
            Some(heading) if !heading.is_empty() => Some(heading),
            _ => self.title(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.meta.description.as_deref()
    }

    pub fn created(&self) -> Option<&str> {
        self.meta.created.as_deref()
    }

    pub fn modified(&self) -> Option<&str> {
        self.meta.modified.as_deref()
    }

    pub fn moved(&self) -> Option<&str> {
        self.meta.moved.as_deref()
    }

    pub fn original(&self) -> Option<&str> {
        self.meta.original.as_deref()
    }

    pub fn rss_title(&self) -> Option<&str> {
        self.meta.rss_title.as_deref()
    }

    pub fn rss_link(&self) -> Option<&str> {
        self.meta.rss_link.as_deref()
    }

    pub fn rss_description(&self) -> Option<&str> {
        self.meta.rss_description.as_deref()
    }

    pub fn rss_items(&self) -> &[String] {
        &self.meta.rss_items
    }

    /// Human-readable detail lines for the page header, in display order.
    /// Dates that fail to parse as `YYYYMMDD` are dropped.
    pub fn details(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(date) = self.modified().and_then(formatted_date) {
            lines.push(format!("Modified on: {}", date));
        }
        if let Some(date) = self.created().and_then(formatted_date) {
            lines.push(format!("Created on: {}", date));
        }
        if let Some(date) = self.moved().and_then(formatted_date) {
            lines.push(format!("Moved on: {}", date));
        }
        lines
    }
}
