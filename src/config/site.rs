//! Site configuration (site.yml)

use anyhow::Result;
use chrono::{Datelike, Local};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::content::ContentError;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title, used when the content tree itself offers none
    pub title: String,
    /// Absolute site root, e.g. `https://example.com`
    pub url: String,
    /// Site-level default description; first fallback when a page has none
    pub description: String,
    /// Copyright holder
    pub author: String,
    pub language: String,
    /// IANA timezone name used for feed publication dates
    pub timezone: String,
    /// Local content tree directory, relative to the base dir
    pub content_dir: String,
    /// Path of the content tree inside the remote repository; setting this
    /// (plus complete credentials in the environment) enables the remote
    /// backend
    pub remote_root: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            url: "http://example.com".to_string(),
            description: String::new(),
            author: String::new(),
            language: "en-us".to_string(),
            timezone: "America/Chicago".to_string(),
            content_dir: "content".to_string(),
            remote_root: None,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Parsed timezone, falling back to the default when the configured name
    /// is unknown.
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or_else(|_| {
            tracing::warn!("unknown timezone {:?}, using America/Chicago", self.timezone);
            chrono_tz::America::Chicago
        })
    }

    /// Copyright line for the current year
    pub fn copyright(&self) -> String {
        let year = Local::now().year();
        if self.author.is_empty() {
            format!("Copyright © {}. All rights reserved.", year)
        } else {
            format!(
                "Copyright © {} {}. All rights reserved.",
                self.author, year
            )
        }
    }
}

/// Remote repository credentials, read from the environment.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub token: String,
    pub username: String,
    pub repository: String,
}

const TOKEN_VAR: &str = "GITHUB_PERSONAL_TOKEN";
const USERNAME_VAR: &str = "GITHUB_USERNAME";
const REPO_VAR: &str = "GITHUB_REPO";

impl RemoteConfig {
    /// Read credentials from the environment.
    ///
    /// All three variables absent means local-only operation (`Ok(None)`);
    /// a partial set is a configuration error the caller should log before
    /// downgrading.
    pub fn from_env() -> Result<Option<Self>, ContentError> {
        Self::from_values(
            env::var(TOKEN_VAR).ok(),
            env::var(USERNAME_VAR).ok(),
            env::var(REPO_VAR).ok(),
        )
    }

    fn from_values(
        token: Option<String>,
        username: Option<String>,
        repository: Option<String>,
    ) -> Result<Option<Self>, ContentError> {
        match (token, username, repository) {
            (Some(token), Some(username), Some(repository)) => Ok(Some(Self {
                token,
                username,
                repository,
            })),
            (None, None, None) => Ok(None),
            (token, username, repository) => {
                let mut missing = Vec::new();
                if token.is_none() {
                    missing.push(TOKEN_VAR);
                }
                if username.is_none() {
                    missing.push(USERNAME_VAR);
                }
                if repository.is_none() {
                    missing.push(REPO_VAR);
                }
                Err(ContentError::ConfigurationIncomplete {
                    missing: missing.join(", "),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.language, "en-us");
        assert_eq!(config.timezone, "America/Chicago");
        assert!(config.remote_root.is_none());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: A Site
url: https://example.com
author: Example
timezone: America/Detroit
remote_root: site/content
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "A Site");
        assert_eq!(config.author, "Example");
        assert_eq!(config.tz(), chrono_tz::America::Detroit);
        assert_eq!(config.remote_root.as_deref(), Some("site/content"));
    }

    #[test]
    fn test_unknown_timezone_falls_back() {
        let config = SiteConfig {
            timezone: "Nowhere/At-All".to_string(),
            ..SiteConfig::default()
        };
        assert_eq!(config.tz(), chrono_tz::America::Chicago);
    }

    #[test]
    fn test_copyright_line() {
        let config = SiteConfig {
            author: "Example".to_string(),
            ..SiteConfig::default()
        };
        let line = config.copyright();
        assert!(line.starts_with("Copyright © Example "));
        assert!(line.ends_with(". All rights reserved."));
    }

    #[test]
    fn test_remote_credentials_complete() {
        let remote = RemoteConfig::from_values(
            Some("token".into()),
            Some("user".into()),
            Some("repo".into()),
        )
        .unwrap()
        .unwrap();
        assert_eq!(remote.username, "user");
        assert_eq!(remote.repository, "repo");
    }

    #[test]
    fn test_remote_credentials_absent() {
        assert!(RemoteConfig::from_values(None, None, None)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_remote_credentials_partial() {
        let err = RemoteConfig::from_values(Some("token".into()), None, None).unwrap_err();
        assert!(matches!(err, ContentError::ConfigurationIncomplete { .. }));
        assert!(err.to_string().contains(USERNAME_VAR));
        assert!(err.to_string().contains(REPO_VAR));
    }
}
