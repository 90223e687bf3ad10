//! GitHub release notes.
//!
//! A release's `body` is the same HTML-flavoured Markdown a README is, so it
//! goes through the same pipeline. This module decodes the release payload
//! of the GitHub REST API (only the fields the renderer shows) and returns
//! the normalised notes alongside the metadata.

use crate::config::NormalizeConfig;
use crate::error::Readme2MdError;
use crate::pipeline::normalize_with;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// The subset of a GitHub release object this crate reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubRelease {
    pub tag_name: String,
    pub name: Option<String>,
    pub body: Option<String>,
    pub draft: bool,
    pub prerelease: bool,
    pub html_url: Option<String>,
    pub assets: Vec<ReleaseAsset>,
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
    pub size: u64,
    pub content_type: Option<String>,
}

/// Normalised release notes, ready to render.
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseNotes {
    pub tag_name: String,
    /// Release name, falling back to the tag when the name is missing or blank.
    pub title: String,
    pub draft: bool,
    pub prerelease: bool,
    pub markdown: String,
    pub assets: Vec<ReleaseAsset>,
}

impl GithubRelease {
    /// Decode a release object from JSON.
    pub fn from_json(json: &str) -> Result<Self, Readme2MdError> {
        serde_json::from_str(json).map_err(|e| Readme2MdError::InvalidRelease {
            detail: e.to_string(),
        })
    }

    /// Display title: `name` if non-blank, else `tag_name`.
    pub fn title(&self) -> &str {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => &self.tag_name,
        }
    }

    /// Normalise the release body. A missing body yields empty notes.
    pub fn to_notes(&self, base_url: &str, config: &NormalizeConfig) -> ReleaseNotes {
        if self.draft {
            warn!("Release {} is a draft", self.tag_name);
        }
        let markdown = normalize_with(self.body.as_deref().unwrap_or(""), base_url, config);
        info!(
            "Normalised release {} ({} assets, {} bytes)",
            self.tag_name,
            self.assets.len(),
            markdown.len()
        );
        ReleaseNotes {
            tag_name: self.tag_name.clone(),
            title: self.title().to_string(),
            draft: self.draft,
            prerelease: self.prerelease,
            markdown,
            assets: self.assets.clone(),
        }
    }
}

/// Decode a release JSON payload and normalise its body.
pub fn normalize_release(
    json: &str,
    base_url: &str,
    config: &NormalizeConfig,
) -> Result<ReleaseNotes, Readme2MdError> {
    Ok(GithubRelease::from_json(json)?.to_notes(base_url, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELEASE: &str = r#"{
        "tag_name": "v1.2.0",
        "name": "Spring release",
        "body": "<h2>Changes</h2><ul><li>Faster</li></ul><img src=\"docs/shot.png\" alt=\"shot\">",
        "draft": false,
        "prerelease": true,
        "html_url": "https://github.com/o/r/releases/tag/v1.2.0",
        "assets": [
            {
                "name": "app.apk",
                "browser_download_url": "https://github.com/o/r/releases/download/v1.2.0/app.apk",
                "size": 1024,
                "content_type": "application/vnd.android.package-archive",
                "download_count": 7
            }
        ],
        "author": { "login": "octo" }
    }"#;

    #[test]
    fn normalises_body_and_keeps_metadata() {
        let notes = normalize_release(
            RELEASE,
            "https://raw.githubusercontent.com/o/r/v1.2.0",
            &NormalizeConfig::default(),
        )
        .unwrap();
        assert_eq!(notes.tag_name, "v1.2.0");
        assert_eq!(notes.title, "Spring release");
        assert!(notes.prerelease);
        assert!(notes.markdown.contains("## Changes"));
        assert!(notes
            .markdown
            .contains("![shot](https://raw.githubusercontent.com/o/r/v1.2.0/docs/shot.png)"));
        assert_eq!(notes.assets.len(), 1);
        assert_eq!(notes.assets[0].size, 1024);
    }

    #[test]
    fn missing_optional_fields_default() {
        let release = GithubRelease::from_json(r#"{"tag_name":"v0.1"}"#).unwrap();
        assert_eq!(release.title(), "v0.1");
        assert!(release.assets.is_empty());
        let notes = release.to_notes("https://x.com", &NormalizeConfig::default());
        assert_eq!(notes.markdown, "");
    }

    #[test]
    fn blank_name_falls_back_to_tag() {
        let release = GithubRelease {
            tag_name: "v2".into(),
            name: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(release.title(), "v2");
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = GithubRelease::from_json("not json").unwrap_err();
        assert!(matches!(err, Readme2MdError::InvalidRelease { .. }));
    }
}
