//! URL resolution shared by the rewrite passes.
//!
//! README markup points at assets in three shapes: absolute URLs, GitHub
//! "view file" URLs (`https://github.com/o/r/blob/main/x.png`, which serve an
//! HTML page rather than the bytes), and paths relative to the repository
//! root. [`UrlResolver`] turns all three into something an image renderer can
//! fetch directly. It never fails; odd input yields a best-effort string.

use crate::config::{NormalizeConfig, DEFAULT_RAW_HOST, DEFAULT_WEB_HOST};
use crate::error::Readme2MdError;
use std::fmt;
use std::str::FromStr;
use url::Url;

const BLOB_SEGMENT: &str = "/blob/";

/// Resolves asset paths against a normalised base URL.
#[derive(Debug, Clone)]
pub struct UrlResolver<'a> {
    base_url: String,
    web_host: &'a str,
    raw_host: &'a str,
}

impl<'a> UrlResolver<'a> {
    /// Build a resolver for `base_url`, appending a trailing `/` if absent.
    pub fn new(base_url: &str, config: &'a NormalizeConfig) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            web_host: &config.web_host,
            raw_host: &config.raw_host,
        }
    }

    /// The base URL after normalisation (always ends with `/`).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve an image or asset path.
    ///
    /// Absolute `http://`, `https://` and `data:` references keep their
    /// target but have GitHub blob URLs rewritten to raw-content URLs.
    /// Everything else is relative: leading `.` and `/` characters are
    /// stripped and the remainder is appended to the base URL.
    pub fn resolve(&self, path: &str) -> String {
        let path = path.trim();
        if is_absolute(path) {
            self.canonicalize_blob(path)
        } else {
            let cleaned = path.trim_start_matches(['.', '/']);
            format!("{}{}", self.base_url, cleaned)
        }
    }

    /// Resolve a hyperlink target.
    ///
    /// In-page anchors and `mailto:` links have no meaning relative to the
    /// base URL and are returned untouched.
    pub fn resolve_link(&self, href: &str) -> String {
        let trimmed = href.trim();
        if trimmed.starts_with('#') || starts_with_ignore_case(trimmed, "mailto:") {
            href.to_string()
        } else {
            self.resolve(trimmed)
        }
    }

    /// Rewrite `https://github.com/o/r/blob/ref/path` to
    /// `https://raw.githubusercontent.com/o/r/ref/path`.
    ///
    /// Only URLs whose parsed host is the web host are touched; the rewrite
    /// itself splices the original text so the path keeps its exact spelling.
    fn canonicalize_blob(&self, url: &str) -> String {
        let on_web_host = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|host| self.is_web_host(host)))
            .unwrap_or(false);
        if !on_web_host {
            return url.to_string();
        }
        let Some((scheme, rest)) = url.split_once("://") else {
            return url.to_string();
        };
        let tail = &rest[rest.find(['/', '?', '#']).unwrap_or(rest.len())..];
        match tail.find(BLOB_SEGMENT) {
            Some(i) => format!(
                "{scheme}://{}{}/{}",
                self.raw_host,
                &tail[..i],
                &tail[i + BLOB_SEGMENT.len()..]
            ),
            None => url.to_string(),
        }
    }

    fn is_web_host(&self, host: &str) -> bool {
        host.strip_prefix("www.")
            .unwrap_or(host)
            .eq_ignore_ascii_case(self.web_host)
    }
}

/// Resolve `path` against `base_url` with the default GitHub hosts.
pub fn resolve(path: &str, base_url: &str) -> String {
    let config = NormalizeConfig::default();
    UrlResolver::new(base_url, &config).resolve(path)
}

/// True if the URL names an SVG file, optionally followed by a query string
/// or fragment. Case-insensitive.
pub fn is_svg(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.ends_with(".svg") || lower.contains(".svg?") || lower.contains(".svg#")
}

/// Append a trailing `/` unless one is already present.
pub fn normalize_base_url(base_url: &str) -> String {
    if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    }
}

fn is_absolute(path: &str) -> bool {
    ["http://", "https://", "data:"]
        .iter()
        .any(|prefix| starts_with_ignore_case(path, prefix))
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

// ── Repository references ────────────────────────────────────────────────

/// A GitHub repository plus the branch whose files relative paths point at.
///
/// Parsed from `owner/name` or `owner/name@branch`. Without a branch the raw
/// host's `HEAD` alias is used, which follows the default branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
    pub branch: String,
}

impl RepoRef {
    /// Raw-content root for this repository, suitable as a base URL.
    pub fn raw_base_url(&self, raw_host: &str) -> String {
        format!(
            "https://{}/{}/{}/{}/",
            raw_host, self.owner, self.name, self.branch
        )
    }

    /// Same as [`RepoRef::raw_base_url`] on the default raw host.
    pub fn default_raw_base_url(&self) -> String {
        self.raw_base_url(DEFAULT_RAW_HOST)
    }

    /// Web URL of the repository on the default web host.
    pub fn web_url(&self) -> String {
        format!("https://{}/{}/{}", DEFAULT_WEB_HOST, self.owner, self.name)
    }
}

impl FromStr for RepoRef {
    type Err = Readme2MdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Readme2MdError::InvalidRepo {
            input: s.to_string(),
        };
        let trimmed = s.trim();
        let (repo, branch) = match trimmed.split_once('@') {
            Some((repo, branch)) if !branch.is_empty() => (repo, branch),
            Some(_) => return Err(invalid()),
            None => (trimmed, "HEAD"),
        };
        let (owner, name) = repo.split_once('/').ok_or_else(invalid)?;
        let well_formed = |part: &str| {
            !part.is_empty() && !part.contains('/') && !part.chars().any(char::is_whitespace)
        };
        if !well_formed(owner) || !well_formed(name) || branch.chars().any(char::is_whitespace) {
            return Err(invalid());
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
            branch: branch.to_string(),
        })
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.name, self.branch)
    }
}
