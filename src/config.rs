//! Configuration types for README normalisation.
//!
//! [`NormalizeConfig`] carries the few knobs the rewrite pipeline has (which
//! hosts count as GitHub, whether link and video targets are resolved) plus
//! the batch-level settings used by [`crate::convert::convert_batch`]. It is
//! built via [`NormalizeConfigBuilder`] so callers set only what they care
//! about and rely on documented defaults for the rest.

use crate::error::Readme2MdError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Host serving GitHub's web UI, where `/blob/` URLs live.
pub const DEFAULT_WEB_HOST: &str = "github.com";

/// Host serving raw repository file contents.
pub const DEFAULT_RAW_HOST: &str = "raw.githubusercontent.com";

/// Configuration for README normalisation.
///
/// # Example
/// ```rust
/// use edgequake_readme2md::{NormalizeConfig, UrlPolicy};
///
/// let config = NormalizeConfig::builder()
///     .link_urls(UrlPolicy::Resolve)
///     .concurrency(4)
///     .build()
///     .unwrap();
/// assert_eq!(config.concurrency, 4);
/// ```
#[derive(Clone)]
pub struct NormalizeConfig {
    /// Host whose `/blob/` URLs are rewritten to raw-content URLs. Default: `github.com`.
    ///
    /// The `www.` form of this host is matched as well.
    pub web_host: String,

    /// Host that serves raw file bytes. Default: `raw.githubusercontent.com`.
    pub raw_host: String,

    /// How `<video>` sources are emitted. Default: [`UrlPolicy::Verbatim`].
    pub video_urls: UrlPolicy,

    /// How `<a href>` targets are emitted. Default: [`UrlPolicy::Verbatim`].
    ///
    /// Image URLs are always resolved; only plain links and videos are
    /// configurable.
    pub link_urls: UrlPolicy,

    /// Number of documents converted at once by the batch API. Default: 8.
    pub concurrency: usize,

    /// Receives batch progress events. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            web_host: DEFAULT_WEB_HOST.to_string(),
            raw_host: DEFAULT_RAW_HOST.to_string(),
            video_urls: UrlPolicy::default(),
            link_urls: UrlPolicy::default(),
            concurrency: 8,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for NormalizeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizeConfig")
            .field("web_host", &self.web_host)
            .field("raw_host", &self.raw_host)
            .field("video_urls", &self.video_urls)
            .field("link_urls", &self.link_urls)
            .field("concurrency", &self.concurrency)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl NormalizeConfig {
    /// Create a new builder for `NormalizeConfig`.
    pub fn builder() -> NormalizeConfigBuilder {
        NormalizeConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`NormalizeConfig`].
#[derive(Debug)]
pub struct NormalizeConfigBuilder {
    config: NormalizeConfig,
}

impl NormalizeConfigBuilder {
    pub fn web_host(mut self, host: impl Into<String>) -> Self {
        self.config.web_host = host.into();
        self
    }

    pub fn raw_host(mut self, host: impl Into<String>) -> Self {
        self.config.raw_host = host.into();
        self
    }

    pub fn video_urls(mut self, policy: UrlPolicy) -> Self {
        self.config.video_urls = policy;
        self
    }

    pub fn link_urls(mut self, policy: UrlPolicy) -> Self {
        self.config.link_urls = policy;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<NormalizeConfig, Readme2MdError> {
        let c = &self.config;
        for (label, host) in [("web host", &c.web_host), ("raw host", &c.raw_host)] {
            if host.trim().is_empty() {
                return Err(Readme2MdError::InvalidConfig(format!(
                    "{label} must not be empty"
                )));
            }
            if host.contains('/') {
                return Err(Readme2MdError::InvalidConfig(format!(
                    "{label} must be a bare host name, got '{host}'"
                )));
            }
        }
        if c.concurrency == 0 {
            return Err(Readme2MdError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Whether a URL category is passed through as written or resolved against
/// the base URL like image sources are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlPolicy {
    /// Emit the captured URL byte-for-byte. (default)
    #[default]
    Verbatim,
    /// Run the URL through [`crate::pipeline::resolve::UrlResolver`].
    Resolve,
}
