//! Input resolution: turn a user-supplied argument into document text.
//!
//! Fetching README or release content over HTTP belongs to the caller, so a
//! URL argument is rejected with a hint instead of being downloaded. Local
//! files and stdin are read in full and must be valid UTF-8.

use crate::error::Readme2MdError;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::debug;
use url::Url;

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Read from standard input (`-`).
    Stdin,
    /// A local file.
    Local(PathBuf),
}

impl DocumentSource {
    /// Human-readable name used in logs and results.
    pub fn display_name(&self) -> String {
        match self {
            DocumentSource::Stdin => "-".to_string(),
            DocumentSource::Local(p) => p.display().to_string(),
        }
    }

    fn path(&self) -> &Path {
        match self {
            DocumentSource::Stdin => Path::new("<stdin>"),
            DocumentSource::Local(p) => p,
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input argument to a readable document source.
pub fn resolve_input(input: &str) -> Result<DocumentSource, Readme2MdError> {
    if input == "-" {
        return Ok(DocumentSource::Stdin);
    }
    if is_url(input) {
        return Err(Readme2MdError::InvalidInput {
            input: input.to_string(),
            reason: "URLs are not fetched; download the document and pass the file or pipe it to stdin"
                .to_string(),
        });
    }

    let path = PathBuf::from(input);
    if !path.exists() {
        return Err(Readme2MdError::FileNotFound { path });
    }
    if path.is_dir() {
        return Err(Readme2MdError::InvalidInput {
            input: input.to_string(),
            reason: "is a directory".to_string(),
        });
    }

    match std::fs::File::open(&path) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Readme2MdError::PermissionDenied { path });
        }
        Err(_) => return Err(Readme2MdError::FileNotFound { path }),
    }

    debug!("Resolved local document: {}", path.display());
    Ok(DocumentSource::Local(path))
}

/// Read the whole document as UTF-8 text.
pub async fn read_document(source: &DocumentSource) -> Result<String, Readme2MdError> {
    let bytes = match source {
        DocumentSource::Stdin => {
            let mut buf = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut buf)
                .await
                .map_err(|e| Readme2MdError::ReadFailed {
                    path: source.path().to_path_buf(),
                    source: e,
                })?;
            buf
        }
        DocumentSource::Local(path) => {
            tokio::fs::read(path)
                .await
                .map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => {
                        Readme2MdError::FileNotFound { path: path.clone() }
                    }
                    std::io::ErrorKind::PermissionDenied => {
                        Readme2MdError::PermissionDenied { path: path.clone() }
                    }
                    _ => Readme2MdError::ReadFailed {
                        path: path.clone(),
                        source: e,
                    },
                })?
        }
    };
    decode_utf8(bytes, source.path())
}

fn decode_utf8(bytes: Vec<u8>, path: &Path) -> Result<String, Readme2MdError> {
    String::from_utf8(bytes).map_err(|e| Readme2MdError::NotUtf8 {
        path: path.to_path_buf(),
        offset: e.utf8_error().valid_up_to(),
    })
}

/// Require an absolute `http://` or `https://` URL with a host.
///
/// The pipeline itself accepts any string as a base URL; this check exists
/// for callers that take the base URL from a user.
pub fn validate_base_url(url: &str) -> Result<(), Readme2MdError> {
    let invalid = |reason: &str| Readme2MdError::InvalidBaseUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    };
    if url.chars().any(char::is_whitespace) {
        return Err(invalid("contains whitespace"));
    }
    let parsed = Url::parse(url).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host"));
    }
    Ok(())
}
