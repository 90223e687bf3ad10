//! Error types for the edgequake-readme2md library.
//!
//! The rewrite pipeline itself never fails: any string in, some string out.
//! Errors only exist around it, where documents are read from disk, release
//! JSON is parsed, and results are written back.
//!
//! * [`Readme2MdError`] — **Fatal**: the request cannot proceed at all
//!   (missing file, non-UTF-8 input, bad configuration). Returned as
//!   `Err(Readme2MdError)` from the top-level `convert*` functions.
//!
//! * [`DocumentError`] — **Non-fatal**: one document of a batch failed but
//!   the rest are fine. Stored inside [`crate::output::DocumentResult`] so a
//!   single unreadable file does not sink a whole directory run.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-readme2md library.
#[derive(Debug, Error)]
pub enum Readme2MdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string cannot be used as a document source.
    #[error("Invalid input '{input}': {reason}")]
    InvalidInput { input: String, reason: String },

    /// The file was read but its bytes are not valid UTF-8.
    #[error("Input '{path}' is not valid UTF-8 (first invalid byte at offset {offset})")]
    NotUtf8 { path: PathBuf, offset: usize },

    /// Reading the input failed for a reason other than the ones above.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Resolution errors ─────────────────────────────────────────────────
    /// The base URL is not an absolute http(s) URL.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// A repository reference is not of the form `owner/name[@branch]`.
    #[error("Invalid repository '{input}': expected owner/name or owner/name@branch")]
    InvalidRepo { input: String },

    /// A release payload could not be decoded.
    #[error("Invalid release JSON: {detail}")]
    InvalidRelease { detail: String },

    // ── Batch errors ──────────────────────────────────────────────────────
    /// A batch was requested with nothing in it.
    #[error("No documents to convert")]
    NoDocuments,

    /// Every document of a batch failed; output would be empty.
    #[error("All {total} documents failed.\nFirst error: {first_error}")]
    AllDocumentsFailed { total: usize, first_error: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single document in a batch.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum DocumentError {
    /// The document could not be located or read.
    #[error("Document {index} ('{source_name}'): read failed: {detail}")]
    ReadFailed {
        index: usize,
        source_name: String,
        detail: String,
    },

    /// The normalisation task died before producing output.
    #[error("Document {index} ('{source_name}'): normalisation aborted: {detail}")]
    Aborted {
        index: usize,
        source_name: String,
        detail: String,
    },
}

impl DocumentError {
    /// Zero-based position of the failed document in its batch.
    pub fn index(&self) -> usize {
        match self {
            DocumentError::ReadFailed { index, .. } | DocumentError::Aborted { index, .. } => {
                *index
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_documents_failed_display() {
        let e = Readme2MdError::AllDocumentsFailed {
            total: 3,
            first_error: "boom".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("All 3 documents"), "got: {msg}");
        assert!(msg.contains("boom"));
    }

    #[test]
    fn not_utf8_display() {
        let e = Readme2MdError::NotUtf8 {
            path: PathBuf::from("README.md"),
            offset: 17,
        };
        assert!(e.to_string().contains("offset 17"));
    }

    #[test]
    fn invalid_base_url_display() {
        let e = Readme2MdError::InvalidBaseUrl {
            url: "ftp://x".into(),
            reason: "scheme must be http or https".into(),
        };
        assert!(e.to_string().contains("ftp://x"));
        assert!(e.to_string().contains("http or https"));
    }

    #[test]
    fn document_error_index() {
        let e = DocumentError::ReadFailed {
            index: 4,
            source_name: "docs/a.md".into(),
            detail: "missing".into(),
        };
        assert_eq!(e.index(), 4);
        assert!(e.to_string().contains("docs/a.md"));
    }
}
