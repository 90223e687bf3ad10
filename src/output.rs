//! Result types for the file-level and batch APIs.
//!
//! All of them serialise to JSON for `readme2md --json`.

use crate::error::DocumentError;
use serde::Serialize;

/// Size of the document before and after one pipeline pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassStat {
    pub name: &'static str,
    pub input_bytes: usize,
    pub output_bytes: usize,
}

/// Statistics for one normalised document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizeStats {
    pub input_bytes: usize,
    pub output_bytes: usize,
    pub duration_us: u64,
    pub passes: Vec<PassStat>,
}

/// A single normalised document.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedDocument {
    /// Input path as given by the caller (`-` for stdin).
    pub source: String,
    /// Base URL after normalisation (always ends with `/`).
    pub base_url: String,
    pub markdown: String,
    pub stats: NormalizeStats,
}

/// Outcome of one document in a batch: exactly one of `document` and
/// `error` is set.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResult {
    /// Zero-based position in the submitted batch.
    pub index: usize,
    pub source: String,
    pub document: Option<NormalizedDocument>,
    pub error: Option<DocumentError>,
}

impl DocumentResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate statistics for a batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchStats {
    pub total_documents: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_input_bytes: u64,
    pub total_output_bytes: u64,
    pub total_duration_ms: u64,
}

/// Everything a batch produced, in submission order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutput {
    pub documents: Vec<DocumentResult>,
    pub stats: BatchStats,
}

impl BatchOutput {
    /// Successfully normalised documents, in submission order.
    pub fn succeeded(&self) -> impl Iterator<Item = &NormalizedDocument> {
        self.documents.iter().filter_map(|d| d.document.as_ref())
    }

    /// Failures, in submission order.
    pub fn failures(&self) -> impl Iterator<Item = &DocumentError> {
        self.documents.iter().filter_map(|d| d.error.as_ref())
    }
}
