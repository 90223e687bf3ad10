//! File-level and batch conversion entry points.
//!
//! [`crate::normalize`] is the pure string API. The functions here add what
//! a tool needs around it: reading inputs, writing outputs atomically, and
//! converting many documents at once with bounded concurrency.

use crate::config::NormalizeConfig;
use crate::error::{DocumentError, Readme2MdError};
use crate::output::{BatchOutput, BatchStats, DocumentResult, NormalizeStats, NormalizedDocument};
use crate::pipeline::{input, normalize_with_stats, resolve::normalize_base_url};
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// One document of a batch: an input path (or `-`) and the base URL its
/// relative paths resolve against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentJob {
    pub input: String,
    pub base_url: String,
}

impl DocumentJob {
    pub fn new(input: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            base_url: base_url.into(),
        }
    }
}

/// Normalise text already in memory, recording statistics.
pub fn convert_text(
    source: impl Into<String>,
    text: &str,
    base_url: &str,
    config: &NormalizeConfig,
) -> NormalizedDocument {
    let start = Instant::now();
    let (markdown, passes) = normalize_with_stats(text, base_url, config);
    let stats = NormalizeStats {
        input_bytes: text.len(),
        output_bytes: markdown.len(),
        duration_us: start.elapsed().as_micros() as u64,
        passes,
    };
    NormalizedDocument {
        source: source.into(),
        base_url: normalize_base_url(base_url),
        markdown,
        stats,
    }
}

/// Read a document from a file path (or `-` for stdin) and normalise it.
///
/// # Errors
/// Returns `Err(Readme2MdError)` when the input cannot be read: missing
/// file, permission denied, URL input, or non-UTF-8 bytes. Normalisation
/// itself never fails.
pub async fn convert(
    input_str: impl AsRef<str>,
    base_url: &str,
    config: &NormalizeConfig,
) -> Result<NormalizedDocument, Readme2MdError> {
    let input_str = input_str.as_ref();
    info!("Normalising {}", input_str);

    let source = input::resolve_input(input_str)?;
    let text = input::read_document(&source).await?;
    let doc = convert_text(source.display_name(), &text, base_url, config);

    debug!(
        "{}: {} → {} bytes in {}µs",
        doc.source, doc.stats.input_bytes, doc.stats.output_bytes, doc.stats.duration_us
    );
    Ok(doc)
}

/// Normalise a document and write the result to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn convert_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    base_url: &str,
    config: &NormalizeConfig,
) -> Result<NormalizeStats, Readme2MdError> {
    let doc = convert(input_str, base_url, config).await?;
    write_atomic(output_path.as_ref(), &doc.markdown).await?;
    Ok(doc.stats)
}

/// Write `contents` to `path` via a sibling temp file and a rename,
/// creating parent directories as needed. The temp file is removed if the
/// rename fails.
pub async fn write_atomic(path: &Path, contents: &str) -> Result<(), Readme2MdError> {
    let write_err = |e| Readme2MdError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, contents)
        .await
        .map_err(write_err)?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }
    Ok(())
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input_str: impl AsRef<str>,
    base_url: &str,
    config: &NormalizeConfig,
) -> Result<NormalizedDocument, Readme2MdError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Readme2MdError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(input_str, base_url, config))
}

/// Convert one batch job. Failures come back as [`DocumentError`] so that
/// one bad file does not abort the batch.
pub(crate) async fn convert_job(
    index: usize,
    job: DocumentJob,
    config: &NormalizeConfig,
) -> Result<NormalizedDocument, DocumentError> {
    let DocumentJob {
        input: input_name,
        base_url,
    } = job;
    let read_failed = |e: Readme2MdError| DocumentError::ReadFailed {
        index,
        source_name: input_name.clone(),
        detail: e.to_string(),
    };
    let source = input::resolve_input(&input_name).map_err(read_failed)?;
    let text = input::read_document(&source).await.map_err(read_failed)?;

    let config = config.clone();
    let name = source.display_name();
    tokio::task::spawn_blocking(move || convert_text(name, &text, &base_url, &config))
        .await
        .map_err(|e| DocumentError::Aborted {
            index,
            source_name: input_name.clone(),
            detail: e.to_string(),
        })
}

/// Convert many documents concurrently.
///
/// At most `config.concurrency` documents are in flight at once. Results
/// come back in submission order; a document that cannot be read is
/// reported in its [`DocumentResult`] rather than failing the batch.
///
/// # Errors
/// - [`Readme2MdError::NoDocuments`] for an empty batch
/// - [`Readme2MdError::AllDocumentsFailed`] when not a single document
///   could be converted
pub async fn convert_batch(
    jobs: Vec<DocumentJob>,
    config: &NormalizeConfig,
) -> Result<BatchOutput, Readme2MdError> {
    if jobs.is_empty() {
        return Err(Readme2MdError::NoDocuments);
    }
    let total_start = Instant::now();
    let total = jobs.len();
    info!("Starting batch of {} documents", total);

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let mut documents: Vec<DocumentResult> = stream::iter(jobs.into_iter().enumerate().map(
        |(index, job)| async move {
            let source = job.input.clone();
            if let Some(ref cb) = config.progress_callback {
                cb.on_document_start(index, total, &source);
            }
            let result = convert_job(index, job, config).await;
            if let Some(ref cb) = config.progress_callback {
                match &result {
                    Ok(doc) => cb.on_document_complete(index, total, doc.markdown.len()),
                    Err(e) => cb.on_document_error(index, total, &e.to_string()),
                }
            }
            match result {
                Ok(doc) => DocumentResult {
                    index,
                    source,
                    document: Some(doc),
                    error: None,
                },
                Err(e) => {
                    warn!("{}", e);
                    DocumentResult {
                        index,
                        source,
                        document: None,
                        error: Some(e),
                    }
                }
            }
        },
    ))
    .buffer_unordered(config.concurrency.max(1))
    .collect()
    .await;

    documents.sort_by_key(|d| d.index);

    let succeeded = documents.iter().filter(|d| d.is_ok()).count();
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, succeeded);
    }

    if succeeded == 0 {
        let first_error = documents
            .iter()
            .find_map(|d| d.error.as_ref())
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string());
        return Err(Readme2MdError::AllDocumentsFailed { total, first_error });
    }

    let docs = documents.iter().filter_map(|d| d.document.as_ref());
    let stats = BatchStats {
        total_documents: total,
        succeeded,
        failed: total - succeeded,
        total_input_bytes: docs.clone().map(|d| d.stats.input_bytes as u64).sum(),
        total_output_bytes: docs.map(|d| d.stats.output_bytes as u64).sum(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Batch complete: {}/{} documents, {}ms total",
        succeeded, total, stats.total_duration_ms
    );

    Ok(BatchOutput { documents, stats })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_text_records_stats() {
        let doc = convert_text(
            "inline",
            "<b>x</b>",
            "https://x.com",
            &NormalizeConfig::default(),
        );
        assert_eq!(doc.markdown, "**x**");
        assert_eq!(doc.base_url, "https://x.com/");
        assert_eq!(doc.stats.input_bytes, 8);
        assert_eq!(doc.stats.output_bytes, 5);
        assert_eq!(doc.stats.passes.len(), 8);
    }

    #[tokio::test]
    async fn write_atomic_creates_parents_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/README.md");
        write_atomic(&path, "hello").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
        assert!(!path.with_extension("md.tmp").exists());
    }

    #[tokio::test]
    async fn failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        let err = write_atomic(&path, "hello").await.unwrap_err();
        assert!(matches!(err, Readme2MdError::OutputWriteFailed { .. }));
        assert!(!path.with_extension("md.tmp").exists());
        assert!(path.is_dir());
    }

    #[tokio::test]
    async fn empty_batch_is_an_error() {
        let err = convert_batch(Vec::new(), &NormalizeConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Readme2MdError::NoDocuments));
    }

    #[tokio::test]
    async fn job_failure_is_captured() {
        let err = convert_job(
            3,
            DocumentJob::new("/no/such/file.md", "https://x.com"),
            &NormalizeConfig::default(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.index(), 3);
    }
}
