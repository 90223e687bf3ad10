//! Streaming batch API: emit documents as they complete.
//!
//! Unlike [`crate::convert::convert_batch`], which returns once every
//! document is done, [`convert_stream`] yields each result as soon as it is
//! ready. Results arrive in completion order; use
//! [`crate::error::DocumentError::index`] or the source name to match them
//! back to their jobs.

use crate::config::NormalizeConfig;
use crate::convert::{convert_job, DocumentJob};
use crate::error::DocumentError;
use crate::output::NormalizedDocument;
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of per-document results.
pub type DocumentStream =
    Pin<Box<dyn Stream<Item = Result<NormalizedDocument, DocumentError>> + Send>>;

/// Normalise `jobs` concurrently, streaming results as they are ready.
///
/// At most `config.concurrency` documents are in flight. Progress callbacks
/// are not fired; the stream itself is the progress signal.
///
/// # Example
/// ```rust,no_run
/// use edgequake_readme2md::{convert_stream, DocumentJob, NormalizeConfig};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let jobs = vec![
///     DocumentJob::new("README.md", "https://raw.githubusercontent.com/o/r/main/"),
///     DocumentJob::new("docs/INSTALL.md", "https://raw.githubusercontent.com/o/r/main/docs/"),
/// ];
/// let mut stream = convert_stream(jobs, &NormalizeConfig::default());
/// while let Some(doc) = stream.next().await {
///     match doc {
///         Ok(d) => println!("{}: {} bytes", d.source, d.markdown.len()),
///         Err(e) => eprintln!("Error: {e}"),
///     }
/// }
/// # }
/// ```
pub fn convert_stream(jobs: Vec<DocumentJob>, config: &NormalizeConfig) -> DocumentStream {
    info!("Starting streaming batch of {} documents", jobs.len());
    let concurrency = config.concurrency.max(1);
    let config = config.clone();

    let s = stream::iter(jobs.into_iter().enumerate().map(move |(index, job)| {
        let cfg = config.clone();
        async move { convert_job(index, job, &cfg).await }
    }))
    .buffer_unordered(concurrency);

    Box::pin(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_job_list_yields_nothing() {
        let mut s = convert_stream(Vec::new(), &NormalizeConfig::default());
        assert!(s.next().await.is_none());
    }

    #[tokio::test]
    async fn streams_results_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");
        std::fs::write(&path, "<h1>Hi</h1>").unwrap();

        let jobs = vec![
            DocumentJob::new(path.to_str().unwrap(), "https://x.com"),
            DocumentJob::new(dir.path().join("missing.md").to_str().unwrap(), "https://x.com"),
        ];
        let results: Vec<_> = convert_stream(jobs, &NormalizeConfig::default())
            .collect()
            .await;

        assert_eq!(results.len(), 2);
        let ok: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(ok.len(), 1);
        assert_eq!(ok[0].markdown, "\n# Hi\n");
        let err = results.iter().find_map(|r| r.as_ref().err()).unwrap();
        assert_eq!(err.index(), 1);
    }
}
