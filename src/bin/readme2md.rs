//! CLI binary for edgequake-readme2md.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `NormalizeConfig` and prints or writes results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_readme2md::pipeline::input::{read_document, resolve_input, validate_base_url};
use edgequake_readme2md::{
    convert, convert_batch, normalize_release, write_atomic, BatchProgressCallback, DocumentJob,
    NormalizeConfig, ProgressCallback, RepoRef, UrlPolicy,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress bar for batch runs. Documents complete out of order,
/// so every line names its document.
struct CliProgressCallback {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} documents  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Normalising");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn on_document_start(&self, _index: usize, _total: usize, source: &str) {
        self.bar.set_message(source.to_string());
    }

    fn on_document_complete(&self, index: usize, total: usize, output_bytes: usize) {
        self.bar.println(format!(
            "  {} Document {:>3}/{:<3}  {}",
            green("✓"),
            index + 1,
            total,
            dim(&format!("{output_bytes:>6} bytes")),
        ));
        self.bar.inc(1);
    }

    fn on_document_error(&self, index: usize, total: usize, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        let msg = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} Document {:>3}/{:<3}  {}",
            red("✗"),
            index + 1,
            total,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total: usize, succeeded: usize) {
        self.bar.finish_and_clear();
        let failed = self.errors.load(Ordering::SeqCst);
        eprintln!("{}", batch_summary(total, succeeded, failed));
    }
}

/// One-line batch summary; `failed` counts the error callbacks seen.
fn batch_summary(total: usize, succeeded: usize, failed: usize) -> String {
    if failed == 0 {
        format!("{} {} documents normalised", green("✔"), bold(&succeeded.to_string()))
    } else {
        format!(
            "{} {}/{} documents normalised  ({} failed)",
            if failed == total { red("✘") } else { cyan("⚠") },
            bold(&succeeded.to_string()),
            total,
            red(&failed.to_string()),
        )
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # README fetched by some other tool, base URL given explicitly
  readme2md README.md --base-url https://raw.githubusercontent.com/octo/hello/main/

  # Same, deriving the base URL from the repository
  readme2md README.md --repo octo/hello@main -o clean.md

  # From stdin
  curl -s https://raw.githubusercontent.com/octo/hello/main/README.md \
    | readme2md - --repo octo/hello

  # A directory of documents
  readme2md docs/*.md --repo octo/hello --output-dir out/

  # A release payload from the GitHub REST API
  readme2md release.json --release --repo octo/hello@v1.2.0 --json

ENVIRONMENT VARIABLES:
  README2MD_BASE_URL     Default --base-url
  README2MD_REPO         Default --repo
  README2MD_CONCURRENCY  Default --concurrency
  RUST_LOG               Override the log filter (e.g. readme2md=trace)
"#;

/// Normalise GitHub README and release-note HTML into renderer-safe Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "readme2md",
    version,
    about = "Normalise GitHub README and release-note HTML into renderer-safe Markdown",
    long_about = "Rewrite the raw HTML embedded in GitHub READMEs and release notes into plain \
Markdown: images and videos, headings, inline formatting, links and layout wrappers. Relative \
asset paths are resolved against a base URL, GitHub blob links become raw-content links, and SVG \
images degrade to their alt text.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input files, or `-` for stdin.
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Base URL relative asset paths resolve against.
    #[arg(long, env = "README2MD_BASE_URL", conflicts_with = "repo")]
    base_url: Option<String>,

    /// Repository as owner/name[@branch]; sets the base URL to its raw-content root.
    #[arg(long, env = "README2MD_REPO")]
    repo: Option<String>,

    /// Write Markdown to this file instead of stdout (single input only).
    #[arg(short, long, env = "README2MD_OUTPUT", conflicts_with = "output_dir")]
    output: Option<PathBuf>,

    /// Directory for batch output; each input is written as <stem>.md.
    #[arg(long, env = "README2MD_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Treat the input as a GitHub release JSON object and normalise its body.
    #[arg(long)]
    release: bool,

    /// Output structured JSON instead of Markdown.
    #[arg(long, env = "README2MD_JSON")]
    json: bool,

    /// Resolve <a href> targets against the base URL too.
    #[arg(long, env = "README2MD_RESOLVE_LINKS")]
    resolve_links: bool,

    /// Resolve <video> sources against the base URL too.
    #[arg(long, env = "README2MD_RESOLVE_VIDEOS")]
    resolve_videos: bool,

    /// Host whose /blob/ links are rewritten.
    #[arg(long, env = "README2MD_WEB_HOST", default_value = "github.com")]
    web_host: String,

    /// Host serving raw file contents.
    #[arg(long, env = "README2MD_RAW_HOST", default_value = "raw.githubusercontent.com")]
    raw_host: String,

    /// Number of documents converted at once.
    #[arg(short, long, env = "README2MD_CONCURRENCY", default_value_t = 8)]
    concurrency: usize,

    /// Disable progress bar.
    #[arg(long, env = "README2MD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "README2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "README2MD_QUIET")]
    quiet: bool,
}

fn policy(resolve: bool) -> UrlPolicy {
    if resolve {
        UrlPolicy::Resolve
    } else {
        UrlPolicy::Verbatim
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let batch = cli.inputs.len() > 1;

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs in batch mode.
    let show_progress = batch && !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let base_url = resolve_base_url(&cli)?;

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn BatchProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    if cli.release {
        return run_release(&cli, &base_url, &config).await;
    }
    if batch || cli.output_dir.is_some() {
        return run_batch(&cli, &base_url, &config).await;
    }
    run_single(&cli, &base_url, &config).await
}

/// `--base-url` wins; otherwise derive it from `--repo`.
fn resolve_base_url(cli: &Cli) -> Result<String> {
    if let Some(ref url) = cli.base_url {
        validate_base_url(url).context("Invalid --base-url")?;
        return Ok(url.clone());
    }
    if let Some(ref repo) = cli.repo {
        let repo: RepoRef = repo.parse().context("Invalid --repo")?;
        return Ok(repo.raw_base_url(&cli.raw_host));
    }
    anyhow::bail!("One of --base-url or --repo is required")
}

/// Map CLI args to `NormalizeConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<NormalizeConfig> {
    let mut builder = NormalizeConfig::builder()
        .web_host(cli.web_host.clone())
        .raw_host(cli.raw_host.clone())
        .link_urls(policy(cli.resolve_links))
        .video_urls(policy(cli.resolve_videos))
        .concurrency(cli.concurrency);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

async fn run_single(cli: &Cli, base_url: &str, config: &NormalizeConfig) -> Result<()> {
    let input = &cli.inputs[0];
    let doc = convert(input, base_url, config)
        .await
        .context("Normalisation failed")?;

    let rendered = if cli.json {
        serde_json::to_string_pretty(&doc).context("Failed to serialise output")?
    } else {
        doc.markdown.clone()
    };
    emit(cli.output.as_deref(), &rendered).await?;

    if !cli.quiet {
        eprintln!(
            "{}  {} → {} bytes  {}µs",
            green("✔"),
            doc.stats.input_bytes,
            doc.stats.output_bytes,
            doc.stats.duration_us,
        );
    }
    Ok(())
}

async fn run_release(cli: &Cli, base_url: &str, config: &NormalizeConfig) -> Result<()> {
    if cli.inputs.len() != 1 {
        anyhow::bail!("--release takes exactly one input");
    }
    let source = resolve_input(&cli.inputs[0]).context("Cannot open release input")?;
    let json = read_document(&source)
        .await
        .context("Failed to read release input")?;
    let notes = normalize_release(&json, base_url, config).context("Release conversion failed")?;

    let rendered = if cli.json {
        serde_json::to_string_pretty(&notes).context("Failed to serialise release notes")?
    } else {
        notes.markdown.clone()
    };
    emit(cli.output.as_deref(), &rendered).await?;

    if !cli.quiet {
        eprintln!(
            "{}  {} {}  {} assets",
            green("✔"),
            bold(&notes.title),
            dim(&notes.tag_name),
            notes.assets.len()
        );
    }
    Ok(())
}

async fn run_batch(cli: &Cli, base_url: &str, config: &NormalizeConfig) -> Result<()> {
    if cli.output_dir.is_none() && !cli.json {
        anyhow::bail!("Several inputs need --output-dir (or --json)");
    }

    let jobs: Vec<DocumentJob> = cli
        .inputs
        .iter()
        .map(|input| DocumentJob::new(input.clone(), base_url))
        .collect();
    let output = convert_batch(jobs, config)
        .await
        .context("Batch conversion failed")?;

    if let Some(ref dir) = cli.output_dir {
        let mut used = HashSet::new();
        for doc in output.succeeded() {
            let path = dir.join(output_file_name(&doc.source, &mut used));
            write_atomic(&path, &doc.markdown)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    }

    if !cli.quiet && config.progress_callback.is_none() {
        eprintln!(
            "Normalised {}/{} documents in {}ms",
            output.stats.succeeded, output.stats.total_documents, output.stats.total_duration_ms
        );
        for failure in output.failures() {
            eprintln!("  {} {}", red("✗"), failure);
        }
    }
    Ok(())
}

/// Write to `path` atomically, or to stdout with a trailing newline.
async fn emit(path: Option<&Path>, contents: &str) -> Result<()> {
    if let Some(path) = path {
        write_atomic(path, contents)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        return Ok(());
    }
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(contents.as_bytes())
        .context("Failed to write to stdout")?;
    if !contents.ends_with('\n') {
        handle.write_all(b"\n").ok();
    }
    Ok(())
}

/// `<stem>.md`, suffixed with a counter when two inputs share a stem.
fn output_file_name(source: &str, used: &mut HashSet<String>) -> String {
    let stem = Path::new(source)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty() && *s != "-")
        .unwrap_or("stdin");
    let mut name = format!("{stem}.md");
    let mut n = 2;
    while !used.insert(name.clone()) {
        name = format!("{stem}-{n}.md");
        n += 1;
    }
    name
}
