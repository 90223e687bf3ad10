//! # edgequake-readme2md
//!
//! Normalise the HTML-flavoured Markdown found in GitHub READMEs and release
//! notes into clean Markdown that any standard renderer can display.
//!
//! ## Why this crate?
//!
//! READMEs are written for GitHub's own renderer. They lean on raw HTML:
//! centred `<div>`s, `<picture>` elements with dark-mode sources, badges
//! wrapped in links, `<details>` blocks, and images referenced by paths
//! relative to the repository. A plain Markdown renderer shows most of that
//! as literal tags or broken images. This crate rewrites those constructs
//! into their Markdown equivalents, resolves asset paths against a base URL,
//! turns GitHub "blob" links into raw-content links, and drops SVG images
//! the downstream image path cannot display.
//!
//! ## Pipeline Overview
//!
//! ```text
//! README text + base URL
//!  │
//!  ├─ 1. Unwrap    <picture>, <source>, image-wrapping <a>
//!  ├─ 2. Media     <img>, ![](…), <video>  (URL resolution, SVG exclusion)
//!  ├─ 3. Blocks    <h1>–<h6>, <br>, <hr>
//!  ├─ 4. Inline    <b> <i> <s> <code> <kbd>
//!  ├─ 5. Links     <a href>
//!  ├─ 6. Wrappers  <div align=center>, <p>, <details>, <summary>, <span>…
//!  ├─ 7. Entities  &amp; &lt; &gt; &quot; &#39; &apos; &nbsp;
//!  └─ 8. Cleanup   blank lines, empty <p>, orphaned ](url)
//! ```
//!
//! The rewrites are surface-level pattern substitutions, not an HTML parser:
//! nested same-name tags are not balanced, and malformed markup is left as
//! literal text rather than rejected.
//!
//! ## Quick Start
//!
//! ```rust
//! use edgequake_readme2md::normalize;
//!
//! let md = normalize(
//!     "<p align=\"center\"><img src=\"docs/logo.png\" alt=\"Logo\"></p>",
//!     "https://raw.githubusercontent.com/octo/hello/main",
//! );
//! assert_eq!(md, "\n![Logo](https://raw.githubusercontent.com/octo/hello/main/docs/logo.png)\n");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `readme2md` binary (clap + anyhow + indicatif + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod release;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{NormalizeConfig, NormalizeConfigBuilder, UrlPolicy};
pub use convert::{
    convert, convert_batch, convert_sync, convert_text, convert_to_file, write_atomic, DocumentJob,
};
pub use error::{DocumentError, Readme2MdError};
pub use output::{
    BatchOutput, BatchStats, DocumentResult, NormalizeStats, NormalizedDocument, PassStat,
};
pub use pipeline::resolve::{is_svg, resolve, RepoRef, UrlResolver};
pub use pipeline::{normalize, normalize_with, normalize_with_stats};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
pub use release::{normalize_release, GithubRelease, ReleaseAsset, ReleaseNotes};
pub use stream::{convert_stream, DocumentStream};
