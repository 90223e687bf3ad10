//! The README normalisation pipeline.
//!
//! Each submodule implements exactly one whole-document rewrite. The driver
//! runs them in a fixed order; later passes rely on earlier ones having
//! already normalised certain constructs, so the order is part of the
//! contract.
//!
//! ## Data Flow
//!
//! ```text
//! unwrap ──▶ media ──▶ blocks ──▶ inline ──▶ links ──▶ wrappers ──▶ entities ──▶ cleanup
//! ```
//!
//! 1. [`unwrap`]   — drop `<picture>`/`<source>` fallbacks and image-wrapping
//!    links so only bare `<img>` tags remain
//! 2. [`media`]    — `<img>`, Markdown images and `<video>` to Markdown, with
//!    URL resolution and SVG exclusion; must precede `inline` so the image
//!    syntax is final before formatting rules run
//! 3. [`block`]    — headings, `<br>`, `<hr>`
//! 4. [`inline`]   — bold, italic, strikethrough, code, keyboard spans
//! 5. [`links`]    — text anchors to `[text](url)`
//! 6. [`wrappers`] — layout containers reduced to content plus spacing
//! 7. [`entities`] — single-pass entity decoding
//! 8. [`cleanup`]  — blank-line collapsing and residue removal
//!
//! [`resolve`] is the URL utility shared by `media` and `links`, and
//! [`input`] reads documents for the file-level API.
//!
//! The pipeline is pure: no I/O, no shared state, same input and base URL
//! always give the same output, and it is safe to call from many threads.

pub mod block;
pub mod cleanup;
pub mod entities;
pub mod inline;
pub mod input;
pub mod links;
pub mod media;
pub mod resolve;
pub mod unwrap;
pub mod wrappers;

use crate::config::NormalizeConfig;
use crate::output::PassStat;
use resolve::UrlResolver;
use tracing::{debug, trace};

/// Per-call state handed to every pass.
pub struct PassContext<'a> {
    pub resolver: UrlResolver<'a>,
    pub config: &'a NormalizeConfig,
}

impl<'a> PassContext<'a> {
    pub fn new(base_url: &str, config: &'a NormalizeConfig) -> Self {
        Self {
            resolver: UrlResolver::new(base_url, config),
            config,
        }
    }
}

/// A named whole-document rewrite.
pub struct Pass {
    pub name: &'static str,
    pub run: fn(&str, &PassContext<'_>) -> String,
}

/// Every pass, in execution order.
pub static PASSES: [Pass; 8] = [
    Pass { name: "unwrap", run: run_unwrap },
    Pass { name: "media", run: run_media },
    Pass { name: "blocks", run: run_blocks },
    Pass { name: "inline", run: run_inline },
    Pass { name: "links", run: run_links },
    Pass { name: "wrappers", run: run_wrappers },
    Pass { name: "entities", run: run_entities },
    Pass { name: "cleanup", run: run_cleanup },
];

fn run_unwrap(input: &str, _: &PassContext<'_>) -> String {
    unwrap::unwrap_structural(input)
}

fn run_media(input: &str, ctx: &PassContext<'_>) -> String {
    media::convert_media(input, &ctx.resolver, ctx.config.video_urls)
}

fn run_blocks(input: &str, _: &PassContext<'_>) -> String {
    block::convert_blocks(input)
}

fn run_inline(input: &str, _: &PassContext<'_>) -> String {
    inline::convert_inline(input)
}

fn run_links(input: &str, ctx: &PassContext<'_>) -> String {
    links::convert_links(input, &ctx.resolver, ctx.config.link_urls)
}

fn run_wrappers(input: &str, _: &PassContext<'_>) -> String {
    wrappers::strip_wrappers(input)
}

fn run_entities(input: &str, _: &PassContext<'_>) -> String {
    entities::decode_entities(input)
}

fn run_cleanup(input: &str, _: &PassContext<'_>) -> String {
    cleanup::clean_up(input)
}

/// Normalise HTML-flavoured README Markdown into renderer-safe Markdown.
///
/// `base_url` is the root relative asset paths are resolved against; a
/// trailing `/` is added if missing. Never fails.
///
/// # Example
/// ```rust
/// use edgequake_readme2md::normalize;
///
/// let md = normalize("<img src='a.png'>", "https://x.com/y");
/// assert_eq!(md, "![](https://x.com/y/a.png)");
/// ```
pub fn normalize(document: &str, base_url: &str) -> String {
    normalize_with(document, base_url, &NormalizeConfig::default())
}

/// [`normalize`] with explicit configuration.
pub fn normalize_with(document: &str, base_url: &str, config: &NormalizeConfig) -> String {
    normalize_with_stats(document, base_url, config).0
}

/// [`normalize_with`], also reporting each pass's input and output size.
pub fn normalize_with_stats(
    document: &str,
    base_url: &str,
    config: &NormalizeConfig,
) -> (String, Vec<PassStat>) {
    let ctx = PassContext::new(base_url, config);
    debug!(
        "Normalising {} bytes against {}",
        document.len(),
        ctx.resolver.base_url()
    );

    let mut stats = Vec::with_capacity(PASSES.len());
    let mut text = document.to_string();
    for pass in PASSES.iter() {
        let next = (pass.run)(&text, &ctx);
        trace!("pass {}: {} → {} bytes", pass.name, text.len(), next.len());
        stats.push(PassStat {
            name: pass.name,
            input_bytes: text.len(),
            output_bytes: next.len(),
        });
        text = next;
    }
    (text, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_in_contract_order() {
        let names: Vec<&str> = PASSES.iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            ["unwrap", "media", "blocks", "inline", "links", "wrappers", "entities", "cleanup"]
        );
    }

    #[test]
    fn empty_document() {
        assert_eq!(normalize("", "https://x.com"), "");
    }

    #[test]
    fn stats_chain_between_passes() {
        let (out, stats) = normalize_with_stats(
            "<p><b>hi</b></p>",
            "https://x.com",
            &NormalizeConfig::default(),
        );
        assert_eq!(stats.len(), 8);
        for pair in stats.windows(2) {
            assert_eq!(pair[0].output_bytes, pair[1].input_bytes);
        }
        assert_eq!(stats.last().map(|s| s.output_bytes), Some(out.len()));
    }

    #[test]
    fn linked_image_becomes_plain_image() {
        assert_eq!(
            normalize(
                "<a href=\"https://x.com/big.png\"><img src=\"small.png\" alt=\"s\"></a>",
                "https://x.com/"
            ),
            "![s](https://x.com/small.png)"
        );
    }

    #[test]
    fn formatting_does_not_touch_image_urls() {
        assert_eq!(
            normalize("<img src=\"a_b_c.png\" alt=\"x\"> <i>y</i>", "https://x.com/"),
            "![x](https://x.com/a_b_c.png) *y*"
        );
    }

    #[test]
    fn entity_decoding_runs_after_tag_conversion() {
        assert_eq!(normalize("&lt;b&gt;literal&lt;/b&gt;", "https://x.com/"), "<b>literal</b>");
    }
}
