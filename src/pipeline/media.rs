//! Stage 2: images and videos to canonical Markdown.
//!
//! Runs after [`super::unwrap`] so every image is a bare `<img>`, and before
//! [`super::inline`] so the `![alt](url)` produced here is never mistaken for
//! formatting.

use super::resolve::{is_svg, UrlResolver};
use super::unwrap::RE_VIDEO_BLOCK;
use crate::config::UrlPolicy;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static RE_IMG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<img\s+([^>]*?)\s*/?>").unwrap());

static RE_SRC_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:^|\s)src\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

static RE_ALT_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:^|\s)alt\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

static RE_MD_IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());

static RE_VIDEO_SRC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<video[^>]*?\ssrc\s*=\s*(?:"([^"]+)"|'([^']+)')[^>]*>.*?</video>"#)
        .unwrap()
});

static RE_SOURCE_SRC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<source\b[^>]*?\ssrc\s*=\s*(?:"([^"]+)"|'([^']+)')"#).unwrap()
});

/// Apply all media rules in order.
///
/// 1. `<img>` → `![alt](url)`, `**alt**` for SVG, or nothing
/// 2. existing `![alt](path)` → re-resolved the same way
/// 3. `<video src>` and `<video><source src></video>` → `[Video](url)`
pub fn convert_media(input: &str, resolver: &UrlResolver<'_>, video_urls: UrlPolicy) -> String {
    let s = convert_img_tags(input, resolver);
    let s = resolve_markdown_images(&s, resolver);
    convert_videos(&s, resolver, video_urls)
}

/// Value of whichever quote-style alternative matched.
fn quoted<'h>(caps: &Captures<'h>) -> &'h str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map_or("", |m| m.as_str())
}

fn attr<'t>(re: &Regex, attrs: &'t str) -> &'t str {
    re.captures(attrs).map_or("", |caps| quoted(&caps))
}

/// Markdown for one resolved image, applying the SVG exclusion policy.
fn image_markdown(alt: &str, url: &str) -> String {
    if is_svg(url) {
        if alt.is_empty() {
            String::new()
        } else {
            format!("**{alt}**")
        }
    } else {
        format!("![{alt}]({url})")
    }
}

fn convert_img_tags(input: &str, resolver: &UrlResolver<'_>) -> String {
    RE_IMG
        .replace_all(input, |caps: &Captures<'_>| {
            let attrs = &caps[1];
            let src = attr(&RE_SRC_ATTR, attrs);
            if src.is_empty() {
                return String::new();
            }
            let alt = attr(&RE_ALT_ATTR, attrs);
            image_markdown(alt, &resolver.resolve(src))
        })
        .into_owned()
}

fn resolve_markdown_images(input: &str, resolver: &UrlResolver<'_>) -> String {
    RE_MD_IMAGE
        .replace_all(input, |caps: &Captures<'_>| {
            image_markdown(&caps[1], &resolver.resolve(&caps[2]))
        })
        .into_owned()
}

fn video_link(src: &str, resolver: &UrlResolver<'_>, policy: UrlPolicy) -> String {
    match policy {
        UrlPolicy::Verbatim => format!("[Video]({src})"),
        UrlPolicy::Resolve => format!("[Video]({})", resolver.resolve(src)),
    }
}

/// `<source>` lookup is confined to one `<video>…</video>` block at a time;
/// a block without a source is left as it is.
fn convert_videos(input: &str, resolver: &UrlResolver<'_>, policy: UrlPolicy) -> String {
    let s = RE_VIDEO_SRC.replace_all(input, |caps: &Captures<'_>| {
        video_link(quoted(caps), resolver, policy)
    });
    RE_VIDEO_BLOCK
        .replace_all(&s, |caps: &Captures<'_>| {
            let block = &caps[0];
            match RE_SOURCE_SRC.captures(block) {
                Some(source) => video_link(quoted(&source), resolver, policy),
                None => block.to_string(),
            }
        })
        .into_owned()
}
