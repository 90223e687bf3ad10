//! Stage 5: remaining `<a href>` anchors to Markdown links.
//!
//! Image-wrapping anchors were already unwrapped by [`super::unwrap`]; what
//! is left here are text links. Their targets are emitted as written unless
//! link resolution is switched on in [`crate::config::NormalizeConfig`].

use super::resolve::UrlResolver;
use crate::config::UrlPolicy;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static RE_ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<a\s+[^>]*?href\s*=\s*(?:"([^"]+)"|'([^']+)')[^>]*>(.*?)</a>"#).unwrap()
});

pub fn convert_links(input: &str, resolver: &UrlResolver<'_>, policy: UrlPolicy) -> String {
    RE_ANCHOR
        .replace_all(input, |caps: &Captures<'_>| {
            let href = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map_or("", |m| m.as_str());
            let url = match policy {
                UrlPolicy::Verbatim => href.to_string(),
                UrlPolicy::Resolve => resolver.resolve_link(href),
            };
            let text = caps[3].trim();
            if text.is_empty() {
                format!("[{url}]({url})")
            } else {
                format!("[{text}]({url})")
            }
        })
        .into_owned()
}
