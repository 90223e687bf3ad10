//! Stage 4: inline formatting spans.
//!
//! Runs after [`super::media`], so image syntax is already final and only
//! text-level tags remain for these patterns.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Build `<t1>(.*?)</t1>|<t2>(.*?)</t2>|…`. Leftmost-first alternation pairs
/// each open tag with its own close tag without needing backreferences.
fn paired(tags: &[&str]) -> Regex {
    let alternatives: Vec<String> = tags
        .iter()
        .map(|tag| format!("<{tag}>(.*?)</{tag}>"))
        .collect();
    Regex::new(&format!("(?is){}", alternatives.join("|"))).unwrap()
}

static RE_BOLD: Lazy<Regex> = Lazy::new(|| paired(&["b", "strong"]));
static RE_ITALIC: Lazy<Regex> = Lazy::new(|| paired(&["i", "em"]));
static RE_STRIKE: Lazy<Regex> = Lazy::new(|| paired(&["s", "del", "strike"]));
static RE_KBD: Lazy<Regex> = Lazy::new(|| paired(&["kbd"]));

// Single line, no nested tags: `<pre><code>` blocks must not be flattened.
static RE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<code>([^<\n]*?)</code>").unwrap());

pub fn convert_inline(input: &str) -> String {
    let s = wrap(&RE_BOLD, input, "**");
    let s = wrap(&RE_ITALIC, &s, "*");
    let s = wrap(&RE_CODE, &s, "`");
    let s = wrap(&RE_STRIKE, &s, "~~");
    wrap(&RE_KBD, &s, "`")
}

/// Replace every match with its (single) captured body between `marker`s.
fn wrap(re: &Regex, input: &str, marker: &str) -> String {
    re.replace_all(input, |caps: &Captures<'_>| {
        let body = caps
            .iter()
            .skip(1)
            .flatten()
            .next()
            .map_or("", |m| m.as_str());
        format!("{marker}{body}{marker}")
    })
    .into_owned()
}
