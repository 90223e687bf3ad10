//! Stage 3: headings, line breaks and horizontal rules.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// One pattern per heading level; the regex crate has no backreferences to
/// pair `<hN>` with `</hN>` in a single expression.
static RE_HEADINGS: Lazy<Vec<(String, Regex)>> = Lazy::new(|| {
    (1..=6)
        .map(|level| {
            let re = Regex::new(&format!(r"(?is)<h{level}[^>]*>(.*?)</h{level}>")).unwrap();
            ("#".repeat(level), re)
        })
        .collect()
});

static RE_BR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

static RE_HR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<hr\s*/?>").unwrap());

pub fn convert_blocks(input: &str) -> String {
    let s = convert_headings(input);
    let s = RE_BR.replace_all(&s, "\n");
    RE_HR.replace_all(&s, "\n---\n").into_owned()
}

fn convert_headings(input: &str) -> String {
    let mut s = input.to_string();
    for (hashes, re) in RE_HEADINGS.iter() {
        s = re
            .replace_all(&s, |caps: &Captures<'_>| {
                format!("\n{hashes} {}\n", caps[1].trim())
            })
            .into_owned();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_all_levels() {
        assert_eq!(convert_blocks("<h1>Title</h1>"), "\n# Title\n");
        assert_eq!(convert_blocks("<h3 id=\"x\"> Sub </h3>"), "\n### Sub\n");
        assert_eq!(convert_blocks("<H6>deep</H6>"), "\n###### deep\n");
    }

    #[test]
    fn heading_spans_lines() {
        assert_eq!(
            convert_blocks("<h2 align=\"center\">\n  Getting started\n</h2>"),
            "\n## Getting started\n"
        );
    }

    #[test]
    fn mismatched_heading_levels_not_paired() {
        let input = "<h1>a</h2>";
        assert_eq!(convert_blocks(input), input);
    }

    #[test]
    fn line_breaks() {
        assert_eq!(convert_blocks("a<br>b<br/>c<BR />d"), "a\nb\nc\nd");
    }

    #[test]
    fn horizontal_rules() {
        assert_eq!(convert_blocks("a<hr>b<hr/>"), "a\n---\nb\n---\n");
    }

    #[test]
    fn markdown_headings_untouched() {
        let md = "# Already\n\ntext";
        assert_eq!(convert_blocks(md), md);
    }
}
