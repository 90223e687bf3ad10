//! Stage 6: strip layout-only containers, keeping their content.
//!
//! Tags are matched one at a time, not as balanced pairs: every `</div>`
//! becomes a blank line whether or not its opener was a centred div. The
//! extra blank lines are collapsed later by [`super::cleanup`].

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static RE_DIV_CENTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<div[^>]*?align\s*=\s*["']center["'][^>]*?>\s*"#).unwrap()
});
static RE_DIV_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</div>\s*").unwrap());
static RE_P_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<p(?:\s[^>]*)?>").unwrap());
static RE_P_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</p\s*>").unwrap());
static RE_DETAILS_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<details(?:\s[^>]*)?>").unwrap());
static RE_DETAILS_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</details\s*>").unwrap());
static RE_SUMMARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<summary(?:\s[^>]*)?>(.*?)</summary>").unwrap()
});
static RE_INLINE_WRAPPER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?(?:span|sup|sub)\b[^>]*>").unwrap());

pub fn strip_wrappers(input: &str) -> String {
    let s = RE_DIV_CENTER.replace_all(input, "\n\n");
    let s = RE_DIV_CLOSE.replace_all(&s, "\n\n");
    let s = RE_P_OPEN.replace_all(&s, "\n");
    let s = RE_P_CLOSE.replace_all(&s, "\n");
    let s = RE_DETAILS_OPEN.replace_all(&s, "\n");
    let s = RE_DETAILS_CLOSE.replace_all(&s, "\n");
    let s = RE_SUMMARY.replace_all(&s, |caps: &Captures<'_>| {
        format!("**{}**\n", caps[1].trim())
    });
    RE_INLINE_WRAPPER.replace_all(&s, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_div() {
        assert_eq!(
            strip_wrappers("<div align=\"center\">\n  Hello\n</div>\nafter"),
            "\n\nHello\n\n\nafter"
        );
    }

    #[test]
    fn every_div_close_adds_blank_line() {
        assert_eq!(strip_wrappers("<div class=\"x\">a</div>"), "<div class=\"x\">a\n\n");
    }

    #[test]
    fn paragraphs() {
        assert_eq!(strip_wrappers("<p align=\"center\">hi</p>"), "\nhi\n");
    }

    #[test]
    fn paragraph_pattern_skips_other_p_tags() {
        let input = "<pre>x</pre><param name=\"a\">";
        assert_eq!(strip_wrappers(input), input);
    }

    #[test]
    fn details_and_summary() {
        assert_eq!(
            strip_wrappers("<details open><summary> More </summary>body</details>"),
            "\n**More**\nbody\n"
        );
    }

    #[test]
    fn span_sup_sub_removed() {
        assert_eq!(
            strip_wrappers("H<sub>2</sub>O x<sup>2</sup> <span style=\"color:red\">hot</span>"),
            "H2O x2 hot"
        );
    }

    #[test]
    fn summary_tag_not_mistaken_for_sub() {
        assert_eq!(strip_wrappers("<summary>a</summary>"), "**a**\n");
    }
}
