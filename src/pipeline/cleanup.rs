//! Stage 8: whitespace and residue cleanup.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_EMPTY_P: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<p(?:\s[^>]*)?>\s*</p>").unwrap());

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// One or more `](url)` fragments at the start of a line with nothing before them.
static RE_ORPHAN_LINK_TAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(?:\]\([^)]+\))+").unwrap());

/// Residue removal runs before the blank-line collapse, so a line emptied
/// by it is collapsed with its neighbours.
pub fn clean_up(input: &str) -> String {
    let s = RE_EMPTY_P.replace_all(input, "");
    let s = RE_ORPHAN_LINK_TAIL.replace_all(&s, "");
    RE_BLANK_LINES.replace_all(&s, "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_paragraphs_removed() {
        assert_eq!(clean_up("a<p class=\"x\">  \n </p>b"), "ab");
    }

    #[test]
    fn collapse_blank_lines() {
        assert_eq!(clean_up("a\n\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(clean_up("a\n\n\nb"), "a\n\nb");
        assert_eq!(clean_up("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn orphan_link_tails_removed() {
        assert_eq!(clean_up("](https://x.com/a.png) caption\nkeep ](x)"), " caption\nkeep ](x)");
    }

    #[test]
    fn chained_link_tails_removed_at_once() {
        assert_eq!(clean_up("](a)](b) tail"), " tail");
        assert_eq!(clean_up(" tail"), " tail");
    }

    #[test]
    fn emptied_line_collapses_with_neighbours() {
        assert_eq!(clean_up("x\n\n](https://a.png)\n\ny"), "x\n\ny");
    }

    #[test]
    fn complete_links_kept() {
        let md = "[a](b)\n![c](d)";
        assert_eq!(clean_up(md), md);
    }
}
