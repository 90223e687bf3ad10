//! Stage 1: remove fallback containers, keeping one canonical element.
//!
//! Must run before [`super::media`]: the image converter only sees bare
//! `<img>` tags, so anything still wrapped in `<picture>` or a link would
//! survive as raw HTML.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static RE_PICTURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<picture[^>]*>.*?(<img\s[^>]*?>).*?</picture>").unwrap()
});

static RE_SOURCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<source\s[^>]*?/?>").unwrap());

pub(super) static RE_VIDEO_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<video\b.*?</video>").unwrap());

static RE_LINKED_IMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<a\s[^>]*?>\s*(<img\s[^>]*?>)\s*</a>").unwrap()
});

/// Apply all unwrapping rules in order.
///
/// 1. `<picture>` → its `<img>` fallback
/// 2. `<source>` tags outside `<video>` → removed
/// 3. `<a>` wrapping a single `<img>` → the `<img>` (the link target is dropped)
pub fn unwrap_structural(input: &str) -> String {
    let s = unwrap_pictures(input);
    let s = strip_orphan_sources(&s);
    unwrap_linked_images(&s)
}

fn first_group(caps: &Captures<'_>) -> String {
    caps[1].to_string()
}

fn unwrap_pictures(input: &str) -> String {
    RE_PICTURE.replace_all(input, first_group).into_owned()
}

/// Delete `<source>` tags, except inside `<video>…</video>` where the media
/// stage still needs them to find the video URL.
fn strip_orphan_sources(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;
    for video in RE_VIDEO_BLOCK.find_iter(input) {
        out.push_str(&RE_SOURCE.replace_all(&input[last..video.start()], ""));
        out.push_str(video.as_str());
        last = video.end();
    }
    out.push_str(&RE_SOURCE.replace_all(&input[last..], ""));
    out
}

fn unwrap_linked_images(input: &str) -> String {
    RE_LINKED_IMAGE.replace_all(input, first_group).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picture_keeps_img_only() {
        let input = r#"<picture>
  <source media="(prefers-color-scheme: dark)" srcset="dark.png">
  <source media="(prefers-color-scheme: light)" srcset="light.png">
  <img alt="Logo" src="light.png">
</picture>"#;
        assert_eq!(unwrap_structural(input), r#"<img alt="Logo" src="light.png">"#);
    }

    #[test]
    fn picture_without_img_is_left_alone() {
        let input = "<picture><source srcset=\"a.webp\"></picture>";
        assert_eq!(unwrap_structural(input), "<picture></picture>");
    }

    #[test]
    fn orphan_sources_removed() {
        assert_eq!(
            strip_orphan_sources("a<source srcset=\"x.webp\" />b"),
            "ab"
        );
    }

    #[test]
    fn sources_inside_video_survive() {
        let input = "<video controls><source src=\"demo.mp4\" type=\"video/mp4\"></video>";
        assert_eq!(strip_orphan_sources(input), input);
    }

    #[test]
    fn sources_around_video_still_removed() {
        let input = "<source src=\"a\"><video><source src=\"b\"></video><source src=\"c\">";
        assert_eq!(
            strip_orphan_sources(input),
            "<video><source src=\"b\"></video>"
        );
    }

    #[test]
    fn linked_image_unwrapped() {
        let input = "<a href=\"https://ci.example/build\">\n  <img src=\"badge.png\" alt=\"CI\">\n</a>";
        assert_eq!(unwrap_structural(input), "<img src=\"badge.png\" alt=\"CI\">");
    }

    #[test]
    fn text_link_untouched() {
        let input = "<a href=\"https://x.com\">docs</a>";
        assert_eq!(unwrap_structural(input), input);
    }

    #[test]
    fn case_insensitive_tags() {
        let input = "<PICTURE><SOURCE srcset=\"a\"><IMG src=\"b.png\"></PICTURE>";
        assert_eq!(unwrap_structural(input), "<IMG src=\"b.png\">");
    }
}
