//! Plain-text helpers over the editor's HTML fragments.
//!
//! The editor hands the store an HTML fragment. The sidebar needs a short
//! plain-text preview and the text/markdown exports need the body without
//! markup; both go through [`html_to_text`].

use regex::Regex;
use std::sync::LazyLock;

// ── Patterns ─────────────────────────────────────────────────────────────────

static LINE_BREAK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(p|div|li|h[1-6]|blockquote|pre|tr)\s*>")
        .expect("static pattern")
});

static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("static pattern"));

static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*(\n[ \t]*)+").expect("static pattern"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static pattern"));

// ── Escaping ─────────────────────────────────────────────────────────────────

/// Escapes HTML special characters in a user-supplied string.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Decodes the handful of entities a contenteditable surface emits.
///
/// `&amp;` is decoded last so `&amp;lt;` becomes the literal text `&lt;`.
fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

// ── Conversion ───────────────────────────────────────────────────────────────

/// Converts an HTML fragment to plain text.
///
/// Line breaks and block-level closing tags become newlines, every other tag
/// is dropped, entities are decoded and runs of blank lines collapse to one
/// paragraph break.
pub fn html_to_text(html: &str) -> String {
    let with_breaks = LINE_BREAK_TAG.replace_all(html, "\n");
    let stripped = ANY_TAG.replace_all(&with_breaks, "");
    let decoded = decode_entities(&stripped);
    let collapsed = BLANK_RUN.replace_all(&decoded, "\n\n");
    collapsed
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Builds the sidebar preview for a note body.
///
/// Whitespace is collapsed to single spaces and the text is cut at
/// `max_chars` characters, with `…` appended when anything was cut.
pub fn excerpt(html: &str, max_chars: usize) -> String {
    let text = html_to_text(html);
    let flat = WHITESPACE_RUN.replace_all(&text, " ");
    let flat = flat.trim();
    if flat.chars().count() <= max_chars {
        return flat.to_string();
    }
    let mut cut: String = flat.chars().take(max_chars).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_text_strips_inline_tags() {
        assert_eq!(html_to_text("<b>bold</b> and <i>italic</i>"), "bold and italic");
    }

    #[test]
    fn test_html_to_text_block_tags_become_lines() {
        let text = html_to_text("<p>first</p><p>second</p><div>third<br>fourth</div>");
        assert_eq!(text, "first\nsecond\nthird\nfourth");
    }

    #[test]
    fn test_html_to_text_decodes_entities() {
        assert_eq!(html_to_text("a &lt;tag&gt; &amp; &quot;q&quot;&nbsp;x"), "a <tag> & \"q\" x");
        assert_eq!(html_to_text("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_html_to_text_collapses_blank_runs() {
        let text = html_to_text("<p>one</p><p></p><p></p><p>two</p>");
        assert_eq!(text, "one\n\ntwo");
    }

    #[test]
    fn test_html_to_text_plain_input_unchanged() {
        assert_eq!(html_to_text("just words"), "just words");
        assert_eq!(html_to_text(""), "");
    }

    #[test]
    fn test_excerpt_short_text_not_cut() {
        assert_eq!(excerpt("<p>hello   world</p>", 100), "hello world");
    }

    #[test]
    fn test_excerpt_cuts_on_char_budget() {
        let e = excerpt("<p>abcdefghij</p>", 4);
        assert_eq!(e, "abcd…");
    }

    #[test]
    fn test_excerpt_counts_chars_not_bytes() {
        let e = excerpt("ééééé", 3);
        assert_eq!(e, "ééé…");
    }

    #[test]
    fn test_excerpt_trims_before_ellipsis() {
        assert_eq!(excerpt("one two three", 4), "one…");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<a href=\"x\">'&'</a>"), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }
}
