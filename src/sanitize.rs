//! Markup stripping for untrusted identifier text.
//!
//! Tract identifiers are expected to be plain digits, but they arrive from
//! CSV files and travel back out to browsers, so every copy is passed
//! through [`clean`] on the way into the store and on the way out.

use std::collections::HashSet;

use ammonia::Builder;

/// Elements whose text content is dropped along with the tags.
const CONTENT_TAGS: [&str; 2] = ["script", "style"];

/// Remove markup from `raw`, keeping only its escaped text content.
///
/// No tags survive. Text is HTML-escaped (`&amp;`, `&lt;`, `&gt;`), which a
/// second pass parses and re-serializes unchanged, so `clean` is idempotent.
/// Digit-only input is returned unchanged.
pub fn clean(raw: &str) -> String {
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.to_string();
    }

    let mut builder = Builder::empty();
    builder.clean_content_tags(CONTENT_TAGS.into_iter().collect::<HashSet<_>>());

    let cleaned = builder.clean(raw).to_string();
    cleaned
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_pass_through_untouched() {
        assert_eq!(clean("06037102107"), "06037102107");
        assert_eq!(clean(""), "");
    }

    #[test]
    fn strips_tags_and_keeps_text() {
        assert_eq!(clean("<b>0603</b>7102107"), "06037102107");
        assert_eq!(clean("<img src=x onerror=alert(1)>123"), "123");
        assert_eq!(clean("  <i>0603710</i>  "), "0603710");
    }

    #[test]
    fn drops_script_and_style_bodies() {
        assert_eq!(clean("12<script>alert('x')</script>34"), "1234");
        assert_eq!(clean("12<STYLE>p{}</style >34"), "1234");
        assert_eq!(clean("12<script>never closed"), "12");
    }

    #[test]
    fn unterminated_tag_is_dropped() {
        assert_eq!(clean("0603<div class=\"x\""), "0603");
    }

    #[test]
    fn text_is_escaped_not_interpreted() {
        assert_eq!(clean("a & b > c"), "a &amp; b &gt; c");
        assert_eq!(clean("&lt;script&gt;"), "&lt;script&gt;");
        assert_eq!(clean("x\u{7}y"), "xy");
    }

    #[test]
    fn cleaning_is_idempotent() {
        let samples = [
            "06037102107",
            "<b>bold</b>",
            "&lt;script&gt;",
            "&amp;",
            "&amp;amp;",
            "a & b",
            "&#60;b&#62;1&#60;/b&#62;",
            "1 < 2 > 0",
            "<<a>>",
            "x<script>y</script>z",
            "  padded  ",
            "<scr<script>ipt>alert(1)</script>",
            "\u{0}\u{1f}tail",
            "unicode é ü <i>ok</i>",
            "non\u{a0}breaking",
        ];

        for sample in samples {
            let once = clean(sample);
            assert_eq!(clean(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
