use std::collections::HashSet;

use ammonia::Builder;

/// Strips markup from user-supplied plain text (captions, comments, bios).
///
/// Every tag is removed, `<script>`/`<style>` together with their content.
/// The result is plain text again: `"A & B"` comes back as `"A & B"`, not
/// the entity-escaped form ammonia serializes.
pub fn clean_text(input: &str) -> String {
    let stripped = Builder::empty()
        .clean_content_tags(HashSet::from(["script", "style"]))
        .clean(input)
        .to_string();

    unescape_text(&stripped)
}

/// Reverses the escaping applied to text nodes on serialization.
/// `&amp;` goes last so an escaped entity is decoded exactly once.
fn unescape_text(serialized: &str) -> String {
    serialized
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_tags_are_removed() {
        let cleaned = clean_text("nice pic <script>alert(1)</script>");
        assert_eq!(cleaned, "nice pic ");
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(clean_text("sunset at the lake"), "sunset at the lake");
    }

    #[test]
    fn ampersands_and_comparisons_read_back_unchanged() {
        assert_eq!(clean_text("A & B"), "A & B");
        assert_eq!(clean_text("1 < 2 > 0"), "1 < 2 > 0");
        assert_eq!(clean_text("fish &amp;chips"), "fish &chips");
    }

    #[test]
    fn markup_is_stripped_to_text() {
        assert_eq!(clean_text("<b>bold</b> move"), "bold move");
        assert_eq!(
            clean_text(r#"<img src=x onerror="alert(1)">caption"#),
            "caption"
        );
    }
}
