//! Allow-list HTML sanitization.
//!
//! Everything the pipeline produces passes through here before it is
//! handed to a display surface. Markup, attributes and URI schemes outside
//! the allow-list are dropped silently; that is the security boundary's
//! normal operation, not an error.

use std::collections::HashMap;

use ammonia::{Builder, UrlRelative};

/// Structural and text-level tags allowed through sanitization.
const ALLOWED_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "strong", "em", "u", "s", "del", "ins", "mark",
    "small", "sub", "sup", "code", "pre", "blockquote", "ul", "ol", "li", "dl", "dt", "dd",
    "table", "thead", "tbody", "tfoot", "tr", "th", "td", "a", "img", "br", "hr", "span", "div",
];

/// Attributes allowed on any tag.
const GENERIC_ATTRIBUTES: &[&str] = &["class", "id", "style", "title"];

/// URI schemes allowed in link and image targets. `blob` must stay in this
/// list: attachment snippets reference transient blob URIs, and a sanitizer
/// that only permits http(s) would strip every inlined attachment.
const ALLOWED_URL_SCHEMES: &[&str] = &["http", "https", "mailto", "tel", "ftp", "data", "blob"];

/// Configure-once allow-list sanitizer.
pub struct Sanitizer {
    builder: Builder<'static>,
}

impl Sanitizer {
    pub fn new() -> Self {
        let mut tag_attributes: HashMap<&str, _> = HashMap::new();
        tag_attributes.insert("a", ["href", "target", "rel"].into_iter().collect());
        tag_attributes.insert("img", ["src", "alt", "title"].into_iter().collect());

        let mut builder = Builder::default();
        builder
            .tags(ALLOWED_TAGS.iter().copied().collect())
            .generic_attributes(GENERIC_ATTRIBUTES.iter().copied().collect())
            .generic_attribute_prefixes(["data-"].into_iter().collect())
            .tag_attributes(tag_attributes)
            .url_schemes(ALLOWED_URL_SCHEMES.iter().copied().collect())
            .url_relative(UrlRelative::PassThrough)
            // `rel` is caller-controlled through the attribute allow-list,
            // so the automatic rel rewrite must be off.
            .link_rel(None);

        Self { builder }
    }

    /// Reduce `html` to the allow-listed subset.
    pub fn clean(&self, html: &str) -> String {
        self.builder.clean(html).to_string()
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_tags_are_removed_with_content() {
        let sanitizer = Sanitizer::new();
        let out = sanitizer.clean("<p>before</p><script>alert(1)</script><p>after</p>");
        assert!(!out.contains("script"));
        assert!(!out.contains("alert"));
        assert!(out.contains("<p>before</p>"));
        assert!(out.contains("<p>after</p>"));
    }

    #[test]
    fn test_inline_event_handlers_are_stripped() {
        let sanitizer = Sanitizer::new();
        let out = sanitizer.clean(r#"<img src="blob:markdown-studio/abc" onerror="alert(1)">"#);
        assert!(!out.contains("onerror"));
        assert!(out.contains("blob:markdown-studio/abc"));
    }

    #[test]
    fn test_javascript_scheme_is_neutralized() {
        let sanitizer = Sanitizer::new();
        let out = sanitizer.clean(r#"<a href="javascript:alert(1)">click</a>"#);
        assert!(!out.contains("javascript:"));
        assert!(out.contains("click"));
    }

    #[test]
    fn test_blob_and_data_schemes_survive() {
        let sanitizer = Sanitizer::new();
        let out = sanitizer.clean(concat!(
            r#"<img src="blob:markdown-studio/0123abcd">"#,
            r#"<img src="data:image/png;base64,iVBORw0KGgo=">"#,
        ));
        assert!(out.contains("blob:markdown-studio/0123abcd"));
        assert!(out.contains("data:image/png;base64,iVBORw0KGgo="));
    }

    #[test]
    fn test_relative_urls_pass_through() {
        let sanitizer = Sanitizer::new();
        let out = sanitizer.clean(r#"<a href="/docs/guide.md">guide</a>"#);
        assert!(out.contains(r#"href="/docs/guide.md""#));
    }

    #[test]
    fn test_mailto_and_tel_pass_through() {
        let sanitizer = Sanitizer::new();
        let out = sanitizer.clean(r#"<a href="mailto:a@b.c">mail</a><a href="tel:+15551234">call</a>"#);
        assert!(out.contains("mailto:a@b.c"));
        assert!(out.contains("tel:+15551234"));
    }

    #[test]
    fn test_data_attributes_are_kept() {
        let sanitizer = Sanitizer::new();
        let out = sanitizer.clean(r#"<span data-note="x" data-kind="aside">t</span>"#);
        assert!(out.contains(r#"data-note="x""#));
        assert!(out.contains(r#"data-kind="aside""#));
    }

    #[test]
    fn test_unknown_tags_are_unwrapped_to_text() {
        let sanitizer = Sanitizer::new();
        let out = sanitizer.clean("<form><b>bold?</b></form>");
        assert!(!out.contains("<form"));
        assert!(!out.contains("<b>"));
        assert!(out.contains("bold?"));
    }

    #[test]
    fn test_table_structure_is_allowed() {
        let sanitizer = Sanitizer::new();
        let html = "<table><thead><tr><th>h</th></tr></thead><tbody><tr><td>d</td></tr></tbody></table>";
        assert_eq!(sanitizer.clean(html), html);
    }

    #[test]
    fn test_link_rel_and_target_are_kept() {
        let sanitizer = Sanitizer::new();
        let out = sanitizer.clean(r#"<a href="https://example.com" target="_blank" rel="noopener">x</a>"#);
        assert!(out.contains(r#"target="_blank""#));
        assert!(out.contains(r#"rel="noopener""#));
    }
}
