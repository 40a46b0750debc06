//! Rich-text sanitization.
//!
//! Descriptions come straight from a WYSIWYG editor, so they are untrusted HTML.
//! Only structural markup survives (paragraphs, emphasis, lists, links); scripts,
//! styles, event handlers and non-http(s) URLs are dropped. Malformed input degrades
//! to whatever the HTML parser recovers, it never fails.

use std::fmt;

use serde::Serialize;
use tracing::debug;

/// Tags the editor can produce and every renderer knows how to show.
const ALLOWED_TAGS: &[&str] = &[
    "p", "br", "strong", "b", "em", "i", "u", "s", "ul", "ol", "li", "a", "h1", "h2", "h3",
    "span",
];

/// Tags removed together with everything inside them.
const STRIPPED_WITH_CONTENT: &[&str] = &["script", "style"];

/// HTML that went through [`sanitize`]. The only way renderers accept rich text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SanitizedHtml(String);

impl SanitizedHtml {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SanitizedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn sanitize(raw: &str) -> SanitizedHtml {
    if raw.trim().is_empty() {
        return SanitizedHtml::default();
    }

    let cleaned = ammonia::Builder::empty()
        .add_tags(ALLOWED_TAGS)
        .add_clean_content_tags(STRIPPED_WITH_CONTENT)
        .add_tag_attributes("a", &["href"])
        .add_url_schemes(&["http", "https", "mailto"])
        .link_rel(Some("noopener noreferrer"))
        .clean(raw)
        .to_string();

    if cleaned.len() < raw.len() {
        debug!(
            removed_bytes = raw.len() - cleaned.len(),
            "rich text degraded during sanitization"
        );
    }

    SanitizedHtml(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_payload_removed_with_content() {
        let out = sanitize("<p>Hello</p><script>alert('x')</script>");
        assert!(!out.as_str().to_lowercase().contains("<script"));
        assert!(!out.as_str().contains("alert"));
        assert!(out.as_str().contains("<p>Hello</p>"));
    }

    #[test]
    fn test_structural_tags_preserved() {
        let out = sanitize("<p><strong>Led</strong> <em>team</em></p><ul><li>Rust</li></ul>");
        assert!(out.as_str().contains("<strong>Led</strong>"));
        assert!(out.as_str().contains("<em>team</em>"));
        assert!(out.as_str().contains("<ul><li>Rust</li></ul>"));
    }

    #[test]
    fn test_event_handlers_and_javascript_urls_dropped() {
        let out = sanitize(
            r#"<p onclick="steal()">Hi <a href="javascript:steal()">x</a> <a href="https://a.dev">y</a></p>"#,
        );
        let html = out.as_str();
        assert!(!html.contains("onclick"));
        assert!(!html.contains("javascript:"));
        assert!(html.contains(r#"href="https://a.dev""#));
        assert!(html.contains("noopener"));
    }

    #[test]
    fn test_unknown_tags_unwrapped_text_kept() {
        let out = sanitize("<div><img src=x onerror=alert(1)>Plain <blink>text</blink></div>");
        assert!(!out.as_str().contains("<img"));
        assert!(!out.as_str().contains("onerror"));
        assert!(out.as_str().contains("Plain text"));
    }

    #[test]
    fn test_malformed_markup_does_not_fail() {
        let out = sanitize("<p><strong>unclosed <em>tags");
        assert!(out.as_str().contains("unclosed"));
        assert!(out.as_str().contains("tags"));
    }

    #[test]
    fn test_blank_input_is_empty() {
        assert_eq!(sanitize("   ").as_str(), "");
        assert_eq!(sanitize(""), SanitizedHtml::default());
    }
}
