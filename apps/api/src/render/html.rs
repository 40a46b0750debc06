//! HTML serialisation of a scaled layout for the live preview.
//!
//! Every box becomes an absolutely positioned element inside a page-shaped container.
//! Plain text is escaped; rich text is injected as the sanitized markup it carries.

use std::fmt::Write;

use crate::layout::page::REFERENCE_WIDTH;
use crate::render::canvas::{
    BoxContent, LayoutBox, PageLayout, Rect, TextStyle, LINE_HEIGHT, LIST_INDENT, PARAGRAPH_GAP,
};

const SAFE_URL_SCHEMES: &[&str] = &["http://", "https://", "mailto:"];

pub fn to_html(layout: &PageLayout) -> String {
    let height = layout.page_height.max(layout.content_height);
    let mut out = String::with_capacity(layout.boxes.len() * 160);
    let _ = write!(
        out,
        r#"<div class="resume-page" data-template="{}" style="position:relative;width:{:.2}px;height:{:.2}px;background:#ffffff;overflow:hidden">"#,
        layout.template, layout.width, height
    );
    write_rich_text_reset(&mut out, layout.width / REFERENCE_WIDTH);
    for b in &layout.boxes {
        write_box(&mut out, b);
    }
    out.push_str("</div>");
    out
}

/// Pins paragraph spacing and list indents inside rich-text boxes to the layout
/// metrics, in place of the browser's block defaults.
fn write_rich_text_reset(out: &mut String, factor: f32) {
    let _ = write!(
        out,
        "<style>\
         .resume-page .rich-text p,.resume-page .rich-text li,.resume-page .rich-text h1,\
         .resume-page .rich-text h2,.resume-page .rich-text h3,.resume-page .rich-text h4,\
         .resume-page .rich-text h5,.resume-page .rich-text h6{{margin:0 0 {PARAGRAPH_GAP}em;padding:0;font-size:inherit}}\
         .resume-page .rich-text ul,.resume-page .rich-text ol{{margin:0;padding:0 0 0 {:.2}px}}\
         .resume-page .rich-text>:last-child,.resume-page .rich-text li:last-child{{margin-bottom:0}}\
         </style>",
        LIST_INDENT * factor
    );
}

fn write_box(out: &mut String, b: &LayoutBox) {
    let section = b
        .section
        .map(|s| format!(r#" data-section="{}""#, s.as_str()))
        .unwrap_or_default();
    let pos = position(&b.rect);

    let _ = match &b.content {
        BoxContent::Fill { color } | BoxContent::Rule { color } => write!(
            out,
            r#"<div{section} style="{pos};background:{}"></div>"#,
            color.hex()
        ),
        BoxContent::Text { text, style, link } => {
            let text = ammonia::clean_text(text);
            let inner = match link.as_deref().and_then(safe_url) {
                Some(url) => format!(
                    r#"<a href="{}" target="_blank" rel="noopener noreferrer" style="color:inherit">{text}</a>"#,
                    ammonia::clean_text(url)
                ),
                None => text,
            };
            write!(
                out,
                r#"<div{section} style="{pos};{};white-space:nowrap">{inner}</div>"#,
                font(style)
            )
        }
        BoxContent::RichText { html, style, .. } => write!(
            out,
            r#"<div class="rich-text"{section} style="{pos};{}">{html}</div>"#,
            font(style)
        ),
    };
}

fn position(rect: &Rect) -> String {
    format!(
        "position:absolute;left:{:.2}px;top:{:.2}px;width:{:.2}px;height:{:.2}px",
        rect.x, rect.y, rect.w, rect.h
    )
}

fn font(style: &TextStyle) -> String {
    format!(
        "font-family:{};font-size:{:.2}px;line-height:{LINE_HEIGHT};font-weight:{};font-style:{};color:{}",
        style.font.css(),
        style.size,
        if style.bold { 700 } else { 400 },
        if style.italic { "italic" } else { "normal" },
        style.color.hex()
    )
}

fn safe_url(url: &str) -> Option<&str> {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();
    SAFE_URL_SCHEMES
        .iter()
        .any(|scheme| lower.starts_with(scheme))
        .then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::filter::filter_document;
    use crate::layout::scaler::Scale;
    use crate::models::resume::{Project, ResumeDocument, RichTextSection};
    use crate::models::template::TemplateId;
    use crate::render::renderer_for;

    fn render_html(doc: &ResumeDocument, id: TemplateId, width: f32) -> String {
        let scale = Scale::from_width(width).unwrap();
        to_html(&renderer_for(id).render(&filter_document(doc), scale))
    }

    #[test]
    fn test_script_payload_never_reaches_preview() {
        let doc = ResumeDocument {
            skills: RichTextSection::new(
                "<ul><li><strong>Rust</strong></li></ul><script>alert('x')</script><img src=x onerror=alert(1)>",
            ),
            ..Default::default()
        };
        for id in TemplateId::ALL {
            let html = render_html(&doc, id, 794.0);
            assert!(!html.to_lowercase().contains("<script"), "{id}");
            assert!(!html.contains("onerror"), "{id}");
            assert!(html.contains("<strong>Rust</strong>"), "{id}");
            assert!(html.contains("<li>"), "{id}");
        }
    }

    #[test]
    fn test_plain_text_is_escaped() {
        let doc = ResumeDocument {
            projects: vec![Project {
                title: "<b>not markup</b>".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let html = render_html(&doc, TemplateId::Single, 794.0);
        assert!(!html.contains("<b>not markup</b>"));
    }

    #[test]
    fn test_only_safe_links_are_clickable() {
        assert_eq!(safe_url(" https://a.dev "), Some("https://a.dev"));
        assert_eq!(safe_url("MAILTO:me@a.dev"), Some("MAILTO:me@a.dev"));
        assert_eq!(safe_url("javascript:alert(1)"), None);

        let doc = ResumeDocument {
            projects: vec![Project {
                title: "CLI".into(),
                link: "javascript:alert(1)".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let html = render_html(&doc, TemplateId::Colored, 794.0);
        assert!(!html.contains("javascript:"));
        assert!(html.contains("View"));
    }

    #[test]
    fn test_page_container_follows_width() {
        let html = render_html(&ResumeDocument::default(), TemplateId::Double, 397.0);
        assert!(html.starts_with(r#"<div class="resume-page" data-template="double""#));
        assert!(html.contains("width:397.00px"));
        // 397 * 297 / 210
        assert!(html.contains("height:561.47px"));
    }

    #[test]
    fn test_rich_text_spacing_matches_layout() {
        let doc = ResumeDocument {
            skills: RichTextSection::new("<p>One</p><p>Two</p><ul><li>Three</li></ul>"),
            ..Default::default()
        };
        let html = render_html(&doc, TemplateId::Single, 397.0);
        let reset_at = html.find("<style>").unwrap();
        assert!(reset_at < html.find(r#"class="rich-text""#).unwrap());
        assert!(html.contains("{margin:0 0 0.35em;padding:0;font-size:inherit}"));
        // 16 units at half scale
        assert!(html.contains(".resume-page .rich-text ol{margin:0;padding:0 0 0 8.00px}"));
        assert!(html.contains("</style>"));
    }

    #[test]
    fn test_sections_tagged_in_markup() {
        let doc = ResumeDocument {
            interests: RichTextSection::new("<p>Chess</p>"),
            ..Default::default()
        };
        let html = render_html(&doc, TemplateId::SingleColored, 794.0);
        assert!(html.contains(r#"data-section="interests""#));
        assert!(!html.contains(r#"data-section="skills""#));
    }
}
