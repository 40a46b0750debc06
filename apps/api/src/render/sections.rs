//! Section writers shared by every template.
//!
//! Templates differ in where sections go and how they are dressed (the [`Theme`]);
//! how an entry or a block turns into boxes is the same everywhere.

use crate::document::filter::{
    ContactKind, DetailKind, Entry, Header, PresentSection, SectionBody,
};
use crate::layout::font_metrics::FontFamily;
use crate::render::canvas::{Canvas, Column, Rect, Rgb, TextStyle};

pub const PROJECT_LINK_LABEL: &str = "View Project";

/// Per-template dressing of the shared section vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub name: TextStyle,
    pub subtitle: TextStyle,
    pub heading: TextStyle,
    pub uppercase_headings: bool,
    /// Rule under section headings.
    pub heading_rule: Option<Rgb>,
    pub entry_title: TextStyle,
    pub dates: TextStyle,
    pub role: TextStyle,
    pub body: TextStyle,
    pub muted: TextStyle,
    /// Thin bar left of entry descriptions.
    pub body_bar: Option<Rgb>,
    pub section_gap: f32,
    pub entry_gap: f32,
}

impl Theme {
    /// Plain sans-serif theme every template starts from.
    pub fn base() -> Self {
        let sans = |size, color| TextStyle::new(FontFamily::Helvetica, size, color);
        Self {
            name: sans(30.0, Rgb::GRAY_900),
            subtitle: sans(14.0, Rgb::GRAY_500),
            heading: sans(20.0, Rgb::GRAY_900).bold(),
            uppercase_headings: false,
            heading_rule: Some(Rgb::GRAY_200),
            entry_title: sans(16.0, Rgb::GRAY_900).bold(),
            dates: sans(14.0, Rgb::GRAY_500),
            role: sans(14.0, Rgb::GRAY_800).bold(),
            body: sans(14.0, Rgb::GRAY_700),
            muted: sans(12.0, Rgb::GRAY_500),
            body_bar: None,
            section_gap: 32.0,
            entry_gap: 16.0,
        }
    }
}

pub fn write_header(canvas: &mut Canvas, col: &mut Column, header: &Header, theme: &Theme, contact_columns: usize) {
    canvas.set_section(None);
    let name = format!("{} {}", header.firstname, header.lastname);
    canvas.text(col, name.trim(), theme.name);
    if let Some(location) = &header.location {
        canvas.text(col, location, theme.subtitle);
    }

    if !header.contacts.is_empty() {
        col.advance(12.0);
        let items: Vec<String> = header
            .contacts
            .iter()
            .map(|c| match c.kind {
                ContactKind::Phone | ContactKind::Email => c.value.clone(),
                ContactKind::Linkedin => format!("LinkedIn: {}", c.value),
                ContactKind::Github => format!("GitHub: {}", c.value),
            })
            .collect();
        canvas.grid(col, &items, contact_columns, 16.0, theme.body);
    }

    if let Some(summary) = &header.summary {
        col.advance(12.0);
        for paragraph in summary.lines() {
            canvas.text(col, paragraph, theme.body);
        }
    }
}

pub fn write_section(canvas: &mut Canvas, col: &mut Column, section: &PresentSection, theme: &Theme) {
    canvas.set_section(Some(section.kind));

    let title = if theme.uppercase_headings {
        section.kind.title().to_uppercase()
    } else {
        section.kind.title().to_string()
    };
    canvas.text(col, &title, theme.heading);
    if let Some(color) = theme.heading_rule {
        col.advance(4.0);
        canvas.rule(col, 2.0, color);
    }
    col.advance(10.0);

    match &section.body {
        SectionBody::Entries(entries) => {
            for (i, entry) in entries.iter().enumerate() {
                if i > 0 {
                    col.advance(theme.entry_gap);
                }
                write_entry(canvas, col, entry, theme);
            }
        }
        SectionBody::Block(html) => canvas.rich_text(col, html, theme.body, 0.0),
    }

    col.advance(theme.section_gap);
    canvas.set_section(None);
}

/// Heading line with dates, detail lines, location, link, then the body. Each part
/// only when it has content.
pub fn write_entry(canvas: &mut Canvas, col: &mut Column, entry: &Entry, theme: &Theme) {
    let dates = entry.dates.map(|d| d.label()).unwrap_or_default();
    canvas.text_pair(col, &entry.heading, theme.entry_title, &dates, theme.dates);

    for detail in &entry.details {
        match detail.kind {
            DetailKind::Role | DetailKind::Qualification => {
                canvas.text(col, &detail.text, theme.role)
            }
            DetailKind::Area => canvas.text(col, &detail.text, theme.body),
            DetailKind::Score => canvas.text(col, &format!("GPA: {}", detail.text), theme.muted),
        }
    }
    if let Some(location) = &entry.location {
        canvas.text(col, location, theme.muted);
    }
    if let Some(url) = &entry.link {
        canvas.link(col, PROJECT_LINK_LABEL, url, theme.role.colored(theme.dates.color));
    }

    if let Some(body) = &entry.body {
        col.advance(6.0);
        let top = col.y;
        let indent = if theme.body_bar.is_some() { 14.0 } else { 0.0 };
        canvas.rich_text(col, body, theme.body, indent);
        if let Some(color) = theme.body_bar {
            canvas.fill(Rect::new(col.x, top, 2.0, col.y - top), color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::filter::{DateRange, Detail};
    use crate::document::sanitize::sanitize;
    use crate::models::resume::SectionKind;
    use crate::models::template::TemplateId;
    use crate::render::canvas::BoxContent;
    use chrono::NaiveDate;

    fn entry() -> Entry {
        Entry {
            heading: "MIT".into(),
            dates: Some(DateRange {
                start: NaiveDate::from_ymd_opt(2015, 9, 1).unwrap(),
                end: None,
            }),
            details: vec![
                Detail {
                    kind: DetailKind::Qualification,
                    text: "BSc".into(),
                },
                Detail {
                    kind: DetailKind::Score,
                    text: "3.9".into(),
                },
            ],
            location: Some("Cambridge, USA".into()),
            link: None,
            body: Some(sanitize("<p>Algorithms</p>")),
        }
    }

    #[test]
    fn test_entry_lines_in_order() {
        let mut canvas = Canvas::new();
        let mut col = Column::new(0.0, 500.0, 0.0);
        write_entry(&mut canvas, &mut col, &entry(), &Theme::base());
        let lines = canvas.finish(TemplateId::Single).text_lines();
        assert_eq!(
            lines,
            vec!["09/2015 - Present", "MIT", "BSc", "GPA: 3.9", "Cambridge, USA", "Algorithms"]
        );
    }

    #[test]
    fn test_section_boxes_tagged_with_kind() {
        let section = PresentSection {
            kind: SectionKind::Education,
            body: SectionBody::Entries(vec![entry()]),
        };
        let mut canvas = Canvas::new();
        let mut col = Column::new(0.0, 500.0, 0.0);
        write_section(&mut canvas, &mut col, &section, &Theme::base());
        let layout = canvas.finish(TemplateId::Single);
        assert!(layout.boxes.iter().all(|b| b.section == Some(SectionKind::Education)));
        assert_eq!(layout.text_lines()[0], "Education");
    }

    #[test]
    fn test_body_bar_runs_along_description() {
        let theme = Theme {
            body_bar: Some(Rgb::INDIGO_200),
            ..Theme::base()
        };
        let mut canvas = Canvas::new();
        let mut col = Column::new(0.0, 500.0, 0.0);
        write_entry(&mut canvas, &mut col, &entry(), &theme);
        let layout = canvas.finish(TemplateId::Colored);
        let bar = layout
            .boxes
            .iter()
            .find(|b| matches!(b.content, BoxContent::Fill { .. }))
            .unwrap();
        let body = layout
            .boxes
            .iter()
            .find(|b| matches!(b.content, BoxContent::RichText { .. }))
            .unwrap();
        assert_eq!(bar.rect.y, body.rect.y);
        assert!((bar.rect.h - body.rect.h).abs() < 1e-3);
        assert!(body.rect.x > bar.rect.x);
    }

    #[test]
    fn test_project_link_carries_url() {
        let project = Entry {
            heading: "CLI".into(),
            dates: None,
            details: Vec::new(),
            location: None,
            link: Some("https://example.dev".into()),
            body: None,
        };
        let mut canvas = Canvas::new();
        let mut col = Column::new(0.0, 500.0, 0.0);
        write_entry(&mut canvas, &mut col, &project, &Theme::base());
        let layout = canvas.finish(TemplateId::Single);
        let linked = layout.boxes.iter().find_map(|b| match &b.content {
            BoxContent::Text { text, link: Some(url), .. } => Some((text.clone(), url.clone())),
            _ => None,
        });
        assert_eq!(
            linked,
            Some((PROJECT_LINK_LABEL.to_string(), "https://example.dev".to_string()))
        );
    }
}
