//! Minimalist: one column, serif headings, every section in canonical order.

use crate::document::filter::PresentDocument;
use crate::layout::font_metrics::FontFamily;
use crate::models::template::TemplateId;
use crate::render::canvas::{Canvas, Rgb, TextStyle};
use crate::render::sections::{write_header, write_section, Theme};
use crate::render::{content_column, TemplateRenderer};

pub struct Minimalist;

fn theme() -> Theme {
    let base = Theme::base();
    Theme {
        heading: TextStyle::new(FontFamily::Times, 20.0, Rgb::GRAY_900).bold(),
        entry_title: TextStyle::new(FontFamily::Times, 16.0, Rgb::GRAY_900).bold(),
        dates: base.dates.italic(),
        ..base
    }
}

impl TemplateRenderer for Minimalist {
    fn id(&self) -> TemplateId {
        TemplateId::Single
    }

    fn name(&self) -> &'static str {
        "Minimalist"
    }

    fn compose(&self, doc: &PresentDocument, canvas: &mut Canvas) {
        let theme = theme();
        let mut col = content_column();

        write_header(canvas, &mut col, &doc.header, &theme, 4);
        col.advance(theme.section_gap);

        for section in &doc.sections {
            write_section(canvas, &mut col, section, &theme);
        }
    }
}
