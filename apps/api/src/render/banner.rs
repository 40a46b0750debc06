//! Accent Banner: header on a full-width coloured band, one column of accented sections.

use crate::document::filter::PresentDocument;
use crate::layout::page::REFERENCE_WIDTH;
use crate::models::template::TemplateId;
use crate::render::canvas::{Canvas, Rect, Rgb};
use crate::render::sections::{write_header, write_section, Theme};
use crate::render::{content_column, TemplateRenderer, PAGE_PADDING};

pub struct AccentBanner;

fn theme() -> Theme {
    let base = Theme::base();
    Theme {
        heading: base.heading.colored(Rgb::INDIGO_600),
        uppercase_headings: true,
        heading_rule: Some(Rgb::INDIGO_200),
        dates: base.dates.colored(Rgb::INDIGO_600),
        ..base
    }
}

/// Light text for the band.
fn banner_theme(theme: &Theme) -> Theme {
    Theme {
        name: theme.name.bold().colored(Rgb::WHITE),
        subtitle: theme.subtitle.colored(Rgb::INDIGO_100),
        body: theme.body.colored(Rgb::WHITE),
        ..*theme
    }
}

impl TemplateRenderer for AccentBanner {
    fn id(&self) -> TemplateId {
        TemplateId::SingleColored
    }

    fn name(&self) -> &'static str {
        "Accent Banner"
    }

    fn compose(&self, doc: &PresentDocument, canvas: &mut Canvas) {
        let theme = theme();
        let mut col = content_column();

        write_header(canvas, &mut col, &doc.header, &banner_theme(&theme), 3);
        col.advance(PAGE_PADDING);
        canvas.fill(Rect::new(0.0, 0.0, REFERENCE_WIDTH, col.y), Rgb::INDIGO_600);
        col.advance(theme.section_gap);

        for section in &doc.sections {
            write_section(canvas, &mut col, section, &theme);
        }
    }
}
