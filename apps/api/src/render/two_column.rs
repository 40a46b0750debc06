//! Two-Column: records in a wide main column, rich-text blocks in a tinted side column.

use crate::document::filter::PresentDocument;
use crate::models::resume::SectionKind;
use crate::models::template::TemplateId;
use crate::render::canvas::{Canvas, Column, Rect, Rgb, TextStyle};
use crate::render::sections::{write_header, write_section, Theme};
use crate::render::{content_column, TemplateRenderer};

const COLUMN_GAP: f32 = 24.0;
const SIDE_PADDING: f32 = 12.0;

pub struct TwoColumn;

enum Region {
    Main,
    Side,
}

fn region(kind: SectionKind) -> Region {
    match kind {
        SectionKind::WorkExperience | SectionKind::Education | SectionKind::Projects => {
            Region::Main
        }
        SectionKind::Skills
        | SectionKind::Languages
        | SectionKind::Volunteer
        | SectionKind::Interests
        | SectionKind::Awards
        | SectionKind::References => Region::Side,
    }
}

fn theme() -> Theme {
    let base = Theme::base();
    Theme {
        heading: TextStyle {
            size: 15.0,
            ..base.heading.colored(Rgb::GRAY_800)
        },
        uppercase_headings: true,
        heading_rule: Some(Rgb::GRAY_900),
        section_gap: 24.0,
        ..base
    }
}

impl TemplateRenderer for TwoColumn {
    fn id(&self) -> TemplateId {
        TemplateId::Double
    }

    fn name(&self) -> &'static str {
        "Two Column"
    }

    fn compose(&self, doc: &PresentDocument, canvas: &mut Canvas) {
        let theme = theme();
        let mut page = content_column();

        write_header(canvas, &mut page, &doc.header, &theme, 2);
        page.advance(theme.section_gap);

        let mut cols = page.split(&[2.0 / 3.0, 1.0 / 3.0], COLUMN_GAP).into_iter();
        let (Some(mut main), Some(side_outer)) = (cols.next(), cols.next()) else {
            return;
        };
        let mut side = Column::new(
            side_outer.x + SIDE_PADDING,
            side_outer.width - 2.0 * SIDE_PADDING,
            side_outer.y + SIDE_PADDING,
        );

        for section in &doc.sections {
            let col = match region(section.kind) {
                Region::Main => &mut main,
                Region::Side => &mut side,
            };
            write_section(canvas, col, section, &theme);
        }

        if side.y > side_outer.y + SIDE_PADDING {
            canvas.fill(
                Rect::new(
                    side_outer.x,
                    side_outer.y,
                    side_outer.width,
                    side.y - side_outer.y,
                ),
                Rgb::GRAY_50,
            );
        }
    }
}
