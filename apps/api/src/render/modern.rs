//! Modern-Visual: accent bar beside the header, then a 1/3 + 2/3 grid.
//!
//! Personal blocks (skills, languages, interests, references) go left; professional
//! sections go right.

use crate::document::filter::PresentDocument;
use crate::models::resume::SectionKind;
use crate::models::template::TemplateId;
use crate::render::canvas::{Canvas, Column, Rect, Rgb};
use crate::render::sections::{write_header, write_section, Theme};
use crate::render::{content_column, TemplateRenderer};

const ACCENT_BAR_WIDTH: f32 = 8.0;
const HEADER_INSET: f32 = 24.0;
const COLUMN_GAP: f32 = 32.0;

pub struct ModernVisual;

enum Region {
    Left,
    Right,
}

fn region(kind: SectionKind) -> Region {
    match kind {
        SectionKind::Skills
        | SectionKind::Languages
        | SectionKind::Interests
        | SectionKind::References => Region::Left,
        SectionKind::WorkExperience
        | SectionKind::Education
        | SectionKind::Projects
        | SectionKind::Volunteer
        | SectionKind::Awards => Region::Right,
    }
}

fn theme() -> Theme {
    let base = Theme::base();
    Theme {
        name: base.name.bold().colored(Rgb::INDIGO_600),
        heading_rule: Some(Rgb::INDIGO_100),
        dates: base.dates.colored(Rgb::INDIGO_600),
        role: base.role.colored(Rgb::INDIGO_600),
        body_bar: Some(Rgb::INDIGO_200),
        section_gap: 24.0,
        ..base
    }
}

impl TemplateRenderer for ModernVisual {
    fn id(&self) -> TemplateId {
        TemplateId::Colored
    }

    fn name(&self) -> &'static str {
        "Modern Visual"
    }

    fn compose(&self, doc: &PresentDocument, canvas: &mut Canvas) {
        let theme = theme();
        let page = content_column();

        let header_top = page.y;
        let mut header = Column::new(page.x + HEADER_INSET, page.width - HEADER_INSET, page.y);
        write_header(canvas, &mut header, &doc.header, &theme, 2);
        canvas.fill(
            Rect::new(page.x, header_top, ACCENT_BAR_WIDTH, header.y - header_top),
            Rgb::INDIGO_600,
        );

        let grid_top = Column::new(page.x, page.width, header.y + COLUMN_GAP);
        let mut cols = grid_top.split(&[1.0 / 3.0, 2.0 / 3.0], COLUMN_GAP).into_iter();
        let (Some(mut left), Some(mut right)) = (cols.next(), cols.next()) else {
            return;
        };

        for section in &doc.sections {
            let col = match region(section.kind) {
                Region::Left => &mut left,
                Region::Right => &mut right,
            };
            write_section(canvas, col, section, &theme);
        }
    }
}
