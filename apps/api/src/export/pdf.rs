//! Layout to PDF conversion.
//!
//! The unit-scale layout is paginated onto US Letter pages and written with the
//! base-14 Helvetica and Times faces, so no font files are embedded. The produced
//! bytes are parsed back before they leave this module.

use std::time::Instant;

use bytes::Bytes;
use pdf_writer::types::{ActionType, AnnotationType};
use pdf_writer::{Content, Name, Pdf, Rect as PdfRect, Ref, Str};
use thiserror::Error;
use tracing::{debug, info};

use crate::document::rich_text::Run;
use crate::export::paginate::{paginate, PageItem, PrintedPage};
use crate::layout::font_metrics::FontFamily;
use crate::layout::page::PageConfig;
use crate::layout::scaler::Scale;
use crate::render::canvas::{PageLayout, Rect, Rgb, TextStyle};

/// Baseline position inside a line box, as a fraction of the font size below the glyph top.
const ASCENT: f32 = 0.8;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("layout cannot be converted: {0}")]
    Conversion(String),

    #[error("conversion task failed: {0}")]
    TaskFailed(String),

    #[error("produced PDF is invalid: {0}")]
    InvalidOutput(String),
}

#[derive(Debug, Clone)]
pub struct ExportedPdf {
    pub bytes: Bytes,
    pub page_count: usize,
}

struct Face {
    base_font: &'static [u8],
    resource: &'static [u8],
}

/// Indexed by [`face_index`].
const FACES: [Face; 8] = [
    Face { base_font: b"Helvetica", resource: b"F1" },
    Face { base_font: b"Helvetica-Oblique", resource: b"F2" },
    Face { base_font: b"Helvetica-Bold", resource: b"F3" },
    Face { base_font: b"Helvetica-BoldOblique", resource: b"F4" },
    Face { base_font: b"Times-Roman", resource: b"F5" },
    Face { base_font: b"Times-Italic", resource: b"F6" },
    Face { base_font: b"Times-Bold", resource: b"F7" },
    Face { base_font: b"Times-BoldItalic", resource: b"F8" },
];

fn face_index(font: FontFamily, bold: bool, italic: bool) -> usize {
    let family = match font {
        FontFamily::Helvetica => 0,
        FontFamily::Times => 4,
    };
    family + usize::from(bold) * 2 + usize::from(italic)
}

/// Converts rendered layouts into paginated PDF documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportPipeline {
    page: PageConfig,
}

impl ExportPipeline {
    pub fn new(page: PageConfig) -> Self {
        Self { page }
    }

    /// Converts off the async runtime; a panic inside the conversion surfaces as
    /// [`ExportError::TaskFailed`].
    pub async fn export(&self, layout: PageLayout) -> Result<ExportedPdf, ExportError> {
        let page = self.page;
        let template = layout.template;
        let started = Instant::now();

        let pdf = tokio::task::spawn_blocking(move || convert(layout, &page))
            .await
            .map_err(|e| ExportError::TaskFailed(e.to_string()))??;

        info!(
            template = %template,
            pages = pdf.page_count,
            bytes = pdf.bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "layout exported to PDF"
        );
        Ok(pdf)
    }
}

/// Synchronous conversion: normalise, paginate, write, verify.
pub fn convert(layout: PageLayout, page: &PageConfig) -> Result<ExportedPdf, ExportError> {
    check_page(page)?;
    check_geometry(&layout)?;
    let layout = layout.scaled(Scale::UNIT);
    let pages = paginate(&layout, page.printable_height_units());
    debug!(pages = pages.len(), boxes = layout.boxes.len(), "layout paginated");

    let bytes = write_pdf(&pages, page);
    let page_count = verify(&bytes, pages.len())?;
    Ok(ExportedPdf {
        bytes: Bytes::from(bytes),
        page_count,
    })
}

fn check_page(page: &PageConfig) -> Result<(), ExportError> {
    let usable = |v: f32| v.is_finite() && v > 0.0;
    if !(usable(page.printable_width()) && usable(page.printable_height())) {
        return Err(ExportError::Conversion(format!(
            "page {}x{}pt leaves no printable area inside {}pt margins",
            page.width_pt, page.height_pt, page.margin_pt
        )));
    }
    Ok(())
}

fn check_geometry(layout: &PageLayout) -> Result<(), ExportError> {
    if !(layout.width.is_finite() && layout.width > 0.0) {
        return Err(ExportError::Conversion(format!(
            "layout width {} is not a usable page width",
            layout.width
        )));
    }
    for b in &layout.boxes {
        let r = &b.rect;
        if ![r.x, r.y, r.w, r.h].iter().all(|v| v.is_finite()) {
            return Err(ExportError::Conversion(format!("box has non-finite geometry: {r:?}")));
        }
    }
    Ok(())
}

/// Maps design units on a printed page to PDF user space.
struct Placement<'a> {
    page: &'a PageConfig,
    ppu: f32,
}

impl Placement<'_> {
    fn x(&self, units: f32) -> f32 {
        self.page.margin_pt + units * self.ppu
    }

    /// PDF y grows upwards from the bottom edge.
    fn y(&self, units_from_top: f32) -> f32 {
        self.page.height_pt - (self.page.margin_pt + units_from_top * self.ppu)
    }

    fn rect(&self, r: &Rect) -> PdfRect {
        PdfRect::new(self.x(r.x), self.y(r.bottom()), self.x(r.x + r.w), self.y(r.y))
    }
}

fn write_pdf(pages: &[PrintedPage], config: &PageConfig) -> Vec<u8> {
    let place = Placement {
        page: config,
        ppu: config.points_per_unit(),
    };

    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let tree_id = alloc.bump();
    let font_ids: Vec<Ref> = FACES.iter().map(|_| alloc.bump()).collect();
    let page_ids: Vec<Ref> = pages.iter().map(|_| alloc.bump()).collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    for (face, id) in FACES.iter().zip(&font_ids) {
        pdf.type1_font(*id)
            .base_font(Name(face.base_font))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    for (printed, page_id) in pages.iter().zip(&page_ids) {
        let content_id = alloc.bump();
        let mut content = Content::new();
        let mut links: Vec<(PdfRect, &str)> = Vec::new();

        for item in &printed.items {
            match item {
                PageItem::Fill { rect, color } => {
                    let r = place.rect(rect);
                    set_fill(&mut content, *color);
                    content.rect(r.x1, r.y1, r.x2 - r.x1, r.y2 - r.y1);
                    content.fill_nonzero();
                }
                PageItem::Text {
                    rect,
                    runs,
                    style,
                    link,
                } => {
                    write_text(&mut content, &place, rect, runs, style);
                    if let Some(url) = link.as_deref().filter(|u| !u.trim().is_empty()) {
                        links.push((place.rect(rect), url.trim()));
                    }
                }
            }
        }
        pdf.stream(content_id, &content.finish());

        let mut page = pdf.page(*page_id);
        page.media_box(PdfRect::new(0.0, 0.0, config.width_pt, config.height_pt))
            .parent(tree_id)
            .contents(content_id);
        if !links.is_empty() {
            let mut annotations = page.annotations();
            for (rect, url) in &links {
                let mut annotation = annotations.push();
                annotation.subtype(AnnotationType::Link).rect(*rect);
                annotation
                    .action()
                    .action_type(ActionType::Uri)
                    .uri(Str(url.as_bytes()));
            }
        }
        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        for (face, id) in FACES.iter().zip(&font_ids) {
            fonts.pair(Name(face.resource), *id);
        }
    }

    pdf.finish()
}

fn set_fill(content: &mut Content, color: Rgb) {
    let (r, g, b) = color.unit();
    content.set_fill_rgb(r, g, b);
}

fn write_text(
    content: &mut Content,
    place: &Placement<'_>,
    rect: &Rect,
    runs: &[Run],
    style: &TextStyle,
) {
    if runs.iter().all(|r| r.text.trim().is_empty()) {
        return;
    }
    let baseline = rect.y + (rect.h - style.size) / 2.0 + style.size * ASCENT;
    let size_pt = style.size * place.ppu;

    set_fill(content, style.color);
    content.begin_text();
    content.next_line(place.x(rect.x), place.y(baseline));
    for run in runs {
        let face = face_index(style.font, style.bold || run.bold, style.italic || run.italic);
        content.set_font(Name(FACES[face].resource), size_pt);
        content.show(Str(&win_ansi(&run.text)));
    }
    content.end_text();
}

/// Encodes text for the WinAnsi-encoded base fonts; unmappable characters become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '\u{20ac}' => 0x80,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2026}' => 0x85,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}

/// Parses the produced bytes and checks the page tree.
fn verify(bytes: &[u8], expected_pages: usize) -> Result<usize, ExportError> {
    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| ExportError::InvalidOutput(e.to_string()))?;
    let pages = doc.get_pages().len();
    if pages == 0 || pages != expected_pages {
        return Err(ExportError::InvalidOutput(format!(
            "expected {expected_pages} pages, document has {pages}"
        )));
    }
    Ok(pages)
}
