//! Positioned-box page model and the drawing cursor templates compose with.
//!
//! Templates draw in design units onto a [`Canvas`] through [`Column`] cursors.
//! The result is a [`PageLayout`] at unit scale; [`PageLayout::scaled`] multiplies
//! every coordinate by one factor, so proportions never depend on the surface width.

use crate::document::rich_text::{self, Run};
use crate::document::sanitize::SanitizedHtml;
use crate::layout::font_metrics::{get_metrics, FontFamily};
use crate::layout::page::{page_height, REFERENCE_WIDTH};
use crate::layout::scaler::Scale;
use crate::layout::wrap::{wrap_runs, wrap_text};
use crate::models::resume::SectionKind;
use crate::models::template::TemplateId;

/// Line box height as a multiple of the font size.
pub const LINE_HEIGHT: f32 = 1.45;

/// Vertical space between rich-text paragraphs, in ems.
pub const PARAGRAPH_GAP: f32 = 0.35;

/// Indent per list nesting level.
pub const LIST_INDENT: f32 = 16.0;

/// Distance from a list marker to the item text.
pub const MARKER_GAP: f32 = 10.0;

/// Minimum space between a left-aligned heading and right-aligned dates.
const PAIR_GAP: f32 = 12.0;

// ────────────────────────────────────────────────────────────────────────────
// Geometry and style
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    fn scaled(self, k: f32) -> Self {
        Self::new(self.x * k, self.y * k, self.w * k, self.h * k)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const GRAY_900: Rgb = Rgb(17, 24, 39);
    pub const GRAY_800: Rgb = Rgb(31, 41, 55);
    pub const GRAY_700: Rgb = Rgb(55, 65, 81);
    pub const GRAY_500: Rgb = Rgb(107, 114, 128);
    pub const GRAY_200: Rgb = Rgb(229, 231, 235);
    pub const GRAY_50: Rgb = Rgb(249, 250, 251);
    pub const INDIGO_600: Rgb = Rgb(79, 70, 229);
    pub const INDIGO_200: Rgb = Rgb(199, 210, 254);
    pub const INDIGO_100: Rgb = Rgb(224, 231, 255);
    pub const INDIGO_50: Rgb = Rgb(238, 242, 255);

    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Components in `0.0..=1.0`, as PDF colour operators take them.
    pub fn unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: FontFamily,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub color: Rgb,
}

impl TextStyle {
    pub fn new(font: FontFamily, size: f32, color: Rgb) -> Self {
        Self {
            font,
            size,
            bold: false,
            italic: false,
            color,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn colored(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn line_height(&self) -> f32 {
        self.size * LINE_HEIGHT
    }

    pub fn measure(&self, text: &str) -> f32 {
        get_metrics(self.font, self.bold).measure(text, self.size)
    }

    fn scaled(mut self, k: f32) -> Self {
        self.size *= k;
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page model
// ────────────────────────────────────────────────────────────────────────────

/// One pre-wrapped line of a rich-text box, offset from the box origin.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub dx: f32,
    pub dy: f32,
    /// List bullet or number, drawn `MARKER_GAP` left of `dx`.
    pub marker: Option<String>,
    pub runs: Vec<Run>,
}

impl PlacedLine {
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoxContent {
    /// A single line of plain text.
    Text {
        text: String,
        style: TextStyle,
        link: Option<String>,
    },
    /// Sanitized markup for the preview plus its wrapped lines for export.
    RichText {
        html: SanitizedHtml,
        style: TextStyle,
        lines: Vec<PlacedLine>,
    },
    /// Horizontal rule filling the box.
    Rule { color: Rgb },
    /// Decoration painted behind content.
    Fill { color: Rgb },
}

impl BoxContent {
    fn scale(&mut self, k: f32) {
        match self {
            BoxContent::Text { style, .. } => *style = style.scaled(k),
            BoxContent::RichText { style, lines, .. } => {
                *style = style.scaled(k);
                for line in lines {
                    line.dx *= k;
                    line.dy *= k;
                }
            }
            BoxContent::Rule { .. } | BoxContent::Fill { .. } => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    pub rect: Rect,
    pub content: BoxContent,
    /// Section the box belongs to; `None` for the header and page decoration.
    pub section: Option<SectionKind>,
}

/// A rendered page: every element positioned in surface units.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub template: TemplateId,
    pub scale: Scale,
    pub width: f32,
    pub page_height: f32,
    /// Bottom of the lowest box; exceeds `page_height` when content overflows.
    pub content_height: f32,
    pub boxes: Vec<LayoutBox>,
}

impl PageLayout {
    /// Same layout at another scale.
    pub fn scaled(mut self, scale: Scale) -> Self {
        let k = scale.factor() / self.scale.factor();
        for b in &mut self.boxes {
            b.rect = b.rect.scaled(k);
            b.content.scale(k);
        }
        self.width *= k;
        self.page_height *= k;
        self.content_height *= k;
        self.scale = scale;
        self
    }

    /// Sections with at least one box, in first-appearance order.
    pub fn sections(&self) -> Vec<SectionKind> {
        let mut seen = Vec::new();
        for kind in self.boxes.iter().filter_map(|b| b.section) {
            if !seen.contains(&kind) {
                seen.push(kind);
            }
        }
        seen
    }

    /// Every visible text line, in paint order.
    pub fn text_lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        for b in &self.boxes {
            match &b.content {
                BoxContent::Text { text, .. } => out.push(text.clone()),
                BoxContent::RichText { lines, .. } => out.extend(lines.iter().map(PlacedLine::text)),
                BoxContent::Rule { .. } | BoxContent::Fill { .. } => {}
            }
        }
        out
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Drawing
// ────────────────────────────────────────────────────────────────────────────

/// Vertical cursor over a column of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub x: f32,
    pub width: f32,
    pub y: f32,
}

impl Column {
    pub fn new(x: f32, width: f32, y: f32) -> Self {
        Self { x, width, y }
    }

    pub fn advance(&mut self, dy: f32) {
        self.y += dy;
    }

    /// Splits into side-by-side columns starting at the same `y`.
    /// `fractions` are shares of the width left after the gaps.
    pub fn split(&self, fractions: &[f32], gap: f32) -> Vec<Column> {
        let gaps = gap * fractions.len().saturating_sub(1) as f32;
        let usable = (self.width - gaps).max(0.0);
        let mut x = self.x;
        fractions
            .iter()
            .map(|f| {
                let col = Column::new(x, usable * f, self.y);
                x += usable * f + gap;
                col
            })
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct Canvas {
    boxes: Vec<LayoutBox>,
    fills: Vec<LayoutBox>,
    section: Option<SectionKind>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags every box drawn from now on.
    pub fn set_section(&mut self, section: Option<SectionKind>) {
        self.section = section;
    }

    fn push(&mut self, rect: Rect, content: BoxContent) {
        self.boxes.push(LayoutBox {
            rect,
            content,
            section: self.section,
        });
    }

    /// Wrapped plain text, one box per line.
    pub fn text(&mut self, col: &mut Column, text: &str, style: TextStyle) {
        self.text_lines(col, text, style, None);
    }

    pub fn link(&mut self, col: &mut Column, label: &str, url: &str, style: TextStyle) {
        self.text_lines(col, label, style, Some(url));
    }

    fn text_lines(&mut self, col: &mut Column, text: &str, style: TextStyle, link: Option<&str>) {
        let lh = style.line_height();
        for line in wrap_text(text, style.font, style.bold, style.size, col.width) {
            let w = style.measure(&line).min(col.width);
            self.push(
                Rect::new(col.x, col.y, w, lh),
                BoxContent::Text {
                    text: line,
                    style,
                    link: link.map(str::to_string),
                },
            );
            col.advance(lh);
        }
    }

    /// Left text and right-aligned text sharing a line. The right part moves to its
    /// own line when the left one would be squeezed too narrow.
    pub fn text_pair(
        &mut self,
        col: &mut Column,
        left: &str,
        left_style: TextStyle,
        right: &str,
        right_style: TextStyle,
    ) {
        let left = left.trim();
        let right = right.trim();
        if right.is_empty() {
            self.text(col, left, left_style);
            return;
        }

        let right_w = right_style.measure(right).min(col.width);
        let right_x = col.x + col.width - right_w;
        let right_box = |y: f32| {
            (
                Rect::new(right_x, y, right_w, right_style.line_height()),
                BoxContent::Text {
                    text: right.to_string(),
                    style: right_style,
                    link: None,
                },
            )
        };

        let available = col.width - right_w - PAIR_GAP;
        if left.is_empty() || available < col.width * 0.4 {
            self.text(col, left, left_style);
            let (rect, content) = right_box(col.y);
            self.push(rect, content);
            col.advance(right_style.line_height());
            return;
        }

        let top = col.y;
        let (rect, content) = right_box(top);
        self.push(rect, content);
        let mut left_col = Column::new(col.x, available, top);
        self.text(&mut left_col, left, left_style);
        col.y = left_col.y.max(top + right_style.line_height());
    }

    /// Sanitized rich text as one box, pre-wrapped to the column minus `indent`.
    pub fn rich_text(&mut self, col: &mut Column, html: &SanitizedHtml, style: TextStyle, indent: f32) {
        let width = (col.width - indent).max(style.size);
        let lh = style.line_height();
        let mut lines = Vec::new();
        let mut dy = 0.0;

        for (i, paragraph) in rich_text::parse(html).into_iter().enumerate() {
            if i > 0 {
                dy += style.size * PARAGRAPH_GAP;
            }
            let dx = f32::from(paragraph.depth) * LIST_INDENT;
            let runs: Vec<Run> = if paragraph.heading {
                paragraph
                    .runs
                    .iter()
                    .map(|r| Run {
                        bold: true,
                        ..r.clone()
                    })
                    .collect()
            } else {
                paragraph.runs.clone()
            };
            let marker = paragraph.marker.label();
            for (j, line) in wrap_runs(&runs, style.font, style.size, (width - dx).max(style.size))
                .into_iter()
                .enumerate()
            {
                lines.push(PlacedLine {
                    dx,
                    dy,
                    marker: if j == 0 { marker.clone() } else { None },
                    runs: line.runs,
                });
                dy += lh;
            }
        }

        if lines.is_empty() {
            return;
        }
        self.push(
            Rect::new(col.x + indent, col.y, width, dy),
            BoxContent::RichText {
                html: html.clone(),
                style,
                lines,
            },
        );
        col.advance(dy);
    }

    pub fn rule(&mut self, col: &mut Column, thickness: f32, color: Rgb) {
        self.push(
            Rect::new(col.x, col.y, col.width, thickness),
            BoxContent::Rule { color },
        );
        col.advance(thickness);
    }

    /// Items laid out row by row in `columns` equal cells.
    pub fn grid(&mut self, col: &mut Column, items: &[String], columns: usize, gap: f32, style: TextStyle) {
        let columns = columns.max(1);
        for row in items.chunks(columns) {
            let cells = col.split(&vec![1.0 / columns as f32; columns], gap);
            let mut bottom = col.y;
            for (item, mut cell) in row.iter().zip(cells) {
                self.text(&mut cell, item, style);
                bottom = bottom.max(cell.y);
            }
            col.y = bottom;
        }
    }

    /// Paints behind everything drawn on this canvas, regardless of call order.
    pub fn fill(&mut self, rect: Rect, color: Rgb) {
        self.fills.push(LayoutBox {
            rect,
            content: BoxContent::Fill { color },
            section: self.section,
        });
    }

    pub fn finish(self, template: TemplateId) -> PageLayout {
        let mut boxes = self.fills;
        boxes.extend(self.boxes);
        let content_height = boxes.iter().map(|b| b.rect.bottom()).fold(0.0, f32::max);
        PageLayout {
            template,
            scale: Scale::UNIT,
            width: REFERENCE_WIDTH,
            page_height: page_height(REFERENCE_WIDTH),
            content_height,
            boxes,
        }
    }
}
