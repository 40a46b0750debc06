//! Splits a unit-scale layout into printed pages.
//!
//! Content is cut into flow units (one text line, one rich-text line, one rule) and
//! walked top to bottom. A unit that would straddle a page break moves to the top of
//! the next page, and everything below it moves by the same amount. Fills are not
//! flow units: they are stretched along with the content they sit behind and split at
//! page boundaries.

use crate::document::rich_text::Run;
use crate::render::canvas::{BoxContent, PageLayout, Rect, Rgb, TextStyle, MARKER_GAP};

/// Tolerance for floating-point noise at page edges.
const EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, PartialEq)]
pub enum PageItem {
    Text {
        rect: Rect,
        runs: Vec<Run>,
        style: TextStyle,
        link: Option<String>,
    },
    Fill {
        rect: Rect,
        color: Rgb,
    },
}

impl PageItem {
    #[cfg(test)]
    pub fn rect(&self) -> &Rect {
        match self {
            PageItem::Text { rect, .. } | PageItem::Fill { rect, .. } => rect,
        }
    }

    fn shifted(mut self, dy: f32) -> Self {
        match &mut self {
            PageItem::Text { rect, .. } | PageItem::Fill { rect, .. } => rect.y += dy,
        }
        self
    }
}

/// One printed page; coordinates are design units from the printable area's top left.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrintedPage {
    pub items: Vec<PageItem>,
}

struct FlowUnit {
    top: f32,
    height: f32,
    items: Vec<PageItem>,
}

fn flow_units(layout: &PageLayout) -> (Vec<FlowUnit>, Vec<(Rect, Rgb)>) {
    let mut units = Vec::new();
    let mut fills = Vec::new();

    for b in &layout.boxes {
        match &b.content {
            BoxContent::Text { text, style, link } => units.push(FlowUnit {
                top: b.rect.y,
                height: b.rect.h,
                items: vec![PageItem::Text {
                    rect: b.rect,
                    runs: vec![Run {
                        text: text.clone(),
                        bold: style.bold,
                        italic: style.italic,
                    }],
                    style: *style,
                    link: link.clone(),
                }],
            }),
            BoxContent::RichText { style, lines, .. } => {
                let lh = style.line_height();
                for line in lines {
                    let rect = Rect::new(b.rect.x + line.dx, b.rect.y + line.dy, b.rect.w - line.dx, lh);
                    let mut items = Vec::with_capacity(2);
                    if let Some(marker) = &line.marker {
                        items.push(PageItem::Text {
                            rect: Rect::new(rect.x - MARKER_GAP, rect.y, MARKER_GAP, lh),
                            runs: vec![Run::plain(marker.clone())],
                            style: *style,
                            link: None,
                        });
                    }
                    items.push(PageItem::Text {
                        rect,
                        runs: line.runs.clone(),
                        style: *style,
                        link: None,
                    });
                    units.push(FlowUnit {
                        top: rect.y,
                        height: lh,
                        items,
                    });
                }
            }
            BoxContent::Rule { color } => units.push(FlowUnit {
                top: b.rect.y,
                height: b.rect.h,
                items: vec![PageItem::Fill {
                    rect: b.rect,
                    color: *color,
                }],
            }),
            BoxContent::Fill { color } => fills.push((b.rect, *color)),
        }
    }

    units.sort_by(|a, b| a.top.total_cmp(&b.top));
    (units, fills)
}

/// Cumulative downward shift, keyed by the original top where it starts applying.
struct Shifts(Vec<(f32, f32)>);

impl Shifts {
    /// Shift applied to content starting at `y`.
    fn at(&self, y: f32) -> f32 {
        self.0
            .iter()
            .take_while(|(top, _)| *top <= y + EPSILON)
            .last()
            .map_or(0.0, |(_, shift)| *shift)
    }

    /// Shift applied to content ending at `y` (breaks at exactly `y` excluded).
    fn before(&self, y: f32) -> f32 {
        self.0
            .iter()
            .take_while(|(top, _)| *top < y - EPSILON)
            .last()
            .map_or(0.0, |(_, shift)| *shift)
    }
}

fn page_of(y: f32, page_height: f32) -> usize {
    (y / page_height + EPSILON / page_height).floor().max(0.0) as usize
}

fn page_mut(pages: &mut Vec<PrintedPage>, index: usize) -> &mut PrintedPage {
    if pages.len() <= index {
        pages.resize_with(index + 1, PrintedPage::default);
    }
    &mut pages[index]
}

/// Paginates a unit-scale layout into pages `page_height` design units tall.
/// Always yields at least one page.
pub fn paginate(layout: &PageLayout, page_height: f32) -> Vec<PrintedPage> {
    let (units, fills) = flow_units(layout);
    let mut pages: Vec<PrintedPage> = vec![PrintedPage::default()];
    let mut shift = 0.0_f32;
    let mut shifts = Shifts(Vec::new());

    for unit in units {
        let mut y = unit.top + shift;
        let page = page_of(y, page_height);
        let page_end = (page + 1) as f32 * page_height;
        if y + unit.height > page_end + EPSILON && unit.height <= page_height {
            shift += page_end - y;
            shifts.0.push((unit.top, shift));
            y = page_end;
        }
        let page = page_of(y, page_height);
        let dy = shift - page as f32 * page_height;
        let target = page_mut(&mut pages, page);
        target.items.extend(unit.items.into_iter().map(|item| item.shifted(dy)));
    }

    let mut painted = vec![0usize; pages.len()];
    for (rect, color) in fills {
        let start = rect.y + shifts.at(rect.y);
        let end = rect.bottom() + shifts.before(rect.bottom());
        if end - start <= EPSILON {
            continue;
        }
        let first = page_of(start, page_height);
        let last = page_of(end - EPSILON, page_height);
        for page in first..=last {
            let page_top = page as f32 * page_height;
            let top = start.max(page_top);
            let bottom = end.min(page_top + page_height);
            let segment = PageItem::Fill {
                rect: Rect::new(rect.x, top - page_top, rect.w, bottom - top),
                color,
            };
            // Fills paint first on every page, in drawing order.
            if painted.len() <= page {
                painted.resize(page + 1, 0);
            }
            page_mut(&mut pages, page).items.insert(painted[page], segment);
            painted[page] += 1;
        }
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::FontFamily;
    use crate::models::template::TemplateId;
    use crate::render::canvas::{Canvas, Column};

    const PAGE: f32 = 100.0;

    fn style() -> TextStyle {
        // 10 * 1.45 = 14.5 units per line
        TextStyle::new(FontFamily::Helvetica, 10.0, Rgb::GRAY_700)
    }

    fn lines(count: usize) -> PageLayout {
        let mut canvas = Canvas::new();
        let mut col = Column::new(0.0, 500.0, 0.0);
        for i in 0..count {
            canvas.text(&mut col, &format!("line {i}"), style());
        }
        canvas.finish(TemplateId::Single)
    }

    fn texts(page: &PrintedPage) -> Vec<String> {
        page.items
            .iter()
            .filter_map(|i| match i {
                PageItem::Text { runs, .. } => Some(runs.iter().map(|r| r.text.as_str()).collect()),
                PageItem::Fill { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_layout_yields_one_blank_page() {
        let pages = paginate(&Canvas::new().finish(TemplateId::Single), PAGE);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].items.is_empty());
    }

    #[test]
    fn test_straddling_line_moves_to_next_page() {
        // Lines at 0, 14.5, ..., 87 (ends 101.5): the seventh straddles.
        let pages = paginate(&lines(8), PAGE);
        assert_eq!(pages.len(), 2);
        assert_eq!(texts(&pages[0]).len(), 6);
        assert_eq!(texts(&pages[1]), vec!["line 6", "line 7"]);
        assert!(pages[1].items[0].rect().y.abs() < 1e-3);
        assert!((pages[1].items[1].rect().y - 14.5).abs() < 1e-3);
    }

    #[test]
    fn test_every_item_lies_within_its_page() {
        let pages = paginate(&lines(40), PAGE);
        for page in &pages {
            for item in &page.items {
                let rect = item.rect();
                assert!(rect.y >= -EPSILON);
                assert!(rect.bottom() <= PAGE + EPSILON, "item overflows: {rect:?}");
            }
        }
        let total: usize = pages.iter().map(|p| texts(p).len()).sum();
        assert_eq!(total, 40);
    }

    #[test]
    fn test_fill_split_across_pages() {
        let mut canvas = Canvas::new();
        canvas.fill(Rect::new(0.0, 50.0, 10.0, 120.0), Rgb::INDIGO_50);
        let pages = paginate(&canvas.finish(TemplateId::Single), PAGE);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].items[0].rect(), &Rect::new(0.0, 50.0, 10.0, 50.0));
        assert_eq!(pages[1].items[0].rect(), &Rect::new(0.0, 0.0, 10.0, 70.0));
    }

    #[test]
    fn test_rich_text_lines_paginate_individually() {
        let mut canvas = Canvas::new();
        let mut col = Column::new(20.0, 400.0, 80.0);
        let html = crate::document::sanitize::sanitize("<ul><li>one</li><li>two</li><li>three</li></ul>");
        canvas.rich_text(&mut col, &html, style(), 0.0);
        let pages = paginate(&canvas.finish(TemplateId::Single), PAGE);
        assert_eq!(pages.len(), 2);
        // Marker and text travel together.
        assert_eq!(texts(&pages[0]), vec!["\u{2022}", "one"]);
        assert!(texts(&pages[1]).contains(&"two".to_string()));
    }
}
