//! Page geometry shared by the preview and the exporter.

use serde::Serialize;

/// Design width of the on-screen page (A4 at 96 DPI). Layout happens in these units.
pub const REFERENCE_WIDTH: f32 = 794.0;

/// Height / width of an ISO A-series page.
pub const PAGE_ASPECT: f32 = 297.0 / 210.0;

/// Height of a page `width` units wide.
pub fn page_height(width: f32) -> f32 {
    width * PAGE_ASPECT
}

/// Physical output page, in PDF points (1/72 in).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageConfig {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_pt: f32,
}

impl PageConfig {
    /// US Letter portrait, 1 in margins on every side.
    pub const fn us_letter() -> Self {
        Self {
            width_pt: 612.0,
            height_pt: 792.0,
            margin_pt: 72.0,
        }
    }

    pub fn printable_width(&self) -> f32 {
        self.width_pt - 2.0 * self.margin_pt
    }

    pub fn printable_height(&self) -> f32 {
        self.height_pt - 2.0 * self.margin_pt
    }

    /// Points per design unit. The design width maps onto the printable width.
    pub fn points_per_unit(&self) -> f32 {
        self.printable_width() / REFERENCE_WIDTH
    }

    /// Printable height of one page, expressed in design units.
    pub fn printable_height_units(&self) -> f32 {
        self.printable_height() / self.points_per_unit()
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::us_letter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_us_letter_printable_area() {
        let page = PageConfig::us_letter();
        assert_eq!(page.printable_width(), 468.0);
        assert_eq!(page.printable_height(), 648.0);
    }

    #[test]
    fn test_design_units_map_to_printable_width() {
        let page = PageConfig::us_letter();
        assert!((REFERENCE_WIDTH * page.points_per_unit() - 468.0).abs() < 1e-3);
        // 648 / (468 / 794) ≈ 1099.4 design units per page
        assert!((page.printable_height_units() - 1099.38).abs() < 0.05);
    }

    #[test]
    fn test_page_height_keeps_iso_aspect() {
        assert!((page_height(210.0) - 297.0).abs() < 1e-3);
        assert!((page_height(REFERENCE_WIDTH) - 1122.94).abs() < 0.01);
    }
}
