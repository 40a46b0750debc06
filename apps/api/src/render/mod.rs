// Template rendering: a closed set of layout strategies behind one trait,
// looked up by template identifier.

pub mod banner;
pub mod canvas;
pub mod handlers;
pub mod html;
pub mod minimalist;
pub mod modern;
pub mod sections;
pub mod two_column;

use serde::Serialize;

use crate::document::filter::PresentDocument;
use crate::layout::page::REFERENCE_WIDTH;
use crate::layout::scaler::Scale;
use crate::models::template::TemplateId;

use banner::AccentBanner;
use canvas::{Canvas, Column, PageLayout};
use minimalist::Minimalist;
use modern::ModernVisual;
use two_column::TwoColumn;

/// Inner page padding, in design units.
pub const PAGE_PADDING: f32 = 32.0;

/// A template variant. Implementations only decide placement and dressing; they
/// must place every section of the filtered document somewhere.
pub trait TemplateRenderer: Send + Sync {
    fn id(&self) -> TemplateId;

    fn name(&self) -> &'static str;

    /// Draws the document in design units.
    fn compose(&self, doc: &PresentDocument, canvas: &mut Canvas);

    fn render(&self, doc: &PresentDocument, scale: Scale) -> PageLayout {
        let mut canvas = Canvas::new();
        self.compose(doc, &mut canvas);
        canvas.finish(self.id()).scaled(scale)
    }
}

static MINIMALIST: Minimalist = Minimalist;
static TWO_COLUMN: TwoColumn = TwoColumn;
static MODERN_VISUAL: ModernVisual = ModernVisual;
static ACCENT_BANNER: AccentBanner = AccentBanner;

pub fn renderer_for(id: TemplateId) -> &'static dyn TemplateRenderer {
    match id {
        TemplateId::Single => &MINIMALIST,
        TemplateId::Double => &TWO_COLUMN,
        TemplateId::Colored => &MODERN_VISUAL,
        TemplateId::SingleColored => &ACCENT_BANNER,
    }
}

/// Full-width column inside the page padding.
pub fn content_column() -> Column {
    Column::new(PAGE_PADDING, REFERENCE_WIDTH - 2.0 * PAGE_PADDING, PAGE_PADDING)
}

#[derive(Debug, Serialize)]
pub struct TemplateInfo {
    pub id: TemplateId,
    pub name: &'static str,
}

pub fn registered_templates() -> Vec<TemplateInfo> {
    TemplateId::ALL
        .into_iter()
        .map(|id| TemplateInfo {
            id,
            name: renderer_for(id).name(),
        })
        .collect()
}
