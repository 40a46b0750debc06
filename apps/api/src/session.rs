//! One editing session: the document store, the selected template, the preview
//! surface and the save controller, wired together.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;
use uuid::Uuid;

use crate::document::filter::filter_document;
use crate::document::store::ResumeDataStore;
use crate::export::pdf::ExportPipeline;
use crate::export::save::SaveController;
use crate::export::sink::ResumeSink;
use crate::layout::scaler::{PreviewPane, SurfaceError};
use crate::models::resume::ResumeDocument;
use crate::models::template::TemplateId;
use crate::render::canvas::PageLayout;
use crate::render::renderer_for;

pub struct EditingSession {
    id: Uuid,
    store: ResumeDataStore,
    template: watch::Sender<TemplateId>,
    preview: Arc<PreviewPane>,
    saver: SaveController,
}

impl EditingSession {
    pub fn start(
        initial: ResumeDocument,
        template: TemplateId,
        pipeline: ExportPipeline,
        sink: Arc<dyn ResumeSink>,
    ) -> Self {
        let id = Uuid::new_v4();
        let store = ResumeDataStore::new(initial);
        let (template_tx, template_rx) = watch::channel(template);
        let preview = Arc::new(PreviewPane::new());
        let saver = SaveController::new(
            id,
            store.reader(),
            template_rx,
            Arc::clone(&preview),
            pipeline,
            sink,
        );
        info!(session_id = %id, template = %template, "editing session started");
        Self {
            id,
            store,
            template: template_tx,
            preview,
            saver,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn store(&self) -> &ResumeDataStore {
        &self.store
    }

    pub fn template(&self) -> TemplateId {
        *self.template.borrow()
    }

    /// Switches the template. Document content is untouched.
    pub fn select_template(&self, id: TemplateId) {
        let previous = self.template.send_replace(id);
        if previous != id {
            info!(session_id = %self.id, from = %previous, to = %id, "template selected");
        }
    }

    pub fn preview(&self) -> &PreviewPane {
        &self.preview
    }

    pub fn saver(&self) -> &SaveController {
        &self.saver
    }

    /// Current document laid out with the selected template at the preview's scale.
    pub fn render_preview(&self) -> Result<PageLayout, SurfaceError> {
        let scale = self.preview.scale()?;
        let document = filter_document(&self.store.snapshot());
        Ok(renderer_for(self.template()).render(&document, scale))
    }
}
