//! User-triggered save: snapshot, render, export, hand off.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::document::filter::filter_document;
use crate::document::store::DocumentReader;
use crate::export::pdf::{ExportError, ExportPipeline};
use crate::export::sink::{FileArtifact, ResumeSink};
use crate::layout::scaler::{PreviewPane, SurfaceError};
use crate::models::template::TemplateId;
use crate::render::renderer_for;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("cannot save without a mounted preview: {0}")]
    Mount(#[from] SurfaceError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

/// Outcome of a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReceipt {
    pub template: TemplateId,
    pub page_count: usize,
    pub size_bytes: usize,
}

/// Runs saves for one editing session. Cheap to clone.
#[derive(Clone)]
pub struct SaveController {
    inner: Arc<SaveJob>,
}

struct SaveJob {
    session_id: Uuid,
    document: DocumentReader,
    template: watch::Receiver<TemplateId>,
    preview: Arc<PreviewPane>,
    pipeline: ExportPipeline,
    sink: Arc<dyn ResumeSink>,
}

impl SaveController {
    pub fn new(
        session_id: Uuid,
        document: DocumentReader,
        template: watch::Receiver<TemplateId>,
        preview: Arc<PreviewPane>,
        pipeline: ExportPipeline,
        sink: Arc<dyn ResumeSink>,
    ) -> Self {
        Self {
            inner: Arc::new(SaveJob {
                session_id,
                document,
                template,
                preview,
                pipeline,
                sink,
            }),
        }
    }

    /// Exports the document as it is right now and hands the PDF to the sink.
    ///
    /// The work runs on its own task, so it completes even if the caller stops
    /// waiting. Edits made after the snapshot do not reach this save.
    pub async fn save(&self) -> Result<SaveReceipt, SaveError> {
        let job = Arc::clone(&self.inner);
        tokio::spawn(async move { job.run().await })
            .await
            .map_err(|e| SaveError::Export(ExportError::TaskFailed(e.to_string())))?
    }
}

impl SaveJob {
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    async fn run(&self) -> Result<SaveReceipt, SaveError> {
        let document = self.document.snapshot();
        let template = *self.template.borrow();

        let scale = self.preview.scale().map_err(|e| {
            error!(template = %template, error = %e, "save rejected");
            SaveError::Mount(e)
        })?;

        let layout = renderer_for(template).render(&filter_document(&document), scale);
        let pdf = self.pipeline.export(layout).await.map_err(|e| {
            error!(template = %template, error = %e, "save failed during export");
            SaveError::Export(e)
        })?;

        let receipt = SaveReceipt {
            template,
            page_count: pdf.page_count,
            size_bytes: pdf.bytes.len(),
        };
        self.sink
            .on_save(document, template, FileArtifact::pdf(pdf.bytes))
            .await;

        info!(
            template = %template,
            pages = receipt.page_count,
            bytes = receipt.size_bytes,
            "resume saved"
        );
        Ok(receipt)
    }
}
