//! Destinations for saved resumes.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};

use crate::models::resume::ResumeDocument;
use crate::models::template::TemplateId;

pub const PDF_FILE_NAME: &str = "resume.pdf";
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// An exported file handed to the sink.
#[derive(Debug, Clone)]
pub struct FileArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl FileArtifact {
    pub fn pdf(bytes: Bytes) -> Self {
        Self {
            file_name: PDF_FILE_NAME.to_string(),
            mime_type: PDF_MIME_TYPE.to_string(),
            bytes,
        }
    }
}

/// Receives each successful save. Called exactly once per save; never called when
/// the save fails.
///
/// Carried in the save controller as `Arc<dyn ResumeSink>`.
#[async_trait]
pub trait ResumeSink: Send + Sync {
    async fn on_save(&self, document: ResumeDocument, template: TemplateId, artifact: FileArtifact);
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SavedSnapshot<'a> {
    template: TemplateId,
    saved_at: String,
    mime_type: &'a str,
    size_bytes: usize,
    document: &'a ResumeDocument,
}

/// Writes `<timestamp>-resume.pdf` plus a JSON snapshot of the document into a directory.
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn write(
        &self,
        document: &ResumeDocument,
        template: TemplateId,
        artifact: &FileArtifact,
    ) -> anyhow::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("cannot create {}", self.root.display()))?;

        let now = Utc::now();
        let stamp = now.format("%Y%m%dT%H%M%S%.6fZ").to_string();
        let pdf_path = self.root.join(format!("{stamp}-{}", artifact.file_name));
        let json_path = pdf_path.with_extension("json");

        tokio::fs::write(&pdf_path, &artifact.bytes)
            .await
            .with_context(|| format!("cannot write {}", pdf_path.display()))?;

        let snapshot = SavedSnapshot {
            template,
            saved_at: now.to_rfc3339(),
            mime_type: &artifact.mime_type,
            size_bytes: artifact.bytes.len(),
            document,
        };
        let json = serde_json::to_vec_pretty(&snapshot)?;
        tokio::fs::write(&json_path, json)
            .await
            .with_context(|| format!("cannot write {}", json_path.display()))?;

        Ok(pdf_path)
    }
}

#[async_trait]
impl ResumeSink for DirectorySink {
    async fn on_save(&self, document: ResumeDocument, template: TemplateId, artifact: FileArtifact) {
        match self.write(&document, template, &artifact).await {
            Ok(path) => info!(
                path = %path.display(),
                bytes = artifact.bytes.len(),
                "resume written to export directory"
            ),
            Err(e) => error!(error = ?e, root = %self.root.display(), "failed to persist saved resume"),
        }
    }
}
