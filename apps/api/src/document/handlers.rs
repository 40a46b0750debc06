use axum::{extract::State, Json};
use serde::Serialize;

use crate::document::filter::filter_document;
use crate::document::store::DocumentUpdate;
use crate::errors::AppError;
use crate::models::resume::{ResumeDocument, SectionKind};
use crate::state::AppState;

#[derive(Serialize)]
pub struct SectionPresenceResponse {
    pub present: Vec<SectionKind>,
    pub absent: Vec<SectionKind>,
}

/// GET /api/v1/resume
pub async fn handle_get_resume(State(state): State<AppState>) -> Json<ResumeDocument> {
    Json(state.session.store().snapshot())
}

/// PUT /api/v1/resume
/// Replaces the whole document, as the initializer does on load.
pub async fn handle_replace_resume(
    State(state): State<AppState>,
    Json(document): Json<ResumeDocument>,
) -> Json<ResumeDocument> {
    let store = state.session.store();
    store.replace(document);
    Json(store.snapshot())
}

/// PATCH /api/v1/resume
/// Applies one field-level update and returns the resulting document.
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Json(update): Json<DocumentUpdate>,
) -> Result<Json<ResumeDocument>, AppError> {
    let store = state.session.store();
    store.apply(update)?;
    Ok(Json(store.snapshot()))
}

/// GET /api/v1/resume/sections
/// Which sections the current document would render.
pub async fn handle_section_presence(
    State(state): State<AppState>,
) -> Json<SectionPresenceResponse> {
    let present = filter_document(&state.session.store().snapshot()).kinds();
    let absent = SectionKind::ALL
        .into_iter()
        .filter(|kind| !present.contains(kind))
        .collect();
    Json(SectionPresenceResponse { present, absent })
}
