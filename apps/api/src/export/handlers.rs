use axum::{extract::State, http::StatusCode};

use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/v1/resume/save
/// Exports the current document with the selected template and hands it to the sink.
pub async fn handle_save(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.session.saver().save().await?;
    Ok(StatusCode::NO_CONTENT)
}
