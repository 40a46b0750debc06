use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::document::store::StoreError;
use crate::export::save::SaveError;
use crate::layout::scaler::SurfaceError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Preview surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Save error: {0}")]
    Save(#[from] SaveError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Validation(e.to_string())
    }
}

fn surface_status(e: &SurfaceError) -> (StatusCode, &'static str, String) {
    let code = match e {
        SurfaceError::NotMounted => "SURFACE_NOT_MOUNTED",
        SurfaceError::NotMeasured => "SURFACE_NOT_MEASURED",
    };
    (StatusCode::CONFLICT, code, e.to_string())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Surface(e) => surface_status(e),
            AppError::Save(SaveError::Mount(e)) => surface_status(e),
            AppError::Save(SaveError::Export(e)) => {
                tracing::error!("Export error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_FAILED",
                    "The resume could not be exported".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
