use axum::{extract::State, http::StatusCode, response::Html, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::layout::scaler::{Scale, SurfaceError};
use crate::models::template::TemplateId;
use crate::render::html::to_html;
use crate::render::{registered_templates, TemplateInfo};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateSelection {
    pub template: TemplateId,
}

#[derive(Deserialize)]
pub struct SurfaceMeasurement {
    pub width: f32,
}

#[derive(Debug, Serialize)]
pub struct SurfaceResponse {
    pub mounted: bool,
    /// `None` until a usable width has been reported.
    pub width: Option<f32>,
    /// Height the page container needs at this width.
    pub page_height: Option<f32>,
    pub scale: Option<Scale>,
}

#[derive(Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<TemplateInfo>,
    /// Selected when a session starts.
    pub default: TemplateId,
}

/// GET /api/v1/templates
pub async fn handle_list_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    Json(TemplateListResponse {
        templates: registered_templates(),
        default: state.config.default_template,
    })
}

/// GET /api/v1/template
pub async fn handle_get_template(State(state): State<AppState>) -> Json<TemplateSelection> {
    Json(TemplateSelection {
        template: state.session.template(),
    })
}

/// PUT /api/v1/template
pub async fn handle_select_template(
    State(state): State<AppState>,
    Json(selection): Json<TemplateSelection>,
) -> Json<TemplateSelection> {
    state.session.select_template(selection.template);
    Json(selection)
}

/// PUT /api/v1/surface
/// Mounts the preview surface on first call and reports its measured width.
/// A width of zero mounts without measuring.
pub async fn handle_measure_surface(
    State(state): State<AppState>,
    Json(measurement): Json<SurfaceMeasurement>,
) -> Result<Json<SurfaceResponse>, AppError> {
    match state.session.preview().mount_or_resize(measurement.width) {
        Ok(scale) => Ok(Json(SurfaceResponse {
            mounted: true,
            width: Some(scale.width()),
            page_height: Some(scale.page_height()),
            scale: Some(scale),
        })),
        Err(SurfaceError::NotMeasured) => Ok(Json(SurfaceResponse {
            mounted: true,
            width: None,
            page_height: None,
            scale: None,
        })),
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/v1/surface
pub async fn handle_unmount_surface(State(state): State<AppState>) -> StatusCode {
    state.session.preview().unmount();
    StatusCode::NO_CONTENT
}

/// GET /api/v1/preview
/// The current document in the selected template, sized to the surface.
pub async fn handle_preview(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let layout = state.session.render_preview()?;
    Ok(Html(to_html(&layout)))
}
