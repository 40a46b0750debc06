pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::document::handlers as document;
use crate::export::handlers as export;
use crate::render::handlers as render;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Document
        .route(
            "/api/v1/resume",
            get(document::handle_get_resume)
                .put(document::handle_replace_resume)
                .patch(document::handle_update_resume),
        )
        .route(
            "/api/v1/resume/sections",
            get(document::handle_section_presence),
        )
        // Templates and preview
        .route("/api/v1/templates", get(render::handle_list_templates))
        .route(
            "/api/v1/template",
            get(render::handle_get_template).put(render::handle_select_template),
        )
        .route(
            "/api/v1/surface",
            put(render::handle_measure_surface).delete(render::handle_unmount_surface),
        )
        .route("/api/v1/preview", get(render::handle_preview))
        // Export
        .route("/api/v1/resume/save", post(export::handle_save))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::export::pdf::ExportPipeline;
    use crate::export::sink::DirectorySink;
    use crate::models::template::TemplateId;
    use crate::session::EditingSession;
    use crate::test_support::full_document;

    fn app(export_dir: PathBuf) -> Router {
        let config = Config {
            port: 0,
            rust_log: "info".into(),
            export_dir: export_dir.clone(),
            default_template: TemplateId::Single,
            initial_resume: None,
        };
        let session = EditingSession::start(
            full_document(),
            config.default_template,
            ExportPipeline::default(),
            Arc::new(DirectorySink::new(export_dir)),
        );
        build_router(AppState {
            session: Arc::new(session),
            config,
        })
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn json_of(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = send(&app(dir.path().into()), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body)["status"], "ok");
    }

    #[tokio::test]
    async fn test_patch_updates_document() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path().into());
        let (status, body) = send(
            &app,
            Method::PATCH,
            "/api/v1/resume",
            Some(json!({"target": "personal", "field": "lastname", "value": "Roe"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body)["personalInfo"]["lastname"], "Roe");

        let (_, body) = send(&app, Method::GET, "/api/v1/resume", None).await;
        assert_eq!(json_of(&body)["personalInfo"]["lastname"], "Roe");
    }

    #[tokio::test]
    async fn test_bad_index_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = send(
            &app(dir.path().into()),
            Method::PATCH,
            "/api/v1/resume",
            Some(json!({"target": "projects", "edit": {"op": "remove", "index": 9}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_of(&body)["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_section_presence_report() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path().into());
        send(
            &app,
            Method::PATCH,
            "/api/v1/resume",
            Some(json!({"target": "block", "section": "awards", "description": "<p></p>"})),
        )
        .await;
        let (status, body) = send(&app, Method::GET, "/api/v1/resume/sections", None).await;
        assert_eq!(status, StatusCode::OK);
        let report = json_of(&body);
        assert_eq!(report["absent"], json!(["awards"]));
        assert_eq!(report["present"].as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_template_selection() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path().into());
        let (_, body) = send(&app, Method::GET, "/api/v1/templates", None).await;
        let listing = json_of(&body);
        assert_eq!(listing["templates"].as_array().unwrap().len(), 4);
        assert_eq!(listing["default"], "single");

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/v1/template",
            Some(json!({"template": "singleColored"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = send(&app, Method::GET, "/api/v1/template", None).await;
        assert_eq!(json_of(&body)["template"], "singleColored");
    }

    #[tokio::test]
    async fn test_preview_and_save_need_a_surface() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path().into());

        let (status, body) = send(&app, Method::GET, "/api/v1/preview", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json_of(&body)["error"]["code"], "SURFACE_NOT_MOUNTED");

        let (status, body) = send(&app, Method::POST, "/api/v1/resume/save", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json_of(&body)["error"]["code"], "SURFACE_NOT_MOUNTED");
        assert!(std::fs::read_dir(dir.path()).map_or(true, |mut d| d.next().is_none()));

        let (status, body) = send(&app, Method::PUT, "/api/v1/surface", Some(json!({"width": 0}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body)["scale"], Value::Null);
        let (status, body) = send(&app, Method::GET, "/api/v1/preview", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json_of(&body)["error"]["code"], "SURFACE_NOT_MEASURED");
    }

    #[tokio::test]
    async fn test_measured_surface_previews_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path().into());

        let (status, body) = send(&app, Method::PUT, "/api/v1/surface", Some(json!({"width": 397}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body)["scale"], 0.5);

        let (status, body) = send(&app, Method::GET, "/api/v1/preview", None).await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("width:397.00px"));
        assert!(html.contains("Jane"));

        let (status, _) = send(&app, Method::POST, "/api/v1/resume/save", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let pdfs = std::fs::read_dir(dir.path())
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .is_ok_and(|e| e.path().extension().is_some_and(|ext| ext == "pdf"))
            })
            .count();
        assert_eq!(pdfs, 1);

        let (status, _) = send(&app, Method::DELETE, "/api/v1/surface", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::POST, "/api/v1/resume/save", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
}
