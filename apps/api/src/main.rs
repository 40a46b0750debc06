mod config;
mod document;
mod errors;
mod export;
mod layout;
mod models;
mod render;
mod routes;
mod session;
mod state;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::pdf::ExportPipeline;
use crate::export::sink::DirectorySink;
use crate::layout::PageConfig;
use crate::models::resume::ResumeDocument;
use crate::routes::build_router;
use crate::session::EditingSession;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on invalid values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Studio v{}", env!("CARGO_PKG_VERSION"));

    let initial = match &config.initial_resume {
        Some(path) => load_resume(path).await?,
        None => ResumeDocument::default(),
    };

    // Export to US Letter with 1" margins
    let page = PageConfig::us_letter();
    info!(
        "Export page: {}x{}pt, {}pt margins",
        page.width_pt, page.height_pt, page.margin_pt
    );

    let sink = Arc::new(DirectorySink::new(config.export_dir.clone()));
    info!("Saved resumes go to {}", sink.root().display());

    let session = EditingSession::start(
        initial,
        config.default_template,
        ExportPipeline::new(page),
        sink,
    );
    info!("Editing session {} ready", session.id());

    // Build app state
    let state = AppState {
        session: Arc::new(session),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Reads the initial document from a JSON file.
async fn load_resume(path: &Path) -> Result<ResumeDocument> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("cannot read INITIAL_RESUME at {}", path.display()))?;
    let document: ResumeDocument = serde_json::from_slice(&raw)
        .with_context(|| format!("INITIAL_RESUME at {} is not a valid resume", path.display()))?;
    info!(
        "Loaded initial resume from {} ({} work, {} education, {} projects)",
        path.display(),
        document.work_experiences.len(),
        document.education.len(),
        document.projects.len()
    );
    Ok(document)
}
