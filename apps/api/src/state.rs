use std::sync::Arc;

use crate::config::Config;
use crate::session::EditingSession;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single editing session this process serves.
    pub session: Arc<EditingSession>,
    pub config: Config,
}
