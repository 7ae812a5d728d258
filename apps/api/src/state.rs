use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres in production, in-memory when no database is configured.
    pub store: Arc<dyn RecordStore>,
    pub generator: Arc<dyn TextGenerator>,
    pub config: Config,
}
