use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_api::config::Config;
use resume_api::db::create_pool;
use resume_api::llm_client::{self, LlmClient};
use resume_api::routes::build_router;
use resume_api::state::AppState;
use resume_api::store::{MemoryStore, PgRecordStore, RecordStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
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

    info!("Starting resume API v{}", env!("CARGO_PKG_VERSION"));

    // Record store: Postgres when configured, otherwise in-memory
    let store: Arc<dyn RecordStore> = match &config.database_url {
        Some(url) => Arc::new(PgRecordStore::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL is not set; resumes are kept in memory and lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState {
        store,
        generator: Arc::new(llm),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
