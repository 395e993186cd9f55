//! Feedback REST API Server
//!
//! Serves the feedback form and admin dashboard endpoints.
//!
//! ## Usage
//!
//! ```bash
//! # In-memory store
//! GEMINI_API_KEY=... cargo run --bin feedback_server
//!
//! # Postgres store
//! DATABASE_URL=postgresql://localhost/feedback cargo run --bin feedback_server --features database
//!
//! curl -X POST http://localhost:3001/api/feedback/submit \
//!   -H "Content-Type: application/json" \
//!   -d '{"rating": 4, "review": "Great coffee, slow service"}'
//!
//! curl http://localhost:3001/api/feedback/admin/submissions?rating=4
//! curl http://localhost:3001/api/feedback/admin/stats
//! curl -X POST http://localhost:3001/api/admin/chat \
//!   -H "Content-Type: application/json" \
//!   -d '{"message": "What do customers complain about most?"}'
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use feedback_enrich::ai::gemini::GeminiClient;
use feedback_enrich::ai::{DisabledClient, GenerationClient, LlmClient};
use feedback_enrich::api::{create_router, AppState};
use feedback_enrich::config::AppConfig;
use feedback_enrich::database::{FeedbackStore, InMemoryFeedbackStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("feedback_enrich=info,tower_http=debug")),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let provider: Arc<dyn LlmClient> = if config.ai.has_api_key() {
        Arc::new(GeminiClient::new(config.ai.clone())?)
    } else {
        warn!("GEMINI_API_KEY not set, every generated field will use its fallback text");
        Arc::new(DisabledClient)
    };
    let client = GenerationClient::new(provider).with_timeout(config.ai.timeout());
    info!(
        provider = client.provider_name(),
        model = client.model_name(),
        timeout_secs = config.ai.timeout_seconds,
        "generation client ready"
    );

    let store = connect_store(&config).await?;
    info!(backend = store.backend_name(), "feedback store ready");

    let state = AppState::new(client, store, config.insight_context_limit);
    let app = create_router(state, &config.cors_origin)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(feature = "database")]
async fn connect_store(config: &AppConfig) -> anyhow::Result<Arc<dyn FeedbackStore>> {
    use feedback_enrich::database::PgFeedbackStore;
    use sqlx::postgres::PgPoolOptions;

    let Some(url) = config.database_url.as_deref() else {
        return Ok(Arc::new(InMemoryFeedbackStore::new()));
    };

    info!("Connecting to database");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(url)
        .await
        .context("failed to connect to DATABASE_URL")?;

    let store = PgFeedbackStore::new(pool);
    store.ensure_schema().await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "database"))]
async fn connect_store(config: &AppConfig) -> anyhow::Result<Arc<dyn FeedbackStore>> {
    if config.database_url.is_some() {
        warn!("DATABASE_URL is set but the `database` feature is off, using the in-memory store");
    }
    Ok(Arc::new(InMemoryFeedbackStore::new()))
}
