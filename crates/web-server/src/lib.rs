use analytics::AnalyticsEngine;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use core_types::RecordBook;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// Request bodies are record lists; 5MB is far beyond any realistic dashboard.
const BODY_LIMIT_BYTES: usize = 5 * 1024 * 1024;

/// The shared application state that all handlers can access.
#[derive(Debug)]
pub struct AppState {
    pub engine: AnalyticsEngine,
    /// The dashboard's working set of records. Handlers copy a snapshot out
    /// before running the engine.
    pub book: RwLock<RecordBook>,
    pub default_horizon: i64,
}

impl AppState {
    pub fn new(default_horizon: i64) -> Self {
        Self {
            engine: AnalyticsEngine::new(),
            book: RwLock::new(RecordBook::new()),
            default_horizon,
        }
    }
}

/// Builds the API router around the given state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/summary", post(handlers::summarize))
        .route("/api/forecast", post(handlers::forecast))
        .route("/api/insights", post(handlers::insights))
        .route(
            "/api/records",
            get(handlers::list_records)
                .post(handlers::add_record)
                .delete(handlers::clear_records),
        )
        .route("/api/records/last", delete(handlers::remove_last_record))
        .route("/api/analysis", get(handlers::get_analysis))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
}

/// Binds `addr` (`host:port`, host names allowed) and serves the API until Ctrl-C.
pub async fn run_server(addr: &str, default_horizon: i64) -> anyhow::Result<()> {
    // Tracing is initialised by the calling binary.
    let app = router(Arc::new(AppState::new(default_horizon)));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(addr = %local_addr, default_horizon, "Web server listening.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal.");
    }
}
