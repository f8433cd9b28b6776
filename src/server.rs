//! HTTP API server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/ingest` | Normalize and store a PDF or text payload |
//! | `GET`  | `/api/data` | List all records, newest first |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! All error responses carry a single string:
//!
//! ```json
//! { "error": "Missing source or data" }
//! ```
//!
//! Client errors (missing fields, malformed body or data URL) are `400`;
//! fetch, persistence, and query failures are `500`. The ingest body is
//! read as JSON whatever its `Content-Type`, with no size limit.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so a browser upload
//! page served from another origin can call the API.

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use docdrop_core::models::IngestedRecord;
use docdrop_core::store::RecordStore;

use crate::config::Config;
use crate::error::IngestError;
use crate::fetch::{HttpFetcher, RemoteFetcher};
use crate::ingest::{ingest, IngestRequest};
use crate::list::list_records;
use crate::sqlite_store::SqliteStore;

/// Shared application state passed to all route handlers.
///
/// The store and fetcher are constructed once at startup and injected
/// here; handlers hold no other state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub fetcher: Arc<dyn RemoteFetcher>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, fetcher: Arc<dyn RemoteFetcher>) -> Self {
        Self { store, fetcher }
    }
}

/// Builds the router with all endpoints, CORS, and request tracing.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/ingest", post(handle_ingest))
        .route("/api/data", get(handle_list))
        .route("/health", get(handle_health))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the HTTP server on `[server].bind` with a SQLite store.
///
/// Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let store = SqliteStore::open(config).await?;
    let state = AppState::new(Arc::new(store), Arc::new(HttpFetcher::new()));

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!("docdrop listening on http://{}", config.server.bind);

    axum::serve(listener, app).await?;
    Ok(())
}

// ============ POST /api/ingest ============

/// JSON response body for a successful ingestion.
#[derive(Serialize)]
struct IngestResponse {
    success: bool,
    message: String,
    id: String,
}

async fn handle_ingest(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<IngestResponse>, IngestError> {
    // Parsed regardless of Content-Type.
    let request: IngestRequest =
        serde_json::from_slice(&body).map_err(|e| IngestError::InvalidBody(e.to_string()))?;

    let outcome = ingest(state.store.as_ref(), state.fetcher.as_ref(), request).await?;

    Ok(Json(IngestResponse {
        success: true,
        message: outcome.message,
        id: outcome.id,
    }))
}

// ============ GET /api/data ============

/// JSON response body for `GET /api/data`.
#[derive(Serialize)]
struct ListResponse {
    data: Vec<IngestedRecord>,
}

async fn handle_list(State(state): State<AppState>) -> Result<Json<ListResponse>, IngestError> {
    let data = list_records(state.store.as_ref()).await?;
    Ok(Json(ListResponse { data }))
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
