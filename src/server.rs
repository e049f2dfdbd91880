//! Web server for the map.
//!
//! Serves the rendered Leaflet page using Axum. Every page load performs one
//! feed fetch on a blocking worker, then composes and renders synchronously.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};

use crate::client::FeedSource;
use crate::depth::DepthScale;
use crate::errors::QuakemapError;
use crate::map::MapInstance;
use crate::output;
use crate::pipeline;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub source: FeedSource,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Feed fetched on every page load
    source: FeedSource,
}

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/map.json", get(map_json_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Start the web server.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState {
        source: config.source.clone(),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("🌍 quakemap serving {} at http://{}", config.source, addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// A fetch that did not produce a map.
struct FetchFailure(String);

impl IntoResponse for FetchFailure {
    fn into_response(self) -> Response {
        (StatusCode::BAD_GATEWAY, self.0).into_response()
    }
}

impl From<QuakemapError> for FetchFailure {
    fn from(e: QuakemapError) -> Self {
        tracing::warn!("feed fetch failed: {}", e);
        Self("earthquake feed unavailable".to_string())
    }
}

/// Fetch on a blocking worker, then compose.
async fn load_map(source: FeedSource) -> Result<MapInstance, FetchFailure> {
    let features = tokio::task::spawn_blocking(move || pipeline::fetch_features(&source))
        .await
        .map_err(|e| {
            tracing::error!("fetch task failed: {}", e);
            FetchFailure("fetch task failed".to_string())
        })??;

    Ok(pipeline::compose(&features, &DepthScale::USGS))
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Main page handler - serves the rendered map.
async fn index_handler(State(state): State<AppState>) -> Result<Html<String>, FetchFailure> {
    let map = load_map(state.source).await?;
    output::render_page(&map).map(Html).map_err(|e| {
        tracing::error!("failed to render page: {}", e);
        FetchFailure("failed to render map".to_string())
    })
}

/// Map description handler - the composed map as JSON.
async fn map_json_handler(
    State(state): State<AppState>,
) -> Result<Json<MapInstance>, FetchFailure> {
    load_map(state.source).await.map(Json)
}

/// Health check endpoint.
async fn health_handler() -> &'static str {
    "OK"
}
