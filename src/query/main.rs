//! Reverse-geocoding query server.
//!
//! Resolves a coordinate to the administrative region containing it
//! (falling back to the nearest region) against the Elasticsearch store.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ginkgo::elasticsearch::{EsClient, EsStore};
use ginkgo::models::{GeoPoint, RegionRecord};
use ginkgo::resolve::resolve;
use ginkgo::store::StoreError;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Reverse geocoding query server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// Elasticsearch URL
    #[arg(long, default_value = "http://localhost:9200")]
    es_url: String,

    /// Elasticsearch index name
    #[arg(long, default_value = "regions")]
    index: String,
}

/// Application state shared across handlers
struct AppState {
    es_client: EsClient,
    store: EsStore,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Ginkgo Query Server");
    info!("Connecting to Elasticsearch at {}", args.es_url);

    let es_client = EsClient::new(&args.es_url, &args.index).await?;

    if !es_client.health_check().await? {
        anyhow::bail!("Elasticsearch cluster is not healthy");
    }

    let doc_count = es_client.doc_count().await?;
    info!(
        "Connected to index '{}' with {} regions",
        args.index, doc_count
    );

    let state = Arc::new(AppState {
        store: EsStore::new(es_client.clone()),
        es_client,
    });

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/resolve", get(resolve_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, StatusCode> {
    let healthy = state.es_client.health_check().await.unwrap_or(false);
    let regions = state.es_client.doc_count().await.unwrap_or(0);

    Ok(Json(HealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        elasticsearch: healthy,
        regions,
    }))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    elasticsearch: bool,
    regions: u64,
}

/// Resolve a coordinate to its administrative region.
///
/// Out-of-coverage points are a normal outcome (`found: false`, HTTP 200);
/// only store failures map to error status codes.
async fn resolve_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveQueryParams>,
) -> Result<Json<ResolveResponse>, (StatusCode, String)> {
    let point = GeoPoint::new(params.point_lat, params.point_lon);

    let region = resolve(&state.store, point).await.map_err(|e| {
        tracing::error!("Resolution failed: {}", e);
        let status = match e {
            StoreError::Unavailable(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, e.to_string())
    })?;

    Ok(Json(ResolveResponse {
        found: region.is_some(),
        region,
    }))
}

#[derive(Deserialize)]
struct ResolveQueryParams {
    /// Point latitude
    #[serde(rename = "point.lat")]
    point_lat: f64,
    /// Point longitude
    #[serde(rename = "point.lon")]
    point_lon: f64,
}

#[derive(Serialize)]
struct ResolveResponse {
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<RegionRecord>,
}
