// Copyright 2026 Cortex Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP REST API.
//!
//! `GET /scrape?url=...` runs one harvest and returns the bundle as JSON.
//! Each request owns its aggregation state; the only shared value is the
//! read-only [`Aggregator`].

use crate::error::HarvestError;
use crate::harvest::{validate_url, Aggregator, ResultBundle};
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Build the axum Router with all REST endpoints.
pub fn router(aggregator: Arc<Aggregator>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/scrape", get(scrape))
        .layer(cors)
        .with_state(aggregator)
}

/// Serve the REST API on `addr` until the process is stopped.
pub async fn start(addr: std::net::SocketAddr, aggregator: Arc<Aggregator>) -> anyhow::Result<()> {
    let app = router(aggregator);
    tracing::info!("REST API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(serde::Deserialize, Default)]
struct ScrapeParams {
    url: Option<String>,
}

/// Missing and malformed `url` both short-circuit before any fetch.
async fn scrape(
    Query(params): Query<ScrapeParams>,
    State(aggregator): State<Arc<Aggregator>>,
) -> Result<Json<ResultBundle>, HarvestError> {
    let url = params.url.unwrap_or_default();
    if let Err(e) = validate_url(&url) {
        tracing::debug!("rejecting scrape of {url:?}");
        return Err(e);
    }

    let bundle = aggregator.aggregate(&url).await?;
    Ok(Json(bundle))
}
