//! `harvest serve` — run the REST API.

use crate::config::HarvestConfig;
use crate::harvest::Aggregator;
use crate::rest;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Bind `host:port` and serve `/scrape` with the given settings.
pub async fn run(host: &str, port: u16, config: HarvestConfig) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;

    info!(
        "starting harvest v{} (cap {}, timeout {}ms, concurrency {})",
        env!("CARGO_PKG_VERSION"),
        config.max_total_size,
        config.fetch_timeout_ms,
        config.concurrency
    );

    let aggregator = Arc::new(Aggregator::with_http(config)?);
    rest::start(addr, aggregator).await
}
