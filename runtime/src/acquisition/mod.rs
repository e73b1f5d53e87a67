//! HTTP acquisition: single bounded GETs and reference discovery in raw HTML.

pub mod http_client;
pub mod references;
