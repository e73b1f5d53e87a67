// Copyright 2026 Cortex Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for fetching and harvesting.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

/// Failure of a single outbound GET.
///
/// Every variant collapses into the same signal for callers: the primary
/// document turns it into [`HarvestError::PrimaryFetch`], secondary resources
/// are simply skipped.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("{status} status for url {url}")]
    Status { url: String, status: u16 },

    #[error("timed out fetching {url}")]
    Timeout { url: String },

    #[error("connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
}

impl FetchError {
    /// Classify a transport error from reqwest.
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            Self::Timeout { url }
        } else if err.is_connect() {
            Self::Connect {
                url,
                message: err.to_string(),
            }
        } else {
            Self::Request {
                url,
                message: err.to_string(),
            }
        }
    }
}

/// Errors that escape a harvest request.
///
/// Secondary fetch failures and budget exhaustion never show up here; they
/// only shrink the bundle.
#[derive(thiserror::Error, Debug)]
pub enum HarvestError {
    #[error("Invalid URL. Use http:// or https://")]
    InvalidInput(String),

    #[error("Error fetching URL: {0}")]
    PrimaryFetch(#[from] FetchError),
}

impl HarvestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::PrimaryFetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HarvestError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(serde_json::json!({ "detail": self.to_string() })),
        )
            .into_response()
    }
}

pub type HarvestResult<T> = Result<T, HarvestError>;
