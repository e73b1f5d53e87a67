// Copyright 2026 Cortex Contributors
// SPDX-License-Identifier: Apache-2.0

//! page-harvest — fetch a web page with its stylesheets and scripts as one
//! size-capped bundle.
//!
//! [`harvest::Aggregator`] is the entry point; [`rest::router`] exposes it
//! over HTTP.

pub mod acquisition;
pub mod cli;
pub mod config;
pub mod error;
pub mod harvest;
pub mod rest;

pub use config::HarvestConfig;
pub use error::{FetchError, HarvestError};
pub use harvest::{Aggregator, ResultBundle};
