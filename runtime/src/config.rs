//! Process-wide harvest settings.
//!
//! Built once at startup from defaults, `HARVEST_*` environment variables,
//! and CLI flags (in that order of precedence), then shared read-only.

use std::str::FromStr;
use tracing::warn;

/// Cap on the combined size of HTML + CSS + JS in one bundle.
pub const DEFAULT_MAX_TOTAL_SIZE: usize = 150_000;

/// Per-fetch timeout.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

/// Upper bound on one whole harvest once the primary document is in.
pub const DEFAULT_DEADLINE_MS: u64 = 60_000;

/// Secondary fetches kept in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Browser-like identity; some origins reject empty or library user agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                                      AppleWebKit/537.36 (KHTML, like Gecko) \
                                      Chrome/131.0.0.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestConfig {
    /// Size cap in characters of decoded text.
    pub max_total_size: usize,
    pub fetch_timeout_ms: u64,
    pub user_agent: String,
    pub concurrency: usize,
    pub deadline_ms: u64,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            max_total_size: DEFAULT_MAX_TOTAL_SIZE,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            deadline_ms: DEFAULT_DEADLINE_MS,
        }
    }
}

impl HarvestConfig {
    /// Defaults overlaid with whatever `HARVEST_*` variables are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but with an injectable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(v) = parse_var(&lookup, "HARVEST_MAX_TOTAL_SIZE") {
            cfg.max_total_size = v;
        }
        if let Some(v) = parse_var(&lookup, "HARVEST_FETCH_TIMEOUT_MS") {
            cfg.fetch_timeout_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "HARVEST_CONCURRENCY") {
            cfg.concurrency = v;
        }
        if let Some(v) = parse_var(&lookup, "HARVEST_DEADLINE_MS") {
            cfg.deadline_ms = v;
        }
        if let Some(ua) = lookup("HARVEST_USER_AGENT") {
            let ua = ua.trim();
            if !ua.is_empty() {
                cfg.user_agent = ua.to_string();
            }
        }
        cfg.normalized()
    }

    /// Clamp values that would make a harvest unable to progress.
    pub fn normalized(mut self) -> Self {
        self.concurrency = self.concurrency.max(1);
        self
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring {key}={raw:?}: not a valid number");
            None
        }
    }
}
