//! Budgeted aggregation of a page and its secondary resources.
//!
//! The primary document is fetched first and seeds the budget. Stylesheets
//! are then offered to the budget in document order, followed by scripts in
//! document order. Fetches within a phase run with bounded parallelism, but
//! results are consumed in input order, so admission sees exactly the
//! sequence a one-at-a-time loop would. A resource that does not fit ends
//! its phase; a resource that fails to fetch is skipped.

use crate::acquisition::http_client::{Fetcher, HttpClient};
use crate::acquisition::references::{extract_references, ScriptRef, StylesheetRef};
use crate::config::HarvestConfig;
use crate::error::{FetchError, HarvestError, HarvestResult};
use crate::harvest::bundle::{Admission, AggregationState, ResourceKind, ResultBundle};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// How a stylesheet or script phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEnd {
    /// Every reference was considered.
    Completed,
    /// A resource would have pushed the total over the cap.
    BudgetExhausted,
    /// The harvest deadline passed before the phase finished.
    DeadlineReached,
}

/// A reference waiting to be offered to the budget.
enum Pending {
    Fetch(String),
    Inline(String),
}

impl Pending {
    fn from_stylesheet(r: &StylesheetRef) -> Self {
        Self::Fetch(r.url.clone())
    }

    fn from_script(r: &ScriptRef) -> Self {
        match &r.source_url {
            Some(url) => Self::Fetch(url.clone()),
            None => Self::Inline(r.inline_body.clone().unwrap_or_default()),
        }
    }
}

/// Only `http://` and `https://` URLs that parse as absolute are harvested.
pub fn validate_url(url: &str) -> HarvestResult<()> {
    let has_scheme = url.starts_with("http://") || url.starts_with("https://");
    if has_scheme && url::Url::parse(url).is_ok() {
        Ok(())
    } else {
        Err(HarvestError::InvalidInput(url.to_string()))
    }
}

/// Harvests pages through a [`Fetcher`]. Cheap to share behind an `Arc`.
pub struct Aggregator {
    fetcher: Arc<dyn Fetcher>,
    config: HarvestConfig,
}

impl Aggregator {
    pub fn new(fetcher: Arc<dyn Fetcher>, config: HarvestConfig) -> Self {
        Self {
            fetcher,
            config: config.normalized(),
        }
    }

    /// Aggregator backed by a real HTTP client built from `config`.
    pub fn with_http(config: HarvestConfig) -> anyhow::Result<Self> {
        let client = HttpClient::from_config(&config)?;
        Ok(Self::new(Arc::new(client), config))
    }

    /// Fetch `url` and as many of its stylesheets and scripts as fit under the cap.
    ///
    /// Fails only on an invalid URL or when the primary document cannot be fetched.
    pub async fn aggregate(&self, url: &str) -> HarvestResult<ResultBundle> {
        validate_url(url)?;
        let cap = self.config.max_total_size;
        info!("harvesting {url} (cap {cap})");

        let primary = self.fetcher.fetch(url).await.map_err(|e| {
            warn!("primary fetch failed: {e}");
            HarvestError::PrimaryFetch(e)
        })?;

        // References come from the full document; only the returned HTML is capped.
        let refs = extract_references(&primary.content, url);
        debug!(
            "{} stylesheet(s), {} script(s) referenced",
            refs.stylesheets.len(),
            refs.scripts.len()
        );

        let mut state = AggregationState::new(primary.content, cap);
        if state.html_truncated() {
            info!("primary document of {} chars truncated to {cap}", primary.size);
        }

        let deadline = Instant::now() + Duration::from_millis(self.config.deadline_ms);

        let css_end = self
            .run_phase(
                ResourceKind::Stylesheet,
                refs.stylesheets.iter().map(Pending::from_stylesheet).collect(),
                &mut state,
                deadline,
            )
            .await;

        let js_end = if css_end == PhaseEnd::DeadlineReached {
            PhaseEnd::DeadlineReached
        } else {
            self.run_phase(
                ResourceKind::Script,
                refs.scripts.iter().map(Pending::from_script).collect(),
                &mut state,
                deadline,
            )
            .await
        };

        info!(
            "harvested {url}: {} css, {} js, {}/{cap} chars (css {css_end:?}, js {js_end:?})",
            state.css_count(),
            state.js_count(),
            state.total(),
        );

        Ok(state.into_bundle(url))
    }

    /// Offer each pending reference to the budget, in order, until one does not fit.
    async fn run_phase(
        &self,
        kind: ResourceKind,
        pending: Vec<Pending>,
        state: &mut AggregationState,
        deadline: Instant,
    ) -> PhaseEnd {
        let fetcher = Arc::clone(&self.fetcher);
        let mut results = stream::iter(pending)
            .map(move |p| {
                let fetcher = Arc::clone(&fetcher);
                async move {
                    match p {
                        Pending::Fetch(url) => {
                            let content = fetcher.fetch(&url).await.map(|raw| raw.content);
                            (Some(url), content)
                        }
                        Pending::Inline(body) => (None, Ok::<_, FetchError>(body)),
                    }
                }
            })
            .buffered(self.config.concurrency);

        // Returning drops `results`, which cancels any fetch still in flight.
        loop {
            let (source, content) = match tokio::time::timeout_at(deadline, results.next()).await
            {
                Ok(Some(item)) => item,
                Ok(None) => return PhaseEnd::Completed,
                Err(_) => {
                    warn!("deadline reached during {kind:?} phase; returning partial bundle");
                    return PhaseEnd::DeadlineReached;
                }
            };

            let content = match content {
                Ok(c) => c,
                Err(e) => {
                    warn!("skipping {kind:?}: {e}");
                    continue;
                }
            };

            let label = source.clone().unwrap_or_else(|| "inline".to_string());
            match state.try_admit(kind, source, content) {
                Admission::Admitted => debug!("admitted {label} (total {})", state.total()),
                Admission::OverBudget => {
                    debug!("{label} exceeds remaining budget; ending {kind:?} phase");
                    return PhaseEnd::BudgetExhausted;
                }
            }
        }
    }
}
