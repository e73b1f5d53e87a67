//! CLI subcommand implementations for the `harvest` binary.

pub mod fetch_cmd;
pub mod serve;

use crate::config::HarvestConfig;
use clap::Args;

/// Flags overriding `HARVEST_*` environment settings.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// Cap on combined HTML + CSS + JS size, in characters
    #[arg(long, global = true)]
    pub max_total_size: Option<usize>,

    /// Per-request timeout in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// User-Agent header sent on every request
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// Stylesheets/scripts fetched in parallel
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// Deadline for secondary fetches of one harvest, in milliseconds
    #[arg(long, global = true)]
    pub deadline_ms: Option<u64>,
}

impl ConfigArgs {
    /// Layer these flags over `base`.
    pub fn apply(self, mut base: HarvestConfig) -> HarvestConfig {
        if let Some(v) = self.max_total_size {
            base.max_total_size = v;
        }
        if let Some(v) = self.timeout_ms {
            base.fetch_timeout_ms = v;
        }
        if let Some(v) = self.user_agent {
            base.user_agent = v;
        }
        if let Some(v) = self.concurrency {
            base.concurrency = v;
        }
        if let Some(v) = self.deadline_ms {
            base.deadline_ms = v;
        }
        base.normalized()
    }
}
