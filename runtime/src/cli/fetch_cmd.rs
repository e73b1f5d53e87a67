//! `harvest fetch <url>` — harvest one page and print the bundle.

use crate::config::HarvestConfig;
use crate::harvest::Aggregator;
use anyhow::Result;

/// Run one harvest and write the bundle JSON to stdout.
pub async fn run(url: &str, pretty: bool, config: HarvestConfig) -> Result<()> {
    let aggregator = Aggregator::with_http(config)?;
    let bundle = aggregator.aggregate(url).await?;

    let json = if pretty {
        serde_json::to_string_pretty(&bundle)?
    } else {
        serde_json::to_string(&bundle)?
    };
    println!("{json}");
    Ok(())
}
