// Copyright 2026 Cortex Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use page_harvest::cli::{self, ConfigArgs};
use page_harvest::config::HarvestConfig;

#[derive(Parser)]
#[command(
    name = "harvest",
    about = "Fetch a web page with its stylesheets and scripts as one size-capped bundle",
    version
)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve GET /scrape?url=... over HTTP
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to bind
        #[arg(long, default_value = "8000")]
        port: u16,
    },
    /// Harvest a single URL and print the bundle as JSON
    Fetch {
        /// Page URL (http:// or https://)
        url: String,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json);

    let config = cli.config.apply(HarvestConfig::from_env());

    match cli.command {
        Commands::Serve { host, port } => cli::serve::run(&host, port, config).await,
        Commands::Fetch { url, pretty } => cli::fetch_cmd::run(&url, pretty, config).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "harvest", &mut std::io::stdout());
            Ok(())
        }
    }
}
