//! Shopscope main entry point
//!
//! Command-line interface for the storefront brand-profile extractor:
//! takes one or more storefront URLs and prints the extracted records
//! as JSON.

use anyhow::Context;
use clap::Parser;
use shopscope::config::{load_config, Config};
use shopscope::{extract_brand, extract_many, ShopscopeError};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shopscope: a storefront brand-profile extractor
///
/// Fetches a storefront's public pages and product feed and assembles a
/// normalized brand profile: identity, catalog, policies, FAQs,
/// contacts, social handles, and key navigation links.
#[derive(Parser, Debug)]
#[command(name = "shopscope")]
#[command(version)]
#[command(about = "Extract a normalized brand profile from a storefront", long_about = None)]
struct Cli {
    /// Storefront root URL(s) to profile
    #[arg(value_name = "URL", required = true)]
    urls: Vec<String>,

    /// Path to TOML configuration file (all knobs have defaults)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::default(),
    };

    if cli.urls.len() == 1 {
        run_single(&cli.urls[0], &config, cli.pretty).await
    } else {
        run_batch(&cli.urls, &config, cli.pretty).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shopscope=info,warn"),
            1 => EnvFilter::new("shopscope=debug,info"),
            2 => EnvFilter::new("shopscope=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

async fn run_single(url: &str, config: &Config, pretty: bool) -> anyhow::Result<()> {
    let record = extract_brand(url, config).await?;
    print_json(&serde_json::to_value(&record)?, pretty)?;
    Ok(())
}

/// Batch mode: one JSON array element per input URL, in input order.
/// Unreachable sites become `{"error": ...}` entries instead of
/// aborting the siblings.
async fn run_batch(urls: &[String], config: &Config, pretty: bool) -> anyhow::Result<()> {
    let results = extract_many(urls, config).await;

    let mut all_failed = true;
    let mut output = Vec::with_capacity(results.len());
    for (url, result) in urls.iter().zip(results) {
        match result {
            Ok(record) => {
                all_failed = false;
                output.push(serde_json::to_value(&record)?);
            }
            Err(ShopscopeError::UnreachableSite { url, reason }) => {
                tracing::warn!("Skipping unreachable site {}: {}", url, reason);
                output.push(serde_json::json!({ "website_url": url, "error": reason }));
            }
            Err(e) => {
                tracing::error!("Extraction failed for {}: {}", url, e);
                output.push(serde_json::json!({ "website_url": url, "error": e.to_string() }));
            }
        }
    }

    print_json(&serde_json::Value::Array(output), pretty)?;

    if all_failed {
        anyhow::bail!("every extraction failed");
    }
    Ok(())
}

fn print_json(value: &serde_json::Value, pretty: bool) -> anyhow::Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", rendered);
    Ok(())
}
