//! The `capture` command: one user-triggered capture, end to end.
//!
//! Flow: check the daily budget, obtain the page (HTTP fetch or local
//! file), extract and normalize, refuse records without an identifier,
//! then hand the result to its consumers (stdout preview, optional JSON
//! files for the wire record and the raw extraction, optional submission
//! to the ingestion endpoint). Only a submitted capture consumes budget.

use std::path::PathBuf;

use anyhow::Context;
use bookcap_core::AppConfig;
use bookcap_scraper::{extract, is_product_url, to_capture, CaptureClient, CaptureLimiter};

use crate::preview;

#[derive(Debug, clap::Args)]
pub struct CaptureArgs {
    /// Product page URL, or a path to a saved HTML file
    pub target: String,

    /// Page URL to attribute to the capture when TARGET is a file
    /// (the product identifier is derived from it)
    #[arg(long)]
    pub page_url: Option<String>,

    /// Submit the capture to the configured ingestion endpoint
    #[arg(long)]
    pub send: bool,

    /// Write the wire-format record to this file as pretty JSON
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Write the full unnormalized extraction to this file as pretty JSON
    #[arg(long)]
    pub raw_out: Option<PathBuf>,
}

pub async fn run(config: &AppConfig, args: CaptureArgs) -> anyhow::Result<()> {
    let limiter = CaptureLimiter::new(&config.limit_state_path, config.daily_capture_limit);
    let used = limiter.check()?;
    tracing::debug!(used, limit = config.daily_capture_limit, "capture budget");

    let client = CaptureClient::new(
        config.request_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_secs,
    )?;

    let (html, url) = if is_remote(&args.target) {
        if !is_product_url(&args.target) {
            anyhow::bail!("not a product page URL: {}", args.target);
        }
        let html = client.fetch_page(&args.target).await?;
        (html, args.target.clone())
    } else {
        let html = std::fs::read_to_string(&args.target)
            .with_context(|| format!("cannot read page file {}", args.target))?;
        (html, args.page_url.clone().unwrap_or_default())
    };

    let raw = extract(&html, &url);
    let record = to_capture(raw.clone());
    if !record.has_identifier() {
        anyhow::bail!("could not detect a product on this page");
    }

    println!("{}", preview::render(&record));

    if let Some(path) = &args.raw_out {
        std::fs::write(path, serde_json::to_string_pretty(&raw)?)
            .with_context(|| format!("cannot write raw extraction to {}", path.display()))?;
        tracing::info!(path = %path.display(), "raw extraction written");
    }

    if let Some(out) = &args.out {
        std::fs::write(out, serde_json::to_string_pretty(&record)?)
            .with_context(|| format!("cannot write capture to {}", out.display()))?;
        tracing::info!(path = %out.display(), "capture written");
    }

    if args.send {
        client.submit_capture(&config.api_url, &record).await?;
        let total = limiter.record()?;
        println!(
            "Capture sent ({total}/{} today)",
            config.daily_capture_limit
        );
    }

    Ok(())
}

/// `true` when the capture target must be fetched over HTTP rather than
/// read from disk.
fn is_remote(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}
