// =============================================================================
// NewsPulse — Main Entry Point
// =============================================================================
//
// One invocation is one run: fetch headlines (plus the US economic calendar
// when enabled), score sentiment, then for every tracked instrument fetch
// price bars, align, correlate, and append today's coefficient to that
// instrument's history. Instrument pipelines are independent; a failure in
// one never aborts the others.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analysis;
mod history;
mod pipeline;
mod runtime_config;
mod sentiment;
mod sources;
mod types;

use std::path::Path;

use chrono::{NaiveDateTime, Utc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::analysis::normalize::parse_timestamp;
use crate::history::CorrelationHistory;
use crate::runtime_config::RuntimeConfig;
use crate::sources::{CalendarClient, NewsClient, PriceClient};

const CONFIG_PATH: &str = "newspulse_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        NewsPulse — Sentiment/Price Correlation           ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let mut config = RuntimeConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    // Override instruments from env if available.
    if let Ok(syms) = std::env::var("NEWSPULSE_INSTRUMENTS") {
        config.instruments = syms
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if config.instruments.is_empty() {
        config.instruments = RuntimeConfig::default().instruments;
    }

    info!(
        instruments = ?config.instruments,
        lookback_days = config.lookback_days,
        tolerance_minutes = config.tolerance_minutes,
        "Configured run"
    );

    // ── 2. Fetch & score the event stream ────────────────────────────────
    let api_key = std::env::var("NEWSPULSE_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        warn!("NEWSPULSE_API_KEY is not set — the news fetch will likely fail");
    }

    let news_client = NewsClient::new(api_key);
    let mut rows = news_client
        .fetch_headlines(&config.news_query, config.lookback_days)
        .await;

    if config.include_economic_events {
        let calendar = CalendarClient::new();
        rows.extend(calendar.fetch_us_events().await);
    }

    // Merged stream sorted by time, unparseable stamps first (the
    // normalizer drops them later anyway).
    rows.sort_by_key(|row| {
        row.get("datetime")
            .and_then(parse_timestamp)
            .unwrap_or(NaiveDateTime::MIN)
    });

    let annotated = sentiment::annotate_rows(rows);
    if annotated.is_empty() {
        warn!("No news found — nothing to correlate this run");
        return Ok(());
    }
    info!(headlines = annotated.len(), "Sentiment analysis complete");

    // ── 3. Per-instrument pipelines ──────────────────────────────────────
    let price_client = PriceClient::new();
    let history = CorrelationHistory::new(&config.data_dir);
    let run_date = Utc::now().date_naive();

    for instrument in &config.instruments {
        let bars = price_client
            .fetch_bars(instrument, config.lookback_days)
            .await;

        match pipeline::run_instrument(
            instrument,
            &annotated,
            &bars,
            config.tolerance(),
            Path::new(&config.data_dir),
            &history,
            run_date,
        ) {
            Ok(report) => info!(
                instrument = %report.instrument,
                correlation = ?report.coefficient,
                samples = report.sample_count,
                rows = report.row_count,
                persisted = report.persisted,
                "instrument run complete"
            ),
            Err(e) => error!(instrument = %instrument, error = %e, "instrument run failed"),
        }
    }

    // ── 4. Persist config state ──────────────────────────────────────────
    if let Err(e) = config.save(CONFIG_PATH) {
        error!(error = %e, "Failed to save runtime config");
    }

    info!("NewsPulse run complete.");
    Ok(())
}
