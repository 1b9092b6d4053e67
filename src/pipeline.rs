// =============================================================================
// Per-instrument pipeline — normalize → align → correlate → persist
// =============================================================================
//
// One invocation of this pipeline is one day's run for one instrument: the
// sentiment-annotated news rows and the raw price rows are normalized into
// typed series, aligned with the backward as-of join, correlated, and the
// resulting coefficient is upserted into the instrument's history keyed by
// the run date. The aligned table is also exported as CSV for inspection.
//
// The correlation is computed on full-precision values; the 3-decimal
// sentiment / 2-decimal close rounding below exists only in the logged
// preview and the exported table.
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::analysis::{align, correlate, price_observations, sentiment_events};
use crate::history::{sanitize, CorrelationHistory};
use crate::types::{AlignedRow, HistoryEntry};

/// Outcome of one instrument's run, for orchestrator logging.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub instrument: String,
    pub coefficient: Option<f64>,
    /// Rows that contributed to the coefficient (both fields present).
    pub sample_count: usize,
    /// Total rows in the aligned table (one per headline event).
    pub row_count: usize,
    /// Whether a history entry was written (false when data was unavailable).
    pub persisted: bool,
}

/// Run the full pipeline for one instrument.
///
/// Empty events or prices short-circuit to a skip: nothing is aligned,
/// exported, or persisted, and the report carries an absent coefficient.
pub fn run_instrument(
    instrument: &str,
    annotated_news: &[Value],
    price_rows: &[Value],
    tolerance: Duration,
    data_dir: &Path,
    history: &CorrelationHistory,
    run_date: NaiveDate,
) -> Result<PipelineReport> {
    let events = sentiment_events(annotated_news);
    let prices = price_observations(price_rows);

    if events.is_empty() || prices.is_empty() {
        warn!(
            instrument,
            events = events.len(),
            prices = prices.len(),
            "no usable events or prices — skipping correlation for this instrument"
        );
        return Ok(PipelineReport {
            instrument: instrument.to_string(),
            coefficient: None,
            sample_count: 0,
            row_count: 0,
            persisted: false,
        });
    }

    let result = correlate(align(events, prices, tolerance));

    log_preview(instrument, &result.rows);
    log_summary(instrument, result.coefficient, result.sample_count);

    export_aligned_table(&aligned_path(data_dir, instrument), &result.rows)?;

    history.upsert(
        instrument,
        HistoryEntry {
            date: run_date,
            correlation: result.coefficient,
        },
    )?;

    Ok(PipelineReport {
        instrument: instrument.to_string(),
        coefficient: result.coefficient,
        sample_count: result.sample_count,
        row_count: result.rows.len(),
        persisted: true,
    })
}

/// Where the aligned table for `instrument` is exported.
pub fn aligned_path(data_dir: &Path, instrument: &str) -> PathBuf {
    data_dir.join(format!("{}_aligned.csv", sanitize(instrument)))
}

// =============================================================================
// Presentation (rounding lives here and nowhere else)
// =============================================================================

/// Display-round sentiment to 3 decimals, close to 2, absent to empty.
fn display_fields(row: &AlignedRow) -> (String, String, String) {
    (
        row.timestamp.format("%Y-%m-%d %H:%M").to_string(),
        row.sentiment.map(|s| format!("{s:.3}")).unwrap_or_default(),
        row.close.map(|c| format!("{c:.2}")).unwrap_or_default(),
    )
}

fn log_preview(instrument: &str, rows: &[AlignedRow]) {
    info!(instrument, rows = rows.len(), "merged sentiment & price table");
    for row in rows {
        let (timestamp, sentiment, close) = display_fields(row);
        debug!(instrument, %timestamp, sentiment, close, "aligned row");
    }
}

fn log_summary(instrument: &str, coefficient: Option<f64>, sample_count: usize) {
    match coefficient {
        Some(r) => {
            // Strength as a percentage for non-technical readers.
            let strength = r.abs() * 100.0;
            let direction = if r > 0.0 { "positive" } else { "negative" };
            info!(instrument, correlation = %format!("{r:.6}"), sample_count, "calculated correlation");
            info!(
                instrument,
                strength = %format!("{strength:.1}%"),
                direction,
                "correlation strength"
            );
        }
        None => {
            info!(instrument, sample_count, "calculated correlation: N/A");
        }
    }
}

/// Export the aligned table with display rounding applied.
fn export_aligned_table(path: &Path, rows: &[AlignedRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create export directory {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create aligned table at {}", path.display()))?;
    writer.write_record(["datetime", "sentiment", "close"])?;

    for row in rows {
        let (timestamp, sentiment, close) = display_fields(row);
        writer.write_record([timestamp, sentiment, close])?;
    }

    writer.flush().context("failed to flush aligned table")?;
    debug!(path = %path.display(), rows = rows.len(), "aligned table exported");
    Ok(())
}
