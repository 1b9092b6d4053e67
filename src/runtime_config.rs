// =============================================================================
// Runtime Configuration — Persistent engine settings with atomic save
// =============================================================================
//
// Central configuration for the NewsPulse engine: which instruments are
// tracked, the news search query, the lookback window, and the alignment
// tolerance. Persistence uses an atomic tmp + rename pattern to prevent
// corruption on crash. All fields carry `#[serde(default)]` so that adding
// new fields never breaks loading an older config file.
//
// Secrets (the news API key) are deliberately NOT part of this file; they
// come from the environment.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_instruments() -> Vec<String> {
    vec![
        "ES=F".to_string(),
        "NQ=F".to_string(),
        "YM=F".to_string(),
        "RTY=F".to_string(),
    ]
}

fn default_news_query() -> String {
    "stock market OR S&P 500 OR Nasdaq OR Dow Jones OR CPI OR PPI OR FOMC".to_string()
}

fn default_lookback_days() -> u32 {
    30
}

fn default_tolerance_minutes() -> i64 {
    crate::analysis::align::DEFAULT_TOLERANCE_MINUTES
}

fn default_data_dir() -> String {
    "data".to_string()
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level runtime configuration for the NewsPulse engine.
///
/// Every field has a serde default so that older JSON files missing new
/// fields will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Instruments (index futures tickers) tracked by the engine. Each gets
    /// its own independent correlation history file.
    #[serde(default = "default_instruments")]
    pub instruments: Vec<String>,

    /// Search query used to fetch market headlines.
    #[serde(default = "default_news_query")]
    pub news_query: String,

    /// How many days of news and prices to fetch per run.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Maximum backward gap (minutes) for a headline to match a price bar.
    #[serde(default = "default_tolerance_minutes")]
    pub tolerance_minutes: i64,

    /// Directory holding history files and exported aligned tables.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Whether US economic-calendar events are merged into the news stream.
    #[serde(default = "default_true")]
    pub include_economic_events: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            instruments: default_instruments(),
            news_query: default_news_query(),
            lookback_days: default_lookback_days(),
            tolerance_minutes: default_tolerance_minutes(),
            data_dir: default_data_dir(),
            include_economic_events: true,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            instruments = ?config.instruments,
            lookback_days = config.lookback_days,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    ///
    /// This prevents corruption if the process crashes mid-write.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        // Atomic write: write to a temporary sibling file, then rename.
        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }

    /// Alignment tolerance as a chrono duration.
    pub fn tolerance(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.tolerance_minutes)
    }
}
