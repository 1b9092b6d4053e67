// =============================================================================
// Price Source — OHLCV bar fetcher (Yahoo chart endpoint)
// =============================================================================
//
// Fetches historical bars per instrument and emits raw JSON rows
// `{datetime, open, high, low, close, volume}` with epoch-second timestamps
// for the normalizer. Bar granularity follows the lookback window: short
// windows get intraday bars so headline events can match a nearby close.
// Bars with a null close slot are skipped.
// =============================================================================

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, error, info};

const BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo chart API client.
#[derive(Debug, Clone)]
pub struct PriceClient {
    client: reqwest::Client,
}

impl PriceClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .user_agent("Mozilla/5.0 (newspulse)")
            .build()
            .expect("failed to build reqwest client");

        Self { client }
    }

    /// Fetch `days` of bars for `symbol`.
    ///
    /// Returns an empty vec on any fetch or parse failure (logged); the
    /// caller treats an empty price series as DataUnavailable and skips the
    /// instrument.
    pub async fn fetch_bars(&self, symbol: &str, days: u32) -> Vec<Value> {
        match self.try_fetch(symbol, days).await {
            Ok(rows) => rows,
            Err(e) => {
                error!(symbol, error = %e, "failed to fetch price bars — continuing with none");
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self, symbol: &str, days: u32) -> Result<Vec<Value>> {
        let (range, interval) = range_and_interval(days);
        info!(symbol, range, interval, "fetching price bars");

        let url = format!("{BASE_URL}/{symbol}");
        let resp = self
            .client
            .get(&url)
            .query(&[("range", range.as_str()), ("interval", interval)])
            .send()
            .await
            .with_context(|| format!("GET chart request for {symbol} failed"))?;

        let status = resp.status();
        let body: Value = resp
            .json()
            .await
            .context("failed to parse chart response")?;

        if !status.is_success() {
            anyhow::bail!("price provider returned {} for {}: {}", status, symbol, body);
        }

        let rows = parse_chart(&body)?;
        debug!(symbol, count = rows.len(), "price bars fetched");
        Ok(rows)
    }
}

impl Default for PriceClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Bar granularity by lookback window: intraday bars while the provider
/// allows them, daily above that. Daily requests are widened to 60 days so
/// the series stays long enough to correlate against.
fn range_and_interval(days: u32) -> (String, &'static str) {
    if days <= 30 {
        (format!("{days}d"), "30m")
    } else if days <= 60 {
        (format!("{days}d"), "1h")
    } else {
        (format!("{}d", days.max(60)), "1d")
    }
}

/// Reshape the chart payload's parallel arrays into per-bar rows. Slots
/// with a null close are skipped.
fn parse_chart(body: &Value) -> Result<Vec<Value>> {
    let result = body["chart"]["result"]
        .as_array()
        .and_then(|arr| arr.first())
        .context("chart response missing result")?;

    let timestamps = result["timestamp"]
        .as_array()
        .context("chart result missing timestamps")?;
    let quote = &result["indicators"]["quote"][0];

    let mut rows = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let Some(secs) = ts.as_i64() else { continue };
        let Some(close) = quote["close"][i].as_f64() else {
            continue;
        };

        rows.push(serde_json::json!({
            "datetime": secs,
            "open": quote["open"][i],
            "high": quote["high"][i],
            "low": quote["low"][i],
            "close": close,
            "volume": quote["volume"][i],
        }));
    }

    Ok(rows)
}
