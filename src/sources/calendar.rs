// =============================================================================
// Economic Calendar Source — TradingEconomics guest feed
// =============================================================================
//
// Fetches the public economic calendar and keeps only United States rows,
// the market the tracked index futures respond to. Rows carry the event
// title (used for macro-keyword classification) plus the actual/forecast/
// previous readings for log context. Event timestamps arrive naive in UTC,
// with or without fractional seconds; unparseable rows are skipped.
// =============================================================================

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, error};

use crate::analysis::normalize::parse_timestamp;

const CALENDAR_URL: &str = "https://api.tradingeconomics.com/calendar?c=guest:guest&f=json";

/// TradingEconomics guest calendar client.
#[derive(Debug, Clone)]
pub struct CalendarClient {
    client: reqwest::Client,
}

impl CalendarClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        Self { client }
    }

    /// Fetch upcoming/recent US economic events as raw headline-shaped rows.
    ///
    /// Returns an empty vec on fetch failure (logged) — the calendar is an
    /// enrichment, never a reason to abort a run.
    pub async fn fetch_us_events(&self) -> Vec<Value> {
        match self.try_fetch().await {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, "failed to fetch economic events — continuing with none");
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self) -> Result<Vec<Value>> {
        let resp = self
            .client
            .get(CALENDAR_URL)
            .send()
            .await
            .context("GET calendar request failed")?;

        let status = resp.status();
        let body: Value = resp
            .json()
            .await
            .context("failed to parse calendar response")?;

        if !status.is_success() {
            anyhow::bail!("calendar provider returned {}: {}", status, body);
        }

        let rows = parse_events(&body);
        debug!(count = rows.len(), "US economic events fetched");
        Ok(rows)
    }
}

impl Default for CalendarClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Filter the calendar payload to US rows with a parseable timestamp and
/// reshape them into headline-style rows.
fn parse_events(body: &Value) -> Vec<Value> {
    let events = match body.as_array() {
        Some(a) => a,
        None => return Vec::new(),
    };

    events
        .iter()
        .filter(|e| e["Country"].as_str() == Some("United States"))
        .filter_map(|e| {
            let raw_date = e["Date"].as_str()?;
            // With or without fractional seconds; anything else is skipped.
            parse_timestamp(&Value::from(raw_date))?;
            Some(serde_json::json!({
                "datetime": raw_date,
                "type": "economic_event",
                "title": e["Event"].as_str().unwrap_or(""),
                "actual": e["Actual"],
                "forecast": e["Forecast"],
                "previous": e["Previous"],
                "importance": e["Importance"],
                "source": "TradingEconomics",
            }))
        })
        .collect()
}
