// =============================================================================
// News Source — market headline fetcher (NewsAPI `everything` search)
// =============================================================================
//
// Emits raw JSON rows `{datetime, type, title, description, link, source}`
// for the normalizer; the `datetime` is the provider's RFC 3339 publish
// stamp, zone handling happens downstream. A failed fetch logs an error and
// yields an empty batch — partial data loss is tolerated, a run is never
// aborted by the news side.
//
// SECURITY: the API key travels as a query parameter per the provider's
// protocol but is never logged.
// =============================================================================

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error};

const BASE_URL: &str = "https://newsapi.org/v2";

/// Maximum headlines requested per fetch (provider page cap).
const PAGE_SIZE: u32 = 100;

/// NewsAPI client.
#[derive(Clone)]
pub struct NewsClient {
    api_key: String,
    client: reqwest::Client,
}

impl NewsClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        Self {
            api_key: api_key.into(),
            client,
        }
    }

    /// Fetch headlines matching `query` over the last `days` days.
    ///
    /// Returns an empty vec on any fetch or parse failure (logged), matching
    /// the best-effort contract of the rest of the ingestion layer.
    pub async fn fetch_headlines(&self, query: &str, days: u32) -> Vec<Value> {
        match self.try_fetch(query, days).await {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, "failed to fetch market news — continuing with none");
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self, query: &str, days: u32) -> Result<Vec<Value>> {
        let from = (Utc::now() - chrono::Duration::days(i64::from(days)))
            .format("%Y-%m-%d")
            .to_string();
        let url = format!("{BASE_URL}/everything");
        let page_size = PAGE_SIZE.to_string();

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("from", from.as_str()),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("GET /v2/everything request failed")?;

        let status = resp.status();
        let body: Value = resp
            .json()
            .await
            .context("failed to parse news response")?;

        if !status.is_success() {
            anyhow::bail!("news provider returned {}: {}", status, body["message"]);
        }

        let rows = parse_articles(&body);
        debug!(query, from, count = rows.len(), "headlines fetched");
        Ok(rows)
    }
}

/// Flatten the provider's `articles` array into raw headline rows. Articles
/// without a publish stamp or title are skipped.
fn parse_articles(body: &Value) -> Vec<Value> {
    let articles = match body["articles"].as_array() {
        Some(a) => a,
        None => return Vec::new(),
    };

    articles
        .iter()
        .filter_map(|item| {
            let datetime = item["publishedAt"].as_str()?;
            let title = item["title"].as_str()?;
            Some(serde_json::json!({
                "datetime": datetime,
                "type": "market_news",
                "title": title,
                "description": item["description"].as_str().unwrap_or(""),
                "link": item["url"].as_str().unwrap_or(""),
                "source": item["source"]["name"].as_str().unwrap_or("NewsAPI"),
            }))
        })
        .collect()
}

impl std::fmt::Debug for NewsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsClient")
            .field("api_key", &"<redacted>")
            .finish()
    }
}
