// =============================================================================
// Event Normalizer — raw JSON rows → canonical (timestamp, value) records
// =============================================================================
//
// Upstream sources disagree on column naming (`Date`, `Datetime`, `date`,
// `datetime`, ...) and on whether timestamps carry a UTC offset. This module
// collapses all of that into a single canonical shape:
//
//   TimestampedRecord { timestamp: NaiveDateTime, value: f64 }
//
// Offset-bearing timestamps are converted to UTC and the zone is dropped, so
// every record compares on the same clock; naive timestamps are trusted
// as-is. Normalization is best-effort: a row whose timestamp or value cannot
// be resolved is dropped, never a batch-level error. All columns other than
// the timestamp and the requested metric are discarded.
// =============================================================================

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::types::{PriceObservation, SentimentEvent};

/// Accepted names for the timestamp column, probed in order.
pub const TIMESTAMP_ALIASES: &[&str] =
    &["timestamp", "datetime", "Datetime", "date", "Date", "index"];

/// Accepted names for the sentiment metric column.
pub const SENTIMENT_ALIASES: &[&str] = &["sentiment", "sentiment_score"];

/// Accepted names for the close-price metric column.
pub const CLOSE_ALIASES: &[&str] = &["close", "Close"];

/// Naive timestamp formats tried after RFC 3339 parsing fails, in order.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// A canonicalised row: one instant, one metric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimestampedRecord {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// Normalize raw JSON rows into `TimestampedRecord`s, resolving the
/// timestamp column through [`TIMESTAMP_ALIASES`] and the metric column
/// through the caller's `value_aliases`.
///
/// Rows that fail to resolve either column are dropped. An empty input is a
/// valid zero-row result.
pub fn normalize_rows(rows: &[Value], value_aliases: &[&str]) -> Vec<TimestampedRecord> {
    rows.iter()
        .filter_map(|row| {
            let timestamp = parse_timestamp(field(row, TIMESTAMP_ALIASES)?)?;
            let value = parse_value(field(row, value_aliases)?)?;
            Some(TimestampedRecord { timestamp, value })
        })
        .collect()
}

/// Normalize sentiment-annotated headline rows into [`SentimentEvent`]s.
pub fn sentiment_events(rows: &[Value]) -> Vec<SentimentEvent> {
    normalize_rows(rows, SENTIMENT_ALIASES)
        .into_iter()
        .map(|r| SentimentEvent {
            timestamp: r.timestamp,
            sentiment: r.value,
        })
        .collect()
}

/// Normalize raw price-bar rows into [`PriceObservation`]s (close only).
pub fn price_observations(rows: &[Value]) -> Vec<PriceObservation> {
    normalize_rows(rows, CLOSE_ALIASES)
        .into_iter()
        .map(|r| PriceObservation {
            timestamp: r.timestamp,
            close: r.value,
        })
        .collect()
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Probe `row` for the first alias that resolves to a non-null field.
fn field<'a>(row: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|name| row.get(name))
        .find(|v| !v.is_null())
}

/// Parse a timestamp field into a zone-stripped `NaiveDateTime`.
///
/// - RFC 3339 strings (offset-bearing) are converted to UTC, then the zone
///   is dropped.
/// - Naive strings are tried against [`NAIVE_FORMATS`], then bare dates
///   (`%Y-%m-%d`, midnight).
/// - Integer fields are treated as UNIX epoch seconds.
pub fn parse_timestamp(raw: &Value) -> Option<NaiveDateTime> {
    if let Some(s) = raw.as_str() {
        let s = s.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.naive_utc());
        }
        for fmt in NAIVE_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(dt);
            }
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return d.and_hms_opt(0, 0, 0);
        }
        return None;
    }

    if let Some(secs) = raw.as_i64() {
        return DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc());
    }

    None
}

/// Parse a metric field that may arrive as a number or a numeric string.
/// Non-finite values are dropped along with anything unparseable.
fn parse_value(raw: &Value) -> Option<f64> {
    let value = if let Some(n) = raw.as_f64() {
        n
    } else {
        raw.as_str()?.trim().parse::<f64>().ok()?
    };

    value.is_finite().then_some(value)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    // ---- parse_timestamp -------------------------------------------------

    #[test]
    fn offset_timestamp_is_converted_to_utc_then_stripped() {
        // 09:00 at UTC-5 is 14:00 UTC.
        let parsed = parse_timestamp(&json!("2024-01-02T09:00:00-05:00")).unwrap();
        assert_eq!(parsed, ts("2024-01-02 14:00:00"));
    }

    #[test]
    fn naive_timestamp_is_trusted_as_is() {
        let parsed = parse_timestamp(&json!("2024-01-02T09:00:00")).unwrap();
        assert_eq!(parsed, ts("2024-01-02 09:00:00"));
    }

    #[test]
    fn fractional_seconds_are_accepted() {
        let parsed = parse_timestamp(&json!("2024-01-02T09:00:00.250")).unwrap();
        assert_eq!(parsed.and_utc().timestamp(), ts("2024-01-02 09:00:00").and_utc().timestamp());
    }

    #[test]
    fn bare_date_parses_to_midnight() {
        let parsed = parse_timestamp(&json!("2024-01-02")).unwrap();
        assert_eq!(parsed, ts("2024-01-02 00:00:00"));
    }

    #[test]
    fn epoch_seconds_parse() {
        // 2024-01-02 14:00:00 UTC.
        let parsed = parse_timestamp(&json!(1704204000)).unwrap();
        assert_eq!(parsed, ts("2024-01-02 14:00:00"));
    }

    #[test]
    fn garbage_timestamp_is_rejected() {
        assert!(parse_timestamp(&json!("not a date")).is_none());
        assert!(parse_timestamp(&json!(null)).is_none());
    }

    // ---- normalize_rows --------------------------------------------------

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(normalize_rows(&[], CLOSE_ALIASES).is_empty());
    }

    #[test]
    fn column_aliases_are_resolved() {
        let rows = vec![
            json!({"Datetime": "2024-01-02 09:00:00", "Close": 100.5}),
            json!({"date": "2024-01-02", "close": 101.0}),
            json!({"timestamp": "2024-01-03T10:00:00", "close": "102.25"}),
        ];
        let records = normalize_rows(&rows, CLOSE_ALIASES);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].value, 100.5);
        assert_eq!(records[1].timestamp, ts("2024-01-02 00:00:00"));
        assert_eq!(records[2].value, 102.25);
    }

    #[test]
    fn bad_rows_are_dropped_without_aborting_the_batch() {
        let rows = vec![
            json!({"datetime": "2024-01-02 09:00:00", "close": 100.0}),
            json!({"datetime": "garbage", "close": 101.0}),
            json!({"close": 102.0}),
            json!({"datetime": "2024-01-02 10:00:00"}),
            json!({"datetime": "2024-01-02 11:00:00", "close": null}),
            json!({"datetime": "2024-01-02 12:00:00", "close": 103.0}),
        ];
        let records = normalize_rows(&rows, CLOSE_ALIASES);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].value, 100.0);
        assert_eq!(records[1].value, 103.0);
    }

    #[test]
    fn only_timestamp_and_metric_survive() {
        let rows = vec![json!({
            "datetime": "2024-01-02 09:00:00",
            "open": 99.0,
            "high": 105.0,
            "low": 98.0,
            "close": 100.0,
            "volume": 12345
        })];
        let records = normalize_rows(&rows, CLOSE_ALIASES);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, 100.0);
    }

    #[test]
    fn non_finite_values_are_dropped() {
        let rows = vec![json!({"datetime": "2024-01-02 09:00:00", "close": "NaN"})];
        assert!(normalize_rows(&rows, CLOSE_ALIASES).is_empty());
    }

    // ---- typed wrappers --------------------------------------------------

    #[test]
    fn sentiment_wrapper_maps_value() {
        let rows = vec![json!({"datetime": "2024-01-02 09:00:00", "sentiment": 0.6})];
        let events = sentiment_events(&rows);
        assert_eq!(events.len(), 1);
        assert!((events[0].sentiment - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn price_wrapper_maps_value() {
        let rows = vec![json!({"Date": "2024-01-02", "Close": 4770.25})];
        let prices = price_observations(&rows);
        assert_eq!(prices.len(), 1);
        assert!((prices[0].close - 4770.25).abs() < f64::EPSILON);
    }
}
