// =============================================================================
// Temporal Aligner — backward as-of join with bounded tolerance
// =============================================================================
//
// Reconciles a sparse event series (sentiment-bearing headlines) against a
// denser price series. Each event is matched to the latest price observation
// at or before it; the match only stands when the gap does not exceed the
// tolerance window. The join is event-driven: exactly one output row per
// event, never per price bar.
//
// Both inputs are sorted internally, so callers may pass them in any order
// and the output is the same. With sorted inputs the join is a single
// left-to-right merge scan, O(n + m) total.
// =============================================================================

use chrono::Duration;

use crate::types::{AlignedRow, PriceObservation, SentimentEvent};

/// Default maximum backward gap for an as-of match.
pub const DEFAULT_TOLERANCE_MINUTES: i64 = 30;

/// Align `events` against `prices` with a backward as-of join.
///
/// For each event the latest price with `timestamp <= event.timestamp` is
/// matched; if no such price exists, or the gap exceeds `tolerance`, the
/// row's `close` is `None`. Output is ordered ascending by event timestamp,
/// one row per event. The row timestamp is always the event's.
///
/// Duplicate price timestamps resolve to the last one in sort order
/// (standard as-of semantics; the sort is stable).
pub fn align(
    mut events: Vec<SentimentEvent>,
    mut prices: Vec<PriceObservation>,
    tolerance: Duration,
) -> Vec<AlignedRow> {
    events.sort_by_key(|e| e.timestamp);
    prices.sort_by_key(|p| p.timestamp);

    let mut rows = Vec::with_capacity(events.len());
    // Index of the first price strictly after the current event; the match
    // candidate is the price just before it.
    let mut next = 0usize;

    for event in &events {
        while next < prices.len() && prices[next].timestamp <= event.timestamp {
            next += 1;
        }

        let close = next.checked_sub(1).and_then(|i| {
            let candidate = &prices[i];
            let gap = event.timestamp - candidate.timestamp;
            (gap <= tolerance).then_some(candidate.close)
        });

        rows.push(AlignedRow {
            timestamp: event.timestamp,
            sentiment: Some(event.sentiment),
            close,
        });
    }

    rows
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn event(at: &str, sentiment: f64) -> SentimentEvent {
        SentimentEvent {
            timestamp: ts(at),
            sentiment,
        }
    }

    fn price(at: &str, close: f64) -> PriceObservation {
        PriceObservation {
            timestamp: ts(at),
            close,
        }
    }

    fn tol() -> Duration {
        Duration::minutes(DEFAULT_TOLERANCE_MINUTES)
    }

    #[test]
    fn end_to_end_scenario_matches_within_tolerance() {
        // row1: price@08:50, gap 10m; row2: price@09:40, gap 5m.
        let events = vec![event("2024-01-02 09:00", 0.6), event("2024-01-02 09:45", -0.3)];
        let prices = vec![
            price("2024-01-02 08:50", 100.0),
            price("2024-01-02 09:40", 102.0),
            price("2024-01-02 10:00", 99.0),
        ];

        let rows = align(events, prices, tol());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].timestamp, ts("2024-01-02 09:00"));
        assert_eq!(rows[0].close, Some(100.0));
        assert_eq!(rows[1].timestamp, ts("2024-01-02 09:45"));
        assert_eq!(rows[1].close, Some(102.0));
    }

    #[test]
    fn one_row_per_event_regardless_of_price_count() {
        let events = vec![
            event("2024-01-02 09:00", 0.1),
            event("2024-01-02 09:05", 0.2),
            event("2024-01-02 09:10", 0.3),
        ];
        let prices: Vec<PriceObservation> = (0..50)
            .map(|i| price("2024-01-02 08:00", 100.0 + i as f64))
            .collect();

        assert_eq!(align(events.clone(), prices, tol()).len(), events.len());
        assert_eq!(align(events, Vec::new(), tol()).len(), 3);
    }

    #[test]
    fn unsorted_input_produces_same_output_as_sorted() {
        let events = vec![
            event("2024-01-02 09:45", -0.3),
            event("2024-01-02 09:00", 0.6),
            event("2024-01-02 09:30", 0.1),
        ];
        let prices = vec![
            price("2024-01-02 09:40", 102.0),
            price("2024-01-02 08:50", 100.0),
            price("2024-01-02 09:20", 101.0),
        ];

        let mut sorted_events = events.clone();
        sorted_events.sort_by_key(|e| e.timestamp);
        let mut sorted_prices = prices.clone();
        sorted_prices.sort_by_key(|p| p.timestamp);

        assert_eq!(
            align(events, prices, tol()),
            align(sorted_events, sorted_prices, tol())
        );
    }

    #[test]
    fn match_is_backward_only() {
        // The only price is 1 minute after the event — no match.
        let events = vec![event("2024-01-02 09:00", 0.5)];
        let prices = vec![price("2024-01-02 09:01", 100.0)];

        let rows = align(events, prices, tol());
        assert_eq!(rows[0].close, None);
    }

    #[test]
    fn gap_over_tolerance_leaves_close_absent() {
        let events = vec![event("2024-01-02 09:31", 0.5)];
        let prices = vec![price("2024-01-02 09:00", 100.0)];

        let rows = align(events, prices, tol());
        assert_eq!(rows[0].close, None);
    }

    #[test]
    fn gap_exactly_at_tolerance_matches() {
        let events = vec![event("2024-01-02 09:30", 0.5)];
        let prices = vec![price("2024-01-02 09:00", 100.0)];

        let rows = align(events, prices, tol());
        assert_eq!(rows[0].close, Some(100.0));
    }

    #[test]
    fn equal_timestamps_match_with_zero_gap() {
        let events = vec![event("2024-01-02 09:00", 0.5)];
        let prices = vec![price("2024-01-02 09:00", 100.0)];

        let rows = align(events, prices, tol());
        assert_eq!(rows[0].close, Some(100.0));
    }

    #[test]
    fn duplicate_price_timestamps_resolve_to_last_in_sort_order() {
        let events = vec![event("2024-01-02 09:10", 0.5)];
        let prices = vec![
            price("2024-01-02 09:00", 100.0),
            price("2024-01-02 09:00", 101.0),
        ];

        let rows = align(events, prices, tol());
        assert_eq!(rows[0].close, Some(101.0));
    }

    #[test]
    fn row_timestamp_is_the_events_not_the_prices() {
        let events = vec![event("2024-01-02 09:10", 0.5)];
        let prices = vec![price("2024-01-02 09:00", 100.0)];

        let rows = align(events, prices, tol());
        assert_eq!(rows[0].timestamp, ts("2024-01-02 09:10"));
    }

    #[test]
    fn empty_events_yield_empty_table() {
        let prices = vec![price("2024-01-02 09:00", 100.0)];
        assert!(align(Vec::new(), prices, tol()).is_empty());
    }
}
