// =============================================================================
// Shared types used across the NewsPulse correlation engine
// =============================================================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A sentiment-bearing headline event after normalization.
///
/// `timestamp` is zone-stripped (UTC-based naive) so that cross-source
/// comparisons never mix offsets. `sentiment` is a polarity in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentEvent {
    pub timestamp: NaiveDateTime,
    pub sentiment: f64,
}

/// A single price bar reduced to the close observation, after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub timestamp: NaiveDateTime,
    pub close: f64,
}

/// One row of the aligned sentiment/price table.
///
/// The timestamp is always the originating event's timestamp, never the
/// matched price bar's. `close` is `None` when no price bar falls inside
/// the backward tolerance window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedRow {
    pub timestamp: NaiveDateTime,
    pub sentiment: Option<f64>,
    pub close: Option<f64>,
}

/// Coarse market-impact category assigned to a headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactCategory {
    Bullish,
    Bearish,
    Neutral,
    MacroEvent,
}

impl ImpactCategory {
    /// Directional sign used downstream: +1 bullish, -1 bearish, 0 otherwise.
    pub fn sign(&self) -> i8 {
        match self {
            Self::Bullish => 1,
            Self::Bearish => -1,
            Self::Neutral | Self::MacroEvent => 0,
        }
    }
}

impl std::fmt::Display for ImpactCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "BULLISH"),
            Self::Bearish => write!(f, "BEARISH"),
            Self::Neutral => write!(f, "NEUTRAL"),
            Self::MacroEvent => write!(f, "MACRO_EVENT"),
        }
    }
}

/// One persisted correlation observation: a calendar date and the Pearson
/// coefficient computed for that day's run (`None` when undefined).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub correlation: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_signs() {
        assert_eq!(ImpactCategory::Bullish.sign(), 1);
        assert_eq!(ImpactCategory::Bearish.sign(), -1);
        assert_eq!(ImpactCategory::Neutral.sign(), 0);
        assert_eq!(ImpactCategory::MacroEvent.sign(), 0);
    }

    #[test]
    fn category_display() {
        assert_eq!(ImpactCategory::MacroEvent.to_string(), "MACRO_EVENT");
        assert_eq!(ImpactCategory::Bullish.to_string(), "BULLISH");
    }
}
