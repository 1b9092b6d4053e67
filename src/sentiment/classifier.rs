// =============================================================================
// Impact Classifier — ordered rules over headline text
// =============================================================================
//
// Maps a headline to a polarity, a coarse market-impact category, and a
// directional sign. The rules are an ordered list of (predicate, category)
// pairs evaluated in a fixed priority:
//
//   macro keyword                       -> MACRO_EVENT / 0
//   polarity >= 0.5  or bullish term    -> BULLISH     / +1
//   polarity <= -0.5 or bearish term    -> BEARISH     / -1
//   otherwise                           -> NEUTRAL     / 0
//
// The first matching rule wins; the polarity score itself is always the
// lexicon's full-precision value.
// =============================================================================

use serde_json::Value;
use tracing::debug;

use crate::sentiment::lexicon;
use crate::types::ImpactCategory;

/// Polarity magnitude at which the score alone decides the category.
const STRONG_POLARITY: f64 = 0.5;

/// Classification of a single headline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Lexicon polarity in [-1, 1].
    pub polarity: f64,
    pub category: ImpactCategory,
    /// +1 bullish, -1 bearish, 0 neutral or macro.
    pub sign: i8,
}

/// One classification rule: predicate over (title, polarity) plus the
/// category assigned when it matches.
type Rule = (fn(&str, f64) -> bool, ImpactCategory);

/// Rules in priority order; the final rule always matches.
const RULES: &[Rule] = &[
    (macro_rule, ImpactCategory::MacroEvent),
    (bullish_rule, ImpactCategory::Bullish),
    (bearish_rule, ImpactCategory::Bearish),
    (neutral_rule, ImpactCategory::Neutral),
];

fn macro_rule(title: &str, _polarity: f64) -> bool {
    lexicon::is_macro_event(title)
}

fn bullish_rule(title: &str, polarity: f64) -> bool {
    polarity >= STRONG_POLARITY || lexicon::has_bullish_term(title)
}

fn bearish_rule(title: &str, polarity: f64) -> bool {
    polarity <= -STRONG_POLARITY || lexicon::has_bearish_term(title)
}

fn neutral_rule(_title: &str, _polarity: f64) -> bool {
    true
}

/// Classify a headline title.
pub fn classify(title: &str) -> Classification {
    let polarity = lexicon::polarity(title);

    for (predicate, category) in RULES {
        if predicate(title, polarity) {
            return Classification {
                polarity,
                category: *category,
                sign: category.sign(),
            };
        }
    }

    // RULES ends with an always-true rule.
    unreachable!("classifier rule table has no fallback");
}

/// Annotate raw headline rows with `sentiment` and `category` fields, the
/// way the aligned table expects them.
///
/// Rows without a `title` field are dropped (a missing required field never
/// aborts the batch). The sentiment value is written at full precision;
/// rounding for display happens downstream.
pub fn annotate_rows(rows: Vec<Value>) -> Vec<Value> {
    let total = rows.len();
    let annotated: Vec<Value> = rows
        .into_iter()
        .filter_map(|mut row| {
            let title = row.get("title")?.as_str()?.to_string();
            let classification = classify(&title);

            let obj = row.as_object_mut()?;
            obj.insert("sentiment".to_string(), classification.polarity.into());
            obj.insert(
                "category".to_string(),
                classification.category.to_string().into(),
            );
            Some(row)
        })
        .collect();

    if annotated.len() < total {
        debug!(
            dropped = total - annotated.len(),
            kept = annotated.len(),
            "headline rows without a title were dropped"
        );
    }
    annotated
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn macro_outranks_bullish_terms() {
        // Contains both a macro keyword and a strongly bullish term.
        let c = classify("Stocks surge after CPI report");
        assert_eq!(c.category, ImpactCategory::MacroEvent);
        assert_eq!(c.sign, 0);
    }

    #[test]
    fn bullish_by_keyword() {
        let c = classify("Tech shares rally into the close");
        assert_eq!(c.category, ImpactCategory::Bullish);
        assert_eq!(c.sign, 1);
        assert!(c.polarity > 0.0);
    }

    #[test]
    fn bearish_by_keyword() {
        let c = classify("Markets tumble on tariff news");
        assert_eq!(c.category, ImpactCategory::Bearish);
        assert_eq!(c.sign, -1);
        assert!(c.polarity < 0.0);
    }

    #[test]
    fn bullish_outranks_bearish_in_mixed_headlines() {
        // Both term families match; the rule order decides.
        let c = classify("Oil prices surge, airline shares drop");
        assert_eq!(c.category, ImpactCategory::Bullish);
    }

    #[test]
    fn neutral_fallback() {
        let c = classify("Company schedules annual meeting");
        assert_eq!(c.category, ImpactCategory::Neutral);
        assert_eq!(c.sign, 0);
        assert_eq!(c.polarity, 0.0);
    }

    #[test]
    fn empty_title_is_neutral() {
        let c = classify("");
        assert_eq!(c.category, ImpactCategory::Neutral);
        assert_eq!(c.polarity, 0.0);
    }

    #[test]
    fn annotate_adds_sentiment_and_category() {
        let rows = vec![json!({
            "datetime": "2024-01-02T09:00:00",
            "title": "Stocks rally on strong earnings"
        })];
        let annotated = annotate_rows(rows);
        assert_eq!(annotated.len(), 1);
        assert!(annotated[0]["sentiment"].as_f64().unwrap() > 0.0);
        assert_eq!(annotated[0]["category"], "BULLISH");
        // Original fields survive.
        assert_eq!(annotated[0]["datetime"], "2024-01-02T09:00:00");
    }

    #[test]
    fn annotate_drops_rows_without_title() {
        let rows = vec![
            json!({"datetime": "2024-01-02T09:00:00"}),
            json!({"datetime": "2024-01-02T10:00:00", "title": "Markets slump"}),
            json!({"datetime": "2024-01-02T11:00:00", "title": null}),
        ];
        let annotated = annotate_rows(rows);
        assert_eq!(annotated.len(), 1);
        assert_eq!(annotated[0]["category"], "BEARISH");
    }
}
