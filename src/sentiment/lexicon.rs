// =============================================================================
// Sentiment Lexicon — weighted keyword polarity scoring
// =============================================================================
//
// A small rule-based stand-in for a full sentiment model: each matched term
// contributes its weight (in [-1, 1]) and the polarity of a headline is the
// mean of the matched weights, clamped to [-1, 1]. A headline matching no
// term scores 0.0 (neutral). Matching is case-insensitive substring search
// against the raw title text.
//
// Macro-event keywords are kept separate: they flag scheduled economic
// releases whose direction is unknowable from the headline alone.
// =============================================================================

/// Keywords marking scheduled macro releases and central-bank events.
pub const MACRO_KEYWORDS: &[&str] = &[
    "cpi",
    "ppi",
    "fomc",
    "fed ",
    "federal reserve",
    "rate decision",
    "interest rate",
    "rate hike",
    "rate cut",
    "nonfarm",
    "payrolls",
    "jobs report",
    "unemployment",
    "gdp",
    "inflation report",
    "jobless claims",
    "central bank",
];

/// Positive terms with their polarity weights.
const POSITIVE_TERMS: &[(&str, f64)] = &[
    ("record high", 0.9),
    ("all-time high", 0.9),
    ("soar", 0.9),
    ("bullish", 0.9),
    ("surge", 0.8),
    ("rally", 0.8),
    ("rallies", 0.8),
    ("jump", 0.7),
    ("beats expectations", 0.7),
    ("strong earnings", 0.7),
    ("upgrade", 0.6),
    ("rebound", 0.6),
    ("climb", 0.6),
    ("optimism", 0.6),
    ("gain", 0.5),
    ("boost", 0.5),
    ("strong", 0.5),
    ("growth", 0.4),
    ("profit", 0.4),
];

/// Negative terms with their polarity weights.
const NEGATIVE_TERMS: &[(&str, f64)] = &[
    ("crash", -0.9),
    ("collapse", -0.9),
    ("bearish", -0.9),
    ("plunge", -0.8),
    ("plummet", -0.8),
    ("selloff", -0.8),
    ("sell-off", -0.8),
    ("tumble", -0.7),
    ("sink", -0.7),
    ("misses expectations", -0.7),
    ("recession", -0.7),
    ("downgrade", -0.6),
    ("slump", -0.6),
    ("drop", -0.5),
    ("fall", -0.5),
    ("decline", -0.5),
    ("weak", -0.5),
    ("fear", -0.5),
    ("loss", -0.4),
    ("worry", -0.4),
];

/// Polarity of a headline in [-1, 1]: the mean weight of all matched terms,
/// 0.0 when nothing matches.
pub fn polarity(title: &str) -> f64 {
    let lower = title.to_lowercase();

    let mut sum = 0.0;
    let mut hits = 0usize;
    for (term, weight) in POSITIVE_TERMS.iter().chain(NEGATIVE_TERMS) {
        if lower.contains(term) {
            sum += weight;
            hits += 1;
        }
    }

    if hits == 0 {
        0.0
    } else {
        (sum / hits as f64).clamp(-1.0, 1.0)
    }
}

/// Whether the headline names a scheduled macro release.
pub fn is_macro_event(title: &str) -> bool {
    let lower = title.to_lowercase();
    MACRO_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Whether the headline matches any positive term.
pub fn has_bullish_term(title: &str) -> bool {
    let lower = title.to_lowercase();
    POSITIVE_TERMS.iter().any(|(term, _)| lower.contains(term))
}

/// Whether the headline matches any negative term.
pub fn has_bearish_term(title: &str) -> bool {
    let lower = title.to_lowercase();
    NEGATIVE_TERMS.iter().any(|(term, _)| lower.contains(term))
}
