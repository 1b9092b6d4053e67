// =============================================================================
// Correlation Engine — Pearson coefficient over the aligned table
// =============================================================================
//
//   r = cov(X, Y) / (std(X) * std(Y))
//
// Computed over rows where BOTH sentiment and close are present, using
// population moments throughout (the n factors cancel, so only consistency
// matters). A degenerate input — fewer than 2 contributing rows, or a
// constant series — yields an absent coefficient, never zero and never an
// error: callers must be able to tell "undefined" from "no association".
// =============================================================================

use crate::types::AlignedRow;

/// Result of correlating sentiment with price over an aligned table.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationResult {
    /// Pearson coefficient in [-1, 1], or `None` when undefined.
    pub coefficient: Option<f64>,
    /// How many rows actually contributed (both fields present).
    pub sample_count: usize,
    /// The full aligned table the coefficient was computed from.
    pub rows: Vec<AlignedRow>,
}

/// Compute the Pearson correlation between the sentiment and close columns
/// of `rows`, restricted to rows where both are present.
///
/// The full-precision values are used directly; any display rounding is a
/// presentation concern applied elsewhere.
pub fn correlate(rows: Vec<AlignedRow>) -> CorrelationResult {
    let pairs: Vec<(f64, f64)> = rows
        .iter()
        .filter_map(|r| Some((r.sentiment?, r.close?)))
        .collect();

    CorrelationResult {
        coefficient: pearson(&pairs),
        sample_count: pairs.len(),
        rows,
    }
}

/// Pearson coefficient of a paired sample, `None` when undefined.
fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    // A constant series has zero variance: the coefficient is undefined.
    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }

    let r = cov / denom;
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}
