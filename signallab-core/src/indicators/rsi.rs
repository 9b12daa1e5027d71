//! Relative Strength Index over rolling mean gains and losses.

/// RSI using rolling means of gains and losses with partial windows.
///
/// Edge policy:
/// - index 0 has no delta and reports the neutral 50.0;
/// - windows with some gain but zero loss saturate to 100.0 (all loss and
///   zero gain falls out of the formula as 0.0);
/// - windows where gain and loss are both zero (flat prices) report 50.0.
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    assert!(period > 0, "period must be positive");
    let mut out = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return out;
    }
    out.push(50.0);
    for i in 1..closes.len() {
        // Deltas live at indices 1..=i; take the trailing `period` of them.
        let start = i.saturating_sub(period - 1).max(1);
        let count = (i - start + 1) as f64;
        let mut gain = 0.0;
        let mut loss = 0.0;
        for j in start..=i {
            let delta = closes[j] - closes[j - 1];
            if delta > 0.0 {
                gain += delta;
            } else {
                loss -= delta;
            }
        }
        let avg_gain = gain / count;
        let avg_loss = loss / count;
        let value = if avg_gain == 0.0 && avg_loss == 0.0 {
            50.0
        } else if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        };
        out.push(value);
    }
    out
}
