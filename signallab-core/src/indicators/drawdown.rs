//! Maximum drawdown, for price histories and equity curves.
//!
//! Both functions report the drawdown magnitude as a positive percent:
//! a series that fell 25% from its peak reads 25.0.

use super::volatility::daily_returns;

/// Maximum drawdown over a close series, in percent (>= 0).
///
/// Builds the cumulative return path from daily returns, tracks its running
/// peak and reports the deepest peak-to-trough drop. None for fewer than
/// two closes.
pub fn max_drawdown_pct(closes: &[f64]) -> Option<f64> {
    let returns = daily_returns(closes);
    if returns.is_empty() {
        return None;
    }
    let mut cumulative = 1.0;
    let mut peak = 1.0_f64;
    let mut worst = 0.0_f64;
    for r in returns {
        cumulative *= 1.0 + r;
        peak = peak.max(cumulative);
        worst = worst.max((peak - cumulative) / peak);
    }
    Some(worst * 100.0)
}

/// Maximum drawdown over an equity curve, in percent (>= 0).
/// Zero for an empty or never-declining curve.
pub fn equity_max_drawdown_pct(equity: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &v in equity {
        peak = peak.max(v);
        if peak > 0.0 {
            worst = worst.max((peak - v) / peak);
        }
    }
    worst * 100.0
}
