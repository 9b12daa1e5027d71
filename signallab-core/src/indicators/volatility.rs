//! Return series and annualized volatility.

/// Daily percentage returns: (close[i] / close[i-1]) - 1. One element
/// shorter than the input; empty for fewer than two closes.
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|w| w[1] / w[0] - 1.0)
        .collect()
}

/// Sample standard deviation (n - 1 denominator). None for fewer than two
/// values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(var.sqrt())
}

/// Annualized volatility in percent over the trailing `period` daily
/// returns: std * sqrt(252) * 100. None when fewer than `period` returns
/// exist (i.e. fewer than `period + 1` closes).
pub fn annualized_volatility(closes: &[f64], period: usize) -> Option<f64> {
    let returns = daily_returns(closes);
    if returns.len() < period {
        return None;
    }
    let tail = &returns[returns.len() - period..];
    sample_std(tail).map(|s| s * 252.0_f64.sqrt() * 100.0)
}
