//! Moving Average Convergence Divergence.

use super::ema::ema;

/// MACD line, signal line and histogram, all aligned with the input.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// MACD from first-value-seeded EMAs: macd = EMA(fast) - EMA(slow),
/// signal = EMA(macd, signal_span), histogram = macd - signal.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal_span: usize) -> MacdSeries {
    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);
    let macd: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();
    let signal = ema(&macd, signal_span);
    let histogram: Vec<f64> = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();
    MacdSeries {
        macd,
        signal,
        histogram,
    }
}
