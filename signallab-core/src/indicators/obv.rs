//! On-Balance Volume.

use crate::domain::Bar;

/// Cumulative signed volume: volume is added on an up close, subtracted on
/// a down close and ignored on an unchanged close. Starts at zero.
pub fn obv(bars: &[Bar]) -> Vec<f64> {
    let mut out = Vec::with_capacity(bars.len());
    let mut running = 0.0;
    for (i, bar) in bars.iter().enumerate() {
        if i > 0 {
            let prev_close = bars[i - 1].close;
            if bar.close > prev_close {
                running += bar.volume as f64;
            } else if bar.close < prev_close {
                running -= bar.volume as f64;
            }
        }
        out.push(running);
    }
    out
}
