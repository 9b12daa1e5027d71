//! Commodity Channel Index.

use crate::domain::Bar;

/// CCI over the typical price with a strict window: NaN until `period` bars
/// exist. Windows with zero mean absolute deviation (flat prices) report 0.
pub fn cci(bars: &[Bar], period: usize) -> Vec<f64> {
    assert!(period > 0, "period must be positive");
    let tp: Vec<f64> = bars.iter().map(Bar::typical_price).collect();
    let mut out = Vec::with_capacity(bars.len());
    for i in 0..tp.len() {
        if i + 1 < period {
            out.push(f64::NAN);
            continue;
        }
        let window = &tp[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        let mad = window.iter().map(|v| (v - mean).abs()).sum::<f64>() / period as f64;
        if mad == 0.0 {
            out.push(0.0);
        } else {
            out.push((tp[i] - mean) / (0.015 * mad));
        }
    }
    out
}
