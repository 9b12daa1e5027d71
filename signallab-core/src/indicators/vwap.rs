//! Volume-Weighted Average Price.

use crate::domain::Bar;

/// Cumulative VWAP: running sum of typical price times volume over the
/// running sum of volume. Bars before any volume has traded report NaN.
pub fn vwap(bars: &[Bar]) -> Vec<f64> {
    let mut out = Vec::with_capacity(bars.len());
    let mut pv_sum = 0.0;
    let mut vol_sum = 0.0;
    for bar in bars {
        let vol = bar.volume as f64;
        pv_sum += bar.typical_price() * vol;
        vol_sum += vol;
        out.push(if vol_sum > 0.0 { pv_sum / vol_sum } else { f64::NAN });
    }
    out
}
