//! Average Directional Index with directional indicators.

use crate::domain::Bar;

use super::atr::true_range;
use super::sma::rolling_mean_strict;

/// ADX, +DI and -DI, aligned with the input bars. Strict windows leave the
/// warmup region NaN: DI needs `period` directional moves and ADX needs a
/// further `period` DX values on top of that.
#[derive(Debug, Clone)]
pub struct AdxSeries {
    pub adx: Vec<f64>,
    pub di_plus: Vec<f64>,
    pub di_minus: Vec<f64>,
}

pub fn adx(bars: &[Bar], period: usize) -> AdxSeries {
    assert!(period > 0, "period must be positive");
    let n = bars.len();
    let tr = true_range(bars);
    let mut dm_plus = Vec::with_capacity(n);
    let mut dm_minus = Vec::with_capacity(n);
    for i in 0..n {
        if i == 0 {
            dm_plus.push(f64::NAN);
            dm_minus.push(f64::NAN);
            continue;
        }
        let up = bars[i].high - bars[i - 1].high;
        let down = bars[i - 1].low - bars[i].low;
        dm_plus.push(if up > down && up > 0.0 { up } else { 0.0 });
        dm_minus.push(if down > up && down > 0.0 { down } else { 0.0 });
    }
    let tr_s = rolling_mean_strict(&tr, period);
    let dm_plus_s = rolling_mean_strict(&dm_plus, period);
    let dm_minus_s = rolling_mean_strict(&dm_minus, period);

    let mut di_plus = Vec::with_capacity(n);
    let mut di_minus = Vec::with_capacity(n);
    let mut dx = Vec::with_capacity(n);
    for i in 0..n {
        let (dp, dm) = if tr_s[i].is_nan() || tr_s[i] == 0.0 {
            (f64::NAN, f64::NAN)
        } else {
            (
                100.0 * dm_plus_s[i] / tr_s[i],
                100.0 * dm_minus_s[i] / tr_s[i],
            )
        };
        di_plus.push(dp);
        di_minus.push(dm);
        let denom = dp + dm;
        if denom.is_nan() || denom == 0.0 {
            dx.push(f64::NAN);
        } else {
            dx.push(100.0 * (dp - dm).abs() / denom);
        }
    }
    let adx = rolling_mean_strict(&dx, period);
    AdxSeries {
        adx,
        di_plus,
        di_minus,
    }
}
