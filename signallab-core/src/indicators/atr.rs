//! True range and Average True Range.

use crate::domain::Bar;

use super::sma::rolling_mean;

/// True range per bar. The first bar has no prior close and uses
/// high - low; later bars take the max of (high - low),
/// |high - prev close| and |low - prev close|.
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let mut out = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let hl = bar.high - bar.low;
        let tr = if i == 0 {
            hl
        } else {
            let prev_close = bars[i - 1].close;
            hl.max((bar.high - prev_close).abs())
                .max((bar.low - prev_close).abs())
        };
        out.push(tr);
    }
    out
}

/// ATR as a partial-window rolling mean of true range.
pub fn atr(bars: &[Bar], period: usize) -> Vec<f64> {
    rolling_mean(&true_range(bars), period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, make_flat_bars, DEFAULT_EPSILON};

    #[test]
    fn first_bar_uses_high_minus_low() {
        let bars = make_bars(&[100.0, 105.0]);
        let tr = true_range(&bars);
        assert_approx(tr[0], bars[0].high - bars[0].low, DEFAULT_EPSILON);
    }

    #[test]
    fn gap_up_widens_true_range() {
        let mut bars = make_bars(&[100.0, 100.0]);
        // Gap the second bar far above the first close.
        bars[1].open = 120.0;
        bars[1].high = 125.0;
        bars[1].low = 118.0;
        bars[1].close = 122.0;
        let tr = true_range(&bars);
        assert_approx(tr[1], 25.0, DEFAULT_EPSILON); // high - prev close
    }

    #[test]
    fn flat_bars_have_zero_atr() {
        let bars = make_flat_bars(100.0, 20);
        for v in atr(&bars, 14) {
            assert_approx(v, 0.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn atr_length_matches_input() {
        let bars = make_bars(&[100.0, 101.0, 99.0]);
        assert_eq!(atr(&bars, 14).len(), 3);
    }
}
