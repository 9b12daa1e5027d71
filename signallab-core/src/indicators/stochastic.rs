//! Stochastic oscillator (%K / %D).

use crate::domain::Bar;

use super::sma::rolling_mean;

/// %K and %D, aligned with the input bars.
#[derive(Debug, Clone)]
pub struct StochasticSeries {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

/// Fast stochastic with partial windows for the high/low extremes and a
/// partial-window mean for %D. Bars where the window high equals the window
/// low report %K = 50.0 instead of dividing by zero.
pub fn stochastic(bars: &[Bar], k_period: usize, d_period: usize) -> StochasticSeries {
    assert!(k_period > 0 && d_period > 0, "periods must be positive");
    let mut k = Vec::with_capacity(bars.len());
    for i in 0..bars.len() {
        let start = (i + 1).saturating_sub(k_period);
        let window = &bars[start..=i];
        let lowest = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let highest = window
            .iter()
            .map(|b| b.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let range = highest - lowest;
        if range == 0.0 {
            k.push(50.0);
        } else {
            k.push(100.0 * (bars[i].close - lowest) / range);
        }
    }
    let d = rolling_mean(&k, d_period);
    StochasticSeries { k, d }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, make_flat_bars, DEFAULT_EPSILON};

    #[test]
    fn close_at_window_high_gives_high_k() {
        let bars = make_bars(&[100.0, 102.0, 104.0, 106.0, 108.0]);
        let out = stochastic(&bars, 5, 3);
        // Highs carry a +1.0 margin, so %K approaches but does not hit 100.
        assert!(*out.k.last().unwrap() > 80.0);
    }

    #[test]
    fn zero_range_window_reports_fifty() {
        let bars = make_flat_bars(100.0, 10);
        let out = stochastic(&bars, 5, 3);
        for v in out.k {
            assert_approx(v, 50.0, DEFAULT_EPSILON);
        }
        for v in out.d {
            assert_approx(v, 50.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn k_is_bounded() {
        let bars = make_bars(&[100.0, 95.0, 103.0, 98.0, 107.0, 101.0, 94.0, 110.0]);
        let out = stochastic(&bars, 5, 3);
        for v in out.k {
            assert!((0.0..=100.0).contains(&v), "%K out of bounds: {v}");
        }
    }

    #[test]
    fn d_smooths_k() {
        let bars = make_bars(&[100.0, 110.0, 90.0, 112.0, 88.0, 115.0]);
        let out = stochastic(&bars, 3, 3);
        assert_approx(
            out.d[5],
            (out.k[3] + out.k[4] + out.k[5]) / 3.0,
            DEFAULT_EPSILON,
        );
    }

    #[test]
    fn lengths_match_input() {
        let bars = make_bars(&[100.0, 101.0]);
        let out = stochastic(&bars, 14, 3);
        assert_eq!(out.k.len(), 2);
        assert_eq!(out.d.len(), 2);
    }
}
