//! Bollinger Bands.

use super::sma::rolling_mean_strict;
use super::volatility::sample_std;

/// Upper, middle and lower bands plus bandwidth, NaN until a full window.
#[derive(Debug, Clone)]
pub struct BollingerSeries {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
    pub width: Vec<f64>,
}

/// Bands at `middle +/- multiplier * std` using the sample standard
/// deviation over a strict window. Width is (upper - lower) / middle, NaN
/// when the middle band is zero.
pub fn bollinger(closes: &[f64], period: usize, multiplier: f64) -> BollingerSeries {
    assert!(period > 1, "period must exceed 1");
    let middle = rolling_mean_strict(closes, period);
    let mut upper = Vec::with_capacity(closes.len());
    let mut lower = Vec::with_capacity(closes.len());
    let mut width = Vec::with_capacity(closes.len());
    for i in 0..closes.len() {
        if middle[i].is_nan() {
            upper.push(f64::NAN);
            lower.push(f64::NAN);
            width.push(f64::NAN);
            continue;
        }
        let window = &closes[i + 1 - period..=i];
        // A full window of finite values always has a sample std.
        let std = sample_std(window).unwrap_or(f64::NAN);
        let up = middle[i] + multiplier * std;
        let lo = middle[i] - multiplier * std;
        upper.push(up);
        lower.push(lo);
        width.push(if middle[i] != 0.0 {
            (up - lo) / middle[i]
        } else {
            f64::NAN
        });
    }
    BollingerSeries {
        upper,
        middle,
        lower,
        width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn bands_are_nan_before_full_window() {
        let closes: Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
        let out = bollinger(&closes, 20, 2.0);
        assert!(out.middle[18].is_nan());
        assert!(!out.middle[19].is_nan());
    }

    #[test]
    fn constant_series_collapses_bands() {
        let out = bollinger(&[100.0; 25], 20, 2.0);
        assert_approx(out.upper[24], 100.0, DEFAULT_EPSILON);
        assert_approx(out.lower[24], 100.0, DEFAULT_EPSILON);
        assert_approx(out.width[24], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bands_bracket_the_middle() {
        let closes: Vec<f64> = (0..40)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 4.0)
            .collect();
        let out = bollinger(&closes, 20, 2.0);
        for i in 19..closes.len() {
            assert!(out.upper[i] >= out.middle[i]);
            assert!(out.lower[i] <= out.middle[i]);
        }
    }

    #[test]
    fn width_is_band_span_over_middle() {
        let closes: Vec<f64> = (0..22).map(|i| 100.0 + (i % 3) as f64).collect();
        let out = bollinger(&closes, 20, 2.0);
        let i = 21;
        assert_approx(
            out.width[i],
            (out.upper[i] - out.lower[i]) / out.middle[i],
            DEFAULT_EPSILON,
        );
    }
}
