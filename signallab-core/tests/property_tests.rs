//! Property tests for indicator invariants.
//!
//! Uses proptest to verify:
//! 1. Length preservation — per-bar transforms emit one value per input
//! 2. Range bounds — RSI and stochastic stay inside [0, 100]
//! 3. MACD identity — histogram == macd - signal at every index
//! 4. Drawdown sign — max drawdown is always reported as a magnitude

use proptest::prelude::*;
use signallab_core::domain::Bar;
use signallab_core::indicators::{
    equity_max_drawdown_pct, macd, max_drawdown_pct, rolling_mean, rsi, stochastic,
};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(10.0..500.0_f64, 2..120)
}

fn arb_window() -> impl Strategy<Value = usize> {
    1..60_usize
}

fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) * 1.01,
                low: open.min(close) * 0.99,
                close,
                volume: 1000,
            }
        })
        .collect()
}

proptest! {
    /// The rolling mean always emits one point per input value, and every
    /// partial-window mean stays between the slice's min and max.
    #[test]
    fn rolling_mean_preserves_length_and_bounds(
        closes in arb_closes(),
        window in arb_window(),
    ) {
        let out = rolling_mean(&closes, window);
        prop_assert_eq!(out.len(), closes.len());

        let lo = closes.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = closes.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        for &m in &out {
            prop_assert!(m >= lo - 1e-9 && m <= hi + 1e-9);
        }
    }

    /// RSI is bounded to [0, 100] regardless of input shape.
    #[test]
    fn rsi_stays_in_range(closes in arb_closes()) {
        let out = rsi(&closes, 14);
        prop_assert_eq!(out.len(), closes.len());
        for &v in &out {
            prop_assert!((0.0..=100.0).contains(&v));
        }
    }

    /// %K and %D are bounded to [0, 100].
    #[test]
    fn stochastic_stays_in_range(closes in arb_closes()) {
        let bars = bars_from_closes(&closes);
        let out = stochastic(&bars, 14, 3);
        for (&k, &d) in out.k.iter().zip(out.d.iter()) {
            prop_assert!((0.0..=100.0).contains(&k));
            prop_assert!((-1e-9..=100.0 + 1e-9).contains(&d));
        }
    }

    /// histogram == macd - signal, index by index.
    #[test]
    fn macd_histogram_identity(closes in arb_closes()) {
        let out = macd(&closes, 12, 26, 9);
        prop_assert_eq!(out.macd.len(), closes.len());
        for i in 0..closes.len() {
            let expect = out.macd[i] - out.signal[i];
            prop_assert!((out.histogram[i] - expect).abs() < 1e-9);
        }
    }

    /// Max drawdown is a non-negative magnitude for any price path.
    #[test]
    fn drawdown_is_a_magnitude(closes in arb_closes()) {
        if let Some(dd) = max_drawdown_pct(&closes) {
            prop_assert!(dd >= 0.0);
            prop_assert!(dd <= 100.0 + 1e-9);
        }
        let dd = equity_max_drawdown_pct(&closes);
        prop_assert!(dd >= 0.0);
    }
}
