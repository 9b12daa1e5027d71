//! Pure windowed transforms of a bar sequence into derived series.
//!
//! Every function here is side-effect free: bars (or closes) in, numeric
//! series out. Two window edge policies coexist, both documented per
//! indicator:
//!
//! - partial-window (minimum periods 1): indices below the window size
//!   average over the bars seen so far — output length always equals input
//!   length, no NaN for finite inputs (MA, RSI, Stochastic, ATR);
//! - strict window: indices below the window size are `f64::NAN` and the
//!   caller drops them (Bollinger, CCI, ADX).
//!
//! Caching and date attachment happen one level up, in `engine`.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod cci;
pub mod drawdown;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod risk;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod volatility;
pub mod vwap;

pub use adx::{adx, AdxSeries};
pub use atr::{atr, true_range};
pub use bollinger::{bollinger, BollingerSeries};
pub use cci::cci;
pub use drawdown::{equity_max_drawdown_pct, max_drawdown_pct};
pub use ema::ema;
pub use macd::{macd, MacdSeries};
pub use obv::obv;
pub use risk::{risk_score, RiskGrade, RiskScore};
pub use rsi::rsi;
pub use sma::{rolling_mean, rolling_mean_strict};
pub use stochastic::{stochastic, StochasticSeries};
pub use volatility::{annualized_volatility, daily_returns, sample_std};
pub use vwap::vwap;

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev close (or close for the first bar),
/// high = max(open, close) + 1.0, low = min(open, close) - 1.0, volume 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Flat bars where open == high == low == close, for edge-case scenarios.
#[cfg(test)]
pub fn make_flat_bars(price: f64, count: usize) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    (0..count)
        .map(|i| Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open: price,
            high: price,
            low: price,
            close: price,
            volume: 1000,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
