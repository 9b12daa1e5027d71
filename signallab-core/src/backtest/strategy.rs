//! Trading strategies and their per-bar entry/exit rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::Bar;
use crate::error::EngineError;

/// Bars fed to the signal strategy's light-weight per-bar indicators.
pub const SIGNAL_LOOKBACK: usize = 20;
/// Deltas used by the in-loop RSI.
pub const SIGNAL_RSI_DELTAS: usize = 14;
/// Entry when price sits this far below the long moving average.
pub const SIGNAL_BUY_DISCOUNT: f64 = 0.95;
/// Exit when price runs this far above the long moving average.
pub const SIGNAL_SELL_PREMIUM: f64 = 1.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Mean-reversion entries against the 200-day average, RSI-gated.
    Signal,
    /// One buy at the first bar, held to the end.
    BuyAndHold,
    /// Golden/death crosses of the 20-day against the 200-day average.
    MaCross,
}

impl Strategy {
    /// Fewest bars the strategy can run on after date filtering.
    pub fn min_bars(self) -> usize {
        match self {
            Strategy::Signal => SIGNAL_LOOKBACK + 1,
            Strategy::BuyAndHold => 2,
            Strategy::MaCross => 201,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Signal => "signal",
            Strategy::BuyAndHold => "buy_and_hold",
            Strategy::MaCross => "ma_cross",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "signal" => Ok(Strategy::Signal),
            "buy_and_hold" => Ok(Strategy::BuyAndHold),
            "ma_cross" => Ok(Strategy::MaCross),
            other => Err(EngineError::Configuration(format!(
                "unknown strategy '{other}' (expected signal, buy_and_hold or ma_cross)"
            ))),
        }
    }
}

/// Mean of the closes in `bars[start..end]`.
pub(crate) fn mean_close(bars: &[Bar], start: usize, end: usize) -> f64 {
    let slice = &bars[start..end];
    slice.iter().map(|b| b.close).sum::<f64>() / slice.len() as f64
}

/// Trailing long moving average for bar `i`: the mean of up to 200 closes
/// strictly before the bar. Early bars average whatever history exists.
pub(crate) fn trailing_ma200(bars: &[Bar], i: usize) -> f64 {
    let start = i.saturating_sub(200);
    mean_close(bars, start, i)
}

/// Light-weight RSI over the first `SIGNAL_RSI_DELTAS` deltas of the
/// lookback slice. Neutral 50 with no movement, saturates at 100 when no
/// bar lost ground.
pub(crate) fn signal_rsi(past: &[Bar]) -> f64 {
    let deltas: Vec<f64> = past
        .windows(2)
        .take(SIGNAL_RSI_DELTAS)
        .map(|w| w[1].close - w[0].close)
        .collect();
    if deltas.len() < SIGNAL_RSI_DELTAS {
        return 50.0;
    }
    let gains: f64 = deltas.iter().filter(|d| **d > 0.0).sum();
    let losses: f64 = deltas.iter().filter(|d| **d < 0.0).map(|d| -d).sum();
    if gains == 0.0 && losses == 0.0 {
        return 50.0;
    }
    if losses == 0.0 {
        return 100.0;
    }
    let rs = gains / losses;
    100.0 - 100.0 / (1.0 + rs)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BarSignal {
    Buy,
    Sell,
    Hold,
}

/// Signal-strategy rule for bar `i`: buy deep below the long average when
/// oversold, sell far above it when overbought.
pub(crate) fn signal_bar_signal(bars: &[Bar], i: usize) -> BarSignal {
    let price = bars[i].close;
    let ma200 = trailing_ma200(bars, i);
    let rsi = signal_rsi(&bars[i - SIGNAL_LOOKBACK..i]);
    if price < ma200 * SIGNAL_BUY_DISCOUNT && rsi < 30.0 {
        BarSignal::Buy
    } else if price > ma200 * SIGNAL_SELL_PREMIUM && rsi > 70.0 {
        BarSignal::Sell
    } else {
        BarSignal::Hold
    }
}

/// MA-cross rule for bar `i` (requires `i > 200` so yesterday's short
/// average exists). Windows end at the bar, excluding it.
pub(crate) fn ma_cross_bar_signal(bars: &[Bar], i: usize) -> BarSignal {
    let ma20 = mean_close(bars, i - 20, i);
    let ma200 = mean_close(bars, i - 200, i);
    let prev_ma20 = mean_close(bars, i - 21, i - 1);
    if prev_ma20 <= ma200 && ma20 > ma200 {
        BarSignal::Buy
    } else if prev_ma20 >= ma200 && ma20 < ma200 {
        BarSignal::Sell
    } else {
        BarSignal::Hold
    }
}
