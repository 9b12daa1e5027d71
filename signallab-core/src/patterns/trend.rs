//! Long/short-term trend buckets with a 0-100 strength score.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::Bar;
use crate::indicators::rolling_mean;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendBucket {
    StrongUptrend,
    Uptrend,
    Sideways,
    Downtrend,
    StrongDowntrend,
    Unknown,
}

impl TrendBucket {
    fn is_up(self) -> bool {
        matches!(self, TrendBucket::StrongUptrend | TrendBucket::Uptrend)
    }

    fn is_down(self) -> bool {
        matches!(self, TrendBucket::StrongDowntrend | TrendBucket::Downtrend)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaDirection {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breakout {
    HighBreak,
    LowBreak,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongTermTrend {
    pub trend: TrendBucket,
    pub strength: f64,
    /// Price deviation from MA200 in percent, signed.
    pub price_vs_ma200: f64,
    pub ma200_direction: MaDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortTermTrend {
    pub trend: TrendBucket,
    pub strength: f64,
    /// MA20 change over the trailing 10 bars, in percent.
    pub ma20_slope: f64,
    pub breakout: Breakout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub long_term: LongTermTrend,
    pub short_term: ShortTermTrend,
    pub overall: TrendBucket,
}

impl TrendAnalysis {
    fn unknown() -> Self {
        Self {
            long_term: LongTermTrend {
                trend: TrendBucket::Unknown,
                strength: 0.0,
                price_vs_ma200: 0.0,
                ma200_direction: MaDirection::Flat,
            },
            short_term: ShortTermTrend {
                trend: TrendBucket::Unknown,
                strength: 0.0,
                ma20_slope: 0.0,
                breakout: Breakout::None,
            },
            overall: TrendBucket::Unknown,
        }
    }
}

fn long_term(bars: &[Bar], ma200: &[f64]) -> LongTermTrend {
    let n = bars.len();
    let price = bars[n - 1].close;
    let ma_now = ma200[n - 1];
    let ma_prev = ma200[n - 2];
    let deviation = if ma_now > 0.0 {
        (price - ma_now) / ma_now * 100.0
    } else {
        0.0
    };
    let direction = if ma_now > ma_prev {
        MaDirection::Up
    } else if ma_now < ma_prev {
        MaDirection::Down
    } else {
        MaDirection::Flat
    };

    let (trend, strength) = if price > ma_now && direction == MaDirection::Up {
        (TrendBucket::StrongUptrend, (50.0 + deviation.abs()).min(100.0))
    } else if price > ma_now {
        (TrendBucket::Uptrend, (30.0 + deviation.abs() * 0.5).min(100.0))
    } else if price < ma_now && direction == MaDirection::Down {
        (TrendBucket::StrongDowntrend, (50.0 + deviation.abs()).min(100.0))
    } else if price < ma_now {
        (TrendBucket::Downtrend, (30.0 + deviation.abs() * 0.5).min(100.0))
    } else {
        (TrendBucket::Sideways, 20.0)
    };

    LongTermTrend {
        trend,
        strength,
        price_vs_ma200: deviation,
        ma200_direction: direction,
    }
}

fn short_term(bars: &[Bar], ma20: &[f64]) -> ShortTermTrend {
    let n = bars.len();
    let ma_now = ma20[n - 1];
    let ma_back_10 = ma20[n - 11];
    let slope = if ma_back_10 > 0.0 {
        (ma_now - ma_back_10) / ma_back_10 * 100.0
    } else {
        0.0
    };

    // Break of the prior 10-day high/low (the window excluding today's
    // trailing 10 bars' final bar position; today's close vs bars -11..-1).
    let price = bars[n - 1].close;
    let prev_window = &bars[n - 11..n - 1];
    let prev_high = prev_window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let prev_low = prev_window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let breakout = if price > prev_high {
        Breakout::HighBreak
    } else if price < prev_low {
        Breakout::LowBreak
    } else {
        Breakout::None
    };

    let (trend, strength) = if slope > 2.0 {
        (TrendBucket::StrongUptrend, (60.0 + slope.abs()).min(100.0))
    } else if slope > 0.5 {
        (TrendBucket::Uptrend, (40.0 + slope.abs() * 5.0).min(100.0))
    } else if slope < -2.0 {
        (TrendBucket::StrongDowntrend, (60.0 + slope.abs()).min(100.0))
    } else if slope < -0.5 {
        (TrendBucket::Downtrend, (40.0 + slope.abs() * 5.0).min(100.0))
    } else {
        (TrendBucket::Sideways, 20.0)
    };

    ShortTermTrend {
        trend,
        strength,
        ma20_slope: slope,
        breakout,
    }
}

fn combine(long: TrendBucket, short: TrendBucket) -> TrendBucket {
    if long.is_up() && short.is_up() {
        TrendBucket::StrongUptrend
    } else if long.is_up() || short.is_up() {
        TrendBucket::Uptrend
    } else if long.is_down() && short.is_down() {
        TrendBucket::StrongDowntrend
    } else if long.is_down() || short.is_down() {
        TrendBucket::Downtrend
    } else {
        TrendBucket::Sideways
    }
}

/// Trend analysis from price-vs-MA200 (long) and the MA20 slope over a
/// trailing 10-bar window (short). Needs at least 200 bars; shorter
/// histories come back unknown.
pub fn analyze_trend(bars: &[Bar]) -> TrendAnalysis {
    if bars.len() < 200 {
        warn!(bars = bars.len(), "too few bars for trend analysis");
        return TrendAnalysis::unknown();
    }
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ma20 = rolling_mean(&closes, 20);
    let ma200 = rolling_mean(&closes, 200);

    let long = long_term(bars, &ma200);
    let short = short_term(bars, &ma20);
    let overall = combine(long.trend, short.trend);
    TrendAnalysis {
        long_term: long,
        short_term: short,
        overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{make_bars, make_flat_bars};

    #[test]
    fn short_history_is_unknown() {
        let out = analyze_trend(&make_flat_bars(100.0, 100));
        assert_eq!(out.overall, TrendBucket::Unknown);
    }

    #[test]
    fn steady_rise_is_a_strong_uptrend() {
        let closes: Vec<f64> = (0..250).map(|i| 100.0 + i as f64).collect();
        let out = analyze_trend(&make_bars(&closes));
        assert_eq!(out.long_term.trend, TrendBucket::StrongUptrend);
        assert_eq!(out.long_term.ma200_direction, MaDirection::Up);
        assert_eq!(out.short_term.breakout, Breakout::None);
        assert_eq!(out.overall, TrendBucket::StrongUptrend);
        assert!(out.long_term.strength > 50.0);
    }

    #[test]
    fn steady_fall_is_a_strong_downtrend() {
        let closes: Vec<f64> = (0..250).map(|i| 400.0 - i as f64).collect();
        let out = analyze_trend(&make_bars(&closes));
        assert_eq!(out.long_term.trend, TrendBucket::StrongDowntrend);
        assert_eq!(out.overall, TrendBucket::StrongDowntrend);
    }

    #[test]
    fn flat_series_is_sideways() {
        let out = analyze_trend(&make_flat_bars(100.0, 250));
        assert_eq!(out.long_term.trend, TrendBucket::Sideways);
        assert_eq!(out.short_term.trend, TrendBucket::Sideways);
        assert_eq!(out.overall, TrendBucket::Sideways);
    }

    #[test]
    fn spike_above_prior_range_flags_a_high_break() {
        let mut closes = vec![100.0; 249];
        closes.push(130.0);
        let out = analyze_trend(&make_bars(&closes));
        assert_eq!(out.short_term.breakout, Breakout::HighBreak);
    }
}
