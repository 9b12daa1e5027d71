//! Per-bar candlestick classification.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandlePattern {
    Hammer,
    Doji,
    BullishEngulfing,
    BearishEngulfing,
    MorningStar,
    EveningStar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandleSignal {
    Bullish,
    Bearish,
    Neutral,
}

impl CandlePattern {
    pub fn signal(self) -> CandleSignal {
        match self {
            CandlePattern::Hammer
            | CandlePattern::BullishEngulfing
            | CandlePattern::MorningStar => CandleSignal::Bullish,
            CandlePattern::BearishEngulfing | CandlePattern::EveningStar => CandleSignal::Bearish,
            CandlePattern::Doji => CandleSignal::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternHit {
    pub date: NaiveDate,
    pub pattern: CandlePattern,
    pub signal: CandleSignal,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CandleScan {
    pub hits: Vec<PatternHit>,
    pub bullish_count: usize,
    pub bearish_count: usize,
}

impl CandleScan {
    /// The trailing `n` hits.
    pub fn recent(&self, n: usize) -> &[PatternHit] {
        &self.hits[self.hits.len().saturating_sub(n)..]
    }
}

/// First matching rule wins; a bar is tagged with at most one pattern.
/// Rule order: Hammer, Doji, Bullish/Bearish Engulfing, Morning/Evening
/// Star.
pub fn classify(prev2: &Bar, prev: &Bar, bar: &Bar) -> Option<CandlePattern> {
    let body = (bar.close - bar.open).abs();
    let upper_shadow = bar.high - bar.open.max(bar.close);
    let lower_shadow = bar.open.min(bar.close) - bar.low;
    let total_range = bar.high - bar.low;

    if lower_shadow > 2.0 * body && upper_shadow < 0.1 * body && bar.close > bar.open {
        Some(CandlePattern::Hammer)
    } else if body < 0.1 * total_range {
        Some(CandlePattern::Doji)
    } else if prev.close < prev.open
        && bar.close > bar.open
        && bar.open < prev.close
        && bar.close > prev.open
    {
        Some(CandlePattern::BullishEngulfing)
    } else if prev.close > prev.open
        && bar.close < bar.open
        && bar.open > prev.close
        && bar.close < prev.open
    {
        Some(CandlePattern::BearishEngulfing)
    } else if prev2.close < prev2.open
        && prev.close < prev2.close
        && bar.close > prev2.close
        && bar.close > bar.open
    {
        Some(CandlePattern::MorningStar)
    } else if prev2.close > prev2.open
        && prev.close > prev2.close
        && bar.close < prev2.close
        && bar.close < bar.open
    {
        Some(CandlePattern::EveningStar)
    } else {
        None
    }
}

/// Scan the whole history, tallying bullish and bearish hits. The first
/// two bars cannot be classified (three-bar shapes need context). Fewer
/// than three bars scans to nothing.
pub fn scan_candles(bars: &[Bar]) -> CandleScan {
    let mut scan = CandleScan::default();
    for i in 2..bars.len() {
        if let Some(pattern) = classify(&bars[i - 2], &bars[i - 1], &bars[i]) {
            let signal = pattern.signal();
            match signal {
                CandleSignal::Bullish => scan.bullish_count += 1,
                CandleSignal::Bearish => scan.bearish_count += 1,
                CandleSignal::Neutral => {}
            }
            scan.hits.push(PatternHit {
                date: bars[i].date,
                pattern,
                signal,
                price: bars[i].close,
            });
        }
    }
    scan
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            open,
            high,
            low,
            close,
            volume: 1000,
        }
    }

    fn plain_up() -> Bar {
        bar(100.0, 103.0, 99.5, 102.5)
    }

    #[test]
    fn hammer_needs_long_lower_shadow_and_up_close() {
        let hammer = bar(100.0, 101.05, 95.0, 101.0);
        assert_eq!(
            classify(&plain_up(), &plain_up(), &hammer),
            Some(CandlePattern::Hammer)
        );
    }

    #[test]
    fn doji_has_a_tiny_body() {
        let doji = bar(100.0, 102.0, 98.0, 100.1);
        assert_eq!(
            classify(&plain_up(), &plain_up(), &doji),
            Some(CandlePattern::Doji)
        );
    }

    #[test]
    fn bullish_engulfing_reverses_the_prior_body() {
        let prev = bar(102.0, 102.5, 99.0, 100.0); // down day
        let cur = bar(99.5, 104.0, 99.0, 103.0); // swallows it upward
        assert_eq!(
            classify(&plain_up(), &prev, &cur),
            Some(CandlePattern::BullishEngulfing)
        );
    }

    #[test]
    fn bearish_engulfing_is_the_mirror() {
        let prev = bar(100.0, 102.5, 99.5, 102.0); // up day
        let cur = bar(102.5, 103.0, 98.0, 99.0);
        assert_eq!(
            classify(&plain_up(), &prev, &cur),
            Some(CandlePattern::BearishEngulfing)
        );
    }

    #[test]
    fn morning_star_recovers_a_two_bar_decline() {
        let prev2 = bar(105.0, 105.5, 99.0, 100.0); // down day
        let prev = bar(99.0, 99.5, 97.0, 98.0); // gap lower
        let cur = bar(98.5, 103.0, 98.0, 102.0); // strong up close
        assert_eq!(
            classify(&prev2, &prev, &cur),
            Some(CandlePattern::MorningStar)
        );
    }

    #[test]
    fn scan_tallies_signals() {
        let bars = vec![
            plain_up(),
            bar(102.0, 102.5, 99.0, 100.0),
            bar(99.5, 104.0, 99.0, 103.0), // bullish engulfing
        ];
        let scan = scan_candles(&bars);
        assert_eq!(scan.bullish_count, 1);
        assert_eq!(scan.bearish_count, 0);
        assert_eq!(scan.hits.len(), 1);
        assert_eq!(scan.recent(5).len(), 1);
    }

    #[test]
    fn too_few_bars_scan_to_nothing() {
        let scan = scan_candles(&[plain_up(), plain_up()]);
        assert!(scan.hits.is_empty());
    }
}
