//! Golden/death cross detection between moving-average pairs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::Bar;
use crate::indicators::rolling_mean;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossDirection {
    Golden,
    Death,
}

/// A single crossing between a fast and a slow moving average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossEvent {
    pub date: NaiveDate,
    pub fast_ma: String,
    pub slow_ma: String,
    pub direction: CrossDirection,
}

/// Latest-bar state for one MA pair: did a cross land on the most recent
/// bar, and which side is the fast average on now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairCross {
    pub golden_cross: bool,
    pub death_cross: bool,
    pub cross_date: Option<NaiveDate>,
    /// "bullish" while fast > slow, "bearish" while fast < slow, "none"
    /// when equal or undetermined.
    pub trend: String,
}

impl Default for PairCross {
    fn default() -> Self {
        Self {
            golden_cross: false,
            death_cross: false,
            cross_date: None,
            trend: "none".to_string(),
        }
    }
}

/// Both crossing signals the scorer consumes, plus the trailing event list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtendedCrosses {
    pub ma50_ma200: PairCross,
    pub ma20_ma60: PairCross,
    pub recent_crosses: Vec<CrossEvent>,
}

/// Every cross in the series for one MA pair. A golden cross at bar i
/// means fast was below slow at i-1 and above at i; death is the mirror.
/// The two are mutually exclusive on any given date.
pub fn cross_events(
    bars: &[Bar],
    fast_window: usize,
    slow_window: usize,
) -> Vec<CrossEvent> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let fast = rolling_mean(&closes, fast_window);
    let slow = rolling_mean(&closes, slow_window);
    let mut events = Vec::new();
    for i in 1..bars.len() {
        let direction = if fast[i - 1] < slow[i - 1] && fast[i] > slow[i] {
            Some(CrossDirection::Golden)
        } else if fast[i - 1] > slow[i - 1] && fast[i] < slow[i] {
            Some(CrossDirection::Death)
        } else {
            None
        };
        if let Some(direction) = direction {
            events.push(CrossEvent {
                date: bars[i].date,
                fast_ma: format!("MA{fast_window}"),
                slow_ma: format!("MA{slow_window}"),
                direction,
            });
        }
    }
    events
}

fn pair_state(bars: &[Bar], fast_window: usize, slow_window: usize) -> PairCross {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let fast = rolling_mean(&closes, fast_window);
    let slow = rolling_mean(&closes, slow_window);
    let n = bars.len();
    if n < 2 {
        return PairCross::default();
    }

    let mut out = PairCross::default();
    if fast[n - 2] < slow[n - 2] && fast[n - 1] > slow[n - 1] {
        out.golden_cross = true;
        out.trend = "bullish".to_string();
        out.cross_date = Some(bars[n - 1].date);
    } else if fast[n - 2] > slow[n - 2] && fast[n - 1] < slow[n - 1] {
        out.death_cross = true;
        out.trend = "bearish".to_string();
        out.cross_date = Some(bars[n - 1].date);
    } else if fast[n - 1] > slow[n - 1] {
        out.trend = "bullish".to_string();
    } else if fast[n - 1] < slow[n - 1] {
        out.trend = "bearish".to_string();
    }
    out
}

/// The two configured pairs (MA50/MA200 and MA20/MA60), evaluated
/// independently and never merged. Needs at least 200 bars; shorter
/// histories produce the neutral default.
pub fn detect_crosses_extended(bars: &[Bar]) -> ExtendedCrosses {
    if bars.len() < 200 {
        warn!(bars = bars.len(), "too few bars for cross detection");
        return ExtendedCrosses::default();
    }
    let mut recent: Vec<CrossEvent> = cross_events(bars, 50, 200);
    recent.extend(cross_events(bars, 20, 60));
    recent.sort_by_key(|e| e.date);
    let keep = recent.len().saturating_sub(5);
    ExtendedCrosses {
        ma50_ma200: pair_state(bars, 50, 200),
        ma20_ma60: pair_state(bars, 20, 60),
        recent_crosses: recent.split_off(keep),
    }
}
