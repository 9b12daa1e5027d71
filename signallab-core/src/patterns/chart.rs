//! Chart-pattern heuristics: box ranges, wedges, triangles, Bollinger
//! touches and spike days.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::Bar;
use crate::indicators::sample_std;

pub const PATTERN_WINDOW: usize = 60;
const BOX_WINDOW: usize = 20;
const SPIKE_THRESHOLD_PCT: f64 = 8.0;
const SPIKE_REPORT_CAP: usize = 10;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoxRange {
    pub detected: bool,
    pub support: f64,
    pub resistance: f64,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WedgeKind {
    Rising,
    Falling,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wedge {
    pub kind: WedgeKind,
    pub detected: bool,
    /// "bullish" for rising, "bearish" for falling, "none" otherwise.
    pub trend: String,
}

impl Default for Wedge {
    fn default() -> Self {
        Self {
            kind: WedgeKind::None,
            detected: false,
            trend: "none".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriangleKind {
    Ascending,
    Descending,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakoutDirection {
    Up,
    Down,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub kind: TriangleKind,
    pub detected: bool,
    pub breakout_direction: BreakoutDirection,
}

impl Default for Triangle {
    fn default() -> Self {
        Self {
            kind: TriangleKind::None,
            detected: false,
            breakout_direction: BreakoutDirection::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandPosition {
    Upper,
    Lower,
    Middle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerTouch {
    pub upper_touch: bool,
    pub lower_touch: bool,
    pub position: BandPosition,
}

impl Default for BollingerTouch {
    fn default() -> Self {
        Self {
            upper_touch: false,
            lower_touch: false,
            position: BandPosition::Middle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpikeKind {
    SpikeUp,
    SpikeDown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpikeDay {
    pub date: NaiveDate,
    pub change_pct: f64,
    pub kind: SpikeKind,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartPatterns {
    pub box_range: BoxRange,
    pub wedge: Wedge,
    pub triangle: Triangle,
    pub bollinger: BollingerTouch,
    pub spike_days: Vec<SpikeDay>,
}

fn window_high(bars: &[Bar]) -> f64 {
    bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max)
}

fn window_low(bars: &[Bar]) -> f64 {
    bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min)
}

/// Box when the trailing 20-day high-low range is under 15% of its floor.
fn box_range(bars: &[Bar]) -> BoxRange {
    let tail = &bars[bars.len() - BOX_WINDOW..];
    let support = window_low(tail);
    let resistance = window_high(tail);
    let width = resistance - support;
    let range_pct = if support > 0.0 {
        width / support * 100.0
    } else {
        0.0
    };
    BoxRange {
        detected: range_pct < 15.0,
        support,
        resistance,
        width,
    }
}

/// Rising wedge: the two 30-bar halves share a high (within 5%) while the
/// later half's low climbs 5%+. Falling wedge is the mirror.
fn wedge(tail: &[Bar]) -> Wedge {
    let (first, second) = tail.split_at(30);
    let first_high = window_high(first);
    let second_high = window_high(second);
    let first_low = window_low(first);
    let second_low = window_low(second);

    if (first_high - second_high).abs() < first_high * 0.05 && second_low > first_low * 1.05 {
        Wedge {
            kind: WedgeKind::Rising,
            detected: true,
            trend: "bullish".to_string(),
        }
    } else if (first_low - second_low).abs() < first_low * 0.05
        && second_high < first_high * 0.95
    {
        Wedge {
            kind: WedgeKind::Falling,
            detected: true,
            trend: "bearish".to_string(),
        }
    } else {
        Wedge::default()
    }
}

/// Triangle from the first and last 20-bar sub-windows: flat highs with
/// moving lows is ascending, flat lows with moving highs is descending.
/// Breakout direction compares the latest price to the late sub-window.
fn triangle(tail: &[Bar], current_price: f64) -> Triangle {
    let early = &tail[..20];
    let late = &tail[tail.len() - 20..];
    let early_high = window_high(early);
    let late_high = window_high(late);
    let early_low = window_low(early);
    let late_low = window_low(late);

    let highs_flat = (early_high - late_high).abs() < early_high * 0.1;
    let lows_flat = (early_low - late_low).abs() < early_low * 0.1;

    let kind = if highs_flat && !lows_flat {
        TriangleKind::Ascending
    } else if !highs_flat && lows_flat {
        TriangleKind::Descending
    } else {
        return Triangle::default();
    };
    let breakout_direction = if current_price > late_high {
        BreakoutDirection::Up
    } else if current_price < late_low {
        BreakoutDirection::Down
    } else {
        BreakoutDirection::None
    };
    Triangle {
        kind,
        detected: true,
        breakout_direction,
    }
}

/// Touch when the price is within 2% of either band of a 20-bar, 2-sigma
/// Bollinger envelope.
fn bollinger_touch(bars: &[Bar], current_price: f64) -> BollingerTouch {
    let closes: Vec<f64> = bars[bars.len() - 20..].iter().map(|b| b.close).collect();
    let sma = closes.iter().sum::<f64>() / closes.len() as f64;
    let std = match sample_std(&closes) {
        Some(s) => s,
        None => return BollingerTouch::default(),
    };
    let upper = sma + 2.0 * std;
    let lower = sma - 2.0 * std;

    let upper_touch = current_price >= upper * 0.98;
    let lower_touch = current_price <= lower * 1.02;
    let position = if upper_touch {
        BandPosition::Upper
    } else if lower_touch {
        BandPosition::Lower
    } else {
        BandPosition::Middle
    };
    BollingerTouch {
        upper_touch,
        lower_touch,
        position,
    }
}

/// Days whose close moved 8% or more against the prior close, within the
/// trailing `window` bars.
pub fn spike_days(bars: &[Bar], window: usize) -> Vec<SpikeDay> {
    let start = bars.len().saturating_sub(window);
    let tail = &bars[start..];
    let mut out = Vec::new();
    for i in 1..tail.len() {
        let prev_close = tail[i - 1].close;
        if prev_close <= 0.0 {
            continue;
        }
        let change_pct = (tail[i].close - prev_close) / prev_close * 100.0;
        if change_pct.abs() >= SPIKE_THRESHOLD_PCT {
            out.push(SpikeDay {
                date: tail[i].date,
                change_pct,
                kind: if change_pct > 0.0 {
                    SpikeKind::SpikeUp
                } else {
                    SpikeKind::SpikeDown
                },
                price: tail[i].close,
            });
        }
    }
    out
}

/// All chart-pattern heuristics over the trailing 60-bar window. Needs at
/// least 60 bars; shorter histories produce the neutral default.
pub fn detect_chart_patterns(bars: &[Bar]) -> ChartPatterns {
    if bars.len() < PATTERN_WINDOW {
        warn!(bars = bars.len(), "too few bars for chart patterns");
        return ChartPatterns::default();
    }
    let tail = &bars[bars.len() - PATTERN_WINDOW..];
    let current_price = bars[bars.len() - 1].close;
    let mut spikes = spike_days(bars, PATTERN_WINDOW);
    if spikes.len() > SPIKE_REPORT_CAP {
        spikes.drain(..spikes.len() - SPIKE_REPORT_CAP);
    }
    ChartPatterns {
        box_range: box_range(bars),
        wedge: wedge(tail),
        triangle: triangle(tail, current_price),
        bollinger: bollinger_touch(bars, current_price),
        spike_days: spikes,
    }
}
