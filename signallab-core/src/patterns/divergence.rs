//! RSI/price divergence over a trailing window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::Bar;
use crate::indicators::rsi;

pub const DEFAULT_WINDOW: usize = 60;
const RSI_PERIOD: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DivergenceKind {
    Bullish,
    Bearish,
    None,
}

/// One extremum: the bar's price extreme and the RSI on that same date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivergencePoint {
    pub date: NaiveDate,
    pub price: f64,
    pub rsi: f64,
}

/// The two rank-2 lows and highs of the window, each ordered by date
/// (first = earlier). The extrema are the window's global rank-2 points,
/// not separated swing points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivergenceResult {
    pub kind: DivergenceKind,
    pub lows: Option<(DivergencePoint, DivergencePoint)>,
    pub highs: Option<(DivergencePoint, DivergencePoint)>,
}

impl DivergenceResult {
    fn none() -> Self {
        Self {
            kind: DivergenceKind::None,
            lows: None,
            highs: None,
        }
    }
}

/// Pick the two extreme bars by `key`, then order that pair by date.
fn rank2_by<F>(bars: &[Bar], rsi: &[f64], key: F, smallest: bool) -> Option<(DivergencePoint, DivergencePoint)>
where
    F: Fn(&Bar) -> f64,
{
    if bars.len() < 2 {
        return None;
    }
    let mut indices: Vec<usize> = (0..bars.len()).collect();
    indices.sort_by(|&a, &b| {
        let ord = key(&bars[a]).partial_cmp(&key(&bars[b])).unwrap_or(std::cmp::Ordering::Equal);
        if smallest {
            ord
        } else {
            ord.reverse()
        }
    });
    let mut pair = [indices[0], indices[1]];
    pair.sort_unstable();
    let point = |i: usize| DivergencePoint {
        date: bars[i].date,
        price: key(&bars[i]),
        rsi: rsi[i],
    };
    Some((point(pair[0]), point(pair[1])))
}

/// Divergence over the trailing `window` bars.
///
/// Bullish: the later low undercuts the earlier low in price while its RSI
/// is higher. Bearish is the mirror on highs, checked only when no bullish
/// divergence was found. Shorter histories than the window report none.
pub fn detect_divergence(bars: &[Bar], window: usize) -> DivergenceResult {
    if bars.len() < window {
        warn!(bars = bars.len(), window, "too few bars for divergence detection");
        return DivergenceResult::none();
    }
    // RSI over the full history so the window's values carry context.
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let rsi_all = rsi(&closes, RSI_PERIOD);
    let tail = &bars[bars.len() - window..];
    let rsi_tail = &rsi_all[bars.len() - window..];

    let lows = rank2_by(tail, rsi_tail, |b| b.low, true);
    let highs = rank2_by(tail, rsi_tail, |b| b.high, false);

    let mut kind = DivergenceKind::None;
    if let Some((first, second)) = &lows {
        if second.price < first.price && second.rsi > first.rsi {
            kind = DivergenceKind::Bullish;
        }
    }
    if kind == DivergenceKind::None {
        if let Some((first, second)) = &highs {
            if second.price > first.price && second.rsi < first.rsi {
                kind = DivergenceKind::Bearish;
            }
        }
    }

    DivergenceResult { kind, lows, highs }
}
