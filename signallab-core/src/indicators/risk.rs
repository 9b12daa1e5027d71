//! Composite 0-100 risk score.

use serde::{Deserialize, Serialize};

use crate::domain::Bar;

use super::atr::atr;
use super::volatility::{daily_returns, sample_std};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskGrade {
    Low,
    Medium,
    High,
}

impl RiskGrade {
    /// Low up to 30, Medium up to 70, High above.
    pub fn from_score(score: f64) -> Self {
        if score <= 30.0 {
            RiskGrade::Low
        } else if score <= 70.0 {
            RiskGrade::Medium
        } else {
            RiskGrade::High
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskScore {
    pub risk_score: f64,
    pub risk_grade: RiskGrade,
    pub atr_normalized: Option<f64>,
    pub volatility_std: Option<f64>,
    pub range_vol: Option<f64>,
}

impl RiskScore {
    /// Neutral score used when history is too short to measure anything.
    pub fn neutral() -> Self {
        RiskScore {
            risk_score: 50.0,
            risk_grade: RiskGrade::Medium,
            atr_normalized: None,
            volatility_std: None,
            range_vol: None,
        }
    }
}

/// Blend three volatility proxies over the trailing `period` bars into one
/// score: ATR(14) over the last close, the sample std of daily returns, and
/// the mean intraday range over close. Their mean is scaled by 1000 and
/// capped at 100. Histories shorter than `period + 1` bars score a neutral
/// 50 with a Medium grade.
pub fn risk_score(bars: &[Bar], period: usize) -> RiskScore {
    assert!(period > 1, "period must exceed 1");
    if bars.len() < period + 1 {
        return RiskScore::neutral();
    }
    let tail = &bars[bars.len() - period..];
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let last_close = *closes.last().unwrap_or(&0.0);
    if last_close <= 0.0 {
        return RiskScore::neutral();
    }

    let atr_normalized = atr(bars, 14).last().map(|a| a / last_close);
    let tail_closes: Vec<f64> = closes[bars.len() - period - 1..].to_vec();
    let volatility_std = sample_std(&daily_returns(&tail_closes));
    let range_vol = {
        let sum: f64 = tail
            .iter()
            .filter(|b| b.close > 0.0)
            .map(|b| (b.high - b.low) / b.close)
            .sum();
        Some(sum / period as f64)
    };

    let components: Vec<f64> = [atr_normalized, volatility_std, range_vol]
        .into_iter()
        .flatten()
        .collect();
    if components.is_empty() {
        return RiskScore::neutral();
    }
    let raw = components.iter().sum::<f64>() / components.len() as f64;
    let score = (raw * 1000.0).min(100.0);
    RiskScore {
        risk_score: score,
        risk_grade: RiskGrade::from_score(score),
        atr_normalized,
        volatility_std,
        range_vol,
    }
}
