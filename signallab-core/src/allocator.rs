//! Continuous two-asset weight recommendation.
//!
//! Unlike the scorer's discrete action, the allocator produces a
//! defensive/growth percentage split. Factors add bounded deltas to
//! per-asset scores seeded at 50/50; scores are clipped to [0, 100] and
//! renormalized to sum to 100. Missing factors simply contribute nothing
//! and lower the confidence.

use serde::{Deserialize, Serialize};

use crate::config::SwitchingPair;

/// Latest per-asset readings. `history_len` is the number of bars behind
/// the MA200 value; 200+ on both assets earns a confidence bump.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetSnapshot {
    pub price: f64,
    pub ma200: f64,
    pub rsi: f64,
    pub history_len: usize,
}

/// The 0-100 sentiment index and its day-over-day change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentReading {
    pub level: f64,
    pub change: f64,
}

/// Everything the allocator may consider. Every field is optional; the
/// allocation degrades gracefully as inputs disappear.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AllocationInputs {
    pub defensive: Option<AssetSnapshot>,
    pub growth: Option<AssetSnapshot>,
    pub sentiment: Option<SentimentReading>,
    pub volatility_index: Option<f64>,
    pub long_rate: Option<f64>,
    pub dollar_index: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub defensive_symbol: String,
    pub growth_symbol: String,
    pub defensive_pct: f64,
    pub growth_pct: f64,
    pub defensive_score: f64,
    pub growth_score: f64,
    pub confidence: f64,
    pub reasons: Vec<String>,
}

pub struct PortfolioAllocator {
    pair: SwitchingPair,
}

impl PortfolioAllocator {
    pub fn new(pair: SwitchingPair) -> Self {
        Self { pair }
    }

    fn even_split(&self, confidence: f64, reasons: Vec<String>) -> Allocation {
        Allocation {
            defensive_symbol: self.pair.defensive.clone(),
            growth_symbol: self.pair.growth.clone(),
            defensive_pct: 50.0,
            growth_pct: 50.0,
            defensive_score: 50.0,
            growth_score: 50.0,
            confidence,
            reasons,
        }
    }

    /// Compute the split. With neither asset snapshot available the result
    /// is exactly 50/50 at confidence 0.
    pub fn allocate(&self, inputs: &AllocationInputs) -> Allocation {
        let (defensive, growth) = match (inputs.defensive, inputs.growth) {
            (Some(d), Some(g)) => (d, g),
            _ => return self.even_split(0.0, vec!["insufficient data".to_string()]),
        };

        let mut def_score = 50.0_f64;
        let mut gro_score = 50.0_f64;
        let mut reasons = Vec::new();

        // Per-asset RSI extremes.
        for (snapshot, score, symbol) in [
            (&defensive, &mut def_score, &self.pair.defensive),
            (&growth, &mut gro_score, &self.pair.growth),
        ] {
            if snapshot.rsi < 30.0 {
                *score += 10.0;
                reasons.push(format!("{symbol} RSI oversold"));
            } else if snapshot.rsi > 70.0 {
                *score -= 10.0;
            }
        }

        // Per-asset trend position.
        for (snapshot, score, symbol) in [
            (&defensive, &mut def_score, &self.pair.defensive),
            (&growth, &mut gro_score, &self.pair.growth),
        ] {
            if snapshot.price > snapshot.ma200 {
                *score += 10.0;
                reasons.push(format!("{symbol} above its MA200"));
            } else {
                *score -= 10.0;
            }
        }

        // Sentiment bands, with a day-over-day momentum bonus.
        if let Some(sentiment) = inputs.sentiment {
            let level = sentiment.level;
            if (0.0..=40.0).contains(&level) {
                gro_score += 20.0;
                def_score -= 10.0;
                if level <= 25.0 {
                    gro_score += 10.0;
                    reasons.push(format!("extreme fear ({level:.0}), strong growth entry"));
                } else {
                    reasons.push(format!("fear ({level:.0}), growth entry favored"));
                }
                if sentiment.change > 0.0 {
                    gro_score += 5.0;
                    reasons.push("fear zone rebounding day-over-day".to_string());
                }
            } else if (60.0..=100.0).contains(&level) {
                def_score += 20.0;
                gro_score -= 15.0;
                if level >= 75.0 {
                    def_score += 10.0;
                    reasons.push(format!("extreme greed ({level:.0}), defensive strongly favored"));
                } else {
                    reasons.push(format!("greed ({level:.0}), defensive favored"));
                }
                if sentiment.change < 0.0 {
                    def_score += 5.0;
                    reasons.push("greed zone fading day-over-day".to_string());
                }
            } else {
                reasons.push(format!("neutral sentiment ({level:.0}), technicals decide"));
            }
        }

        // Volatility index.
        if let Some(vix) = inputs.volatility_index {
            if vix > 30.0 {
                def_score += 12.0;
                gro_score -= 12.0;
                reasons.push("high volatility, defensive preferred".to_string());
            } else if vix < 15.0 {
                gro_score += 12.0;
                def_score -= 12.0;
                reasons.push("low volatility, growth preferred".to_string());
            }
        }

        // Long rate.
        if let Some(rate) = inputs.long_rate {
            if rate > 5.0 {
                def_score += 10.0;
                gro_score -= 10.0;
                reasons.push("high long rate, defensive preferred".to_string());
            } else if rate < 3.0 {
                gro_score += 10.0;
                def_score -= 10.0;
                reasons.push("low long rate, growth preferred".to_string());
            }
        }

        // Dollar index.
        if let Some(dxy) = inputs.dollar_index {
            if dxy > 105.0 {
                def_score += 5.0;
                reasons.push("strong dollar".to_string());
            }
        }

        def_score = def_score.clamp(0.0, 100.0);
        gro_score = gro_score.clamp(0.0, 100.0);

        let total = def_score + gro_score;
        let (defensive_pct, growth_pct) = if total == 0.0 {
            (50.0, 50.0)
        } else {
            (def_score / total * 100.0, gro_score / total * 100.0)
        };

        let mut confidence = 0.5_f64;
        for present in [
            inputs.sentiment.is_some(),
            inputs.volatility_index.is_some(),
            inputs.long_rate.is_some(),
            inputs.dollar_index.is_some(),
            defensive.history_len > 200 && growth.history_len > 200,
        ] {
            if present {
                confidence += 0.1;
            }
        }
        let confidence = confidence.min(0.95);

        if reasons.is_empty() {
            reasons.push("default split maintained".to_string());
        }
        Allocation {
            defensive_symbol: self.pair.defensive.clone(),
            growth_symbol: self.pair.growth.clone(),
            defensive_pct,
            growth_pct,
            defensive_score: def_score,
            growth_score: gro_score,
            confidence,
            reasons,
        }
    }
}
