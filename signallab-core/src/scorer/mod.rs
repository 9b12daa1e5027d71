//! Multi-factor signal scoring.
//!
//! The scorer is stateless per call. Mode is decided by switching-pair
//! membership and changes both the rule table and its polarity: switching
//! mode scores toward "rotate away from the currently favored asset", so
//! the same bearish reading that subtracts in independent mode adds here.
//! The inversion is deliberate and load-bearing.

use tracing::warn;

use crate::domain::{Action, FactorScore, Mode, SignalDecision};
use crate::engine::IndicatorEngine;
use crate::error::EngineError;
use crate::patterns::{detect_crosses_extended, detect_divergence, divergence, DivergenceKind};

/// Externally supplied readings for one scoring call. `sentiment` is the
/// 0-100 market-mood index (0 = extreme fear).
#[derive(Debug, Clone)]
pub struct ScoreInputs {
    pub symbol: String,
    pub price: f64,
    pub ma200: f64,
    pub rsi: f64,
    pub sentiment: f64,
}

/// Maximum achievable factor magnitude per active rule set.
const NORMALIZER_SWITCHING_EXTENDED: f64 = 6.0;
const NORMALIZER_SWITCHING_BASIC: f64 = 5.0;
const NORMALIZER_INDEPENDENT: f64 = 4.0;

pub struct SignalScorer {
    engine: IndicatorEngine,
}

impl SignalScorer {
    pub fn new(engine: IndicatorEngine) -> Self {
        Self { engine }
    }

    /// Score a symbol. Never fails at the boundary: any internal error
    /// degrades to `{hold, confidence 0}` with the error as the note.
    pub fn score(&self, inputs: &ScoreInputs) -> SignalDecision {
        let symbol = inputs.symbol.to_uppercase();
        if self.engine.settings().switching_pair.contains(&symbol) {
            self.score_switching(&symbol, inputs)
        } else {
            self.score_independent(&symbol, inputs)
        }
    }

    fn score_switching(&self, symbol: &str, inputs: &ScoreInputs) -> SignalDecision {
        let mut factors = switching_base_factors(inputs);
        let normalizer = match self.pattern_factors(symbol, Mode::Switching) {
            Ok(extras) => {
                factors.extend(extras);
                NORMALIZER_SWITCHING_EXTENDED
            }
            Err(err) => {
                warn!(symbol, %err, "pattern factors unavailable, scoring on the basic rule set");
                NORMALIZER_SWITCHING_BASIC
            }
        };

        let score: i32 = factors.iter().map(|f| f.delta).sum();
        let action = if score >= 3 {
            Action::Sell
        } else if score <= -2 {
            Action::Buy
        } else {
            Action::Hold
        };
        SignalDecision {
            symbol: symbol.to_string(),
            action,
            confidence: confidence(score, normalizer),
            score,
            factors,
            mode: Mode::Switching,
            note: None,
        }
    }

    fn score_independent(&self, symbol: &str, inputs: &ScoreInputs) -> SignalDecision {
        let mut factors = independent_base_factors(inputs);
        match self.pattern_factors(symbol, Mode::Independent) {
            Ok(extras) => factors.extend(extras),
            Err(err) => {
                return SignalDecision::safe_hold(symbol, Mode::Independent, err.to_string());
            }
        }

        let score: i32 = factors.iter().map(|f| f.delta).sum();
        let action = if score >= 2 {
            Action::Buy
        } else if score <= -2 {
            Action::Sell
        } else {
            Action::Hold
        };
        let pair = &self.engine.settings().switching_pair;
        SignalDecision {
            symbol: symbol.to_string(),
            action,
            confidence: confidence(score, NORMALIZER_INDEPENDENT),
            score,
            factors,
            mode: Mode::Independent,
            note: Some(format!(
                "{symbol} is outside the {}/{} switching pair; scored independently",
                pair.defensive, pair.growth
            )),
        }
    }

    /// Cross, divergence and risk factors recomputed from history. The
    /// deltas flip sign with the mode.
    fn pattern_factors(&self, symbol: &str, mode: Mode) -> Result<Vec<FactorScore>, EngineError> {
        let bars = self.engine.bars(symbol)?;
        let sign = match mode {
            Mode::Switching => -1,
            Mode::Independent => 1,
        };
        let mut factors = Vec::new();

        let crosses = detect_crosses_extended(&bars);
        if crosses.ma50_ma200.golden_cross {
            factors.push(FactorScore {
                name: "golden_cross".to_string(),
                delta: 2 * sign,
                rationale: "MA50 crossed above MA200".to_string(),
            });
        }
        if crosses.ma50_ma200.death_cross {
            factors.push(FactorScore {
                name: "death_cross".to_string(),
                delta: -2 * sign,
                rationale: "MA50 crossed below MA200".to_string(),
            });
        }

        match detect_divergence(&bars, divergence::DEFAULT_WINDOW).kind {
            DivergenceKind::Bullish => factors.push(FactorScore {
                name: "divergence".to_string(),
                delta: sign,
                rationale: "bullish RSI divergence".to_string(),
            }),
            DivergenceKind::Bearish => factors.push(FactorScore {
                name: "divergence".to_string(),
                delta: -sign,
                rationale: "bearish RSI divergence".to_string(),
            }),
            DivergenceKind::None => {}
        }

        let risk = self.engine.risk(symbol)?;
        if risk.risk_score >= 70.0 {
            factors.push(FactorScore {
                name: "risk".to_string(),
                delta: -sign,
                rationale: format!("high risk score ({:.1})", risk.risk_score),
            });
        } else if risk.risk_score <= 30.0 {
            factors.push(FactorScore {
                name: "risk".to_string(),
                delta: sign,
                rationale: format!("low risk score ({:.1})", risk.risk_score),
            });
        }
        Ok(factors)
    }
}

fn confidence(score: i32, normalizer: f64) -> f64 {
    (score.abs() as f64 / normalizer).min(1.0)
}

/// RSI / MA200 / sentiment deltas in switching polarity: overbought and
/// below-trend readings push toward rotating into the defensive asset.
fn switching_base_factors(inputs: &ScoreInputs) -> Vec<FactorScore> {
    let mut factors = Vec::new();
    if inputs.rsi > 70.0 {
        factors.push(FactorScore {
            name: "rsi".to_string(),
            delta: 2,
            rationale: format!("RSI overbought ({:.1}), downside risk", inputs.rsi),
        });
    } else if inputs.rsi < 30.0 {
        factors.push(FactorScore {
            name: "rsi".to_string(),
            delta: -2,
            rationale: format!("RSI oversold ({:.1}), rebound expected", inputs.rsi),
        });
    }
    if inputs.price < inputs.ma200 {
        factors.push(FactorScore {
            name: "ma200".to_string(),
            delta: 2,
            rationale: format!(
                "price below MA200 ({:.2} < {:.2}), trend down",
                inputs.price, inputs.ma200
            ),
        });
    } else if inputs.price > inputs.ma200 {
        factors.push(FactorScore {
            name: "ma200".to_string(),
            delta: -1,
            rationale: format!(
                "price above MA200 ({:.2} > {:.2}), trend up",
                inputs.price, inputs.ma200
            ),
        });
    }
    if inputs.sentiment < 20.0 {
        factors.push(FactorScore {
            name: "sentiment".to_string(),
            delta: 2,
            rationale: format!("extreme fear ({:.0}), defensive rotation favored", inputs.sentiment),
        });
    } else if inputs.sentiment > 60.0 {
        factors.push(FactorScore {
            name: "sentiment".to_string(),
            delta: -1,
            rationale: format!("greed ({:.0}), uptrend reinforced", inputs.sentiment),
        });
    }
    factors
}

/// The same readings in ordinary bullish/bearish polarity.
fn independent_base_factors(inputs: &ScoreInputs) -> Vec<FactorScore> {
    let mut factors = Vec::new();
    if inputs.rsi > 70.0 {
        factors.push(FactorScore {
            name: "rsi".to_string(),
            delta: -2,
            rationale: format!("RSI overbought ({:.1}), consider selling", inputs.rsi),
        });
    } else if inputs.rsi < 30.0 {
        factors.push(FactorScore {
            name: "rsi".to_string(),
            delta: 2,
            rationale: format!("RSI oversold ({:.1}), buying opportunity", inputs.rsi),
        });
    }
    if inputs.price < inputs.ma200 {
        factors.push(FactorScore {
            name: "ma200".to_string(),
            delta: -1,
            rationale: format!(
                "price below MA200 ({:.2} < {:.2}), trend down",
                inputs.price, inputs.ma200
            ),
        });
    } else if inputs.price > inputs.ma200 {
        factors.push(FactorScore {
            name: "ma200".to_string(),
            delta: 1,
            rationale: format!(
                "price above MA200 ({:.2} > {:.2}), trend up",
                inputs.price, inputs.ma200
            ),
        });
    }
    if inputs.sentiment < 20.0 {
        factors.push(FactorScore {
            name: "sentiment".to_string(),
            delta: 1,
            rationale: format!("extreme fear ({:.0}), buying opportunity", inputs.sentiment),
        });
    } else if inputs.sentiment > 60.0 {
        factors.push(FactorScore {
            name: "sentiment".to_string(),
            delta: -1,
            rationale: format!("greed ({:.0}), overheating risk", inputs.sentiment),
        });
    }
    factors
}
