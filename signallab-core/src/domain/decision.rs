//! Signal decision types — the scorer's output payload.

use serde::{Deserialize, Serialize};

/// Discrete recommendation. In switching mode, `Sell` means "rotate away
/// from the currently favored asset" and `Buy` means "maintain or add".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

/// Which rule table produced the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The symbol is one of the two designated switching assets; score
    /// polarity is inverted relative to independent mode.
    Switching,
    /// Any other symbol; ordinary bullish/bearish polarity.
    Independent,
}

/// One factor's signed contribution to the running score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    pub name: String,
    pub delta: i32,
    pub rationale: String,
}

/// The scorer's aggregate decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalDecision {
    pub symbol: String,
    pub action: Action,
    /// |score| / normalizer, clamped to [0, 1].
    pub confidence: f64,
    pub score: i32,
    pub factors: Vec<FactorScore>,
    pub mode: Mode,
    /// Set for independent-mode symbols: explains that the symbol is
    /// outside the switching pair. Also carries the error text when the
    /// scorer degrades to a safe hold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SignalDecision {
    /// Safe fallback decision: hold at zero confidence with the failure
    /// text as the note. Never panics, never carries factors.
    pub fn safe_hold(symbol: &str, mode: Mode, reason: impl Into<String>) -> Self {
        Self {
            symbol: symbol.to_string(),
            action: Action::Hold,
            confidence: 0.0,
            score: 0,
            factors: Vec::new(),
            mode,
            note: Some(reason.into()),
        }
    }
}
