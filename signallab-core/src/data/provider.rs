//! Price-history accessor trait.
//!
//! The accessor abstracts over remote data sources so the engine can be
//! exercised against fixtures. Remote retry and scraping live behind the
//! trait, outside this crate; symbol case-normalization is the caller's
//! responsibility.

use std::collections::HashMap;

use tracing::warn;

use crate::domain::Bar;
use crate::error::EngineError;

/// Daily bar accessor for a symbol and lookback horizon.
///
/// Contract: bars come back ordered ascending by date, de-duplicated.
/// An empty vec means "nothing for that horizon" and is not an error by
/// itself — the fallback ladder decides when to give up.
pub trait PriceHistory: Send + Sync {
    fn get_bars(&self, symbol: &str, lookback_years: u32) -> Result<Vec<Bar>, EngineError>;
}

/// Fetch with the fallback horizon ladder: try `preferred_years` first,
/// then each remaining rung, returning the first non-empty series.
///
/// A rung that errors is logged and skipped; only when every rung comes
/// back empty does this fail with `DataUnavailable`.
pub fn fetch_with_fallback(
    provider: &dyn PriceHistory,
    symbol: &str,
    preferred_years: u32,
    fallback_years: &[u32],
) -> Result<Vec<Bar>, EngineError> {
    let mut rungs = vec![preferred_years];
    rungs.extend(fallback_years.iter().copied().filter(|&y| y != preferred_years));

    for years in rungs {
        match provider.get_bars(symbol, years) {
            Ok(bars) if !bars.is_empty() => return Ok(bars),
            Ok(_) => {
                warn!(symbol, years, "empty history, trying next fallback horizon");
            }
            Err(err) => {
                warn!(symbol, years, %err, "history fetch failed, trying next fallback horizon");
            }
        }
    }

    Err(EngineError::DataUnavailable {
        symbol: symbol.to_string(),
    })
}

/// In-memory accessor backed by fixed bar series, keyed by symbol.
/// Ignores the lookback horizon; used by tests and offline replays.
#[derive(Debug, Clone, Default)]
pub struct StaticHistory {
    series: HashMap<String, Vec<Bar>>,
}

impl StaticHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        self.series.insert(symbol.into(), bars);
        self
    }
}

impl PriceHistory for StaticHistory {
    fn get_bars(&self, symbol: &str, _lookback_years: u32) -> Result<Vec<Bar>, EngineError> {
        Ok(self.series.get(symbol).cloned().unwrap_or_default())
    }
}
