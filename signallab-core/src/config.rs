//! Engine settings — switching pair, lookback ladder, cache TTL.
//!
//! Owned by the host application and passed in at construction; the engine
//! itself holds no global mutable state.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The two designated switching assets: a defensive holding and a
/// leveraged growth holding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchingPair {
    pub defensive: String,
    pub growth: String,
}

impl Default for SwitchingPair {
    fn default() -> Self {
        Self {
            defensive: "VIG".to_string(),
            growth: "QLD".to_string(),
        }
    }
}

impl SwitchingPair {
    /// True if the (already-uppercased) symbol is one of the pair.
    pub fn contains(&self, symbol: &str) -> bool {
        symbol == self.defensive || symbol == self.growth
    }

    /// The other half of the pair, or a configuration error for symbols
    /// outside it.
    pub fn counterpart(&self, symbol: &str) -> Result<&str, EngineError> {
        if symbol == self.defensive {
            Ok(&self.growth)
        } else if symbol == self.growth {
            Ok(&self.defensive)
        } else {
            Err(EngineError::Configuration(format!(
                "'{symbol}' is not part of the switching pair ({}/{})",
                self.defensive, self.growth
            )))
        }
    }
}

/// Tunable engine settings with serde defaults, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// TTL for cached indicator payloads, in seconds.
    pub cache_ttl_secs: u64,
    /// Preferred history horizon in years.
    pub lookback_years: u32,
    /// Horizons tried in order when the preferred one returns nothing.
    pub fallback_years: Vec<u32>,
    pub switching_pair: SwitchingPair,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 15 * 60,
            lookback_years: 3,
            fallback_years: vec![3, 2, 1],
            switching_pair: SwitchingPair::default(),
        }
    }
}

impl EngineSettings {
    pub fn from_toml(text: &str) -> Result<Self, EngineError> {
        toml::from_str(text).map_err(|e| EngineError::Configuration(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let s = EngineSettings::default();
        assert_eq!(s.cache_ttl_secs, 900);
        assert_eq!(s.lookback_years, 3);
        assert_eq!(s.fallback_years, vec![3, 2, 1]);
        assert_eq!(s.switching_pair.defensive, "VIG");
        assert_eq!(s.switching_pair.growth, "QLD");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let s = EngineSettings::from_toml("cache_ttl_secs = 60").unwrap();
        assert_eq!(s.cache_ttl_secs, 60);
        assert_eq!(s.lookback_years, 3);
    }

    #[test]
    fn counterpart_rejects_outside_symbol() {
        let pair = SwitchingPair::default();
        assert_eq!(pair.counterpart("VIG").unwrap(), "QLD");
        assert_eq!(pair.counterpart("QLD").unwrap(), "VIG");
        assert!(pair.counterpart("SPY").is_err());
    }
}
