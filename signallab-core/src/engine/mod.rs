//! The indicator engine: injected collaborators plus one cache-wrapped
//! operation per indicator.
//!
//! Every operation follows the same shape: build the cache key, and on a
//! miss fetch bars through the fallback horizon ladder, run the pure
//! transform from `indicators` and attach dates. A hit returns the stored
//! series without touching the accessor at all.

use std::sync::Arc;

use crate::config::EngineSettings;
use crate::data::{cache_key, cached, fetch_with_fallback, KvCache, PriceHistory};
use crate::domain::{
    AdxPoint, Bar, BollingerPoint, CciPoint, MaPoint, MacdPoint, ObvPoint, RsiPoint,
    StochasticPoint, VwapPoint,
};
use crate::error::EngineError;
use crate::indicators;
use crate::indicators::RiskScore;

pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_MULT: f64 = 2.0;
pub const RISK_PERIOD: usize = 30;

#[derive(Clone)]
pub struct IndicatorEngine {
    history: Arc<dyn PriceHistory>,
    cache: Arc<dyn KvCache>,
    settings: EngineSettings,
}

impl IndicatorEngine {
    pub fn new(
        history: Arc<dyn PriceHistory>,
        cache: Arc<dyn KvCache>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            history,
            cache,
            settings,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Bars for a symbol through the fallback horizon ladder. Not cached;
    /// callers that need raw bars (patterns, backtests) go through here.
    pub fn bars(&self, symbol: &str) -> Result<Vec<Bar>, EngineError> {
        fetch_with_fallback(
            self.history.as_ref(),
            symbol,
            self.settings.lookback_years,
            &self.settings.fallback_years,
        )
    }

    fn ttl(&self) -> u64 {
        self.settings.cache_ttl_secs
    }

    /// Simple moving average with partial windows; one point per bar.
    pub fn ma(&self, symbol: &str, window: usize) -> Result<Vec<MaPoint>, EngineError> {
        let key = cache_key("ma", symbol, [window]);
        cached(self.cache.as_ref(), &key, self.ttl(), || {
            let bars = self.bars(symbol)?;
            let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
            let ma = indicators::rolling_mean(&closes, window);
            Ok(bars
                .iter()
                .zip(ma)
                .map(|(bar, ma)| MaPoint {
                    date: bar.date,
                    price: bar.close,
                    ma,
                })
                .collect())
        })
    }

    /// RSI with the neutral-50 fill; one point per bar.
    pub fn rsi(&self, symbol: &str, period: usize) -> Result<Vec<RsiPoint>, EngineError> {
        let key = cache_key("rsi", symbol, [period]);
        cached(self.cache.as_ref(), &key, self.ttl(), || {
            let bars = self.bars(symbol)?;
            let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
            let rsi = indicators::rsi(&closes, period);
            Ok(bars
                .iter()
                .zip(rsi)
                .map(|(bar, rsi)| RsiPoint {
                    date: bar.date,
                    rsi,
                    price: bar.close,
                })
                .collect())
        })
    }

    /// MACD(12, 26, 9); one point per bar.
    pub fn macd(&self, symbol: &str) -> Result<Vec<MacdPoint>, EngineError> {
        let key = cache_key("macd", symbol, [MACD_FAST, MACD_SLOW, MACD_SIGNAL]);
        cached(self.cache.as_ref(), &key, self.ttl(), || {
            let bars = self.bars(symbol)?;
            let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
            let out = indicators::macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
            Ok(bars
                .iter()
                .enumerate()
                .map(|(i, bar)| MacdPoint {
                    date: bar.date,
                    macd: out.macd[i],
                    signal: out.signal[i],
                    histogram: out.histogram[i],
                    price: bar.close,
                })
                .collect())
        })
    }

    /// Stochastic %K/%D; one point per bar.
    pub fn stochastic(
        &self,
        symbol: &str,
        k_period: usize,
        d_period: usize,
    ) -> Result<Vec<StochasticPoint>, EngineError> {
        let key = cache_key("stochastic", symbol, [k_period, d_period]);
        cached(self.cache.as_ref(), &key, self.ttl(), || {
            let bars = self.bars(symbol)?;
            let out = indicators::stochastic(&bars, k_period, d_period);
            Ok(bars
                .iter()
                .enumerate()
                .map(|(i, bar)| StochasticPoint {
                    date: bar.date,
                    k: out.k[i],
                    d: out.d[i],
                    price: bar.close,
                })
                .collect())
        })
    }

    /// Latest ATR value over the period.
    pub fn atr(&self, symbol: &str, period: usize) -> Result<f64, EngineError> {
        let key = cache_key("atr", symbol, [period]);
        cached(self.cache.as_ref(), &key, self.ttl(), || {
            let bars = self.bars(symbol)?;
            indicators::atr(&bars, period)
                .last()
                .copied()
                .ok_or_else(|| EngineError::DataUnavailable {
                    symbol: symbol.to_string(),
                })
        })
    }

    /// Annualized volatility (percent) over the trailing period.
    pub fn volatility(&self, symbol: &str, period: usize) -> Result<f64, EngineError> {
        let key = cache_key("volatility", symbol, [period]);
        cached(self.cache.as_ref(), &key, self.ttl(), || {
            let bars = self.bars(symbol)?;
            let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
            indicators::annualized_volatility(&closes, period).ok_or(
                EngineError::InsufficientWindow {
                    have: closes.len(),
                    need: period + 1,
                },
            )
        })
    }

    /// Maximum drawdown over the whole history, percent magnitude.
    pub fn max_drawdown(&self, symbol: &str) -> Result<f64, EngineError> {
        let key = cache_key("mdd", symbol, Vec::<u32>::new());
        cached(self.cache.as_ref(), &key, self.ttl(), || {
            let bars = self.bars(symbol)?;
            let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
            indicators::max_drawdown_pct(&closes).ok_or(EngineError::InsufficientWindow {
                have: closes.len(),
                need: 2,
            })
        })
    }

    /// Bollinger(20, 2); points start once a full window exists.
    pub fn bollinger(&self, symbol: &str) -> Result<Vec<BollingerPoint>, EngineError> {
        let key = cache_key("bollinger", symbol, [BOLLINGER_PERIOD]);
        cached(self.cache.as_ref(), &key, self.ttl(), || {
            let bars = self.bars(symbol)?;
            let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
            let out = indicators::bollinger(&closes, BOLLINGER_PERIOD, BOLLINGER_MULT);
            Ok(bars
                .iter()
                .enumerate()
                .filter(|(i, _)| !out.middle[*i].is_nan())
                .map(|(i, bar)| BollingerPoint {
                    date: bar.date,
                    upper: out.upper[i],
                    middle: out.middle[i],
                    lower: out.lower[i],
                    width: out.width[i],
                })
                .collect())
        })
    }

    /// CCI over the period; points start once a full window exists.
    pub fn cci(&self, symbol: &str, period: usize) -> Result<Vec<CciPoint>, EngineError> {
        let key = cache_key("cci", symbol, [period]);
        cached(self.cache.as_ref(), &key, self.ttl(), || {
            let bars = self.bars(symbol)?;
            let out = indicators::cci(&bars, period);
            Ok(bars
                .iter()
                .enumerate()
                .filter(|(i, _)| !out[*i].is_nan())
                .map(|(i, bar)| CciPoint {
                    date: bar.date,
                    cci: out[i],
                })
                .collect())
        })
    }

    /// ADX with +DI/-DI; points start once ADX itself is defined.
    pub fn adx(&self, symbol: &str, period: usize) -> Result<Vec<AdxPoint>, EngineError> {
        let key = cache_key("adx", symbol, [period]);
        cached(self.cache.as_ref(), &key, self.ttl(), || {
            let bars = self.bars(symbol)?;
            let out = indicators::adx(&bars, period);
            Ok(bars
                .iter()
                .enumerate()
                .filter(|(i, _)| !out.adx[*i].is_nan())
                .map(|(i, bar)| AdxPoint {
                    date: bar.date,
                    adx: out.adx[i],
                    di_plus: out.di_plus[i],
                    di_minus: out.di_minus[i],
                })
                .collect())
        })
    }

    /// On-balance volume; one point per bar.
    pub fn obv(&self, symbol: &str) -> Result<Vec<ObvPoint>, EngineError> {
        let key = cache_key("obv", symbol, Vec::<u32>::new());
        cached(self.cache.as_ref(), &key, self.ttl(), || {
            let bars = self.bars(symbol)?;
            let out = indicators::obv(&bars);
            Ok(bars
                .iter()
                .zip(out)
                .map(|(bar, obv)| ObvPoint {
                    date: bar.date,
                    obv,
                })
                .collect())
        })
    }

    /// Cumulative VWAP; bars before any traded volume are dropped.
    pub fn vwap(&self, symbol: &str) -> Result<Vec<VwapPoint>, EngineError> {
        let key = cache_key("vwap", symbol, Vec::<u32>::new());
        cached(self.cache.as_ref(), &key, self.ttl(), || {
            let bars = self.bars(symbol)?;
            let out = indicators::vwap(&bars);
            Ok(bars
                .iter()
                .enumerate()
                .filter(|(i, _)| !out[*i].is_nan())
                .map(|(i, bar)| VwapPoint {
                    date: bar.date,
                    vwap: out[i],
                })
                .collect())
        })
    }

    /// Composite risk score over the trailing 30 bars.
    pub fn risk(&self, symbol: &str) -> Result<RiskScore, EngineError> {
        let key = cache_key("risk", symbol, [RISK_PERIOD]);
        cached(self.cache.as_ref(), &key, self.ttl(), || {
            let bars = self.bars(symbol)?;
            Ok(indicators::risk_score(&bars, RISK_PERIOD))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MemoryCache, StaticHistory};
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    fn engine_with(closes: &[f64]) -> IndicatorEngine {
        let provider = StaticHistory::new().with_symbol("SPY", make_bars(closes));
        IndicatorEngine::new(
            Arc::new(provider),
            Arc::new(MemoryCache::new()),
            EngineSettings::default(),
        )
    }

    #[test]
    fn ma_emits_one_point_per_bar() {
        let engine = engine_with(&[100.0, 102.0, 104.0]);
        let out = engine.ma("SPY", 200).unwrap();
        assert_eq!(out.len(), 3);
        assert_approx(out[1].ma, 101.0, DEFAULT_EPSILON);
    }

    #[test]
    fn cache_hit_skips_the_accessor() {
        let bars = make_bars(&[100.0; 30]);
        let cache = Arc::new(MemoryCache::new());
        let engine = IndicatorEngine::new(
            Arc::new(StaticHistory::new().with_symbol("SPY", bars)),
            cache.clone(),
            EngineSettings::default(),
        );
        let first = engine.rsi("SPY", 14).unwrap();

        // Rebuild the engine with an empty accessor but the same cache; the
        // hit must come back identical without a fetch.
        let engine = IndicatorEngine::new(
            Arc::new(StaticHistory::new()),
            cache,
            EngineSettings::default(),
        );
        let second = engine.rsi("SPY", 14).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_symbol_is_data_unavailable() {
        let engine = engine_with(&[100.0]);
        let err = engine.ma("QQQ", 20).unwrap_err();
        assert!(matches!(err, EngineError::DataUnavailable { .. }));
    }

    #[test]
    fn macd_points_keep_the_histogram_identity() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.4).sin() * 3.0).collect();
        let engine = engine_with(&closes);
        for p in engine.macd("SPY").unwrap() {
            assert_eq!(p.histogram, p.macd - p.signal);
        }
    }

    #[test]
    fn bollinger_drops_warmup_rows() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let engine = engine_with(&closes);
        let out = engine.bollinger("SPY").unwrap();
        assert_eq!(out.len(), 30 - BOLLINGER_PERIOD + 1);
    }

    #[test]
    fn volatility_needs_enough_returns() {
        let engine = engine_with(&[100.0; 10]);
        let err = engine.volatility("SPY", 20).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientWindow { .. }));
    }
}
