//! Dated point types emitted by the indicator engine.
//!
//! One struct per indicator series. Field names are the JSON compatibility
//! surface consumed by the host layer — renaming a field is a breaking
//! change for every downstream caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Moving-average point: closing price alongside the rolling mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub ma: f64,
}

/// RSI point. `rsi` is always in [0, 100]; undefined windows read 50.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiPoint {
    pub date: NaiveDate,
    pub rsi: f64,
    pub price: f64,
}

/// MACD point. Invariant: `histogram == macd - signal`, exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdPoint {
    pub date: NaiveDate,
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    pub price: f64,
}

/// Stochastic oscillator point (%K and its 3-bar smoothing %D).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StochasticPoint {
    pub date: NaiveDate,
    pub k: f64,
    pub d: f64,
    pub price: f64,
}

/// Bollinger band point. `width` is the band spread as a percent of middle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerPoint {
    pub date: NaiveDate,
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CciPoint {
    pub date: NaiveDate,
    pub cci: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdxPoint {
    pub date: NaiveDate,
    pub adx: f64,
    pub di_plus: f64,
    pub di_minus: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObvPoint {
    pub date: NaiveDate,
    pub obv: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VwapPoint {
    pub date: NaiveDate,
    pub vwap: f64,
}
