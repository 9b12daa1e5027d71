//! SignalLab Core — indicator engine, pattern detection, signal scoring,
//! portfolio allocation, and strategy backtesting.
//!
//! This crate contains the heart of the analysis service:
//! - Domain types (bars, indicator points, signal decisions)
//! - Pure indicator transforms over close/OHLCV series
//! - Pattern detectors (crosses, divergence, candlesticks, trend, chart shapes)
//! - Mode-aware signal scoring over the switching pair
//! - Two-asset continuous allocation
//! - Bar-by-bar strategy replay with equity/drawdown accounting
//!
//! Price history and caching are injected behind the [`data::PriceHistory`]
//! and [`data::KvCache`] seams; the crate performs no I/O of its own.

pub mod allocator;
pub mod backtest;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod patterns;
pub mod scorer;

pub use error::EngineError;
