//! Strategy replay over historical bars.
//!
//! The simulator walks the filtered history bar by bar, feeding each
//! strategy only data up to and including the current bar. Statistics are
//! computed over the full-resolution run; the returned equity curve and
//! trade log are truncated to a bounded tail afterward.

pub mod simulator;
pub mod state;
pub mod strategy;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use simulator::BacktestSimulator;
pub use state::{BacktestState, EquityPoint, Position, Trade, TradeAction};
pub use strategy::Strategy;

/// Equity points kept in the returned payload (roughly one trading year).
pub const EQUITY_TAIL: usize = 252;
/// Trades kept in the returned payload.
pub const TRADE_TAIL: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRequest {
    pub symbol: String,
    pub strategy: Strategy,
    /// Inclusive date window; `None` keeps the corresponding side open.
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub initial_investment: f64,
}

impl BacktestRequest {
    pub fn new(symbol: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            symbol: symbol.into(),
            strategy,
            start_date: None,
            end_date: None,
            initial_investment: 10_000.0,
        }
    }
}

/// Aggregate outcome of one replay. All statistics reflect the full run
/// even when the curve and trade payloads carry only a tail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub symbol: String,
    pub strategy: Strategy,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_investment: f64,
    pub final_equity: f64,
    pub total_return: f64,
    pub total_return_pct: f64,
    pub cagr_pct: f64,
    pub max_drawdown_pct: f64,
    pub win_rate_pct: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
}
