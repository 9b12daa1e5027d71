//! Portfolio bookkeeping shared by every strategy loop.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Cash,
    Holding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeAction {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub date: NaiveDate,
    pub action: TradeAction,
    pub price: f64,
    pub shares: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
    pub price: f64,
}

/// Single-asset cash/holding state machine. Buys convert the entire cash
/// balance into shares; sells liquidate the entire position.
#[derive(Debug, Clone)]
pub struct BacktestState {
    pub cash: f64,
    pub shares: f64,
    pub position: Position,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    peak_equity: f64,
    max_drawdown_pct: f64,
}

impl BacktestState {
    pub fn new(initial_investment: f64) -> Self {
        Self {
            cash: initial_investment,
            shares: 0.0,
            position: Position::Cash,
            trades: Vec::new(),
            equity_curve: Vec::new(),
            peak_equity: initial_investment,
            max_drawdown_pct: 0.0,
        }
    }

    pub fn equity(&self, price: f64) -> f64 {
        match self.position {
            Position::Cash => self.cash,
            Position::Holding => self.shares * price,
        }
    }

    pub fn buy(&mut self, date: NaiveDate, price: f64) {
        debug_assert_eq!(self.position, Position::Cash);
        self.shares = self.cash / price;
        self.cash = 0.0;
        self.position = Position::Holding;
        self.trades.push(Trade {
            date,
            action: TradeAction::Buy,
            price,
            shares: self.shares,
        });
    }

    pub fn sell(&mut self, date: NaiveDate, price: f64) {
        debug_assert_eq!(self.position, Position::Holding);
        self.cash = self.shares * price;
        self.trades.push(Trade {
            date,
            action: TradeAction::Sell,
            price,
            shares: self.shares,
        });
        self.shares = 0.0;
        self.position = Position::Cash;
    }

    /// Records the bar's equity and advances the running peak/drawdown.
    pub fn mark(&mut self, date: NaiveDate, price: f64) {
        let equity = self.equity(price);
        if equity > self.peak_equity {
            self.peak_equity = equity;
        }
        if self.peak_equity > 0.0 {
            let dd = (self.peak_equity - equity) / self.peak_equity * 100.0;
            if dd > self.max_drawdown_pct {
                self.max_drawdown_pct = dd;
            }
        }
        self.equity_curve.push(EquityPoint {
            date,
            equity,
            price,
        });
    }

    pub fn max_drawdown_pct(&self) -> f64 {
        self.max_drawdown_pct
    }

    /// Completed round trips: each sell compared against the buy it closes.
    pub fn round_trips(&self) -> (usize, usize) {
        let mut wins = 0;
        let mut losses = 0;
        let mut entry: Option<f64> = None;
        for trade in &self.trades {
            match trade.action {
                TradeAction::Buy => entry = Some(trade.price),
                TradeAction::Sell => {
                    if let Some(buy_price) = entry.take() {
                        if trade.price > buy_price {
                            wins += 1;
                        } else {
                            losses += 1;
                        }
                    }
                }
            }
        }
        (wins, losses)
    }
}
