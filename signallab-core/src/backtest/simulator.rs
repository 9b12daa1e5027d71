//! Replay driver: fetch, filter, run the selected strategy, summarize.

use tracing::{debug, info};

use crate::backtest::state::{BacktestState, Position};
use crate::backtest::strategy::{
    ma_cross_bar_signal, signal_bar_signal, BarSignal, Strategy, SIGNAL_LOOKBACK,
};
use crate::backtest::{BacktestRequest, BacktestResult, EQUITY_TAIL, TRADE_TAIL};
use crate::domain::Bar;
use crate::engine::IndicatorEngine;
use crate::error::EngineError;

pub struct BacktestSimulator {
    engine: IndicatorEngine,
}

impl BacktestSimulator {
    pub fn new(engine: IndicatorEngine) -> Self {
        Self { engine }
    }

    /// Runs one backtest end to end. Statistics are computed over the full
    /// run before the equity curve and trade log are cut down to their
    /// payload tails.
    pub fn run(&self, request: &BacktestRequest) -> Result<BacktestResult, EngineError> {
        let symbol = request.symbol.to_uppercase();
        if request.initial_investment <= 0.0 {
            return Err(EngineError::Configuration(format!(
                "initial investment must be positive, got {}",
                request.initial_investment
            )));
        }

        let mut bars = self.engine.bars(&symbol)?;
        bars.retain(|b| {
            request.start_date.map_or(true, |s| b.date >= s)
                && request.end_date.map_or(true, |e| b.date <= e)
        });
        if bars.is_empty() {
            return Err(EngineError::DataUnavailable { symbol });
        }
        let need = request.strategy.min_bars();
        if bars.len() < need {
            return Err(EngineError::InsufficientWindow {
                have: bars.len(),
                need,
            });
        }

        debug!(
            symbol = %symbol,
            strategy = %request.strategy,
            bars = bars.len(),
            "running backtest"
        );

        let state = match request.strategy {
            Strategy::Signal => run_signal(&bars, request.initial_investment),
            Strategy::BuyAndHold => run_buy_and_hold(&bars, request.initial_investment),
            Strategy::MaCross => run_ma_cross(&bars, request.initial_investment),
        };

        let result = summarize(&symbol, request, &bars, state);
        info!(
            symbol = %symbol,
            strategy = %request.strategy,
            final_equity = result.final_equity,
            trades = result.total_trades,
            "backtest complete"
        );
        Ok(result)
    }
}

fn run_signal(bars: &[Bar], initial_investment: f64) -> BacktestState {
    let mut state = BacktestState::new(initial_investment);
    for i in SIGNAL_LOOKBACK..bars.len() {
        let bar = &bars[i];
        match (signal_bar_signal(bars, i), state.position) {
            (BarSignal::Buy, Position::Cash) => state.buy(bar.date, bar.close),
            (BarSignal::Sell, Position::Holding) => state.sell(bar.date, bar.close),
            _ => {}
        }
        state.mark(bar.date, bar.close);
    }
    state
}

fn run_buy_and_hold(bars: &[Bar], initial_investment: f64) -> BacktestState {
    let mut state = BacktestState::new(initial_investment);
    let first = &bars[0];
    state.buy(first.date, first.close);
    for bar in bars {
        state.mark(bar.date, bar.close);
    }
    state
}

fn run_ma_cross(bars: &[Bar], initial_investment: f64) -> BacktestState {
    let mut state = BacktestState::new(initial_investment);
    for i in 200..bars.len() {
        let bar = &bars[i];
        // Yesterday's short average needs a full window of its own.
        if i > 200 {
            match (ma_cross_bar_signal(bars, i), state.position) {
                (BarSignal::Buy, Position::Cash) => state.buy(bar.date, bar.close),
                (BarSignal::Sell, Position::Holding) => state.sell(bar.date, bar.close),
                _ => {}
            }
        }
        state.mark(bar.date, bar.close);
    }
    state
}

fn summarize(
    symbol: &str,
    request: &BacktestRequest,
    bars: &[Bar],
    state: BacktestState,
) -> BacktestResult {
    let initial = request.initial_investment;
    let last = &bars[bars.len() - 1];
    let final_equity = state.equity(last.close);
    let total_return = final_equity - initial;
    let total_return_pct = total_return / initial * 100.0;

    let start_date = bars[0].date;
    let end_date = last.date;
    let cagr_pct = cagr_pct(initial, final_equity, start_date, end_date);

    let (win_rate_pct, total_trades, winning_trades, losing_trades) = match request.strategy {
        // A single entry held to the end has no round trips to score.
        Strategy::BuyAndHold => (100.0, 1, 1, 0),
        _ => {
            let (wins, losses) = state.round_trips();
            let round_trips = wins + losses;
            let win_rate = if round_trips > 0 {
                wins as f64 / round_trips as f64 * 100.0
            } else {
                0.0
            };
            (win_rate, state.trades.len(), wins, losses)
        }
    };

    let max_drawdown_pct = state.max_drawdown_pct();
    let mut equity_curve = state.equity_curve;
    if equity_curve.len() > EQUITY_TAIL {
        equity_curve.drain(..equity_curve.len() - EQUITY_TAIL);
    }
    let mut trades = state.trades;
    if trades.len() > TRADE_TAIL {
        trades.drain(..trades.len() - TRADE_TAIL);
    }

    BacktestResult {
        symbol: symbol.to_string(),
        strategy: request.strategy,
        start_date,
        end_date,
        initial_investment: initial,
        final_equity,
        total_return,
        total_return_pct,
        cagr_pct,
        max_drawdown_pct,
        win_rate_pct,
        total_trades,
        winning_trades,
        losing_trades,
        equity_curve,
        trades,
    }
}

/// Annualized growth rate over the bar span, in percent. Zero when the
/// span is empty or degenerate.
fn cagr_pct(
    initial: f64,
    final_equity: f64,
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
) -> f64 {
    let days = (end - start).num_days();
    let years = days as f64 / 365.25;
    if years <= 0.0 || final_equity <= 0.0 {
        return 0.0;
    }
    ((final_equity / initial).powf(1.0 / years) - 1.0) * 100.0
}
