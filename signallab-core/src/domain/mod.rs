//! Domain value objects: bars, indicator points, decisions.

pub mod bar;
pub mod decision;
pub mod series;

pub use bar::Bar;
pub use decision::{Action, FactorScore, Mode, SignalDecision};
pub use series::{
    AdxPoint, BollingerPoint, CciPoint, MaPoint, MacdPoint, ObvPoint, RsiPoint, StochasticPoint,
    VwapPoint,
};
