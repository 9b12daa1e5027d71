//! Pattern detection over bar sequences and indicator outputs.
//!
//! Everything here is a pure function over `&[Bar]`. Detectors degrade to
//! an empty or neutral result with a warning when history is too short,
//! mirroring the engine's best-effort policy.

pub mod candles;
pub mod chart;
pub mod cross;
pub mod divergence;
pub mod trend;

pub use candles::{scan_candles, CandlePattern, CandleScan, CandleSignal, PatternHit};
pub use chart::{
    detect_chart_patterns, spike_days, BandPosition, BollingerTouch, BoxRange, BreakoutDirection,
    ChartPatterns, SpikeDay, SpikeKind, Triangle, TriangleKind, Wedge, WedgeKind,
};
pub use cross::{
    cross_events, detect_crosses_extended, CrossDirection, CrossEvent, ExtendedCrosses, PairCross,
};
pub use divergence::{detect_divergence, DivergenceKind, DivergencePoint, DivergenceResult};
pub use trend::{
    analyze_trend, Breakout, LongTermTrend, MaDirection, ShortTermTrend, TrendAnalysis,
    TrendBucket,
};
