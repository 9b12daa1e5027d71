//! Structured error types for engine operations.
//!
//! Propagation policy: indicator and pattern operations degrade to an empty
//! or neutral result with a warning where a neutral fallback is defined;
//! the scorer and simulator surface these variants at the boundary instead
//! of panicking. Every error is request-scoped.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The accessor returned no usable history for the symbol.
    #[error("no price history available for '{symbol}'")]
    DataUnavailable { symbol: String },

    /// A numeric computation produced an undefined value (division by
    /// zero, NaN propagation) that has no documented neutral fallback.
    #[error("computation error: {0}")]
    Computation(String),

    /// Fewer bars than the operation's minimum window.
    #[error("insufficient history: have {have} bars, need at least {need}")]
    InsufficientWindow { have: usize, need: usize },

    /// Unsupported strategy name, invalid switching-pair symbol, or other
    /// caller-supplied configuration problem.
    #[error("configuration error: {0}")]
    Configuration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_problem() {
        let err = EngineError::InsufficientWindow { have: 50, need: 200 };
        assert_eq!(
            err.to_string(),
            "insufficient history: have 50 bars, need at least 200"
        );

        let err = EngineError::DataUnavailable {
            symbol: "QQQ".into(),
        };
        assert!(err.to_string().contains("QQQ"));
    }
}
