//! Consumer model trait definitions.

use crate::error::ModelError;
use crate::types::{Candle, SignalIntent, Timeframe};

/// Instrument filter for a model subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolFilter {
    /// Match every instrument
    All,
    /// Match only the listed instruments
    Only(Vec<String>),
}

impl SymbolFilter {
    /// Build a filter from config labels; a "*" entry or an empty list
    /// means all instruments.
    pub fn from_labels(labels: &[String]) -> Self {
        if labels.is_empty() || labels.iter().any(|l| l == "*") {
            SymbolFilter::All
        } else {
            SymbolFilter::Only(labels.to_vec())
        }
    }

    /// Check whether a symbol passes the filter.
    pub fn matches(&self, symbol: &str) -> bool {
        match self {
            SymbolFilter::All => true,
            SymbolFilter::Only(symbols) => symbols.iter().any(|s| s == symbol),
        }
    }
}

/// Core consumer model trait.
///
/// Models receive chronological windows of closed candles for the
/// (instrument, timeframe) pairs their subscription matches and
/// optionally produce a directional signal. How the decision is made is
/// entirely up to the implementation.
pub trait Model: Send + Sync {
    /// Get the unique name of this model.
    fn name(&self) -> &str;

    /// Timeframes this model subscribes to.
    fn timeframes(&self) -> &[Timeframe];

    /// Instruments this model subscribes to.
    fn symbols(&self) -> &SymbolFilter;

    /// Number of trailing candles supplied per evaluation.
    fn context_len(&self) -> usize;

    /// Evaluate one context window, oldest candle first, the candle
    /// that just closed last.
    ///
    /// # Returns
    /// * `Some(SignalIntent)` if the model wants to act
    /// * `None` if no action is warranted
    fn evaluate(&mut self, window: &[Candle]) -> Option<SignalIntent>;

    /// Get a description of the model.
    fn description(&self) -> &str {
        ""
    }

    /// Check whether this model subscribes to the given (symbol, timeframe).
    fn subscribes_to(&self, symbol: &str, timeframe: Timeframe) -> bool {
        self.timeframes().contains(&timeframe) && self.symbols().matches(symbol)
    }
}

/// Trait for model configuration validation.
pub trait ModelConfig {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_all() {
        let filter = SymbolFilter::All;
        assert!(filter.matches("btcusdt"));
        assert!(filter.matches("anything"));
    }

    #[test]
    fn test_filter_only() {
        let filter = SymbolFilter::Only(vec!["ethusdt".to_string()]);
        assert!(filter.matches("ethusdt"));
        assert!(!filter.matches("btcusdt"));
    }

    #[test]
    fn test_filter_from_labels() {
        assert_eq!(SymbolFilter::from_labels(&[]), SymbolFilter::All);
        assert_eq!(
            SymbolFilter::from_labels(&["*".to_string()]),
            SymbolFilter::All
        );
        assert_eq!(
            SymbolFilter::from_labels(&["btcusdt".to_string(), "*".to_string()]),
            SymbolFilter::All
        );
        assert_eq!(
            SymbolFilter::from_labels(&["btcusdt".to_string()]),
            SymbolFilter::Only(vec!["btcusdt".to_string()])
        );
    }
}
