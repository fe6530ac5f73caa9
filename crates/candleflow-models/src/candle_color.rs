//! Candle Color model.
//!
//! Follows the direction of the last closed candle: a bullish close
//! produces a buy signal, a bearish close a sell signal. A doji (close
//! equal to open) produces nothing.

use serde::{Deserialize, Serialize};
use tracing::debug;

use candleflow_core::{
    Candle, Direction, Model, ModelConfig, ModelError, SignalIntent, SymbolFilter, Timeframe,
};

/// Configuration for the Candle Color model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandleColorConfig {
    /// Instruments to watch; empty or "*" means every instrument
    #[serde(default)]
    pub symbols: Vec<String>,
    /// Timeframes to watch
    #[serde(default)]
    pub timeframes: Vec<Timeframe>,
    /// Candles handed to each evaluation
    #[serde(default = "default_context_len")]
    pub context_len: usize,
}

fn default_context_len() -> usize {
    1
}

impl Default for CandleColorConfig {
    fn default() -> Self {
        Self {
            symbols: vec![],
            timeframes: vec![],
            context_len: 1,
        }
    }
}

impl ModelConfig for CandleColorConfig {
    fn validate(&self) -> Result<(), ModelError> {
        if self.context_len == 0 {
            return Err(ModelError::InvalidConfig(
                "Context length must be greater than 0".into(),
            ));
        }
        if self.timeframes.is_empty() {
            return Err(ModelError::InvalidConfig(
                "At least one timeframe required".into(),
            ));
        }
        Ok(())
    }
}

/// Candle Color model.
pub struct CandleColorModel {
    config: CandleColorConfig,
    filter: SymbolFilter,
    signals_generated: usize,
}

impl CandleColorModel {
    /// Create a new Candle Color model.
    pub fn new(config: CandleColorConfig) -> Self {
        let filter = SymbolFilter::from_labels(&config.symbols);
        Self {
            config,
            filter,
            signals_generated: 0,
        }
    }
}

impl Model for CandleColorModel {
    fn name(&self) -> &str {
        "candle_color"
    }

    fn description(&self) -> &str {
        "Follows the direction of the last closed candle"
    }

    fn timeframes(&self) -> &[Timeframe] {
        &self.config.timeframes
    }

    fn symbols(&self) -> &SymbolFilter {
        &self.filter
    }

    fn context_len(&self) -> usize {
        self.config.context_len
    }

    fn evaluate(&mut self, window: &[Candle]) -> Option<SignalIntent> {
        let last = window.last()?;

        let direction = if last.is_bullish() {
            Direction::Buy
        } else if last.is_bearish() {
            Direction::Sell
        } else {
            return None;
        };

        self.signals_generated += 1;
        debug!(
            model = self.name(),
            %direction,
            open = last.open,
            close = last.close,
            signals = self.signals_generated,
            "candle color signal"
        );
        Some(SignalIntent::directional(direction))
    }
}
