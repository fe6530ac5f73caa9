//! Delta Pressure model.
//!
//! Looks for sustained aggressor-flow imbalance: when the net delta
//! across the context window is a large enough share of the traded
//! volume and the last candle closed in the same direction, the model
//! follows the dominant side.

use serde::{Deserialize, Serialize};
use tracing::debug;

use candleflow_core::{
    Candle, Direction, Model, ModelConfig, ModelError, SignalIntent, SymbolFilter, Timeframe,
};

/// Configuration for the Delta Pressure model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeltaPressureConfig {
    /// Instruments to watch; empty or "*" means every instrument
    #[serde(default)]
    pub symbols: Vec<String>,
    /// Timeframes to watch
    #[serde(default)]
    pub timeframes: Vec<Timeframe>,
    /// Candles handed to each evaluation
    #[serde(default = "default_context_len")]
    pub context_len: usize,
    /// Minimum |net delta| as a fraction of window volume
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_context_len() -> usize {
    3
}

fn default_threshold() -> f64 {
    0.25
}

impl Default for DeltaPressureConfig {
    fn default() -> Self {
        Self {
            symbols: vec![],
            timeframes: vec![],
            context_len: 3,
            threshold: 0.25,
        }
    }
}

impl ModelConfig for DeltaPressureConfig {
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
        if self.threshold <= 0.0 || self.threshold > 1.0 {
            return Err(ModelError::InvalidConfig(
                "Threshold must be within (0, 1]".into(),
            ));
        }
        Ok(())
    }
}

/// Delta Pressure model.
pub struct DeltaPressureModel {
    config: DeltaPressureConfig,
    filter: SymbolFilter,
    signals_generated: usize,
}

impl DeltaPressureModel {
    /// Create a new Delta Pressure model.
    pub fn new(config: DeltaPressureConfig) -> Self {
        let filter = SymbolFilter::from_labels(&config.symbols);
        Self {
            config,
            filter,
            signals_generated: 0,
        }
    }
}

impl Model for DeltaPressureModel {
    fn name(&self) -> &str {
        "delta_pressure"
    }

    fn description(&self) -> &str {
        "Follows sustained aggressor-flow imbalance across the window"
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
        // Warmup: wait until the history can fill the whole window.
        if window.len() < self.config.context_len {
            return None;
        }
        let last = window.last()?;

        let net_delta: f64 = window.iter().map(|c| c.delta).sum();
        let total_volume: f64 = window.iter().map(|c| c.volume).sum();
        if total_volume <= 0.0 {
            return None;
        }

        let imbalance = net_delta / total_volume;
        if imbalance.abs() < self.config.threshold {
            return None;
        }

        let direction = if imbalance > 0.0 {
            Direction::Buy
        } else {
            Direction::Sell
        };

        // The candle that just closed must confirm the flow direction.
        let confirmed = match direction {
            Direction::Buy => last.is_bullish(),
            Direction::Sell => last.is_bearish(),
        };
        if !confirmed {
            return None;
        }

        self.signals_generated += 1;
        debug!(
            model = self.name(),
            %direction,
            imbalance,
            net_delta,
            total_volume,
            signals = self.signals_generated,
            "delta pressure signal"
        );
        Some(SignalIntent::directional(direction))
    }
}
