//! Trading signals produced by consumer models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Timeframe;

/// Direction of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Buy,
    Sell,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Buy => write!(f, "BUY"),
            Direction::Sell => write!(f, "SELL"),
        }
    }
}

/// The directional verdict a model returns for one context window.
///
/// Carries only what the model decides; the dispatcher attaches model,
/// instrument and timeframe metadata before forwarding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalIntent {
    /// Direction the model expects the price to move
    pub direction: Direction,
    /// Fractional move the model targets (e.g. 0.005 = 0.5%)
    pub target_move: Option<f64>,
    /// Requested size; the sink's default applies when absent
    pub quantity: Option<Decimal>,
}

impl SignalIntent {
    /// A plain directional intent with no target or size attached.
    pub fn directional(direction: Direction) -> Self {
        Self {
            direction,
            target_move: None,
            quantity: None,
        }
    }
}

/// A fully-attributed signal as handed to the execution sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Name of the producing model
    pub model: String,
    /// Instrument the signal applies to
    pub symbol: String,
    /// Timeframe whose candle close triggered the evaluation
    pub timeframe: Timeframe,
    /// Signal direction
    pub direction: Direction,
    /// Fractional target move, if the model set one
    pub target_move: Option<f64>,
    /// Requested size, if the model set one
    pub quantity: Option<Decimal>,
}

impl Signal {
    /// Attach dispatch metadata to a model's intent.
    pub fn from_intent(
        intent: SignalIntent,
        model: &str,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Self {
        Self {
            model: model.to_string(),
            symbol: symbol.to_string(),
            timeframe,
            direction: intent.direction,
            target_move: intent.target_move,
            quantity: intent.quantity,
        }
    }
}
