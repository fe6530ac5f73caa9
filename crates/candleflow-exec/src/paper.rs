//! Paper executor for simulated signal execution.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::info;
use uuid::Uuid;

use candleflow_core::{Direction, ExecutionSink, ExecutorError, Signal, Timeframe};

/// A simulated trade booked by the paper executor.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveTrade {
    /// Short trade identifier
    pub id: String,
    /// Model that produced the signal
    pub model: String,
    /// Instrument traded
    pub symbol: String,
    /// Timeframe the signal came from
    pub timeframe: Timeframe,
    /// Trade direction
    pub direction: Direction,
    /// Booked quantity
    pub quantity: Decimal,
    /// Target move as a fraction of entry price
    pub target_move: f64,
    /// When the trade was booked
    pub opened_at: DateTime<Utc>,
}

/// Execution sink that books simulated trades in memory.
pub struct PaperExecutor {
    trades: Arc<Mutex<HashMap<String, ActiveTrade>>>,
    default_quantity: Decimal,
    default_target_move: f64,
}

impl PaperExecutor {
    /// Create a new paper executor with default sizing.
    pub fn new() -> Self {
        Self {
            trades: Arc::new(Mutex::new(HashMap::new())),
            default_quantity: dec!(0.001),
            default_target_move: 0.005, // 0.5%
        }
    }

    /// Set the quantity used when a signal carries none.
    pub fn with_default_quantity(mut self, quantity: Decimal) -> Self {
        self.default_quantity = quantity;
        self
    }

    /// Set the target move used when a signal carries none.
    pub fn with_default_target_move(mut self, target_move: f64) -> Self {
        self.default_target_move = target_move;
        self
    }

    /// Number of open simulated trades.
    pub fn open_count(&self) -> usize {
        self.trades.lock().unwrap().len()
    }

    /// Get a snapshot of the open trades, oldest first.
    pub fn open_trades(&self) -> Vec<ActiveTrade> {
        let mut trades: Vec<ActiveTrade> = self.trades.lock().unwrap().values().cloned().collect();
        trades.sort_by_key(|t| t.opened_at);
        trades
    }
}

impl Default for PaperExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutionSink for PaperExecutor {
    fn name(&self) -> &str {
        "paper"
    }

    async fn submit(&self, signal: &Signal) -> Result<String, ExecutorError> {
        let quantity = signal.quantity.unwrap_or(self.default_quantity);
        let target_move = signal.target_move.unwrap_or(self.default_target_move);

        if quantity <= Decimal::ZERO {
            return Err(ExecutorError::Rejected(format!(
                "non-positive quantity {}",
                quantity
            )));
        }

        let id = Uuid::new_v4().simple().to_string()[..8].to_string();
        let trade = ActiveTrade {
            id: id.clone(),
            model: signal.model.clone(),
            symbol: signal.symbol.clone(),
            timeframe: signal.timeframe,
            direction: signal.direction,
            quantity,
            target_move,
            opened_at: Utc::now(),
        };

        info!(
            trade_id = %id,
            model = %trade.model,
            symbol = %trade.symbol,
            timeframe = %trade.timeframe,
            direction = %trade.direction,
            quantity = %trade.quantity,
            target_move = trade.target_move,
            "paper trade booked"
        );

        self.trades.lock().unwrap().insert(id.clone(), trade);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candleflow_core::SignalIntent;

    fn test_signal() -> Signal {
        Signal::from_intent(
            SignalIntent::directional(Direction::Buy),
            "candle_color",
            "btcusdt",
            Timeframe::minutes(1),
        )
    }

    #[tokio::test]
    async fn test_submit_books_trade() {
        let executor = PaperExecutor::new();

        let id = executor.submit(&test_signal()).await.unwrap();
        assert_eq!(id.len(), 8);
        assert_eq!(executor.open_count(), 1);

        let trades = executor.open_trades();
        assert_eq!(trades[0].id, id);
        assert_eq!(trades[0].symbol, "btcusdt");
        assert_eq!(trades[0].direction, Direction::Buy);
    }

    #[tokio::test]
    async fn test_defaults_fill_missing_sizing() {
        let executor = PaperExecutor::new()
            .with_default_quantity(dec!(0.5))
            .with_default_target_move(0.01);

        executor.submit(&test_signal()).await.unwrap();

        let trades = executor.open_trades();
        assert_eq!(trades[0].quantity, dec!(0.5));
        assert_eq!(trades[0].target_move, 0.01);
    }

    #[tokio::test]
    async fn test_signal_sizing_wins_over_defaults() {
        let executor = PaperExecutor::new();

        let mut signal = test_signal();
        signal.quantity = Some(dec!(2));
        signal.target_move = Some(0.02);
        executor.submit(&signal).await.unwrap();

        let trades = executor.open_trades();
        assert_eq!(trades[0].quantity, dec!(2));
        assert_eq!(trades[0].target_move, 0.02);
    }

    #[tokio::test]
    async fn test_rejects_non_positive_quantity() {
        let executor = PaperExecutor::new();

        let mut signal = test_signal();
        signal.quantity = Some(Decimal::ZERO);

        let result = executor.submit(&signal).await;
        assert!(matches!(result, Err(ExecutorError::Rejected(_))));
        assert_eq!(executor.open_count(), 0);
    }

    #[tokio::test]
    async fn test_each_submission_books_a_new_trade() {
        let executor = PaperExecutor::new();

        let first = executor.submit(&test_signal()).await.unwrap();
        let second = executor.submit(&test_signal()).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(executor.open_count(), 2);
    }
}
