//! Real-time multi-timeframe candle aggregation engine.
//!
//! Wires the candle aggregator, the rolling history store and the
//! signal dispatcher into a single pipeline driven by a trade stream:
//! trades in, finalized candles and signals out. The pipeline is owned
//! by one task; trades are processed strictly in arrival order.

mod aggregator;
mod dispatcher;
mod history;

pub use aggregator::CandleAggregator;
pub use dispatcher::SignalDispatcher;
pub use history::HistoryStore;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info};

use candleflow_core::types::{Timeframe, Trade};

/// Counters reported when the engine shuts down.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineStats {
    /// Trades consumed from the feed
    pub trades_processed: u64,
    /// Candles finalized across all (instrument, timeframe) pairs
    pub candles_closed: u64,
}

/// The aggregation pipeline.
///
/// Owns all mutable aggregation and history state; nothing outside the
/// engine ever touches either.
pub struct CandleEngine {
    aggregator: CandleAggregator,
    history: HistoryStore,
    dispatcher: SignalDispatcher,
    stats: EngineStats,
}

impl CandleEngine {
    /// Create an engine forming candles for `timeframes`, with the
    /// eligibility watermark fixed at `started_at`.
    pub fn new(
        timeframes: Vec<Timeframe>,
        started_at: DateTime<Utc>,
        history_capacity: usize,
        dispatcher: SignalDispatcher,
    ) -> Self {
        info!(
            timeframes = %timeframes.iter().map(|tf| tf.to_string()).collect::<Vec<_>>().join(","),
            history_capacity,
            models = dispatcher.model_count(),
            "engine initialized"
        );
        Self {
            aggregator: CandleAggregator::new(timeframes, started_at),
            history: HistoryStore::new(history_capacity),
            dispatcher,
            stats: EngineStats::default(),
        }
    }

    /// Process one trade end-to-end: aggregate it, then for every candle
    /// it finalized, append to history and dispatch to matching models.
    pub async fn process(&mut self, trade: &Trade) {
        self.stats.trades_processed += 1;
        for (timeframe, candle) in self.aggregator.process(trade) {
            self.stats.candles_closed += 1;
            info!(
                symbol = %trade.symbol,
                timeframe = %timeframe,
                open_time = %candle.open_time,
                open = candle.open,
                high = candle.high,
                low = candle.low,
                close = candle.close,
                volume = candle.volume,
                delta = candle.delta,
                trades = candle.trade_count,
                "candle closed"
            );
            self.history.append(&trade.symbol, timeframe, candle);
            self.dispatcher
                .dispatch(&trade.symbol, timeframe, &self.history)
                .await;
        }
    }

    /// Drive the engine from a trade channel until the sending side
    /// (the feed supervisor) goes away.
    pub async fn run(mut self, mut trades: mpsc::Receiver<Trade>) -> EngineStats {
        while let Some(trade) = trades.recv().await {
            debug!(
                symbol = %trade.symbol,
                price = trade.price,
                quantity = trade.quantity,
                side = %trade.side,
                "trade received"
            );
            self.process(&trade).await;
        }
        info!(
            trades = self.stats.trades_processed,
            candles = self.stats.candles_closed,
            "engine stopped"
        );
        self.stats
    }

    /// Read access to the rolling history.
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Read access to the aggregator.
    pub fn aggregator(&self) -> &CandleAggregator {
        &self.aggregator
    }

    /// Current counters.
    pub fn stats(&self) -> EngineStats {
        self.stats
    }
}
