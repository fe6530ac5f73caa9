//! OHLCV candle types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Side, Timeframe, Trade};

/// A single OHLCV candle with a buy/sell volume split.
///
/// Mutable while its bucket is open; treated as immutable the moment it
/// is emitted downstream. Invariants while open:
/// `low <= open, close <= high`, `volume = buy_volume + sell_volume`,
/// `delta = buy_volume - sell_volume`, `trade_count >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bucket start
    pub open_time: DateTime<Utc>,
    /// Bucket end (open_time + timeframe duration)
    pub close_time: DateTime<Utc>,
    /// First trade price in the bucket
    pub open: f64,
    /// Highest trade price
    pub high: f64,
    /// Lowest trade price
    pub low: f64,
    /// Most recent trade price
    pub close: f64,
    /// Total traded quantity
    pub volume: f64,
    /// Quantity taken by buy-side aggressors
    pub buy_volume: f64,
    /// Quantity taken by sell-side aggressors
    pub sell_volume: f64,
    /// buy_volume - sell_volume
    pub delta: f64,
    /// Number of trades aggregated into the candle
    pub trade_count: u64,
}

impl Candle {
    /// Open a new candle for a bucket from its first trade.
    pub fn open_with(open_time: DateTime<Utc>, timeframe: Timeframe, trade: &Trade) -> Self {
        let (buy_volume, sell_volume) = match trade.side {
            Side::Buy => (trade.quantity, 0.0),
            Side::Sell => (0.0, trade.quantity),
        };
        Self {
            open_time,
            close_time: open_time + timeframe.duration(),
            open: trade.price,
            high: trade.price,
            low: trade.price,
            close: trade.price,
            volume: trade.quantity,
            buy_volume,
            sell_volume,
            delta: buy_volume - sell_volume,
            trade_count: 1,
        }
    }

    /// Fold a subsequent trade from the same bucket into the candle.
    pub fn apply(&mut self, trade: &Trade) {
        self.high = self.high.max(trade.price);
        self.low = self.low.min(trade.price);
        self.close = trade.price;
        self.volume += trade.quantity;
        match trade.side {
            Side::Buy => self.buy_volume += trade.quantity,
            Side::Sell => self.sell_volume += trade.quantity,
        }
        self.delta = self.buy_volume - self.sell_volume;
        self.trade_count += 1;
    }

    /// Check if the candle closed above its open.
    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Check if the candle closed below its open.
    #[inline]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// The candle's price range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}
