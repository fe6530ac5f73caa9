//! Executed-trade records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Side of the aggressing party in an executed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Get the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// A single executed trade as delivered by the feed.
///
/// Produced once by ingestion, consumed by the aggregator, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Venue symbol, lowercase (e.g. "btcusdt")
    pub symbol: String,
    /// Execution time
    pub timestamp: DateTime<Utc>,
    /// Execution price
    pub price: f64,
    /// Executed quantity in the base asset
    pub quantity: f64,
    /// Aggressor side
    pub side: Side,
}

impl Trade {
    /// Create a new trade record.
    pub fn new(
        symbol: impl Into<String>,
        timestamp: DateTime<Utc>,
        price: f64,
        quantity: f64,
        side: Side,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            price,
            quantity,
            side,
        }
    }

    /// Check that the record passes basic validity filtering.
    ///
    /// A valid trade has a finite, positive price and quantity.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.price.is_finite()
            && self.price > 0.0
            && self.quantity.is_finite()
            && self.quantity > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(price: f64, quantity: f64) -> Trade {
        Trade::new("btcusdt", Utc::now(), price, quantity, Side::Buy)
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn test_side_display() {
        assert_eq!(Side::Buy.to_string(), "BUY");
        assert_eq!(Side::Sell.to_string(), "SELL");
    }

    #[test]
    fn test_trade_validity() {
        assert!(trade(100.0, 1.0).is_valid());
        assert!(!trade(0.0, 1.0).is_valid());
        assert!(!trade(-5.0, 1.0).is_valid());
        assert!(!trade(100.0, 0.0).is_valid());
        assert!(!trade(100.0, -1.0).is_valid());
        assert!(!trade(f64::NAN, 1.0).is_valid());
        assert!(!trade(100.0, f64::INFINITY).is_valid());
    }
}
