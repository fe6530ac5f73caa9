//! Multi-timeframe candle formation.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use candleflow_core::types::{Candle, Timeframe, Trade};

/// Per (instrument, timeframe) candle-formation state machine.
///
/// Buckets trades into time-aligned candles for every configured
/// timeframe. Closes are lazy: a candle is finalized by the first trade
/// at or past its close time, never by a wall-clock timer, so a bucket
/// with no trades produces no candle at all.
pub struct CandleAggregator {
    /// Configured timeframes with their eligibility watermark.
    timeframes: Vec<(Timeframe, DateTime<Utc>)>,
    /// Open candle per symbol and timeframe.
    open: HashMap<String, HashMap<Timeframe, Candle>>,
}

impl CandleAggregator {
    /// Create an aggregator for the given timeframes.
    ///
    /// `started_at` fixes the per-timeframe watermark: a bucket that
    /// began before the engine attached to the stream never forms a
    /// candle, so no truncated candles are emitted.
    pub fn new(timeframes: Vec<Timeframe>, started_at: DateTime<Utc>) -> Self {
        let timeframes = timeframes
            .into_iter()
            .map(|tf| (tf, tf.first_allowed_from(started_at)))
            .collect();
        Self {
            timeframes,
            open: HashMap::new(),
        }
    }

    /// Timeframes this aggregator forms candles for, in configuration order.
    pub fn timeframes(&self) -> Vec<Timeframe> {
        self.timeframes.iter().map(|(tf, _)| *tf).collect()
    }

    /// The earliest eligible bucket start for a timeframe, if configured.
    pub fn first_allowed(&self, timeframe: Timeframe) -> Option<DateTime<Utc>> {
        self.timeframes
            .iter()
            .find(|(tf, _)| *tf == timeframe)
            .map(|(_, allowed)| *allowed)
    }

    /// The currently open candle for a (symbol, timeframe), if any.
    pub fn open_candle(&self, symbol: &str, timeframe: Timeframe) -> Option<&Candle> {
        self.open.get(symbol).and_then(|slots| slots.get(&timeframe))
    }

    /// Consume one trade and update every configured timeframe.
    ///
    /// Returns the candles this trade finalized, in timeframe
    /// configuration order. A candle finalized here is immutable from
    /// the caller's point of view.
    pub fn process(&mut self, trade: &Trade) -> Vec<(Timeframe, Candle)> {
        let mut closed = Vec::new();
        if !trade.is_valid() {
            return closed;
        }

        let slots = self.open.entry(trade.symbol.clone()).or_default();
        for (tf, first_allowed) in &self.timeframes {
            let bucket = tf.bucket_start(trade.timestamp);
            if bucket < *first_allowed {
                continue;
            }

            // Lazy close: a trade at or past the nominal close finalizes
            // the open candle before anything else happens.
            if slots
                .get(tf)
                .is_some_and(|candle| trade.timestamp >= candle.close_time)
            {
                if let Some(candle) = slots.remove(tf) {
                    closed.push((*tf, candle));
                }
            }

            match slots.get_mut(tf) {
                Some(candle) if candle.open_time == bucket => candle.apply(trade),
                // The triggering trade seeds the new candle and applies
                // no further update to it.
                _ => {
                    slots.insert(*tf, Candle::open_with(bucket, *tf, trade));
                }
            }
        }
        closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candleflow_core::types::Side;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, h, m, s).unwrap()
    }

    fn trade(time: DateTime<Utc>, price: f64, quantity: f64, side: Side) -> Trade {
        Trade::new("btcusdt", time, price, quantity, side)
    }

    fn aggregator_5m(started_at: DateTime<Utc>) -> CandleAggregator {
        CandleAggregator::new(vec![Timeframe::minutes(5)], started_at)
    }

    #[test]
    fn test_watermark_from_mid_bucket_start() {
        let agg = aggregator_5m(at(0, 2, 0));
        assert_eq!(agg.first_allowed(Timeframe::minutes(5)), Some(at(0, 5, 0)));
    }

    #[test]
    fn test_trade_before_watermark_is_ignored() {
        let mut agg = aggregator_5m(at(0, 2, 0));

        let closed = agg.process(&trade(at(0, 3, 0), 100.0, 1.0, Side::Buy));
        assert!(closed.is_empty());
        assert!(agg.open_candle("btcusdt", Timeframe::minutes(5)).is_none());

        let closed = agg.process(&trade(at(0, 6, 0), 101.0, 1.0, Side::Buy));
        assert!(closed.is_empty());
        let candle = agg.open_candle("btcusdt", Timeframe::minutes(5)).unwrap();
        assert_eq!(candle.open_time, at(0, 5, 0));
    }

    #[test]
    fn test_boundary_start_is_immediately_eligible() {
        let mut agg = aggregator_5m(at(0, 5, 0));
        agg.process(&trade(at(0, 5, 30), 100.0, 1.0, Side::Buy));
        let candle = agg.open_candle("btcusdt", Timeframe::minutes(5)).unwrap();
        assert_eq!(candle.open_time, at(0, 5, 0));
    }

    #[test]
    fn test_lazy_close_on_next_trade() {
        let mut agg = aggregator_5m(at(0, 0, 0));
        agg.process(&trade(at(0, 1, 0), 100.0, 1.0, Side::Buy));
        agg.process(&trade(at(0, 3, 0), 102.0, 1.0, Side::Sell));

        // Arrives past the bucket close, two buckets later.
        let closed = agg.process(&trade(at(0, 7, 30), 105.0, 2.0, Side::Buy));
        assert_eq!(closed.len(), 1);
        let (tf, candle) = closed[0];
        assert_eq!(tf, Timeframe::minutes(5));
        assert_eq!(candle.open_time, at(0, 0, 0));
        assert_eq!(candle.close_time, at(0, 5, 0));
        assert_eq!(candle.open, 100.0);
        assert_eq!(candle.close, 102.0);
        assert_eq!(candle.trade_count, 2);

        // The new open candle belongs to the trade's own bucket.
        let open = agg.open_candle("btcusdt", Timeframe::minutes(5)).unwrap();
        assert_eq!(open.open_time, at(0, 5, 0));
        assert_eq!(open.open, 105.0);
        assert_eq!(open.trade_count, 1);
    }

    #[test]
    fn test_no_candle_for_empty_bucket() {
        let mut agg = aggregator_5m(at(0, 0, 0));
        agg.process(&trade(at(0, 1, 0), 100.0, 1.0, Side::Buy));

        // Next trade skips the [00:05, 00:10) bucket entirely.
        let closed = agg.process(&trade(at(0, 12, 0), 101.0, 1.0, Side::Buy));
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].1.open_time, at(0, 0, 0));

        let open = agg.open_candle("btcusdt", Timeframe::minutes(5)).unwrap();
        assert_eq!(open.open_time, at(0, 10, 0));
    }

    #[test]
    fn test_triggering_trade_not_applied_twice() {
        let mut agg = aggregator_5m(at(0, 0, 0));
        agg.process(&trade(at(0, 1, 0), 100.0, 1.0, Side::Buy));
        agg.process(&trade(at(0, 6, 0), 105.0, 2.0, Side::Sell));

        let open = agg.open_candle("btcusdt", Timeframe::minutes(5)).unwrap();
        assert_eq!(open.volume, 2.0);
        assert_eq!(open.trade_count, 1);
        assert_eq!(open.sell_volume, 2.0);
    }

    #[test]
    fn test_invalid_trade_never_alters_state() {
        let mut agg = aggregator_5m(at(0, 0, 0));
        agg.process(&trade(at(0, 1, 0), 100.0, 1.0, Side::Buy));
        let before = *agg.open_candle("btcusdt", Timeframe::minutes(5)).unwrap();

        agg.process(&trade(at(0, 2, 0), 0.0, 1.0, Side::Buy));
        agg.process(&trade(at(0, 2, 1), -10.0, 1.0, Side::Sell));
        agg.process(&trade(at(0, 2, 2), 105.0, 0.0, Side::Buy));
        agg.process(&trade(at(0, 2, 3), 105.0, -3.0, Side::Sell));

        let after = *agg.open_candle("btcusdt", Timeframe::minutes(5)).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_timeframes_are_independent() {
        let mut agg = CandleAggregator::new(
            vec![Timeframe::minutes(1), Timeframe::minutes(5)],
            at(0, 0, 0),
        );
        agg.process(&trade(at(0, 0, 30), 100.0, 1.0, Side::Buy));

        // Closes the 1m candle only; the 5m candle keeps aggregating.
        let closed = agg.process(&trade(at(0, 1, 10), 101.0, 1.0, Side::Buy));
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].0, Timeframe::minutes(1));

        let c5 = agg.open_candle("btcusdt", Timeframe::minutes(5)).unwrap();
        assert_eq!(c5.trade_count, 2);
        assert_eq!(c5.open_time, at(0, 0, 0));
    }

    #[test]
    fn test_symbols_are_isolated() {
        let mut agg = aggregator_5m(at(0, 0, 0));
        agg.process(&trade(at(0, 1, 0), 100.0, 1.0, Side::Buy));
        agg.process(&Trade::new("ethusdt", at(0, 2, 0), 2000.0, 5.0, Side::Sell));

        let btc = agg.open_candle("btcusdt", Timeframe::minutes(5)).unwrap();
        let eth = agg.open_candle("ethusdt", Timeframe::minutes(5)).unwrap();
        assert_eq!(btc.trade_count, 1);
        assert_eq!(btc.close, 100.0);
        assert_eq!(eth.trade_count, 1);
        assert_eq!(eth.close, 2000.0);
    }

    #[test]
    fn test_multiple_rollovers_in_sequence() {
        let mut agg = aggregator_5m(at(0, 0, 0));
        agg.process(&trade(at(0, 1, 0), 100.0, 1.0, Side::Buy));
        agg.process(&trade(at(0, 6, 0), 101.0, 1.0, Side::Buy));
        agg.process(&trade(at(0, 11, 0), 102.0, 1.0, Side::Buy));
        let closed = agg.process(&trade(at(0, 16, 0), 103.0, 1.0, Side::Buy));

        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].1.open_time, at(0, 10, 0));
        assert_eq!(closed[0].1.close, 102.0);
    }
}
