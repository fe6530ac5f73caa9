//! Bounded rolling candle history.

use std::collections::{HashMap, VecDeque};

use candleflow_core::types::{Candle, Timeframe};

/// Bounded, insertion-ordered store of finalized candles per
/// (instrument, timeframe) pair.
///
/// Candles are appended by the engine only; consumers read owned
/// snapshots, so a window handed out is never mutated by later appends.
pub struct HistoryStore {
    capacity: usize,
    series: HashMap<String, HashMap<Timeframe, VecDeque<Candle>>>,
}

impl HistoryStore {
    /// Default per-pair capacity.
    pub const DEFAULT_CAPACITY: usize = 500;

    /// Create a store where every (instrument, timeframe) series holds
    /// at most `capacity` candles; the oldest is evicted on overflow.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            series: HashMap::new(),
        }
    }

    /// Append a finalized candle, evicting the oldest at capacity.
    pub fn append(&mut self, symbol: &str, timeframe: Timeframe, candle: Candle) {
        let series = self
            .series
            .entry(symbol.to_string())
            .or_default()
            .entry(timeframe)
            .or_default();
        if self.capacity > 0 && series.len() >= self.capacity {
            series.pop_front();
        }
        series.push_back(candle);
    }

    fn get(&self, symbol: &str, timeframe: Timeframe) -> Option<&VecDeque<Candle>> {
        self.series.get(symbol).and_then(|m| m.get(&timeframe))
    }

    /// The most recent up-to-`n` candles in chronological order, oldest
    /// first. The returned snapshot is owned by the caller.
    pub fn window(&self, symbol: &str, timeframe: Timeframe, n: usize) -> Vec<Candle> {
        match self.get(symbol, timeframe) {
            Some(series) => {
                let start = series.len().saturating_sub(n);
                series.iter().skip(start).copied().collect()
            }
            None => Vec::new(),
        }
    }

    /// Number of candles held for a pair.
    pub fn len(&self, symbol: &str, timeframe: Timeframe) -> usize {
        self.get(symbol, timeframe).map_or(0, |s| s.len())
    }

    /// The most recent candle for a pair.
    pub fn last(&self, symbol: &str, timeframe: Timeframe) -> Option<&Candle> {
        self.get(symbol, timeframe).and_then(|s| s.back())
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
