//! Core types and traits for the candle aggregation engine.
//!
//! This crate provides the foundational building blocks including:
//! - Trade records and OHLCV candles
//! - Timeframe parsing and bucket alignment
//! - Signal types produced by consumer models
//! - Traits for trade feeds, consumer models, and execution sinks

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ConfigError, ExecutorError, FeedError, ModelError};
pub use traits::*;
pub use types::*;
