//! Error types for the aggregation engine.

use thiserror::Error;

/// Trade feed errors.
///
/// Transport-level failures are recovered inside the feed by
/// reconnecting; they surface here only in logs or when the feed cannot
/// continue at all.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Stream closed by remote")]
    StreamClosed,

    #[error("Trade sink closed")]
    SinkClosed,
}

/// Configuration errors, fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid timeframe: {0}")]
    InvalidTimeframe(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to load configuration: {0}")]
    Load(String),
}

/// Model construction and validation errors.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Execution sink errors.
#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Signal rejected: {0}")]
    Rejected(String),

    #[error("Executor unavailable: {0}")]
    Unavailable(String),
}
