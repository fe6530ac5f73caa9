//! Core traits for the aggregation engine.

mod executor;
mod feed;
mod model;

pub use executor::ExecutionSink;
pub use feed::TradeFeed;
pub use model::{Model, ModelConfig, SymbolFilter};
