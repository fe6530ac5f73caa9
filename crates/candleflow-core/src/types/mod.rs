//! Core data types for the aggregation engine.

mod candle;
mod signal;
mod timeframe;
mod trade;

pub use candle::Candle;
pub use signal::{Direction, Signal, SignalIntent};
pub use timeframe::{Timeframe, TimeframeUnit};
pub use trade::{Side, Trade};
