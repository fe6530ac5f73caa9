//! Signal model implementations.
//!
//! This crate provides the built-in models that evaluate closed
//! candles:
//! - Candle Color (direction of the last closed candle)
//! - Delta Pressure (aggressor-flow imbalance over a window)

mod candle_color;
mod delta_pressure;
mod registry;

pub use candle_color::{CandleColorConfig, CandleColorModel};
pub use delta_pressure::{DeltaPressureConfig, DeltaPressureModel};
pub use registry::{ModelInfo, ModelRegistry};
