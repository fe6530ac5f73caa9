//! Live trade ingestion.
//!
//! Connects to an exchange websocket, decodes raw trade events into
//! [`candleflow_core::Trade`] records and forwards them to the engine
//! over a bounded channel. The feed owns reconnection: any transport
//! failure is retried after a fixed delay until it is asked to stop.

mod binance;

pub use binance::BinanceTradeFeed;
