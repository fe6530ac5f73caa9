//! Execution sinks for generated signals.
//!
//! An execution sink is the terminal stage of the pipeline: it receives
//! enriched signals from the dispatcher and acts on them. The only
//! built-in sink is a paper executor that books simulated trades in
//! memory.

mod paper;

pub use paper::{ActiveTrade, PaperExecutor};
