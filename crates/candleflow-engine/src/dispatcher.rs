//! Finalized-candle fan-out to consumer models.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{error, info};

use candleflow_core::traits::{ExecutionSink, Model};
use candleflow_core::types::{Signal, Timeframe};

use crate::history::HistoryStore;

/// Routes each finalized candle to every registered model whose
/// subscription matches, and forwards produced signals to the optional
/// execution sink.
pub struct SignalDispatcher {
    models: Vec<Box<dyn Model>>,
    sink: Option<Arc<dyn ExecutionSink>>,
}

impl SignalDispatcher {
    /// Create a dispatcher with no models and no sink attached.
    pub fn new() -> Self {
        Self {
            models: Vec::new(),
            sink: None,
        }
    }

    /// Attach the execution sink signals are forwarded to.
    pub fn with_sink(mut self, sink: Arc<dyn ExecutionSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Register a model. Models are invoked in registration order.
    pub fn register(&mut self, model: Box<dyn Model>) {
        info!(
            model = model.name(),
            context_len = model.context_len(),
            "registered model"
        );
        self.models.push(model);
    }

    /// Number of registered models.
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Fan a finalized candle out to every matching model.
    ///
    /// Each model receives its own chronological context window ending
    /// at the candle that just closed. A panicking model is logged and
    /// skipped; remaining models still run and core state is untouched.
    pub async fn dispatch(&mut self, symbol: &str, timeframe: Timeframe, history: &HistoryStore) {
        let sink = self.sink.clone();
        for model in &mut self.models {
            if !model.subscribes_to(symbol, timeframe) {
                continue;
            }
            let window = history.window(symbol, timeframe, model.context_len());
            if window.is_empty() {
                continue;
            }
            let name = model.name().to_string();
            let outcome = catch_unwind(AssertUnwindSafe(|| model.evaluate(&window)));
            let intent = match outcome {
                Ok(intent) => intent,
                Err(_) => {
                    error!(
                        model = %name,
                        symbol,
                        timeframe = %timeframe,
                        "model panicked during evaluation"
                    );
                    continue;
                }
            };
            if let Some(intent) = intent {
                let signal = Signal::from_intent(intent, &name, symbol, timeframe);
                Self::forward(sink.as_deref(), signal).await;
            }
        }
    }

    /// Hand a signal to the sink, or surface it in the log when no sink
    /// is attached. Sink errors do not roll back the candle that has
    /// already committed to history.
    async fn forward(sink: Option<&dyn ExecutionSink>, signal: Signal) {
        match sink {
            Some(sink) => match sink.submit(&signal).await {
                Ok(trade_id) => {
                    info!(
                        model = %signal.model,
                        symbol = %signal.symbol,
                        timeframe = %signal.timeframe,
                        direction = %signal.direction,
                        trade_id = %trade_id,
                        "signal submitted"
                    );
                }
                Err(e) => {
                    error!(
                        model = %signal.model,
                        symbol = %signal.symbol,
                        timeframe = %signal.timeframe,
                        sink = sink.name(),
                        error = %e,
                        "execution sink rejected signal"
                    );
                }
            },
            None => {
                info!(
                    model = %signal.model,
                    symbol = %signal.symbol,
                    timeframe = %signal.timeframe,
                    direction = %signal.direction,
                    "signal generated, no execution sink attached"
                );
            }
        }
    }
}

impl Default for SignalDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
