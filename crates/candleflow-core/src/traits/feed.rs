//! Trade feed trait definition.

use crate::error::FeedError;
use crate::types::Trade;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Trait for live trade-stream sources.
///
/// Implementations own the full subscription lifecycle: connect, decode
/// and validate inbound records, forward them to the sink in arrival
/// order, reconnect on transport failure, and exit cleanly once the
/// stop token is cancelled.
#[async_trait]
pub trait TradeFeed: Send + Sync {
    /// Run the feed until cancellation.
    ///
    /// Transport failures are handled internally by reconnecting and are
    /// never returned. An `Err` means the feed stopped for a reason other
    /// than cancellation, such as the sink going away.
    async fn run(&self, sink: mpsc::Sender<Trade>, stop: CancellationToken)
        -> Result<(), FeedError>;
}
