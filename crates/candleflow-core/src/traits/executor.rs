//! Execution sink trait definition.

use crate::error::ExecutorError;
use crate::types::Signal;
use async_trait::async_trait;

/// Trait for the downstream execution collaborator.
///
/// At most one sink is attached to the dispatcher; signals that clear
/// subscription filtering are handed to it after enrichment.
#[async_trait]
pub trait ExecutionSink: Send + Sync {
    /// Get the name of this sink (used in logs).
    fn name(&self) -> &str;

    /// Submit a signal for execution.
    ///
    /// # Returns
    /// The sink's trade id on acceptance.
    async fn submit(&self, signal: &Signal) -> Result<String, ExecutorError>;
}
