use thiserror::Error;

use crate::pipeline_objects::{MessageAttributes, QueueMessage, SendReceipt};

#[derive(Debug, Clone, Error)]
pub enum QueueError {
    #[error("Could not send message to the queue: {0}")]
    SendError(String),
    #[error("Could not receive messages from the queue: {0}")]
    ReceiveError(String),
    #[error("Could not delete message from the queue: {0}")]
    DeleteError(String),
}

/// The durable work channel between the intake paths and the enrichment consumer.
///
/// Delivery contract: at-least-once and unordered. Each delivery carries a fresh single-use
/// receipt handle; a message only leaves the queue when [`Self::delete_message`] consumes that
/// handle, and an unacknowledged message becomes visible again for redelivery.
#[allow(async_fn_in_trait)]
pub trait WorkQueue {
    async fn send_message(
        &self,
        body: String,
        attributes: &MessageAttributes,
    ) -> Result<SendReceipt, QueueError>;
    /// Delivers up to `max_messages` currently visible messages. An empty vector means the
    /// queue has nothing visible right now, not that it is drained for good.
    async fn receive_batch(&self, max_messages: u32) -> Result<Vec<QueueMessage>, QueueError>;
    /// Consumes a receipt handle, removing the message for good. Fails if the handle is
    /// unknown or has been superseded by a newer delivery of the same message.
    async fn delete_message(&self, receipt_handle: &str) -> Result<(), QueueError>;
}
