use thiserror::Error;

use crate::traits::{QueueError, StoreError, UpstreamApiError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Upstream API error. {0}")]
    Upstream(#[from] UpstreamApiError),
    #[error("Queue error. {0}")]
    Queue(#[from] QueueError),
    #[error("Store error. {0}")]
    Store(#[from] StoreError),
    #[error("Webhook rejected. {0}")]
    Validation(String),
    #[error("Could not deserialize payload. {0}")]
    InvalidPayload(String),
}

impl PipelineError {
    /// Validation failures are the one class that is neither retried nor alerted on; the HTTP
    /// layer answers 403 and moves on.
    pub fn is_validation(&self) -> bool {
        matches!(self, PipelineError::Validation(_))
    }
}
