use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AlertError {
    #[error("Could not publish operator alert: {0}")]
    PublishError(String),
}

/// Out-of-band channel for surfacing pipeline failures to an operator.
#[allow(async_fn_in_trait)]
pub trait OperatorAlerts {
    async fn publish(&self, subject: &str, message: &str) -> Result<(), AlertError>;
}
